//! Single-writer save queues.
//!
//! Each storage key gets one background task that performs saves in the
//! order they were enqueued. Callers never wait on a save; a failed save
//! is logged and dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde_json::Value;
use surplus_storage::{KeyValueStore, StorageKey};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

enum Command {
    Save(Value),
    Flush(oneshot::Sender<()>),
}

/// Handle to the save task for one key.
#[derive(Clone)]
pub struct PersistenceQueue {
    key: StorageKey,
    sender: mpsc::UnboundedSender<Command>,
    failed: Arc<AtomicU64>,
}

impl PersistenceQueue {
    /// Start the save task. Must be called from within a tokio runtime.
    pub fn spawn(store: Arc<dyn KeyValueStore>, key: StorageKey) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let failed = Arc::new(AtomicU64::new(0));
        tokio::spawn(run(store, key, receiver, Arc::clone(&failed)));
        Self {
            key,
            sender,
            failed,
        }
    }

    /// Queue a whole-document save.
    pub fn enqueue(&self, document: Value) {
        if self.sender.send(Command::Save(document)).is_err() {
            warn!(key = %self.key, "save task stopped, write dropped");
            self.failed.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Wait until every save queued before this call has settled.
    pub async fn flush(&self) {
        let (done, wait) = oneshot::channel();
        if self.sender.send(Command::Flush(done)).is_err() {
            return;
        }
        let _ = wait.await;
    }

    /// Number of saves that were dropped because the store refused them.
    pub fn failed_saves(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }
}

async fn run(
    store: Arc<dyn KeyValueStore>,
    key: StorageKey,
    mut receiver: mpsc::UnboundedReceiver<Command>,
    failed: Arc<AtomicU64>,
) {
    while let Some(command) = receiver.recv().await {
        match command {
            Command::Save(document) => match store.save(key, document).await {
                Ok(()) => debug!(key = %key, "saved"),
                Err(e) => {
                    failed.fetch_add(1, Ordering::Relaxed);
                    warn!(key = %key, error = %e, "save failed, write dropped");
                }
            },
            Command::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    debug!(key = %key, "save task finished");
}
