//! Live countdown for express meals.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use surplus_catalog::Countdown;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::debug;

const TICK: Duration = Duration::from_secs(1);

/// Source of the current wall-clock time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Publish the time left until `expires_at`, recomputed once per second.
///
/// The first value is available immediately. The task stops after
/// publishing [`Countdown::Expired`] or once every receiver is dropped, so
/// `changed()` on the receiver returns an error after expiry.
pub fn spawn_countdown(
    expires_at: DateTime<Utc>,
    clock: Arc<dyn Clock>,
) -> watch::Receiver<Countdown> {
    let (sender, receiver) = watch::channel(Countdown::until(expires_at, clock.now()));

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(TICK);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval.tick().await;

        while !sender.borrow().is_expired() {
            interval.tick().await;
            let current = Countdown::until(expires_at, clock.now());
            if sender.send(current).is_err() {
                debug!("countdown has no listeners, stopping");
                return;
            }
        }
        debug!(%expires_at, "countdown expired");
    });

    receiver
}
