use std::sync::Arc;

use anyhow::{Context, Result};
use surplus_catalog::Catalog;
use surplus_config::AppConfig;
use surplus_storage::{open_store, KeyValueStore};
use surplus_users::UserContext;
use tracing::info;

pub mod countdown;
pub mod platform;
pub mod reservation;

pub use countdown::{spawn_countdown, Clock, SystemClock};
pub use platform::{
    map_links, Haptics, LocalFileSource, MapLink, MapProvider, NoopHaptics, PhotoCapability,
    PhotoSource, Platform,
};
pub use reservation::{
    ReservationError, ReservationFlow, ReservationOptions, ReservationReceipt, ReservationResult,
    ReservationState,
};

pub mod telemetry {
    use anyhow::Result;
    use tracing_subscriber::{fmt::SubscriberBuilder, EnvFilter};

    /// Install the global subscriber. `RUST_LOG` wins over `default_level`.
    pub fn init_tracing(default_level: &str) -> Result<()> {
        let env_filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(default_level))
            .unwrap_or_else(|_| EnvFilter::new("info"));

        let subscriber = SubscriberBuilder::default()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .finish();

        tracing::subscriber::set_global_default(subscriber)
            .map_err(|error| anyhow::anyhow!("failed to set tracing subscriber: {error}"))
    }
}

#[derive(Clone)]
pub struct AppServices {
    pub store: Arc<dyn KeyValueStore>,
    pub catalog: Catalog,
    pub users: UserContext,
    pub platform: Platform,
    pub reservations: ReservationFlow,
    pub home_regular_limit: usize,
}

impl AppServices {
    pub async fn initialise(config: &AppConfig) -> Result<Self> {
        let store = open_store(&config.storage)
            .await
            .context("failed to open storage")?;

        let catalog = match &config.catalog.path {
            Some(path) => Catalog::from_path(path)
                .with_context(|| format!("failed to load catalog from {}", path.display()))?,
            None => Catalog::bundled().context("failed to load bundled catalog")?,
        };
        info!(meals = catalog.len(), "catalog ready");

        let users = UserContext::hydrate(Arc::clone(&store)).await;
        let platform = Platform::new(config.platform.kind);
        let reservations =
            ReservationFlow::new(users.clone(), platform.haptics(), &config.reservation);

        Ok(Self {
            store,
            catalog,
            users,
            platform,
            reservations,
            home_regular_limit: config.home.regular_limit,
        })
    }

    /// Let pending saves land before the process exits.
    pub async fn shutdown(&self) {
        self.users.flush().await;
        let failed = self.users.failed_saves();
        if failed > 0 {
            tracing::warn!(failed, "some changes could not be saved");
        }
        info!("services stopped");
    }
}

pub async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(?error, "failed to listen for shutdown signal");
    }
    info!("shutdown signal received");
}
