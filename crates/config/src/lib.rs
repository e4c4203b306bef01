use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

const DEFAULT_CONFIG_FILES: &[&str] = &[
    "surplus.toml",
    "config/surplus.toml",
    "crates/config/surplus.toml",
    "../surplus.toml",
    "../config/surplus.toml",
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub reservation: ReservationConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub home: HomeConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    #[serde(default)]
    pub platform: PlatformConfig,
}

/// Where the two persisted aggregates live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// One JSON file per key under `data_dir`.
    File,
    /// Process-local map; nothing survives a restart.
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::File,
            data_dir: PathBuf::from(".surplus"),
        }
    }
}

/// Settings for the simulated reservation round trip.
///
/// ```
/// use surplus_config::ReservationConfig;
///
/// let reservation = ReservationConfig::default();
/// assert_eq!(reservation.processing_delay_ms, 1500);
/// assert_eq!(reservation.solidarity_surcharge, 2.0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationConfig {
    #[serde(default = "ReservationConfig::default_processing_delay")]
    pub processing_delay_ms: u64,
    #[serde(default = "ReservationConfig::default_solidarity_surcharge")]
    pub solidarity_surcharge: f64,
}

impl ReservationConfig {
    const fn default_processing_delay() -> u64 {
        1500
    }

    const fn default_solidarity_surcharge() -> f64 {
        2.0
    }
}

impl Default for ReservationConfig {
    fn default() -> Self {
        Self {
            processing_delay_ms: Self::default_processing_delay(),
            solidarity_surcharge: Self::default_solidarity_surcharge(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Replacement for the bundled catalog, as a JSON array of meals.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomeConfig {
    pub regular_limit: usize,
}

impl Default for HomeConfig {
    fn default() -> Self {
        Self { regular_limit: 6 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    pub level: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformKind {
    Ios,
    Android,
    Web,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformConfig {
    pub kind: PlatformKind,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            kind: PlatformKind::Android,
        }
    }
}

/// Load the application configuration by combining defaults, files, and environment overrides.
///
/// ```
/// use surplus_config::load;
///
/// std::env::remove_var("SURPLUS_CONFIG");
///
/// let config = load().expect("configuration should load with defaults");
/// assert_eq!(config.home.regular_limit, 6);
/// ```
pub fn load() -> anyhow::Result<AppConfig> {
    let defaults = AppConfig::default();

    let delay = i64::try_from(defaults.reservation.processing_delay_ms).unwrap_or(i64::MAX);
    let regular_limit = i64::try_from(defaults.home.regular_limit).unwrap_or(i64::MAX);

    let mut builder = config::Config::builder()
        .set_default("storage.backend", "file")
        .context("invalid default for storage.backend")?
        .set_default(
            "storage.data_dir",
            defaults.storage.data_dir.to_string_lossy().into_owned(),
        )
        .context("invalid default for storage.data_dir")?
        .set_default("reservation.processing_delay_ms", delay)
        .context("invalid default for reservation.processing_delay_ms")?
        .set_default(
            "reservation.solidarity_surcharge",
            defaults.reservation.solidarity_surcharge,
        )
        .context("invalid default for reservation.solidarity_surcharge")?
        .set_default("home.regular_limit", regular_limit)
        .context("invalid default for home.regular_limit")?
        .set_default("telemetry.level", defaults.telemetry.level.clone())
        .context("invalid default for telemetry.level")?
        .set_default("platform.kind", "android")
        .context("invalid default for platform.kind")?;

    let environment_overrides = config::Environment::with_prefix("SURPLUS").separator("__");

    let mut config_file_attached = false;

    if let Ok(path) = std::env::var("SURPLUS_CONFIG") {
        builder = builder.add_source(config::File::from(PathBuf::from(&path)));
        config_file_attached = true;
        debug!(path, "loading configuration via SURPLUS_CONFIG");
    } else if let Ok(cwd) = std::env::current_dir() {
        let fallback = DEFAULT_CONFIG_FILES
            .iter()
            .map(|candidate| cwd.join(candidate))
            .find(|path| path.exists());

        if let Some(path) = fallback {
            debug!(path = %path.display(), "loading configuration file");
            builder = builder.add_source(config::File::from(path));
            config_file_attached = true;
        }
    }

    if !config_file_attached {
        debug!("no configuration file found, relying on defaults and environment overrides");
    }

    builder = builder.add_source(environment_overrides);

    let cfg = builder.build().context("unable to build configuration")?;

    let mut config = cfg
        .try_deserialize::<AppConfig>()
        .context("invalid configuration")?;

    if !config.reservation.solidarity_surcharge.is_finite()
        || config.reservation.solidarity_surcharge < 0.0
    {
        anyhow::bail!(
            "invalid configuration: solidarity surcharge must be a non-negative amount, got {}",
            config.reservation.solidarity_surcharge
        );
    }

    config.telemetry.level = config.telemetry.level.trim().to_lowercase();

    debug!(?config, "loaded client configuration");
    Ok(config)
}
