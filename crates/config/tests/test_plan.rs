//! Test plan for the `surplus-config` crate.
//!
//! These tests exercise the configuration loader across default handling,
//! file discovery, environment overrides, and validation behaviour.

use std::fs;
use std::path::{Path, PathBuf};

use serial_test::serial;
use tempfile::TempDir;

use surplus_config::{
    load, AppConfig, HomeConfig, PlatformKind, ReservationConfig, StorageBackend, StorageConfig,
};

/// Runs a test inside a fresh working directory with every `SURPLUS*`
/// variable cleared; the previous environment comes back on drop.
struct Sandbox {
    dir: TempDir,
    saved_vars: Vec<(String, String)>,
    saved_cwd: PathBuf,
}

impl Sandbox {
    fn enter() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let saved_vars: Vec<_> = std::env::vars()
            .filter(|(key, _)| key.starts_with("SURPLUS"))
            .collect();
        for (key, _) in &saved_vars {
            std::env::remove_var(key);
        }
        let saved_cwd = std::env::current_dir().expect("failed to capture current directory");
        std::env::set_current_dir(dir.path()).expect("failed to enter temp dir");

        Self {
            dir,
            saved_vars,
            saved_cwd,
        }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn write(&self, relative: &str, contents: &str) {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create config directories");
        }
        fs::write(path, contents).expect("failed to write config file");
    }
}

impl Drop for Sandbox {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.saved_cwd);
        let leaked: Vec<_> = std::env::vars()
            .map(|(key, _)| key)
            .filter(|key| key.starts_with("SURPLUS"))
            .collect();
        for key in leaked {
            std::env::remove_var(key);
        }
        for (key, value) in &self.saved_vars {
            std::env::set_var(key, value);
        }
    }
}

#[test]
#[serial]
fn load_uses_default_values_when_no_files_found() {
    let _sandbox = Sandbox::enter();

    let config = load().expect("configuration load should succeed without files");
    let defaults = AppConfig::default();

    assert_eq!(config.storage.backend, defaults.storage.backend);
    assert_eq!(config.storage.data_dir, defaults.storage.data_dir);
    assert_eq!(
        config.reservation.processing_delay_ms,
        defaults.reservation.processing_delay_ms
    );
    assert_eq!(
        config.reservation.solidarity_surcharge,
        defaults.reservation.solidarity_surcharge
    );
    assert_eq!(config.home.regular_limit, defaults.home.regular_limit);
    assert_eq!(config.platform.kind, PlatformKind::Android);
    assert!(config.catalog.path.is_none());
}

#[test]
#[serial]
fn load_picks_first_available_file_in_search_order() {
    let sandbox = Sandbox::enter();

    sandbox.write(
        "surplus.toml",
        r#"
        [home]
        regular_limit = 3
        "#,
    );
    sandbox.write(
        "config/surplus.toml",
        r#"
        [home]
        regular_limit = 9
        "#,
    );

    let config = load().expect("configuration load should pick the first file");
    assert_eq!(config.home.regular_limit, 3);
}

#[test]
#[serial]
fn load_merges_partial_file_with_defaults() {
    let sandbox = Sandbox::enter();

    sandbox.write(
        "surplus.toml",
        r#"
        [storage]
        backend = "memory"

        [reservation]
        processing_delay_ms = 10
        "#,
    );

    let config = load().expect("configuration load should succeed");
    let defaults = AppConfig::default();

    assert_eq!(config.storage.backend, StorageBackend::Memory);
    assert_eq!(config.storage.data_dir, defaults.storage.data_dir);
    assert_eq!(config.reservation.processing_delay_ms, 10);
    assert_eq!(
        config.reservation.solidarity_surcharge,
        defaults.reservation.solidarity_surcharge
    );
}

#[test]
#[serial]
fn load_applies_environment_overrides() {
    let sandbox = Sandbox::enter();

    sandbox.write(
        "surplus.toml",
        r#"
        [platform]
        kind = "ios"
        "#,
    );

    std::env::set_var("SURPLUS__PLATFORM__KIND", "web");
    std::env::set_var("SURPLUS__STORAGE__DATA_DIR", "/tmp/surplus-data");

    let config = load().expect("configuration load should honour env overrides");
    assert_eq!(config.platform.kind, PlatformKind::Web);
    assert_eq!(config.storage.data_dir, PathBuf::from("/tmp/surplus-data"));
}

#[test]
#[serial]
fn load_reads_explicit_config_path() {
    let sandbox = Sandbox::enter();

    sandbox.write(
        "elsewhere/custom.toml",
        r#"
        [catalog]
        path = "meals.json"
        "#,
    );
    std::env::set_var(
        "SURPLUS_CONFIG",
        sandbox.path().join("elsewhere/custom.toml"),
    );

    let config = load().expect("configuration load should use SURPLUS_CONFIG");
    assert_eq!(config.catalog.path, Some(PathBuf::from("meals.json")));
}

#[test]
#[serial]
fn load_rejects_negative_solidarity_surcharge() {
    let sandbox = Sandbox::enter();

    sandbox.write(
        "surplus.toml",
        r#"
        [reservation]
        solidarity_surcharge = -1.5
        "#,
    );

    let error = load().expect_err("negative surcharge should be rejected");
    assert!(error.to_string().contains("solidarity surcharge"));
}

#[test]
#[serial]
fn load_errors_on_invalid_toml_contents() {
    let sandbox = Sandbox::enter();

    sandbox.write(
        "surplus.toml",
        r#"
        [home]
        regular_limit = "not-a-number
        "#,
    );

    let error = load().expect_err("invalid TOML should cause load to fail");
    let message = error.to_string();
    assert!(
        message.contains("invalid configuration") || message.contains("unable to build configuration"),
        "unexpected error message: {message}"
    );
}

#[test]
fn storage_config_defaults_to_file_backend() {
    let defaults = StorageConfig::default();
    assert_eq!(defaults.backend, StorageBackend::File);
    assert_eq!(defaults.data_dir, PathBuf::from(".surplus"));
}

#[test]
fn reservation_and_home_defaults_match_the_app() {
    assert_eq!(ReservationConfig::default().processing_delay_ms, 1500);
    assert_eq!(HomeConfig::default().regular_limit, 6);
}
