use std::path::Path;

use anyhow::{Context, Result};
use surplus_config::{AppConfig, PlatformKind, StorageBackend};
use surplus_runtime::{AppServices, ReservationOptions};
use tempfile::TempDir;

fn build_config(data_dir: &Path) -> AppConfig {
    let mut config = AppConfig::default();
    config.storage.backend = StorageBackend::File;
    config.storage.data_dir = data_dir.to_path_buf();
    config.reservation.processing_delay_ms = 10;
    config
}

async fn initialise(config: &AppConfig) -> Result<AppServices> {
    AppServices::initialise(config)
        .await
        .context("failed to initialise app services")
}

#[tokio::test(flavor = "multi_thread")]
async fn initialise_hydrates_defaults_from_empty_directory() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = build_config(&temp_dir.path().join("state"));

    let services = initialise(&config).await?;
    assert!(!services.users.is_loading());
    assert_eq!(services.users.impact().meals_saved, 0);
    assert_eq!(services.catalog.len(), 10);
    assert_eq!(services.home_regular_limit, 6);
    assert!(temp_dir.path().join("state").is_dir());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn reservation_survives_restart() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = build_config(temp_dir.path());

    let services = initialise(&config).await?;
    let receipt = services
        .reservations
        .reserve_by_id(&services.catalog, "5", ReservationOptions { solidarity: true })
        .await?;
    assert!(receipt.donated);
    services.shutdown().await;
    drop(services);

    let services = initialise(&config).await?;
    let impact = services.users.impact();
    assert_eq!(impact.meals_saved, 1);
    assert_eq!(impact.meals_donated, 1);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn memory_backend_starts_fresh_every_time() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mut config = build_config(temp_dir.path());
    config.storage.backend = StorageBackend::Memory;
    config.platform.kind = PlatformKind::Web;

    let services = initialise(&config).await?;
    services.users.toggle_favorite_restaurant("r1")?;
    services.shutdown().await;

    let services = initialise(&config).await?;
    assert!(services.users.preferences().favorite_restaurants.is_empty());
    assert_eq!(services.platform.kind(), PlatformKind::Web);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn catalog_path_replaces_bundled_catalog() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let catalog_path = temp_dir.path().join("meals.json");
    std::fs::write(&catalog_path, "[]")?;

    let mut config = build_config(temp_dir.path());
    config.catalog.path = Some(catalog_path);

    let services = initialise(&config).await?;
    assert!(services.catalog.is_empty());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_catalog_path_reports_context() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mut config = build_config(temp_dir.path());
    config.catalog.path = Some(temp_dir.path().join("nope.json"));

    let error = match AppServices::initialise(&config).await {
        Ok(_) => panic!("expected catalog load to fail"),
        Err(error) => error,
    };
    let message = format!("{error:?}");
    assert!(
        message.contains("failed to load catalog"),
        "expected catalog context, got {message}"
    );
    Ok(())
}
