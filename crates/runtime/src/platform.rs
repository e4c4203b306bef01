//! Device capabilities that differ between iOS, Android and web.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use surplus_catalog::Restaurant;
use surplus_config::PlatformKind;
use tracing::{debug, info, warn};

/// Tactile feedback. Calls never block and never fail.
pub trait Haptics: Send + Sync {
    fn success(&self);
}

/// Used where the device has no vibration motor.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHaptics;

impl Haptics for NoopHaptics {
    fn success(&self) {}
}

/// Native feedback. There is no motor to drive outside a device, so the
/// pulse is recorded as a trace event.
#[derive(Debug, Default, Clone, Copy)]
pub struct DeviceHaptics;

impl Haptics for DeviceHaptics {
    fn success(&self) {
        debug!("haptic feedback: success");
    }
}

/// Where a new profile photo comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoCapability {
    Camera,
    Gallery,
}

impl fmt::Display for PhotoCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhotoCapability::Camera => f.write_str("camera"),
            PhotoCapability::Gallery => f.write_str("gallery"),
        }
    }
}

/// Supplies profile photos from the camera or the photo library.
#[async_trait]
pub trait PhotoSource: Send + Sync {
    /// Ask for access; `false` means the user refused.
    async fn request_permission(&self, capability: PhotoCapability) -> bool;

    /// Let the user pick or take a photo. `None` when they cancel.
    async fn pick(&self, capability: PhotoCapability) -> Option<String>;
}

/// Photo source backed by a file chosen up front, as on a desktop shell.
/// It has no camera.
#[derive(Debug, Clone)]
pub struct LocalFileSource {
    path: PathBuf,
}

impl LocalFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl PhotoSource for LocalFileSource {
    async fn request_permission(&self, capability: PhotoCapability) -> bool {
        match capability {
            PhotoCapability::Camera => false,
            PhotoCapability::Gallery => tokio::fs::metadata(&self.path)
                .await
                .map(|meta| meta.is_file())
                .unwrap_or(false),
        }
    }

    async fn pick(&self, _capability: PhotoCapability) -> Option<String> {
        let path = tokio::fs::canonicalize(&self.path).await.ok()?;
        Some(format!("file://{}", path.display()))
    }
}

/// Capabilities resolved once at startup.
#[derive(Clone)]
pub struct Platform {
    kind: PlatformKind,
    haptics: Arc<dyn Haptics>,
}

impl Platform {
    pub fn new(kind: PlatformKind) -> Self {
        let haptics: Arc<dyn Haptics> = match kind {
            PlatformKind::Web => Arc::new(NoopHaptics),
            PlatformKind::Ios | PlatformKind::Android => Arc::new(DeviceHaptics),
        };
        Self::with_haptics(kind, haptics)
    }

    pub fn with_haptics(kind: PlatformKind, haptics: Arc<dyn Haptics>) -> Self {
        info!(platform = ?kind, "platform resolved");
        Self { kind, haptics }
    }

    pub fn kind(&self) -> PlatformKind {
        self.kind
    }

    pub fn haptics(&self) -> Arc<dyn Haptics> {
        Arc::clone(&self.haptics)
    }

    /// The capability actually used for a request. Browsers have no camera
    /// access, so camera requests go to the gallery.
    pub fn effective_capability(&self, requested: PhotoCapability) -> PhotoCapability {
        match (self.kind, requested) {
            (PlatformKind::Web, PhotoCapability::Camera) => PhotoCapability::Gallery,
            (_, capability) => capability,
        }
    }

    /// Obtain a new profile photo reference.
    ///
    /// Returns `None` when permission is refused or the user cancels; the
    /// current photo should then be left as it is.
    pub async fn choose_photo(
        &self,
        source: &dyn PhotoSource,
        requested: PhotoCapability,
    ) -> Option<String> {
        let capability = self.effective_capability(requested);
        if !source.request_permission(capability).await {
            warn!(%capability, "photo permission denied");
            return None;
        }
        source.pick(capability).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapProvider {
    GoogleMapsApp,
    GoogleMapsWeb,
    AppleMaps,
    Waze,
}

impl MapProvider {
    pub fn label(self) -> &'static str {
        match self {
            MapProvider::GoogleMapsApp => "Google Maps (app)",
            MapProvider::GoogleMapsWeb => "Google Maps (web)",
            MapProvider::AppleMaps => "Apple Maps",
            MapProvider::Waze => "Waze",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapLink {
    pub provider: MapProvider,
    pub url: String,
}

/// Deep links for directions to `restaurant`, most preferred first.
pub fn map_links(restaurant: &Restaurant) -> Vec<MapLink> {
    let lat = restaurant.coordinates.latitude;
    let lon = restaurant.coordinates.longitude;
    let name = urlencoding::encode(&restaurant.name);

    vec![
        MapLink {
            provider: MapProvider::GoogleMapsApp,
            url: format!("comgooglemaps://?q={lat},{lon}&center={lat},{lon}&zoom=15"),
        },
        MapLink {
            provider: MapProvider::GoogleMapsWeb,
            url: format!(
                "https://www.google.com/maps/search/?api=1&query={lat},{lon}&query_place_id={name}"
            ),
        },
        MapLink {
            provider: MapProvider::AppleMaps,
            url: format!("maps://?ll={lat},{lon}&q={name}"),
        },
        MapLink {
            provider: MapProvider::Waze,
            url: format!("waze://?ll={lat},{lon}&navigate=yes"),
        },
    ]
}
