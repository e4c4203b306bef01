use std::fmt;

use serde::{Deserialize, Serialize};

/// Logical keys the client persists under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StorageKey {
    /// The `UserPreferences` aggregate.
    Preferences,
    /// The `ImpactStats` aggregate.
    Impact,
}

impl StorageKey {
    /// Raw key string used by the underlying store.
    pub fn as_str(self) -> &'static str {
        match self {
            StorageKey::Preferences => "user-preferences",
            StorageKey::Impact => "user-impact",
        }
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
