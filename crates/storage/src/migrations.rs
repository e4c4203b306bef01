//! Schema versioning for persisted aggregates.
//!
//! Stored documents are wrapped in `{"version": N, "data": {...}}`. Documents
//! written before versioning existed are bare objects and count as version 0.

use serde_json::{json, Map, Value};
use tracing::debug;

use crate::errors::{StorageError, StorageResult};

/// Version written by [`seal`].
pub const CURRENT_SCHEMA_VERSION: u64 = 1;

const VERSION_FIELD: &str = "version";
const DATA_FIELD: &str = "data";

/// Wrap an aggregate document in the current envelope.
pub fn seal(data: Value) -> Value {
    json!({
        VERSION_FIELD: CURRENT_SCHEMA_VERSION,
        DATA_FIELD: data,
    })
}

/// Bring a stored document up to the current version and return its payload.
pub fn upgrade(stored: Value) -> StorageResult<Value> {
    let (mut version, mut data) = split(stored)?;

    if version > CURRENT_SCHEMA_VERSION {
        return Err(StorageError::UnsupportedVersion {
            found: version,
            supported: CURRENT_SCHEMA_VERSION,
        });
    }

    while version < CURRENT_SCHEMA_VERSION {
        data = migrate_step(version, data)?;
        version += 1;
        debug!(version, "migrated stored document");
    }

    Ok(data)
}

fn split(stored: Value) -> StorageResult<(u64, Value)> {
    let Value::Object(mut object) = stored else {
        return Err(StorageError::Malformed(
            "stored document is not a JSON object".to_string(),
        ));
    };

    if !is_envelope(&object) {
        return Ok((0, Value::Object(object)));
    }

    let version = object
        .get(VERSION_FIELD)
        .and_then(Value::as_u64)
        .ok_or_else(|| StorageError::Malformed("schema version is not an integer".to_string()))?;
    let data = object.remove(DATA_FIELD).unwrap_or(Value::Null);
    Ok((version, data))
}

fn is_envelope(object: &Map<String, Value>) -> bool {
    object.len() == 2 && object.contains_key(VERSION_FIELD) && object.contains_key(DATA_FIELD)
}

fn migrate_step(from: u64, data: Value) -> StorageResult<Value> {
    match from {
        // Version 0 documents carry the same fields, only unwrapped.
        0 => Ok(data),
        other => Err(StorageError::UnsupportedVersion {
            found: other,
            supported: CURRENT_SCHEMA_VERSION,
        }),
    }
}
