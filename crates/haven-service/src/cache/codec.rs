//! JSON codec for cached values.

use haven_core::{HavenError, HavenResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

/// Encodes a value for storage.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> HavenResult<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| HavenError::Cache(format!("Failed to encode cache value: {e}")))
}

/// Decodes stored bytes. Undecodable bytes are logged and read as absent.
#[must_use]
pub fn decode<T: DeserializeOwned>(key: &str, bytes: &[u8]) -> Option<T> {
    match serde_json::from_slice(bytes) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key, error = %e, "Discarding undecodable cache entry");
            None
        }
    }
}
