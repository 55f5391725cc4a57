//! Cache administration DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Outcome of a clear operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CacheClearResult {
    /// The pattern or scope that was cleared (`*` for a full flush)
    pub scope: String,
    /// Number of keys removed; absent for a full flush
    pub keys_removed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PingResponse {
    pub available: bool,
    pub latency_ms: u64,
}
