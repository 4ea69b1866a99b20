use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
}

/// Acknowledgement returned by the bulk-sync action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncOutcome {
    pub message: String,
}

/// Acknowledgement returned by the per-symbol refresh action. The refreshed
/// stock itself is not included; callers re-fetch it separately.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshOutcome {
    pub message: String,
    pub symbol: String,
}
