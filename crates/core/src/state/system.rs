use crate::api::{ApiResult, StockApi};
use crate::domain::system::{HealthStatus, SyncOutcome};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

const FALLBACK_HEALTH: &str = "Health check failed";
const FALLBACK_SYNC: &str = "Failed to sync stocks";

#[derive(Debug)]
struct SystemState {
    loading: bool,
    error: Option<String>,
}

/// Health check and bulk sync. Unlike the other stores these two operations
/// also return the failure to the caller, so callers can attach their own
/// recovery or alerting on top of the stored error string.
pub struct SystemStore {
    api: Arc<dyn StockApi>,
    state: RwLock<SystemState>,
}

impl SystemStore {
    pub fn new(api: Arc<dyn StockApi>) -> Self {
        Self {
            api,
            state: RwLock::new(SystemState {
                loading: false,
                error: None,
            }),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, SystemState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, SystemState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin(&self) {
        let mut state = self.write();
        state.loading = true;
        state.error = None;
    }

    fn finish<T>(&self, result: ApiResult<T>, fallback: &str) -> ApiResult<T> {
        let mut state = self.write();
        if let Err(err) = &result {
            tracing::warn!(error = %err, "system operation failed");
            state.error = Some(err.message_or(fallback));
        }
        state.loading = false;
        result
    }

    pub async fn check_health(&self) -> ApiResult<HealthStatus> {
        self.begin();
        let result = self.api.health().await;
        self.finish(result, FALLBACK_HEALTH)
    }

    pub async fn sync_all(&self) -> ApiResult<SyncOutcome> {
        self.begin();
        let result = self.api.sync_all().await;
        self.finish(result, FALLBACK_SYNC)
    }

    pub fn loading(&self) -> bool {
        self.read().loading
    }

    pub fn error(&self) -> Option<String> {
        self.read().error.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::MockApi;
    use crate::api::ApiError;

    #[tokio::test]
    async fn health_success_returns_payload() {
        let api = Arc::new(MockApi::default());
        api.health.lock().unwrap().push_back(Ok(HealthStatus {
            status: "ok".to_string(),
            version: "1.0.0".to_string(),
        }));

        let store = SystemStore::new(api);
        let health = store.check_health().await.unwrap();

        assert_eq!(health.status, "ok");
        assert!(store.error().is_none());
        assert!(!store.loading());
    }

    #[tokio::test]
    async fn sync_failure_is_stored_and_propagated() {
        let api = Arc::new(MockApi::default());
        api.syncs
            .lock()
            .unwrap()
            .push_back(Err(ApiError::Api("sync already running".to_string())));

        let store = SystemStore::new(api);
        let result = store.sync_all().await;

        assert!(result.is_err());
        assert_eq!(store.error().as_deref(), Some("sync already running"));
        assert!(!store.loading());
    }
}
