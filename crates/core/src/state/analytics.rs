use crate::api::StockApi;
use crate::domain::analytics::MarketOverview;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

const FALLBACK_ANALYTICS: &str = "Failed to fetch analytics";

#[derive(Debug)]
struct OverviewState {
    overview: Option<MarketOverview>,
    loading: bool,
    error: Option<String>,
}

/// Dashboard analytics state: one aggregate payload, fetched on demand.
pub struct OverviewStore {
    api: Arc<dyn StockApi>,
    seq: AtomicU64,
    state: RwLock<OverviewState>,
}

impl OverviewStore {
    pub fn new(api: Arc<dyn StockApi>) -> Self {
        Self {
            api,
            seq: AtomicU64::new(0),
            state: RwLock::new(OverviewState {
                overview: None,
                loading: false,
                error: None,
            }),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, OverviewState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, OverviewState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub async fn fetch(&self) {
        let seq = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut state = self.write();
            state.loading = true;
            state.error = None;
        }

        let result = self.api.market_overview().await;

        if seq != self.seq.load(Ordering::SeqCst) {
            return;
        }
        let mut state = self.write();
        match result {
            Ok(overview) => state.overview = Some(overview),
            Err(err) => {
                tracing::warn!(error = %err, "analytics fetch failed");
                state.error = Some(err.message_or(FALLBACK_ANALYTICS));
            }
        }
        state.loading = false;
    }

    pub async fn refresh(&self) {
        self.fetch().await;
    }

    pub fn overview(&self) -> Option<MarketOverview> {
        self.read().overview.clone()
    }

    pub fn loading(&self) -> bool {
        self.read().loading
    }

    pub fn error(&self) -> Option<String> {
        self.read().error.clone()
    }
}
