use crate::api::{ApiResult, StockApi};
use crate::domain::stock::StockWithAnalysis;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

const FALLBACK_FETCH: &str = "Failed to fetch stock";
const FALLBACK_SEARCH: &str = "Failed to search stock";
const FALLBACK_REFRESH: &str = "Failed to refresh stock data";

#[derive(Debug)]
struct DetailState {
    stock: Option<StockWithAnalysis>,
    loading: bool,
    error: Option<String>,
}

/// Single-stock state keyed by symbol. An empty symbol turns every operation
/// into a silent no-op.
pub struct StockDetailStore {
    api: Arc<dyn StockApi>,
    symbol: String,
    seq: AtomicU64,
    state: RwLock<DetailState>,
}

impl StockDetailStore {
    pub fn new(api: Arc<dyn StockApi>, symbol: &str) -> Self {
        Self {
            api,
            symbol: symbol.to_string(),
            seq: AtomicU64::new(0),
            state: RwLock::new(DetailState {
                stock: None,
                loading: false,
                error: None,
            }),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    fn read(&self) -> RwLockReadGuard<'_, DetailState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, DetailState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin(&self) -> u64 {
        let seq = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        let mut state = self.write();
        state.loading = true;
        state.error = None;
        seq
    }

    fn apply(&self, seq: u64, result: ApiResult<StockWithAnalysis>, fallback: &str) {
        if seq != self.seq.load(Ordering::SeqCst) {
            return;
        }
        let mut state = self.write();
        match result {
            Ok(stock) => state.stock = Some(stock),
            Err(err) => {
                tracing::warn!(symbol = %self.symbol, error = %err, "stock lookup failed");
                state.error = Some(err.message_or(fallback));
            }
        }
        state.loading = false;
    }

    /// Exact lookup by symbol.
    pub async fn fetch(&self) {
        if self.symbol.is_empty() {
            return;
        }
        let seq = self.begin();
        let result = self.api.stock_by_symbol(&self.symbol).await;
        self.apply(seq, result, FALLBACK_FETCH);
    }

    /// Alternate lookup endpoint; resolution rules live on the server.
    pub async fn search(&self) {
        if self.symbol.is_empty() {
            return;
        }
        let seq = self.begin();
        let result = self.api.search_stock(&self.symbol).await;
        self.apply(seq, result, FALLBACK_SEARCH);
    }

    /// Trigger a server-side refresh for the symbol, then reload the stock.
    /// If the refresh action fails the reload is skipped and the previously
    /// loaded stock stays in place.
    pub async fn refresh(&self) {
        if self.symbol.is_empty() {
            return;
        }
        let seq = self.begin();
        match self.api.refresh_stock(&self.symbol).await {
            Ok(_) => {
                // fetch() takes its own sequence number and owns the loading
                // flag from here on.
                self.fetch().await;
            }
            Err(err) => {
                if seq != self.seq.load(Ordering::SeqCst) {
                    return;
                }
                tracing::warn!(symbol = %self.symbol, error = %err, "stock refresh failed");
                let mut state = self.write();
                state.error = Some(err.message_or(FALLBACK_REFRESH));
                state.loading = false;
            }
        }
    }

    pub fn stock(&self) -> Option<StockWithAnalysis> {
        self.read().stock.clone()
    }

    pub fn loading(&self) -> bool {
        self.read().loading
    }

    pub fn error(&self) -> Option<String> {
        self.read().error.clone()
    }
}
