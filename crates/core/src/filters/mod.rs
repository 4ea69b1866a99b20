pub mod transform;

use crate::api::StockApi;
use crate::domain::filters::{
    FilterCatalog, FilterOption, FilterPatch, FilterSelection, StockFilterParams,
    DEFAULT_ACTION_TYPE, DEFAULT_ACTION_TYPE_LABEL, DEFAULT_BROKERAGE, DEFAULT_BROKERAGE_LABEL,
    DEFAULT_SORT_BY, DEFAULT_SORT_BY_LABEL,
};
use crate::domain::stock::{AnalystTicker, StockRecommendation};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

const FALLBACK_OPTIONS_ERROR: &str = "Failed to fetch filter options";

/// Anything the filter/sort transforms can operate on. The engine only ever
/// reads these six fields.
pub trait TickerRecord {
    fn action(&self) -> &str;
    fn brokerage(&self) -> &str;
    fn date(&self) -> &str;
    fn symbol(&self) -> &str;
    fn company_name(&self) -> &str;
    fn price_target(&self) -> &str;
}

impl TickerRecord for AnalystTicker {
    fn action(&self) -> &str {
        &self.action
    }
    fn brokerage(&self) -> &str {
        &self.brokerage
    }
    fn date(&self) -> &str {
        &self.date
    }
    fn symbol(&self) -> &str {
        &self.symbol
    }
    fn company_name(&self) -> &str {
        &self.company_name
    }
    fn price_target(&self) -> &str {
        &self.price_target
    }
}

#[derive(Debug)]
struct EngineState {
    selection: FilterSelection,
    action_types: Vec<FilterOption>,
    brokerages: Vec<FilterOption>,
    sort_by: Vec<FilterOption>,
    loading: bool,
    error: Option<String>,
}

impl EngineState {
    fn seeded() -> Self {
        Self {
            selection: FilterSelection::default(),
            action_types: vec![FilterOption::new(
                DEFAULT_ACTION_TYPE_LABEL,
                DEFAULT_ACTION_TYPE,
            )],
            brokerages: vec![FilterOption::new(DEFAULT_BROKERAGE_LABEL, DEFAULT_BROKERAGE)],
            sort_by: vec![FilterOption::new(DEFAULT_SORT_BY_LABEL, DEFAULT_SORT_BY)],
            loading: false,
            error: None,
        }
    }
}

/// Session-wide filter state: one instance is built at startup and shared via
/// `Arc` across every screen that filters, so the selection survives
/// navigation. All methods take `&self`; the lock is never held across await.
pub struct FilterEngine {
    api: Arc<dyn StockApi>,
    state: RwLock<EngineState>,
}

impl FilterEngine {
    pub fn new(api: Arc<dyn StockApi>) -> Self {
        Self {
            api,
            state: RwLock::new(EngineState::seeded()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, EngineState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, EngineState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// One call populates all three option lists. On failure the previously
    /// seeded or loaded lists are left untouched.
    pub async fn fetch_options(&self) {
        {
            let mut state = self.write();
            state.loading = true;
            state.error = None;
        }

        let result = self.api.filter_catalog().await;

        let mut state = self.write();
        match result {
            Ok(FilterCatalog {
                action_types,
                brokerages,
                sort_by,
            }) => {
                state.action_types = action_types;
                state.brokerages = brokerages;
                state.sort_by = sort_by;
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to fetch filter options");
                state.error = Some(err.message_or(FALLBACK_OPTIONS_ERROR));
            }
        }
        state.loading = false;
    }

    pub fn set_action_type(&self, value: &str) {
        self.write().selection.action_type = value.to_string();
    }

    pub fn set_brokerage(&self, value: &str) {
        self.write().selection.brokerage = value.to_string();
    }

    pub fn set_sort_by(&self, value: &str) {
        self.write().selection.sort_by = value.to_string();
    }

    pub fn update(&self, patch: FilterPatch) {
        self.write().selection.apply(patch);
    }

    /// Reset all three fields to their defaults in one step.
    pub fn clear(&self) {
        self.write().selection = FilterSelection::default();
    }

    pub fn reset_to_defaults(&self) {
        self.clear();
    }

    pub fn selection(&self) -> FilterSelection {
        self.read().selection.clone()
    }

    pub fn action_type_options(&self) -> Vec<FilterOption> {
        self.read().action_types.clone()
    }

    pub fn brokerage_options(&self) -> Vec<FilterOption> {
        self.read().brokerages.clone()
    }

    pub fn sort_by_options(&self) -> Vec<FilterOption> {
        self.read().sort_by.clone()
    }

    pub fn loading(&self) -> bool {
        self.read().loading
    }

    pub fn error(&self) -> Option<String> {
        self.read().error.clone()
    }

    pub fn active_count(&self) -> usize {
        self.read().selection.active_count()
    }

    pub fn has_active(&self) -> bool {
        self.active_count() > 0
    }

    pub fn action_type_label(&self) -> String {
        let state = self.read();
        option_label(
            &state.action_types,
            &state.selection.action_type,
            DEFAULT_ACTION_TYPE_LABEL,
        )
    }

    pub fn brokerage_label(&self) -> String {
        let state = self.read();
        option_label(
            &state.brokerages,
            &state.selection.brokerage,
            DEFAULT_BROKERAGE_LABEL,
        )
    }

    pub fn sort_by_label(&self) -> String {
        let state = self.read();
        option_label(&state.sort_by, &state.selection.sort_by, DEFAULT_SORT_BY_LABEL)
    }

    /// The current selection as server-side filter params, with defaults
    /// omitted. Feed this to the stock store to push filtering to the server.
    pub fn filter_params(&self) -> StockFilterParams {
        let selection = self.selection();
        StockFilterParams {
            action_type: Some(selection.action_type)
                .filter(|v| v != DEFAULT_ACTION_TYPE),
            brokerage: Some(selection.brokerage).filter(|v| v != DEFAULT_BROKERAGE),
            sort_by: Some(selection.sort_by).filter(|v| v != DEFAULT_SORT_BY),
        }
    }

    pub fn filter_tickers<T: TickerRecord + Clone>(&self, tickers: &[T]) -> Vec<T> {
        transform::filter_tickers(&self.selection(), tickers)
    }

    pub fn sort_tickers<T: TickerRecord + Clone>(&self, tickers: &[T]) -> Vec<T> {
        transform::sort_tickers(&self.selection(), tickers)
    }

    pub fn process_tickers<T: TickerRecord + Clone>(&self, tickers: &[T]) -> Vec<T> {
        transform::process_tickers(&self.selection(), tickers)
    }

    /// Convenience for recommendation screens: flatten to ticker rows (items
    /// without any analysis are skipped), then filter and sort.
    pub fn process_recommendations(&self, recs: &[StockRecommendation]) -> Vec<AnalystTicker> {
        let tickers: Vec<AnalystTicker> = recs
            .iter()
            .filter_map(AnalystTicker::from_recommendation)
            .collect();
        self.process_tickers(&tickers)
    }
}

fn option_label(options: &[FilterOption], value: &str, fallback: &str) -> String {
    options
        .iter()
        .find(|opt| opt.value == value)
        .map(|opt| opt.label.clone())
        .unwrap_or_else(|| fallback.to_string())
}
