use crate::api::{ApiResult, StockApi};
use crate::domain::filters::StockFilterParams;
use crate::domain::pagination::{Page, PageRequest};
use crate::domain::stock::StockWithAnalysis;
use crate::state::list::{ListSource, ListStore, StoreOptions};
use std::sync::{Arc, PoisonError, RwLock};

/// Backend access for the stock list. Carries the current server-side filter
/// params so page navigation and refresh replay them automatically.
pub struct StockSource {
    api: Arc<dyn StockApi>,
    filters: RwLock<StockFilterParams>,
}

#[async_trait::async_trait]
impl ListSource for StockSource {
    type Item = StockWithAnalysis;

    async fn fetch_all(&self) -> ApiResult<Vec<StockWithAnalysis>> {
        self.api.all_stocks().await
    }

    async fn fetch_page(&self, req: PageRequest) -> ApiResult<Page<StockWithAnalysis>> {
        let filters = self
            .filters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        self.api.stocks_page(req, filters).await
    }

    fn fallback_error(&self, paginated: bool) -> &'static str {
        if paginated {
            "Failed to fetch paginated stocks"
        } else {
            "Failed to fetch stocks"
        }
    }
}

pub type StockStore = ListStore<StockSource>;

impl StockStore {
    pub fn for_stocks(api: Arc<dyn StockApi>, options: StoreOptions) -> Arc<Self> {
        let source = StockSource {
            api,
            filters: RwLock::new(StockFilterParams::default()),
        };
        ListStore::new(source, options.page_size).into_shared(options.auto_load)
    }

    /// Set the server-side filter params used by every subsequent paginated
    /// fetch, including `go_to_page` and `refresh` replays.
    pub fn set_filter_params(&self, params: StockFilterParams) {
        *self
            .source
            .filters
            .write()
            .unwrap_or_else(PoisonError::into_inner) = params;
    }
}
