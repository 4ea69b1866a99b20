pub mod http;

use crate::domain::analytics::MarketOverview;
use crate::domain::filters::{FilterCatalog, StockFilterParams};
use crate::domain::pagination::{Page, PageRequest};
use crate::domain::stock::{StockRecommendation, StockWithAnalysis};
use crate::domain::system::{HealthStatus, RefreshOutcome, SyncOutcome};
use std::fmt;

pub type ApiResult<T> = Result<T, ApiError>;

/// Failure raised by the Data Service. Transport problems, non-2xx statuses,
/// `success:false` envelopes, and undecodable payloads are all surfaced here so
/// the stores can reduce them to one human-readable string.
#[derive(Debug, Clone)]
pub enum ApiError {
    /// The request never produced a usable response (connect, timeout, body read).
    Transport(String),
    /// The server answered with a non-2xx status.
    Status(u16, String),
    /// The envelope arrived with `success: false`.
    Api(String),
    /// The envelope or its payload failed to deserialize.
    Decode(String),
}

impl ApiError {
    /// The message stores keep in their `error` field.
    pub fn message(&self) -> &str {
        match self {
            ApiError::Transport(m)
            | ApiError::Status(_, m)
            | ApiError::Api(m)
            | ApiError::Decode(m) => m,
        }
    }

    /// Rendered message, or the per-operation fallback when the failure
    /// carries no text of its own.
    pub fn message_or(&self, fallback: &str) -> String {
        let rendered = self.to_string();
        if rendered.trim().is_empty() {
            fallback.to_string()
        } else {
            rendered
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Transport(m) => write!(f, "{m}"),
            ApiError::Status(status, m) => write!(f, "HTTP {status}: {m}"),
            ApiError::Api(m) => write!(f, "{m}"),
            ApiError::Decode(m) => write!(f, "{m}"),
        }
    }
}

impl std::error::Error for ApiError {}

/// The remote stock API, behind a trait so the stores can be driven by a mock
/// in tests. [`http::HttpStockApi`] is the production implementation.
#[async_trait::async_trait]
pub trait StockApi: Send + Sync {
    async fn health(&self) -> ApiResult<HealthStatus>;

    async fn all_stocks(&self) -> ApiResult<Vec<StockWithAnalysis>>;

    async fn stocks_page(
        &self,
        req: PageRequest,
        filters: StockFilterParams,
    ) -> ApiResult<Page<StockWithAnalysis>>;

    async fn filter_catalog(&self) -> ApiResult<FilterCatalog>;

    async fn stock_by_symbol(&self, symbol: &str) -> ApiResult<StockWithAnalysis>;

    async fn search_stock(&self, symbol: &str) -> ApiResult<StockWithAnalysis>;

    async fn refresh_stock(&self, symbol: &str) -> ApiResult<RefreshOutcome>;

    async fn sync_all(&self) -> ApiResult<SyncOutcome>;

    async fn all_recommendations(&self) -> ApiResult<Vec<StockRecommendation>>;

    async fn recommendations_page(&self, req: PageRequest) -> ApiResult<Page<StockRecommendation>>;

    async fn market_overview(&self) -> ApiResult<MarketOverview>;
}
