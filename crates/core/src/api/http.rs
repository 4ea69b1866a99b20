use crate::api::{ApiError, ApiResult, StockApi};
use crate::config::Settings;
use crate::domain::analytics::MarketOverview;
use crate::domain::filters::{FilterCatalog, StockFilterParams};
use crate::domain::pagination::{Page, PageRequest};
use crate::domain::stock::{StockRecommendation, StockWithAnalysis};
use crate::domain::system::{HealthStatus, RefreshOutcome, SyncOutcome};
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

const API_PREFIX: &str = "/api/v1";

/// Production [`StockApi`] over HTTP. Every endpoint speaks the same JSON
/// envelope `{success, data, error}`.
#[derive(Debug, Clone)]
pub struct HttpStockApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpStockApi {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let base_url = settings.require_api_base_url()?.to_string();

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.api_timeout_secs))
            .build()
            .context("failed to build stock api http client")?;

        Ok(Self { http, base_url })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{API_PREFIX}{path}", self.base_url.trim_end_matches('/'))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> ApiResult<T> {
        let req = self.http.get(self.url(path)).query(query);
        self.execute(path, req).await
    }

    async fn post<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let req = self.http.post(self.url(path));
        self.execute(path, req).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        path: &str,
        req: reqwest::RequestBuilder,
    ) -> ApiResult<T> {
        let res = req.send().await.map_err(|err| {
            ApiError::Transport(format!("request to {path} failed: {err}"))
        })?;

        let status = res.status();
        let text = res.text().await.map_err(|err| {
            ApiError::Transport(format!("failed to read response from {path}: {err}"))
        })?;

        if !status.is_success() {
            let err = ApiError::Status(status.as_u16(), format!("request to {path} failed"));
            tracing::warn!(path, http_status = %status, "stock api returned error status");
            return Err(err);
        }

        parse_envelope(&text).inspect_err(|err| {
            tracing::warn!(path, error = %err, "stock api request failed");
        })
    }
}

/// Decode the `{success, data, error}` envelope. `success:false` wins over any
/// payload; a missing or mistyped `data` on success is a decode failure.
fn parse_envelope<T: DeserializeOwned>(text: &str) -> ApiResult<T> {
    let raw: Value = serde_json::from_str(text)
        .map_err(|err| ApiError::Decode(format!("response is not valid JSON: {err}")))?;

    let success = raw
        .get("success")
        .and_then(Value::as_bool)
        .ok_or_else(|| ApiError::Decode("response envelope has no success flag".to_string()))?;

    if !success {
        let message = raw
            .get("error")
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .unwrap_or("API request failed")
            .to_string();
        return Err(ApiError::Api(message));
    }

    let data = raw
        .get("data")
        .cloned()
        .ok_or_else(|| ApiError::Decode("response envelope has no data field".to_string()))?;

    serde_json::from_value(data)
        .map_err(|err| ApiError::Decode(format!("failed to decode response payload: {err}")))
}

fn page_query(req: PageRequest) -> Vec<(&'static str, String)> {
    let mut query = Vec::new();
    if let Some(page) = req.page {
        query.push(("page", page.to_string()));
    }
    if let Some(page_size) = req.page_size {
        query.push(("page_size", page_size.to_string()));
    }
    query
}

#[async_trait::async_trait]
impl StockApi for HttpStockApi {
    async fn health(&self) -> ApiResult<HealthStatus> {
        self.get("/health", &[]).await
    }

    async fn all_stocks(&self) -> ApiResult<Vec<StockWithAnalysis>> {
        self.get("/stocks", &[]).await
    }

    async fn stocks_page(
        &self,
        req: PageRequest,
        filters: StockFilterParams,
    ) -> ApiResult<Page<StockWithAnalysis>> {
        let mut query = page_query(req);
        if let Some(action_type) = filters.action_type {
            query.push(("action_type", action_type));
        }
        if let Some(brokerage) = filters.brokerage {
            query.push(("brokerage", brokerage));
        }
        if let Some(sort_by) = filters.sort_by {
            query.push(("sort_by", sort_by));
        }
        self.get("/stocks", &query).await
    }

    async fn filter_catalog(&self) -> ApiResult<FilterCatalog> {
        self.get("/stocks/filter-options", &[]).await
    }

    async fn stock_by_symbol(&self, symbol: &str) -> ApiResult<StockWithAnalysis> {
        self.get(&format!("/stocks/{symbol}"), &[]).await
    }

    async fn search_stock(&self, symbol: &str) -> ApiResult<StockWithAnalysis> {
        self.get(&format!("/stocks/search/{symbol}"), &[]).await
    }

    async fn refresh_stock(&self, symbol: &str) -> ApiResult<RefreshOutcome> {
        self.post(&format!("/stocks/{symbol}/refresh")).await
    }

    async fn sync_all(&self) -> ApiResult<SyncOutcome> {
        self.post("/stocks/sync").await
    }

    async fn all_recommendations(&self) -> ApiResult<Vec<StockRecommendation>> {
        self.get("/stocks/recommendations", &[]).await
    }

    async fn recommendations_page(&self, req: PageRequest) -> ApiResult<Page<StockRecommendation>> {
        self.get("/stocks/recommendations", &page_query(req)).await
    }

    async fn market_overview(&self) -> ApiResult<MarketOverview> {
        self.get("/analytics/market-intelligence-overview", &[]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_successful_envelope() {
        let text = r#"{"success": true, "data": {"status": "ok", "version": "1.2.0"}}"#;
        let health: HealthStatus = parse_envelope(text).unwrap();
        assert_eq!(health.status, "ok");
        assert_eq!(health.version, "1.2.0");
    }

    #[test]
    fn failed_envelope_surfaces_server_message() {
        let text = r#"{"success": false, "error": "stock not found"}"#;
        let res: ApiResult<HealthStatus> = parse_envelope(text);
        match res {
            Err(ApiError::Api(msg)) => assert_eq!(msg, "stock not found"),
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn failed_envelope_without_message_uses_generic_fallback() {
        let text = r#"{"success": false}"#;
        let res: ApiResult<HealthStatus> = parse_envelope(text);
        match res {
            Err(ApiError::Api(msg)) => assert_eq!(msg, "API request failed"),
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn missing_data_on_success_is_a_decode_error() {
        let text = r#"{"success": true}"#;
        let res: ApiResult<HealthStatus> = parse_envelope(text);
        assert!(matches!(res, Err(ApiError::Decode(_))));
    }

    #[test]
    fn non_json_body_is_a_decode_error() {
        let res: ApiResult<HealthStatus> = parse_envelope("<html>gateway timeout</html>");
        assert!(matches!(res, Err(ApiError::Decode(_))));
    }

    #[test]
    fn page_query_omits_absent_fields() {
        assert!(page_query(PageRequest::default()).is_empty());

        let query = page_query(PageRequest {
            page: Some(3),
            page_size: Some(20),
        });
        assert_eq!(
            query,
            vec![("page", "3".to_string()), ("page_size", "20".to_string())]
        );
    }
}
