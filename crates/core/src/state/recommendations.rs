use crate::api::{ApiResult, StockApi};
use crate::domain::pagination::{Page, PageRequest};
use crate::domain::stock::StockRecommendation;
use crate::state::list::{ListSource, ListStore, StoreOptions};
use std::sync::Arc;

pub struct RecommendationSource {
    api: Arc<dyn StockApi>,
}

#[async_trait::async_trait]
impl ListSource for RecommendationSource {
    type Item = StockRecommendation;

    async fn fetch_all(&self) -> ApiResult<Vec<StockRecommendation>> {
        self.api.all_recommendations().await
    }

    async fn fetch_page(&self, req: PageRequest) -> ApiResult<Page<StockRecommendation>> {
        self.api.recommendations_page(req).await
    }

    fn fallback_error(&self, paginated: bool) -> &'static str {
        if paginated {
            "Failed to fetch paginated recommendations"
        } else {
            "Failed to fetch recommendations"
        }
    }
}

pub type RecommendationStore = ListStore<RecommendationSource>;

impl RecommendationStore {
    pub fn for_recommendations(api: Arc<dyn StockApi>, options: StoreOptions) -> Arc<Self> {
        ListStore::new(RecommendationSource { api }, options.page_size)
            .into_shared(options.auto_load)
    }

    /// Currently loaded recommendations, best score first. Ties keep their
    /// server order.
    pub fn top_recommendations(&self) -> Vec<StockRecommendation> {
        let mut recs = self.items();
        recs.sort_by(|a, b| b.score.total_cmp(&a.score));
        recs
    }

    pub fn high_confidence(&self) -> Vec<StockRecommendation> {
        self.items()
            .into_iter()
            .filter(StockRecommendation::is_high_confidence)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::MockApi;
    use crate::domain::stock::StockWithAnalysis;

    fn rec(symbol: &str, score: f64, confidence: &str) -> StockRecommendation {
        StockRecommendation {
            stock: StockWithAnalysis {
                id: 1,
                symbol: symbol.to_string(),
                name: format!("{symbol} Inc."),
                created_at: String::new(),
                updated_at: String::new(),
                latest_analysis: None,
            },
            score,
            reason: "momentum".to_string(),
            confidence: confidence.to_string(),
        }
    }

    #[tokio::test]
    async fn top_recommendations_sort_by_score_descending() {
        let api = Arc::new(MockApi::default());
        api.all_recommendations.lock().unwrap().push_back(Ok(vec![
            rec("AAPL", 6.1, "medium"),
            rec("NVDA", 9.3, "HIGH"),
            rec("TSLA", 7.8, "low"),
        ]));

        let store = RecommendationStore::for_recommendations(api, StoreOptions::default());
        store.fetch_all().await;

        let top: Vec<String> = store
            .top_recommendations()
            .into_iter()
            .map(|r| r.stock.symbol)
            .collect();
        assert_eq!(top, vec!["NVDA", "TSLA", "AAPL"]);

        // items() keeps the server order.
        assert_eq!(store.items()[0].stock.symbol, "AAPL");
    }

    #[tokio::test]
    async fn high_confidence_matches_case_insensitively() {
        let api = Arc::new(MockApi::default());
        api.all_recommendations.lock().unwrap().push_back(Ok(vec![
            rec("AAPL", 6.1, "High"),
            rec("NVDA", 9.3, "low"),
        ]));

        let store = RecommendationStore::for_recommendations(api, StoreOptions::default());
        store.fetch_all().await;

        let high = store.high_confidence();
        assert_eq!(high.len(), 1);
        assert_eq!(high[0].stock.symbol, "AAPL");
    }
}
