use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stock {
    pub id: i64,
    pub symbol: String,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
}

/// One analyst action against a stock. Dates and price targets arrive as
/// free-text strings from the backend and are parsed lazily by the sort engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockAnalysis {
    pub id: i64,
    pub stock_id: i64,
    pub target_from: String,
    pub target_to: String,
    pub action: String,
    pub brokerage: String,
    pub rating_from: String,
    pub rating_to: String,
    pub analysis_date: String,
    pub created_at: String,
}

/// A stock plus its analysis history. The backend sends `latest_analysis`
/// most-recent-first; callers rely on that ordering but it is not enforced here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockWithAnalysis {
    pub id: i64,
    pub symbol: String,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub latest_analysis: Option<Vec<StockAnalysis>>,
}

impl StockWithAnalysis {
    pub fn latest(&self) -> Option<&StockAnalysis> {
        self.latest_analysis.as_deref().and_then(|a| a.first())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockRecommendation {
    pub stock: StockWithAnalysis,
    pub score: f64,
    pub reason: String,
    pub confidence: String,
}

impl StockRecommendation {
    /// Confidence is free text; "high" is matched case-insensitively.
    pub fn is_high_confidence(&self) -> bool {
        self.confidence.eq_ignore_ascii_case("high")
    }
}

/// Flat row the filter/sort engine operates on, built from a stock and its
/// most recent analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalystTicker {
    pub symbol: String,
    pub company_name: String,
    pub action: String,
    pub brokerage: String,
    pub price_target: String,
    pub date: String,
}

impl AnalystTicker {
    pub fn from_stock(stock: &StockWithAnalysis) -> Option<Self> {
        let analysis = stock.latest()?;
        Some(Self {
            symbol: stock.symbol.clone(),
            company_name: stock.name.clone(),
            action: analysis.action.clone(),
            brokerage: analysis.brokerage.clone(),
            price_target: analysis.target_to.clone(),
            date: analysis.analysis_date.clone(),
        })
    }

    pub fn from_recommendation(rec: &StockRecommendation) -> Option<Self> {
        Self::from_stock(&rec.stock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_stock_with_analysis() {
        let v = json!({
            "id": 7,
            "symbol": "AAPL",
            "name": "Apple Inc.",
            "created_at": "2026-08-01T10:00:00Z",
            "updated_at": "2026-08-20T10:00:00Z",
            "latest_analysis": [
                {
                    "id": 41,
                    "stock_id": 7,
                    "target_from": "$180",
                    "target_to": "$210",
                    "action": "Upgraded to Buy",
                    "brokerage": "Morgan Stanley",
                    "rating_from": "Hold",
                    "rating_to": "Buy",
                    "analysis_date": "2026-08-19T00:00:00Z",
                    "created_at": "2026-08-19T09:30:00Z"
                }
            ]
        });

        let stock: StockWithAnalysis = serde_json::from_value(v).unwrap();
        assert_eq!(stock.symbol, "AAPL");
        assert_eq!(stock.latest().unwrap().target_to, "$210");
    }

    #[test]
    fn latest_analysis_is_optional() {
        let v = json!({
            "id": 8,
            "symbol": "MSFT",
            "name": "Microsoft",
            "created_at": "2026-08-01T10:00:00Z",
            "updated_at": "2026-08-20T10:00:00Z"
        });

        let stock: StockWithAnalysis = serde_json::from_value(v).unwrap();
        assert!(stock.latest_analysis.is_none());
        assert!(stock.latest().is_none());
        assert!(AnalystTicker::from_stock(&stock).is_none());
    }

    #[test]
    fn high_confidence_matches_case_insensitively() {
        let v = json!({
            "stock": {
                "id": 7,
                "symbol": "AAPL",
                "name": "Apple Inc.",
                "created_at": "2026-08-01T10:00:00Z",
                "updated_at": "2026-08-20T10:00:00Z"
            },
            "score": 8.5,
            "reason": "strong upgrade momentum",
            "confidence": "High"
        });

        let rec: StockRecommendation = serde_json::from_value(v).unwrap();
        assert!(rec.is_high_confidence());
    }
}
