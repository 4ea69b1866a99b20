use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokerageShare {
    pub brokerage: String,
    pub analysis_count: i64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionTypeShare {
    pub action_type: String,
    pub count: i64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: String,
    pub count: i64,
}

/// Aggregated dashboard metrics served by the analytics endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketOverview {
    pub total_stocks: i64,
    pub total_recommendations: i64,
    pub recent_analysis: i64,
    pub upgrades: i64,
    pub downgrades: i64,
    pub high_confidence_recs: i64,
    pub selection_rate: f64,
    pub top_brokerages: Vec<BrokerageShare>,
    pub top_action_types: Vec<ActionTypeShare>,
    pub recent_activity_trend: Vec<TrendPoint>,
    pub average_recommendation_score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_overview_payload() {
        let v = json!({
            "total_stocks": 120,
            "total_recommendations": 15,
            "recent_analysis": 34,
            "upgrades": 21,
            "downgrades": 9,
            "high_confidence_recs": 5,
            "selection_rate": 12.5,
            "top_brokerages": [
                {"brokerage": "Morgan Stanley", "analysis_count": 12, "percentage": 35.3}
            ],
            "top_action_types": [
                {"action_type": "target raised by", "count": 18, "percentage": 52.9}
            ],
            "recent_activity_trend": [
                {"date": "2026-08-28", "count": 6}
            ],
            "average_recommendation_score": 7.4
        });

        let overview: MarketOverview = serde_json::from_value(v).unwrap();
        assert_eq!(overview.total_stocks, 120);
        assert_eq!(overview.top_brokerages[0].analysis_count, 12);
        assert_eq!(overview.recent_activity_trend[0].date, "2026-08-28");
    }
}
