use crate::domain::filters::{FilterSelection, DEFAULT_ACTION_TYPE, DEFAULT_BROKERAGE};
use crate::filters::TickerRecord;
use chrono::{DateTime, NaiveDate};

const UPGRADE_KEYWORDS: [&str; 3] = ["buy", "raised", "upgrade"];
const DOWNGRADE_KEYWORDS: [&str; 3] = ["sell", "downgrade", "cut"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionCategory {
    Upgrade,
    Downgrade,
    Neutral,
}

/// Classify a free-text analyst action. Upgrade keywords are checked first, so
/// an action containing both sets (e.g. "cut to buy") lands on Upgrade. That
/// precedence matches what users see today and must not be reordered silently.
pub fn classify_action(action: &str) -> ActionCategory {
    let action = action.to_lowercase();
    if UPGRADE_KEYWORDS.iter().any(|kw| action.contains(kw)) {
        return ActionCategory::Upgrade;
    }
    if DOWNGRADE_KEYWORDS.iter().any(|kw| action.contains(kw)) {
        return ActionCategory::Downgrade;
    }
    ActionCategory::Neutral
}

/// Normalize a brokerage name the way the backend builds filter values:
/// lowercase, whitespace runs collapsed to a single hyphen.
pub fn normalize_brokerage(brokerage: &str) -> String {
    brokerage
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// Parse a price target like "$210.50" by stripping everything except digits,
/// dot, and minus. Unparsable values sort as 0.
pub fn parse_price_target(raw: &str) -> f64 {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    cleaned.parse::<f64>().unwrap_or(0.0)
}

/// Parse an analysis date to epoch seconds. Accepts RFC 3339 or a bare
/// `YYYY-MM-DD`; anything else sorts as epoch 0.
pub fn parse_ticker_date(raw: &str) -> i64 {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.timestamp();
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(dt) = d.and_hms_opt(0, 0, 0) {
            return dt.and_utc().timestamp();
        }
    }
    0
}

/// Apply the action-type stage then the brokerage stage, conjunctively. Each
/// stage is skipped when its selection is the "all" sentinel. An action-type
/// selection outside the known categories keeps every item, matching the
/// original dashboard behavior.
pub fn filter_tickers<T: TickerRecord + Clone>(selection: &FilterSelection, tickers: &[T]) -> Vec<T> {
    let mut filtered: Vec<T> = tickers.to_vec();

    if selection.action_type != DEFAULT_ACTION_TYPE {
        filtered.retain(|t| match selection.action_type.as_str() {
            "upgrade" => classify_action(t.action()) == ActionCategory::Upgrade,
            "downgrade" => classify_action(t.action()) == ActionCategory::Downgrade,
            "neutral" => classify_action(t.action()) == ActionCategory::Neutral,
            _ => true,
        });
    }

    if selection.brokerage != DEFAULT_BROKERAGE {
        filtered.retain(|t| normalize_brokerage(t.brokerage()) == selection.brokerage);
    }

    filtered
}

/// Reorder a copy of the input according to the sort selection. Unknown keys
/// return the copy unchanged; every branch is a stable sort, so equal keys keep
/// their input order.
pub fn sort_tickers<T: TickerRecord + Clone>(selection: &FilterSelection, tickers: &[T]) -> Vec<T> {
    let mut sorted: Vec<T> = tickers.to_vec();

    match selection.sort_by.as_str() {
        "newest" => sorted.sort_by_key(|t| std::cmp::Reverse(parse_ticker_date(t.date()))),
        "oldest" => sorted.sort_by_key(|t| parse_ticker_date(t.date())),
        "ticker-a-z" => sorted.sort_by(|a, b| {
            a.symbol()
                .to_lowercase()
                .cmp(&b.symbol().to_lowercase())
        }),
        "company-a-z" => sorted.sort_by(|a, b| {
            a.company_name()
                .to_lowercase()
                .cmp(&b.company_name().to_lowercase())
        }),
        "price-high-low" => sorted.sort_by(|a, b| {
            parse_price_target(b.price_target()).total_cmp(&parse_price_target(a.price_target()))
        }),
        "price-low-high" => sorted.sort_by(|a, b| {
            parse_price_target(a.price_target()).total_cmp(&parse_price_target(b.price_target()))
        }),
        _ => {}
    }

    sorted
}

/// Filter first, then sort. The sort stage never changes which items survive.
pub fn process_tickers<T: TickerRecord + Clone>(
    selection: &FilterSelection,
    tickers: &[T],
) -> Vec<T> {
    let filtered = filter_tickers(selection, tickers);
    sort_tickers(selection, &filtered)
}
