use serde::{Deserialize, Serialize};

pub const DEFAULT_ACTION_TYPE: &str = "all";
pub const DEFAULT_BROKERAGE: &str = "all";
pub const DEFAULT_SORT_BY: &str = "newest";

pub const DEFAULT_ACTION_TYPE_LABEL: &str = "All actions";
pub const DEFAULT_BROKERAGE_LABEL: &str = "All brokerages";
pub const DEFAULT_SORT_BY_LABEL: &str = "Newest";

/// A selectable filter value with its display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    pub label: String,
    pub value: String,
}

impl FilterOption {
    pub fn new(label: &str, value: &str) -> Self {
        Self {
            label: label.to_string(),
            value: value.to_string(),
        }
    }
}

/// The three option lists the backend serves in one response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterCatalog {
    pub action_types: Vec<FilterOption>,
    pub brokerages: Vec<FilterOption>,
    pub sort_by: Vec<FilterOption>,
}

/// The current filter/sort choice. Every field is always present; "all" and
/// "newest" are the sentinels meaning no filtering / default order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    pub action_type: String,
    pub brokerage: String,
    pub sort_by: String,
}

impl Default for FilterSelection {
    fn default() -> Self {
        Self {
            action_type: DEFAULT_ACTION_TYPE.to_string(),
            brokerage: DEFAULT_BROKERAGE.to_string(),
            sort_by: DEFAULT_SORT_BY.to_string(),
        }
    }
}

impl FilterSelection {
    /// Number of fields currently set to something other than their default.
    pub fn active_count(&self) -> usize {
        let mut count = 0;
        if self.action_type != DEFAULT_ACTION_TYPE {
            count += 1;
        }
        if self.brokerage != DEFAULT_BROKERAGE {
            count += 1;
        }
        if self.sort_by != DEFAULT_SORT_BY {
            count += 1;
        }
        count
    }

    pub fn apply(&mut self, patch: FilterPatch) {
        if let Some(action_type) = patch.action_type {
            self.action_type = action_type;
        }
        if let Some(brokerage) = patch.brokerage {
            self.brokerage = brokerage;
        }
        if let Some(sort_by) = patch.sort_by {
            self.sort_by = sort_by;
        }
    }
}

/// Partial update of a [`FilterSelection`]. Present fields are assigned
/// one by one; absent fields are left alone.
#[derive(Debug, Clone, Default)]
pub struct FilterPatch {
    pub action_type: Option<String>,
    pub brokerage: Option<String>,
    pub sort_by: Option<String>,
}

/// Server-side filter parameters for the stock list endpoint. Fields are sent
/// only when set; defaults are omitted entirely.
#[derive(Debug, Clone, Default)]
pub struct StockFilterParams {
    pub action_type: Option<String>,
    pub brokerage: Option<String>,
    pub sort_by: Option<String>,
}
