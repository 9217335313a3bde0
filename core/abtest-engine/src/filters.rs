//! FILENAME: core/abtest-engine/src/filters.rs
//! Filter values offered by a dataset.

use std::collections::BTreeSet;

use dataset::Dataset;
use serde::{Deserialize, Serialize};

/// Distinct operator and platform values, sorted ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub operators: Vec<String>,
    pub platforms: Vec<String>,
}

/// Collects the filter values from the order rows.
/// Rows with an absent operator or platform contribute nothing to that list.
pub fn derive_filter_options(dataset: &Dataset) -> FilterOptions {
    let mut operators = BTreeSet::new();
    let mut platforms = BTreeSet::new();

    for row in &dataset.order_rows {
        if let Some(op) = row.tour_operator.as_deref() {
            operators.insert(op);
        }
        if let Some(p) = row.platform.as_deref() {
            platforms.insert(p);
        }
    }

    FilterOptions {
        operators: operators.into_iter().map(str::to_string).collect(),
        platforms: platforms.into_iter().map(str::to_string).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dataset::OrderRecord;

    fn row(op: Option<&str>, platform: Option<&str>) -> OrderRecord {
        OrderRecord {
            tour_operator: op.map(str::to_string),
            platform: platform.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_distinct_sorted_values() {
        let dataset = Dataset {
            order_rows: vec![
                row(Some("Zeta"), Some("web")),
                row(Some("Alpha"), Some("ios")),
                row(Some("Zeta"), Some("android")),
                row(None, Some("web")),
                row(Some("Beta"), None),
            ],
            ..Default::default()
        };

        let options = derive_filter_options(&dataset);

        assert_eq!(options.operators, vec!["Alpha", "Beta", "Zeta"]);
        assert_eq!(options.platforms, vec!["android", "ios", "web"]);
    }

    #[test]
    fn test_sorting_is_bytewise() {
        let dataset = Dataset {
            order_rows: vec![row(Some("b"), None), row(Some("B"), None), row(Some("a"), None)],
            ..Default::default()
        };

        assert_eq!(derive_filter_options(&dataset).operators, vec!["B", "a", "b"]);
    }

    #[test]
    fn test_empty_dataset() {
        assert_eq!(derive_filter_options(&Dataset::default()), FilterOptions::default());
    }
}
