//! FILENAME: tests/common/mod.rs
//! Test harness and fixtures for dashboard integration tests.

#![allow(dead_code)]

use std::io::Write;

use abtest_engine::FilterSelection;
use dashboard_lib::{create_app_state, AppConfig, AppState};
use dataset::Dataset;
use tempfile::NamedTempFile;

/// Two operators, two platforms, two days.
///
/// Operator X on web reproduces the reference scenario:
/// A = 4 paid / 4000 revenue, B = 6 paid / 7200 revenue, 100 search users each.
pub const SAMPLE_DATASET: &str = r#"{
    "df": [
        {"tour_operator": "X", "platform": "web", "variant": "a",
         "total_orders": 10, "unique_users": 8, "paid_orders": 4, "paid_revenue": 4000},
        {"tour_operator": "X", "platform": "web", "variant": "b",
         "total_orders": 12, "unique_users": 9, "paid_orders": 6, "paid_revenue": 7200},
        {"tour_operator": "Y", "platform": "ios", "variant": "a",
         "total_orders": 5, "unique_users": 5, "paid_orders": 1, "paid_revenue": 500},
        {"tour_operator": "Y", "platform": "ios", "variant": "b",
         "total_orders": 4, "unique_users": 4, "paid_orders": 2, "paid_revenue": "2400"},
        {"tour_operator": null, "platform": "web", "variant": "a",
         "total_orders": 999, "paid_orders": 999, "paid_revenue": 999}
    ],
    "daily_df": [
        {"date": "2024-05-01T10:00:00Z", "tour_operator": "X", "platform": "web", "variant": "a",
         "orders": 6, "unique_users": 6, "paid_orders": 2, "paid_revenue": 2000},
        {"date": "2024-05-01", "tour_operator": "X", "platform": "web", "variant": "b",
         "orders": 7, "unique_users": 7, "paid_orders": 3, "paid_revenue": 3600},
        {"date": "2024-05-02", "tour_operator": "X", "platform": "web", "variant": "a",
         "orders": 4, "unique_users": 4, "paid_orders": 2, "paid_revenue": 2000},
        {"date": "2024-05-02", "tour_operator": "X", "platform": "web", "variant": "b",
         "orders": 5, "unique_users": 5, "paid_orders": 3, "paid_revenue": 3600},
        {"date": "2024-05-02", "tour_operator": "Y", "platform": "ios", "variant": "a",
         "orders": 5, "unique_users": 5, "paid_orders": 1, "paid_revenue": 500}
    ],
    "search_users": [
        {"platform": "web", "variant": "a", "unique_users_search": 100},
        {"platform": "web", "variant": "b", "unique_users_search": 100},
        {"platform": "ios", "variant": "a", "unique_users_search": 50},
        {"platform": "ios", "variant": "b", "unique_users_search": 50}
    ],
    "daily_search_users": [
        {"date": "2024-05-01", "platform": "web", "variant": "a", "unique_users_search": 40},
        {"date": "2024-05-01", "platform": "web", "variant": "b", "unique_users_search": 40},
        {"date": "2024-05-02", "platform": "web", "variant": "a", "unique_users_search": 60},
        {"date": "2024-05-02", "platform": "web", "variant": "b", "unique_users_search": 60},
        {"date": "2024-05-02", "platform": "ios", "variant": "a", "unique_users_search": 50}
    ],
    "dates": ["2024-05-01", "2024-05-02T00:00:00"]
}"#;

/// Test harness wrapping a ready application state.
pub struct TestHarness {
    pub state: AppState,
}

impl TestHarness {
    /// Harness over the sample dataset with default config.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    pub fn with_config(config: AppConfig) -> Self {
        let dataset = Dataset::from_json_str(SAMPLE_DATASET).unwrap();
        TestHarness {
            state: create_app_state(config, dataset),
        }
    }

    pub fn with_dataset(json: &str) -> Self {
        let dataset = Dataset::from_json_str(json).unwrap();
        TestHarness {
            state: create_app_state(AppConfig::default(), dataset),
        }
    }

    /// Selection of the reference scenario (operator X on web).
    pub fn scenario_selection() -> FilterSelection {
        FilterSelection::new(["X"], ["web"])
    }
}

/// Writes `contents` to a temporary file that lives as long as the handle.
pub fn temp_json(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}
