//! FILENAME: core/dataset/src/lib.rs
//! A/B Test Dataset
//!
//! The pre-computed export the dashboard works from: four row collections
//! plus the date axis of the test. Decoding is lenient at the field level
//! (see `coerce`) and strict at the document level: a missing collection or
//! malformed JSON is a load failure.

mod coerce;
mod date;
mod error;
mod records;

pub use coerce::{coerce_category, coerce_number};
pub use date::{normalize_date, CanonicalDate, CANONICAL_DATE_LEN};
pub use error::DatasetError;
pub use records::{
    DailyOrderRecord, DailySearchUserRecord, OrderRecord, SearchUserRecord, Variant,
};

use std::path::Path;

use serde::{Deserialize, Serialize};

// ============================================================================
// DATASET
// ============================================================================

/// The full loaded corpus. Immutable once decoded; dates are already canonical.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(rename = "df")]
    pub order_rows: Vec<OrderRecord>,

    #[serde(rename = "daily_df")]
    pub daily_order_rows: Vec<DailyOrderRecord>,

    #[serde(rename = "search_users")]
    pub search_user_rows: Vec<SearchUserRecord>,

    #[serde(rename = "daily_search_users")]
    pub daily_search_user_rows: Vec<DailySearchUserRecord>,

    /// Date axis of the test, in export order. Entries that do not normalize
    /// stay as `None` so the axis length is preserved.
    #[serde(deserialize_with = "coerce::date_axis")]
    pub dates: Vec<Option<String>>,
}

/// Row counts, for logging after a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DatasetSummary {
    pub orders: usize,
    pub daily: usize,
    pub search: usize,
    pub daily_search: usize,
    pub dates: usize,
}

impl Dataset {
    /// Decodes a dataset from a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, DatasetError> {
        let dataset: Dataset = serde_json::from_str(json)?;
        log::debug!("decoded dataset {:?}", dataset.summary());
        Ok(dataset)
    }

    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, DatasetError> {
        let dataset: Dataset = serde_json::from_slice(bytes)?;
        log::debug!("decoded dataset {:?}", dataset.summary());
        Ok(dataset)
    }

    pub fn summary(&self) -> DatasetSummary {
        DatasetSummary {
            orders: self.order_rows.len(),
            daily: self.daily_order_rows.len(),
            search: self.search_user_rows.len(),
            daily_search: self.daily_search_user_rows.len(),
            dates: self.dates.len(),
        }
    }
}

/// Reads and decodes a dataset file.
pub fn load_json_file<P: AsRef<Path>>(path: P) -> Result<Dataset, DatasetError> {
    let bytes = std::fs::read(path.as_ref())?;
    Dataset::from_json_slice(&bytes)
}
