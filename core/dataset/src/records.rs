//! FILENAME: core/dataset/src/records.rs
//! Row types for the four dataset collections.
//!
//! Every field is optional on the wire. Decoding goes through the adapters in
//! `coerce`, so a row always decodes even when its fields are junk.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::coerce;

// ============================================================================
// VARIANT
// ============================================================================

/// One arm of the test: "a" is control, "b" is treatment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    A,
    B,
}

impl Variant {
    pub const ALL: [Variant; 2] = [Variant::A, Variant::B];

    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::A => "a",
            Variant::B => "b",
        }
    }

    /// Decodes a raw JSON value. Only the exact strings "a" and "b" are variants.
    pub fn from_value(value: &Value) -> Option<Variant> {
        match value.as_str() {
            Some("a") => Some(Variant::A),
            Some("b") => Some(Variant::B),
            _ => None,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// ROWS
// ============================================================================

/// Test-period totals for one (operator, platform, variant) slice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    #[serde(default, deserialize_with = "coerce::category")]
    pub tour_operator: Option<String>,

    #[serde(default, deserialize_with = "coerce::category")]
    pub platform: Option<String>,

    #[serde(default, deserialize_with = "coerce::variant")]
    pub variant: Option<Variant>,

    #[serde(default, deserialize_with = "coerce::number")]
    pub total_orders: f64,

    #[serde(default, deserialize_with = "coerce::number")]
    pub unique_users: f64,

    #[serde(default, deserialize_with = "coerce::number")]
    pub paid_orders: f64,

    #[serde(default, deserialize_with = "coerce::number")]
    pub paid_revenue: f64,
}

/// Per-day order totals. `date` is already canonical.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyOrderRecord {
    #[serde(default, deserialize_with = "coerce::canonical_date")]
    pub date: Option<String>,

    #[serde(default, deserialize_with = "coerce::category")]
    pub tour_operator: Option<String>,

    #[serde(default, deserialize_with = "coerce::category")]
    pub platform: Option<String>,

    #[serde(default, deserialize_with = "coerce::variant")]
    pub variant: Option<Variant>,

    #[serde(default, deserialize_with = "coerce::number")]
    pub orders: f64,

    #[serde(default, deserialize_with = "coerce::number")]
    pub unique_users: f64,

    #[serde(default, deserialize_with = "coerce::number")]
    pub paid_orders: f64,

    #[serde(default, deserialize_with = "coerce::number")]
    pub paid_revenue: f64,
}

/// Users who reached search, per platform and variant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchUserRecord {
    #[serde(default, deserialize_with = "coerce::category")]
    pub platform: Option<String>,

    #[serde(default, deserialize_with = "coerce::variant")]
    pub variant: Option<Variant>,

    #[serde(default, deserialize_with = "coerce::number")]
    pub unique_users_search: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailySearchUserRecord {
    #[serde(default, deserialize_with = "coerce::canonical_date")]
    pub date: Option<String>,

    #[serde(default, deserialize_with = "coerce::category")]
    pub platform: Option<String>,

    #[serde(default, deserialize_with = "coerce::variant")]
    pub variant: Option<Variant>,

    #[serde(default, deserialize_with = "coerce::number")]
    pub unique_users_search: f64,
}
