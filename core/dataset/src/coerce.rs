//! FILENAME: core/dataset/src/coerce.rs
//! Lenient field decoding for dataset rows.
//!
//! Nothing in a row is allowed to fail decoding. Numbers fall back to 0,
//! categories and variants to "absent", dates to `None`.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::date::CanonicalDate;
use crate::records::Variant;

/// Coerces a JSON value to a finite number. Invalid or missing input is 0.
pub fn coerce_number(value: &Value) -> f64 {
    let n = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse::<f64>().unwrap_or(0.0)
            }
        }
        Value::Bool(true) => 1.0,
        _ => 0.0,
    };

    if n.is_finite() {
        n
    } else {
        0.0
    }
}

/// A categorical value is present only as a non-empty string.
pub fn coerce_category(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

// ============================================================================
// SERDE ADAPTERS
// ============================================================================

pub(crate) fn number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_number(&value))
}

pub(crate) fn category<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_category(&value))
}

pub(crate) fn variant<'de, D>(deserializer: D) -> Result<Option<Variant>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(Variant::from_value(&value))
}

pub(crate) fn canonical_date<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.canonical_date())
}

pub(crate) fn date_axis<'de, D>(deserializer: D) -> Result<Vec<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Vec::<Value>::deserialize(deserializer)?;
    Ok(values.iter().map(CanonicalDate::canonical_date).collect())
}
