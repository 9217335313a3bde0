//! FILENAME: core/abtest-engine/src/definition.rs
//! Dashboard Definition - The serializable inputs of a metrics pass.
//!
//! This module contains the types that DESCRIBE a computation:
//! - which operators and platforms are selected
//! - which business constants apply (target threshold, discount rate)
//! - how values are labelled for display
//!
//! None of them hold data; the dataset is passed separately.

use std::collections::BTreeSet;

use dataset::Variant;
use serde::{Deserialize, Serialize};

use crate::filters::FilterOptions;

// ============================================================================
// FILTER SELECTION
// ============================================================================

/// The operator and platform values currently selected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    pub operators: BTreeSet<String>,
    pub platforms: BTreeSet<String>,
}

impl FilterSelection {
    pub fn new<O, P>(operators: O, platforms: P) -> Self
    where
        O: IntoIterator,
        O::Item: Into<String>,
        P: IntoIterator,
        P::Item: Into<String>,
    {
        FilterSelection {
            operators: operators.into_iter().map(Into::into).collect(),
            platforms: platforms.into_iter().map(Into::into).collect(),
        }
    }

    /// Selects every value the dataset offers.
    pub fn all(options: &FilterOptions) -> Self {
        FilterSelection::new(options.operators.iter().cloned(), options.platforms.iter().cloned())
    }

    /// Replaces an empty dimension with every available value.
    /// An empty checkbox group means "no restriction" to the user.
    pub fn or_all(mut self, options: &FilterOptions) -> Self {
        if self.operators.is_empty() {
            self.operators = options.operators.iter().cloned().collect();
        }
        if self.platforms.is_empty() {
            self.platforms = options.platforms.iter().cloned().collect();
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.operators.is_empty() || self.platforms.is_empty()
    }
}

// ============================================================================
// BUSINESS POLICY
// ============================================================================

/// RPV lift (percent) at or above which the test target counts as achieved.
pub const DEFAULT_TARGET_RPV_LIFT_PCT: f64 = 5.0;

/// Share of variant B paid revenue given away as discount.
pub const DEFAULT_DISCOUNT_LOSS_RATE: f64 = 0.01015;

/// Business constants applied on top of the aggregated numbers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsPolicy {
    pub target_rpv_lift_pct: f64,
    pub discount_loss_rate: f64,
}

impl Default for MetricsPolicy {
    fn default() -> Self {
        MetricsPolicy {
            target_rpv_lift_pct: DEFAULT_TARGET_RPV_LIFT_PCT,
            discount_loss_rate: DEFAULT_DISCOUNT_LOSS_RATE,
        }
    }
}

// ============================================================================
// DISPLAY OPTIONS
// ============================================================================

/// Labels and units used by the `view` layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayOptions {
    /// Appended to RPV and AOV values.
    pub currency_symbol: String,
    pub variant_a_label: String,
    pub variant_b_label: String,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        DisplayOptions {
            currency_symbol: "₽".to_string(),
            variant_a_label: "A (control)".to_string(),
            variant_b_label: "B (discount)".to_string(),
        }
    }
}

impl DisplayOptions {
    pub fn label(&self, variant: Variant) -> &str {
        match variant {
            Variant::A => &self.variant_a_label,
            Variant::B => &self.variant_b_label,
        }
    }
}

// ============================================================================
// VARIANT MAP
// ============================================================================

/// A mapping keyed by the two known variants.
/// A slot is `None` until something is recorded for that variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantMap<T> {
    pub a: Option<T>,
    pub b: Option<T>,
}

impl<T> Default for VariantMap<T> {
    fn default() -> Self {
        VariantMap { a: None, b: None }
    }
}

impl<T> VariantMap<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, variant: Variant) -> Option<&T> {
        match variant {
            Variant::A => self.a.as_ref(),
            Variant::B => self.b.as_ref(),
        }
    }

    pub fn get_or_insert_with<F: FnOnce() -> T>(&mut self, variant: Variant, f: F) -> &mut T {
        match variant {
            Variant::A => self.a.get_or_insert_with(f),
            Variant::B => self.b.get_or_insert_with(f),
        }
    }

    /// Number of variants with a recorded value.
    pub fn len(&self) -> usize {
        self.a.is_some() as usize + self.b.is_some() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (Variant, &T)> {
        Variant::ALL
            .into_iter()
            .filter_map(move |variant| self.get(variant).map(|value| (variant, value)))
    }
}

impl<T: Copy + Default> VariantMap<T> {
    /// The value for `variant`, or the all-zero default when it is missing.
    pub fn get_or_default(&self, variant: Variant) -> T {
        self.get(variant).copied().unwrap_or_default()
    }
}
