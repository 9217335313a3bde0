//! FILENAME: core/abtest-engine/src/engine.rs
//! Aggregation Engine - Filters dataset rows and sums them per variant.
//!
//! Takes a `Dataset` and the selected operator/platform sets and produces an
//! `AggregatedResult`.
//!
//! Algorithm:
//! 1. Bail out with an empty result if either selection is empty
//! 2. Order rows: keep rows whose operator AND platform are selected, sum per variant
//! 3. Daily order rows: same filter, sum per (date, variant)
//! 4. Search rows (both kinds): keep rows whose platform is selected
//! 5. Derive the average paid order value per variant
//!
//! Rows missing the grouping key (variant, or date for daily rows) are skipped.

use std::collections::BTreeSet;

use dataset::{Dataset, Variant};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::definition::VariantMap;
use crate::metrics::ratio;

// ============================================================================
// RESULT TYPES
// ============================================================================

/// Test-period totals for one variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VariantTotals {
    pub total_orders: f64,
    pub unique_users: f64,
    pub paid_orders: f64,
    pub paid_revenue: f64,
    /// `paid_revenue / paid_orders`, 0 when nothing was paid.
    pub avg_paid_order_value: f64,
}

/// Order totals for one (date, variant) combination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTotals {
    pub date: String,
    pub variant: Variant,
    pub orders: f64,
    pub unique_users: f64,
    pub paid_orders: f64,
    pub paid_revenue: f64,
}

impl DailyTotals {
    fn new(date: &str, variant: Variant) -> Self {
        DailyTotals {
            date: date.to_string(),
            variant,
            orders: 0.0,
            unique_users: 0.0,
            paid_orders: 0.0,
            paid_revenue: 0.0,
        }
    }
}

/// Search users for one (date, variant) combination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySearchTotals {
    pub date: String,
    pub variant: Variant,
    pub unique_users_search: f64,
}

/// Output of one aggregation pass.
///
/// Daily sequences hold only the combinations present in the filtered rows,
/// in order of first appearance. Consumers align them to `dates`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregatedResult {
    pub totals: VariantMap<VariantTotals>,
    pub daily: Vec<DailyTotals>,
    pub search_users: VariantMap<f64>,
    pub daily_search_users: Vec<DailySearchTotals>,
    pub dates: Vec<Option<String>>,
}

impl AggregatedResult {
    fn empty(dates: &[Option<String>]) -> Self {
        AggregatedResult {
            dates: dates.to_vec(),
            ..Default::default()
        }
    }

    /// True when at least one order row matched the selection.
    /// Rows whose variant is not "a" or "b" do not count.
    pub fn has_data(&self) -> bool {
        !self.totals.is_empty()
    }
}

// ============================================================================
// AGGREGATOR
// ============================================================================

/// A single aggregation pass over a borrowed dataset.
struct Aggregator<'a> {
    dataset: &'a Dataset,
    operators: &'a BTreeSet<String>,
    platforms: &'a BTreeSet<String>,
}

impl<'a> Aggregator<'a> {
    fn new(
        dataset: &'a Dataset,
        operators: &'a BTreeSet<String>,
        platforms: &'a BTreeSet<String>,
    ) -> Self {
        Aggregator {
            dataset,
            operators,
            platforms,
        }
    }

    /// Executes every step and assembles the result.
    fn run(&self) -> AggregatedResult {
        let mut totals = self.aggregate_orders();
        finalize_averages(&mut totals);

        AggregatedResult {
            totals,
            daily: self.aggregate_daily_orders(),
            search_users: self.aggregate_search_users(),
            daily_search_users: self.aggregate_daily_search_users(),
            dates: self.dataset.dates.clone(),
        }
    }

    fn platform_selected(&self, platform: Option<&str>) -> bool {
        platform.is_some_and(|p| self.platforms.contains(p))
    }

    fn order_row_selected(&self, operator: Option<&str>, platform: Option<&str>) -> bool {
        operator.is_some_and(|op| self.operators.contains(op)) && self.platform_selected(platform)
    }

    fn aggregate_orders(&self) -> VariantMap<VariantTotals> {
        let mut totals = VariantMap::new();

        for row in &self.dataset.order_rows {
            if !self.order_row_selected(row.tour_operator.as_deref(), row.platform.as_deref()) {
                continue;
            }
            let Some(variant) = row.variant else {
                continue;
            };

            let acc = totals.get_or_insert_with(variant, VariantTotals::default);
            acc.total_orders += row.total_orders;
            acc.unique_users += row.unique_users;
            acc.paid_orders += row.paid_orders;
            acc.paid_revenue += row.paid_revenue;
        }

        totals
    }

    fn aggregate_daily_orders(&self) -> Vec<DailyTotals> {
        let dataset = self.dataset;
        let mut index: FxHashMap<(&str, Variant), usize> = FxHashMap::default();
        let mut daily: Vec<DailyTotals> = Vec::new();

        for row in &dataset.daily_order_rows {
            if !self.order_row_selected(row.tour_operator.as_deref(), row.platform.as_deref()) {
                continue;
            }
            let (Some(date), Some(variant)) = (row.date.as_deref(), row.variant) else {
                continue;
            };

            let slot = *index.entry((date, variant)).or_insert_with(|| {
                daily.push(DailyTotals::new(date, variant));
                daily.len() - 1
            });

            let acc = &mut daily[slot];
            acc.orders += row.orders;
            acc.unique_users += row.unique_users;
            acc.paid_orders += row.paid_orders;
            acc.paid_revenue += row.paid_revenue;
        }

        daily
    }

    fn aggregate_search_users(&self) -> VariantMap<f64> {
        let mut totals = VariantMap::new();

        for row in &self.dataset.search_user_rows {
            if !self.platform_selected(row.platform.as_deref()) {
                continue;
            }
            if let Some(variant) = row.variant {
                *totals.get_or_insert_with(variant, || 0.0) += row.unique_users_search;
            }
        }

        totals
    }

    fn aggregate_daily_search_users(&self) -> Vec<DailySearchTotals> {
        let dataset = self.dataset;
        let mut index: FxHashMap<(&str, Variant), usize> = FxHashMap::default();
        let mut daily: Vec<DailySearchTotals> = Vec::new();

        for row in &dataset.daily_search_user_rows {
            if !self.platform_selected(row.platform.as_deref()) {
                continue;
            }
            let (Some(date), Some(variant)) = (row.date.as_deref(), row.variant) else {
                continue;
            };

            let slot = *index.entry((date, variant)).or_insert_with(|| {
                daily.push(DailySearchTotals {
                    date: date.to_string(),
                    variant,
                    unique_users_search: 0.0,
                });
                daily.len() - 1
            });

            daily[slot].unique_users_search += row.unique_users_search;
        }

        daily
    }
}

fn finalize_averages(totals: &mut VariantMap<VariantTotals>) {
    for acc in [totals.a.as_mut(), totals.b.as_mut()].into_iter().flatten() {
        acc.avg_paid_order_value = ratio(acc.paid_revenue, acc.paid_orders);
    }
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Aggregates the dataset for the given selection.
///
/// An empty operator or platform set yields an empty result (no variants, no
/// daily rows). That is the defined outcome of "nothing selected", not an error.
pub fn aggregate(
    dataset: &Dataset,
    operators: &BTreeSet<String>,
    platforms: &BTreeSet<String>,
) -> AggregatedResult {
    if operators.is_empty() || platforms.is_empty() {
        log::debug!(
            "aggregate: empty selection (operators={} platforms={})",
            operators.len(),
            platforms.len()
        );
        return AggregatedResult::empty(&dataset.dates);
    }

    let result = Aggregator::new(dataset, operators, platforms).run();

    log::debug!(
        "aggregate: variants={} daily={} daily_search={}",
        result.totals.len(),
        result.daily.len(),
        result.daily_search_users.len()
    );

    result
}
