//! FILENAME: core/abtest-engine/src/metrics.rs
//! Metrics Calculator - Ratios, lifts and daily series from aggregated totals.
//!
//! Division by zero is defined as 0 throughout: a ratio with a non-positive
//! denominator is 0, and a lift over a non-positive baseline is 0.

use dataset::Variant;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::definition::MetricsPolicy;
use crate::engine::{AggregatedResult, DailySearchTotals, DailyTotals, VariantTotals};

// ============================================================================
// ARITHMETIC RULES
// ============================================================================

/// `numerator / denominator`, or 0 when the denominator is not positive.
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// `numerator / denominator * 100`, or 0 when the denominator is not positive.
pub fn percentage(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator * 100.0
    } else {
        0.0
    }
}

/// Relative change of `b` over the baseline `a`, in percent.
/// Undefined (0) when the baseline is not positive, whatever `b` is.
pub fn lift(a: f64, b: f64) -> f64 {
    if a > 0.0 {
        (b - a) / a * 100.0
    } else {
        0.0
    }
}

// ============================================================================
// OUTPUT TYPES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetStatus {
    Achieved,
    NotAchieved,
}

impl TargetStatus {
    fn judge(rpv_lift: f64, policy: &MetricsPolicy) -> Self {
        if rpv_lift >= policy.target_rpv_lift_pct {
            TargetStatus::Achieved
        } else {
            TargetStatus::NotAchieved
        }
    }

    pub fn is_achieved(&self) -> bool {
        matches!(self, TargetStatus::Achieved)
    }
}

/// One value per date-axis entry for each variant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariantSeries {
    pub a: Vec<f64>,
    pub b: Vec<f64>,
}

impl VariantSeries {
    fn from_fn<F: Fn(Variant) -> Vec<f64>>(f: F) -> Self {
        VariantSeries {
            a: f(Variant::A),
            b: f(Variant::B),
        }
    }

    /// Combines two aligned series day by day.
    fn zip_with<F: Fn(f64, f64) -> f64>(&self, other: &VariantSeries, f: F) -> Self {
        let combine = |x: &[f64], y: &[f64]| -> Vec<f64> {
            x.iter().zip(y).map(|(&p, &q)| f(p, q)).collect()
        };
        VariantSeries {
            a: combine(&self.a, &other.a),
            b: combine(&self.b, &other.b),
        }
    }

    pub fn get(&self, variant: Variant) -> &[f64] {
        match variant {
            Variant::A => &self.a,
            Variant::B => &self.b,
        }
    }
}

/// Daily series aligned to the date axis. Every series has `dates.len()` entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailySeries {
    pub dates: Vec<Option<String>>,
    pub orders: VariantSeries,
    pub payments: VariantSeries,
    pub search_users: VariantSeries,
    /// Paid orders per search user, percent.
    pub conversion_rate: VariantSeries,
    /// Paid orders per order, percent.
    pub pay_through_rate: VariantSeries,
}

/// Search → orders and orders → payments step rates, percent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FunnelMetrics {
    pub orders_pct_a: f64,
    pub orders_pct_b: f64,
    pub pay_through_pct_a: f64,
    pub pay_through_pct_b: f64,
}

/// Share of search users per variant, percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrafficSplit {
    pub pct_a: f64,
    pub pct_b: f64,
}

/// Everything the presentation layer needs for one filter state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsBundle {
    pub cvr_a: f64,
    pub cvr_b: f64,
    pub cvr_lift: f64,
    pub rpv_a: f64,
    pub rpv_b: f64,
    pub rpv_lift: f64,
    pub aov_a: f64,
    pub aov_b: f64,
    pub aov_lift: f64,

    pub users_search_a: f64,
    pub users_search_b: f64,
    pub orders_a: f64,
    pub orders_b: f64,
    pub paid_a: f64,
    pub paid_b: f64,
    pub revenue_a: f64,
    pub revenue_b: f64,

    /// Total transaction value of the treatment arm.
    pub ttv_b: f64,
    pub discount_loss_b: f64,
    /// Extra revenue attributable to the AOV difference on B's paid orders.
    pub aov_uplift_earnings: f64,

    pub target: TargetStatus,
    pub funnel: FunnelMetrics,
    /// `None` when no search users matched the selection.
    pub split: Option<TrafficSplit>,
    pub daily: DailySeries,
}

// ============================================================================
// DAILY SERIES
// ============================================================================

/// Lookup of daily rows by (date, variant).
struct DailyIndex<'a, T> {
    rows: FxHashMap<(&'a str, Variant), &'a T>,
}

impl<'a, T> DailyIndex<'a, T> {
    fn build<I, K>(rows: I, key: K) -> Self
    where
        I: IntoIterator<Item = &'a T>,
        K: Fn(&'a T) -> (&'a str, Variant),
    {
        DailyIndex {
            rows: rows.into_iter().map(|row| (key(row), row)).collect(),
        }
    }

    /// One value per axis entry; dates without a row (or without a date) yield 0.
    fn series<V: Fn(&T) -> f64>(&self, dates: &[Option<String>], variant: Variant, value: V) -> Vec<f64> {
        dates
            .iter()
            .map(|date| {
                date.as_deref()
                    .and_then(|d| self.rows.get(&(d, variant)))
                    .map_or(0.0, |row| value(*row))
            })
            .collect()
    }
}

fn build_daily_series(aggregated: &AggregatedResult) -> DailySeries {
    let dates = &aggregated.dates;

    let orders_index: DailyIndex<'_, DailyTotals> =
        DailyIndex::build(&aggregated.daily, |r| (r.date.as_str(), r.variant));
    let search_index: DailyIndex<'_, DailySearchTotals> =
        DailyIndex::build(&aggregated.daily_search_users, |r| (r.date.as_str(), r.variant));

    let orders = VariantSeries::from_fn(|v| orders_index.series(dates, v, |r| r.orders));
    let payments = VariantSeries::from_fn(|v| orders_index.series(dates, v, |r| r.paid_orders));
    let search_users = VariantSeries::from_fn(|v| search_index.series(dates, v, |r| r.unique_users_search));

    let conversion_rate = payments.zip_with(&search_users, percentage);
    let pay_through_rate = payments.zip_with(&orders, percentage);

    DailySeries {
        dates: dates.clone(),
        orders,
        payments,
        search_users,
        conversion_rate,
        pay_through_rate,
    }
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Derives the full metrics bundle from one aggregation pass.
/// A variant missing from the aggregation counts as all-zero totals.
pub fn compute_metrics(aggregated: &AggregatedResult, policy: &MetricsPolicy) -> MetricsBundle {
    let a: VariantTotals = aggregated.totals.get_or_default(Variant::A);
    let b: VariantTotals = aggregated.totals.get_or_default(Variant::B);
    let users_search_a = aggregated.search_users.get_or_default(Variant::A);
    let users_search_b = aggregated.search_users.get_or_default(Variant::B);

    let cvr_a = percentage(a.paid_orders, users_search_a);
    let cvr_b = percentage(b.paid_orders, users_search_b);
    let rpv_a = ratio(a.paid_revenue, users_search_a);
    let rpv_b = ratio(b.paid_revenue, users_search_b);
    let aov_a = ratio(a.paid_revenue, a.paid_orders);
    let aov_b = ratio(b.paid_revenue, b.paid_orders);
    let rpv_lift = lift(rpv_a, rpv_b);

    let funnel = FunnelMetrics {
        orders_pct_a: percentage(a.total_orders, users_search_a),
        orders_pct_b: percentage(b.total_orders, users_search_b),
        pay_through_pct_a: percentage(a.paid_orders, a.total_orders),
        pay_through_pct_b: percentage(b.paid_orders, b.total_orders),
    };

    let total_search = users_search_a + users_search_b;
    let split = (total_search > 0.0).then(|| TrafficSplit {
        pct_a: percentage(users_search_a, total_search),
        pct_b: percentage(users_search_b, total_search),
    });

    MetricsBundle {
        cvr_a,
        cvr_b,
        cvr_lift: lift(cvr_a, cvr_b),
        rpv_a,
        rpv_b,
        rpv_lift,
        aov_a,
        aov_b,
        aov_lift: lift(aov_a, aov_b),
        users_search_a,
        users_search_b,
        orders_a: a.total_orders,
        orders_b: b.total_orders,
        paid_a: a.paid_orders,
        paid_b: b.paid_orders,
        revenue_a: a.paid_revenue,
        revenue_b: b.paid_revenue,
        ttv_b: b.paid_revenue,
        discount_loss_b: b.paid_revenue * policy.discount_loss_rate,
        aov_uplift_earnings: (aov_b - aov_a) * b.paid_orders,
        target: TargetStatus::judge(rpv_lift, policy),
        funnel,
        split,
        daily: build_daily_series(aggregated),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::VariantMap;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    fn totals(total: f64, paid: f64, revenue: f64) -> VariantTotals {
        VariantTotals {
            total_orders: total,
            unique_users: total,
            paid_orders: paid,
            paid_revenue: revenue,
            avg_paid_order_value: ratio(revenue, paid),
        }
    }

    fn scenario() -> AggregatedResult {
        AggregatedResult {
            totals: VariantMap {
                a: Some(totals(10.0, 4.0, 4000.0)),
                b: Some(totals(12.0, 6.0, 7200.0)),
            },
            daily: vec![
                DailyTotals {
                    date: "2024-05-02".to_string(),
                    variant: Variant::B,
                    orders: 5.0,
                    unique_users: 5.0,
                    paid_orders: 2.0,
                    paid_revenue: 2400.0,
                },
                DailyTotals {
                    date: "2024-05-01".to_string(),
                    variant: Variant::A,
                    orders: 4.0,
                    unique_users: 4.0,
                    paid_orders: 1.0,
                    paid_revenue: 1000.0,
                },
            ],
            search_users: VariantMap { a: Some(100.0), b: Some(100.0) },
            daily_search_users: vec![DailySearchTotals {
                date: "2024-05-01".to_string(),
                variant: Variant::A,
                unique_users_search: 20.0,
            }],
            dates: vec![
                Some("2024-05-01".to_string()),
                Some("2024-05-02".to_string()),
                Some("2024-05-03".to_string()),
            ],
        }
    }

    #[test]
    fn test_zero_division_rules() {
        assert_eq!(ratio(5.0, 0.0), 0.0);
        assert_eq!(percentage(5.0, 0.0), 0.0);
        assert_eq!(lift(0.0, 12.0), 0.0);
        assert_close(lift(40.0, 72.0), 80.0);
        assert_close(lift(10.0, 9.0), -10.0);
    }

    #[test]
    fn test_headline_metrics() {
        let m = compute_metrics(&scenario(), &MetricsPolicy::default());

        assert_close(m.cvr_a, 4.0);
        assert_close(m.cvr_b, 6.0);
        assert_close(m.cvr_lift, 50.0);
        assert_close(m.aov_a, 1000.0);
        assert_close(m.aov_b, 1200.0);
        assert_close(m.aov_lift, 20.0);
        assert_close(m.rpv_a, 40.0);
        assert_close(m.rpv_b, 72.0);
        assert_close(m.rpv_lift, 80.0);
        assert_eq!(m.target, TargetStatus::Achieved);
    }

    #[test]
    fn test_policy_derived_amounts() {
        let m = compute_metrics(&scenario(), &MetricsPolicy::default());

        assert_eq!(m.ttv_b, 7200.0);
        assert_close(m.discount_loss_b, 7200.0 * 0.01015);
        assert_close(m.aov_uplift_earnings, 200.0 * 6.0);
    }

    #[test]
    fn test_target_threshold_is_inclusive_and_configurable() {
        let mut aggregated = scenario();
        aggregated.totals.b = Some(totals(12.0, 6.0, 4200.0));

        let m = compute_metrics(&aggregated, &MetricsPolicy::default());
        assert_close(m.rpv_lift, 5.0);
        assert!(m.target.is_achieved());

        let strict = MetricsPolicy { target_rpv_lift_pct: 5.5, ..Default::default() };
        assert_eq!(compute_metrics(&aggregated, &strict).target, TargetStatus::NotAchieved);
    }

    #[test]
    fn test_missing_variant_is_all_zero() {
        let mut aggregated = scenario();
        aggregated.totals.a = None;
        aggregated.search_users.a = None;

        let m = compute_metrics(&aggregated, &MetricsPolicy::default());

        assert_eq!(m.cvr_a, 0.0);
        assert_eq!(m.aov_a, 0.0);
        assert_eq!(m.cvr_lift, 0.0);
        assert_eq!(m.rpv_lift, 0.0);
        assert_eq!(m.target, TargetStatus::NotAchieved);
    }

    #[test]
    fn test_daily_series_are_aligned_to_axis() {
        let m = compute_metrics(&scenario(), &MetricsPolicy::default());
        let daily = &m.daily;

        for series in [&daily.orders, &daily.payments, &daily.search_users, &daily.conversion_rate, &daily.pay_through_rate] {
            assert_eq!(series.a.len(), 3);
            assert_eq!(series.b.len(), 3);
        }

        assert_eq!(daily.orders.a, vec![4.0, 0.0, 0.0]);
        assert_eq!(daily.orders.b, vec![0.0, 5.0, 0.0]);
        assert_eq!(daily.search_users.a, vec![20.0, 0.0, 0.0]);
        assert_close(daily.conversion_rate.a[0], 5.0);
        // no search users recorded for B on that day
        assert_eq!(daily.conversion_rate.b[1], 0.0);
        assert_close(daily.pay_through_rate.b[1], 40.0);
        assert_eq!(daily.pay_through_rate.a[1], 0.0);
    }

    #[test]
    fn test_null_axis_entries_yield_zero() {
        let mut aggregated = scenario();
        aggregated.dates = vec![None, Some("2024-05-01".to_string())];

        let m = compute_metrics(&aggregated, &MetricsPolicy::default());
        assert_eq!(m.daily.orders.a, vec![0.0, 4.0]);
    }

    #[test]
    fn test_funnel_and_split() {
        let m = compute_metrics(&scenario(), &MetricsPolicy::default());

        assert_close(m.funnel.orders_pct_a, 10.0);
        assert_close(m.funnel.orders_pct_b, 12.0);
        assert_close(m.funnel.pay_through_pct_a, 40.0);
        assert_close(m.funnel.pay_through_pct_b, 50.0);

        let split = m.split.unwrap();
        assert_close(split.pct_a, 50.0);
        assert_close(split.pct_b, 50.0);
    }

    #[test]
    fn test_no_split_without_search_users() {
        let m = compute_metrics(&AggregatedResult::default(), &MetricsPolicy::default());
        assert!(m.split.is_none());
        assert!(m.daily.orders.a.is_empty());
    }
}
