//! FILENAME: core/abtest-engine/src/view.rs
//! Dashboard View - Renderable output for the frontend.
//!
//! Converts a `MetricsBundle` into display-ready cards and chart payloads.
//! Nothing here computes metrics; it only formats and arranges them.

use dataset::Variant;
use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};

use crate::definition::DisplayOptions;
use crate::metrics::{MetricsBundle, TargetStatus, TrafficSplit, VariantSeries};

/// Separator used when grouping whole currency amounts (ru-RU style).
const GROUP_SEPARATOR_NBSP: char = '\u{a0}';

// ============================================================================
// CARD TYPES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKey {
    Cvr,
    Rpv,
    Aov,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiftDirection {
    Positive,
    Negative,
}

impl LiftDirection {
    fn of(lift: f64) -> Self {
        if lift < 0.0 {
            LiftDirection::Negative
        } else {
            LiftDirection::Positive
        }
    }
}

/// A/B value pair with its lift, as shown in one summary card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricCard {
    pub key: MetricKey,
    pub title: String,
    pub value_a: String,
    pub value_b: String,
    pub lift: String,
    pub direction: LiftDirection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetCard {
    pub status: TargetStatus,
    pub headline: String,
    pub details: String,
}

/// Widths (and labels) of the traffic split bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitBar {
    pub a: String,
    pub b: String,
}

// ============================================================================
// CHART TYPES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
    Line,
    Funnel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub name: String,
    pub variant: Variant,
    pub values: Vec<f64>,
    /// Per-point labels (funnel stages show absolute counts).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
}

/// A chart payload. Every series shares the `x` axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub id: String,
    pub kind: ChartKind,
    pub x: Vec<Option<String>>,
    pub y_title: Option<String>,
    pub tick_suffix: Option<String>,
    pub series: SmallVec<[ChartSeries; 2]>,
}

/// Everything the page renders for one filter state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub cards: Vec<MetricCard>,
    pub target: TargetCard,
    pub split: Option<SplitBar>,
    pub charts: Vec<ChartSpec>,
}

// ============================================================================
// NUMBER FORMATTING
// ============================================================================

/// Rounds half up, the way the browser's `Math.round` does.
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Adds a group separator every three integer digits.
fn add_thousands_separator(s: &str, separator: char) -> String {
    let (integer_part, decimal_part) = match s.split_once('.') {
        Some((int, dec)) => (int, Some(dec)),
        None => (s, None),
    };

    let negative = integer_part.starts_with('-');
    let digits: String = integer_part.chars().filter(|c| c.is_ascii_digit()).collect();

    let mut result = String::new();
    if negative {
        result.push('-');
    }

    let len = digits.len();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            result.push(separator);
        }
        result.push(c);
    }

    if let Some(decimal) = decimal_part {
        result.push('.');
        result.push_str(decimal);
    }

    result
}

/// Formats a percentage value (already scaled by 100).
pub fn format_percent(value: f64, decimal_places: usize) -> String {
    format!("{:.prec$}%", value, prec = decimal_places)
}

/// Signed lift text with one decimal, e.g. `+50.0%` or `-3.2%`.
pub fn format_lift(lift: f64) -> String {
    // -0.0 + 0.0 == +0.0, so a negative zero never prints as "+-0.0%"
    let lift = lift + 0.0;
    let sign = if lift >= 0.0 { "+" } else { "" };
    format!("{}{:.1}%", sign, lift)
}

/// Whole currency amount with grouped thousands and a trailing symbol.
pub fn format_currency(value: f64, symbol: &str) -> String {
    let rounded = format!("{:.0}", round_half_up(value) + 0.0);
    format!("{}{}", add_thousands_separator(&rounded, GROUP_SEPARATOR_NBSP), symbol)
}

/// Plain count with comma-grouped thousands; integers print without decimals.
pub fn format_count(value: f64) -> String {
    let raw = if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        value.to_string()
    };
    add_thousands_separator(&raw, ',')
}

// ============================================================================
// BUILDERS
// ============================================================================

fn build_cards(m: &MetricsBundle, display: &DisplayOptions) -> Vec<MetricCard> {
    let currency = |v: f64| format_currency(v, &display.currency_symbol);

    vec![
        MetricCard {
            key: MetricKey::Cvr,
            title: "Conversion rate".to_string(),
            value_a: format_percent(m.cvr_a, 2),
            value_b: format_percent(m.cvr_b, 2),
            lift: format_lift(m.cvr_lift),
            direction: LiftDirection::of(m.cvr_lift),
        },
        MetricCard {
            key: MetricKey::Rpv,
            title: "Revenue per visitor".to_string(),
            value_a: currency(m.rpv_a),
            value_b: currency(m.rpv_b),
            lift: format_lift(m.rpv_lift),
            direction: LiftDirection::of(m.rpv_lift),
        },
        MetricCard {
            key: MetricKey::Aov,
            title: "Average order value".to_string(),
            value_a: currency(m.aov_a),
            value_b: currency(m.aov_b),
            lift: format_lift(m.aov_lift),
            direction: LiftDirection::of(m.aov_lift),
        },
    ]
}

fn build_target_card(m: &MetricsBundle) -> TargetCard {
    let headline = match m.target {
        TargetStatus::Achieved => "ACHIEVED",
        TargetStatus::NotAchieved => "NOT ACHIEVED",
    };

    TargetCard {
        status: m.target,
        headline: headline.to_string(),
        details: format!("Actual: {}", format_lift(m.rpv_lift)),
    }
}

fn build_split_bar(split: &TrafficSplit) -> SplitBar {
    SplitBar {
        a: format_percent(split.pct_a, 1),
        b: format_percent(split.pct_b, 1),
    }
}

fn pair(series: &VariantSeries, display: &DisplayOptions) -> SmallVec<[ChartSeries; 2]> {
    Variant::ALL
        .into_iter()
        .map(|variant| ChartSeries {
            name: display.label(variant).to_string(),
            variant,
            values: series.get(variant).to_vec(),
            labels: Vec::new(),
        })
        .collect()
}

fn time_chart(
    id: &str,
    kind: ChartKind,
    m: &MetricsBundle,
    series: &VariantSeries,
    y_title: &str,
    tick_suffix: Option<&str>,
    display: &DisplayOptions,
) -> ChartSpec {
    ChartSpec {
        id: id.to_string(),
        kind,
        x: m.daily.dates.clone(),
        y_title: Some(y_title.to_string()),
        tick_suffix: tick_suffix.map(str::to_string),
        series: pair(series, display),
    }
}

/// Two-stage funnel: the first stage is always 100%, the second is the step rate.
fn funnel_chart(
    id: &str,
    stages: [&str; 2],
    counts: [(f64, f64); 2],
    step_pct: [f64; 2],
    display: &DisplayOptions,
) -> ChartSpec {
    let stage = |variant: Variant, idx: usize| ChartSeries {
        name: display.label(variant).to_string(),
        variant,
        values: vec![100.0, step_pct[idx]],
        labels: vec![format_count(counts[idx].0), format_count(counts[idx].1)],
    };

    ChartSpec {
        id: id.to_string(),
        kind: ChartKind::Funnel,
        x: stages.iter().map(|s| Some(s.to_string())).collect(),
        y_title: None,
        tick_suffix: None,
        series: smallvec![stage(Variant::A, 0), stage(Variant::B, 1)],
    }
}

fn build_charts(m: &MetricsBundle, display: &DisplayOptions) -> Vec<ChartSpec> {
    let daily = &m.daily;

    vec![
        time_chart("orders", ChartKind::Bar, m, &daily.orders, "Orders", None, display),
        time_chart("payments", ChartKind::Line, m, &daily.payments, "Payments", None, display),
        time_chart("cvr_users", ChartKind::Line, m, &daily.conversion_rate, "CVR", Some("%"), display),
        time_chart("pay_rate", ChartKind::Line, m, &daily.pay_through_rate, "Pay-through", Some("%"), display),
        funnel_chart(
            "funnel_search_orders",
            ["Search", "Orders"],
            [(m.users_search_a, m.orders_a), (m.users_search_b, m.orders_b)],
            [m.funnel.orders_pct_a, m.funnel.orders_pct_b],
            display,
        ),
        funnel_chart(
            "funnel_orders_payments",
            ["Orders", "Payments"],
            [(m.orders_a, m.paid_a), (m.orders_b, m.paid_b)],
            [m.funnel.pay_through_pct_a, m.funnel.pay_through_pct_b],
            display,
        ),
    ]
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Builds the full dashboard view for a metrics bundle.
pub fn build_view(metrics: &MetricsBundle, display: &DisplayOptions) -> DashboardView {
    DashboardView {
        cards: build_cards(metrics, display),
        target: build_target_card(metrics),
        split: metrics.split.as_ref().map(build_split_bar),
        charts: build_charts(metrics, display),
    }
}
