//! FILENAME: core/abtest-engine/src/lib.rs
//! A/B test metrics subsystem.
//!
//! Turns a loaded `Dataset` plus a filter selection into per-variant metrics.
//! Depends on `dataset` only for the row types and `Variant`.
//!
//! Layers:
//! - `definition`: Serializable inputs (selection, business policy, display options)
//! - `filters`: Filter values available in a dataset
//! - `engine`: Filtering and aggregation (WHAT was sold, per variant and day)
//! - `metrics`: Ratios, lifts and aligned daily series
//! - `view`: Renderable cards and chart payloads for the frontend

pub mod definition;
pub mod filters;
pub mod engine;
pub mod metrics;
pub mod view;

pub use definition::*;
pub use filters::{derive_filter_options, FilterOptions};
pub use engine::{
    aggregate, AggregatedResult, DailySearchTotals, DailyTotals, VariantTotals,
};
pub use metrics::{
    compute_metrics, lift, percentage, ratio, DailySeries, FunnelMetrics, MetricsBundle,
    TargetStatus, TrafficSplit, VariantSeries,
};
pub use view::{
    build_view, ChartKind, ChartSeries, ChartSpec, DashboardView, LiftDirection, MetricCard,
    MetricKey, SplitBar, TargetCard,
};
