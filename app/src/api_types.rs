//! FILENAME: app/src/api_types.rs
// PURPOSE: Request and response types for the dashboard commands.
// CONTEXT: Field names stay snake_case to match the metrics bundle.

use abtest_engine::{DashboardView, FilterSelection, MetricsBundle};
use serde::{Deserialize, Serialize};

use crate::filter_state::{AllState, FilterDimension, FilterGroup, FilterItem, FilterPanel};

/// Warning reported when the filtered aggregation has no variants.
pub const NO_DATA_WARNING: &str = "No data after filtering";

/// Result of one pipeline run.
///
/// When `has_data` is false the previous dashboard stays on screen:
/// `metrics` and `view` are omitted and `warning` explains why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub has_data: bool,
    pub selection: FilterSelection,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<MetricsBundle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<DashboardView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterGroupState {
    pub all: AllState,
    pub items: Vec<FilterItem>,
}

impl From<&FilterGroup> for FilterGroupState {
    fn from(group: &FilterGroup) -> Self {
        FilterGroupState {
            all: group.all_state(),
            items: group.items().to_vec(),
        }
    }
}

/// Snapshot of the checkbox panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterPanelState {
    pub operators: FilterGroupState,
    pub platforms: FilterGroupState,
}

impl From<&FilterPanel> for FilterPanelState {
    fn from(panel: &FilterPanel) -> Self {
        FilterPanelState {
            operators: FilterGroupState::from(&panel.operators),
            platforms: FilterGroupState::from(&panel.platforms),
        }
    }
}

/// Toggle one checkbox.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetFilterItemRequest {
    pub dimension: FilterDimension,
    pub value: String,
    pub checked: bool,
}

/// Toggle a group's "select all" checkbox.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetAllFiltersRequest {
    pub dimension: FilterDimension,
    pub checked: bool,
}
