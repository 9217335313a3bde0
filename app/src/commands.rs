//! FILENAME: app/src/commands.rs
//! PURPOSE: Dashboard commands: filter options, panel changes and pipeline runs.
//! CONTEXT: Every panel change re-runs aggregate -> compute_metrics -> build_view.

use abtest_engine::{aggregate, build_view, compute_metrics, FilterOptions, FilterSelection};

use crate::api_types::{
    DashboardResponse, FilterPanelState, SetAllFiltersRequest, SetFilterItemRequest,
    NO_DATA_WARNING,
};
use crate::error::AppError;
use crate::filter_state::FilterPanel;
use crate::{log_debug, log_info, log_warn, AppState};
use std::sync::MutexGuard;

// ============================================================================
// HELPERS
// ============================================================================

fn lock_panel(state: &AppState) -> Result<MutexGuard<'_, FilterPanel>, AppError> {
    state
        .filter_panel
        .lock()
        .map_err(|_| AppError::StatePoisoned("filter_panel"))
}

/// Runs the pipeline for a resolved selection.
fn run_pipeline(state: &AppState, selection: FilterSelection) -> DashboardResponse {
    log_debug!(
        "PIPELINE",
        "run operators={:?} platforms={:?}",
        selection.operators,
        selection.platforms
    );

    let aggregated = aggregate(&state.dataset, &selection.operators, &selection.platforms);

    if !aggregated.has_data() {
        log_warn!("PIPELINE", "{}", NO_DATA_WARNING);
        return DashboardResponse {
            has_data: false,
            selection,
            metrics: None,
            view: None,
            warning: Some(NO_DATA_WARNING.to_string()),
        };
    }

    let metrics = compute_metrics(&aggregated, &state.config.policy);
    let view = build_view(&metrics, &state.config.display);

    log_info!(
        "PIPELINE",
        "rpv_lift={:.2} target={:?} variants={}",
        metrics.rpv_lift,
        metrics.target,
        aggregated.totals.len()
    );

    DashboardResponse {
        has_data: true,
        selection,
        metrics: Some(metrics),
        view: Some(view),
        warning: None,
    }
}

// ============================================================================
// COMMANDS
// ============================================================================

/// Distinct operator and platform values of the loaded dataset.
pub fn get_filter_options(state: &AppState) -> FilterOptions {
    state.filter_options.clone()
}

pub fn get_filter_panel(state: &AppState) -> Result<FilterPanelState, AppError> {
    let panel = lock_panel(state)?;
    Ok(FilterPanelState::from(&*panel))
}

/// Recomputes the dashboard for the current panel state.
pub fn update_dashboard(state: &AppState) -> Result<DashboardResponse, AppError> {
    let selection = lock_panel(state)?.selection();
    Ok(run_pipeline(state, selection))
}

pub fn set_filter_item(
    state: &AppState,
    request: SetFilterItemRequest,
) -> Result<DashboardResponse, AppError> {
    log_info!(
        "FILTER",
        "set_filter_item {}={} checked={}",
        request.dimension,
        request.value,
        request.checked
    );

    let selection = {
        let mut panel = lock_panel(state)?;
        panel.set_item(request.dimension, &request.value, request.checked)?;
        panel.selection()
    };

    Ok(run_pipeline(state, selection))
}

pub fn set_all_filters(
    state: &AppState,
    request: SetAllFiltersRequest,
) -> Result<DashboardResponse, AppError> {
    log_info!(
        "FILTER",
        "set_all_filters {} checked={}",
        request.dimension,
        request.checked
    );

    let selection = {
        let mut panel = lock_panel(state)?;
        panel.set_all(request.dimension, request.checked);
        panel.selection()
    };

    Ok(run_pipeline(state, selection))
}

/// One-off report for an explicit selection, independent of the panel.
/// An empty dimension means every value of that dimension.
pub fn report_for_selection(state: &AppState, selection: FilterSelection) -> DashboardResponse {
    let selection = selection.or_all(&state.filter_options);
    run_pipeline(state, selection)
}
