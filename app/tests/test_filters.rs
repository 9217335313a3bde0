//! FILENAME: tests/test_filters.rs
//! Integration tests for filter options, the checkbox panel and interactive mode.

mod common;

use std::io::Cursor;

use common::TestHarness;
use dashboard_lib::{
    commands, interactive, AllState, AppError, FilterDimension, SetAllFiltersRequest,
    SetFilterItemRequest,
};

fn uncheck(dimension: FilterDimension, value: &str) -> SetFilterItemRequest {
    SetFilterItemRequest {
        dimension,
        value: value.to_string(),
        checked: false,
    }
}

// ============================================================================
// FILTER OPTIONS
// ============================================================================

#[test]
fn test_filter_options_sorted_and_distinct() {
    let harness = TestHarness::new();
    let options = commands::get_filter_options(&harness.state);

    assert_eq!(options.operators, vec!["X", "Y"]);
    assert_eq!(options.platforms, vec!["ios", "web"]);
}

// ============================================================================
// PANEL
// ============================================================================

#[test]
fn test_panel_starts_fully_checked() {
    let harness = TestHarness::new();
    let panel = commands::get_filter_panel(&harness.state).unwrap();

    assert_eq!(panel.operators.all, AllState::Checked);
    assert!(panel.platforms.items.iter().all(|item| item.checked));

    let response = commands::update_dashboard(&harness.state).unwrap();
    assert!(response.has_data);
    assert_eq!(response.selection.operators.len(), 2);
}

#[test]
fn test_unchecking_item_narrows_selection() {
    let harness = TestHarness::new();

    let response = commands::set_filter_item(&harness.state, uncheck(FilterDimension::Operator, "Y")).unwrap();
    assert_eq!(response.selection.operators.iter().collect::<Vec<_>>(), vec!["X"]);
    assert_eq!(response.metrics.unwrap().paid_a, 4.0);

    let panel = commands::get_filter_panel(&harness.state).unwrap();
    assert_eq!(panel.operators.all, AllState::Indeterminate);
}

#[test]
fn test_all_unchecked_falls_back_to_every_value() {
    let harness = TestHarness::new();

    let response = commands::set_all_filters(
        &harness.state,
        SetAllFiltersRequest {
            dimension: FilterDimension::Platform,
            checked: false,
        },
    )
    .unwrap();

    assert!(response.has_data);
    assert_eq!(response.selection.platforms.len(), 2);

    let panel = commands::get_filter_panel(&harness.state).unwrap();
    assert_eq!(panel.platforms.all, AllState::Unchecked);
}

#[test]
fn test_selection_without_rows_keeps_panel_state() {
    let harness = TestHarness::new();

    commands::set_filter_item(&harness.state, uncheck(FilterDimension::Operator, "X")).unwrap();
    let response = commands::set_filter_item(&harness.state, uncheck(FilterDimension::Platform, "ios")).unwrap();

    assert!(!response.has_data);
    assert!(response.warning.is_some());
}

#[test]
fn test_unknown_item_is_rejected() {
    let harness = TestHarness::new();
    let err = commands::set_filter_item(&harness.state, uncheck(FilterDimension::Platform, "desktop")).unwrap_err();

    assert!(matches!(err, AppError::UnknownFilterValue { .. }));
    assert_eq!(
        commands::get_filter_panel(&harness.state).unwrap().platforms.all,
        AllState::Checked
    );
}

// ============================================================================
// INTERACTIVE MODE
// ============================================================================

#[test]
fn test_interactive_session() {
    let harness = TestHarness::new();
    let input = Cursor::new("uncheck operator Y\n\nbogus\ncheck platform desktop\nshow\nquit\ncheck operator Y\n");
    let mut output = Vec::new();

    interactive::run_interactive(&harness.state, input, &mut output).unwrap();

    let text = String::from_utf8(output).unwrap();
    assert!(text.contains("error: Invalid command: unknown command 'bogus'"));
    assert!(text.contains("error: Unknown platform filter value: desktop"));
    assert!(text.contains("\"panel\""));

    // input after quit is not processed
    let panel = commands::get_filter_panel(&harness.state).unwrap();
    assert_eq!(panel.operators.all, AllState::Indeterminate);
}

#[test]
fn test_interactive_ends_at_eof() {
    let harness = TestHarness::new();
    let mut output = Vec::new();

    interactive::run_interactive(&harness.state, Cursor::new("all operator off\n"), &mut output).unwrap();

    let panel = commands::get_filter_panel(&harness.state).unwrap();
    assert_eq!(panel.operators.all, AllState::Unchecked);
    assert!(String::from_utf8(output).unwrap().contains("\"has_data\": true"));
}
