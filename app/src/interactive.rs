//! FILENAME: app/src/interactive.rs
//! Line-driven filter panel.
//!
//! Commands:
//! - `check <operator|platform> <value>` / `uncheck <operator|platform> <value>`
//! - `all <operator|platform> <on|off>`
//! - `show`
//! - `quit`
//!
//! Values may contain spaces; everything after the dimension is the value.

use std::io::{BufRead, Write};

use serde::Serialize;

use crate::api_types::{DashboardResponse, FilterPanelState, SetAllFiltersRequest, SetFilterItemRequest};
use crate::commands;
use crate::error::AppError;
use crate::filter_state::FilterDimension;
use crate::{log_info, log_warn, AppState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelCommand {
    SetItem {
        dimension: FilterDimension,
        value: String,
        checked: bool,
    },
    SetAll {
        dimension: FilterDimension,
        checked: bool,
    },
    Show,
    Quit,
}

fn parse_switch(word: &str) -> Result<bool, AppError> {
    match word.to_ascii_lowercase().as_str() {
        "on" | "true" | "1" => Ok(true),
        "off" | "false" | "0" => Ok(false),
        other => Err(AppError::InvalidCommand(format!("expected on|off, got '{}'", other))),
    }
}

/// Parses one input line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<PanelCommand>, AppError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim_start();

    let command = match verb.to_ascii_lowercase().as_str() {
        "check" | "uncheck" => {
            let (dimension, value) = rest
                .split_once(char::is_whitespace)
                .ok_or_else(|| AppError::InvalidCommand(format!("usage: {} <operator|platform> <value>", verb)))?;
            PanelCommand::SetItem {
                dimension: dimension.parse()?,
                value: value.trim().to_string(),
                checked: verb.eq_ignore_ascii_case("check"),
            }
        }
        "all" => {
            let mut words = rest.split_whitespace();
            let (Some(dimension), Some(switch), None) = (words.next(), words.next(), words.next()) else {
                return Err(AppError::InvalidCommand("usage: all <operator|platform> <on|off>".to_string()));
            };
            PanelCommand::SetAll {
                dimension: dimension.parse()?,
                checked: parse_switch(switch)?,
            }
        }
        "show" => PanelCommand::Show,
        "quit" | "exit" => PanelCommand::Quit,
        other => return Err(AppError::InvalidCommand(format!("unknown command '{}'", other))),
    };

    Ok(Some(command))
}

#[derive(Serialize)]
struct ShowOutput<'a> {
    panel: &'a FilterPanelState,
    dashboard: &'a DashboardResponse,
}

fn emit<W: Write, T: Serialize>(output: &mut W, value: &T) -> Result<(), AppError> {
    serde_json::to_writer_pretty(&mut *output, value)?;
    writeln!(output)?;
    output.flush()?;
    Ok(())
}

/// Reads commands until `quit` or end of input, printing a JSON document
/// after each one. Bad commands are reported and the loop continues.
pub fn run_interactive<R: BufRead, W: Write>(
    state: &AppState,
    input: R,
    mut output: W,
) -> Result<(), AppError> {
    log_info!("INTERACTIVE", "session start");

    for line in input.lines() {
        let line = line?;

        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                log_warn!("INTERACTIVE", "{}", e);
                writeln!(output, "error: {}", e)?;
                continue;
            }
        };

        let result = match command {
            PanelCommand::Quit => break,
            PanelCommand::Show => {
                let panel = commands::get_filter_panel(state)?;
                let dashboard = commands::update_dashboard(state)?;
                emit(&mut output, &ShowOutput { panel: &panel, dashboard: &dashboard })?;
                continue;
            }
            PanelCommand::SetItem { dimension, value, checked } => {
                commands::set_filter_item(state, SetFilterItemRequest { dimension, value, checked })
            }
            PanelCommand::SetAll { dimension, checked } => {
                commands::set_all_filters(state, SetAllFiltersRequest { dimension, checked })
            }
        };

        match result {
            Ok(response) => emit(&mut output, &response)?,
            Err(e @ AppError::UnknownFilterValue { .. }) => {
                log_warn!("INTERACTIVE", "{}", e);
                writeln!(output, "error: {}", e)?;
            }
            Err(e) => return Err(e),
        }
    }

    log_info!("INTERACTIVE", "session end");
    Ok(())
}
