//! FILENAME: app/src/main.rs
// PURPOSE: Command-line entry point: load the dataset once, then report or run the panel.
// FORMAT: JSON on stdout, log lines (seq|level|category|message) in the log file or on stderr.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use abtest_engine::FilterSelection;
use clap::{Parser, Subcommand};
use dashboard_lib::{
    commands, init_logging, interactive, load_app_state, log_error, log_info, AppConfig, AppError,
    AppState,
};

#[derive(Parser)]
#[command(name = "abtest-dashboard", version, about = "A/B test discount dashboard")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Dataset file path or http(s) URL [default: data.json]
    #[arg(long, global = true, env = "ABTEST_DATA")]
    data: Option<String>,

    /// JSON config file
    #[arg(long, global = true, env = "ABTEST_CONFIG")]
    config: Option<PathBuf>,

    /// Write log lines to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Print the available operator and platform filter values
    Filters,
    /// Print the dashboard for a selection (all values when a dimension is omitted)
    Report {
        #[arg(long = "operator")]
        operators: Vec<String>,
        #[arg(long = "platform")]
        platforms: Vec<String>,
        #[arg(long)]
        pretty: bool,
    },
    /// Drive the filter panel from stdin
    Interactive,
}

fn print_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<(), AppError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if pretty {
        serde_json::to_writer_pretty(&mut out, value)?;
    } else {
        serde_json::to_writer(&mut out, value)?;
    }
    writeln!(out)?;
    Ok(())
}

fn load_config(cli: &Cli) -> Result<AppConfig, AppError> {
    let config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    Ok(config.with_overrides(cli.data.clone(), cli.log_file.clone()))
}

fn execute(command: Command, state: &AppState) -> Result<(), AppError> {
    match command {
        Command::Filters => print_json(&commands::get_filter_options(state), true),
        Command::Report { operators, platforms, pretty } => {
            let selection = FilterSelection::new(operators, platforms);
            let response = commands::report_for_selection(state, selection);
            print_json(&response, pretty)
        }
        Command::Interactive => {
            let stdin = io::stdin();
            interactive::run_interactive(state, stdin.lock(), io::stdout())
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli).and_then(|config| {
        init_logging(&config)?;
        Ok(config)
    }) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    log_info!(
        "SYS",
        "abtest-dashboard starting at {} source={}",
        chrono::Local::now().to_rfc3339(),
        config.data_source
    );

    // The single asynchronous step; everything after it is synchronous.
    let state = match load_app_state(config).await {
        Ok(state) => state,
        Err(e) => {
            log_error!("SYS", "load failed: {}", e);
            eprintln!("Error loading data: {}", e);
            eprintln!("Make sure the data file exists and is valid JSON.");
            return ExitCode::FAILURE;
        }
    };

    match execute(cli.command, &state) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log_error!("SYS", "{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
