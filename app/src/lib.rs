//! FILENAME: app/src/lib.rs
// PURPOSE: Dashboard application state and command surface.

use std::sync::Mutex;

use abtest_engine::{derive_filter_options, FilterOptions};
use dataset::Dataset;

pub mod api_types;
pub mod commands;
pub mod config;
pub mod error;
pub mod filter_state;
pub mod interactive;
pub mod logging;
pub mod source;

pub use api_types::{
    DashboardResponse, FilterGroupState, FilterPanelState, SetAllFiltersRequest,
    SetFilterItemRequest, NO_DATA_WARNING,
};
pub use config::AppConfig;
pub use error::AppError;
pub use filter_state::{AllState, FilterDimension, FilterGroup, FilterItem, FilterPanel};
pub use source::{fetch_dataset, DataSource};

// ============================================================================
// APPLICATION STATE
// ============================================================================

/// Session state. The dataset is read-only after load; only the panel changes.
pub struct AppState {
    pub config: AppConfig,
    pub dataset: Dataset,
    /// Filter values derived once from the dataset
    pub filter_options: FilterOptions,
    pub filter_panel: Mutex<FilterPanel>,
}

pub fn create_app_state(config: AppConfig, dataset: Dataset) -> AppState {
    let filter_options = derive_filter_options(&dataset);
    log_info!(
        "SYS",
        "Creating AppState operators={} platforms={}",
        filter_options.operators.len(),
        filter_options.platforms.len()
    );

    AppState {
        filter_panel: Mutex::new(FilterPanel::from_options(&filter_options)),
        filter_options,
        dataset,
        config,
    }
}

/// Opens the configured log file (if any) and installs the facade bridge.
pub fn init_logging(config: &AppConfig) -> Result<(), AppError> {
    let level = config.level_filter()?;

    if let Some(path) = &config.log_file {
        logging::init_log_file(path).map_err(AppError::Config)?;
    }
    logging::init_logger(level);

    log_debug!("SYS", "logging ready level={}", level);
    Ok(())
}

/// Fetches the configured dataset and builds the session state around it.
pub async fn load_app_state(config: AppConfig) -> Result<AppState, AppError> {
    let source = DataSource::parse(&config.data_source);
    let dataset = fetch_dataset(&source).await?;
    Ok(create_app_state(config, dataset))
}
