//! FILENAME: app/src/error.rs
//! Application error type.

use dataset::DatasetError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Unknown {dimension} filter value: {value}")]
    UnknownFilterValue { dimension: String, value: String },

    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("State lock poisoned: {0}")]
    StatePoisoned(&'static str),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
