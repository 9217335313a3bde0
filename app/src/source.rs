//! FILENAME: app/src/source.rs
//! Dataset source resolution and the one-shot asynchronous fetch.

use std::fmt;
use std::path::PathBuf;

use dataset::Dataset;

use crate::error::AppError;
use crate::{log_enter, log_exit, log_info};

/// Where the dataset comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    File(PathBuf),
    Url(String),
}

impl DataSource {
    /// `http://` and `https://` locations are URLs, anything else is a path.
    pub fn parse(location: &str) -> Self {
        let trimmed = location.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            DataSource::Url(trimmed.to_string())
        } else {
            DataSource::File(PathBuf::from(trimmed))
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::File(path) => write!(f, "{}", path.display()),
            DataSource::Url(url) => f.write_str(url),
        }
    }
}

async fn read_bytes(source: &DataSource) -> Result<Vec<u8>, AppError> {
    match source {
        DataSource::File(path) => Ok(tokio::fs::read(path).await?),
        DataSource::Url(url) => {
            let response = reqwest::get(url.as_str()).await?.error_for_status()?;
            Ok(response.bytes().await?.to_vec())
        }
    }
}

/// Fetches and decodes the dataset. Called once at start-up.
pub async fn fetch_dataset(source: &DataSource) -> Result<Dataset, AppError> {
    log_enter!("DATA", "fetch_dataset", "source={}", source);

    let bytes = read_bytes(source).await?;
    let dataset = Dataset::from_json_slice(&bytes)?;

    let summary = dataset.summary();
    log_info!(
        "DATA",
        "loaded orders={} daily={} search={} daily_search={} dates={}",
        summary.orders,
        summary.daily,
        summary.search,
        summary.daily_search,
        summary.dates
    );
    log_exit!("DATA", "fetch_dataset", "bytes={}", bytes.len());

    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_source() {
        assert_eq!(
            DataSource::parse("https://example.test/data.json"),
            DataSource::Url("https://example.test/data.json".to_string())
        );
        assert_eq!(
            DataSource::parse("HTTP://example.test/x"),
            DataSource::Url("HTTP://example.test/x".to_string())
        );
        assert_eq!(
            DataSource::parse(" data/export.json "),
            DataSource::File(PathBuf::from("data/export.json"))
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(DataSource::parse("data.json").to_string(), "data.json");
    }
}
