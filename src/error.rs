// src/error.rs

use chrono::NaiveDate;
use reqwest::StatusCode;
use thiserror::Error;

/// Everything that can abort a report run. None of these are retried by the
/// core; retrying is the transport's business.
#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown data source: {0}")]
    UnknownSource(String),

    #[error("GET {endpoint} returned {status}")]
    Fetch { endpoint: String, status: StatusCode },

    #[error("GET {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("scraping {date} failed: {reason}")]
    Scrape { date: NaiveDate, reason: String },

    #[error("malformed dataset: {0}")]
    MalformedDataset(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
