// src/config.rs

use chrono::NaiveDate;
use clap::Parser;
use std::{path::PathBuf, time::Duration};

use crate::date_range::{DateRange, DATE_FORMAT};
use crate::error::{Error, Result};
use crate::source::DataSourceId;

/// TGE only serves hour-contract pages this far back.
pub const MAX_HOUR_CONTRACTS_AGE_DAYS: i64 = 90;

/// Downloads a PSE or TGE market report and saves it as a `;`-separated CSV.
#[derive(Debug, Clone, Parser)]
#[command(name = "plscraper", version)]
pub struct Args {
    /// Report to download
    #[arg(long, value_enum)]
    pub data_source: DataSourceId,

    /// First day, YYYYMMDD. Must be before today
    #[arg(long, value_name = "YYYYMMDD", value_parser = parse_date)]
    pub date_from: NaiveDate,

    /// Last day, YYYYMMDD. If missing only `--date-from` is downloaded
    #[arg(long, value_name = "YYYYMMDD", value_parser = parse_date)]
    pub date_to: Option<NaiveDate>,

    /// Directory the report is written to, created if missing
    #[arg(long, env = "PLSCRAPER_OUTPUT_DIR", default_value = "output")]
    pub output_dir: PathBuf,

    /// Per-request timeout
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Retries per request on connection errors and 5xx responses
    #[arg(long, default_value_t = 3)]
    pub retries: u32,

    /// Also write logs to this file (truncated on start)
    #[arg(long, env = "PLSCRAPER_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

/// A validated request: what to download, for which days, and where to put it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub source: DataSourceId,
    pub range: DateRange,
    pub output_dir: PathBuf,
}

pub fn parse_date(s: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|e| format!("expected YYYYMMDD: {}", e))
}

impl Args {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check the dates against `today` before anything touches the network.
    pub fn validate(&self, today: NaiveDate) -> Result<RunConfig> {
        if self.date_from >= today {
            return Err(Error::InvalidInput(
                "date from must be before today".to_string(),
            ));
        }
        if let Some(to) = self.date_to {
            if to >= today {
                return Err(Error::InvalidInput(
                    "date to must be before today".to_string(),
                ));
            }
            if self.data_source == DataSourceId::HourContracts
                && (today - self.date_from).num_days() > MAX_HOUR_CONTRACTS_AGE_DAYS
            {
                return Err(Error::InvalidInput(format!(
                    "hour contracts reach at most {} days into the past",
                    MAX_HOUR_CONTRACTS_AGE_DAYS
                )));
            }
        }
        let range = DateRange::new(self.date_from, self.date_to)?;
        Ok(RunConfig {
            source: self.data_source,
            range,
            output_dir: self.output_dir.clone(),
        })
    }
}
