// src/pipeline.rs

use std::path::PathBuf;
use tracing::{info, instrument};

use crate::config::RunConfig;
use crate::date_range::make_report_name;
use crate::error::Result;
use crate::fetch::{direct, scrape, Transport};
use crate::process::{reshape, write_report, Table};
use crate::source::{resolve, FetcherKind};

/// Download, clean and save one report. Returns the path of the written CSV.
///
/// Nothing is written unless every step before the writer succeeded.
#[instrument(level = "info", skip(transport, config), fields(source = %config.source, range = %config.range))]
pub fn run<T: Transport + ?Sized>(transport: &T, config: &RunConfig) -> Result<PathBuf> {
    let entry = resolve(config.source);
    let file_name = make_report_name(entry.label, &config.range);
    info!(base_url = entry.base_url, file = %file_name, "starting");

    let table: Table = match entry.fetcher_kind {
        FetcherKind::DirectCsv => {
            let raw = direct::fetch(transport, entry.base_url, &config.range)?;
            direct::normalize(&raw)?
        }
        FetcherKind::HtmlScrape => {
            let raw = scrape::scrape(transport, entry.base_url, &config.range)?;
            reshape(raw)?
        }
    };

    write_report(&table, &config.output_dir, &file_name)
}
