// src/fetch/direct.rs

use encoding_rs::WINDOWS_1250;
use tracing::{info, instrument};
use url::Url;

use super::{get_checked, Transport};
use crate::date_range::{DateRange, DATE_FORMAT};
use crate::error::Result;
use crate::process::normalize::normalize_column_name;
use crate::process::table::Table;
use crate::process::write::read_table;

/// CSV export URL for `range`: `data_od/<from>/data_do/<to>` for a span,
/// `data/<day>/unit/all` for a single day.
pub fn endpoint(base_url: &str, range: &DateRange) -> Result<Url> {
    let base = Url::parse(base_url)?;
    let from = range.date_from().format(DATE_FORMAT);
    let path = match range.date_to() {
        Some(to) => format!("data_od/{}/data_do/{}", from, to.format(DATE_FORMAT)),
        None => format!("data/{}/unit/all", from),
    };
    Ok(base.join(&path)?)
}

/// Download the raw CSV export. One GET, no decoding.
#[instrument(level = "info", skip(transport, base_url, range), fields(range = %range))]
pub fn fetch<T: Transport + ?Sized>(transport: &T, base_url: &str, range: &DateRange) -> Result<Vec<u8>> {
    let url = endpoint(base_url, range)?;
    info!(%url, "Downloading file...");
    let body = get_checked(transport, &url)?.body;
    info!(bytes = body.len(), "File downloaded");
    Ok(body)
}

/// Decode as Windows-1250 exactly as the bytes stand; a leading BOM is not
/// treated specially.
pub fn decode(raw: &[u8]) -> String {
    let (text, _) = WINDOWS_1250.decode_without_bom_handling(raw);
    text.into_owned()
}

/// Decode, parse `;`-separated text and normalize the header names.
#[instrument(level = "info", skip(raw), fields(bytes = raw.len()))]
pub fn normalize(raw: &[u8]) -> Result<Table> {
    info!("Cleaning data...");
    let text = decode(raw);
    let mut table = read_table(text.as_bytes())?;
    table.rename_columns(normalize_column_name)?;
    info!(rows = table.len(), columns = table.columns().len(), "Data cleaned");
    Ok(table)
}
