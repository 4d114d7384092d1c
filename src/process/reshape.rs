// src/process/reshape.rs

use tracing::{info, instrument};

use super::normalize::normalize_column_name;
use super::raw_table::RawDataset;
use super::table::{Cell, Table};
use crate::error::{Error, Result};

/// Leading sub-header fields (date, time) that belong to no group label.
const UNGROUPED_FIELDS: usize = 2;
/// Sub-columns under each group label.
const FIELDS_PER_GROUP: usize = 2;

pub const TIME_COLUMN: &str = "Czas";
pub const HOUR_COLUMN: &str = "Godzina";
/// Hour cell of the per-day totals row.
pub const SUMMARY_HOUR: &str = "Suma";

/// Prices that mean nothing on a totals row.
pub const SUMMARY_BLANKED_COLUMNS: [&str; 3] = [
    "FIXING_I_Kurs_(PLN/MWh)",
    "FIXING_II_Kurs_(PLN/MWh)",
    "Notowania_ciagle_Kurs_(PLN/MWh)",
];

/// Merge the group-label row into the sub-header row.
///
/// Sub-header field `i >= 2` becomes `"{labels[(i - 2) / 2]} {sub}"`.
pub fn repair_header(labels: &[String], sub_header: &[String]) -> Result<Vec<String>> {
    sub_header
        .iter()
        .enumerate()
        .map(|(i, sub)| {
            if i < UNGROUPED_FIELDS {
                return Ok(sub.clone());
            }
            let group = (i - UNGROUPED_FIELDS) / FIELDS_PER_GROUP;
            labels
                .get(group)
                .map(|label| format!("{} {}", label, sub))
                .ok_or_else(|| {
                    Error::MalformedDataset(format!(
                        "sub-header `{}` at {} has no group label ({} labels)",
                        sub,
                        i,
                        labels.len()
                    ))
                })
        })
        .collect()
}

/// `"08-09"` → `"08"`; text without a dash is kept whole.
pub fn start_hour(cell: &str) -> String {
    cell.split('-').next().unwrap_or_default().to_string()
}

/// Turn the stitched hour-contracts rows into the output table.
#[instrument(level = "info", skip(raw), fields(rows = raw.len()))]
pub fn reshape(raw: RawDataset) -> Result<Table> {
    info!("Cleaning data...");
    let mut records = raw.into_records().into_iter();
    let (labels, sub_header) = match (records.next(), records.next()) {
        (Some(labels), Some(sub_header)) => (labels, sub_header),
        _ => {
            return Err(Error::MalformedDataset(
                "expected two header rows".to_string(),
            ))
        }
    };

    let columns: Vec<String> = repair_header(&labels, &sub_header)?
        .iter()
        .map(|name| normalize_column_name(name))
        .collect();
    let rows: Vec<Vec<Cell>> = records
        .map(|record| record.into_iter().map(Cell::Text).collect())
        .collect();
    let mut table = Table::new(columns, rows)?;

    table.rename_column(TIME_COLUMN, HOUR_COLUMN)?;
    let hour = table.require_column(HOUR_COLUMN)?;
    table.map_column(hour, start_hour);

    let blanked = SUMMARY_BLANKED_COLUMNS
        .iter()
        .map(|name| table.require_column(name))
        .collect::<Result<Vec<_>>>()?;
    for row in table.rows_mut() {
        if row[hour].as_str() == SUMMARY_HOUR {
            for &col in &blanked {
                row[col] = Cell::Blank;
            }
        }
    }

    info!(rows = table.len(), columns = table.columns().len(), "Data cleaned");
    Ok(table)
}
