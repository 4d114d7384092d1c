// src/process/write.rs

use csv::{ReaderBuilder, Terminator, WriterBuilder};
use std::{
    fs,
    io::{Read, Write},
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;
use tracing::{info, instrument};

use super::table::{Cell, Table};
use crate::error::{Error, Result};

/// Field separator of every report file, read or written.
pub const SEPARATOR: u8 = b';';

/// Write `table` to `<output_dir>/<file_name>`, creating the directory if needed.
///
/// The CSV is written to a temporary file next to the target and renamed
/// into place, so the target is either the complete new report or untouched.
#[instrument(level = "info", skip(table, output_dir), fields(dir = %output_dir.as_ref().display()))]
pub fn write_report<P: AsRef<Path>>(table: &Table, output_dir: P, file_name: &str) -> Result<PathBuf> {
    info!("Saving data...");
    let dir = output_dir.as_ref();
    fs::create_dir_all(dir)?;
    let path = dir.join(file_name);

    let tmp = NamedTempFile::new_in(dir)?;
    write_table(tmp.as_file(), table)?;
    tmp.as_file().sync_all()?;
    tmp.persist(&path).map_err(|e| Error::Io(e.error))?;

    info!(path = %path.display(), rows = table.len(), "Data saved");
    Ok(path)
}

/// Header row then data rows, `;`-separated, blanks as empty fields.
pub fn write_table<W: Write>(writer: W, table: &Table) -> Result<()> {
    let mut w = WriterBuilder::new()
        .delimiter(SEPARATOR)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);
    w.write_record(table.columns())?;
    for row in table.rows() {
        w.write_record(row.iter().map(Cell::as_str))?;
    }
    w.flush()?;
    Ok(())
}

/// Parse `;`-separated text with a header row. Column names are kept verbatim.
///
/// Input without a header row is malformed; a ragged line is reported by the
/// CSV reader with its position.
pub fn read_table<R: Read>(reader: R) -> Result<Table> {
    let mut r = ReaderBuilder::new()
        .delimiter(SEPARATOR)
        .has_headers(true)
        .from_reader(reader);
    let columns: Vec<String> = r.headers()?.iter().map(String::from).collect();
    if columns.is_empty() {
        return Err(Error::MalformedDataset("no header row".to_string()));
    }
    let rows = r
        .records()
        .map(|record| record.map(|rec| rec.iter().map(Cell::from).collect()))
        .collect::<csv::Result<Vec<Vec<Cell>>>>()?;
    Table::new(columns, rows)
}
