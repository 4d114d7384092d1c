// src/process/raw_table.rs

/// One table row as scraped, fields in page order.
pub type RawRecord = Vec<String>;

/// Rows scraped across every requested day.
///
/// Row 0 holds the group labels, row 1 the sub-headers (with `"Data"` in
/// front), every later row is a data row stamped with its day.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawDataset {
    records: Vec<RawRecord>,
}

impl RawDataset {
    pub fn new(records: Vec<RawRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[RawRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<RawRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Data rows only, skipping both header rows.
    pub fn data_rows(&self) -> &[RawRecord] {
        self.records.get(2..).unwrap_or_default()
    }

    pub fn extend<I: IntoIterator<Item = RawRecord>>(&mut self, rows: I) {
        self.records.extend(rows);
    }
}
