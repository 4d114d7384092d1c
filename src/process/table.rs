// src/process/table.rs

use std::collections::HashSet;

use crate::error::{Error, Result};

/// One table cell. `Blank` marks a value that was deliberately suppressed,
/// as opposed to text that happens to be empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Text(String),
    Blank,
}

impl Cell {
    pub fn as_str(&self) -> &str {
        match self {
            Cell::Text(s) => s,
            Cell::Blank => "",
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Cell::Blank)
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

/// Rectangular table with unique column names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Fails if a column name repeats or a row's width differs from the header's.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Result<Self> {
        check_unique(&columns)?;
        if let Some((i, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != columns.len())
        {
            return Err(Error::MalformedDataset(format!(
                "row {} has {} fields, header has {}",
                i,
                row.len(),
                columns.len()
            )));
        }
        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Mutable access to cells; row widths stay fixed.
    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut [Cell]> {
        self.rows.iter_mut().map(|row| row.as_mut_slice())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| Error::MalformedDataset(format!("missing column `{}`", name)))
    }

    /// Cell of `row` under column `name`.
    pub fn get(&self, row: usize, name: &str) -> Option<&Cell> {
        let col = self.column_index(name)?;
        self.rows.get(row)?.get(col)
    }

    /// Rename `from` to `to` if present. Returns whether a rename happened.
    pub fn rename_column(&mut self, from: &str, to: &str) -> Result<bool> {
        match self.column_index(from) {
            Some(i) => {
                let mut renamed = self.columns.clone();
                renamed[i] = to.to_string();
                check_unique(&renamed)?;
                self.columns = renamed;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Rewrite every column name with `f`.
    pub fn rename_columns<F: Fn(&str) -> String>(&mut self, f: F) -> Result<()> {
        let renamed: Vec<String> = self.columns.iter().map(|c| f(c.as_str())).collect();
        check_unique(&renamed)?;
        self.columns = renamed;
        Ok(())
    }

    /// Replace every text cell in column `col` with `f(text)`. Blanks stay blank.
    pub fn map_column<F: Fn(&str) -> String>(&mut self, col: usize, f: F) {
        for row in &mut self.rows {
            if let Some(Cell::Text(text)) = row.get_mut(col) {
                *text = f(text.as_str());
            }
        }
    }
}

fn check_unique(columns: &[String]) -> Result<()> {
    let mut seen = HashSet::with_capacity(columns.len());
    for c in columns {
        if !seen.insert(c.as_str()) {
            return Err(Error::MalformedDataset(format!("duplicate column `{}`", c)));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn row(cells: &[&str]) -> Vec<Cell> {
        cells.iter().map(|s| Cell::from(*s)).collect()
    }

    #[test]
    fn rejects_ragged_rows() {
        let err = Table::new(cols(&["a", "b"]), vec![row(&["1", "2"]), row(&["1"])]).unwrap_err();
        match err {
            Error::MalformedDataset(msg) => assert!(msg.contains("row 1")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn rejects_duplicate_columns() {
        assert!(Table::new(cols(&["a", "a"]), vec![]).is_err());
    }

    #[test]
    fn rename_and_lookup() {
        let mut t = Table::new(cols(&["Czas", "x"]), vec![row(&["01-02", "5"])]).unwrap();
        assert!(t.rename_column("Czas", "Godzina").unwrap());
        assert!(!t.rename_column("Czas", "Godzina").unwrap());
        assert_eq!(t.get(0, "Godzina").unwrap().as_str(), "01-02");
        assert!(t.rename_column("x", "Godzina").is_err());
    }

    #[test]
    fn map_column_skips_blanks() {
        let mut t = Table::new(
            cols(&["a"]),
            vec![row(&["x-y"]), vec![Cell::Blank]],
        )
        .unwrap();
        t.map_column(0, |s| s.to_uppercase());
        assert_eq!(t.rows()[0][0].as_str(), "X-Y");
        assert!(t.rows()[1][0].is_blank());
    }
}
