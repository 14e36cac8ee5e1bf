// src/load/mod.rs
pub mod utils;

use anyhow::{anyhow, bail, Context, Result};
use calamine::{open_workbook, Data, Reader, Xlsx};
use std::path::Path;
use tracing::{debug, info};

use utils::{format_number, is_na_token};

/// A single spreadsheet cell after NA normalisation.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Number(f64),
    Text(String),
}

impl Cell {
    pub fn text(s: impl Into<String>) -> Self {
        Cell::Text(s.into())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Categorical view of the cell. Numbers are rendered as text.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Number(n) => Some(format_number(*n)),
            Cell::Text(s) => Some(s.clone()),
        }
    }

    /// Numeric view of the cell; text is parsed if it looks like a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Empty => None,
            Cell::Number(n) => Some(*n),
            Cell::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl From<&Data> for Cell {
    fn from(d: &Data) -> Self {
        match d {
            Data::Empty | Data::Error(_) => Cell::Empty,
            Data::String(s) if is_na_token(s) => Cell::Empty,
            Data::String(s) => Cell::Text(s.clone()),
            Data::Float(f) => Cell::Number(*f),
            Data::Int(i) => Cell::Number(*i as f64),
            Data::Bool(b) => Cell::Text(if *b { "True" } else { "False" }.into()),
            Data::DateTime(dt) => Cell::Number(dt.as_f64()),
            Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        }
    }
}

/// The worksheet as read: one header row, then data rows of equal width.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub headers: Vec<String>,
    /// Data rows, indexed 0.. in sheet order (header excluded, blank rows skipped).
    pub rows: Vec<Vec<Cell>>,
}

impl RawTable {
    /// Build a table, padding or truncating every row to the header width.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut r| {
                r.resize(width, Cell::Empty);
                r
            })
            .collect();
        Self { headers, rows }
    }

    pub fn width(&self) -> usize {
        self.headers.len()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Remove the columns at `positions`, returning their header names in
    /// the order given.
    pub fn drop_columns(&mut self, positions: &[usize]) -> Result<Vec<String>> {
        let width = self.width();
        let mut sorted = positions.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        if let Some(&bad) = sorted.iter().find(|&&p| p >= width) {
            bail!("column position {} out of range (table has {} columns)", bad, width);
        }

        let names = positions.iter().map(|&p| self.headers[p].clone()).collect();
        for &p in sorted.iter().rev() {
            self.headers.remove(p);
            for row in &mut self.rows {
                row.remove(p);
            }
        }
        Ok(names)
    }
}

/// Header text for column `idx`; blank headers get the spreadsheet reader's
/// `Unnamed: N` placeholder.
fn header_text(d: &Data, idx: usize) -> String {
    match Cell::from(d).as_text() {
        Some(s) => s,
        None => format!("Unnamed: {}", idx),
    }
}

/// Load the first worksheet of `path` into a [`RawTable`].
#[tracing::instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub fn load_workbook<P: AsRef<Path>>(path: P) -> Result<RawTable> {
    let path = path.as_ref();
    let mut workbook: Xlsx<_> = open_workbook(path)
        .with_context(|| format!("Failed to open workbook: {}", path.display()))?;

    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| anyhow!("workbook {} contains no sheets", path.display()))?;
    let range = workbook
        .worksheet_range(&sheet)
        .with_context(|| format!("Failed to read sheet '{}' of {}", sheet, path.display()))?;

    // calamine's range begins at the first used cell; positions count from A1
    let (first_row, first_col) = range.start().unwrap_or((0, 0));
    let pad = first_col as usize;
    if first_row > 0 || pad > 0 {
        debug!(first_row, first_col, "sheet data does not start at A1");
    }
    let padded = |row: &[Data]| -> Vec<Cell> {
        std::iter::repeat(Cell::Empty)
            .take(pad)
            .chain(row.iter().map(Cell::from))
            .collect()
    };

    // leading blank rows are skipped, the first used row is the header
    let mut rows_iter = range.rows();
    let headers: Vec<String> = (0..pad)
        .map(|i| format!("Unnamed: {}", i))
        .chain(
            rows_iter
                .next()
                .ok_or_else(|| anyhow!("sheet '{}' has no header row", sheet))?
                .iter()
                .enumerate()
                .map(|(i, d)| header_text(d, pad + i)),
        )
        .collect();

    let mut rows = Vec::with_capacity(range.height().saturating_sub(1));
    let mut blank = 0usize;
    for row in rows_iter {
        let cells = padded(row);
        if cells.iter().all(Cell::is_empty) {
            blank += 1;
            continue;
        }
        rows.push(cells);
    }
    if blank > 0 {
        debug!(blank, "skipped blank rows");
    }

    let table = RawTable::new(headers, rows);
    info!(
        sheet = %sheet,
        columns = table.width(),
        rows = table.len(),
        "loaded raw table"
    );
    Ok(table)
}
