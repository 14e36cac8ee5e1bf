// src/clean/mod.rs
pub mod layout;
pub mod patch;
pub mod record;

use anyhow::{Context, Result};
use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::load::{Cell, RawTable};
use layout::{check_droppable, ColumnLayout, DROPPED_COLUMNS};
pub use patch::{default_patches, PatchField, PatchTarget, RowPatch};
pub use record::{CleanRecord, CleanTable, OUTPUT_COLUMNS};

pub const MISSING_SOURCE: &str = "total";
pub const MISSING_SECTOR: &str = "all";

/// Categorical columns of one raw row, in their output form.
#[derive(Debug, Clone)]
struct RowLabels {
    units: String,
    data_type: String,
    sub_data_type: String,
    source: String,
    sector: String,
    sub_info: String,
}

impl RowLabels {
    fn from_row(row: &[Cell], layout: &ColumnLayout) -> Self {
        let text = |col: usize| row[col].as_text().unwrap_or_default();
        Self {
            units: text(layout.gunits),
            data_type: text(layout.da_type),
            sub_data_type: text(layout.sub_dat),
            source: text(layout.source),
            sector: text(layout.sector),
            sub_info: format!("{}{}", text(layout.sub_sec), text(layout.sub_src)),
        }
    }
}

/// Clean `raw` with the stock corrections from [`default_patches`].
pub fn clean_table(raw: RawTable) -> Result<CleanTable> {
    clean_table_with(raw, &default_patches())
}

/// Turn the wide raw table into the long cleaned table:
/// 1) drop uninformative columns
/// 2) fill missing Source / Sector
/// 3) apply row patches
/// 4) melt the year columns, one record per (row, year)
/// 5) join each record back to its row's labels, with SubSec+SubSrc as Sub Info
#[tracing::instrument(level = "info", skip_all, fields(rows = raw.len(), patches = patches.len()))]
pub fn clean_table_with(mut raw: RawTable, patches: &[RowPatch]) -> Result<CleanTable> {
    info!("ready to clean the raw dataset");

    // 1) drop columns
    check_droppable(&raw, &DROPPED_COLUMNS)?;
    let dropped = raw
        .drop_columns(&DROPPED_COLUMNS)
        .context("dropping uninformative columns")?;
    debug!(?dropped, "dropped columns");

    let layout = ColumnLayout::resolve(&raw)?;

    // 2) fill missing labels
    let mut filled = (0usize, 0usize);
    for row in &mut raw.rows {
        if row[layout.source].is_empty() {
            row[layout.source] = Cell::text(MISSING_SOURCE);
            filled.0 += 1;
        }
        if row[layout.sector].is_empty() {
            row[layout.sector] = Cell::text(MISSING_SECTOR);
            filled.1 += 1;
        }
    }
    debug!(source = filled.0, sector = filled.1, "filled missing labels");

    // 3) patches
    let touched = patch::apply_patches(&mut raw, &layout, patches)?;
    debug!(touched, "applied row patches");

    warn_duplicate_labels(&raw, &layout);

    // 4) + 5) melt and join back by row
    let labels: Vec<RowLabels> = raw
        .rows
        .iter()
        .map(|r| RowLabels::from_row(r, &layout))
        .collect();

    let mut records = Vec::with_capacity(raw.len() * layout.years.len());
    let mut non_numeric = 0usize;
    for &(year, col) in &layout.years {
        for (row, lbl) in raw.rows.iter().zip(&labels) {
            let cell = &row[col];
            let value = match cell.as_f64() {
                Some(v) => v,
                None => {
                    if !cell.is_empty() {
                        non_numeric += 1;
                    }
                    f64::NAN
                }
            };
            records.push(CleanRecord {
                year,
                value,
                units: lbl.units.clone(),
                data_type: lbl.data_type.clone(),
                sub_data_type: lbl.sub_data_type.clone(),
                source: lbl.source.clone(),
                sector: lbl.sector.clone(),
                sub_info: lbl.sub_info.clone(),
            });
        }
    }
    if non_numeric > 0 {
        warn!(non_numeric, "non-numeric year cells read as NaN");
    }

    info!(records = records.len(), "cleaned long table built");
    Ok(CleanTable { records })
}

fn warn_duplicate_labels(raw: &RawTable, layout: &ColumnLayout) {
    let mut seen: HashMap<String, usize> = HashMap::new();
    for row in &raw.rows {
        if let Some(label) = row[layout.glabel].as_text() {
            *seen.entry(label).or_default() += 1;
        }
    }
    let dupes = seen.values().filter(|&&n| n > 1).count();
    if dupes > 0 {
        warn!(dupes, "GLabel values appear on more than one row");
    }
}
