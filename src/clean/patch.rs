// src/clean/patch.rs
use anyhow::{bail, Result};
use std::fmt;
use tracing::{debug, warn};

use super::layout::ColumnLayout;
use crate::load::{Cell, RawTable};

/// How a patch finds its row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchTarget {
    /// 0-based data row position. Resolved to the row's GLabel before use.
    Row(usize),
    /// Every row whose GLabel equals this value.
    Label(String),
}

impl fmt::Display for PatchTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatchTarget::Row(r) => write!(f, "row {}", r),
            PatchTarget::Label(l) => write!(f, "GLabel '{}'", l),
        }
    }
}

/// Categorical column a patch overwrites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchField {
    Source,
    SubSrc,
}

impl PatchField {
    fn column(self, layout: &ColumnLayout) -> usize {
        match self {
            PatchField::Source => layout.source,
            PatchField::SubSrc => layout.sub_src,
        }
    }
}

/// A manual correction to one categorical cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowPatch {
    pub target: PatchTarget,
    pub field: PatchField,
    pub value: String,
}

impl RowPatch {
    pub fn at_row(row: usize, field: PatchField, value: &str) -> Self {
        Self {
            target: PatchTarget::Row(row),
            field,
            value: value.to_string(),
        }
    }

    pub fn at_label(label: &str, field: PatchField, value: &str) -> Self {
        Self {
            target: PatchTarget::Label(label.to_string()),
            field,
            value: value.to_string(),
        }
    }
}

/// Corrections for the screening workbook: two vehicle totals whose Source
/// is ambiguous, and four rows missing their sub-source.
pub fn default_patches() -> Vec<RowPatch> {
    vec![
        RowPatch::at_row(143, PatchField::Source, "total vehicle"),
        RowPatch::at_row(144, PatchField::Source, "total alternative vehicle"),
        RowPatch::at_row(99, PatchField::SubSrc, "at"),
        RowPatch::at_row(121, PatchField::SubSrc, "light water"),
        RowPatch::at_row(172, PatchField::SubSrc, "delivered total"),
        RowPatch::at_row(187, PatchField::SubSrc, "delivered total"),
    ]
}

/// Rows selected by `target`.
fn resolve(table: &RawTable, layout: &ColumnLayout, target: &PatchTarget) -> Result<Vec<usize>> {
    match target {
        PatchTarget::Row(r) => {
            if *r >= table.len() {
                bail!("patch {} out of range (table has {} rows)", target, table.len());
            }
            Ok(vec![*r])
        }
        PatchTarget::Label(label) => {
            let rows: Vec<usize> = table
                .rows
                .iter()
                .enumerate()
                .filter(|(_, row)| row[layout.glabel].as_text().as_deref() == Some(label.as_str()))
                .map(|(i, _)| i)
                .collect();
            if rows.is_empty() {
                bail!("patch {} matches no row", target);
            }
            Ok(rows)
        }
    }
}

/// Apply `patches` in order. Every target is resolved against the table as
/// it stood before any patch, so positional and label patches cannot
/// disagree about which row they mean.
pub fn apply_patches(
    table: &mut RawTable,
    layout: &ColumnLayout,
    patches: &[RowPatch],
) -> Result<usize> {
    let mut resolved = Vec::with_capacity(patches.len());
    for patch in patches {
        let rows = resolve(table, layout, &patch.target)?;
        if let PatchTarget::Row(r) = patch.target {
            match table.rows[r][layout.glabel].as_text() {
                Some(label) => debug!(row = r, glabel = %label, "positional patch resolved"),
                None => warn!(row = r, "positional patch targets a row without GLabel"),
            }
        }
        resolved.push((rows, patch));
    }

    let mut touched = 0;
    for (rows, patch) in resolved {
        let col = patch.field.column(layout);
        for r in rows {
            table.rows[r][col] = Cell::text(patch.value.as_str());
            touched += 1;
        }
    }
    Ok(touched)
}
