// src/clean/layout.rs
use anyhow::{anyhow, bail, Result};

use crate::load::{utils::parse_year_header, RawTable};

pub const FIRST_YEAR: i32 = 2013;
pub const LAST_YEAR: i32 = 2038;

/// Raw column positions carrying nothing the output needs.
pub const DROPPED_COLUMNS: [usize; 3] = [0, 3, 10];

pub const GLABEL: &str = "GLabel";
pub const SOURCE: &str = "Source";
pub const SECTOR: &str = "Sector";
pub const SUB_SEC: &str = "SubSec";
pub const SUB_SRC: &str = "SubSrc";
pub const DA_TYPE: &str = "DaType";
pub const SUB_DAT: &str = "SubDat";
pub const GUNITS: &str = "Gunits";

/// Columns the cleaner reads by name.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    GLABEL, SOURCE, SECTOR, SUB_SEC, SUB_SRC, DA_TYPE, SUB_DAT, GUNITS,
];

pub fn year_count() -> usize {
    (LAST_YEAR - FIRST_YEAR + 1) as usize
}

/// Positions of every column the cleaner touches, resolved by header name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLayout {
    pub glabel: usize,
    pub source: usize,
    pub sector: usize,
    pub sub_sec: usize,
    pub sub_src: usize,
    pub da_type: usize,
    pub sub_dat: usize,
    pub gunits: usize,
    /// `(year, column)` for FIRST_YEAR..=LAST_YEAR, ascending.
    pub years: Vec<(i32, usize)>,
}

impl ColumnLayout {
    pub fn resolve(table: &RawTable) -> Result<Self> {
        let idx = |name: &str| {
            table
                .column_index(name)
                .ok_or_else(|| anyhow!("raw table is missing required column {}", name))
        };

        let mut years = Vec::with_capacity(year_count());
        for year in FIRST_YEAR..=LAST_YEAR {
            match table
                .headers
                .iter()
                .position(|h| parse_year_header(h, year, year).is_some())
            {
                Some(col) => years.push((year, col)),
                None => bail!("raw table has no column for year {}", year),
            }
        }

        Ok(Self {
            glabel: idx(GLABEL)?,
            source: idx(SOURCE)?,
            sector: idx(SECTOR)?,
            sub_sec: idx(SUB_SEC)?,
            sub_src: idx(SUB_SRC)?,
            da_type: idx(DA_TYPE)?,
            sub_dat: idx(SUB_DAT)?,
            gunits: idx(GUNITS)?,
            years,
        })
    }
}

/// Refuse to drop a column the cleaner needs later on.
pub fn check_droppable(table: &RawTable, positions: &[usize]) -> Result<()> {
    for &p in positions {
        let Some(name) = table.headers.get(p) else {
            bail!(
                "column position {} out of range (table has {} columns)",
                p,
                table.width()
            );
        };
        if REQUIRED_COLUMNS.contains(&name.as_str())
            || parse_year_header(name, FIRST_YEAR, LAST_YEAR).is_some()
        {
            bail!("refusing to drop column {} ('{}'): it is required", p, name);
        }
    }
    Ok(())
}
