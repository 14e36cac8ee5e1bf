use anyhow::Result;
use rust_xlsxwriter::Workbook;
use std::path::Path;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

pub const FIRST_YEAR: i32 = 2013;
pub const LAST_YEAR: i32 = 2038;
pub const ROWS: usize = 190;

pub const SECTORS: [&str; 5] = [
    "commercial",
    "electric power",
    "industrial",
    "residential",
    "transportation",
];

pub fn init_test_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,energyscreen::clean=debug")),
        )
        .with_test_writer()
        .finish();
    // already set by another test in this binary
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// One fixture row. `None` leaves the cell blank.
pub struct FixtureRow {
    pub glabel: String,
    pub source: Option<&'static str>,
    pub sector: Option<&'static str>,
    pub sub_sec: Option<&'static str>,
    pub sub_src: Option<&'static str>,
    pub da_type: &'static str,
    pub units: &'static str,
    /// Same value in every year column.
    pub value: f64,
}

fn filler(i: usize) -> FixtureRow {
    FixtureRow {
        glabel: format!("g{:03}", i),
        source: Some("filler"),
        sector: Some("misc"),
        sub_sec: Some("part "),
        sub_src: None,
        da_type: "other",
        units: "units",
        value: i as f64,
    }
}

/// Rows laid out so every derivation has something to find:
/// - 0..5   total emissions per sector (Source left blank)
/// - 5..10  total consumption in quads per sector
/// - 10..16 electric power inputs in quads
/// - 16..22 industrial manufacturing inputs
/// - 22     a row without Sector
/// - the rest is filler
pub fn fixture_rows() -> Vec<FixtureRow> {
    let mut rows: Vec<FixtureRow> = (0..ROWS).map(filler).collect();

    for (i, sector) in SECTORS.iter().enumerate() {
        rows[i] = FixtureRow {
            source: None,
            sector: Some(sector),
            sub_sec: None,
            da_type: "emissions",
            units: "MMmt CO2",
            value: 100.0 * (i + 1) as f64,
            ..filler(i)
        };
        rows[5 + i] = FixtureRow {
            source: Some("total"),
            sector: Some(sector),
            sub_sec: None,
            da_type: "consumption",
            units: "quads",
            value: 20.0,
            ..filler(5 + i)
        };
    }

    let power = [
        "natural gas",
        "nuclear",
        "renewable energy",
        "steam coal",
        "distillate fuel oil",
        "residual fuel oil",
    ];
    for (i, src) in power.iter().enumerate() {
        rows[10 + i] = FixtureRow {
            source: Some(src),
            sector: Some("electric power"),
            sub_sec: None,
            da_type: "consumption",
            units: "quads",
            value: 2.0 + i as f64,
            ..filler(10 + i)
        };
    }

    let manufacturing = [
        "biofuels heat and coproducts",
        "coal subtotal",
        "natural gas",
        "petroleum subtotal",
        "purchased electricity",
        "renewables",
    ];
    for (i, src) in manufacturing.iter().enumerate() {
        rows[16 + i] = FixtureRow {
            source: Some(src),
            sector: Some("industrial"),
            sub_sec: Some("manufacturing"),
            da_type: "consumption",
            units: "trillion Btu",
            value: 1000.0 * (i + 1) as f64,
            ..filler(16 + i)
        };
    }

    rows[22].sector = None;
    rows
}

/// Write the fixture as a screening-style workbook: filler columns at
/// positions 0, 3 and 10, numeric year headers, one blank 2020 cell on row 30.
pub fn write_fixture(path: &Path, rows: &[FixtureRow]) -> Result<()> {
    write_fixture_with(path, rows, true)
}

/// As [`write_fixture`]; `index_column: false` leaves column A entirely empty.
pub fn write_fixture_with(path: &Path, rows: &[FixtureRow], index_column: bool) -> Result<()> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    let labels = [
        "", "GLabel", "Source", "Notes", "Sector", "SubSec", "SubSrc", "DaType", "SubDat",
        "Gunits", "Flag",
    ];
    for (c, h) in labels.iter().enumerate() {
        if !h.is_empty() {
            sheet.write_string(0, c as u16, *h)?;
        }
    }
    for (k, year) in (FIRST_YEAR..=LAST_YEAR).enumerate() {
        sheet.write_number(0, (labels.len() + k) as u16, year as f64)?;
    }

    for (i, row) in rows.iter().enumerate() {
        let r = (i + 1) as u32;
        if index_column {
            sheet.write_number(r, 0, i as f64)?;
        }
        sheet.write_string(r, 1, &row.glabel)?;
        let optional = [(2, row.source), (4, row.sector), (5, row.sub_sec), (6, row.sub_src)];
        for (c, v) in optional {
            if let Some(v) = v {
                sheet.write_string(r, c, v)?;
            }
        }
        sheet.write_string(r, 3, "n")?;
        sheet.write_string(r, 7, row.da_type)?;
        sheet.write_string(r, 8, "NA")?;
        sheet.write_string(r, 9, row.units)?;
        sheet.write_string(r, 10, "x")?;
        for (k, year) in (FIRST_YEAR..=LAST_YEAR).enumerate() {
            if i == 30 && year == 2020 {
                continue;
            }
            sheet.write_number(r, (labels.len() + k) as u16, row.value)?;
        }
    }

    workbook.save(path)?;
    Ok(())
}
