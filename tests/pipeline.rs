mod common;

use anyhow::Result;
use arrow::array::{Array, Float64Array, StringArray};
use calamine::{open_workbook, Data, Reader, Xlsx};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use std::fs::File;
use tempfile::tempdir;

use common::{
    fixture_rows, init_test_logging, write_fixture, write_fixture_with, FIRST_YEAR, LAST_YEAR,
    ROWS,
};
use energyscreen::{
    clean::OUTPUT_COLUMNS,
    pipeline::{derive_all, prepare, RunSummary},
    PipelineConfig,
};

const YEARS: usize = (LAST_YEAR - FIRST_YEAR + 1) as usize;

fn config_in(dir: &std::path::Path) -> PipelineConfig {
    PipelineConfig {
        data_dir: dir.join("data"),
        chart_dir: dir.to_path_buf(),
        ..PipelineConfig::default()
    }
}

fn fixture_config(dir: &std::path::Path) -> Result<PipelineConfig> {
    let config = config_in(dir);
    std::fs::create_dir_all(&config.data_dir)?;
    write_fixture(&config.input_path(), &fixture_rows())?;
    Ok(config)
}

#[test]
fn prepare_cleans_and_persists() -> Result<()> {
    init_test_logging();
    let tmp = tempdir()?;
    let config = fixture_config(tmp.path())?;

    let mut summary = RunSummary::default();
    let clean = prepare(&config, &mut summary)?;

    assert_eq!(summary.raw_rows, ROWS);
    assert_eq!(clean.len(), ROWS * YEARS);
    assert_eq!(summary.clean_rows, clean.len());
    assert!(summary.cleaned_xlsx.exists());
    assert!(summary.cleaned_parquet.exists());

    for r in &clean {
        assert!((FIRST_YEAR..=LAST_YEAR).contains(&r.year));
        assert!(!r.source.is_empty());
        assert!(!r.sector.is_empty());
        // "NA" in SubDat loads as missing
        assert_eq!(r.sub_data_type, "");
    }
    Ok(())
}

#[test]
fn stock_patches_land_on_their_rows() -> Result<()> {
    init_test_logging();
    let tmp = tempdir()?;
    let config = fixture_config(tmp.path())?;
    let clean = prepare(&config, &mut RunSummary::default())?;

    // records are year-major: row i of year k sits at k * ROWS + i
    let at = |row: usize| (0..YEARS).map(move |k| k * ROWS + row);
    for i in at(143) {
        assert_eq!(clean.records[i].source, "total vehicle");
    }
    for i in at(144) {
        assert_eq!(clean.records[i].source, "total alternative vehicle");
    }
    for i in at(99) {
        assert_eq!(clean.records[i].sub_info, "part at");
    }
    for i in at(121) {
        assert_eq!(clean.records[i].sub_info, "part light water");
    }
    for row in [172, 187] {
        for i in at(row) {
            assert_eq!(clean.records[i].sub_info, "part delivered total");
        }
    }
    // untouched neighbour
    assert_eq!(clean.records[142].source, "filler");
    Ok(())
}

#[test]
fn empty_first_column_still_cleans() -> Result<()> {
    init_test_logging();
    let tmp = tempdir()?;
    let config = config_in(tmp.path());
    std::fs::create_dir_all(&config.data_dir)?;
    write_fixture_with(&config.input_path(), &fixture_rows(), false)?;

    let mut summary = RunSummary::default();
    let clean = prepare(&config, &mut summary)?;
    assert_eq!(summary.raw_rows, ROWS);
    assert_eq!(clean.len(), ROWS * YEARS);
    assert_eq!(clean.records[143].source, "total vehicle");
    Ok(())
}

#[test]
fn missing_labels_are_filled_from_workbook() -> Result<()> {
    init_test_logging();
    let tmp = tempdir()?;
    let config = fixture_config(tmp.path())?;
    let clean = prepare(&config, &mut RunSummary::default())?;

    // rows 0..5 carry no Source, row 22 no Sector
    assert_eq!(clean.records[0].source, "total");
    assert_eq!(clean.records[22].sector, "all");
    assert_eq!(clean.records[0].year, FIRST_YEAR);
    assert_eq!(clean.records[ROWS].year, FIRST_YEAR + 1);
    Ok(())
}

#[test]
fn cleaned_xlsx_reads_back() -> Result<()> {
    init_test_logging();
    let tmp = tempdir()?;
    let config = fixture_config(tmp.path())?;
    let mut summary = RunSummary::default();
    prepare(&config, &mut summary)?;

    let mut wb: Xlsx<_> = open_workbook(&summary.cleaned_xlsx)?;
    let sheet = wb.sheet_names()[0].clone();
    let range = wb.worksheet_range(&sheet)?;
    let mut rows = range.rows();

    let header: Vec<String> = rows
        .next()
        .expect("header row")
        .iter()
        .map(|c| c.to_string())
        .collect();
    assert_eq!(header, OUTPUT_COLUMNS);

    let body: Vec<&[Data]> = rows.collect();
    assert_eq!(body.len(), ROWS * YEARS);
    for row in &body {
        // Sector sits in column 6
        assert!(!row[6].to_string().is_empty());
    }
    // the blank 2020 cell of row 30 stays blank
    let k2020 = (2020 - FIRST_YEAR) as usize;
    assert!(matches!(body[k2020 * ROWS + 30][1], Data::Empty));
    Ok(())
}

#[test]
fn cleaned_parquet_reads_back() -> Result<()> {
    init_test_logging();
    let tmp = tempdir()?;
    let config = fixture_config(tmp.path())?;
    let mut summary = RunSummary::default();
    prepare(&config, &mut summary)?;

    let reader = ParquetRecordBatchReaderBuilder::try_new(File::open(&summary.cleaned_parquet)?)?
        .build()?;
    let mut rows = 0;
    let mut nulls = 0;
    for batch in reader {
        let batch = batch?;
        let names: Vec<String> = batch
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect();
        assert_eq!(names, OUTPUT_COLUMNS);

        let value = batch
            .column_by_name("Value")
            .and_then(|c| c.as_any().downcast_ref::<Float64Array>())
            .expect("Value column");
        let sector = batch
            .column_by_name("Sector")
            .and_then(|c| c.as_any().downcast_ref::<StringArray>())
            .expect("Sector column");
        nulls += value.null_count();
        assert_eq!(sector.null_count(), 0);
        rows += batch.num_rows();
    }
    assert_eq!(rows, ROWS * YEARS);
    assert_eq!(nulls, 1);
    Ok(())
}

#[test]
fn derived_tables_from_workbook() -> Result<()> {
    init_test_logging();
    let tmp = tempdir()?;
    let config = fixture_config(tmp.path())?;
    let clean = prepare(&config, &mut RunSummary::default())?;

    let derived = derive_all(&clean);
    assert_eq!(derived.len(), 4);
    let by_chart = |name: &str| {
        derived
            .iter()
            .find(|(spec, _)| spec.file_name == name)
            .map(|(_, t)| t)
            .expect("chart present")
    };

    // emissions 300 (industrial is the third sector) over 20 quads
    let ci = by_chart("carbon intensity by sector.png");
    assert_eq!(ci.get(2020, "industrial"), Some(15.0));
    assert_eq!(ci.get(2030, "commercial"), Some(5.0));
    assert_eq!(ci.columns.len(), 5);
    assert_eq!(ci.years.len(), YEARS);

    let mix = by_chart("power generation mix consumption.png");
    assert_eq!(
        mix.columns,
        vec!["natural gas", "nuclear", "renewable energy", "steam coal"]
    );

    let mfg = by_chart("manufacturing consumption by source.png");
    assert_eq!(mfg.years.first(), Some(&(FIRST_YEAR + 1)));
    assert_eq!(mfg.columns.len(), 6);
    assert_eq!(mfg.get(2025, "renewables"), Some(6000.0));

    let emis = by_chart("emission by sector.png");
    assert_eq!(emis.get(2013, "transportation"), Some(500.0));
    Ok(())
}

#[test]
#[ignore = "needs system fonts to draw chart text"]
fn full_run_writes_four_charts() -> Result<()> {
    init_test_logging();
    let tmp = tempdir()?;
    let config = fixture_config(tmp.path())?;
    let summary = energyscreen::run(&config)?;
    assert_eq!(summary.charts.len(), 4);
    for chart in &summary.charts {
        assert!(chart.exists(), "{} missing", chart.display());
    }
    Ok(())
}

#[test]
fn missing_input_is_an_error() {
    init_test_logging();
    let tmp = tempdir().expect("tempdir");
    let config = config_in(tmp.path());
    let err = prepare(&config, &mut RunSummary::default()).unwrap_err();
    assert!(format!("{:#}", err).contains("data_for_tech_screen.xlsx"));
}
