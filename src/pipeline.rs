// src/pipeline.rs
use anyhow::{Context, Result};
use std::{fs, path::PathBuf, time::Instant};
use tracing::info;

use crate::{
    clean::{clean_table, CleanTable},
    config::PipelineConfig,
    derive::{self, PivotTable},
    export,
    load::load_workbook,
    render::{self, charts, ChartSpec},
};

/// What a run produced.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub raw_rows: usize,
    pub clean_rows: usize,
    pub cleaned_xlsx: PathBuf,
    pub cleaned_parquet: PathBuf,
    pub charts: Vec<PathBuf>,
}

/// Load, clean and persist the cleaned table. Returns the table for the
/// derivation steps.
pub fn prepare(config: &PipelineConfig, summary: &mut RunSummary) -> Result<CleanTable> {
    let raw = load_workbook(config.input_path())?;
    summary.raw_rows = raw.len();

    let clean = clean_table(raw).context("cleaning raw table")?;
    summary.clean_rows = clean.len();

    summary.cleaned_xlsx = config.cleaned_xlsx_path();
    export::write_xlsx(&clean, &summary.cleaned_xlsx)?;
    summary.cleaned_parquet = config.cleaned_parquet_path();
    export::write_parquet(&clean, &summary.cleaned_parquet)?;
    Ok(clean)
}

/// Every derived table paired with the chart that draws it.
pub fn derive_all(clean: &CleanTable) -> Vec<(ChartSpec, PivotTable)> {
    vec![
        (charts::carbon_intensity(), derive::carbon_intensity(clean)),
        (charts::generation_mix(), derive::generation_mix(clean)),
        (charts::manufacturing_mix(), derive::manufacturing_mix(clean)),
        (charts::sector_emissions(), derive::sector_emissions(clean)),
    ]
}

/// load → clean → export → {derive → render} × 4
#[tracing::instrument(level = "info", skip_all)]
pub fn run(config: &PipelineConfig) -> Result<RunSummary> {
    let start = Instant::now();
    info!(data_dir = %config.data_dir.display(), "raw data directory");

    let mut summary = RunSummary::default();
    let clean = prepare(config, &mut summary)?;

    fs::create_dir_all(&config.chart_dir)
        .with_context(|| format!("creating chart directory {:?}", config.chart_dir))?;
    for (spec, table) in derive_all(&clean) {
        let path = config.chart_dir.join(spec.file_name);
        render::render_chart(&spec, &table, &path)
            .with_context(|| format!("rendering {}", spec.file_name))?;
        summary.charts.push(path);
    }

    info!(
        raw_rows = summary.raw_rows,
        clean_rows = summary.clean_rows,
        charts = summary.charts.len(),
        elapsed = ?start.elapsed(),
        "pipeline complete"
    );
    Ok(summary)
}
