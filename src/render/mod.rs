// src/render/mod.rs
pub mod charts;
pub mod palette;

use anyhow::{bail, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::{FontDesc, FontFamily, FontStyle};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::derive::PivotTable;

pub const WIDTH: u32 = 600;
pub const HEIGHT: u32 = 400;
pub const X_START: f64 = 2013.0;
pub const X_END: f64 = 2038.0;
/// Last historical year; a divider separates it from the projections.
pub const DIVIDER_YEAR: f64 = 2019.0;

const HEADER_PX: i32 = 56;
const FOOTER_PX: i32 = 48;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    /// One line per table column.
    Lines,
    /// Named columns stacked bottom-up as filled areas.
    Stacked,
}

#[derive(Debug, Clone, Copy)]
pub struct SeriesSpec {
    pub column: &'static str,
    pub color: RGBColor,
}

/// Free text placed in data coordinates.
#[derive(Debug, Clone, Copy)]
pub struct Annotation {
    pub text: &'static str,
    pub x: f64,
    pub y: f64,
    pub color: RGBColor,
    pub size: f64,
}

impl Annotation {
    pub const fn new(text: &'static str, x: f64, y: f64, color: RGBColor, size: f64) -> Self {
        Self {
            text,
            x,
            y,
            color,
            size,
        }
    }
}

/// Everything cosmetic about one chart.
#[derive(Debug, Clone)]
pub struct ChartSpec {
    pub file_name: &'static str,
    pub title: &'static str,
    /// Unit line under the title, set in grey italics.
    pub subtitle: &'static str,
    pub kind: ChartKind,
    pub y_range: (f64, f64),
    pub y_step: f64,
    /// Horizontal grid lines at each y label.
    pub y_grid: bool,
    /// Stacked: the layers, bottom first. Lines: per-column colours.
    pub series: Vec<SeriesSpec>,
    /// Colour for line columns not listed in `series`.
    pub fallback_color: RGBColor,
    pub annotations: Vec<Annotation>,
    /// Footnote, one entry per line.
    pub note: &'static [&'static str],
}

impl ChartSpec {
    pub fn color_for(&self, column: &str) -> RGBColor {
        self.series
            .iter()
            .find(|s| s.column == column)
            .map(|s| s.color)
            .unwrap_or(self.fallback_color)
    }

    pub fn y_label_count(&self) -> usize {
        let (lo, hi) = self.y_range;
        ((hi - lo) / self.y_step).floor() as usize + 1
    }
}

/// Finite `(x, y)` points of one column.
pub fn line_points(table: &PivotTable, column: &str) -> Vec<(f64, f64)> {
    table
        .series(column)
        .unwrap_or_default()
        .into_iter()
        .filter(|(_, v)| v.is_finite())
        .map(|(y, v)| (y as f64, v))
        .collect()
}

/// Cumulative `(x, lower, upper)` bands for each named column, bottom
/// first. Missing or non-finite cells count as zero.
pub fn stack_layers(table: &PivotTable, columns: &[&str]) -> Result<Vec<Vec<(f64, f64, f64)>>> {
    let mut idx = Vec::with_capacity(columns.len());
    for &c in columns {
        match table.column_index(c) {
            Some(i) => idx.push(i),
            None => bail!("stacked chart needs column '{}' in {} pivot", c, table.column_name),
        }
    }

    let mut base = vec![0.0; table.years.len()];
    let mut layers = Vec::with_capacity(idx.len());
    for &c in &idx {
        let mut band = Vec::with_capacity(table.years.len());
        for (r, &year) in table.years.iter().enumerate() {
            let v = table.values[r][c];
            let v = if v.is_finite() { v } else { 0.0 };
            band.push((year as f64, base[r], base[r] + v));
            base[r] += v;
        }
        layers.push(band);
    }
    Ok(layers)
}

/// Draw `table` as described by `spec` into a PNG at `path`.
#[tracing::instrument(level = "info", skip(spec, table, path), fields(chart = spec.file_name))]
pub fn render_chart<P: AsRef<Path>>(spec: &ChartSpec, table: &PivotTable, path: P) -> Result<()> {
    let path = path.as_ref();
    if table.is_empty() {
        warn!("pivot table is empty; chart will only show axes");
    }
    let root = BitMapBackend::new(path, (WIDTH, HEIGHT)).into_drawing_area();
    draw_chart(root, spec, table)?;
    info!(path = %path.display(), "saved chart");
    Ok(())
}

fn draw_chart<DB>(root: DrawingArea<DB, Shift>, spec: &ChartSpec, table: &PivotTable) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    // resolve stacked layers before touching the canvas
    let layers = match spec.kind {
        ChartKind::Stacked => {
            let cols: Vec<&str> = spec.series.iter().map(|s| s.column).collect();
            stack_layers(table, &cols)?
        }
        ChartKind::Lines => Vec::new(),
    };

    root.fill(&WHITE)?;
    let (header, rest) = root.split_vertically(HEADER_PX);
    let (body, footer) = rest.split_vertically(HEIGHT as i32 - HEADER_PX - FOOTER_PX);

    header.draw(&Text::new(
        spec.title,
        (12, 6),
        FontDesc::new(FontFamily::SansSerif, 18.0, FontStyle::Normal).color(&BLACK),
    ))?;
    header.draw(&Text::new(
        spec.subtitle,
        (12, 32),
        FontDesc::new(FontFamily::SansSerif, 15.0, FontStyle::Italic).color(&palette::GREY),
    ))?;

    let (y_lo, y_hi) = spec.y_range;
    let mut chart = ChartBuilder::on(&body)
        .margin(8)
        .x_label_area_size(36)
        .y_label_area_size(48)
        .build_cartesian_2d(X_START..X_END, y_lo..y_hi)?;

    let year_fmt = |x: &f64| format!("{:.0}", x);
    let value_fmt = |y: &f64| format!("{:.0}", y);
    let mut mesh = chart.configure_mesh();
    mesh.disable_x_mesh()
        .light_line_style(&TRANSPARENT)
        .bold_line_style(&palette::LIGHT_GREY)
        .x_labels(6)
        .y_labels(spec.y_label_count())
        .x_label_formatter(&year_fmt)
        .y_label_formatter(&value_fmt)
        .x_desc("Year")
        .label_style(("sans-serif", 14))
        .axis_desc_style(("sans-serif", 16));
    if !spec.y_grid {
        mesh.disable_y_mesh();
    }
    mesh.draw()?;

    match spec.kind {
        ChartKind::Lines => {
            for column in &table.columns {
                let color = spec.color_for(column);
                let points = line_points(table, column);
                debug!(column = %column, points = points.len(), "line");
                chart.draw_series(LineSeries::new(points, color.stroke_width(3)))?;
            }
        }
        ChartKind::Stacked => {
            for (band, series) in layers.iter().zip(&spec.series) {
                let mut outline: Vec<(f64, f64)> = band.iter().map(|&(x, _, hi)| (x, hi)).collect();
                outline.extend(band.iter().rev().map(|&(x, lo, _)| (x, lo)));
                chart.draw_series(std::iter::once(Polygon::new(
                    outline,
                    series.color.filled(),
                )))?;
            }
        }
    }

    chart.draw_series(LineSeries::new(
        vec![(DIVIDER_YEAR, y_lo), (DIVIDER_YEAR, y_hi)],
        BLACK.stroke_width(1),
    ))?;

    chart.draw_series(spec.annotations.iter().map(|a| {
        Text::new(
            a.text,
            (a.x, a.y),
            FontDesc::new(FontFamily::SansSerif, a.size, FontStyle::Normal).color(&a.color),
        )
    }))?;

    for (i, line) in spec.note.iter().enumerate() {
        footer.draw(&Text::new(
            *line,
            (12, 4 + 14 * i as i32),
            FontDesc::new(FontFamily::SansSerif, 11.0, FontStyle::Normal).color(&palette::GREY),
        ))?;
    }

    root.present()?;
    Ok(())
}
