// src/render/charts.rs
use plotters::style::RGBColor;

use super::palette::*;
use super::{Annotation, ChartKind, ChartSpec, SeriesSpec};

const SOURCE_LINE: &str = "Data source: Rhodium Group";

fn series(column: &'static str, color: RGBColor) -> SeriesSpec {
    SeriesSpec { column, color }
}

/// "history" / "projections" labels either side of the divider.
fn era_labels(y: f64, history_x: f64, projections_x: f64) -> [Annotation; 2] {
    [
        Annotation::new("projections", projections_x, y, LIGHT_GREY, 14.0),
        Annotation::new("history", history_x, y, LIGHT_GREY, 14.0),
    ]
}

pub fn carbon_intensity() -> ChartSpec {
    let mut annotations = vec![
        Annotation::new("Transportation", 2031.0, 66.7, SALMON, 16.0),
        Annotation::new("Commercial", 2031.0, 43.6, YELLOW_GREEN, 16.0),
        Annotation::new("Residential", 2024.0, 43.3, GOLD, 16.0),
        Annotation::new("Industrial", 2013.5, 42.0, GREY, 16.0),
        Annotation::new("Electric Power", 2030.5, 33.2, LIGHT_BLUE, 16.0),
    ];
    annotations.extend(era_labels(72.5, 2015.7, 2019.2));

    ChartSpec {
        file_name: "carbon intensity by sector.png",
        title: "U.S. carbon intensity of energy use by sector",
        subtitle: "Kilogram CO2 per million Btu",
        kind: ChartKind::Lines,
        y_range: (25.0, 75.0),
        y_step: 10.0,
        y_grid: true,
        series: vec![
            series("commercial", YELLOW_GREEN),
            series("electric power", LIGHT_BLUE),
            series("industrial", GREY),
            series("residential", GOLD),
            series("transportation", SALMON),
        ],
        fallback_color: GREY,
        annotations,
        note: &[
            SOURCE_LINE,
            "Note: Calculated by dividing total emission by total consumption for each sector",
        ],
    }
}

pub fn generation_mix() -> ChartSpec {
    let mut annotations = vec![
        Annotation::new("Natural gas", 2031.0, 5.0, WHITE, 16.0),
        Annotation::new("Nuclear", 2020.0, 15.2, WHITE, 16.0),
        Annotation::new("Renewable energy", 2028.0, 25.0, WHITE, 16.0),
        Annotation::new("Steam coal", 2020.0, 32.0, WHITE, 16.0),
    ];
    annotations.extend(era_labels(43.0, 2015.8, 2019.2));

    ChartSpec {
        file_name: "power generation mix consumption.png",
        title: "U.S. electric power energy consumption by source",
        subtitle: "Quads",
        kind: ChartKind::Stacked,
        y_range: (0.0, 45.0),
        y_step: 5.0,
        y_grid: false,
        series: vec![
            series("natural gas", GOLD),
            series("nuclear", CORAL),
            series("renewable energy", PURPLE),
            series("steam coal", YELLOW_GREEN),
        ],
        fallback_color: GREY,
        annotations,
        note: &[
            SOURCE_LINE,
            "Note: Non-biogenic municipal waste, liquid fuels,",
            "and electricity imports are not included.",
        ],
    }
}

pub fn manufacturing_mix() -> ChartSpec {
    let mut annotations = vec![
        Annotation::new("Natural gas", 2030.0, 8360.0, GOLD, 16.0),
        Annotation::new("Renewables", 2030.0, 3400.0, GREEN, 16.0),
        Annotation::new("Other sources", 2030.0, 1800.0, GREY, 16.0),
    ];
    annotations.extend(era_labels(8650.0, 2015.8, 2019.3));

    ChartSpec {
        file_name: "manufacturing consumption by source.png",
        title: "Energy consumption in industrial manufacturing",
        subtitle: "Trillion Btu",
        kind: ChartKind::Lines,
        y_range: (400.0, 9100.0),
        y_step: 1000.0,
        y_grid: true,
        // natural gas and renewables are highlighted, the rest stay grey
        series: vec![series("natural gas", GOLD), series("renewables", GREEN)],
        fallback_color: GREY,
        annotations,
        note: &[
            SOURCE_LINE,
            "Note: Other sources include biofuels heat and coproducts,",
            "coal, petroleum, purchased electricity",
        ],
    }
}

pub fn sector_emissions() -> ChartSpec {
    ChartSpec {
        file_name: "emission by sector.png",
        title: "U.S. emission by Sector",
        subtitle: "Million Btu",
        kind: ChartKind::Stacked,
        y_range: (600.0, 6800.0),
        y_step: 1000.0,
        y_grid: false,
        series: vec![
            series("commercial", YELLOW_GREEN),
            series("industrial", GREY),
            series("residential", GOLD),
            series("transportation", SALMON),
        ],
        fallback_color: GREY,
        annotations: era_labels(6600.0, 2015.8, 2019.3).to_vec(),
        note: &[
            SOURCE_LINE,
            "Note: Sectors are color coded the same way as figure",
            "on carbon intensity, excluding electric power",
        ],
    }
}

pub fn all() -> Vec<ChartSpec> {
    vec![
        carbon_intensity(),
        generation_mix(),
        manufacturing_mix(),
        sector_emissions(),
    ]
}
