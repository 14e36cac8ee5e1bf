// src/derive/mod.rs
pub mod pivot;

use std::collections::HashMap;
use tracing::{debug, info};

use crate::clean::{CleanRecord, CleanTable};
pub use pivot::PivotTable;

pub const EMISSIONS_UNITS: &str = "MMmt CO2";
pub const ENERGY_UNITS: &str = "quads";

/// Sources left out of the power-sector mix: oil products are negligible and
/// "total" double counts the rest.
pub const GENERATION_EXCLUDED: [&str; 3] = ["distillate fuel oil", "residual fuel oil", "total"];

/// Sources that make up industrial manufacturing energy use.
pub const MANUFACTURING_SOURCES: [&str; 6] = [
    "biofuels heat and coproducts",
    "coal subtotal",
    "natural gas",
    "petroleum subtotal",
    "purchased electricity",
    "renewables",
];

// ─── predicates ──────────────────────────────────────────────────────

pub fn is_total_emissions_mmt(r: &CleanRecord) -> bool {
    r.units == EMISSIONS_UNITS && r.source == "total"
}

pub fn is_total_consumption_quads(r: &CleanRecord) -> bool {
    r.data_type == "consumption" && r.source == "total" && r.units == ENERGY_UNITS
}

pub fn is_power_generation_input(r: &CleanRecord) -> bool {
    r.units == ENERGY_UNITS
        && r.sector == "electric power"
        && !GENERATION_EXCLUDED.contains(&r.source.as_str())
}

pub fn is_manufacturing_input(r: &CleanRecord) -> bool {
    r.sector == "industrial"
        && r.sub_info == "manufacturing"
        && MANUFACTURING_SOURCES.contains(&r.source.as_str())
}

pub fn is_sector_emissions(r: &CleanRecord) -> bool {
    r.source == "total" && r.data_type == "emissions"
}

// ─── carbon intensity ────────────────────────────────────────────────

/// One joined (Year, Sector) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct CarbonIntensityRow {
    pub year: i32,
    pub sector: String,
    /// Emis.mmt
    pub emissions_mmt: f64,
    /// Cons.quads
    pub consumption_quads: f64,
    /// Cint.kg.MMBTU; million metric tons per quad is kg per million Btu.
    pub intensity_kg_mmbtu: f64,
}

/// Inner-join total emissions with total consumption on (Year, Sector) and
/// divide. Pairs present on only one side are dropped; repeated keys yield
/// every combination, in emissions order.
pub fn carbon_intensity_rows(table: &CleanTable) -> Vec<CarbonIntensityRow> {
    let mut consumption: HashMap<(i32, &str), Vec<f64>> = HashMap::new();
    for r in table.select(is_total_consumption_quads) {
        consumption
            .entry((r.year, r.sector.as_str()))
            .or_default()
            .push(r.value);
    }

    let mut out = Vec::new();
    for e in table.select(is_total_emissions_mmt) {
        let Some(cons) = consumption.get(&(e.year, e.sector.as_str())) else {
            continue;
        };
        for &c in cons {
            out.push(CarbonIntensityRow {
                year: e.year,
                sector: e.sector.clone(),
                emissions_mmt: e.value,
                consumption_quads: c,
                intensity_kg_mmbtu: e.value / c,
            });
        }
    }
    debug!(pairs = out.len(), "joined emissions with consumption");
    out
}

/// Carbon intensity, Year × Sector.
pub fn carbon_intensity(table: &CleanTable) -> PivotTable {
    let rows = carbon_intensity_rows(table);
    let p = PivotTable::from_observations(
        "Sector",
        rows.into_iter().map(|r| (r.year, r.sector, r.intensity_kg_mmbtu)),
    );
    info!(years = p.years.len(), sectors = p.columns.len(), "carbon intensity");
    p
}

fn pivot_values<'a>(
    records: impl IntoIterator<Item = &'a CleanRecord>,
    column_name: &str,
    key: fn(&CleanRecord) -> &str,
) -> PivotTable {
    PivotTable::from_observations(
        column_name,
        records
            .into_iter()
            .map(|r| (r.year, key(r).to_string(), r.value)),
    )
}

/// Electric power energy consumption, Year × Source.
pub fn generation_mix(table: &CleanTable) -> PivotTable {
    let p = pivot_values(table.select(is_power_generation_input), "Source", |r| {
        r.source.as_str()
    });
    info!(years = p.years.len(), sources = p.columns.len(), "generation mix");
    p
}

/// Industrial manufacturing energy consumption, Year × Source, without 2013.
pub fn manufacturing_mix(table: &CleanTable) -> PivotTable {
    let mut p = pivot_values(table.select(is_manufacturing_input), "Source", |r| {
        r.source.as_str()
    });
    p.drop_first_row();
    info!(years = p.years.len(), sources = p.columns.len(), "manufacturing mix");
    p
}

/// Total emissions, Year × Sector.
pub fn sector_emissions(table: &CleanTable) -> PivotTable {
    let p = pivot_values(table.select(is_sector_emissions), "Sector", |r| {
        r.sector.as_str()
    });
    info!(years = p.years.len(), sectors = p.columns.len(), "sector emissions");
    p
}
