// src/derive/pivot.rs
use std::collections::{BTreeMap, BTreeSet};

/// A wide table keyed by year, one numeric column per category value.
/// Missing cells are NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotTable {
    /// Name of the category the columns come from, e.g. "Sector".
    pub column_name: String,
    pub years: Vec<i32>,
    pub columns: Vec<String>,
    /// Row-major: `values[row][col]`.
    pub values: Vec<Vec<f64>>,
}

impl PivotTable {
    /// Pivot `(year, category, value)` observations. Each cell is the mean
    /// of its non-NaN observations; rows and then columns that end up all
    /// NaN are dropped. Years ascend, columns sort lexicographically.
    pub fn from_observations<I, S>(column_name: &str, obs: I) -> Self
    where
        I: IntoIterator<Item = (i32, S, f64)>,
        S: Into<String>,
    {
        let mut sums: BTreeMap<(i32, String), (f64, usize)> = BTreeMap::new();
        let mut all_columns = BTreeSet::new();
        for (year, cat, value) in obs {
            let cat = cat.into();
            all_columns.insert(cat.clone());
            let entry = sums.entry((year, cat)).or_insert((0.0, 0));
            if !value.is_nan() {
                entry.0 += value;
                entry.1 += 1;
            }
        }

        let columns: Vec<String> = all_columns.into_iter().collect();
        let mut rows: BTreeMap<i32, Vec<f64>> = BTreeMap::new();
        for ((year, cat), (sum, n)) in sums {
            let row = rows
                .entry(year)
                .or_insert_with(|| vec![f64::NAN; columns.len()]);
            if n > 0 {
                // columns is sorted and holds every category seen
                if let Ok(c) = columns.binary_search(&cat) {
                    row[c] = sum / n as f64;
                }
            }
        }
        rows.retain(|_, r| r.iter().any(|v| !v.is_nan()));

        let keep: Vec<usize> = (0..columns.len())
            .filter(|&c| rows.values().any(|r| !r[c].is_nan()))
            .collect();

        Self {
            column_name: column_name.to_string(),
            years: rows.keys().copied().collect(),
            columns: keep.iter().map(|&c| columns[c].clone()).collect(),
            values: rows
                .into_values()
                .map(|r| keep.iter().map(|&c| r[c]).collect())
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Value at (`year`, `column`), `None` if either is absent or the cell is NaN.
    pub fn get(&self, year: i32, column: &str) -> Option<f64> {
        let r = self.years.iter().position(|&y| y == year)?;
        let c = self.column_index(column)?;
        let v = self.values[r][c];
        (!v.is_nan()).then_some(v)
    }

    /// `(year, value)` pairs of one column, NaN cells included.
    pub fn series(&self, column: &str) -> Option<Vec<(i32, f64)>> {
        let c = self.column_index(column)?;
        Some(
            self.years
                .iter()
                .zip(&self.values)
                .map(|(&y, row)| (y, row[c]))
                .collect(),
        )
    }

    /// Drop the earliest year.
    pub fn drop_first_row(&mut self) {
        if !self.years.is_empty() {
            self.years.remove(0);
            self.values.remove(0);
        }
    }
}
