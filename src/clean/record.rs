// src/clean/record.rs

/// Output column names, in the order they are written.
pub const OUTPUT_COLUMNS: [&str; 8] = [
    "Year",
    "Value",
    "Units",
    "Data Type",
    "Sub Data Type",
    "Source",
    "Sector",
    "Sub Info",
];

/// One observation of the cleaned long table.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanRecord {
    pub year: i32,
    /// NaN when the source cell was blank.
    pub value: f64,
    pub units: String,
    pub data_type: String,
    pub sub_data_type: String,
    pub source: String,
    pub sector: String,
    /// SubSec and SubSrc concatenated.
    pub sub_info: String,
}

/// The cleaned long-form table, one record per (categorical row, year).
#[derive(Debug, Clone, Default)]
pub struct CleanTable {
    pub records: Vec<CleanRecord>,
}

impl CleanTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CleanRecord> {
        self.records.iter()
    }

    /// Records matching `pred`, in table order.
    pub fn select(&self, pred: impl Fn(&CleanRecord) -> bool) -> Vec<&CleanRecord> {
        self.records.iter().filter(|&r| pred(r)).collect()
    }
}

impl<'a> IntoIterator for &'a CleanTable {
    type Item = &'a CleanRecord;
    type IntoIter = std::slice::Iter<'a, CleanRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
