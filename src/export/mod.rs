// src/export/mod.rs
use anyhow::{Context, Result};
use arrow::{
    array::{ArrayRef, Float64Array, Int32Array, StringArray},
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use rust_xlsxwriter::{Format, Workbook};
use std::{fs, fs::File, path::Path, sync::Arc};
use tracing::info;

use crate::clean::{CleanRecord, CleanTable, OUTPUT_COLUMNS};

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("creating directory {:?}", dir))?;
    }
    Ok(())
}

/// Write the cleaned table as a single-sheet workbook with a bold header
/// row. NaN values are left as blank cells.
#[tracing::instrument(level = "info", skip(table, path), fields(path = %path.as_ref().display()))]
pub fn write_xlsx<P: AsRef<Path>>(table: &CleanTable, path: P) -> Result<()> {
    let path = path.as_ref();
    ensure_parent(path)?;

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    let bold = Format::new().set_bold();

    for (col, name) in OUTPUT_COLUMNS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *name, &bold)?;
    }

    for (i, rec) in table.iter().enumerate() {
        let row = (i + 1) as u32;
        sheet.write_number(row, 0, rec.year as f64)?;
        if !rec.value.is_nan() {
            sheet.write_number(row, 1, rec.value)?;
        }
        let labels = [
            &rec.units,
            &rec.data_type,
            &rec.sub_data_type,
            &rec.source,
            &rec.sector,
            &rec.sub_info,
        ];
        for (offset, text) in labels.into_iter().enumerate() {
            sheet.write_string(row, (offset + 2) as u16, text.as_str())?;
        }
    }

    workbook
        .save(path)
        .with_context(|| format!("saving workbook {}", path.display()))?;
    info!(rows = table.len(), "saved the cleaned dataset");
    Ok(())
}

/// Arrow schema of the cleaned table, column order as in [`OUTPUT_COLUMNS`].
pub fn clean_schema() -> Schema {
    let fields = OUTPUT_COLUMNS
        .iter()
        .map(|&name| match name {
            "Year" => Field::new(name, DataType::Int32, false),
            "Value" => Field::new(name, DataType::Float64, true),
            _ => Field::new(name, DataType::Utf8, false),
        })
        .collect::<Vec<_>>();
    Schema::new(fields)
}

/// Build one record batch holding the whole table. NaN values become nulls.
pub fn to_record_batch(table: &CleanTable) -> Result<RecordBatch> {
    let strings = |f: fn(&CleanRecord) -> &str| -> ArrayRef {
        Arc::new(StringArray::from_iter_values(table.iter().map(f)))
    };

    let years: ArrayRef = Arc::new(Int32Array::from_iter_values(table.iter().map(|r| r.year)));
    let values: ArrayRef = Arc::new(Float64Array::from_iter(
        table
            .iter()
            .map(|r| (!r.value.is_nan()).then_some(r.value)),
    ));

    let columns = vec![
        years,
        values,
        strings(|r| r.units.as_str()),
        strings(|r| r.data_type.as_str()),
        strings(|r| r.sub_data_type.as_str()),
        strings(|r| r.source.as_str()),
        strings(|r| r.sector.as_str()),
        strings(|r| r.sub_info.as_str()),
    ];

    RecordBatch::try_new(Arc::new(clean_schema()), columns)
        .context("building cleaned record batch")
}

/// Write the cleaned table as a Snappy-compressed Parquet file.
#[tracing::instrument(level = "info", skip(table, path), fields(path = %path.as_ref().display()))]
pub fn write_parquet<P: AsRef<Path>>(table: &CleanTable, path: P) -> Result<()> {
    let path = path.as_ref();
    ensure_parent(path)?;

    let batch = to_record_batch(table)?;
    let file = File::create(path).with_context(|| format!("creating {:?}", path))?;
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))
        .context("creating Arrow writer for cleaned table")?;
    writer.write(&batch).context("writing cleaned batch")?;
    writer.close().context("closing cleaned writer")?;
    info!(rows = batch.num_rows(), "wrote cleaned parquet");
    Ok(())
}
