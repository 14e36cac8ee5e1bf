use anyhow::{anyhow, bail, Context, Result};
use arrow::array::{Array, Float64Array, Int32Array, StringArray};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use std::{collections::BTreeMap, env, fs::File, path::Path};

fn main() -> Result<()> {
    // Expect exactly one CLI argument: path to a cleaned Parquet file.
    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        bail!("Usage: {} <CLEANED_PARQUET>", args[0]);
    }
    inspect_cleaned(Path::new(&args[1]))
}

fn column<'a, T: 'static>(batch: &'a RecordBatch, name: &str) -> Result<&'a T> {
    batch
        .column_by_name(name)
        .ok_or_else(|| anyhow!("column '{}' missing", name))?
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| anyhow!("column '{}' has unexpected type", name))
}

/// Print file metadata, the Arrow schema, and row counts per Data Type.
fn inspect_cleaned(path: &Path) -> Result<()> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;

    let meta = builder.metadata().file_metadata();
    println!("=== Cleaned file: {} ===", path.display());
    println!("Created by:           {}", meta.created_by().unwrap_or("<unknown>"));
    println!("Total rows:           {}", meta.num_rows());
    println!("Number of row groups: {}", builder.metadata().num_row_groups());
    println!();

    println!("=== Columns ===");
    for field in builder.schema().fields() {
        println!(
            "- {:<15} | {:?}{}",
            field.name(),
            field.data_type(),
            if field.is_nullable() { " (nullable)" } else { "" }
        );
    }
    println!();

    let mut by_type: BTreeMap<String, usize> = BTreeMap::new();
    let mut years = (i32::MAX, i32::MIN);
    let mut blank_values = 0usize;
    for batch in builder.build()? {
        let batch = batch?;
        let data_type = column::<StringArray>(&batch, "Data Type")?;
        let year = column::<Int32Array>(&batch, "Year")?;
        let value = column::<Float64Array>(&batch, "Value")?;

        blank_values += value.null_count();
        for i in 0..batch.num_rows() {
            *by_type.entry(data_type.value(i).to_string()).or_default() += 1;
            years.0 = years.0.min(year.value(i));
            years.1 = years.1.max(year.value(i));
        }
    }

    println!("=== Rows per Data Type ===");
    for (ty, n) in &by_type {
        let label = if ty.is_empty() { "<blank>" } else { ty.as_str() };
        println!("- {:<30} {}", label, n);
    }
    println!();
    if years.0 <= years.1 {
        println!("Years:        {}..={}", years.0, years.1);
    }
    println!("Blank values: {}", blank_values);
    Ok(())
}
