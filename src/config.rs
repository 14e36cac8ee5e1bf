// src/config.rs

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};
use tracing::info;

/// File read from the working directory when present.
pub const CONFIG_FILE: &str = "energyscreen.json";

/// Where the pipeline reads its input and writes its outputs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PipelineConfig {
    pub data_dir: PathBuf,
    pub input_file: String,
    pub cleaned_xlsx: String,
    pub cleaned_parquet: String,
    /// Charts land here; the working directory by default.
    pub chart_dir: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            input_file: "data_for_tech_screen.xlsx".into(),
            cleaned_xlsx: "data_cleaned.xlsx".into(),
            cleaned_parquet: "data_cleaned.parquet".into(),
            chart_dir: PathBuf::from("."),
        }
    }
}

impl PipelineConfig {
    /// Read `path` as JSON if it exists, otherwise fall back to the defaults.
    /// Keys left out of the file keep their default value.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let file =
            File::open(path).with_context(|| format!("opening config {}", path.display()))?;
        let cfg: Self = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("parsing config {}", path.display()))?;
        info!(path = %path.display(), "loaded config overrides");
        Ok(cfg)
    }

    pub fn input_path(&self) -> PathBuf {
        self.data_dir.join(&self.input_file)
    }

    pub fn cleaned_xlsx_path(&self) -> PathBuf {
        self.data_dir.join(&self.cleaned_xlsx)
    }

    pub fn cleaned_parquet_path(&self) -> PathBuf {
        self.data_dir.join(&self.cleaned_parquet)
    }
}
