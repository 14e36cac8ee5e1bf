pub mod clean;
pub mod config;
pub mod derive;
pub mod export;
pub mod load;
pub mod pipeline;
pub mod render;

pub use config::PipelineConfig;
pub use pipeline::{run, RunSummary};
