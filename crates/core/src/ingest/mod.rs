//! Ingestion module - run configuration, per-kind pipelines and the driver.

mod config;
mod driver;
mod pipeline;
mod stage;


pub use config::IngestConfig;
pub use driver::{IngestDriver, RunReport};
pub use pipeline::{run_pipeline, PipelineReport};
pub use stage::IngestStage;
