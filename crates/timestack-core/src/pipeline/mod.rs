pub mod config;
pub mod orchestrator;
pub mod types;

pub use config::PipelineConfig;
pub use orchestrator::{run_pipeline, run_pipeline_reported, run_to_file};
pub use types::{NoOpReporter, PipelineStage, ProgressReporter};
