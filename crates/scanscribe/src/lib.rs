pub mod config;
pub mod error;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod processor;
pub mod sanitize;

pub use config::{load_config, load_config_from_str, validate_config, Config, OcrConfig};
pub use error::{ConfigError, OutputError, ProcessError, Result, ScanscribeError};
pub use model::{DocumentOutcome, PageImage, PageRecord, RecordMetadata, TextLine};
pub use output::ResultCollection;
pub use pipeline::{Pipeline, PipelineConfig, RunReport, RunSummary};
