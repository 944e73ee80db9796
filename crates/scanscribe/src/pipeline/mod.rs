pub mod config;
pub mod context;
pub mod error;
pub mod progress;
pub mod runner;
pub mod summary;

pub use config::PipelineConfig;
pub use context::{DocumentContext, DocumentDisposition, DocumentReport};
pub use error::{PipelineWarning, SkipReason};
pub use progress::{NoopProgress, ProgressEvent, ProgressReporter, TracingProgress};
pub use runner::{Pipeline, RunReport};
pub use summary::RunSummary;
