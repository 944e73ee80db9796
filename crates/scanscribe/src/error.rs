use std::path::PathBuf;
use thiserror::Error;

use crate::sanitize::redact_path;

#[derive(Error, Debug)]
pub enum ScanscribeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Processing error: {0}")]
    Process(#[from] ProcessError),

    #[error("Output error: {0}")]
    Output(#[from] OutputError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },
}

/// Failures inside a single document's processing. None of these abort a batch.
///
/// These end up in log lines, so messages name files without their directories.
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Document not found: {}", redact_path(.path))]
    DocumentNotFound { path: PathBuf },

    #[error("Failed to open document '{}': {reason}", redact_path(.path))]
    DocumentOpen { path: PathBuf, reason: String },

    #[error("Failed to rasterize page: {0}")]
    Rasterize(String),

    #[error("Image I/O failed for '{}': {source}", redact_path(.path))]
    ImageIo {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to write '{}': {source}", redact_path(.path))]
    ImageWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Page image {width}x{height} is too large to upscale {factor}x")]
    ImageTooLarge { width: u32, height: u32, factor: u32 },

    #[error("OCR failed: {0}")]
    Ocr(String),

    #[error("Text layer extraction failed: {0}")]
    FallbackExtraction(String),
}

impl ProcessError {
    /// Errors that stop the remaining pages of a document from being processed.
    pub fn aborts_document(&self) -> bool {
        matches!(
            self,
            Self::ImageIo { .. } | Self::ImageWrite { .. } | Self::ImageTooLarge { .. }
        )
    }
}

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to create directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize results: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Serialized results are not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    #[error("Failed to write file '{path}': {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ScanscribeError>;
