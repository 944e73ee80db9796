//! Data carried through the extraction pipeline.

use std::path::{Path, PathBuf};

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::error::ProcessError;

/// A rasterized page. Lives only until its OCR attempt finishes.
pub struct PageImage {
    /// Document the page was rendered from.
    pub source: PathBuf,
    /// 1-based page number.
    pub page_number: u32,
    /// Where the rendered PNG was written. Preprocessing overwrites it.
    pub path: PathBuf,
    pub image: DynamicImage,
}

impl PageImage {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

impl std::fmt::Debug for PageImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageImage")
            .field("source", &self.source)
            .field("page_number", &self.page_number)
            .field("path", &self.path)
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

/// One line reported by the OCR engine.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    /// Engine confidence in `0.0..=1.0`.
    pub confidence: f32,
    /// Reading-order index assigned by the engine.
    pub position: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordMetadata {
    pub file: String,
    pub page_number: u32,
}

/// Text recovered from one page. Never constructed with an empty `text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPageRecord")]
pub struct PageRecord {
    metadata: RecordMetadata,
    text: Vec<String>,
}

#[derive(Deserialize)]
struct RawPageRecord {
    metadata: RecordMetadata,
    text: Vec<String>,
}

impl TryFrom<RawPageRecord> for PageRecord {
    type Error = String;

    fn try_from(raw: RawPageRecord) -> Result<Self, Self::Error> {
        PageRecord::new(raw.metadata.file, raw.metadata.page_number, raw.text)
            .ok_or_else(|| "page record text must not be empty".to_string())
    }
}

impl PageRecord {
    /// Returns `None` when `text` is empty.
    pub fn new(file: impl Into<String>, page_number: u32, text: Vec<String>) -> Option<Self> {
        if text.is_empty() {
            return None;
        }
        Some(Self {
            metadata: RecordMetadata {
                file: file.into(),
                page_number,
            },
            text,
        })
    }

    /// Wraps a full-page string from the embedded text layer. The text is
    /// trimmed; `None` when nothing is left.
    pub fn from_text_layer(file: impl Into<String>, page_number: u32, text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        Self::new(file, page_number, vec![text.to_string()])
    }

    pub fn metadata(&self) -> &RecordMetadata {
        &self.metadata
    }

    pub fn file(&self) -> &str {
        &self.metadata.file
    }

    pub fn page_number(&self) -> u32 {
        self.metadata.page_number
    }

    pub fn text(&self) -> &[String] {
        &self.text
    }
}

/// Result of the OCR pass over one document; decides whether the text layer is consulted.
#[derive(Debug)]
pub enum DocumentOutcome {
    /// At least one page produced OCR text.
    OcrSucceeded(Vec<PageRecord>),
    /// Every page came back empty.
    OcrExhausted,
    /// An image error stopped the pass early. Records gathered before it are kept.
    Aborted {
        records: Vec<PageRecord>,
        error: ProcessError,
    },
}

/// The name a document is reported under: its file name without directories.
pub fn document_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
