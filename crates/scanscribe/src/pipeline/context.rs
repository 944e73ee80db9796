use std::path::{Path, PathBuf};

use crate::model::{document_name, PageRecord};

use super::error::{PipelineWarning, SkipReason};

/// Working state for one document.
pub struct DocumentContext {
    // Input
    pub source: PathBuf,
    pub file_name: String,

    // Set once the page count is known
    pub page_count: Option<u32>,

    // Final records for this document, in page order
    pub records: Vec<PageRecord>,

    // Non-fatal warnings
    pub warnings: Vec<PipelineWarning>,
}

impl DocumentContext {
    pub fn new(source: &Path) -> Self {
        Self {
            source: source.to_path_buf(),
            file_name: document_name(source),
            page_count: None,
            records: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

/// How a document's records were produced.
#[derive(Debug)]
pub enum DocumentDisposition {
    /// OCR found text on `pages` pages.
    Ocr { pages: usize },
    /// OCR found nothing; `pages` pages came from the embedded text layer.
    TextLayer { pages: usize },
    /// Neither OCR nor the text layer had anything.
    NoText,
    /// An image error stopped OCR after `pages` pages had been recorded.
    Aborted {
        pages: usize,
        error: crate::error::ProcessError,
    },
    Skipped(SkipReason),
}

pub struct DocumentReport {
    pub file_name: String,
    pub records: Vec<PageRecord>,
    pub disposition: DocumentDisposition,
    pub warnings: Vec<PipelineWarning>,
}

impl DocumentReport {
    pub fn from_context(ctx: DocumentContext, disposition: DocumentDisposition) -> Self {
        Self {
            file_name: ctx.file_name,
            records: ctx.records,
            disposition,
            warnings: ctx.warnings,
        }
    }
}
