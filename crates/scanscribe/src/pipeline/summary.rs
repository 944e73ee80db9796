use serde::Serialize;

use super::context::DocumentDisposition;
use super::error::PipelineWarning;

/// Counts for one run, logged when the run ends.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub documents: usize,
    pub documents_from_ocr: usize,
    pub documents_from_text_layer: usize,
    pub documents_without_text: usize,
    pub documents_aborted: usize,
    pub documents_skipped: usize,
    pub ocr_pages: usize,
    pub text_layer_pages: usize,
    /// Pages lost to a render or OCR failure.
    pub page_warnings: usize,
}

impl RunSummary {
    pub fn record(&mut self, disposition: &DocumentDisposition) {
        self.documents += 1;
        match disposition {
            DocumentDisposition::Ocr { pages } => {
                self.documents_from_ocr += 1;
                self.ocr_pages += pages;
            }
            DocumentDisposition::TextLayer { pages } => {
                self.documents_from_text_layer += 1;
                self.text_layer_pages += pages;
            }
            DocumentDisposition::NoText => self.documents_without_text += 1,
            DocumentDisposition::Aborted { pages, .. } => {
                self.documents_aborted += 1;
                self.ocr_pages += pages;
            }
            DocumentDisposition::Skipped(_) => self.documents_skipped += 1,
        }
    }

    pub fn record_warnings(&mut self, warnings: &[PipelineWarning]) {
        self.page_warnings += warnings.len();
    }

    pub fn total_pages(&self) -> usize {
        self.ocr_pages + self.text_layer_pages
    }
}
