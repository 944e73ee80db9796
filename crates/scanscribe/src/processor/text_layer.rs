use std::path::Path;

use crate::error::ProcessError;
use crate::sanitize::redact_path;

/// Reads the embedded text layer of a born-digital document.
pub trait TextLayerExtractor {
    /// `(page_number, text)` for every page, in any order, blank pages included.
    fn page_texts(&self, document: &Path) -> Result<Vec<(u32, String)>, ProcessError>;
}

/// Text layer extraction with lopdf.
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfTextLayer;

impl TextLayerExtractor for LopdfTextLayer {
    fn page_texts(&self, document: &Path) -> Result<Vec<(u32, String)>, ProcessError> {
        let _span = tracing::info_span!("processor.text_layer").entered();

        let doc = lopdf::Document::load(document).map_err(|e| {
            ProcessError::FallbackExtraction(format!(
                "Failed to load '{}': {}",
                redact_path(document),
                e
            ))
        })?;

        let mut pages = Vec::new();
        for page_num in doc.get_pages().into_keys() {
            match doc.extract_text(&[page_num]) {
                Ok(text) => pages.push((page_num, text)),
                Err(e) => tracing::warn!(
                    page_number = page_num,
                    "Could not read text layer of page: {}",
                    e
                ),
            }
        }

        Ok(pages)
    }
}

/// Pages whose trimmed text is non-empty, as `(text, page_number)` in page
/// order. Any extractor failure is logged and reported as `None`.
pub fn extract_fallback_pages(
    extractor: &dyn TextLayerExtractor,
    document: &Path,
) -> Option<Vec<(String, u32)>> {
    let pages = match extractor.page_texts(document) {
        Ok(pages) => pages,
        Err(e) => {
            tracing::warn!(
                "Error extracting text from {}: {}",
                redact_path(document),
                e
            );
            return None;
        }
    };

    let mut kept: Vec<(String, u32)> = pages
        .into_iter()
        .filter_map(|(page_number, text)| {
            let text = text.trim();
            (!text.is_empty()).then(|| (text.to_string(), page_number))
        })
        .collect();
    kept.sort_by_key(|(_, page_number)| *page_number);

    if kept.is_empty() {
        None
    } else {
        Some(kept)
    }
}
