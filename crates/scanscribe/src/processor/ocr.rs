use std::cell::RefCell;
use std::io::Cursor;
use std::path::Path;

use crate::error::ProcessError;
use crate::model::{PageImage, TextLine};
use crate::processor::hocr::parse_hocr_lines;

/// An OCR backend. Loaded once and reused for every page of a run.
pub trait OcrEngine {
    /// Every line the engine detected on the page, blank ones included.
    /// An empty vector means the engine found nothing at all.
    fn recognize(&self, page: &PageImage) -> Result<Vec<TextLine>, ProcessError>;
}

/// Which OCR lines to keep based on engine confidence.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ConfidencePolicy {
    #[default]
    KeepAll,
    /// Drop lines whose confidence is below the threshold (`0.0..=1.0`).
    AtLeast(f32),
}

impl ConfidencePolicy {
    pub fn from_threshold(min_confidence: Option<f32>) -> Self {
        min_confidence.map_or(Self::KeepAll, Self::AtLeast)
    }

    pub fn accepts(&self, line: &TextLine) -> bool {
        match self {
            Self::KeepAll => true,
            Self::AtLeast(min) => line.confidence >= *min,
        }
    }
}

/// Reduce raw detections to trimmed, non-empty strings in reading order.
/// `None` when nothing survives.
pub fn reduce_lines(mut lines: Vec<TextLine>, policy: ConfidencePolicy) -> Option<Vec<String>> {
    lines.sort_by_key(|l| l.position);
    let texts: Vec<String> = lines
        .into_iter()
        .filter(|l| policy.accepts(l))
        .map(|l| l.text.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();

    if texts.is_empty() {
        None
    } else {
        Some(texts)
    }
}

pub struct OcrExtractor {
    engine: Box<dyn OcrEngine>,
    policy: ConfidencePolicy,
}

impl OcrExtractor {
    pub fn new(engine: Box<dyn OcrEngine>, policy: ConfidencePolicy) -> Self {
        Self { engine, policy }
    }

    pub fn policy(&self) -> ConfidencePolicy {
        self.policy
    }

    /// OCR a preprocessed page. `Ok(None)` means the page yielded no usable text.
    pub fn extract(&self, page: &PageImage) -> Result<Option<Vec<String>>, ProcessError> {
        let _span = tracing::info_span!("processor.ocr", page_number = page.page_number).entered();

        let lines = self.engine.recognize(page)?;
        if lines.is_empty() {
            tracing::debug!("OCR engine reported no detections");
            return Ok(None);
        }

        let detected = lines.len();
        let texts = reduce_lines(lines, self.policy);
        match &texts {
            Some(kept) => tracing::debug!(detected, kept = kept.len(), "OCR lines kept"),
            None => tracing::debug!(detected, "OCR detections were all blank or filtered"),
        }
        Ok(texts)
    }
}

/// Tesseract via leptess. Line confidences come from the hOCR `x_wconf` of each word.
pub struct TesseractEngine {
    tess: RefCell<leptess::LepTess>,
    languages: String,
}

impl TesseractEngine {
    pub fn new(languages: &[String], tessdata_dir: Option<&Path>) -> Result<Self, ProcessError> {
        let _span = tracing::info_span!("processor.ocr_init").entered();

        let lang_str = language_string(languages);
        let data_path = tessdata_dir.map(|p| p.to_string_lossy().into_owned());

        let tess = leptess::LepTess::new(data_path.as_deref(), &lang_str).map_err(|e| {
            ProcessError::Ocr(format!("Failed to initialize Tesseract: {}", e))
        })?;

        tracing::info!(languages = %lang_str, "Tesseract engine initialised");
        Ok(Self {
            tess: RefCell::new(tess),
            languages: lang_str,
        })
    }

    pub fn languages(&self) -> &str {
        &self.languages
    }
}

impl OcrEngine for TesseractEngine {
    fn recognize(&self, page: &PageImage) -> Result<Vec<TextLine>, ProcessError> {
        let mut png_data = Vec::new();
        page.image
            .write_to(&mut Cursor::new(&mut png_data), image::ImageFormat::Png)
            .map_err(|e| ProcessError::Ocr(format!("Failed to encode image: {}", e)))?;

        let mut tess = self.tess.borrow_mut();
        tess.set_image_from_mem(&png_data)
            .map_err(|e| ProcessError::Ocr(format!("Failed to set image for OCR: {}", e)))?;

        let hocr = tess
            .get_hocr_text(0)
            .map_err(|e| ProcessError::Ocr(format!("OCR failed: {}", e)))?;

        parse_hocr_lines(&hocr)
    }
}

/// Tesseract language argument: languages joined with `+`, `eng` when none are given.
pub fn language_string(languages: &[String]) -> String {
    if languages.is_empty() {
        "eng".to_string()
    } else {
        languages.join("+")
    }
}
