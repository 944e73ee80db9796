use std::path::Path;
use std::sync::Arc;

use tracing::{debug, debug_span, info, info_span, warn};

use crate::error::ProcessError;
use crate::model::{document_name, DocumentOutcome, PageRecord};
use crate::output::ResultCollection;
use crate::processor::{
    extract_fallback_pages, preprocess_page, rasterize, LopdfTextLayer, OcrEngine, OcrExtractor,
    PageRasterizer, PdftoppmRasterizer, TesseractEngine, TextLayerExtractor,
};
use crate::sanitize::redact_path;

use super::config::PipelineConfig;
use super::context::{DocumentContext, DocumentDisposition, DocumentReport};
use super::error::{PipelineWarning, SkipReason};
use super::progress::{ProgressEvent, ProgressReporter};
use super::summary::RunSummary;

/// Everything a run produced.
pub struct RunReport {
    pub records: ResultCollection,
    pub summary: RunSummary,
}

pub struct Pipeline {
    config: Arc<PipelineConfig>,
    rasterizer: Box<dyn PageRasterizer>,
    ocr: OcrExtractor,
    text_layer: Box<dyn TextLayerExtractor>,
}

impl Pipeline {
    /// Production constructor. Loads the Tesseract models once for the whole run.
    pub fn from_config(config: Arc<PipelineConfig>) -> Result<Self, ProcessError> {
        let engine = TesseractEngine::new(&config.ocr_languages, config.tessdata_dir.as_deref())?;
        let rasterizer = PdftoppmRasterizer::new(&config.image_directory, config.ocr_dpi);

        Ok(Self::new(
            config,
            Box::new(rasterizer),
            Box::new(engine),
            Box::new(LopdfTextLayer),
        ))
    }

    /// Build a pipeline around specific collaborators.
    pub fn new(
        config: Arc<PipelineConfig>,
        rasterizer: Box<dyn PageRasterizer>,
        engine: Box<dyn OcrEngine>,
        text_layer: Box<dyn TextLayerExtractor>,
    ) -> Self {
        let ocr = OcrExtractor::new(engine, config.confidence_policy);
        Self {
            config,
            rasterizer,
            ocr,
            text_layer,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Process every document in order. Per-document failures are logged and
    /// never stop the run.
    pub fn run<P: AsRef<Path>>(
        &self,
        documents: &[P],
        progress: &dyn ProgressReporter,
    ) -> RunReport {
        let _pipeline_span = info_span!("pipeline", documents = documents.len()).entered();

        let mut records = ResultCollection::new();
        let mut summary = RunSummary::default();

        for (index, document) in documents.iter().enumerate() {
            let document = document.as_ref();
            progress.report(ProgressEvent::DocumentStarted {
                file: document_name(document),
                index,
                total: documents.len(),
            });

            let report = self.process_document(document, progress);
            summary.record(&report.disposition);
            summary.record_warnings(&report.warnings);

            match &report.disposition {
                DocumentDisposition::Skipped(reason) => {
                    progress.report(ProgressEvent::DocumentSkipped {
                        file: report.file_name.clone(),
                        reason: reason.to_string(),
                    })
                }
                _ => progress.report(ProgressEvent::DocumentFinished {
                    file: report.file_name.clone(),
                    records: report.records.len(),
                }),
            }

            records.extend_document(report.records);
        }

        info!(
            documents = summary.documents,
            skipped = summary.documents_skipped,
            ocr_pages = summary.ocr_pages,
            text_layer_pages = summary.text_layer_pages,
            page_warnings = summary.page_warnings,
            "Run complete"
        );

        RunReport { records, summary }
    }

    /// Run one document through OCR, falling back to its text layer only when
    /// OCR found nothing on any page.
    pub fn process_document(
        &self,
        path: &Path,
        progress: &dyn ProgressReporter,
    ) -> DocumentReport {
        let mut ctx = DocumentContext::new(path);
        let _document_span = info_span!("document", file = %ctx.file_name).entered();

        // Step 1: Verify the file exists
        if let Err(e) = self.step_verify_exists(&ctx) {
            warn!("File not found: {}", redact_path(path));
            return DocumentReport::from_context(
                ctx,
                DocumentDisposition::Skipped(SkipReason::NotFound(e)),
            );
        }

        info!("Processing document");

        // Step 2+3: Rasterize, preprocess and OCR each page
        let outcome = match self.step_ocr_pages(&mut ctx, progress) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Skipping document: {}", e);
                return DocumentReport::from_context(
                    ctx,
                    DocumentDisposition::Skipped(SkipReason::OpenFailed(e)),
                );
            }
        };

        // Step 4+5: Decide on the text layer
        let disposition = match outcome {
            DocumentOutcome::OcrSucceeded(records) => {
                let pages = records.len();
                ctx.records = records;
                DocumentDisposition::Ocr { pages }
            }
            DocumentOutcome::OcrExhausted => {
                info!(
                    "Using embedded text layer for {} (OCR produced no text)",
                    ctx.file_name
                );
                progress.report(ProgressEvent::FallbackStarted {
                    file: ctx.file_name.clone(),
                });
                self.step_text_layer(&mut ctx)
            }
            DocumentOutcome::Aborted { records, error } => {
                warn!(
                    recorded_pages = records.len(),
                    "Stopped processing {}: {}", ctx.file_name, error
                );
                let pages = records.len();
                ctx.records = records;
                DocumentDisposition::Aborted { pages, error }
            }
        };

        DocumentReport::from_context(ctx, disposition)
    }

    fn step_verify_exists(&self, ctx: &DocumentContext) -> Result<(), ProcessError> {
        if ctx.source.exists() {
            Ok(())
        } else {
            Err(ProcessError::DocumentNotFound {
                path: ctx.source.clone(),
            })
        }
    }

    fn step_ocr_pages(
        &self,
        ctx: &mut DocumentContext,
        progress: &dyn ProgressReporter,
    ) -> Result<DocumentOutcome, ProcessError> {
        let pages = rasterize(self.rasterizer.as_ref(), &ctx.source)?;
        ctx.page_count = Some(pages.page_count());
        debug!(page_count = pages.page_count(), "Document opened");

        let mut records = Vec::new();

        for (page_number, rendered) in pages {
            let _page_span = debug_span!("page", page_number).entered();

            let mut page = match rendered {
                Ok(page) => page,
                Err(error) if error.aborts_document() => {
                    return Ok(DocumentOutcome::Aborted { records, error });
                }
                Err(e) => {
                    warn!(page_number, "Could not render page: {}", e);
                    ctx.warnings.push(PipelineWarning::PageRenderFailed {
                        page_number,
                        error: e.to_string(),
                    });
                    continue;
                }
            };

            if let Err(error) = preprocess_page(&mut page, self.config.upscale_factor) {
                return Ok(DocumentOutcome::Aborted { records, error });
            }

            match self.ocr.extract(&page) {
                Ok(Some(lines)) => {
                    progress.report(ProgressEvent::PageRecognized {
                        file: ctx.file_name.clone(),
                        page_number,
                        lines: lines.len(),
                    });
                    records.extend(PageRecord::new(&ctx.file_name, page_number, lines));
                }
                Ok(None) => debug!(page_number, "No OCR text on page"),
                Err(e) => {
                    warn!(page_number, "OCR failed on page: {}", e);
                    ctx.warnings.push(PipelineWarning::PageOcrFailed {
                        page_number,
                        error: e.to_string(),
                    });
                }
            }
        }

        if records.is_empty() {
            Ok(DocumentOutcome::OcrExhausted)
        } else {
            Ok(DocumentOutcome::OcrSucceeded(records))
        }
    }

    fn step_text_layer(&self, ctx: &mut DocumentContext) -> DocumentDisposition {
        match extract_fallback_pages(self.text_layer.as_ref(), &ctx.source) {
            Some(pages) => {
                ctx.records = pages
                    .into_iter()
                    .filter_map(|(text, page_number)| {
                        PageRecord::from_text_layer(&ctx.file_name, page_number, &text)
                    })
                    .collect();
                DocumentDisposition::TextLayer {
                    pages: ctx.records.len(),
                }
            }
            None => {
                info!("No text found in {}", ctx.file_name);
                DocumentDisposition::NoText
            }
        }
    }
}
