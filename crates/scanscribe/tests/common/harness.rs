//! Test harness for isolated pipeline runs.
//!
//! The `TestHarness` struct owns a temporary working area and a set of
//! scripted documents. Pipelines built from it use fake collaborators that
//! replay those scripts, so no Tesseract or poppler installation is needed.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tempfile::TempDir;

use scanscribe::model::{document_name, PageImage, TextLine};
use scanscribe::pipeline::{NoopProgress, Pipeline, PipelineConfig, RunReport};
use scanscribe::processor::{
    page_image_name, ConfidencePolicy, OcrEngine, PageRasterizer, TextLayerExtractor,
};
use scanscribe::ProcessError;

use super::builders::{write_text_pdf, DocumentScript};

/// A call made into one of the fake collaborators.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    PageCount(String),
    Render(String, u32),
    Recognize(String, u32),
    TextLayer(String),
}

type Scripts = Arc<HashMap<String, DocumentScript>>;
type CallLog = Arc<Mutex<Vec<Call>>>;

pub struct FakeRasterizer {
    scripts: Scripts,
    calls: CallLog,
    image_dir: PathBuf,
}

impl PageRasterizer for FakeRasterizer {
    fn page_count(&self, document: &Path) -> Result<u32, ProcessError> {
        let name = document_name(document);
        self.calls.lock().unwrap().push(Call::PageCount(name.clone()));

        self.scripts
            .get(&name)
            .and_then(|s| s.page_count)
            .ok_or_else(|| ProcessError::DocumentOpen {
                path: document.to_path_buf(),
                reason: "no page tree".to_string(),
            })
    }

    fn render_page(&self, document: &Path, page_number: u32) -> Result<PageImage, ProcessError> {
        let name = document_name(document);
        self.calls
            .lock()
            .unwrap()
            .push(Call::Render(name.clone(), page_number));

        let script = self.scripts.get(&name);
        if script.is_some_and(|s| s.render_failures.contains(&page_number)) {
            return Err(ProcessError::Rasterize(format!(
                "page {} of {} could not be rendered",
                page_number, name
            )));
        }

        let file_name = page_image_name(document, page_number);
        let path = if script.is_some_and(|s| s.unwritable_pages.contains(&page_number)) {
            self.image_dir.join("does-not-exist").join(file_name)
        } else {
            self.image_dir.join(file_name)
        };

        Ok(PageImage {
            source: document.to_path_buf(),
            page_number,
            path,
            image: image::DynamicImage::new_rgb8(10, 14),
        })
    }
}

pub struct FakeOcr {
    scripts: Scripts,
    calls: CallLog,
}

impl OcrEngine for FakeOcr {
    fn recognize(&self, page: &PageImage) -> Result<Vec<TextLine>, ProcessError> {
        let name = document_name(&page.source);
        self.calls
            .lock()
            .unwrap()
            .push(Call::Recognize(name.clone(), page.page_number));

        let Some(script) = self.scripts.get(&name) else {
            return Ok(Vec::new());
        };
        if script.ocr_failures.contains(&page.page_number) {
            return Err(ProcessError::Ocr("engine crashed".to_string()));
        }

        Ok(script
            .ocr
            .get(&page.page_number)
            .map(|lines| {
                lines
                    .iter()
                    .enumerate()
                    .map(|(position, (text, confidence))| TextLine {
                        text: text.clone(),
                        confidence: *confidence,
                        position,
                    })
                    .collect()
            })
            .unwrap_or_default())
    }
}

pub struct FakeTextLayer {
    scripts: Scripts,
    calls: CallLog,
}

impl TextLayerExtractor for FakeTextLayer {
    fn page_texts(&self, document: &Path) -> Result<Vec<(u32, String)>, ProcessError> {
        let name = document_name(document);
        self.calls.lock().unwrap().push(Call::TextLayer(name.clone()));

        self.scripts
            .get(&name)
            .and_then(|s| s.text_layer.clone())
            .ok_or_else(|| ProcessError::FallbackExtraction("damaged xref table".to_string()))
    }
}

/// Test harness providing an isolated execution environment for integration tests.
pub struct TestHarness {
    /// Temporary directory holding inputs, rendered images and results.
    temp_dir: TempDir,
    /// Where input documents are created.
    pub input_dir: PathBuf,
    /// Where page images are written.
    pub image_dir: PathBuf,
    /// Where results are written.
    pub output_file: PathBuf,
    scripts: HashMap<String, DocumentScript>,
    calls: CallLog,
    confidence_policy: ConfidencePolicy,
    upscale_factor: u32,
}

impl TestHarness {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();

        let input_dir = base.join("input");
        let image_dir = base.join("output_images");
        let output_file = base.join("results").join("ocr_results.json");

        std::fs::create_dir_all(&input_dir).expect("Failed to create input dir");
        std::fs::create_dir_all(&image_dir).expect("Failed to create image dir");

        Self {
            temp_dir,
            input_dir,
            image_dir,
            output_file,
            scripts: HashMap::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
            confidence_policy: ConfidencePolicy::KeepAll,
            upscale_factor: 2,
        }
    }

    pub fn with_confidence_policy(mut self, policy: ConfidencePolicy) -> Self {
        self.confidence_policy = policy;
        self
    }

    /// Bypasses config validation, as a caller of `Pipeline::new` can.
    pub fn with_upscale_factor(mut self, factor: u32) -> Self {
        self.upscale_factor = factor;
        self
    }

    /// Create a placeholder file in the input directory and register its script.
    pub fn add_document(&mut self, name: &str, script: DocumentScript) -> PathBuf {
        let path = self.input_dir.join(name);
        std::fs::write(&path, b"%PDF-1.5\n%placeholder\n").expect("Failed to write document");
        self.scripts.insert(name.to_string(), script);
        path
    }

    /// Write a real PDF with an embedded text layer and register its script.
    pub fn add_text_pdf(
        &mut self,
        name: &str,
        pages: &[Option<&str>],
        script: DocumentScript,
    ) -> PathBuf {
        let path = write_text_pdf(&self.input_dir, name, pages);
        self.scripts.insert(name.to_string(), script);
        path
    }

    /// A path inside the input directory that does not exist.
    pub fn missing_document(&self, name: &str) -> PathBuf {
        self.input_dir.join(name)
    }

    pub fn config(&self) -> PipelineConfig {
        PipelineConfig {
            image_directory: self.image_dir.clone(),
            output_file: self.output_file.clone(),
            ocr_languages: vec!["eng".to_string()],
            ocr_dpi: 72,
            upscale_factor: self.upscale_factor,
            confidence_policy: self.confidence_policy,
            tessdata_dir: None,
        }
    }

    /// A pipeline wired entirely to fakes.
    pub fn pipeline(&self) -> Pipeline {
        let scripts = Arc::new(self.scripts.clone());
        let text_layer = FakeTextLayer {
            scripts: Arc::clone(&scripts),
            calls: Arc::clone(&self.calls),
        };
        self.pipeline_with_text_layer(Box::new(text_layer))
    }

    /// Fake rasterizer and OCR engine, with a caller-supplied text layer.
    pub fn pipeline_with_text_layer(&self, text_layer: Box<dyn TextLayerExtractor>) -> Pipeline {
        let scripts = Arc::new(self.scripts.clone());
        let rasterizer = FakeRasterizer {
            scripts: Arc::clone(&scripts),
            calls: Arc::clone(&self.calls),
            image_dir: self.image_dir.clone(),
        };
        let engine = FakeOcr {
            scripts,
            calls: Arc::clone(&self.calls),
        };

        Pipeline::new(
            Arc::new(self.config()),
            Box::new(rasterizer),
            Box::new(engine),
            text_layer,
        )
    }

    pub fn run(&self, documents: &[PathBuf]) -> RunReport {
        self.pipeline().run(documents, &NoopProgress)
    }

    /// Run, write the results file, and return its contents.
    pub fn run_to_json(&self, documents: &[PathBuf]) -> String {
        let report = self.run(documents);
        report
            .records
            .write_json(&self.output_file)
            .expect("Failed to write results");
        std::fs::read_to_string(&self.output_file).expect("Failed to read results")
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_for(&self, name: &str) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|call| match call {
                Call::PageCount(file)
                | Call::Render(file, _)
                | Call::Recognize(file, _)
                | Call::TextLayer(file) => file == name,
            })
            .collect()
    }

    pub fn base_path(&self) -> &Path {
        self.temp_dir.path()
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
