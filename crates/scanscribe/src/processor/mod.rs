//! Per-page processing stages: rasterize, preprocess, OCR, and the
//! embedded-text fallback.

pub mod hocr;
pub mod ocr;
pub mod preprocess;
pub mod rasterize;
pub mod text_layer;

pub use ocr::{reduce_lines, ConfidencePolicy, OcrEngine, OcrExtractor, TesseractEngine};
pub use preprocess::{autocontrast, preprocess_page, upscaled_dimensions, MAX_PREPROCESSED_PIXELS};
pub use rasterize::{page_image_name, rasterize, PageImages, PageRasterizer, PdftoppmRasterizer};
pub use text_layer::{extract_fallback_pages, LopdfTextLayer, TextLayerExtractor};
