use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::ProcessError;
use crate::model::PageImage;
use crate::sanitize::redact_path;

/// Turns document pages into raster images.
pub trait PageRasterizer {
    /// Number of pages in the document. Fails with `DocumentOpen` when the
    /// file is not a readable document.
    fn page_count(&self, document: &Path) -> Result<u32, ProcessError>;

    /// Render one 1-based page.
    fn render_page(&self, document: &Path, page_number: u32) -> Result<PageImage, ProcessError>;
}

/// Opens `document` and returns its pages as a lazy, page-ordered sequence.
///
/// Each page is rendered only when the iterator reaches it.
pub fn rasterize<'a>(
    rasterizer: &'a dyn PageRasterizer,
    document: &'a Path,
) -> Result<PageImages<'a>, ProcessError> {
    let page_count = rasterizer.page_count(document)?;
    Ok(PageImages {
        rasterizer,
        document,
        next_page: 1,
        page_count,
    })
}

pub struct PageImages<'a> {
    rasterizer: &'a dyn PageRasterizer,
    document: &'a Path,
    next_page: u32,
    page_count: u32,
}

impl PageImages<'_> {
    pub fn page_count(&self) -> u32 {
        self.page_count
    }
}

/// Yields `(page_number, render result)` so callers know which page failed.
impl Iterator for PageImages<'_> {
    type Item = (u32, Result<PageImage, ProcessError>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_page > self.page_count {
            return None;
        }
        let page_number = self.next_page;
        self.next_page += 1;
        Some((
            page_number,
            self.rasterizer.render_page(self.document, page_number),
        ))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.page_count + 1).saturating_sub(self.next_page) as usize;
        (remaining, Some(remaining))
    }
}

/// File name used for a rendered page: `{stem}_page_{n}.png`.
pub fn page_image_name(document: &Path, page_number: u32) -> String {
    let stem = document
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    format!("{}_page_{}.png", stem, page_number)
}

/// Renders pages with poppler's `pdftoppm`, counting pages with lopdf
/// (or `pdfinfo` when lopdf cannot parse the file).
pub struct PdftoppmRasterizer {
    image_dir: PathBuf,
    dpi: u32,
}

impl PdftoppmRasterizer {
    pub fn new(image_dir: impl Into<PathBuf>, dpi: u32) -> Self {
        Self {
            image_dir: image_dir.into(),
            dpi,
        }
    }

    pub fn image_dir(&self) -> &Path {
        &self.image_dir
    }

    pub fn dpi(&self) -> u32 {
        self.dpi
    }
}

impl PageRasterizer for PdftoppmRasterizer {
    fn page_count(&self, document: &Path) -> Result<u32, ProcessError> {
        let _span = tracing::info_span!("processor.page_count").entered();

        match lopdf::Document::load(document) {
            Ok(doc) => Ok(doc.get_pages().len() as u32),
            Err(e) => {
                tracing::warn!(
                    "lopdf failed to parse {}: {}. Asking pdfinfo for the page count.",
                    redact_path(document),
                    e
                );
                count_pdf_pages(document).map_err(|reason| ProcessError::DocumentOpen {
                    path: document.to_path_buf(),
                    reason: format!("lopdf: {}; pdfinfo: {}", e, reason),
                })
            }
        }
    }

    fn render_page(&self, document: &Path, page_number: u32) -> Result<PageImage, ProcessError> {
        let _span = tracing::info_span!("processor.rasterize", page_number).entered();

        std::fs::create_dir_all(&self.image_dir).map_err(|e| ProcessError::ImageWrite {
            path: self.image_dir.clone(),
            source: e,
        })?;

        let image_path = self.image_dir.join(page_image_name(document, page_number));
        // -singlefile makes pdftoppm write exactly `{prefix}.png`
        let output_prefix = image_path.with_extension("");

        let output = Command::new("pdftoppm")
            .arg("-png")
            .arg("-singlefile")
            .args(["-r", &self.dpi.to_string()])
            .args(["-f", &page_number.to_string()])
            .args(["-l", &page_number.to_string()])
            .arg(document)
            .arg(&output_prefix)
            .output()
            .map_err(|e| {
                ProcessError::Rasterize(format!(
                    "Failed to run pdftoppm: {}. Make sure poppler-utils is installed.",
                    e
                ))
            })?;

        if !output.status.success() {
            return Err(ProcessError::Rasterize(format!(
                "pdftoppm failed on page {}: {}",
                page_number,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let image = image::open(&image_path).map_err(|e| {
            ProcessError::Rasterize(format!(
                "Failed to read rendered page '{}': {}",
                redact_path(&image_path),
                e
            ))
        })?;

        tracing::debug!(
            width = image.width(),
            height = image.height(),
            image = %redact_path(&image_path),
            "Page rendered"
        );

        Ok(PageImage {
            source: document.to_path_buf(),
            page_number,
            path: image_path,
            image,
        })
    }
}

/// Page count from `pdfinfo` (poppler-utils).
fn count_pdf_pages(document: &Path) -> Result<u32, String> {
    let output = Command::new("pdfinfo")
        .arg(document)
        .output()
        .map_err(|e| format!("failed to run pdfinfo: {}", e))?;

    if !output.status.success() {
        return Err(format!(
            "pdfinfo failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        ));
    }

    parse_pdfinfo_pages(&String::from_utf8_lossy(&output.stdout))
        .ok_or_else(|| "pdfinfo reported no page count".to_string())
}

fn parse_pdfinfo_pages(stdout: &str) -> Option<u32> {
    stdout
        .lines()
        .filter_map(|line| line.strip_prefix("Pages:"))
        .find_map(|count| count.trim().parse::<u32>().ok())
}
