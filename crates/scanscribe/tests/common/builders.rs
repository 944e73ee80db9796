//! Builders for test documents.
//!
//! `DocumentScript` describes what the fake rasterizer, OCR engine and text
//! layer report for one document. `write_text_pdf` produces a real PDF that
//! lopdf can read back.

#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use lopdf::{dictionary, Document, Object, Stream};

/// What each fake collaborator reports for one document.
#[derive(Debug, Clone, Default)]
pub struct DocumentScript {
    /// `None` makes the document unopenable.
    pub page_count: Option<u32>,
    /// OCR detections per page as `(text, confidence)`.
    pub ocr: BTreeMap<u32, Vec<(String, f32)>>,
    /// Pages whose rendering fails with a page-level error.
    pub render_failures: BTreeSet<u32>,
    /// Pages whose OCR call fails.
    pub ocr_failures: BTreeSet<u32>,
    /// Pages whose preprocessed image cannot be saved.
    pub unwritable_pages: BTreeSet<u32>,
    /// Embedded text per page. `None` makes the text layer unreadable.
    pub text_layer: Option<Vec<(u32, String)>>,
}

impl DocumentScript {
    /// A readable document with `count` pages and no text anywhere.
    pub fn pages(count: u32) -> Self {
        Self {
            page_count: Some(count),
            text_layer: Some(Vec::new()),
            ..Self::default()
        }
    }

    /// A file that cannot be opened as a document.
    pub fn unreadable() -> Self {
        Self::default()
    }

    /// OCR finds these lines on `page`, all with high confidence.
    pub fn ocr(self, page: u32, lines: &[&str]) -> Self {
        let lines: Vec<(&str, f32)> = lines.iter().map(|l| (*l, 0.95)).collect();
        self.ocr_with_confidence(page, &lines)
    }

    pub fn ocr_with_confidence(mut self, page: u32, lines: &[(&str, f32)]) -> Self {
        self.ocr.insert(
            page,
            lines.iter().map(|(t, c)| (t.to_string(), *c)).collect(),
        );
        self
    }

    pub fn text_layer(mut self, page: u32, text: &str) -> Self {
        self.text_layer
            .get_or_insert_with(Vec::new)
            .push((page, text.to_string()));
        self
    }

    pub fn broken_text_layer(mut self) -> Self {
        self.text_layer = None;
        self
    }

    pub fn render_failure(mut self, page: u32) -> Self {
        self.render_failures.insert(page);
        self
    }

    pub fn ocr_failure(mut self, page: u32) -> Self {
        self.ocr_failures.insert(page);
        self
    }

    pub fn unwritable(mut self, page: u32) -> Self {
        self.unwritable_pages.insert(page);
        self
    }
}

/// Write a PDF with one page per entry. `None` makes a page without a content
/// stream, so it has no embedded text.
pub fn write_text_pdf(dir: &Path, name: &str, pages: &[Option<&str>]) -> PathBuf {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids = Vec::new();
    for text in pages {
        let mut page = dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            "Resources" => resources_id,
        };
        if let Some(text) = text {
            let content = format!("BT /F1 14 Tf 72 720 Td ({}) Tj ET", text);
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
            page.set("Contents", content_id);
        }
        kids.push(Object::from(doc.add_object(page)));
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages.len() as i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let path = dir.join(name);
    doc.save(&path).expect("Failed to write test PDF");
    path
}
