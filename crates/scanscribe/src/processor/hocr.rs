//! Reads text lines and word confidences out of Tesseract's hOCR output.

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::ProcessError;
use crate::model::TextLine;

/// hOCR classes Tesseract uses for a line of text.
const LINE_CLASSES: &[&str] = &["ocr_line", "ocr_textfloat", "ocr_header", "ocr_caption"];
const WORD_CLASS: &str = "ocrx_word";

enum Element {
    Line,
    Word,
    Other,
}

#[derive(Default)]
struct LineBuilder {
    words: Vec<String>,
    confidences: Vec<f32>,
}

impl LineBuilder {
    fn push_word(&mut self, text: &str, confidence: f32) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        self.words.push(text.to_string());
        self.confidences.push(confidence);
    }

    fn finish(self, position: usize) -> TextLine {
        let confidence = if self.confidences.is_empty() {
            0.0
        } else {
            self.confidences.iter().sum::<f32>() / self.confidences.len() as f32 / 100.0
        };
        TextLine {
            text: self.words.join(" "),
            confidence,
            position,
        }
    }
}

struct WordBuilder {
    text: String,
    confidence: f32,
}

/// Lines in document order. Lines with no recognised words come back with
/// empty text; filtering them is the extractor's job.
pub fn parse_hocr_lines(hocr: &str) -> Result<Vec<TextLine>, ProcessError> {
    let mut reader = Reader::from_str(hocr);
    let mut stack: Vec<Element> = Vec::new();
    let mut lines = Vec::new();
    let mut line: Option<LineBuilder> = None;
    let mut word: Option<WordBuilder> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let element = classify(&e);
                match element {
                    Element::Line => line = Some(LineBuilder::default()),
                    Element::Word => {
                        word = Some(WordBuilder {
                            text: String::new(),
                            confidence: word_confidence(&e),
                        })
                    }
                    Element::Other => {}
                }
                stack.push(element);
            }
            Ok(Event::End(_)) => match stack.pop() {
                Some(Element::Word) => {
                    if let (Some(w), Some(l)) = (word.take(), line.as_mut()) {
                        l.push_word(&w.text, w.confidence);
                    }
                }
                Some(Element::Line) => {
                    if let Some(l) = line.take() {
                        lines.push(l.finish(lines.len()));
                    }
                }
                _ => {}
            },
            Ok(Event::Text(t)) => {
                if let Some(w) = word.as_mut() {
                    w.text.push_str(&String::from_utf8_lossy(&t));
                }
            }
            Ok(Event::GeneralRef(r)) => {
                if let (Some(w), Some(c)) = (word.as_mut(), resolve_reference(&r)) {
                    w.text.push(c);
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(ProcessError::Ocr(format!(
                    "Malformed hOCR output at byte {}: {}",
                    reader.error_position(),
                    e
                )))
            }
        }
    }

    Ok(lines)
}

fn attribute(e: &BytesStart<'_>, name: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == name)
        .map(|a| String::from_utf8_lossy(&a.value).into_owned())
}

fn classify(e: &BytesStart<'_>) -> Element {
    let Some(class) = attribute(e, b"class") else {
        return Element::Other;
    };
    let mut classes = class.split_whitespace();
    if classes.clone().any(|c| c == WORD_CLASS) {
        Element::Word
    } else if classes.any(|c| LINE_CLASSES.contains(&c)) {
        Element::Line
    } else {
        Element::Other
    }
}

/// `x_wconf` from a word's `title`, in percent. Missing means 0.
fn word_confidence(e: &BytesStart<'_>) -> f32 {
    attribute(e, b"title")
        .and_then(|title| {
            title.split(';').find_map(|prop| {
                prop.trim()
                    .strip_prefix("x_wconf")
                    .and_then(|v| v.trim().parse::<f32>().ok())
            })
        })
        .unwrap_or(0.0)
}

fn resolve_reference(name: &[u8]) -> Option<char> {
    match name {
        b"amp" => Some('&'),
        b"lt" => Some('<'),
        b"gt" => Some('>'),
        b"quot" => Some('"'),
        b"apos" => Some('\''),
        [b'#', b'x' | b'X', hex @ ..] => std::str::from_utf8(hex)
            .ok()
            .and_then(|h| u32::from_str_radix(h, 16).ok())
            .and_then(char::from_u32),
        [b'#', dec @ ..] => std::str::from_utf8(dec)
            .ok()
            .and_then(|d| d.parse::<u32>().ok())
            .and_then(char::from_u32),
        _ => None,
    }
}
