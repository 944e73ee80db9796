use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: String,
    /// Where rendered page images are written.
    #[serde(default = "default_image_directory")]
    pub image_directory: String,
    /// Where the JSON results are written.
    #[serde(default = "default_output_file")]
    pub output_file: String,
    #[serde(default)]
    pub ocr: OcrConfig,
}

fn default_version() -> String {
    "1.0".to_string()
}

fn default_image_directory() -> String {
    "output_images".to_string()
}

fn default_output_file() -> String {
    "ocr_results.json".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            image_directory: default_image_directory(),
            output_file: default_output_file(),
            ocr: OcrConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrConfig {
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,
    /// Rendering resolution for page images.
    #[serde(default = "default_dpi")]
    pub dpi: u32,
    #[serde(default = "default_upscale_factor")]
    pub upscale_factor: u32,
    /// Lines below this confidence (`0.0..=1.0`) are dropped. Unset keeps every line.
    #[serde(default)]
    pub min_confidence: Option<f32>,
    /// Tesseract `tessdata` directory. Unset uses Tesseract's own lookup.
    #[serde(default)]
    pub tessdata_dir: Option<String>,
}

fn default_languages() -> Vec<String> {
    vec!["eng".to_string()]
}

fn default_dpi() -> u32 {
    72
}

fn default_upscale_factor() -> u32 {
    2
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            languages: default_languages(),
            dpi: default_dpi(),
            upscale_factor: default_upscale_factor(),
            min_confidence: None,
            tessdata_dir: None,
        }
    }
}
