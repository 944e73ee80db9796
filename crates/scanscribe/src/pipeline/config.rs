use std::path::PathBuf;

use crate::config::Config;
use crate::processor::ConfidencePolicy;

pub struct PipelineConfig {
    pub image_directory: PathBuf,
    pub output_file: PathBuf,
    pub ocr_languages: Vec<String>,
    pub ocr_dpi: u32,
    pub upscale_factor: u32,
    pub confidence_policy: ConfidencePolicy,
    pub tessdata_dir: Option<PathBuf>,
}

impl PipelineConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            image_directory: PathBuf::from(&config.image_directory),
            output_file: PathBuf::from(&config.output_file),
            ocr_languages: config.ocr.languages.clone(),
            ocr_dpi: config.ocr.dpi,
            upscale_factor: config.ocr.upscale_factor,
            confidence_policy: ConfidencePolicy::from_threshold(config.ocr.min_confidence),
            tessdata_dir: config.ocr.tessdata_dir.as_ref().map(PathBuf::from),
        }
    }
}
