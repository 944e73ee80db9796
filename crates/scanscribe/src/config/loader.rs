use std::path::Path;

use crate::config::schema::Config;
use crate::error::ConfigError;

const SUPPORTED_VERSION: &str = "1.0";
const MAX_DPI: u32 = 1200;
const MAX_UPSCALE_FACTOR: u32 = 8;
/// Rendering dpi times upscale factor. Keeps a US Letter page near 134 megapixels.
const MAX_EFFECTIVE_DPI: u32 = 1200;

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_config_from_str(&content)
}

pub fn load_config_from_str(content: &str) -> Result<Config, ConfigError> {
    let config: Config = serde_json::from_str(content)?;

    validate_config(&config)?;

    Ok(config)
}

pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.version != SUPPORTED_VERSION {
        return Err(ConfigError::Validation {
            message: format!("Unsupported config version: {}", config.version),
        });
    }

    if config.output_file.trim().is_empty() {
        return Err(ConfigError::Validation {
            message: "output_file must not be empty".to_string(),
        });
    }

    if config.image_directory.trim().is_empty() {
        return Err(ConfigError::Validation {
            message: "image_directory must not be empty".to_string(),
        });
    }

    let ocr = &config.ocr;
    if ocr.dpi == 0 || ocr.dpi > MAX_DPI {
        return Err(ConfigError::Validation {
            message: format!("ocr.dpi must be between 1 and {}, got {}", MAX_DPI, ocr.dpi),
        });
    }

    if ocr.upscale_factor == 0 || ocr.upscale_factor > MAX_UPSCALE_FACTOR {
        return Err(ConfigError::Validation {
            message: format!(
                "ocr.upscale_factor must be between 1 and {}, got {}",
                MAX_UPSCALE_FACTOR, ocr.upscale_factor
            ),
        });
    }

    if ocr.dpi * ocr.upscale_factor > MAX_EFFECTIVE_DPI {
        return Err(ConfigError::Validation {
            message: format!(
                "ocr.dpi x ocr.upscale_factor must not exceed {}, got {} x {}",
                MAX_EFFECTIVE_DPI, ocr.dpi, ocr.upscale_factor
            ),
        });
    }

    if let Some(min) = ocr.min_confidence {
        if !(0.0..=1.0).contains(&min) {
            return Err(ConfigError::Validation {
                message: format!("ocr.min_confidence must be within 0.0..=1.0, got {}", min),
            });
        }
    }

    if let Some(lang) = ocr.languages.iter().find(|l| {
        l.is_empty() || !l.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
    }) {
        return Err(ConfigError::Validation {
            message: format!("Invalid OCR language code: '{}'", lang),
        });
    }

    Ok(())
}
