use image::imageops::FilterType;
use image::{DynamicImage, GrayImage};
use imageproc::contrast::stretch_contrast;

use crate::error::ProcessError;
use crate::model::PageImage;

/// Largest image, in pixels, that preprocessing will produce.
pub const MAX_PREPROCESSED_PIXELS: u64 = 200_000_000;

/// Prepare a rendered page for OCR: grayscale, auto-contrast, then upscale by
/// `upscale_factor` in both dimensions. The result replaces the PNG on disk.
///
/// Not idempotent: every call multiplies the resolution again, so apply it
/// once per page.
pub fn preprocess_page(page: &mut PageImage, upscale_factor: u32) -> Result<(), ProcessError> {
    let _span = tracing::debug_span!("processor.preprocess", page_number = page.page_number)
        .entered();

    let (width, height) = upscaled_dimensions(page.width(), page.height(), upscale_factor)?;

    let gray = autocontrast(&page.image.to_luma8());
    let gray = if upscale_factor > 1 {
        image::imageops::resize(&gray, width, height, FilterType::CatmullRom)
    } else {
        gray
    };

    gray.save(&page.path).map_err(|e| ProcessError::ImageIo {
        path: page.path.clone(),
        source: e,
    })?;

    tracing::debug!(width, height, "Page preprocessed");
    page.image = DynamicImage::ImageLuma8(gray);
    Ok(())
}

/// Output size for an upscale, or `ImageTooLarge` when it overflows or
/// exceeds [`MAX_PREPROCESSED_PIXELS`].
pub fn upscaled_dimensions(
    width: u32,
    height: u32,
    factor: u32,
) -> Result<(u32, u32), ProcessError> {
    let factor = factor.max(1);
    let too_large = || ProcessError::ImageTooLarge {
        width,
        height,
        factor,
    };

    let scaled_width = width.checked_mul(factor).ok_or_else(too_large)?;
    let scaled_height = height.checked_mul(factor).ok_or_else(too_large)?;
    if u64::from(scaled_width) * u64::from(scaled_height) > MAX_PREPROCESSED_PIXELS {
        return Err(too_large());
    }
    Ok((scaled_width, scaled_height))
}

/// Stretch the histogram so the darkest pixel maps to 0 and the brightest to 255.
/// Flat images are returned unchanged.
pub fn autocontrast(image: &GrayImage) -> GrayImage {
    let (lo, hi) = image
        .pixels()
        .fold((u8::MAX, u8::MIN), |(lo, hi), p| (lo.min(p.0[0]), hi.max(p.0[0])));

    if hi <= lo {
        return image.clone();
    }
    stretch_contrast(image, lo, hi, u8::MIN, u8::MAX)
}
