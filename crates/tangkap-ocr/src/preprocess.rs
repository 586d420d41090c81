use image::{GrayImage, RgbaImage};

use tangkap_types::CapturedBitmap;

use crate::error::OcrError;

/// Fraction of the histogram clipped from each end before stretching.
/// Small on purpose: enough to stabilize flat or low-contrast captures
/// without distorting ordinary ones.
const AUTOCONTRAST_CUTOFF: f32 = 0.5;

/// Normalize a captured bitmap for recognition: 8-bit grayscale, then
/// auto-contrast with a 0.5% clip.
///
/// The pipeline is deliberately conservative to keep latency low. Once the
/// stretched range spans the full domain, further passes leave the image
/// untouched.
pub fn preprocess(bitmap: &CapturedBitmap) -> Result<GrayImage, OcrError> {
    let rgba = RgbaImage::from_raw(bitmap.width, bitmap.height, bitmap.data.clone())
        .ok_or(OcrError::InvalidBitmap {
            width: bitmap.width,
            height: bitmap.height,
            len: bitmap.data.len(),
        })?;
    let gray = image::DynamicImage::ImageRgba8(rgba).into_luma8();
    Ok(autocontrast(&gray, AUTOCONTRAST_CUTOFF))
}

/// True when the normalized image has any non-background content. An image
/// whose pixels are all one value has an empty content bounding box and is
/// not worth sending to the recognition service.
pub fn has_content(image: &GrayImage) -> bool {
    let mut pixels = image.pixels();
    let Some(first) = pixels.next() else {
        return false;
    };
    pixels.any(|p| p != first)
}

/// Histogram-stretch `image` so that, after clipping `cutoff` percent of
/// pixels from each end, the remaining range spans 0..=255. An image whose
/// clipped range already spans the full domain is returned unchanged.
pub fn autocontrast(image: &GrayImage, cutoff: f32) -> GrayImage {
    let mut histogram = [0u64; 256];
    for pixel in image.pixels() {
        histogram[pixel.0[0] as usize] += 1;
    }

    let total: u64 = histogram.iter().sum();
    if total == 0 {
        return image.clone();
    }
    let clip = (total as f64 * cutoff as f64 / 100.0) as u64;

    let mut clipped = histogram;
    let mut remaining = clip;
    for bin in clipped.iter_mut() {
        if *bin >= remaining {
            *bin -= remaining;
            break;
        }
        remaining -= *bin;
        *bin = 0;
    }
    let mut remaining = clip;
    for bin in clipped.iter_mut().rev() {
        if *bin >= remaining {
            *bin -= remaining;
            break;
        }
        remaining -= *bin;
        *bin = 0;
    }

    let lo = clipped.iter().position(|&c| c > 0);
    let hi = clipped.iter().rposition(|&c| c > 0);
    let (Some(lo), Some(hi)) = (lo, hi) else {
        return image.clone();
    };
    if lo >= hi || (lo == 0 && hi == 255) {
        return image.clone();
    }

    let scale = 255.0 / (hi - lo) as f32;
    let mut lut = [0u8; 256];
    for (value, entry) in lut.iter_mut().enumerate() {
        *entry = (((value as f32 - lo as f32) * scale).round()).clamp(0.0, 255.0) as u8;
    }

    let mut out = image.clone();
    for pixel in out.pixels_mut() {
        pixel.0[0] = lut[pixel.0[0] as usize];
    }
    out
}
