mod engine;
mod error;
mod preprocess;

pub use engine::{RecognitionService, TesseractEngine};
pub use error::OcrError;
pub use preprocess::{autocontrast, has_content, preprocess};

use tangkap_config::ocr::OcrConfig;
use tangkap_types::CapturedBitmap;

/// Run the full pipeline on one captured bitmap: normalize, short-circuit on
/// blank input, invoke the recognition service, trim the result.
///
/// Pure apart from the service invocation; the bitmap is consumed by the
/// calling job and dropped when this returns.
pub fn recognize(
    bitmap: &CapturedBitmap,
    config: &OcrConfig,
    service: &dyn RecognitionService,
) -> Result<String, OcrError> {
    let normalized = preprocess(bitmap)?;
    if !has_content(&normalized) {
        // Nothing but background; skip the service round-trip entirely.
        tracing::debug!("blank capture, skipping recognition");
        return Ok(String::new());
    }
    let text = service.recognize(&normalized, config)?;
    Ok(text.trim().to_string())
}
