use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OcrError {
    /// The recognition executable could not be located at invocation time.
    /// Distinct from a service-reported failure so the shell can tell the
    /// user how to fix it.
    #[error(
        "recognition service not found at {path:?}; install Tesseract or set TESSERACT_CMD"
    )]
    ServiceNotFound { path: PathBuf },

    /// The service ran but reported a failure of its own.
    #[error("recognition service failed: {0}")]
    ServiceFailed(String),

    #[error("capture bitmap is malformed ({width}x{height}, {len} bytes)")]
    InvalidBitmap { width: u32, height: u32, len: usize },

    #[error("failed to encode image for recognition: {0}")]
    Encode(String),
}
