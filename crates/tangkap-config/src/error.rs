use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("extra flag {flag:?} contains a shell metacharacter")]
    InvalidFlag { flag: String },

    #[error("language list is empty")]
    EmptyLanguages,

    #[error("tesseract override {path:?} does not exist")]
    CommandNotFound { path: PathBuf },

    #[error("tesseract override {path:?} is not an executable file")]
    CommandNotExecutable { path: PathBuf },

    #[error(
        "no usable tesseract executable found; install Tesseract or set TESSERACT_CMD"
    )]
    TesseractUnavailable,
}
