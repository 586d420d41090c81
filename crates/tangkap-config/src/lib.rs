use std::env;

use serde::{Deserialize, Serialize};

use self::error::ConfigError;
use self::hotkey::HotkeyConfig;
use self::ocr::{OcrConfig, OcrOptions};

pub mod error;
pub mod hotkey;
pub mod ocr;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub ocr: OcrConfig,
    pub hotkey: HotkeyConfig,

    /// Copy recognized text to the clipboard automatically.
    pub auto_copy: bool,
    /// Hotkey pump tick interval.
    pub delta_time: u64,
    /// How long shutdown waits for an in-flight OCR job before abandoning it.
    pub shutdown_timeout_ms: u64,
}

impl Config {
    /// Read configuration from the environment, once, and validate it.
    ///
    /// Validation happens here rather than at capture time so a bad flag or
    /// an unusable Tesseract path is reported before the first capture.
    pub fn load() -> Result<Self, ConfigError> {
        let auto_copy = env::var("AUTO_COPY")
            .ok()
            .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
            .unwrap_or(true);

        let delta_time = env::var("DELTA_TIME_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30); // 30ms default

        let shutdown_timeout_ms = env::var("SHUTDOWN_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(2000); // 2 seconds default

        Ok(Config {
            ocr: OcrConfig::new(OcrOptions::from_env())?,
            hotkey: HotkeyConfig::from_env(),
            auto_copy,
            delta_time,
            shutdown_timeout_ms,
        })
    }
}
