use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, GrayImage, ImageEncoder};

use tangkap_config::ocr::OcrConfig;

use crate::error::OcrError;

/// The external text-recognition engine, treated as opaque: give it a
/// normalized image and a configuration, get text back or an error.
pub trait RecognitionService {
    fn recognize(&self, image: &GrayImage, config: &OcrConfig) -> Result<String, OcrError>;
}

/// Tesseract invoked as a child process: PNG in over stdin, text out over
/// stdout. The executable path comes from the validated configuration.
#[derive(Debug, Default)]
pub struct TesseractEngine;

impl TesseractEngine {
    pub fn new() -> Self {
        Self
    }
}

impl RecognitionService for TesseractEngine {
    fn recognize(&self, image: &GrayImage, config: &OcrConfig) -> Result<String, OcrError> {
        let png = encode_png(image)?;
        invoke(
            config.command(),
            &png,
            config.languages(),
            &config.cli_flags(),
        )
    }
}

fn encode_png(image: &GrayImage) -> Result<Vec<u8>, OcrError> {
    let mut buffer = Vec::new();
    PngEncoder::new(&mut buffer)
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::L8,
        )
        .map_err(|e| OcrError::Encode(e.to_string()))?;
    Ok(buffer)
}

/// Run the recognition executable once. A missing binary (deleted or
/// unmounted since configuration time) maps to `ServiceNotFound`; a non-zero
/// exit maps to `ServiceFailed` carrying the service's own message.
fn invoke(
    command: &Path,
    png: &[u8],
    languages: &str,
    flags: &[String],
) -> Result<String, OcrError> {
    let mut child = Command::new(command)
        .arg("stdin")
        .arg("stdout")
        .arg("-l")
        .arg(languages)
        .args(flags)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => OcrError::ServiceNotFound {
                path: command.to_path_buf(),
            },
            _ => OcrError::ServiceFailed(e.to_string()),
        })?;

    if let Some(stdin) = child.stdin.take() {
        let mut stdin = stdin;
        // A write failure here usually means the child died early; the exit
        // status below carries the real error.
        if let Err(e) = stdin.write_all(png) {
            tracing::debug!("short write to recognition service: {e}");
        }
    }

    let output = child
        .wait_with_output()
        .map_err(|e| OcrError::ServiceFailed(e.to_string()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let message = stderr.trim();
        return Err(OcrError::ServiceFailed(if message.is_empty() {
            format!("exited with {}", output.status)
        } else {
            message.to_string()
        }));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
