use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default language packs, in Tesseract shorthand (Indonesian + English).
pub const DEFAULT_LANGUAGES: &str = "ind+eng";

/// Characters that must never appear in passthrough flags. The flags end up
/// on a child-process command line, so anything that smells like shell
/// control metadata is rejected up front.
const FLAG_METACHARACTERS: [char; 4] = ['\n', ';', '&', '|'];

fn default_languages() -> String {
    DEFAULT_LANGUAGES.to_string()
}

fn default_psm() -> i32 {
    6
}

fn default_oem() -> i32 {
    1
}

/// Unvalidated OCR settings, as read from the environment or a config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrOptions {
    #[serde(default = "default_languages")]
    pub languages: String,
    /// Explicit override for the Tesseract executable. Always wins over
    /// discovery when set.
    pub tesseract_cmd: Option<PathBuf>,
    /// Page segmentation mode, passed through to Tesseract unchanged.
    #[serde(default = "default_psm")]
    pub psm: i32,
    /// Engine mode, passed through to Tesseract unchanged.
    #[serde(default = "default_oem")]
    pub oem: i32,
    /// Raw flags forwarded to Tesseract, e.g. DPI hints.
    pub extra_flags: Vec<String>,
}

impl OcrOptions {
    /// Read overrides from the environment, once. `TESSERACT_CMD` and
    /// `OCR_LANGUAGES` mirror the conventional variable names.
    pub fn from_env() -> Self {
        let languages = env::var("OCR_LANGUAGES")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(default_languages);
        let tesseract_cmd = env::var("TESSERACT_CMD")
            .ok()
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        Self {
            languages,
            tesseract_cmd,
            ..Self::default()
        }
    }
}

impl Default for OcrOptions {
    fn default() -> Self {
        Self {
            languages: default_languages(),
            tesseract_cmd: None,
            psm: default_psm(),
            oem: default_oem(),
            extra_flags: Vec::new(),
        }
    }
}

/// Validated OCR engine configuration.
///
/// Construction is the only place validation happens: malformed flags or an
/// unusable executable override fail here, never at recognition time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrConfig {
    languages: String,
    command: PathBuf,
    psm: i32,
    oem: i32,
    extra_flags: Vec<String>,
}

impl OcrConfig {
    pub fn new(options: OcrOptions) -> Result<Self, ConfigError> {
        let languages = options.languages.trim().to_string();
        if languages.is_empty() {
            return Err(ConfigError::EmptyLanguages);
        }

        for flag in &options.extra_flags {
            if flag.contains(FLAG_METACHARACTERS) {
                return Err(ConfigError::InvalidFlag { flag: flag.clone() });
            }
        }

        let command = resolve_command(options.tesseract_cmd.as_deref())?;

        Ok(Self {
            languages,
            command,
            psm: options.psm,
            oem: options.oem,
            extra_flags: options.extra_flags,
        })
    }

    pub fn languages(&self) -> &str {
        &self.languages
    }

    pub fn command(&self) -> &Path {
        &self.command
    }

    pub fn psm(&self) -> i32 {
        self.psm
    }

    pub fn oem(&self) -> i32 {
        self.oem
    }

    pub fn extra_flags(&self) -> &[String] {
        &self.extra_flags
    }

    /// Compose the CLI flag list consumed by Tesseract, in a stable order:
    /// segmentation mode, engine mode, then the passthrough flags verbatim.
    pub fn cli_flags(&self) -> Vec<String> {
        let mut flags = Vec::new();
        if self.psm >= 0 {
            flags.push("--psm".to_string());
            flags.push(self.psm.to_string());
        }
        if self.oem >= 0 {
            flags.push("--oem".to_string());
            flags.push(self.oem.to_string());
        }
        flags.extend(self.extra_flags.iter().cloned());
        flags
    }
}

/// Well-known install locations checked when no override is given.
fn well_known_locations() -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if cfg!(windows) {
        for var in ["PROGRAMFILES", "PROGRAMFILES(X86)"] {
            if let Ok(base) = env::var(var) {
                candidates.push(
                    Path::new(&base).join("Tesseract-OCR").join("tesseract.exe"),
                );
            }
        }
        candidates.push(PathBuf::from("C:/Program Files/Tesseract-OCR/tesseract.exe"));
        candidates.push(PathBuf::from(
            "C:/Program Files (x86)/Tesseract-OCR/tesseract.exe",
        ));
    } else {
        candidates.push(PathBuf::from("/usr/bin/tesseract"));
        candidates.push(PathBuf::from("/usr/local/bin/tesseract"));
        candidates.push(PathBuf::from("/opt/homebrew/bin/tesseract"));
    }
    candidates
}

/// Locate the Tesseract executable.
///
/// Order: explicit override (hard error if unusable), well-known install
/// locations, then a `PATH` search. Coming up empty is a configuration
/// error so the user hears about it before the first capture.
fn resolve_command(overridden: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = overridden {
        return validate_executable(path);
    }

    for candidate in well_known_locations() {
        if is_executable(&candidate) {
            return Ok(candidate);
        }
    }

    if let Some(found) = find_on_path() {
        return Ok(found);
    }

    Err(ConfigError::TesseractUnavailable)
}

fn validate_executable(path: &Path) -> Result<PathBuf, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::CommandNotFound {
            path: path.to_path_buf(),
        });
    }
    if !is_executable(path) {
        return Err(ConfigError::CommandNotExecutable {
            path: path.to_path_buf(),
        });
    }
    Ok(path.to_path_buf())
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

fn find_on_path() -> Option<PathBuf> {
    let exe = if cfg!(windows) {
        "tesseract.exe"
    } else {
        "tesseract"
    };
    let path = env::var_os("PATH")?;
    env::split_paths(&path)
        .map(|dir| dir.join(exe))
        .find(|candidate| is_executable(candidate))
}
