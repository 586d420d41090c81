use std::env;

use serde::{Deserialize, Serialize};

fn default_chord() -> String {
    "Ctrl+Shift+O".to_string()
}

fn default_enabled() -> bool {
    true
}

/// Hotkey settings. The chord is kept as the user-facing string; parsing and
/// normalization happen in the hotkey bridge at registration time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HotkeyConfig {
    #[serde(default = "default_chord")]
    pub chord: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl HotkeyConfig {
    pub fn from_env() -> Self {
        let chord = env::var("CAPTURE_HOTKEY").unwrap_or_else(|_| default_chord());
        let enabled = env::var("CAPTURE_HOTKEY_ENABLED")
            .ok()
            .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
            .unwrap_or(true);
        Self { chord, enabled }
    }
}

impl Default for HotkeyConfig {
    fn default() -> Self {
        Self {
            chord: default_chord(),
            enabled: default_enabled(),
        }
    }
}
