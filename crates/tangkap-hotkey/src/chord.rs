use std::fmt;
use std::str::FromStr;

use global_hotkey::hotkey::{Code, HotKey, Modifiers};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChordError {
    #[error("chord has no keys")]
    Empty,
    #[error("chord {0:?} has modifiers but no key")]
    MissingKey(String),
    #[error("chord {0:?} has more than one non-modifier key")]
    ExtraKey(String),
    #[error("unknown key {0:?} in chord")]
    UnknownKey(String),
}

/// A normalized key combination: a modifier bitmask plus exactly one key.
///
/// Parsed from user-facing strings like `"Ctrl+Shift+O"`. A chord with zero
/// keys is a construction error, so every `Chord` that exists is
/// registrable in principle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chord {
    pub modifiers: Modifiers,
    pub code: Code,
}

impl Chord {
    pub fn new(modifiers: Modifiers, code: Code) -> Self {
        Self { modifiers, code }
    }

    /// Default capture chord.
    pub fn capture_default() -> Self {
        Self::new(Modifiers::CONTROL | Modifiers::SHIFT, Code::KeyO)
    }

    pub(crate) fn to_hotkey(self) -> HotKey {
        let modifiers = if self.modifiers.is_empty() {
            None
        } else {
            Some(self.modifiers)
        };
        HotKey::new(modifiers, self.code)
    }
}

impl FromStr for Chord {
    type Err = ChordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = s
            .split('+')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect();
        if tokens.is_empty() {
            return Err(ChordError::Empty);
        }

        let mut modifiers = Modifiers::empty();
        let mut code = None;
        for token in tokens {
            if let Some(modifier) = parse_modifier(token) {
                modifiers |= modifier;
            } else {
                let parsed = parse_code(token)
                    .ok_or_else(|| ChordError::UnknownKey(token.to_string()))?;
                if code.replace(parsed).is_some() {
                    return Err(ChordError::ExtraKey(s.to_string()));
                }
            }
        }

        match code {
            Some(code) => Ok(Self { modifiers, code }),
            None => Err(ChordError::MissingKey(s.to_string())),
        }
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (bit, name) in [
            (Modifiers::CONTROL, "Ctrl"),
            (Modifiers::SHIFT, "Shift"),
            (Modifiers::ALT, "Alt"),
            (Modifiers::SUPER, "Super"),
        ] {
            if self.modifiers.contains(bit) {
                write!(f, "{name}+")?;
            }
        }
        write!(f, "{}", code_name(self.code))
    }
}

fn parse_modifier(token: &str) -> Option<Modifiers> {
    match token.to_ascii_lowercase().as_str() {
        "ctrl" | "control" => Some(Modifiers::CONTROL),
        "shift" => Some(Modifiers::SHIFT),
        "alt" | "option" => Some(Modifiers::ALT),
        "super" | "win" | "cmd" | "meta" => Some(Modifiers::SUPER),
        _ => None,
    }
}

fn parse_code(token: &str) -> Option<Code> {
    let upper = token.to_ascii_uppercase();
    let code = match upper.as_str() {
        "A" => Code::KeyA,
        "B" => Code::KeyB,
        "C" => Code::KeyC,
        "D" => Code::KeyD,
        "E" => Code::KeyE,
        "F" => Code::KeyF,
        "G" => Code::KeyG,
        "H" => Code::KeyH,
        "I" => Code::KeyI,
        "J" => Code::KeyJ,
        "K" => Code::KeyK,
        "L" => Code::KeyL,
        "M" => Code::KeyM,
        "N" => Code::KeyN,
        "O" => Code::KeyO,
        "P" => Code::KeyP,
        "Q" => Code::KeyQ,
        "R" => Code::KeyR,
        "S" => Code::KeyS,
        "T" => Code::KeyT,
        "U" => Code::KeyU,
        "V" => Code::KeyV,
        "W" => Code::KeyW,
        "X" => Code::KeyX,
        "Y" => Code::KeyY,
        "Z" => Code::KeyZ,
        "0" => Code::Digit0,
        "1" => Code::Digit1,
        "2" => Code::Digit2,
        "3" => Code::Digit3,
        "4" => Code::Digit4,
        "5" => Code::Digit5,
        "6" => Code::Digit6,
        "7" => Code::Digit7,
        "8" => Code::Digit8,
        "9" => Code::Digit9,
        "F1" => Code::F1,
        "F2" => Code::F2,
        "F3" => Code::F3,
        "F4" => Code::F4,
        "F5" => Code::F5,
        "F6" => Code::F6,
        "F7" => Code::F7,
        "F8" => Code::F8,
        "F9" => Code::F9,
        "F10" => Code::F10,
        "F11" => Code::F11,
        "F12" => Code::F12,
        "SPACE" => Code::Space,
        "ENTER" | "RETURN" => Code::Enter,
        "TAB" => Code::Tab,
        "ESC" | "ESCAPE" => Code::Escape,
        "BACKSPACE" => Code::Backspace,
        "DELETE" | "DEL" => Code::Delete,
        "INSERT" | "INS" => Code::Insert,
        "HOME" => Code::Home,
        "END" => Code::End,
        "PAGEUP" => Code::PageUp,
        "PAGEDOWN" => Code::PageDown,
        "UP" => Code::ArrowUp,
        "DOWN" => Code::ArrowDown,
        "LEFT" => Code::ArrowLeft,
        "RIGHT" => Code::ArrowRight,
        "PRINTSCREEN" => Code::PrintScreen,
        _ => return None,
    };
    Some(code)
}

fn code_name(code: Code) -> String {
    let name = format!("{code:?}");
    name.strip_prefix("Key")
        .or_else(|| name.strip_prefix("Digit"))
        .unwrap_or(&name)
        .to_string()
}
