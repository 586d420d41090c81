mod bridge;
mod chord;

pub use bridge::{HotkeyBridge, HotkeyError, HotkeyHandle};
pub use chord::{Chord, ChordError};
