use std::fmt;

use serde::{Deserialize, Serialize};

/// A point in global logical coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A finished selection, in the coordinate space of a single display.
///
/// `x`/`y`/`width`/`height` are global logical coordinates; `scale` is the
/// owning display's device-to-logical pixel ratio. Produced once by the
/// overlay when a drag completes and consumed exactly once by the pixel grab.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CaptureRegion {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub display_id: u32,
    pub scale: f32,
}

impl CaptureRegion {
    /// Width in physical pixels on the owning display.
    pub fn physical_width(&self) -> u32 {
        (self.width as f32 * self.scale).round() as u32
    }

    /// Height in physical pixels on the owning display.
    pub fn physical_height(&self) -> u32 {
        (self.height as f32 * self.scale).round() as u32
    }
}

/// Raw RGBA8 pixels grabbed from a display, sized in physical pixels.
///
/// Owned by the pipeline job that receives it and dropped once recognition
/// completes or fails.
#[derive(Clone)]
pub struct CapturedBitmap {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub scale: f32,
}

impl fmt::Debug for CapturedBitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapturedBitmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("scale", &self.scale)
            .field("bytes", &self.data.len())
            .finish()
    }
}

/// What triggered a capture request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureSource {
    /// System-wide hotkey, pressed while the app may not have focus.
    Hotkey,
    /// In-window shortcut or button.
    Shortcut,
}

/// User-visible state of the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UiPhase {
    #[default]
    Idle,
    Capturing,
    Recognizing,
    ResultAvailable,
    Error,
}

#[derive(Debug, Clone)]
pub enum AppEvent {
    /// `pointer` is the global cursor position when the requester knows it
    /// (in-window shortcut); the overlay arms on that display. Global
    /// hotkeys fire without one and fall back to the primary display.
    CaptureRequested {
        source: CaptureSource,
        pointer: Option<Point>,
    },
    /// Overlay resolved: `Some` carries the grabbed pixels, `None` means the
    /// capture was cancelled (escape, too-small drag, no display).
    CaptureFinished(Option<CapturedBitmap>),
    OcrFinished(String),
    OcrFailed(String),
}
