use tangkap_types::{CaptureRegion, CapturedBitmap};

use crate::display::{display_for_pointer, DisplayInfo, ScreenProvider};
use crate::geometry::{Point, Rect};

/// Drags narrower or shorter than this many physical pixels are treated as
/// accidental clicks and cancelled.
pub const MIN_SELECTION_PHYSICAL: u32 = 5;

/// Alpha of the dimmed mask drawn outside the live selection.
pub const MASK_ALPHA: u8 = 160;

/// Interaction state of the capture overlay.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Phase {
    /// Overlay hidden, no drag state.
    #[default]
    Idle,
    /// Overlay shown full-screen on `display`, waiting for a pointer-down.
    Armed { display: DisplayInfo },
    /// Primary button held; `current` is the normalized live rectangle.
    Dragging {
        display: DisplayInfo,
        origin: Point,
        current: Rect,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Primary,
    Secondary,
}

/// Keys the overlay reacts to while visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    /// `Q` cancels too, matching the capture overlay convention.
    KeyQ,
    Other,
}

/// Terminal outcome of one capture interaction.
#[derive(Debug)]
pub enum Resolution {
    Captured(CapturedBitmap),
    Cancelled,
}

/// What the host should paint: a dim mask covering the armed display, with a
/// fully transparent hole over the live selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mask {
    pub bounds: Rect,
    pub hole: Option<Rect>,
    pub alpha: u8,
}

/// The selection overlay state machine.
///
/// `Idle → Armed → Dragging → {Captured, Cancelled} → Idle`. Pointer and key
/// positions are global logical coordinates supplied by the host; every
/// method that can resolve the interaction returns `Some(Resolution)` and
/// leaves the machine back in `Idle`.
#[derive(Debug, Default)]
pub struct SelectionOverlay {
    phase: Phase,
}

impl SelectionOverlay {
    pub fn new() -> Self {
        Self { phase: Phase::Idle }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_visible(&self) -> bool {
        !matches!(self.phase, Phase::Idle)
    }

    /// Arm the overlay on the display under `pointer` (primary fallback).
    ///
    /// A re-entrant call while a capture is already in progress is ignored,
    /// not queued. When no display can be resolved at all the interaction
    /// resolves to `Cancelled` immediately.
    pub fn begin_capture(
        &mut self,
        pointer: Option<Point>,
        screens: &dyn ScreenProvider,
    ) -> Option<Resolution> {
        if !matches!(self.phase, Phase::Idle) {
            tracing::debug!("capture already in progress, ignoring request");
            return None;
        }

        let displays = match screens.displays() {
            Ok(displays) => displays,
            Err(e) => {
                tracing::warn!("display enumeration failed: {e}");
                return self.resolve_cancelled();
            }
        };
        let Some(display) = display_for_pointer(&displays, pointer) else {
            tracing::warn!("no display resolved, cancelling capture");
            return self.resolve_cancelled();
        };

        let display_id = display.id;
        tracing::debug!(display = display_id, "overlay armed");
        self.phase = Phase::Armed { display };
        None
    }

    /// Primary pointer-down while armed starts the drag.
    pub fn pointer_down(&mut self, at: Point, button: Button) {
        if button != Button::Primary {
            return;
        }
        if let Phase::Armed { display } = self.phase {
            self.phase = Phase::Dragging {
                display,
                origin: at,
                current: Rect::from_points(at, at),
            };
        }
    }

    /// Update the live rectangle. Returns the new rectangle when dragging so
    /// the host knows to repaint.
    pub fn pointer_move(&mut self, at: Point) -> Option<Rect> {
        if let Phase::Dragging {
            origin, current, ..
        } = &mut self.phase
        {
            *current = Rect::from_points(*origin, at);
            Some(*current)
        } else {
            None
        }
    }

    /// Primary pointer-up finalizes the drag: too-small selections cancel,
    /// anything else is grabbed from the owning display at full pixel
    /// density. A failed grab (display unplugged mid-drag) cancels.
    pub fn pointer_up(
        &mut self,
        at: Point,
        button: Button,
        screens: &dyn ScreenProvider,
    ) -> Option<Resolution> {
        if button != Button::Primary {
            return None;
        }
        let Phase::Dragging {
            display, origin, ..
        } = self.phase
        else {
            return None;
        };

        let rect = Rect::from_points(origin, at);
        let region = CaptureRegion {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            display_id: display.id,
            scale: display.scale,
        };
        if region.physical_width() < MIN_SELECTION_PHYSICAL
            || region.physical_height() < MIN_SELECTION_PHYSICAL
        {
            tracing::debug!(?rect, "selection below minimum size, cancelling");
            return self.resolve_cancelled();
        }

        self.phase = Phase::Idle;
        match screens.grab(&region) {
            Ok(bitmap) => {
                tracing::debug!(
                    width = bitmap.width,
                    height = bitmap.height,
                    "selection captured"
                );
                Some(Resolution::Captured(bitmap))
            }
            Err(e) => {
                tracing::warn!("pixel grab failed: {e}");
                Some(Resolution::Cancelled)
            }
        }
    }

    /// Escape (or `Q`) cancels at any point while the overlay is visible.
    pub fn key_down(&mut self, key: Key) -> Option<Resolution> {
        if !self.is_visible() {
            return None;
        }
        match key {
            Key::Escape | Key::KeyQ => self.resolve_cancelled(),
            Key::Other => None,
        }
    }

    /// View model for the host's paint pass: full-display dim mask with a
    /// see-through hole over the live selection.
    pub fn mask(&self) -> Option<Mask> {
        match &self.phase {
            Phase::Idle => None,
            Phase::Armed { display } => Some(Mask {
                bounds: display.bounds,
                hole: None,
                alpha: MASK_ALPHA,
            }),
            Phase::Dragging {
                display, current, ..
            } => Some(Mask {
                bounds: display.bounds,
                hole: Some(*current),
                alpha: MASK_ALPHA,
            }),
        }
    }

    fn resolve_cancelled(&mut self) -> Option<Resolution> {
        self.phase = Phase::Idle;
        Some(Resolution::Cancelled)
    }
}
