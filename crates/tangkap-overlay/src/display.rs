use thiserror::Error;
use xcap::Monitor;

use tangkap_types::{CaptureRegion, CapturedBitmap};

use crate::geometry::{Point, Rect};

#[derive(Debug, Error)]
pub enum OverlayError {
    #[error("failed to enumerate displays: {0}")]
    DisplayEnumeration(String),
    #[error("display {0} is gone")]
    DisplayGone(u32),
    #[error("pixel grab failed: {0}")]
    GrabFailed(String),
}

/// Geometry of one physical display, in global logical coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayInfo {
    pub id: u32,
    pub bounds: Rect,
    /// Device-to-logical pixel ratio.
    pub scale: f32,
    pub is_primary: bool,
}

/// Host-side screen access: display enumeration and region pixel grabs.
///
/// The overlay state machine talks to screens only through this trait so the
/// interaction logic stays testable without real displays.
pub trait ScreenProvider {
    fn displays(&self) -> Result<Vec<DisplayInfo>, OverlayError>;

    /// Grab exactly `region` from its owning display. The returned bitmap is
    /// sized in physical pixels (logical dimensions times the display's
    /// scale factor) so high-density captures stay pixel-exact.
    fn grab(&self, region: &CaptureRegion) -> Result<CapturedBitmap, OverlayError>;
}

/// Production `ScreenProvider` backed by xcap monitors.
pub struct XcapScreens;

impl ScreenProvider for XcapScreens {
    fn displays(&self) -> Result<Vec<DisplayInfo>, OverlayError> {
        let monitors =
            Monitor::all().map_err(|e| OverlayError::DisplayEnumeration(e.to_string()))?;
        Ok(monitors
            .iter()
            .map(|m| DisplayInfo {
                id: m.id(),
                bounds: Rect::new(m.x(), m.y(), m.width(), m.height()),
                scale: m.scale_factor(),
                is_primary: m.is_primary(),
            })
            .collect())
    }

    fn grab(&self, region: &CaptureRegion) -> Result<CapturedBitmap, OverlayError> {
        let monitors =
            Monitor::all().map_err(|e| OverlayError::DisplayEnumeration(e.to_string()))?;
        let monitor = monitors
            .into_iter()
            .find(|m| m.id() == region.display_id)
            .ok_or(OverlayError::DisplayGone(region.display_id))?;

        // capture_image returns the whole monitor in physical pixels; crop
        // the requested region after scaling its monitor-local coordinates.
        let image = monitor
            .capture_image()
            .map_err(|e| OverlayError::GrabFailed(e.to_string()))?;

        let local_x = (region.x - monitor.x()).max(0) as f32;
        let local_y = (region.y - monitor.y()).max(0) as f32;
        let cropped = xcap::image::imageops::crop_imm(
            &image,
            (local_x * region.scale).round() as u32,
            (local_y * region.scale).round() as u32,
            region.physical_width(),
            region.physical_height(),
        )
        .to_image();

        Ok(CapturedBitmap {
            width: cropped.width(),
            height: cropped.height(),
            data: cropped.into_raw(),
            scale: region.scale,
        })
    }
}

/// The display containing `pointer`, falling back to the primary display,
/// then to the first enumerated one.
pub(crate) fn display_for_pointer(
    displays: &[DisplayInfo],
    pointer: Option<Point>,
) -> Option<DisplayInfo> {
    pointer
        .and_then(|p| displays.iter().find(|d| d.bounds.contains(p)))
        .or_else(|| displays.iter().find(|d| d.is_primary))
        .or_else(|| displays.first())
        .copied()
}
