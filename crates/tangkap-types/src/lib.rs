pub mod types;

pub use types::{AppEvent, CaptureRegion, CaptureSource, CapturedBitmap, Point, UiPhase};
