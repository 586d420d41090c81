mod display;
mod geometry;
mod model;

pub use display::{DisplayInfo, OverlayError, ScreenProvider, XcapScreens};
pub use geometry::{Point, Rect};
pub use model::{
    Button, Key, Mask, Phase, Resolution, SelectionOverlay, MASK_ALPHA,
    MIN_SELECTION_PHYSICAL,
};
