//! Capture/recognition shell behind the `tangkap` binary.
//!
//! A host window embeds the shell by constructing an [`AppController`],
//! spawning its tasks, and talking to them over the controller's senders:
//! capture requests (with the cursor position, for the in-window shortcut)
//! go through [`AppController::event_sender`], pointer and key input for the
//! visible overlay through [`AppController::overlay_sender`].

pub mod capture;
pub mod controller;
pub mod state;
pub mod status;

mod dispatcher;
mod events;
mod io;

#[cfg(test)]
mod tests;

pub use capture::OverlayInput;
pub use controller::AppController;
pub use state::AppState;
pub use status::AppStatus;
