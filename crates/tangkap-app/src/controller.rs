use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use tangkap_ocr::TesseractEngine;
use tangkap_overlay::XcapScreens;
use tangkap_types::AppEvent;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::capture::{capture_loop, OverlayInput};
use crate::events::event_loop;
use crate::io::hotkey_io;
use crate::state::AppState;

/// Centralized channel management
pub struct ChannelSet {
    pub events: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
    pub overlay_input: (AsyncSender<OverlayInput>, AsyncReceiver<OverlayInput>),
}

impl ChannelSet {
    pub fn new() -> Self {
        Self {
            events: kanal::bounded_async(256), // capture + OCR completion burst capacity
            overlay_input: kanal::bounded_async(64), // pointer/key interactions
        }
    }
}

/// Application controller for task spawning and lifecycle
pub struct AppController {
    pub(crate) channels: ChannelSet,
    state: Arc<AppState>,
    cancel_token: CancellationToken,
}

impl AppController {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            channels: ChannelSet::new(),
            state,
            cancel_token: CancellationToken::new(),
        }
    }

    /// Sender a host window uses to request a capture (in-window shortcut).
    pub fn event_sender(&self) -> AsyncSender<AppEvent> {
        self.channels.events.0.clone()
    }

    /// Sender a host window uses to feed pointer and key input to the overlay.
    pub fn overlay_sender(&self) -> AsyncSender<OverlayInput> {
        self.channels.overlay_input.0.clone()
    }

    pub fn spawn_tasks(&self) -> JoinSet<anyhow::Result<()>> {
        let mut tasks = JoinSet::new();

        // Event loop, owns the recognition dispatcher
        tasks.spawn(event_loop(
            self.state.clone(),
            self.channels.events.1.clone(),
            self.channels.events.0.clone(),
            self.channels.overlay_input.0.clone(),
            self.cancel_token.child_token(),
            TesseractEngine::new(),
        ));

        // Selection overlay
        tasks.spawn(capture_loop(
            XcapScreens,
            self.channels.overlay_input.1.clone(),
            self.channels.events.0.clone(),
            self.cancel_token.child_token(),
        ));

        // Global hotkey IO
        tasks.spawn(hotkey_io(
            self.state.clone(),
            self.cancel_token.child_token(),
            self.channels.events.0.clone(),
        ));

        tasks
    }

    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}
