use kanal::{AsyncReceiver, AsyncSender};
use tokio_util::sync::CancellationToken;

use tangkap_overlay::{Button, Key, Point, Resolution, ScreenProvider, SelectionOverlay};
use tangkap_types::AppEvent;

/// Overlay input forwarded by the host toolkit. Pointer positions are global
/// logical coordinates; the host's event loop feeds these while the overlay
/// surface is visible.
#[derive(Debug, Clone, Copy)]
pub enum OverlayInput {
    /// Arm the overlay (hotkey or in-window shortcut fired). Carries the
    /// pointer position when the host knows it.
    Begin { pointer: Option<Point> },
    PointerDown { at: Point, button: Button },
    PointerMove { at: Point },
    PointerUp { at: Point, button: Button },
    Key(Key),
}

/// Drive the selection overlay from host input events.
///
/// Every resolved interaction is reported as `AppEvent::CaptureFinished`:
/// `Some(bitmap)` for a capture, `None` for a cancellation. The pixel grab
/// happens synchronously here, as it does on the interaction thread of any
/// capture overlay; it is a single short blit.
pub async fn capture_loop(
    screens: impl ScreenProvider + Send + 'static,
    inputs: AsyncReceiver<OverlayInput>,
    event_tx: AsyncSender<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let mut overlay = SelectionOverlay::new();

    loop {
        let input = tokio::select! {
            _ = cancel.cancelled() => return Ok(()),
            input = inputs.recv() => input?,
        };

        let resolution = match input {
            OverlayInput::Begin { pointer } => overlay.begin_capture(pointer, &screens),
            OverlayInput::PointerDown { at, button } => {
                overlay.pointer_down(at, button);
                None
            }
            OverlayInput::PointerMove { at } => {
                overlay.pointer_move(at);
                None
            }
            OverlayInput::PointerUp { at, button } => {
                overlay.pointer_up(at, button, &screens)
            }
            OverlayInput::Key(key) => overlay.key_down(key),
        };

        if let Some(resolution) = resolution {
            let payload = match resolution {
                Resolution::Captured(bitmap) => Some(bitmap),
                Resolution::Cancelled => None,
            };
            event_tx.send(AppEvent::CaptureFinished(payload)).await?;
        }
    }
}
