use std::sync::Arc;
use std::time::Duration;

use kanal::AsyncSender;
use tokio_util::sync::CancellationToken;

use tangkap_hotkey::{Chord, HotkeyBridge};
use tangkap_types::{AppEvent, CaptureSource};

use crate::state::AppState;

/// Register the configured global hotkey and pump its events.
///
/// Runs the pump on a dedicated blocking thread, the one that owns the
/// native hotkey events; callbacks fire there and only send over the event
/// channel, so all state mutation stays in the event loop. Every failure
/// mode here degrades to the in-window shortcut instead of aborting.
pub async fn hotkey_io(
    state: Arc<AppState>,
    cancel: CancellationToken,
    event_tx: AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let (chord_text, enabled, delta_time) = {
        let config = state.config.read().await;
        (
            config.hotkey.chord.clone(),
            config.hotkey.enabled,
            Duration::from_millis(config.delta_time),
        )
    };
    if !enabled {
        tracing::info!("global hotkey disabled by configuration");
        return Ok(());
    }

    let tx = event_tx.to_sync();
    tokio::task::spawn_blocking(move || {
        if !HotkeyBridge::is_supported() {
            tracing::info!("global hotkey unavailable on this platform; in-window shortcut only");
            return;
        }

        let chord: Chord = match chord_text.parse() {
            Ok(chord) => chord,
            Err(e) => {
                tracing::warn!("invalid hotkey chord {chord_text:?}: {e}");
                return;
            }
        };

        let bridge = HotkeyBridge::new();
        // A global hotkey fires without a pointer position; the overlay
        // falls back to the primary display.
        let handle = match bridge.register(chord, move || {
            let _ = tx.send(AppEvent::CaptureRequested {
                source: CaptureSource::Hotkey,
                pointer: None,
            });
        }) {
            Ok(handle) => handle,
            Err(e) => {
                // Typically another process holds the chord. Recoverable:
                // the app keeps running without the global hotkey.
                tracing::warn!("{e}; continuing without a global hotkey");
                return;
            }
        };
        tracing::info!(%chord, "global hotkey registered");

        while !cancel.is_cancelled() {
            bridge.pump();
            std::thread::sleep(delta_time);
        }
        handle.unregister();
    })
    .await?;

    Ok(())
}
