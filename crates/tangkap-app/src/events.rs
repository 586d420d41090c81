use std::sync::Arc;
use std::time::Duration;

use kanal::{AsyncReceiver, AsyncSender};
use tokio_util::sync::CancellationToken;

use tangkap_ocr::RecognitionService;
use tangkap_types::{AppEvent, CaptureSource, CapturedBitmap, Point, UiPhase};

use crate::capture::OverlayInput;
use crate::dispatcher::{Dispatcher, OcrJob};
use crate::state::AppState;

/// The shell's main loop: receives every `AppEvent` on the UI side and owns
/// the dispatcher. Recognition completions are marshalled back here as
/// events, so all status mutation happens on this task.
pub async fn event_loop(
    state: Arc<AppState>,
    event_rx: AsyncReceiver<AppEvent>,
    event_tx: AsyncSender<AppEvent>,
    overlay_tx: AsyncSender<OverlayInput>,
    cancel: CancellationToken,
    service: impl RecognitionService + Send + 'static,
) -> anyhow::Result<()> {
    let (ocr_config, shutdown_timeout) = {
        let config = state.config.read().await;
        (
            config.ocr.clone(),
            Duration::from_millis(config.shutdown_timeout_ms),
        )
    };
    let dispatcher = Dispatcher::spawn(ocr_config, service)?;

    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => break,
            event = event_rx.recv() => event?,
        };
        handle_event(&state, &event_tx, &overlay_tx, &dispatcher, event).await?;
    }

    // Let the in-flight job finish, but never hold up process exit past the
    // configured bound. The wait itself is blocking, so it runs off the
    // async workers.
    tokio::task::spawn_blocking(move || dispatcher.shutdown(shutdown_timeout)).await?;
    Ok(())
}

async fn handle_event(
    state: &Arc<AppState>,
    event_tx: &AsyncSender<AppEvent>,
    overlay_tx: &AsyncSender<OverlayInput>,
    dispatcher: &Dispatcher,
    event: AppEvent,
) -> anyhow::Result<()> {
    match event {
        AppEvent::CaptureRequested { source, pointer } => {
            handle_capture_request(state, overlay_tx, source, pointer).await?;
        }
        AppEvent::CaptureFinished(None) => {
            tracing::info!("capture cancelled");
            state.set_phase(UiPhase::Idle, "Capture cancelled").await;
        }
        AppEvent::CaptureFinished(Some(bitmap)) => {
            handle_captured_bitmap(state, event_tx, dispatcher, bitmap).await;
        }
        AppEvent::OcrFinished(text) => {
            handle_ocr_result(state, text).await;
        }
        AppEvent::OcrFailed(message) => {
            tracing::error!("recognition failed: {message}");
            let mut status = state.status.write().await;
            status.phase = UiPhase::Error;
            status.message = message;
            status.error_count += 1;
        }
    }
    Ok(())
}

async fn handle_capture_request(
    state: &Arc<AppState>,
    overlay_tx: &AsyncSender<OverlayInput>,
    source: CaptureSource,
    pointer: Option<Point>,
) -> anyhow::Result<()> {
    {
        let status = state.status.read().await;
        if status.is_busy() {
            tracing::debug!(?source, "busy, ignoring capture request");
            return Ok(());
        }
    }
    tracing::debug!(?source, ?pointer, "starting capture");
    state
        .set_phase(UiPhase::Capturing, "Select an area to capture…")
        .await;
    overlay_tx.send(OverlayInput::Begin { pointer }).await?;
    Ok(())
}

async fn handle_captured_bitmap(
    state: &Arc<AppState>,
    event_tx: &AsyncSender<AppEvent>,
    dispatcher: &Dispatcher,
    bitmap: CapturedBitmap,
) {
    tracing::debug!(?bitmap, "queueing recognition");
    state.set_phase(UiPhase::Recognizing, "Running OCR…").await;
    {
        let mut status = state.status.write().await;
        status.capture_count += 1;
    }

    // The completion callback runs on the worker thread; it only performs a
    // channel send, and this loop picks the result up as an event.
    let tx = event_tx.clone_sync();
    let job = OcrJob {
        bitmap,
        on_done: Box::new(move |result| {
            let event = match result {
                Ok(text) => AppEvent::OcrFinished(text),
                Err(e) => AppEvent::OcrFailed(e.to_string()),
            };
            let _ = tx.send(event);
        }),
    };
    if !dispatcher.submit(job) {
        tracing::error!("recognition worker is gone, failing job");
        let mut status = state.status.write().await;
        status.phase = UiPhase::Error;
        status.message = "Recognition worker unavailable".to_string();
        status.error_count += 1;
    }
}

async fn handle_ocr_result(state: &Arc<AppState>, text: String) {
    tracing::info!(chars = text.chars().count(), "recognition finished");

    let auto_copy = { state.config.read().await.auto_copy };
    if auto_copy && !text.is_empty() {
        copy_to_clipboard(&text);
    }

    let mut status = state.status.write().await;
    status.phase = UiPhase::ResultAvailable;
    status.message = if text.is_empty() {
        "No text found".to_string()
    } else {
        format!("OCR finished – {} characters", text.chars().count())
    };
    status.last_result = text;
}

fn copy_to_clipboard(text: &str) {
    match arboard::Clipboard::new() {
        Ok(mut clipboard) => {
            if let Err(e) = clipboard.set_text(text.to_string()) {
                tracing::warn!("clipboard copy failed: {e}");
            }
        }
        Err(e) => tracing::warn!("clipboard unavailable: {e}"),
    }
}
