use std::sync::Arc;
use std::time::Duration;

use kanal::{AsyncReceiver, AsyncSender};
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use tangkap_overlay::{
    Button, DisplayInfo, Key, OverlayError, Point, Rect, ScreenProvider,
};
use tangkap_types::{AppEvent, CaptureRegion, CaptureSource, CapturedBitmap, UiPhase};

use crate::capture::{capture_loop, OverlayInput};
use crate::controller::AppController;
use crate::events::event_loop;
use crate::state::AppState;
use crate::tests::{blank_bitmap, test_config, text_bitmap, FakeBehavior, FakeService};

struct Harness {
    state: Arc<AppState>,
    event_tx: AsyncSender<AppEvent>,
    overlay_rx: AsyncReceiver<OverlayInput>,
    cancel: CancellationToken,
}

impl Drop for Harness {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

fn spawn_event_loop(behavior: FakeBehavior) -> Harness {
    let (event_tx, event_rx) = kanal::bounded_async(256);
    let (overlay_tx, overlay_rx) = kanal::bounded_async(64);
    let state = Arc::new(AppState::new(test_config()));
    let cancel = CancellationToken::new();

    tokio::spawn(event_loop(
        state.clone(),
        event_rx,
        event_tx.clone(),
        overlay_tx,
        cancel.child_token(),
        FakeService::new(behavior),
    ));

    Harness {
        state,
        event_tx,
        overlay_rx,
        cancel,
    }
}

async fn wait_for_phase(state: &AppState, phase: UiPhase) {
    let reached = timeout(Duration::from_secs(2), async {
        loop {
            if state.status.read().await.phase == phase {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await;
    assert!(reached.is_ok(), "phase {phase:?} never reached");
}

#[tokio::test]
async fn capture_request_arms_the_overlay() {
    let harness = spawn_event_loop(FakeBehavior::Reply("ok".to_string()));

    harness
        .event_tx
        .send(AppEvent::CaptureRequested {
            source: CaptureSource::Shortcut,
            pointer: None,
        })
        .await
        .unwrap();

    let input = timeout(Duration::from_secs(2), harness.overlay_rx.recv())
        .await
        .expect("overlay was never armed")
        .unwrap();
    assert!(matches!(input, OverlayInput::Begin { pointer: None }));
    assert_eq!(
        harness.state.status.read().await.phase,
        UiPhase::Capturing
    );
}

#[tokio::test]
async fn shortcut_pointer_position_reaches_the_overlay() {
    let harness = spawn_event_loop(FakeBehavior::Reply("ok".to_string()));

    harness
        .event_tx
        .send(AppEvent::CaptureRequested {
            source: CaptureSource::Shortcut,
            pointer: Some(Point::new(2040, 60)),
        })
        .await
        .unwrap();

    let input = timeout(Duration::from_secs(2), harness.overlay_rx.recv())
        .await
        .expect("overlay was never armed")
        .unwrap();
    assert!(matches!(
        input,
        OverlayInput::Begin { pointer: Some(p) } if p == Point::new(2040, 60)
    ));
}

#[tokio::test]
async fn capture_requests_are_ignored_while_busy() {
    let harness = spawn_event_loop(FakeBehavior::Reply("ok".to_string()));
    harness
        .state
        .set_phase(UiPhase::Recognizing, "busy")
        .await;

    harness
        .event_tx
        .send(AppEvent::CaptureRequested {
            source: CaptureSource::Hotkey,
            pointer: None,
        })
        .await
        .unwrap();

    // No Begin must reach the overlay while a capture is in flight.
    let input = timeout(Duration::from_millis(200), harness.overlay_rx.recv()).await;
    assert!(input.is_err(), "busy request still armed the overlay");
}

#[tokio::test]
async fn cancelled_capture_returns_to_idle() {
    let harness = spawn_event_loop(FakeBehavior::Reply("ok".to_string()));
    harness
        .state
        .set_phase(UiPhase::Capturing, "selecting")
        .await;

    harness
        .event_tx
        .send(AppEvent::CaptureFinished(None))
        .await
        .unwrap();

    wait_for_phase(&harness.state, UiPhase::Idle).await;
}

#[tokio::test]
async fn captured_bitmap_flows_through_recognition_into_status() {
    let harness = spawn_event_loop(FakeBehavior::Reply("  HELLO \n".to_string()));

    harness
        .event_tx
        .send(AppEvent::CaptureFinished(Some(text_bitmap())))
        .await
        .unwrap();

    wait_for_phase(&harness.state, UiPhase::ResultAvailable).await;
    let status = harness.state.status.read().await;
    assert_eq!(status.last_result, "HELLO");
    assert_eq!(status.capture_count, 1);
    assert_eq!(status.error_count, 0);
}

#[tokio::test]
async fn blank_capture_resolves_without_invoking_the_service() {
    let harness = spawn_event_loop(FakeBehavior::Panic);

    harness
        .event_tx
        .send(AppEvent::CaptureFinished(Some(blank_bitmap())))
        .await
        .unwrap();

    // A uniform bitmap short-circuits before the service, so even a
    // panicking service produces a clean empty result.
    wait_for_phase(&harness.state, UiPhase::ResultAvailable).await;
    let status = harness.state.status.read().await;
    assert_eq!(status.last_result, "");
    assert_eq!(status.message, "No text found");
}

#[tokio::test]
async fn failed_recognition_sets_the_error_phase() {
    let harness = spawn_event_loop(FakeBehavior::Fail("boom".to_string()));

    harness
        .event_tx
        .send(AppEvent::CaptureFinished(Some(text_bitmap())))
        .await
        .unwrap();

    wait_for_phase(&harness.state, UiPhase::Error).await;
    let status = harness.state.status.read().await;
    assert!(status.message.contains("boom"), "got {:?}", status.message);
    assert_eq!(status.error_count, 1);
}

#[tokio::test]
async fn host_senders_feed_the_shell_channels() {
    let state = Arc::new(AppState::new(test_config()));
    let controller = AppController::new(state);

    controller
        .event_sender()
        .send(AppEvent::CaptureRequested {
            source: CaptureSource::Shortcut,
            pointer: Some(Point::new(10, 20)),
        })
        .await
        .unwrap();
    controller
        .overlay_sender()
        .send(OverlayInput::Key(Key::Escape))
        .await
        .unwrap();

    // What a host pushes through the public senders is exactly what the
    // shell tasks would pick up off the controller's channels.
    let event = timeout(Duration::from_secs(2), controller.channels.events.1.recv())
        .await
        .expect("event never arrived")
        .unwrap();
    assert!(matches!(
        event,
        AppEvent::CaptureRequested {
            source: CaptureSource::Shortcut,
            pointer: Some(_),
        }
    ));
    let input = timeout(
        Duration::from_secs(2),
        controller.channels.overlay_input.1.recv(),
    )
    .await
    .expect("overlay input never arrived")
    .unwrap();
    assert!(matches!(input, OverlayInput::Key(Key::Escape)));
}

/// Thread-safe screen stand-in for driving `capture_loop` end to end.
struct StaticScreens;

impl ScreenProvider for StaticScreens {
    fn displays(&self) -> Result<Vec<DisplayInfo>, OverlayError> {
        Ok(vec![DisplayInfo {
            id: 1,
            bounds: Rect::new(0, 0, 1920, 1080),
            scale: 1.0,
            is_primary: true,
        }])
    }

    fn grab(&self, region: &CaptureRegion) -> Result<CapturedBitmap, OverlayError> {
        let (w, h) = (region.physical_width(), region.physical_height());
        Ok(CapturedBitmap {
            data: vec![0xff; (w * h * 4) as usize],
            width: w,
            height: h,
            scale: region.scale,
        })
    }
}

struct CaptureHarness {
    input_tx: AsyncSender<OverlayInput>,
    event_rx: AsyncReceiver<AppEvent>,
    cancel: CancellationToken,
}

impl Drop for CaptureHarness {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

fn spawn_capture_loop() -> CaptureHarness {
    let (input_tx, input_rx) = kanal::bounded_async(64);
    let (event_tx, event_rx) = kanal::bounded_async(64);
    let cancel = CancellationToken::new();

    tokio::spawn(capture_loop(
        StaticScreens,
        input_rx,
        event_tx,
        cancel.child_token(),
    ));

    CaptureHarness {
        input_tx,
        event_rx,
        cancel,
    }
}

#[tokio::test]
async fn a_full_drag_reports_a_captured_bitmap() {
    let harness = spawn_capture_loop();

    for input in [
        OverlayInput::Begin { pointer: None },
        OverlayInput::PointerDown {
            at: Point::new(10, 10),
            button: Button::Primary,
        },
        OverlayInput::PointerMove {
            at: Point::new(110, 60),
        },
        OverlayInput::PointerUp {
            at: Point::new(110, 60),
            button: Button::Primary,
        },
    ] {
        harness.input_tx.send(input).await.unwrap();
    }

    let event = timeout(Duration::from_secs(2), harness.event_rx.recv())
        .await
        .expect("capture never resolved")
        .unwrap();
    let AppEvent::CaptureFinished(Some(bitmap)) = event else {
        panic!("expected a captured bitmap, got {event:?}");
    };
    assert_eq!((bitmap.width, bitmap.height), (100, 50));
}

#[tokio::test]
async fn escape_during_selection_reports_a_cancellation() {
    let harness = spawn_capture_loop();

    harness
        .input_tx
        .send(OverlayInput::Begin { pointer: None })
        .await
        .unwrap();
    harness
        .input_tx
        .send(OverlayInput::Key(Key::Escape))
        .await
        .unwrap();

    let event = timeout(Duration::from_secs(2), harness.event_rx.recv())
        .await
        .expect("cancellation never resolved")
        .unwrap();
    assert!(matches!(event, AppEvent::CaptureFinished(None)));
}
