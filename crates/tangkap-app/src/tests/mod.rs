use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use image::GrayImage;
use tangkap_config::ocr::{OcrConfig, OcrOptions};
use tangkap_config::Config;
use tangkap_config::hotkey::HotkeyConfig;
use tangkap_ocr::{OcrError, RecognitionService};
use tangkap_types::CapturedBitmap;

mod event_flow_tests;

/// What a [`FakeService`] does when the worker invokes it.
pub enum FakeBehavior {
    Reply(String),
    Fail(String),
    Panic,
    /// Block until the paired sender releases one permit (or closes).
    WaitFor(kanal::Receiver<()>),
    SleepThenReply(Duration, String),
}

/// Recognition stand-in for worker and event-loop tests. Logs `start`/`done`
/// around every invocation so ordering and overlap are observable.
pub struct FakeService {
    pub behavior: FakeBehavior,
    pub log: Arc<Mutex<Vec<String>>>,
}

impl FakeService {
    pub fn new(behavior: FakeBehavior) -> Self {
        Self {
            behavior,
            log: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl RecognitionService for FakeService {
    fn recognize(&self, _image: &GrayImage, _config: &OcrConfig) -> Result<String, OcrError> {
        self.log.lock().unwrap().push("start".to_string());
        let result = match &self.behavior {
            FakeBehavior::Reply(text) => Ok(text.clone()),
            FakeBehavior::Fail(message) => Err(OcrError::ServiceFailed(message.clone())),
            FakeBehavior::Panic => panic!("injected service panic"),
            FakeBehavior::WaitFor(gate) => {
                let _ = gate.recv();
                Ok("gated".to_string())
            }
            FakeBehavior::SleepThenReply(duration, text) => {
                std::thread::sleep(*duration);
                Ok(text.clone())
            }
        };
        self.log.lock().unwrap().push("done".to_string());
        result
    }
}

/// A config whose recognition command points at something that exists, so
/// validation passes without Tesseract installed. The fake services never
/// actually run it.
pub fn test_config() -> Config {
    Config {
        ocr: OcrConfig::new(OcrOptions {
            tesseract_cmd: Some(PathBuf::from(if cfg!(unix) {
                "/bin/sh"
            } else {
                "C:/Windows/System32/cmd.exe"
            })),
            ..OcrOptions::default()
        })
        .unwrap(),
        hotkey: HotkeyConfig::default(),
        // Keep tests off the real clipboard.
        auto_copy: false,
        delta_time: 30,
        shutdown_timeout_ms: 2000,
    }
}

pub fn blank_bitmap() -> CapturedBitmap {
    CapturedBitmap {
        data: vec![0xff; 32 * 32 * 4],
        width: 32,
        height: 32,
        scale: 1.0,
    }
}

/// White bitmap with scattered dark pixels so the blank-capture short-circuit
/// does not kick in and the service gets invoked.
pub fn text_bitmap() -> CapturedBitmap {
    let mut bitmap = blank_bitmap();
    for i in (0..bitmap.data.len()).step_by(64) {
        bitmap.data[i] = 0;
        bitmap.data[i + 1] = 0;
        bitmap.data[i + 2] = 0;
    }
    bitmap
}
