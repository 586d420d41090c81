use tangkap_types::UiPhase;

/// User-visible shell status: the current phase plus the counters and
/// messages the host surfaces in its status bar.
#[derive(Clone, Debug, Default)]
pub struct AppStatus {
    pub phase: UiPhase,
    pub last_result: String,
    pub message: String,
    pub capture_count: u64,
    pub error_count: u64,
}

impl AppStatus {
    /// Captures and recognitions are one-at-a-time; while either is in
    /// flight new capture requests are ignored.
    pub fn is_busy(&self) -> bool {
        matches!(self.phase, UiPhase::Capturing | UiPhase::Recognizing)
    }
}
