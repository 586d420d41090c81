use tangkap_config::Config;
use tangkap_types::UiPhase;
use tokio::sync::RwLock;

use crate::status::AppStatus;

pub struct AppState {
    pub config: RwLock<Config>,
    pub status: RwLock<AppStatus>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: RwLock::new(config),
            status: RwLock::new(AppStatus::default()),
        }
    }

    pub async fn set_phase(&self, phase: UiPhase, message: impl Into<String>) {
        let mut status = self.status.write().await;
        status.phase = phase;
        status.message = message.into();
    }
}
