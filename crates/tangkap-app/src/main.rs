use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use tangkap_app::{AppController, AppState};
use tangkap_config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // A broken OCR setup should surface at startup, not on the first capture.
    let config = Config::load().context("configuration failed validation")?;
    tracing::info!(
        languages = config.ocr.languages(),
        command = %config.ocr.command().display(),
        "tangkap starting"
    );

    let state = Arc::new(AppState::new(config));
    let controller = AppController::new(state);
    let mut tasks = controller.spawn_tasks();

    tokio::select! {
        _ = signal::ctrl_c() => {
            tracing::info!("shutdown requested");
        }
        result = tasks.join_next() => {
            match result {
                Some(Ok(Ok(()))) => tracing::warn!("task exited early"),
                Some(Ok(Err(e))) => tracing::error!("task failed: {e:#}"),
                Some(Err(e)) => tracing::error!("task panicked: {e}"),
                None => {}
            }
        }
    }

    controller.shutdown();
    while let Some(result) = tasks.join_next().await {
        if let Err(e) = result {
            tracing::error!("task panicked during shutdown: {e}");
        }
    }
    Ok(())
}
