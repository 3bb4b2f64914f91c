//! Engine launcher: spawn-or-attach lifecycle for the model server.
//!
//! The engine is constructed once at gateway startup and lives for the
//! process lifetime. In spawn mode the launcher owns the llama-server
//! child and kills it on shutdown; in attach mode it only records the
//! base URL of a server something else manages.

use std::path::Path;

use thiserror::Error;
use tokio::process::Child;
use tracing::{info, warn};

use crate::command::{LaunchSpec, build_and_spawn, spawn_log_readers};
use crate::health::wait_for_http_health;

/// Handle to the engine the gateway delegates to.
///
/// Holds the child process in spawn mode so the engine dies with the
/// gateway rather than leaking.
#[derive(Debug)]
pub struct EngineHandle {
    base_url: String,
    child: Option<Child>,
}

impl EngineHandle {
    /// Base URL requests are routed to (e.g. `http://127.0.0.1:5500`).
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Stop the spawned engine, if this handle owns one.
    ///
    /// Attach-mode handles leave the server alone.
    pub async fn shutdown(mut self) {
        if let Some(mut child) = self.child.take() {
            info!("Stopping model server");
            if let Err(e) = child.kill().await {
                warn!("Failed to kill model server: {e}");
            }
        }
    }
}

/// Errors from launching or attaching to the engine.
#[derive(Debug, Error)]
pub enum LauncherError {
    /// Failed to spawn the model server process.
    #[error("Failed to start model server: {0}")]
    SpawnFailed(String),

    /// The model server never became healthy.
    #[error("Health check failed: {0}")]
    HealthCheckFailed(String),
}

/// Spawn a llama-server for the given spec and wait until it is healthy.
///
/// # Errors
///
/// Returns `LauncherError` if the spawn fails or the health check times
/// out; on health failure the child is killed before returning.
pub async fn launch(
    llama_server_path: &Path,
    spec: LaunchSpec,
    startup_timeout_secs: u64,
) -> Result<EngineHandle, LauncherError> {
    let port = spec.port;
    let mut child = build_and_spawn(llama_server_path, &spec)?;
    spawn_log_readers(&mut child, port);

    if let Err(e) = wait_for_http_health(port, startup_timeout_secs).await {
        // Don't leak a half-started server.
        if let Err(kill_err) = child.kill().await {
            warn!("Failed to kill unhealthy model server: {kill_err}");
        }
        return Err(LauncherError::HealthCheckFailed(e.to_string()));
    }

    info!(port = %port, "Model server ready");
    Ok(EngineHandle {
        base_url: format!("http://127.0.0.1:{port}"),
        child: Some(child),
    })
}

/// Attach to a model server that is already running.
#[must_use]
pub fn attach(base_url: impl Into<String>) -> EngineHandle {
    let base_url = base_url.into();
    info!(url = %base_url, "Attaching to running model server");
    EngineHandle {
        base_url: base_url.trim_end_matches('/').to_string(),
        child: None,
    }
}
