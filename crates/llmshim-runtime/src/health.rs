//! Health check utilities for spawned engine processes.
//!
//! HTTP polling against llama-server's `/health` endpoint. Intentionally
//! minimal; no domain logic lives here.

use std::time::Duration;

use anyhow::Result;
use reqwest::Client;
use tokio::time::sleep;
use tracing::{debug, info};

/// Check HTTP health of a server at the given port.
///
/// Makes a single request to the health endpoint and returns whether the
/// server responded successfully.
pub async fn check_http_health(port: u16) -> Result<bool> {
    let health_url = format!("http://127.0.0.1:{port}/health");
    let client = Client::builder().timeout(Duration::from_secs(2)).build()?;

    match client.get(&health_url).send().await {
        Ok(response) if response.status().is_success() => Ok(true),
        Ok(_) | Err(_) => Ok(false),
    }
}

/// Wait for the engine's health check to succeed.
///
/// Polls `/health` once per second until it returns 200 OK or the timeout
/// is reached. Model loading dominates this window, so the timeout scales
/// with model size and should be generous.
///
/// # Errors
///
/// Returns an error if the port is clearly serving something else, or the
/// timeout elapses before a healthy response.
pub async fn wait_for_http_health(port: u16, timeout_secs: u64) -> Result<()> {
    let health_url = format!("http://127.0.0.1:{port}/health");
    info!("Waiting for model server to be ready at {health_url}");

    let max_attempts = timeout_secs;
    let mut attempt = 0;
    let client = Client::builder().timeout(Duration::from_secs(2)).build()?;

    loop {
        attempt += 1;
        sleep(Duration::from_secs(1)).await;

        match client.get(&health_url).send().await {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    info!("Model server is ready on port {port}");
                    return Ok(());
                }

                debug!("Health check returned status {status} (expected 200), retrying...");

                // Fail faster if clearly wrong service
                if (status.as_u16() == 403 || status.as_u16() == 404) && attempt > 3 {
                    anyhow::bail!(
                        "Port {port} appears to be in use by another service (status {status})"
                    );
                }
            }
            Err(e) => {
                debug!("Health check failed: {e}, retrying...");
            }
        }

        if attempt >= max_attempts {
            anyhow::bail!("Model server failed to start within {max_attempts}s on port {port}");
        }
    }
}
