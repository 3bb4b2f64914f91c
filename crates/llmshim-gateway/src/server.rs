//! Router construction and Axum servers for the two gateways.
//!
//! Each gateway runs from a pre-bound `TcpListener` (bind-then-report)
//! until its cancellation token is triggered.

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use bytes::Bytes;
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::forward::forward_request;
use crate::models::ErrorResponse;
use crate::state::{CompletionState, EmbeddingState};
use crate::{azure_handlers, bedrock_handlers, embedding_handlers};

/// Build the completion-gateway router.
#[must_use]
pub fn completion_router(state: CompletionState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/v1/chat/completions", post(chat_completions))
        .route("/v1/completions", post(completions))
        .route(
            "/bedrock/model/{model}/invoke",
            post(bedrock_handlers::invoke_completion),
        )
        .route(
            "/openai/deployments/{deployment}/chat/completions",
            post(azure_handlers::chat_completions),
        )
        .route(
            "/openai/deployments/{deployment}/completions",
            post(azure_handlers::completions),
        )
        .with_state(state)
}

/// Build the embedding-gateway router.
#[must_use]
pub fn embedding_router(state: EmbeddingState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/v1/embeddings", post(embedding_handlers::embeddings))
        .route(
            "/bedrock/model/{model}/invoke",
            post(bedrock_handlers::invoke_embedding),
        )
        .route(
            "/openai/deployments/{deployment}/embeddings",
            post(azure_handlers::embeddings),
        )
        .with_state(state)
}

/// Run the completion gateway on a pre-bound listener until cancelled.
///
/// # Errors
///
/// Returns an error if the server fails while running.
pub async fn serve_completion(
    listener: TcpListener,
    state: CompletionState,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;
    info!("Completion gateway listening on {addr}");

    axum::serve(listener, completion_router(state))
        .with_graceful_shutdown(cancel.cancelled_owned())
        .await?;

    info!("Completion gateway shut down");
    Ok(())
}

/// Run the embedding gateway on a pre-bound listener until cancelled.
///
/// # Errors
///
/// Returns an error if the server fails while running.
pub async fn serve_embedding(
    listener: TcpListener,
    state: EmbeddingState,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;
    info!("Embedding gateway listening on {addr}");

    axum::serve(listener, embedding_router(state))
        .with_graceful_shutdown(cancel.cancelled_owned())
        .await?;

    info!("Embedding gateway shut down");
    Ok(())
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok"
    }))
}

/// The one field the pass-through inspects before forwarding: the client's
/// `stream` flag, which decides the response framing.
#[derive(Deserialize)]
struct PassthroughProbe {
    #[serde(default)]
    stream: bool,
}

// ── POST /v1/chat/completions ──────────────────────────────────────────

/// Native chat completions — direct pass-through, not a translation.
async fn chat_completions(
    State(state): State<CompletionState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    passthrough_chat_completion(&state, &headers, body).await
}

// ── POST /v1/completions ───────────────────────────────────────────────

/// Native text completions — direct pass-through, not a translation.
async fn completions(
    State(state): State<CompletionState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    passthrough(&state, "/v1/completions", &headers, body).await
}

/// Pass a request through to the upstream chat-completion endpoint.
pub(crate) async fn passthrough_chat_completion(
    state: &CompletionState,
    headers: &HeaderMap,
    body: Bytes,
) -> Response {
    passthrough(state, "/v1/chat/completions", headers, body).await
}

/// Shared pass-through: reject non-JSON bodies before touching the engine,
/// then forward verbatim.
async fn passthrough(
    state: &CompletionState,
    upstream_path: &str,
    headers: &HeaderMap,
    body: Bytes,
) -> Response {
    let probe: PassthroughProbe = match serde_json::from_slice(&body) {
        Ok(p) => p,
        Err(e) => {
            error!("Invalid {upstream_path} request: {e}");
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::invalid_request(&e.to_string())),
            )
                .into_response();
        }
    };

    info!(streaming = %probe.stream, "POST {upstream_path}");

    let upstream_url = format!("{}{upstream_path}", state.upstream_base);
    forward_request(&state.client, &upstream_url, headers, body, probe.stream).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_check() {
        let response = health_check().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn probe_defaults_to_non_streaming() {
        let probe: PassthroughProbe = serde_json::from_str(r#"{"model": "x"}"#).unwrap();
        assert!(!probe.stream);

        let probe: PassthroughProbe = serde_json::from_str(r#"{"stream": true}"#).unwrap();
        assert!(probe.stream);
    }
}
