//! Azure-OpenAI-style route handlers.
//!
//! The completion endpoints are pure path aliases: Azure clients route by
//! deployment path, so both deployment routes funnel into the native
//! chat-completion pass-through unchanged. The embeddings endpoint is a
//! translation handler that adds the usage block and model echo Azure
//! clients expect. `{deployment}` is accepted and never inspected.

use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use tracing::{error, info};

use crate::embedding_handlers::engine_error_response;
use crate::models::{
    AzureEmbeddingRequest, AzureEmbeddingResponse, EmbeddingResponse, EmbeddingUsage,
    ErrorResponse,
};
use crate::server::passthrough_chat_completion;
use crate::state::{CompletionState, EmbeddingState};

// ── POST /openai/deployments/{deployment}/chat/completions ─────────────

pub(crate) async fn chat_completions(
    State(state): State<CompletionState>,
    Path(_deployment): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    passthrough_chat_completion(&state, &headers, body).await
}

// ── POST /openai/deployments/{deployment}/completions ──────────────────

/// Also funnels into the chat-completion call: the Azure clients this
/// serves send chat-shaped bodies to both deployment paths.
pub(crate) async fn completions(
    State(state): State<CompletionState>,
    Path(_deployment): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    passthrough_chat_completion(&state, &headers, body).await
}

// ── POST /openai/deployments/{deployment}/embeddings ───────────────────

pub(crate) async fn embeddings(
    State(state): State<EmbeddingState>,
    Path(_deployment): Path<String>,
    body: Bytes,
) -> Response {
    let req: AzureEmbeddingRequest = match serde_json::from_slice(&body) {
        Ok(r) => r,
        Err(e) => {
            error!("Invalid Azure embeddings request: {e}");
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::invalid_request(&e.to_string())),
            )
                .into_response();
        }
    };

    if req.input.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::invalid_request("input must not be empty")),
        )
            .into_response();
    }

    info!(count = req.input.len(), "POST /openai/deployments/{{deployment}}/embeddings");

    // One encode call for the whole batch.
    let model = req.model.unwrap_or_else(|| state.model_name.clone());
    match state.engine.embed(req.input).await {
        Ok(vectors) => {
            let EmbeddingResponse { object, data } = EmbeddingResponse::from_vectors(vectors);
            Json(AzureEmbeddingResponse {
                object,
                data,
                model,
                usage: EmbeddingUsage::placeholder(),
            })
            .into_response()
        }
        Err(e) => engine_error_response(&e),
    }
}
