//! Bedrock-dialect route handlers.
//!
//! These handlers accept Bedrock-format requests, translate them into the
//! canonical engine call, and translate the canonical result back into
//! Bedrock format. The `{model}` path parameter is accepted for client
//! compatibility and never inspected.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use tracing::{error, info};

use llmshim_core::ports::EngineError;

use crate::bedrock_models::{
    BedrockEmbeddingRequest, BedrockEmbeddingResponse, BedrockInvokeRequest,
    BedrockInvokeResponse, bedrock_error,
};
use crate::state::{CompletionState, EmbeddingState};

// ── POST /bedrock/model/{model}/invoke (completion service) ────────────

pub(crate) async fn invoke_completion(
    State(state): State<CompletionState>,
    Path(_model): Path<String>,
    body: Bytes,
) -> Response {
    let req: BedrockInvokeRequest = match serde_json::from_slice(&body) {
        Ok(r) => r,
        Err(e) => {
            error!("Invalid Bedrock invoke request: {e}");
            return (StatusCode::BAD_REQUEST, Json(bedrock_error(&e.to_string())))
                .into_response();
        }
    };

    if req.input_text.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(bedrock_error("inputText must not be empty")),
        )
            .into_response();
    }

    let params = req.into_params();
    info!(
        max_tokens = params.max_tokens,
        "POST /bedrock/model/{{model}}/invoke (completion)"
    );

    match state.engine.complete(params).await {
        Ok(outcome) => Json(BedrockInvokeResponse::from_outcome(outcome)).into_response(),
        Err(e) => engine_error_response(&e),
    }
}

// ── POST /bedrock/model/{model}/invoke (embedding service) ─────────────

pub(crate) async fn invoke_embedding(
    State(state): State<EmbeddingState>,
    Path(_model): Path<String>,
    body: Bytes,
) -> Response {
    let req: BedrockEmbeddingRequest = match serde_json::from_slice(&body) {
        Ok(r) => r,
        Err(e) => {
            error!("Invalid Bedrock embedding request: {e}");
            return (StatusCode::BAD_REQUEST, Json(bedrock_error(&e.to_string())))
                .into_response();
        }
    };

    info!("POST /bedrock/model/{{model}}/invoke (embedding)");

    match state.engine.embed(vec![req.input_text]).await {
        Ok(vectors) => match vectors.into_iter().next() {
            // Single input, single vector, no wrapper.
            Some(embedding) => Json(BedrockEmbeddingResponse { embedding }).into_response(),
            None => engine_error_response(&EngineError::MalformedReply(
                "engine returned no embedding".to_string(),
            )),
        },
        Err(e) => engine_error_response(&e),
    }
}

// ── Shared Helpers ─────────────────────────────────────────────────────

/// Map an engine failure onto a Bedrock-shaped error response.
fn engine_error_response(err: &EngineError) -> Response {
    error!("Engine invocation failed: {err}");
    let status = StatusCode::from_u16(err.suggested_status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut resp = (status, Json(bedrock_error(&err.to_string()))).into_response();
    if err.is_retryable()
        && let Ok(val) = "5".parse()
    {
        resp.headers_mut().insert("retry-after", val);
    }
    resp
}
