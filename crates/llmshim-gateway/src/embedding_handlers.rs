//! Native OpenAI-style embedding route handler.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use tracing::{error, info};

use llmshim_core::ports::EngineError;

use crate::models::{EmbeddingRequest, EmbeddingResponse, ErrorResponse};
use crate::state::EmbeddingState;

// ── POST /v1/embeddings ────────────────────────────────────────────────

/// Native embeddings — accepts a single string or an ordered sequence as
/// `input`, always encodes as a sequence, and answers the
/// list-of-embedding-objects shape with zero-based indices in input order.
pub(crate) async fn embeddings(State(state): State<EmbeddingState>, body: Bytes) -> Response {
    let req: EmbeddingRequest = match serde_json::from_slice(&body) {
        Ok(r) => r,
        Err(e) => {
            error!("Invalid /v1/embeddings request: {e}");
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::invalid_request(&e.to_string())),
            )
                .into_response();
        }
    };

    let inputs = req.input.into_vec();
    if inputs.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::invalid_request("input must not be empty")),
        )
            .into_response();
    }

    info!(count = inputs.len(), "POST /v1/embeddings");

    match state.engine.embed(inputs).await {
        Ok(vectors) => Json(EmbeddingResponse::from_vectors(vectors)).into_response(),
        Err(e) => engine_error_response(&e),
    }
}

/// Map an engine failure onto the OpenAI error envelope.
pub(crate) fn engine_error_response(err: &EngineError) -> Response {
    error!("Engine invocation failed: {err}");
    let status = StatusCode::from_u16(err.suggested_status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut resp = (status, Json(ErrorResponse::upstream_error(&err.to_string()))).into_response();
    if err.is_retryable()
        && let Ok(val) = "5".parse()
    {
        resp.headers_mut().insert("retry-after", val);
    }
    resp
}
