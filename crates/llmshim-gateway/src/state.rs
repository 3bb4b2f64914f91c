//! Shared per-service state, injected into handlers via Axum `State`.

use std::sync::Arc;

use reqwest::Client;

use llmshim_core::ports::{CompletionEnginePort, EmbeddingEnginePort};

/// Shared completion-gateway state — cloneable, immutable after startup.
///
/// Carries both the typed engine port (for translated dialects) and the
/// raw upstream location (for pass-through endpoints).
#[derive(Clone)]
pub struct CompletionState {
    /// HTTP client for pass-through forwarding.
    pub client: Client,
    /// Base URL of the upstream model server (e.g. `http://127.0.0.1:5500`).
    pub upstream_base: String,
    /// Typed completion engine used by translated dialects.
    pub engine: Arc<dyn CompletionEnginePort>,
}

impl CompletionState {
    /// Create completion-gateway state.
    #[must_use]
    pub fn new(
        client: Client,
        upstream_base: impl Into<String>,
        engine: Arc<dyn CompletionEnginePort>,
    ) -> Self {
        Self {
            client,
            upstream_base: upstream_base.into(),
            engine,
        }
    }
}

/// Shared embedding-gateway state — cloneable, immutable after startup.
#[derive(Clone)]
pub struct EmbeddingState {
    /// Typed embedding engine; all embedding dialects translate through it.
    pub engine: Arc<dyn EmbeddingEnginePort>,
    /// Model name echoed on wire shapes that carry one.
    pub model_name: String,
}

impl EmbeddingState {
    /// Create embedding-gateway state.
    #[must_use]
    pub fn new(engine: Arc<dyn EmbeddingEnginePort>, model_name: impl Into<String>) -> Self {
        Self {
            engine,
            model_name: model_name.into(),
        }
    }
}
