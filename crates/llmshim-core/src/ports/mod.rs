//! Port definitions (trait abstractions) for the underlying engines.
//!
//! Ports define what the gateway expects from the completion and embedding
//! engines without leaking how they are reached. Handlers receive
//! `Arc<dyn ...Port>` through their state so they stay testable against
//! mock engines.

pub mod completion_engine;
pub mod embedding_engine;

use thiserror::Error;

pub use completion_engine::CompletionEnginePort;
pub use embedding_engine::EmbeddingEnginePort;

/// Errors from invoking an engine.
///
/// The gateway never retries: each variant maps straight onto one HTTP
/// response via `suggested_status_code`.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine could not be reached at all.
    #[error("Failed to reach model server: {0}")]
    Unreachable(String),

    /// The engine answered with a failure of its own.
    #[error("Model server returned {status}: {message}")]
    Upstream {
        /// HTTP status the engine reported.
        status: u16,
        /// Body or reason it gave.
        message: String,
    },

    /// The engine answered 200 but the reply is missing required fields
    /// (generated text, finish reason, token usage).
    #[error("Malformed engine reply: {0}")]
    MalformedReply(String),
}

impl EngineError {
    /// Whether retrying the identical request may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Unreachable(_))
    }

    /// HTTP status code the gateway should answer with.
    #[must_use]
    pub const fn suggested_status_code(&self) -> u16 {
        match self {
            Self::Unreachable(_) | Self::MalformedReply(_) => 502,
            // Pass genuine upstream errors through; anything that is not
            // an error status degrades to 502.
            Self::Upstream { status, .. } => {
                if *status >= 400 {
                    *status
                } else {
                    502
                }
            }
        }
    }
}
