//! Embedding engine port.

use std::fmt;

use async_trait::async_trait;

use super::EngineError;
use crate::canonical::EmbeddingVector;

/// Port for the underlying embedding engine.
///
/// Given N input texts the engine returns N vectors of identical fixed
/// dimensionality, index-aligned with the input order. Encoding is treated
/// as a pure function of the input text for a given model.
#[async_trait]
pub trait EmbeddingEnginePort: Send + Sync + fmt::Debug {
    /// Encode each input text into one vector.
    ///
    /// `inputs` must be non-empty; callers validate that before invoking
    /// the engine.
    ///
    /// # Errors
    ///
    /// Returns `EngineError` if the engine is unreachable, reports a
    /// failure, or returns a vector count that does not match the input
    /// count.
    async fn embed(&self, inputs: Vec<String>) -> Result<Vec<EmbeddingVector>, EngineError>;
}
