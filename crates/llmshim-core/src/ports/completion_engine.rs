//! Completion engine port.

use std::fmt;

use async_trait::async_trait;

use super::EngineError;
use crate::canonical::{CompletionOutcome, CompletionParams};

/// Port for the underlying completion engine.
///
/// One call, one completion: the engine is invoked for a single result,
/// never an n-best list. The call may suspend for a long time for large
/// max-token budgets; the gateway imposes no queueing or admission control
/// of its own on top of whatever the engine does.
#[async_trait]
pub trait CompletionEnginePort: Send + Sync + fmt::Debug {
    /// Run one completion with the given canonical parameters.
    ///
    /// # Errors
    ///
    /// Returns `EngineError` if the engine is unreachable, reports a
    /// failure, or produces a reply missing required fields.
    async fn complete(&self, params: CompletionParams) -> Result<CompletionOutcome, EngineError>;
}
