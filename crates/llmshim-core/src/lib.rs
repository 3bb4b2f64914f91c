//! Core domain types and port definitions for llmshim.
//!
//! This crate holds the canonical (dialect-neutral) completion and embedding
//! shapes, the engine ports the gateway calls through, and the service
//! configuration. It contains no HTTP, process, or serialization-framework
//! specifics beyond serde derives.
#![deny(unused_crate_dependencies)]

pub mod canonical;
pub mod config;
pub mod ports;

// Re-export commonly used types for convenience
pub use canonical::{CompletionOutcome, CompletionParams, EmbeddingVector, FinishReason};
pub use config::{
    CompletionConfig, ConfigError, DEFAULT_CHAT_FORMAT, DEFAULT_GATEWAY_HOST, DEFAULT_MODEL_ALIAS,
    DEFAULT_N_BATCH, DEFAULT_N_CTX, DEFAULT_N_THREADS, EmbeddingConfig, EngineSource,
    resolve_model_file,
};
pub use ports::{CompletionEnginePort, EmbeddingEnginePort, EngineError};
