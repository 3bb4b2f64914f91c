//! Vendor-dialect HTTP routers over a local model server.
//!
//! Each endpoint accepts one vendor's request shape (native OpenAI-style,
//! Amazon-Bedrock-style, or Azure-OpenAI-style), translates it into the
//! canonical engine call, and reshapes the canonical result back into that
//! vendor's response shape. Handlers are stateless translation functions
//! sharing only the engine handle injected at startup.
#![deny(unsafe_code)]

pub mod azure_handlers;
pub mod bedrock_handlers;
pub mod bedrock_models;
pub mod embedding_handlers;
pub mod forward;
pub mod models;
pub mod server;
pub mod state;

pub use server::{completion_router, embedding_router, serve_completion, serve_embedding};
pub use state::{CompletionState, EmbeddingState};
