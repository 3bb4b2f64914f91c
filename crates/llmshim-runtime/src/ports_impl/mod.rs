//! HTTP adapters implementing the core engine ports.
//!
//! Both adapters speak the model server's native OpenAI-style wire format
//! and convert replies into the canonical shapes. Replies missing required
//! fields are rejected as malformed; no defaults are fabricated.

pub mod completion;
pub mod embedding;

pub use completion::HttpCompletionEngine;
pub use embedding::HttpEmbeddingEngine;
