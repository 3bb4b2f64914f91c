//! Engine process lifecycle and HTTP engine adapters for llmshim.
//!
//! This crate owns everything between the gateway and the model server:
//! building and spawning the llama-server command, streaming its logs,
//! waiting for its health endpoint, and the `reqwest`-backed adapters that
//! implement the core engine ports against the running server.

pub mod command;
pub mod health;
pub mod launcher;
pub mod ports_impl;

pub use command::{LaunchSpec, ServeMode};
pub use launcher::{EngineHandle, LauncherError, attach, launch};
pub use ports_impl::{HttpCompletionEngine, HttpEmbeddingEngine};
