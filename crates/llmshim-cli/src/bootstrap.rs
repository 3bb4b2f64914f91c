//! Composition root: wire config, engine, and gateway together.
//!
//! This is the only place where infrastructure is assembled. The engine is
//! launched (or attached) once, the listener is bound before anything is
//! reported as ready, and ctrl-c cancels the server gracefully before the
//! spawned engine is stopped.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use llmshim_core::config::{
    CompletionConfig, EmbeddingConfig, EngineSource, resolve_model_file,
};
use llmshim_gateway::{CompletionState, EmbeddingState, serve_completion, serve_embedding};
use llmshim_runtime::{
    HttpCompletionEngine, HttpEmbeddingEngine, LaunchSpec, ServeMode, attach, launch,
};

use crate::parser::{CompletionArgs, EmbeddingArgs};

/// Run the completion gateway until ctrl-c.
pub async fn run_completion(args: CompletionArgs) -> anyhow::Result<()> {
    let config = CompletionConfig {
        source: engine_source(args.model.clone(), args.upstream_url.clone())?,
        model_alias: args.model_alias.clone(),
        chat_format: args.chat_format.clone(),
        n_threads: args.n_threads,
        n_ctx: args.n_ctx,
        n_batch: args.n_batch,
    };
    config.validate()?;

    let handle = match &config.source {
        EngineSource::Spawn { model_path } => {
            let spec = LaunchSpec {
                model_path: model_path.clone(),
                port: args.engine_port,
                mode: ServeMode::Completion {
                    alias: config.model_alias.clone(),
                    chat_format: config.chat_format.clone(),
                    n_threads: config.n_threads,
                    n_ctx: config.n_ctx,
                    n_batch: config.n_batch,
                },
            };
            launch(&args.llama_server, spec, args.startup_timeout).await?
        }
        EngineSource::Attach { base_url } => attach(base_url.clone()),
    };

    let client = reqwest::Client::builder()
        .pool_max_idle_per_host(10)
        .build()?;
    let engine = Arc::new(HttpCompletionEngine::new(client.clone(), handle.base_url()));
    let state = CompletionState::new(client, handle.base_url(), engine);

    let listener = bind(&args.host, args.port).await?;
    let cancel = cancel_on_ctrl_c();
    info!("Completion gateway ready");

    let result = serve_completion(listener, state, cancel).await;
    handle.shutdown().await;
    result
}

/// Run the embedding gateway until ctrl-c.
pub async fn run_embedding(args: EmbeddingArgs) -> anyhow::Result<()> {
    let source = match args.upstream_url.clone() {
        Some(base_url) => EngineSource::Attach { base_url },
        None => EngineSource::Spawn {
            model_path: resolve_model_file(&args.model_name, &args.model_folder),
        },
    };
    let config = EmbeddingConfig {
        source,
        model_name: args.model_name.clone(),
    };
    config.validate()?;

    let handle = match &config.source {
        EngineSource::Spawn { model_path } => {
            let spec = LaunchSpec {
                model_path: model_path.clone(),
                port: args.engine_port,
                mode: ServeMode::Embedding,
            };
            launch(&args.llama_server, spec, args.startup_timeout).await?
        }
        EngineSource::Attach { base_url } => attach(base_url.clone()),
    };

    let client = reqwest::Client::builder()
        .pool_max_idle_per_host(10)
        .build()?;
    let engine = Arc::new(HttpEmbeddingEngine::new(
        client,
        handle.base_url(),
        config.model_name.clone(),
    ));
    let state = EmbeddingState::new(engine, config.model_name.clone());

    let listener = bind(&args.host, args.port).await?;
    let cancel = cancel_on_ctrl_c();
    info!("Embedding gateway ready");

    let result = serve_embedding(listener, state, cancel).await;
    handle.shutdown().await;
    result
}

fn engine_source(
    model: Option<std::path::PathBuf>,
    upstream_url: Option<String>,
) -> anyhow::Result<EngineSource> {
    match (model, upstream_url) {
        (_, Some(base_url)) => Ok(EngineSource::Attach { base_url }),
        (Some(model_path), None) => Ok(EngineSource::Spawn { model_path }),
        (None, None) => anyhow::bail!(
            "set MODEL (to spawn a model server) or --upstream-url (to attach to one)"
        ),
    }
}

/// Bind FIRST so failures surface before anything reports ready.
async fn bind(host: &str, port: u16) -> anyhow::Result<TcpListener> {
    TcpListener::bind(format!("{host}:{port}"))
        .await
        .with_context(|| format!("Failed to bind to {host}:{port}"))
}

/// Cancellation token triggered by ctrl-c.
fn cancel_on_ctrl_c() -> CancellationToken {
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown requested");
            trigger.cancel();
        }
    });
    cancel
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_model_and_upstream_is_an_error() {
        assert!(engine_source(None, None).is_err());
    }

    #[test]
    fn upstream_wins_when_both_are_given() {
        let source = engine_source(
            Some(std::path::PathBuf::from("/m.gguf")),
            Some("http://127.0.0.1:5500".into()),
        )
        .unwrap();
        assert!(matches!(source, EngineSource::Attach { .. }));
    }
}
