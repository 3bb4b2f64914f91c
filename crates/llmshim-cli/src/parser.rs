//! CLI parser: top-level arguments and the two service subcommands.
//!
//! Environment variable names follow the existing deployments, so the
//! binary drops into the same compose files: `MODEL`, `MODEL_ALIAS`,
//! `CHAT_FORMAT`, `N_THREADS`, `N_CTX`, `N_BATCH` for the completion
//! service and `MODEL_NAME`, `MODEL_FOLDER` for the embedding service.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use llmshim_core::config::{
    DEFAULT_CHAT_FORMAT, DEFAULT_GATEWAY_HOST, DEFAULT_MODEL_ALIAS, DEFAULT_N_BATCH,
    DEFAULT_N_CTX, DEFAULT_N_THREADS,
};

/// Command-line interface for the vendor-dialect gateways.
#[derive(Parser)]
#[command(name = "llmshim")]
#[command(about = "Vendor-dialect HTTP gateways over local model servers")]
#[command(version)]
pub struct Cli {
    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the completion gateway
    Completion(CompletionArgs),
    /// Serve the embedding gateway
    Embedding(EmbeddingArgs),
}

/// Arguments for the completion gateway.
#[derive(Args)]
pub struct CompletionArgs {
    /// Host to bind the gateway to
    #[arg(long, default_value = DEFAULT_GATEWAY_HOST)]
    pub host: String,

    /// Port to bind the gateway to
    #[arg(long, default_value_t = 8000)]
    pub port: u16,

    /// Model file to spawn the engine with
    #[arg(long, env = "MODEL")]
    pub model: Option<PathBuf>,

    /// Attach to an already-running model server instead of spawning one
    #[arg(long, env = "UPSTREAM_URL", conflicts_with = "model")]
    pub upstream_url: Option<String>,

    /// Model alias advertised to native clients
    #[arg(long, env = "MODEL_ALIAS", default_value = DEFAULT_MODEL_ALIAS)]
    pub model_alias: String,

    /// Chat template identifier
    #[arg(long, env = "CHAT_FORMAT", default_value = DEFAULT_CHAT_FORMAT)]
    pub chat_format: String,

    /// Inference thread count
    #[arg(long, env = "N_THREADS", default_value_t = DEFAULT_N_THREADS)]
    pub n_threads: u32,

    /// Context window size
    #[arg(long, env = "N_CTX", default_value_t = DEFAULT_N_CTX)]
    pub n_ctx: u32,

    /// Prompt batch size
    #[arg(long, env = "N_BATCH", default_value_t = DEFAULT_N_BATCH)]
    pub n_batch: u32,

    /// Loopback port the spawned engine listens on
    #[arg(long, default_value_t = 5500)]
    pub engine_port: u16,

    /// Path to (or name of) the llama-server binary
    #[arg(long, env = "LLAMA_SERVER", default_value = "llama-server")]
    pub llama_server: PathBuf,

    /// Seconds to wait for the engine to become healthy
    #[arg(long, default_value_t = 120)]
    pub startup_timeout: u64,
}

/// Arguments for the embedding gateway.
#[derive(Args)]
pub struct EmbeddingArgs {
    /// Host to bind the gateway to
    #[arg(long, default_value = DEFAULT_GATEWAY_HOST)]
    pub host: String,

    /// Port to bind the gateway to
    #[arg(long, default_value_t = 8001)]
    pub port: u16,

    /// Embedding model name, resolved inside the model folder
    #[arg(long, env = "MODEL_NAME", default_value = "all-MiniLM-L6-v2")]
    pub model_name: String,

    /// On-disk folder holding model artifacts
    #[arg(long, env = "MODEL_FOLDER", default_value = "/opt/models")]
    pub model_folder: PathBuf,

    /// Attach to an already-running model server instead of spawning one
    #[arg(long, env = "UPSTREAM_URL")]
    pub upstream_url: Option<String>,

    /// Loopback port the spawned engine listens on
    #[arg(long, default_value_t = 5501)]
    pub engine_port: u16,

    /// Path to (or name of) the llama-server binary
    #[arg(long, env = "LLAMA_SERVER", default_value = "llama-server")]
    pub llama_server: PathBuf,

    /// Seconds to wait for the engine to become healthy
    #[arg(long, default_value_t = 120)]
    pub startup_timeout: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parser_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn completion_defaults_match_the_original_deployment() {
        let cli = Cli::parse_from(["llmshim", "completion", "--model", "/opt/models/chat.gguf"]);
        let Commands::Completion(args) = cli.command else {
            panic!("expected completion subcommand");
        };
        assert_eq!(args.model_alias, "gpt-3.5-turbo");
        assert_eq!(args.chat_format, "chatml");
        assert_eq!(args.n_threads, 4);
        assert_eq!(args.n_ctx, 4096);
        assert_eq!(args.n_batch, 4096);
        assert_eq!(args.port, 8000);
    }

    #[test]
    fn embedding_accepts_model_name_and_folder() {
        let cli = Cli::parse_from([
            "llmshim",
            "embedding",
            "--model-name",
            "minilm.gguf",
            "--model-folder",
            "/data/models",
        ]);
        let Commands::Embedding(args) = cli.command else {
            panic!("expected embedding subcommand");
        };
        assert_eq!(args.model_name, "minilm.gguf");
        assert_eq!(args.model_folder, PathBuf::from("/data/models"));
    }
}
