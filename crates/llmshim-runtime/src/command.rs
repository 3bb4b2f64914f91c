//! Command builder and log streaming for llama-server.
//!
//! This module builds the llama-server command line for either service
//! role and captures stdout/stderr output into tracing.

use std::path::{Path, PathBuf};

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};
use tracing::debug;

use crate::launcher::LauncherError;

/// What the spawned server is for.
///
/// Completion servers carry the full sampling/runtime configuration; an
/// embedding server only needs the model and the `--embeddings` switch.
#[derive(Debug, Clone)]
pub enum ServeMode {
    /// Chat/text completion server.
    Completion {
        /// Alias advertised to native clients.
        alias: String,
        /// Chat template identifier (`--chat-template`).
        chat_format: String,
        /// Inference thread count.
        n_threads: u32,
        /// Context window size.
        n_ctx: u32,
        /// Prompt batch size.
        n_batch: u32,
    },
    /// Embedding server.
    Embedding,
}

/// Everything needed to spawn one engine process.
#[derive(Debug, Clone)]
pub struct LaunchSpec {
    /// Path to the model artifact.
    pub model_path: PathBuf,
    /// Loopback port the engine listens on.
    pub port: u16,
    /// Service role.
    pub mode: ServeMode,
}

/// Build the llama-server argument list for a launch spec.
///
/// Kept separate from spawning so the argv can be asserted on in tests.
#[must_use]
pub fn build_args(spec: &LaunchSpec) -> Vec<String> {
    let mut args = vec![
        "-m".to_string(),
        spec.model_path.display().to_string(),
        "--host".to_string(),
        "127.0.0.1".to_string(),
        "--port".to_string(),
        spec.port.to_string(),
    ];

    match &spec.mode {
        ServeMode::Completion {
            alias,
            chat_format,
            n_threads,
            n_ctx,
            n_batch,
        } => {
            args.push("--alias".to_string());
            args.push(alias.clone());
            args.push("--chat-template".to_string());
            args.push(chat_format.clone());
            args.push("-t".to_string());
            args.push(n_threads.to_string());
            args.push("-c".to_string());
            args.push(n_ctx.to_string());
            args.push("-b".to_string());
            args.push(n_batch.to_string());
        }
        ServeMode::Embedding => {
            args.push("--embeddings".to_string());
        }
    }

    args
}

/// Build and spawn a llama-server process.
///
/// # Errors
///
/// Returns `LauncherError::SpawnFailed` if the binary is missing, the
/// model file does not exist, or the process fails to start.
pub fn build_and_spawn(
    llama_server_path: &Path,
    spec: &LaunchSpec,
) -> Result<Child, LauncherError> {
    // Bare names are left to PATH lookup at spawn time; explicit paths are
    // validated up front for a clearer error.
    if llama_server_path.components().count() > 1 && !llama_server_path.exists() {
        return Err(LauncherError::SpawnFailed(format!(
            "llama-server binary not found at: {}",
            llama_server_path.display()
        )));
    }
    if !spec.model_path.exists() {
        return Err(LauncherError::SpawnFailed(format!(
            "model file not found: {}",
            spec.model_path.display()
        )));
    }

    let mut cmd = Command::new(llama_server_path);
    cmd.args(build_args(spec));

    // Piped stdio for log streaming
    cmd.stdout(std::process::Stdio::piped())
        .stderr(std::process::Stdio::piped());
    cmd.kill_on_drop(true);

    cmd.spawn()
        .map_err(|e| LauncherError::SpawnFailed(format!("Failed to spawn llama-server: {e}")))
}

/// Spawn background tasks to stream stdout/stderr logs asynchronously.
///
/// The tasks read lines from the process output and log them via tracing.
/// They exit when the streams close.
pub fn spawn_log_readers(child: &mut Child, port: u16) {
    if let Some(stdout) = child.stdout.take() {
        tokio::spawn(async move {
            let reader = BufReader::new(stdout);
            let mut lines = reader.lines();
            while let Ok(Some(text)) = lines.next_line().await {
                debug!(port = %port, "stdout: {}", text);
            }
        });
    }

    if let Some(stderr) = child.stderr.take() {
        tokio::spawn(async move {
            let reader = BufReader::new(stderr);
            let mut lines = reader.lines();
            while let Ok(Some(text)) = lines.next_line().await {
                debug!(port = %port, "stderr: {}", text);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completion_spec() -> LaunchSpec {
        LaunchSpec {
            model_path: PathBuf::from("/opt/models/chat.gguf"),
            port: 5500,
            mode: ServeMode::Completion {
                alias: "gpt-3.5-turbo".to_string(),
                chat_format: "chatml".to_string(),
                n_threads: 4,
                n_ctx: 4096,
                n_batch: 4096,
            },
        }
    }

    #[test]
    fn completion_args_carry_full_runtime_config() {
        let args = build_args(&completion_spec());
        let joined = args.join(" ");
        assert!(joined.contains("-m /opt/models/chat.gguf"));
        assert!(joined.contains("--host 127.0.0.1"));
        assert!(joined.contains("--port 5500"));
        assert!(joined.contains("--alias gpt-3.5-turbo"));
        assert!(joined.contains("--chat-template chatml"));
        assert!(joined.contains("-t 4"));
        assert!(joined.contains("-c 4096"));
        assert!(joined.contains("-b 4096"));
        assert!(!joined.contains("--embeddings"));
    }

    #[test]
    fn embedding_args_request_embedding_mode() {
        let spec = LaunchSpec {
            model_path: PathBuf::from("/opt/models/minilm.gguf"),
            port: 5501,
            mode: ServeMode::Embedding,
        };
        let args = build_args(&spec);
        assert!(args.contains(&"--embeddings".to_string()));
        assert!(!args.join(" ").contains("--chat-template"));
    }

    #[test]
    fn missing_binary_is_a_spawn_failure() {
        let result = build_and_spawn(Path::new("/nonexistent/llama-server"), &completion_spec());
        assert!(matches!(result, Err(LauncherError::SpawnFailed(_))));
    }

    #[tokio::test]
    #[cfg(unix)]
    async fn spawns_an_existing_binary() {
        use std::fs;
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = tempfile::TempDir::new().unwrap();
        let binary_path = temp_dir.path().join("llama-server");
        fs::write(&binary_path, "#!/bin/sh\nexit 0").unwrap();
        fs::set_permissions(&binary_path, fs::Permissions::from_mode(0o755)).unwrap();

        let model_path = temp_dir.path().join("chat.gguf");
        fs::write(&model_path, b"stub").unwrap();

        let spec = LaunchSpec {
            model_path,
            port: 5500,
            mode: ServeMode::Embedding,
        };

        let result = build_and_spawn(&binary_path, &spec);
        assert!(result.is_ok(), "spawn should succeed with a valid binary");
    }
}
