//! Service configuration, read once from the environment at startup.
//!
//! The environment variable names are fixed by the existing deployments:
//! `MODEL`, `MODEL_ALIAS`, `CHAT_FORMAT`, `N_THREADS`, `N_CTX`, `N_BATCH`
//! for the completion service; `MODEL_NAME`, `MODEL_FOLDER` for the
//! embedding service. The CLI layer does the actual env parsing; this
//! module only defines the validated shapes.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Default host the gateways bind to.
pub const DEFAULT_GATEWAY_HOST: &str = "127.0.0.1";
/// Default alias the completion engine advertises.
pub const DEFAULT_MODEL_ALIAS: &str = "gpt-3.5-turbo";
/// Default chat template identifier passed to llama-server.
pub const DEFAULT_CHAT_FORMAT: &str = "chatml";
/// Default inference thread count.
pub const DEFAULT_N_THREADS: u32 = 4;
/// Default context window size.
pub const DEFAULT_N_CTX: u32 = 4096;
/// Default batch size.
pub const DEFAULT_N_BATCH: u32 = 4096;

/// Where the engine comes from.
///
/// The gateway either spawns a llama-server of its own against a local
/// model file, or attaches to a server something else already started.
/// Either way the engine lives for the whole gateway process and is never
/// reloaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineSource {
    /// Spawn llama-server against this model file at startup.
    Spawn {
        /// Path to the model artifact on disk.
        model_path: PathBuf,
    },
    /// Attach to an already-running server at this base URL.
    Attach {
        /// Base URL of the running server (e.g. `http://127.0.0.1:5500`).
        base_url: String,
    },
}

/// Configuration for the completion gateway.
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    /// Engine to wrap.
    pub source: EngineSource,
    /// Model alias advertised to native clients.
    pub model_alias: String,
    /// Chat template identifier (llama-server `--chat-template`).
    pub chat_format: String,
    /// Inference thread count.
    pub n_threads: u32,
    /// Context window size.
    pub n_ctx: u32,
    /// Prompt batch size.
    pub n_batch: u32,
}

impl CompletionConfig {
    /// Validate startup parameters before anything is spawned or bound.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model_alias.is_empty() {
            return Err(ConfigError::Invalid("model alias must not be empty".into()));
        }
        if self.n_ctx == 0 {
            return Err(ConfigError::Invalid("context size must be positive".into()));
        }
        if self.n_threads == 0 {
            return Err(ConfigError::Invalid("thread count must be positive".into()));
        }
        validate_source(&self.source)
    }
}

/// Configuration for the embedding gateway.
#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    /// Engine to wrap.
    pub source: EngineSource,
    /// Model name echoed on wire shapes that carry one.
    pub model_name: String,
}

impl EmbeddingConfig {
    /// Validate startup parameters before anything is spawned or bound.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model_name.is_empty() {
            return Err(ConfigError::Invalid("model name must not be empty".into()));
        }
        validate_source(&self.source)
    }
}

fn validate_source(source: &EngineSource) -> Result<(), ConfigError> {
    match source {
        EngineSource::Spawn { model_path } => {
            if model_path.as_os_str().is_empty() {
                Err(ConfigError::Invalid("model path must not be empty".into()))
            } else {
                Ok(())
            }
        }
        EngineSource::Attach { base_url } => {
            if base_url.starts_with("http://") || base_url.starts_with("https://") {
                Ok(())
            } else {
                Err(ConfigError::Invalid(format!(
                    "upstream URL must be http(s), got '{base_url}'"
                )))
            }
        }
    }
}

/// Resolve an embedding model name against the on-disk model folder.
///
/// Absolute names are taken as-is; anything else is looked up inside the
/// folder. The file itself is opaque to this layer.
#[must_use]
pub fn resolve_model_file(model_name: &str, model_folder: &Path) -> PathBuf {
    let candidate = Path::new(model_name);
    if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        model_folder.join(model_name)
    }
}

/// Errors from configuration validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A startup parameter is out of range or malformed.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawn_config() -> CompletionConfig {
        CompletionConfig {
            source: EngineSource::Spawn {
                model_path: PathBuf::from("/opt/models/test.gguf"),
            },
            model_alias: DEFAULT_MODEL_ALIAS.to_string(),
            chat_format: DEFAULT_CHAT_FORMAT.to_string(),
            n_threads: DEFAULT_N_THREADS,
            n_ctx: DEFAULT_N_CTX,
            n_batch: DEFAULT_N_BATCH,
        }
    }

    #[test]
    fn default_completion_config_is_valid() {
        assert!(spawn_config().validate().is_ok());
    }

    #[test]
    fn zero_context_is_rejected() {
        let mut config = spawn_config();
        config.n_ctx = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn attach_url_must_be_http() {
        let mut config = spawn_config();
        config.source = EngineSource::Attach {
            base_url: "ftp://127.0.0.1:5500".into(),
        };
        assert!(config.validate().is_err());

        config.source = EngineSource::Attach {
            base_url: "http://127.0.0.1:5500".into(),
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn model_names_resolve_inside_the_folder() {
        let folder = Path::new("/opt/models");
        assert_eq!(
            resolve_model_file("all-minilm-l6-v2.gguf", folder),
            PathBuf::from("/opt/models/all-minilm-l6-v2.gguf")
        );
        // Absolute names bypass the folder.
        assert_eq!(
            resolve_model_file("/elsewhere/model.gguf", folder),
            PathBuf::from("/elsewhere/model.gguf")
        );
    }
}
