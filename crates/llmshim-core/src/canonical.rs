//! Canonical, dialect-neutral completion and embedding shapes.
//!
//! Every dialect adapter converts its wire format to and from these types;
//! the engine ports speak nothing else. Dialect shapes never carry
//! information the canonical shapes lack, so translation is total and
//! lossless for every field a dialect defines.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Parameters for one canonical completion call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionParams {
    /// Prompt text to complete.
    pub prompt: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Nucleus sampling parameter.
    pub top_p: f32,
    /// Maximum number of tokens to generate.
    pub max_tokens: u32,
    /// Stop sequences, possibly empty.
    pub stop: Vec<String>,
}

/// Result of one canonical completion call.
///
/// All four fields are required: an engine reply missing the finish reason
/// or either token count is rejected as malformed rather than patched with
/// defaults (see `EngineError::MalformedReply`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionOutcome {
    /// Generated text.
    pub text: String,
    /// Why generation stopped.
    pub finish_reason: FinishReason,
    /// Tokens consumed by the prompt.
    pub prompt_tokens: u32,
    /// Tokens generated.
    pub completion_tokens: u32,
}

/// Why the engine stopped generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FinishReason {
    /// A stop condition (stop sequence or end-of-text token) was hit.
    Stop,
    /// The max-token budget was exhausted.
    Length,
    /// Anything else the engine reports.
    Other,
}

impl FinishReason {
    /// Map an engine-reported label onto the canonical set.
    ///
    /// Labels outside the set (`"tool_calls"`, `"content_filter"`, ...)
    /// fold into `Other`.
    #[must_use]
    pub fn from_engine_label(label: &str) -> Self {
        match label {
            "stop" => Self::Stop,
            "length" => Self::Length,
            _ => Self::Other,
        }
    }

    /// Canonical lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stop => "stop",
            Self::Length => "length",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for FinishReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One fixed-length embedding vector.
///
/// The embedding engine returns one vector per input text, index-aligned
/// with the input order, all of identical dimensionality.
pub type EmbeddingVector = Vec<f32>;
