//! OpenAI-style API data models shared by the native and Azure dialects.
//!
//! Canonical types live in `llmshim-core`; this module handles the wire
//! layer mapping for the OpenAI-shaped endpoints and the OpenAI error
//! envelope.

use serde::{Deserialize, Serialize};

use llmshim_core::canonical::EmbeddingVector;

// =============================================================================
// Embedding Request/Response Types
// =============================================================================

/// Request to the native `/v1/embeddings` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingRequest {
    /// Single string or ordered sequence of strings to encode.
    pub input: EmbeddingInput,
    /// Model name; accepted for client compatibility, not inspected.
    #[serde(default)]
    pub model: Option<String>,
}

/// `input` accepts either one string or an ordered sequence of strings;
/// internally the input is always treated as a sequence.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum EmbeddingInput {
    /// A single text.
    Single(String),
    /// An ordered batch of texts.
    Batch(Vec<String>),
}

impl EmbeddingInput {
    /// Normalize to the sequence form.
    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::Single(text) => vec![text],
            Self::Batch(texts) => texts,
        }
    }
}

/// Request to the Azure `/openai/deployments/{deployment}/embeddings`
/// endpoint — batch input only.
#[derive(Debug, Clone, Deserialize)]
pub struct AzureEmbeddingRequest {
    /// Ordered sequence of texts to encode in one call.
    pub input: Vec<String>,
    /// Model name echoed back in the response.
    #[serde(default)]
    pub model: Option<String>,
}

/// One embedding entry, index-aligned with the input order.
#[derive(Debug, Clone, Serialize)]
pub struct EmbeddingData {
    /// Always `"embedding"`.
    pub object: String,
    /// The vector itself.
    pub embedding: EmbeddingVector,
    /// Zero-based position of the corresponding input text.
    pub index: usize,
}

/// Response from the native `/v1/embeddings` endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct EmbeddingResponse {
    /// Always `"list"`.
    pub object: String,
    /// One entry per input text, in input order.
    pub data: Vec<EmbeddingData>,
}

impl EmbeddingResponse {
    /// Wrap index-aligned vectors in the list-of-embedding-objects shape.
    #[must_use]
    pub fn from_vectors(vectors: Vec<EmbeddingVector>) -> Self {
        Self {
            object: "list".to_string(),
            data: vectors
                .into_iter()
                .enumerate()
                .map(|(index, embedding)| EmbeddingData {
                    object: "embedding".to_string(),
                    embedding,
                    index,
                })
                .collect(),
        }
    }
}

/// Response from the Azure embeddings endpoint: the native list shape plus
/// a usage block and the model echo.
#[derive(Debug, Clone, Serialize)]
pub struct AzureEmbeddingResponse {
    /// Always `"list"`.
    pub object: String,
    /// One entry per input text, in input order.
    pub data: Vec<EmbeddingData>,
    /// Echo of the requested model name.
    pub model: String,
    /// Fixed placeholder usage block.
    pub usage: EmbeddingUsage,
}

/// Token usage block on the Azure embeddings response.
///
/// The values are fixed placeholders, not real token accounting.
#[derive(Debug, Clone, Serialize)]
pub struct EmbeddingUsage {
    pub prompt_tokens: u32,
    pub total_tokens: u32,
}

/// Placeholder prompt-token count on the Azure embeddings usage block.
pub const PLACEHOLDER_PROMPT_TOKENS: u32 = 1;
/// Placeholder total-token count on the Azure embeddings usage block.
pub const PLACEHOLDER_TOTAL_TOKENS: u32 = 1;

impl EmbeddingUsage {
    /// The fixed placeholder block.
    #[must_use]
    pub const fn placeholder() -> Self {
        Self {
            prompt_tokens: PLACEHOLDER_PROMPT_TOKENS,
            total_tokens: PLACEHOLDER_TOTAL_TOKENS,
        }
    }
}

// =============================================================================
// Error Response Types
// =============================================================================

/// Error response matching the OpenAI envelope.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail within an error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorDetail {
    pub message: String,
    pub r#type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ErrorResponse {
    /// Create a new error response.
    pub fn new(message: impl Into<String>, error_type: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                message: message.into(),
                r#type: error_type.into(),
                code: None,
            },
        }
    }

    /// Create an error response with a code.
    pub fn with_code(
        message: impl Into<String>,
        error_type: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorDetail {
                message: message.into(),
                r#type: error_type.into(),
                code: Some(code.into()),
            },
        }
    }

    /// Malformed or invalid request body, rejected before any engine call.
    pub fn invalid_request(reason: &str) -> Self {
        Self::with_code(
            format!("Invalid request body: {reason}"),
            "invalid_request_error",
            "invalid_request",
        )
    }

    /// Upstream connection or engine failure.
    pub fn upstream_error(reason: &str) -> Self {
        Self::with_code(
            format!("Failed to connect to model server: {reason}"),
            "server_error",
            "upstream_error",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_input_normalizes_to_one_element_sequence() {
        let input: EmbeddingInput = serde_json::from_str("\"hello\"").unwrap();
        assert_eq!(input.into_vec(), vec!["hello".to_string()]);
    }

    #[test]
    fn batch_input_preserves_order() {
        let input: EmbeddingInput = serde_json::from_str(r#"["a", "b", "c"]"#).unwrap();
        assert_eq!(input.into_vec(), vec!["a", "b", "c"]);
    }

    #[test]
    fn response_entries_are_index_aligned() {
        let response = EmbeddingResponse::from_vectors(vec![vec![0.1], vec![0.2]]);
        assert_eq!(response.object, "list");
        assert_eq!(response.data.len(), 2);
        assert_eq!(response.data[0].index, 0);
        assert_eq!(response.data[0].object, "embedding");
        assert_eq!(response.data[1].index, 1);
    }

    #[test]
    fn usage_placeholder_is_fixed() {
        let usage = EmbeddingUsage::placeholder();
        assert_eq!(usage.prompt_tokens, 1);
        assert_eq!(usage.total_tokens, 1);
    }
}
