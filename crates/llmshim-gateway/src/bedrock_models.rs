//! Amazon-Bedrock-style API data models.
//!
//! Field names follow the Bedrock Titan wire format (camelCase); each type
//! is a strict structural transform of the canonical shapes in
//! `llmshim-core`.

use serde::{Deserialize, Serialize};

use llmshim_core::canonical::{CompletionOutcome, CompletionParams, EmbeddingVector};

// ── Completion ─────────────────────────────────────────────────────────

/// Sampling configuration inside a Bedrock invoke request.
#[derive(Debug, Clone, Deserialize)]
pub struct BedrockTextGenerationConfig {
    pub temperature: f32,
    #[serde(rename = "topP")]
    pub top_p: f32,
    #[serde(rename = "maxTokenCount")]
    pub max_token_count: u32,
    /// Stop sequences, possibly empty.
    #[serde(rename = "stopSequences")]
    pub stop_sequences: Vec<String>,
}

/// Request to the Bedrock completion endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct BedrockInvokeRequest {
    #[serde(rename = "inputText")]
    pub input_text: String,
    #[serde(rename = "textGenerationConfig")]
    pub text_generation_config: BedrockTextGenerationConfig,
}

impl BedrockInvokeRequest {
    /// Translate into the canonical completion parameters.
    #[must_use]
    pub fn into_params(self) -> CompletionParams {
        CompletionParams {
            prompt: self.input_text,
            temperature: self.text_generation_config.temperature,
            top_p: self.text_generation_config.top_p,
            max_tokens: self.text_generation_config.max_token_count,
            stop: self.text_generation_config.stop_sequences,
        }
    }
}

/// One generation result inside a Bedrock invoke response.
#[derive(Debug, Clone, Serialize)]
pub struct BedrockTextGenerationResult {
    #[serde(rename = "tokenCount")]
    pub token_count: u32,
    #[serde(rename = "outputText")]
    pub output_text: String,
    #[serde(rename = "completionReason")]
    pub completion_reason: String,
}

/// Response from the Bedrock completion endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct BedrockInvokeResponse {
    #[serde(rename = "inputTextTokenCount")]
    pub input_text_token_count: u32,
    pub results: Vec<BedrockTextGenerationResult>,
}

impl BedrockInvokeResponse {
    /// Translate a canonical outcome into the Bedrock response shape.
    ///
    /// The engine is invoked for a single completion, never an n-best
    /// list, so `results` always has exactly one entry. The finish reason
    /// is re-cased into Bedrock's uppercase convention.
    #[must_use]
    pub fn from_outcome(outcome: CompletionOutcome) -> Self {
        Self {
            input_text_token_count: outcome.prompt_tokens,
            results: vec![BedrockTextGenerationResult {
                token_count: outcome.completion_tokens,
                output_text: outcome.text,
                completion_reason: outcome.finish_reason.as_str().to_uppercase(),
            }],
        }
    }
}

// ── Embedding ──────────────────────────────────────────────────────────

/// Request to the Bedrock embedding endpoint — a single input text, never
/// a sequence.
#[derive(Debug, Clone, Deserialize)]
pub struct BedrockEmbeddingRequest {
    #[serde(rename = "inputText")]
    pub input_text: String,
}

/// Response from the Bedrock embedding endpoint: one bare vector with no
/// index/object wrapper.
#[derive(Debug, Clone, Serialize)]
pub struct BedrockEmbeddingResponse {
    pub embedding: EmbeddingVector,
}

// ── Errors ─────────────────────────────────────────────────────────────

/// Build a Bedrock-style error JSON object: `{"message": "..."}`.
#[must_use]
pub fn bedrock_error(msg: &str) -> serde_json::Value {
    serde_json::json!({ "message": msg })
}

#[cfg(test)]
mod tests {
    use super::*;
    use llmshim_core::canonical::FinishReason;

    #[test]
    fn request_fields_map_onto_canonical_params() {
        let json = serde_json::json!({
            "inputText": "hello",
            "textGenerationConfig": {
                "temperature": 0.5,
                "topP": 1.0,
                "maxTokenCount": 16,
                "stopSequences": ["\n"]
            }
        });
        let request: BedrockInvokeRequest = serde_json::from_value(json).unwrap();
        let params = request.into_params();
        assert_eq!(params.prompt, "hello");
        assert!((params.temperature - 0.5).abs() < f32::EPSILON);
        assert!((params.top_p - 1.0).abs() < f32::EPSILON);
        assert_eq!(params.max_tokens, 16);
        assert_eq!(params.stop, vec!["\n".to_string()]);
    }

    #[test]
    fn response_always_has_exactly_one_result() {
        let outcome = CompletionOutcome {
            text: "generated".to_string(),
            finish_reason: FinishReason::Length,
            prompt_tokens: 12,
            completion_tokens: 34,
        };
        let response = BedrockInvokeResponse::from_outcome(outcome);
        assert_eq!(response.results.len(), 1);
        assert_eq!(response.input_text_token_count, 12);
        assert_eq!(response.results[0].token_count, 34);
        assert_eq!(response.results[0].output_text, "generated");
        assert_eq!(response.results[0].completion_reason, "LENGTH");
    }

    #[test]
    fn completion_reason_is_uppercased() {
        for (reason, expected) in [
            (FinishReason::Stop, "STOP"),
            (FinishReason::Length, "LENGTH"),
            (FinishReason::Other, "OTHER"),
        ] {
            let outcome = CompletionOutcome {
                text: String::new(),
                finish_reason: reason,
                prompt_tokens: 0,
                completion_tokens: 0,
            };
            let response = BedrockInvokeResponse::from_outcome(outcome);
            assert_eq!(response.results[0].completion_reason, expected);
        }
    }

    #[test]
    fn token_counts_survive_the_round_trip_exactly() {
        // inputTextTokenCount and tokenCount must be exactly what the
        // engine reported; no renaming drift, no precision loss.
        let outcome = CompletionOutcome {
            text: "x".to_string(),
            finish_reason: FinishReason::Stop,
            prompt_tokens: u32::MAX,
            completion_tokens: 0,
        };
        let response = BedrockInvokeResponse::from_outcome(outcome);
        let wire = serde_json::to_value(&response).unwrap();
        assert_eq!(wire["inputTextTokenCount"], u32::MAX);
        assert_eq!(wire["results"][0]["tokenCount"], 0);
    }
}
