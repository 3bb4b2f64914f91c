//! HTTP adapter for the embedding engine port.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use llmshim_core::canonical::EmbeddingVector;
use llmshim_core::ports::{EmbeddingEnginePort, EngineError};

/// Embedding engine reached over HTTP at the model server's native
/// `/v1/embeddings` endpoint.
#[derive(Debug, Clone)]
pub struct HttpEmbeddingEngine {
    client: Client,
    base_url: String,
    model_name: String,
}

impl HttpEmbeddingEngine {
    /// Create an adapter against the given base URL.
    ///
    /// `model_name` is forwarded to the server; llama-server ignores it
    /// but multi-model upstreams route on it.
    #[must_use]
    pub fn new(client: Client, base_url: impl Into<String>, model_name: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            model_name: model_name.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct UpstreamEmbeddingReply {
    data: Vec<UpstreamEmbeddingRow>,
}

#[derive(Debug, Deserialize)]
struct UpstreamEmbeddingRow {
    embedding: Vec<f32>,
    index: usize,
}

#[async_trait]
impl EmbeddingEnginePort for HttpEmbeddingEngine {
    async fn embed(&self, inputs: Vec<String>) -> Result<Vec<EmbeddingVector>, EngineError> {
        let url = format!("{}/v1/embeddings", self.base_url);
        debug!(url = %url, count = inputs.len(), "Invoking embedding engine");

        let expected = inputs.len();
        let body = serde_json::json!({
            "model": self.model_name,
            "input": inputs,
        });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| EngineError::Unreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(EngineError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| EngineError::Unreachable(e.to_string()))?;
        parse_embedding_reply(&bytes, expected)
    }
}

/// Parse the engine's OpenAI-style embedding reply into index-aligned
/// vectors.
///
/// The reply must carry exactly one row per input; rows are re-ordered by
/// their declared `index` so the output matches the input order even if
/// the server answered out of order.
fn parse_embedding_reply(bytes: &[u8], expected: usize) -> Result<Vec<EmbeddingVector>, EngineError> {
    let reply: UpstreamEmbeddingReply =
        serde_json::from_slice(bytes).map_err(|e| EngineError::MalformedReply(e.to_string()))?;

    if reply.data.len() != expected {
        return Err(EngineError::MalformedReply(format!(
            "expected {expected} embeddings, got {}",
            reply.data.len()
        )));
    }

    let mut vectors: Vec<Option<EmbeddingVector>> = vec![None; expected];
    for row in reply.data {
        let slot = vectors
            .get_mut(row.index)
            .ok_or_else(|| EngineError::MalformedReply(format!("index {} out of range", row.index)))?;
        if slot.replace(row.embedding).is_some() {
            return Err(EngineError::MalformedReply(format!(
                "duplicate index {}",
                row.index
            )));
        }
    }

    // Every slot was filled exactly once, so this cannot fail.
    Ok(vectors.into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_reordered_by_index() {
        let reply = serde_json::json!({
            "data": [
                {"embedding": [0.5, 0.6], "index": 1},
                {"embedding": [0.1, 0.2], "index": 0}
            ]
        });
        let vectors = parse_embedding_reply(&serde_json::to_vec(&reply).unwrap(), 2).unwrap();
        assert_eq!(vectors, vec![vec![0.1, 0.2], vec![0.5, 0.6]]);
    }

    #[test]
    fn count_mismatch_is_malformed() {
        let reply = serde_json::json!({
            "data": [{"embedding": [0.1], "index": 0}]
        });
        let err = parse_embedding_reply(&serde_json::to_vec(&reply).unwrap(), 2).unwrap_err();
        assert!(matches!(err, EngineError::MalformedReply(_)));
    }

    #[test]
    fn duplicate_index_is_malformed() {
        let reply = serde_json::json!({
            "data": [
                {"embedding": [0.1], "index": 0},
                {"embedding": [0.2], "index": 0}
            ]
        });
        let err = parse_embedding_reply(&serde_json::to_vec(&reply).unwrap(), 2).unwrap_err();
        assert!(matches!(err, EngineError::MalformedReply(_)));
    }
}
