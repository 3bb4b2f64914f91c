//! HTTP adapter for the completion engine port.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use llmshim_core::canonical::{CompletionOutcome, CompletionParams, FinishReason};
use llmshim_core::ports::{CompletionEnginePort, EngineError};

/// Completion engine reached over HTTP at the model server's native
/// `/v1/completions` endpoint.
#[derive(Debug, Clone)]
pub struct HttpCompletionEngine {
    client: Client,
    base_url: String,
}

impl HttpCompletionEngine {
    /// Create an adapter against the given base URL.
    #[must_use]
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl CompletionEnginePort for HttpCompletionEngine {
    async fn complete(&self, params: CompletionParams) -> Result<CompletionOutcome, EngineError> {
        let url = format!("{}/v1/completions", self.base_url);
        debug!(url = %url, "Invoking completion engine");

        let body = serde_json::json!({
            "prompt": params.prompt,
            "temperature": params.temperature,
            "top_p": params.top_p,
            "max_tokens": params.max_tokens,
            "stop": params.stop,
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
        parse_completion_reply(&bytes)
    }
}

/// Parse the engine's OpenAI-style completion reply into canonical form.
///
/// Required fields: `choices[0].text`, `choices[0].finish_reason`,
/// `usage.prompt_tokens`, `usage.completion_tokens`. A reply missing any
/// of them is malformed; zero counts are never invented in their place.
fn parse_completion_reply(bytes: &[u8]) -> Result<CompletionOutcome, EngineError> {
    let reply: serde_json::Value =
        serde_json::from_slice(bytes).map_err(|e| EngineError::MalformedReply(e.to_string()))?;

    let choice = reply["choices"]
        .get(0)
        .ok_or_else(|| missing("choices[0]"))?;
    let text = choice["text"]
        .as_str()
        .ok_or_else(|| missing("choices[0].text"))?;
    let finish_label = choice["finish_reason"]
        .as_str()
        .ok_or_else(|| missing("choices[0].finish_reason"))?;
    let prompt_tokens = token_count(&reply["usage"]["prompt_tokens"], "usage.prompt_tokens")?;
    let completion_tokens = token_count(
        &reply["usage"]["completion_tokens"],
        "usage.completion_tokens",
    )?;

    Ok(CompletionOutcome {
        text: text.to_string(),
        finish_reason: FinishReason::from_engine_label(finish_label),
        prompt_tokens,
        completion_tokens,
    })
}

fn token_count(value: &serde_json::Value, field: &str) -> Result<u32, EngineError> {
    let raw = value.as_u64().ok_or_else(|| missing(field))?;
    u32::try_from(raw)
        .map_err(|_| EngineError::MalformedReply(format!("{field} out of range: {raw}")))
}

fn missing(field: &str) -> EngineError {
    EngineError::MalformedReply(format!("missing {field}"))
}
