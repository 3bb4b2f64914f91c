//! Integration tests for the embedding-gateway router.
//!
//! All three dialects run against a mock engine port that derives each
//! vector from its input text, so index alignment is observable.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use llmshim_core::canonical::EmbeddingVector;
use llmshim_core::ports::{EmbeddingEnginePort, EngineError};
use llmshim_gateway::{EmbeddingState, embedding_router};

/// Mock embedding engine: each vector is derived from its input text
/// (`[len, len]`), so tests can check which input produced which vector.
#[derive(Debug)]
struct MockEngine {
    fail_with: Option<u16>,
    calls: Mutex<usize>,
}

impl MockEngine {
    fn succeeding() -> Arc<Self> {
        Arc::new(Self {
            fail_with: None,
            calls: Mutex::new(0),
        })
    }

    fn failing(status: u16) -> Arc<Self> {
        Arc::new(Self {
            fail_with: Some(status),
            calls: Mutex::new(0),
        })
    }

    fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl EmbeddingEnginePort for MockEngine {
    #[allow(clippy::cast_precision_loss)]
    async fn embed(&self, inputs: Vec<String>) -> Result<Vec<EmbeddingVector>, EngineError> {
        *self.calls.lock().unwrap() += 1;
        if let Some(status) = self.fail_with {
            return Err(EngineError::Upstream {
                status,
                message: "engine failure".to_string(),
            });
        }
        Ok(inputs
            .iter()
            .map(|text| vec![text.len() as f32, text.len() as f32])
            .collect())
    }
}

fn state_with(engine: Arc<MockEngine>) -> EmbeddingState {
    EmbeddingState::new(engine, "all-minilm-l6-v2")
}

async fn post_json(
    router: axum::Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, value)
}

#[tokio::test]
async fn health_endpoint_returns_ok() {
    let app = embedding_router(state_with(MockEngine::succeeding()));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn native_single_string_yields_index_zero() {
    let app = embedding_router(state_with(MockEngine::succeeding()));

    let body = serde_json::json!({"input": "hello", "model": "x"});
    let (status, reply) = post_json(app, "/v1/embeddings", &body).await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(reply["object"], "list");
    let data = reply["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["index"], 0);
    assert_eq!(data[0]["object"], "embedding");
    assert_eq!(data[0]["embedding"][0], 5.0);
}

#[tokio::test]
async fn native_batch_is_index_aligned_with_input_order() {
    let app = embedding_router(state_with(MockEngine::succeeding()));

    let body = serde_json::json!({"input": ["a", "bb", "ccc"], "model": "x"});
    let (status, reply) = post_json(app, "/v1/embeddings", &body).await;
    assert_eq!(status, StatusCode::OK);

    let data = reply["data"].as_array().unwrap();
    assert_eq!(data.len(), 3);
    for (i, entry) in data.iter().enumerate() {
        assert_eq!(entry["index"], i);
        // Entry i's vector corresponds to input string i.
        #[allow(clippy::cast_precision_loss)]
        let expected = (i + 1) as f64;
        assert_eq!(entry["embedding"][0], expected);
    }
}

#[tokio::test]
async fn native_two_element_batch_has_indices_zero_and_one() {
    let app = embedding_router(state_with(MockEngine::succeeding()));

    let body = serde_json::json!({"input": ["a", "b"], "model": "x"});
    let (_, reply) = post_json(app, "/v1/embeddings", &body).await;

    let data = reply["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["index"], 0);
    assert_eq!(data[1]["index"], 1);
}

#[tokio::test]
async fn bedrock_returns_a_bare_vector() {
    let app = embedding_router(state_with(MockEngine::succeeding()));

    let body = serde_json::json!({"inputText": "hello"});
    let (status, reply) = post_json(app, "/bedrock/model/titan-embed/invoke", &body).await;
    assert_eq!(status, StatusCode::OK);

    // Single vector, no index/object wrapper.
    assert!(reply["embedding"].is_array());
    assert_eq!(reply["embedding"][0], 5.0);
    assert!(reply.get("data").is_none());
    assert!(reply.get("object").is_none());
}

#[tokio::test]
async fn azure_adds_usage_and_model_echo_over_the_native_shape() {
    let body = serde_json::json!({"input": ["a", "bb"], "model": "text-embedding-ada-002"});

    let (_, native) = post_json(
        embedding_router(state_with(MockEngine::succeeding())),
        "/v1/embeddings",
        &serde_json::json!({"input": ["a", "bb"]}),
    )
    .await;
    let (status, azure) = post_json(
        embedding_router(state_with(MockEngine::succeeding())),
        "/openai/deployments/my-deployment/embeddings",
        &body,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Same list-of-embedding-objects shape as the native batch endpoint.
    assert_eq!(azure["object"], "list");
    assert_eq!(azure["data"], native["data"]);

    // Plus the fixed placeholder usage block and the model echo.
    assert_eq!(azure["usage"]["prompt_tokens"], 1);
    assert_eq!(azure["usage"]["total_tokens"], 1);
    assert_eq!(azure["model"], "text-embedding-ada-002");
}

#[tokio::test]
async fn azure_echoes_the_configured_model_when_none_is_requested() {
    let app = embedding_router(state_with(MockEngine::succeeding()));

    let body = serde_json::json!({"input": ["a"]});
    let (_, reply) = post_json(app, "/openai/deployments/d/embeddings", &body).await;
    assert_eq!(reply["model"], "all-minilm-l6-v2");
}

#[tokio::test]
async fn malformed_input_fails_before_the_engine() {
    let engine = MockEngine::succeeding();
    let app = embedding_router(state_with(engine.clone()));

    // input has the wrong type entirely.
    let body = serde_json::json!({"input": 42, "model": "x"});
    let (status, error) = post_json(app, "/v1/embeddings", &body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error["error"]["message"].is_string());
    assert_eq!(engine.call_count(), 0);
}

#[tokio::test]
async fn empty_batch_is_rejected() {
    let engine = MockEngine::succeeding();
    let app = embedding_router(state_with(engine.clone()));

    let body = serde_json::json!({"input": [], "model": "x"});
    let (status, _) = post_json(app, "/v1/embeddings", &body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(engine.call_count(), 0);
}

#[tokio::test]
async fn engine_failures_propagate_without_retry() {
    let engine = MockEngine::failing(500);
    let app = embedding_router(state_with(engine.clone()));

    let body = serde_json::json!({"input": "hello", "model": "x"});
    let (status, error) = post_json(app, "/v1/embeddings", &body).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(error["error"]["message"].is_string());
    assert_eq!(engine.call_count(), 1);
}
