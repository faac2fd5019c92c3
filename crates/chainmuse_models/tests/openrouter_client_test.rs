//! OpenRouter client against a local stand-in server.

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
};
use chainmuse_core::GenerationRequest;
use chainmuse_error::GenerationErrorKind;
use chainmuse_interface::NarrativeGenerator;
use chainmuse_models::{GenerationConfig, OpenRouterClient, openrouter::FALLBACK_MODELS};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Clone, Default)]
struct Captured {
    body: Arc<Mutex<Option<Value>>>,
    auth: Arc<Mutex<Option<String>>>,
}

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });
    format!("http://{}", addr)
}

fn config(api_base: String) -> GenerationConfig {
    GenerationConfig {
        api_base,
        api_key: Some("test-key".to_string()),
        timeout_secs: 1,
        ..GenerationConfig::default()
    }
}

#[tokio::test]
async fn test_generate_sends_prompt_and_returns_text() {
    let captured = Captured::default();
    let router = Router::new()
        .route(
            "/chat/completions",
            post(
                |State(c): State<Captured>, headers: HeaderMap, Json(body): Json<Value>| async move {
                    *c.auth.lock().unwrap() = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string);
                    *c.body.lock().unwrap() = Some(body);
                    Json(json!({
                        "choices": [{"message": {"role": "assistant", "content": "Once upon a time"}}]
                    }))
                },
            ),
        )
        .with_state(captured.clone());
    let base = serve(router).await;

    let client = OpenRouterClient::new(config(base)).expect("client");
    let text = client
        .generate(&GenerationRequest::new(
            "A lighthouse",
            Some("The storm began.".to_string()),
            "meta-llama/llama-3-8b-instruct",
        ))
        .await
        .expect("generation");

    assert_eq!(text, "Once upon a time");
    assert_eq!(
        captured.auth.lock().unwrap().as_deref(),
        Some("Bearer test-key")
    );

    let body = captured.body.lock().unwrap().clone().expect("body");
    assert_eq!(body["model"], "meta-llama/llama-3-8b-instruct");
    assert_eq!(body["max_tokens"], 600);
    let system = body["messages"][0]["content"].as_str().expect("system");
    assert!(system.contains("The storm began."));
    assert_eq!(body["messages"][1]["content"], "A lighthouse");
}

#[tokio::test]
async fn test_api_error_surfaces_status() {
    let router = Router::new().route(
        "/chat/completions",
        post(|| async { (StatusCode::TOO_MANY_REQUESTS, "slow down") }),
    );
    let base = serve(router).await;

    let client = OpenRouterClient::new(config(base)).expect("client");
    let err = client
        .generate(&GenerationRequest::new("p", None, "m"))
        .await
        .expect_err("should fail");

    match err.kind {
        GenerationErrorKind::Api { status, message } => {
            assert_eq!(status, 429);
            assert_eq!(message, "slow down");
        }
        other => panic!("unexpected error kind: {other}"),
    }
}

#[tokio::test]
async fn test_empty_content_is_an_error() {
    let router = Router::new().route(
        "/chat/completions",
        post(|| async { Json(json!({"choices": [{"message": {"role": "assistant", "content": ""}}]})) }),
    );
    let base = serve(router).await;

    let client = OpenRouterClient::new(config(base)).expect("client");
    let err = client
        .generate(&GenerationRequest::new("p", None, "m"))
        .await
        .expect_err("should fail");
    assert_eq!(err.kind, GenerationErrorKind::EmptyResponse);
}

#[tokio::test]
async fn test_slow_provider_times_out() {
    let router = Router::new().route(
        "/chat/completions",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(3)).await;
            Json(json!({"choices": []}))
        }),
    );
    let base = serve(router).await;

    let client = OpenRouterClient::new(config(base)).expect("client");
    let err = client
        .generate(&GenerationRequest::new("p", None, "m"))
        .await
        .expect_err("should time out");
    assert_eq!(err.kind, GenerationErrorKind::Timeout(1));
}

#[tokio::test]
async fn test_list_models_filters_catalogue() {
    let router = Router::new().route(
        "/models",
        get(|| async {
            Json(json!({"data": [
                {"id": "mistralai/mistral-7b-instruct"},
                {"id": "openai/gpt-4o-chat"},
                {"id": "stability/sdxl"},
            ]}))
        }),
    );
    let base = serve(router).await;

    let client = OpenRouterClient::new(config(base)).expect("client");
    let models = client.list_models().await;
    assert_eq!(
        models,
        vec!["mistralai/mistral-7b-instruct", "openai/gpt-4o-chat"]
    );
}

#[tokio::test]
async fn test_list_models_falls_back_when_unreachable() {
    let router = Router::new().route(
        "/models",
        get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let base = serve(router).await;

    let client = OpenRouterClient::new(config(base)).expect("client");
    let models = client.list_models().await;
    assert_eq!(models, FALLBACK_MODELS);
}

#[test]
fn test_missing_key_is_rejected() {
    let err = OpenRouterClient::new(GenerationConfig::default()).expect_err("no key");
    assert_eq!(err.kind, GenerationErrorKind::MissingApiKey);
}
