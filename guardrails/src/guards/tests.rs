use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use guardgate_core::types::guardrails::service::GuardAdapter;
use guardgate_core::types::guardrails::{
    GuardConfig, GuardError, GuardType, GuardVerdict, InputType, IGNORED_API_KEY,
};
use guardgate_core::types::moderation::ModerationCategory;
use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::guards::adapter_for;

const TARGET_MODEL: &str = "meta-llama/Llama-Guard-3-8B";

fn config(target: String, api_key: &str, timeout: Duration) -> Arc<GuardConfig> {
    Arc::new(GuardConfig {
        id: "local/llama-guard".to_string(),
        guard_type: GuardType::LlamaGuard3,
        api_key: SecretString::from(api_key.to_string()),
        categories: vec!["S1: Violent Crimes.".to_string(), "S10: Hate.".to_string()],
        input_types: BTreeSet::from([InputType::Text]),
        target,
        target_model_name: TARGET_MODEL.to_string(),
        request_timeout: timeout,
    })
}

async fn adapter(server: &MockServer) -> Box<dyn GuardAdapter> {
    adapter_for(
        config(
            format!("{}/v1/completions", server.uri()),
            IGNORED_API_KEY,
            Duration::from_secs(5),
        ),
        reqwest::Client::new(),
    )
}

fn completion(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "id": "cmpl-1",
        "object": "text_completion",
        "choices": [{"index": 0, "text": text, "finish_reason": "stop"}]
    }))
}

#[tokio::test]
async fn test_safe_verdict() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/completions"))
        .and(body_partial_json(json!({"model": TARGET_MODEL})))
        .and(body_string_contains("User: hello there"))
        .and(body_string_contains("S10: Hate."))
        .respond_with(completion("\n\nsafe"))
        .expect(1)
        .mount(&server)
        .await;

    let adapter = adapter(&server).await;
    let result = adapter.moderate("hello there").await.unwrap();
    assert!(!result.flagged);
    assert!(result.categories.values().all(|flagged| !flagged));
}

#[tokio::test]
async fn test_unsafe_verdict() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/completions"))
        .respond_with(completion("unsafe\nS1,S10"))
        .mount(&server)
        .await;

    let adapter = adapter(&server).await;
    let verdict = adapter.classify("something violent").await.unwrap();
    assert_eq!(
        verdict,
        GuardVerdict::Unsafe {
            violated_categories: vec!["S1".to_string(), "S10".to_string()]
        }
    );

    let result = adapter.moderate("something violent").await.unwrap();
    assert!(result.flagged);
    for category in [
        ModerationCategory::Violence,
        ModerationCategory::ViolenceGraphic,
        ModerationCategory::Hate,
        ModerationCategory::HateThreatening,
    ] {
        assert!(result.is_flagged(category), "{category:?}");
        assert_eq!(result.score(category), 1.0);
    }
    assert!(!result.is_flagged(ModerationCategory::Sexual));
    assert_eq!(result.score(ModerationCategory::Sexual), 0.0);
}

#[tokio::test]
async fn test_non_success_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("model loading"))
        .mount(&server)
        .await;

    let err = adapter(&server).await.moderate("hi").await.unwrap_err();
    assert!(matches!(
        err,
        GuardError::BackendError { status: 503, detail } if detail == "model loading"
    ));
}

#[tokio::test]
async fn test_only_ok_status_is_parsed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({
            "choices": [{"text": "safe"}]
        })))
        .mount(&server)
        .await;

    let err = adapter(&server).await.moderate("hi").await.unwrap_err();
    assert!(matches!(err, GuardError::BackendError { status: 202, .. }));
}

#[tokio::test]
async fn test_unexpected_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": "safe"})))
        .mount(&server)
        .await;

    let err = adapter(&server).await.moderate("hi").await.unwrap_err();
    assert!(matches!(err, GuardError::BackendProtocolError(_)));
}

#[tokio::test]
async fn test_empty_choices() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let err = adapter(&server).await.complete("hi").await.unwrap_err();
    assert!(matches!(err, GuardError::BackendProtocolError(_)));
}

#[tokio::test]
async fn test_unsafe_without_categories() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(completion("unsafe"))
        .mount(&server)
        .await;

    let err = adapter(&server).await.moderate("hi").await.unwrap_err();
    assert!(matches!(err, GuardError::MalformedVerdict(_)));
}

#[tokio::test]
async fn test_request_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(completion("safe").set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;

    let adapter = adapter_for(
        config(
            format!("{}/v1/completions", server.uri()),
            IGNORED_API_KEY,
            Duration::from_millis(50),
        ),
        reqwest::Client::new(),
    );
    let err = adapter.moderate("hi").await.unwrap_err();
    assert!(matches!(
        err,
        GuardError::BackendTimeout { guard, timeout }
            if guard == "local/llama-guard" && timeout == Duration::from_millis(50)
    ));
}

#[tokio::test]
async fn test_unreachable_backend() {
    let adapter = adapter_for(
        config(
            "http://127.0.0.1:1/v1/completions".to_string(),
            IGNORED_API_KEY,
            Duration::from_secs(5),
        ),
        reqwest::Client::new(),
    );
    let err = adapter.moderate("hi").await.unwrap_err();
    assert!(matches!(err, GuardError::BackendUnavailable(_)));
}

#[tokio::test]
async fn test_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("authorization", "Bearer sk-guard"))
        .respond_with(completion("safe"))
        .expect(1)
        .mount(&server)
        .await;

    let adapter = adapter_for(
        config(
            format!("{}/v1/completions", server.uri()),
            "sk-guard",
            Duration::from_secs(5),
        ),
        reqwest::Client::new(),
    );
    adapter.moderate("hi").await.unwrap();
}

#[tokio::test]
async fn test_ignored_key_sends_no_auth() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(completion("safe"))
        .mount(&server)
        .await;

    adapter(&server).await.moderate("hi").await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_completion_is_trimmed_and_has_no_categories() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string_contains("User: write a haiku"))
        .respond_with(completion("  an old silent pond \n"))
        .mount(&server)
        .await;

    let adapter = adapter(&server).await;
    let text = adapter.complete("write a haiku").await.unwrap();
    assert_eq!(text, "an old silent pond");

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let prompt = body["prompt"].as_str().unwrap();
    assert!(!prompt.contains("UNSAFE CONTENT CATEGORIES"));
    assert_eq!(body["model"], TARGET_MODEL);
}
