use std::sync::Arc;

use serde_json::json;

use crate::executor::completions::handle_completion;
use crate::executor::moderation::handle_moderation;
use crate::test_utils::{MockGuard, MockResolver};
use crate::types::completions::CompletionRequest;
use crate::types::guardrails::{GuardError, GuardVerdict, InputType};
use crate::types::moderation::{ModerationCategory, ModerationRequest, ModerationResults};

fn resolver(guard: Arc<MockGuard>) -> MockResolver {
    MockResolver::default().with_guard(guard, vec![InputType::Text])
}

fn moderation_request(value: serde_json::Value) -> ModerationRequest {
    serde_json::from_value(value).unwrap()
}

#[tokio::test]
async fn test_results_follow_input_order() {
    let guard = Arc::new(MockGuard::new("lg"));
    let resolver = resolver(guard.clone());

    // The first item answers last, results must still line up with the input.
    let request = moderation_request(json!({
        "model": "lg",
        "input": ["slow kill", "hello", "kill it"],
    }));
    let response = handle_moderation(&resolver, request).await.unwrap();

    assert_eq!(response.model, "lg");
    assert!(response.id.starts_with("modr-"));
    let ModerationResults::OpenAi(results) = response.results else {
        panic!("expected openai results");
    };
    let flagged: Vec<bool> = results.iter().map(|r| r.flagged).collect();
    assert_eq!(flagged, vec![true, false, true]);
    assert!(results[0].is_flagged(ModerationCategory::Violence));
    assert_eq!(guard.calls(), 3);
}

#[tokio::test]
async fn test_single_string_input() {
    let guard = Arc::new(MockGuard::new("lg"));
    let resolver = resolver(guard);

    let request = moderation_request(json!({"model": "lg", "input": "hello"}));
    let response = handle_moderation(&resolver, request).await.unwrap();
    assert_eq!(response.results.len(), 1);
}

#[tokio::test]
async fn test_non_string_item_fails_whole_batch() {
    let guard = Arc::new(MockGuard::new("lg"));
    let resolver = resolver(guard.clone());

    let request = moderation_request(json!({"model": "lg", "input": ["a", 7, "b"]}));
    let err = handle_moderation(&resolver, request).await.unwrap_err();

    assert!(matches!(err, GuardError::InvalidInput(_)));
    assert_eq!(guard.calls(), 0);
}

#[tokio::test]
async fn test_unknown_model_never_reaches_backend() {
    let guard = Arc::new(MockGuard::new("lg"));
    let resolver = resolver(guard.clone());

    let request = moderation_request(json!({"model": "other", "input": ["a"]}));
    let err = handle_moderation(&resolver, request).await.unwrap_err();
    assert!(matches!(err, GuardError::GuardNotFound(model) if model == "other"));

    let request: CompletionRequest =
        serde_json::from_value(json!({"model": "other", "prompt": "a"})).unwrap();
    let err = handle_completion(&resolver, request).await.unwrap_err();
    assert!(matches!(err, GuardError::GuardNotFound(_)));

    assert_eq!(guard.calls(), 0);
}

#[tokio::test]
async fn test_image_item_requires_image_support() {
    let guard = Arc::new(MockGuard::new("lg"));
    let resolver = resolver(guard.clone());

    let request = moderation_request(json!({
        "model": "lg",
        "input": [{"type": "image_url", "image_url": {"url": "https://example.com/cat.png"}}],
    }));
    let err = handle_moderation(&resolver, request).await.unwrap_err();
    assert!(matches!(err, GuardError::UnsupportedInputType { .. }));

    let vision = Arc::new(MockGuard::new("vision"));
    let resolver =
        MockResolver::default().with_guard(vision.clone(), vec![InputType::Text, InputType::Image]);
    let request = moderation_request(json!({
        "model": "vision",
        "input": [{"type": "image_url", "image_url": {"url": "https://example.com/cat.png"}}],
    }));
    let err = handle_moderation(&resolver, request).await.unwrap_err();
    assert!(matches!(err, GuardError::InvalidInput(_)));
    assert_eq!(vision.calls(), 0);
}

#[tokio::test]
async fn test_backend_failure_aborts_batch() {
    let guard = Arc::new(MockGuard::new("lg"));
    let resolver = resolver(guard);

    let request = moderation_request(json!({"model": "lg", "input": ["a", "fail", "c"]}));
    let err = handle_moderation(&resolver, request).await.unwrap_err();
    assert!(matches!(err, GuardError::BackendError { status: 500, .. }));
}

#[tokio::test]
async fn test_llama_guard_output_format() {
    let guard = Arc::new(MockGuard::new("lg"));
    let resolver = resolver(guard);

    let request = moderation_request(json!({
        "model": "lg",
        "input": ["kill", "hello"],
        "output_format": "llama-guard-3",
    }));
    let response = handle_moderation(&resolver, request).await.unwrap();
    assert_eq!(
        response.results,
        ModerationResults::LlamaGuard(vec![
            GuardVerdict::Unsafe {
                violated_categories: vec!["S1".to_string()]
            },
            GuardVerdict::Safe,
        ])
    );
}

#[tokio::test]
async fn test_default_guard_is_used_without_model() {
    let guard = Arc::new(MockGuard::new("lg"));
    let resolver = resolver(guard.clone()).with_default("lg");

    let request = moderation_request(json!({"input": "hello"}));
    let response = handle_moderation(&resolver, request).await.unwrap();
    assert_eq!(response.model, "lg");

    let resolver = MockResolver::default().with_guard(guard, vec![InputType::Text]);
    let request = moderation_request(json!({"input": "hello"}));
    let err = handle_moderation(&resolver, request).await.unwrap_err();
    assert!(matches!(err, GuardError::InvalidInput(_)));
}

#[tokio::test]
async fn test_completion_choices() {
    let guard = Arc::new(MockGuard::new("lg"));
    let resolver = resolver(guard);

    let request: CompletionRequest =
        serde_json::from_value(json!({"model": "lg", "prompt": ["slow one", "two"]})).unwrap();
    let response = handle_completion(&resolver, request).await.unwrap();

    assert_eq!(response.object, "text_completion");
    assert_eq!(response.model, "lg");
    assert_eq!(response.choices.len(), 2);
    assert_eq!(response.choices[0].text, "echo: slow one");
    assert_eq!(response.choices[0].index, 0);
    assert_eq!(response.choices[1].text, "echo: two");
    assert_eq!(response.choices[1].index, 1);
    assert!(response
        .choices
        .iter()
        .all(|c| c.finish_reason == "stop" && c.logprobs.is_none()));
    assert_eq!(response.usage.total_tokens, 0);
}

#[tokio::test]
async fn test_completion_rejects_non_string_prompt() {
    let guard = Arc::new(MockGuard::new("lg"));
    let resolver = resolver(guard.clone());

    let request: CompletionRequest =
        serde_json::from_value(json!({"model": "lg", "prompt": ["ok", 1]})).unwrap();
    let err = handle_completion(&resolver, request).await.unwrap_err();
    assert!(matches!(err, GuardError::InvalidInput(_)));
    assert_eq!(guard.calls(), 0);
}
