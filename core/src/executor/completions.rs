use futures::future::try_join_all;
use tracing::debug;
use uuid::Uuid;

use crate::executor::resolve_model_name;
use crate::types::completions::{
    CompletionChoice, CompletionRequest, CompletionResponse, CompletionUsage,
};
use crate::types::guardrails::service::GuardResolver;
use crate::types::guardrails::InputType;
use crate::GatewayResult;

pub async fn handle_completion(
    resolver: &dyn GuardResolver,
    request: CompletionRequest,
) -> GatewayResult<CompletionResponse> {
    let model = resolve_model_name(request.model, resolver)?;
    let adapter = resolver.resolve(&model, &[InputType::Text])?;
    let prompts = request.prompt.into_prompts()?;

    debug!(
        "Completing {} prompt(s) with guard {}",
        prompts.len(),
        adapter.guard_id()
    );

    let texts = try_join_all(prompts.iter().map(|prompt| adapter.complete(prompt))).await?;

    let choices = texts
        .into_iter()
        .enumerate()
        .map(|(index, text)| CompletionChoice {
            text,
            index: index as u32,
            logprobs: None,
            finish_reason: "stop".to_string(),
        })
        .collect();

    Ok(CompletionResponse {
        id: format!("cmpl-{}", Uuid::new_v4()),
        object: "text_completion".to_string(),
        created: chrono::Utc::now().timestamp(),
        model,
        choices,
        usage: CompletionUsage::default(),
    })
}
