use std::collections::BTreeSet;

use futures::future::try_join_all;
use tracing::debug;
use uuid::Uuid;

use crate::executor::resolve_model_name;
use crate::types::guardrails::service::GuardResolver;
use crate::types::guardrails::InputType;
use crate::GatewayResult;
use crate::types::moderation::{
    collect_texts, ModerationInputItem, ModerationRequest, ModerationResponse, ModerationResults,
    OutputFormat,
};

/// Moderates every input item with the resolved guard.
///
/// The batch fails as a whole on the first invalid item or backend failure.
/// Backend calls run concurrently, `try_join_all` keeps results in input order.
pub async fn handle_moderation(
    resolver: &dyn GuardResolver,
    request: ModerationRequest,
) -> GatewayResult<ModerationResponse> {
    let model = resolve_model_name(request.model, resolver)?;
    let items = request.input.into_items();

    let input_types = required_input_types(&items);
    let adapter = resolver.resolve(&model, &input_types)?;
    let texts = collect_texts(items)?;

    debug!(
        "Moderating {} item(s) with guard {}",
        texts.len(),
        adapter.guard_id()
    );

    let results = match request.output_format {
        OutputFormat::OpenAi => ModerationResults::OpenAi(
            try_join_all(texts.iter().map(|text| adapter.moderate(text))).await?,
        ),
        OutputFormat::LlamaGuard3 => ModerationResults::LlamaGuard(
            try_join_all(texts.iter().map(|text| adapter.classify(text))).await?,
        ),
    };

    Ok(ModerationResponse {
        id: format!("modr-{}", Uuid::new_v4()),
        model,
        results,
    })
}

fn required_input_types(items: &[ModerationInputItem]) -> Vec<InputType> {
    items
        .iter()
        .filter_map(ModerationInputItem::input_type)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
