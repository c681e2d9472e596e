use actix_web::{web, HttpResponse};
use tracing::field;
use tracing_futures::Instrument;

use crate::executor::completions::handle_completion;
use crate::handler::GuardResolverData;
use crate::types::completions::CompletionRequest;
use crate::GatewayApiError;

pub async fn create_completion(
    request: web::Json<CompletionRequest>,
    guards: GuardResolverData,
) -> Result<HttpResponse, GatewayApiError> {
    let request = request.into_inner();

    let span = tracing::info_span!(
        target: "guardgate::api_invoke",
        "completion",
        model = request.model.as_deref().unwrap_or_default(),
        error = field::Empty,
    );

    let response = handle_completion(guards.get_ref().as_ref(), request)
        .instrument(span)
        .await?;

    Ok(HttpResponse::Ok().json(response))
}
