use actix_web::{web, HttpResponse};
use tracing::field;
use tracing_futures::Instrument;

use crate::executor::moderation::handle_moderation;
use crate::handler::GuardResolverData;
use crate::types::moderation::ModerationRequest;
use crate::GatewayApiError;

pub async fn create_moderation(
    request: web::Json<ModerationRequest>,
    guards: GuardResolverData,
) -> Result<HttpResponse, GatewayApiError> {
    let request = request.into_inner();

    let span = tracing::info_span!(
        target: "guardgate::api_invoke",
        "moderation",
        model = request.model.as_deref().unwrap_or_default(),
        error = field::Empty,
    );

    let response = handle_moderation(guards.get_ref().as_ref(), request)
        .instrument(span)
        .await?;

    Ok(HttpResponse::Ok().json(response))
}
