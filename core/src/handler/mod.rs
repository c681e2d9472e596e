pub mod completions;
pub mod models;
pub mod moderations;


use actix_web::web::{self, JsonConfig};
use actix_web::HttpResponse;
use serde_json::json;

use crate::types::guardrails::service::GuardResolver;
use crate::GatewayApiError;

/// Shared resolver handle registered as app data
pub type GuardResolverData = web::Data<Box<dyn GuardResolver>>;

pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

/// JSON extractor config: 8MB bodies, malformed payloads rendered as API errors
pub fn json_config() -> JsonConfig {
    JsonConfig::default()
        .limit(8 * 1024 * 1024)
        .error_handler(|err, _req| GatewayApiError::InvalidRequest(err.to_string()).into())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health)).service(
        web::scope("/v1")
            .route(
                "/moderations",
                web::post().to(moderations::create_moderation),
            )
            .route("/completions", web::post().to(completions::create_completion))
            .route("/models", web::get().to(models::list_guard_models)),
    );
}
