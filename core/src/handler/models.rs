use actix_web::HttpResponse;

use crate::handler::GuardResolverData;
use crate::types::models::{GuardModel, GuardModelsResponse};
use crate::GatewayApiError;

pub async fn list_guard_models(guards: GuardResolverData) -> Result<HttpResponse, GatewayApiError> {
    let response = GuardModelsResponse {
        object: "list".to_string(),
        data: guards
            .guards()
            .into_iter()
            .map(|(id, guard_type)| GuardModel {
                id,
                object: "model".to_string(),
                owned_by: guard_type,
            })
            .collect(),
    };

    Ok(HttpResponse::Ok().json(response))
}
