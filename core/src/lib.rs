pub mod executor;
pub mod handler;
pub mod types;

#[cfg(test)]
pub(crate) mod test_utils;

use actix_web::http::header::ContentType;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde_json::json;
use thiserror::Error;
use tracing::Span;
use types::guardrails::GuardError;

pub type GatewayResult<T> = Result<T, GuardError>;

#[derive(Error, Debug)]
pub enum GatewayApiError {
    #[error(transparent)]
    GuardError(#[from] GuardError),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl actix_web::error::ResponseError for GatewayApiError {
    fn error_response(&self) -> HttpResponse {
        tracing::error!("API error: {:?}", self);

        let span = Span::current();
        span.record("error", self.to_string());

        let json_error = match self {
            GatewayApiError::GuardError(GuardError::BackendError { status, .. }) => json!({
                "error": self.to_string(),
                "backend_status": status,
            }),
            e => json!({
                "error": e.to_string(),
            }),
        };

        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .json(json_error)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            GatewayApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            GatewayApiError::GuardError(e) => match e {
                GuardError::GuardNotFound(_) => StatusCode::NOT_FOUND,
                GuardError::UnsupportedInputType { .. } | GuardError::InvalidInput(_) => {
                    StatusCode::BAD_REQUEST
                }
                GuardError::BackendTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
                GuardError::BackendError { .. }
                | GuardError::BackendProtocolError(_)
                | GuardError::MalformedVerdict(_)
                | GuardError::BackendUnavailable(_) => StatusCode::BAD_GATEWAY,
            },
        }
    }
}
