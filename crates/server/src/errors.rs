use std::any::Any;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::types::ErrorEnvelope;
use service::errors::ServiceError;
use tracing::{error, warn};

/// Error half of the response envelope.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub message: String,
    pub error: Option<String>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, message: impl Into<String>, error: Option<String>) -> Self {
        Self { status, message: message.into(), error }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message, None)
    }

    /// Map a store failure; `context` names the operation for 400/500 bodies.
    ///
    /// NotFound → 404 carrying the store message, bad input (validation,
    /// conflict) → 400, storage failures → 500.
    pub fn from_service(e: ServiceError, context: &str) -> Self {
        match e {
            ServiceError::NotFound(msg) => {
                warn!(error = %msg, "{context}: not found");
                Self::new(StatusCode::NOT_FOUND, msg, None)
            }
            e if e.is_client_error() => {
                warn!(error = %e, "{context}: rejected input");
                Self::new(StatusCode::BAD_REQUEST, context, Some(e.detail()))
            }
            e => {
                error!(error = %e, "{context}: storage failure");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, context, Some(e.detail()))
            }
        }
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let mut body = ErrorEnvelope::new(self.message);
        body.error = self.error;
        (self.status, Json(body)).into_response()
    }
}

/// Response for a handler panic caught by `CatchPanicLayer`.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    error!(error = %detail, "handler panicked");
    let body = ErrorEnvelope::new("Internal server error").with_error(detail);
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::ModelError;

    #[test]
    fn service_errors_map_to_status() {
        let cases = [
            (ServiceError::NotFound("cart with id 1 not found".into()), StatusCode::NOT_FOUND),
            (ServiceError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (ServiceError::Conflict("dup".into()), StatusCode::BAD_REQUEST),
            (ServiceError::Model(ModelError::MissingField("title")), StatusCode::BAD_REQUEST),
            (ServiceError::Io("disk".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(JsonApiError::from_service(err, "op").status, status);
        }
    }

    #[test]
    fn not_found_keeps_store_message() {
        let e = JsonApiError::from_service(ServiceError::not_found("product", 4), "Error fetching product");
        assert_eq!(e.message, "product with id 4 not found");
        assert!(e.error.is_none());

        let e = JsonApiError::from_service(ServiceError::Conflict("code taken".into()), "Error creating product");
        assert_eq!(e.message, "Error creating product");
        assert_eq!(e.error.as_deref(), Some("code taken"));
    }

    #[test]
    fn panic_payload_is_reported() {
        let res = handle_panic(Box::new("boom"));
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
