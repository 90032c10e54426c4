//! Request parsing shared by the product and cart handlers.

use std::collections::HashMap;

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    Form,
};
use serde_json::{Map, Value};

use crate::errors::JsonApiError;

/// Path ids must be positive integers.
pub fn parse_id(raw: &str) -> Result<u64, JsonApiError> {
    raw.trim()
        .parse::<u64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| JsonApiError::bad_request("Ids must be valid positive integers"))
}

/// Request body as a field map.
///
/// `application/x-www-form-urlencoded` bodies become string fields; anything
/// else must be a JSON object. An empty body reads as `{}`.
pub struct Fields(pub Map<String, Value>);

impl Fields {
    /// Reject `{}` with `empty_msg`.
    pub fn non_empty(self, empty_msg: &str) -> Result<Map<String, Value>, JsonApiError> {
        if self.0.is_empty() {
            return Err(JsonApiError::bad_request(empty_msg));
        }
        Ok(self.0)
    }
}

#[async_trait]
impl<S> FromRequest<S> for Fields
where
    S: Send + Sync,
{
    type Rejection = JsonApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_form(req.headers()) {
            let Form(fields) = Form::<HashMap<String, String>>::from_request(req, state)
                .await
                .map_err(|e| JsonApiError::new(StatusCode::BAD_REQUEST, "Request body must be a valid form", Some(e.body_text())))?;
            return Ok(Self(fields.into_iter().map(|(k, v)| (k, Value::String(v))).collect()));
        }
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| JsonApiError::new(StatusCode::BAD_REQUEST, "Request body could not be read", Some(e.body_text())))?;
        json_object(&body).map(Self)
    }
}

fn is_form(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.trim_start().starts_with("application/x-www-form-urlencoded"))
}

fn json_object(body: &Bytes) -> Result<Map<String, Value>, JsonApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(obj)) => Ok(obj),
        Ok(_) => Err(JsonApiError::bad_request("Request body must be a JSON object")),
        Err(e) => Err(JsonApiError::new(
            StatusCode::BAD_REQUEST,
            "Request body must be valid JSON",
            Some(e.to_string()),
        )),
    }
}

/// `quantity` as an integer > 0. Numeric strings are accepted, as form bodies carry every field as a string.
pub fn quantity(body: &Map<String, Value>) -> Result<i64, JsonApiError> {
    let parsed = match body.get("quantity") {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    match parsed {
        Some(q) if q > 0 => Ok(q),
        Some(_) => Err(JsonApiError::bad_request("Quantity must be greater than 0")),
        None => Err(JsonApiError::bad_request("A valid quantity must be provided")),
    }
}
