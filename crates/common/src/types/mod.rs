use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// Success wrapper used by every API response.
///
/// Serialized as `{"status":"success","message":...,"payload":...}`;
/// `message` is omitted when absent.
#[derive(Serialize, Debug)]
pub struct Envelope<T> {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub payload: T,
}

impl<T> Envelope<T> {
    pub fn success(payload: T) -> Self {
        Self { status: "success", message: None, payload }
    }

    pub fn with_message(message: impl Into<String>, payload: T) -> Self {
        Self { status: "success", message: Some(message.into()), payload }
    }
}

/// Error wrapper: `{"status":"error","message":...,"error"?:...,"path"?:...}`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ErrorEnvelope {
    pub status: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ErrorEnvelope {
    pub fn new(message: impl Into<String>) -> Self {
        Self { status: "error".into(), message: message.into(), error: None, path: None }
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_envelope_skips_missing_message() {
        let v = serde_json::to_value(Envelope::success(vec![1, 2])).unwrap();
        assert_eq!(v, json!({"status": "success", "payload": [1, 2]}));
    }

    #[test]
    fn error_envelope_shape() {
        let v = serde_json::to_value(ErrorEnvelope::new("nope").with_error("detail")).unwrap();
        assert_eq!(v, json!({"status": "error", "message": "nope", "error": "detail"}));
    }
}
