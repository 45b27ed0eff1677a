use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::collections::HashMap;

/// Incoming HTTP-style event, shaped like an API Gateway proxy request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestEvent {
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub query_string_parameters: Option<HashMap<String, String>>,
    #[serde(default)]
    pub is_base64_encoded: Option<bool>,
}

impl RequestEvent {
    pub fn new(body: impl Into<String>, query: &[(&str, &str)]) -> Self {
        let params = query
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        Self {
            body: Some(body.into()),
            query_string_parameters: Some(params),
            is_base64_encoded: None,
        }
    }

    /// Look up a query string parameter
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query_string_parameters
            .as_ref()
            .and_then(|params| params.get(name))
            .map(String::as_str)
    }

    /// Raw body text, base64-decoded when the event says so.
    /// A missing body reads as an empty JSON object.
    pub fn body_text(&self) -> Result<Cow<'_, str>, BodyDecodeError> {
        let raw = match self.body.as_deref() {
            Some(body) if !body.is_empty() => body,
            _ => return Ok(Cow::Borrowed("{}")),
        };

        if !self.is_base64_encoded.unwrap_or(false) {
            return Ok(Cow::Borrowed(raw));
        }

        let bytes = STANDARD.decode(raw)?;
        let text = String::from_utf8(bytes)?;
        Ok(Cow::Owned(text))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BodyDecodeError {
    #[error("body is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("decoded body is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Result returned to the caller: a status code and a `{"message": ...}` body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub status_code: u16,
    pub body: String,
}

impl Response {
    pub fn with_message(status_code: u16, message: &str) -> Self {
        // Value's Display emits a quoted, escaped JSON string
        let body = format!("{{\"message\": {}}}", Value::String(message.to_string()));
        Self { status_code, body }
    }

    pub fn ok(message: &str) -> Self {
        Self::with_message(200, message)
    }

    /// The `message` field of the body, if the body has one
    pub fn message(&self) -> Option<String> {
        let value: Value = serde_json::from_str(&self.body).ok()?;
        value.get("message")?.as_str().map(str::to_string)
    }
}
