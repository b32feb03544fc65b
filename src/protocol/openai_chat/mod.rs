pub mod encoder;
pub mod response_decoder;
pub mod stream;

use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::protocol::canonical::{ErrorBody, Message, StreamChunk, Tool, ToolChoice};

/// `OpenAI` Chat Completion request wire type.
///
/// Borrows every field from the caller's canonical request so `stream` can
/// be forced without copying or mutating it.
#[derive(Debug, Clone, Serialize)]
pub struct OpenAiChatRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [Message],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n: Option<u32>,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    pub stop: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<&'a serde_json::Value>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub stream: bool,
    #[serde(skip_serializing_if = "<[Tool]>::is_empty")]
    pub tools: &'a [Tool],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<&'a ToolChoice>,
}

/// `{"error": {...}}` envelope used by non-2xx bodies.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiErrorEnvelope {
    #[serde(default)]
    pub error: Option<ErrorBody>,
}

/// A streamed `data:` payload: a chunk that may instead carry an error.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiStreamPayload {
    #[serde(flatten)]
    pub chunk: StreamChunk,
    #[serde(default)]
    pub error: Option<ErrorBody>,
}

/// Convert a vendor error object into the uniform [`ApiError`].
#[must_use]
pub fn api_error_from_body(status_code: u16, body: ErrorBody) -> ApiError {
    ApiError {
        status_code,
        code: body.code,
        message: body.message,
        error_type: body.error_type,
        source: None,
    }
}

/// Build an [`ApiError`] from a non-2xx response body.
///
/// Falls back to the raw body text when the error envelope is missing.
#[must_use]
pub fn decode_openai_error_body(status_code: u16, body: &[u8]) -> ApiError {
    match serde_json::from_slice::<OpenAiErrorEnvelope>(body) {
        Ok(OpenAiErrorEnvelope { error: Some(error) }) => api_error_from_body(status_code, error),
        _ => ApiError::new(status_code, String::from_utf8_lossy(body)),
    }
}
