pub mod encoder;
pub mod response_decoder;
pub mod stream;

use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use crate::error::ApiError;

/// Protocol version sent in the `anthropic-version` header.
pub const ANTHROPIC_API_VERSION: &str = "2023-06-01";

/// Endpoint used when no base URL is configured.
pub const ANTHROPIC_DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

/// `max_tokens` is mandatory for this vendor.
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Anthropic Messages API request wire type.
#[derive(Debug, Clone, Serialize)]
pub struct AnthropicRequest {
    pub model: String,
    pub messages: Vec<AnthropicMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub stop_sequences: Vec<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub stream: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<AnthropicTool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<AnthropicToolChoice>,
}

/// Anthropic message wire type.
#[derive(Debug, Clone, Serialize)]
pub struct AnthropicMessage {
    pub role: &'static str,
    pub content: AnthropicContent,
}

/// Message content: a bare string or a list of typed blocks.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum AnthropicContent {
    Text(String),
    Blocks(Vec<AnthropicContentBlock>),
}

/// A content block, in requests and responses alike.
///
/// Kept flat rather than as a tagged enum: `input` is a [`RawValue`], which
/// only deserializes outside internally tagged enums.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnthropicContentBlock {
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<Box<RawValue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_use_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<AnthropicImageSource>,
}

impl AnthropicContentBlock {
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            type_: "text".to_string(),
            text: Some(text.into()),
            ..Self::default()
        }
    }
}

/// Image source: inline base64 data or a remote URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnthropicImageSource {
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Anthropic tool definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnthropicTool {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub input_schema: serde_json::Value,
}

/// `tool_choice` policy: `auto`, `any`, or `tool` with a name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnthropicToolChoice {
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Anthropic Messages API response wire type.
#[derive(Debug, Clone, Deserialize)]
pub struct AnthropicResponse {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type", default)]
    pub type_: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub content: Vec<AnthropicContentBlock>,
    #[serde(default)]
    pub stop_reason: Option<String>,
    #[serde(default)]
    pub stop_sequence: Option<String>,
    #[serde(default)]
    pub usage: AnthropicUsage,
}

/// Anthropic usage.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct AnthropicUsage {
    #[serde(default)]
    pub input_tokens: u64,
    #[serde(default)]
    pub output_tokens: u64,
}

/// `{"type":"error","error":{"type":...,"message":...}}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnthropicErrorEnvelope {
    #[serde(rename = "type", default)]
    pub type_: String,
    #[serde(default)]
    pub error: AnthropicErrorBody,
}

/// Error body, in HTTP error responses and `error` stream events.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnthropicErrorBody {
    #[serde(rename = "type", default)]
    pub type_: String,
    #[serde(default)]
    pub message: String,
}

impl AnthropicErrorBody {
    #[must_use]
    pub fn into_api_error(self, status_code: u16) -> ApiError {
        ApiError {
            status_code,
            error_type: self.type_,
            message: self.message,
            ..ApiError::default()
        }
    }
}

/// Build an [`ApiError`] from a non-2xx response body.
///
/// An envelope without a message falls back to the raw body text.
#[must_use]
pub fn decode_anthropic_error_body(status_code: u16, body: &[u8]) -> ApiError {
    match serde_json::from_slice::<AnthropicErrorEnvelope>(body) {
        Ok(envelope) if !envelope.error.message.is_empty() => {
            envelope.error.into_api_error(status_code)
        }
        _ => ApiError::new(status_code, String::from_utf8_lossy(body)),
    }
}
