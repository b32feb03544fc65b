use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Which vendor wire protocol a call speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// `/chat/completions`, bearer auth, `data:`-only SSE terminated by `[DONE]`.
    OpenAi,
    /// `/v1/messages`, `x-api-key` auth, named SSE events terminated by `message_stop`.
    Anthropic,
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::OpenAi => f.write_str("openai"),
            Dialect::Anthropic => f.write_str("anthropic"),
        }
    }
}

/// Canonical message role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    // Streamed deltas usually omit the role; only the assistant streams.
    #[default]
    Assistant,
    Tool,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
        }
    }
}

/// Reason the model stopped generating.
///
/// Unrecognized vendor strings are kept verbatim in [`FinishReason::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FinishReason {
    Stop,
    Length,
    ToolCalls,
    Other(String),
}

impl FinishReason {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            FinishReason::Stop => "stop",
            FinishReason::Length => "length",
            FinishReason::ToolCalls => "tool_calls",
            FinishReason::Other(other) => other,
        }
    }
}

impl From<&str> for FinishReason {
    fn from(s: &str) -> Self {
        match s {
            "stop" => FinishReason::Stop,
            "length" => FinishReason::Length,
            "tool_calls" => FinishReason::ToolCalls,
            other => FinishReason::Other(other.to_string()),
        }
    }
}

impl fmt::Display for FinishReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FinishReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FinishReason {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Cow::<'de, str>::deserialize(deserializer)?;
        Ok(FinishReason::from(raw.as_ref()))
    }
}

/// Message content: either plain text or an ordered list of typed parts.
///
/// Serialized as a JSON string or a JSON array respectively; `null` reads
/// back as empty text.
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Text(String),
    Parts(Vec<ContentPart>),
}

impl Default for Content {
    fn default() -> Self {
        Content::Text(String::new())
    }
}

impl Content {
    #[must_use]
    pub fn text_content(text: impl Into<String>) -> Self {
        Content::Text(text.into())
    }

    #[must_use]
    pub fn parts(parts: Vec<ContentPart>) -> Self {
        Content::Parts(parts)
    }

    /// The textual view of this content.
    ///
    /// For parts, the concatenation in order of every text part; other
    /// parts contribute nothing.
    #[must_use]
    pub fn text(&self) -> Cow<'_, str> {
        match self {
            Content::Text(text) => Cow::Borrowed(text),
            Content::Parts(parts) => {
                let mut out = String::new();
                for part in parts {
                    if let ContentPart::Text { text } = part {
                        out.push_str(text);
                    }
                }
                Cow::Owned(out)
            }
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Content::Text(text) => text.is_empty(),
            Content::Parts(parts) => parts.is_empty(),
        }
    }

    /// Append text; on parts content it extends the trailing text part.
    pub fn push_str(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        match self {
            Content::Text(existing) => existing.push_str(text),
            Content::Parts(parts) => match parts.last_mut() {
                Some(ContentPart::Text { text: existing }) => existing.push_str(text),
                _ => parts.push(ContentPart::Text {
                    text: text.to_string(),
                }),
            },
        }
    }
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Content::Text(text.to_string())
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Content::Text(text)
    }
}

impl Serialize for Content {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Content::Text(text) => serializer.serialize_str(text),
            Content::Parts(parts) => parts.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Content {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum ContentWire {
            Text(String),
            Parts(Vec<ContentPart>),
        }

        Ok(match Option::<ContentWire>::deserialize(deserializer)? {
            None => Content::default(),
            Some(ContentWire::Text(text)) => Content::Text(text),
            Some(ContentWire::Parts(parts)) => Content::Parts(parts),
        })
    }
}

/// A single typed part of multimodal content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
    #[serde(other)]
    Unsupported,
}

impl ContentPart {
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::Text { text: text.into() }
    }

    #[must_use]
    pub fn image_url(url: impl Into<String>) -> Self {
        ContentPart::ImageUrl {
            image_url: ImageUrl {
                url: url.into(),
                detail: None,
            },
        }
    }
}

/// Image reference inside a content part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// A chat message. Also used as the partial delta inside stream chunks.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Message {
    #[serde(default, deserialize_with = "role_or_default")]
    pub role: Role,
    #[serde(default)]
    pub content: Content,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
}

impl Message {
    #[must_use]
    pub fn new(role: Role, content: impl Into<Content>) -> Self {
        Self {
            role,
            content: content.into(),
            tool_call_id: None,
            tool_calls: Vec::new(),
        }
    }

    #[must_use]
    pub fn system(content: impl Into<Content>) -> Self {
        Self::new(Role::System, content)
    }

    #[must_use]
    pub fn user(content: impl Into<Content>) -> Self {
        Self::new(Role::User, content)
    }

    #[must_use]
    pub fn assistant(content: impl Into<Content>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// A tool result answering the tool call `tool_call_id`.
    #[must_use]
    pub fn tool(tool_call_id: impl Into<String>, content: impl Into<Content>) -> Self {
        Self {
            tool_call_id: Some(tool_call_id.into()),
            ..Self::new(Role::Tool, content)
        }
    }
}

/// A function invocation issued by the assistant.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ToolCall {
    #[serde(default)]
    pub index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default)]
    pub function: FunctionCall,
}

impl ToolCall {
    #[must_use]
    pub fn function(
        index: usize,
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        Self {
            index,
            id: Some(id.into()),
            kind: Some(TOOL_TYPE_FUNCTION.to_string()),
            function: FunctionCall {
                name: name.into(),
                arguments: arguments.into(),
            },
        }
    }
}

pub(crate) const TOOL_TYPE_FUNCTION: &str = "function";

/// Function name plus the raw JSON argument text.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FunctionCall {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub arguments: String,
}

/// A tool definition offered to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    #[serde(rename = "type")]
    pub kind: String,
    pub function: FunctionDefinition,
}

impl Tool {
    #[must_use]
    pub fn function(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: serde_json::Value,
    ) -> Self {
        Self {
            kind: TOOL_TYPE_FUNCTION.to_string(),
            function: FunctionDefinition {
                name: name.into(),
                description: Some(description.into()),
                parameters: Some(parameters),
            },
        }
    }
}

/// Function declaration within a tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<serde_json::Value>,
}

/// Tool-choice policy as the caller wrote it.
///
/// `Other` keeps any shape that is neither a mode string nor a function
/// selector, so it survives a round trip untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolChoice {
    Mode(String),
    Function(ToolChoiceFunction),
    Other(serde_json::Value),
}

impl ToolChoice {
    #[must_use]
    pub fn auto() -> Self {
        ToolChoice::Mode("auto".into())
    }

    #[must_use]
    pub fn none() -> Self {
        ToolChoice::Mode("none".into())
    }

    #[must_use]
    pub fn required() -> Self {
        ToolChoice::Mode("required".into())
    }

    #[must_use]
    pub fn function(name: impl Into<String>) -> Self {
        ToolChoice::Function(ToolChoiceFunction {
            kind: TOOL_TYPE_FUNCTION.to_string(),
            function: FunctionName { name: name.into() },
        })
    }
}

/// `{"type":"function","function":{"name":...}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolChoiceFunction {
    #[serde(rename = "type", default = "default_tool_type")]
    pub kind: String,
    pub function: FunctionName,
}

fn default_tool_type() -> String {
    TOOL_TYPE_FUNCTION.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionName {
    pub name: String,
}

/// The canonical chat request.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stop: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_format: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub stream: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Tool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<ToolChoice>,
}

impl ChatRequest {
    #[must_use]
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            ..Self::default()
        }
    }
}

/// Token usage. `total_tokens` is always prompt + completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
    #[serde(default)]
    pub total_tokens: u64,
}

impl Usage {
    #[must_use]
    pub fn new(prompt_tokens: u64, completion_tokens: u64) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens.saturating_add(completion_tokens),
        }
    }
}

/// One completion choice.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub index: usize,
    #[serde(default)]
    pub message: Message,
    #[serde(default)]
    pub finish_reason: Option<FinishReason>,
}

/// The canonical non-streaming response.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub object: String,
    #[serde(default)]
    pub created: i64,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Usage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl ChatResponse {
    /// The first choice's message, which is the whole answer when `n` is unset.
    #[must_use]
    pub fn message(&self) -> Option<&Message> {
        self.choices.first().map(|choice| &choice.message)
    }
}

/// One increment of a streamed response.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StreamChunk {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub object: String,
    #[serde(default)]
    pub created: i64,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub choices: Vec<StreamChoice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

/// A per-choice delta. `finish_reason` is set only on the terminal increment.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StreamChoice {
    #[serde(default)]
    pub index: usize,
    #[serde(default)]
    pub delta: Message,
    #[serde(default)]
    pub finish_reason: Option<FinishReason>,
}

/// Vendor error object embedded in OpenAI-style bodies.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default, deserialize_with = "lenient_string")]
    pub code: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub message: String,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "String::is_empty"
    )]
    pub param: String,
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    pub error_type: String,
}

// Deltas may carry `"role": null` or an empty role.
fn role_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Role, D::Error> {
    let raw = Option::<Cow<'de, str>>::deserialize(deserializer)?;
    match raw.as_deref() {
        None | Some("") => Ok(Role::default()),
        Some("system" | "developer") => Ok(Role::System),
        Some("user") => Ok(Role::User),
        Some("assistant") => Ok(Role::Assistant),
        Some("tool") => Ok(Role::Tool),
        Some(other) => Err(serde::de::Error::unknown_variant(
            other,
            &["system", "user", "assistant", "tool"],
        )),
    }
}

// Vendors send `code` as a string, a number or null.
fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_content_text() {
        let content = Content::text_content("hello");
        assert_eq!(content.text(), "hello");
        assert!(matches!(content.text(), Cow::Borrowed(_)));
    }

    #[test]
    fn test_parts_content_text_skips_images() {
        let content = Content::parts(vec![
            ContentPart::text("a"),
            ContentPart::image_url("https://example.com/cat.png"),
            ContentPart::text("b"),
        ]);
        assert_eq!(content.text(), "ab");
    }

    #[test]
    fn test_empty_text_is_distinct_from_empty_parts() {
        assert_ne!(Content::text_content(""), Content::parts(Vec::new()));
        assert_eq!(
            serde_json::to_value(Content::parts(Vec::new())).unwrap(),
            json!([])
        );
        assert_eq!(serde_json::to_value(Content::default()).unwrap(), json!(""));
    }

    #[test]
    fn test_content_deserialize_shapes() {
        let text: Content = serde_json::from_value(json!("hi")).unwrap();
        assert_eq!(text, Content::text_content("hi"));

        let parts: Content = serde_json::from_value(json!([
            {"type": "text", "text": "look"},
            {"type": "image_url", "image_url": {"url": "https://x/y.png", "detail": "low"}}
        ]))
        .unwrap();
        let Content::Parts(parts) = parts else {
            panic!("expected parts");
        };
        assert_eq!(parts.len(), 2);
        assert!(matches!(
            &parts[1],
            ContentPart::ImageUrl { image_url } if image_url.detail.as_deref() == Some("low")
        ));

        let null: Content = serde_json::from_value(json!(null)).unwrap();
        assert_eq!(null, Content::default());
    }

    #[test]
    fn test_unknown_part_type_contributes_nothing() {
        let content: Content = serde_json::from_value(json!([
            {"type": "input_audio", "input_audio": {"data": "..."}},
            {"type": "text", "text": "ok"}
        ]))
        .unwrap();
        assert_eq!(content.text(), "ok");
    }

    #[test]
    fn test_push_str_on_parts_extends_trailing_text() {
        let mut content = Content::parts(vec![ContentPart::text("a")]);
        content.push_str("b");
        assert_eq!(content, Content::parts(vec![ContentPart::text("ab")]));

        let mut content = Content::parts(vec![ContentPart::image_url("u")]);
        content.push_str("c");
        assert_eq!(content.text(), "c");
    }

    #[test]
    fn test_usage_total_saturates() {
        let usage = Usage::new(u64::MAX, 7);
        assert_eq!(usage.total_tokens, u64::MAX);
        assert_eq!(Usage::new(3, 4).total_tokens, 7);
    }

    #[test]
    fn test_finish_reason_passthrough() {
        let reason: FinishReason = serde_json::from_value(json!("content_filter")).unwrap();
        assert_eq!(reason, FinishReason::Other("content_filter".into()));
        assert_eq!(serde_json::to_value(&reason).unwrap(), json!("content_filter"));

        let reason: FinishReason = serde_json::from_value(json!("tool_calls")).unwrap();
        assert_eq!(reason, FinishReason::ToolCalls);
    }

    #[test]
    fn test_message_roundtrip() {
        let msg = Message {
            role: Role::Assistant,
            content: Content::text_content("calling"),
            tool_call_id: None,
            tool_calls: vec![ToolCall::function(0, "call_1", "get_weather", "{\"city\":\"NYC\"}")],
        };
        let json = serde_json::to_string(&msg).unwrap();
        let back: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(back, msg);

        let tool = Message::tool("call_1", "72F");
        let back: Message = serde_json::from_str(&serde_json::to_string(&tool).unwrap()).unwrap();
        assert_eq!(back, tool);
    }

    #[test]
    fn test_request_roundtrip() {
        let req = ChatRequest {
            temperature: Some(0.2),
            max_tokens: Some(128),
            stop: vec!["END".into()],
            seed: Some(7),
            tools: vec![Tool::function(
                "get_weather",
                "Get weather",
                json!({"type": "object"}),
            )],
            tool_choice: Some(ToolChoice::function("get_weather")),
            response_format: Some(json!({"type": "json_object"})),
            ..ChatRequest::new(
                "gpt-4o",
                vec![
                    Message::system("You are helpful."),
                    Message::user(Content::parts(vec![
                        ContentPart::text("what is this?"),
                        ContentPart::image_url("https://example.com/a.png"),
                    ])),
                ],
            )
        };
        let json = serde_json::to_string(&req).unwrap();
        let back: ChatRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, req);
    }

    #[test]
    fn test_request_omits_unset_fields() {
        let req = ChatRequest::new("gpt-4o", vec![Message::user("hi")]);
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(
            value,
            json!({"model": "gpt-4o", "messages": [{"role": "user", "content": "hi"}]})
        );
    }

    #[test]
    fn test_tool_choice_shapes() {
        let mode: ToolChoice = serde_json::from_value(json!("auto")).unwrap();
        assert_eq!(mode, ToolChoice::auto());

        let func: ToolChoice =
            serde_json::from_value(json!({"type": "function", "function": {"name": "f"}}))
                .unwrap();
        assert_eq!(func, ToolChoice::function("f"));

        let other: ToolChoice = serde_json::from_value(json!({"type": "allowed_tools"})).unwrap();
        assert!(matches!(other, ToolChoice::Other(_)));
        assert_eq!(
            serde_json::to_value(&other).unwrap(),
            json!({"type": "allowed_tools"})
        );
    }

    #[test]
    fn test_response_roundtrip() {
        let resp = ChatResponse {
            id: "chatcmpl-1".into(),
            object: "chat.completion".into(),
            created: 1_700_000_000,
            model: "gpt-4o".into(),
            choices: vec![Choice {
                index: 0,
                message: Message::assistant("Hello!"),
                finish_reason: Some(FinishReason::Stop),
            }],
            usage: Usage::new(10, 5),
            error: None,
        };
        let back: ChatResponse =
            serde_json::from_str(&serde_json::to_string(&resp).unwrap()).unwrap();
        assert_eq!(back, resp);
        assert_eq!(back.usage.total_tokens, 15);
    }

    #[test]
    fn test_error_body_lenient_code() {
        let body: ErrorBody = serde_json::from_value(json!({
            "code": 429, "message": "slow", "param": null, "type": "requests"
        }))
        .unwrap();
        assert_eq!(body.code, "429");
        assert_eq!(body.param, "");
        assert_eq!(body.error_type, "requests");
    }

    #[test]
    fn test_lenient_role() {
        let msg: Message = serde_json::from_value(json!({"role": null, "content": "x"})).unwrap();
        assert_eq!(msg.role, Role::Assistant);
        let msg: Message = serde_json::from_value(json!({"role": "developer"})).unwrap();
        assert_eq!(msg.role, Role::System);
        assert!(serde_json::from_value::<Message>(json!({"role": "narrator"})).is_err());
    }

    #[test]
    fn test_delta_without_role_defaults_to_assistant() {
        let delta: Message = serde_json::from_value(json!({"content": "Hel"})).unwrap();
        assert_eq!(delta.role, Role::Assistant);
        assert_eq!(delta.content.text(), "Hel");
    }
}
