use crate::error::ClientError;
use crate::protocol::canonical::ChatRequest;

use super::OpenAiChatRequest;

/// Project a canonical request onto the `OpenAI` Chat Completions wire shape.
///
/// Every field passes through; `stream` is set from the call variant and the
/// caller's own `stream` value is ignored.
#[must_use]
pub fn to_openai_chat_request(canonical: &ChatRequest, stream: bool) -> OpenAiChatRequest<'_> {
    OpenAiChatRequest {
        model: &canonical.model,
        messages: &canonical.messages,
        temperature: canonical.temperature,
        max_tokens: canonical.max_tokens,
        top_p: canonical.top_p,
        n: canonical.n,
        stop: &canonical.stop,
        frequency_penalty: canonical.frequency_penalty,
        presence_penalty: canonical.presence_penalty,
        seed: canonical.seed,
        user: canonical.user.as_deref(),
        response_format: canonical.response_format.as_ref(),
        stream,
        tools: &canonical.tools,
        tool_choice: canonical.tool_choice.as_ref(),
    }
}

/// Encode a canonical request into an `OpenAI` Chat Completions JSON body.
///
/// # Errors
///
/// Returns [`ClientError::Encode`] when serialization fails.
pub fn encode_openai_chat_request(
    canonical: &ChatRequest,
    stream: bool,
) -> Result<Vec<u8>, ClientError> {
    serde_json::to_vec(&to_openai_chat_request(canonical, stream)).map_err(ClientError::Encode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::canonical::{Message, Tool, ToolChoice};
    use serde_json::{json, Value};

    fn encode(req: &ChatRequest, stream: bool) -> Value {
        serde_json::from_slice(&encode_openai_chat_request(req, stream).unwrap()).unwrap()
    }

    #[test]
    fn test_stream_forced_by_variant() {
        let req = ChatRequest {
            stream: true,
            ..ChatRequest::new("gpt-4o", vec![Message::user("hi")])
        };
        let body = encode(&req, false);
        assert!(body.get("stream").is_none());
        assert!(req.stream, "caller request must not be mutated");

        let req = ChatRequest::new("gpt-4o", vec![Message::user("hi")]);
        assert_eq!(encode(&req, true)["stream"], json!(true));
    }

    #[test]
    fn test_fields_pass_through() {
        let req = ChatRequest {
            temperature: Some(0.5),
            max_tokens: Some(64),
            top_p: Some(0.9),
            n: Some(2),
            stop: vec!["\n\n".into()],
            frequency_penalty: Some(0.1),
            presence_penalty: Some(0.2),
            seed: Some(42),
            user: Some("u-1".into()),
            response_format: Some(json!({"type": "json_object"})),
            tools: vec![Tool::function("f", "does f", json!({"type": "object"}))],
            tool_choice: Some(ToolChoice::required()),
            ..ChatRequest::new(
                "gpt-4o",
                vec![Message::system("sys"), Message::user("hi"), Message::tool("call_1", "42")],
            )
        };
        let body = encode(&req, false);
        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["temperature"], json!(0.5));
        assert_eq!(body["max_tokens"], json!(64));
        assert_eq!(body["n"], json!(2));
        assert_eq!(body["stop"], json!(["\n\n"]));
        assert_eq!(body["seed"], json!(42));
        assert_eq!(body["user"], "u-1");
        assert_eq!(body["response_format"]["type"], "json_object");
        assert_eq!(body["tools"][0]["function"]["name"], "f");
        assert_eq!(body["tool_choice"], "required");
        assert_eq!(body["messages"][2]["role"], "tool");
        assert_eq!(body["messages"][2]["tool_call_id"], "call_1");
    }

    #[test]
    fn test_unset_fields_omitted() {
        let req = ChatRequest::new("gpt-4o", vec![Message::user("hi")]);
        let body = encode(&req, false);
        let keys: Vec<&str> = body.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys.len(), 2);
        assert!(keys.contains(&"model"));
        assert!(keys.contains(&"messages"));
    }
}
