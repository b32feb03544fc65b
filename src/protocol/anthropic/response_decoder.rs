use crate::error::ClientError;
use crate::protocol::anthropic::AnthropicResponse;
use crate::protocol::canonical::{
    ChatResponse, Choice, Content, FunctionCall, Message, Role, ToolCall, TOOL_TYPE_FUNCTION,
};
use crate::protocol::mapping::{anthropic_stop_to_finish_reason, anthropic_usage_to_canonical};

/// Decode an Anthropic Messages API body into the canonical response.
///
/// # Errors
///
/// Returns [`ClientError::Decode`] when the body is not a valid response.
pub fn decode_anthropic_response(body: &[u8]) -> Result<ChatResponse, ClientError> {
    let resp: AnthropicResponse =
        serde_json::from_slice(body).map_err(|e| ClientError::decode("response", e))?;
    Ok(from_anthropic_response(resp))
}

/// Convert a decoded Anthropic response into the canonical response.
///
/// Text blocks are joined with `\n`; each `tool_use` block becomes a tool
/// call indexed by its position among tool-use blocks, with `input`
/// reproduced verbatim as the arguments.
#[must_use]
pub fn from_anthropic_response(resp: AnthropicResponse) -> ChatResponse {
    let mut texts: Vec<String> = Vec::new();
    let mut tool_calls: Vec<ToolCall> = Vec::new();

    for block in resp.content {
        match block.type_.as_str() {
            "text" => texts.push(block.text.unwrap_or_default()),
            "tool_use" => {
                let index = tool_calls.len();
                tool_calls.push(ToolCall {
                    index,
                    id: block.id,
                    kind: Some(TOOL_TYPE_FUNCTION.to_string()),
                    function: FunctionCall {
                        name: block.name.unwrap_or_default(),
                        arguments: block
                            .input
                            .map(|raw| raw.get().to_string())
                            .unwrap_or_default(),
                    },
                });
            }
            other => tracing::debug!(block_type = other, "skipping anthropic content block"),
        }
    }

    ChatResponse {
        id: resp.id,
        object: "chat.completion".to_string(),
        created: 0,
        model: resp.model,
        choices: vec![Choice {
            index: 0,
            message: Message {
                role: Role::Assistant,
                content: Content::Text(texts.join("\n")),
                tool_call_id: None,
                tool_calls,
            },
            finish_reason: resp
                .stop_reason
                .as_deref()
                .map(anthropic_stop_to_finish_reason),
        }],
        usage: anthropic_usage_to_canonical(resp.usage.input_tokens, resp.usage.output_tokens),
        error: None,
    }
}
