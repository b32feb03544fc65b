use std::borrow::Cow;

use serde_json::value::RawValue;

use crate::error::ClientError;
use crate::protocol::anthropic::{
    AnthropicContent, AnthropicContentBlock, AnthropicImageSource, AnthropicMessage,
    AnthropicRequest, AnthropicTool, AnthropicToolChoice, DEFAULT_MAX_TOKENS,
};
use crate::protocol::canonical::{
    ChatRequest, Content, ContentPart, Message, Role, Tool, ToolChoice,
};
use crate::protocol::mapping::canonical_role_to_anthropic;

/// Translate a canonical request into the Anthropic Messages API wire format.
///
/// System messages are lifted into the top-level `system` string, tool
/// results become `tool_result` blocks in user turns, and assistant tool
/// calls become `tool_use` blocks.
///
/// # Errors
///
/// Returns [`ClientError::Translation`] when an assistant tool call carries
/// arguments that are not valid JSON.
pub fn to_anthropic_request(
    canonical: &ChatRequest,
    stream: bool,
) -> Result<AnthropicRequest, ClientError> {
    // --- system + messages ---
    let mut system_parts: Vec<Cow<'_, str>> = Vec::new();
    let mut messages = Vec::with_capacity(canonical.messages.len());
    for msg in &canonical.messages {
        match msg.role {
            Role::System => system_parts.push(msg.content.text()),
            Role::Tool => messages.push(encode_tool_result(msg)),
            Role::Assistant if !msg.tool_calls.is_empty() => {
                messages.push(encode_assistant_tool_calls(msg)?);
            }
            Role::User | Role::Assistant => messages.push(encode_message(msg)),
        }
    }
    let system = (!system_parts.is_empty()).then(|| system_parts.join("\n"));

    // --- tool_choice ---
    let tool_choice = canonical.tool_choice.as_ref().and_then(encode_tool_choice);
    if canonical.tool_choice.is_some() && tool_choice.is_none() {
        tracing::debug!(
            tool_choice = ?canonical.tool_choice,
            "tool_choice has no anthropic equivalent, omitting"
        );
    }

    Ok(AnthropicRequest {
        model: canonical.model.clone(),
        messages,
        system,
        max_tokens: canonical
            .max_tokens
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_MAX_TOKENS),
        temperature: canonical.temperature,
        top_p: canonical.top_p,
        stop_sequences: canonical.stop.clone(),
        stream,
        tools: canonical.tools.iter().map(encode_tool).collect(),
        tool_choice,
    })
}

/// Encode a canonical request into an Anthropic Messages JSON body.
///
/// # Errors
///
/// Returns [`ClientError::Translation`] for untranslatable requests or
/// [`ClientError::Encode`] when serialization fails.
pub fn encode_anthropic_request(
    canonical: &ChatRequest,
    stream: bool,
) -> Result<Vec<u8>, ClientError> {
    let request = to_anthropic_request(canonical, stream)?;
    serde_json::to_vec(&request).map_err(ClientError::Encode)
}

fn encode_tool_result(msg: &Message) -> AnthropicMessage {
    AnthropicMessage {
        role: canonical_role_to_anthropic(Role::Tool),
        content: AnthropicContent::Blocks(vec![AnthropicContentBlock {
            type_: "tool_result".to_string(),
            tool_use_id: Some(msg.tool_call_id.clone().unwrap_or_default()),
            content: Some(serde_json::Value::String(msg.content.text().into_owned())),
            ..AnthropicContentBlock::default()
        }]),
    }
}

fn encode_assistant_tool_calls(msg: &Message) -> Result<AnthropicMessage, ClientError> {
    let mut blocks = Vec::with_capacity(msg.tool_calls.len() + 1);
    let text = msg.content.text();
    if !text.is_empty() {
        blocks.push(AnthropicContentBlock::text(text));
    }
    for call in &msg.tool_calls {
        let arguments = call.function.arguments.trim();
        let arguments = if arguments.is_empty() { "{}" } else { arguments };
        let input = RawValue::from_string(arguments.to_string()).map_err(|e| {
            ClientError::Translation(format!(
                "tool call '{}' arguments are not valid JSON: {e}",
                call.function.name
            ))
        })?;
        blocks.push(AnthropicContentBlock {
            type_: "tool_use".to_string(),
            id: Some(call.id.clone().unwrap_or_default()),
            name: Some(call.function.name.clone()),
            input: Some(input),
            ..AnthropicContentBlock::default()
        });
    }
    Ok(AnthropicMessage {
        role: canonical_role_to_anthropic(Role::Assistant),
        content: AnthropicContent::Blocks(blocks),
    })
}

fn encode_message(msg: &Message) -> AnthropicMessage {
    let content = match &msg.content {
        Content::Text(text) => AnthropicContent::Text(text.clone()),
        Content::Parts(parts)
            if parts
                .iter()
                .any(|part| matches!(part, ContentPart::ImageUrl { .. })) =>
        {
            AnthropicContent::Blocks(parts.iter().filter_map(encode_part).collect())
        }
        Content::Parts(_) => AnthropicContent::Text(msg.content.text().into_owned()),
    };
    AnthropicMessage {
        role: canonical_role_to_anthropic(msg.role),
        content,
    }
}

fn encode_part(part: &ContentPart) -> Option<AnthropicContentBlock> {
    match part {
        ContentPart::Text { text } => Some(AnthropicContentBlock::text(text.clone())),
        ContentPart::ImageUrl { image_url } => Some(AnthropicContentBlock {
            type_: "image".to_string(),
            source: Some(encode_image_source(&image_url.url)),
            ..AnthropicContentBlock::default()
        }),
        ContentPart::Unsupported => None,
    }
}

/// `data:<media>;base64,<payload>` becomes an inline source; anything else a URL source.
fn encode_image_source(url: &str) -> AnthropicImageSource {
    if let Some((meta, data)) = url.strip_prefix("data:").and_then(|rest| rest.split_once(',')) {
        if let Some(media_type) = meta.strip_suffix(";base64") {
            return AnthropicImageSource {
                type_: "base64".to_string(),
                media_type: Some(media_type.to_string()),
                data: Some(data.to_string()),
                url: None,
            };
        }
    }
    AnthropicImageSource {
        type_: "url".to_string(),
        media_type: None,
        data: None,
        url: Some(url.to_string()),
    }
}

fn encode_tool(tool: &Tool) -> AnthropicTool {
    AnthropicTool {
        name: tool.function.name.clone(),
        description: tool.function.description.clone(),
        input_schema: tool
            .function
            .parameters
            .clone()
            .unwrap_or_else(|| serde_json::json!({"type": "object"})),
    }
}

/// `auto` → auto, `required` → any, a named function → tool. Everything
/// else, `none` included, has no equivalent and yields no policy.
fn encode_tool_choice(choice: &ToolChoice) -> Option<AnthropicToolChoice> {
    let policy = |type_: &str, name: Option<String>| AnthropicToolChoice {
        type_: type_.to_string(),
        name,
    };
    match choice {
        ToolChoice::Mode(mode) => match mode.as_str() {
            "auto" => Some(policy("auto", None)),
            "required" => Some(policy("any", None)),
            _ => None,
        },
        ToolChoice::Function(selector) if !selector.function.name.is_empty() => {
            Some(policy("tool", Some(selector.function.name.clone())))
        }
        ToolChoice::Function(_) | ToolChoice::Other(_) => None,
    }
}
