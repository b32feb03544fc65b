use serde::Deserialize;

use crate::error::ClientError;
use crate::protocol::anthropic::{AnthropicErrorEnvelope, AnthropicUsage};
use crate::protocol::canonical::{
    FinishReason, FunctionCall, Message, StreamChoice, StreamChunk, ToolCall, TOOL_TYPE_FUNCTION,
};
use crate::protocol::mapping::{anthropic_stop_to_finish_reason, anthropic_usage_to_canonical};
use crate::stream::{check_delta_index, Decoded, SseLine, StreamDecoder};

#[derive(Debug, Deserialize)]
struct MessageStartEvent {
    message: MessageStartBody,
}

#[derive(Debug, Deserialize)]
struct MessageStartBody {
    #[serde(default)]
    id: String,
    #[serde(default)]
    model: String,
    #[serde(default)]
    usage: AnthropicUsage,
}

#[derive(Debug, Deserialize)]
struct ContentBlockStartEvent {
    index: usize,
    content_block: StartedBlock,
}

#[derive(Debug, Deserialize)]
struct StartedBlock {
    #[serde(rename = "type")]
    type_: String,
    #[serde(default)]
    id: String,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct ContentBlockDeltaEvent {
    index: usize,
    delta: BlockDelta,
}

#[derive(Debug, Deserialize)]
struct BlockDelta {
    #[serde(rename = "type")]
    type_: String,
    #[serde(default)]
    text: String,
    #[serde(default)]
    partial_json: String,
}

#[derive(Debug, Deserialize)]
struct MessageDeltaEvent {
    #[serde(default)]
    delta: MessageDeltaBody,
    #[serde(default)]
    usage: Option<AnthropicUsage>,
}

#[derive(Debug, Default, Deserialize)]
struct MessageDeltaBody {
    #[serde(default)]
    stop_reason: Option<String>,
}

fn parse<'a, T: Deserialize<'a>>(context: &'static str, data: &'a str) -> Result<T, ClientError> {
    serde_json::from_str(data).map_err(|e| ClientError::decode(context, e))
}

/// State machine for Anthropic named-event streams.
///
/// Pairs each `event:` line with the next `data:` line, captures message
/// identity from `message_start`, and maps content blocks onto canonical
/// deltas. Tool calls keep the content block index they arrived on.
#[derive(Debug, Default)]
pub struct AnthropicStreamDecoder {
    message_id: String,
    model: String,
    input_tokens: u64,
    pending_event: Option<String>,
}

impl AnthropicStreamDecoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn message_id(&self) -> &str {
        &self.message_id
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    fn chunk(&self, delta: Message, finish_reason: Option<FinishReason>) -> StreamChunk {
        StreamChunk {
            id: self.message_id.clone(),
            object: "chat.completion.chunk".to_string(),
            created: 0,
            model: self.model.clone(),
            choices: vec![StreamChoice {
                index: 0,
                delta,
                finish_reason,
            }],
            usage: None,
        }
    }

    fn dispatch(&mut self, event: &str, data: &str) -> Result<Decoded, ClientError> {
        match event {
            "message_start" => {
                let start: MessageStartEvent = parse("message_start", data)?;
                self.message_id = start.message.id;
                self.model = start.message.model;
                self.input_tokens = start.message.usage.input_tokens;
                Ok(Decoded::Pending)
            }
            "content_block_start" => {
                let start: ContentBlockStartEvent = parse("content_block_start", data)?;
                match start.content_block.type_.as_str() {
                    "tool_use" => {
                        let call = ToolCall {
                            index: check_delta_index("content_block_start", start.index)?,
                            id: Some(start.content_block.id),
                            kind: Some(TOOL_TYPE_FUNCTION.to_string()),
                            function: FunctionCall {
                                name: start.content_block.name,
                                arguments: String::new(),
                            },
                        };
                        let delta = Message {
                            tool_calls: vec![call],
                            ..Message::default()
                        };
                        Ok(Decoded::Chunk(self.chunk(delta, None)))
                    }
                    _ => Ok(Decoded::Pending),
                }
            }
            "content_block_delta" => {
                let event: ContentBlockDeltaEvent = parse("content_block_delta", data)?;
                match event.delta.type_.as_str() {
                    "text_delta" => Ok(Decoded::Chunk(
                        self.chunk(Message::assistant(event.delta.text), None),
                    )),
                    "input_json_delta" => {
                        let call = ToolCall {
                            index: check_delta_index("content_block_delta", event.index)?,
                            function: FunctionCall {
                                name: String::new(),
                                arguments: event.delta.partial_json,
                            },
                            ..ToolCall::default()
                        };
                        let delta = Message {
                            tool_calls: vec![call],
                            ..Message::default()
                        };
                        Ok(Decoded::Chunk(self.chunk(delta, None)))
                    }
                    other => {
                        tracing::debug!(delta_type = other, "ignoring anthropic block delta");
                        Ok(Decoded::Pending)
                    }
                }
            }
            "message_delta" => {
                let event: MessageDeltaEvent = parse("message_delta", data)?;
                let finish_reason = event
                    .delta
                    .stop_reason
                    .as_deref()
                    .map(anthropic_stop_to_finish_reason);
                let mut chunk = self.chunk(Message::default(), finish_reason);
                chunk.usage = event.usage.map(|usage| {
                    anthropic_usage_to_canonical(self.input_tokens, usage.output_tokens)
                });
                Ok(Decoded::Chunk(chunk))
            }
            "message_stop" => {
                tracing::debug!(message_id = %self.message_id, "anthropic stream done");
                Ok(Decoded::Done)
            }
            "error" => {
                let envelope: AnthropicErrorEnvelope = parse("stream error", data)?;
                tracing::warn!(
                    error_type = %envelope.error.type_,
                    "anthropic stream reported an error"
                );
                Err(envelope.error.into_api_error(0).into())
            }
            "ping" | "content_block_stop" => Ok(Decoded::Pending),
            other => {
                tracing::debug!(event = other, "ignoring unknown anthropic event");
                Ok(Decoded::Pending)
            }
        }
    }
}

impl StreamDecoder for AnthropicStreamDecoder {
    fn decode_line(&mut self, line: &SseLine) -> Result<Decoded, ClientError> {
        if line.is_event() {
            if let Some(dropped) = self.pending_event.replace(line.value.clone()) {
                tracing::debug!(event = %dropped, "anthropic event without data dropped");
            }
            return Ok(Decoded::Pending);
        }
        let Some(event) = self.pending_event.take() else {
            return Ok(Decoded::Pending);
        };
        if !line.is_data() {
            tracing::debug!(
                event = %event,
                field = %line.field,
                "anthropic event without data dropped"
            );
            return Ok(Decoded::Pending);
        }
        self.dispatch(&event, &line.value)
    }
}
