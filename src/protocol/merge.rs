//! Delta merge engine.
//!
//! Rebuilds a complete assistant message from streamed deltas so the result
//! equals what the non-streaming call returns for the same turn.

use super::canonical::{ChatResponse, Choice, FinishReason, Message, StreamChunk, ToolCall, Usage};

impl Message {
    /// Fold one streamed delta into this message.
    ///
    /// Text is appended. Each delta tool call is merged into the entry at its
    /// `index`; the list grows with placeholder entries when the index is past
    /// the end.
    pub fn append_delta(&mut self, delta: &Message) {
        self.content.push_str(&delta.content.text());
        for incoming in &delta.tool_calls {
            while self.tool_calls.len() <= incoming.index {
                let index = self.tool_calls.len();
                self.tool_calls.push(ToolCall {
                    index,
                    ..ToolCall::default()
                });
            }
            self.tool_calls[incoming.index].merge(incoming);
        }
    }
}

impl ToolCall {
    /// Field-merge a partial tool call.
    ///
    /// Non-empty `id`, `type` and `name` overwrite; `arguments` always append.
    pub fn merge(&mut self, incoming: &ToolCall) {
        if let Some(id) = incoming.id.as_deref().filter(|id| !id.is_empty()) {
            self.id = Some(id.to_string());
        }
        if let Some(kind) = incoming.kind.as_deref().filter(|kind| !kind.is_empty()) {
            self.kind = Some(kind.to_string());
        }
        if !incoming.function.name.is_empty() {
            self.function.name.clone_from(&incoming.function.name);
        }
        self.function.arguments.push_str(&incoming.function.arguments);
    }
}

#[derive(Debug, Default)]
struct PartialChoice {
    message: Message,
    finish_reason: Option<FinishReason>,
}

/// Accumulates whole stream chunks into a [`ChatResponse`].
#[derive(Debug, Default)]
pub struct StreamAccumulator {
    id: String,
    model: String,
    created: i64,
    choices: Vec<PartialChoice>,
    usage: Option<Usage>,
}

impl StreamAccumulator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, chunk: &StreamChunk) {
        if self.id.is_empty() {
            self.id.clone_from(&chunk.id);
        }
        if self.model.is_empty() {
            self.model.clone_from(&chunk.model);
        }
        if self.created == 0 {
            self.created = chunk.created;
        }
        for choice in &chunk.choices {
            while self.choices.len() <= choice.index {
                self.choices.push(PartialChoice::default());
            }
            let slot = &mut self.choices[choice.index];
            slot.message.append_delta(&choice.delta);
            if choice.finish_reason.is_some() {
                slot.finish_reason.clone_from(&choice.finish_reason);
            }
        }
        if chunk.usage.is_some() {
            self.usage = chunk.usage;
        }
    }

    /// The message accumulated so far for choice `index`.
    #[must_use]
    pub fn message(&self, index: usize) -> Option<&Message> {
        self.choices.get(index).map(|choice| &choice.message)
    }

    #[must_use]
    pub fn finish(self) -> ChatResponse {
        ChatResponse {
            id: self.id,
            object: "chat.completion".to_string(),
            created: self.created,
            model: self.model,
            choices: self
                .choices
                .into_iter()
                .enumerate()
                .map(|(index, choice)| Choice {
                    index,
                    message: choice.message,
                    finish_reason: choice.finish_reason,
                })
                .collect(),
            usage: self.usage.unwrap_or_default(),
            error: None,
        }
    }
}
