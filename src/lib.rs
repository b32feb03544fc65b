//! Unified chat-completion client for the OpenAI and Anthropic dialects.
//!
//! Requests, responses and stream chunks are normalized to one canonical
//! model; streamed deltas merge into the same shape a non-streaming call
//! returns.

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod observability;
pub mod protocol;
pub mod stream;
pub mod transport;

pub use client::Client;
pub use config::{load_config, ClientConfig, ConfigError};
pub use error::{ApiError, ClientError, ErrorCategory};
pub use protocol::canonical::{
    ChatRequest, ChatResponse, Choice, Content, ContentPart, Dialect, FinishReason, Message,
    Role, StreamChunk, Tool, ToolCall, ToolChoice, Usage,
};
pub use protocol::merge::StreamAccumulator;
pub use stream::ChatStream;
