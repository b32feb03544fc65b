pub mod anthropic;
pub mod canonical;
pub mod mapping;
pub mod merge;
pub mod openai_chat;
