//! LLM integration.
//!
//! This module provides:
//! - The chat-completion provider abstraction
//! - An OpenAI-compatible client used for DeepSeek

pub mod chat;
pub mod provider;

pub use chat::ChatCompletionsProvider;
pub use provider::{AIMessage, AIProvider, AIResponse, AIRole, GenerateOptions, TokenUsage};
