//! Chat-completion provider trait and common types.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AIRole {
    /// System message (sets context/behavior)
    System,
    /// User message (input)
    User,
    /// Assistant message (AI response)
    Assistant,
}

/// A message in a conversation with an AI model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AIMessage {
    /// Role of the message sender
    pub role: AIRole,
    /// Content of the message
    pub content: String,
}

impl AIMessage {
    /// Create a new system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: AIRole::System,
            content: content.into(),
        }
    }

    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: AIRole::User,
            content: content.into(),
        }
    }
}

/// Token usage reported by the completion endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub total_tokens: u32,
}

/// Response from an AI model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AIResponse {
    /// Text of the first choice
    pub text: String,
    /// Token usage information
    pub usage: TokenUsage,
    /// Model that generated the response
    pub model: String,
}

/// Options for text generation.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Sampling temperature (0.0 to 2.0)
    pub temperature: Option<f32>,
    /// Maximum tokens to generate
    pub max_tokens: Option<u32>,
}

/// A chat-completion backend.
///
/// The live implementation is [`super::ChatCompletionsProvider`]; demo mode
/// and tests plug in their own.
#[async_trait]
pub trait AIProvider: Send + Sync {
    /// Provider name used in logs.
    fn name(&self) -> &'static str;

    /// Generate a single completion for `messages`.
    async fn generate_text(
        &self,
        model: &str,
        messages: &[AIMessage],
        options: &GenerateOptions,
    ) -> Result<AIResponse>;
}
