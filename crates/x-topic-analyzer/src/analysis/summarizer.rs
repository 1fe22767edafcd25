//! Per-post summarization.

use std::sync::Arc;

use crate::ai::{AIMessage, AIProvider, GenerateOptions};
use crate::error::{AnalyzerError, Result};

use super::prompts::{PromptManager, SYSTEM_PROMPT};

/// Returned in place of a summary when the completion call fails.
pub const SUMMARY_FAILED: &str = "Summary generation failed";

/// Output token cap for one summary.
pub const SUMMARY_MAX_TOKENS: u32 = 150;

/// Sampling temperature for summaries.
pub const SUMMARY_TEMPERATURE: f32 = 0.3;

/// Summarizes posts through a chat-completion provider.
pub struct Summarizer {
    provider: Arc<dyn AIProvider>,
    prompts: PromptManager,
    model: String,
}

impl Summarizer {
    /// Create a new summarizer for `model`.
    pub fn new(provider: Arc<dyn AIProvider>, model: impl Into<String>) -> Result<Self> {
        Ok(Self {
            provider,
            prompts: PromptManager::new()?,
            model: model.into(),
        })
    }

    /// Model used for completions.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Summarize one post, returning the provider's failure.
    pub async fn try_summarize(&self, text: &str, keyword: &str) -> Result<String> {
        let prompt = self.prompts.summarize(keyword, text)?;
        let messages = [AIMessage::system(SYSTEM_PROMPT), AIMessage::user(prompt)];
        let options = GenerateOptions {
            temperature: Some(SUMMARY_TEMPERATURE),
            max_tokens: Some(SUMMARY_MAX_TOKENS),
        };

        let response = self
            .provider
            .generate_text(&self.model, &messages, &options)
            .await?;

        let summary = response.text.trim();
        if summary.is_empty() {
            return Err(AnalyzerError::Summary("model returned an empty summary".to_string()));
        }
        Ok(summary.to_string())
    }

    /// Summarize one post. Failures are reported and yield [`SUMMARY_FAILED`].
    pub async fn summarize(&self, text: &str, keyword: &str) -> String {
        match self.try_summarize(text, keyword).await {
            Ok(summary) => summary,
            Err(e) => {
                tracing::warn!(provider = self.provider.name(), error = %e, "Summary failed");
                SUMMARY_FAILED.to_string()
            }
        }
    }
}
