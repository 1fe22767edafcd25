//! Prompt template management.

use handlebars::Handlebars;
use serde::Serialize;

use crate::error::Result;

/// Name of the summary template.
pub const SUMMARIZE: &str = "summarize";

/// System message sent with every summary request.
pub const SYSTEM_PROMPT: &str =
    "You are a helpful assistant that creates concise, objective summaries of social media posts.";

/// Manages Handlebars prompt templates.
pub struct PromptManager {
    handlebars: Handlebars<'static>,
}

impl PromptManager {
    /// Create a new prompt manager with embedded templates.
    pub fn new() -> Result<Self> {
        let mut handlebars = Handlebars::new();
        // Prompts are plain text; post bodies must reach the model verbatim.
        handlebars.register_escape_fn(handlebars::no_escape);
        handlebars.register_template_string(SUMMARIZE, SUMMARIZE_TEMPLATE)?;
        Ok(Self { handlebars })
    }

    /// Render a template with the given data.
    pub fn render<T: Serialize>(&self, template: &str, data: &T) -> Result<String> {
        Ok(self.handlebars.render(template, data)?)
    }

    /// Render the summary prompt for one post.
    pub fn summarize(&self, keyword: &str, text: &str) -> Result<String> {
        self.render(
            SUMMARIZE,
            &serde_json::json!({
                "keyword": keyword,
                "text": text,
            }),
        )
    }
}

const SUMMARIZE_TEMPLATE: &str = r"Analyze this social media post about '{{keyword}}' and provide a brief, objective summary (max 2-3 sentences):

Post: {{text}}

Focus on:
1. Main point or claim
2. Key context
3. Relevance to topic

Summary:";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_prompt_embeds_keyword_and_text() {
        let prompts = PromptManager::new().unwrap();
        let prompt = prompts
            .summarize("rust", "Rust 2024 edition is out & <stable>")
            .unwrap();

        assert!(prompt.starts_with("Analyze this social media post about 'rust'"));
        assert!(prompt.contains("Post: Rust 2024 edition is out & <stable>\n"));
        assert!(prompt.contains("1. Main point or claim"));
        assert!(prompt.ends_with("Summary:"));
    }
}
