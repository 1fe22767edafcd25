//! LLM-powered post analysis.
//!
//! Renders the summary prompt and turns completions into short summaries.

mod prompts;
mod summarizer;

pub use prompts::{PromptManager, SYSTEM_PROMPT};
pub use summarizer::{Summarizer, SUMMARY_FAILED, SUMMARY_MAX_TOKENS, SUMMARY_TEMPERATURE};
