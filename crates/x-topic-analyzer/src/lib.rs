//! Topic analysis for X (formerly Twitter).
//!
//! This crate provides:
//! - Keyword search over recent posts via the X v2 API
//! - Per-post LLM summaries via an OpenAI-compatible endpoint (DeepSeek)
//! - Tabular results with a fixed column schema
//! - Styled `.xlsx` export with CSV fallback

pub mod ai;
pub mod analysis;
pub mod config;
pub mod error;
pub mod export;
pub mod mock;
pub mod pipeline;
pub mod results;
pub mod twitter;

// Re-export main types
pub use analysis::{Summarizer, SUMMARY_FAILED};
pub use config::{check_credentials, CredentialOverrides, Credentials, PipelineConfig};
pub use error::{AnalyzerError, Result};
pub use export::{Exporter, OutputFormat};
pub use pipeline::{run_with_credentials, Pipeline, RunReport, RunState};
pub use results::{assemble, AnalyzedRow, ResultSet};
pub use twitter::{PostFetcher, RawPost};
