//! Analysis pipeline - drives the fetch, summarize, assemble, export flow.

use std::fmt;
use std::io::Write;
use std::path::PathBuf;

use crate::analysis::{Summarizer, SUMMARY_FAILED};
use crate::config::{check_credentials, CredentialOverrides, Credentials, PipelineConfig};
use crate::error::{AnalyzerError, Result};
use crate::export::Exporter;
use crate::results::{assemble, ResultSet};
use crate::twitter::PostFetcher;

/// Stage of a run. `Done` and `DoneEmpty` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Start,
    Fetching,
    Summarizing,
    Assembling,
    Exporting,
    /// Search found nothing (or failed); nothing was exported.
    DoneEmpty,
    Done,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunState::Start => "start",
            RunState::Fetching => "fetching",
            RunState::Summarizing => "summarizing",
            RunState::Assembling => "assembling",
            RunState::Exporting => "exporting",
            RunState::DoneEmpty => "done-empty",
            RunState::Done => "done",
        };
        write!(f, "{s}")
    }
}

/// Outcome of a single run.
#[derive(Debug)]
pub struct RunReport {
    /// Terminal state reached.
    pub state: RunState,
    /// Number of posts fetched.
    pub fetched: usize,
    /// Summaries replaced by the failure sentinel.
    pub failed_summaries: usize,
    /// Errors encountered and degraded past.
    pub errors: Vec<String>,
    /// Assembled rows, in fetch order.
    pub rows: ResultSet,
    /// File written by the exporter.
    pub output: Option<PathBuf>,
}

impl RunReport {
    fn empty(errors: Vec<String>) -> Self {
        Self {
            state: RunState::DoneEmpty,
            fetched: 0,
            failed_summaries: 0,
            errors,
            rows: Vec::new(),
            output: None,
        }
    }
}

/// Topic analysis orchestrator.
pub struct Pipeline {
    config: PipelineConfig,
    fetcher: PostFetcher,
    summarizer: Summarizer,
    exporter: Exporter,
    output: Option<PathBuf>,
}

impl Pipeline {
    /// Create a new pipeline from its components.
    #[must_use]
    pub fn new(
        config: PipelineConfig,
        fetcher: PostFetcher,
        summarizer: Summarizer,
        exporter: Exporter,
    ) -> Self {
        Self {
            config,
            fetcher,
            summarizer,
            exporter,
            output: None,
        }
    }

    /// Write to `path` instead of a generated file name.
    #[must_use]
    pub fn with_output(mut self, path: Option<PathBuf>) -> Self {
        self.output = path;
        self
    }

    /// Run the pipeline once.
    ///
    /// A failed search ends the run empty and a failed summary becomes the
    /// sentinel; only export I/O errors are returned.
    pub async fn run(&self) -> Result<RunReport> {
        let keyword = self.config.keyword.as_str();
        let mut state = RunState::Start;
        tracing::info!(
            keyword,
            max_posts = self.config.max_posts,
            model = self.summarizer.model(),
            %state,
            "Starting run"
        );

        state = self.advance(state, RunState::Fetching);
        println!("🔍 Searching X for: '{keyword}'");
        let posts = match self.fetcher.try_search(keyword, self.config.max_posts).await {
            Ok(posts) => posts,
            Err(e) => {
                tracing::warn!(error = %e, "Search failed, ending run");
                println!("{e}");
                self.advance(state, RunState::DoneEmpty);
                return Ok(RunReport::empty(vec![e.to_string()]));
            }
        };

        if posts.is_empty() {
            self.advance(state, RunState::DoneEmpty);
            return Ok(RunReport::empty(Vec::new()));
        }

        state = self.advance(state, RunState::Summarizing);
        println!("📊 Found {} posts. Generating summaries...", posts.len());

        let mut summaries = Vec::with_capacity(posts.len());
        let mut errors = Vec::new();
        for (i, post) in posts.iter().enumerate() {
            println!("  Processing post {}/{}...", i + 1, posts.len());

            let summary = match self.summarizer.try_summarize(&post.text, keyword).await {
                Ok(summary) => summary,
                Err(e) => {
                    tracing::warn!(id = %post.id, error = %e, "Summary failed");
                    println!("{e}");
                    errors.push(format!("{}: {e}", post.id));
                    SUMMARY_FAILED.to_string()
                }
            };
            summaries.push(summary);

            if !self.config.summary_delay.is_zero() {
                tokio::time::sleep(self.config.summary_delay).await;
            }
        }

        state = self.advance(state, RunState::Assembling);
        let rows = assemble(keyword, &posts, &summaries);

        state = self.advance(state, RunState::Exporting);
        let output = self.exporter.export(&rows, self.output.as_deref())?;

        state = self.advance(state, RunState::Done);
        tracing::info!(
            fetched = posts.len(),
            failed_summaries = errors.len(),
            output = ?output,
            %state,
            "Run complete"
        );

        Ok(RunReport {
            state,
            fetched: posts.len(),
            failed_summaries: errors.len(),
            errors,
            rows,
            output,
        })
    }

    fn advance(&self, from: RunState, to: RunState) -> RunState {
        tracing::debug!(keyword = %self.config.keyword, %from, %to, "State transition");
        to
    }
}

/// Run a pipeline once credentials are resolved.
///
/// When either credential is missing the diagnostic goes to `out`, `build`
/// is never called and `Ok(None)` is returned, so nothing is fetched.
pub async fn run_with_credentials<L, W, B, E>(
    overrides: CredentialOverrides,
    lookup: L,
    out: &mut W,
    build: B,
) -> std::result::Result<Option<RunReport>, E>
where
    L: Fn(&str) -> Option<String>,
    W: Write,
    B: FnOnce(Credentials) -> std::result::Result<Pipeline, E>,
    E: From<AnalyzerError>,
{
    let Some(credentials) = check_credentials(overrides, lookup, out)? else {
        tracing::info!(state = %RunState::Start, "Run halted before fetching");
        return Ok(None);
    };

    let pipeline = build(credentials)?;
    Ok(Some(pipeline.run().await?))
}
