//! X Topic Analyzer CLI - search, summarize, and export posts about a topic.

use anyhow::{Context, Result};
use clap::Parser;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use x_topic_analyzer::ai::{AIProvider, ChatCompletionsProvider};
use x_topic_analyzer::config::{default_model, DEFAULT_MAX_POSTS, DEFAULT_SUMMARY_DELAY};
use x_topic_analyzer::export::DEFAULT_PREFIX;
use x_topic_analyzer::mock::{MockProvider, MockSearchClient, MOCK_KEYWORD, MOCK_PREFIX};
use x_topic_analyzer::twitter::{SearchClient, XApiClient};
use x_topic_analyzer::{
    run_with_credentials, AnalyzedRow, CredentialOverrides, Exporter, OutputFormat, Pipeline,
    PipelineConfig, PostFetcher, RunReport, RunState, Summarizer,
};

/// Number of rows shown in the closing sample table.
const SAMPLE_ROWS: usize = 5;

/// X Topic Search and Analysis.
#[derive(Parser)]
#[command(name = "x-topic-analyzer")]
#[command(about = "X Topic Search and Analysis")]
#[command(version)]
pub struct Cli {
    /// Topic to search for (prompted for when omitted)
    #[arg(long)]
    keyword: Option<String>,

    /// Maximum posts to analyze
    #[arg(long, default_value_t = DEFAULT_MAX_POSTS)]
    max_posts: usize,

    /// X API Bearer Token (overrides X_BEARER_TOKEN)
    #[arg(long)]
    x_bearer_token: Option<String>,

    /// DeepSeek API Key (overrides DEEPSEEK_API_KEY)
    #[arg(long)]
    deepseek_key: Option<String>,

    /// Output file (defaults to x_analysis_<timestamp>.<ext>)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "xlsx")]
    format: OutputFormat,

    /// Chat model used for summaries
    #[arg(long, default_value_t = default_model().to_string())]
    model: String,

    /// Use built-in sample posts; needs no credentials or network
    #[arg(long)]
    mock: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    // A missing .env file is fine; the environment may already be populated.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("x_topic_analyzer=debug,info")
        } else {
            EnvFilter::new("x_topic_analyzer=info,warn")
        }
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    if cli.mock {
        println!("🧪 X Topic Analyzer - MOCK MODE (no API credentials needed)\n");
        let keyword = cli.keyword.clone().unwrap_or_else(|| MOCK_KEYWORD.to_string());
        let pipeline = build_pipeline(
            &cli,
            keyword,
            Arc::new(MockSearchClient),
            Arc::new(MockProvider),
            MOCK_PREFIX,
            Duration::ZERO,
        )?;
        let report = pipeline.run().await.context("Analysis run failed")?;
        return Ok(present(&report));
    }

    let overrides = CredentialOverrides {
        x_bearer_token: cli.x_bearer_token.clone(),
        deepseek_api_key: cli.deepseek_key.clone(),
    };
    let report = run_with_credentials(
        overrides,
        |var| std::env::var(var).ok(),
        &mut std::io::stdout(),
        |credentials| -> Result<Pipeline> {
            let keyword = match cli.keyword.clone() {
                Some(keyword) => keyword,
                None => dialoguer::Input::<String>::new()
                    .with_prompt("Enter topic to search for")
                    .interact_text()
                    .context("Failed to read search topic")?,
            };

            let search = XApiClient::new(credentials.x_bearer_token.as_str())
                .context("Failed to build X API client")?;
            let provider = ChatCompletionsProvider::new(credentials.deepseek_api_key.as_str())
                .context("Failed to build DeepSeek client")?;

            build_pipeline(
                &cli,
                keyword,
                Arc::new(search),
                Arc::new(provider),
                DEFAULT_PREFIX,
                DEFAULT_SUMMARY_DELAY,
            )
        },
    )
    .await
    .context("Analysis run failed")?;

    match report {
        Some(report) => Ok(present(&report)),
        None => Ok(ExitCode::FAILURE),
    }
}

fn build_pipeline(
    cli: &Cli,
    keyword: String,
    search: Arc<dyn SearchClient>,
    provider: Arc<dyn AIProvider>,
    prefix: &str,
    summary_delay: Duration,
) -> Result<Pipeline> {
    let config = PipelineConfig::new(keyword)
        .with_max_posts(cli.max_posts)
        .with_summary_delay(summary_delay);
    let summarizer =
        Summarizer::new(provider, cli.model.as_str()).context("Failed to load prompt templates")?;
    let exporter = Exporter::for_format(prefix, cli.format);

    Ok(Pipeline::new(config, PostFetcher::new(search), summarizer, exporter)
        .with_output(cli.output.clone()))
}

fn present(report: &RunReport) -> ExitCode {
    if report.state == RunState::DoneEmpty {
        println!("No results found.");
        return ExitCode::SUCCESS;
    }

    println!("\n📊 Sample Results:");
    println!("{}", sample_table(&report.rows));

    if report.failed_summaries > 0 {
        println!(
            "⚠️  {} of {} summaries failed",
            report.failed_summaries, report.fetched
        );
    }

    ExitCode::SUCCESS
}

fn sample_table(rows: &[AnalyzedRow]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Author", "Short Summary", "Post Link"]);

    for row in rows.iter().take(SAMPLE_ROWS) {
        table.add_row(vec![
            row.author_display.as_str(),
            row.short_summary.as_str(),
            row.post_link.as_str(),
        ]);
    }
    table
}
