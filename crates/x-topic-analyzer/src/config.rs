//! Run configuration and credential resolution.

use std::io::Write;
use std::time::Duration;

use crate::ai::chat::{API_KEY_ENV_VAR, DEFAULT_MODEL};
use crate::error::{AnalyzerError, Result};
use crate::twitter::BEARER_TOKEN_ENV_VAR;

/// Default number of posts analyzed per run.
pub const DEFAULT_MAX_POSTS: usize = 50;

/// Pause after each summary request.
pub const DEFAULT_SUMMARY_DELAY: Duration = Duration::from_millis(500);

/// API credentials for one run.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// X API bearer token.
    pub x_bearer_token: String,
    /// DeepSeek API key.
    pub deepseek_api_key: String,
}

// Keep secrets out of logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("x_bearer_token", &"<redacted>")
            .field("deepseek_api_key", &"<redacted>")
            .finish()
    }
}

/// Credentials given explicitly on the command line.
#[derive(Debug, Clone, Default)]
pub struct CredentialOverrides {
    pub x_bearer_token: Option<String>,
    pub deepseek_api_key: Option<String>,
}

impl Credentials {
    /// Resolve credentials from explicit overrides, then `lookup`.
    ///
    /// `lookup` reads an environment variable; the binary passes
    /// `std::env::var(..).ok()`. Blank values count as missing.
    pub fn resolve<F>(overrides: CredentialOverrides, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let pick = |explicit: Option<String>, var: &str| {
            explicit
                .filter(|v| !v.trim().is_empty())
                .or_else(|| lookup(var).filter(|v| !v.trim().is_empty()))
        };

        let x_bearer_token = pick(overrides.x_bearer_token, BEARER_TOKEN_ENV_VAR);
        let deepseek_api_key = pick(overrides.deepseek_api_key, API_KEY_ENV_VAR);

        match (x_bearer_token, deepseek_api_key) {
            (Some(x_bearer_token), Some(deepseek_api_key)) => Ok(Self {
                x_bearer_token,
                deepseek_api_key,
            }),
            (token, key) => {
                let mut missing = Vec::new();
                if token.is_none() {
                    missing.push(BEARER_TOKEN_ENV_VAR);
                }
                if key.is_none() {
                    missing.push(API_KEY_ENV_VAR);
                }
                Err(AnalyzerError::CredentialMissing { missing })
            }
        }
    }

    /// Resolve from overrides and the process environment.
    pub fn from_env(overrides: CredentialOverrides) -> Result<Self> {
        Self::resolve(overrides, |var| std::env::var(var).ok())
    }
}

/// Resolve credentials, printing the missing-credential diagnostic to `out`
/// when either one is absent.
///
/// `Ok(None)` means the run has to stop before anything is fetched.
pub fn check_credentials<F, W>(
    overrides: CredentialOverrides,
    lookup: F,
    out: &mut W,
) -> Result<Option<Credentials>>
where
    F: Fn(&str) -> Option<String>,
    W: Write,
{
    match Credentials::resolve(overrides, lookup) {
        Ok(credentials) => Ok(Some(credentials)),
        Err(AnalyzerError::CredentialMissing { missing }) => {
            tracing::error!(?missing, "Missing API credentials");
            writeln!(out, "❌ Error: Missing API credentials")?;
            writeln!(out, "Please provide X Bearer Token and DeepSeek API Key")?;
            writeln!(
                out,
                "You can set them as environment variables or pass as arguments"
            )?;
            writeln!(out, "Missing: {}", missing.join(", "))?;
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Configuration for one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Search keyword, used verbatim as the `Topic` column.
    pub keyword: String,
    /// Maximum posts to analyze.
    pub max_posts: usize,
    /// Pause inserted after each summary request.
    pub summary_delay: Duration,
}

impl PipelineConfig {
    /// Create a configuration with default limits.
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            max_posts: DEFAULT_MAX_POSTS,
            summary_delay: DEFAULT_SUMMARY_DELAY,
        }
    }

    /// Set the post limit.
    #[must_use]
    pub fn with_max_posts(mut self, max_posts: usize) -> Self {
        self.max_posts = max_posts;
        self
    }

    /// Set the pause after each summary.
    #[must_use]
    pub fn with_summary_delay(mut self, delay: Duration) -> Self {
        self.summary_delay = delay;
        self
    }
}

/// Model used when none is configured.
#[must_use]
pub fn default_model() -> &'static str {
    DEFAULT_MODEL
}
