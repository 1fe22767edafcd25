//! Error types for the topic analyzer.

use thiserror::Error;

/// Errors produced by the analyzer pipeline.
///
/// Fetch, summary and export-capability errors are degraded at the
/// component boundary. Credential errors stop the run.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    // Search errors
    #[error("Error searching X: {reason}")]
    Fetch { reason: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    // Summarization errors
    #[error("Error generating summary: {0}")]
    Summary(String),

    #[error("Failed to render prompt: {0}")]
    Template(#[from] handlebars::RenderError),

    #[error("Failed to register prompt template: {0}")]
    TemplateRegistration(#[from] handlebars::TemplateError),

    // Export errors
    #[error("Spreadsheet output is not available in this build")]
    ExportCapabilityMissing,

    #[cfg(feature = "xlsx")]
    #[error("Failed to write workbook: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Configuration errors
    #[error("Missing API credentials: {}", .missing.join(", "))]
    CredentialMissing { missing: Vec<&'static str> },

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, AnalyzerError>;
