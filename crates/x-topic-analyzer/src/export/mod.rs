//! Spreadsheet export with CSV fallback.

mod delimited;
#[cfg(feature = "xlsx")]
mod xlsx;

use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

use crate::error::{AnalyzerError, Result};
use crate::results::{AnalyzedRow, COLUMNS};

/// Sheet name used in the workbook.
pub const SHEET_NAME: &str = "X Analysis";

/// Default output file prefix.
pub const DEFAULT_PREFIX: &str = "x_analysis";

/// Header fill color.
pub const HEADER_FILL: u32 = 0x0036_6092;

/// Widest a column is allowed to grow.
pub const MAX_COLUMN_WIDTH: usize = 50;

/// Whether this build can write styled workbooks.
pub const SPREADSHEET_SUPPORTED: bool = cfg!(feature = "xlsx");

const XLSX_EXT: &str = "xlsx";
const CSV_EXT: &str = "csv";

/// Output format chosen for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Styled Excel workbook.
    Xlsx,
    /// Plain comma-separated values.
    Csv,
}

impl OutputFormat {
    /// File extension for this format.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Xlsx => XLSX_EXT,
            Self::Csv => CSV_EXT,
        }
    }
}

/// Writes a result set to disk.
#[derive(Debug, Clone)]
pub struct Exporter {
    prefix: String,
    output_dir: PathBuf,
    spreadsheet: bool,
}

impl Default for Exporter {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}

impl Exporter {
    /// Create an exporter using the build's spreadsheet capability.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            output_dir: PathBuf::from("."),
            spreadsheet: SPREADSHEET_SUPPORTED,
        }
    }

    /// Create an exporter for the requested format.
    pub fn for_format(prefix: impl Into<String>, format: OutputFormat) -> Self {
        let exporter = Self::new(prefix);
        match format {
            OutputFormat::Xlsx => exporter,
            OutputFormat::Csv => exporter.plain_only(),
        }
    }

    /// Disable styled workbook output.
    #[must_use]
    pub fn plain_only(mut self) -> Self {
        self.spreadsheet = false;
        self
    }

    /// Directory for generated file names.
    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Format used when no file name is given.
    #[must_use]
    pub fn format(&self) -> OutputFormat {
        if self.spreadsheet {
            OutputFormat::Xlsx
        } else {
            OutputFormat::Csv
        }
    }

    /// `{prefix}_{YYYYMMDD_HHMMSS}.{ext}` in the output directory.
    #[must_use]
    pub fn default_filename(&self, now: DateTime<Local>) -> PathBuf {
        self.output_dir.join(format!(
            "{}_{}.{}",
            self.prefix,
            now.format("%Y%m%d_%H%M%S"),
            self.format().extension()
        ))
    }

    /// Write `rows` and return the path actually written.
    ///
    /// Returns `Ok(None)` without touching the filesystem when `rows` is
    /// empty. A failed workbook write falls back to CSV next to it.
    pub fn export(&self, rows: &[AnalyzedRow], filename: Option<&Path>) -> Result<Option<PathBuf>> {
        if rows.is_empty() {
            println!("No data to save");
            return Ok(None);
        }

        let path = filename.map_or_else(|| self.default_filename(Local::now()), Path::to_path_buf);
        println!("💾 Saving results to: {}", path.display());

        let written = if is_spreadsheet(&path) {
            match self.write_spreadsheet(rows, &path) {
                Ok(()) => path,
                Err(e) => {
                    let fallback = path.with_extension(CSV_EXT);
                    tracing::warn!(
                        error = %e,
                        path = %fallback.display(),
                        "Workbook export unavailable, writing CSV instead"
                    );
                    delimited::write(rows, &fallback)?;
                    fallback
                }
            }
        } else {
            delimited::write(rows, &path)?;
            path
        };

        println!("✅ Results saved to: {}", written.display());
        println!("📈 Total posts analyzed: {}", rows.len());
        tracing::info!(path = %written.display(), rows = rows.len(), "Export complete");
        Ok(Some(written))
    }

    fn write_spreadsheet(&self, rows: &[AnalyzedRow], path: &Path) -> Result<()> {
        if !self.spreadsheet {
            return Err(AnalyzerError::ExportCapabilityMissing);
        }
        #[cfg(feature = "xlsx")]
        {
            xlsx::write(rows, path)
        }
        #[cfg(not(feature = "xlsx"))]
        {
            let _ = (rows, path);
            Err(AnalyzerError::ExportCapabilityMissing)
        }
    }
}

fn is_spreadsheet(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(XLSX_EXT))
}

/// Width of each column: longest stringified cell (header included) plus
/// two, capped at [`MAX_COLUMN_WIDTH`].
#[must_use]
pub fn column_widths(rows: &[AnalyzedRow]) -> [usize; COLUMNS.len()] {
    let mut widths = COLUMNS.map(|h| h.chars().count());
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row.record()) {
            *width = (*width).max(cell.chars().count());
        }
    }
    widths.map(|w| (w + 2).min(MAX_COLUMN_WIDTH))
}
