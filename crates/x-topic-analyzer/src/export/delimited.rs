//! Plain CSV writer.

use std::path::Path;

use crate::error::Result;
use crate::results::{AnalyzedRow, COLUMNS};

/// Write the header and one record per row, unstyled.
pub(super) fn write(rows: &[AnalyzedRow], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(COLUMNS)?;
    for row in rows {
        writer.write_record(row.record())?;
    }
    writer.flush()?;
    Ok(())
}
