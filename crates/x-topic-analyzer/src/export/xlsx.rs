//! Styled workbook writer.

use rust_xlsxwriter::{Color, Format, FormatPattern, Workbook};
use std::path::Path;

use crate::error::Result;
use crate::results::{AnalyzedRow, Cell, COLUMNS};

use super::{column_widths, HEADER_FILL, SHEET_NAME};

/// Write one sheet: styled header, one row per result, sized columns.
pub(super) fn write(rows: &[AnalyzedRow], path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    let header = Format::new()
        .set_bold()
        .set_font_color(Color::White)
        .set_pattern(FormatPattern::Solid)
        .set_background_color(Color::RGB(HEADER_FILL));

    for (col, name) in (0u16..).zip(COLUMNS) {
        sheet.write_string_with_format(0, col, name, &header)?;
    }

    for (row_idx, row) in (1u32..).zip(rows) {
        for (col, cell) in (0u16..).zip(row.cells()) {
            match cell {
                Cell::Text(text) => sheet.write_string(row_idx, col, text)?,
                Cell::Bool(value) => sheet.write_boolean(row_idx, col, value)?,
            };
        }
    }

    for (col, width) in (0u16..).zip(column_widths(rows)) {
        sheet.set_column_width(col, width as f64)?;
    }

    workbook.save(path)?;
    Ok(())
}
