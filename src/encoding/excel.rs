//! Excel (`.xlsx`) encoding.

use rust_xlsxwriter::Workbook;

use crate::error::{SweepError, SweepResult};
use crate::types::{ColumnData, Table};

/// Name of the single worksheet written by [`encode_xlsx`].
pub const SHEET_NAME: &str = "Sheet1";

/// Serialize `table` as an `.xlsx` workbook with one worksheet.
///
/// Row 0 holds the column names, data rows follow in order. Missing cells are left blank. A table
/// without columns produces a valid workbook with an empty worksheet.
pub fn encode_xlsx(table: &Table) -> SweepResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col_idx, column) in table.columns().iter().enumerate() {
        let col = u16::try_from(col_idx).map_err(|_| {
            SweepError::encode(format!(
                "too many columns for a worksheet: {}",
                table.column_count()
            ))
        })?;
        worksheet.write_string(0, col, column.name())?;

        match column.data() {
            ColumnData::Numeric(values) => {
                for (row_idx, value) in values.iter().enumerate() {
                    let Some(v) = value else { continue };
                    if !v.is_finite() {
                        return Err(SweepError::encode(format!(
                            "column '{}' row {row_idx}: cannot write non-finite number {v}",
                            column.name()
                        )));
                    }
                    worksheet.write_number(sheet_row(row_idx)?, col, *v)?;
                }
            }
            ColumnData::Text(values) => {
                for (row_idx, value) in values.iter().enumerate() {
                    let Some(s) = value else { continue };
                    worksheet.write_string(sheet_row(row_idx)?, col, s.as_str())?;
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

/// Worksheet row for a data row (row 0 is the header).
fn sheet_row(row_idx: usize) -> SweepResult<u32> {
    row_idx
        .checked_add(1)
        .and_then(|r| u32::try_from(r).ok())
        .ok_or_else(|| SweepError::encode(format!("row {row_idx} exceeds the worksheet limit")))
}
