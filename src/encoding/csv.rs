//! CSV encoding.

use std::io::Write;

use crate::error::{SweepError, SweepResult};
use crate::types::{Cell, Table, format_number};

/// Serialize `table` as CSV: one header record, then one record per row.
///
/// Missing cells are written as empty fields. A table without columns encodes to no bytes at
/// all, since a CSV record cannot hold zero fields.
pub fn encode_csv(table: &Table) -> SweepResult<Vec<u8>> {
    if table.column_count() == 0 {
        return Ok(Vec::new());
    }

    let mut wtr = csv::Writer::from_writer(Vec::new());
    write_csv(&mut wtr, table)?;
    wtr.into_inner()
        .map_err(|e| SweepError::encode(format!("csv: {}", e.error())))
}

/// Write `table` to an existing CSV writer.
pub fn write_csv<W: Write>(wtr: &mut csv::Writer<W>, table: &Table) -> SweepResult<()> {
    wtr.write_record(table.column_names()).map_err(csv_error)?;

    let names: Vec<&str> = table.column_names().collect();
    let mut fields: Vec<String> = Vec::with_capacity(names.len());
    for (row_idx, row) in table.rows().enumerate() {
        fields.clear();
        for (cell, name) in row.into_iter().zip(&names) {
            fields.push(render_cell(cell, name, row_idx)?);
        }
        wtr.write_record(&fields).map_err(csv_error)?;
    }
    wtr.flush()
        .map_err(|e| SweepError::encode(format!("csv: {e}")))
}

fn render_cell(cell: Cell<'_>, column: &str, row: usize) -> SweepResult<String> {
    match cell {
        Cell::Missing => Ok(String::new()),
        Cell::Text(s) => Ok(s.to_owned()),
        Cell::Number(v) if v.is_finite() => Ok(format_number(v)),
        Cell::Number(v) => Err(SweepError::encode(format!(
            "column '{column}' row {row}: cannot write non-finite number {v}"
        ))),
    }
}

fn csv_error(err: csv::Error) -> SweepError {
    SweepError::encode(format!("csv: {err}"))
}
