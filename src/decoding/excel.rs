//! Excel (`.xlsx`) decoding.

use std::io::Cursor;

use calamine::{Data, DataType, Range, Reader, Xlsx, open_workbook_from_rs};

use crate::error::{SweepError, SweepResult};
use crate::types::{RawCell, Table};

use super::{DecodeOptions, assemble_table};

/// Decode an in-memory `.xlsx` workbook into a [`Table`].
///
/// Behavior:
/// - Reads the first worksheet only
/// - Detects the first non-empty row as the header row
/// - A worksheet without any cells decodes to an empty table (no columns, no rows)
/// - Numbers stay numbers; booleans and dates become text; error cells are missing
pub fn decode_xlsx(bytes: &[u8], options: &DecodeOptions) -> SweepResult<Table> {
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| SweepError::decode("workbook has no sheets"))??;
    Ok(decode_range(&range, options))
}

fn decode_range(range: &Range<Data>, options: &DecodeOptions) -> Table {
    let mut rows = range
        .rows()
        .skip_while(|row| row.iter().all(|c| matches!(c, Data::Empty)));

    let Some(header_row) = rows.next() else {
        return Table::empty(0);
    };
    let headers: Vec<String> = header_row.iter().map(cell_to_header_string).collect();
    let width = headers.len();

    let mut columns: Vec<Vec<RawCell>> = vec![Vec::new(); width];
    let mut row_count = 0usize;
    for row in rows {
        for (idx, column) in columns.iter_mut().enumerate() {
            let cell = row.get(idx).unwrap_or(&Data::Empty);
            column.push(convert_cell(cell, options));
        }
        row_count += 1;
    }

    assemble_table(headers, columns, row_count)
}

fn cell_to_header_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTime(_) => datetime_text(c),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("{e:?}"),
        Data::Empty => String::new(),
    }
}

fn convert_cell(c: &Data, options: &DecodeOptions) -> RawCell {
    match c {
        Data::Empty | Data::Error(_) => RawCell::Missing,
        Data::Int(i) => RawCell::Number(*i as f64),
        Data::Float(f) => RawCell::Number(*f),
        Data::String(s) => options.raw_text(s),
        Data::Bool(b) => RawCell::Text(b.to_string()),
        Data::DateTime(_) => RawCell::Text(datetime_text(c)),
        Data::DateTimeIso(s) | Data::DurationIso(s) => options.raw_text(s),
    }
}

fn datetime_text(c: &Data) -> String {
    c.as_datetime()
        .map(|dt| dt.to_string())
        .unwrap_or_else(|| c.to_string())
}
