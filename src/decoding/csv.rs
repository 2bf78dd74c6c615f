//! CSV decoding.

use std::io::Read;

use crate::error::{SweepError, SweepResult};
use crate::types::{RawCell, Table};

use super::{DecodeOptions, assemble_table};

/// Decode CSV bytes into a [`Table`].
///
/// Rules:
///
/// - The first record is the header; it must have at least one field.
/// - Rows shorter than the header are padded with missing cells.
/// - Rows longer than the header are rejected.
/// - Fields must be valid UTF-8.
pub fn decode_csv(bytes: &[u8], options: &DecodeOptions) -> SweepResult<Table> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);
    decode_csv_from_reader(&mut rdr, options)
}

/// Decode CSV data from an existing CSV reader.
///
/// The reader should be configured with `has_headers(true)` and `flexible(true)`; with
/// `flexible(false)` every short row is reported as an error by the `csv` crate instead of being
/// padded.
pub fn decode_csv_from_reader<R: Read>(
    rdr: &mut csv::Reader<R>,
    options: &DecodeOptions,
) -> SweepResult<Table> {
    let headers = rdr.headers().map_err(csv_error)?.clone();
    if headers.is_empty() {
        return Err(SweepError::decode("no columns to parse from input"));
    }
    let width = headers.len();

    let mut columns: Vec<Vec<RawCell>> = vec![Vec::new(); width];
    let mut row_count = 0usize;
    for result in rdr.records() {
        let record = result.map_err(csv_error)?;
        if record.len() > width {
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            return Err(SweepError::decode(format!(
                "expected {width} fields in line {line}, saw {}",
                record.len()
            )));
        }

        for (idx, column) in columns.iter_mut().enumerate() {
            column.push(options.raw_text(record.get(idx).unwrap_or("")));
        }
        row_count += 1;
    }

    let headers = headers.iter().map(str::to_owned).collect();
    Ok(assemble_table(headers, columns, row_count))
}

fn csv_error(err: csv::Error) -> SweepError {
    SweepError::decode(format!("csv: {err}"))
}
