//! Decoding uploaded bytes into a [`Table`].
//!
//! Most callers should use [`decode`] (typed format) or [`decode_hinted`] (format given as a
//! user-facing string such as `"csv"` or `".xlsx"`). Format-specific readers live under:
//!
//! - [`csv`]
//! - [`excel`] (cargo feature `excel`)
//!
//! Both readers share the same rules: the first row is the header, header names are made unique,
//! configured missing markers become missing cells, and each column is typed once with
//! [`ColumnData::infer`].

pub mod csv;
#[cfg(feature = "excel")]
pub mod excel;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::SweepResult;
use crate::format::TableFormat;
use crate::types::{Column, ColumnData, RawCell, Table};

/// Strings treated as missing cells by default.
pub const DEFAULT_MISSING_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Options controlling how raw cell text is interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeOptions {
    /// Cell texts (compared after trimming, if enabled) that decode as missing.
    pub missing_markers: Vec<String>,
    /// Trim leading/trailing whitespace from text cells. Off by default so text written by
    /// [`crate::encoding`] decodes back unchanged; numeric parsing ignores surrounding
    /// whitespace either way.
    pub trim_whitespace: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            missing_markers: DEFAULT_MISSING_MARKERS.iter().map(|s| s.to_string()).collect(),
            trim_whitespace: false,
        }
    }
}

impl DecodeOptions {
    /// Convert raw cell text into a [`RawCell`].
    pub(crate) fn raw_text(&self, raw: &str) -> RawCell {
        let text = if self.trim_whitespace { raw.trim() } else { raw };
        if text.is_empty() || self.missing_markers.iter().any(|m| m == text) {
            RawCell::Missing
        } else {
            RawCell::Text(text.to_owned())
        }
    }
}

/// Decode `bytes` as `format`.
///
/// # Errors
///
/// - [`crate::error::SweepError::Decode`] if the bytes are malformed for `format`.
/// - [`crate::error::SweepError::UnsupportedFormat`] for Excel input when the `excel` feature is disabled.
///
/// # Examples
///
/// ```rust
/// use data_sweeper::decoding::{decode, DecodeOptions};
/// use data_sweeper::format::TableFormat;
/// use data_sweeper::types::ColumnType;
///
/// let table = decode(b"id,name\n1,Ada\n2,\n", TableFormat::Csv, &DecodeOptions::default()).unwrap();
/// assert_eq!(table.row_count(), 2);
/// assert_eq!(table.column("id").unwrap().column_type(), ColumnType::Numeric);
/// assert_eq!(table.column("name").unwrap().missing_count(), 1);
/// ```
pub fn decode(bytes: &[u8], format: TableFormat, options: &DecodeOptions) -> SweepResult<Table> {
    match format {
        TableFormat::Csv => csv::decode_csv(bytes, options),
        TableFormat::Excel => decode_excel_dispatch(bytes, options),
    }
}

/// Decode `bytes` using a user-facing format hint (`"csv"`, `"excel"`, `".xlsx"`, ...).
///
/// # Errors
///
/// [`crate::error::SweepError::UnsupportedFormat`] if `hint` names no supported format, otherwise as
/// [`decode`].
pub fn decode_hinted(bytes: &[u8], hint: &str, options: &DecodeOptions) -> SweepResult<Table> {
    let format: TableFormat = hint.parse()?;
    decode(bytes, format, options)
}

fn decode_excel_dispatch(bytes: &[u8], options: &DecodeOptions) -> SweepResult<Table> {
    #[cfg(feature = "excel")]
    {
        excel::decode_xlsx(bytes, options)
    }

    #[cfg(not(feature = "excel"))]
    {
        let _ = (bytes, options);
        Err(crate::error::SweepError::UnsupportedFormat {
            format: "excel (enable cargo feature 'excel')".to_string(),
        })
    }
}

/// Build a typed table from header names and column-major raw cells.
///
/// Every column in `columns` must have the same length.
pub(crate) fn assemble_table(
    headers: Vec<String>,
    columns: Vec<Vec<RawCell>>,
    row_count: usize,
) -> Table {
    let names = unique_header_names(headers);
    let columns = names
        .into_iter()
        .zip(columns)
        .map(|(name, raw)| Column::new(name, ColumnData::infer(raw)))
        .collect();
    Table::from_parts(columns, row_count)
}

/// Blank header cells become `Unnamed: {index}`; repeated names get `.1`, `.2`, ... suffixes.
///
/// Other names are kept verbatim, surrounding whitespace included.
fn unique_header_names(headers: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::with_capacity(headers.len());
    let mut out = Vec::with_capacity(headers.len());
    for (idx, header) in headers.into_iter().enumerate() {
        let base = if header.trim().is_empty() {
            format!("Unnamed: {idx}")
        } else {
            header
        };

        let mut name = base.clone();
        let mut n = 0usize;
        while seen.contains(&name) {
            n += 1;
            name = format!("{base}.{n}");
        }
        seen.insert(name.clone());
        out.push(name);
    }
    out
}
