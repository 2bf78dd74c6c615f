//! Encoding a [`Table`] back into bytes.
//!
//! [`encode`] serializes into a [`TableFormat`] and reports the mime type to serve the bytes with.
//! Output is always built fully in memory; on error nothing is returned.
//!
//! - [`csv`]: header row + records, numbers in locale-independent decimal form
//! - [`excel`]: single `Sheet1` worksheet (cargo feature `excel`)

pub mod csv;
#[cfg(feature = "excel")]
pub mod excel;

use crate::error::SweepResult;
use crate::format::TableFormat;
use crate::types::Table;

/// Encoded output of one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoded {
    /// Serialized file content.
    pub bytes: Vec<u8>,
    /// Mime type matching the format.
    pub mime_type: &'static str,
    /// Format the bytes are in.
    pub format: TableFormat,
}

/// Serialize `table` as `format`.
///
/// # Errors
///
/// - [`crate::error::SweepError::Encode`] if a cell cannot be represented (non-finite number,
///   string or sheet past the format's limits).
/// - [`crate::error::SweepError::UnsupportedFormat`] for Excel output when the `excel` feature is
///   disabled.
///
/// # Examples
///
/// ```rust
/// use data_sweeper::encoding::encode;
/// use data_sweeper::format::TableFormat;
/// use data_sweeper::types::{Column, Table};
///
/// let table = Table::new(vec![
///     Column::numeric("score", vec![Some(1.5), None]),
///     Column::text("name", vec![Some("Ada"), Some("Grace")]),
/// ]).unwrap();
/// let out = encode(&table, TableFormat::Csv).unwrap();
/// assert_eq!(out.mime_type, "text/csv");
/// assert_eq!(String::from_utf8(out.bytes).unwrap(), "score,name\n1.5,Ada\n,Grace\n");
/// ```
pub fn encode(table: &Table, format: TableFormat) -> SweepResult<Encoded> {
    let bytes = match format {
        TableFormat::Csv => csv::encode_csv(table)?,
        TableFormat::Excel => encode_excel_dispatch(table)?,
    };
    Ok(Encoded {
        bytes,
        mime_type: format.mime_type(),
        format,
    })
}

/// Serialize `table` using a user-facing format hint (`"csv"`, `"excel"`, `".xlsx"`, ...).
///
/// # Errors
///
/// [`crate::error::SweepError::UnsupportedFormat`] if `hint` names no supported format,
/// otherwise as [`encode`].
pub fn encode_hinted(table: &Table, hint: &str) -> SweepResult<Encoded> {
    let format: TableFormat = hint.parse()?;
    encode(table, format)
}

fn encode_excel_dispatch(table: &Table) -> SweepResult<Vec<u8>> {
    #[cfg(feature = "excel")]
    {
        excel::encode_xlsx(table)
    }

    #[cfg(not(feature = "excel"))]
    {
        let _ = table;
        Err(crate::error::SweepError::UnsupportedFormat {
            format: "excel (enable cargo feature 'excel')".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{encode, encode_hinted};
    use crate::error::ErrorKind;
    use crate::format::TableFormat;
    use crate::types::{Column, Table};

    #[test]
    fn unknown_hint_is_unsupported() {
        let t = Table::new(vec![Column::numeric("a", vec![Some(1.0)])]).unwrap();
        let err = encode_hinted(&t, "json").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedFormat);
    }

    #[test]
    fn encoded_output_reports_format_and_mime() {
        let t = Table::new(vec![Column::numeric("a", vec![Some(1.0)])]).unwrap();
        let out = encode_hinted(&t, "CSV").unwrap();
        assert_eq!(out.format, TableFormat::Csv);
        assert_eq!(out.mime_type, "text/csv");
        assert_eq!(out, encode(&t, TableFormat::Csv).unwrap());
    }
}
