//! Supported table formats.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SweepError;

/// Mime type used for CSV output.
pub const CSV_MIME: &str = "text/csv";
/// Mime type used for Excel (`.xlsx`) output.
pub const EXCEL_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// A tabular file format the pipeline can read and write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableFormat {
    /// Comma-separated values.
    #[default]
    Csv,
    /// Office Open XML workbook (`.xlsx`).
    #[serde(alias = "xlsx")]
    Excel,
}

impl TableFormat {
    /// Parse a format from a file extension (case-insensitive, leading `.` optional).
    ///
    /// Only `csv` and `xlsx` are recognized.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "xlsx" => Some(Self::Excel),
            _ => None,
        }
    }

    /// Canonical file extension, without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Excel => "xlsx",
        }
    }

    /// Mime type of encoded output.
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Csv => CSV_MIME,
            Self::Excel => EXCEL_MIME,
        }
    }
}

impl fmt::Display for TableFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Csv => f.write_str("CSV"),
            Self::Excel => f.write_str("Excel"),
        }
    }
}

/// Parses a user-facing format hint: a format name (`csv`, `excel`) or an extension
/// (`.csv`, `xlsx`), case-insensitively.
impl FromStr for TableFormat {
    type Err = SweepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("excel") {
            return Ok(Self::Excel);
        }
        Self::from_extension(s).ok_or_else(|| SweepError::UnsupportedFormat {
            format: s.to_string(),
        })
    }
}
