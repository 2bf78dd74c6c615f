//! In-memory table transformations.
//!
//! The processing layer operates on [`crate::types::Table`] values produced by decoding. Every
//! operation takes the input by reference and returns a new table.
//!
//! Currently implemented:
//!
//! - [`remove_duplicate_rows()`] / [`fill_missing_numeric()`] / [`clean()`]: light cleaning
//! - [`project()`]: ordered column selection
//! - [`numeric_columns()`] / [`chart_series()`]: numeric data for visualization
//!
//! Operations that can turn out to be a no-op because of the input shape report an [`Advisory`]
//! next to their result instead of failing.
//!
//! ## Example: clean → project → summarize
//!
//! ```rust
//! use data_sweeper::processing::{chart_series, clean, project, CleaningOptions};
//! use data_sweeper::types::{Column, Table};
//!
//! let table = Table::new(vec![
//!     Column::text("name", vec![Some("a"), Some("a"), Some("b")]),
//!     Column::numeric("score", vec![Some(1.0), Some(1.0), None]),
//! ]).unwrap();
//!
//! let cleaned = clean(
//!     &table,
//!     &CleaningOptions { remove_duplicates: true, fill_missing_numeric: true },
//! );
//! assert!(cleaned.advisories.is_empty());
//! assert_eq!(cleaned.value.row_count(), 2);
//!
//! let projected = project(&cleaned.value, &["score"]).unwrap();
//! let chart = chart_series(&projected, 2);
//! assert_eq!(chart.value[0].values, vec![Some(1.0), Some(1.0)]);
//! ```

pub mod clean;
pub mod project;
pub mod summarize;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use clean::{CleaningOptions, clean, fill_missing_numeric, remove_duplicate_rows};
pub use project::{ColumnSelection, project, project_selection};
pub use summarize::{ChartSeries, DEFAULT_CHART_WIDTH, chart_series, numeric_columns, preview_width};

/// A non-fatal notice that an operation did nothing because of the shape of its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Advisory {
    /// Missing-value filling was requested but the table has no numeric columns.
    NoNumericColumns,
    /// Visualization was requested but the table has no numeric columns.
    NoNumericData,
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoNumericColumns => {
                f.write_str("no numeric columns found for filling missing values")
            }
            Self::NoNumericData => f.write_str("no numeric data available for visualization"),
        }
    }
}

/// A result together with any advisories raised while producing it.
#[derive(Debug, Clone, PartialEq)]
pub struct Advised<T> {
    /// The operation's output.
    pub value: T,
    /// Advisories, in the order they were raised.
    pub advisories: Vec<Advisory>,
}

impl<T> Advised<T> {
    /// A result without advisories.
    pub fn plain(value: T) -> Self {
        Self {
            value,
            advisories: Vec::new(),
        }
    }

    /// A result with one advisory.
    pub fn with(value: T, advisory: Advisory) -> Self {
        Self {
            value,
            advisories: vec![advisory],
        }
    }
}
