//! Core data model types.
//!
//! A [`Table`] is column-major: an ordered list of named [`Column`]s that all hold the same number
//! of rows. Each column carries its type as an explicit tagged variant ([`ColumnData`]), decided
//! once at decode time, so cleaning and encoding never re-infer it.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{SweepError, SweepResult};

/// Logical type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    /// 64-bit floating point values.
    Numeric,
    /// UTF-8 strings. Columns mixing numbers and text are text.
    Text,
}

/// A borrowed view of a single cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell<'a> {
    /// No value.
    Missing,
    /// A numeric value.
    Number(f64),
    /// A text value.
    Text(&'a str),
}

impl Cell<'_> {
    /// Returns `true` for [`Cell::Missing`].
    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }
}

/// An untyped cell as produced by a format reader, before the column type is decided.
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    /// Empty cell or a configured missing marker.
    Missing,
    /// A cell the source format already stores as a number.
    Number(f64),
    /// Any other cell content.
    Text(String),
}

/// Typed cell storage for one column. `None` is a missing cell.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    /// Numeric column.
    Numeric(Vec<Option<f64>>),
    /// Text column.
    Text(Vec<Option<String>>),
}

impl ColumnData {
    /// Decide the column type from raw cells and convert them.
    ///
    /// The column is numeric if every non-missing cell is a number or text that parses as a
    /// finite number; otherwise every present cell is kept as text.
    pub fn infer(raw: Vec<RawCell>) -> Self {
        let numeric = raw.iter().all(|c| match c {
            RawCell::Missing => true,
            RawCell::Number(v) => v.is_finite(),
            RawCell::Text(s) => parse_number(s).is_some(),
        });

        if numeric {
            Self::Numeric(
                raw.into_iter()
                    .map(|c| match c {
                        RawCell::Missing => None,
                        RawCell::Number(v) => Some(v),
                        RawCell::Text(s) => parse_number(&s),
                    })
                    .collect(),
            )
        } else {
            Self::Text(
                raw.into_iter()
                    .map(|c| match c {
                        RawCell::Missing => None,
                        RawCell::Number(v) => Some(format_number(v)),
                        RawCell::Text(s) => Some(s),
                    })
                    .collect(),
            )
        }
    }

    /// Number of cells (rows).
    pub fn len(&self) -> usize {
        match self {
            Self::Numeric(v) => v.len(),
            Self::Text(v) => v.len(),
        }
    }

    /// Returns `true` if the column holds no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The logical type of this storage.
    pub fn column_type(&self) -> ColumnType {
        match self {
            Self::Numeric(_) => ColumnType::Numeric,
            Self::Text(_) => ColumnType::Text,
        }
    }

    /// Returns the cell at `row`, or `None` if out of bounds.
    pub fn get(&self, row: usize) -> Option<Cell<'_>> {
        match self {
            Self::Numeric(v) => v
                .get(row)
                .map(|c| c.map(Cell::Number).unwrap_or(Cell::Missing)),
            Self::Text(v) => v
                .get(row)
                .map(|c| c.as_deref().map(Cell::Text).unwrap_or(Cell::Missing)),
        }
    }

    fn select_rows(&self, rows: &[usize]) -> Self {
        match self {
            Self::Numeric(v) => Self::Numeric(rows.iter().map(|&i| v[i]).collect()),
            Self::Text(v) => Self::Text(rows.iter().map(|&i| v[i].clone()).collect()),
        }
    }
}

/// A single named, typed column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    data: ColumnData,
}

impl Column {
    /// Create a column from already-typed storage.
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// Create a numeric column.
    pub fn numeric(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self::new(name, ColumnData::Numeric(values))
    }

    /// Create a text column.
    pub fn text<S, I>(name: impl Into<String>, values: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = Option<S>>,
    {
        let values = values.into_iter().map(|v| v.map(Into::into)).collect();
        Self::new(name, ColumnData::Text(values))
    }

    /// Column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Typed cell storage.
    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    /// Consume the column, returning its storage.
    pub fn into_data(self) -> ColumnData {
        self.data
    }

    /// Logical column type.
    pub fn column_type(&self) -> ColumnType {
        self.data.column_type()
    }

    /// Returns `true` for numeric columns.
    pub fn is_numeric(&self) -> bool {
        self.column_type() == ColumnType::Numeric
    }

    /// Numeric values, if this is a numeric column.
    pub fn as_numeric(&self) -> Option<&[Option<f64>]> {
        match &self.data {
            ColumnData::Numeric(v) => Some(v),
            ColumnData::Text(_) => None,
        }
    }

    /// Text values, if this is a text column.
    pub fn as_text(&self) -> Option<&[Option<String>]> {
        match &self.data {
            ColumnData::Text(v) => Some(v),
            ColumnData::Numeric(_) => None,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the column holds no rows.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Cell at `row`.
    pub fn get(&self, row: usize) -> Option<Cell<'_>> {
        self.data.get(row)
    }

    /// Number of missing cells.
    pub fn missing_count(&self) -> usize {
        match &self.data {
            ColumnData::Numeric(v) => v.iter().filter(|c| c.is_none()).count(),
            ColumnData::Text(v) => v.iter().filter(|c| c.is_none()).count(),
        }
    }
}

/// In-memory table.
///
/// Invariants: every column has exactly [`Table::row_count`] cells and column names are unique.
/// A table may have zero columns and still a non-zero row count (e.g. after an empty projection).
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    row_count: usize,
}

impl Table {
    /// Create a table from columns. The row count is taken from the first column (zero if none).
    ///
    /// # Errors
    ///
    /// [`SweepError::InvalidTable`] if the columns have different lengths or if two columns share
    /// a name.
    pub fn new(columns: Vec<Column>) -> SweepResult<Self> {
        let row_count = columns.first().map(Column::len).unwrap_or(0);
        let mut seen: HashSet<&str> = HashSet::with_capacity(columns.len());
        for col in &columns {
            if col.len() != row_count {
                return Err(SweepError::invalid_table(format!(
                    "column '{}' has {} rows, expected {row_count}",
                    col.name(),
                    col.len()
                )));
            }
            if !seen.insert(col.name()) {
                return Err(SweepError::invalid_table(format!(
                    "duplicate column name '{}'",
                    col.name()
                )));
            }
        }
        drop(seen);
        Ok(Self { columns, row_count })
    }

    /// A table with no columns and `row_count` rows.
    pub fn empty(row_count: usize) -> Self {
        Self {
            columns: Vec::new(),
            row_count,
        }
    }

    /// Build a table whose invariants the caller has already established.
    pub(crate) fn from_parts(columns: Vec<Column>, row_count: usize) -> Self {
        debug_assert!(columns.iter().all(|c| c.len() == row_count));
        Self { columns, row_count }
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Columns in order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Consume the table, returning its columns.
    pub fn into_columns(self) -> Vec<Column> {
        self.columns
    }

    /// Iterate column names in order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(Column::name)
    }

    /// Returns the index of a column by name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name() == name)
    }

    /// Returns a column by name, if present.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    /// Cells of one row in column order, or `None` if `row` is out of bounds.
    pub fn row(&self, row: usize) -> Option<Vec<Cell<'_>>> {
        if row >= self.row_count {
            return None;
        }
        self.columns.iter().map(|c| c.get(row)).collect()
    }

    /// Iterate rows in order.
    pub fn rows(&self) -> impl Iterator<Item = Vec<Cell<'_>>> {
        (0..self.row_count).map(move |i| {
            self.columns
                .iter()
                .map(|c| c.get(i).unwrap_or(Cell::Missing))
                .collect()
        })
    }

    /// A new table holding the first `n` rows (or all rows if there are fewer).
    pub fn head(&self, n: usize) -> Self {
        let rows: Vec<usize> = (0..n.min(self.row_count)).collect();
        self.select_rows(&rows)
    }

    /// A new table holding the given rows, in the given order.
    ///
    /// Indexes must be in bounds.
    pub(crate) fn select_rows(&self, rows: &[usize]) -> Self {
        let columns = self
            .columns
            .iter()
            .map(|c| Column::new(c.name(), c.data().select_rows(rows)))
            .collect();
        Self::from_parts(columns, rows.len())
    }
}

/// Parse text as a finite number.
pub(crate) fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Locale-independent decimal rendering: `.` separator, no grouping, no exponent.
pub(crate) fn format_number(v: f64) -> String {
    v.to_string()
}
