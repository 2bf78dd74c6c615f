//! Column projection.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{SweepError, SweepResult};
use crate::types::Table;

/// The user's column choice. `All` is the state before any explicit selection.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnSelection {
    /// Keep every column in table order.
    #[default]
    All,
    /// Keep exactly these columns, in this order.
    Columns(Vec<String>),
}

impl ColumnSelection {
    /// An explicit selection.
    pub fn columns<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        Self::Columns(names.into_iter().map(Into::into).collect())
    }
}

/// Returns a new [`Table`] holding only `columns`, in the order given.
///
/// - An empty selection yields a table without columns but with the same row count.
/// - A name listed more than once is kept at its first position only.
///
/// # Errors
///
/// [`SweepError::UnknownColumn`] for the first requested name the table does not have.
pub fn project<S: AsRef<str>>(table: &Table, columns: &[S]) -> SweepResult<Table> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(columns.len());
    let mut out = Vec::with_capacity(columns.len());
    for name in columns {
        let name = name.as_ref();
        let column = table.column(name).ok_or_else(|| SweepError::UnknownColumn {
            name: name.to_owned(),
        })?;
        if seen.insert(name) {
            out.push(column.clone());
        }
    }
    Ok(Table::from_parts(out, table.row_count()))
}

/// Apply a [`ColumnSelection`]; [`ColumnSelection::All`] returns the table unchanged.
///
/// # Errors
///
/// As [`project`].
pub fn project_selection(table: &Table, selection: &ColumnSelection) -> SweepResult<Table> {
    match selection {
        ColumnSelection::All => Ok(table.clone()),
        ColumnSelection::Columns(names) => project(table, names.as_slice()),
    }
}
