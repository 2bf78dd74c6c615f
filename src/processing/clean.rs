//! Duplicate removal and missing-value imputation.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::types::{Cell, Column, Table};

use super::{Advised, Advisory};

/// Which cleaning steps to apply. Both are off by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningOptions {
    /// Drop rows that repeat an earlier row.
    pub remove_duplicates: bool,
    /// Replace missing numeric cells with their column mean.
    pub fill_missing_numeric: bool,
}

/// Apply the enabled cleaning steps: duplicates are removed first, then missing values filled.
pub fn clean(table: &Table, options: &CleaningOptions) -> Advised<Table> {
    let deduped;
    let table = if options.remove_duplicates {
        deduped = remove_duplicate_rows(table);
        &deduped
    } else {
        table
    };

    if options.fill_missing_numeric {
        fill_missing_numeric(table)
    } else {
        Advised::plain(table.clone())
    }
}

/// Returns a new [`Table`] without rows that are equal to an earlier row.
///
/// Rows compare equal when every cell is equal; missing equals missing. The first occurrence is
/// kept and survivors keep their original order.
pub fn remove_duplicate_rows(table: &Table) -> Table {
    let mut seen: HashSet<Vec<CellKey<'_>>> = HashSet::with_capacity(table.row_count());
    let keep: Vec<usize> = table
        .rows()
        .enumerate()
        .filter(|(_, row)| seen.insert(row.iter().map(CellKey::from).collect()))
        .map(|(idx, _)| idx)
        .collect();

    if keep.len() == table.row_count() {
        return table.clone();
    }
    table.select_rows(&keep)
}

/// Returns a new [`Table`] whose missing numeric cells are replaced by the column mean.
///
/// - The mean is taken over present values only.
/// - Columns with no present value stay all-missing.
/// - Text columns are untouched.
///
/// If the table has no numeric column the table is returned unchanged with
/// [`Advisory::NoNumericColumns`].
pub fn fill_missing_numeric(table: &Table) -> Advised<Table> {
    if !table.columns().iter().any(Column::is_numeric) {
        return Advised::with(table.clone(), Advisory::NoNumericColumns);
    }

    let columns = table
        .columns()
        .iter()
        .map(|col| match col.as_numeric() {
            Some(values) => match mean(values) {
                Some(m) => Column::numeric(
                    col.name(),
                    values.iter().map(|v| Some(v.unwrap_or(m))).collect(),
                ),
                None => col.clone(),
            },
            None => col.clone(),
        })
        .collect();

    Advised::plain(Table::from_parts(columns, table.row_count()))
}

/// Arithmetic mean of the present values, or `None` if there are none.
///
/// Values are finite, so the mean is too; a sum that overflows is redone over pre-scaled values.
fn mean(values: &[Option<f64>]) -> Option<f64> {
    let (sum, count) = values
        .iter()
        .flatten()
        .fold((0.0_f64, 0usize), |(s, n), v| (s + v, n + 1));
    if count == 0 {
        return None;
    }
    let n = count as f64;
    if sum.is_finite() {
        Some(sum / n)
    } else {
        Some(values.iter().flatten().map(|v| v / n).sum())
    }
}

/// Hashable identity of a cell for duplicate detection.
#[derive(Debug, PartialEq, Eq, Hash)]
enum CellKey<'a> {
    Missing,
    Number(u64),
    Text(&'a str),
}

impl<'a> From<&Cell<'a>> for CellKey<'a> {
    fn from(cell: &Cell<'a>) -> Self {
        match *cell {
            Cell::Missing => Self::Missing,
            // -0.0 and 0.0 compare equal, so they must share a key.
            Cell::Number(v) if v == 0.0 => Self::Number(0.0_f64.to_bits()),
            Cell::Number(v) => Self::Number(v.to_bits()),
            Cell::Text(s) => Self::Text(s),
        }
    }
}
