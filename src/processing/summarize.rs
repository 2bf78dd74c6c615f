//! Numeric columns for visualization.

use serde::{Deserialize, Serialize};

use crate::types::{Column, Table};

use super::{Advised, Advisory};

/// Default number of numeric columns handed to a chart.
pub const DEFAULT_CHART_WIDTH: usize = 2;

/// One chartable column: a name and its values, `None` where missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

/// The numeric columns of `table`, in table order.
///
/// An empty result comes with [`Advisory::NoNumericData`].
pub fn numeric_columns(table: &Table) -> Advised<Vec<&Column>> {
    let columns: Vec<&Column> = table.columns().iter().filter(|c| c.is_numeric()).collect();
    if columns.is_empty() {
        Advised::with(columns, Advisory::NoNumericData)
    } else {
        Advised::plain(columns)
    }
}

/// How many of `column_count` numeric columns to show: `min(cap, column_count)`.
pub fn preview_width(column_count: usize, cap: usize) -> usize {
    cap.min(column_count)
}

/// The first [`preview_width`] numeric columns of `table` as chart series.
pub fn chart_series(table: &Table, cap: usize) -> Advised<Vec<ChartSeries>> {
    let Advised { value, advisories } = numeric_columns(table);
    let width = preview_width(value.len(), cap);
    let series = value
        .into_iter()
        .take(width)
        .filter_map(|c| {
            c.as_numeric().map(|values| ChartSeries {
                name: c.name().to_owned(),
                values: values.to_vec(),
            })
        })
        .collect();
    Advised {
        value: series,
        advisories,
    }
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_CHART_WIDTH, chart_series, numeric_columns, preview_width};
    use crate::processing::Advisory;
    use crate::types::{Column, Table};

    fn mixed_table() -> Table {
        Table::new(vec![
            Column::text("name", vec![Some("a"), Some("b")]),
            Column::numeric("x", vec![Some(1.0), None]),
            Column::numeric("y", vec![Some(2.0), Some(3.0)]),
            Column::numeric("z", vec![Some(4.0), Some(5.0)]),
        ]).unwrap()
    }

    #[test]
    fn numeric_columns_preserve_table_order() {
        let t = mixed_table();
        let out = numeric_columns(&t);
        assert!(out.advisories.is_empty());
        let names: Vec<&str> = out.value.iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["x", "y", "z"]);
    }

    #[test]
    fn preview_width_is_capped() {
        assert_eq!(preview_width(3, DEFAULT_CHART_WIDTH), 2);
        assert_eq!(preview_width(1, DEFAULT_CHART_WIDTH), 1);
        assert_eq!(preview_width(0, DEFAULT_CHART_WIDTH), 0);
    }

    #[test]
    fn chart_series_takes_first_columns() {
        let out = chart_series(&mixed_table(), DEFAULT_CHART_WIDTH);
        assert_eq!(out.value.len(), 2);
        assert_eq!(out.value[0].name, "x");
        assert_eq!(out.value[0].values, vec![Some(1.0), None]);
        assert_eq!(out.value[1].name, "y");
    }

    #[test]
    fn no_numeric_columns_is_advisory() {
        let t = Table::new(vec![Column::text("name", vec![Some("a")])]).unwrap();
        let out = chart_series(&t, DEFAULT_CHART_WIDTH);
        assert!(out.value.is_empty());
        assert_eq!(out.advisories, vec![Advisory::NoNumericData]);
    }
}
