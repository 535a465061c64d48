//! Pivot tables and whole-frame summaries.
//!
//! A pivot is nested [`DataFrame::group_by`] over each pivot column, one aggregation pass per leaf
//! group, and a multi-key sort over the pivot columns in declaration order.

use crate::error::{FrameError, FrameResult};
use crate::frame::{DataFrame, FrameConfig};
use crate::index::IndexKey;
use crate::series::Series;
use crate::value::{Row, Value};
use std::fmt;
use std::sync::Arc;

/// Reduces the values of one column within a group to a single value.
pub type Aggregator = Arc<dyn Fn(&Series<usize, Value>) -> Value + Send + Sync>;

#[derive(Clone)]
enum Outputs {
    /// Written to a field named after the value column.
    Single(Aggregator),
    Named(Vec<(String, Aggregator)>),
}

/// Aggregations to run per value column.
#[derive(Clone, Default)]
pub struct PivotValues {
    columns: Vec<(String, Outputs)>,
}

impl PivotValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggregate `column` into an output field of the same name, replacing earlier outputs for it.
    pub fn column<F>(mut self, column: impl Into<String>, aggregator: F) -> Self
    where
        F: Fn(&Series<usize, Value>) -> Value + Send + Sync + 'static,
    {
        let column = column.into();
        let outputs = Outputs::Single(Arc::new(aggregator));
        match self.columns.iter_mut().find(|(name, _)| *name == column) {
            Some(entry) => entry.1 = outputs,
            None => self.columns.push((column, outputs)),
        }
        self
    }

    /// Aggregate `column` into the output field `output`. Repeat to produce several outputs from
    /// one column.
    pub fn output<F>(mut self, column: impl Into<String>, output: impl Into<String>, aggregator: F) -> Self
    where
        F: Fn(&Series<usize, Value>) -> Value + Send + Sync + 'static,
    {
        let column = column.into();
        let named = (output.into(), Arc::new(aggregator) as Aggregator);
        match self.columns.iter_mut().find(|(name, _)| *name == column) {
            Some((_, Outputs::Named(outputs))) => outputs.push(named),
            Some(entry) => entry.1 = Outputs::Named(vec![named]),
            None => self.columns.push((column, Outputs::Named(vec![named]))),
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    fn column_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    fn apply<I: IndexKey>(&self, frame: &DataFrame<I>, row: &mut Row) {
        for (column, outputs) in &self.columns {
            let series = frame.get_series(column).reset_index();
            match outputs {
                Outputs::Single(aggregator) => row.set(column.clone(), aggregator(&series)),
                Outputs::Named(named) => {
                    for (name, aggregator) in named {
                        row.set(name.clone(), aggregator(&series));
                    }
                }
            }
        }
    }
}

impl fmt::Debug for PivotValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (column, outputs) in &self.columns {
            let names: Vec<&str> = match outputs {
                Outputs::Single(_) => vec![column.as_str()],
                Outputs::Named(named) => named.iter().map(|(name, _)| name.as_str()).collect(),
            };
            map.entry(column, &names);
        }
        map.finish()
    }
}

impl<I: IndexKey> DataFrame<I> {
    /// Group by each of `columns` in turn, aggregate every leaf group with `values`, and sort the
    /// result ascending by the pivot columns.
    pub fn pivot(&self, columns: &[&str], values: &PivotValues) -> FrameResult<DataFrame<usize>> {
        if columns.is_empty() {
            return Err(FrameError::invalid_argument(
                "pivot",
                "columns",
                "expected at least one pivot column",
            ));
        }
        if values.is_empty() {
            return Err(FrameError::invalid_argument(
                "pivot",
                "values",
                "expected at least one value column",
            ));
        }
        self.check_columns(columns.iter().copied().chain(values.column_names()))?;

        let frame = self.clone();
        let columns: Vec<String> = columns.iter().map(|c| c.to_string()).collect();
        let values = values.clone();
        Ok(DataFrame::lazy(move || {
            let mut rows = Vec::new();
            pivot_level(&frame, &columns, Row::new(), &values, &mut rows);
            log::debug!("pivot over {:?} produced {} groups", columns, rows.len());

            let table = DataFrame::new(rows);
            let Some((first, rest)) = columns.split_first() else {
                return FrameConfig::from_view(&table);
            };
            let mut ordered = table.order_by(field_value(first.clone()));
            for column in rest {
                ordered = ordered.then_by(field_value(column.clone()));
            }
            FrameConfig::from_view(&ordered.into_frame().reset_index())
        }))
    }

    /// Aggregate whole columns into a single row.
    pub fn summarize(&self, values: &PivotValues) -> FrameResult<Row> {
        self.check_columns(values.column_names())?;
        let mut row = Row::new();
        values.apply(self, &mut row);
        Ok(row)
    }

    fn check_columns<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> FrameResult<()> {
        let known = self.column_names();
        for name in names {
            if !known.iter().any(|column| column == name) {
                return Err(FrameError::column_not_found(name));
            }
        }
        Ok(())
    }
}

fn field_value(column: String) -> impl Fn(&Row) -> Value + Send + Sync + 'static {
    move |row: &Row| row.value(&column)
}

fn pivot_level<I: IndexKey>(
    frame: &DataFrame<I>,
    columns: &[String],
    keys: Row,
    values: &PivotValues,
    out: &mut Vec<Row>,
) {
    let Some((column, rest)) = columns.split_first() else {
        let mut row = keys;
        values.apply(frame, &mut row);
        out.push(row);
        return;
    };
    for group in frame.group_by(field_value(column.clone())).iter() {
        let mut keys = keys.clone();
        if let Ok(first) = group.first() {
            keys.set(column.clone(), first.value(column));
        }
        pivot_level(&group, rest, keys, values, out);
    }
}
