//! Lazily resolved tables of [`Row`]s.
//!
//! A [`DataFrame`] is a [`Series`] of rows plus an ordered list of column names. Column names are
//! either supplied at construction (and de-duplicated) or inferred from the rows the first time
//! they are asked for.

mod columns;
mod ops;
mod ordered;
mod pivot;
mod relational;

use crate::error::{FrameError, FrameResult};
use crate::index::{Index, IndexKey};
use crate::sequence::{Element, SeqIter, Sequence};
use crate::series::{Series, SeriesConfig};
use crate::value::{Row, Value};
use crate::view::{self, ViewCell};
use std::fmt;
use std::sync::{Arc, OnceLock};

pub use crate::frame::columns::Column;
pub use crate::frame::ordered::OrderedFrame;
pub use crate::frame::pivot::{Aggregator, PivotValues};

pub(crate) use crate::frame::columns::{dedupe_column_names, infer_column_names};

/// Construction input for a [`DataFrame`].
pub struct FrameConfig<I> {
    series: SeriesConfig<I, Row>,
    column_names: Option<Vec<String>>,
    consider_all_rows: bool,
}

impl FrameConfig<usize> {
    /// Row records with a zero-based sequential index.
    pub fn from_rows(rows: impl Into<Sequence<Row>>) -> Self {
        Self::from_series(SeriesConfig::from_values(rows))
    }

    /// Positional rows mapped onto `column_names`. Missing trailing values leave the field absent;
    /// surplus values are dropped.
    pub fn from_positional_rows<N, S>(column_names: N, rows: impl Into<Sequence<Vec<Value>>>) -> Self
    where
        N: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names = dedupe_column_names(column_names);
        let shared: Arc<[String]> = names.clone().into();
        let rows = rows.into().map(move |values, _| {
            shared.iter().cloned().zip(values).collect::<Row>()
        });
        Self::from_rows(rows).with_exact_column_names(names)
    }

    /// One value sequence per column, zipped into rows; stops at the shortest column.
    pub fn from_columns<N, C>(columns: impl IntoIterator<Item = (N, C)>) -> Self
    where
        N: Into<String>,
        C: Into<Sequence<Value>>,
    {
        let (names, sources): (Vec<String>, Vec<Sequence<Value>>) = columns
            .into_iter()
            .map(|(name, values)| (name.into(), values.into()))
            .unzip();
        let names = dedupe_column_names(names);
        let shared: Arc<[String]> = names.clone().into();
        let rows = Sequence::zip_many(sources, move |values| {
            shared.iter().cloned().zip(values).collect::<Row>()
        });
        Self::from_rows(rows).with_exact_column_names(names)
    }
}

impl<I: IndexKey> FrameConfig<I> {
    pub fn from_pairs(pairs: impl Into<Sequence<(I, Row)>>) -> Self {
        Self::from_series(SeriesConfig::from_pairs(pairs))
    }

    pub fn from_index_rows(index: impl Into<Sequence<I>>, rows: impl Into<Sequence<Row>>) -> Self {
        Self::from_series(SeriesConfig::from_index_values(index, rows))
    }

    /// Reuse the content and column names of another frame.
    pub fn from_view(frame: &DataFrame<I>) -> Self {
        Self::from_series(SeriesConfig::from_view(frame.rows()))
            .with_exact_column_names(frame.column_names().to_vec())
    }

    pub(crate) fn from_series(series: SeriesConfig<I, Row>) -> Self {
        Self {
            series,
            column_names: None,
            consider_all_rows: false,
        }
    }

    pub fn with_index<J: IndexKey>(self, index: impl Into<Sequence<J>>) -> FrameConfig<J> {
        FrameConfig {
            series: self.series.with_index(index),
            column_names: self.column_names,
            consider_all_rows: self.consider_all_rows,
        }
    }

    pub fn with_index_from<J, F>(self, selector: F) -> FrameConfig<J>
    where
        J: IndexKey,
        F: Fn(&Row) -> J + Send + Sync + 'static,
    {
        FrameConfig {
            series: self.series.with_index_from(selector),
            column_names: self.column_names,
            consider_all_rows: self.consider_all_rows,
        }
    }

    /// Explicit column names; repeats are renamed `name.1`, `name.2`, … case-insensitively.
    pub fn with_column_names<N, S>(self, names: N) -> Self
    where
        N: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_exact_column_names(dedupe_column_names(names))
    }

    pub(crate) fn with_exact_column_names(mut self, names: Vec<String>) -> Self {
        self.column_names = Some(names);
        self
    }

    /// Infer column names from every row instead of only the first.
    pub fn consider_all_rows(mut self, consider_all_rows: bool) -> Self {
        self.consider_all_rows = consider_all_rows;
        self
    }

    pub fn baked(mut self, baked: bool) -> Self {
        self.series = self.series.baked(baked);
        self
    }
}

pub(crate) struct FrameContent<I> {
    rows: Series<I, Row>,
    column_names: OnceLock<Vec<String>>,
    consider_all_rows: bool,
}

impl<I: IndexKey> FrameContent<I> {
    fn resolve(config: FrameConfig<I>) -> Self {
        Self::new(
            Series::from_config(config.series),
            config.column_names,
            config.consider_all_rows,
        )
    }

    fn new(rows: Series<I, Row>, column_names: Option<Vec<String>>, consider_all_rows: bool) -> Self {
        let cell = OnceLock::new();
        if let Some(names) = column_names {
            let _ = cell.set(names);
        }
        Self {
            rows,
            column_names: cell,
            consider_all_rows,
        }
    }

    fn column_names(&self) -> &[String] {
        self.column_names
            .get_or_init(|| infer_column_names(&self.rows.values(), self.consider_all_rows))
    }
}

/// An indexed table of rows.
pub struct DataFrame<I = usize> {
    view: Arc<ViewCell<FrameContent<I>>>,
}

impl<I> Clone for DataFrame<I> {
    fn clone(&self) -> Self {
        Self {
            view: Arc::clone(&self.view),
        }
    }
}

impl DataFrame<usize> {
    /// Memory-resident frame with a zero-based index; column names come from the first row.
    pub fn new(rows: impl IntoIterator<Item = Row>) -> Self {
        Self::from_rows_series(Series::new(rows), None)
    }

    pub fn from_positional_rows<N, S>(column_names: N, rows: impl IntoIterator<Item = Vec<Value>>) -> Self
    where
        N: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let rows: Vec<Vec<Value>> = rows.into_iter().collect();
        Self::from_config(FrameConfig::from_positional_rows(column_names, rows)).bake()
    }

    pub fn from_columns<N, C>(columns: impl IntoIterator<Item = (N, C)>) -> Self
    where
        N: Into<String>,
        C: Into<Sequence<Value>>,
    {
        Self::from_config(FrameConfig::from_columns(columns))
    }
}

impl<I: IndexKey> DataFrame<I> {
    pub fn from_config(config: FrameConfig<I>) -> Self {
        Self {
            view: view::resolved(FrameContent::resolve(config)),
        }
    }

    /// Defer building the configuration until the frame is first observed.
    pub fn lazy<F>(init: F) -> Self
    where
        F: FnOnce() -> FrameConfig<I> + Send + 'static,
    {
        Self {
            view: view::deferred(move || {
                let content = FrameContent::resolve(init());
                log::debug!("resolved deferred data frame configuration");
                content
            }),
        }
    }

    pub fn empty() -> Self {
        Self::from_rows_series(Series::empty(), Some(Vec::new()))
    }

    /// Memory-resident frame from `(index, row)` pairs.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (I, Row)>) -> Self {
        Self::from_rows_series(Series::from_pairs(pairs), None)
    }

    pub(crate) fn from_rows_series(rows: Series<I, Row>, column_names: Option<Vec<String>>) -> Self {
        Self {
            view: view::resolved(FrameContent::new(rows, column_names, false)),
        }
    }

    fn content(&self) -> &FrameContent<I> {
        &self.view
    }

    /// Build a derived frame whose configuration is computed from this one on first access.
    pub(crate) fn derive<J, F>(&self, build: F) -> DataFrame<J>
    where
        J: IndexKey,
        F: FnOnce(&DataFrame<I>) -> FrameConfig<J> + Send + 'static,
    {
        let parent = self.clone();
        DataFrame::lazy(move || build(&parent))
    }

    /// Derived frame over transformed rows, keeping this frame's column names.
    pub(crate) fn with_rows<J, F>(&self, op: F) -> DataFrame<J>
    where
        J: IndexKey,
        F: FnOnce(&Series<I, Row>) -> Series<J, Row> + Send + 'static,
    {
        self.derive(move |frame| {
            FrameConfig::from_series(SeriesConfig::from_view(&op(frame.rows())))
                .with_exact_column_names(frame.column_names().to_vec())
        })
    }

    /// Derived frame over transformed rows whose column names are inferred from the result.
    pub(crate) fn with_new_rows<J, F>(&self, consider_all_rows: bool, op: F) -> DataFrame<J>
    where
        J: IndexKey,
        F: FnOnce(&Series<I, Row>) -> Series<J, Row> + Send + 'static,
    {
        self.derive(move |frame| {
            FrameConfig::from_series(SeriesConfig::from_view(&op(frame.rows())))
                .consider_all_rows(consider_all_rows)
        })
    }

    /// The rows as a series that resolves this frame only when first observed.
    pub(crate) fn lazy_rows(&self) -> Series<I, Row> {
        let frame = self.clone();
        Series::lazy(move || SeriesConfig::from_view(frame.rows()))
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.view, &other.view)
    }

    pub fn rows(&self) -> &Series<I, Row> {
        &self.content().rows
    }

    pub fn column_names(&self) -> &[String] {
        self.content().column_names()
    }

    pub fn get_index(&self) -> Index<I> {
        self.rows().get_index()
    }

    pub fn values(&self) -> Sequence<Row> {
        self.rows().values()
    }

    pub fn pairs(&self) -> Sequence<(I, Row)> {
        self.rows().pairs()
    }

    pub fn iter(&self) -> SeqIter<'_, Row> {
        self.rows().iter()
    }

    pub fn iter_pairs(&self) -> SeqIter<'_, (I, Row)> {
        self.rows().iter_pairs()
    }

    pub fn to_vec(&self) -> Vec<Row> {
        self.rows().to_vec()
    }

    pub fn to_pairs(&self) -> Vec<(I, Row)> {
        self.rows().to_pairs()
    }

    /// Each row as positional values in column-name order; absent fields become `Null`.
    pub fn to_rows(&self) -> Vec<Vec<Value>> {
        let names = self.column_names();
        self.iter()
            .map(|row| names.iter().map(|name| row.value(name)).collect())
            .collect()
    }

    pub fn count(&self) -> usize {
        self.rows().count()
    }

    pub fn is_empty(&self) -> bool {
        self.rows().is_empty()
    }

    pub fn first(&self) -> FrameResult<Row> {
        self.rows()
            .values()
            .first()
            .ok_or_else(|| FrameError::empty_sequence("first"))
    }

    pub fn last(&self) -> FrameResult<Row> {
        self.rows()
            .values()
            .last()
            .ok_or_else(|| FrameError::empty_sequence("last"))
    }

    pub fn at(&self, index: &I) -> Option<Row> {
        self.rows().at(index)
    }

    pub fn is_baked(&self) -> bool {
        self.rows().is_baked()
    }

    /// Snapshot rows and column names into memory. A baked frame is returned unchanged.
    pub fn bake(&self) -> Self {
        if self.is_baked() {
            return self.clone();
        }
        let rows = self.rows().bake();
        log::debug!(
            "baked data frame of {} rows and {} columns",
            rows.count(),
            self.column_names().len()
        );
        Self::from_rows_series(rows, Some(self.column_names().to_vec()))
    }
}

impl<I: IndexKey> Default for DataFrame<I> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<I: IndexKey> Series<I, Row> {
    /// View a series of rows as a data frame.
    pub fn inflate(&self) -> DataFrame<I> {
        let rows = self.clone();
        DataFrame::lazy(move || FrameConfig::from_series(SeriesConfig::from_view(&rows)))
    }
}

impl<I: IndexKey, V: Element> Series<I, V> {
    /// Turn every value into a row and view the result as a data frame.
    pub fn inflate_with<F>(&self, selector: F) -> DataFrame<I>
    where
        F: Fn(&V) -> Row + Send + Sync + 'static,
    {
        self.map(move |value, _| selector(&value)).inflate()
    }
}

impl<I> fmt::Debug for DataFrame<I>
where
    I: IndexKey + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataFrame")
            .field("columns", &self.column_names())
            .field("rows", self.rows())
            .finish()
    }
}
