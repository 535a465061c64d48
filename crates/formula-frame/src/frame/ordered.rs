use crate::frame::DataFrame;
use crate::index::IndexKey;
use crate::series::OrderedSeries;
use crate::value::Row;
use std::ops::Deref;

/// A sorted [`DataFrame`] that can be refined with further sort keys.
pub struct OrderedFrame<I> {
    parent: DataFrame<I>,
    rows: OrderedSeries<I, Row>,
    sorted: DataFrame<I>,
}

impl<I> Clone for OrderedFrame<I> {
    fn clone(&self) -> Self {
        Self {
            parent: self.parent.clone(),
            rows: self.rows.clone(),
            sorted: self.sorted.clone(),
        }
    }
}

impl<I: IndexKey> OrderedFrame<I> {
    fn new(parent: DataFrame<I>, rows: OrderedSeries<I, Row>) -> Self {
        let sorted = {
            let rows = rows.clone();
            parent.with_rows(move |_| rows.into_series())
        };
        Self {
            parent,
            rows,
            sorted,
        }
    }

    pub fn then_by<K, F>(&self, selector: F) -> Self
    where
        K: Ord + 'static,
        F: Fn(&Row) -> K + Send + Sync + 'static,
    {
        Self::new(self.parent.clone(), self.rows.then_by(selector))
    }

    pub fn then_by_descending<K, F>(&self, selector: F) -> Self
    where
        K: Ord + 'static,
        F: Fn(&Row) -> K + Send + Sync + 'static,
    {
        Self::new(self.parent.clone(), self.rows.then_by_descending(selector))
    }

    pub fn into_frame(self) -> DataFrame<I> {
        self.sorted
    }
}

impl<I> Deref for OrderedFrame<I> {
    type Target = DataFrame<I>;

    fn deref(&self) -> &DataFrame<I> {
        &self.sorted
    }
}

impl<I: IndexKey> DataFrame<I> {
    /// Stable ascending sort of the rows by `selector`.
    pub fn order_by<K, F>(&self, selector: F) -> OrderedFrame<I>
    where
        K: Ord + 'static,
        F: Fn(&Row) -> K + Send + Sync + 'static,
    {
        OrderedFrame::new(self.clone(), self.lazy_rows().order_by(selector))
    }

    pub fn order_by_descending<K, F>(&self, selector: F) -> OrderedFrame<I>
    where
        K: Ord + 'static,
        F: Fn(&Row) -> K + Send + Sync + 'static,
    {
        OrderedFrame::new(self.clone(), self.lazy_rows().order_by_descending(selector))
    }
}
