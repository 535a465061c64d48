use crate::error::FrameResult;
use crate::frame::ops::union_column_names;
use crate::frame::{DataFrame, FrameConfig};
use crate::index::{IndexKey, IndexOrder, IndexType};
use crate::series::{Series, SeriesConfig};
use crate::value::Row;
use std::collections::HashMap;
use std::hash::Hash;

impl<I: IndexKey> DataFrame<I> {
    /// First row per distinct key, in original order.
    pub fn distinct_by<K, F>(&self, selector: F) -> Self
    where
        K: Eq + Hash + 'static,
        F: Fn(&Row) -> K + Send + Sync + 'static,
    {
        self.with_rows(move |rows| rows.distinct_by(selector))
    }

    pub fn distinct(&self) -> Self {
        self.with_rows(|rows| rows.distinct())
    }

    /// One frame per distinct key, ordered by first appearance; groups keep their row indices.
    pub fn group_by<K, F>(&self, selector: F) -> Series<usize, DataFrame<I>>
    where
        K: Eq + Hash,
        F: Fn(&Row) -> K + Send + Sync + 'static,
    {
        let frame = self.clone();
        Series::lazy(move || {
            let names = frame.column_names().to_vec();
            let groups = frame.rows().group_by(selector).map(move |group, _| {
                DataFrame::from_rows_series(group, Some(names.clone()))
            });
            SeriesConfig::from_view(&groups)
        })
    }

    /// Frames of adjacent rows sharing a key.
    pub fn group_sequential_by<K, F>(&self, selector: F) -> Series<usize, DataFrame<I>>
    where
        K: PartialEq,
        F: Fn(&Row) -> K + Send + Sync + 'static,
    {
        self.variable_window(move |a, b| selector(a) == selector(b))
    }

    pub fn union_by<K, F>(&self, other: &DataFrame<I>, selector: F) -> Self
    where
        K: Eq + Hash + 'static,
        F: Fn(&Row) -> K + Send + Sync + 'static,
    {
        self.concat(std::slice::from_ref(other)).distinct_by(selector)
    }

    pub fn union(&self, other: &DataFrame<I>) -> Self {
        self.concat(std::slice::from_ref(other)).distinct()
    }

    /// Rows whose key matches at least one row of `inner`.
    pub fn intersection_by<J, K, OK, IK>(&self, inner: &DataFrame<J>, outer_key: OK, inner_key: IK) -> Self
    where
        J: IndexKey,
        K: Eq + Hash + Send + Sync + 'static,
        OK: Fn(&Row) -> K + Send + Sync + 'static,
        IK: Fn(&Row) -> K + Send + 'static,
    {
        let inner = inner.clone();
        self.with_rows(move |rows| rows.intersection_by(inner.rows(), outer_key, inner_key))
    }

    pub fn intersection<J: IndexKey>(&self, inner: &DataFrame<J>) -> Self {
        self.intersection_by(inner, Row::clone, Row::clone)
    }

    /// Rows whose key matches no row of `inner`.
    pub fn except_by<J, K, OK, IK>(&self, inner: &DataFrame<J>, outer_key: OK, inner_key: IK) -> Self
    where
        J: IndexKey,
        K: Eq + Hash + Send + Sync + 'static,
        OK: Fn(&Row) -> K + Send + Sync + 'static,
        IK: Fn(&Row) -> K + Send + 'static,
    {
        let inner = inner.clone();
        self.with_rows(move |rows| rows.except_by(inner.rows(), outer_key, inner_key))
    }

    pub fn except<J: IndexKey>(&self, inner: &DataFrame<J>) -> Self {
        self.except_by(inner, Row::clone, Row::clone)
    }

    /// Inner join producing one row per matching pair; column names are inferred from all rows.
    pub fn join<J, K, OK, IK, RS>(
        &self,
        inner: &DataFrame<J>,
        outer_key: OK,
        inner_key: IK,
        result: RS,
    ) -> DataFrame<usize>
    where
        J: IndexKey,
        K: Eq + Hash + Send + Sync + 'static,
        OK: Fn(&Row) -> K + Send + Sync + 'static,
        IK: Fn(&Row) -> K + Send + 'static,
        RS: Fn(&Row, &Row) -> Row + Send + Sync + 'static,
    {
        let inner = inner.clone();
        self.with_new_rows(true, move |rows| {
            rows.join(inner.rows(), outer_key, inner_key, result)
        })
    }

    /// Full outer join: outer-only rows, then matches, then inner-only rows.
    pub fn join_outer<J, K, OK, IK, RS>(
        &self,
        inner: &DataFrame<J>,
        outer_key: OK,
        inner_key: IK,
        result: RS,
    ) -> DataFrame<usize>
    where
        J: IndexKey,
        K: Eq + Hash + Send + Sync + 'static,
        OK: Fn(&Row) -> K + Send + Sync + 'static,
        IK: Fn(&Row) -> K + Send + Sync + 'static,
        RS: Fn(Option<&Row>, Option<&Row>) -> Row + Send + Sync + 'static,
    {
        let inner = inner.clone();
        self.with_new_rows(true, move |rows| {
            rows.join_outer(inner.rows(), outer_key, inner_key, result)
        })
    }

    pub fn join_outer_left<J, K, OK, IK, RS>(
        &self,
        inner: &DataFrame<J>,
        outer_key: OK,
        inner_key: IK,
        result: RS,
    ) -> DataFrame<usize>
    where
        J: IndexKey,
        K: Eq + Hash + Send + Sync + 'static,
        OK: Fn(&Row) -> K + Send + Sync + 'static,
        IK: Fn(&Row) -> K + Send + Sync + 'static,
        RS: Fn(Option<&Row>, Option<&Row>) -> Row + Send + Sync + 'static,
    {
        let inner = inner.clone();
        self.with_new_rows(true, move |rows| {
            rows.join_outer_left(inner.rows(), outer_key, inner_key, result)
        })
    }

    pub fn join_outer_right<J, K, OK, IK, RS>(
        &self,
        inner: &DataFrame<J>,
        outer_key: OK,
        inner_key: IK,
        result: RS,
    ) -> DataFrame<usize>
    where
        J: IndexKey,
        K: Eq + Hash + Send + Sync + 'static,
        OK: Fn(&Row) -> K + Send + Sync + 'static,
        IK: Fn(&Row) -> K + Send + Sync + 'static,
        RS: Fn(Option<&Row>, Option<&Row>) -> Row + Send + Sync + 'static,
    {
        let inner = inner.clone();
        self.with_new_rows(true, move |rows| {
            rows.join_outer_right(inner.rows(), outer_key, inner_key, result)
        })
    }
}

impl<I: IndexKey + Eq + Hash> DataFrame<I> {
    /// [`merge_all`](Self::merge_all) of this frame followed by `others`.
    pub fn merge(&self, others: &[DataFrame<I>]) -> FrameResult<Self> {
        let mut frames = Vec::with_capacity(others.len() + 1);
        frames.push(self.clone());
        frames.extend(others.iter().cloned());
        Self::merge_all(frames)
    }

    /// One row per distinct index, ascending by index.
    ///
    /// Rows sharing an index are merged field by field; later frames win on conflicting fields.
    /// The index ordering comes from the first frame with a present index and is checked when
    /// called, so a boolean index fails here with `UnsupportedIndexType`. That check resolves each
    /// frame up to its first present index.
    pub fn merge_all(frames: Vec<DataFrame<I>>) -> FrameResult<Self> {
        let index_type = frames
            .iter()
            .map(|frame| frame.get_index().index_type().clone())
            .find(|index_type| *index_type != IndexType::Empty)
            .unwrap_or(IndexType::Empty);
        let index_order = IndexOrder::new(index_type)?;

        Ok(DataFrame::lazy(move || {
            let mut order: Vec<I> = Vec::new();
            let mut merged: HashMap<I, Row> = HashMap::new();
            for frame in &frames {
                for (index, row) in frame.iter_pairs() {
                    match merged.get_mut(&index) {
                        Some(existing) => existing.merge(&row),
                        None => {
                            order.push(index.clone());
                            merged.insert(index, row);
                        }
                    }
                }
            }

            order.sort_by(|a, b| index_order.compare(a, b));
            let pairs: Vec<(I, Row)> = order
                .into_iter()
                .filter_map(|index| merged.remove(&index).map(|row| (index, row)))
                .collect();
            log::debug!("merged {} frames into {} rows", frames.len(), pairs.len());

            FrameConfig::from_pairs(pairs).with_exact_column_names(union_column_names(&frames))
        }))
    }
}
