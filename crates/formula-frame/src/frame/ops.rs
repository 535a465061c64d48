use crate::error::{ensure_positive, FrameResult};
use crate::frame::{DataFrame, FrameConfig};
use crate::index::IndexKey;
use crate::sequence::Sequence;
use crate::series::{Series, SeriesConfig};
use crate::value::Row;

impl<I: IndexKey> DataFrame<I> {
    pub fn skip(&self, count: usize) -> Self {
        self.with_rows(move |rows| rows.skip(count))
    }

    pub fn take(&self, count: usize) -> Self {
        self.with_rows(move |rows| rows.take(count))
    }

    pub fn skip_while<P>(&self, predicate: P) -> Self
    where
        P: Fn(&Row) -> bool + Send + Sync + 'static,
    {
        self.with_rows(move |rows| rows.skip_while(predicate))
    }

    pub fn take_while<P>(&self, predicate: P) -> Self
    where
        P: Fn(&Row) -> bool + Send + Sync + 'static,
    {
        self.with_rows(move |rows| rows.take_while(predicate))
    }

    pub fn skip_until<P>(&self, predicate: P) -> Self
    where
        P: Fn(&Row) -> bool + Send + Sync + 'static,
    {
        self.with_rows(move |rows| rows.skip_until(predicate))
    }

    pub fn take_until<P>(&self, predicate: P) -> Self
    where
        P: Fn(&Row) -> bool + Send + Sync + 'static,
    {
        self.with_rows(move |rows| rows.take_until(predicate))
    }

    pub fn filter<P>(&self, predicate: P) -> Self
    where
        P: Fn(&Row) -> bool + Send + Sync + 'static,
    {
        self.with_rows(move |rows| rows.filter(predicate))
    }

    /// Transform each row; column names are inferred from the transformed rows.
    pub fn map<F>(&self, selector: F) -> Self
    where
        F: Fn(Row, usize) -> Row + Send + Sync + 'static,
    {
        self.with_new_rows(false, move |rows| rows.map(selector))
    }

    /// Expand each row into zero or more rows carrying the originating index.
    pub fn select_many<F, It>(&self, selector: F) -> Self
    where
        F: Fn(Row, usize) -> It + Send + Sync + 'static,
        It: IntoIterator<Item = Row> + 'static,
        It::IntoIter: 'static,
    {
        self.with_new_rows(false, move |rows| rows.flat_map(selector))
    }

    pub fn head(&self, count: isize) -> Self {
        self.with_rows(move |rows| rows.head(count))
    }

    pub fn tail(&self, count: isize) -> Self {
        self.with_rows(move |rows| rows.tail(count))
    }

    pub fn reverse(&self) -> Self {
        self.with_rows(|rows| rows.reverse())
    }

    /// Rows of this frame followed by the rows of `others`; column names are unioned in order.
    pub fn concat(&self, others: &[DataFrame<I>]) -> Self {
        let mut frames = Vec::with_capacity(others.len() + 1);
        frames.push(self.clone());
        frames.extend(others.iter().cloned());
        Self::concat_all(frames)
    }

    pub fn concat_all(frames: Vec<DataFrame<I>>) -> Self {
        DataFrame::lazy(move || {
            let rows = Series::concat_all(frames.iter().map(|frame| frame.rows().clone()).collect());
            FrameConfig::from_series(SeriesConfig::from_view(&rows))
                .with_exact_column_names(union_column_names(&frames))
        })
    }

    /// Combine rows position by position with `other`; stops at the shorter frame.
    pub fn zip<J, F>(&self, other: &DataFrame<J>, combiner: F) -> Self
    where
        J: IndexKey,
        F: Fn(Row, Row) -> Row + Send + Sync + 'static,
    {
        let other = other.clone();
        self.with_new_rows(false, move |rows| rows.zip(other.rows(), combiner))
    }

    pub fn window(&self, period: usize) -> FrameResult<Series<usize, DataFrame<I>>> {
        ensure_positive("window", "period", period)?;
        Ok(self.split_rows(move |pairs| pairs.fixed_windows(period)))
    }

    pub fn rolling_window(&self, period: usize) -> FrameResult<Series<usize, DataFrame<I>>> {
        ensure_positive("rolling_window", "period", period)?;
        Ok(self.split_rows(move |pairs| pairs.rolling_windows(period)))
    }

    pub fn variable_window<F>(&self, comparer: F) -> Series<usize, DataFrame<I>>
    where
        F: Fn(&Row, &Row) -> bool + Send + Sync + 'static,
    {
        self.split_rows(move |pairs| {
            pairs.variable_window(move |a: &(I, Row), b: &(I, Row)| comparer(&a.1, &b.1))
        })
    }

    /// Chunks of rows as frames that share this frame's column names.
    pub(crate) fn split_rows<F>(&self, split: F) -> Series<usize, DataFrame<I>>
    where
        F: FnOnce(Sequence<(I, Row)>) -> Sequence<Vec<(I, Row)>> + Send + 'static,
    {
        let frame = self.clone();
        Series::lazy(move || {
            let names = frame.column_names().to_vec();
            let chunks = split(frame.pairs()).map(move |chunk, _| {
                DataFrame::from_rows_series(Series::from_pairs(chunk), Some(names.clone()))
            });
            SeriesConfig::from_values(chunks)
        })
    }

    pub fn sequential_distinct_by<K, F>(&self, selector: F) -> Self
    where
        K: PartialEq,
        F: Fn(&Row) -> K + Send + Sync + 'static,
    {
        self.with_rows(move |rows| rows.sequential_distinct_by(selector))
    }

    pub fn sequential_distinct(&self) -> Self {
        self.with_rows(|rows| rows.sequential_distinct())
    }

    /// Rows from the first index not less than `index`.
    ///
    /// The index ordering is checked when called, which resolves a deferred frame and reads its
    /// index up to the first present value. Rows are still produced lazily.
    pub fn start_at(&self, index: I) -> FrameResult<Self> {
        let rows = self.rows().start_at(index)?;
        Ok(self.with_rows(move |_| rows))
    }

    /// Rows up to and including the last index not greater than `index`. Checks the index
    /// ordering when called, like [`start_at`](Self::start_at).
    pub fn end_at(&self, index: I) -> FrameResult<Self> {
        let rows = self.rows().end_at(index)?;
        Ok(self.with_rows(move |_| rows))
    }

    /// Rows whose index is less than `index`. Checks the index ordering when called.
    pub fn before(&self, index: I) -> FrameResult<Self> {
        let rows = self.rows().before(index)?;
        Ok(self.with_rows(move |_| rows))
    }

    /// Rows whose index is greater than `index`. Checks the index ordering when called.
    pub fn after(&self, index: I) -> FrameResult<Self> {
        let rows = self.rows().after(index)?;
        Ok(self.with_rows(move |_| rows))
    }

    /// Rows with `start <= index <= end`. Checks the index ordering when called.
    pub fn between(&self, start: I, end: I) -> FrameResult<Self> {
        let rows = self.rows().between(start, end)?;
        Ok(self.with_rows(move |_| rows))
    }

    pub fn insert_pair(&self, pair: (I, Row)) -> Self {
        self.with_new_rows(true, move |rows| rows.insert_pair(pair))
    }

    pub fn append_pair(&self, pair: (I, Row)) -> Self {
        self.with_new_rows(true, move |rows| rows.append_pair(pair))
    }

    pub fn default_if_empty(&self, default: &DataFrame<I>) -> Self {
        let default = default.clone();
        self.derive(move |frame| {
            if frame.is_empty() {
                FrameConfig::from_view(&default)
            } else {
                FrameConfig::from_view(frame)
            }
        })
    }

    pub fn any<P: Fn(&Row) -> bool>(&self, predicate: P) -> bool {
        self.rows().any(predicate)
    }

    /// Whether every row satisfies `predicate`; an empty frame yields `false`.
    pub fn all<P: Fn(&Row) -> bool>(&self, predicate: P) -> bool {
        self.rows().all(predicate)
    }

    pub fn none<P: Fn(&Row) -> bool>(&self, predicate: P) -> bool {
        self.rows().none(predicate)
    }

    pub fn aggregate<A, F>(&self, seed: A, folder: F) -> A
    where
        F: Fn(A, Row) -> A,
    {
        self.rows().aggregate(seed, folder)
    }
}

/// Column names of every frame, first-seen order, without repeats.
pub(crate) fn union_column_names<I: IndexKey>(frames: &[DataFrame<I>]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for frame in frames {
        for name in frame.column_names() {
            if !names.contains(name) {
                names.push(name.clone());
            }
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn people() -> DataFrame {
        DataFrame::new(vec![
            Row::from([("name", Value::from("ann")), ("age", Value::from(31))]),
            Row::from([("name", Value::from("bob")), ("age", Value::from(25))]),
            Row::from([("name", Value::from("cy")), ("age", Value::from(40))]),
        ])
    }

    #[test]
    fn filtering_keeps_column_names_and_index() {
        let older = people().filter(|row| row.value("age") > Value::from(30));
        assert_eq!(older.column_names(), ["name", "age"]);
        assert_eq!(older.get_index().to_vec(), vec![0, 2]);
    }

    #[test]
    fn map_infers_new_column_names() {
        let tagged = people()
            .map(|row, pos| Row::new().with("pos", pos).with("who", row.value("name")));
        assert_eq!(tagged.column_names(), ["pos", "who"]);
    }

    #[test]
    fn windows_share_the_parent_columns() {
        let windows = people().window(2).unwrap();
        assert_eq!(windows.count(), 1);
        let first = windows.first().unwrap();
        assert_eq!(first.column_names(), ["name", "age"]);
        assert_eq!(first.count(), 2);
    }

    #[test]
    fn concat_unions_column_names() {
        let extra = DataFrame::new(vec![Row::from([
            ("name", Value::from("dee")),
            ("city", Value::from("x")),
        ])]);
        let all = people().concat(&[extra]);
        assert_eq!(all.column_names(), ["name", "age", "city"]);
        assert_eq!(all.count(), 4);
    }
}
