use crate::error::{ensure_positive, FrameError, FrameResult};
use crate::index::IndexKey;
use crate::sequence::{Element, Sequence};
use crate::series::{Series, SeriesConfig};

impl<I: IndexKey, V: Element> Series<I, V> {
    pub fn skip(&self, count: usize) -> Self {
        self.derive(move |s| SeriesConfig::from_pairs(s.pairs().skip(count)))
    }

    pub fn take(&self, count: usize) -> Self {
        self.derive(move |s| SeriesConfig::from_pairs(s.pairs().take(count)))
    }

    pub fn skip_while<P>(&self, predicate: P) -> Self
    where
        P: Fn(&V) -> bool + Send + Sync + 'static,
    {
        self.derive(move |s| {
            SeriesConfig::from_pairs(
                s.pairs()
                    .skip_while(move |(_, value): &(I, V)| predicate(value)),
            )
        })
    }

    pub fn take_while<P>(&self, predicate: P) -> Self
    where
        P: Fn(&V) -> bool + Send + Sync + 'static,
    {
        self.derive(move |s| {
            SeriesConfig::from_pairs(
                s.pairs()
                    .take_while(move |(_, value): &(I, V)| predicate(value)),
            )
        })
    }

    pub fn skip_until<P>(&self, predicate: P) -> Self
    where
        P: Fn(&V) -> bool + Send + Sync + 'static,
    {
        self.skip_while(move |value| !predicate(value))
    }

    pub fn take_until<P>(&self, predicate: P) -> Self
    where
        P: Fn(&V) -> bool + Send + Sync + 'static,
    {
        self.take_while(move |value| !predicate(value))
    }

    pub fn filter<P>(&self, predicate: P) -> Self
    where
        P: Fn(&V) -> bool + Send + Sync + 'static,
    {
        self.derive(move |s| {
            SeriesConfig::from_pairs(
                s.pairs()
                    .filter(move |(_, value): &(I, V)| predicate(value)),
            )
        })
    }

    /// Transform each value; `selector` receives the value and its position. The index is kept.
    pub fn map<U, F>(&self, selector: F) -> Series<I, U>
    where
        U: Element,
        F: Fn(V, usize) -> U + Send + Sync + 'static,
    {
        self.derive(move |s| {
            SeriesConfig::from_pairs(
                s.pairs()
                    .map(move |(index, value), pos| (index, selector(value, pos))),
            )
        })
    }

    /// Expand each value into zero or more values, each carrying the originating index.
    pub fn flat_map<U, F, It>(&self, selector: F) -> Series<I, U>
    where
        U: Element,
        F: Fn(V, usize) -> It + Send + Sync + 'static,
        It: IntoIterator<Item = U> + 'static,
        It::IntoIter: 'static,
    {
        self.derive(move |s| {
            SeriesConfig::from_pairs(s.pairs().flat_map(move |(index, value), pos| {
                selector(value, pos)
                    .into_iter()
                    .map(move |item| (index.clone(), item))
            }))
        })
    }

    /// The first `count` values; a negative count keeps all but the last `|count|`.
    pub fn head(&self, count: isize) -> Self {
        if count >= 0 {
            return self.take(count.unsigned_abs());
        }
        self.derive(move |s| {
            let keep = s.count().saturating_sub(count.unsigned_abs());
            SeriesConfig::from_pairs(s.pairs().take(keep))
        })
    }

    /// The last `count` values; a negative count keeps all but the first `|count|`.
    pub fn tail(&self, count: isize) -> Self {
        if count < 0 {
            return self.skip(count.unsigned_abs());
        }
        self.derive(move |s| {
            let drop = s.count().saturating_sub(count.unsigned_abs());
            SeriesConfig::from_pairs(s.pairs().skip(drop))
        })
    }

    pub fn reverse(&self) -> Self {
        self.derive(|s| SeriesConfig::from_pairs(s.pairs().reverse()))
    }

    /// This series followed by each of `others`, in argument order.
    pub fn concat(&self, others: &[Series<I, V>]) -> Self {
        let mut all = Vec::with_capacity(others.len() + 1);
        all.push(self.clone());
        all.extend(others.iter().cloned());
        Self::concat_all(all)
    }

    pub fn concat_all(series: Vec<Series<I, V>>) -> Self {
        Series::lazy(move || {
            SeriesConfig::from_pairs(Sequence::concat_all(
                series.iter().map(Series::pairs).collect(),
            ))
        })
    }

    /// Pair values position by position with `other`; stops at the shorter series.
    pub fn zip<J, U, R, F>(&self, other: &Series<J, U>, combiner: F) -> Series<I, R>
    where
        J: IndexKey,
        U: Element,
        R: Element,
        F: Fn(V, U) -> R + Send + Sync + 'static,
    {
        let other = other.clone();
        self.derive(move |s| {
            SeriesConfig::from_pairs(
                s.pairs()
                    .zip(&other.values(), move |(index, a), b| (index, combiner(a, b))),
            )
        })
    }

    /// Combine this series with `others` position by position; the index comes from `self`.
    pub fn zip_many<R, F>(&self, others: &[Series<I, V>], combiner: F) -> Series<I, R>
    where
        R: Element,
        F: Fn(Vec<V>) -> R + Send + Sync + 'static,
    {
        let others = others.to_vec();
        self.derive(move |s| {
            let mut sources = Vec::with_capacity(others.len() + 1);
            sources.push(s.values());
            sources.extend(others.iter().map(Series::values));
            let zipped = Sequence::zip_many(sources, combiner);
            SeriesConfig::from_pairs(
                s.get_index()
                    .values()
                    .zip(&zipped, |index, value| (index, value)),
            )
        })
    }

    /// Non-overlapping windows of exactly `period` values; a trailing partial window is dropped.
    pub fn window(&self, period: usize) -> FrameResult<Series<usize, Series<I, V>>> {
        ensure_positive("window", "period", period)?;
        Ok(self.derive(move |s| {
            SeriesConfig::from_values(
                s.pairs()
                    .fixed_windows(period)
                    .map(|chunk, _| Series::from_pairs(chunk)),
            )
        }))
    }

    /// Overlapping windows of exactly `period` values, advancing one value per step.
    pub fn rolling_window(&self, period: usize) -> FrameResult<Series<usize, Series<I, V>>> {
        ensure_positive("rolling_window", "period", period)?;
        Ok(self.derive(move |s| {
            SeriesConfig::from_values(
                s.pairs()
                    .rolling_windows(period)
                    .map(|chunk, _| Series::from_pairs(chunk)),
            )
        }))
    }

    /// Runs of adjacent values for which `comparer(previous, current)` holds.
    pub fn variable_window<F>(&self, comparer: F) -> Series<usize, Series<I, V>>
    where
        F: Fn(&V, &V) -> bool + Send + Sync + 'static,
    {
        self.derive(move |s| {
            SeriesConfig::from_values(
                s.pairs()
                    .variable_window(move |a: &(I, V), b: &(I, V)| comparer(&a.1, &b.1))
                    .map(|chunk, _| Series::from_pairs(chunk)),
            )
        })
    }

    /// Collapse adjacent runs with equal keys, keeping the last pair of each run.
    pub fn sequential_distinct_by<K, F>(&self, selector: F) -> Self
    where
        K: PartialEq,
        F: Fn(&V) -> K + Send + Sync + 'static,
    {
        self.derive(move |s| {
            SeriesConfig::from_pairs(
                s.pairs()
                    .variable_window(move |a: &(I, V), b: &(I, V)| selector(&a.1) == selector(&b.1))
                    .flat_map(|run, _| run.into_iter().last()),
            )
        })
    }

    /// Values from the first index not less than `index`.
    pub fn start_at(&self, index: I) -> FrameResult<Self> {
        let order = self.get_index().order()?;
        Ok(self.derive(move |s| {
            SeriesConfig::from_pairs(
                s.pairs()
                    .skip_while(move |(key, _): &(I, V)| order.less_than(key, &index)),
            )
        }))
    }

    /// Values up to and including `index`.
    pub fn end_at(&self, index: I) -> FrameResult<Self> {
        let order = self.get_index().order()?;
        Ok(self.derive(move |s| {
            SeriesConfig::from_pairs(
                s.pairs()
                    .take_while(move |(key, _): &(I, V)| order.less_than_or_equal_to(key, &index)),
            )
        }))
    }

    /// Values strictly before `index`.
    pub fn before(&self, index: I) -> FrameResult<Self> {
        let order = self.get_index().order()?;
        Ok(self.derive(move |s| {
            SeriesConfig::from_pairs(
                s.pairs()
                    .take_while(move |(key, _): &(I, V)| order.less_than(key, &index)),
            )
        }))
    }

    /// Values strictly after `index`.
    pub fn after(&self, index: I) -> FrameResult<Self> {
        let order = self.get_index().order()?;
        Ok(self.derive(move |s| {
            SeriesConfig::from_pairs(
                s.pairs()
                    .skip_while(move |(key, _): &(I, V)| order.less_than_or_equal_to(key, &index)),
            )
        }))
    }

    pub fn between(&self, start: I, end: I) -> FrameResult<Self> {
        self.start_at(start)?.end_at(end)
    }

    /// Replace the index; index and values are zipped, so the shorter of the two wins.
    pub fn with_index<J: IndexKey>(&self, index: impl Into<Sequence<J>>) -> Series<J, V> {
        let index = index.into();
        self.derive(move |s| SeriesConfig::from_view(s).with_index(index))
    }

    pub fn with_index_from<J, F>(&self, selector: F) -> Series<J, V>
    where
        J: IndexKey,
        F: Fn(&V) -> J + Send + Sync + 'static,
    {
        self.derive(move |s| SeriesConfig::from_view(s).with_index_from(selector))
    }

    /// Same values with a fresh zero-based index.
    pub fn reset_index(&self) -> Series<usize, V> {
        self.derive(|s| SeriesConfig::from_values(s.values()))
    }

    pub fn insert_pair(&self, pair: (I, V)) -> Self {
        self.derive(move |s| {
            SeriesConfig::from_pairs(Sequence::from_vec(vec![pair]).chain(&s.pairs()))
        })
    }

    pub fn append_pair(&self, pair: (I, V)) -> Self {
        self.derive(move |s| {
            SeriesConfig::from_pairs(s.pairs().chain(&Sequence::from_vec(vec![pair])))
        })
    }

    /// `default` when this series has no values, otherwise this series' content.
    pub fn default_if_empty(&self, default: &Series<I, V>) -> Self {
        let default = default.clone();
        self.derive(move |s| {
            if s.is_empty() {
                SeriesConfig::from_view(&default)
            } else {
                SeriesConfig::from_view(s)
            }
        })
    }

    pub fn any<P>(&self, predicate: P) -> bool
    where
        P: Fn(&V) -> bool,
    {
        self.iter().any(|value| predicate(&value))
    }

    /// Whether every value satisfies `predicate`; an empty series yields `false`.
    pub fn all<P>(&self, predicate: P) -> bool
    where
        P: Fn(&V) -> bool,
    {
        let mut seen = false;
        for value in self.iter() {
            if !predicate(&value) {
                return false;
            }
            seen = true;
        }
        seen
    }

    pub fn none<P>(&self, predicate: P) -> bool
    where
        P: Fn(&V) -> bool,
    {
        !self.any(predicate)
    }

    /// Fold the values into `seed`, front to back.
    pub fn aggregate<A, F>(&self, seed: A, folder: F) -> A
    where
        F: Fn(A, V) -> A,
    {
        self.iter().fold(seed, folder)
    }

    /// Fold the values using the first as the seed.
    pub fn reduce<F>(&self, folder: F) -> FrameResult<V>
    where
        F: Fn(V, V) -> V,
    {
        self.iter()
            .reduce(folder)
            .ok_or_else(|| FrameError::empty_sequence("reduce"))
    }
}

impl<I: IndexKey, V: Element + PartialEq> Series<I, V> {
    /// Collapse adjacent runs of equal values, keeping the last of each run.
    pub fn sequential_distinct(&self) -> Self {
        self.sequential_distinct_by(|value| value.clone())
    }
}
