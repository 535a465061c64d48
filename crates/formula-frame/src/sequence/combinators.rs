use crate::sequence::{Element, SeqIter, Sequence, Source};
use crate::sort::{compare_by_specs, SortSpec};
use std::collections::HashSet;
use std::hash::Hash;

/// Projection used to run value-level sort specs and selectors over `(index, value)` pairs.
pub fn pair_value<I, V>(pair: &(I, V)) -> &V {
    &pair.1
}

struct Select<T, F> {
    source: Sequence<T>,
    selector: F,
}

impl<T, U, F> Source<U> for Select<T, F>
where
    T: Element,
    U: Element,
    F: Fn(T, usize) -> U + Send + Sync,
{
    fn iter(&self) -> SeqIter<'_, U> {
        Box::new(
            self.source
                .iter()
                .enumerate()
                .map(move |(pos, item)| (self.selector)(item, pos)),
        )
    }
}

struct SelectMany<T, F> {
    source: Sequence<T>,
    selector: F,
}

impl<T, U, F, It> Source<U> for SelectMany<T, F>
where
    T: Element,
    U: Element,
    F: Fn(T, usize) -> It + Send + Sync,
    It: IntoIterator<Item = U> + 'static,
    It::IntoIter: 'static,
{
    fn iter(&self) -> SeqIter<'_, U> {
        Box::new(
            self.source
                .iter()
                .enumerate()
                .flat_map(move |(pos, item)| (self.selector)(item, pos)),
        )
    }
}

struct Filter<T, P> {
    source: Sequence<T>,
    predicate: P,
}

impl<T, P> Source<T> for Filter<T, P>
where
    T: Element,
    P: Fn(&T) -> bool + Send + Sync,
{
    fn iter(&self) -> SeqIter<'_, T> {
        Box::new(self.source.iter().filter(move |item| (self.predicate)(item)))
    }
}

struct Take<T> {
    source: Sequence<T>,
    count: usize,
}

impl<T: Element> Source<T> for Take<T> {
    fn iter(&self) -> SeqIter<'_, T> {
        match self.source.as_slice() {
            Some(items) => Box::new(items[..self.count.min(items.len())].iter().cloned()),
            None => Box::new(self.source.iter().take(self.count)),
        }
    }
}

struct Skip<T> {
    source: Sequence<T>,
    count: usize,
}

impl<T: Element> Source<T> for Skip<T> {
    fn iter(&self) -> SeqIter<'_, T> {
        match self.source.as_slice() {
            Some(items) => Box::new(items[self.count.min(items.len())..].iter().cloned()),
            None => Box::new(self.source.iter().skip(self.count)),
        }
    }
}

struct TakeWhile<T, P> {
    source: Sequence<T>,
    predicate: P,
}

impl<T, P> Source<T> for TakeWhile<T, P>
where
    T: Element,
    P: Fn(&T) -> bool + Send + Sync,
{
    fn iter(&self) -> SeqIter<'_, T> {
        Box::new(
            self.source
                .iter()
                .take_while(move |item| (self.predicate)(item)),
        )
    }
}

struct SkipWhile<T, P> {
    source: Sequence<T>,
    predicate: P,
}

impl<T, P> Source<T> for SkipWhile<T, P>
where
    T: Element,
    P: Fn(&T) -> bool + Send + Sync,
{
    fn iter(&self) -> SeqIter<'_, T> {
        Box::new(
            self.source
                .iter()
                .skip_while(move |item| (self.predicate)(item)),
        )
    }
}

struct Distinct<T, F> {
    source: Sequence<T>,
    key: F,
}

impl<T, K, F> Source<T> for Distinct<T, F>
where
    T: Element,
    K: Eq + Hash + 'static,
    F: Fn(&T) -> K + Send + Sync,
{
    fn iter(&self) -> SeqIter<'_, T> {
        let mut seen = HashSet::new();
        Box::new(
            self.source
                .iter()
                .filter(move |item| seen.insert((self.key)(item))),
        )
    }
}

struct Concat<T> {
    sources: Vec<Sequence<T>>,
}

impl<T: Element> Source<T> for Concat<T> {
    fn iter(&self) -> SeqIter<'_, T> {
        Box::new(self.sources.iter().flat_map(|source| source.iter()))
    }
}

struct Reverse<T> {
    source: Sequence<T>,
}

impl<T: Element> Source<T> for Reverse<T> {
    fn iter(&self) -> SeqIter<'_, T> {
        match self.source.as_slice() {
            Some(items) => Box::new(items.iter().rev().cloned()),
            None => {
                let mut items: Vec<T> = self.source.iter().collect();
                items.reverse();
                Box::new(items.into_iter())
            }
        }
    }
}

struct Zip<A, B, F> {
    left: Sequence<A>,
    right: Sequence<B>,
    combiner: F,
}

impl<A, B, U, F> Source<U> for Zip<A, B, F>
where
    A: Element,
    B: Element,
    U: Element,
    F: Fn(A, B) -> U + Send + Sync,
{
    fn iter(&self) -> SeqIter<'_, U> {
        Box::new(
            self.left
                .iter()
                .zip(self.right.iter())
                .map(move |(a, b)| (self.combiner)(a, b)),
        )
    }
}

struct ZipMany<T, F> {
    sources: Vec<Sequence<T>>,
    combiner: F,
}

impl<T, U, F> Source<U> for ZipMany<T, F>
where
    T: Element,
    U: Element,
    F: Fn(Vec<T>) -> U + Send + Sync,
{
    fn iter(&self) -> SeqIter<'_, U> {
        let mut cursors: Vec<SeqIter<'_, T>> =
            self.sources.iter().map(|source| source.iter()).collect();
        Box::new(std::iter::from_fn(move || {
            if cursors.is_empty() {
                return None;
            }
            let mut items = Vec::with_capacity(cursors.len());
            for cursor in cursors.iter_mut() {
                items.push(cursor.next()?);
            }
            Some((self.combiner)(items))
        }))
    }
}

struct Ordered<T> {
    source: Sequence<T>,
    specs: Vec<SortSpec<T>>,
}

impl<T: Element> Source<T> for Ordered<T> {
    fn iter(&self) -> SeqIter<'_, T> {
        let mut items = self.source.to_vec();
        // `sort_by` is stable: rows that tie on every level keep their source order.
        items.sort_by(|a, b| compare_by_specs(&self.specs, a, b));
        Box::new(items.into_iter())
    }
}

impl<T: Element> Sequence<T> {
    /// Apply `selector` to each element; the selector also receives the element's position.
    pub fn map<U, F>(&self, selector: F) -> Sequence<U>
    where
        U: Element,
        F: Fn(T, usize) -> U + Send + Sync + 'static,
    {
        Sequence::from_source(Select {
            source: self.clone(),
            selector,
        })
    }

    /// Concatenate the sub-sequences produced for each element, in source order.
    pub fn flat_map<U, F, It>(&self, selector: F) -> Sequence<U>
    where
        U: Element,
        F: Fn(T, usize) -> It + Send + Sync + 'static,
        It: IntoIterator<Item = U> + 'static,
        It::IntoIter: 'static,
    {
        Sequence::from_source(SelectMany {
            source: self.clone(),
            selector,
        })
    }

    pub fn filter<P>(&self, predicate: P) -> Self
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self::from_source(Filter {
            source: self.clone(),
            predicate,
        })
    }

    pub fn take(&self, count: usize) -> Self {
        Self::from_source(Take {
            source: self.clone(),
            count,
        })
    }

    pub fn skip(&self, count: usize) -> Self {
        if count == 0 {
            return self.clone();
        }
        Self::from_source(Skip {
            source: self.clone(),
            count,
        })
    }

    /// Elements up to (excluding) the first one failing `predicate`.
    pub fn take_while<P>(&self, predicate: P) -> Self
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self::from_source(TakeWhile {
            source: self.clone(),
            predicate,
        })
    }

    /// Drop the leading run matching `predicate`; later elements are never re-tested.
    pub fn skip_while<P>(&self, predicate: P) -> Self
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self::from_source(SkipWhile {
            source: self.clone(),
            predicate,
        })
    }

    /// First element for every distinct key, in source order.
    pub fn distinct_by<K, F>(&self, key: F) -> Self
    where
        K: Eq + Hash + 'static,
        F: Fn(&T) -> K + Send + Sync + 'static,
    {
        Self::from_source(Distinct {
            source: self.clone(),
            key,
        })
    }

    pub fn concat_all(sources: Vec<Sequence<T>>) -> Self {
        Self::from_source(Concat { sources })
    }

    pub fn chain(&self, other: &Sequence<T>) -> Self {
        Self::concat_all(vec![self.clone(), other.clone()])
    }

    /// Reverse order. Non-materialized sources are buffered in full for each traversal.
    pub fn reverse(&self) -> Self {
        Self::from_source(Reverse {
            source: self.clone(),
        })
    }

    /// Pairwise combination, stopping at the shorter sequence.
    pub fn zip<B, U, F>(&self, other: &Sequence<B>, combiner: F) -> Sequence<U>
    where
        B: Element,
        U: Element,
        F: Fn(T, B) -> U + Send + Sync + 'static,
    {
        Sequence::from_source(Zip {
            left: self.clone(),
            right: other.clone(),
            combiner,
        })
    }

    /// Combine one element from each source per position, stopping at the shortest source.
    pub fn zip_many<U, F>(sources: Vec<Sequence<T>>, combiner: F) -> Sequence<U>
    where
        U: Element,
        F: Fn(Vec<T>) -> U + Send + Sync + 'static,
    {
        Sequence::from_source(ZipMany { sources, combiner })
    }

    /// Stable multi-level sort; specs are applied in ascending level order.
    pub fn ordered(&self, mut specs: Vec<SortSpec<T>>) -> Self {
        specs.sort_by_key(|spec| spec.level());
        Self::from_source(Ordered {
            source: self.clone(),
            specs,
        })
    }
}

impl<T: Element + Eq + Hash> Sequence<T> {
    pub fn distinct(&self) -> Self {
        self.distinct_by(|item: &T| item.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sort::SortDirection;

    fn numbers() -> Sequence<i32> {
        Sequence::from_fn(|| vec![5, 1, 4, 1, 5, 9, 2, 6].into_iter())
    }

    #[test]
    fn map_passes_positions() {
        let seq = numbers().map(|v, pos| v * 10 + pos as i32);
        assert_eq!(seq.to_vec(), vec![50, 11, 42, 13, 54, 95, 26, 67]);
    }

    #[test]
    fn flat_map_concatenates_in_source_order() {
        let seq = Sequence::from_vec(vec![1, 2, 3]).flat_map(|v, _| vec![v; v as usize]);
        assert_eq!(seq.to_vec(), vec![1, 2, 2, 3, 3, 3]);
    }

    #[test]
    fn take_and_skip_are_positional() {
        assert_eq!(numbers().take(3).to_vec(), vec![5, 1, 4]);
        assert_eq!(numbers().skip(6).to_vec(), vec![2, 6]);
        assert_eq!(numbers().take(0).to_vec(), Vec::<i32>::new());
        assert_eq!(numbers().skip(100).to_vec(), Vec::<i32>::new());
        let baked = numbers().materialize();
        assert_eq!(baked.take(100).to_vec(), numbers().to_vec());
        assert_eq!(baked.skip(7).to_vec(), vec![6]);
    }

    #[test]
    fn skip_while_stops_testing_after_first_failure() {
        let seq = numbers().skip_while(|v| *v != 4);
        assert_eq!(seq.to_vec(), vec![4, 1, 5, 9, 2, 6]);
        let seq = numbers().take_while(|v| *v != 9);
        assert_eq!(seq.to_vec(), vec![5, 1, 4, 1, 5]);
    }

    #[test]
    fn distinct_keeps_first_occurrence_per_traversal() {
        let seq = numbers().distinct();
        assert_eq!(seq.to_vec(), vec![5, 1, 4, 9, 2, 6]);
        assert_eq!(seq.to_vec(), vec![5, 1, 4, 9, 2, 6]);
        let by_parity = numbers().distinct_by(|v| v % 2);
        assert_eq!(by_parity.to_vec(), vec![5, 4]);
    }

    #[test]
    fn reverse_buffers_lazy_sources() {
        assert_eq!(numbers().reverse().to_vec(), vec![6, 2, 9, 5, 1, 4, 1, 5]);
        assert_eq!(
            numbers().materialize().reverse().to_vec(),
            vec![6, 2, 9, 5, 1, 4, 1, 5]
        );
    }

    #[test]
    fn zip_stops_at_shortest_source() {
        let short = Sequence::from_vec(vec![100, 200]);
        let zipped = numbers().zip(&short, |a, b| a + b);
        assert_eq!(zipped.to_vec(), vec![105, 201]);

        let positions = Sequence::range(0, 10).map(|v, _| v as i32);
        let many = Sequence::zip_many(vec![numbers(), short, positions], |items| {
            items.iter().sum::<i32>()
        });
        assert_eq!(many.to_vec(), vec![105, 202]);
        assert!(Sequence::<i32>::zip_many(Vec::new(), |items| items.len()).is_empty());
    }

    #[test]
    fn ordered_applies_levels_in_order_and_is_stable() {
        let words = Sequence::from_vec(vec!["bb", "a", "ccc", "dd", "e", "ff"]);
        let specs = vec![
            SortSpec::new(1, |w: &&str| w.len(), SortDirection::Descending),
            SortSpec::new(0, |w: &&str| w.len() % 2, SortDirection::Ascending),
        ];
        // Even lengths first, then odd; longer words first within each parity.
        assert_eq!(
            words.ordered(specs).to_vec(),
            vec!["bb", "dd", "ff", "ccc", "a", "e"]
        );
    }

    #[test]
    fn concat_emits_sources_in_argument_order() {
        let seq = Sequence::concat_all(vec![
            Sequence::from_vec(vec![1, 2]),
            Sequence::empty(),
            Sequence::from_vec(vec![3]),
        ]);
        assert_eq!(seq.to_vec(), vec![1, 2, 3]);
        assert_eq!(seq.chain(&seq).count(), 6);
    }
}
