use crate::index::IndexKey;
use crate::sequence::{pair_value, Element};
use crate::series::{Series, SeriesConfig};
use crate::sort::{SortChain, SortDirection};
use std::ops::Deref;
use std::sync::Arc;

/// A sorted [`Series`] that can be refined with further sort keys.
///
/// Each `then_by` starts again from the unsorted parent with the extended chain, so the result is
/// one stable sort over all levels rather than a sort of an already-sorted view.
pub struct OrderedSeries<I, V> {
    parent: Series<I, V>,
    chain: Arc<SortChain<V>>,
    sorted: Series<I, V>,
}

impl<I, V> Clone for OrderedSeries<I, V> {
    fn clone(&self) -> Self {
        Self {
            parent: self.parent.clone(),
            chain: Arc::clone(&self.chain),
            sorted: self.sorted.clone(),
        }
    }
}

impl<I: IndexKey, V: Element> OrderedSeries<I, V> {
    fn new(parent: Series<I, V>, chain: Arc<SortChain<V>>) -> Self {
        let sorted = {
            let chain = Arc::clone(&chain);
            parent.derive(move |s| {
                let specs = chain
                    .flatten()
                    .iter()
                    .map(|spec| spec.project(pair_value::<I, V>))
                    .collect();
                SeriesConfig::from_pairs(s.pairs().ordered(specs))
            })
        };
        Self {
            parent,
            chain,
            sorted,
        }
    }

    pub fn then_by<K, F>(&self, selector: F) -> Self
    where
        K: Ord + 'static,
        F: Fn(&V) -> K + Send + Sync + 'static,
    {
        Self::new(
            self.parent.clone(),
            self.chain.then(selector, SortDirection::Ascending),
        )
    }

    pub fn then_by_descending<K, F>(&self, selector: F) -> Self
    where
        K: Ord + 'static,
        F: Fn(&V) -> K + Send + Sync + 'static,
    {
        Self::new(
            self.parent.clone(),
            self.chain.then(selector, SortDirection::Descending),
        )
    }

    pub fn into_series(self) -> Series<I, V> {
        self.sorted
    }
}

impl<I, V> Deref for OrderedSeries<I, V> {
    type Target = Series<I, V>;

    fn deref(&self) -> &Series<I, V> {
        &self.sorted
    }
}

impl<I: IndexKey, V: Element> Series<I, V> {
    /// Stable ascending sort by `selector`; original indices travel with their values.
    pub fn order_by<K, F>(&self, selector: F) -> OrderedSeries<I, V>
    where
        K: Ord + 'static,
        F: Fn(&V) -> K + Send + Sync + 'static,
    {
        OrderedSeries::new(self.clone(), SortChain::root(selector, SortDirection::Ascending))
    }

    pub fn order_by_descending<K, F>(&self, selector: F) -> OrderedSeries<I, V>
    where
        K: Ord + 'static,
        F: Fn(&V) -> K + Send + Sync + 'static,
    {
        OrderedSeries::new(self.clone(), SortChain::root(selector, SortDirection::Descending))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn then_by_breaks_ties_of_the_previous_level() {
        let series = Series::new(vec![(2, 'b'), (1, 'z'), (2, 'a'), (1, 'y')]);
        let sorted = series.order_by(|v| v.0).then_by_descending(|v| v.1);
        assert_eq!(sorted.to_vec(), vec![(1, 'z'), (1, 'y'), (2, 'b'), (2, 'a')]);
        assert_eq!(sorted.get_index().to_vec(), vec![1, 3, 0, 2]);
    }

    #[test]
    fn sort_is_stable_for_equal_keys() {
        let series = Series::new(vec![(1, 'a'), (0, 'b'), (1, 'c'), (0, 'd')]);
        let sorted = series.order_by(|v| v.0).into_series();
        assert_eq!(sorted.to_vec(), vec![(0, 'b'), (0, 'd'), (1, 'a'), (1, 'c')]);
    }
}
