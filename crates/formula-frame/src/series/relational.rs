//! Grouping, set algebra and joins over series.

use crate::index::IndexKey;
use crate::sequence::{Element, Sequence};
use crate::series::{Series, SeriesConfig};
use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::sync::Arc;

/// Buckets of pairs in order of first key appearance.
pub(crate) fn group_pairs<I, V, K, F>(pairs: &Sequence<(I, V)>, selector: F) -> Vec<Vec<(I, V)>>
where
    I: Element,
    V: Element,
    K: Eq + Hash,
    F: Fn(&V) -> K,
{
    let mut groups: Vec<Vec<(I, V)>> = Vec::new();
    let mut lookup: HashMap<K, usize> = HashMap::new();
    for (index, value) in pairs.iter() {
        let key = selector(&value);
        match lookup.get(&key) {
            Some(&slot) => groups[slot].push((index, value)),
            None => {
                lookup.insert(key, groups.len());
                groups.push(vec![(index, value)]);
            }
        }
    }
    groups
}

impl<I: IndexKey, V: Element> Series<I, V> {
    /// First value per distinct key, in original order.
    pub fn distinct_by<K, F>(&self, selector: F) -> Self
    where
        K: Eq + Hash + 'static,
        F: Fn(&V) -> K + Send + Sync + 'static,
    {
        self.derive(move |s| {
            SeriesConfig::from_pairs(
                s.pairs()
                    .distinct_by(move |(_, value): &(I, V)| selector(value)),
            )
        })
    }

    /// One group per distinct key, ordered by first appearance. Groups keep their original indices.
    pub fn group_by<K, F>(&self, selector: F) -> Series<usize, Series<I, V>>
    where
        K: Eq + Hash,
        F: Fn(&V) -> K + Send + Sync + 'static,
    {
        self.derive(move |s| {
            let groups = group_pairs(&s.pairs(), selector);
            log::debug!("group_by produced {} groups", groups.len());
            SeriesConfig::from_values(Sequence::from_vec(
                groups.into_iter().map(Series::from_pairs).collect(),
            ))
        })
    }

    /// Groups of adjacent values sharing a key; repeated keys further apart form new groups.
    pub fn group_sequential_by<K, F>(&self, selector: F) -> Series<usize, Series<I, V>>
    where
        K: PartialEq,
        F: Fn(&V) -> K + Send + Sync + 'static,
    {
        self.variable_window(move |a, b| selector(a) == selector(b))
    }

    /// Concatenation followed by `distinct_by(selector)`.
    pub fn union_by<K, F>(&self, other: &Series<I, V>, selector: F) -> Self
    where
        K: Eq + Hash + 'static,
        F: Fn(&V) -> K + Send + Sync + 'static,
    {
        self.concat(std::slice::from_ref(other)).distinct_by(selector)
    }

    /// Values whose key matches at least one value of `inner`.
    pub fn intersection_by<J, W, K, OK, IK>(
        &self,
        inner: &Series<J, W>,
        outer_key: OK,
        inner_key: IK,
    ) -> Self
    where
        J: IndexKey,
        W: Element,
        K: Eq + Hash + Send + Sync + 'static,
        OK: Fn(&V) -> K + Send + Sync + 'static,
        IK: Fn(&W) -> K + Send + 'static,
    {
        self.filter_by_keys(inner, outer_key, inner_key, true)
    }

    /// Values whose key matches no value of `inner`.
    pub fn except_by<J, W, K, OK, IK>(&self, inner: &Series<J, W>, outer_key: OK, inner_key: IK) -> Self
    where
        J: IndexKey,
        W: Element,
        K: Eq + Hash + Send + Sync + 'static,
        OK: Fn(&V) -> K + Send + Sync + 'static,
        IK: Fn(&W) -> K + Send + 'static,
    {
        self.filter_by_keys(inner, outer_key, inner_key, false)
    }

    fn filter_by_keys<J, W, K, OK, IK>(
        &self,
        inner: &Series<J, W>,
        outer_key: OK,
        inner_key: IK,
        keep_matches: bool,
    ) -> Self
    where
        J: IndexKey,
        W: Element,
        K: Eq + Hash + Send + Sync + 'static,
        OK: Fn(&V) -> K + Send + Sync + 'static,
        IK: Fn(&W) -> K + Send + 'static,
    {
        let inner = inner.clone();
        self.derive(move |s| {
            let keys: HashSet<K> = inner.iter().map(|value| inner_key(&value)).collect();
            SeriesConfig::from_pairs(s.pairs().filter(move |(_, value): &(I, V)| {
                keys.contains(&outer_key(value)) == keep_matches
            }))
        })
    }

    /// Inner join: one result per matching (outer, inner) pair, sequentially re-indexed.
    pub fn join<J, W, K, R, OK, IK, RS>(
        &self,
        inner: &Series<J, W>,
        outer_key: OK,
        inner_key: IK,
        result: RS,
    ) -> Series<usize, R>
    where
        J: IndexKey,
        W: Element,
        K: Eq + Hash + Send + Sync + 'static,
        R: Element,
        OK: Fn(&V) -> K + Send + Sync + 'static,
        IK: Fn(&W) -> K + Send + 'static,
        RS: Fn(&V, &W) -> R + Send + Sync + 'static,
    {
        let inner = inner.clone();
        self.derive(move |s| {
            let mut lookup: HashMap<K, Vec<W>> = HashMap::new();
            for value in inner.iter() {
                lookup.entry(inner_key(&value)).or_default().push(value);
            }
            log::debug!("join lookup built with {} keys", lookup.len());
            let joined = s.values().flat_map(move |outer, _| {
                lookup
                    .get(&outer_key(&outer))
                    .map(|matches| {
                        matches
                            .iter()
                            .map(|inner| result(&outer, inner))
                            .collect::<Vec<_>>()
                    })
                    .unwrap_or_default()
            });
            SeriesConfig::from_values(joined)
        })
    }

    /// Full outer join: outer-only rows, then matches, then inner-only rows.
    pub fn join_outer<J, W, K, R, OK, IK, RS>(
        &self,
        inner: &Series<J, W>,
        outer_key: OK,
        inner_key: IK,
        result: RS,
    ) -> Series<usize, R>
    where
        J: IndexKey,
        W: Element,
        K: Eq + Hash + Send + Sync + 'static,
        R: Element,
        OK: Fn(&V) -> K + Send + Sync + 'static,
        IK: Fn(&W) -> K + Send + Sync + 'static,
        RS: Fn(Option<&V>, Option<&W>) -> R + Send + Sync + 'static,
    {
        self.outer_join_segments(inner, outer_key, inner_key, result, true, true)
    }

    /// Outer-only rows followed by matches.
    pub fn join_outer_left<J, W, K, R, OK, IK, RS>(
        &self,
        inner: &Series<J, W>,
        outer_key: OK,
        inner_key: IK,
        result: RS,
    ) -> Series<usize, R>
    where
        J: IndexKey,
        W: Element,
        K: Eq + Hash + Send + Sync + 'static,
        R: Element,
        OK: Fn(&V) -> K + Send + Sync + 'static,
        IK: Fn(&W) -> K + Send + Sync + 'static,
        RS: Fn(Option<&V>, Option<&W>) -> R + Send + Sync + 'static,
    {
        self.outer_join_segments(inner, outer_key, inner_key, result, true, false)
    }

    /// Matches followed by inner-only rows.
    pub fn join_outer_right<J, W, K, R, OK, IK, RS>(
        &self,
        inner: &Series<J, W>,
        outer_key: OK,
        inner_key: IK,
        result: RS,
    ) -> Series<usize, R>
    where
        J: IndexKey,
        W: Element,
        K: Eq + Hash + Send + Sync + 'static,
        R: Element,
        OK: Fn(&V) -> K + Send + Sync + 'static,
        IK: Fn(&W) -> K + Send + Sync + 'static,
        RS: Fn(Option<&V>, Option<&W>) -> R + Send + Sync + 'static,
    {
        self.outer_join_segments(inner, outer_key, inner_key, result, false, true)
    }

    fn outer_join_segments<J, W, K, R, OK, IK, RS>(
        &self,
        inner: &Series<J, W>,
        outer_key: OK,
        inner_key: IK,
        result: RS,
        outer_only: bool,
        inner_only: bool,
    ) -> Series<usize, R>
    where
        J: IndexKey,
        W: Element,
        K: Eq + Hash + Send + Sync + 'static,
        R: Element,
        OK: Fn(&V) -> K + Send + Sync + 'static,
        IK: Fn(&W) -> K + Send + Sync + 'static,
        RS: Fn(Option<&V>, Option<&W>) -> R + Send + Sync + 'static,
    {
        let outer_key = Arc::new(outer_key);
        let inner_key = Arc::new(inner_key);
        let result = Arc::new(result);
        let mut segments = Vec::with_capacity(3);

        if outer_only {
            let (ok, ik, rs) = (outer_key.clone(), inner_key.clone(), result.clone());
            segments.push(
                self.except_by(inner, move |v| ok(v), move |w| ik(w))
                    .map(move |v, _| rs(Some(&v), None))
                    .reset_index(),
            );
        }

        {
            let (ok, ik, rs) = (outer_key.clone(), inner_key.clone(), result.clone());
            segments.push(self.join(
                inner,
                move |v| ok(v),
                move |w| ik(w),
                move |v, w| rs(Some(v), Some(w)),
            ));
        }

        if inner_only {
            let (ok, ik, rs) = (outer_key, inner_key, result);
            segments.push(
                inner
                    .except_by(self, move |w| ik(w), move |v| ok(v))
                    .map(move |w, _| rs(None, Some(&w)))
                    .reset_index(),
            );
        }

        Series::concat_all(segments).reset_index()
    }
}

impl<I: IndexKey, V: Element + Eq + Hash> Series<I, V> {
    pub fn distinct(&self) -> Self {
        self.distinct_by(|value| value.clone())
    }

    pub fn union(&self, other: &Series<I, V>) -> Self {
        self.union_by(other, |value| value.clone())
    }

    pub fn intersection(&self, inner: &Series<I, V>) -> Self {
        self.intersection_by(inner, |value| value.clone(), |value| value.clone())
    }

    pub fn except(&self, inner: &Series<I, V>) -> Self {
        self.except_by(inner, |value| value.clone(), |value| value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distinct_keeps_first_seen_order() {
        let series = Series::new(vec![1, 1, 2, 1, 1, 2, 3]);
        assert_eq!(series.distinct().to_vec(), vec![1, 2, 3]);
        assert_eq!(series.distinct().get_index().to_vec(), vec![0, 2, 6]);
    }

    #[test]
    fn group_by_merges_all_occurrences() {
        let series = Series::new(vec![1, 2, 3, 4, 5, 6]);
        let groups = series.group_by(|v| v % 3);
        let values: Vec<Vec<i32>> = groups.iter().map(|g| g.to_vec()).collect();
        assert_eq!(values, vec![vec![1, 4], vec![2, 5], vec![3, 6]]);
        assert_eq!(groups.first().unwrap().get_index().to_vec(), vec![0, 3]);
    }

    #[test]
    fn group_sequential_by_only_merges_adjacent_runs() {
        let series = Series::new(vec!['a', 'a', 'b', 'a']);
        let groups = series.group_sequential_by(|c| *c);
        let sizes: Vec<usize> = groups.iter().map(|g| g.count()).collect();
        assert_eq!(sizes, vec![2, 1, 1]);
    }

    #[test]
    fn set_algebra_uses_keys() {
        let a = Series::new(vec![1, 2, 3, 4]);
        let b = Series::new(vec![3, 4, 5]);
        assert_eq!(a.union(&b).to_vec(), vec![1, 2, 3, 4, 5]);
        assert_eq!(a.intersection(&b).to_vec(), vec![3, 4]);
        assert_eq!(a.except(&b).to_vec(), vec![1, 2]);
    }

    #[test]
    fn join_emits_one_row_per_match() {
        let outer = Series::new(vec![(1, "x"), (2, "y"), (3, "z")]);
        let inner = Series::new(vec![(1, 'a'), (1, 'b'), (3, 'c')]);
        let joined = outer.join(&inner, |o| o.0, |i| i.0, |o, i| format!("{}{}", o.1, i.1));
        assert_eq!(joined.to_vec(), vec!["xa", "xb", "zc"]);
        assert_eq!(joined.get_index().to_vec(), vec![0, 1, 2]);
    }

    #[test]
    fn outer_joins_emit_segments_in_order() {
        let outer = Series::new(vec![1, 2]);
        let inner = Series::new(vec![2, 3]);
        let render = |o: Option<&i32>, i: Option<&i32>| (o.copied(), i.copied());

        let full = outer.join_outer(&inner, |v| *v, |v| *v, render);
        assert_eq!(
            full.to_vec(),
            vec![(Some(1), None), (Some(2), Some(2)), (None, Some(3))]
        );
        assert_eq!(full.get_index().to_vec(), vec![0, 1, 2]);

        let left = outer.join_outer_left(&inner, |v| *v, |v| *v, render);
        assert_eq!(left.to_vec(), vec![(Some(1), None), (Some(2), Some(2))]);

        let right = outer.join_outer_right(&inner, |v| *v, |v| *v, render);
        assert_eq!(right.to_vec(), vec![(Some(2), Some(2)), (None, Some(3))]);
    }
}
