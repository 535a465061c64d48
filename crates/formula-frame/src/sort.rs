//! Multi-level sort specifications.
//!
//! An ordered view records its sort as a [`SortChain`]: each `then_by` links a new node to its
//! parent. Flattening walks back to the root and yields one [`SortSpec`] per level, which the
//! sequence core evaluates as a single composite comparator.

use crate::sequence::Element;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Ascending,
    Descending,
}

type KeyComparer<T> = Arc<dyn Fn(&T, &T) -> Ordering + Send + Sync>;

/// One level of a multi-key sort.
pub struct SortSpec<T> {
    level: usize,
    direction: SortDirection,
    compare: KeyComparer<T>,
}

impl<T> Clone for SortSpec<T> {
    fn clone(&self) -> Self {
        Self {
            level: self.level,
            direction: self.direction,
            compare: Arc::clone(&self.compare),
        }
    }
}

impl<T> fmt::Debug for SortSpec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortSpec")
            .field("level", &self.level)
            .field("direction", &self.direction)
            .finish_non_exhaustive()
    }
}

fn key_comparer<T, K, F>(selector: F) -> KeyComparer<T>
where
    T: 'static,
    K: Ord + 'static,
    F: Fn(&T) -> K + Send + Sync + 'static,
{
    Arc::new(move |a: &T, b: &T| selector(a).cmp(&selector(b)))
}

impl<T: 'static> SortSpec<T> {
    pub fn new<K, F>(level: usize, selector: F, direction: SortDirection) -> Self
    where
        K: Ord + 'static,
        F: Fn(&T) -> K + Send + Sync + 'static,
    {
        Self {
            level,
            direction,
            compare: key_comparer(selector),
        }
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    pub fn compare(&self, a: &T, b: &T) -> Ordering {
        let ord = (self.compare)(a, b);
        match self.direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    }

    /// Run this spec against a larger element through a borrowing projection.
    pub fn project<U: 'static>(&self, projection: fn(&U) -> &T) -> SortSpec<U> {
        let compare = Arc::clone(&self.compare);
        SortSpec {
            level: self.level,
            direction: self.direction,
            compare: Arc::new(move |a: &U, b: &U| compare(projection(a), projection(b))),
        }
    }
}

/// First non-equal comparison across `specs`; ties fall through to the next level.
pub fn compare_by_specs<T: 'static>(specs: &[SortSpec<T>], a: &T, b: &T) -> Ordering {
    for spec in specs {
        let ord = spec.compare(a, b);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

/// A node in a `order_by(..).then_by(..)` chain.
pub struct SortChain<T> {
    parent: Option<Arc<SortChain<T>>>,
    direction: SortDirection,
    compare: KeyComparer<T>,
}

impl<T: Element> SortChain<T> {
    pub fn root<K, F>(selector: F, direction: SortDirection) -> Arc<Self>
    where
        K: Ord + 'static,
        F: Fn(&T) -> K + Send + Sync + 'static,
    {
        Arc::new(Self {
            parent: None,
            direction,
            compare: key_comparer(selector),
        })
    }

    pub fn then<K, F>(self: &Arc<Self>, selector: F, direction: SortDirection) -> Arc<Self>
    where
        K: Ord + 'static,
        F: Fn(&T) -> K + Send + Sync + 'static,
    {
        Arc::new(Self {
            parent: Some(Arc::clone(self)),
            direction,
            compare: key_comparer(selector),
        })
    }

    pub fn depth(&self) -> usize {
        1 + self.parent.as_ref().map_or(0, |parent| parent.depth())
    }

    /// Walk back to the root and return one spec per level, root first.
    pub fn flatten(&self) -> Vec<SortSpec<T>> {
        let mut nodes = Vec::with_capacity(self.depth());
        let mut node = Some(self);
        while let Some(current) = node {
            nodes.push(current);
            node = current.parent.as_deref();
        }
        nodes
            .into_iter()
            .rev()
            .enumerate()
            .map(|(level, node)| SortSpec {
                level,
                direction: node.direction,
                compare: Arc::clone(&node.compare),
            })
            .collect()
    }
}
