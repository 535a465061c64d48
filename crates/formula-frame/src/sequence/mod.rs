//! Restartable lazy sequences.
//!
//! A [`Sequence`] is a cheap, clonable handle to a [`Source`]. Every call to [`Sequence::iter`]
//! starts a brand new traversal: combinators never keep cursor state between traversals, so the
//! same sequence can be walked any number of times (and by several consumers at once) with the
//! same result. Only [`ArraySource`]-backed sequences are memory resident; everything else is
//! recomputed from its upstream source on each traversal.

mod combinators;
mod windows;

use std::fmt;
use std::sync::Arc;

pub use crate::sequence::combinators::pair_value;

/// Bound shared by everything stored in a sequence.
pub trait Element: Clone + Send + Sync + 'static {}

impl<T: Clone + Send + Sync + 'static> Element for T {}

pub type SeqIter<'a, T> = Box<dyn Iterator<Item = T> + 'a>;

/// Producer of a single traversal.
///
/// Implementations must hand out independent iterators: two calls to `iter` may not share any
/// cursor or working buffer.
pub trait Source<T>: Send + Sync {
    fn iter(&self) -> SeqIter<'_, T>;

    /// Random access to the elements when they are memory resident.
    fn as_slice(&self) -> Option<&[T]> {
        None
    }
}

pub struct Sequence<T> {
    source: Arc<dyn Source<T>>,
}

impl<T> Clone for Sequence<T> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
        }
    }
}

struct ArraySource<T> {
    items: Vec<T>,
}

impl<T: Element> Source<T> for ArraySource<T> {
    fn iter(&self) -> SeqIter<'_, T> {
        Box::new(self.items.iter().cloned())
    }

    fn as_slice(&self) -> Option<&[T]> {
        Some(&self.items)
    }
}

struct GeneratorSource<F> {
    generate: F,
}

impl<T, F, It> Source<T> for GeneratorSource<F>
where
    F: Fn() -> It + Send + Sync,
    It: Iterator<Item = T> + 'static,
{
    fn iter(&self) -> SeqIter<'_, T> {
        Box::new((self.generate)())
    }
}

impl<T: Element> Sequence<T> {
    pub fn from_source(source: impl Source<T> + 'static) -> Self {
        Self {
            source: Arc::new(source),
        }
    }

    pub fn from_vec(items: Vec<T>) -> Self {
        Self::from_source(ArraySource { items })
    }

    pub fn empty() -> Self {
        Self::from_vec(Vec::new())
    }

    /// A sequence that calls `generate` for every traversal.
    ///
    /// `generate` must produce the same logical elements on every call.
    pub fn from_fn<F, It>(generate: F) -> Self
    where
        F: Fn() -> It + Send + Sync + 'static,
        It: Iterator<Item = T> + 'static,
    {
        Self::from_source(GeneratorSource { generate })
    }

    /// Start a fresh traversal.
    pub fn iter(&self) -> SeqIter<'_, T> {
        self.source.iter()
    }

    pub fn as_slice(&self) -> Option<&[T]> {
        self.source.as_slice()
    }

    /// Whether the elements are held in memory (as opposed to recomputed per traversal).
    pub fn is_materialized(&self) -> bool {
        self.as_slice().is_some()
    }

    pub fn count(&self) -> usize {
        match self.as_slice() {
            Some(items) => items.len(),
            None => self.iter().count(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self.as_slice() {
            Some(items) => items.is_empty(),
            None => self.iter().next().is_none(),
        }
    }

    pub fn first(&self) -> Option<T> {
        self.iter().next()
    }

    pub fn last(&self) -> Option<T> {
        match self.as_slice() {
            Some(items) => items.last().cloned(),
            None => self.iter().last(),
        }
    }

    pub fn get(&self, position: usize) -> Option<T> {
        match self.as_slice() {
            Some(items) => items.get(position).cloned(),
            None => self.iter().nth(position),
        }
    }

    pub fn to_vec(&self) -> Vec<T> {
        match self.as_slice() {
            Some(items) => items.to_vec(),
            None => self.iter().collect(),
        }
    }

    /// Snapshot the sequence into memory. Already materialized sequences are returned as-is.
    pub fn materialize(&self) -> Self {
        if self.is_materialized() {
            return self.clone();
        }
        Self::from_vec(self.iter().collect())
    }
}

impl Sequence<usize> {
    /// `count` consecutive integers starting at `start`.
    pub fn range(start: usize, count: usize) -> Self {
        Self::from_fn(move || start..start + count)
    }
}

impl<T: Element> Default for Sequence<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: Element> From<Vec<T>> for Sequence<T> {
    fn from(items: Vec<T>) -> Self {
        Self::from_vec(items)
    }
}

/// Collecting drains the iterator once; the resulting sequence is memory resident.
impl<T: Element> FromIterator<T> for Sequence<T> {
    fn from_iter<It: IntoIterator<Item = T>>(iter: It) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

impl<T: Element + fmt::Debug> fmt::Debug for Sequence<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
