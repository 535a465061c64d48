//! Indexed, lazily resolved one-dimensional views.
//!
//! A [`Series`] either owns resolved content or a deferred initializer that produces a
//! [`SeriesConfig`] on first access. Every operator returns a new `Series` whose initializer pulls
//! from the parent's resolved content; nothing is ever mutated in place, so parents are shared by
//! reference between any number of derived views.

mod ops;
mod ordered;
mod relational;
mod stats;

use crate::error::{FrameError, FrameResult};
use crate::index::{Index, IndexKey};
use crate::sequence::{Element, SeqIter, Sequence};
use crate::value::Value;
use crate::view::{self, ViewCell};
use std::fmt;
use std::sync::Arc;

pub use crate::series::ordered::OrderedSeries;
pub use crate::series::stats::{Frequency, Numeric};

type IndexSelector<I, V> = Arc<dyn Fn(&V, usize) -> I + Send + Sync>;

enum ConfigIndex<I, V> {
    Values(Sequence<I>),
    /// Index computed from each value and its position.
    Derived(IndexSelector<I, V>),
}

enum ConfigData<I, V> {
    Values {
        index: ConfigIndex<I, V>,
        values: Sequence<V>,
    },
    Pairs {
        pairs: Sequence<(I, V)>,
        index: Option<Sequence<I>>,
        values: Option<Sequence<V>>,
    },
    View(Series<I, V>),
}

/// Construction input for a [`Series`].
///
/// Whatever shape the input takes, it is resolved exactly once into canonical content: an index
/// sequence, a value sequence and the zipped `(index, value)` pairs.
pub struct SeriesConfig<I, V> {
    data: ConfigData<I, V>,
    baked: bool,
}

impl<V: Element> SeriesConfig<usize, V> {
    /// Values with a zero-based sequential index.
    pub fn from_values(values: impl Into<Sequence<V>>) -> Self {
        Self {
            data: ConfigData::Values {
                index: ConfigIndex::Derived(Arc::new(|_: &V, pos: usize| pos)),
                values: values.into(),
            },
            baked: false,
        }
    }
}

impl<I: IndexKey, V: Element> SeriesConfig<I, V> {
    /// Explicit index and values, matched up positionally.
    pub fn from_index_values(index: impl Into<Sequence<I>>, values: impl Into<Sequence<V>>) -> Self {
        Self {
            data: ConfigData::Values {
                index: ConfigIndex::Values(index.into()),
                values: values.into(),
            },
            baked: false,
        }
    }

    /// `(index, value)` pairs; index and values are projected out of them.
    pub fn from_pairs(pairs: impl Into<Sequence<(I, V)>>) -> Self {
        Self {
            data: ConfigData::Pairs {
                pairs: pairs.into(),
                index: None,
                values: None,
            },
            baked: false,
        }
    }

    /// Reuse the content of another view.
    pub fn from_view(series: &Series<I, V>) -> Self {
        Self {
            data: ConfigData::View(series.clone()),
            baked: false,
        }
    }

    pub(crate) fn from_parts(index: Sequence<I>, values: Sequence<V>, pairs: Sequence<(I, V)>) -> Self {
        Self {
            data: ConfigData::Pairs {
                pairs,
                index: Some(index),
                values: Some(values),
            },
            baked: false,
        }
    }

    pub fn baked(mut self, baked: bool) -> Self {
        self.baked = baked;
        self
    }

    /// Replace the index; index and values are zipped, so the shorter of the two wins.
    pub fn with_index<J: IndexKey>(self, index: impl Into<Sequence<J>>) -> SeriesConfig<J, V> {
        let index = index.into();
        let values = self.into_values();
        SeriesConfig::from_pairs(index.zip(&values, |i, v| (i, v)))
    }

    /// Derive the index from each value.
    pub fn with_index_from<J, F>(self, selector: F) -> SeriesConfig<J, V>
    where
        J: IndexKey,
        F: Fn(&V) -> J + Send + Sync + 'static,
    {
        SeriesConfig {
            data: ConfigData::Values {
                index: ConfigIndex::Derived(Arc::new(move |value: &V, _: usize| selector(value))),
                values: self.into_values(),
            },
            baked: false,
        }
    }

    fn into_values(self) -> Sequence<V> {
        match self.data {
            ConfigData::Values { values, .. } => values,
            ConfigData::Pairs {
                values: Some(values),
                ..
            } => values,
            ConfigData::Pairs { pairs, .. } => pairs.map(|(_, value), _| value),
            ConfigData::View(series) => series.values(),
        }
    }
}

/// Resolved state of a [`Series`].
pub(crate) struct SeriesContent<I, V> {
    pub(crate) index: Index<I>,
    pub(crate) values: Sequence<V>,
    pub(crate) pairs: Sequence<(I, V)>,
    pub(crate) is_baked: bool,
}

impl<I: IndexKey, V: Element> SeriesContent<I, V> {
    fn resolve(config: SeriesConfig<I, V>) -> Self {
        let baked = config.baked;
        let (index, values, pairs) = match config.data {
            ConfigData::Values { index, values } => {
                let index = match index {
                    ConfigIndex::Values(index) => index,
                    ConfigIndex::Derived(selector) => {
                        values.map(move |value, pos| selector(&value, pos))
                    }
                };
                let pairs = index.zip(&values, |i, v| (i, v));
                (index, values, pairs)
            }
            ConfigData::Pairs {
                pairs,
                index,
                values,
            } => {
                let index = index.unwrap_or_else(|| pairs.map(|(i, _), _| i));
                let values = values.unwrap_or_else(|| pairs.map(|(_, v), _| v));
                (index, values, pairs)
            }
            ConfigData::View(series) => {
                let content = series.content();
                return Self {
                    index: content.index.clone(),
                    values: content.values.clone(),
                    pairs: content.pairs.clone(),
                    is_baked: content.is_baked || baked,
                };
            }
        };
        Self {
            index: Index::new(index),
            values,
            pairs,
            is_baked: baked,
        }
    }
}

/// An ordered, indexed sequence of values.
pub struct Series<I = usize, V = Value> {
    view: Arc<ViewCell<SeriesContent<I, V>>>,
}

impl<I, V> Clone for Series<I, V> {
    fn clone(&self) -> Self {
        Self {
            view: Arc::clone(&self.view),
        }
    }
}

impl<V: Element> Series<usize, V> {
    /// Memory-resident series with a zero-based sequential index.
    pub fn new(values: impl IntoIterator<Item = V>) -> Self {
        let values: Vec<V> = values.into_iter().collect();
        Self::from_vecs((0..values.len()).collect(), values)
    }
}

impl<I: IndexKey, V: Element> Series<I, V> {
    pub fn from_config(config: SeriesConfig<I, V>) -> Self {
        Self {
            view: view::resolved(SeriesContent::resolve(config)),
        }
    }

    /// Defer building the configuration until the series is first observed.
    pub fn lazy<F>(init: F) -> Self
    where
        F: FnOnce() -> SeriesConfig<I, V> + Send + 'static,
    {
        Self {
            view: view::deferred(move || SeriesContent::resolve(init())),
        }
    }

    pub fn empty() -> Self {
        Self::from_vecs(Vec::new(), Vec::new())
    }

    /// Memory-resident series from explicit pairs.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (I, V)>) -> Self {
        let (index, values) = pairs.into_iter().unzip();
        Self::from_vecs(index, values)
    }

    /// Memory-resident series from an explicit index and values; the longer input is truncated.
    pub fn from_index_values(
        index: impl IntoIterator<Item = I>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Self::from_pairs(index.into_iter().zip(values))
    }

    pub(crate) fn from_vecs(index: Vec<I>, values: Vec<V>) -> Self {
        let pairs: Vec<(I, V)> = index.iter().cloned().zip(values.iter().cloned()).collect();
        Self::from_config(
            SeriesConfig::from_parts(
                Sequence::from_vec(index),
                Sequence::from_vec(values),
                Sequence::from_vec(pairs),
            )
            .baked(true),
        )
    }

    pub(crate) fn content(&self) -> &SeriesContent<I, V> {
        &self.view
    }

    /// Build a derived view whose configuration is computed from this one on first access.
    pub(crate) fn derive<J, W, F>(&self, build: F) -> Series<J, W>
    where
        J: IndexKey,
        W: Element,
        F: FnOnce(&Series<I, V>) -> SeriesConfig<J, W> + Send + 'static,
    {
        let parent = self.clone();
        Series::lazy(move || build(&parent))
    }

    /// Whether both handles refer to the same view instance.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.view, &other.view)
    }

    pub fn get_index(&self) -> Index<I> {
        self.content().index.clone()
    }

    pub fn values(&self) -> Sequence<V> {
        self.content().values.clone()
    }

    pub fn pairs(&self) -> Sequence<(I, V)> {
        self.content().pairs.clone()
    }

    pub fn iter(&self) -> SeqIter<'_, V> {
        self.content().values.iter()
    }

    pub fn iter_pairs(&self) -> SeqIter<'_, (I, V)> {
        self.content().pairs.iter()
    }

    pub fn to_vec(&self) -> Vec<V> {
        self.content().values.to_vec()
    }

    pub fn to_pairs(&self) -> Vec<(I, V)> {
        self.content().pairs.to_vec()
    }

    pub fn count(&self) -> usize {
        self.content().values.count()
    }

    pub fn is_empty(&self) -> bool {
        self.content().values.is_empty()
    }

    pub fn first(&self) -> FrameResult<V> {
        self.content()
            .values
            .first()
            .ok_or_else(|| FrameError::empty_sequence("first"))
    }

    pub fn last(&self) -> FrameResult<V> {
        self.content()
            .values
            .last()
            .ok_or_else(|| FrameError::empty_sequence("last"))
    }

    pub fn first_pair(&self) -> FrameResult<(I, V)> {
        self.content()
            .pairs
            .first()
            .ok_or_else(|| FrameError::empty_sequence("first_pair"))
    }

    pub fn last_pair(&self) -> FrameResult<(I, V)> {
        self.content()
            .pairs
            .last()
            .ok_or_else(|| FrameError::empty_sequence("last_pair"))
    }

    /// Value at the first position whose index equals `index`.
    pub fn at(&self, index: &I) -> Option<V> {
        self.iter_pairs()
            .find(|(key, _)| key == index)
            .map(|(_, value)| value)
    }

    pub fn is_baked(&self) -> bool {
        self.content().is_baked
    }

    /// Snapshot into memory-resident content. A baked series is returned unchanged.
    pub fn bake(&self) -> Self {
        if self.is_baked() {
            return self.clone();
        }
        let (index, values): (Vec<I>, Vec<V>) = self.iter_pairs().unzip();
        log::debug!("baked series of {} values", values.len());
        Self::from_vecs(index, values)
    }
}

impl<I: IndexKey, V: Element> Default for Series<I, V> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<V: Element> From<Vec<V>> for Series<usize, V> {
    fn from(values: Vec<V>) -> Self {
        Series::new(values)
    }
}

impl<V: Element> FromIterator<V> for Series<usize, V> {
    fn from_iter<T: IntoIterator<Item = V>>(iter: T) -> Self {
        Series::new(iter)
    }
}

impl<I, V> fmt::Debug for Series<I, V>
where
    I: IndexKey + fmt::Debug,
    V: Element + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter_pairs()).finish()
    }
}
