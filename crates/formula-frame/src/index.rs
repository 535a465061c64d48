//! Index values and their ordering.
//!
//! An [`Index`] classifies itself lazily by looking at its first present element. The
//! classification decides which ordering the range queries (`before`, `after`, `start_at`,
//! `end_at`, `between`) and index-ordered merges use.

use crate::error::{FrameError, FrameResult};
use crate::sequence::{Element, SeqIter, Sequence};
use crate::value::Value;
use chrono::{NaiveDate, NaiveDateTime};
use ordered_float::OrderedFloat;
use std::cmp::Ordering;
use std::fmt;
use std::sync::{Arc, OnceLock};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum IndexType {
    Number,
    String,
    Date,
    /// No present elements.
    Empty,
    /// A type without a defined index ordering (e.g. booleans).
    Unsupported(&'static str),
}

impl fmt::Display for IndexType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexType::Number => f.write_str("number"),
            IndexType::String => f.write_str("string"),
            IndexType::Date => f.write_str("date"),
            IndexType::Empty => f.write_str("empty"),
            IndexType::Unsupported(name) => f.write_str(name),
        }
    }
}

/// Values that can be used as a Series/DataFrame index.
pub trait IndexKey: Element + PartialEq {
    /// Classification of this single value; `None` when the value is absent.
    fn index_type(&self) -> Option<IndexType>;

    /// Ordering between two keys of an index classified as `index_type`.
    fn compare_keys(&self, other: &Self, index_type: &IndexType) -> Ordering;
}

macro_rules! integer_index_key {
    ($($ty:ty),*) => {
        $(
            impl IndexKey for $ty {
                fn index_type(&self) -> Option<IndexType> {
                    Some(IndexType::Number)
                }

                fn compare_keys(&self, other: &Self, _index_type: &IndexType) -> Ordering {
                    self.cmp(other)
                }
            }
        )*
    };
}

integer_index_key!(usize, u32, u64, i32, i64);

impl IndexKey for f64 {
    fn index_type(&self) -> Option<IndexType> {
        (!self.is_nan()).then_some(IndexType::Number)
    }

    fn compare_keys(&self, other: &Self, _index_type: &IndexType) -> Ordering {
        OrderedFloat(*self).cmp(&OrderedFloat(*other))
    }
}

impl IndexKey for OrderedFloat<f64> {
    fn index_type(&self) -> Option<IndexType> {
        (!self.is_nan()).then_some(IndexType::Number)
    }

    fn compare_keys(&self, other: &Self, _index_type: &IndexType) -> Ordering {
        self.cmp(other)
    }
}

impl IndexKey for String {
    fn index_type(&self) -> Option<IndexType> {
        Some(IndexType::String)
    }

    fn compare_keys(&self, other: &Self, _index_type: &IndexType) -> Ordering {
        self.cmp(other)
    }
}

impl IndexKey for &'static str {
    fn index_type(&self) -> Option<IndexType> {
        Some(IndexType::String)
    }

    fn compare_keys(&self, other: &Self, _index_type: &IndexType) -> Ordering {
        self.cmp(other)
    }
}

impl IndexKey for Arc<str> {
    fn index_type(&self) -> Option<IndexType> {
        Some(IndexType::String)
    }

    fn compare_keys(&self, other: &Self, _index_type: &IndexType) -> Ordering {
        self.as_ref().cmp(other.as_ref())
    }
}

impl IndexKey for NaiveDate {
    fn index_type(&self) -> Option<IndexType> {
        Some(IndexType::Date)
    }

    fn compare_keys(&self, other: &Self, _index_type: &IndexType) -> Ordering {
        self.cmp(other)
    }
}

impl IndexKey for NaiveDateTime {
    fn index_type(&self) -> Option<IndexType> {
        Some(IndexType::Date)
    }

    fn compare_keys(&self, other: &Self, _index_type: &IndexType) -> Ordering {
        self.cmp(other)
    }
}

impl IndexKey for Value {
    fn index_type(&self) -> Option<IndexType> {
        match self {
            Value::Null => None,
            Value::Number(_) => Some(IndexType::Number),
            Value::Text(_) => Some(IndexType::String),
            Value::Date(_) => Some(IndexType::Date),
            Value::Boolean(_) => Some(IndexType::Unsupported("boolean")),
        }
    }

    fn compare_keys(&self, other: &Self, index_type: &IndexType) -> Ordering {
        match (index_type, self, other) {
            // Dates compare by calendar instant.
            (IndexType::Date, Value::Date(a), Value::Date(b)) => a.cmp(b),
            (IndexType::Number, Value::Number(a), Value::Number(b)) => a.cmp(b),
            (IndexType::String, Value::Text(a), Value::Text(b)) => a.as_ref().cmp(b.as_ref()),
            _ => self.cmp(other),
        }
    }
}

/// Ordering predicates derived from an index classification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexOrder {
    index_type: IndexType,
}

impl IndexOrder {
    pub fn new(index_type: IndexType) -> FrameResult<Self> {
        if let IndexType::Unsupported(name) = index_type {
            return Err(FrameError::unsupported_index_type(name));
        }
        Ok(Self { index_type })
    }

    pub fn index_type(&self) -> &IndexType {
        &self.index_type
    }

    pub fn compare<I: IndexKey>(&self, a: &I, b: &I) -> Ordering {
        a.compare_keys(b, &self.index_type)
    }

    pub fn less_than<I: IndexKey>(&self, a: &I, b: &I) -> bool {
        match self.index_type {
            IndexType::Empty => true,
            _ => self.compare(a, b) == Ordering::Less,
        }
    }

    pub fn greater_than<I: IndexKey>(&self, a: &I, b: &I) -> bool {
        match self.index_type {
            IndexType::Empty => true,
            _ => self.compare(a, b) == Ordering::Greater,
        }
    }

    pub fn less_than_or_equal_to<I: IndexKey>(&self, a: &I, b: &I) -> bool {
        !self.greater_than(a, b)
    }
}

/// The index of a Series or DataFrame.
pub struct Index<I> {
    values: Sequence<I>,
    index_type: Arc<OnceLock<IndexType>>,
}

impl<I> Clone for Index<I> {
    fn clone(&self) -> Self {
        Self {
            values: self.values.clone(),
            index_type: Arc::clone(&self.index_type),
        }
    }
}

impl<I: IndexKey> Index<I> {
    pub fn new(values: Sequence<I>) -> Self {
        Self {
            values,
            index_type: Arc::new(OnceLock::new()),
        }
    }

    pub fn values(&self) -> &Sequence<I> {
        &self.values
    }

    pub fn iter(&self) -> SeqIter<'_, I> {
        self.values.iter()
    }

    pub fn count(&self) -> usize {
        self.values.count()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn to_vec(&self) -> Vec<I> {
        self.values.to_vec()
    }

    pub fn first(&self) -> Option<I> {
        self.values.first()
    }

    pub fn last(&self) -> Option<I> {
        self.values.last()
    }

    /// Classification of this index, computed once from the first present element.
    pub fn index_type(&self) -> &IndexType {
        self.index_type.get_or_init(|| {
            self.values
                .iter()
                .find_map(|value| value.index_type())
                .unwrap_or(IndexType::Empty)
        })
    }

    /// Ordering predicates for this index; fails for index types without an ordering.
    pub fn order(&self) -> FrameResult<IndexOrder> {
        IndexOrder::new(self.index_type().clone())
    }

    pub fn less_than(&self, a: &I, b: &I) -> FrameResult<bool> {
        Ok(self.order()?.less_than(a, b))
    }

    pub fn less_than_or_equal_to(&self, a: &I, b: &I) -> FrameResult<bool> {
        Ok(self.order()?.less_than_or_equal_to(a, b))
    }

    pub fn greater_than(&self, a: &I, b: &I) -> FrameResult<bool> {
        Ok(self.order()?.greater_than(a, b))
    }
}

impl<I: IndexKey + fmt::Debug> fmt::Debug for Index<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.values.iter()).finish()
    }
}
