//! Numeric summaries and change/gap helpers.
//!
//! Summaries read every value through [`Numeric`]; values without a numeric reading (nulls, text)
//! are skipped rather than treated as zero.

use crate::error::{ensure_positive, FrameError, FrameResult};
use crate::index::IndexKey;
use crate::sequence::{Element, Sequence};
use crate::series::{Series, SeriesConfig};
use crate::value::Value;
use ordered_float::OrderedFloat;
use std::collections::HashMap;
use std::hash::Hash;

/// Values with an optional numeric reading.
pub trait Numeric {
    fn to_f64(&self) -> Option<f64>;
}

macro_rules! numeric_primitive {
    ($($ty:ty),*) => {
        $(
            impl Numeric for $ty {
                fn to_f64(&self) -> Option<f64> {
                    Some(*self as f64)
                }
            }
        )*
    };
}

numeric_primitive!(f64, f32, i32, i64, u32, u64, usize);

impl Numeric for OrderedFloat<f64> {
    fn to_f64(&self) -> Option<f64> {
        Some(self.0)
    }
}

impl Numeric for Value {
    fn to_f64(&self) -> Option<f64> {
        self.as_number()
    }
}

impl<T: Numeric> Numeric for Option<T> {
    fn to_f64(&self) -> Option<f64> {
        self.as_ref().and_then(Numeric::to_f64)
    }
}

/// One distinct value with its number of occurrences.
#[derive(Clone, Debug, PartialEq)]
pub struct Frequency<V> {
    pub value: V,
    pub count: usize,
    /// `count` divided by the number of values in the series.
    pub proportion: f64,
}

impl<I: IndexKey, V: Element + Numeric> Series<I, V> {
    fn numbers(&self) -> Vec<f64> {
        self.iter().filter_map(|value| value.to_f64()).collect()
    }

    pub fn sum(&self) -> f64 {
        self.iter().filter_map(|value| value.to_f64()).sum()
    }

    pub fn average(&self) -> FrameResult<f64> {
        let numbers = self.numbers();
        if numbers.is_empty() {
            return Err(FrameError::empty_sequence("average"));
        }
        Ok(numbers.iter().sum::<f64>() / numbers.len() as f64)
    }

    pub fn median(&self) -> FrameResult<f64> {
        let mut numbers = self.numbers();
        if numbers.is_empty() {
            return Err(FrameError::empty_sequence("median"));
        }
        numbers.sort_by(f64::total_cmp);
        let mid = numbers.len() / 2;
        if numbers.len() % 2 == 0 {
            Ok((numbers[mid - 1] + numbers[mid]) / 2.0)
        } else {
            Ok(numbers[mid])
        }
    }

    pub fn min(&self) -> FrameResult<f64> {
        self.iter()
            .filter_map(|value| value.to_f64())
            .min_by(f64::total_cmp)
            .ok_or_else(|| FrameError::empty_sequence("min"))
    }

    pub fn max(&self) -> FrameResult<f64> {
        self.iter()
            .filter_map(|value| value.to_f64())
            .max_by(f64::total_cmp)
            .ok_or_else(|| FrameError::empty_sequence("max"))
    }

    /// Population variance.
    pub fn variance(&self) -> FrameResult<f64> {
        let numbers = self.numbers();
        if numbers.is_empty() {
            return Err(FrameError::empty_sequence("variance"));
        }
        let count = numbers.len() as f64;
        let mean = numbers.iter().sum::<f64>() / count;
        Ok(numbers.iter().map(|n| (n - mean).powi(2)).sum::<f64>() / count)
    }

    pub fn std_dev(&self) -> FrameResult<f64> {
        self.variance().map(f64::sqrt)
    }

    /// `last - first` over each rolling window of `period` values, indexed by the window's last
    /// index. Windows with a non-numeric endpoint produce no output.
    pub fn amount_change(&self, period: usize) -> FrameResult<Series<I, f64>> {
        ensure_positive("amount_change", "period", period)?;
        Ok(self.window_change(period, |first, last| Some(last - first)))
    }

    /// `(last - first) / first` over each rolling window of `period` values.
    pub fn proportion_change(&self, period: usize) -> FrameResult<Series<I, f64>> {
        ensure_positive("proportion_change", "period", period)?;
        Ok(self.window_change(period, |first, last| {
            (first != 0.0).then(|| (last - first) / first)
        }))
    }

    /// [`proportion_change`](Self::proportion_change) scaled to a percentage.
    pub fn percent_change(&self, period: usize) -> FrameResult<Series<I, f64>> {
        ensure_positive("percent_change", "period", period)?;
        Ok(self.window_change(period, |first, last| {
            (first != 0.0).then(|| (last - first) / first * 100.0)
        }))
    }

    fn window_change<F>(&self, period: usize, change: F) -> Series<I, f64>
    where
        F: Fn(f64, f64) -> Option<f64> + Send + Sync + 'static,
    {
        self.derive(move |s| {
            SeriesConfig::from_pairs(s.pairs().rolling_windows(period).flat_map(
                move |window, _| {
                    let (first, last) = (window.first(), window.last());
                    first.zip(last).and_then(|((_, a), (index, b))| {
                        let amount = change(a.to_f64()?, b.to_f64()?)?;
                        Some((index.clone(), amount))
                    })
                },
            ))
        })
    }
}

impl<I: IndexKey, V: Element> Series<I, V> {
    /// Insert generated pairs between adjacent pairs for which `comparer` reports a gap.
    pub fn fill_gaps<C, G, It>(&self, comparer: C, generator: G) -> Self
    where
        C: Fn(&(I, V), &(I, V)) -> bool + Send + Sync + 'static,
        G: Fn(&(I, V), &(I, V)) -> It + Send + Sync + 'static,
        It: IntoIterator<Item = (I, V)> + 'static,
        It::IntoIter: 'static,
    {
        self.derive(move |s| {
            let pairs = s.pairs();
            let filled = pairs.rolling_windows(2).flat_map(move |window, _| {
                let mut out = vec![window[0].clone()];
                if comparer(&window[0], &window[1]) {
                    out.extend(generator(&window[0], &window[1]));
                }
                out
            });
            let tail = Sequence::from_vec(pairs.last().into_iter().collect());
            SeriesConfig::from_pairs(filled.chain(&tail))
        })
    }
}

impl<I: IndexKey, V: Element + Eq + Hash> Series<I, V> {
    /// Occurrence counts per distinct value, in order of first appearance.
    pub fn frequency(&self) -> Series<usize, Frequency<V>> {
        self.derive(|s| {
            let mut order: Vec<(V, usize)> = Vec::new();
            let mut slots: HashMap<V, usize> = HashMap::new();
            for value in s.iter() {
                match slots.get(&value) {
                    Some(&slot) => order[slot].1 += 1,
                    None => {
                        slots.insert(value.clone(), order.len());
                        order.push((value, 1));
                    }
                }
            }
            let total: usize = order.iter().map(|(_, count)| count).sum();
            let frequencies: Vec<Frequency<V>> = order
                .into_iter()
                .map(|(value, count)| Frequency {
                    value,
                    count,
                    proportion: count as f64 / total as f64,
                })
                .collect();
            SeriesConfig::from_values(frequencies)
        })
    }
}
