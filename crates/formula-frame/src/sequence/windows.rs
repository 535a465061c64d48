use crate::error::{ensure_positive, FrameResult};
use crate::sequence::{Element, SeqIter, Sequence, Source};
use std::collections::VecDeque;

struct FixedWindow<T> {
    source: Sequence<T>,
    period: usize,
}

impl<T: Element> Source<Vec<T>> for FixedWindow<T> {
    fn iter(&self) -> SeqIter<'_, Vec<T>> {
        let period = self.period;
        let mut cursor = self.source.iter();
        Box::new(std::iter::from_fn(move || {
            let chunk: Vec<T> = cursor.by_ref().take(period).collect();
            // A trailing partial chunk is dropped.
            (chunk.len() == period).then_some(chunk)
        }))
    }
}

struct RollingWindow<T> {
    source: Sequence<T>,
    period: usize,
}

impl<T: Element> Source<Vec<T>> for RollingWindow<T> {
    fn iter(&self) -> SeqIter<'_, Vec<T>> {
        let period = self.period;
        let mut cursor = self.source.iter();
        let mut buffer: VecDeque<T> = VecDeque::with_capacity(period);
        let mut primed = false;
        Box::new(std::iter::from_fn(move || {
            if !primed {
                primed = true;
                buffer.extend(cursor.by_ref().take(period));
            } else {
                let next = cursor.next()?;
                buffer.pop_front();
                buffer.push_back(next);
            }
            (buffer.len() == period).then(|| buffer.iter().cloned().collect())
        }))
    }
}

struct VariableWindow<T, F> {
    source: Sequence<T>,
    comparer: F,
}

impl<T, F> Source<Vec<T>> for VariableWindow<T, F>
where
    T: Element,
    F: Fn(&T, &T) -> bool + Send + Sync,
{
    fn iter(&self) -> SeqIter<'_, Vec<T>> {
        let mut cursor = self.source.iter().fuse();
        let mut pending: Option<T> = None;
        Box::new(std::iter::from_fn(move || {
            let first = match pending.take() {
                Some(item) => item,
                None => cursor.next()?,
            };
            let mut chunk = vec![first];
            for item in cursor.by_ref() {
                if (self.comparer)(&chunk[chunk.len() - 1], &item) {
                    chunk.push(item);
                } else {
                    pending = Some(item);
                    break;
                }
            }
            Some(chunk)
        }))
    }
}

impl<T: Element> Sequence<T> {
    /// Non-overlapping chunks of exactly `period` elements.
    pub fn window(&self, period: usize) -> FrameResult<Sequence<Vec<T>>> {
        ensure_positive("window", "period", period)?;
        Ok(self.fixed_windows(period))
    }

    /// Overlapping chunks of exactly `period` elements, advancing one element at a time.
    pub fn rolling_window(&self, period: usize) -> FrameResult<Sequence<Vec<T>>> {
        ensure_positive("rolling_window", "period", period)?;
        Ok(self.rolling_windows(period))
    }

    /// `period` must already be validated as positive.
    pub(crate) fn fixed_windows(&self, period: usize) -> Sequence<Vec<T>> {
        Sequence::from_source(FixedWindow {
            source: self.clone(),
            period,
        })
    }

    /// `period` must already be validated as positive.
    pub(crate) fn rolling_windows(&self, period: usize) -> Sequence<Vec<T>> {
        Sequence::from_source(RollingWindow {
            source: self.clone(),
            period,
        })
    }

    /// Greedy chunks of adjacent elements for which `comparer(previous, current)` holds.
    pub fn variable_window<F>(&self, comparer: F) -> Sequence<Vec<T>>
    where
        F: Fn(&T, &T) -> bool + Send + Sync + 'static,
    {
        Sequence::from_source(VariableWindow {
            source: self.clone(),
            comparer,
        })
    }
}
