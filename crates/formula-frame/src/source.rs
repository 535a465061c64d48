//! Pull-based record producers feeding a [`DataFrame`].

use crate::error::{FrameError, FrameResult};
use crate::frame::DataFrame;
use crate::series::Series;
use crate::value::Row;

/// A single-consumer producer of records.
///
/// Readers take the source by `&mut self`, so two reads can never be in flight at once.
pub trait RecordSource {
    /// Column names of the records. May only be known after the first read; once known the answer
    /// must not change.
    fn column_names(&mut self) -> FrameResult<Vec<String>>;

    /// The next record, or `None` at end of data.
    fn read(&mut self) -> FrameResult<Option<Row>>;
}

impl<S: RecordSource + ?Sized> RecordSource for Box<S> {
    fn column_names(&mut self) -> FrameResult<Vec<String>> {
        (**self).column_names()
    }

    fn read(&mut self) -> FrameResult<Option<Row>> {
        (**self).read()
    }
}

enum FuseState {
    Open,
    Finished,
    Failed(FrameError),
}

/// Stops consulting the inner source after end of data or the first error.
///
/// After a failure every call returns that same error; after end of data reads keep returning
/// `Ok(None)`.
pub struct FusedRecordSource<S> {
    inner: S,
    state: FuseState,
}

impl<S: RecordSource> FusedRecordSource<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            state: FuseState::Open,
        }
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    fn fail(&mut self, err: FrameError) -> FrameError {
        log::debug!("record source failed: {err}");
        self.state = FuseState::Failed(err.clone());
        err
    }
}

impl<S: RecordSource> RecordSource for FusedRecordSource<S> {
    fn column_names(&mut self) -> FrameResult<Vec<String>> {
        if let FuseState::Failed(err) = &self.state {
            return Err(err.clone());
        }
        self.inner.column_names().map_err(|err| self.fail(err))
    }

    fn read(&mut self) -> FrameResult<Option<Row>> {
        match &self.state {
            FuseState::Failed(err) => return Err(err.clone()),
            FuseState::Finished => return Ok(None),
            FuseState::Open => {}
        }
        match self.inner.read() {
            Ok(Some(row)) => Ok(Some(row)),
            Ok(None) => {
                self.state = FuseState::Finished;
                Ok(None)
            }
            Err(err) => Err(self.fail(err)),
        }
    }
}

/// A record source over an iterator of records.
///
/// Without explicit column names, the names are the fields of the first record. Asking for them
/// before any read reads that record ahead and hands it out by the next `read`; asking after the
/// records are drained returns the names captured when the first record went out.
pub struct IterRecordSource<It> {
    column_names: Option<Vec<String>>,
    records: It,
    peeked: Option<Row>,
}

impl<It> IterRecordSource<It>
where
    It: Iterator<Item = FrameResult<Row>>,
{
    pub fn new(records: impl IntoIterator<IntoIter = It>) -> Self {
        Self {
            column_names: None,
            records: records.into_iter(),
            peeked: None,
        }
    }

    pub fn with_column_names<N, S>(mut self, names: N) -> Self
    where
        N: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.column_names = Some(names.into_iter().map(Into::into).collect());
        self
    }
}

impl<It> RecordSource for IterRecordSource<It>
where
    It: Iterator<Item = FrameResult<Row>>,
{
    fn column_names(&mut self) -> FrameResult<Vec<String>> {
        if let Some(names) = &self.column_names {
            return Ok(names.clone());
        }
        if self.peeked.is_none() {
            self.peeked = self.records.next().transpose()?;
        }
        let names: Vec<String> = self
            .peeked
            .as_ref()
            .map(|row| row.keys().map(String::from).collect())
            .unwrap_or_default();
        self.column_names = Some(names.clone());
        Ok(names)
    }

    fn read(&mut self) -> FrameResult<Option<Row>> {
        let row = match self.peeked.take() {
            Some(row) => Some(row),
            None => self.records.next().transpose()?,
        };
        if self.column_names.is_none() {
            self.column_names = row.as_ref().map(|first| first.keys().map(String::from).collect());
        }
        Ok(row)
    }
}

impl DataFrame<usize> {
    /// Drain `source` into a memory-resident frame, stopping at the first error.
    pub fn from_record_source<S: RecordSource>(source: S) -> FrameResult<Self> {
        let mut source = FusedRecordSource::new(source);
        let mut rows = Vec::new();
        while let Some(row) = source.read()? {
            rows.push(row);
        }
        let column_names = source.column_names()?;
        log::debug!(
            "read {} records with {} columns from record source",
            rows.len(),
            column_names.len()
        );
        Ok(DataFrame::from_rows_series(Series::new(rows), Some(column_names)))
    }
}
