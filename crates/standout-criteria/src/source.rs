//! Tabular data sources.
//!
//! A [`TabularDataSource`] hands out its records as a fallible iterator.
//! Sources may be re-iterable (`Vec<Record>`) or single-pass
//! ([`RecordStream`], [`CsvSource`](crate::CsvSource)); a single-pass source
//! yields nothing once consumed.

use crate::error::Result;
use crate::record::Record;

/// Producer of tabular records.
///
/// # Example
///
/// ```
/// use standout_criteria::{Record, TabularDataSource};
///
/// let mut source = vec![Record::new(["foo"]), Record::new(["bar"])];
/// let records: Vec<_> = source.records().collect::<Result<_, _>>().unwrap();
/// assert_eq!(records.len(), 2);
/// ```
pub trait TabularDataSource: Send {
    /// Returns the records of this source, in source order.
    fn records(&mut self) -> Box<dyn Iterator<Item = Result<Record>> + '_>;
}

impl TabularDataSource for Vec<Record> {
    fn records(&mut self) -> Box<dyn Iterator<Item = Result<Record>> + '_> {
        Box::new(self.iter().cloned().map(Ok))
    }
}

impl<S: TabularDataSource + ?Sized> TabularDataSource for Box<S> {
    fn records(&mut self) -> Box<dyn Iterator<Item = Result<Record>> + '_> {
        (**self).records()
    }
}

/// Single-pass source over any record iterator.
///
/// The first call to [`records`](TabularDataSource::records) takes the
/// iterator; later calls yield nothing.
pub struct RecordStream<I> {
    inner: Option<I>,
}

impl<I> RecordStream<I>
where
    I: Iterator<Item = Result<Record>> + Send,
{
    /// Wraps a fallible record iterator.
    pub fn new(inner: I) -> Self {
        RecordStream { inner: Some(inner) }
    }

    /// Returns `true` once the stream has been handed out.
    pub fn is_consumed(&self) -> bool {
        self.inner.is_none()
    }
}

impl<I> RecordStream<std::iter::Map<I, fn(Record) -> Result<Record>>>
where
    I: Iterator<Item = Record> + Send,
{
    /// Wraps an infallible record iterator.
    pub fn infallible(inner: I) -> Self {
        RecordStream::new(inner.map(Ok as fn(Record) -> Result<Record>))
    }
}

impl<I> TabularDataSource for RecordStream<I>
where
    I: Iterator<Item = Result<Record>> + Send,
{
    fn records(&mut self) -> Box<dyn Iterator<Item = Result<Record>> + '_> {
        match self.inner.take() {
            Some(inner) => Box::new(inner),
            None => Box::new(std::iter::empty()),
        }
    }
}
