//! Lazily materialized record collections.
//!
//! A [`LazyCollection`] holds either a raw [`TabularDataSource`] or an
//! already executed [`ResultSet`] and reads nothing until first observed.
//! The first call to any reader (count, index, iterate, matching) runs the
//! materialization exactly once, caches the records and drops the source.
//!
//! # Example
//!
//! ```
//! use standout_criteria::{Criteria, LazyCollection, PredicateExpr, Record, Selectable};
//!
//! let source = vec![
//!     Record::from_pairs([("prenoms", "Adam"), ("sexe", "M")]),
//!     Record::from_pairs([("prenoms", "Eve"), ("sexe", "F")]),
//! ];
//! let collection = LazyCollection::from_source(source);
//! assert!(!collection.is_initialized());
//!
//! assert_eq!(collection.count().unwrap(), 2);
//! assert!(collection.is_initialized());
//!
//! let girls = collection
//!     .matching(&Criteria::new().filter(PredicateExpr::eq("sexe", "F")))
//!     .unwrap();
//! assert_eq!(girls.len(), 1);
//! ```

use std::any::Any;
use std::fmt;
use std::sync::{Mutex, PoisonError};

use once_cell::sync::OnceCell;
use tracing::debug;

use crate::criteria::Criteria;
use crate::error::{CriteriaError, Result};
use crate::executor::{execute, ResultSet};
use crate::plan::QueryPlan;
use crate::record::Record;
use crate::source::TabularDataSource;

/// The two inputs a collection can materialize from.
pub enum CollectionSource {
    /// Raw source, read through the identity plan.
    Records(Box<dyn TabularDataSource>),
    /// Already executed result, copied as is.
    ResultSet(ResultSet),
}

impl fmt::Debug for CollectionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectionSource::Records(_) => f.write_str("Records(..)"),
            CollectionSource::ResultSet(set) => f.debug_tuple("ResultSet").field(&set.len()).finish(),
        }
    }
}

/// Capability to re-query a materialized collection with [`Criteria`].
pub trait Selectable {
    /// Selects the records matching `criteria` into a new, independent
    /// result set.
    fn matching(&self, criteria: &Criteria) -> Result<ResultSet>;
}

impl Selectable for ResultSet {
    fn matching(&self, criteria: &Criteria) -> Result<ResultSet> {
        QueryPlan::build(criteria)?.apply(self.records())
    }
}

/// Record collection that materializes on first access.
pub struct LazyCollection {
    source: Mutex<Option<CollectionSource>>,
    cache: OnceCell<Vec<Record>>,
}

impl LazyCollection {
    /// Creates an uninitialized collection.
    pub fn new(source: CollectionSource) -> Self {
        LazyCollection {
            source: Mutex::new(Some(source)),
            cache: OnceCell::new(),
        }
    }

    /// Creates a collection over a raw data source.
    pub fn from_source<S: TabularDataSource + 'static>(source: S) -> Self {
        LazyCollection::new(CollectionSource::Records(Box::new(source)))
    }

    /// Creates a collection over an executed result set.
    pub fn from_result_set(result: ResultSet) -> Self {
        LazyCollection::new(CollectionSource::ResultSet(result))
    }

    /// Returns `true` once the records have been materialized.
    pub fn is_initialized(&self) -> bool {
        self.cache.get().is_some()
    }

    /// Materializes the collection if it has not been yet.
    ///
    /// Concurrent callers block until the single materialization finishes
    /// and then observe the same cache.
    ///
    /// # Errors
    ///
    /// Propagates source read errors. Once a materialization has failed,
    /// the source is gone and every later call returns
    /// [`CriteriaError::SourceConsumed`].
    pub fn initialize(&self) -> Result<()> {
        self.ensure_initialized().map(|_| ())
    }

    fn ensure_initialized(&self) -> Result<&[Record]> {
        self.cache
            .get_or_try_init(|| self.materialize())
            .map(Vec::as_slice)
    }

    fn materialize(&self) -> Result<Vec<Record>> {
        let source = self
            .source
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .ok_or(CriteriaError::SourceConsumed)?;

        let records = match source {
            CollectionSource::ResultSet(result) => result.into_records(),
            CollectionSource::Records(mut source) => {
                execute(&QueryPlan::identity(), source.records())?
            }
        };
        debug!(records = records.len(), "materialized collection");
        Ok(records)
    }

    /// Returns the number of records.
    pub fn count(&self) -> Result<usize> {
        Ok(self.ensure_initialized()?.len())
    }

    /// Returns `true` if the collection has no records.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.ensure_initialized()?.is_empty())
    }

    /// Returns the record at `index`, or `None` when out of range.
    pub fn get(&self, index: usize) -> Result<Option<&Record>> {
        Ok(self.ensure_initialized()?.get(index))
    }

    /// Returns `true` if `index` addresses a record.
    pub fn contains_key(&self, index: usize) -> Result<bool> {
        Ok(index < self.count()?)
    }

    /// Returns the first record, if any.
    pub fn first(&self) -> Result<Option<&Record>> {
        Ok(self.ensure_initialized()?.first())
    }

    /// Returns the last record, if any.
    pub fn last(&self) -> Result<Option<&Record>> {
        Ok(self.ensure_initialized()?.last())
    }

    /// Returns `true` if an equal record is cached.
    pub fn contains(&self, record: &Record) -> Result<bool> {
        Ok(self.ensure_initialized()?.contains(record))
    }

    /// Returns the index of the first equal record, if any.
    pub fn index_of(&self, record: &Record) -> Result<Option<usize>> {
        Ok(self.ensure_initialized()?.iter().position(|r| r == record))
    }

    /// Returns up to `len` records starting at `offset`; all remaining
    /// records when `len` is `None`. The cache is left untouched.
    pub fn slice(&self, offset: usize, len: Option<usize>) -> Result<Vec<Record>> {
        Ok(self
            .ensure_initialized()?
            .iter()
            .skip(offset)
            .take(len.unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    /// Iterates over `(index, record)` pairs in cache order.
    ///
    /// Every call starts a fresh iterator over the same cache.
    pub fn iter(&self) -> Result<std::iter::Enumerate<std::slice::Iter<'_, Record>>> {
        Ok(self.ensure_initialized()?.iter().enumerate())
    }

    /// Returns the records in cache order.
    pub fn to_vec(&self) -> Result<Vec<Record>> {
        Ok(self.ensure_initialized()?.to_vec())
    }

    /// Consumes the collection into a result set.
    pub fn into_result_set(self) -> Result<ResultSet> {
        self.ensure_initialized()?;
        Ok(ResultSet::new(self.cache.into_inner().unwrap_or_default()))
    }
}

impl Selectable for LazyCollection {
    /// Applies `criteria` to the cached records, never to the original
    /// source. The cache itself is left untouched.
    fn matching(&self, criteria: &Criteria) -> Result<ResultSet> {
        let records = self.ensure_initialized()?;
        QueryPlan::build(criteria)?.apply(records)
    }
}

impl fmt::Debug for LazyCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyCollection")
            .field("initialized", &self.is_initialized())
            .field("records", &self.cache.get().map(Vec::len))
            .finish()
    }
}

impl From<ResultSet> for LazyCollection {
    fn from(result: ResultSet) -> Self {
        LazyCollection::from_result_set(result)
    }
}

impl TryFrom<Box<dyn Any + Send>> for LazyCollection {
    type Error = CriteriaError;

    /// Accepts a boxed [`ResultSet`], `Box<dyn TabularDataSource>` or
    /// `Vec<Record>`.
    ///
    /// # Errors
    ///
    /// Returns [`CriteriaError::TypeMismatch`] for anything else, before any
    /// record is read.
    fn try_from(input: Box<dyn Any + Send>) -> Result<Self> {
        let input = match input.downcast::<ResultSet>() {
            Ok(result) => return Ok(LazyCollection::from_result_set(*result)),
            Err(input) => input,
        };
        let input = match input.downcast::<Box<dyn TabularDataSource>>() {
            Ok(source) => return Ok(LazyCollection::new(CollectionSource::Records(*source))),
            Err(input) => input,
        };
        match input.downcast::<Vec<Record>>() {
            Ok(records) => Ok(LazyCollection::from_source(*records)),
            Err(_) => Err(CriteriaError::TypeMismatch {
                expected: "a tabular data source or a result set",
                actual: "an unrecognized value",
            }),
        }
    }
}
