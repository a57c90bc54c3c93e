//! Query plan execution.
//!
//! [`execute`] applies a [`QueryPlan`] to a stream of records in a fixed
//! order: filter (streaming, source order), stable sort, then interval.
//! Both the source path ([`QueryPlan::process`]) and the in-memory path
//! ([`Selectable::matching`](crate::Selectable::matching)) run through it.

use std::ops::Index;

use tracing::debug;

use crate::error::{CriteriaError, Result};
use crate::plan::QueryPlan;
use crate::record::Record;

/// Executes a plan against a record stream.
///
/// Without a comparator, the stream is only read until the interval is
/// filled. With one, every matching record must be seen before sorting.
///
/// # Errors
///
/// Propagates the first read error from `records` and the first comparison
/// error raised while sorting.
pub fn execute<I>(plan: &QueryPlan, records: I) -> Result<Vec<Record>>
where
    I: IntoIterator<Item = Result<Record>>,
{
    let offset = plan.offset();
    let limit = plan.limit().as_option();

    let mut scanned = 0usize;
    let mut matched = Vec::new();
    let stop_at = match (plan.comparator(), limit) {
        (None, Some(limit)) => Some(offset.saturating_add(limit)),
        _ => None,
    };

    if stop_at != Some(0) {
        for record in records {
            let record = record?;
            scanned += 1;
            if plan.matches(&record) {
                matched.push(record);
                if stop_at == Some(matched.len()) {
                    break;
                }
            }
        }
    }
    let total = matched.len();

    if let Some(comparator) = plan.comparator() {
        let mut failure: Option<CriteriaError> = None;
        // slice::sort_by is stable: equal records keep source order. It also
        // needs a total order, so incomparable pairs are ranked by
        // total_compare and the first error is reported after the sort.
        matched.sort_by(|a, b| {
            comparator.compare(a, b).unwrap_or_else(|err| {
                failure.get_or_insert(err);
                comparator.total_compare(a, b)
            })
        });
        if let Some(err) = failure {
            return Err(err);
        }
    }

    let window: Vec<Record> = matched
        .into_iter()
        .skip(offset)
        .take(limit.unwrap_or(usize::MAX))
        .collect();

    debug!(
        scanned,
        matched = total,
        returned = window.len(),
        offset,
        "executed query plan"
    );
    Ok(window)
}

/// Materialized output of a query plan.
///
/// A result set is already filtered, sorted and sliced. Re-querying it with
/// [`Selectable::matching`](crate::Selectable::matching) works on its records
/// in memory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    records: Vec<Record>,
}

impl ResultSet {
    /// Wraps already materialized records.
    pub fn new(records: Vec<Record>) -> Self {
        ResultSet { records }
    }

    /// Returns the number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if there are no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the record at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    /// Returns the first record, if any.
    pub fn first(&self) -> Option<&Record> {
        self.records.first()
    }

    /// Returns the last record, if any.
    pub fn last(&self) -> Option<&Record> {
        self.records.last()
    }

    /// Iterates over the records in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Returns the records as a slice.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Consumes the result set, returning its records.
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}

impl Index<usize> for ResultSet {
    type Output = Record;

    fn index(&self, index: usize) -> &Record {
        &self.records[index]
    }
}

impl IntoIterator for ResultSet {
    type Item = Record;
    type IntoIter = std::vec::IntoIter<Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl FromIterator<Record> for ResultSet {
    fn from_iter<T: IntoIterator<Item = Record>>(iter: T) -> Self {
        ResultSet::new(iter.into_iter().collect())
    }
}
