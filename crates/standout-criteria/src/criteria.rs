//! Declarative query criteria.
//!
//! [`Criteria`] describes what to select (a predicate), in which order
//! (ordering keys) and which window of the result to keep (offset and
//! limit). Every field carries a concrete default, so the all-defaults value
//! selects everything in source order.

use serde::{Deserialize, Serialize};

use crate::error::{CriteriaError, Result};
use crate::expr::PredicateExpr;
use crate::ordering::{Dir, OrderBy};
use crate::record::Field;

/// Maximum number of records to keep.
///
/// Serializes as an integer where `-1` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Limit {
    /// Keep every remaining record.
    #[default]
    Unbounded,
    /// Keep at most this many records.
    At(usize),
}

impl Limit {
    /// Returns the bound, or `None` when unbounded.
    pub fn as_option(self) -> Option<usize> {
        match self {
            Limit::Unbounded => None,
            Limit::At(n) => Some(n),
        }
    }
}

impl TryFrom<i64> for Limit {
    type Error = CriteriaError;

    fn try_from(value: i64) -> Result<Self> {
        match value {
            -1 => Ok(Limit::Unbounded),
            n if n >= 0 => Ok(Limit::At(usize::try_from(n).unwrap_or(usize::MAX))),
            n => Err(CriteriaError::InvalidLimit(n)),
        }
    }
}

impl From<Limit> for i64 {
    fn from(limit: Limit) -> Self {
        match limit {
            Limit::Unbounded => -1,
            Limit::At(n) => i64::try_from(n).unwrap_or(i64::MAX),
        }
    }
}

impl From<Option<usize>> for Limit {
    fn from(limit: Option<usize>) -> Self {
        limit.map_or(Limit::Unbounded, Limit::At)
    }
}

/// Predicate, ordering and interval of a query.
///
/// # Example
///
/// ```
/// use standout_criteria::{Criteria, Dir, Limit, PredicateExpr};
///
/// let criteria = Criteria::new()
///     .filter(PredicateExpr::eq("prenoms", "Adam"))
///     .order_by("annee", Dir::Asc)
///     .limit(5);
///
/// assert_eq!(criteria.get_offset(), 0);
/// assert_eq!(criteria.get_limit(), Limit::At(5));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Criteria {
    predicate: Option<PredicateExpr>,
    orderings: Vec<OrderBy>,
    offset: usize,
    limit: Limit,
}

impl Criteria {
    /// Creates empty criteria: everything, in source order.
    pub fn new() -> Self {
        Criteria::default()
    }

    // ========================================================================
    // Predicate
    // ========================================================================

    /// Replaces the predicate.
    pub fn filter(mut self, expr: PredicateExpr) -> Self {
        self.predicate = Some(expr);
        self
    }

    /// Conjoins `expr` with the current predicate.
    pub fn and_where(mut self, expr: PredicateExpr) -> Self {
        self.predicate = Some(match self.predicate.take() {
            Some(current) => current.and(expr),
            None => expr,
        });
        self
    }

    /// Disjoins `expr` with the current predicate.
    pub fn or_where(mut self, expr: PredicateExpr) -> Self {
        self.predicate = Some(match self.predicate.take() {
            Some(current) => current.or(expr),
            None => expr,
        });
        self
    }

    // ========================================================================
    // Ordering
    // ========================================================================

    /// Appends an ordering key. Earlier keys take priority.
    pub fn order_by(mut self, field: impl Into<Field>, dir: Dir) -> Self {
        self.orderings.push(OrderBy::new(field, dir));
        self
    }

    /// Appends an ascending ordering key.
    pub fn order_asc(self, field: impl Into<Field>) -> Self {
        self.order_by(field, Dir::Asc)
    }

    /// Appends a descending ordering key.
    pub fn order_desc(self, field: impl Into<Field>) -> Self {
        self.order_by(field, Dir::Desc)
    }

    // ========================================================================
    // Interval
    // ========================================================================

    /// Sets the number of records to skip.
    pub fn offset(mut self, n: usize) -> Self {
        self.offset = n;
        self
    }

    /// Sets the maximum number of records to keep.
    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Limit::At(n);
        self
    }

    /// Sets the limit from a signed count where `-1` means unbounded.
    ///
    /// # Errors
    ///
    /// Returns [`CriteriaError::InvalidLimit`] for values below `-1`.
    pub fn max_results(mut self, n: i64) -> Result<Self> {
        self.limit = Limit::try_from(n)?;
        Ok(self)
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// Returns the predicate, if any.
    pub fn predicate(&self) -> Option<&PredicateExpr> {
        self.predicate.as_ref()
    }

    /// Returns the ordering keys, primary key first.
    pub fn orderings(&self) -> &[OrderBy] {
        &self.orderings
    }

    /// Returns the offset.
    pub fn get_offset(&self) -> usize {
        self.offset
    }

    /// Returns the limit.
    pub fn get_limit(&self) -> Limit {
        self.limit
    }

    /// Returns `true` if these criteria select everything in source order.
    pub fn is_empty(&self) -> bool {
        self.predicate.as_ref().map_or(true, PredicateExpr::is_none)
            && self.orderings.is_empty()
            && self.offset == 0
            && self.limit == Limit::Unbounded
    }
}
