//! Query plans.
//!
//! A [`QueryPlan`] is the compiled, executable form of [`Criteria`]: a
//! predicate, an optional comparator and an interval. Plans are built in a
//! fixed order (where, then order by, then interval) and never mutated; each
//! step returns a new plan.

use tracing::debug;

use crate::criteria::{Criteria, Limit};
use crate::error::Result;
use crate::executor::{execute, ResultSet};
use crate::ordering::Comparator;
use crate::predicate::{compile, Predicate};
use crate::record::Record;
use crate::source::TabularDataSource;

/// Compiled predicate, comparator and interval.
///
/// The default plan is the identity: no filter, no sort, whole range.
///
/// # Example
///
/// ```
/// use standout_criteria::{Criteria, PredicateExpr, QueryPlan, Record};
///
/// let criteria = Criteria::new()
///     .filter(PredicateExpr::starts_with(0usize, "foo"))
///     .order_desc(0usize);
/// let plan = QueryPlan::build(&criteria).unwrap();
///
/// let mut source = vec![
///     Record::new(["foo", "bar"]),
///     Record::new(["baz", "qux"]),
///     Record::new(["foofoo", "barbar"]),
/// ];
/// let result = plan.process(&mut source).unwrap();
///
/// assert_eq!(result.len(), 2);
/// assert_eq!(result[0], Record::new(["foofoo", "barbar"]));
/// ```
#[derive(Debug, Clone, Default)]
pub struct QueryPlan {
    predicate: Option<Predicate>,
    comparator: Option<Comparator>,
    offset: usize,
    limit: Limit,
}

impl QueryPlan {
    /// The identity plan.
    pub fn identity() -> Self {
        QueryPlan::default()
    }

    /// Builds a plan from criteria.
    ///
    /// Equivalent to `identity().add_where(..)?.add_order_by(..).add_interval(..)`.
    ///
    /// # Errors
    ///
    /// Fails only when the criteria's predicate does not compile (an
    /// operator applied to an operand it cannot handle).
    pub fn build(criteria: &Criteria) -> Result<Self> {
        let plan = QueryPlan::identity()
            .add_where(criteria)?
            .add_order_by(criteria)
            .add_interval(criteria);
        debug!(
            filtered = plan.predicate.is_some(),
            sort_keys = plan.comparator.as_ref().map_or(0, |c| c.keys().len()),
            offset = plan.offset,
            limit = ?plan.limit.as_option(),
            "built query plan"
        );
        Ok(plan)
    }

    /// Returns a plan that also requires the criteria's predicate.
    ///
    /// The new predicate is conjoined after any existing one. Criteria
    /// without a predicate leave the plan unchanged.
    pub fn add_where(mut self, criteria: &Criteria) -> Result<Self> {
        let Some(expr) = criteria.predicate().filter(|expr| !expr.is_none()) else {
            return Ok(self);
        };
        let compiled = compile(expr)?;
        self.predicate = Some(match self.predicate.take() {
            Some(existing) => existing.and(compiled),
            None => compiled,
        });
        Ok(self)
    }

    /// Returns a plan that also sorts by the criteria's orderings.
    ///
    /// An existing comparator stays primary; the criteria's keys only break
    /// its ties. Criteria without orderings leave the plan unchanged.
    pub fn add_order_by(mut self, criteria: &Criteria) -> Self {
        if let Some(chain) = Comparator::chain(criteria.orderings()) {
            self.comparator = Some(match self.comparator.take() {
                Some(existing) => existing.then(chain),
                None => chain,
            });
        }
        self
    }

    /// Returns a plan with the criteria's offset and limit.
    pub fn add_interval(mut self, criteria: &Criteria) -> Self {
        self.offset = criteria.get_offset();
        self.limit = criteria.get_limit();
        self
    }

    /// Tests a record against the plan's predicate.
    pub fn matches(&self, record: &Record) -> bool {
        self.predicate.as_ref().map_or(true, |p| p.test(record))
    }

    /// Returns the compiled predicate, or `None` when nothing is filtered.
    pub fn predicate(&self) -> Option<&Predicate> {
        self.predicate.as_ref()
    }

    /// Returns the comparator, or `None` when source order is kept.
    pub fn comparator(&self) -> Option<&Comparator> {
        self.comparator.as_ref()
    }

    /// Returns the number of records skipped.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the maximum number of records kept.
    pub fn limit(&self) -> Limit {
        self.limit
    }

    /// Runs the plan against a data source, consuming what it reads.
    pub fn process(&self, source: &mut dyn TabularDataSource) -> Result<ResultSet> {
        execute(self, source.records()).map(ResultSet::new)
    }

    /// Runs the plan against already materialized records.
    pub fn apply(&self, records: &[Record]) -> Result<ResultSet> {
        execute(self, records.iter().cloned().map(Ok)).map(ResultSet::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CriteriaError;
    use crate::expr::PredicateExpr;
    use crate::ordering::OrderBy;

    #[test]
    fn empty_criteria_build_identity() {
        let plan = QueryPlan::build(&Criteria::new()).unwrap();
        assert!(plan.predicate().is_none());
        assert!(plan.comparator().is_none());
        assert_eq!(plan.offset(), 0);
        assert_eq!(plan.limit(), Limit::Unbounded);
    }

    #[test]
    fn none_predicate_is_not_compiled() {
        let plan = QueryPlan::build(&Criteria::new().filter(PredicateExpr::None)).unwrap();
        assert!(plan.predicate().is_none());
    }

    #[test]
    fn build_attaches_every_part() {
        let criteria = Criteria::new()
            .filter(PredicateExpr::eq("a", 1))
            .order_asc("a")
            .order_desc("b")
            .offset(2)
            .limit(3);
        let plan = QueryPlan::build(&criteria).unwrap();

        assert!(plan.predicate().is_some());
        let keys: Vec<_> = plan.comparator().unwrap().keys().into_iter().cloned().collect();
        assert_eq!(keys, vec![OrderBy::asc("a"), OrderBy::desc("b")]);
        assert_eq!(plan.offset(), 2);
        assert_eq!(plan.limit(), Limit::At(3));
    }

    #[test]
    fn add_where_conjoins() {
        let plan = QueryPlan::identity()
            .add_where(&Criteria::new().filter(PredicateExpr::gt("n", 1)))
            .unwrap()
            .add_where(&Criteria::new().filter(PredicateExpr::lt("n", 3)))
            .unwrap();

        assert!(plan.matches(&Record::from_pairs([("n", 2)])));
        assert!(!plan.matches(&Record::from_pairs([("n", 3)])));
        assert!(!plan.matches(&Record::from_pairs([("n", 1)])));
    }

    #[test]
    fn add_order_by_keeps_existing_keys_primary() {
        let plan = QueryPlan::identity()
            .add_order_by(&Criteria::new().order_asc("a"))
            .add_order_by(&Criteria::new().order_desc("b"));

        let keys: Vec<_> = plan.comparator().unwrap().keys().into_iter().cloned().collect();
        assert_eq!(keys, vec![OrderBy::asc("a"), OrderBy::desc("b")]);
    }

    #[test]
    fn add_interval_replaces() {
        let plan = QueryPlan::identity()
            .add_interval(&Criteria::new().offset(4).limit(1))
            .add_interval(&Criteria::new().offset(1));

        assert_eq!(plan.offset(), 1);
        assert_eq!(plan.limit(), Limit::Unbounded);
    }

    #[test]
    fn invalid_operand_fails_build() {
        let criteria = Criteria::new().filter(PredicateExpr::starts_with("a", "x").or(
            PredicateExpr::compare("a", crate::op::Op::NotIn, "x"),
        ));
        assert!(matches!(
            QueryPlan::build(&criteria),
            Err(CriteriaError::UnsupportedOperation { .. })
        ));
    }

    #[test]
    fn process_and_apply_agree() {
        let records: Vec<Record> = (0..10).map(|n| Record::from_pairs([("n", n % 4)])).collect();
        let criteria = Criteria::new()
            .filter(PredicateExpr::neq("n", 2))
            .order_desc("n")
            .offset(1)
            .limit(4);
        let plan = QueryPlan::build(&criteria).unwrap();

        let mut source = records.clone();
        assert_eq!(plan.process(&mut source).unwrap(), plan.apply(&records).unwrap());
    }
}
