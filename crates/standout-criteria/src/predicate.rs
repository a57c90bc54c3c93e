//! Predicate compilation.
//!
//! [`compile`] turns a [`PredicateExpr`] tree into one [`Predicate`]: a
//! shareable closure testing a single record. Operator/operand shape errors
//! surface here, at compile time; evaluation itself never fails.

use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::error::Result;
use crate::expr::{Comparison, PredicateExpr};
use crate::op::Op;
use crate::record::Record;
use crate::value::Value;

type TestFn = dyn Fn(&Record) -> bool + Send + Sync;

/// Compiled single-record boolean test.
///
/// Cloning shares the compiled closure.
#[derive(Clone)]
pub struct Predicate(Arc<TestFn>);

impl Predicate {
    /// Wraps a closure as a predicate.
    pub fn new<F>(test: F) -> Self
    where
        F: Fn(&Record) -> bool + Send + Sync + 'static,
    {
        Predicate(Arc::new(test))
    }

    /// The constant-true predicate.
    pub fn always() -> Self {
        Predicate::new(|_| true)
    }

    /// Tests a record.
    pub fn test(&self, record: &Record) -> bool {
        (self.0)(record)
    }

    /// Short-circuit conjunction: `other` only runs when `self` holds.
    pub fn and(self, other: Predicate) -> Self {
        Predicate::new(move |record| self.test(record) && other.test(record))
    }

    /// Short-circuit disjunction: `other` only runs when `self` fails.
    pub fn or(self, other: Predicate) -> Self {
        Predicate::new(move |record| self.test(record) || other.test(record))
    }

    /// Negation.
    pub fn negate(self) -> Self {
        Predicate::new(move |record| !self.test(record))
    }
}

impl Default for Predicate {
    fn default() -> Self {
        Predicate::always()
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate(..)")
    }
}

/// Compiles an expression tree into a single predicate.
///
/// # Errors
///
/// Returns [`CriteriaError::UnsupportedOperation`](crate::CriteriaError::UnsupportedOperation)
/// if a comparison's operator cannot apply to its operand (e.g. `in` with a
/// scalar).
///
/// # Example
///
/// ```
/// use standout_criteria::{compile, PredicateExpr, Record};
///
/// let predicate = compile(&PredicateExpr::eq("prenoms", "Adam")).unwrap();
///
/// assert!(predicate.test(&Record::from_pairs([("prenoms", "Adam")])));
/// assert!(!predicate.test(&Record::from_pairs([("prenoms", "Eve")])));
/// assert!(!predicate.test(&Record::from_pairs([("annee", "2004")])));
/// ```
pub fn compile(expr: &PredicateExpr) -> Result<Predicate> {
    let predicate = match expr {
        PredicateExpr::None => Predicate::always(),
        PredicateExpr::Comparison(comparison) => compile_comparison(comparison)?,
        PredicateExpr::And(left, right) => compile(left)?.and(compile(right)?),
        PredicateExpr::Or(left, right) => compile(left)?.or(compile(right)?),
        PredicateExpr::Not(inner) => compile(inner)?.negate(),
    };
    Ok(predicate)
}

fn compile_comparison(comparison: &Comparison) -> Result<Predicate> {
    let Comparison { field, op, value } = comparison.clone();
    op.check_operand(&value)?;
    trace!(%field, %op, operand = %value, "compiled comparison");

    Ok(Predicate::new(move |record| {
        match record.field(&field) {
            Some(field_value) => matches(op, field_value, &value),
            // Missing field: false for every operator, negative ones included.
            None => false,
        }
    }))
}

/// Evaluates `field_value op operand`.
///
/// Type mismatches between field value and operand evaluate to `false`.
fn matches(op: Op, field_value: &Value, operand: &Value) -> bool {
    match op {
        Op::Eq => field_value.loose_eq(operand),
        Op::Neq => !field_value.loose_eq(operand),
        Op::Lt | Op::Lte | Op::Gt | Op::Gte => field_value
            .compare(operand)
            .is_some_and(|ordering| op.eval_ordering(ordering)),
        Op::In => contains_value(operand, field_value),
        Op::NotIn => operand.is_list() && !contains_value(operand, field_value),
        Op::MemberOf => contains_value(field_value, operand),
        Op::Contains => match_string(field_value, operand, |f, o| f.contains(o)),
        Op::StartsWith => match_string(field_value, operand, |f, o| f.starts_with(o)),
        Op::EndsWith => match_string(field_value, operand, |f, o| f.ends_with(o)),
    }
}

fn contains_value(list: &Value, needle: &Value) -> bool {
    list.as_list()
        .is_some_and(|items| items.iter().any(|item| item.loose_eq(needle)))
}

fn match_string(field_value: &Value, operand: &Value, test: impl Fn(&str, &str) -> bool) -> bool {
    match (field_value.as_str(), operand.as_str()) {
        (Some(f), Some(o)) => test(f, o),
        _ => false,
    }
}
