//! Predicate expression trees.
//!
//! A [`PredicateExpr`] is a closed, immutable boolean expression over record
//! fields. Leaves are [`Comparison`]s; inner nodes combine them with
//! `And`, `Or` and `Not`. Trees are compiled into a single
//! [`Predicate`](crate::Predicate) by [`compile`](crate::compile).

use serde::{Deserialize, Serialize};

use crate::op::Op;
use crate::record::Field;
use crate::value::Value;

/// A single comparison: a field, an operator and an operand.
///
/// # Example
///
/// ```
/// use standout_criteria::{Comparison, Field, Op, Value};
///
/// let comparison = Comparison::new("prenoms", Op::Eq, "Adam");
/// assert_eq!(comparison.field, Field::from("prenoms"));
/// assert_eq!(comparison.value, Value::from("Adam"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    /// The field to read from each record.
    pub field: Field,
    /// The comparison operator.
    pub op: Op,
    /// The operand compared against the field value.
    pub value: Value,
}

impl Comparison {
    /// Creates a new comparison.
    pub fn new(field: impl Into<Field>, op: Op, value: impl Into<Value>) -> Self {
        Comparison {
            field: field.into(),
            op,
            value: value.into(),
        }
    }
}

/// Boolean expression over record fields.
///
/// # Example
///
/// ```
/// use standout_criteria::PredicateExpr;
///
/// let expr = PredicateExpr::eq("prenoms", "Adam")
///     .and(PredicateExpr::gte("annee", 2004))
///     .or(!PredicateExpr::is_in("sexe", vec!["M", "F"]));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PredicateExpr {
    /// Always true.
    #[default]
    None,
    /// Field comparison.
    Comparison(Comparison),
    /// Both sides must hold; the right side is only evaluated when the left holds.
    And(Box<PredicateExpr>, Box<PredicateExpr>),
    /// Either side must hold; the right side is only evaluated when the left fails.
    Or(Box<PredicateExpr>, Box<PredicateExpr>),
    /// Negation.
    Not(Box<PredicateExpr>),
}

impl PredicateExpr {
    /// Creates a comparison leaf.
    pub fn compare(field: impl Into<Field>, op: Op, value: impl Into<Value>) -> Self {
        PredicateExpr::Comparison(Comparison::new(field, op, value))
    }

    // ========================================================================
    // Leaf builders
    // ========================================================================

    /// `field == value`.
    pub fn eq(field: impl Into<Field>, value: impl Into<Value>) -> Self {
        Self::compare(field, Op::Eq, value)
    }

    /// `field != value`.
    pub fn neq(field: impl Into<Field>, value: impl Into<Value>) -> Self {
        Self::compare(field, Op::Neq, value)
    }

    /// `field < value`.
    pub fn lt(field: impl Into<Field>, value: impl Into<Value>) -> Self {
        Self::compare(field, Op::Lt, value)
    }

    /// `field <= value`.
    pub fn lte(field: impl Into<Field>, value: impl Into<Value>) -> Self {
        Self::compare(field, Op::Lte, value)
    }

    /// `field > value`.
    pub fn gt(field: impl Into<Field>, value: impl Into<Value>) -> Self {
        Self::compare(field, Op::Gt, value)
    }

    /// `field >= value`.
    pub fn gte(field: impl Into<Field>, value: impl Into<Value>) -> Self {
        Self::compare(field, Op::Gte, value)
    }

    /// Field value is one of `values`.
    pub fn is_in(field: impl Into<Field>, values: impl Into<Value>) -> Self {
        Self::compare(field, Op::In, values)
    }

    /// Field value is none of `values`.
    pub fn not_in(field: impl Into<Field>, values: impl Into<Value>) -> Self {
        Self::compare(field, Op::NotIn, values)
    }

    /// String field contains `needle`.
    pub fn contains(field: impl Into<Field>, needle: &str) -> Self {
        Self::compare(field, Op::Contains, needle)
    }

    /// String field starts with `prefix`.
    pub fn starts_with(field: impl Into<Field>, prefix: &str) -> Self {
        Self::compare(field, Op::StartsWith, prefix)
    }

    /// String field ends with `suffix`.
    pub fn ends_with(field: impl Into<Field>, suffix: &str) -> Self {
        Self::compare(field, Op::EndsWith, suffix)
    }

    /// `value` is an element of the list field.
    pub fn member_of(field: impl Into<Field>, value: impl Into<Value>) -> Self {
        Self::compare(field, Op::MemberOf, value)
    }

    // ========================================================================
    // Combinators
    // ========================================================================

    /// Conjunction of `self` and `other`.
    pub fn and(self, other: PredicateExpr) -> Self {
        PredicateExpr::And(Box::new(self), Box::new(other))
    }

    /// Disjunction of `self` and `other`.
    pub fn or(self, other: PredicateExpr) -> Self {
        PredicateExpr::Or(Box::new(self), Box::new(other))
    }

    /// Left-folded conjunction; an empty input is `None` (always true).
    pub fn all(exprs: impl IntoIterator<Item = PredicateExpr>) -> Self {
        exprs
            .into_iter()
            .reduce(PredicateExpr::and)
            .unwrap_or_default()
    }

    /// Left-folded disjunction; an empty input is `None` (always true).
    pub fn any(exprs: impl IntoIterator<Item = PredicateExpr>) -> Self {
        exprs
            .into_iter()
            .reduce(PredicateExpr::or)
            .unwrap_or_default()
    }

    /// Returns `true` for the `None` leaf.
    pub fn is_none(&self) -> bool {
        matches!(self, PredicateExpr::None)
    }

    /// Returns the number of comparison leaves in the tree.
    pub fn comparisons(&self) -> usize {
        match self {
            PredicateExpr::None => 0,
            PredicateExpr::Comparison(_) => 1,
            PredicateExpr::And(l, r) | PredicateExpr::Or(l, r) => l.comparisons() + r.comparisons(),
            PredicateExpr::Not(inner) => inner.comparisons(),
        }
    }
}

impl From<Comparison> for PredicateExpr {
    fn from(comparison: Comparison) -> Self {
        PredicateExpr::Comparison(comparison)
    }
}

impl std::ops::Not for PredicateExpr {
    type Output = PredicateExpr;

    fn not(self) -> Self::Output {
        PredicateExpr::Not(Box::new(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combinators_build_binary_nodes() {
        let expr = PredicateExpr::eq("a", 1).and(PredicateExpr::eq("b", 2));
        assert!(matches!(expr, PredicateExpr::And(_, _)));
        assert_eq!(expr.comparisons(), 2);

        let negated = !expr;
        assert!(matches!(negated, PredicateExpr::Not(_)));
        assert_eq!(negated.comparisons(), 2);
    }

    #[test]
    fn all_and_any_fold_left() {
        let expr = PredicateExpr::all([
            PredicateExpr::eq("a", 1),
            PredicateExpr::eq("b", 2),
            PredicateExpr::eq("c", 3),
        ]);
        match expr {
            PredicateExpr::And(left, right) => {
                assert!(matches!(*left, PredicateExpr::And(_, _)));
                assert_eq!(*right, PredicateExpr::eq("c", 3));
            }
            other => panic!("expected And, got {other:?}"),
        }

        assert!(PredicateExpr::any([]).is_none());
        assert!(PredicateExpr::all([]).is_none());
    }

    #[test]
    fn leaf_builders_pick_operators() {
        let expr = PredicateExpr::not_in("sexe", vec!["M"]);
        assert_eq!(
            expr,
            PredicateExpr::Comparison(Comparison::new("sexe", Op::NotIn, vec!["M"]))
        );
        assert_eq!(
            PredicateExpr::starts_with(0usize, "foo"),
            PredicateExpr::compare(0usize, Op::StartsWith, "foo")
        );
    }
}
