//! Comparison operators for predicate expressions.
//!
//! The [`Op`] enum is the closed set of operators a
//! [`Comparison`](crate::Comparison) may use. Each operator constrains the
//! shape of its operand; [`Op::check_operand`] enforces that at compile time.

use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CriteriaError, Result};
use crate::value::Value;

/// Comparison operator.
///
/// Operators are grouped by the operand they expect:
/// - **Equality**: `Eq`, `Neq` - any operand
/// - **Ordering**: `Lt`, `Lte`, `Gt`, `Gte` - any non-null operand
/// - **Set**: `In`, `NotIn` - list operand
/// - **String**: `Contains`, `StartsWith`, `EndsWith` - string operand
/// - **Membership**: `MemberOf` - operand is looked up in a list field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Op {
    /// Equal.
    #[serde(alias = "=")]
    Eq,
    /// Not equal.
    #[serde(alias = "<>", alias = "!=")]
    Neq,
    /// Less than.
    #[serde(alias = "<")]
    Lt,
    /// Less than or equal.
    #[serde(alias = "<=")]
    Lte,
    /// Greater than.
    #[serde(alias = ">")]
    Gt,
    /// Greater than or equal.
    #[serde(alias = ">=")]
    Gte,
    /// Field value is one of the operand list.
    #[serde(alias = "IN")]
    In,
    /// Field value is none of the operand list.
    #[serde(alias = "NIN")]
    NotIn,
    /// String field contains the operand.
    #[serde(alias = "CONTAINS")]
    Contains,
    /// Operand is an element of the list field.
    #[serde(alias = "MEMBER_OF")]
    MemberOf,
    /// String field starts with the operand.
    #[serde(alias = "STARTS_WITH")]
    StartsWith,
    /// String field ends with the operand.
    #[serde(alias = "ENDS_WITH")]
    EndsWith,
}

impl Op {
    /// Every operator, in declaration order.
    pub const ALL: [Op; 12] = [
        Op::Eq,
        Op::Neq,
        Op::Lt,
        Op::Lte,
        Op::Gt,
        Op::Gte,
        Op::In,
        Op::NotIn,
        Op::Contains,
        Op::MemberOf,
        Op::StartsWith,
        Op::EndsWith,
    ];

    /// Returns `true` if this operator is decided by an [`Ordering`].
    pub fn is_ordering_op(self) -> bool {
        matches!(self, Op::Lt | Op::Lte | Op::Gt | Op::Gte)
    }

    /// Returns `true` if this operator expects a string operand.
    pub fn is_string_op(self) -> bool {
        matches!(self, Op::Contains | Op::StartsWith | Op::EndsWith)
    }

    /// Returns `true` if this operator expects a list operand.
    pub fn is_set_op(self) -> bool {
        matches!(self, Op::In | Op::NotIn)
    }

    /// Checks that `operand` has a shape this operator can apply to.
    pub fn check_operand(self, operand: &Value) -> Result<()> {
        let valid = if self.is_ordering_op() {
            !operand.is_null()
        } else if self.is_set_op() {
            operand.is_list()
        } else if self.is_string_op() {
            operand.as_str().is_some()
        } else {
            true
        };
        if valid {
            Ok(())
        } else {
            Err(CriteriaError::unsupported(self, operand.type_name()))
        }
    }

    /// Evaluates an ordering operator given an ordering result.
    ///
    /// Operators outside the ordering group always return `false`.
    pub fn eval_ordering(self, ordering: Ordering) -> bool {
        match self {
            Op::Gt => ordering == Ordering::Greater,
            Op::Gte => ordering != Ordering::Less,
            Op::Lt => ordering == Ordering::Less,
            Op::Lte => ordering != Ordering::Greater,
            _ => false,
        }
    }

    /// Returns the canonical name of this operator.
    pub fn as_str(self) -> &'static str {
        match self {
            Op::Eq => "eq",
            Op::Neq => "neq",
            Op::Lt => "lt",
            Op::Lte => "lte",
            Op::Gt => "gt",
            Op::Gte => "gte",
            Op::In => "in",
            Op::NotIn => "notIn",
            Op::Contains => "contains",
            Op::MemberOf => "memberOf",
            Op::StartsWith => "startsWith",
            Op::EndsWith => "endsWith",
        }
    }

    /// Returns the comparison symbol used in textual criteria.
    pub fn symbol(self) -> &'static str {
        match self {
            Op::Eq => "=",
            Op::Neq => "<>",
            Op::Lt => "<",
            Op::Lte => "<=",
            Op::Gt => ">",
            Op::Gte => ">=",
            Op::In => "IN",
            Op::NotIn => "NIN",
            Op::Contains => "CONTAINS",
            Op::MemberOf => "MEMBER_OF",
            Op::StartsWith => "STARTS_WITH",
            Op::EndsWith => "ENDS_WITH",
        }
    }
}

impl FromStr for Op {
    type Err = CriteriaError;

    /// Parses a canonical name or a comparison symbol.
    fn from_str(s: &str) -> Result<Self> {
        if s == "!=" {
            return Ok(Op::Neq);
        }
        Op::ALL
            .into_iter()
            .find(|op| op.as_str() == s || op.symbol() == s)
            .ok_or_else(|| CriteriaError::unsupported(s, "any"))
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
