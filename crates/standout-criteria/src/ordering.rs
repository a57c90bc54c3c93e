//! Ordering types and comparator chains.
//!
//! Provides [`Dir`] for sort direction, [`OrderBy`] for field-based ordering
//! and [`Comparator`], the compiled multi-key ordering over two records.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::{CriteriaError, Result};
use crate::record::{Field, Record};
use crate::value::Value;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dir {
    /// Ascending order (smallest first).
    #[default]
    #[serde(alias = "ASC")]
    Asc,
    /// Descending order (largest first).
    #[serde(alias = "DESC")]
    Desc,
}

impl Dir {
    /// Applies this direction to an ordering.
    ///
    /// For `Asc`, returns the ordering unchanged.
    /// For `Desc`, reverses the ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Dir::Asc => ordering,
            Dir::Desc => ordering.reverse(),
        }
    }

    /// Returns the display name of this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Dir::Asc => "asc",
            Dir::Desc => "desc",
        }
    }
}

impl std::fmt::Display for Dir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single ordering key: a field and a direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    /// The field to sort by.
    pub field: Field,
    /// The sort direction.
    #[serde(default)]
    pub dir: Dir,
}

impl OrderBy {
    /// Creates a new ordering with the given direction.
    pub fn new(field: impl Into<Field>, dir: Dir) -> Self {
        OrderBy {
            field: field.into(),
            dir,
        }
    }

    /// Creates a new ascending ordering for the given field.
    pub fn asc(field: impl Into<Field>) -> Self {
        OrderBy::new(field, Dir::Asc)
    }

    /// Creates a new descending ordering for the given field.
    pub fn desc(field: impl Into<Field>) -> Self {
        OrderBy::new(field, Dir::Desc)
    }

    /// Compares the field of two records according to this key.
    ///
    /// Missing and null values are equal to each other and sort after every
    /// other value in ascending order.
    ///
    /// # Errors
    ///
    /// Returns [`CriteriaError::IncomparableValues`] if the two field values
    /// have no common order.
    pub fn compare(&self, a: &Record, b: &Record) -> Result<Ordering> {
        let left = a.field(&self.field).unwrap_or(&Value::Null);
        let right = b.field(&self.field).unwrap_or(&Value::Null);

        let ordering = match (left, right) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Null, _) => Ordering::Greater,
            (_, Value::Null) => Ordering::Less,
            _ => left
                .compare(right)
                .ok_or_else(|| CriteriaError::IncomparableValues {
                    field: self.field.to_string(),
                    left: left.type_name(),
                    right: right.type_name(),
                })?,
        };
        Ok(self.dir.apply(ordering))
    }

    /// Like [`compare`](OrderBy::compare), but ranks incomparable values
    /// with [`Value::total_cmp`] instead of failing.
    pub fn total_compare(&self, a: &Record, b: &Record) -> Ordering {
        let left = a.field(&self.field).unwrap_or(&Value::Null);
        let right = b.field(&self.field).unwrap_or(&Value::Null);

        let ordering = match (left, right) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Null, _) => Ordering::Greater,
            (_, Value::Null) => Ordering::Less,
            _ => left.total_cmp(right),
        };
        self.dir.apply(ordering)
    }
}

/// Compiled multi-key ordering over two records.
///
/// Each link compares one key and defers to the next link only when the key
/// compares equal. Build one with [`Comparator::chain`].
#[derive(Debug, Clone)]
pub struct Comparator {
    key: OrderBy,
    next: Option<Box<Comparator>>,
}

impl Comparator {
    /// Builds a comparator chain from an ordered list of keys.
    ///
    /// The list is processed in reverse: the last key has no fallback and
    /// every earlier key falls back to the chain built before it, so the
    /// first key is the primary sort key. Returns `None` for an empty list,
    /// meaning "do not sort".
    ///
    /// # Example
    ///
    /// ```
    /// use std::cmp::Ordering;
    /// use standout_criteria::{Comparator, OrderBy, Record};
    ///
    /// let chain = Comparator::chain(&[OrderBy::asc("a"), OrderBy::desc("b")]).unwrap();
    ///
    /// let x = Record::from_pairs([("a", 1), ("b", 1)]);
    /// let y = Record::from_pairs([("a", 1), ("b", 2)]);
    /// assert_eq!(chain.compare(&x, &y).unwrap(), Ordering::Greater);
    /// ```
    pub fn chain(orderings: &[OrderBy]) -> Option<Comparator> {
        orderings.iter().rev().fold(None, |next, key| {
            Some(Comparator {
                key: key.clone(),
                next: next.map(Box::new),
            })
        })
    }

    /// Compares two records.
    ///
    /// # Errors
    ///
    /// Returns [`CriteriaError::IncomparableValues`] the first time a key
    /// meets two incompatible field values.
    pub fn compare(&self, a: &Record, b: &Record) -> Result<Ordering> {
        match self.key.compare(a, b)? {
            Ordering::Equal => match &self.next {
                Some(next) => next.compare(a, b),
                None => Ok(Ordering::Equal),
            },
            ordering => Ok(ordering),
        }
    }

    /// Total counterpart of [`compare`](Comparator::compare).
    ///
    /// Agrees with `compare` on every pair it accepts, so a sort may switch
    /// to it after a comparison error and still see one consistent order.
    pub fn total_compare(&self, a: &Record, b: &Record) -> Ordering {
        self.key.total_compare(a, b).then_with(|| match &self.next {
            Some(next) => next.total_compare(a, b),
            None => Ordering::Equal,
        })
    }

    /// Appends `fallback` after the last link of this chain.
    ///
    /// Records equal under every key of `self` are then ordered by
    /// `fallback`.
    pub fn then(mut self, fallback: Comparator) -> Comparator {
        self.next = Some(Box::new(match self.next {
            Some(next) => (*next).then(fallback),
            None => fallback,
        }));
        self
    }

    /// Returns the keys of this chain, primary key first.
    pub fn keys(&self) -> Vec<&OrderBy> {
        let mut keys = vec![&self.key];
        let mut link = self.next.as_deref();
        while let Some(comparator) = link {
            keys.push(&comparator.key);
            link = comparator.next.as_deref();
        }
        keys
    }
}
