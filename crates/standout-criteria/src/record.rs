//! Tabular records and field addressing.
//!
//! A [`Record`] is an immutable row: an ordered list of [`Value`]s, optionally
//! paired with a shared header naming each column. Fields are addressed with
//! [`Field`], either by name or by zero-based position.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Address of a field inside a record.
///
/// # Example
///
/// ```
/// use standout_criteria::Field;
///
/// assert_eq!(Field::from("year"), Field::Name("year".to_string()));
/// assert_eq!(Field::from(0usize), Field::Position(0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Field {
    /// Zero-based column position.
    Position(usize),
    /// Column name, resolved through the record's header.
    Name(String),
}

impl From<&str> for Field {
    fn from(name: &str) -> Self {
        Field::Name(name.to_string())
    }
}

impl From<String> for Field {
    fn from(name: String) -> Self {
        Field::Name(name)
    }
}

impl From<usize> for Field {
    fn from(position: usize) -> Self {
        Field::Position(position)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Position(p) => write!(f, "{p}"),
            Field::Name(n) => write!(f, "{n}"),
        }
    }
}

/// Immutable tabular record.
///
/// Cloning a record is cheap: values and header are reference counted, so
/// result sets and caches can share rows with the source they came from.
///
/// # Example
///
/// ```
/// use standout_criteria::{Record, Value};
///
/// let record = Record::from_pairs([("name", Value::from("Adam")), ("year", Value::from(2004))]);
///
/// assert_eq!(record.get("name"), Some(&Value::from("Adam")));
/// assert_eq!(record.get(1usize), Some(&Value::from(2004)));
/// assert_eq!(record.get("missing"), None);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    header: Option<Arc<[String]>>,
    values: Arc<[Value]>,
}

impl Record {
    /// Creates a record addressable by position only.
    pub fn new<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Record {
            header: None,
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates a record whose columns are named by a shared header.
    pub fn with_header<I, V>(header: Arc<[String]>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Record {
            header: Some(header),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates a record from (name, value) pairs, in column order.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let (names, values): (Vec<String>, Vec<Value>) = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .unzip();
        Record {
            header: Some(names.into()),
            values: values.into(),
        }
    }

    /// Looks up a field by name or position.
    ///
    /// Returns `None` when the field does not exist in this record.
    pub fn get(&self, field: impl Into<Field>) -> Option<&Value> {
        self.field(&field.into())
    }

    /// Looks up a field by reference, without converting.
    pub fn field(&self, field: &Field) -> Option<&Value> {
        match field {
            Field::Position(p) => self.values.get(*p),
            Field::Name(name) => {
                let position = self.header.as_deref()?.iter().position(|h| h == name)?;
                self.values.get(position)
            }
        }
    }

    /// Returns the column names, if the record has a header.
    pub fn header(&self) -> Option<&[String]> {
        self.header.as_deref()
    }

    /// Returns the values in column order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Returns the number of columns.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the record has no columns.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_lookup() {
        let record = Record::new(["foo", "bar", "baz"]);

        assert_eq!(record.get(0usize), Some(&Value::from("foo")));
        assert_eq!(record.get(2usize), Some(&Value::from("baz")));
        assert_eq!(record.get(3usize), None);
        assert_eq!(record.get("foo"), None);
        assert_eq!(record.header(), None);
    }

    #[test]
    fn named_lookup_through_header() {
        let header: Arc<[String]> = vec!["prenoms".to_string(), "annee".to_string()].into();
        let record = Record::with_header(header, [Value::from("Adam"), Value::from(2004)]);

        assert_eq!(record.get("annee"), Some(&Value::from(2004)));
        assert_eq!(record.get(0usize), Some(&Value::from("Adam")));
        assert_eq!(record.get("sexe"), None);
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn short_row_under_wider_header() {
        let header: Arc<[String]> = vec!["a".to_string(), "b".to_string()].into();
        let record = Record::with_header(header, [1]);

        assert_eq!(record.get("a"), Some(&Value::from(1)));
        assert_eq!(record.get("b"), None);
    }

    #[test]
    fn negative_position_is_not_a_field() {
        assert!(serde_json::from_str::<Field>("-1").is_err());
        assert_eq!(serde_json::from_str::<Field>("0").unwrap(), Field::Position(0));
        assert_eq!(
            serde_json::from_str::<Field>("\"annee\"").unwrap(),
            Field::from("annee")
        );
    }

    #[test]
    fn field_display() {
        assert_eq!(Field::from("name").to_string(), "name");
        assert_eq!(Field::from(3usize).to_string(), "3");
    }
}
