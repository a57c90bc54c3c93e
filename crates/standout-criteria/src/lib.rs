//! Criteria - Declarative queries over tabular records.
//!
//! Criteria turns a declarative query description into an executable plan
//! and wraps sources in collections that materialize on first access:
//!
//! - Predicate trees: comparisons combined with AND, OR, NOT
//! - Multi-key ordering with deterministic tie-breaking
//! - Pagination with offset and limit
//! - Lazy, memoizing collections that can be re-queried in memory
//! - A CSV data source built on the `csv` crate
//!
//! # Quick Start
//!
//! ```rust
//! use standout_criteria::{
//!     Criteria, CsvOptions, CsvSource, LazyCollection, PredicateExpr, QueryPlan, Selectable,
//! };
//!
//! let data = "prenoms;annee\nAdam;2004\nEve;2005\nAbel;2004\n";
//! let options = CsvOptions::default().delimiter(b';').header_offset(0);
//!
//! // Source level: build a plan and run it against the reader.
//! let criteria = Criteria::new()
//!     .filter(PredicateExpr::eq("annee", "2004"))
//!     .order_asc("prenoms");
//! let plan = QueryPlan::build(&criteria).unwrap();
//! let result = plan
//!     .process(&mut CsvSource::from_reader(data.as_bytes(), &options))
//!     .unwrap();
//! assert_eq!(result.len(), 2);
//!
//! // Collection level: materialize once, then re-query the cache.
//! let collection = LazyCollection::from_source(CsvSource::from_reader(data.as_bytes(), &options));
//! assert_eq!(collection.matching(&criteria).unwrap(), result);
//! assert_eq!(collection.count().unwrap(), 3);
//! ```
//!
//! # Execution Order
//!
//! Plans always run in the same order:
//!
//! ```text
//! filter (source order) → stable sort → skip offset → take limit
//! ```
//!
//! An empty criteria value keeps every record in source order. An offset
//! past the end yields an empty result.
//!
//! # Operators
//!
//! | Operator | Operand | Matches when |
//! |----------|---------|--------------|
//! | `Eq`, `Neq` | any | field equals / differs |
//! | `Lt`, `Lte`, `Gt`, `Gte` | non-null | field orders before / after |
//! | `In`, `NotIn` | list | field is / is not listed |
//! | `Contains`, `StartsWith`, `EndsWith` | string | string field matches |
//! | `MemberOf` | any | operand is an element of the list field |
//!
//! A comparison on a field the record does not have never matches.

mod collection;
mod criteria;
mod csv_source;
mod error;
mod executor;
mod expr;
mod op;
mod ordering;
mod plan;
mod predicate;
mod record;
mod source;
mod value;

// Re-export public API
pub use collection::{CollectionSource, LazyCollection, Selectable};
pub use criteria::{Criteria, Limit};
pub use csv_source::{CsvOptions, CsvSource};
pub use error::{CriteriaError, Result};
pub use executor::{execute, ResultSet};
pub use expr::{Comparison, PredicateExpr};
pub use op::Op;
pub use ordering::{Comparator, Dir, OrderBy};
pub use plan::QueryPlan;
pub use predicate::{compile, Predicate};
pub use record::{Field, Record};
pub use source::{RecordStream, TabularDataSource};
pub use value::{Number, Value};
