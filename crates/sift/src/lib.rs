//! Sift - typesafe query expressions for Rust record collections.
//!
//! Sift lets you describe a filter and an ordering over a record type as a
//! typed expression tree, then either run it against in-memory data or hand
//! it to a backend that translates it. It provides:
//!
//! - Typed field references ([`Field`]) generated by `#[derive(Record)]`
//! - Comparisons with twelve operators, `ANY`/`ALL` collection modifiers and
//!   case/diacritic-insensitive string options
//! - Arbitrarily nested AND / OR / NOT trees, also via `&`, `|` and `!`
//! - A canonical text format for every expression, query and sort descriptor
//! - A reference evaluator with stable multi-key sorting
//! - A [`Backend`] trait for running queries against other stores
//!
//! # Quick Start
//!
//! ```rust
//! use sift::{Query, Record};
//!
//! #[derive(Record)]
//! struct Person {
//!     name: String,
//!     age: u32,
//!     tags: Vec<String>,
//! }
//!
//! let people = vec![
//!     Person { name: "Ann".into(), age: 34, tags: vec!["admin".into()] },
//!     Person { name: "Bob".into(), age: 9, tags: vec![] },
//!     Person { name: "Eve".into(), age: 27, tags: vec!["yellow".into()] },
//! ];
//!
//! let query = Query::filtered(
//!     Person::AGE.greater_than(18) & !Person::TAGS.contains("admin"),
//! )
//! .ordered_by([Person::NAME.asc()]);
//!
//! assert_eq!(
//!     query.to_string(),
//!     r#"FROM Person WHERE age > 18 AND NOT tags CONTAINS "admin" ORDER BY name ASC"#
//! );
//!
//! let adults = query.apply(&people).unwrap();
//! assert_eq!(adults.len(), 1);
//! assert_eq!(adults[0].name, "Eve");
//! ```
//!
//! # Canonical Format
//!
//! | Expression | Rendering |
//! |------------|-----------|
//! | `Person::NAME.equal_to("Foo")` | `name == "Foo"` |
//! | `Person::AGE.between(10..=20)?` | `age BETWEEN {10, 20}` |
//! | `Person::NAME.is_in(["Foo", "Bar"])` | `name IN {"Foo", "Bar"}` |
//! | `not(a \| b)` | `NOT (a OR b)` |
//! | `and([])` / `or([])` | `TRUEPREDICATE` / `FALSEPREDICATE` |
//!
//! # Evaluation Errors
//!
//! Building an expression only fails for malformed operands (see
//! [`Comparison::new`]). Evaluation fails per record when kinds cannot be
//! compared or a modifier does not fit the field; [`Config`] decides whether
//! such a record aborts the query or is skipped.

mod backend;
mod config;
mod error;
mod eval;
mod field;
mod format;
mod operator;
mod predicate;
mod query;
mod record;
mod sort;
mod value;

// Re-export public API
pub use backend::{Backend, MemoryBackend};
pub use config::{Config, ErrorPolicy};
pub use error::{Error, Result};
pub use eval::{compare_scalars, fold, like_match, values_equal};
pub use field::{Accessor, Field};
pub use operator::{Modifier, Operator, Options};
pub use predicate::{
    and, begins_with, between, contains, ends_with, equal_to, greater_than,
    greater_than_or_equal_to, is_in, less_than, less_than_or_equal_to, like, not, not_equal_to,
    or, Comparison, Compound, Conjunction, Negation, Operand, Predicate,
};
pub use query::Query;
pub use record::{type_name, Record};
pub use sort::{sort_records, sort_records_with, sorted_by, Dir, SortDescriptor};
pub use value::{FieldValue, Literal, Number, Timestamp, Value};

#[cfg(feature = "derive")]
pub use sift_macros::Record;
