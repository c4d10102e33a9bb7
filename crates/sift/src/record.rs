//! Name-based field lookup for record types.
//!
//! Typed [`Field`] references are checked at compile time. When a field is
//! only known by name (user input, configuration), the record type must supply
//! a runtime lookup table through [`Record`].

use crate::error::{Error, Result};
use crate::field::Field;

/// A record type with a runtime table of its queryable fields.
///
/// Usually derived with `#[derive(Record)]`, which also generates one
/// associated `Field` constant per field. A manual implementation only needs
/// [`fields`](Record::fields):
///
/// ```
/// use sift::{Field, Record, Value};
///
/// struct Task {
///     title: String,
/// }
///
/// impl Task {
///     const TITLE: Field<Task> = Field::new("title", |t| Value::String(&t.title));
/// }
///
/// impl Record for Task {
///     fn fields() -> Vec<Field<Self>> {
///         vec![Task::TITLE]
///     }
/// }
///
/// assert_eq!(Task::lookup("title").unwrap().name(), "title");
/// assert!(Task::lookup("owner").is_err());
/// ```
pub trait Record: Sized {
    /// Every queryable field of the record.
    fn fields() -> Vec<Field<Self>>;

    /// Finds a field by name.
    fn field(name: &str) -> Option<Field<Self>> {
        Self::fields().into_iter().find(|field| field.name() == name)
    }

    /// Finds a field by name, failing with [`Error::UnknownField`].
    fn lookup(name: &str) -> Result<Field<Self>> {
        Self::field(name).ok_or_else(|| Error::UnknownField {
            record: type_name::<Self>(),
            field: name.to_string(),
        })
    }
}

/// Unqualified name of a type: `app::model::Person` becomes `Person`.
///
/// Generic arguments are kept as reported by the compiler.
pub fn type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let end = full.find('<').unwrap_or(full.len());
    let start = full[..end].rfind("::").map_or(0, |i| i + 2);
    &full[start..]
}
