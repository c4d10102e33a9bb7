//! Typed field references.
//!
//! A [`Field`] pairs a field name with a function that reads the field from a
//! record. It is the leaf every comparison and sort descriptor is built from.

use std::fmt;
use std::ops::RangeInclusive;

use crate::error::Result;
use crate::predicate::{self, Predicate};
use crate::record::Record;
use crate::sort::SortDescriptor;
use crate::value::{Literal, Value};

/// Accessor signature: borrow a field value out of a record.
pub type Accessor<T> = for<'a> fn(&'a T) -> Value<'a>;

/// A typed reference to a queryable field of `T`.
///
/// Fields are `Copy` and can live in `const` items, which is how
/// `#[derive(Record)]` exposes them (`Person::NAME`). The name is what the
/// formatter prints; dotted names (`pet.name`) express relationships.
///
/// ```
/// use sift::{Field, Value};
///
/// struct Pet { name: String }
/// struct Person { pet: Option<Pet> }
///
/// const PET_NAME: Field<Person> = Field::new("pet.name", |p| match &p.pet {
///     Some(pet) => Value::String(&pet.name),
///     None => Value::None,
/// });
///
/// assert_eq!(PET_NAME.equal_to("Fido").to_string(), r#"pet.name == "Fido""#);
/// ```
pub struct Field<T> {
    name: &'static str,
    accessor: Accessor<T>,
}

impl<T> Field<T> {
    /// Creates a field reference from a name and an accessor.
    pub const fn new(name: &'static str, accessor: Accessor<T>) -> Self {
        Field { name, accessor }
    }

    /// Resolves a field by name through the record's lookup table.
    ///
    /// Returns [`Error::UnknownField`](crate::Error::UnknownField) when the
    /// record has no field with that name.
    pub fn named(name: &str) -> Result<Self>
    where
        T: Record,
    {
        T::lookup(name)
    }

    /// The field name as it appears in formatted expressions.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Reads the field from a record.
    pub fn value<'a>(&self, record: &'a T) -> Value<'a> {
        (self.accessor)(record)
    }

    pub fn equal_to(self, value: impl Into<Literal>) -> Predicate<T> {
        predicate::equal_to(self, value)
    }

    pub fn not_equal_to(self, value: impl Into<Literal>) -> Predicate<T> {
        predicate::not_equal_to(self, value)
    }

    pub fn less_than(self, value: impl Into<Literal>) -> Predicate<T> {
        predicate::less_than(self, value)
    }

    pub fn less_than_or_equal_to(self, value: impl Into<Literal>) -> Predicate<T> {
        predicate::less_than_or_equal_to(self, value)
    }

    pub fn greater_than(self, value: impl Into<Literal>) -> Predicate<T> {
        predicate::greater_than(self, value)
    }

    pub fn greater_than_or_equal_to(self, value: impl Into<Literal>) -> Predicate<T> {
        predicate::greater_than_or_equal_to(self, value)
    }

    pub fn begins_with(self, prefix: impl Into<String>) -> Predicate<T> {
        predicate::begins_with(self, prefix)
    }

    pub fn ends_with(self, suffix: impl Into<String>) -> Predicate<T> {
        predicate::ends_with(self, suffix)
    }

    pub fn like(self, pattern: impl Into<String>) -> Predicate<T> {
        predicate::like(self, pattern)
    }

    pub fn contains(self, element: impl Into<Literal>) -> Predicate<T> {
        predicate::contains(self, element)
    }

    pub fn is_in<I>(self, values: I) -> Predicate<T>
    where
        I: IntoIterator,
        I::Item: Into<Literal>,
    {
        predicate::is_in(self, values)
    }

    /// Fails with `InvalidRange` when the range's start is above its end.
    pub fn between<L: Into<Literal>>(self, range: RangeInclusive<L>) -> Result<Predicate<T>> {
        predicate::between(self, range)
    }

    /// Ascending sort descriptor on this field.
    pub fn asc(self) -> SortDescriptor<T> {
        SortDescriptor::asc(self)
    }

    /// Descending sort descriptor on this field.
    pub fn desc(self) -> SortDescriptor<T> {
        SortDescriptor::desc(self)
    }
}

impl<T> Clone for Field<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Field<T> {}

impl<T> fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Field").field(&self.name).finish()
    }
}

impl<T> fmt::Display for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
