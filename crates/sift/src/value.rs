//! Runtime value types for field comparison.
//!
//! [`Value`] is what a field accessor returns for a record: it borrows from
//! the record. [`Literal`] is the owned counterpart stored inside expressions
//! as a comparison operand.

use std::cmp::Ordering;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Runtime value of a record field, borrowed from the record.
///
/// Collection-valued fields are returned as [`Value::List`]; missing values
/// (for example an empty `Option`) as [`Value::None`].
///
/// # Example
///
/// ```
/// use sift::{Field, Number, Value};
///
/// struct Person {
///     name: String,
///     age: u32,
///     tags: Vec<String>,
/// }
///
/// let name = Field::new("name", |p: &Person| Value::String(&p.name));
/// let age = Field::new("age", |p: &Person| Value::Number(Number::from(p.age)));
/// let tags = Field::new("tags", |p: &Person| {
///     Value::List(p.tags.iter().map(|t| Value::String(t)).collect())
/// });
/// # let _ = (name, age, tags);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    /// String value (borrowed).
    String(&'a str),
    /// Numeric value.
    Number(Number),
    /// Timestamp value (milliseconds since Unix epoch).
    Timestamp(Timestamp),
    /// Enum discriminant value.
    Enum(u32),
    /// Boolean value.
    Bool(bool),
    /// Collection of element values.
    List(Vec<Value<'a>>),
    /// Field not present or null.
    None,
}

impl<'a> Value<'a> {
    /// Returns `true` if this is a `None` value.
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// Returns `true` if this is a `List` value.
    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    /// Extracts the string value, if present.
    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Extracts the number value, if present.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Extracts the list elements, if this is a list.
    pub fn as_list(&self) -> Option<&[Value<'a>]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Short name of the value's kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Number(_) => "number",
            Value::Timestamp(_) => "timestamp",
            Value::Enum(_) => "enum",
            Value::Bool(_) => "bool",
            Value::List(_) => "list",
            Value::None => "none",
        }
    }
}

/// Numeric value supporting all common numeric types.
///
/// Numbers are stored in one of three variants to preserve precision.
/// Comparisons between different variants are numeric.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Number {
    /// Signed 64-bit integer.
    I64(i64),
    /// Unsigned 64-bit integer.
    U64(u64),
    /// 64-bit floating point.
    F64(f64),
}

impl Number {
    /// Converts the number to f64 for comparison.
    pub fn to_f64(self) -> f64 {
        match self {
            Number::I64(n) => n as f64,
            Number::U64(n) => n as f64,
            Number::F64(n) => n,
        }
    }

    /// Compares two numbers, handling mixed types.
    ///
    /// Returns `None` when either side is NaN.
    pub fn compare(self, other: Number) -> Option<Ordering> {
        match (self, other) {
            (Number::I64(a), Number::I64(b)) => Some(a.cmp(&b)),
            (Number::U64(a), Number::U64(b)) => Some(a.cmp(&b)),
            (Number::F64(a), Number::F64(b)) => a.partial_cmp(&b),

            // Integer mixes are exact; a negative i64 is below every u64.
            (Number::I64(a), Number::U64(b)) => Some(match u64::try_from(a) {
                Ok(a) => a.cmp(&b),
                Err(_) => Ordering::Less,
            }),
            (Number::U64(_), Number::I64(_)) => other.compare(self).map(Ordering::reverse),

            _ => self.to_f64().partial_cmp(&other.to_f64()),
        }
    }

    /// Total order used for sorting: like [`compare`](Self::compare), with NaN
    /// placed after every other number.
    pub fn total_cmp(self, other: Number) -> Ordering {
        self.compare(other)
            .unwrap_or_else(|| self.to_f64().total_cmp(&other.to_f64()))
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(*other)
    }
}

macro_rules! number_from {
    ($variant:ident as $wide:ty: $($ty:ty),*) => {
        $(
            impl From<$ty> for Number {
                fn from(n: $ty) -> Self {
                    Number::$variant(n as $wide)
                }
            }
        )*
    };
}

number_from!(I64 as i64: i8, i16, i32, i64, isize);
number_from!(U64 as u64: u8, u16, u32, u64, usize);
number_from!(F64 as f64: f64);

/// Widens through the shortest decimal text, so `0.1f32` becomes `0.1`.
impl From<f32> for Number {
    fn from(n: f32) -> Self {
        Number::F64(n.to_string().parse().unwrap_or(f64::from(n)))
    }
}

/// Timestamp value represented as milliseconds since Unix epoch.
///
/// Users convert from their preferred datetime type by implementing
/// [`FieldValue`] for it.
///
/// ```
/// use sift::Timestamp;
///
/// assert!(Timestamp(1000) < Timestamp(2000));
/// assert_eq!(Timestamp::from_secs(2).as_millis(), 2000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// Creates a new timestamp from milliseconds since Unix epoch.
    pub fn from_millis(millis: i64) -> Self {
        Timestamp(millis)
    }

    /// Creates a new timestamp from seconds since Unix epoch.
    pub fn from_secs(secs: i64) -> Self {
        Timestamp(secs * 1000)
    }

    /// Returns the timestamp as milliseconds since Unix epoch.
    pub fn as_millis(self) -> i64 {
        self.0
    }

    /// Returns the timestamp as seconds since Unix epoch.
    pub fn as_secs(self) -> i64 {
        self.0 / 1000
    }
}

/// Owned scalar stored in an expression as a comparison operand.
///
/// Unlike [`Value`], which borrows from a record, `Literal` owns its data so
/// expressions can outlive the records they are evaluated against.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Literal {
    /// String value.
    String(String),
    /// Numeric value.
    Number(Number),
    /// Timestamp value.
    Timestamp(Timestamp),
    /// Enum discriminant.
    Enum(u32),
    /// Boolean value.
    Bool(bool),
}

impl Literal {
    /// Borrows the literal as a runtime [`Value`].
    pub fn as_value(&self) -> Value<'_> {
        match self {
            Literal::String(s) => Value::String(s),
            Literal::Number(n) => Value::Number(*n),
            Literal::Timestamp(t) => Value::Timestamp(*t),
            Literal::Enum(d) => Value::Enum(*d),
            Literal::Bool(b) => Value::Bool(*b),
        }
    }

    /// Builds a literal from a scalar runtime value.
    ///
    /// Returns `None` for lists and missing values.
    pub fn from_value(value: &Value<'_>) -> Option<Literal> {
        match value {
            Value::String(s) => Some(Literal::String((*s).to_string())),
            Value::Number(n) => Some(Literal::Number(*n)),
            Value::Timestamp(t) => Some(Literal::Timestamp(*t)),
            Value::Enum(d) => Some(Literal::Enum(*d)),
            Value::Bool(b) => Some(Literal::Bool(*b)),
            Value::List(_) | Value::None => None,
        }
    }

    /// Builds a literal from anything with a scalar [`FieldValue`], such as a
    /// user enum.
    pub fn of<V: FieldValue + ?Sized>(value: &V) -> Option<Literal> {
        Literal::from_value(&value.field_value())
    }

    /// Short name of the literal's kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        self.as_value().kind()
    }
}

impl From<String> for Literal {
    fn from(s: String) -> Self {
        Literal::String(s)
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Literal::String(s.to_string())
    }
}

impl From<Number> for Literal {
    fn from(n: Number) -> Self {
        Literal::Number(n)
    }
}

impl From<Timestamp> for Literal {
    fn from(t: Timestamp) -> Self {
        Literal::Timestamp(t)
    }
}

impl From<bool> for Literal {
    fn from(b: bool) -> Self {
        Literal::Bool(b)
    }
}

macro_rules! literal_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Literal {
                fn from(n: $ty) -> Self {
                    Literal::Number(Number::from(n))
                }
            }
        )*
    };
}

literal_from_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

/// Conversion from a Rust field type to a runtime [`Value`].
///
/// `#[derive(Record)]` calls this for every queryable field. Implement it for
/// your own enums (returning [`Value::Enum`]) and datetime types (returning
/// [`Value::Timestamp`]).
///
/// ```
/// use sift::{FieldValue, Value};
///
/// #[derive(Clone, Copy)]
/// enum Status {
///     Open = 1,
///     Closed = 2,
/// }
///
/// impl FieldValue for Status {
///     fn field_value(&self) -> Value<'_> {
///         Value::Enum(*self as u32)
///     }
/// }
///
/// assert_eq!(Status::Closed.field_value(), Value::Enum(2));
/// ```
pub trait FieldValue {
    /// Returns the runtime value of `self`.
    fn field_value(&self) -> Value<'_>;
}

impl FieldValue for str {
    fn field_value(&self) -> Value<'_> {
        Value::String(self)
    }
}

impl FieldValue for String {
    fn field_value(&self) -> Value<'_> {
        Value::String(self)
    }
}

impl FieldValue for bool {
    fn field_value(&self) -> Value<'_> {
        Value::Bool(*self)
    }
}

impl FieldValue for Timestamp {
    fn field_value(&self) -> Value<'_> {
        Value::Timestamp(*self)
    }
}

macro_rules! number_field_value {
    ($($ty:ty),*) => {
        $(
            impl FieldValue for $ty {
                fn field_value(&self) -> Value<'_> {
                    Value::Number(Number::from(*self))
                }
            }
        )*
    };
}

number_field_value!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl<V: FieldValue> FieldValue for Option<V> {
    fn field_value(&self) -> Value<'_> {
        match self {
            Some(v) => v.field_value(),
            None => Value::None,
        }
    }
}

impl<V: FieldValue> FieldValue for [V] {
    fn field_value(&self) -> Value<'_> {
        Value::List(self.iter().map(FieldValue::field_value).collect())
    }
}

impl<V: FieldValue> FieldValue for Vec<V> {
    fn field_value(&self) -> Value<'_> {
        self.as_slice().field_value()
    }
}

impl<V: FieldValue + ?Sized> FieldValue for &V {
    fn field_value(&self) -> Value<'_> {
        (**self).field_value()
    }
}

impl<V: FieldValue + ?Sized> FieldValue for Box<V> {
    fn field_value(&self) -> Value<'_> {
        (**self).field_value()
    }
}
