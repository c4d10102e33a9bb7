//! Expression trees: comparisons, compounds and negations.
//!
//! A [`Predicate`] is an immutable tree. Composition with [`and`], [`or`],
//! [`not`] (or the `&`, `|`, `!` operators) always builds a new node; the
//! operands are shared through reference counting, never modified. Nesting is
//! kept exactly as written: compounds are not flattened and double negations
//! are not cancelled, because both are visible in the canonical format.
//!
//! ```
//! use sift::{and, not, or, Field, Number, Value};
//!
//! struct Person { name: String, age: u32 }
//!
//! let name = Field::new("name", |p: &Person| Value::String(&p.name));
//! let age = Field::new("age", |p: &Person| Value::Number(Number::from(p.age)));
//!
//! let by_function = not(or([name.equal_to(""), age.less_than(10)]));
//! let by_operator = !(name.equal_to("") | age.less_than(10));
//!
//! assert_eq!(by_function.to_string(), r#"NOT (name == "" OR age < 10)"#);
//! assert_eq!(by_function.to_string(), by_operator.to_string());
//! ```

use std::fmt;
use std::ops::{BitAnd, BitOr, Not, RangeInclusive};
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::eval::compare_literals;
use crate::field::Field;
use crate::operator::{Modifier, Operator, Options};
use crate::record::Record;
use crate::value::Literal;

/// Right-hand side of a comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// A single value.
    Scalar(Literal),
    /// Inclusive bounds, for `Between`.
    Range(Literal, Literal),
    /// A set of candidates, for `In`.
    List(Vec<Literal>),
}

impl Operand {
    fn shape(&self) -> &'static str {
        match self {
            Operand::Scalar(_) => "a single value",
            Operand::Range(..) => "a range",
            Operand::List(_) => "a list",
        }
    }
}

impl<L: Into<Literal>> From<L> for Operand {
    fn from(value: L) -> Self {
        Operand::Scalar(value.into())
    }
}

impl<L: Into<Literal>> From<RangeInclusive<L>> for Operand {
    fn from(range: RangeInclusive<L>) -> Self {
        let (lower, upper) = range.into_inner();
        Operand::Range(lower.into(), upper.into())
    }
}

/// A leaf expression: one field tested against an operand.
pub struct Comparison<T> {
    field: Field<T>,
    operator: Operator,
    operand: Operand,
    modifier: Modifier,
    options: Options,
}

impl<T> Comparison<T> {
    /// Builds a comparison, checking that the operand fits the operator.
    ///
    /// - `Between` needs an [`Operand::Range`] whose bounds share a kind and
    ///   are ordered (`InvalidRange` otherwise).
    /// - `In` needs an [`Operand::List`].
    /// - `BeginsWith`, `EndsWith` and `Like` need a string scalar.
    /// - Every other operator needs a scalar.
    pub fn new(field: Field<T>, operator: Operator, operand: impl Into<Operand>) -> Result<Self> {
        let operand = operand.into();
        validate(operator, &operand)?;
        Ok(Comparison {
            field,
            operator,
            operand,
            modifier: Modifier::Direct,
            options: Options::NONE,
        })
    }

    /// Builds a comparison on a field resolved by name.
    pub fn named(name: &str, operator: Operator, operand: impl Into<Operand>) -> Result<Self>
    where
        T: Record,
    {
        Comparison::new(T::lookup(name)?, operator, operand)
    }

    /// Returns the comparison with a different collection modifier.
    pub fn modifier(self, modifier: Modifier) -> Self {
        Comparison { modifier, ..self }
    }

    /// Returns the comparison with different string options.
    pub fn options(self, options: Options) -> Self {
        Comparison { options, ..self }
    }

    pub fn field(&self) -> Field<T> {
        self.field
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn operand(&self) -> &Operand {
        &self.operand
    }

    pub fn get_modifier(&self) -> Modifier {
        self.modifier
    }

    pub fn get_options(&self) -> Options {
        self.options
    }
}

fn validate(operator: Operator, operand: &Operand) -> Result<()> {
    let malformed = |expected: &'static str, found: &'static str| Error::MalformedOperand {
        operator,
        expected,
        found,
    };

    match (operator, operand) {
        (Operator::Between, Operand::Range(lower, upper)) => {
            match compare_literals(lower, upper) {
                Some(std::cmp::Ordering::Greater) => Err(Error::InvalidRange {
                    lower: lower.to_string(),
                    upper: upper.to_string(),
                }),
                Some(_) => Ok(()),
                None => Err(malformed("two comparable bounds", "bounds of different kinds")),
            }
        }
        (Operator::Between, other) => Err(malformed("a range", other.shape())),

        (Operator::In, Operand::List(_)) => Ok(()),
        (Operator::In, other) => Err(malformed("a list", other.shape())),

        (op, Operand::Scalar(Literal::String(_))) if op.is_string_op() => Ok(()),
        (op, Operand::Scalar(lit)) if op.is_string_op() => {
            Err(malformed("a string value", lit.kind()))
        }

        (_, Operand::Scalar(_)) => Ok(()),
        (_, other) => Err(malformed("a single value", other.shape())),
    }
}

impl<T> Clone for Comparison<T> {
    fn clone(&self) -> Self {
        Comparison {
            field: self.field,
            operator: self.operator,
            operand: self.operand.clone(),
            modifier: self.modifier,
            options: self.options,
        }
    }
}

impl<T> fmt::Debug for Comparison<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Comparison")
            .field("field", &self.field)
            .field("operator", &self.operator)
            .field("operand", &self.operand)
            .field("modifier", &self.modifier)
            .field("options", &self.options)
            .finish()
    }
}

/// Logical connective of a [`Compound`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Conjunction {
    And,
    Or,
}

impl Conjunction {
    /// The separator placed between children by the formatter.
    pub fn separator(self) -> &'static str {
        match self {
            Conjunction::And => " AND ",
            Conjunction::Or => " OR ",
        }
    }
}

/// An AND/OR over any number of children, in order.
pub struct Compound<T> {
    kind: Conjunction,
    children: Arc<[Predicate<T>]>,
}

impl<T> Compound<T> {
    pub fn kind(&self) -> Conjunction {
        self.kind
    }

    pub fn children(&self) -> &[Predicate<T>] {
        &self.children
    }
}

impl<T> Clone for Compound<T> {
    fn clone(&self) -> Self {
        Compound {
            kind: self.kind,
            children: Arc::clone(&self.children),
        }
    }
}

/// Logical complement of a child expression.
pub struct Negation<T> {
    child: Arc<Predicate<T>>,
}

impl<T> Negation<T> {
    pub fn child(&self) -> &Predicate<T> {
        &self.child
    }
}

impl<T> Clone for Negation<T> {
    fn clone(&self) -> Self {
        Negation {
            child: Arc::clone(&self.child),
        }
    }
}

/// A filter expression over records of type `T`.
///
/// Cloning is cheap: nodes are reference counted.
pub enum Predicate<T> {
    Comparison(Arc<Comparison<T>>),
    Compound(Compound<T>),
    Not(Negation<T>),
}

impl<T> Predicate<T> {
    /// Combines `self` and `other` with AND.
    pub fn and(self, other: Predicate<T>) -> Predicate<T> {
        and([self, other])
    }

    /// Combines `self` and `other` with OR.
    pub fn or(self, other: Predicate<T>) -> Predicate<T> {
        or([self, other])
    }

    /// Wraps `self` in a negation.
    pub fn negate(self) -> Predicate<T> {
        not(self)
    }

    /// The canonical format of this expression.
    pub fn format(&self) -> String {
        self.to_string()
    }
}

impl<T> Clone for Predicate<T> {
    fn clone(&self) -> Self {
        match self {
            Predicate::Comparison(c) => Predicate::Comparison(Arc::clone(c)),
            Predicate::Compound(c) => Predicate::Compound(c.clone()),
            Predicate::Not(n) => Predicate::Not(n.clone()),
        }
    }
}

impl<T> fmt::Debug for Predicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Predicate").field(&self.to_string()).finish()
    }
}

impl<T> From<Comparison<T>> for Predicate<T> {
    fn from(comparison: Comparison<T>) -> Self {
        Predicate::Comparison(Arc::new(comparison))
    }
}

impl<T> BitAnd for Predicate<T> {
    type Output = Predicate<T>;

    fn bitand(self, rhs: Predicate<T>) -> Predicate<T> {
        and([self, rhs])
    }
}

impl<T> BitOr for Predicate<T> {
    type Output = Predicate<T>;

    fn bitor(self, rhs: Predicate<T>) -> Predicate<T> {
        or([self, rhs])
    }
}

impl<T> Not for Predicate<T> {
    type Output = Predicate<T>;

    fn not(self) -> Predicate<T> {
        not(self)
    }
}

// ============================================================================
// Compound composition
// ============================================================================

fn compound<T>(kind: Conjunction, predicates: impl IntoIterator<Item = Predicate<T>>) -> Predicate<T> {
    Predicate::Compound(Compound {
        kind,
        children: predicates.into_iter().collect(),
    })
}

/// AND over the given predicates. An empty AND is always true.
pub fn and<T>(predicates: impl IntoIterator<Item = Predicate<T>>) -> Predicate<T> {
    compound(Conjunction::And, predicates)
}

/// OR over the given predicates. An empty OR is always false.
pub fn or<T>(predicates: impl IntoIterator<Item = Predicate<T>>) -> Predicate<T> {
    compound(Conjunction::Or, predicates)
}

/// Negation of the given predicate.
pub fn not<T>(predicate: Predicate<T>) -> Predicate<T> {
    Predicate::Not(Negation {
        child: Arc::new(predicate),
    })
}

// ============================================================================
// Comparison shorthands
// ============================================================================

fn scalar<T>(field: Field<T>, operator: Operator, value: Literal) -> Predicate<T> {
    Predicate::from(Comparison {
        field,
        operator,
        operand: Operand::Scalar(value),
        modifier: Modifier::Direct,
        options: Options::NONE,
    })
}

pub fn equal_to<T>(field: Field<T>, value: impl Into<Literal>) -> Predicate<T> {
    scalar(field, Operator::EqualTo, value.into())
}

pub fn not_equal_to<T>(field: Field<T>, value: impl Into<Literal>) -> Predicate<T> {
    scalar(field, Operator::NotEqualTo, value.into())
}

pub fn less_than<T>(field: Field<T>, value: impl Into<Literal>) -> Predicate<T> {
    scalar(field, Operator::LessThan, value.into())
}

pub fn less_than_or_equal_to<T>(field: Field<T>, value: impl Into<Literal>) -> Predicate<T> {
    scalar(field, Operator::LessThanOrEqualTo, value.into())
}

pub fn greater_than<T>(field: Field<T>, value: impl Into<Literal>) -> Predicate<T> {
    scalar(field, Operator::GreaterThan, value.into())
}

pub fn greater_than_or_equal_to<T>(field: Field<T>, value: impl Into<Literal>) -> Predicate<T> {
    scalar(field, Operator::GreaterThanOrEqualTo, value.into())
}

pub fn begins_with<T>(field: Field<T>, prefix: impl Into<String>) -> Predicate<T> {
    scalar(field, Operator::BeginsWith, Literal::String(prefix.into()))
}

pub fn ends_with<T>(field: Field<T>, suffix: impl Into<String>) -> Predicate<T> {
    scalar(field, Operator::EndsWith, Literal::String(suffix.into()))
}

/// Wildcard match anchored to the whole string: `*` matches any run of
/// characters (including none), `?` exactly one.
pub fn like<T>(field: Field<T>, pattern: impl Into<String>) -> Predicate<T> {
    scalar(field, Operator::Like, Literal::String(pattern.into()))
}

/// The field (a collection, or a string) contains `element`.
pub fn contains<T>(field: Field<T>, element: impl Into<Literal>) -> Predicate<T> {
    scalar(field, Operator::Contains, element.into())
}

/// The field's value is one of `values`.
pub fn is_in<T, I>(field: Field<T>, values: I) -> Predicate<T>
where
    I: IntoIterator,
    I::Item: Into<Literal>,
{
    Predicate::from(Comparison {
        field,
        operator: Operator::In,
        operand: Operand::List(values.into_iter().map(Into::into).collect()),
        modifier: Modifier::Direct,
        options: Options::NONE,
    })
}

/// The field's value lies within `range`, bounds included.
pub fn between<T, L: Into<Literal>>(field: Field<T>, range: RangeInclusive<L>) -> Result<Predicate<T>> {
    Comparison::new(field, Operator::Between, range).map(Predicate::from)
}
