//! Canonical text rendering.
//!
//! The canonical format is the one stable textual form of an expression. It is
//! what `Display` produces for predicates, sort descriptors and queries, and
//! what diagnostics and tests compare against.
//!
//! | Node | Rendering |
//! |------|-----------|
//! | Comparison | `name == "Foo"`, `age BETWEEN {10, 20}`, `name IN {"a", "b"}` |
//! | Modifier / options | `ANY tags ==[c] "red"` |
//! | Compound | `a AND b`, `a OR (b AND c)` |
//! | Empty compound | `TRUEPREDICATE` (AND), `FALSEPREDICATE` (OR) |
//! | Negation | `NOT a`, `NOT (a OR b)` |
//! | Sort descriptor | `name ASC`, `age DESC` |
//! | Query | `FROM Person WHERE age > 3 ORDER BY name ASC` |

use std::fmt::{self, Display, Write};

use crate::predicate::{Comparison, Conjunction, Operand, Predicate};
use crate::value::{Literal, Number};

impl Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::I64(n) => write!(f, "{n}"),
            Number::U64(n) => write!(f, "{n}"),
            Number::F64(n) => write!(f, "{n}"),
        }
    }
}

/// Strings are double-quoted without escaping; timestamps render as epoch
/// milliseconds and enum values as their discriminant.
impl Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::String(s) => write!(f, "\"{s}\""),
            Literal::Number(n) => write!(f, "{n}"),
            Literal::Timestamp(t) => write!(f, "{}", t.as_millis()),
            Literal::Enum(d) => write!(f, "{d}"),
            Literal::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Scalar(lit) => write!(f, "{lit}"),
            Operand::Range(lower, upper) => write!(f, "{{{lower}, {upper}}}"),
            Operand::List(items) => {
                f.write_char('{')?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_char('}')
            }
        }
    }
}

impl<T> Display for Comparison<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{} {}{} {}",
            self.get_modifier().prefix(),
            self.field().name(),
            self.operator().token(),
            self.get_options(),
            self.operand()
        )
    }
}

impl<T> Display for Predicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_predicate(f, self, Position::Top)
    }
}

/// Where a node is rendered, which decides whether it needs parentheses.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Position {
    Top,
    Child(Conjunction),
    Negated,
}

/// Looks through one-child compounds, which render as their only child.
fn effective<T>(mut predicate: &Predicate<T>) -> &Predicate<T> {
    while let Predicate::Compound(compound) = predicate {
        match compound.children() {
            [only] => predicate = only,
            _ => break,
        }
    }
    predicate
}

fn write_predicate<T>(f: &mut fmt::Formatter<'_>, predicate: &Predicate<T>, position: Position) -> fmt::Result {
    match effective(predicate) {
        Predicate::Comparison(comparison) => write!(f, "{comparison}"),
        Predicate::Compound(compound) => {
            let kind = compound.kind();
            let children = compound.children();
            if children.is_empty() {
                return f.write_str(match kind {
                    Conjunction::And => "TRUEPREDICATE",
                    Conjunction::Or => "FALSEPREDICATE",
                });
            }

            let parenthesize = match position {
                Position::Top => false,
                Position::Child(parent) => parent != kind,
                Position::Negated => true,
            };

            if parenthesize {
                f.write_char('(')?;
            }
            for (i, child) in children.iter().enumerate() {
                if i > 0 {
                    f.write_str(kind.separator())?;
                }
                write_predicate(f, child, Position::Child(kind))?;
            }
            if parenthesize {
                f.write_char(')')?;
            }
            Ok(())
        }
        Predicate::Not(negation) => {
            f.write_str("NOT ")?;
            write_predicate(f, negation.child(), Position::Negated)
        }
    }
}
