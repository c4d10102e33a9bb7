//! Comparison operators, collection modifiers and string options.
//!
//! The [`Operator`] enum is the closed set of comparison kinds. Operators carry
//! no state; the operand lives in the comparison node.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Comparison operator for a comparison node.
///
/// - **Equality**: `EqualTo`, `NotEqualTo` - all kinds
/// - **Ordering**: `LessThan`, `LessThanOrEqualTo`, `GreaterThan`,
///   `GreaterThanOrEqualTo`, `Between` - values with a natural order
/// - **String**: `BeginsWith`, `EndsWith`, `Like`
/// - **Membership**: `Contains` (field holds operand), `In` (operand holds field)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase")
)]
pub enum Operator {
    EqualTo,
    NotEqualTo,
    LessThan,
    LessThanOrEqualTo,
    GreaterThan,
    GreaterThanOrEqualTo,
    BeginsWith,
    EndsWith,
    /// Wildcard match: `*` is any run of characters, `?` exactly one.
    Like,
    Contains,
    In,
    Between,
}

impl Operator {
    /// All operators, in declaration order.
    pub const ALL: [Operator; 12] = [
        Operator::EqualTo,
        Operator::NotEqualTo,
        Operator::LessThan,
        Operator::LessThanOrEqualTo,
        Operator::GreaterThan,
        Operator::GreaterThanOrEqualTo,
        Operator::BeginsWith,
        Operator::EndsWith,
        Operator::Like,
        Operator::Contains,
        Operator::In,
        Operator::Between,
    ];

    /// Returns `true` for the four ordering operators.
    pub fn is_ordering(self) -> bool {
        matches!(
            self,
            Operator::LessThan
                | Operator::LessThanOrEqualTo
                | Operator::GreaterThan
                | Operator::GreaterThanOrEqualTo
        )
    }

    /// Returns `true` for operators that only apply to strings.
    pub fn is_string_op(self) -> bool {
        matches!(
            self,
            Operator::BeginsWith | Operator::EndsWith | Operator::Like
        )
    }

    /// Evaluates an ordering operator given the field-to-operand ordering.
    ///
    /// Equality operators are answered too; every other operator yields
    /// `false`.
    pub fn eval_ordering(self, ordering: Ordering) -> bool {
        match self {
            Operator::EqualTo => ordering == Ordering::Equal,
            Operator::NotEqualTo => ordering != Ordering::Equal,
            Operator::GreaterThan => ordering == Ordering::Greater,
            Operator::GreaterThanOrEqualTo => ordering != Ordering::Less,
            Operator::LessThan => ordering == Ordering::Less,
            Operator::LessThanOrEqualTo => ordering != Ordering::Greater,
            _ => false,
        }
    }

    /// Returns the canonical format token of this operator.
    pub fn token(self) -> &'static str {
        match self {
            Operator::EqualTo => "==",
            Operator::NotEqualTo => "!=",
            Operator::LessThan => "<",
            Operator::LessThanOrEqualTo => "<=",
            Operator::GreaterThan => ">",
            Operator::GreaterThanOrEqualTo => ">=",
            Operator::BeginsWith => "BEGINSWITH",
            Operator::EndsWith => "ENDSWITH",
            Operator::Like => "LIKE",
            Operator::Contains => "CONTAINS",
            Operator::In => "IN",
            Operator::Between => "BETWEEN",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// How a comparison applies to a collection-valued field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Modifier {
    /// The field is a scalar (or, for `Contains`, the collection itself).
    #[default]
    Direct,
    /// At least one element must satisfy the comparison.
    Any,
    /// Every element must satisfy the comparison; vacuously true when empty.
    All,
}

impl Modifier {
    /// Keyword prefix used by the formatter, empty for `Direct`.
    pub fn prefix(self) -> &'static str {
        match self {
            Modifier::Direct => "",
            Modifier::Any => "ANY ",
            Modifier::All => "ALL ",
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Modifier::Direct => "DIRECT",
            Modifier::Any => "ANY",
            Modifier::All => "ALL",
        })
    }
}

/// String comparison options, applied to both sides before comparing.
///
/// ```
/// use sift::Options;
///
/// let opts = Options::CASE_INSENSITIVE | Options::DIACRITIC_INSENSITIVE;
/// assert!(opts.case_insensitive());
/// assert!(opts.diacritic_insensitive());
/// assert_eq!(opts.to_string(), "[cd]");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Options {
    case_insensitive: bool,
    diacritic_insensitive: bool,
}

impl Options {
    /// No folding.
    pub const NONE: Options = Options {
        case_insensitive: false,
        diacritic_insensitive: false,
    };

    /// Compare strings ignoring letter case.
    pub const CASE_INSENSITIVE: Options = Options {
        case_insensitive: true,
        diacritic_insensitive: false,
    };

    /// Compare strings ignoring accents and other diacritics.
    pub const DIACRITIC_INSENSITIVE: Options = Options {
        case_insensitive: false,
        diacritic_insensitive: true,
    };

    pub fn case_insensitive(self) -> bool {
        self.case_insensitive
    }

    pub fn diacritic_insensitive(self) -> bool {
        self.diacritic_insensitive
    }

    /// Returns `true` when no option is set.
    pub fn is_empty(self) -> bool {
        self == Options::NONE
    }
}

impl BitOr for Options {
    type Output = Options;

    fn bitor(self, rhs: Options) -> Options {
        Options {
            case_insensitive: self.case_insensitive || rhs.case_insensitive,
            diacritic_insensitive: self.diacritic_insensitive || rhs.diacritic_insensitive,
        }
    }
}

impl BitOrAssign for Options {
    fn bitor_assign(&mut self, rhs: Options) {
        *self = *self | rhs;
    }
}

/// Renders the operator suffix: `""`, `"[c]"`, `"[d]"` or `"[cd]"`.
impl fmt::Display for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return Ok(());
        }
        f.write_str("[")?;
        if self.case_insensitive {
            f.write_str("c")?;
        }
        if self.diacritic_insensitive {
            f.write_str("d")?;
        }
        f.write_str("]")
    }
}
