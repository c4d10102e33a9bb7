//! Error types for the sift crate.

use thiserror::Error;

use crate::operator::{Modifier, Operator};

/// Errors raised while building, evaluating or executing queries.
///
/// `MalformedOperand`, `InvalidRange` and `UnknownField` are reported when an
/// expression is constructed. `IncomparableTypes` and `UnsupportedModifier`
/// are reported per record during evaluation. `UnsupportedOperator` is for
/// backends that translate expressions into a native filter language.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The operand shape does not fit the operator.
    #[error("operator '{operator}' expects {expected}, got {found}")]
    MalformedOperand {
        operator: Operator,
        expected: &'static str,
        found: &'static str,
    },

    /// A `BETWEEN` range whose lower bound is greater than its upper bound.
    #[error("invalid range: lower bound {lower} is greater than upper bound {upper}")]
    InvalidRange { lower: String, upper: String },

    /// Values of different kinds were compared with an operator that needs a
    /// common kind.
    #[error("cannot apply '{operator}' to field '{field}': {left} value against {right} operand")]
    IncomparableTypes {
        field: &'static str,
        operator: Operator,
        left: &'static str,
        right: &'static str,
    },

    /// The modifier does not fit the shape of the field value.
    #[error("modifier {modifier} cannot be used on field '{field}' holding a {found} value")]
    UnsupportedModifier {
        field: &'static str,
        modifier: Modifier,
        found: &'static str,
    },

    /// Name-based field resolution failed.
    #[error("record type '{record}' has no queryable field named '{field}'")]
    UnknownField { record: &'static str, field: String },

    /// A backend cannot express the operator in its native filter language.
    #[error("operator '{operator}' is not supported by the {backend} backend")]
    UnsupportedOperator {
        backend: &'static str,
        operator: Operator,
    },
}

/// Result type for sift operations.
pub type Result<T> = std::result::Result<T, Error>;
