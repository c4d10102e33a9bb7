//! Execution settings.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// What to do when evaluating a predicate against a record fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ErrorPolicy {
    /// Abort the whole query with the first error.
    #[default]
    Fail,
    /// Drop the failing record, log a warning and keep going.
    Skip,
}

/// Settings for running a [`Query`](crate::Query) against records.
///
/// With the `serde` feature, `Config` deserializes from a host application's
/// own configuration file:
///
/// ```toml
/// [query]
/// on_error = "skip"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    pub on_error: ErrorPolicy,
}

impl Config {
    /// Config that aborts on the first evaluation error.
    pub fn strict() -> Self {
        Config {
            on_error: ErrorPolicy::Fail,
        }
    }

    /// Config that skips records whose evaluation fails.
    pub fn lenient() -> Self {
        Config {
            on_error: ErrorPolicy::Skip,
        }
    }

    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.on_error = policy;
        self
    }
}
