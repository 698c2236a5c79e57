// Licensed under the Apache-2.0 license

use thiserror::Error;

/// Raised when an export is missing an input it cannot default.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("soc name must not be empty")]
    EmptySocName,
    #[error("top-level symbol `{0}` not found in design")]
    MissingTop(String),
    #[error("top-level symbol `{0}` is not an address map")]
    TopNotBlock(String),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
