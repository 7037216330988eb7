//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent invalid local input.
/// They are raised before any request leaves the process.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid key=value pair: {0:?}")]
    InvalidKeyValue(String),

    #[error("invalid value {value:?} for {key}: expected {expected}")]
    InvalidValue {
        key: String,
        value: String,
        expected: &'static str,
    },

    #[error("unexpected value {0:?}: attribute values must follow a --key")]
    DanglingValue(String),

    #[error("attribute given more than once: {0}")]
    DuplicateKey(String),

    #[error("invalid attribute name: {0:?}")]
    InvalidKey(String),

    #[error("unsupported value hint {0:?}")]
    UnsupportedHint(String),

    #[error("must specify new values to update {0}")]
    EmptyUpdate(&'static str),

    #[error("{count} --sort-dir given but only {keys} --sort-key")]
    SortDirMismatch { count: usize, keys: usize },

    #[error("resource {0} does not support sorting")]
    SortingUnsupported(&'static str),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
