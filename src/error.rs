//! Error types for schema construction
//!
//! Only checker factories can fail; validation itself never returns an
//! error. Violations found while walking a value are delivered as
//! [`Diagnostic`](crate::Diagnostic)s instead.

use thiserror::Error;

/// Errors produced by the checker factories in [`checkers`](crate::checkers).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// `one_of` was given an empty list of allowed values
    #[error("enum checker requires a non-empty list of allowed values")]
    EmptyEnum,

    /// `one_of_type` was given an empty list of alternatives
    #[error("union checker requires a non-empty list of alternatives")]
    EmptyUnion,

    /// `instance_of` was given a class without a discoverable name
    #[error("instance checker requires a class with a discoverable name")]
    AnonymousClass,

    /// A reserved factory that is declared but not implemented
    #[error("checker factory `{0}` is reserved and not implemented")]
    Reserved(&'static str),
}

/// Result type alias for schema construction
pub type Result<T> = std::result::Result<T, SchemaError>;
