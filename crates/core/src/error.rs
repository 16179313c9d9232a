//! Errors raised by the domain types.
//!
//! Every variant here is deterministic: given the same entity state and the
//! same input, the same error comes back. Infrastructure failures (storage,
//! network) are modelled separately by the store layer. The HTTP status each
//! variant maps to is decided at the API boundary, not here.

use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The input was malformed before any state was consulted (empty name,
    /// bad SKU format, negative amount).
    #[error("validation failed: {0}")]
    Validation(String),

    /// The input was well-formed but the operation would break a rule the
    /// entity maintains (stock below zero, refund of a refunded sale).
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// An identifier string did not parse.
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// The referenced entity does not exist in the caller's business.
    #[error("not found")]
    NotFound,

    /// The operation lost to a concurrent or earlier write (duplicate SKU,
    /// already-cancelled order).
    #[error("conflict: {0}")]
    Conflict(String),

    /// The principal lacks the permission the operation requires.
    #[error("unauthorized")]
    Unauthorized,
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }
}
