//! Commerce error types.

use thiserror::Error;

/// Errors raised by local commerce logic.
///
/// None of these involve the backend; they are produced before any request
/// is sent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommerceError {
    /// A required form field was blank.
    #[error("Please fill in all required fields: {0}")]
    MissingField(&'static str),

    /// A numeric form field could not be parsed.
    #[error("Invalid number for {field}: {value}")]
    InvalidNumber { field: &'static str, value: String },

    /// The cart has no items to submit.
    #[error("Cart is empty")]
    EmptyCart,

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// Currency mismatch.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },
}
