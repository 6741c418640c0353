//! Error types for the calculator core.

use thiserror::Error;

/// Errors that can occur at the edges of the calculator core.
///
/// The engine itself never fails: bad input inside a key sequence is a
/// display state (`ERROR`), not an error value. These variants cover the
/// library surfaces that parse text.
#[derive(Error, Debug)]
pub enum RpnError {
    #[error("Invalid decimal literal: {0}")]
    InvalidDecimal(#[from] bigdecimal::ParseBigDecimalError),

    #[error("Unrecognized key token: {0}")]
    UnknownKey(String),
}

/// Result type for calculator operations.
pub type RpnResult<T> = Result<T, RpnError>;
