//! Error types
//!
//! Cloning itself never fails. Errors come from building values (patterns,
//! timestamps) and from the JSON bridge.

use thiserror::Error;

/// Errors raised while constructing a value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    /// Pattern source failed to compile
    #[error("SyntaxError: Invalid regular expression: /{pattern}/: {message}")]
    InvalidPattern {
        /// The offending source text
        pattern: String,
        /// Compiler diagnostic
        message: String,
    },

    /// Unknown or repeated flag
    #[error("SyntaxError: Invalid flags supplied to RegExp constructor '{0}'")]
    InvalidFlags(String),

    /// Timestamp outside the representable range
    #[error("RangeError: Invalid time value: {0}")]
    InvalidTime(i64),
}

/// Errors raised by the JSON bridge
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JsonError {
    /// The value graph contains a cycle
    #[error("TypeError: Converting circular structure to JSON")]
    Circular,
}
