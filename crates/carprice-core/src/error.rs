//! Error types for the carprice core library.
//!
//! This module defines the errors raised at the input boundary, where raw
//! user values are parsed into [`CarAttributes`](crate::vehicle::CarAttributes)
//! and checked against [`InputBounds`](crate::bounds::InputBounds).

use thiserror::Error;

/// The main error type for carprice-core operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// A numeric input lies outside its inclusive range.
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        /// The form field that was rejected.
        field: &'static str,
        /// The rejected value, rendered for display.
        value: String,
        /// Inclusive lower bound.
        min: String,
        /// Inclusive upper bound.
        max: String,
    },

    /// A categorical input is not one of the field's known categories.
    #[error("Unknown {field} {value:?}, expected one of: {expected}")]
    UnknownCategory {
        /// The categorical field being parsed.
        field: &'static str,
        /// The value that was not recognised.
        value: String,
        /// Comma-separated list of accepted labels.
        expected: String,
    },

    /// A numeric input could not be parsed at all.
    #[error("Invalid {field} {value:?}: {reason}")]
    InvalidNumber {
        /// The form field being parsed.
        field: &'static str,
        /// The raw text that failed to parse.
        value: String,
        /// Parser message.
        reason: String,
    },
}

impl CoreError {
    /// Create an out-of-range error from displayable bounds.
    pub fn out_of_range(
        field: &'static str,
        value: impl ToString,
        min: impl ToString,
        max: impl ToString,
    ) -> Self {
        Self::OutOfRange {
            field,
            value: value.to_string(),
            min: min.to_string(),
            max: max.to_string(),
        }
    }

    /// Create an unknown-category error listing the accepted labels.
    pub fn unknown_category(field: &'static str, value: impl Into<String>, expected: &[&str]) -> Self {
        Self::UnknownCategory {
            field,
            value: value.into(),
            expected: expected.join(", "),
        }
    }

    /// Create an invalid-number error.
    pub fn invalid_number(
        field: &'static str,
        value: impl Into<String>,
        reason: impl ToString,
    ) -> Self {
        Self::InvalidNumber {
            field,
            value: value.into(),
            reason: reason.to_string(),
        }
    }
}

/// A specialized Result type for carprice-core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
