//! Unified error handling for the calculator library
//!
//! Every failure an evaluation can produce is a variant of [`CalculatorError`].
//! All of them are terminal for the call that raised them: nothing is clamped,
//! coerced or retried.

use thiserror::Error;

use crate::number::MAX_EXPONENT;

/// The main error type for the calculator library
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum CalculatorError {
    /// An operand was neither an exact integer nor a float
    #[error("Expected int or float, got {type_name}")]
    TypeKind {
        /// Name of the type that was actually supplied
        type_name: String,
    },

    /// The divisor of a division was exactly zero
    #[error("Cannot divide by zero")]
    DivisionByZero,

    /// The result is infinite, exceeds the magnitude ceiling, or cannot be
    /// represented as a float
    #[error("Result {result} is too large (max: 10^{max})", max = MAX_EXPONENT)]
    ResultTooLarge {
        /// Rendering of the offending value
        result: String,
    },
}

impl CalculatorError {
    pub(crate) fn type_kind(type_name: impl Into<String>) -> Self {
        Self::TypeKind {
            type_name: type_name.into(),
        }
    }

    pub(crate) fn too_large(result: impl ToString) -> Self {
        Self::ResultTooLarge {
            result: result.to_string(),
        }
    }
}

/// Returned when text does not name one of the four supported operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown operation '{name}'. Supported operations: add, subtract, multiply, divide")]
pub struct ParseOperationError {
    /// The text that failed to parse
    pub name: String,
}

/// Result type alias
pub type Result<T> = std::result::Result<T, CalculatorError>;
