//! # Calculator
//!
//! Validated four-function arithmetic.
//!
//! ## Features
//!
//! - **Two numeric kinds**: exact integers and binary64 floats, kept apart by [`Number`]
//! - **Division guard**: an exact zero divisor is refused before dividing
//! - **Magnitude ceiling**: results above `10^100` in absolute value, or infinite, are rejected
//! - **Dynamic entry point**: [`evaluate_value`] type checks JSON operands at runtime
//!
//! ## Quick Start
//!
//! ```rust
//! use calculator::{add, divide, multiply, CalculatorError, Number};
//!
//! # fn main() -> Result<(), CalculatorError> {
//! // Integer inputs stay exact
//! assert_eq!(add(2, 3)?, Number::from(5));
//!
//! // Division is always true division
//! assert_eq!(divide(10, 4)?.to_string(), "2.5");
//!
//! // Results beyond the ceiling are errors, not infinities
//! assert!(matches!(
//!     multiply(1e200, 1e200),
//!     Err(CalculatorError::ResultTooLarge { .. })
//! ));
//! # Ok(())
//! # }
//! ```
//!
//! NaN operands are not range checked: `add(f64::NAN, 5)` returns a NaN
//! result rather than an error. Callers that need to detect NaN must check
//! [`Number::is_nan`] themselves.
//!
//! [`evaluate_value`] accepts only JSON numbers. Booleans are not numbers
//! here: `true` and `false` fail with [`CalculatorError::TypeKind`] naming
//! `boolean`, rather than counting as `1` and `0`.
//!
//! ```rust
//! use calculator::{evaluate_value, CalculatorError, Operation};
//! use serde_json::json;
//!
//! assert!(matches!(
//!     evaluate_value(Operation::Add, &json!(true), &json!(5)),
//!     Err(CalculatorError::TypeKind { type_name }) if type_name == "boolean"
//! ));
//! ```

#![warn(missing_docs)]

/// Error types for evaluation and operation parsing
pub mod error;

/// The numeric tagged union and the range check
pub mod number;

/// The four operations and the dynamic entry point
pub mod operation;

pub use error::{CalculatorError, ParseOperationError, Result};
pub use number::{value_type_name, Number, MAGNITUDE_CEILING, MAX_EXPONENT};
pub use operation::{add, divide, evaluate_value, multiply, subtract, Operation};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        add, divide, evaluate_value, multiply, subtract, CalculatorError, Number, Operation,
        Result,
    };
}
