//! Exit code constants for the calculator CLI
//!
//! - 0: Success, the result was printed to stdout
//! - 1: Any failure, a message prefixed `Error:` was printed to stderr

/// Successful execution
pub const EXIT_SUCCESS: i32 = 0;

/// Argument, operand, operation or arithmetic failure
pub const EXIT_FAILURE: i32 = 1;
