//! The calculate command: three tokens in, one number out

use calculator::{Number, Operation};
use tracing::{debug, info};

use crate::error::{CliError, CliResult, IntoCliResult};

/// Parse operand text as a float. Surrounding whitespace is ignored,
/// `inf` / `nan` are accepted, and so are single underscores between digits
/// (`1_000`).
pub fn parse_operand(text: &str) -> CliResult<f64> {
    remove_digit_separators(text.trim())
        .and_then(|digits| digits.parse::<f64>().ok())
        .ok_or_else(|| CliError::invalid_number(text))
}

/// Drop `_` separators, or `None` if one is not between two digits.
fn remove_digit_separators(text: &str) -> Option<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut digits = String::with_capacity(text.len());

    for (index, &c) in chars.iter().enumerate() {
        if c != '_' {
            digits.push(c);
            continue;
        }
        let after_digit = index > 0 && chars[index - 1].is_ascii_digit();
        let before_digit = chars.get(index + 1).is_some_and(char::is_ascii_digit);
        if !(after_digit && before_digit) {
            return None;
        }
    }

    Some(digits)
}

/// Parse the operands, resolve the operation and evaluate it.
///
/// Operands are always parsed as floats, so results carry the float kind.
pub fn run_calculation(operation: &str, num1: &str, num2: &str) -> CliResult<Number> {
    let lhs = parse_operand(num1)?;
    let rhs = parse_operand(num2)?;
    let operation = operation.parse::<Operation>().cli_general_error()?;

    debug!(%operation, lhs, rhs, "dispatching");
    let result = operation.apply(lhs, rhs).cli_general_error()?;
    info!(%operation, %result, "calculation complete");
    Ok(result)
}
