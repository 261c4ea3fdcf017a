//! Arithmetic operations with operand validation and range checking
//!
//! Each operation follows the same contract: validate the operands, refuse a
//! zero divisor, compute with native semantics, then range check the result.

use std::fmt;
use std::ops::{Add, Div, Mul, Sub};
use std::str::FromStr;

use num_bigint::{BigInt, Sign};
use num_traits::{ToPrimitive, Zero};
use serde_json::Value;
use tracing::debug;

use crate::error::{CalculatorError, ParseOperationError, Result};
use crate::number::Number;

/// Significant bits of an `f64`, including the implicit leading bit
const MANTISSA_BITS: i64 = f64::MANTISSA_DIGITS as i64;

/// Exponent of the smallest positive normal `f64`, plus one
const MIN_EXPONENT: i64 = f64::MIN_EXP as i64;

/// Exponent of the smallest positive subnormal `f64`
const MIN_SUBNORMAL_EXPONENT: i64 = MIN_EXPONENT - MANTISSA_BITS;

/// Bias of the stored `f64` exponent
const EXPONENT_BIAS: i64 = f64::MAX_EXP as i64 - 1;

/// Quotient bits kept below the rounding position
const GUARD_BITS: i64 = 2;

/// One of the four supported arithmetic operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `a + b`
    Add,
    /// `a - b`
    Subtract,
    /// `a * b`
    Multiply,
    /// `a / b`, always true division
    Divide,
}

impl Operation {
    /// All operations, in the order they are listed to users
    pub const ALL: [Operation; 4] = [
        Operation::Add,
        Operation::Subtract,
        Operation::Multiply,
        Operation::Divide,
    ];

    /// Lowercase name used on the command line
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Add => "add",
            Operation::Subtract => "subtract",
            Operation::Multiply => "multiply",
            Operation::Divide => "divide",
        }
    }

    /// Infix symbol, as shown in help text and logs
    pub fn symbol(&self) -> char {
        match self {
            Operation::Add => '+',
            Operation::Subtract => '-',
            Operation::Multiply => '*',
            Operation::Divide => '/',
        }
    }

    /// Apply this operation to two operands.
    ///
    /// # Errors
    ///
    /// * [`CalculatorError::DivisionByZero`] if dividing by an exact zero
    /// * [`CalculatorError::ResultTooLarge`] if the result is infinite, above
    ///   the magnitude ceiling, or an integer operand has no float form
    pub fn apply(self, a: impl Into<Number>, b: impl Into<Number>) -> Result<Number> {
        let (a, b) = (a.into(), b.into());
        debug!(operation = self.name(), "evaluating {a} {} {b}", self.symbol());

        if self == Operation::Divide && b.is_zero() {
            return Err(CalculatorError::DivisionByZero);
        }

        let result = self.compute(a, b)?.check_range();
        if let Err(error) = &result {
            debug!(operation = self.name(), %error, "evaluation rejected");
        }
        result
    }

    fn compute(self, a: Number, b: Number) -> Result<Number> {
        match (self, a, b) {
            (Operation::Divide, Number::Integer(x), Number::Integer(y)) => {
                Ok(Number::Float(true_divide(&x, &y)))
            }
            (Operation::Divide, a, b) => Ok(Number::Float(a.to_float()? / b.to_float()?)),
            (op, Number::Integer(x), Number::Integer(y)) => Ok(Number::Integer(op.combine(x, y))),
            (op, a, b) => Ok(Number::Float(op.combine(a.to_float()?, b.to_float()?))),
        }
    }

    /// Native arithmetic for one representation. Integer division never
    /// reaches here, it goes through [`true_divide`].
    fn combine<T>(self, x: T, y: T) -> T
    where
        T: Add<Output = T> + Sub<Output = T> + Mul<Output = T> + Div<Output = T>,
    {
        match self {
            Operation::Add => x + y,
            Operation::Subtract => x - y,
            Operation::Multiply => x * y,
            Operation::Divide => x / y,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = ParseOperationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let lowered = s.to_ascii_lowercase();
        Operation::ALL
            .into_iter()
            .find(|op| op.name() == lowered)
            .ok_or_else(|| ParseOperationError {
                name: lowered.clone(),
            })
    }
}

/// Quotient of two exact integers as a float, correctly rounded.
///
/// Operands that fit a float exactly are divided natively. Wider operands are
/// divided as integers with `GUARD_BITS` beyond the precision of the result,
/// remembering whether the division was exact, and rounded once to nearest
/// even. Operands beyond the float range still give a finite quotient when
/// one exists. A quotient beyond the float range comes back infinite.
fn true_divide(numerator: &BigInt, denominator: &BigInt) -> f64 {
    if let (Some(n), Some(d)) = (Number::exact_f64(numerator), Number::exact_f64(denominator)) {
        return n / d;
    }

    let negative = (numerator.sign() == Sign::Minus) != (denominator.sign() == Sign::Minus);
    if numerator.is_zero() {
        return if negative { -0.0 } else { 0.0 };
    }

    let (dividend, divisor) = (numerator.magnitude(), denominator.magnitude());

    // the quotient lies in [2^(diff - 1), 2^(diff + 1))
    let diff = dividend.bits() as i64 - divisor.bits() as i64;
    let shift = diff.max(MIN_EXPONENT) - MANTISSA_BITS - GUARD_BITS;
    let (dividend, divisor) = if shift >= 0 {
        (dividend.clone(), divisor << shift as usize)
    } else {
        (dividend << shift.unsigned_abs() as usize, divisor.clone())
    };

    let quotient = &dividend / &divisor;
    let inexact = !(&dividend % &divisor).is_zero();

    // below 2^56 for every shift chosen above
    let mut mantissa = quotient.to_u64().unwrap_or(u64::MAX);
    let bits = i64::from(u64::BITS - mantissa.leading_zeros());

    // bits under the last place of the result, never fewer than GUARD_BITS
    let extra = (bits - MANTISSA_BITS).max(MIN_SUBNORMAL_EXPONENT - shift) as u32;
    let half = 1u64 << (extra - 1);
    let remainder = mantissa & ((half << 1) - 1);
    mantissa >>= extra;
    if remainder > half || (remainder == half && (inexact || mantissa & 1 == 1)) {
        mantissa += 1;
    }

    // at most 2^53, so the conversion and the scaling are exact
    let magnitude = mantissa as f64 * power_of_two(shift + i64::from(extra));
    if negative {
        -magnitude
    } else {
        magnitude
    }
}

/// `2^exponent` built directly from its bit pattern
fn power_of_two(exponent: i64) -> f64 {
    if exponent > EXPONENT_BIAS {
        f64::INFINITY
    } else if exponent > -EXPONENT_BIAS {
        f64::from_bits(((exponent + EXPONENT_BIAS) as u64) << (MANTISSA_BITS - 1))
    } else if exponent >= MIN_SUBNORMAL_EXPONENT {
        f64::from_bits(1u64 << (exponent - MIN_SUBNORMAL_EXPONENT))
    } else {
        0.0
    }
}

/// Add two numbers.
///
/// ```
/// use calculator::{add, Number};
///
/// assert_eq!(add(2, 3).unwrap(), Number::from(5));
/// assert!(add(1, 2.5).unwrap().is_float());
/// ```
pub fn add(a: impl Into<Number>, b: impl Into<Number>) -> Result<Number> {
    Operation::Add.apply(a, b)
}

/// Subtract `b` from `a`.
pub fn subtract(a: impl Into<Number>, b: impl Into<Number>) -> Result<Number> {
    Operation::Subtract.apply(a, b)
}

/// Multiply two numbers.
pub fn multiply(a: impl Into<Number>, b: impl Into<Number>) -> Result<Number> {
    Operation::Multiply.apply(a, b)
}

/// Divide `a` by `b`. The result is always a float.
///
/// ```
/// use calculator::{divide, CalculatorError};
///
/// assert_eq!(divide(10, 4).unwrap().to_string(), "2.5");
/// assert_eq!(divide(1, 0), Err(CalculatorError::DivisionByZero));
/// ```
pub fn divide(a: impl Into<Number>, b: impl Into<Number>) -> Result<Number> {
    Operation::Divide.apply(a, b)
}

/// Dynamically typed entry point.
///
/// Operands are validated left to right; the first one that is not a JSON
/// number fails with [`CalculatorError::TypeKind`] before any arithmetic.
pub fn evaluate_value(operation: Operation, a: &Value, b: &Value) -> Result<Number> {
    let a = Number::try_from(a)?;
    let b = Number::try_from(b)?;
    operation.apply(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pow10(exponent: u32) -> BigInt {
        BigInt::from(10u32).pow(exponent)
    }

    fn float(result: Result<Number>) -> f64 {
        match result.unwrap() {
            Number::Float(value) => value,
            other => panic!("expected a float, got {other:?}"),
        }
    }

    fn is_too_large(result: Result<Number>) -> bool {
        matches!(result, Err(CalculatorError::ResultTooLarge { .. }))
    }

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= 1e-9 * expected.abs().max(1.0),
            "{actual} != {expected}"
        );
    }

    #[test]
    fn test_add_positive_integers() {
        assert_eq!(add(2, 3).unwrap(), Number::from(5));
        assert_eq!(add(10, 5).unwrap(), Number::from(15));
        assert_eq!(add(1, 1).unwrap(), Number::from(2));
    }

    #[test]
    fn test_add_zero() {
        assert_eq!(add(0, 0).unwrap(), Number::from(0));
        assert_eq!(add(0, 5).unwrap(), Number::from(5));
        assert_eq!(add(5, 0).unwrap(), Number::from(5));
        assert_eq!(add(0, -5).unwrap(), Number::from(-5));
        assert_eq!(add(-5, 0).unwrap(), Number::from(-5));
    }

    #[test]
    fn test_add_negative_numbers() {
        assert_eq!(add(-2, -3).unwrap(), Number::from(-5));
        assert_eq!(add(5, -3).unwrap(), Number::from(2));
        assert_eq!(add(-5, 3).unwrap(), Number::from(-2));
        assert_eq!(add(10, -10).unwrap(), Number::from(0));
    }

    #[test]
    fn test_add_floats() {
        assert_approx(float(add(2.5, 3.7)), 6.2);
        assert_approx(float(add(0.1, 0.2)), 0.3);
        assert_approx(float(add(-1.5, 2.7)), 1.2);
        assert_approx(float(add(-0.0001, 0.0001)), 0.0);
    }

    #[test]
    fn test_add_integer_and_float() {
        assert_approx(float(add(1, 2.5)), 3.5);
        assert_approx(float(add(5.5, 4)), 9.5);
        assert_approx(float(add(-3, 2.7)), -0.3);
    }

    #[test]
    fn test_integer_results_stay_exact() {
        assert_eq!(
            add(10i64.pow(10), 10i64.pow(10)).unwrap(),
            Number::from(2 * 10i64.pow(10))
        );
        assert_eq!(
            add(999_999_999_999i64, 1).unwrap(),
            Number::from(1_000_000_000_000i64)
        );
        assert_eq!(
            multiply(pow10(50), pow10(50)).unwrap(),
            Number::Integer(pow10(100))
        );
        assert!(subtract(7, 2).unwrap().is_integer());
    }

    #[test]
    fn test_divide_is_true_division() {
        assert_eq!(divide(10, 2).unwrap(), Number::from(5.0));
        assert_eq!(divide(7, 2).unwrap(), Number::from(3.5));
        assert_eq!(divide(-7, 2).unwrap(), Number::from(-3.5));
        assert_approx(float(divide(10, 3)), 10.0 / 3.0);
    }

    #[test]
    fn test_divide_wide_integers() {
        assert_eq!(float(divide(pow10(400), pow10(350))), 1e50);
        assert_eq!(
            float(divide(pow10(30), BigInt::from(3) * pow10(30))),
            1.0 / 3.0
        );

        assert!(is_too_large(divide(pow10(400), 3)));
        assert!(is_too_large(divide(pow10(308), 2)));
    }

    #[test]
    fn test_divide_wide_integers_rounds_once() {
        let numerator: BigInt = "139150494842487427450356418497757283623".parse().unwrap();
        assert_eq!(float(divide(numerator.clone(), 21)), 6.62621404011845e36);
        assert_eq!(float(divide(-numerator, 21)), -6.62621404011845e36);
    }

    #[test]
    fn test_divide_wide_integers_into_subnormals() {
        let two = BigInt::from(2);
        let smallest = f64::from_bits(1);

        assert_eq!(float(divide(1, two.pow(1074))), smallest);
        assert_eq!(float(divide(3, two.pow(1075))), 2.0 * smallest);
        assert_eq!(float(divide(1, two.pow(1075) - BigInt::from(1))), smallest);

        let halfway = float(divide(1, two.pow(1075)));
        assert_eq!(halfway, 0.0);
        assert!(halfway.is_sign_positive());
    }

    #[test]
    fn test_divide_zero_by_wide_integer_keeps_sign() {
        assert!(float(divide(0, pow10(30))).is_sign_positive());
        assert!(float(divide(0, -pow10(30))).is_sign_negative());
    }

    #[test]
    fn test_divide_by_zero() {
        for dividend in [10, -5, 0] {
            assert_eq!(divide(dividend, 0), Err(CalculatorError::DivisionByZero));
        }
        assert_eq!(divide(10, 0.0), Err(CalculatorError::DivisionByZero));
        assert_eq!(divide(10, -0.0), Err(CalculatorError::DivisionByZero));
        assert_eq!(
            divide(f64::NAN, 0),
            Err(CalculatorError::DivisionByZero)
        );
    }

    #[test]
    fn test_divide_by_tiny_is_not_zero() {
        assert!(divide(1, 1e-300).is_err());
        assert!(divide(1e-300, 1e-300).is_ok());
    }

    #[test]
    fn test_operations_with_extremely_large_numbers() {
        let large = pow10(308);
        assert!(is_too_large(add(large.clone(), large.clone())));
        assert!(is_too_large(subtract(large.clone(), BigInt::from(5) * pow10(307))));
        assert!(is_too_large(multiply(large.clone(), 2)));
        assert!(is_too_large(divide(large, 2)));
    }

    #[test]
    fn test_operations_with_very_small_numbers() {
        let small = 1e-308;
        assert_eq!(float(add(small, small)), 2.0 * small);
        assert_eq!(float(subtract(small, small / 2.0)), small / 2.0);
        assert_eq!(float(multiply(small, 2)), 2.0 * small);
        assert_eq!(float(divide(small, 2)), small / 2.0);
    }

    #[test]
    fn test_operations_with_infinity() {
        let inf = f64::INFINITY;
        assert!(is_too_large(add(inf, 5)));
        assert!(is_too_large(subtract(inf, 5)));
        assert!(is_too_large(multiply(inf, 5)));
        assert!(is_too_large(divide(inf, 5)));
    }

    #[test]
    fn test_operations_with_nan() {
        let nan = f64::NAN;
        for op in Operation::ALL {
            assert!(op.apply(nan, 5).unwrap().is_nan(), "{op}(nan, 5)");
            assert!(op.apply(5, nan).unwrap().is_nan(), "{op}(5, nan)");
        }
    }

    #[test]
    fn test_overflow_error_handling() {
        assert!(is_too_large(multiply(pow10(200), pow10(200))));
        assert!(is_too_large(add(pow10(101), pow10(101))));
        assert!(is_too_large(subtract(pow10(101), -pow10(101))));
        assert!(is_too_large(divide(pow10(101), 1e-101)));
        assert!(is_too_large(multiply(pow10(310), pow10(310))));
    }

    #[test]
    fn test_float_at_the_ceiling_is_rejected() {
        assert!(is_too_large(multiply(1e-100, 1e200)));
    }

    #[test]
    fn test_integer_too_wide_for_float_operand() {
        assert!(is_too_large(add(pow10(400), 1.0)));
        assert!(is_too_large(divide(pow10(400), 2.0)));
    }

    #[test]
    fn test_very_small_number_precision() {
        let tiny = 1e-10;
        assert!(float(add(tiny, tiny)) >= 0.0);
        assert!(multiply(tiny, 1e5).is_ok());
    }

    #[test]
    fn test_evaluate_value_type_checks() {
        let cases = [
            (Operation::Add, json!("string"), json!(5), "string"),
            (Operation::Subtract, json!(5), json!("string"), "string"),
            (Operation::Multiply, json!([1, 2]), json!(5), "array"),
            (Operation::Divide, json!(5), json!({"key": "value"}), "object"),
        ];
        for (op, a, b, type_name) in cases {
            assert_eq!(
                evaluate_value(op, &a, &b),
                Err(CalculatorError::TypeKind {
                    type_name: type_name.to_string()
                })
            );
        }
    }

    #[test]
    fn test_evaluate_value_type_check_precedes_zero_divisor() {
        assert!(matches!(
            evaluate_value(Operation::Divide, &json!("x"), &json!(0)),
            Err(CalculatorError::TypeKind { .. })
        ));
    }

    #[test]
    fn test_evaluate_value_numbers() {
        assert_eq!(
            evaluate_value(Operation::Add, &json!(2), &json!(3)).unwrap(),
            Number::from(5)
        );
        assert_eq!(
            evaluate_value(Operation::Divide, &json!(1), &json!(4.0)).unwrap(),
            Number::from(0.25)
        );
    }

    #[test]
    fn test_operation_from_str() {
        assert_eq!("add".parse::<Operation>().unwrap(), Operation::Add);
        assert_eq!("SUBTRACT".parse::<Operation>().unwrap(), Operation::Subtract);
        assert_eq!("Multiply".parse::<Operation>().unwrap(), Operation::Multiply);
        assert_eq!("divide".parse::<Operation>().unwrap(), Operation::Divide);

        let error = "modulo".parse::<Operation>().unwrap_err();
        assert_eq!(error.name, "modulo");
    }

    #[test]
    fn test_operation_display_round_trips() {
        for op in Operation::ALL {
            assert_eq!(op.to_string().parse::<Operation>().unwrap(), op);
        }
        assert_eq!(Operation::Divide.symbol(), '/');
    }
}
