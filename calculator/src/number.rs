//! Numeric operands and results
//!
//! A [`Number`] is either an exact integer or a binary64 float. Integers are
//! unbounded so that intermediate values above the machine word still compare
//! exactly against the magnitude ceiling.

use std::fmt;

use num_bigint::{BigInt, Sign};
use num_traits::{FromPrimitive, ToPrimitive, Zero};
use once_cell::sync::Lazy;
use serde_json::Value;

use crate::error::{CalculatorError, Result};

/// Decimal exponent of the magnitude ceiling
pub const MAX_EXPONENT: u32 = 100;

/// Largest absolute value an accepted result may have: `10^MAX_EXPONENT`
pub static MAGNITUDE_CEILING: Lazy<BigInt> = Lazy::new(|| BigInt::from(10u32).pow(MAX_EXPONENT));

/// Integers with at most this many significant bits convert to `f64` exactly
const F64_EXACT_BITS: u64 = f64::MANTISSA_DIGITS as u64;

/// An operand or the result of an operation
#[derive(Debug, Clone, PartialEq)]
pub enum Number {
    /// An exact integer
    Integer(BigInt),
    /// An IEEE-754 double precision value
    Float(f64),
}

impl Number {
    /// Returns true for the floating-point kind
    pub fn is_float(&self) -> bool {
        matches!(self, Number::Float(_))
    }

    /// Returns true for the exact integer kind
    pub fn is_integer(&self) -> bool {
        matches!(self, Number::Integer(_))
    }

    /// Returns true if this is a float NaN
    pub fn is_nan(&self) -> bool {
        matches!(self, Number::Float(value) if value.is_nan())
    }

    /// Exact comparison against zero. `-0.0` counts as zero.
    pub fn is_zero(&self) -> bool {
        match self {
            Number::Integer(value) => value.is_zero(),
            Number::Float(value) => *value == 0.0,
        }
    }

    /// Lossy conversion to `f64`. Integers beyond the float range become infinite.
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Integer(value) => value.to_f64().unwrap_or(match value.sign() {
                Sign::Minus => f64::NEG_INFINITY,
                _ => f64::INFINITY,
            }),
            Number::Float(value) => *value,
        }
    }

    /// Promote to a float operand. Fails when an integer has no finite float
    /// representation.
    pub(crate) fn to_float(&self) -> Result<f64> {
        match self {
            Number::Integer(value) => match value.to_f64() {
                Some(converted) if converted.is_finite() => Ok(converted),
                _ => Err(CalculatorError::too_large(value)),
            },
            Number::Float(value) => Ok(*value),
        }
    }

    /// Returns `Some` when the integer converts to `f64` without rounding
    pub(crate) fn exact_f64(value: &BigInt) -> Option<f64> {
        if value.bits() <= F64_EXACT_BITS {
            value.to_f64()
        } else {
            None
        }
    }

    /// Reject infinite results and results whose magnitude exceeds
    /// [`MAGNITUDE_CEILING`]. NaN is not inspected and passes through.
    pub fn check_range(self) -> Result<Self> {
        let too_large = match &self {
            Number::Integer(value) => value.magnitude() > MAGNITUDE_CEILING.magnitude(),
            Number::Float(value) => value.is_infinite() || float_exceeds_ceiling(*value),
        };

        if too_large {
            Err(CalculatorError::too_large(&self))
        } else {
            Ok(self)
        }
    }
}

/// Floats above 2^53 are integral, so the comparison is done on the exact
/// integer value. The float nearest to 10^100 lies above it.
fn float_exceeds_ceiling(value: f64) -> bool {
    BigInt::from_f64(value.abs()).is_some_and(|magnitude| magnitude > *MAGNITUDE_CEILING)
}

/// Shortest round-trip form with a mandatory fraction or exponent, a signed
/// two digit exponent, and lowercase special values.
fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let repr = format!("{value:?}");
    match repr.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => repr,
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(value) => write!(f, "{value}"),
            Number::Float(value) => f.write_str(&format_float(*value)),
        }
    }
}

macro_rules! impl_from_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Number {
                fn from(value: $t) -> Self {
                    Number::Integer(BigInt::from(value))
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl From<BigInt> for Number {
    fn from(value: BigInt) -> Self {
        Number::Integer(value)
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::Float(value)
    }
}

impl From<f32> for Number {
    fn from(value: f32) -> Self {
        Number::Float(f64::from(value))
    }
}

/// Name of a JSON value's type, as reported by [`CalculatorError::TypeKind`]
pub fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl TryFrom<&Value> for Number {
    type Error = CalculatorError;

    /// Integral JSON numbers become exact integers, everything else numeric
    /// becomes a float. Any other JSON type, booleans included, is a
    /// [`CalculatorError::TypeKind`].
    fn try_from(value: &Value) -> Result<Self> {
        let Value::Number(number) = value else {
            return Err(CalculatorError::type_kind(value_type_name(value)));
        };

        if let Some(integer) = number.as_i64() {
            Ok(Number::from(integer))
        } else if let Some(integer) = number.as_u64() {
            Ok(Number::from(integer))
        } else {
            number
                .as_f64()
                .map(Number::Float)
                .ok_or_else(|| CalculatorError::type_kind(value_type_name(value)))
        }
    }
}
