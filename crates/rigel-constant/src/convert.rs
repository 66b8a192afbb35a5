//! Target types, converted values, and the numeric coercion table.

use bigdecimal::{BigDecimal, RoundingMode};
use num_bigint::{BigInt, Sign, ToBigInt};
use num_traits::ToPrimitive;

use crate::node::{ClassRef, ConstantNode, NumericValue};
use crate::object::ObjectLiteral;
use crate::resolver::ConstantValue;

/// The caller-supplied conversion target.
///
/// A closed union selected at the call site; `ArrayOf` nests the element
/// target, `Value` is the generic escape hatch that keeps an element as an
/// unconverted [`ConstantValue`] (meaningful only inside `ArrayOf`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TargetType {
    String,
    Bool,
    Int32,
    Int64,
    Float32,
    Float64,
    Decimal,
    BigInt,
    ObjectLiteral,
    ClassReference,
    ArrayOf(Box<TargetType>),
    Value,
}

impl TargetType {
    pub fn array_of(element: TargetType) -> Self {
        TargetType::ArrayOf(Box::new(element))
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            TargetType::Int32
                | TargetType::Int64
                | TargetType::Float32
                | TargetType::Float64
                | TargetType::Decimal
                | TargetType::BigInt
        )
    }
}

/// A successfully converted value.
#[derive(Clone, Debug)]
pub enum Value<N: ConstantNode> {
    String(String),
    Bool(bool),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    Decimal(BigDecimal),
    BigInt(BigInt),
    Class(ClassRef),
    Object(ObjectLiteral<N>),
    /// One slot per source element; `None` marks an element that did not
    /// convert to the requested element target.
    Array(Vec<Option<Value<N>>>),
    /// An element kept unconverted via [`TargetType::Value`].
    Constant(ConstantValue<N>),
}

impl<N: ConstantNode> Value<N> {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::Int32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Value::Float32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_decimal(&self) -> Option<&BigDecimal> {
        match self {
            Value::Decimal(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_big_int(&self) -> Option<&BigInt> {
        match self {
            Value::BigInt(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_class(&self) -> Option<&ClassRef> {
        match self {
            Value::Class(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectLiteral<N>> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Option<Value<N>>]> {
        match self {
            Value::Array(elements) => Some(elements),
            _ => None,
        }
    }

    pub fn as_constant(&self) -> Option<ConstantValue<N>> {
        match self {
            Value::Constant(v) => Some(*v),
            _ => None,
        }
    }
}

/// Contract violations, kept distinct from the "no conversion" empty result.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConvertError {
    /// An exact 32-bit conversion was requested for an arbitrary-precision
    /// integer that does not fit. Never silently truncated.
    #[error("integer constant {value} does not fit in 32 bits")]
    Int32Overflow { value: BigInt },
}

/// Convert a parsed numeric value to a numeric target.
///
/// Returns `Ok(None)` when `target` is not a numeric kind, or when the value
/// has no representation in it (non-finite doubles have no decimal
/// expansion). The only error is the exact-fit 32-bit overflow.
///
/// Narrowing semantics mirror the JVM conversions the host model was built
/// on: integer narrowing keeps the low bits, float→int saturates with
/// NaN→0, int→float rounds to nearest.
pub fn coerce_numeric<N: ConstantNode>(
    value: &NumericValue,
    target: &TargetType,
) -> Result<Option<Value<N>>, ConvertError> {
    let converted = match value {
        NumericValue::BigInt(v) => match target {
            TargetType::Int32 => Some(Value::Int32(exact_i32(v)?)),
            TargetType::Float32 => Some(Value::Float32(big_to_f32(v))),
            TargetType::Int64 => Some(Value::Int64(low_64_bits(v))),
            TargetType::Float64 => Some(Value::Float64(big_to_f64(v))),
            TargetType::Decimal => Some(Value::Decimal(BigDecimal::from(v.clone()))),
            TargetType::BigInt => Some(Value::BigInt(v.clone())),
            _ => None,
        },
        NumericValue::Int(v) => match target {
            TargetType::Int32 => Some(Value::Int32(*v as i32)),
            TargetType::Float32 => Some(Value::Float32(*v as f32)),
            TargetType::Int64 => Some(Value::Int64(*v)),
            TargetType::Float64 => Some(Value::Float64(*v as f64)),
            TargetType::Decimal => Some(Value::Decimal(BigDecimal::from(*v))),
            TargetType::BigInt => Some(Value::BigInt(BigInt::from(*v))),
            _ => None,
        },
        NumericValue::Float(v) => match target {
            TargetType::Int32 => Some(Value::Int32(*v as i32)),
            TargetType::Float32 => Some(Value::Float32(*v as f32)),
            TargetType::Int64 => Some(Value::Int64(*v as i64)),
            TargetType::Float64 => Some(Value::Float64(*v)),
            TargetType::Decimal => BigDecimal::try_from(*v).ok().map(Value::Decimal),
            TargetType::BigInt => float_to_big_int(*v).map(Value::BigInt),
            _ => None,
        },
    };
    Ok(converted)
}

fn exact_i32(v: &BigInt) -> Result<i32, ConvertError> {
    i32::try_from(v).map_err(|_| ConvertError::Int32Overflow { value: v.clone() })
}

/// Low 64 bits, two's complement. `BigInteger.longValue()` semantics.
fn low_64_bits(v: &BigInt) -> i64 {
    let masked = v & &BigInt::from(u64::MAX);
    masked.to_u64().map(|bits| bits as i64).unwrap_or_default()
}

fn big_to_f32(v: &BigInt) -> f32 {
    v.to_f32().unwrap_or(match v.sign() {
        Sign::Minus => f32::NEG_INFINITY,
        _ => f32::INFINITY,
    })
}

fn big_to_f64(v: &BigInt) -> f64 {
    v.to_f64().unwrap_or(match v.sign() {
        Sign::Minus => f64::NEG_INFINITY,
        _ => f64::INFINITY,
    })
}

/// Truncate toward zero via the exact decimal expansion of the double.
fn float_to_big_int(v: f64) -> Option<BigInt> {
    let decimal = BigDecimal::try_from(v).ok()?;
    decimal.with_scale_round(0, RoundingMode::Down).to_bigint()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryData;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use std::str::FromStr;

    type V = Value<&'static MemoryData>;

    fn coerce(value: NumericValue, target: TargetType) -> Result<Option<V>, ConvertError> {
        coerce_numeric(&value, &target)
    }

    fn big(text: &str) -> BigInt {
        BigInt::from_str(text).unwrap()
    }

    #[test]
    fn big_int_to_i32_is_exact_or_errors() {
        let fits = coerce(NumericValue::BigInt(big("-2147483648")), TargetType::Int32);
        assert_eq!(fits.unwrap().unwrap().as_i32(), Some(i32::MIN));

        let overflow = coerce(NumericValue::BigInt(big("2147483648")), TargetType::Int32);
        match overflow {
            Err(ConvertError::Int32Overflow { value }) => assert_eq!(value, big("2147483648")),
            other => panic!("expected overflow error, got {other:?}"),
        }
    }

    #[test]
    fn big_int_to_i64_keeps_low_bits() {
        // 2^64 + 5 wraps to 5.
        let wrapped = coerce(
            NumericValue::BigInt(big("18446744073709551621")),
            TargetType::Int64,
        );
        assert_eq!(wrapped.unwrap().unwrap().as_i64(), Some(5));

        // 2^64 - 1 is -1 in two's complement.
        let minus_one = coerce(
            NumericValue::BigInt(big("18446744073709551615")),
            TargetType::Int64,
        );
        assert_eq!(minus_one.unwrap().unwrap().as_i64(), Some(-1));

        let negative = coerce(NumericValue::BigInt(big("-7")), TargetType::Int64);
        assert_eq!(negative.unwrap().unwrap().as_i64(), Some(-7));
    }

    #[test]
    fn big_int_to_floats_and_decimal() {
        let as_f64 = coerce(NumericValue::BigInt(big("1024")), TargetType::Float64);
        assert_eq!(as_f64.unwrap().unwrap().as_f64(), Some(1024.0));

        let huge = big(&format!("9{}", "0".repeat(100)));
        let saturated = coerce(NumericValue::BigInt(huge.clone()), TargetType::Float32);
        assert_eq!(saturated.unwrap().unwrap().as_f32(), Some(f32::INFINITY));

        let exact = coerce(NumericValue::BigInt(huge.clone()), TargetType::Decimal);
        assert_eq!(
            exact.unwrap().unwrap().as_decimal(),
            Some(&BigDecimal::from(huge))
        );
    }

    #[test]
    fn i64_narrowing() {
        // 2^32 + 1 keeps the low 32 bits.
        let narrowed = coerce(NumericValue::Int(4294967297), TargetType::Int32);
        assert_eq!(narrowed.unwrap().unwrap().as_i32(), Some(1));

        let round_trip = coerce(NumericValue::Int(-42), TargetType::BigInt);
        assert_eq!(
            round_trip.unwrap().unwrap().as_big_int(),
            Some(&BigInt::from(-42))
        );

        let lossy = coerce(NumericValue::Int(i64::MAX), TargetType::Float32);
        assert_eq!(
            lossy.unwrap().unwrap().as_f32(),
            Some(9_223_372_036_854_775_807i64 as f32)
        );
    }

    #[test]
    fn f64_narrowing_truncates_and_saturates() {
        assert_eq!(
            coerce(NumericValue::Float(3.99), TargetType::Int32)
                .unwrap()
                .unwrap()
                .as_i32(),
            Some(3)
        );
        assert_eq!(
            coerce(NumericValue::Float(-3.99), TargetType::Int64)
                .unwrap()
                .unwrap()
                .as_i64(),
            Some(-3)
        );
        assert_eq!(
            coerce(NumericValue::Float(f64::NAN), TargetType::Int32)
                .unwrap()
                .unwrap()
                .as_i32(),
            Some(0)
        );
        assert_eq!(
            coerce(NumericValue::Float(f64::INFINITY), TargetType::Int64)
                .unwrap()
                .unwrap()
                .as_i64(),
            Some(i64::MAX)
        );
    }

    #[test]
    fn f64_to_decimal_and_big_int() {
        let half = coerce(NumericValue::Float(0.5), TargetType::Decimal);
        assert_eq!(
            half.unwrap().unwrap().as_decimal(),
            Some(&BigDecimal::from_str("0.5").unwrap())
        );

        // 1e21 is exactly representable as a double.
        let truncated = coerce(NumericValue::Float(1e21), TargetType::BigInt);
        assert_eq!(
            truncated.unwrap().unwrap().as_big_int(),
            Some(&big("1000000000000000000000"))
        );

        assert!(coerce(NumericValue::Float(f64::NAN), TargetType::Decimal)
            .unwrap()
            .is_none());
        assert!(coerce(NumericValue::Float(f64::INFINITY), TargetType::BigInt)
            .unwrap()
            .is_none());
    }

    #[test]
    fn non_numeric_targets_are_not_applicable() {
        assert!(coerce(NumericValue::Int(5), TargetType::String)
            .unwrap()
            .is_none());
        assert!(coerce(NumericValue::Float(5.0), TargetType::ObjectLiteral)
            .unwrap()
            .is_none());
        assert!(coerce(NumericValue::BigInt(big("5")), TargetType::Value)
            .unwrap()
            .is_none());
    }

    proptest! {
        #[test]
        fn f64_to_f64_is_identity(v in proptest::num::f64::ANY) {
            let out = coerce(NumericValue::Float(v), TargetType::Float64)
                .unwrap()
                .unwrap()
                .as_f64()
                .unwrap();
            prop_assert_eq!(out.to_bits(), v.to_bits());
        }

        #[test]
        fn in_range_big_int_to_i32_is_exact(v in any::<i32>()) {
            let out = coerce(NumericValue::BigInt(BigInt::from(v)), TargetType::Int32)
                .unwrap()
                .unwrap()
                .as_i32()
                .unwrap();
            prop_assert_eq!(out, v);
        }

        #[test]
        fn i64_to_decimal_is_exact(v in any::<i64>()) {
            let out = coerce(NumericValue::Int(v), TargetType::Decimal).unwrap().unwrap();
            prop_assert_eq!(out.as_decimal().unwrap(), &BigDecimal::from(v));
        }
    }
}
