use std::cmp::Ordering;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::Zero;
use ordered_float::OrderedFloat;

use crate::{
    ast::Node,
    error::RuntimeError,
    util::num::{big_to_f64, f64_to_big, ratio_to_f64},
};

/// Result type for numeric tower operations.
pub type NumResult = Result<Number, RuntimeError>;

/// A value in the exact numeric tower.
///
/// The three ranks are ordered `Int < Rational < Real`. Combining two numbers
/// computes at the wider operand's rank, with one deliberate exception:
/// dividing two integers that do not divide evenly yields a `Rational`, never
/// a `Real`, so `5/2` stays exact.
///
/// Two invariants hold for every `Rational` in circulation: it is in lowest
/// terms with a positive denominator, and its denominator is never one (such
/// values fold back to `Int` at construction).
#[derive(Debug, Clone, PartialEq)]
pub enum Number {
    /// An arbitrary-precision integer.
    Int(BigInt),
    /// An exact ratio of integers.
    Rational(BigRational),
    /// A double-precision float.
    Real(f64),
}

impl Number {
    /// Builds a rational from a numerator and denominator, reducing to lowest
    /// terms and folding whole ratios back to `Int`.
    ///
    /// # Errors
    /// Returns `RuntimeError::DivisionByZero` for a zero denominator.
    ///
    /// # Example
    /// ```
    /// use num_bigint::BigInt;
    /// use numera::interpreter::value::number::Number;
    ///
    /// let half = Number::rational(BigInt::from(2), BigInt::from(4)).unwrap();
    /// assert_eq!(half.to_string(), "1/2");
    ///
    /// let whole = Number::rational(BigInt::from(4), BigInt::from(2)).unwrap();
    /// assert_eq!(whole, Number::Int(BigInt::from(2)));
    /// ```
    pub fn rational(numer: BigInt, denom: BigInt) -> NumResult {
        if denom.is_zero() {
            return Err(RuntimeError::DivisionByZero);
        }
        Ok(Self::from_ratio(BigRational::new(numer, denom)))
    }

    /// Wraps a ratio, folding denominator-one values back to `Int`.
    #[must_use]
    pub fn from_ratio(ratio: BigRational) -> Self {
        if ratio.is_integer() {
            Self::Int(ratio.to_integer())
        } else {
            Self::Rational(ratio)
        }
    }

    /// Wraps a double, folding finite integral values back to `Int`.
    ///
    /// This is how native-function results re-enter the tower: `sqrt(9)`
    /// comes back as the integer `3`, not the real `3.0`.
    #[must_use]
    pub fn from_f64(value: f64) -> Self {
        match f64_to_big(value) {
            Some(n) => Self::Int(n),
            None => Self::Real(value),
        }
    }

    /// Reads a numeric literal node into the tower.
    #[must_use]
    pub fn from_node(node: &Node) -> Option<Self> {
        match node {
            Node::Int(n) => Some(Self::Int(n.clone())),
            Node::Rational(r) => Some(Self::Rational(r.clone())),
            Node::Real(x) => Some(Self::Real(*x)),
            _ => None,
        }
    }

    /// Converts this number back into a literal node.
    #[must_use]
    pub fn into_node(self) -> Node {
        match self {
            Self::Int(n) => Node::Int(n),
            Self::Rational(r) => Node::Rational(r),
            Self::Real(x) => Node::Real(x),
        }
    }

    /// The value as a double, saturating to infinity when out of range.
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        match self {
            Self::Int(n) => big_to_f64(n),
            Self::Rational(r) => ratio_to_f64(r),
            Self::Real(x) => *x,
        }
    }

    fn as_ratio(&self) -> BigRational {
        match self {
            Self::Int(n) => BigRational::from_integer(n.clone()),
            Self::Rational(r) => r.clone(),
            Self::Real(_) => unreachable!("reals never reach exact comparison"),
        }
    }

    const fn is_real(&self) -> bool {
        matches!(self, Self::Real(_))
    }

    /// Floors the value to an integer, as the integer-only operators
    /// (`mod`, `rem`, `//`) require.
    fn floor_int(&self) -> Result<BigInt, RuntimeError> {
        match self {
            Self::Int(n) => Ok(n.clone()),
            Self::Rational(r) => Ok(r.floor().to_integer()),
            Self::Real(x) => f64_to_big(x.floor()).ok_or_else(|| {
                                 RuntimeError::type_error(format!(
                    "cannot coerce non-finite value {x} to an integer"
                ))
                             }),
        }
    }

    fn arith(&self,
             other: &Self,
             int_op: fn(&BigInt, &BigInt) -> BigInt,
             ratio_op: fn(&BigRational, &BigRational) -> BigRational,
             real_op: fn(f64, f64) -> f64)
             -> Self {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => Self::Int(int_op(a, b)),
            _ if self.is_real() || other.is_real() => {
                Self::Real(real_op(self.to_f64(), other.to_f64()))
            },
            _ => Self::from_ratio(ratio_op(&self.as_ratio(), &other.as_ratio())),
        }
    }

    /// Addition at the pair's combined rank.
    #[must_use]
    pub fn add(&self, other: &Self) -> Self {
        self.arith(other, |a, b| a + b, |a, b| a + b, |a, b| a + b)
    }

    /// Subtraction at the pair's combined rank.
    #[must_use]
    pub fn sub(&self, other: &Self) -> Self {
        self.arith(other, |a, b| a - b, |a, b| a - b, |a, b| a - b)
    }

    /// Multiplication at the pair's combined rank.
    #[must_use]
    pub fn mul(&self, other: &Self) -> Self {
        self.arith(other, |a, b| a * b, |a, b| a * b, |a, b| a * b)
    }

    /// Negation.
    #[must_use]
    pub fn neg(&self) -> Self {
        match self {
            Self::Int(n) => Self::Int(-n),
            Self::Rational(r) => Self::Rational(-r),
            Self::Real(x) => Self::Real(-x),
        }
    }

    /// Division. Integer pairs that divide evenly stay integers; pairs that
    /// do not yield an exact rational rather than a real.
    ///
    /// # Errors
    /// Returns `RuntimeError::DivisionByZero` for a zero divisor at any rank.
    pub fn div(&self, other: &Self) -> NumResult {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => {
                if b.is_zero() {
                    return Err(RuntimeError::DivisionByZero);
                }
                if (a % b).is_zero() {
                    Ok(Self::Int(a / b))
                } else {
                    Self::rational(a.clone(), b.clone())
                }
            },
            _ if self.is_real() || other.is_real() => {
                let divisor = other.to_f64();
                if divisor == 0.0 {
                    return Err(RuntimeError::DivisionByZero);
                }
                Ok(Self::Real(self.to_f64() / divisor))
            },
            _ => {
                let divisor = other.as_ratio();
                if divisor.is_zero() {
                    return Err(RuntimeError::DivisionByZero);
                }
                Ok(Self::from_ratio(self.as_ratio() / divisor))
            },
        }
    }

    /// Exponentiation. Always yields `Real`, regardless of operand ranks.
    #[must_use]
    pub fn pow(&self, other: &Self) -> Self {
        Self::Real(self.to_f64().powf(other.to_f64()))
    }

    /// Truncating remainder over floored operands, sign of the dividend.
    ///
    /// # Errors
    /// Returns `RuntimeError::DivisionByZero` for a zero divisor.
    pub fn rem(&self, other: &Self) -> NumResult {
        let a = self.floor_int()?;
        let b = other.floor_int()?;
        if b.is_zero() {
            return Err(RuntimeError::DivisionByZero);
        }
        Ok(Self::Int(a % b))
    }

    /// Floored modulo over floored operands, sign of the divisor.
    ///
    /// # Errors
    /// Returns `RuntimeError::DivisionByZero` for a zero divisor.
    pub fn modulo(&self, other: &Self) -> NumResult {
        let a = self.floor_int()?;
        let b = other.floor_int()?;
        if b.is_zero() {
            return Err(RuntimeError::DivisionByZero);
        }
        Ok(Self::Int(((a % &b) + &b) % &b))
    }

    /// Floor division over floored operands.
    ///
    /// # Errors
    /// Returns `RuntimeError::DivisionByZero` for a zero divisor.
    pub fn floordiv(&self, other: &Self) -> NumResult {
        let a = self.floor_int()?;
        let b = other.floor_int()?;
        if b.is_zero() {
            return Err(RuntimeError::DivisionByZero);
        }
        Ok(Self::Int(BigRational::new(a, b).floor().to_integer()))
    }

    /// Total-order comparison. Exact when neither operand is real; through
    /// `OrderedFloat` otherwise.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        if self.is_real() || other.is_real() {
            OrderedFloat(self.to_f64()).cmp(&OrderedFloat(other.to_f64()))
        } else {
            self.as_ratio().cmp(&other.as_ratio())
        }
    }

    /// Numeric equality across ranks.
    #[must_use]
    pub fn equals(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Equal
    }

    /// The truthiness of a number: strictly positive values are true.
    #[must_use]
    pub fn is_true(&self) -> bool {
        self.compare(&Self::Int(BigInt::zero())) == Ordering::Greater
    }
}

impl std::fmt::Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Rational(r) => write!(f, "{}/{}", r.numer(), r.denom()),
            Self::Real(x) => write!(f, "{x}"),
        }
    }
}
