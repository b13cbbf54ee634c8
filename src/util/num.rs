use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{FromPrimitive, Num, Signed, ToPrimitive};

/// Converts a `BigInt` to `f64`, saturating to infinity when the value is too
/// large for a double.
///
/// # Example
/// ```
/// use num_bigint::BigInt;
/// use numera::util::num::big_to_f64;
///
/// assert_eq!(big_to_f64(&BigInt::from(42)), 42.0);
/// ```
pub fn big_to_f64(value: &BigInt) -> f64 {
    value.to_f64().unwrap_or(if value.is_negative() {
                                 f64::NEG_INFINITY
                             } else {
                                 f64::INFINITY
                             })
}

/// Converts a `BigRational` to `f64`, saturating to infinity when the ratio
/// is too large for a double.
pub fn ratio_to_f64(value: &BigRational) -> f64 {
    value.to_f64()
         .unwrap_or(if value.is_negative() {
             f64::NEG_INFINITY
         } else {
             f64::INFINITY
         })
}

/// Converts an `f64` to a `BigInt` if and only if it is finite and integral.
///
/// # Example
/// ```
/// use num_bigint::BigInt;
/// use numera::util::num::f64_to_big;
///
/// assert_eq!(f64_to_big(3.0), Some(BigInt::from(3)));
/// assert_eq!(f64_to_big(3.5), None);
/// assert_eq!(f64_to_big(f64::INFINITY), None);
/// ```
pub fn f64_to_big(value: f64) -> Option<BigInt> {
    if !value.is_finite() || value.fract() != 0.0 {
        return None;
    }
    BigInt::from_f64(value)
}

/// Parses an integer lexeme in the given radix, tolerating an optional
/// leading sign and the `0b`/`0o`/`0x` prefixes.
///
/// Returns `None` when the digits are invalid for the radix.
pub fn bigint_from_lexeme(lexeme: &str, radix: u32) -> Option<BigInt> {
    let (negative, digits) = match lexeme.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, lexeme),
    };
    let digits = digits.strip_prefix("0b")
                       .or_else(|| digits.strip_prefix("0o"))
                       .or_else(|| digits.strip_prefix("0x"))
                       .unwrap_or(digits);
    let parsed = BigInt::from_str_radix(digits, radix).ok()?;
    Some(if negative { -parsed } else { parsed })
}
