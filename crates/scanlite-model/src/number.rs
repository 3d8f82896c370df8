//! Arbitrary-precision decimal numbers for the `N` attribute type.
//!
//! A [`Number`] keeps the literal it was parsed from (so responses echo the
//! caller's text) together with a normalized [`BigDecimal`] used for
//! equality, hashing and ordering.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use bigdecimal::BigDecimal;
use bigdecimal::num_bigint::BigInt;
use bigdecimal::num_traits::Zero;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Maximum significant digits a stored number may carry.
pub const MAX_SIGNIFICANT_DIGITS: u64 = 38;

/// Largest allowed power of ten of a number's leading digit.
pub const MAX_MAGNITUDE: i64 = 125;

/// Smallest allowed power of ten of a non-zero number's leading digit.
pub const MIN_MAGNITUDE: i64 = -130;

/// Explicit exponents are clamped to `[-EXPONENT_BOUND, EXPONENT_BOUND]`.
const EXPONENT_BOUND: i64 = 1_000_000;

/// Errors produced while parsing or range-checking a number literal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NumberError {
    /// The literal was the empty string.
    #[error("The parameter cannot be converted to a numeric value")]
    Empty,
    /// The literal is not a decimal number.
    #[error("The parameter cannot be converted to a numeric value: {0}")]
    Invalid(String),
    /// More than [`MAX_SIGNIFICANT_DIGITS`] significant digits.
    #[error("Attempting to store more than 38 significant digits in a Number")]
    TooManyDigits,
    /// Magnitude above [`MAX_MAGNITUDE`].
    #[error(
        "Number overflow. Attempting to store a number with magnitude larger than supported range"
    )]
    Overflow,
    /// Non-zero magnitude below [`MIN_MAGNITUDE`].
    #[error(
        "Number underflow. Attempting to store a number with magnitude smaller than supported range"
    )]
    Underflow,
}

/// An exact decimal number.
#[derive(Debug, Clone)]
pub struct Number {
    text: String,
    /// Normalized value: no trailing zeros in the unscaled integer.
    value: BigDecimal,
}

impl Number {
    /// Parses a number literal.
    ///
    /// Accepts an optional leading `-`, digits with an optional fraction (or
    /// a bare fraction such as `.5`), and an optional `e`/`E` exponent with
    /// an optional sign. No whitespace and no leading `+` are accepted.
    pub fn parse(text: &str) -> Result<Self, NumberError> {
        if text.is_empty() {
            return Err(NumberError::Empty);
        }
        let invalid = || NumberError::Invalid(text.to_owned());

        let bytes = text.as_bytes();
        let (negative, rest) = match bytes.split_first() {
            Some((b'-', rest)) => (true, rest),
            _ => (false, bytes),
        };

        let (mantissa, exponent) = match rest.iter().position(|b| matches!(b, b'e' | b'E')) {
            Some(pos) => {
                let exp = parse_exponent(&rest[pos + 1..]).ok_or_else(invalid)?;
                (&rest[..pos], exp)
            }
            None => (rest, 0),
        };

        let (int_part, frac_part) = match mantissa.iter().position(|&b| b == b'.') {
            Some(pos) => (&mantissa[..pos], &mantissa[pos + 1..]),
            None => (mantissa, &[][..]),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }
        if !int_part.iter().chain(frac_part).all(u8::is_ascii_digit) {
            return Err(invalid());
        }

        let digits: Vec<u8> = int_part.iter().chain(frac_part).copied().collect();
        let unscaled = BigInt::parse_bytes(&digits, 10).ok_or_else(invalid)?;
        let unscaled = if negative { -unscaled } else { unscaled };
        let frac_len = i64::try_from(frac_part.len()).map_err(|_| invalid())?;
        let value = BigDecimal::new(unscaled, frac_len.saturating_sub(exponent)).normalized();

        Ok(Self {
            text: text.to_owned(),
            value,
        })
    }

    /// Checks the significant-digit and magnitude limits of stored numbers.
    pub fn check_limits(&self) -> Result<(), NumberError> {
        if self.is_zero() {
            return Ok(());
        }
        let digits = self.value.digits();
        if digits > MAX_SIGNIFICANT_DIGITS {
            return Err(NumberError::TooManyDigits);
        }
        let magnitude = self.magnitude();
        if magnitude > MAX_MAGNITUDE {
            return Err(NumberError::Overflow);
        }
        if magnitude < MIN_MAGNITUDE {
            return Err(NumberError::Underflow);
        }
        Ok(())
    }

    /// The literal this number was parsed from.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The exact value.
    #[must_use]
    pub fn value(&self) -> &BigDecimal {
        &self.value
    }

    /// Returns `true` if the value is zero (in any spelling).
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    /// Canonical text of the normalized value, e.g. `-1.25E+3`.
    ///
    /// Two numbers are equal exactly when their canonical texts are equal.
    #[must_use]
    pub fn canonical(&self) -> String {
        if self.is_zero() {
            return "0".to_owned();
        }
        let (unscaled, _) = self.value.as_bigint_and_exponent();
        let digits = unscaled.magnitude().to_string();
        let mut out = String::with_capacity(digits.len() + 8);
        if self.value < BigDecimal::zero() {
            out.push('-');
        }
        let (lead, tail) = digits.split_at(1);
        out.push_str(lead);
        if !tail.is_empty() {
            out.push('.');
            out.push_str(tail);
        }
        let magnitude = self.magnitude();
        if magnitude != 0 {
            out.push_str(&format!("E{magnitude:+}"));
        }
        out
    }

    /// Power of ten of the leading digit. Meaningless for zero.
    fn magnitude(&self) -> i64 {
        let (_, scale) = self.value.as_bigint_and_exponent();
        let digits = i64::try_from(self.value.digits()).unwrap_or(i64::MAX);
        digits.saturating_sub(1).saturating_sub(scale)
    }
}

/// Parses an exponent, clamping it to [`EXPONENT_BOUND`].
fn parse_exponent(bytes: &[u8]) -> Option<i64> {
    let (negative, digits) = match bytes.split_first() {
        Some((b'-', rest)) => (true, rest),
        Some((b'+', rest)) => (false, rest),
        _ => (false, bytes),
    };
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    let value = digits.iter().fold(0i64, |acc, d| {
        acc.saturating_mul(10)
            .saturating_add(i64::from(d - b'0'))
            .min(EXPONENT_BOUND)
    });
    Some(if negative { -value } else { value })
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Number {}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Number {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl Hash for Number {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl std::str::FromStr for Number {
    type Err = NumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.text)
    }
}

impl<'de> Deserialize<'de> for Number {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}
