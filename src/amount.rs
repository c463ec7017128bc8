//! Transaction amount with exactly 2 decimal places.
//!
//! Uses `rust_decimal` internally so BRL amounts never pass through
//! floating point on their way into field `54`.

use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Why an amount string was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("amount is empty")]
    Empty,

    #[error("{0:?} is not a plain decimal number")]
    NotDecimal(String),

    #[error("{0:?} has more than 2 fraction digits")]
    TooPrecise(String),

    #[error("{0:?} is negative")]
    Negative(String),
}

/// A non-negative amount that always renders with 2 fraction digits.
///
/// Input may carry 0, 1 or 2 fraction digits; anything finer would need
/// rounding and is rejected instead. Signs, exponents and thousands
/// separators are not accepted.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use pix_brcode::Amount;
///
/// let amount = Amount::from_str("10.5").unwrap();
/// assert_eq!(amount.to_string(), "10.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Amount(Decimal);

impl Amount {
    /// The number of decimal places emitted.
    pub const SCALE: u32 = 2;

    /// Creates an `Amount` from a non-negative `Decimal` with at most 2
    /// fraction digits, normalized to exactly 2.
    pub fn new(value: Decimal) -> Option<Self> {
        if value.is_sign_negative() && !value.is_zero() {
            return None;
        }
        let mut normalized = value.normalize();
        if normalized.scale() > Self::SCALE {
            return None;
        }
        normalized.rescale(Self::SCALE);
        Some(Amount(normalized))
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(AmountError::Empty);
        }
        if trimmed.starts_with('-') {
            return Err(AmountError::Negative(trimmed.to_string()));
        }

        let (whole, fraction) = match trimmed.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (trimmed, ""),
        };
        let is_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if whole.is_empty() || trimmed.ends_with('.') || !is_digits(whole) || !is_digits(fraction)
        {
            return Err(AmountError::NotDecimal(trimmed.to_string()));
        }
        if fraction.len() > Self::SCALE as usize {
            return Err(AmountError::TooPrecise(trimmed.to_string()));
        }

        let decimal = Decimal::from_str(trimmed)
            .map_err(|_| AmountError::NotDecimal(trimmed.to_string()))?;
        // Past 28 significant digits the parser rounds instead of failing.
        if decimal.scale() != fraction.len() as u32 {
            return Err(AmountError::NotDecimal(trimmed.to_string()));
        }
        Amount::new(decimal).ok_or_else(|| AmountError::NotDecimal(trimmed.to_string()))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
