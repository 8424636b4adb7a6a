//! Monetary amounts with fixed-point decimal arithmetic
//!
//! Claim amounts are carried as `rust_decimal::Decimal` values normalized to
//! two decimal places with round-half-up (midpoint away from zero), so every
//! computed fee is reproducible regardless of platform.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Neg, Sub};
use std::str::FromStr;
use thiserror::Error;

/// Number of decimal places every amount is normalized to
pub const AMOUNT_SCALE: u32 = 2;

/// Largest amount in cents: 12 integer digits, matching `NUMERIC(14, 2)`
const MAX_CENTS: i64 = 99_999_999_999_999;

/// Errors that can occur while parsing an amount
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AmountError {
    #[error("amount is empty")]
    Empty,

    #[error("'{0}' is not a valid amount")]
    Invalid(String),
}

/// A monetary amount in the claim's billing currency, scale 2
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(Decimal);

impl Amount {
    /// Creates an amount, rounding half-up to two decimal places
    pub fn new(value: Decimal) -> Self {
        let mut rounded = value.round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(AMOUNT_SCALE);
        if rounded.is_zero() {
            rounded.set_sign_positive(true);
        }
        Self(rounded)
    }

    /// Creates an amount from minor units (cents)
    pub fn from_cents(cents: i64) -> Self {
        Self::new(Decimal::new(cents, AMOUNT_SCALE))
    }

    /// The zero amount
    pub fn zero() -> Self {
        Self::new(dec!(0))
    }

    /// Largest amount that can be stored, `999999999999.99`
    pub fn max_value() -> Self {
        Self::from_cents(MAX_CENTS)
    }

    /// Returns true when the magnitude is above [`Amount::max_value`]
    pub fn exceeds_max(&self) -> bool {
        self.0.abs() > Self::max_value().0
    }

    /// Parses a loosely formatted amount such as `"$1,100.00 "`.
    ///
    /// Currency symbols, thousands separators and whitespace are stripped
    /// before the remaining text is read as a decimal.
    pub fn parse(input: &str) -> Result<Self, AmountError> {
        let cleaned: String = input
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '$' && *c != ',')
            .collect();

        if cleaned.is_empty() {
            return Err(AmountError::Empty);
        }

        Decimal::from_str(&cleaned)
            .or_else(|_| Decimal::from_scientific(&cleaned))
            .map(Self::new)
            .map_err(|_| AmountError::Invalid(input.trim().to_string()))
    }

    /// Adds two amounts, returning `None` on decimal overflow
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self::new)
    }

    /// Subtracts `other`, returning `None` on decimal overflow
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self::new)
    }

    /// Adds two amounts, clamping at the decimal range instead of overflowing
    pub fn saturating_add(self, other: Self) -> Self {
        Self::new(self.0.saturating_add(other.0))
    }

    /// Returns the underlying decimal
    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true for amounts below zero
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }
}

impl Default for Amount {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Decimal {
        amount.0
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Panics on decimal overflow, like `Decimal`; use [`Amount::checked_add`]
/// for unbounded input
impl Add for Amount {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.0 + other.0)
    }
}

impl Sub for Amount {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.0 - other.0)
    }
}

impl Neg for Amount {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.0)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Amount::zero(), Amount::saturating_add)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Self {
        iter.copied().sum()
    }
}
