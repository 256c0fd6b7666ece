//! Money Value Object
//!
//! Non-negative amount with exactly two fractional digits. Balances and
//! prices use it. Storage keeps the amount as integer minor units (cents),
//! so no floating point is involved anywhere.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Fractional digits kept for every amount
pub const MONEY_SCALE: u32 = 2;

/// Money validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    #[error("Amount must be a number")]
    NotANumber,

    #[error("Amount cannot be negative")]
    Negative,

    #[error("Amount may have at most two decimal places")]
    TooPrecise,

    #[error("Amount is too large")]
    OutOfRange,
}

/// Non-negative monetary amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// Create from a decimal amount
    pub fn new(amount: Decimal) -> Result<Self, MoneyError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(MoneyError::Negative);
        }

        let normalized = if amount.is_zero() {
            Decimal::ZERO
        } else {
            amount.normalize()
        };
        if normalized.scale() > MONEY_SCALE {
            return Err(MoneyError::TooPrecise);
        }

        let mut value = normalized;
        value.rescale(MONEY_SCALE);

        // Every amount must fit the storage column
        Self::minor_units(value)?;

        Ok(Self(value))
    }

    /// Parse user input such as `"19.99"` or `"20"`
    ///
    /// A comma is accepted as the decimal separator.
    pub fn parse(input: &str) -> Result<Self, MoneyError> {
        let input = input.trim().replace(',', ".");
        let amount = Decimal::from_str(&input).map_err(|_| MoneyError::NotANumber)?;
        Self::new(amount)
    }

    /// Create from stored minor units
    pub fn from_minor(minor: i64) -> Result<Self, MoneyError> {
        if minor < 0 {
            return Err(MoneyError::Negative);
        }
        Ok(Self(Decimal::new(minor, MONEY_SCALE)))
    }

    /// Amount in minor units for storage
    pub fn to_minor(&self) -> i64 {
        // Checked at construction
        Self::minor_units(self.0).unwrap_or(i64::MAX)
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn checked_add(&self, other: Money) -> Result<Money, MoneyError> {
        let sum = self.0.checked_add(other.0).ok_or(MoneyError::OutOfRange)?;
        Self::new(sum)
    }

    /// Subtract, failing if the result would be negative
    pub fn checked_sub(&self, other: Money) -> Result<Money, MoneyError> {
        Self::new(self.0 - other.0)
    }

    fn minor_units(value: Decimal) -> Result<i64, MoneyError> {
        let minor = value
            .checked_mul(Decimal::ONE_HUNDRED)
            .ok_or(MoneyError::OutOfRange)?
            .trunc();
        i64::try_from(minor).map_err(|_| MoneyError::OutOfRange)
    }
}

impl TryFrom<Decimal> for Money {
    type Error = MoneyError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.0
    }
}

impl FromStr for Money {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}
