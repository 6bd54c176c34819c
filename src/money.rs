//! Money Type
//!
//! Exact-decimal amount paired with a currency. All balance arithmetic in the
//! transfer engine goes through this type.
//!
//! ## Design Principles
//! 1. No floating point anywhere: amounts are `rust_decimal::Decimal`
//! 2. Cross-currency arithmetic is an explicit error, never a silent cast
//! 3. Subtraction below zero is legal at the type level; sufficiency is the
//!    caller's check before committing a debit

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Money conversion and arithmetic errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MoneyError {
    #[error("currency mismatch: expected {expected}, got {actual}")]
    CurrencyMismatch { expected: Currency, actual: Currency },

    #[error("unsupported currency: {0}")]
    UnsupportedCurrency(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),
}

/// Supported settlement currencies (ISO 4217)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Eur,
    Gbp,
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Currency {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "EUR" => Ok(Currency::Eur),
            "GBP" => Ok(Currency::Gbp),
            other => Err(MoneyError::UnsupportedCurrency(other.to_string())),
        }
    }
}

/// Exact decimal amount in a single currency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Money {
    pub amount: Decimal,
    pub currency: Currency,
}

impl Money {
    pub fn new(amount: Decimal, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Parse a client-supplied decimal string (e.g. "100.00")
    pub fn parse(amount: &str, currency: Currency) -> Result<Self, MoneyError> {
        let amount = Decimal::from_str(amount.trim())
            .map_err(|e| MoneyError::InvalidAmount(e.to_string()))?;
        Ok(Self::new(amount, currency))
    }

    pub fn is_positive(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    /// Checked addition; both operands must share a currency
    pub fn checked_add(&self, other: &Money) -> Result<Money, MoneyError> {
        self.assert_same_currency(other)?;
        Ok(Money::new(self.amount + other.amount, self.currency))
    }

    /// Checked subtraction; the result may be negative (callers check
    /// sufficiency before committing a debit)
    pub fn checked_sub(&self, other: &Money) -> Result<Money, MoneyError> {
        self.assert_same_currency(other)?;
        Ok(Money::new(self.amount - other.amount, self.currency))
    }

    /// Compare two amounts of the same currency
    pub fn compare(&self, other: &Money) -> Result<Ordering, MoneyError> {
        self.assert_same_currency(other)?;
        Ok(self.amount.cmp(&other.amount))
    }

    fn assert_same_currency(&self, other: &Money) -> Result<(), MoneyError> {
        if self.currency != other.currency {
            return Err(MoneyError::CurrencyMismatch {
                expected: self.currency,
                actual: other.currency,
            });
        }
        Ok(())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}
