//! Minor-unit monetary amounts.
//!
//! All monetary math uses integer minor units (kobo for NGN, cents for USD)
//! to avoid floating-point rounding. Signed ledger entries are plain `i64`
//! values; [`Amount`] is the non-negative magnitude used for balances,
//! prices, and operation inputs.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing or combining an [`Amount`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountError {
    /// The input value is negative.
    #[error("amount cannot be negative")]
    Negative,
    /// The arithmetic result does not fit in an `i64`.
    #[error("amount arithmetic overflowed")]
    Overflow,
}

/// A non-negative monetary amount in minor units.
///
/// ## Examples
///
/// ```
/// use oracle_core::Amount;
///
/// let price = Amount::new(3000)?;
/// let topup = Amount::new(5000)?;
///
/// let balance = topup.checked_sub(price).expect("covered");
/// assert_eq!(balance.get(), 2000);
///
/// assert!(Amount::new(-1).is_err());
/// # Ok::<(), oracle_core::AmountError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "i64", into = "i64")]
pub struct Amount(i64);

impl TryFrom<i64> for Amount {
    type Error = AmountError;

    fn try_from(minor_units: i64) -> Result<Self, Self::Error> {
        Self::new(minor_units)
    }
}

impl From<Amount> for i64 {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl Amount {
    /// The zero amount.
    pub const ZERO: Self = Self(0);

    /// Create an amount from a minor-unit value.
    ///
    /// # Errors
    ///
    /// Returns [`AmountError::Negative`] if `minor_units < 0`.
    pub const fn new(minor_units: i64) -> Result<Self, AmountError> {
        if minor_units < 0 {
            return Err(AmountError::Negative);
        }
        Ok(Self(minor_units))
    }

    /// Get the minor-unit value.
    #[must_use]
    pub const fn get(&self) -> i64 {
        self.0
    }

    /// Whether this amount is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Add two amounts, failing on `i64` overflow.
    #[must_use]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(sum) => Some(Self(sum)),
            None => None,
        }
    }

    /// Subtract `other` from `self`.
    ///
    /// Returns `None` if `other > self` — an [`Amount`] can never go
    /// negative.
    #[must_use]
    pub const fn checked_sub(self, other: Self) -> Option<Self> {
        if other.0 > self.0 {
            return None;
        }
        Some(Self(self.0 - other.0))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// ISO 4217 currency codes supported by wallets.
///
/// A wallet's currency is fixed at creation; there is no conversion logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    NGN,
    USD,
}

impl CurrencyCode {
    /// The ISO 4217 code as a string.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NGN => "NGN",
            Self::USD => "USD",
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_negative() {
        assert_eq!(Amount::new(-1), Err(AmountError::Negative));
        assert!(Amount::new(0).is_ok());
        assert!(Amount::new(5000).is_ok());
    }

    #[test]
    fn test_checked_sub_never_negative() {
        let balance = Amount::new(1000).unwrap();
        let price = Amount::new(5000).unwrap();
        assert!(balance.checked_sub(price).is_none());
        assert_eq!(price.checked_sub(balance).unwrap().get(), 4000);
    }

    #[test]
    fn test_checked_add_overflow() {
        let max = Amount::new(i64::MAX).unwrap();
        assert!(max.checked_add(Amount::new(1).unwrap()).is_none());
    }

    #[test]
    fn test_serde_transparent() {
        let amount = Amount::new(2500).unwrap();
        let json = serde_json::to_string(&amount).unwrap();
        assert_eq!(json, "2500");
        let back: Amount = serde_json::from_str(&json).unwrap();
        assert_eq!(back, amount);
    }

    #[test]
    fn test_deserialize_rejects_negative() {
        assert!(serde_json::from_str::<Amount>("-5").is_err());
    }

    #[test]
    fn test_currency_codes() {
        assert_eq!(CurrencyCode::NGN.code(), "NGN");
        assert_eq!(CurrencyCode::default(), CurrencyCode::NGN);
        assert_eq!(
            serde_json::to_string(&CurrencyCode::NGN).unwrap(),
            "\"NGN\""
        );
    }
}
