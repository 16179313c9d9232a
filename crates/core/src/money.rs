//! Money value object: minor-unit amounts tagged with a currency.
//!
//! Amounts are compared by value, never by identity, and all arithmetic is
//! checked: mixing currencies or overflowing i64 is a domain error, not a
//! silent wrap.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Currencies the platform supports (the static currency configuration).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Usd,
    Eur,
    Gbp,
    Ngn,
    Kes,
    Ghs,
    Zar,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Ngn => "NGN",
            Currency::Kes => "KES",
            Currency::Ghs => "GHS",
            Currency::Zar => "ZAR",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Eur => "€",
            Currency::Gbp => "£",
            Currency::Ngn => "₦",
            Currency::Kes => "KSh",
            Currency::Ghs => "GH₵",
            Currency::Zar => "R",
        }
    }

    /// Minor units per major unit (all supported currencies use cents).
    pub fn minor_per_major(&self) -> i64 {
        100
    }

    pub fn parse(code: &str) -> DomainResult<Self> {
        match code.to_ascii_uppercase().as_str() {
            "USD" => Ok(Currency::Usd),
            "EUR" => Ok(Currency::Eur),
            "GBP" => Ok(Currency::Gbp),
            "NGN" => Ok(Currency::Ngn),
            "KES" => Ok(Currency::Kes),
            "GHS" => Ok(Currency::Ghs),
            "ZAR" => Ok(Currency::Zar),
            other => Err(DomainError::validation(format!(
                "unsupported currency: {other}"
            ))),
        }
    }
}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

/// A non-negative amount of money in minor units.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    minor: i64,
    currency: Currency,
}

impl Money {
    /// Create an amount from minor units. Negative amounts are rejected;
    /// movements that can go both ways model direction explicitly.
    pub fn from_minor(minor: i64, currency: Currency) -> DomainResult<Self> {
        if minor < 0 {
            return Err(DomainError::validation("amount cannot be negative"));
        }
        Ok(Self { minor, currency })
    }

    pub fn zero(currency: Currency) -> Self {
        Self { minor: 0, currency }
    }

    pub fn minor(&self) -> i64 {
        self.minor
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn is_zero(&self) -> bool {
        self.minor == 0
    }

    fn ensure_same_currency(&self, other: &Money) -> DomainResult<()> {
        if self.currency != other.currency {
            return Err(DomainError::invariant(format!(
                "currency mismatch: {} vs {}",
                self.currency, other.currency
            )));
        }
        Ok(())
    }

    pub fn checked_add(&self, other: &Money) -> DomainResult<Money> {
        self.ensure_same_currency(other)?;
        let minor = self
            .minor
            .checked_add(other.minor)
            .ok_or_else(|| DomainError::invariant("amount overflow"))?;
        Ok(Money {
            minor,
            currency: self.currency,
        })
    }

    /// Subtract, failing if the result would be negative.
    pub fn checked_sub(&self, other: &Money) -> DomainResult<Money> {
        self.ensure_same_currency(other)?;
        if other.minor > self.minor {
            return Err(DomainError::invariant("amount would go negative"));
        }
        Ok(Money {
            minor: self.minor - other.minor,
            currency: self.currency,
        })
    }

    /// Multiply by a quantity (line totals).
    pub fn checked_mul(&self, quantity: i64) -> DomainResult<Money> {
        if quantity < 0 {
            return Err(DomainError::validation("quantity cannot be negative"));
        }
        let minor = self
            .minor
            .checked_mul(quantity)
            .ok_or_else(|| DomainError::invariant("amount overflow"))?;
        Ok(Money {
            minor,
            currency: self.currency,
        })
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let per = self.currency.minor_per_major();
        write!(
            f,
            "{} {}.{:02}",
            self.currency.code(),
            self.minor / per,
            self.minor % per
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_negative_amounts() {
        assert!(Money::from_minor(-1, Currency::Usd).is_err());
        assert!(Money::from_minor(0, Currency::Usd).is_ok());
    }

    #[test]
    fn add_same_currency() {
        let a = Money::from_minor(150, Currency::Ngn).unwrap();
        let b = Money::from_minor(250, Currency::Ngn).unwrap();
        assert_eq!(a.checked_add(&b).unwrap().minor(), 400);
    }

    #[test]
    fn add_mixed_currency_fails() {
        let a = Money::from_minor(100, Currency::Usd).unwrap();
        let b = Money::from_minor(100, Currency::Eur).unwrap();
        assert!(a.checked_add(&b).is_err());
    }

    #[test]
    fn sub_cannot_go_negative() {
        let a = Money::from_minor(100, Currency::Usd).unwrap();
        let b = Money::from_minor(150, Currency::Usd).unwrap();
        assert!(a.checked_sub(&b).is_err());
        assert_eq!(b.checked_sub(&a).unwrap().minor(), 50);
    }

    #[test]
    fn mul_overflow_is_caught() {
        let a = Money::from_minor(i64::MAX / 2, Currency::Usd).unwrap();
        assert!(a.checked_mul(3).is_err());
    }

    #[test]
    fn display_formats_minor_units() {
        let a = Money::from_minor(12345, Currency::Usd).unwrap();
        assert_eq!(a.to_string(), "USD 123.45");
    }
}
