//! Type-safe price representation using decimal arithmetic.
//!
//! Records persist bare [`Decimal`] amounts; [`Price`] pairs an amount with
//! a currency for display and for catalog savings calculations.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a price in the store's default currency.
    #[must_use]
    pub fn usd(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::default())
    }

    /// Percentage saved against `original`, rounded to a whole percent.
    ///
    /// Returns `None` when `original` is not greater than this price.
    #[must_use]
    pub fn savings_percent(&self, original: Decimal) -> Option<Decimal> {
        if original <= self.amount || original <= Decimal::ZERO {
            return None;
        }
        let saved = (original - self.amount) / original * Decimal::ONE_HUNDRED;
        Some(saved.round())
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{:.2}",
            self.currency_code.symbol(),
            self.amount.round_dp(2)
        )
    }
}

/// ISO 4217 currency codes. The catalog is priced in US dollars only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
}

impl CurrencyCode {
    /// Currency symbol used when formatting amounts.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::USD => "$",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_two_decimals() {
        assert_eq!(Price::usd(Decimal::new(45_000, 2)).to_string(), "$450.00");
        assert_eq!(Price::usd(Decimal::new(12_999, 1)).to_string(), "$1299.90");
        assert_eq!(
            Price::new(Decimal::new(5, 0), CurrencyCode::USD).to_string(),
            "$5.00"
        );
    }

    #[test]
    fn test_savings_percent() {
        let price = Price::usd(Decimal::new(750, 0));
        assert_eq!(
            price.savings_percent(Decimal::new(1000, 0)),
            Some(Decimal::new(25, 0))
        );
    }

    #[test]
    fn test_savings_percent_none_when_not_discounted() {
        let price = Price::usd(Decimal::new(750, 0));
        assert_eq!(price.savings_percent(Decimal::new(750, 0)), None);
        assert_eq!(price.savings_percent(Decimal::new(500, 0)), None);
    }
}
