//! Money type for representing monetary values.
//!
//! Amounts are integers in the smallest whole currency unit the backend
//! reports. Prices for the wholesale catalog are quoted in whole rupees.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    /// Nepalese rupee.
    #[default]
    NPR,
    /// Indian rupee.
    INR,
    /// US dollar, amounts in cents.
    USD,
}

impl Currency {
    /// Get the currency code (e.g., "NPR").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::NPR => "NPR",
            Currency::INR => "INR",
            Currency::USD => "USD",
        }
    }

    /// Get the number of decimal places amounts carry in this currency.
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::NPR | Currency::INR => 0,
            Currency::USD => 2,
        }
    }

    /// Parse a currency code string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_uppercase().as_str() {
            "NPR" => Some(Currency::NPR),
            "INR" => Some(Currency::INR),
            "USD" => Some(Currency::USD),
            _ => None,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A monetary value with currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    /// Amount in the smallest currency unit.
    pub amount: i64,
    /// The currency.
    pub currency: Currency,
}

impl Money {
    /// Create a new Money value.
    pub fn new(amount: i64, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Create a zero amount in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }

    /// Try to add another Money value.
    ///
    /// Returns `None` on currency mismatch or overflow.
    pub fn try_add(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        self.amount
            .checked_add(other.amount)
            .map(|amount| Money::new(amount, self.currency))
    }

    /// Try to multiply by a quantity, returning `None` on overflow.
    pub fn try_multiply(&self, factor: i64) -> Option<Money> {
        self.amount
            .checked_mul(factor)
            .map(|amount| Money::new(amount, self.currency))
    }

    /// Sum an iterator of Money values, returning `None` on mismatch or overflow.
    pub fn try_sum<'a>(mut iter: impl Iterator<Item = &'a Money>, currency: Currency) -> Option<Money> {
        iter.try_fold(Money::zero(currency), |acc, m| acc.try_add(m))
    }

    /// Format as a display string (e.g., "NPR 1,250").
    pub fn display(&self) -> String {
        let places = self.currency.decimal_places();
        let sign = if self.amount < 0 { "-" } else { "" };
        let abs = self.amount.unsigned_abs();

        if places == 0 {
            return format!("{} {}{}", self.currency.code(), sign, group_thousands(abs));
        }

        let divisor = 10_u64.pow(places);
        format!(
            "{} {}{}.{:0width$}",
            self.currency.code(),
            sign,
            group_thousands(abs / divisor),
            abs % divisor,
            width = places as usize
        )
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_display() {
        assert_eq!(Money::new(250, Currency::NPR).display(), "NPR 250");
        assert_eq!(Money::new(1_234_567, Currency::NPR).display(), "NPR 1,234,567");
        assert_eq!(Money::new(4999, Currency::USD).display(), "USD 49.99");
        assert_eq!(Money::new(-1500, Currency::INR).display(), "INR -1,500");
    }

    #[test]
    fn test_try_add_rejects_mismatch() {
        let npr = Money::new(100, Currency::NPR);
        let usd = Money::new(100, Currency::USD);
        assert!(npr.try_add(&usd).is_none());
        assert_eq!(npr.try_add(&npr).unwrap().amount, 200);
    }

    #[test]
    fn test_try_multiply_overflow() {
        let m = Money::new(i64::MAX, Currency::NPR);
        assert!(m.try_multiply(2).is_none());
        assert_eq!(Money::new(50, Currency::NPR).try_multiply(3).unwrap().amount, 150);
    }

    #[test]
    fn test_try_sum() {
        let values = [Money::new(200, Currency::NPR), Money::new(50, Currency::NPR)];
        let total = Money::try_sum(values.iter(), Currency::NPR).unwrap();
        assert_eq!(total.amount, 250);

        let mixed = [Money::new(200, Currency::NPR), Money::new(50, Currency::USD)];
        assert_eq!(Money::try_sum(mixed.iter(), Currency::NPR), None);
        assert_eq!(
            Money::try_sum(std::iter::empty(), Currency::INR),
            Some(Money::zero(Currency::INR))
        );
    }

    #[test]
    fn test_currency_from_code() {
        assert_eq!(Currency::from_code("npr"), Some(Currency::NPR));
        assert_eq!(Currency::from_code(" USD "), Some(Currency::USD));
        assert_eq!(Currency::from_code("EUR"), None);
    }
}
