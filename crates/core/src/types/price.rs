//! Type-safe price representation using decimal arithmetic.
//!
//! Catalog data carries prices as formatted strings (`"$49.99"`). They are
//! parsed once into a [`Price`] and all arithmetic happens on [`Decimal`], so
//! repeated subtotal computations never drift the way float math does.

use core::fmt;
use core::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::cart::Quantity;

/// Number of fractional digits kept for display and totals.
const MINOR_UNIT_DIGITS: u32 = 2;

/// Errors that can occur when parsing or combining a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input string is empty.
    #[error("price cannot be empty")]
    Empty,
    /// The amount is not a decimal number.
    #[error("invalid price amount: {0}")]
    InvalidAmount(String),
    /// The amount is below zero.
    #[error("price cannot be negative")]
    Negative,
    /// The result does not fit in a [`Decimal`].
    #[error("price arithmetic overflowed")]
    Overflow,
    /// Two prices in different currencies were combined.
    #[error("currency mismatch: expected {expected}, found {found}")]
    CurrencyMismatch {
        /// Currency of the left-hand operand.
        expected: CurrencyCode,
        /// Currency of the right-hand operand.
        found: CurrencyCode,
    },
}

/// A price with currency information.
///
/// ## Examples
///
/// ```
/// use cart_core::{CurrencyCode, Price};
///
/// let price = Price::parse("$49.99").unwrap();
/// assert_eq!(price.currency_code, CurrencyCode::USD);
/// assert_eq!(price.to_string(), "$49.99");
///
/// assert!(Price::parse("$-1.00").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
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

    /// Create a price from an amount in minor units (e.g., cents).
    #[must_use]
    pub fn from_cents(cents: i64, currency_code: CurrencyCode) -> Self {
        Self::new(Decimal::new(cents, MINOR_UNIT_DIGITS), currency_code)
    }

    /// A zero amount in the given currency.
    #[must_use]
    pub const fn zero(currency_code: CurrencyCode) -> Self {
        Self::new(Decimal::ZERO, currency_code)
    }

    /// Parse a formatted price such as `"$49.99"`, `"€1,299.00"` or `"12.5"`.
    ///
    /// A missing currency symbol means [`CurrencyCode::default`].
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, the amount is not a decimal
    /// number (including misplaced thousands separators), or the amount is
    /// negative.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(PriceError::Empty);
        }

        let (currency_code, rest) = CurrencyCode::strip_symbol(trimmed);
        let rest = rest.trim();
        if rest.is_empty() {
            return Err(PriceError::Empty);
        }
        let digits = strip_grouping(rest)
            .ok_or_else(|| PriceError::InvalidAmount(trimmed.to_owned()))?;

        let amount = Decimal::from_str(&digits)
            .map_err(|_| PriceError::InvalidAmount(trimmed.to_owned()))?;
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }

        Ok(Self::new(amount.normalize(), currency_code))
    }

    /// Unit price multiplied by a line quantity.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Overflow`] if the product does not fit in a
    /// [`Decimal`].
    pub fn times(&self, quantity: Quantity) -> Result<Self, PriceError> {
        self.amount
            .checked_mul(Decimal::from(quantity.get()))
            .map(|amount| Self::new(amount, self.currency_code))
            .ok_or(PriceError::Overflow)
    }

    /// Add two prices of the same currency.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::CurrencyMismatch`] if the currencies differ and
    /// [`PriceError::Overflow`] if the sum does not fit in a [`Decimal`].
    pub fn checked_add(&self, other: &Self) -> Result<Self, PriceError> {
        if self.currency_code != other.currency_code {
            return Err(PriceError::CurrencyMismatch {
                expected: self.currency_code,
                found: other.currency_code,
            });
        }
        self.amount
            .checked_add(other.amount)
            .map(|amount| Self::new(amount, self.currency_code))
            .ok_or(PriceError::Overflow)
    }

    /// Round to two fractional digits, midpoints away from zero.
    #[must_use]
    pub fn rounded(&self) -> Self {
        Self::new(
            self.amount
                .round_dp_with_strategy(MINOR_UNIT_DIGITS, RoundingStrategy::MidpointAwayFromZero),
            self.currency_code,
        )
    }

    /// Whether the amount is exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut amount = self.rounded().amount;
        amount.rescale(MINOR_UNIT_DIGITS);
        write!(f, "{}{amount}", self.currency_code.symbol())
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Price {
    type Error = PriceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Price> for String {
    fn from(price: Price) -> Self {
        price.to_string()
    }
}

/// Remove thousands separators from a plain amount.
///
/// Commas are only allowed between groups of exactly three integer digits,
/// so `1,299.00` is accepted and `1,,2` or `,5` are not.
fn strip_grouping(amount: &str) -> Option<String> {
    let (integer, fraction) = match amount.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (amount, None),
    };
    if fraction.is_some_and(|f| f.contains(',')) {
        return None;
    }

    let mut digits = String::with_capacity(amount.len());
    if integer.contains(',') {
        let unsigned = integer.strip_prefix('-').unwrap_or(integer);
        let mut groups = unsigned.split(',');
        let lead = groups.next().unwrap_or_default();
        if lead.is_empty() || lead.len() > 3 {
            return None;
        }
        if groups.any(|group| group.len() != 3) {
            return None;
        }
        digits.extend(integer.chars().filter(|c| *c != ','));
    } else {
        digits.push_str(integer);
    }

    if let Some(fraction) = fraction {
        digits.push('.');
        digits.push_str(fraction);
    }
    Some(digits)
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

impl CurrencyCode {
    /// Display symbol used when formatting prices.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::USD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
            Self::CAD => "CA$",
            Self::AUD => "A$",
        }
    }

    /// ISO 4217 code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::CAD => "CAD",
            Self::AUD => "AUD",
        }
    }

    /// Split a leading currency symbol off `s`.
    ///
    /// Longer symbols are tried first so `CA$` is not read as `$`.
    fn strip_symbol(s: &str) -> (Self, &str) {
        const BY_SYMBOL: [CurrencyCode; 5] = [
            CurrencyCode::CAD,
            CurrencyCode::AUD,
            CurrencyCode::USD,
            CurrencyCode::EUR,
            CurrencyCode::GBP,
        ];

        BY_SYMBOL
            .iter()
            .find_map(|code| s.strip_prefix(code.symbol()).map(|rest| (*code, rest)))
            .unwrap_or((Self::default(), s))
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_formatted_prices() {
        let price = Price::parse("$49.99").unwrap();
        assert_eq!(price.amount, dec("49.99"));
        assert_eq!(price.currency_code, CurrencyCode::USD);

        let price = Price::parse("€1,299.00").unwrap();
        assert_eq!(price.amount, dec("1299"));
        assert_eq!(price.currency_code, CurrencyCode::EUR);

        let price = Price::parse("CA$5").unwrap();
        assert_eq!(price.currency_code, CurrencyCode::CAD);

        let price = Price::parse(" 12.5 ").unwrap();
        assert_eq!(price.amount, dec("12.5"));
        assert_eq!(price.currency_code, CurrencyCode::USD);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert_eq!(Price::parse(""), Err(PriceError::Empty));
        assert_eq!(Price::parse("$"), Err(PriceError::Empty));
        assert_eq!(Price::parse("$-3.00"), Err(PriceError::Negative));
        assert!(matches!(
            Price::parse("$ten"),
            Err(PriceError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_parse_thousands_separators() {
        assert_eq!(Price::parse("$1,049.00").unwrap().amount, dec("1049"));
        assert_eq!(Price::parse("$12,345,678").unwrap().amount, dec("12345678"));

        for bad in ["$1,,2", "$,5", "$1,2", "$1234,567", "$1,234.5,6", "$12,"] {
            assert!(
                matches!(Price::parse(bad), Err(PriceError::InvalidAmount(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_display_pads_two_digits() {
        assert_eq!(Price::parse("$10").unwrap().to_string(), "$10.00");
        assert_eq!(Price::parse("£0.5").unwrap().to_string(), "£0.50");
        assert_eq!(
            Price::new(dec("2.005"), CurrencyCode::USD).to_string(),
            "$2.01"
        );
    }

    #[test]
    fn test_times_and_add() {
        let unit = Price::parse("$5.50").unwrap();
        let line = unit.times(Quantity::try_from(3_u32).unwrap()).unwrap();
        assert_eq!(line.amount, dec("16.5"));

        let total = line.checked_add(&Price::parse("$10.00").unwrap()).unwrap();
        assert_eq!(total.to_string(), "$26.50");
    }

    #[test]
    fn test_add_currency_mismatch() {
        let usd = Price::parse("$1").unwrap();
        let eur = Price::parse("€1").unwrap();
        assert_eq!(
            usd.checked_add(&eur),
            Err(PriceError::CurrencyMismatch {
                expected: CurrencyCode::USD,
                found: CurrencyCode::EUR,
            })
        );
    }

    #[test]
    fn test_arithmetic_overflow_is_an_error() {
        let max = Price::new(Decimal::MAX, CurrencyCode::USD);
        assert_eq!(
            max.times(Quantity::try_from(2_u32).unwrap()),
            Err(PriceError::Overflow)
        );
        assert_eq!(max.times(Quantity::ONE), Ok(max));
        assert_eq!(
            max.checked_add(&Price::parse("$1").unwrap()),
            Err(PriceError::Overflow)
        );
    }

    #[test]
    fn test_repeated_addition_does_not_drift() {
        let cent = Price::parse("$0.10").unwrap();
        let mut total = Price::zero(CurrencyCode::USD);
        for _ in 0..1000 {
            total = total.checked_add(&cent).unwrap();
        }
        assert_eq!(total.amount, dec("100"));
    }

    #[test]
    fn test_serde_as_formatted_string() {
        let price = Price::from_cents(4999, CurrencyCode::USD);
        let json = serde_json::to_string(&price).unwrap();
        assert_eq!(json, "\"$49.99\"");

        let parsed: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.amount, price.amount);
        assert!(serde_json::from_str::<Price>("\"free\"").is_err());
    }
}
