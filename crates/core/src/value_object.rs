//! Value objects: equality by value, not identity.
//!
//! Prices are the only value objects the catalog needs. A `Price` is an exact
//! decimal amount together with the locale information required to render it
//! (`$39.99`). Amounts are never floating point.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attribute values. Two
/// prices of `4.99 USD` are the same price regardless of which product they
/// came from.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}

/// Currency information attached to a price (the store's price locale).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "PriceLocaleRecord")]
pub struct PriceLocale {
    currency_code: String,
    currency_symbol: Option<String>,
}

#[derive(Deserialize)]
struct PriceLocaleRecord {
    currency_code: String,
    #[serde(default)]
    currency_symbol: Option<String>,
}

impl TryFrom<PriceLocaleRecord> for PriceLocale {
    type Error = DomainError;

    fn try_from(value: PriceLocaleRecord) -> Result<Self, Self::Error> {
        Self::new(value.currency_code, value.currency_symbol)
    }
}

impl PriceLocale {
    /// `currency_code` must be a three-letter ISO 4217 code (e.g. `"USD"`).
    pub fn new(
        currency_code: impl Into<String>,
        currency_symbol: Option<String>,
    ) -> DomainResult<Self> {
        let currency_code = currency_code.into();
        if currency_code.len() != 3 || !currency_code.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(DomainError::validation(format!(
                "currency code must be three uppercase letters (got {currency_code:?})"
            )));
        }
        Ok(Self {
            currency_code,
            currency_symbol: currency_symbol.filter(|s| !s.is_empty()),
        })
    }

    pub fn currency_code(&self) -> &str {
        &self.currency_code
    }

    pub fn currency_symbol(&self) -> Option<&str> {
        self.currency_symbol.as_deref()
    }
}

impl ValueObject for PriceLocale {}

/// A non-negative decimal price in a given locale.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "PriceRecord")]
pub struct Price {
    amount: Decimal,
    locale: PriceLocale,
}

#[derive(Deserialize)]
struct PriceRecord {
    amount: Decimal,
    locale: PriceLocale,
}

impl TryFrom<PriceRecord> for Price {
    type Error = DomainError;

    fn try_from(value: PriceRecord) -> Result<Self, Self::Error> {
        Self::new(value.amount, value.locale)
    }
}

impl Price {
    pub fn new(amount: Decimal, locale: PriceLocale) -> DomainResult<Self> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(DomainError::validation(format!(
                "price must not be negative (got {amount})"
            )));
        }
        Ok(Self { amount, locale })
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn locale(&self) -> &PriceLocale {
        &self.locale
    }

    /// Render as `<currency-symbol><amount>`.
    ///
    /// A locale without a symbol renders the bare amount.
    pub fn label(&self) -> String {
        format!(
            "{}{}",
            self.locale.currency_symbol().unwrap_or_default(),
            self.amount
        )
    }
}

impl core::fmt::Display for Price {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.label())
    }
}

impl ValueObject for Price {}
