//! Настройки загрузки, общие для всей сессии.

use crate::error::{OrderDashError, Result};
use rust_decimal::Decimal;

pub const DEFAULT_CURRENCY_PREFIX: &str = "R$";

/// Цена за единицу, когда множитель в названии товара не найден.
pub const DEFAULT_FALLBACK_UNIT_PRICE: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

#[derive(Debug, Clone, PartialEq)]
pub struct IngestConfig {
    pub delimiter: u8,
    pub currency_prefix: String,
    pub fallback_unit_price: Decimal,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            currency_prefix: DEFAULT_CURRENCY_PREFIX.to_string(),
            fallback_unit_price: DEFAULT_FALLBACK_UNIT_PRICE,
        }
    }
}

impl IngestConfig {
    /// Разделитель задаётся одним ASCII-символом (`,`, `;`, `\t`...).
    pub fn with_delimiter(mut self, delimiter: &str) -> Result<Self> {
        let d = match delimiter {
            "\\t" | "tab" => b'\t',
            s if s.len() == 1 && s.is_ascii() => s.as_bytes()[0],
            other => {
                return Err(OrderDashError::Config(format!(
                    "delimiter must be a single ASCII character, got {other:?}"
                )))
            }
        };
        self.delimiter = d;
        Ok(self)
    }

    pub fn with_currency_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.currency_prefix = prefix.into();
        self
    }

    pub fn with_fallback_unit_price(mut self, price: Decimal) -> Result<Self> {
        if price.is_sign_negative() {
            return Err(OrderDashError::Config(format!(
                "fallback unit price must not be negative, got {price}"
            )));
        }
        self.fallback_unit_price = price;
        Ok(self)
    }
}
