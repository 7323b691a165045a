//! Единый тип ошибок публичного API и причины отбраковки строк.

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrderDashError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("input has no header row")]
    EmptyInput,

    #[error("no customer could be built from the input")]
    NoCustomers,

    #[error("unknown customer: {0}")]
    UnknownCustomer(String),

    #[error("{0} date is unparseable")]
    Undated(&'static str),
}

pub type Result<T> = std::result::Result<T, OrderDashError>;

/// Почему строка (или только её товар) не попала в иерархию.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("malformed record: {0}")]
    Malformed(String),

    #[error("missing customer code")]
    MissingCustomerCode,

    #[error("missing order code")]
    MissingOrderCode,

    #[error("invalid quantity: {0:?}")]
    InvalidQuantity(Option<String>),

    #[error("invalid weight: {0:?}")]
    InvalidWeight(Option<String>),

    #[error("invalid final price: {0:?}")]
    InvalidFinalPrice(Option<String>),
}

/// Ключ группировки для отчёта (без полезной нагрузки).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipKind {
    Malformed,
    MissingCustomerCode,
    MissingOrderCode,
    InvalidQuantity,
    InvalidWeight,
    InvalidFinalPrice,
}

impl SkipReason {
    pub fn kind(&self) -> SkipKind {
        match self {
            SkipReason::Malformed(_) => SkipKind::Malformed,
            SkipReason::MissingCustomerCode => SkipKind::MissingCustomerCode,
            SkipReason::MissingOrderCode => SkipKind::MissingOrderCode,
            SkipReason::InvalidQuantity(_) => SkipKind::InvalidQuantity,
            SkipReason::InvalidWeight(_) => SkipKind::InvalidWeight,
            SkipReason::InvalidFinalPrice(_) => SkipKind::InvalidFinalPrice,
        }
    }

    /// Строка отброшена целиком (не создано ни клиента, ни заказа).
    pub fn drops_whole_row(&self) -> bool {
        matches!(
            self,
            SkipReason::Malformed(_) | SkipReason::MissingCustomerCode | SkipReason::MissingOrderCode
        )
    }
}

impl SkipKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SkipKind::Malformed => "malformed",
            SkipKind::MissingCustomerCode => "missing_customer_code",
            SkipKind::MissingOrderCode => "missing_order_code",
            SkipKind::InvalidQuantity => "invalid_quantity",
            SkipKind::InvalidWeight => "invalid_weight",
            SkipKind::InvalidFinalPrice => "invalid_final_price",
        }
    }
}
