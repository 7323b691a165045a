//! Доменные модели: типизированная иерархия клиент → заказ → товар.

use crate::error::{OrderDashError, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Каноничный формат дат внутри модели.
pub const CANONICAL_DATE_FORMAT: &str = "%Y-%m-%d";

/// Значение, которым заменяется нераспознанная дата.
pub const UNPARSEABLE_DATE: &str = "0000-00-00";

/// Дата заказа: распознанная либо сентинел `0000-00-00`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderDate {
    Known(NaiveDate),
    Unparseable,
}

impl OrderDate {
    pub fn known(&self) -> Option<NaiveDate> {
        match self {
            OrderDate::Known(d) => Some(*d),
            OrderDate::Unparseable => None,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, OrderDate::Known(_))
    }
}

impl fmt::Display for OrderDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderDate::Known(d) => write!(f, "{}", d.format(CANONICAL_DATE_FORMAT)),
            OrderDate::Unparseable => f.write_str(UNPARSEABLE_DATE),
        }
    }
}

/// Разбор каноничной записи `YYYY-MM-DD` (сентинел тоже принимается).
impl FromStr for OrderDate {
    type Err = OrderDashError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s == UNPARSEABLE_DATE {
            return Ok(OrderDate::Unparseable);
        }
        NaiveDate::parse_from_str(s, CANONICAL_DATE_FORMAT)
            .map(OrderDate::Known)
            .map_err(|e| OrderDashError::Parse(format!("date {s:?}: {e}")))
    }
}

impl Serialize for OrderDate {
    fn serialize<S: Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        s.collect_str(self)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProductLine {
    pub name: Option<String>,
    pub category: Option<String>,
    pub quantity: i64,
    /// Цена коробки из колонки `PREÇO`.
    pub box_price: Decimal,
    /// Цена за единицу, выведенная из цены коробки.
    pub unit_price: Decimal,
    pub weight: Decimal,
    pub final_price: Decimal,
    pub product_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Order {
    pub code: String,
    pub issue_date: OrderDate,
    pub delivery_date: OrderDate,
    pub stage: Option<String>,
    pub products: Vec<ProductLine>,
}

impl Order {
    pub fn total_amount(&self) -> Decimal {
        self.products.iter().map(|p| p.final_price).sum()
    }

    pub fn total_weight(&self) -> Decimal {
        self.products.iter().map(|p| p.weight).sum()
    }

    pub fn total_quantity(&self) -> i64 {
        self.products.iter().map(|p| p.quantity).sum()
    }

    pub fn delivery_days(&self) -> Result<i64> {
        crate::metrics::delivery_days(&self.issue_date, &self.delivery_date)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Customer {
    pub code: String,
    pub name: Option<String>,
    pub city: Option<String>,
    pub orders: BTreeMap<String, Order>,
}

impl Customer {
    /// Подпись для списка выбора: `Имя (код)`.
    pub fn label(&self) -> String {
        format!("{} ({})", self.name.as_deref().unwrap_or("Sem Nome"), self.code)
    }

    pub fn order_list(&self) -> Vec<&Order> {
        self.orders.values().collect()
    }
}

/// Результат одной загрузки файла.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct Dataset {
    pub customers: BTreeMap<String, Customer>,
}

impl Dataset {
    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }

    pub fn customer(&self, code: &str) -> Result<&Customer> {
        self.customers
            .get(code)
            .ok_or_else(|| OrderDashError::UnknownCustomer(code.to_string()))
    }

    pub fn orders(&self) -> impl Iterator<Item = (&Customer, &Order)> {
        self.customers
            .values()
            .flat_map(|c| c.orders.values().map(move |o| (c, o)))
    }

    pub fn product_lines(&self) -> impl Iterator<Item = (&Customer, &Order, &ProductLine)> {
        self.orders()
            .flat_map(|(c, o)| o.products.iter().map(move |p| (c, o, p)))
    }

    pub fn order_count(&self) -> usize {
        self.customers.values().map(|c| c.orders.len()).sum()
    }
}
