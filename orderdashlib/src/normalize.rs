//! Нормализация одной строки выгрузки в типизированные поля.
//!
//! Мягкие поля (даты, цена коробки) получают значение по умолчанию,
//! жёсткие (количество, вес, сумма строки) отбраковывают товар строки.

use crate::{
    config::IngestConfig,
    error::SkipReason,
    model::{OrderDate, ProductLine},
};
use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;

/// Формат дат во входном файле.
pub const SOURCE_DATE_FORMAT: &str = "%m/%d/%Y";

/// Разделитель множителя в названии товара: `12 X 500G`.
pub const MULTIPLIER_SEPARATOR: char = 'X';

/// Потолок по модулю для веса и суммы строки (10^12): суммы по файлу
/// остаются далеко от переполнения `Decimal`.
pub const MAX_LINE_VALUE: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

/// Потолок по модулю для количества в строке.
pub const MAX_QUANTITY: i64 = 1_000_000_000;

/// Сырая строка выгрузки. Отсутствующая колонка и пустая ячейка дают `None`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct SourceRow {
    #[serde(rename = "Terceiro Centralizador")]
    pub customer_code: Option<String>,
    #[serde(rename = "Nome do Terceiro Centralizador")]
    pub customer_name: Option<String>,
    #[serde(rename = "Cidade")]
    pub city: Option<String>,
    #[serde(rename = "Pedido")]
    pub order_code: Option<String>,
    #[serde(rename = "Data Emissão Pedido")]
    pub issue_date: Option<String>,
    #[serde(rename = "Data de Entrega")]
    pub delivery_date: Option<String>,
    #[serde(rename = "Situação do Pedido")]
    pub order_stage: Option<String>,
    #[serde(rename = "Nome Produto")]
    pub product_name: Option<String>,
    #[serde(rename = "FAMILIA")]
    pub product_family: Option<String>,
    #[serde(rename = "Qtde")]
    pub quantity: Option<String>,
    #[serde(rename = "PREÇO")]
    pub price: Option<String>,
    #[serde(rename = "Peso Líquido Estimado")]
    pub net_weight: Option<String>,
    #[serde(rename = "Total")]
    pub total: Option<String>,
    #[serde(rename = "Produto")]
    pub product_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRow {
    pub customer_code: String,
    pub customer_name: Option<String>,
    pub city: Option<String>,
    pub order_code: String,
    pub issue_date: OrderDate,
    pub delivery_date: OrderDate,
    pub order_stage: Option<String>,
    /// Ошибка здесь не мешает создать клиента и заказ.
    pub product: Result<ProductLine, SkipReason>,
}

pub fn normalize(mut row: SourceRow, cfg: &IngestConfig) -> Result<NormalizedRow, SkipReason> {
    let customer_code = non_blank(row.customer_code.take()).ok_or(SkipReason::MissingCustomerCode)?;
    let order_code = non_blank(row.order_code.take()).ok_or(SkipReason::MissingOrderCode)?;

    let product = normalize_product(&row, cfg);

    Ok(NormalizedRow {
        customer_code,
        customer_name: non_blank(row.customer_name),
        city: non_blank(row.city),
        order_code,
        issue_date: parse_source_date(row.issue_date.as_deref()),
        delivery_date: parse_source_date(row.delivery_date.as_deref()),
        order_stage: non_blank(row.order_stage),
        product,
    })
}

fn normalize_product(row: &SourceRow, cfg: &IngestConfig) -> Result<ProductLine, SkipReason> {
    let name = non_blank(row.product_name.clone());
    let box_price = parse_price(row.price.as_deref(), &cfg.currency_prefix);
    let unit_price = infer_unit_price(box_price, name.as_deref(), cfg.fallback_unit_price);

    let quantity = parse_quantity(row.quantity.as_deref())
        .filter(|q| q.unsigned_abs() <= MAX_QUANTITY as u64)
        .ok_or_else(|| SkipReason::InvalidQuantity(row.quantity.clone()))?;
    let weight = parse_decimal(row.net_weight.as_deref())
        .filter(within_line_limit)
        .ok_or_else(|| SkipReason::InvalidWeight(row.net_weight.clone()))?;
    let final_price = parse_decimal(row.total.as_deref())
        .filter(within_line_limit)
        .ok_or_else(|| SkipReason::InvalidFinalPrice(row.total.clone()))?;

    Ok(ProductLine {
        name,
        category: non_blank(row.product_family.clone()),
        quantity,
        box_price,
        unit_price,
        weight,
        final_price,
        product_id: non_blank(row.product_id.clone()),
    })
}

/// `MM/DD/YYYY` → дата, иначе сентинел.
pub fn parse_source_date(raw: Option<&str>) -> OrderDate {
    raw.and_then(|s| NaiveDate::parse_from_str(s.trim(), SOURCE_DATE_FORMAT).ok())
        .map_or(OrderDate::Unparseable, OrderDate::Known)
}

/// `"R$ 24.90"` → 24.90; при ошибке 0.
pub fn parse_price(raw: Option<&str>, currency_prefix: &str) -> Decimal {
    let Some(raw) = raw else {
        return Decimal::ZERO;
    };
    let stripped = if currency_prefix.is_empty() {
        raw.to_string()
    } else {
        raw.replace(currency_prefix, "")
    };
    Decimal::from_str(stripped.trim()).unwrap_or(Decimal::ZERO)
}

/// Цена за единицу по названию товара.
///
/// Грамматика: `[... <count>] X ...`. Берётся текст до первого `X`, из него
/// последний токен через пробел и есть `count`. Если `X` нет, токен не число
/// или `count <= 0`, возвращается `fallback`. Иначе `box_price / count`,
/// округлённое до 3 знаков.
pub fn infer_unit_price(box_price: Decimal, description: Option<&str>, fallback: Decimal) -> Decimal {
    let Some(count) = description.and_then(multiplier_count) else {
        return fallback;
    };
    box_price
        .checked_div(count)
        .map(|p| p.round_dp(3))
        .unwrap_or(fallback)
}

fn multiplier_count(description: &str) -> Option<Decimal> {
    let (head, _) = description.split_once(MULTIPLIER_SEPARATOR)?;
    let token = head.split_whitespace().next_back()?;
    Decimal::from_str(token).ok().filter(|c| c.is_sign_positive() && !c.is_zero())
}

/// Целое; дробная запись усекается к нулю (`"76.0"` → 76).
fn parse_quantity(raw: Option<&str>) -> Option<i64> {
    let s = raw?.trim();
    s.parse::<i64>()
        .ok()
        .or_else(|| Decimal::from_str(s).ok()?.trunc().to_i64())
}

fn parse_decimal(raw: Option<&str>) -> Option<Decimal> {
    Decimal::from_str(raw?.trim()).ok()
}

fn within_line_limit(v: &Decimal) -> bool {
    v.abs() <= MAX_LINE_VALUE
}

fn non_blank(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn multiplier_with_spaces() {
        assert_eq!(infer_unit_price(d("24"), Some("12 X CAIXA"), d("12")), d("2"));
    }

    #[test]
    fn multiplier_glued_to_separator() {
        assert_eq!(
            infer_unit_price(d("100"), Some("FIAMBRE KITUT 3X320G"), d("12")),
            d("33.333")
        );
    }

    #[test]
    fn no_separator_uses_fallback() {
        assert_eq!(infer_unit_price(d("999"), Some("SALSICHA BORDON"), d("12")), d("12"));
        assert_eq!(infer_unit_price(d("999"), None, d("12")), d("12"));
    }

    #[test]
    fn non_numeric_or_zero_count_uses_fallback() {
        assert_eq!(infer_unit_price(d("24"), Some("CAIXA X 12"), d("12")), d("12"));
        assert_eq!(infer_unit_price(d("24"), Some("X CAIXA"), d("12")), d("12"));
        assert_eq!(infer_unit_price(d("24"), Some("0 X CAIXA"), d("12")), d("12"));
    }

    #[test]
    fn lowercase_x_is_not_a_separator() {
        assert_eq!(infer_unit_price(d("24"), Some("12 x caixa"), d("7")), d("7"));
    }

    #[test]
    fn quantity_truncates_fractional_text() {
        assert_eq!(parse_quantity(Some(" 76 ")), Some(76));
        assert_eq!(parse_quantity(Some("76.0")), Some(76));
        assert_eq!(parse_quantity(Some("abc")), None);
        assert_eq!(parse_quantity(None), None);
    }

    #[test]
    fn line_limit_is_ten_to_the_twelfth() {
        assert_eq!(MAX_LINE_VALUE, d("1000000000000"));
        assert!(within_line_limit(&d("-1000000000000")));
        assert!(!within_line_limit(&d("1000000000000.01")));
    }

    #[test]
    fn oversized_numbers_drop_the_product() {
        let row = |qty: &str, weight: &str, total: &str| SourceRow {
            customer_code: Some("1".into()),
            order_code: Some("10".into()),
            quantity: Some(qty.into()),
            net_weight: Some(weight.into()),
            total: Some(total.into()),
            ..SourceRow::default()
        };
        let cfg = IngestConfig::default();
        let product = |r| normalize(r, &cfg).unwrap().product;

        assert!(product(row("1", "1.0", "10")).is_ok());
        assert!(matches!(
            product(row(&i64::MAX.to_string(), "1.0", "10")),
            Err(SkipReason::InvalidQuantity(_))
        ));
        assert!(matches!(
            product(row("1", "79228162514264337593543950335", "10")),
            Err(SkipReason::InvalidWeight(_))
        ));
        assert!(matches!(
            product(row("1", "1.0", "79228162514264337593543950335")),
            Err(SkipReason::InvalidFinalPrice(_))
        ));
    }
}
