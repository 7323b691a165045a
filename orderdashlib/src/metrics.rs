//! Агрегаты поверх уже собранных заказов. Все функции чистые.

use crate::{
    error::{OrderDashError, Result},
    model::{Order, OrderDate, ProductLine},
};
use chrono::{Datelike, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

/// Подстановка для пустого диапазона дат и заказов без даты.
pub const NOT_AVAILABLE: &str = "n/a";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductMetric {
    pub id: Option<String>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub count: usize,
    pub sum_quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderMetrics {
    pub order_count: usize,
    pub first: String,
    pub last: String,
    pub issue_dates: Vec<NaiveDate>,
    pub avg_amount: Decimal,
    pub avg_weight: Decimal,
    pub avg_amount_str: String,
    pub avg_weight_str: String,
    pub product_metrics: Vec<ProductMetric>,
}

pub fn order_metrics(orders: &[&Order]) -> OrderMetrics {
    let issue_dates: Vec<NaiveDate> = orders.iter().filter_map(|o| o.issue_date.known()).collect();
    let (first, last) = match (issue_dates.iter().min(), issue_dates.iter().max()) {
        (Some(min), Some(max)) => (pretty_date(*min), pretty_date(*max)),
        _ => (NOT_AVAILABLE.to_string(), NOT_AVAILABLE.to_string()),
    };

    let mut total_amount = Decimal::ZERO;
    let mut total_weight = Decimal::ZERO;
    let mut product_metrics: Vec<ProductMetric> = Vec::new();

    for product in orders.iter().flat_map(|o| o.products.iter()) {
        total_amount += product.final_price;
        total_weight += product.weight;
        accumulate(&mut product_metrics, product);
    }

    // делим на число заказов, а не товаров
    let (avg_amount, avg_weight) = if orders.is_empty() {
        (Decimal::ZERO, Decimal::ZERO)
    } else {
        let n = Decimal::from(orders.len());
        (total_amount / n, total_weight / n)
    };

    OrderMetrics {
        order_count: orders.len(),
        first,
        last,
        issue_dates,
        avg_amount,
        avg_weight,
        avg_amount_str: format_currency(avg_amount),
        avg_weight_str: format_weight(avg_weight),
        product_metrics,
    }
}

/// Линейный поиск по id; имя и категория берутся у первого вхождения.
fn accumulate(metrics: &mut Vec<ProductMetric>, product: &ProductLine) {
    match metrics.iter_mut().find(|m| m.id == product.product_id) {
        Some(m) => {
            m.count += 1;
            m.sum_quantity += product.quantity;
        }
        None => metrics.push(ProductMetric {
            id: product.product_id.clone(),
            name: product.name.clone(),
            category: product.category.clone(),
            count: 1,
            sum_quantity: product.quantity,
        }),
    }
}

/// Срок доставки в днях (`delivery - issue`).
pub fn delivery_days(issue: &OrderDate, delivery: &OrderDate) -> Result<i64> {
    let issue = issue.known().ok_or(OrderDashError::Undated("issue"))?;
    let delivery = delivery.known().ok_or(OrderDashError::Undated("delivery"))?;
    Ok((delivery - issue).num_days())
}

/// Новые заказы первыми; заказ без даты считается самым ранним.
pub fn sort_by_issue_date_desc(orders: &mut [&Order]) {
    orders.sort_by_key(|o| std::cmp::Reverse(o.issue_date.known().unwrap_or(NaiveDate::MIN)));
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthBucket<'a> {
    pub month: String,
    pub orders: Vec<&'a Order>,
}

/// Группировка по названию месяца даты выписки.
///
/// Год не учитывается: январь 2023 и январь 2024 попадают в одну корзину.
/// Порядок корзин соответствует первому появлению месяца.
pub fn group_by_month<'a>(orders: &[&'a Order]) -> Vec<MonthBucket<'a>> {
    let mut buckets: Vec<MonthBucket<'a>> = Vec::new();
    for &order in orders {
        let month = month_name(&order.issue_date);
        match buckets.iter_mut().find(|b| b.month == month) {
            Some(b) => b.orders.push(order),
            None => buckets.push(MonthBucket { month, orders: vec![order] }),
        }
    }
    buckets
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlySummary {
    pub month: String,
    pub total_orders: usize,
    pub total_products_quantity: i64,
}

/// Таблица помесячных итогов, индексируемая названием месяца.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MonthlyTable(pub Vec<MonthlySummary>);

impl MonthlyTable {
    pub fn get(&self, month: &str) -> Option<&MonthlySummary> {
        self.0.iter().find(|s| s.month == month)
    }

    pub fn rows(&self) -> &[MonthlySummary] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

pub fn summarize_monthly(buckets: &[MonthBucket<'_>]) -> MonthlyTable {
    MonthlyTable(
        buckets
            .iter()
            .map(|b| MonthlySummary {
                month: b.month.clone(),
                total_orders: b.orders.len(),
                total_products_quantity: b.orders.iter().map(|o| o.total_quantity()).sum(),
            })
            .collect(),
    )
}

fn month_name(date: &OrderDate) -> String {
    match date {
        OrderDate::Known(d) => d.format("%B").to_string(),
        OrderDate::Unparseable => NOT_AVAILABLE.to_string(),
    }
}

/// `5, january, 2024`
pub fn pretty_date(date: NaiveDate) -> String {
    format!(
        "{}, {}, {}",
        date.day(),
        date.format("%B").to_string().to_lowercase(),
        date.year()
    )
}

/// `R$ 1,234.50`
pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
    let text = format!("{rounded:.2}");
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, "00"));
    format!("R$ {sign}{}.{frac_part}", group_thousands(int_part))
}

/// `12.5 kg`
pub fn format_weight(weight: Decimal) -> String {
    let rounded = weight.round_dp_with_strategy(1, RoundingStrategy::MidpointNearestEven);
    format!("{rounded:.1} kg")
}

fn group_thousands(int_part: &str) -> String {
    let len = int_part.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
