//! Текстовые и JSON-представления поверх библиотеки (вместо виджетов дашборда).

use crate::Output;
use orderdashlib::{
    builder::ProcessingReport,
    error::Result,
    metrics::{self, MonthlyTable, OrderMetrics, NOT_AVAILABLE},
    model::{Customer, Dataset, Order, ProductLine},
};
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct CustomerRow<'a> {
    code: &'a str,
    label: String,
    city: Option<&'a str>,
    orders: usize,
}

#[derive(Serialize)]
struct SummaryView<'a> {
    report: &'a ProcessingReport,
    customers: Vec<CustomerRow<'a>>,
}

#[derive(Serialize)]
struct OrderView<'a> {
    #[serde(flatten)]
    order: &'a Order,
    total_amount: Decimal,
    total_weight: Decimal,
    delivery_days: Option<i64>,
}

#[derive(Serialize)]
struct CustomerView<'a> {
    code: &'a str,
    name: Option<&'a str>,
    city: Option<&'a str>,
    metrics: OrderMetrics,
    orders: Vec<OrderView<'a>>,
}

#[derive(Serialize)]
struct MonthlyView<'a> {
    code: &'a str,
    label: String,
    city: Option<&'a str>,
    months: MonthlyTable,
}

pub fn summary<W: Write>(w: &mut W, fmt: Output, report: &ProcessingReport, ds: &Dataset) -> Result<()> {
    let customers: Vec<CustomerRow<'_>> = ds
        .customers
        .values()
        .map(|c| CustomerRow {
            code: &c.code,
            label: c.label(),
            city: c.city.as_deref(),
            orders: c.orders.len(),
        })
        .collect();

    if fmt == Output::Json {
        return json(w, &SummaryView { report, customers });
    }

    writeln!(
        w,
        "Linhas: {} | Produtos: {} | Clientes: {} | Pedidos: {} | Descartadas: {}",
        report.rows_read,
        report.products_kept,
        report.customers_created,
        report.orders_created,
        report.dropped_total()
    )?;
    for (kind, n) in &report.dropped {
        writeln!(w, "  {:<24} {n}", kind.as_str())?;
    }
    writeln!(w)?;
    for c in &customers {
        writeln!(w, "{:<48} {:<24} {:>5}", c.label, c.city.unwrap_or("-"), c.orders)?;
    }
    Ok(())
}

pub fn customer<W: Write>(w: &mut W, fmt: Output, c: &Customer) -> Result<()> {
    let order_list = c.order_list();
    let m = metrics::order_metrics(&order_list);

    let mut sorted = order_list;
    metrics::sort_by_issue_date_desc(&mut sorted);

    if fmt == Output::Json {
        let orders = sorted
            .iter()
            .map(|&o| OrderView {
                order: o,
                total_amount: o.total_amount(),
                total_weight: o.total_weight(),
                delivery_days: o.delivery_days().ok(),
            })
            .collect();
        let view = CustomerView {
            code: &c.code,
            name: c.name.as_deref(),
            city: c.city.as_deref(),
            metrics: m,
            orders,
        };
        return json(w, &view);
    }

    writeln!(w, "{} - {}", c.name.as_deref().unwrap_or("N/A"), c.city.as_deref().unwrap_or("-"))?;
    writeln!(w, "{}", c.code)?;
    writeln!(w)?;
    writeln!(w, "Quantidade de Pedidos   {}", m.order_count)?;
    writeln!(w, "Valor de Pedido Medio   {}", m.avg_amount_str)?;
    writeln!(w, "Peso Medio              {}", m.avg_weight_str)?;
    writeln!(w, "Primeiro Pedido         {}", m.first)?;
    writeln!(w, "Ultimo Pedido           {}", m.last)?;
    writeln!(w)?;

    writeln!(w, "{:<12} {:<40} {:<16} {:>6} {:>8}", "id", "produto", "categoria", "count", "qtde")?;
    for p in &m.product_metrics {
        writeln!(
            w,
            "{:<12} {:<40} {:<16} {:>6} {:>8}",
            p.id.as_deref().unwrap_or("-"),
            p.name.as_deref().unwrap_or("-"),
            p.category.as_deref().unwrap_or("-"),
            p.count,
            p.sum_quantity
        )?;
    }

    for o in sorted {
        writeln!(w)?;
        order(w, o)?;
    }
    Ok(())
}

fn order<W: Write>(w: &mut W, o: &Order) -> Result<()> {
    let pretty = o
        .issue_date
        .known()
        .map_or_else(|| NOT_AVAILABLE.to_string(), metrics::pretty_date);
    writeln!(
        w,
        "Pedido #{} ( {}) Total: R$: {} | Peso: {} Kg",
        o.code,
        pretty,
        o.total_amount().round_dp(2),
        o.total_weight().round_dp(2)
    )?;
    let lead = o
        .delivery_days()
        .map_or_else(|_| "---".to_string(), |d| format!("{d} dias"));
    writeln!(
        w,
        "  Data do Pedido: {} | Data de Entrega: {} | Tempo de entrega: {}",
        o.issue_date, o.delivery_date, lead
    )?;

    if o.products.is_empty() {
        writeln!(w, "  No product data found for this order.")?;
        return Ok(());
    }
    for p in &o.products {
        product(w, p)?;
    }
    Ok(())
}

fn product<W: Write>(w: &mut W, p: &ProductLine) -> Result<()> {
    writeln!(
        w,
        "  {:<40} {:>6}  caixa {:>10.2}  un {:>9.2}  R$ {:>10.2}",
        p.name.as_deref().unwrap_or("-"),
        p.quantity,
        p.box_price.round_dp(2),
        p.unit_price.round_dp(2),
        p.final_price.round_dp(2)
    )?;
    Ok(())
}

pub fn monthly<W: Write>(w: &mut W, fmt: Output, customers: &[&Customer]) -> Result<()> {
    let views: Vec<MonthlyView<'_>> = customers
        .iter()
        .map(|c| {
            let orders = c.order_list();
            MonthlyView {
                code: &c.code,
                label: c.label(),
                city: c.city.as_deref(),
                months: metrics::summarize_monthly(&metrics::group_by_month(&orders)),
            }
        })
        .collect();

    if fmt == Output::Json {
        return json(w, &views);
    }

    for v in &views {
        writeln!(w, "{} | {}", v.label, v.city.unwrap_or("-"))?;
        writeln!(w, "  {:<12} {:>12} {:>24}", "Month", "Total_Orders", "Total_Products_Quantity")?;
        for row in v.months.rows() {
            writeln!(
                w,
                "  {:<12} {:>12} {:>24}",
                row.month, row.total_orders, row.total_products_quantity
            )?;
        }
        writeln!(w)?;
    }
    Ok(())
}

fn json<W: Write, T: Serialize + ?Sized>(w: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *w, value)?;
    writeln!(w)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_line_money_columns_share_two_decimals() {
        let p = ProductLine {
            name: Some("FIAMBRE KITUT 3X320G".into()),
            category: None,
            quantity: 4,
            box_price: Decimal::new(1005, 1),
            unit_price: Decimal::new(33_333, 3),
            weight: Decimal::ONE,
            final_price: Decimal::new(402, 0),
            product_id: None,
        };
        let mut out = Vec::new();
        product(&mut out, &p).expect("render product");

        let line = String::from_utf8(out).expect("utf8");
        let tokens: Vec<&str> = line.split_whitespace().collect();
        assert!(tokens.contains(&"100.50"));
        assert!(tokens.contains(&"33.33"));
        assert!(tokens.contains(&"402.00"));
        assert!(!line.contains("33.333"));
    }
}
