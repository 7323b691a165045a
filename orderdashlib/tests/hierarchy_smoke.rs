use orderdashlib::{
    builder::build,
    config::IngestConfig,
    error::{SkipKind, SkipReason},
    normalize::{normalize, SourceRow},
};

fn row(customer: &str, order: &str, product: &str, qty: &str) -> SourceRow {
    let opt = |s: &str| (!s.is_empty()).then(|| s.to_string());
    SourceRow {
        customer_code: opt(customer),
        customer_name: Some(format!("Cliente {customer}")),
        city: Some("Campinas".into()),
        order_code: opt(order),
        issue_date: Some("01/10/2024".into()),
        delivery_date: Some("01/15/2024".into()),
        order_stage: Some("Faturado".into()),
        product_name: Some(product.to_string()),
        product_family: Some("ENLATADOS".into()),
        quantity: opt(qty),
        price: Some("R$ 24.00".into()),
        net_weight: Some("2.5".into()),
        total: Some("48.00".into()),
        product_id: Some(product.to_string()),
    }
}

fn normalized(rows: Vec<SourceRow>) -> Vec<Result<orderdashlib::normalize::NormalizedRow, SkipReason>> {
    let cfg = IngestConfig::default();
    rows.into_iter().map(|r| normalize(r, &cfg)).collect()
}

#[test]
fn rows_without_identifiers_create_nothing() {
    let ing = build(normalized(vec![row("", "1", "A", "1"), row("10", "", "A", "1")]));
    assert!(ing.dataset.is_empty());
    assert_eq!(ing.report.customers_created, 0);
    assert_eq!(ing.report.orders_created, 0);
    assert_eq!(ing.report.dropped_of(SkipKind::MissingCustomerCode), 1);
    assert_eq!(ing.report.dropped_of(SkipKind::MissingOrderCode), 1);
}

#[test]
fn same_customer_and_order_share_one_order_in_arrival_order() {
    let mut second = row("10", "1", "B", "2");
    // поля заказа из поздних строк не перезаписывают первые
    second.order_stage = Some("Cancelado".into());
    second.customer_name = Some("Outro Nome".into());

    let ing = build(normalized(vec![row("10", "1", "A", "1"), second, row("10", "1", "C", "3")]));
    let c = ing.dataset.customer("10").expect("customer");
    assert_eq!(c.name.as_deref(), Some("Cliente 10"));
    assert_eq!(c.orders.len(), 1);

    let o = &c.orders["1"];
    assert_eq!(o.stage.as_deref(), Some("Faturado"));
    let names: Vec<_> = o.products.iter().map(|p| p.name.as_deref().unwrap_or("")).collect();
    assert_eq!(names, ["A", "B", "C"]);
}

#[test]
fn duplicate_order_codes_across_customers_are_distinct() {
    let ing = build(normalized(vec![row("10", "1", "A", "1"), row("20", "1", "B", "1")]));
    assert_eq!(ing.report.orders_created, 2);
    assert_eq!(ing.dataset.order_count(), 2);
    assert_eq!(ing.dataset.customer("10").unwrap().orders["1"].products[0].name.as_deref(), Some("A"));
    assert_eq!(ing.dataset.customer("20").unwrap().orders["1"].products[0].name.as_deref(), Some("B"));
}

#[test]
fn bad_numeric_row_still_creates_parents() {
    let ing = build(normalized(vec![row("10", "1", "A", "x")]));
    let o = &ing.dataset.customer("10").expect("customer").orders["1"];
    assert!(o.products.is_empty());
    assert_eq!(ing.report.products_kept, 0);
    assert_eq!(ing.report.dropped_of(SkipKind::InvalidQuantity), 1);
}

#[test]
fn flattened_product_count_matches_valid_rows() {
    let rows = vec![
        row("10", "1", "A", "1"),
        row("10", "2", "B", "2"),
        row("", "3", "C", "1"),
        row("20", "1", "D", "bad"),
        row("20", "1", "E", "5"),
        row("30", "", "F", "1"),
        row("30", "9", "G", "7"),
    ];
    let ing = build(normalized(rows));
    assert_eq!(ing.dataset.product_lines().count(), 4);
    assert_eq!(ing.report.products_kept, 4);
    assert_eq!(ing.report.rows_read, 7);
    assert_eq!(ing.report.rows_read, ing.report.products_kept + ing.report.dropped_total());
}
