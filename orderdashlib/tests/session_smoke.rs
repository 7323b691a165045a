use orderdashlib::{config::IngestConfig, error::OrderDashError, session::Session};
use rust_decimal::Decimal;
use std::io::Cursor;

const HEADER: &str = "Terceiro Centralizador,Nome do Terceiro Centralizador,Cidade,Pedido,Qtde,Peso Líquido Estimado,Total\n";

#[test]
fn upload_replaces_dataset_wholesale() {
    let mut session = Session::new(IngestConfig::default());
    assert!(session.dataset().is_none());

    let first = format!("{HEADER}1,ANA,Campinas,10,1,1.0,10.00\n2,BETO,Sorocaba,20,1,1.0,10.00\n");
    let report = session.upload(Cursor::new(first)).expect("first upload");
    assert_eq!(report.customers_created, 2);

    let second = format!("{HEADER}3,CAIO,Jundiai,30,1,1.0,10.00\n");
    session.upload(Cursor::new(second)).expect("second upload");

    let ds = session.dataset().expect("dataset");
    let codes: Vec<&str> = ds.customers.keys().map(String::as_str).collect();
    assert_eq!(codes, ["3"]);
    assert_eq!(session.report().expect("report").rows_read, 1);
}

#[test]
fn failed_upload_keeps_previous_dataset() {
    let mut session = Session::new(IngestConfig::default());
    let good = format!("{HEADER}1,ANA,Campinas,10,1,1.0,10.00\n");
    session.upload(Cursor::new(good)).expect("upload");

    // ни одной строки с кодами: иерархия пустая
    let useless = format!("{HEADER},ANA,Campinas,10,1,1.0,10.00\n");
    let err = session.upload(Cursor::new(useless)).unwrap_err();
    assert!(matches!(err, OrderDashError::NoCustomers));

    let err = session.upload(Cursor::new("")).unwrap_err();
    assert!(matches!(err, OrderDashError::EmptyInput));

    assert!(session.dataset().expect("dataset").customers.contains_key("1"));
}

#[test]
fn customer_label_falls_back_to_sem_nome() {
    let mut session = Session::new(IngestConfig::default());
    let csv = format!("{HEADER}1,ANA,Campinas,10,1,1.0,10.00\n2,,Sorocaba,20,1,1.0,10.00\n");
    session.upload(Cursor::new(csv)).expect("upload");

    assert_eq!(session.customer_label("1"), "ANA (1)");
    assert_eq!(session.customer_label("2"), "Sem Nome (2)");
    assert_eq!(session.customer_label("99"), "Sem Nome (99)");
}

#[test]
fn config_is_applied_and_clear_empties_the_session() {
    let cfg = IngestConfig::default()
        .with_delimiter(";")
        .expect("delimiter")
        .with_currency_prefix("US$")
        .with_fallback_unit_price(Decimal::new(5, 0))
        .expect("fallback");
    let mut session = Session::new(cfg);
    assert_eq!(session.config().delimiter, b';');

    let csv = "Terceiro Centralizador;Pedido;Nome Produto;PREÇO;Qtde;Peso Líquido Estimado;Total\n\
               1;10;SALSICHA;US$ 9.90;1;1.0;10.00\n";
    session.upload(Cursor::new(csv)).expect("upload");
    let p = &session.dataset().expect("dataset").customer("1").expect("customer").orders["10"].products[0];
    assert_eq!(p.box_price, Decimal::new(990, 2));
    assert_eq!(p.unit_price, Decimal::new(5, 0));

    session.clear();
    assert!(session.dataset().is_none());
    assert!(session.report().is_none());
    assert_eq!(session.customer_label("1"), "Sem Nome (1)");
}
