use orderdashlib::{config::IngestConfig, metrics, session::Session};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Пример: CSV из stdin -> помесячная сводка по каждому клиенту
    let mut session = Session::new(IngestConfig::default());
    session.upload(std::io::BufReader::new(std::io::stdin()))?;

    let ds = session.dataset().ok_or("no dataset")?;
    for c in ds.customers.values() {
        let orders = c.order_list();
        let table = metrics::summarize_monthly(&metrics::group_by_month(&orders));
        println!("{}", c.label());
        for row in table.rows() {
            println!("  {:<10} {:>4} {:>8}", row.month, row.total_orders, row.total_products_quantity);
        }
    }
    Ok(())
}
