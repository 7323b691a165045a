//! CSV: чтение выгрузки заказов и плоская запись по строке на товар.
//!
//! Заголовки входа (пробелы вокруг имён обрезаются):
//! Terceiro Centralizador,Nome do Terceiro Centralizador,Cidade,Pedido,Data Emissão Pedido,
//! Data de Entrega,Situação do Pedido,Nome Produto,FAMILIA,Qtde,PREÇO,Peso Líquido Estimado,Total,Produto

use crate::{
    builder::{HierarchyBuilder, Ingested},
    config::IngestConfig,
    error::{OrderDashError, Result, SkipReason},
    model::Dataset,
    normalize::{normalize, SourceRow},
};
use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use rust_decimal::Decimal;
use std::io::{BufRead, Write};
use tracing::debug;

#[derive(serde::Serialize)]
struct CsvOutRow<'a> {
    customer_code: &'a str,
    customer_name: Option<&'a str>,
    city: Option<&'a str>,
    order_code: &'a str,
    issue_date: String,
    delivery_date: String,
    delivery_days: Option<i64>,
    order_stage: Option<&'a str>,
    product_id: Option<&'a str>,
    product_name: Option<&'a str>,
    product_category: Option<&'a str>,
    quantity: i64,
    box_price: Decimal,
    unit_price: Decimal,
    weight: Decimal,
    final_price: Decimal,
}

pub struct Csv;

impl crate::traits::ReadFormat for Csv {
    fn read<R: BufRead>(r: R, cfg: &IngestConfig) -> Result<Ingested> {
        let mut rdr = ReaderBuilder::new()
            .flexible(true)
            .trim(Trim::Headers)
            .delimiter(cfg.delimiter)
            .from_reader(r);

        let headers = rdr.headers()?.clone();
        if headers.is_empty() {
            return Err(OrderDashError::EmptyInput);
        }
        debug!(columns = headers.len(), "csv headers read");

        let mut builder = HierarchyBuilder::new();
        let mut record = StringRecord::new();
        let mut line = 1u64;

        loop {
            match rdr.read_record(&mut record) {
                Ok(false) => break,
                Ok(true) => {
                    line = record.position().map_or(line + 1, |p| p.line());
                    let row = record
                        .deserialize::<SourceRow>(Some(&headers))
                        .map_err(|e| SkipReason::Malformed(e.to_string()))
                        .and_then(|row| normalize(row, cfg));
                    builder.push(line, row);
                }
                Err(e) if e.is_io_error() => return Err(e.into()),
                // битая кодировка и т.п. не должны ронять весь файл
                Err(e) => {
                    line += 1;
                    builder.push(line, Err(SkipReason::Malformed(e.to_string())));
                }
            }
        }

        Ok(builder.finish())
    }
}

impl crate::traits::WriteFormat for Csv {
    fn write<W: Write>(mut w: W, ds: &Dataset) -> Result<()> {
        let mut wrt = WriterBuilder::new().from_writer(&mut w);

        for (c, o, p) in ds.product_lines() {
            let out = CsvOutRow {
                customer_code: &c.code,
                customer_name: c.name.as_deref(),
                city: c.city.as_deref(),
                order_code: &o.code,
                issue_date: o.issue_date.to_string(),
                delivery_date: o.delivery_date.to_string(),
                delivery_days: o.delivery_days().ok(),
                order_stage: o.stage.as_deref(),
                product_id: p.product_id.as_deref(),
                product_name: p.name.as_deref(),
                product_category: p.category.as_deref(),
                quantity: p.quantity,
                box_price: p.box_price,
                unit_price: p.unit_price,
                weight: p.weight,
                final_price: p.final_price,
            };
            wrt.serialize(out)?;
        }
        wrt.flush()?;
        Ok(())
    }
}
