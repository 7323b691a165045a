//! Сборка иерархии клиент → заказ → товар из нормализованных строк.

use crate::{
    error::{SkipKind, SkipReason},
    model::{Customer, Dataset, Order},
    normalize::NormalizedRow,
};
use serde::Serialize;
use std::collections::{btree_map::Entry, BTreeMap};
use tracing::{info, warn};

/// Итог обработки файла: сколько строк принято и почему остальные отброшены.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProcessingReport {
    pub rows_read: usize,
    pub products_kept: usize,
    pub customers_created: usize,
    pub orders_created: usize,
    pub dropped: BTreeMap<SkipKind, usize>,
}

impl ProcessingReport {
    pub fn dropped_total(&self) -> usize {
        self.dropped.values().sum()
    }

    pub fn dropped_of(&self, kind: SkipKind) -> usize {
        self.dropped.get(&kind).copied().unwrap_or(0)
    }

    fn record_drop(&mut self, line: u64, reason: &SkipReason) {
        warn!(line, kind = reason.kind().as_str(), %reason, "row dropped");
        *self.dropped.entry(reason.kind()).or_default() += 1;
    }
}

/// Иерархия вместе с отчётом о её сборке.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Ingested {
    pub dataset: Dataset,
    pub report: ProcessingReport,
}

#[derive(Debug, Default)]
pub struct HierarchyBuilder {
    customers: BTreeMap<String, Customer>,
    report: ProcessingReport,
}

impl HierarchyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// `line`: номер строки в источнике, нужен только для логов.
    pub fn push(&mut self, line: u64, row: Result<NormalizedRow, SkipReason>) {
        self.report.rows_read += 1;
        let row = match row {
            Ok(row) => row,
            Err(reason) => {
                self.report.record_drop(line, &reason);
                return;
            }
        };

        let customer = match self.customers.entry(row.customer_code) {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => {
                self.report.customers_created += 1;
                let code = e.key().clone();
                e.insert(Customer {
                    code,
                    name: row.customer_name,
                    city: row.city,
                    orders: BTreeMap::new(),
                })
            }
        };

        // поля заказа фиксируются только при создании
        let order = match customer.orders.entry(row.order_code) {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => {
                self.report.orders_created += 1;
                let code = e.key().clone();
                e.insert(Order {
                    code,
                    issue_date: row.issue_date,
                    delivery_date: row.delivery_date,
                    stage: row.order_stage,
                    products: Vec::new(),
                })
            }
        };

        match row.product {
            Ok(product) => {
                order.products.push(product);
                self.report.products_kept += 1;
            }
            Err(reason) => self.report.record_drop(line, &reason),
        }
    }

    pub fn finish(self) -> Ingested {
        let report = self.report;
        info!(
            rows_read = report.rows_read,
            products_kept = report.products_kept,
            customers = report.customers_created,
            orders = report.orders_created,
            dropped = report.dropped_total(),
            "hierarchy built"
        );
        Ingested {
            dataset: Dataset { customers: self.customers },
            report,
        }
    }
}

/// Однопроходная сборка; номера строк считаются с единицы.
pub fn build<I>(rows: I) -> Ingested
where
    I: IntoIterator<Item = Result<NormalizedRow, SkipReason>>,
{
    let mut builder = HierarchyBuilder::new();
    for (idx, row) in rows.into_iter().enumerate() {
        builder.push(idx as u64 + 1, row);
    }
    builder.finish()
}
