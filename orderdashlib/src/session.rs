//! Состояние одной пользовательской сессии.
//!
//! Создаётся пустым; удачная загрузка файла целиком заменяет данные,
//! неудачная оставляет прежние.

use crate::{
    builder::{Ingested, ProcessingReport},
    config::IngestConfig,
    error::{OrderDashError, Result},
    formats::csv::Csv,
    model::Dataset,
    traits::ReadFormat,
};
use std::io::BufRead;
use tracing::info;

#[derive(Debug, Default)]
pub struct Session {
    config: IngestConfig,
    current: Option<Ingested>,
}

impl Session {
    pub fn new(config: IngestConfig) -> Self {
        Self { config, current: None }
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    pub fn upload<R: BufRead>(&mut self, r: R) -> Result<&ProcessingReport> {
        let ingested = Csv::read(r, &self.config)?;
        if ingested.dataset.is_empty() {
            return Err(OrderDashError::NoCustomers);
        }
        info!(
            customers = ingested.dataset.customers.len(),
            replaced = self.current.is_some(),
            "session dataset loaded"
        );
        let current = self.current.insert(ingested);
        Ok(&current.report)
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.current.as_ref().map(|i| &i.dataset)
    }

    pub fn report(&self) -> Option<&ProcessingReport> {
        self.current.as_ref().map(|i| &i.report)
    }

    /// Подпись клиента для списка выбора; неизвестный код даёт `Sem Nome (код)`.
    pub fn customer_label(&self, code: &str) -> String {
        self.dataset()
            .and_then(|ds| ds.customers.get(code))
            .map(|c| c.label())
            .unwrap_or_else(|| format!("Sem Nome ({code})"))
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}
