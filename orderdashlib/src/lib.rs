//! orderdashlib: загрузка CSV-выгрузки заказов, иерархия клиент → заказ → товар и метрики дашборда

pub mod builder;
pub mod config;
pub mod error;
pub mod metrics;
pub mod model;
pub mod normalize;
pub mod session;
pub mod traits;

pub mod formats {
    pub mod csv;
    pub mod json;
}
