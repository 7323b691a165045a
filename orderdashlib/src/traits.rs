//! Унифицированные трэйты чтения/записи на основе std::io::{BufRead, Write}.

use crate::{builder::Ingested, config::IngestConfig, error::Result, model::Dataset};
use std::io::{BufRead, Write};

pub trait ReadFormat {
    fn read<R: BufRead>(r: R, cfg: &IngestConfig) -> Result<Ingested>;
}

pub trait WriteFormat {
    fn write<W: Write>(w: W, ds: &Dataset) -> Result<()>;
}
