//! JSON: вложенная иерархия клиентов как есть.

use crate::{error::Result, model::Dataset};
use std::io::Write;

pub struct Json;

impl crate::traits::WriteFormat for Json {
    fn write<W: Write>(mut w: W, ds: &Dataset) -> Result<()> {
        serde_json::to_writer_pretty(&mut w, ds)?;
        writeln!(w)?;
        Ok(())
    }
}
