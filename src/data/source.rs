//! Contains implementations for different data sources.

#[cfg(feature = "csv")]
mod csv;
mod deck;

#[cfg(feature = "csv")]
pub use crate::data::source::csv::{CsvSource, CsvSourceConfig};
pub use crate::data::source::deck::TomlSource;
use crate::data::RawCard;
use crate::error::Result;

/// Produces raw cards in authoring order.
pub trait DataSource: Send {
    fn read(&mut self) -> Result<Box<dyn Iterator<Item = Result<RawCard>> + '_>>;
}

impl DataSource for Vec<RawCard> {
    fn read(&mut self) -> Result<Box<dyn Iterator<Item = Result<RawCard>> + '_>> {
        Ok(Box::new(self.drain(..).map(Ok)))
    }
}
