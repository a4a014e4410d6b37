//! Contains implementation for TOML deck files as card data source.

use crate::data::{DataSource, RawCard};
use crate::error::{Error, Result};

use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
struct Deck {
    #[serde(default)]
    card: Vec<RawCard>,
}

/// Reads `[[card]]` tables from a TOML deck file.
pub struct TomlSource {
    cards: Vec<RawCard>,
}

impl TomlSource {
    pub fn open(path: &impl AsRef<Path>) -> Result<TomlSource> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::source_open(&path, e))?;
        Self::parse(&content).map_err(|e| Error::source_open(&path, e))
    }

    pub fn parse(content: &str) -> std::result::Result<TomlSource, toml::de::Error> {
        let deck: Deck = toml::from_str(content)?;
        Ok(Self { cards: deck.card })
    }
}

impl DataSource for TomlSource {
    fn read(&mut self) -> Result<Box<dyn Iterator<Item = Result<RawCard>> + '_>> {
        Ok(Box::new(self.cards.drain(..).map(Ok)))
    }
}
