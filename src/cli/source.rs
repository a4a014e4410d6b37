use crate::cli::config::DataSourceConfig;
#[cfg(feature = "csv")]
use crate::data::source::CsvSource;
use crate::data::source::{DataSource, TomlSource};
use crate::error::{Error, Result};

use clap::ValueEnum;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SourceType {
    #[cfg(feature = "csv")]
    Csv,
    Toml,
}

impl SourceType {
    /// Guesses the source type from a file extension.
    pub fn infer(path: &Path) -> Option<SourceType> {
        let ext = path.extension()?.to_str()?;
        match ext.to_ascii_lowercase().as_str() {
            #[cfg(feature = "csv")]
            "csv" | "tsv" => Some(SourceType::Csv),
            "toml" => Some(SourceType::Toml),
            _ => None,
        }
    }

    pub fn open(self, path: &Path, config: &DataSourceConfig) -> Result<Box<dyn DataSource>> {
        match self {
            #[cfg(feature = "csv")]
            SourceType::Csv => {
                let config = config.csv.clone().unwrap_or_else(|| default_csv_config(path));
                CsvSource::open(&config, &path).map(|s| Box::new(s) as Box<dyn DataSource>)
            }
            SourceType::Toml => {
                TomlSource::open(&path).map(|s| Box::new(s) as Box<dyn DataSource>)
            }
        }
    }
}

/// Tab separated files read with a tab delimiter unless configured otherwise.
#[cfg(feature = "csv")]
fn default_csv_config(path: &Path) -> crate::data::source::CsvSourceConfig {
    let mut config = crate::data::source::CsvSourceConfig::default();
    if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("tsv")) {
        config.delimiter = '\t';
    }
    config
}

/// Opens card data, using `explicit`, then the file extension, then the
/// configured default to pick the source type.
pub fn open_source(
    explicit: Option<SourceType>,
    path: &Path,
    config: &DataSourceConfig,
) -> Result<Box<dyn DataSource>> {
    let src_type = explicit
        .or_else(|| SourceType::infer(path))
        .or(config.default)
        .ok_or_else(|| Error::SourceInfer(path.to_path_buf()))?;
    src_type.open(path, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::CardRecord;
    use std::fs;

    #[test]
    fn extensions_pick_the_source() {
        assert_eq!(SourceType::infer(Path::new("deck.TOML")), Some(SourceType::Toml));
        #[cfg(feature = "csv")]
        assert_eq!(SourceType::infer(Path::new("deck.tsv")), Some(SourceType::Csv));
        assert_eq!(SourceType::infer(Path::new("deck.db")), None);
        assert_eq!(SourceType::infer(Path::new("deck")), None);
    }

    #[test]
    fn unknown_extension_needs_an_explicit_type() {
        let config = DataSourceConfig::default();
        match open_source(None, Path::new("cards.json"), &config) {
            Err(Error::SourceInfer(path)) => assert_eq!(path, Path::new("cards.json")),
            other => panic!("expected an inference error, got {:?}", other.err()),
        }
    }

    #[cfg(feature = "csv")]
    #[test]
    fn tsv_files_split_on_tabs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.tsv");
        fs::write(&path, "id\ttype\tcost\nsword\titem\t3\n").unwrap();
        let mut source = open_source(None, &path, &DataSourceConfig::default()).unwrap();
        let cards: Vec<_> = source.read().unwrap().collect::<Result<_>>().unwrap();
        let card = CardRecord::from_raw(&cards[0]).unwrap();
        assert_eq!((card.id(), card.cost()), ("sword", 3));
    }

    #[test]
    fn explicit_type_beats_the_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.txt");
        fs::write(&path, "[[card]]\nid = \"c\"\ntype = \"coin\"\ncost = 1\n").unwrap();
        let mut source =
            open_source(Some(SourceType::Toml), &path, &DataSourceConfig::default()).unwrap();
        assert_eq!(source.read().unwrap().count(), 1);
    }

    #[cfg(feature = "csv")]
    #[test]
    fn extension_beats_the_configured_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cards.csv");
        fs::write(&path, "id,type,cost\nsword,item,3\n").unwrap();
        let config = DataSourceConfig { default: Some(SourceType::Toml), csv: None };
        let mut source = open_source(None, &path, &config).unwrap();
        let cards: Vec<_> = source.read().unwrap().collect::<Result<_>>().unwrap();
        assert_eq!(CardRecord::from_raw(&cards[0]).unwrap().id(), "sword");
    }

    #[test]
    fn configured_default_covers_unknown_extensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.txt");
        fs::write(&path, "[[card]]\nid = \"c\"\ntype = \"coin\"\ncost = 1\n").unwrap();
        let config = DataSourceConfig { default: Some(SourceType::Toml), ..Default::default() };
        let mut source = open_source(None, &path, &config).unwrap();
        assert_eq!(source.read().unwrap().count(), 1);
    }
}
