//! Contains implementation for CSV as card data source.

use crate::data::{DataSource, RawCard, Value};
use crate::error::{Error, Result};

use csv::StringRecord;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct CsvSourceConfig {
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    #[serde(default = "default_header")]
    pub header: bool,
    /// Attribute names of the columns, overriding the header row. Required
    /// for files without one.
    pub columns: Option<Vec<String>>,
}

fn default_delimiter() -> char {
    ','
}

fn default_header() -> bool {
    true
}

impl Default for CsvSourceConfig {
    fn default() -> Self {
        CsvSourceConfig {
            delimiter: default_delimiter(),
            header: default_header(),
            columns: None,
        }
    }
}

impl CsvSourceConfig {
    fn builder(&self) -> csv::ReaderBuilder {
        let mut builder = csv::ReaderBuilder::new();
        builder
            .delimiter(self.delimiter as u8)
            .has_headers(self.header)
            .trim(csv::Trim::All);
        builder
    }

    /// Column names given in the config, if any.
    fn columns(&self) -> std::result::Result<Option<StringRecord>, &'static str> {
        match &self.columns {
            Some(columns) => Ok(Some(StringRecord::from(columns.clone()))),
            None if self.header => Ok(None),
            None => Err("files without a header row need `columns`"),
        }
    }
}

/// Reads one card per row; the header row or the configured columns name the
/// attributes. Cells are kept as written.
pub struct CsvSource<R: Read = std::fs::File> {
    reader: csv::Reader<R>,
    columns: Option<StringRecord>,
}

impl CsvSource {
    pub fn open(config: &CsvSourceConfig, path: &impl AsRef<Path>) -> Result<CsvSource> {
        let path = path.as_ref();
        let columns = config.columns().map_err(|e| Error::source_open(&path, e))?;
        let reader = config
            .builder()
            .from_path(path)
            .map_err(|e| Error::source_open(&path, e))?;
        Ok(Self { reader, columns })
    }
}

impl<R: Read> CsvSource<R> {
    pub fn from_reader(config: &CsvSourceConfig, rdr: R) -> Result<CsvSource<R>> {
        let columns = config.columns().map_err(Error::record_read)?;
        Ok(CsvSource { reader: config.builder().from_reader(rdr), columns })
    }
}

impl<R: Read + Send> DataSource for CsvSource<R> {
    fn read(&mut self) -> Result<Box<dyn Iterator<Item = Result<RawCard>> + '_>> {
        let columns = match &self.columns {
            Some(columns) => columns.clone(),
            None => self.reader.headers().map_err(Error::record_read)?.clone(),
        };
        let iterator = self.reader.records().map(move |record| -> Result<RawCard> {
            let record = record.map_err(Error::record_read)?;
            let cells = columns
                .iter()
                .zip(record.iter())
                .map(|(name, cell)| (name.to_string(), Value::from(cell)));
            Ok(RawCard(cells.collect()))
        });
        Ok(Box::new(iterator))
    }
}
