//! Project configuration, read from `cardlay.toml`.

use crate::cli::source::SourceType;
#[cfg(feature = "csv")]
use crate::data::source::CsvSourceConfig;
use crate::error::{Error, Result};
use crate::icons::IconTable;
use crate::layout::{LayoutDocument, Registry};
use crate::resolve::Resolver;

use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::num::NonZero;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "cardlay.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub project: ProjectConfig,
    #[serde(default = "default_layouts")]
    pub layouts: Vec<PathBuf>,
    #[serde(default)]
    pub source: DataSourceConfig,
    #[serde(default)]
    pub icons: IconsConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub sheet: SheetConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectConfig {
    pub name: Option<String>,
    #[serde(default = "default_identity")]
    pub identity: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self { name: None, identity: default_identity() }
    }
}

fn default_identity() -> String {
    String::from("{id}")
}

fn default_layouts() -> Vec<PathBuf> {
    vec![PathBuf::from("layouts.toml")]
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DataSourceConfig {
    pub default: Option<SourceType>,
    #[cfg(feature = "csv")]
    pub csv: Option<CsvSourceConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IconsConfig {
    /// Starts from the stock glyphs before applying overrides.
    #[serde(default = "default_stock")]
    pub stock: bool,
    #[serde(default)]
    pub types: HashMap<String, String>,
    #[serde(default)]
    pub schools: HashMap<String, String>,
    /// Back glyph per deck.
    #[serde(default)]
    pub backs: HashMap<String, String>,
    pub fallback: Option<String>,
}

impl Default for IconsConfig {
    fn default() -> Self {
        Self {
            stock: default_stock(),
            types: HashMap::new(),
            schools: HashMap::new(),
            backs: HashMap::new(),
            fallback: None,
        }
    }
}

fn default_stock() -> bool {
    true
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct RenderConfig {
    #[serde(default)]
    pub require_all: bool,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SheetConfig {
    #[serde(default = "default_sheet_side")]
    pub columns: NonZero<usize>,
    #[serde(default = "default_sheet_side")]
    pub rows: NonZero<usize>,
    /// Writes a back page after every front page.
    #[serde(default = "default_backs")]
    pub backs: bool,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            columns: default_sheet_side(),
            rows: default_sheet_side(),
            backs: default_backs(),
        }
    }
}

fn default_backs() -> bool {
    true
}

fn default_sheet_side() -> NonZero<usize> {
    NonZero::<usize>::MIN.saturating_add(2)
}

impl Config {
    /// Opens the config of a named project, or `./cardlay.toml` without a
    /// name.
    pub fn find(name: Option<&str>) -> Result<Self> {
        let path = match name {
            Some(name) => {
                let mut path = Self::config_folder()?;
                path.push(name);
                path.push(CONFIG_FILE);
                path
            }
            None => PathBuf::from(".").join(CONFIG_FILE),
        };
        Self::open(&path)
    }

    /// Reads a config file. Layout paths are taken relative to its folder.
    pub fn open(path: &impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::config_open(&path, e))?;
        let folder = path.parent().unwrap_or(Path::new("."));
        Self::parse(folder, &content).map_err(|e| Error::config_deser(&path, e))
    }

    pub fn parse(folder: &Path, content: &str) -> std::result::Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(content)?;
        config.layouts = config.layouts.into_iter().map(|p| folder.join(p)).collect();
        Ok(config)
    }

    #[cfg(target_os = "windows")]
    fn config_folder() -> Result<PathBuf> {
        let home = std::env::var("APPDATA").map_err(|_| Error::no_env_variable("APPDATA"))?;
        let mut home = PathBuf::from(home);
        home.push("cardlay");
        Ok(home)
    }

    #[cfg(not(target_os = "windows"))]
    fn config_folder() -> Result<PathBuf> {
        let home = std::env::var("HOME").map_err(|_| Error::no_env_variable("HOME"))?;
        let mut home = PathBuf::from(home);
        home.push(".cardlay");
        Ok(home)
    }

    /// Loads every layout document into a registry, reporting all broken
    /// documents at once.
    pub fn load_registry(&self) -> Result<Registry> {
        let mut documents = Vec::with_capacity(self.layouts.len());
        let mut errors = Vec::new();
        for path in &self.layouts {
            match LayoutDocument::open(path) {
                Ok(doc) => documents.push(doc),
                Err(e) => errors.push(e),
            }
        }
        if !errors.is_empty() {
            return Err(Error::many(errors));
        }
        Registry::load(documents)
    }

    pub fn icon_table(&self) -> Result<IconTable> {
        let icons = &self.icons;
        let mut table = if icons.stock { IconTable::stock() } else { IconTable::new() };
        table.extend_from_names(&icons.types, &icons.schools, &icons.backs)?;
        if icons.fallback.is_some() {
            table.set_fallback(icons.fallback.clone());
        }
        Ok(table)
    }

    pub fn resolver(&self) -> Result<Resolver> {
        self.icon_table().map(Resolver::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{CardType, School};
    use pretty_assertions::assert_eq;
    use std::io::Write;

    const LAYOUTS: &str = r#"
        [[layout]]
        for = "item"
        [[layout.field]]
        key = "name"
        area = "header_title"
    "#;

    #[test]
    fn defaults_fill_an_empty_config() {
        let config = Config::parse(Path::new("proj"), "").unwrap();
        assert_eq!(config.project.identity, "{id}");
        assert_eq!(config.layouts, vec![PathBuf::from("proj/layouts.toml")]);
        assert_eq!(config.sheet.columns.get(), 3);
        assert_eq!(config.sheet.rows.get(), 3);
        assert!(config.sheet.backs);
        assert!(!config.render.require_all);
        assert!(config.icons.stock);
        assert!(config.source.default.is_none());
    }

    #[test]
    fn sections_are_read() {
        let config = Config::parse(
            Path::new(""),
            r##"
            layouts = ["a.toml", "b.toml"]

            [project]
            name = "dungeon"
            identity = "{type}-{id}"

            [source]
            default = "toml"

            [icons]
            stock = false
            schools = { spell = "*" }
            backs = { coin = "#", monster = "M" }
            fallback = "?"

            [render]
            require_all = true

            [sheet]
            columns = 4
            rows = 2
            backs = false
            "##,
        )
        .unwrap();
        assert_eq!(config.project.name.as_deref(), Some("dungeon"));
        assert_eq!(config.layouts, vec![PathBuf::from("a.toml"), PathBuf::from("b.toml")]);
        assert!(matches!(config.source.default, Some(SourceType::Toml)));
        assert!(config.render.require_all);
        assert_eq!((config.sheet.columns.get(), config.sheet.rows.get()), (4, 2));
        assert!(!config.sheet.backs);

        let icons = config.icon_table().unwrap();
        assert_eq!(icons.for_school(School::Spell), Some("*"));
        assert_eq!(icons.for_school(School::Attack), None);
        assert_eq!(icons.for_type(CardType::Coin), None);
        assert_eq!(icons.for_back(CardType::Loot), Some("#"));
        assert_eq!(icons.for_back(CardType::Monster), Some("M"));
    }

    #[cfg(feature = "csv")]
    #[test]
    fn headerless_csv_columns_are_read() {
        let config = Config::parse(
            Path::new(""),
            "[source.csv]\nheader = false\ncolumns = [\"id\", \"type\", \"cost\"]\n",
        )
        .unwrap();
        let csv = config.source.csv.unwrap();
        assert!(!csv.header);
        assert_eq!(csv.columns.map(|c| c.len()), Some(3));
    }

    #[test]
    fn unknown_sections_are_rejected() {
        assert!(Config::parse(Path::new(""), "[fonts]\nmain = \"x\"\n").is_err());
    }

    #[test]
    fn unknown_icon_names_are_rejected() {
        let config = Config::parse(Path::new(""), "[icons]\ntypes = { dragon = \"D\" }\n").unwrap();
        assert!(matches!(config.icon_table(), Err(Error::UnknownToken(_))));
    }

    #[test]
    fn open_resolves_layouts_next_to_the_config() {
        let dir = tempfile::tempdir().unwrap();
        let mut layouts = fs::File::create(dir.path().join("layouts.toml")).unwrap();
        layouts.write_all(LAYOUTS.as_bytes()).unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "[project]\nname = \"t\"\n").unwrap();

        let config = Config::open(&dir.path().join(CONFIG_FILE)).unwrap();
        let registry = config.load_registry().unwrap();
        assert!(registry.layout_for(CardType::Item).is_some());
    }

    #[test]
    fn every_broken_layout_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bad.toml"), "[[layout]]\nfor = \"dragon\"\n").unwrap();
        let config = Config::parse(dir.path(), "layouts = [\"bad.toml\", \"gone.toml\"]").unwrap();
        match config.load_registry() {
            Err(Error::Many(errors)) => {
                assert_eq!(errors.len(), 2);
                assert!(matches!(errors[0], Error::SchemaViolations(..)));
                assert!(matches!(errors[1], Error::LayoutOpen(..)));
            }
            other => panic!("expected both files to fail, got {other:?}"),
        }
    }

    #[test]
    fn missing_config_names_its_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        match Config::open(&path) {
            Err(Error::ConfigOpen(p, _)) => assert_eq!(p, path.display().to_string()),
            other => panic!("expected an open error, got {other:?}"),
        }
    }
}
