//! Layout definitions: which field goes into which template area, per card type.

mod registry;
mod schema;

pub use registry::Registry;
pub use schema::{validate, RawDocument, RawField, RawLayout, Rule, SchemaViolation};

use crate::data::{Attribute, CardType};
use crate::error::{Error, Result};
use crate::Token;

use std::fs;
use std::path::Path;

/// Logical name of a piece of card content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Token)]
#[token(kind = "field key")]
pub enum FieldKey {
    Id,
    Type,
    Name,
    Subtitle,
    Text,
    Icon,
    Meta,
    Cost,
    Value,
    Hp,
    Atk,
    Def,
    #[token(rename = "lootBudget")]
    LootBudget,
    Stats,
    Tags,
    Class,
    School,
    Slot,
    Footer,
}

impl FieldKey {
    /// The card attribute of the same name, if the key has one.
    pub fn attribute(self) -> Option<Attribute> {
        match self {
            Self::Id => Some(Attribute::Id),
            Self::Type => Some(Attribute::Type),
            Self::Name => Some(Attribute::Name),
            Self::Subtitle => Some(Attribute::Subtitle),
            Self::Text => Some(Attribute::Text),
            Self::Icon => Some(Attribute::Icon),
            Self::Cost => Some(Attribute::Cost),
            Self::Value => Some(Attribute::Value),
            Self::Hp => Some(Attribute::Hp),
            Self::Atk => Some(Attribute::Atk),
            Self::Def => Some(Attribute::Def),
            Self::LootBudget => Some(Attribute::LootBudget),
            Self::Tags => Some(Attribute::Tags),
            Self::Class => Some(Attribute::Class),
            Self::School => Some(Attribute::School),
            Self::Slot => Some(Attribute::Slot),
            Self::Meta | Self::Stats | Self::Footer => None,
        }
    }
}

/// Named rendering region of the card template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Token)]
pub enum Area {
    HeaderLeft,
    HeaderRight,
    HeaderTitle,
    HeaderSubtitle,
    MetaLine,
    Body,
    BodyTop,
    FooterLeft,
    FooterRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldBinding {
    pub key: FieldKey,
    pub area: Area,
    /// Fails the card instead of leaving the area blank when nothing resolves.
    pub required: bool,
}

impl FieldBinding {
    pub fn new(key: FieldKey, area: Area) -> Self {
        Self { key, area, required: false }
    }

    pub fn required(key: FieldKey, area: Area) -> Self {
        Self { key, area, required: true }
    }
}

/// Ordered field bindings for one card type.
///
/// Only built through [`validate`], so no two bindings share an area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    card_type: CardType,
    fields: Vec<FieldBinding>,
}

impl Layout {
    pub(crate) fn new(card_type: CardType, fields: Vec<FieldBinding>) -> Self {
        Self { card_type, fields }
    }

    pub fn card_type(&self) -> CardType {
        self.card_type
    }

    pub fn fields(&self) -> &[FieldBinding] {
        &self.fields
    }
}

/// A validated layout document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutDocument {
    name: String,
    layouts: Vec<Layout>,
}

impl LayoutDocument {
    /// Validates a raw document; `name` identifies it in error messages.
    pub fn from_raw(name: impl Into<String>, raw: &RawDocument) -> Result<Self> {
        let name = name.into();
        match validate(raw) {
            Ok(layouts) => Ok(Self { name, layouts }),
            Err(violations) => Err(Error::SchemaViolations(name, violations)),
        }
    }

    pub fn parse(name: impl Into<String>, content: &str) -> Result<Self> {
        let name = name.into();
        let raw: RawDocument =
            toml::from_str(content).map_err(|e| Error::layout_deser(&name, e))?;
        Self::from_raw(name, &raw)
    }

    pub fn open(path: &impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::layout_open(&path, e))?;
        Self::parse(path.display().to_string(), &content)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn layouts(&self) -> &[Layout] {
        &self.layouts
    }

    pub fn into_layouts(self) -> Vec<Layout> {
        self.layouts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    const ITEM: &str = r#"
        [[layout]]
        for = "item"

        [[layout.field]]
        key = "name"
        area = "header_title"

        [[layout.field]]
        key = "cost"
        area = "header_right"
        required = true
    "#;

    #[test]
    fn parses_and_types_a_document() {
        let doc = LayoutDocument::parse("item.toml", ITEM).unwrap();
        assert_eq!(doc.name(), "item.toml");
        let layout = &doc.layouts()[0];
        assert_eq!(layout.card_type(), CardType::Item);
        assert_eq!(
            layout.fields(),
            [
                FieldBinding::new(FieldKey::Name, Area::HeaderTitle),
                FieldBinding::required(FieldKey::Cost, Area::HeaderRight),
            ]
        );
    }

    #[test]
    fn syntax_errors_name_the_document() {
        let err = LayoutDocument::parse("broken.toml", "[[layout]\n").unwrap_err();
        assert!(matches!(err, Error::LayoutDeser(ref name, _) if name == "broken.toml"));
    }

    #[test]
    fn unknown_attributes_are_rejected() {
        let content = "[[layout]]\nfor = \"item\"\ncolor = \"red\"\n";
        assert!(matches!(
            LayoutDocument::parse("x", content),
            Err(Error::LayoutDeser(..))
        ));
    }

    #[test]
    fn schema_errors_carry_every_violation() {
        let content = r#"
            [[layout]]
            for = "dragon"

            [[layout.field]]
            key = "power"
            area = "body"
        "#;
        match LayoutDocument::parse("bad.toml", content) {
            Err(Error::SchemaViolations(name, violations)) => {
                assert_eq!(name, "bad.toml");
                assert_eq!(violations.len(), 2);
            }
            other => panic!("expected schema violations, got {other:?}"),
        }
    }

    #[test]
    fn opens_documents_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(ITEM.as_bytes()).unwrap();
        let doc = LayoutDocument::open(&file.path()).unwrap();
        assert_eq!(doc.layouts().len(), 1);
        assert_eq!(doc.name(), file.path().display().to_string());
    }

    #[test]
    fn missing_file_is_an_open_error() {
        let err = LayoutDocument::open(&"/nonexistent/layouts.toml").unwrap_err();
        assert!(matches!(err, Error::LayoutOpen(..)));
    }

    #[test]
    fn computed_keys_have_no_attribute() {
        assert_eq!(FieldKey::Stats.attribute(), None);
        assert_eq!(FieldKey::LootBudget.attribute(), Some(Attribute::LootBudget));
    }
}
