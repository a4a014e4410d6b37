//! Placement building: resolved `(area, value)` pairs for one card.

use crate::data::{CardRecord, Value};
use crate::error::{Error, Result};
use crate::layout::{Area, FieldKey, Layout, Registry};
use crate::resolve::Resolver;

/// One resolved field, ready for the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct Placed {
    pub area: Area,
    pub key: FieldKey,
    pub value: Value,
}

/// Ordered placements of one card, in the layout's field order.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    card_id: String,
    entries: Vec<Placed>,
}

impl Placement {
    pub(crate) fn new(card_id: impl Into<String>, entries: Vec<Placed>) -> Self {
        Self { card_id: card_id.into(), entries }
    }

    pub fn card_id(&self) -> &str {
        &self.card_id
    }

    pub fn entries(&self) -> &[Placed] {
        &self.entries
    }

    pub fn pairs(&self) -> impl Iterator<Item = (Area, &Value)> + '_ {
        self.entries.iter().map(|p| (p.area, &p.value))
    }

    pub fn get(&self, area: Area) -> Option<&Value> {
        self.entries.iter().find(|p| p.area == area).map(|p| &p.value)
    }

    /// Value placed for a field key, whichever area it went to.
    pub fn value_of(&self, key: FieldKey) -> Option<&Value> {
        self.entries.iter().find(|p| p.key == key).map(|p| &p.value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Combines card records with their layouts.
#[derive(Debug, Clone, Copy)]
pub struct PlacementBuilder<'a> {
    registry: &'a Registry,
    resolver: &'a Resolver,
    require_all: bool,
}

impl<'a> PlacementBuilder<'a> {
    pub fn new(registry: &'a Registry, resolver: &'a Resolver) -> Self {
        Self { registry, resolver, require_all: false }
    }

    /// Treats every layout field as required.
    pub fn require_all(mut self, require_all: bool) -> Self {
        self.require_all = require_all;
        self
    }

    /// The layout for a card: its own type's, else its deck's.
    pub fn layout_for(&self, card: &CardRecord) -> Result<&'a Layout> {
        let card_type = card.card_type();
        self.registry
            .layout_for(card_type)
            .or_else(|| self.registry.layout_for(card_type.deck()))
            .ok_or_else(|| Error::LayoutNotFound {
                card: card.id().to_string(),
                card_type,
            })
    }

    /// Builds the placement of one card.
    ///
    /// Fields that resolve to nothing leave their area blank, unless the
    /// binding is required.
    pub fn build(&self, card: &CardRecord) -> Result<Placement> {
        let layout = self.layout_for(card)?;
        let mut entries = Vec::with_capacity(layout.fields().len());
        for binding in layout.fields() {
            match self.resolver.resolve(card, binding.key) {
                Ok(value) => entries.push(Placed {
                    area: binding.area,
                    key: binding.key,
                    value,
                }),
                Err(e) if e.is_absent_field() && (binding.required || self.require_all) => {
                    return Err(Error::RequiredFieldMissing {
                        card: card.id().to_string(),
                        key: binding.key,
                        area: binding.area,
                        cause: Box::new(e),
                    })
                }
                Err(e) if e.is_absent_field() => {}
                Err(e) => return Err(e),
            }
        }
        Ok(Placement::new(card.id(), entries))
    }
}

/// Builds the placement of one card with default options.
pub fn build(card: &CardRecord, registry: &Registry, resolver: &Resolver) -> Result<Placement> {
    PlacementBuilder::new(registry, resolver).build(card)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::CardType;
    use crate::layout::LayoutDocument;
    use pretty_assertions::assert_eq;

    fn registry(content: &str) -> Registry {
        Registry::load([LayoutDocument::parse("test.toml", content).unwrap()]).unwrap()
    }

    const ITEM: &str = r#"
        [[layout]]
        for = "item"
        [[layout.field]]
        key = "name"
        area = "header_title"
        [[layout.field]]
        key = "cost"
        area = "header_right"
    "#;

    fn potion() -> CardRecord {
        CardRecord::new("potion", CardType::Item, 5)
            .unwrap()
            .with_name("Potion")
    }

    #[test]
    fn round_trip_keeps_layout_order() {
        let registry = registry(ITEM);
        let placement = build(&potion(), &registry, &Resolver::default()).unwrap();
        assert_eq!(
            placement.pairs().collect::<Vec<_>>(),
            vec![
                (Area::HeaderTitle, &Value::from("Potion")),
                (Area::HeaderRight, &Value::Int(5)),
            ]
        );
        assert_eq!(placement.card_id(), "potion");
    }

    #[test]
    fn missing_optional_field_is_omitted() {
        let content = format!(
            "{ITEM}\n[[layout.field]]\nkey = \"subtitle\"\narea = \"header_subtitle\"\n"
        );
        let registry = registry(&content);
        let placement = build(&potion(), &registry, &Resolver::default()).unwrap();
        assert_eq!(placement.len(), 2);
        assert_eq!(placement.get(Area::HeaderSubtitle), None);
    }

    #[test]
    fn unavailable_computation_is_omitted() {
        let registry = registry(
            "[[layout]]\nfor = \"item\"\n[[layout.field]]\nkey = \"stats\"\narea = \"body\"\n",
        );
        let placement = build(&potion(), &registry, &Resolver::default()).unwrap();
        assert!(placement.is_empty());
    }

    #[test]
    fn value_alias_is_placed() {
        let registry = registry(
            "[[layout]]\nfor = \"item\"\n[[layout.field]]\nkey = \"value\"\narea = \"footer_right\"\n",
        );
        let placement = build(&potion(), &registry, &Resolver::default()).unwrap();
        assert_eq!(placement.get(Area::FooterRight), Some(&Value::Int(5)));
        assert_eq!(placement.value_of(FieldKey::Value), Some(&Value::Int(5)));
    }

    #[test]
    fn unknown_type_has_no_layout() {
        let registry = registry(ITEM);
        let wolf = CardRecord::new("wolf", CardType::Monster, 0).unwrap();
        match build(&wolf, &registry, &Resolver::default()) {
            Err(Error::LayoutNotFound { card, card_type }) => {
                assert_eq!(card, "wolf");
                assert_eq!(card_type, CardType::Monster);
            }
            other => panic!("expected no layout, got {other:?}"),
        }
    }

    #[test]
    fn loot_cards_fall_back_to_the_deck_layout() {
        let registry = registry(
            "[[layout]]\nfor = \"loot\"\n[[layout.field]]\nkey = \"name\"\narea = \"header_title\"\n",
        );
        let placement = build(&potion(), &registry, &Resolver::default()).unwrap();
        assert_eq!(placement.get(Area::HeaderTitle), Some(&Value::from("Potion")));
    }

    #[test]
    fn own_type_layout_beats_deck_layout() {
        let registry = registry(&format!(
            "{ITEM}\n[[layout]]\nfor = \"loot\"\n[[layout.field]]\nkey = \"type\"\narea = \"body\"\n"
        ));
        let placement = build(&potion(), &registry, &Resolver::default()).unwrap();
        assert_eq!(placement.get(Area::Body), None);
        assert_eq!(placement.len(), 2);
    }

    #[test]
    fn required_field_missing_fails_the_card() {
        let registry = registry(
            "[[layout]]\nfor = \"item\"\n[[layout.field]]\nkey = \"text\"\narea = \"body\"\nrequired = true\n",
        );
        match build(&potion(), &registry, &Resolver::default()) {
            Err(Error::RequiredFieldMissing { card, key, area, cause }) => {
                assert_eq!(card, "potion");
                assert_eq!(key, FieldKey::Text);
                assert_eq!(area, Area::Body);
                assert!(matches!(*cause, Error::MissingField(FieldKey::Text)));
            }
            other => panic!("expected a required field error, got {other:?}"),
        }
    }

    #[test]
    fn require_all_applies_to_every_field() {
        let content = format!(
            "{ITEM}\n[[layout.field]]\nkey = \"subtitle\"\narea = \"header_subtitle\"\n"
        );
        let registry = registry(&content);
        let resolver = Resolver::default();
        let builder = PlacementBuilder::new(&registry, &resolver).require_all(true);
        assert!(matches!(
            builder.build(&potion()),
            Err(Error::RequiredFieldMissing { key: FieldKey::Subtitle, .. })
        ));
    }
}
