//! Icon glyphs per card type and school, and the back glyph of each deck.

use crate::data::{CardRecord, CardType, School};
use crate::error::Result;

use std::collections::HashMap;

/// Glyphs used when a card names no icon of its own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IconTable {
    types: HashMap<CardType, String>,
    schools: HashMap<School, String>,
    backs: HashMap<CardType, String>,
    fallback: Option<String>,
}

impl IconTable {
    /// An empty table: only explicit card icons resolve.
    pub fn new() -> Self {
        Self::default()
    }

    /// School glyphs and the coin symbol of the stock deck.
    pub fn stock() -> Self {
        let mut table = Self::new();
        table.schools.insert(School::Attack, String::from("⚔️"));
        table.schools.insert(School::Defense, String::from("🛡️"));
        table.schools.insert(School::Spell, String::from("✨"));
        table.schools.insert(School::Utility, String::from("⚙️"));
        table.types.insert(CardType::Coin, String::from("◈"));
        table
    }

    /// Overrides entries from string-keyed maps, rejecting unknown names.
    /// Back glyphs named after a card type apply to that type's deck.
    pub fn extend_from_names(
        &mut self,
        types: &HashMap<String, String>,
        schools: &HashMap<String, String>,
        backs: &HashMap<String, String>,
    ) -> Result<()> {
        for (name, glyph) in types {
            self.types.insert(name.parse()?, glyph.clone());
        }
        for (name, glyph) in schools {
            self.schools.insert(name.parse()?, glyph.clone());
        }
        for (name, glyph) in backs {
            let card_type: CardType = name.parse()?;
            self.backs.insert(card_type.deck(), glyph.clone());
        }
        Ok(())
    }

    pub fn with_type(mut self, card_type: CardType, glyph: impl Into<String>) -> Self {
        self.types.insert(card_type, glyph.into());
        self
    }

    pub fn with_school(mut self, school: School, glyph: impl Into<String>) -> Self {
        self.schools.insert(school, glyph.into());
        self
    }

    pub fn with_back(mut self, deck: CardType, glyph: impl Into<String>) -> Self {
        self.backs.insert(deck.deck(), glyph.into());
        self
    }

    pub fn with_fallback(mut self, glyph: impl Into<String>) -> Self {
        self.fallback = Some(glyph.into());
        self
    }

    pub fn set_fallback(&mut self, glyph: Option<String>) {
        self.fallback = glyph;
    }

    pub fn for_type(&self, card_type: CardType) -> Option<&str> {
        self.types.get(&card_type).map(String::as_str)
    }

    pub fn for_school(&self, school: School) -> Option<&str> {
        self.schools.get(&school).map(String::as_str)
    }

    pub fn for_back(&self, deck: CardType) -> Option<&str> {
        self.backs.get(&deck.deck()).map(String::as_str)
    }

    /// Back of a card: its deck's back glyph, else its front icon.
    pub fn back_for<'a>(&'a self, card: &'a CardRecord) -> Option<&'a str> {
        self.for_back(card.card_type()).or_else(|| self.glyph_for(card))
    }

    /// Back of an empty sheet slot: the loot back, else the coin glyph.
    pub fn blank_back(&self) -> Option<&str> {
        self.for_back(CardType::Loot).or_else(|| self.for_type(CardType::Coin))
    }

    /// Icon of a card: its own icon, then its school glyph, then its type
    /// glyph, then the fallback glyph.
    pub fn glyph_for<'a>(&'a self, card: &'a CardRecord) -> Option<&'a str> {
        card.icon()
            .or_else(|| card.school().and_then(|s| self.for_school(s)))
            .or_else(|| self.for_type(card.card_type()))
            .or(self.fallback.as_deref())
    }
}
