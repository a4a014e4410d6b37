//! Built-in computed fields.

use crate::data::{Attribute, CardRecord, Value};
use crate::icons::IconTable;
use crate::resolve::Computation;
use crate::token::Token;

use itertools::Itertools;

/// `HP {hp} · ATK {atk} · DEF {def}`.
#[derive(Debug, Clone, Copy)]
pub struct Stats;

impl Computation for Stats {
    fn name(&self) -> &'static str {
        "stats"
    }

    fn depends_on(&self) -> &[Attribute] {
        &[Attribute::Hp, Attribute::Atk, Attribute::Def]
    }

    fn compute(&self, card: &CardRecord) -> Option<Value> {
        let (hp, atk, def) = (card.hp()?, card.atk()?, card.def()?);
        Some(Value::from(format!("HP {hp} · ATK {atk} · DEF {def}")))
    }
}

/// School, type, slot and class joined by ` • `.
#[derive(Debug, Clone, Copy)]
pub struct Meta;

impl Computation for Meta {
    fn name(&self) -> &'static str {
        "meta"
    }

    fn compute(&self, card: &CardRecord) -> Option<Value> {
        let parts = [
            card.school().map(|s| s.as_str()),
            Some(card.card_type().as_str()),
            card.slot().map(|s| s.as_str()),
            card.class().map(|c| c.as_str()),
        ];
        Some(Value::from(parts.into_iter().flatten().join(" • ")))
    }
}

/// Card id, followed by its tags when it has any.
#[derive(Debug, Clone, Copy)]
pub struct Footer;

impl Computation for Footer {
    fn name(&self) -> &'static str {
        "footer"
    }

    fn compute(&self, card: &CardRecord) -> Option<Value> {
        let footer = if card.tags().is_empty() {
            card.id().to_string()
        } else {
            format!("{} | {}", card.id(), card.tags().join(", "))
        };
        Some(Value::from(footer))
    }
}

/// Looks the card's icon up through an [`IconTable`].
#[derive(Debug, Clone)]
pub struct IconGlyph {
    icons: IconTable,
}

impl IconGlyph {
    pub fn new(icons: IconTable) -> Self {
        Self { icons }
    }
}

impl Computation for IconGlyph {
    fn name(&self) -> &'static str {
        "icon"
    }

    fn compute(&self, card: &CardRecord) -> Option<Value> {
        self.icons.glyph_for(card).map(Value::from)
    }
}
