//! Contains representations for card data.

use crate::data::{Attribute, CardClass, CardType, School, Slot, Value};
use crate::error::{Error, Result};
use crate::layout::FieldKey;
use crate::token::Token;

use itertools::Itertools;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// A card as read from a data source, before any validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawCard(pub HashMap<String, Value>);

impl RawCard {
    pub fn get(&self, attr: Attribute) -> Option<&Value> {
        self.0.get(attr.as_str()).filter(|v| !v.is_empty())
    }

    pub fn with(mut self, attr: &str, value: impl Into<Value>) -> Self {
        self.0.insert(attr.to_string(), value.into());
        self
    }
}

struct RawCardVisitor;

impl<'de> Visitor<'de> for RawCardVisitor {
    type Value = RawCard;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<A: de::MapAccess<'de>>(
        self,
        mut map: A,
    ) -> std::result::Result<Self::Value, A::Error> {
        let mut items = HashMap::new();
        while let Some((k, v)) = map.next_entry::<String, Value>()? {
            items.insert(k, v);
        }
        Ok(RawCard(items))
    }
}

impl<'de> Deserialize<'de> for RawCard {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(RawCardVisitor)
    }
}

/// One card's typed attributes, independent of any file format.
///
/// Records are immutable once built: `with_*` methods consume the record and
/// are meant for construction only.
#[derive(Debug, Clone, PartialEq)]
pub struct CardRecord {
    id: String,
    card_type: CardType,
    cost: i64,
    value: Option<i64>,
    class: Option<CardClass>,
    school: Option<School>,
    slot: Option<Slot>,
    tags: Vec<String>,
    name: Option<String>,
    subtitle: Option<String>,
    text: Option<String>,
    icon: Option<String>,
    hp: Option<i64>,
    atk: Option<i64>,
    def: Option<i64>,
    loot_budget: Option<i64>,
    count: usize,
}

impl CardRecord {
    pub fn new(id: impl Into<String>, card_type: CardType, cost: i64) -> Result<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(Error::malformed(None, Attribute::Id, "is empty"));
        }
        if cost < 0 {
            return Err(Error::malformed(
                Some(&id),
                Attribute::Cost,
                format!("must not be negative, got {cost}"),
            ));
        }
        Ok(Self {
            id,
            card_type,
            cost,
            value: None,
            class: None,
            school: None,
            slot: None,
            tags: Vec::new(),
            name: None,
            subtitle: None,
            text: None,
            icon: None,
            hp: None,
            atk: None,
            def: None,
            loot_budget: None,
            count: 1,
        })
    }

    /// Validates a raw card, naming the first attribute that is missing or ill-typed.
    pub fn from_raw(raw: &RawCard) -> Result<Self> {
        let id = raw
            .get(Attribute::Id)
            .and_then(Value::as_text)
            .ok_or_else(|| Error::malformed(None, Attribute::Id, "is missing"))?;
        let id = id.as_str();

        let card_type: CardType = required_token(raw, id, Attribute::Type)?;
        let cost = required_int(raw, id, Attribute::Cost)?;

        let mut card = Self::new(id, card_type, cost)?;
        card.value = optional_int(raw, id, Attribute::Value)?;
        card.class = optional_token(raw, id, Attribute::Class)?;
        card.school = optional_token(raw, id, Attribute::School)?;
        card.slot = optional_token(raw, id, Attribute::Slot)?;
        card.tags = tags(raw);
        card.name = optional_text(raw, Attribute::Name);
        card.subtitle = optional_text(raw, Attribute::Subtitle);
        card.text = optional_text(raw, Attribute::Text);
        card.icon = optional_text(raw, Attribute::Icon);
        card.hp = optional_int(raw, id, Attribute::Hp)?;
        card.atk = optional_int(raw, id, Attribute::Atk)?;
        card.def = optional_int(raw, id, Attribute::Def)?;
        card.loot_budget = optional_int(raw, id, Attribute::LootBudget)?;
        card.count = optional_int(raw, id, Attribute::Count)?
            .map(|n| n.max(1) as usize)
            .unwrap_or(1);
        Ok(card)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn card_type(&self) -> CardType {
        self.card_type
    }

    pub fn cost(&self) -> i64 {
        self.cost
    }

    /// The authored value, without falling back to the cost.
    pub fn value(&self) -> Option<i64> {
        self.value
    }

    pub fn class(&self) -> Option<CardClass> {
        self.class
    }

    pub fn school(&self) -> Option<School> {
        self.school
    }

    pub fn slot(&self) -> Option<Slot> {
        self.slot
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn subtitle(&self) -> Option<&str> {
        self.subtitle.as_deref()
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    pub fn hp(&self) -> Option<i64> {
        self.hp
    }

    pub fn atk(&self) -> Option<i64> {
        self.atk
    }

    pub fn def(&self) -> Option<i64> {
        self.def
    }

    pub fn loot_budget(&self) -> Option<i64> {
        self.loot_budget
    }

    /// Number of printed copies.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Reads an attribute as a value; `None` when the card does not carry it.
    pub fn get(&self, attr: Attribute) -> Option<Value> {
        let text = |s: &Option<String>| s.as_ref().map(|s| Value::from(s.as_str()));
        let token = |t: Option<&'static str>| t.map(Value::from);
        match attr {
            Attribute::Id => Some(Value::from(self.id.as_str())),
            Attribute::Type => Some(Value::from(self.card_type.as_str())),
            Attribute::Name => text(&self.name),
            Attribute::Subtitle => text(&self.subtitle),
            Attribute::Text => text(&self.text),
            Attribute::Icon => text(&self.icon),
            Attribute::Cost => Some(Value::Int(self.cost)),
            Attribute::Value => self.value.map(Value::Int),
            Attribute::Hp => self.hp.map(Value::Int),
            Attribute::Atk => self.atk.map(Value::Int),
            Attribute::Def => self.def.map(Value::Int),
            Attribute::LootBudget => self.loot_budget.map(Value::Int),
            Attribute::Tags if self.tags.is_empty() => None,
            Attribute::Tags => Some(Value::List(
                self.tags.iter().map(|t| Value::from(t.as_str())).collect(),
            )),
            Attribute::Class => token(self.class.as_ref().map(Token::as_str)),
            Attribute::School => token(self.school.as_ref().map(Token::as_str)),
            Attribute::Slot => token(self.slot.as_ref().map(Token::as_str)),
            Attribute::Count => Some(Value::Int(self.count as i64)),
        }
    }

    pub fn has(&self, attr: Attribute) -> bool {
        self.get(attr).is_some()
    }

    /// Whether the card carries the attribute backing a field key.
    ///
    /// Computed keys have no backing attribute, and aliases are not followed.
    pub fn has_field(&self, key: FieldKey) -> bool {
        key.attribute().is_some_and(|attr| self.has(attr))
    }

    pub fn with_value(mut self, value: i64) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_class(mut self, class: CardClass) -> Self {
        self.class = Some(class);
        self
    }

    pub fn with_school(mut self, school: School) -> Self {
        self.school = Some(school);
        self
    }

    pub fn with_slot(mut self, slot: Slot) -> Self {
        self.slot = Some(slot);
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).unique().collect();
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_stats(mut self, hp: i64, atk: i64, def: i64) -> Self {
        self.hp = Some(hp);
        self.atk = Some(atk);
        self.def = Some(def);
        self
    }

    pub fn with_hp(mut self, hp: i64) -> Self {
        self.hp = Some(hp);
        self
    }

    pub fn with_atk(mut self, atk: i64) -> Self {
        self.atk = Some(atk);
        self
    }

    pub fn with_def(mut self, def: i64) -> Self {
        self.def = Some(def);
        self
    }

    pub fn with_loot_budget(mut self, budget: i64) -> Self {
        self.loot_budget = Some(budget);
        self
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count.max(1);
        self
    }
}

impl TryFrom<&RawCard> for CardRecord {
    type Error = Error;

    fn try_from(raw: &RawCard) -> Result<Self> {
        Self::from_raw(raw)
    }
}

fn required_token<T>(raw: &RawCard, id: &str, attr: Attribute) -> Result<T>
where
    T: Token + FromStr<Err = crate::token::UnknownToken>,
{
    optional_token(raw, id, attr)?.ok_or_else(|| Error::malformed(Some(id), attr, "is missing"))
}

fn optional_token<T>(raw: &RawCard, id: &str, attr: Attribute) -> Result<Option<T>>
where
    T: Token + FromStr<Err = crate::token::UnknownToken>,
{
    match raw.get(attr) {
        None => Ok(None),
        Some(value) => {
            let text = value.as_text().unwrap_or_default();
            text.parse::<T>()
                .map(Some)
                .map_err(|e| Error::malformed(Some(id), attr, format!("is invalid: {e}")))
        }
    }
}

fn required_int(raw: &RawCard, id: &str, attr: Attribute) -> Result<i64> {
    optional_int(raw, id, attr)?.ok_or_else(|| Error::malformed(Some(id), attr, "is missing"))
}

fn optional_int(raw: &RawCard, id: &str, attr: Attribute) -> Result<Option<i64>> {
    match raw.get(attr) {
        None => Ok(None),
        Some(value) => value.as_int().map(Some).ok_or_else(|| {
            Error::malformed(
                Some(id),
                attr,
                format!("must be an integer, got `{value}`"),
            )
        }),
    }
}

fn optional_text(raw: &RawCard, attr: Attribute) -> Option<String> {
    raw.get(attr).and_then(Value::as_text)
}

fn tags(raw: &RawCard) -> Vec<String> {
    let items: Vec<String> = match raw.get(Attribute::Tags) {
        None => Vec::new(),
        Some(Value::List(items)) => items.iter().map(|v| v.to_string()).collect(),
        Some(value) => value.to_string().split(',').map(String::from).collect(),
    };
    items
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unique()
        .collect()
}
