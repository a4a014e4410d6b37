//! Closed enumerations describing card attributes.

use crate::Token;

/// Category of a card, driving layout selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Token)]
#[token(kind = "card type")]
pub enum CardType {
    Item,
    Ability,
    Coin,
    Loot,
    Biome,
    Npc,
    Monster,
    Quest,
    Curse,
    Health,
}

impl CardType {
    /// The deck a card of this type is printed in.
    ///
    /// Items, abilities and coins share the loot deck; every other type is
    /// its own deck.
    pub fn deck(self) -> CardType {
        match self {
            Self::Item | Self::Ability | Self::Coin => Self::Loot,
            other => other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Token)]
#[token(kind = "class")]
pub enum CardClass {
    Mage,
    Warrior,
    Paladin,
    Hunter,
    Thief,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Token)]
pub enum School {
    Attack,
    Defense,
    Spell,
    Utility,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Token)]
pub enum Slot {
    OneHand,
    TwoHand,
    Shield,
    Armor,
    Head,
    Ring,
    Necklace,
}

/// An attribute a card record may carry, named as in card data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Token)]
pub enum Attribute {
    Id,
    Type,
    Name,
    Subtitle,
    Text,
    Icon,
    Cost,
    Value,
    Hp,
    Atk,
    Def,
    #[token(rename = "lootBudget")]
    LootBudget,
    Tags,
    Class,
    School,
    Slot,
    Count,
}
