//! Field resolution: turns a field key into a value for one card.
//!
//! Every key is bound to a [`Strategy`] in a [`Resolver`]. Adding a computed
//! field means registering one more strategy; layouts and the placement
//! builder stay untouched.

mod computed;

pub use computed::{Footer, IconGlyph, Meta, Stats};

use crate::data::{Attribute, CardRecord, Value};
use crate::error::{Error, Result};
use crate::icons::IconTable;
use crate::layout::FieldKey;
use crate::token::Token;

use core::fmt::Debug;
use std::collections::HashMap;

/// A named computation deriving a field from card attributes.
pub trait Computation: Debug + Send + Sync {
    fn name(&self) -> &'static str;

    /// Attributes that must all be present for the computation to run.
    fn depends_on(&self) -> &[Attribute] {
        &[]
    }

    /// Computes the value; `None` when the card has nothing to show.
    fn compute(&self, card: &CardRecord) -> Option<Value>;
}

#[derive(Debug)]
pub enum Strategy {
    /// Reads one attribute verbatim.
    Direct(Attribute),
    /// Reads the first present attribute of the chain, in order.
    Alias(Vec<Attribute>),
    Computed(Box<dyn Computation>),
}

impl Strategy {
    pub fn computed(computation: impl Computation + 'static) -> Self {
        Self::Computed(Box::new(computation))
    }
}

/// Table of resolution strategies keyed by field key.
#[derive(Debug)]
pub struct Resolver {
    strategies: HashMap<FieldKey, Strategy>,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(IconTable::stock())
    }
}

impl Resolver {
    /// A resolver with no strategies; every key resolves as missing.
    pub fn empty() -> Self {
        Self { strategies: HashMap::new() }
    }

    /// A resolver with the built-in strategy for every field key.
    pub fn new(icons: IconTable) -> Self {
        let mut resolver = Self::empty();
        for key in FieldKey::ALL {
            if let Some(attr) = key.attribute() {
                resolver.register(*key, Strategy::Direct(attr));
            }
        }
        resolver.register(
            FieldKey::Value,
            Strategy::Alias(vec![Attribute::Value, Attribute::Cost]),
        );
        resolver.register(FieldKey::Stats, Strategy::computed(Stats));
        resolver.register(FieldKey::Meta, Strategy::computed(Meta));
        resolver.register(FieldKey::Footer, Strategy::computed(Footer));
        resolver.register(FieldKey::Icon, Strategy::computed(IconGlyph::new(icons)));
        resolver
    }

    /// Binds a strategy to a key, returning the one it replaces.
    pub fn register(&mut self, key: FieldKey, strategy: Strategy) -> Option<Strategy> {
        self.strategies.insert(key, strategy)
    }

    pub fn strategy(&self, key: FieldKey) -> Option<&Strategy> {
        self.strategies.get(&key)
    }

    /// Resolves one field of a card.
    ///
    /// Fails with [`Error::MissingField`] when the card has nothing for the
    /// key, or [`Error::ComputationUnavailable`] when a computation lacks one
    /// of its dependencies.
    pub fn resolve(&self, card: &CardRecord, key: FieldKey) -> Result<Value> {
        match self.strategies.get(&key) {
            None => Err(Error::MissingField(key)),
            Some(Strategy::Direct(attr)) => card.get(*attr).ok_or(Error::MissingField(key)),
            Some(Strategy::Alias(chain)) => chain
                .iter()
                .find_map(|attr| card.get(*attr))
                .ok_or(Error::MissingField(key)),
            Some(Strategy::Computed(computation)) => {
                if let Some(missing) = computation
                    .depends_on()
                    .iter()
                    .find(|attr| !card.has(**attr))
                {
                    return Err(Error::ComputationUnavailable {
                        key,
                        computation: computation.name(),
                        missing: *missing,
                    });
                }
                computation.compute(card).ok_or(Error::MissingField(key))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{CardType, School};
    use pretty_assertions::assert_eq;

    fn potion() -> CardRecord {
        CardRecord::new("potion", CardType::Item, 5)
            .unwrap()
            .with_name("Potion")
    }

    #[test]
    fn direct_fields_read_verbatim() {
        let resolver = Resolver::default();
        let card = potion();
        assert_eq!(resolver.resolve(&card, FieldKey::Name).unwrap(), Value::from("Potion"));
        assert_eq!(resolver.resolve(&card, FieldKey::Cost).unwrap(), Value::Int(5));
        assert_eq!(resolver.resolve(&card, FieldKey::Type).unwrap(), Value::from("item"));
    }

    #[test]
    fn absent_direct_field_is_missing() {
        let resolver = Resolver::default();
        assert!(matches!(
            resolver.resolve(&potion(), FieldKey::Subtitle),
            Err(Error::MissingField(FieldKey::Subtitle))
        ));
    }

    #[test]
    fn value_falls_back_to_cost() {
        let resolver = Resolver::default();
        assert_eq!(resolver.resolve(&potion(), FieldKey::Value).unwrap(), Value::Int(5));
        let card = potion().with_value(9);
        assert_eq!(resolver.resolve(&card, FieldKey::Value).unwrap(), Value::Int(9));
    }

    #[test]
    fn stats_without_combat_attributes_is_unavailable() {
        let resolver = Resolver::default();
        match resolver.resolve(&potion(), FieldKey::Stats) {
            Err(Error::ComputationUnavailable { key, computation, missing }) => {
                assert_eq!(key, FieldKey::Stats);
                assert_eq!(computation, "stats");
                assert_eq!(missing, Attribute::Hp);
            }
            other => panic!("expected an unavailable computation, got {other:?}"),
        }
    }

    #[test]
    fn stats_names_first_missing_dependency() {
        let resolver = Resolver::default();
        let card = CardRecord::new("wolf", CardType::Monster, 0)
            .unwrap()
            .with_hp(6)
            .with_atk(2);
        let err = resolver.resolve(&card, FieldKey::Stats).unwrap_err();
        assert!(matches!(
            err,
            Error::ComputationUnavailable { missing: Attribute::Def, .. }
        ));
    }

    #[test]
    fn stats_complete_once_defense_is_set() {
        let resolver = Resolver::default();
        let card = CardRecord::new("wolf", CardType::Monster, 0)
            .unwrap()
            .with_hp(6)
            .with_atk(2)
            .with_def(0);
        assert_eq!(card.def(), Some(0));
        assert_eq!(
            resolver.resolve(&card, FieldKey::Stats).unwrap(),
            Value::from("HP 6 · ATK 2 · DEF 0")
        );
    }

    #[test]
    fn stats_combines_combat_attributes() {
        let resolver = Resolver::default();
        let card = CardRecord::new("wolf", CardType::Monster, 0)
            .unwrap()
            .with_stats(6, 2, 1);
        assert_eq!(
            resolver.resolve(&card, FieldKey::Stats).unwrap(),
            Value::from("HP 6 · ATK 2 · DEF 1")
        );
    }

    #[test]
    fn icon_uses_the_glyph_table() {
        let resolver = Resolver::new(IconTable::new().with_school(School::Spell, "✨"));
        let card = potion().with_school(School::Spell);
        assert_eq!(resolver.resolve(&card, FieldKey::Icon).unwrap(), Value::from("✨"));
        assert!(matches!(
            resolver.resolve(&potion(), FieldKey::Icon),
            Err(Error::MissingField(FieldKey::Icon))
        ));
    }

    #[test]
    fn registering_replaces_a_strategy() {
        #[derive(Debug)]
        struct Shout;

        impl Computation for Shout {
            fn name(&self) -> &'static str {
                "shout"
            }

            fn depends_on(&self) -> &[Attribute] {
                &[Attribute::Name]
            }

            fn compute(&self, card: &CardRecord) -> Option<Value> {
                card.name().map(|n| Value::from(n.to_uppercase()))
            }
        }

        let mut resolver = Resolver::default();
        let old = resolver.register(FieldKey::Name, Strategy::computed(Shout));
        assert!(matches!(old, Some(Strategy::Direct(Attribute::Name))));
        assert_eq!(
            resolver.resolve(&potion(), FieldKey::Name).unwrap(),
            Value::from("POTION")
        );
    }

    #[test]
    fn empty_resolver_knows_nothing() {
        let resolver = Resolver::empty();
        assert!(resolver.strategy(FieldKey::Name).is_none());
        assert!(resolver.resolve(&potion(), FieldKey::Name).unwrap_err().is_absent_field());
    }

    #[test]
    fn every_key_has_a_default_strategy() {
        let resolver = Resolver::default();
        for key in FieldKey::ALL {
            assert!(resolver.strategy(*key).is_some(), "{key}");
        }
    }
}
