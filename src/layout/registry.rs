use crate::data::CardType;
use crate::error::{Error, Result};
use crate::layout::{Layout, LayoutDocument};
use crate::token::Token;

use std::collections::HashMap;

/// Validated layouts indexed by card type.
///
/// Built once and read-only afterwards; share it behind an `Arc` across
/// render workers.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    layouts: HashMap<CardType, Entry>,
}

#[derive(Debug, Clone)]
struct Entry {
    layout: Layout,
    source: String,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Indexes the layouts of already validated documents.
    ///
    /// Fails with [`Error::DuplicateLayout`] when two documents declare a
    /// layout for the same card type.
    pub fn load(documents: impl IntoIterator<Item = LayoutDocument>) -> Result<Self> {
        let mut registry = Self::new();
        for doc in documents {
            let source = doc.name().to_string();
            for layout in doc.into_layouts() {
                registry.insert(layout, &source)?;
            }
        }
        Ok(registry)
    }

    fn insert(&mut self, layout: Layout, source: &str) -> Result<()> {
        let card_type = layout.card_type();
        if let Some(existing) = self.layouts.get(&card_type) {
            return Err(Error::DuplicateLayout {
                card_type,
                first: existing.source.clone(),
                second: source.to_string(),
            });
        }
        self.layouts.insert(card_type, Entry { layout, source: source.to_string() });
        Ok(())
    }

    pub fn layout_for(&self, card_type: CardType) -> Option<&Layout> {
        self.layouts.get(&card_type).map(|e| &e.layout)
    }

    /// Name of the document that declared the layout for `card_type`.
    pub fn source_of(&self, card_type: CardType) -> Option<&str> {
        self.layouts.get(&card_type).map(|e| e.source.as_str())
    }

    /// Registered card types, in enumeration order.
    pub fn card_types(&self) -> impl Iterator<Item = CardType> + '_ {
        CardType::ALL
            .iter()
            .copied()
            .filter(|t| self.layouts.contains_key(t))
    }

    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }
}
