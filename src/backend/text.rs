//! Plain text sheets, one block per printed card.

use crate::backend::Backend;
use crate::data::{Attribute, CardRecord};
use crate::error::{Error, Result};
use crate::icons::IconTable;
use crate::layout::FieldKey;
use crate::placement::Placement;
use crate::token::Token;

use regex::{Captures, Regex};
use std::io::Write;
use std::num::NonZero;

/// Names a printed card from a pattern such as `{type}-{id}`.
///
/// Placeholders name a card attribute or, failing that, a placed field key.
/// Unknown or absent placeholders expand to nothing.
#[derive(Debug, Clone)]
pub struct Identity {
    pattern: String,
    placeholder: Regex,
}

impl Default for Identity {
    fn default() -> Self {
        Self::new("{id}")
    }
}

impl Identity {
    pub fn new(pattern: impl Into<String>) -> Self {
        let placeholder =
            Regex::new(r"\{([^}]+)\}").expect("placeholder pattern is a valid regex");
        Self { pattern: pattern.into(), placeholder }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn identify(&self, card: &CardRecord, placement: &Placement) -> String {
        self.placeholder
            .replace_all(&self.pattern, |captures: &Captures| {
                let name = captures[1].trim();
                if let Ok(attr) = name.parse::<Attribute>() {
                    card.get(attr).map(|v| v.to_string()).unwrap_or_default()
                } else if let Ok(key) = name.parse::<FieldKey>() {
                    placement.value_of(key).map(|v| v.to_string()).unwrap_or_default()
                } else {
                    String::new()
                }
            })
            .to_string()
    }
}

/// Writes cards as text, grouped into sheets of `columns × rows` cards.
///
/// With backs enabled, every front page is followed by a back page listing
/// one back per slot, in slot order. Slots left empty on the last page still
/// get a blank back.
pub struct TextBackend<W: Write> {
    out: W,
    identity: Identity,
    per_page: usize,
    slot: usize,
    page: usize,
    backs: Option<Backs>,
}

struct Backs {
    icons: IconTable,
    pending: Vec<String>,
}

impl Backs {
    fn card(&self, card: &CardRecord) -> String {
        let mut line = format!("[{}]", card.card_type().deck().as_str());
        if let Some(glyph) = self.icons.back_for(card) {
            line.push(' ');
            line.push_str(glyph);
        }
        if card.cost() > 0 {
            line.push_str(&format!(" {}", card.cost()));
        }
        line
    }

    fn blank(&self) -> String {
        match self.icons.blank_back() {
            Some(glyph) => format!("[blank] {glyph}"),
            None => String::from("[blank]"),
        }
    }
}

impl<W: Write> TextBackend<W> {
    pub fn new(out: W, columns: NonZero<usize>, rows: NonZero<usize>) -> Self {
        Self {
            out,
            identity: Identity::default(),
            per_page: columns.get().saturating_mul(rows.get()),
            slot: 0,
            page: 0,
            backs: None,
        }
    }

    pub fn with_identity(mut self, identity: Identity) -> Self {
        self.identity = identity;
        self
    }

    /// Adds a back page after each front page, drawing glyphs from `icons`.
    pub fn with_backs(mut self, icons: IconTable) -> Self {
        self.backs = Some(Backs { icons, pending: Vec::new() });
        self
    }

    /// Number of sheets started so far.
    pub fn pages(&self) -> usize {
        self.page
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_card(&mut self, card: &CardRecord, placement: &Placement) -> std::io::Result<()> {
        if self.slot == 0 {
            self.page += 1;
            if self.page > 1 {
                writeln!(self.out)?;
            }
            writeln!(self.out, "== {}. front ==", self.page)?;
        }
        let name = self.identity.identify(card, placement);
        writeln!(self.out, "[{name}] {}", card.card_type().as_str())?;
        for placed in placement.entries() {
            writeln!(self.out, "  {:<16} {}", placed.area.as_str(), placed.value)?;
        }
        if let Some(backs) = &mut self.backs {
            let line = backs.card(card);
            backs.pending.push(line);
        }
        self.slot = (self.slot + 1) % self.per_page;
        if self.slot == 0 {
            self.write_backs()?;
        }
        Ok(())
    }

    /// Writes the back page of the current sheet, padding empty slots.
    fn write_backs(&mut self) -> std::io::Result<()> {
        let Some(backs) = &mut self.backs else {
            return Ok(());
        };
        if backs.pending.is_empty() {
            return Ok(());
        }
        let blank = backs.blank();
        let missing = self.per_page.saturating_sub(backs.pending.len());
        writeln!(self.out)?;
        writeln!(self.out, "== {}. back ==", self.page)?;
        for line in backs.pending.drain(..).chain(std::iter::repeat(blank).take(missing)) {
            writeln!(self.out, "{line}")?;
        }
        Ok(())
    }
}

impl<W: Write> Backend for TextBackend<W> {
    fn render(&mut self, card: &CardRecord, placement: &Placement) -> Result<()> {
        for _ in 0..card.count() {
            self.write_card(card, placement).map_err(Error::backend)?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.write_backs().map_err(Error::backend)?;
        self.slot = 0;
        self.out.flush().map_err(Error::backend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{CardType, Value};
    use crate::layout::{Area, LayoutDocument, Registry};
    use crate::placement::{build, Placed};
    use crate::resolve::Resolver;
    use pretty_assertions::assert_eq;

    fn nz(n: usize) -> NonZero<usize> {
        NonZero::new(n).unwrap()
    }

    fn render(cards: &[CardRecord], columns: usize, rows: usize) -> (String, usize) {
        render_with(TextBackend::new(Vec::new(), nz(columns), nz(rows)), cards)
    }

    fn render_with(mut backend: TextBackend<Vec<u8>>, cards: &[CardRecord]) -> (String, usize) {
        let doc = LayoutDocument::parse(
            "t",
            "[[layout]]\nfor = \"item\"\n[[layout.field]]\nkey = \"name\"\narea = \"header_title\"\n[[layout.field]]\nkey = \"cost\"\narea = \"header_right\"\n",
        )
        .unwrap();
        let registry = Registry::load([doc]).unwrap();
        let resolver = Resolver::default();
        for card in cards {
            let placement = build(card, &registry, &resolver).unwrap();
            backend.render(card, &placement).unwrap();
        }
        backend.finish().unwrap();
        let pages = backend.pages();
        (String::from_utf8(backend.into_inner()).unwrap(), pages)
    }

    fn potion() -> CardRecord {
        CardRecord::new("potion", CardType::Item, 5)
            .unwrap()
            .with_name("Potion")
    }

    #[test]
    fn writes_one_block_per_card() {
        let (text, pages) = render(&[potion()], 3, 3);
        assert_eq!(
            text,
            "== 1. front ==\n[potion] item\n  header_title     Potion\n  header_right     5\n"
        );
        assert_eq!(pages, 1);
    }

    #[test]
    fn copies_fill_pages() {
        let (text, pages) = render(&[potion().with_count(5)], 2, 1);
        assert_eq!(pages, 3);
        assert_eq!(text.matches("[potion]").count(), 5);
        assert!(text.contains("== 3. front =="));
    }

    #[test]
    fn backs_follow_each_front_page() {
        let backend = TextBackend::new(Vec::new(), nz(2), nz(1))
            .with_backs(IconTable::new().with_back(CardType::Loot, "🎒"));
        let (text, pages) = render_with(backend, &[potion().with_count(3)]);
        assert_eq!(pages, 2);
        assert_eq!(
            text,
            "\
== 1. front ==
[potion] item
  header_title     Potion
  header_right     5
[potion] item
  header_title     Potion
  header_right     5

== 1. back ==
[loot] 🎒 5
[loot] 🎒 5

== 2. front ==
[potion] item
  header_title     Potion
  header_right     5

== 2. back ==
[loot] 🎒 5
[blank] 🎒
"
        );
    }

    #[test]
    fn free_cards_show_no_cost_on_the_back() {
        let water = CardRecord::new("water", CardType::Item, 0).unwrap().with_name("Water");
        let backend = TextBackend::new(Vec::new(), nz(1), nz(1)).with_backs(IconTable::stock());
        let (text, _) = render_with(backend, &[water, potion()]);
        assert!(text.contains("== 1. back ==\n[loot]\n"));
        assert!(text.ends_with("== 2. back ==\n[loot] 5\n"));
    }

    #[test]
    fn no_backs_without_cards() {
        let backend = TextBackend::new(Vec::new(), nz(2), nz(2)).with_backs(IconTable::stock());
        let (text, pages) = render_with(backend, &[]);
        assert_eq!((text.as_str(), pages), ("", 0));
    }

    #[test]
    fn identity_expands_attributes_and_fields() {
        let card = potion();
        let placement = Placement::new(card.id(), Vec::new());
        let identity = Identity::new("{type}-{id}{nothing}");
        assert_eq!(identity.identify(&card, &placement), "item-potion");

        let identity = Identity::new("{stats}");
        let placement = Placement::new(
            card.id(),
            vec![Placed {
                area: Area::Body,
                key: FieldKey::Stats,
                value: Value::from("HP 1 · ATK 1 · DEF 1"),
            }],
        );
        assert_eq!(identity.identify(&card, &placement), "HP 1 · ATK 1 · DEF 1");
    }
}
