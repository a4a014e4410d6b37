//! Rendering backends consuming placements.
//!
//! A backend owns the mapping from named areas to physical regions; the
//! engine only tells it which value goes into which area.

mod text;

pub use text::{Identity, TextBackend};

use crate::data::CardRecord;
use crate::error::Result;
use crate::placement::Placement;

pub trait Backend {
    fn begin(&mut self) -> Result<()> {
        Ok(())
    }

    /// Renders every printed copy of one card.
    fn render(&mut self, card: &CardRecord, placement: &Placement) -> Result<()>;

    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<B: Backend + ?Sized> Backend for &mut B {
    fn begin(&mut self) -> Result<()> {
        (**self).begin()
    }

    fn render(&mut self, card: &CardRecord, placement: &Placement) -> Result<()> {
        (**self).render(card, placement)
    }

    fn finish(&mut self) -> Result<()> {
        (**self).finish()
    }
}
