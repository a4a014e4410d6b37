//! Batch driver: reads cards from a source, builds their placements and hands
//! them to a backend, either on the calling thread or on a pool of workers.

mod parallel;
mod sequential;

pub use parallel::ParallelismOptions;

use crate::backend::Backend;
use crate::data::{CardRecord, RawCard};
use crate::error::{Error, Result};
use crate::layout::Registry;
use crate::placement::{Placement, PlacementBuilder};
use crate::resolve::Resolver;

use std::collections::BTreeMap;
use std::sync::Arc;

/// Hooks called while a batch runs.
///
/// `worker` is 0 for the calling thread and counts from 1 for pool workers.
/// Every hook defaults to doing nothing.
#[allow(unused_variables)]
pub trait Visitor: Sync {
    fn on_start(&self, worker: usize) {}

    /// A card could not be read or converted into a record.
    fn on_read_err(&self, index: usize, error: &Error) {}

    fn on_card_start(&self, worker: usize, index: usize, card: &CardRecord) {}

    fn on_card_ok(&self, worker: usize, index: usize, card: &CardRecord, placement: &Placement) {}

    fn on_card_err(&self, worker: usize, index: usize, card: &str, error: &Error) {}

    /// Total number of cards read from the source.
    fn on_total(&self, total: usize) {}

    fn on_finish(&self, worker: usize, result: &Result<Report>) {}
}

impl Visitor for () {}

impl<V: Visitor> Visitor for &V {
    fn on_start(&self, worker: usize) {
        (**self).on_start(worker)
    }

    fn on_read_err(&self, index: usize, error: &Error) {
        (**self).on_read_err(index, error)
    }

    fn on_card_start(&self, worker: usize, index: usize, card: &CardRecord) {
        (**self).on_card_start(worker, index, card)
    }

    fn on_card_ok(&self, worker: usize, index: usize, card: &CardRecord, placement: &Placement) {
        (**self).on_card_ok(worker, index, card, placement)
    }

    fn on_card_err(&self, worker: usize, index: usize, card: &str, error: &Error) {
        (**self).on_card_err(worker, index, card, error)
    }

    fn on_total(&self, total: usize) {
        (**self).on_total(total)
    }

    fn on_finish(&self, worker: usize, result: &Result<Report>) {
        (**self).on_finish(worker, result)
    }
}

/// Card counts of a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Report {
    pub read: usize,
    pub placed: usize,
    pub failed: usize,
}

pub struct Pipeline<V: Visitor = ()> {
    registry: Arc<Registry>,
    resolver: Arc<Resolver>,
    require_all: bool,
    visitor: V,
}

impl Pipeline {
    pub fn new(registry: Arc<Registry>, resolver: Arc<Resolver>) -> Self {
        Self { registry, resolver, require_all: false, visitor: () }
    }
}

impl<V: Visitor> Pipeline<V> {
    pub fn with_visitor<W: Visitor>(self, visitor: W) -> Pipeline<W> {
        Pipeline {
            registry: self.registry,
            resolver: self.resolver,
            require_all: self.require_all,
            visitor,
        }
    }

    pub fn require_all(mut self, require_all: bool) -> Self {
        self.require_all = require_all;
        self
    }

    pub fn visitor(&self) -> &V {
        &self.visitor
    }

    pub fn into_visitor(self) -> V {
        self.visitor
    }

    fn builder(&self) -> PlacementBuilder<'_> {
        PlacementBuilder::new(&self.registry, &self.resolver).require_all(self.require_all)
    }

    fn prepare(&self, index: usize, raw: Result<RawCard>) -> Option<CardRecord> {
        match raw.and_then(|raw| CardRecord::from_raw(&raw)) {
            Ok(card) => Some(card),
            Err(e) => {
                self.visitor.on_read_err(index, &e);
                None
            }
        }
    }
}

/// What became of one input card.
enum Outcome {
    Skipped,
    Failed,
    Placed(CardRecord, Placement),
}

/// Feeds outcomes to the backend in input order, whatever order they
/// arrive in.
struct Collator<'b, B: Backend + ?Sized> {
    backend: &'b mut B,
    pending: BTreeMap<usize, Outcome>,
    next: usize,
    report: Report,
}

impl<'b, B: Backend + ?Sized> Collator<'b, B> {
    fn new(backend: &'b mut B) -> Self {
        Self { backend, pending: BTreeMap::new(), next: 0, report: Report::default() }
    }

    fn accept(&mut self, index: usize, outcome: Outcome) -> Result<()> {
        self.pending.insert(index, outcome);
        while let Some(outcome) = self.pending.remove(&self.next) {
            self.next += 1;
            self.report.read += 1;
            match outcome {
                Outcome::Skipped | Outcome::Failed => self.report.failed += 1,
                Outcome::Placed(card, placement) => {
                    self.backend.render(&card, &placement)?;
                    self.report.placed += 1;
                }
            }
        }
        Ok(())
    }

    fn finish(self) -> Result<Report> {
        self.backend.finish()?;
        Ok(self.report)
    }
}
