use crate::backend::Backend;
use crate::data::DataSource;
use crate::error::Result;
use crate::pipeline::{Collator, Outcome, Pipeline, Report, Visitor};

impl<V: Visitor> Pipeline<V> {
    /// Runs the whole batch on the calling thread.
    ///
    /// Cards that fail to read or place are reported to the visitor and
    /// skipped; only source and backend failures end the run.
    pub fn run<S, B>(&self, source: &mut S, backend: &mut B) -> Result<Report>
    where
        S: DataSource + ?Sized,
        B: Backend + ?Sized,
    {
        let result = self.run_internal(source, backend);
        self.visitor.on_finish(0, &result);
        result
    }

    fn run_internal<S, B>(&self, source: &mut S, backend: &mut B) -> Result<Report>
    where
        S: DataSource + ?Sized,
        B: Backend + ?Sized,
    {
        self.visitor.on_start(0);
        backend.begin()?;
        let builder = self.builder();
        let mut collator = Collator::new(backend);
        let mut total = 0;
        for (i, raw) in source.read()?.enumerate() {
            total += 1;
            let Some(card) = self.prepare(i, raw) else {
                collator.accept(i, Outcome::Skipped)?;
                continue;
            };
            self.visitor.on_card_start(0, i, &card);
            let outcome = match builder.build(&card) {
                Ok(placement) => {
                    self.visitor.on_card_ok(0, i, &card, &placement);
                    Outcome::Placed(card, placement)
                }
                Err(e) => {
                    self.visitor.on_card_err(0, i, card.id(), &e);
                    Outcome::Failed
                }
            };
            collator.accept(i, outcome)?;
        }
        self.visitor.on_total(total);
        collator.finish()
    }
}
