use crate::backend::Backend;
use crate::data::{CardRecord, DataSource};
use crate::error::{Error, Result};
use crate::pipeline::{Collator, Outcome, Pipeline, Report, Visitor};
use crate::placement::PlacementBuilder;

use std::collections::VecDeque;
use std::num::NonZero;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Condvar, Mutex};
use std::thread;

macro_rules! lock {
    ($T:literal $lock:expr) => {
        $lock.lock().map_err(|e| Error::mutex_lock($T, e))?
    };
}

#[derive(Debug, Clone, Copy)]
pub struct ParallelismOptions {
    n_workers: usize,
    batch_size: usize,
}

impl ParallelismOptions {
    pub fn new(n_workers: NonZero<usize>) -> Self {
        let n_workers = Self::check_n_workers(n_workers);
        Self { n_workers, batch_size: n_workers * 2 }
    }

    pub fn n_workers(&self) -> usize {
        self.n_workers
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    fn check_n_workers(n_workers: NonZero<usize>) -> usize {
        let av_workers = thread::available_parallelism().unwrap_or(NonZero::<usize>::MIN);
        n_workers.min(av_workers).get()
    }

    pub fn set_batch_size(&mut self, batch_size: Option<NonZero<usize>>) {
        if let Some(batch_size) = batch_size {
            self.batch_size = batch_size.get();
        }
    }

    pub fn with_batch_size(mut self, batch_size: Option<NonZero<usize>>) -> Self {
        self.set_batch_size(batch_size);
        self
    }
}

type Built = (usize, Outcome);

impl<V: Visitor> Pipeline<V> {
    /// Runs the batch on a pool of workers.
    ///
    /// The calling thread reads cards and renders finished placements, in
    /// input order, so the backend sees the same sequence as with
    /// [`Pipeline::run`].
    pub fn run_parallel<S, B>(
        &self,
        source: &mut S,
        backend: &mut B,
        opt: ParallelismOptions,
    ) -> Result<Report>
    where
        S: DataSource + ?Sized,
        B: Backend + ?Sized,
    {
        let result = self.run_parallel_internal(source, backend, opt);
        self.visitor.on_finish(0, &result);
        result
    }

    fn run_parallel_internal<S, B>(
        &self,
        source: &mut S,
        backend: &mut B,
        opt: ParallelismOptions,
    ) -> Result<Report>
    where
        S: DataSource + ?Sized,
        B: Backend + ?Sized,
    {
        self.visitor.on_start(0);
        backend.begin()?;
        let queue = CardQueue::new(opt.batch_size);
        let (tx, rx) = mpsc::channel::<Built>();
        let mut collator = Collator::new(backend);

        thread::scope(|s| -> Result<()> {
            let workers: Vec<_> = (1..=opt.n_workers)
                .map(|id| {
                    let worker = Worker {
                        id,
                        queue: &queue,
                        builder: self.builder(),
                        visitor: &self.visitor,
                        tx: tx.clone(),
                    };
                    s.spawn(move || {
                        let result = worker.run();
                        worker.visitor.on_finish(id, &result);
                        result
                    })
                })
                .collect();

            let fed = self.feed(source, &queue, &rx, &mut collator);
            let closed = queue.done();
            drop(tx);
            let drained = fed.and_then(|()| rx.iter().try_for_each(|(i, o)| collator.accept(i, o)));

            let mut joined: Result<()> = Ok(());
            for (i, handle) in workers.into_iter().enumerate() {
                let result = handle.join().map_err(|_| Error::thread_join(i + 1));
                if let Err(e) = result.and_then(|r| r) {
                    joined = joined.and(Err(e));
                }
            }
            drained?;
            closed?;
            joined
        })?;

        collator.finish()
    }

    /// Reads every card into the queue, collating results as they arrive.
    fn feed<S, B>(
        &self,
        source: &mut S,
        queue: &CardQueue,
        rx: &Receiver<Built>,
        collator: &mut Collator<'_, B>,
    ) -> Result<()>
    where
        S: DataSource + ?Sized,
        B: Backend + ?Sized,
    {
        let mut total = 0;
        for (i, raw) in source.read()?.enumerate() {
            total += 1;
            match self.prepare(i, raw) {
                Some(card) => queue.push(i, card)?,
                None => collator.accept(i, Outcome::Skipped)?,
            }
            while let Ok((i, outcome)) = rx.try_recv() {
                collator.accept(i, outcome)?;
            }
        }
        self.visitor.on_total(total);
        Ok(())
    }
}

struct CardQueue {
    queue: Mutex<CardQueueState>,
    capacity: usize,
    cond: Condvar,
}

struct CardQueueState {
    queue: VecDeque<(usize, CardRecord)>,
    done: bool,
}

impl CardQueueState {
    fn new(capacity: usize) -> Self {
        Self { queue: VecDeque::with_capacity(capacity), done: false }
    }
}

impl CardQueue {
    fn new(capacity: usize) -> Self {
        Self {
            queue: Mutex::new(CardQueueState::new(capacity)),
            capacity,
            cond: Condvar::new(),
        }
    }

    fn push(&self, index: usize, card: CardRecord) -> Result<()> {
        let state = lock!("card queue" self.queue);
        let mut state = self
            .cond
            .wait_while(state, |s| s.queue.len() >= self.capacity)
            .map_err(|e| Error::mutex_lock("card queue", e))?;
        state.queue.push_back((index, card));
        self.cond.notify_one();
        Ok(())
    }

    fn pop(&self) -> Result<Option<(usize, CardRecord)>> {
        let state = lock!("card queue" self.queue);
        let mut state = self
            .cond
            .wait_while(state, |s| s.queue.is_empty() && !s.done)
            .map_err(|e| Error::mutex_lock("card queue", e))?;
        let card = state.queue.pop_front();
        self.cond.notify_all();
        Ok(card)
    }

    fn done(&self) -> Result<()> {
        let mut state = lock!("card queue" self.queue);
        state.done = true;
        self.cond.notify_all();
        Ok(())
    }
}

struct Worker<'a, V: Visitor> {
    id: usize,
    queue: &'a CardQueue,
    builder: PlacementBuilder<'a>,
    visitor: &'a V,
    tx: Sender<Built>,
}

impl<'a, V: Visitor> Worker<'a, V> {
    fn run(&self) -> Result<Report> {
        let mut report = Report::default();
        while let Some((i, card)) = self.queue.pop()? {
            report.read += 1;
            self.visitor.on_card_start(self.id, i, &card);
            let outcome = match self.builder.build(&card) {
                Ok(placement) => {
                    report.placed += 1;
                    self.visitor.on_card_ok(self.id, i, &card, &placement);
                    Outcome::Placed(card, placement)
                }
                Err(e) => {
                    report.failed += 1;
                    self.visitor.on_card_err(self.id, i, card.id(), &e);
                    Outcome::Failed
                }
            };
            if self.tx.send((i, outcome)).is_err() {
                break;
            }
        }
        Ok(report)
    }
}
