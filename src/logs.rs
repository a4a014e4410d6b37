use crate::data::{CardRecord, CardType};
use crate::error::{Error, Result};
use crate::pipeline::{Report, Visitor};
use crate::placement::Placement;
use crate::token::Token;

use std::collections::BTreeMap;
use std::io::{stderr, Stderr, Write};
use std::sync::Mutex;

#[derive(Debug, Clone)]
pub enum LogEvent {
    Info(usize, String),
    Warn(usize, String),
    Error(usize, String),
    Done(String),
}

impl LogEvent {
    fn label(&self) -> &'static str {
        match self {
            Self::Info(..) => "INFO",
            Self::Warn(..) => "WARN",
            Self::Error(..) => "ERROR",
            Self::Done(..) => "DONE",
        }
    }

    fn color(&self) -> &'static str {
        use termion::color::{LightBlack, LightGreen, LightRed, LightYellow};
        match self {
            Self::Info(..) => LightBlack.fg_str(),
            Self::Warn(..) => LightYellow.fg_str(),
            Self::Error(..) => LightRed.fg_str(),
            Self::Done(..) => LightGreen.fg_str(),
        }
    }
}

/// Writes labelled log lines and keeps per-deck card counts.
///
/// Used as a pipeline [`Visitor`]; lines from worker threads are prefixed
/// with the worker id.
#[derive(Debug)]
pub struct Logger<W: Write + Send = Stderr> {
    out: Mutex<W>,
    color: bool,
    verbose: bool,
    decks: Mutex<BTreeMap<CardType, usize>>,
}

impl Logger<Stderr> {
    pub fn new_stderr() -> Self {
        let out = stderr();
        let color = termion::is_tty(&out);
        Self::new(out, color)
    }
}

impl<W: Write + Send> Logger<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self {
            out: Mutex::new(out),
            color,
            verbose: false,
            decks: Mutex::new(BTreeMap::new()),
        }
    }

    /// Also logs every card as it is placed.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn log(&self, event: LogEvent) -> Result<()> {
        let mut out = self.out.lock().map_err(|e| Error::mutex_lock("log output", e))?;
        self.write_event(&mut *out, &event).map_err(Error::backend)
    }

    fn write_event(&self, out: &mut W, event: &LogEvent) -> std::io::Result<()> {
        let (id, msg) = match event {
            LogEvent::Info(id, msg) | LogEvent::Warn(id, msg) | LogEvent::Error(id, msg) => {
                (*id, msg)
            }
            LogEvent::Done(msg) => (0, msg),
        };
        let id = if id > 0 { format!("{id:02}") } else { String::from("  ") };
        let label = event.label();
        if self.color {
            let id_color = termion::color::Fg(termion::color::LightBlack);
            let color = event.color();
            let reset = termion::style::Reset;
            writeln!(out, "{id_color}{id} {color}[{label}] {reset}{msg}")
        } else {
            writeln!(out, "{id} [{label}] {msg}")
        }
    }

    /// Printed copies placed so far, per deck.
    pub fn counts(&self) -> BTreeMap<CardType, usize> {
        self.decks.lock().map(|decks| decks.clone()).unwrap_or_default()
    }

    /// Writes the per-deck table of placed cards.
    pub fn summary(&self) -> Result<()> {
        let counts = self.counts();
        let total: usize = counts.values().sum();
        let mut out = self.out.lock().map_err(|e| Error::mutex_lock("log output", e))?;
        let mut table = || -> std::io::Result<()> {
            writeln!(out, "{:<10} {:>5}", "deck", "cards")?;
            for (deck, n) in &counts {
                writeln!(out, "{:<10} {n:>5}", deck.as_str())?;
            }
            writeln!(out, "{:<10} {total:>5}", "total")?;
            out.flush()
        };
        table().map_err(Error::backend)
    }

    pub fn into_inner(self) -> Result<W> {
        self.out.into_inner().map_err(|e| Error::mutex_lock("log output", e))
    }

    fn emit(&self, event: LogEvent) {
        // Log failures are dropped.
        let _ = self.log(event);
    }
}

impl<W: Write + Send> Visitor for Logger<W> {
    fn on_read_err(&self, index: usize, error: &Error) {
        self.emit(LogEvent::Warn(0, format!("skipping card #{}: {error}", index + 1)));
    }

    fn on_card_start(&self, worker: usize, _index: usize, card: &CardRecord) {
        if self.verbose {
            self.emit(LogEvent::Info(worker, format!("placing card `{}`...", card.id())));
        }
    }

    fn on_card_ok(&self, _worker: usize, _index: usize, card: &CardRecord, _placement: &Placement) {
        if let Ok(mut decks) = self.decks.lock() {
            *decks.entry(card.card_type().deck()).or_default() += card.count();
        }
    }

    fn on_card_err(&self, worker: usize, _index: usize, card: &str, error: &Error) {
        self.emit(LogEvent::Warn(worker, format!("card `{card}`: {error}")));
    }

    fn on_total(&self, total: usize) {
        if self.verbose {
            self.emit(LogEvent::Info(0, format!("read {total} cards")));
        }
    }

    fn on_finish(&self, worker: usize, result: &Result<Report>) {
        match (worker, result) {
            (0, Ok(report)) => self.emit(LogEvent::Done(format!(
                "{} of {} cards placed, {} failed",
                report.placed, report.read, report.failed
            ))),
            (_, Ok(report)) if self.verbose => self.emit(LogEvent::Info(
                worker,
                format!("done! {} cards placed", report.placed),
            )),
            (_, Ok(_)) => {}
            (_, Err(e)) => self.emit(LogEvent::Error(worker, e.to_string())),
        }
    }
}
