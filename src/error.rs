//! Common error types.

use crate::data::{Attribute, CardType};
use crate::layout::{Area, FieldKey, SchemaViolation};
use crate::token::UnknownToken;

use itertools::Itertools;
use std::fmt;
use std::path::{Path, PathBuf};

/// A shortcut type equivalent to `Result<T, cardlay::Error>`.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error that occurs within the crate.
#[derive(Debug)]
pub enum Error {
    ConfigOpen(String, String),
    ConfigDeser(String, String),
    LayoutOpen(String, String),
    LayoutDeser(String, String),
    SourceOpen(String, String),
    SourceInfer(PathBuf),
    RecordRead(String),
    MissingVariable(&'static str),
    UnknownToken(UnknownToken),
    SchemaViolations(String, Vec<SchemaViolation>),
    MalformedRecord {
        card: Option<String>,
        attribute: String,
        reason: String,
    },
    DuplicateLayout {
        card_type: CardType,
        first: String,
        second: String,
    },
    LayoutNotFound {
        card: String,
        card_type: CardType,
    },
    MissingField(FieldKey),
    ComputationUnavailable {
        key: FieldKey,
        computation: &'static str,
        missing: Attribute,
    },
    RequiredFieldMissing {
        card: String,
        key: FieldKey,
        area: Area,
        cause: Box<Error>,
    },
    Backend(String),
    MutexLock(&'static str, String),
    ThreadJoin(usize),
    Many(Vec<Error>),
}

impl Error {
    pub fn config_open(path: &impl AsRef<Path>, e: impl ToString) -> Self {
        Self::ConfigOpen(path.as_ref().display().to_string(), e.to_string())
    }

    pub fn config_deser(path: &impl AsRef<Path>, e: impl ToString) -> Self {
        Self::ConfigDeser(path.as_ref().display().to_string(), e.to_string())
    }

    pub fn layout_open(path: &impl AsRef<Path>, e: impl ToString) -> Self {
        Self::LayoutOpen(path.as_ref().display().to_string(), e.to_string())
    }

    pub fn layout_deser(name: impl ToString, e: impl ToString) -> Self {
        Self::LayoutDeser(name.to_string(), e.to_string())
    }

    pub fn source_open(path: &impl AsRef<Path>, e: impl ToString) -> Self {
        Self::SourceOpen(path.as_ref().display().to_string(), e.to_string())
    }

    pub fn record_read(e: impl ToString) -> Self {
        Self::RecordRead(e.to_string())
    }

    pub fn no_env_variable(var: &'static str) -> Self {
        Self::MissingVariable(var)
    }

    pub fn malformed(card: Option<&str>, attribute: impl ToString, reason: impl ToString) -> Self {
        Self::MalformedRecord {
            card: card.map(String::from),
            attribute: attribute.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn backend(e: impl ToString) -> Self {
        Self::Backend(e.to_string())
    }

    pub fn mutex_lock(name: &'static str, e: impl ToString) -> Self {
        Self::MutexLock(name, e.to_string())
    }

    pub fn thread_join(id: usize) -> Self {
        Self::ThreadJoin(id)
    }

    /// Collapses a list of errors, keeping a lone error as is.
    pub fn many(mut errors: Vec<Error>) -> Self {
        if errors.len() == 1 {
            errors.remove(0)
        } else {
            Self::Many(errors)
        }
    }

    /// Whether this error only means a field has nothing to show.
    pub fn is_absent_field(&self) -> bool {
        matches!(
            self,
            Self::MissingField(_) | Self::ComputationUnavailable { .. }
        )
    }
}

impl From<UnknownToken> for Error {
    fn from(value: UnknownToken) -> Self {
        Self::UnknownToken(value)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ConfigOpen(path, e) => write!(f, "failed to open config {path}: {e}"),
            Error::ConfigDeser(path, e) => write!(f, "failed to read config {path}: {e}"),
            Error::LayoutOpen(path, e) => write!(f, "failed to open layouts {path}: {e}"),
            Error::LayoutDeser(name, e) => write!(f, "failed to read layouts {name}: {e}"),
            Error::SourceOpen(path, e) => write!(f, "failed to open card data {path}: {e}"),
            Error::SourceInfer(path) => write!(
                f,
                "could not infer data source type for {}",
                path.display()
            ),
            Error::RecordRead(e) => write!(f, "failed to read card: {e}"),
            Error::MissingVariable(var) => write!(f, "missing environment variable: {var}"),
            Error::UnknownToken(e) => write!(f, "{e}"),
            Error::SchemaViolations(name, violations) => write!(
                f,
                "layouts {name} violate the schema:\n{}",
                violations.iter().map(|v| format!("  {v}")).join("\n")
            ),
            Error::MalformedRecord { card: Some(card), attribute, reason } => {
                write!(f, "malformed card `{card}`: `{attribute}` {reason}")
            }
            Error::MalformedRecord { card: None, attribute, reason } => {
                write!(f, "malformed card: `{attribute}` {reason}")
            }
            Error::DuplicateLayout { card_type, first, second } => write!(
                f,
                "layout for `{card_type}` declared twice, in {first} and {second}"
            ),
            Error::LayoutNotFound { card, card_type } => {
                write!(f, "no layout for card `{card}` of type `{card_type}`")
            }
            Error::MissingField(key) => write!(f, "field `{key}` is missing"),
            Error::ComputationUnavailable { key, computation, missing } => write!(
                f,
                "field `{key}` cannot be computed by `{computation}`: `{missing}` is missing"
            ),
            Error::RequiredFieldMissing { card, key, area, cause } => write!(
                f,
                "card `{card}` requires field `{key}` for area `{area}`: {cause}"
            ),
            Error::Backend(e) => write!(f, "backend error: {e}"),
            Error::MutexLock(name, e) => write!(f, "failed to lock {name}: {e}"),
            Error::ThreadJoin(id) => write!(f, "failed to join worker {id}"),
            Error::Many(errors) => write!(f, "{}", errors.iter().join("\n")),
        }
    }
}

impl std::error::Error for Error {}
