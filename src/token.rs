//! Closed enumerations with fixed string names.

use std::fmt;

/// A fieldless enum whose variants have fixed names in layout and card data.
///
/// Implemented through `#[derive(Token)]`.
pub trait Token: Sized + Copy + 'static {
    /// Name of the enumeration, used in error messages.
    const KIND: &'static str;
    /// Every variant, in declaration order.
    const ALL: &'static [Self];

    fn as_str(&self) -> &'static str;

    fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(Token::as_str).collect()
    }
}

/// A string that names no variant of a closed enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownToken {
    kind: &'static str,
    found: String,
}

impl UnknownToken {
    pub fn new(kind: &'static str, found: impl Into<String>) -> Self {
        Self { kind, found: found.into() }
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn found(&self) -> &str {
        &self.found
    }
}

impl fmt::Display for UnknownToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} `{}`", self.kind, self.found)
    }
}

impl std::error::Error for UnknownToken {}
