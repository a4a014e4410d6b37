//! # Cardlay
//!
//! A library to bind card data to the named areas of printable card templates.
//!
//! Layout documents map field keys onto template areas per card type. They
//! are validated once, indexed in a [`Registry`](layout::Registry) and then
//! combined with each [`CardRecord`](data::CardRecord) into an ordered
//! [`Placement`](placement::Placement) for a rendering backend.

extern crate self as cardlay;

pub mod backend;
#[cfg(feature = "cli")]
pub mod cli;
pub mod data;
pub mod error;
pub mod icons;
pub mod layout;
pub mod logs;
pub mod pipeline;
pub mod placement;
pub mod resolve;
pub mod token;

pub use cardlay_derive::Token;
pub use error::{Error, Result};
