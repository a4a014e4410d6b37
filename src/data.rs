//! Controls how card data is read and represented.

mod attr;
mod record;
pub mod source;
mod value;

pub use attr::{Attribute, CardClass, CardType, School, Slot};
pub use record::{CardRecord, RawCard};
pub use source::DataSource;
pub use value::Value;
