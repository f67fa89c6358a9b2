//! Tuple schemas.
//!
//! A [`SchemaDescriptor`] is the ordered list of typed fields every tuple of
//! a table shares. Everything that interprets raw tuple bytes starts here:
//! the descriptor gives field positions, types and the fixed tuple width.

mod descriptor;
mod entry;

pub use descriptor::{SchemaDescriptor, SchemaError, SchemaResult};
pub use entry::FieldEntry;
