//! Catalog module for table registration.
//!
//! The catalog maps each table's id to its storage file, display name and
//! primary key. Schemas are never copied into the catalog; they are read
//! from the registered file on demand.

mod error;
mod loader;
mod manager;
mod table;

pub use error::{CatalogError, CatalogResult};
pub use loader::TableDef;
pub use manager::Catalog;
pub use table::Table;
