//! Storage handles as seen by the catalog.
//!
//! Page layout and file I/O live in the storage engine proper. The catalog
//! only needs two things from a table's file: a stable identifier to key
//! registrations on, and the schema of the tuples the file holds. The
//! [`DbFile`] trait is that seam; [`HeapFile`] is the plain file-backed
//! handle used by the catalog loader and the binary.

mod file;
mod types;

pub use file::{DbFile, HeapFile};
pub use types::TableId;
