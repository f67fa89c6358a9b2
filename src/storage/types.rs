//! Identifier types for the storage layer.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a table's storage file.
///
/// The catalog keys registrations on this value, so it must stay the same
/// for the life of the file handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TableId(u64);

impl TableId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// raw numeric value
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl From<u64> for TableId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
