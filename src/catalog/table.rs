//! A registered table.

use std::sync::Arc;

use crate::schema::SchemaDescriptor;
use crate::storage::{DbFile, TableId};

/// Binds a table's storage file to its name and primary key.
///
/// The schema is not stored here; it is always read from the file.
#[derive(Debug, Clone)]
pub struct Table {
    file: Arc<dyn DbFile>,
    name: String,
    primary_key: String,
}

impl Table {
    pub fn new(file: Arc<dyn DbFile>, name: impl Into<String>, primary_key: impl Into<String>) -> Self {
        Self {
            file,
            name: name.into(),
            primary_key: primary_key.into(),
        }
    }

    pub fn id(&self) -> TableId {
        self.file.id()
    }

    pub fn file(&self) -> &Arc<dyn DbFile> {
        &self.file
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the primary key field; empty if the table has none.
    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }

    pub fn schema(&self) -> &SchemaDescriptor {
        self.file.schema()
    }
}
