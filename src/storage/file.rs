//! The storage-handle seam and the file-backed handle.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::io;
use std::path::{Path, PathBuf};

use super::types::TableId;
use crate::schema::SchemaDescriptor;

/// A table's on-disk file, as far as the catalog is concerned.
pub trait DbFile: Send + Sync + fmt::Debug {
    /// Stable identifier of this file.
    fn id(&self) -> TableId;

    /// Schema of the tuples stored in this file.
    fn schema(&self) -> &SchemaDescriptor;
}

/// A heap file: an unordered collection of tuples in a single file.
///
/// Only the identity and schema of the file are handled here. The id is
/// derived from the absolute path, so two handles on the same file share
/// an id.
#[derive(Debug, Clone)]
pub struct HeapFile {
    path: PathBuf,
    schema: SchemaDescriptor,
    id: TableId,
}

impl HeapFile {
    /// Create a handle for the file at `path` holding tuples of `schema`.
    pub fn new(path: impl AsRef<Path>, schema: SchemaDescriptor) -> io::Result<Self> {
        let path = std::path::absolute(path.as_ref())?;
        let mut hasher = DefaultHasher::new();
        path.hash(&mut hasher);
        let id = TableId::new(hasher.finish());
        Ok(Self { path, schema, id })
    }

    /// Absolute path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DbFile for HeapFile {
    fn id(&self) -> TableId {
        self.id
    }

    fn schema(&self) -> &SchemaDescriptor {
        &self.schema
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldType;

    fn schema() -> SchemaDescriptor {
        SchemaDescriptor::anonymous(&[FieldType::Int, FieldType::String]).unwrap()
    }

    #[test]
    fn test_id_follows_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let a = HeapFile::new(dir.path().join("a.dat"), schema()).unwrap();
        let a_again = HeapFile::new(dir.path().join("a.dat"), schema()).unwrap();
        let b = HeapFile::new(dir.path().join("b.dat"), schema()).unwrap();

        assert_eq!(a.id(), a_again.id());
        assert_ne!(a.id(), b.id());
        assert!(a.path().is_absolute());
    }

    #[test]
    fn test_schema_is_exposed() {
        let file = HeapFile::new("t.dat", schema()).unwrap();
        assert_eq!(file.schema().byte_size(), 132);
    }
}
