//! The catalog: the registry of every table known to the database.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::Dispatch;
use ulid::Ulid;

use super::error::{CatalogError, CatalogResult};
use super::table::Table;
use crate::schema::SchemaDescriptor;
use crate::storage::{DbFile, TableId};

#[derive(Debug, Default)]
struct Tables {
    by_id: HashMap<TableId, Table>,
    by_name: HashMap<String, TableId>,
}

/// The catalog keeps track of all available tables and their schemas.
///
/// Registration and lookups may happen from different threads; the table
/// maps are guarded by a read-write lock so lookups never block each other.
#[derive(Debug, Default)]
pub struct Catalog {
    tables: RwLock<Tables>,
    dispatch: Option<Dispatch>,
}

impl Catalog {
    /// Create an empty catalog that logs to the current default subscriber.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty catalog that logs through `dispatch`.
    pub fn with_dispatch(dispatch: Dispatch) -> Self {
        Self {
            tables: RwLock::default(),
            dispatch: Some(dispatch),
        }
    }

    pub(super) fn in_log_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        match &self.dispatch {
            Some(dispatch) => tracing::dispatcher::with_default(dispatch, f),
            None => f(),
        }
    }

    /// Register a table.
    ///
    /// A table already registered with the same file id, or under the same
    /// name, is replaced.
    pub fn add_table(
        &self,
        file: Arc<dyn DbFile>,
        name: impl Into<String>,
        primary_key: impl Into<String>,
    ) {
        let table = Table::new(file, name, primary_key);
        let id = table.id();
        let mut tables = self.tables.write();

        if let Some(previous) = tables.by_id.remove(&id) {
            tables.by_name.remove(previous.name());
        }
        let replaced = tables.by_name.remove(table.name());
        if let Some(previous_id) = replaced {
            tables.by_id.remove(&previous_id);
        }

        self.in_log_scope(|| {
            if let Some(previous_id) = replaced {
                tracing::debug!(table = table.name(), %previous_id, "replacing table registered under the same name");
            }
            tracing::debug!(
                table = table.name(),
                %id,
                primary_key = table.primary_key(),
                "registered table"
            );
        });
        tables.by_name.insert(table.name().to_string(), id);
        tables.by_id.insert(id, table);
    }

    /// Register a table that has no primary key.
    pub fn add_table_without_key(&self, file: Arc<dyn DbFile>, name: impl Into<String>) {
        self.add_table(file, name, "");
    }

    /// Register a table under a freshly generated unique name, returning it.
    pub fn add_anonymous_table(&self, file: Arc<dyn DbFile>) -> String {
        let name = Ulid::new().to_string();
        self.add_table(file, name.clone(), "");
        name
    }

    /// Id of the table registered under `name`.
    pub fn table_id(&self, name: &str) -> CatalogResult<TableId> {
        self.tables
            .read()
            .by_name
            .get(name)
            .copied()
            .ok_or_else(|| CatalogError::TableNotFound(name.to_string()))
    }

    /// File of the table registered under `name`.
    pub fn lookup_by_name(&self, name: &str) -> CatalogResult<Arc<dyn DbFile>> {
        let tables = self.tables.read();
        let file = tables
            .by_name
            .get(name)
            .and_then(|id| tables.by_id.get(id))
            .map(|t| Arc::clone(t.file()));
        file.ok_or_else(|| CatalogError::TableNotFound(name.to_string()))
    }

    /// File of the table with the given id.
    pub fn lookup_by_id(&self, id: TableId) -> CatalogResult<Arc<dyn DbFile>> {
        self.with_table(id, |t| Arc::clone(t.file()))
    }

    /// Schema of the table with the given id, as reported by its file.
    pub fn schema_of(&self, id: TableId) -> CatalogResult<SchemaDescriptor> {
        self.with_table(id, |t| t.schema().clone())
    }

    /// Primary key field name of the table with the given id.
    pub fn primary_key_of(&self, id: TableId) -> CatalogResult<String> {
        self.with_table(id, |t| t.primary_key().to_string())
    }

    /// Name of the table with the given id.
    pub fn table_name(&self, id: TableId) -> CatalogResult<String> {
        self.with_table(id, |t| t.name().to_string())
    }

    /// Ids of all registered tables, in ascending order.
    pub fn table_ids(&self) -> Vec<TableId> {
        let mut ids: Vec<_> = self.tables.read().by_id.keys().copied().collect();
        ids.sort();
        ids
    }

    /// Check if a table with the given id is registered.
    pub fn contains(&self, id: TableId) -> bool {
        self.tables.read().by_id.contains_key(&id)
    }

    /// Number of registered tables.
    pub fn len(&self) -> usize {
        self.tables.read().by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every table from the catalog.
    pub fn clear(&self) {
        let mut tables = self.tables.write();
        tables.by_id.clear();
        tables.by_name.clear();
    }

    fn with_table<T>(&self, id: TableId, f: impl FnOnce(&Table) -> T) -> CatalogResult<T> {
        self.tables
            .read()
            .by_id
            .get(&id)
            .map(f)
            .ok_or(CatalogError::TableIdNotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldType;

    /// In-memory file handle with a chosen id.
    #[derive(Debug)]
    struct MemFile {
        id: TableId,
        schema: SchemaDescriptor,
    }

    impl DbFile for MemFile {
        fn id(&self) -> TableId {
            self.id
        }

        fn schema(&self) -> &SchemaDescriptor {
            &self.schema
        }
    }

    fn mem_file(id: u64, types: &[FieldType]) -> Arc<dyn DbFile> {
        Arc::new(MemFile {
            id: TableId::new(id),
            schema: SchemaDescriptor::anonymous(types).unwrap(),
        })
    }

    #[test]
    fn test_add_and_lookup_table() {
        let catalog = Catalog::new();
        let file = mem_file(1, &[FieldType::Int, FieldType::String]);
        catalog.add_table(file.clone(), "users", "unnamed0");

        let id = catalog.table_id("users").unwrap();
        assert_eq!(id, TableId::new(1));
        assert_eq!(catalog.lookup_by_name("users").unwrap().id(), id);
        assert_eq!(catalog.lookup_by_id(id).unwrap().id(), id);
        assert_eq!(catalog.table_name(id).unwrap(), "users");
        assert_eq!(catalog.primary_key_of(id).unwrap(), "unnamed0");
        assert_eq!(&catalog.schema_of(id).unwrap(), file.schema());
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_unknown_table() {
        let catalog = Catalog::new();
        assert!(catalog.lookup_by_name("ghost").unwrap_err().is_not_found());
        assert!(matches!(
            catalog.lookup_by_id(TableId::new(9)),
            Err(CatalogError::TableIdNotFound(_))
        ));
        assert!(catalog.schema_of(TableId::new(9)).is_err());
        assert!(catalog.primary_key_of(TableId::new(9)).is_err());
        assert!(catalog.table_name(TableId::new(9)).is_err());
    }

    #[test]
    fn test_same_id_overwrites() {
        let catalog = Catalog::new();
        catalog.add_table(mem_file(1, &[FieldType::Int]), "old", "a");
        catalog.add_table(mem_file(1, &[FieldType::String]), "new", "b");

        assert_eq!(catalog.len(), 1);
        assert!(catalog.lookup_by_name("old").is_err());
        let id = catalog.table_id("new").unwrap();
        assert_eq!(catalog.primary_key_of(id).unwrap(), "b");
        assert_eq!(catalog.schema_of(id).unwrap().field_type(0).unwrap(), FieldType::String);
    }

    #[test]
    fn test_same_name_overwrites() {
        let catalog = Catalog::new();
        catalog.add_table(mem_file(1, &[FieldType::Int]), "users", "");
        catalog.add_table(mem_file(2, &[FieldType::Int]), "users", "");

        assert_eq!(catalog.len(), 1);
        assert!(!catalog.contains(TableId::new(1)));
        assert_eq!(catalog.table_id("users").unwrap(), TableId::new(2));
    }

    #[test]
    fn test_table_ids_and_clear() {
        let catalog = Catalog::new();
        for (id, name) in [(3, "c"), (1, "a"), (2, "b")] {
            catalog.add_table_without_key(mem_file(id, &[FieldType::Int]), name);
        }

        assert_eq!(
            catalog.table_ids(),
            vec![TableId::new(1), TableId::new(2), TableId::new(3)]
        );
        assert_eq!(catalog.primary_key_of(TableId::new(2)).unwrap(), "");

        catalog.clear();
        assert!(catalog.is_empty());
        assert!(catalog.table_ids().is_empty());
    }

    #[test]
    fn test_anonymous_table_names_are_unique() {
        let catalog = Catalog::new();
        let a = catalog.add_anonymous_table(mem_file(1, &[FieldType::Int]));
        let b = catalog.add_anonymous_table(mem_file(2, &[FieldType::Int]));

        assert_ne!(a, b);
        assert_eq!(catalog.table_id(&a).unwrap(), TableId::new(1));
        assert_eq!(catalog.table_id(&b).unwrap(), TableId::new(2));
    }

    #[test]
    fn test_concurrent_readers() {
        let catalog = Arc::new(Catalog::new());
        catalog.add_table(mem_file(1, &[FieldType::Int]), "t", "");

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let catalog = Arc::clone(&catalog);
                std::thread::spawn(move || catalog.schema_of(TableId::new(1)).unwrap().byte_size())
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), 4);
        }
    }
}
