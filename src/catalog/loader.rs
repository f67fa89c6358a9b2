//! Loading table definitions from a catalog file.
//!
//! A catalog file lists one table per line:
//!
//! ```text
//! # comment
//! users (id int pk, name string, age int)
//! orders (id int pk, user_id int)
//! ```
//!
//! Field types are `int` or `string`; `pk` marks the primary key field.
//! Each table's data lives next to the catalog file in `<name>.dat`.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::error::{CatalogError, CatalogResult};
use super::manager::Catalog;
use crate::schema::SchemaDescriptor;
use crate::storage::{DbFile, HeapFile};
use crate::types::FieldType;

/// Extension of table data files.
const DATA_FILE_EXT: &str = "dat";

/// A table definition parsed from one line of a catalog file.
#[derive(Debug, Clone, PartialEq)]
pub struct TableDef {
    pub name: String,
    pub schema: SchemaDescriptor,
    pub primary_key: String,
}

impl TableDef {
    /// Parse a single catalog line. Returns `None` for blank and comment lines.
    pub fn parse(line: &str) -> Result<Option<TableDef>, String> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let open = line.find('(').ok_or("missing '('")?;
        let close = line.rfind(')').ok_or("missing ')'")?;
        if close < open {
            return Err("')' before '('".to_string());
        }
        if !line[close + 1..].trim().is_empty() {
            return Err("unexpected text after ')'".to_string());
        }

        let name = line[..open].trim();
        if name.is_empty() {
            return Err("missing table name".to_string());
        }

        let mut types = Vec::new();
        let mut names = Vec::new();
        let mut primary_key = String::new();

        for field in line[open + 1..close].split(',') {
            let parts: Vec<&str> = field.split_whitespace().collect();
            let (field_name, type_name, modifier) = match parts.as_slice() {
                [n, t] => (*n, *t, None),
                [n, t, m] => (*n, *t, Some(*m)),
                _ => return Err(format!("malformed field '{}'", field.trim())),
            };

            let field_type: FieldType = type_name.parse().map_err(|e| format!("{e}"))?;
            match modifier {
                None => {}
                Some(m) if m.eq_ignore_ascii_case("pk") => {
                    if !primary_key.is_empty() {
                        return Err(format!("table '{name}' has more than one primary key"));
                    }
                    primary_key = field_name.to_string();
                }
                Some(m) => return Err(format!("unknown field modifier '{m}'")),
            }

            types.push(field_type);
            names.push(field_name);
        }

        let schema = SchemaDescriptor::new(&types, &names).map_err(|e| e.to_string())?;
        Ok(Some(TableDef {
            name: name.to_string(),
            schema,
            primary_key,
        }))
    }
}

impl Catalog {
    /// Read table definitions from the catalog file at `path` and register
    /// each one, using `open` to create its storage handle.
    ///
    /// `open` receives the data file path (`<dir>/<name>.dat`) and the
    /// table's schema. Returns the names of the loaded tables in file order.
    pub fn load_schema<F>(&self, path: impl AsRef<Path>, mut open: F) -> CatalogResult<Vec<String>>
    where
        F: FnMut(&Path, SchemaDescriptor) -> CatalogResult<Arc<dyn DbFile>>,
    {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();

        let mut loaded = Vec::new();
        for (i, line) in contents.lines().enumerate() {
            let def = TableDef::parse(line)
                .map_err(|reason| CatalogError::Parse { line: i + 1, reason })?;
            let Some(def) = def else { continue };

            let data_path: PathBuf = base_dir.join(format!("{}.{DATA_FILE_EXT}", def.name));
            let file = open(&data_path, def.schema)?;
            self.add_table(file, def.name.clone(), def.primary_key);
            loaded.push(def.name);
        }

        self.in_log_scope(|| {
            tracing::info!(path = %path.display(), tables = loaded.len(), "loaded catalog");
        });
        Ok(loaded)
    }

    /// Load a catalog file, backing every table with a [`HeapFile`].
    pub fn load_heap_files(&self, path: impl AsRef<Path>) -> CatalogResult<Vec<String>> {
        self.load_schema(path, |data_path, schema| {
            let file: Arc<dyn DbFile> = Arc::new(HeapFile::new(data_path, schema)?);
            Ok(file)
        })
    }
}
