//! SimpleDB - tuple schemas and the table catalog
//!
//! This crate provides the pieces of a disk-oriented relational engine that
//! every other component leans on to make sense of raw tuple bytes: the
//! [`schema::SchemaDescriptor`] describing a table's field layout, the
//! [`catalog::Catalog`] binding tables to their storage files, and the
//! [`db::Database`] context that owns the catalog, buffer pool and log file.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use simpledb::db::{Database, DatabaseConfig};
//! use simpledb::schema::SchemaDescriptor;
//! use simpledb::storage::HeapFile;
//! use simpledb::types::FieldType;
//!
//! let db = Database::open(DatabaseConfig::default()).unwrap();
//! let schema = SchemaDescriptor::new(&[FieldType::Int, FieldType::String], &["id", "name"]).unwrap();
//! let file = HeapFile::new("users.dat", schema).unwrap();
//! db.catalog().add_table(Arc::new(file), "users", "id");
//!
//! let id = db.catalog().table_id("users").unwrap();
//! assert_eq!(db.catalog().schema_of(id).unwrap().byte_size(), 132);
//! ```

pub mod buffer;
pub mod catalog;
pub mod db;
pub mod debug;
pub mod log;
pub mod schema;
pub mod storage;
pub mod types;
