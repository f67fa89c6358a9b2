//! Database context - owns the catalog, buffer pool and log file.

use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use tempfile::TempDir;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use tracing::Dispatch;

use crate::buffer::BufferPool;
use crate::catalog::{Catalog, CatalogError};
use crate::debug::LogConfig;
use crate::log::{LogError, LogFile, LOG_FILE_NAME};
use crate::schema::SchemaError;

/// Result type for database operations.
pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// Database errors.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("log file error: {0}")]
    Log(#[from] LogError),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Database configuration options.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Path of the write-ahead log file.
    pub log_path: PathBuf,
    /// Number of pages in the buffer pool.
    pub buffer_pool_pages: usize,
    /// Diagnostic output settings.
    pub logging: LogConfig,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            log_path: PathBuf::from(LOG_FILE_NAME),
            buffer_pool_pages: BufferPool::DEFAULT_PAGES,
            logging: LogConfig::default(),
        }
    }
}

impl DatabaseConfig {
    /// Create a new configuration with the given log file path.
    pub fn new(log_path: impl Into<PathBuf>) -> Self {
        Self {
            log_path: log_path.into(),
            ..Default::default()
        }
    }

    /// Set the log file path.
    pub fn log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_path = path.into();
        self
    }

    /// Set the buffer pool size in pages.
    pub fn buffer_pool_pages(mut self, pages: usize) -> Self {
        self.buffer_pool_pages = pages;
        self
    }

    /// Set the logging configuration.
    pub fn logging(mut self, logging: LogConfig) -> Self {
        self.logging = logging;
        self
    }

    fn validate(&self) -> DatabaseResult<()> {
        validate_pages(self.buffer_pool_pages)
    }
}

fn validate_pages(pages: usize) -> DatabaseResult<()> {
    if pages == 0 {
        return Err(DatabaseError::InvalidConfig(
            "buffer pool needs at least one page".into(),
        ));
    }
    Ok(())
}

/// The database context.
///
/// Holds the one catalog, buffer pool and log file of a running database.
/// Components that need any of them take a `&Database`. Diagnostics from
/// the database and its catalog go to the dispatcher built from the
/// database's own [`LogConfig`], not to the process-wide subscriber.
#[derive(Debug)]
pub struct Database {
    config: DatabaseConfig,
    dispatch: Dispatch,
    catalog: Catalog,
    buffer_pool: RwLock<Arc<BufferPool>>,
    log_file: LogFile,
}

impl Database {
    /// Open a database with the given configuration.
    pub fn open(config: DatabaseConfig) -> DatabaseResult<Self> {
        config.validate()?;
        let dispatch = config.logging.dispatch();

        tracing::dispatcher::with_default(&dispatch, || -> DatabaseResult<Self> {
            let log_file = LogFile::open(&config.log_path)?;
            let buffer_pool = Arc::new(BufferPool::new(config.buffer_pool_pages));

            tracing::info!(
                log = %config.log_path.display(),
                pages = config.buffer_pool_pages,
                "database opened"
            );

            Ok(Self {
                catalog: Catalog::with_dispatch(dispatch.clone()),
                buffer_pool: RwLock::new(buffer_pool),
                log_file,
                dispatch: dispatch.clone(),
                config,
            })
        })
    }

    /// Open a database, terminating the process if that fails.
    ///
    /// Nothing can run without a working log, so this is the entry point for
    /// binaries.
    pub fn open_or_exit(config: DatabaseConfig) -> Self {
        let dispatch = config.logging.dispatch();
        match Self::open(config) {
            Ok(db) => db,
            Err(e) => {
                tracing::dispatcher::with_default(&dispatch, || {
                    tracing::error!("failed to open database: {}", e);
                });
                eprintln!("Error opening database: {}", e);
                std::process::exit(1);
            }
        }
    }

    /// Create a database whose log file lives in a fresh temporary directory.
    pub fn for_testing() -> DatabaseResult<TestDatabase> {
        Self::for_testing_with_config(DatabaseConfig::default())
    }

    /// Like [`Database::for_testing`], keeping everything but the log path
    /// from `config`.
    pub fn for_testing_with_config(config: DatabaseConfig) -> DatabaseResult<TestDatabase> {
        let dir = TempDir::new()?;
        let config = config.log_path(dir.path().join(LOG_FILE_NAME));
        let db = Self::open(config)?;
        Ok(TestDatabase { db, _dir: dir })
    }

    /// The log file.
    pub fn log_file(&self) -> &LogFile {
        &self.log_file
    }

    /// The current buffer pool.
    pub fn buffer_pool(&self) -> Arc<BufferPool> {
        Arc::clone(&self.buffer_pool.read())
    }

    /// The catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Get the configuration.
    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// Run `f` with this database's logging configuration in effect.
    pub fn in_log_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }

    /// Most verbose level this database logs at.
    pub fn max_log_level(&self) -> LevelFilter {
        self.dispatch
            .max_level_hint()
            .unwrap_or_else(|| self.config.logging.verbosity.level_filter())
    }

    /// Replace the buffer pool with a new one of `pages` pages and return it.
    ///
    /// Pages cached by the old pool are lost. Holders of the old pool keep
    /// a working handle, but it is no longer the database's pool. A page
    /// count `open` would reject is rejected here too, leaving the current
    /// pool in place.
    pub fn reset_buffer_pool(&self, pages: usize) -> DatabaseResult<Arc<BufferPool>> {
        validate_pages(pages)?;
        let pool = Arc::new(BufferPool::new(pages));
        *self.buffer_pool.write() = Arc::clone(&pool);
        self.in_log_scope(|| tracing::debug!(pages, "buffer pool reset"));
        Ok(pool)
    }

    /// Rebuild the catalog, buffer pool and log file from scratch.
    pub fn reset(&mut self) -> DatabaseResult<()> {
        let log_file = self.in_log_scope(|| LogFile::open(&self.config.log_path))?;

        self.catalog = Catalog::with_dispatch(self.dispatch.clone());
        self.buffer_pool = RwLock::new(Arc::new(BufferPool::new(self.config.buffer_pool_pages)));
        self.log_file = log_file;

        self.in_log_scope(|| tracing::debug!("database reset"));
        Ok(())
    }

    /// Path of the log file.
    pub fn log_path(&self) -> &Path {
        &self.config.log_path
    }
}

/// A database backed by a temporary directory, removed on drop.
#[derive(Debug)]
pub struct TestDatabase {
    db: Database,
    _dir: TempDir,
}

impl Deref for TestDatabase {
    type Target = Database;

    fn deref(&self) -> &Database {
        &self.db
    }
}

impl DerefMut for TestDatabase {
    fn deref_mut(&mut self) -> &mut Database {
        &mut self.db
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debug::{LogSink, Verbosity};
    use crate::schema::SchemaDescriptor;
    use crate::storage::{DbFile, HeapFile};
    use crate::types::FieldType;

    fn heap_file(dir: &Path, name: &str) -> Arc<dyn DbFile> {
        let schema = SchemaDescriptor::new(&[FieldType::Int, FieldType::String], &["id", "name"])
            .unwrap();
        Arc::new(HeapFile::new(dir.join(name), schema).unwrap())
    }

    #[test]
    fn test_open_database() {
        let db = Database::for_testing().unwrap();
        assert!(db.catalog().is_empty());
        assert_eq!(db.buffer_pool().num_pages(), BufferPool::DEFAULT_PAGES);
        assert!(db.log_file().path().exists());
        assert_eq!(db.log_path(), db.log_file().path());
    }

    #[test]
    fn test_open_creates_log_file() {
        let dir = TempDir::new().unwrap();
        let config = DatabaseConfig::new(dir.path().join("wal")).buffer_pool_pages(8);
        let db = Database::open(config).unwrap();

        assert!(dir.path().join("wal").exists());
        assert_eq!(db.buffer_pool().num_pages(), 8);
    }

    #[test]
    fn test_open_fails_without_log() {
        let dir = TempDir::new().unwrap();
        let config = DatabaseConfig::new(dir.path().join("missing").join("log"));
        let result = Database::open(config);
        assert!(matches!(result, Err(DatabaseError::Log(LogError::Open { .. }))));
    }

    #[test]
    fn test_invalid_config() {
        let config = DatabaseConfig::default().buffer_pool_pages(0);
        let result = Database::for_testing_with_config(config);
        assert!(matches!(result, Err(DatabaseError::InvalidConfig(_))));
    }

    #[test]
    fn test_same_instances_returned() {
        let db = Database::for_testing().unwrap();
        assert!(Arc::ptr_eq(&db.buffer_pool(), &db.buffer_pool()));
        assert!(std::ptr::eq(db.catalog(), db.catalog()));
    }

    #[test]
    fn test_reset_buffer_pool() {
        let db = Database::for_testing().unwrap();
        let before = db.buffer_pool();

        let pool = db.reset_buffer_pool(3).unwrap();
        assert_eq!(pool.num_pages(), 3);
        assert!(Arc::ptr_eq(&pool, &db.buffer_pool()));
        assert!(!Arc::ptr_eq(&before, &db.buffer_pool()));
    }

    #[test]
    fn test_reset_buffer_pool_rejects_zero_pages() {
        let db = Database::for_testing().unwrap();
        let before = db.buffer_pool();

        let result = db.reset_buffer_pool(0);
        assert!(matches!(result, Err(DatabaseError::InvalidConfig(_))));
        assert!(Arc::ptr_eq(&before, &db.buffer_pool()));
    }

    #[test]
    fn test_reset_buffer_pool_huge_capacity() {
        let db = Database::for_testing().unwrap();
        let pool = db.reset_buffer_pool(usize::MAX).unwrap();
        assert_eq!(pool.num_pages(), usize::MAX);
        assert_eq!(pool.capacity_bytes(), usize::MAX);
    }

    #[test]
    fn test_each_database_keeps_its_log_config() {
        let quiet = Database::for_testing().unwrap();
        let config = DatabaseConfig::default().logging(LogConfig::new(Verbosity::Level(2), LogSink::Stderr));
        let chatty = Database::for_testing_with_config(config).unwrap();

        assert_eq!(quiet.max_log_level(), LevelFilter::WARN);
        assert_eq!(chatty.max_log_level(), LevelFilter::TRACE);

        assert!(!quiet.in_log_scope(|| tracing::enabled!(tracing::Level::DEBUG)));
        assert!(chatty.in_log_scope(|| tracing::enabled!(tracing::Level::DEBUG)));
        assert!(quiet.in_log_scope(|| tracing::enabled!(tracing::Level::WARN)));
    }

    #[test]
    fn test_reset() {
        let mut db = Database::for_testing().unwrap();
        let dir = TempDir::new().unwrap();
        db.catalog().add_table(heap_file(dir.path(), "users.dat"), "users", "id");
        assert_eq!(db.catalog().len(), 1);

        let before = db.buffer_pool();
        db.reset().unwrap();

        assert!(db.catalog().is_empty());
        assert!(db.catalog().lookup_by_name("users").is_err());
        assert!(!Arc::ptr_eq(&before, &db.buffer_pool()));
        assert_eq!(db.buffer_pool().num_pages(), BufferPool::DEFAULT_PAGES);
        assert!(db.log_file().path().exists());
    }

    #[test]
    fn test_catalog_through_context() {
        let db = Database::for_testing().unwrap();
        let dir = TempDir::new().unwrap();
        let file = heap_file(dir.path(), "users.dat");
        db.catalog().add_table(Arc::clone(&file), "users", "id");

        let id = db.catalog().table_id("users").unwrap();
        let schema = db.catalog().schema_of(id).unwrap();
        assert_eq!(schema.byte_size(), 132);
        assert_eq!(schema.index_of_field("name").unwrap(), 1);
        assert_eq!(db.catalog().primary_key_of(id).unwrap(), "id");
    }
}
