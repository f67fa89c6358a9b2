//! Catalog error types.

use std::io;

use thiserror::Error;

use crate::schema::SchemaError;
use crate::storage::TableId;

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors raised by the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No table is registered under this name.
    #[error("table not found: {0}")]
    TableNotFound(String),

    /// No table is registered under this id.
    #[error("table not found: id {0}")]
    TableIdNotFound(TableId),

    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// A line of a catalog file could not be parsed.
    #[error("catalog parse error on line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl CatalogError {
    /// check if this error indicates the table doesn't exist
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CatalogError::TableNotFound(_) | CatalogError::TableIdNotFound(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        assert!(CatalogError::TableNotFound("users".into()).is_not_found());
        assert!(CatalogError::TableIdNotFound(TableId::new(7)).is_not_found());

        let parse = CatalogError::Parse {
            line: 3,
            reason: "missing '('".into(),
        };
        assert!(!parse.is_not_found());
        assert_eq!(parse.to_string(), "catalog parse error on line 3: missing '('");
    }
}
