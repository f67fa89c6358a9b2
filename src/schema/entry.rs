//! A single field of a tuple schema.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::FieldType;

/// One (type, name) pair of a schema.
///
/// Names are optional and not required to be unique within a schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldEntry {
    /// The type of the field.
    pub field_type: FieldType,
    /// The name of the field, if it has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl FieldEntry {
    /// Create a named field.
    pub fn new(field_type: FieldType, name: impl Into<String>) -> Self {
        Self {
            field_type,
            name: Some(name.into()),
        }
    }

    /// Create a field without a name.
    pub fn unnamed(field_type: FieldType) -> Self {
        Self {
            field_type,
            name: None,
        }
    }

    /// Name of the field as a borrowed str.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl fmt::Display for FieldEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name().unwrap_or("null"), self.field_type)
    }
}
