//! Primitive field types and their fixed on-disk widths.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Width of a `STRING` field in bytes.
pub const STRING_LEN: usize = 128;

/// Width of an `INT` field in bytes.
pub const INT_LEN: usize = 4;

/// Field types a tuple can hold. Every type has a fixed byte length, which
/// is what makes tuples of one schema fixed-size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// 32-bit signed integer.
    Int,
    /// Fixed-width string.
    String,
}

impl FieldType {
    /// Number of bytes a value of this type occupies in a tuple.
    pub fn byte_len(&self) -> usize {
        match self {
            FieldType::Int => INT_LEN,
            FieldType::String => STRING_LEN,
        }
    }

    /// Name used when printing schemas.
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::Int => "INT",
            FieldType::String => "STRING",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

/// Error returned when a type name can't be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown field type: {0}")]
pub struct UnknownTypeError(pub String);

impl FromStr for FieldType {
    type Err = UnknownTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "int" => Ok(FieldType::Int),
            "string" => Ok(FieldType::String),
            other => Err(UnknownTypeError(other.to_string())),
        }
    }
}
