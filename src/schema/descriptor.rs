//! Tuple descriptors: the ordered field layout shared by every tuple of a table.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use super::entry::FieldEntry;
use crate::types::FieldType;

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Prefix used for the placeholder names of anonymous fields.
const UNNAMED_PREFIX: &str = "unnamed";

/// Describes the schema of a tuple.
///
/// A descriptor is an ordered, non-empty list of [`FieldEntry`] values and
/// never changes after construction. Two descriptors are equal when they
/// have the same number of fields and the same type at every position;
/// field names take no part in equality or hashing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "Vec<FieldEntry>", into = "Vec<FieldEntry>")]
pub struct SchemaDescriptor {
    entries: Vec<FieldEntry>,
}

impl SchemaDescriptor {
    /// Create a descriptor from parallel lists of types and names.
    ///
    /// Fails if the lists differ in length or are empty.
    pub fn new<S: AsRef<str>>(types: &[FieldType], names: &[S]) -> SchemaResult<Self> {
        if types.len() != names.len() {
            return Err(SchemaError::LengthMismatch {
                types: types.len(),
                names: names.len(),
            });
        }
        let entries = types
            .iter()
            .zip(names)
            .map(|(t, n)| {
                let name: &str = n.as_ref();
                FieldEntry::new(*t, name)
            })
            .collect();
        Self::from_entries(entries)
    }

    /// Like [`SchemaDescriptor::new`], but individual names may be absent.
    pub fn with_optional_names<S: AsRef<str>>(
        types: &[FieldType],
        names: &[Option<S>],
    ) -> SchemaResult<Self> {
        if types.len() != names.len() {
            return Err(SchemaError::LengthMismatch {
                types: types.len(),
                names: names.len(),
            });
        }
        let entries = types
            .iter()
            .zip(names)
            .map(|(t, n)| FieldEntry {
                field_type: *t,
                name: n.as_ref().map(|s| {
                    let s: &str = s.as_ref();
                    s.to_string()
                }),
            })
            .collect();
        Self::from_entries(entries)
    }

    /// Create a descriptor whose fields get positional placeholder names
    /// (`unnamed0`, `unnamed1`, ...).
    pub fn anonymous(types: &[FieldType]) -> SchemaResult<Self> {
        let entries = types
            .iter()
            .enumerate()
            .map(|(i, t)| FieldEntry::new(*t, format!("{UNNAMED_PREFIX}{i}")))
            .collect();
        Self::from_entries(entries)
    }

    /// Create a descriptor from an already assembled entry list.
    pub fn from_entries(entries: Vec<FieldEntry>) -> SchemaResult<Self> {
        if entries.is_empty() {
            return Err(SchemaError::Empty);
        }
        Ok(Self { entries })
    }

    /// Number of fields.
    pub fn field_count(&self) -> usize {
        self.entries.len()
    }

    /// Name of the `i`th field, which may be absent.
    pub fn field_name(&self, i: usize) -> SchemaResult<Option<&str>> {
        self.entry(i).map(FieldEntry::name)
    }

    /// Type of the `i`th field.
    pub fn field_type(&self, i: usize) -> SchemaResult<FieldType> {
        self.entry(i).map(|e| e.field_type)
    }

    /// The `i`th entry.
    pub fn entry(&self, i: usize) -> SchemaResult<&FieldEntry> {
        self.entries.get(i).ok_or(SchemaError::IndexOutOfRange {
            index: i,
            count: self.entries.len(),
        })
    }

    /// Index of the first field called `name`.
    pub fn index_of_field(&self, name: &str) -> SchemaResult<usize> {
        self.entries
            .iter()
            .position(|e| e.name() == Some(name))
            .ok_or_else(|| SchemaError::FieldNotFound(name.to_string()))
    }

    /// Size in bytes of a tuple with this schema.
    pub fn byte_size(&self) -> usize {
        self.entries.iter().map(|e| e.field_type.byte_len()).sum()
    }

    /// Concatenate two descriptors: all of `first`'s fields, then all of
    /// `second`'s.
    ///
    /// A field of `second` whose name already appears in `first` gets `"1"`
    /// appended in the result, repeatedly, until the name no longer appears
    /// in `first`. Neither input is modified.
    pub fn merge(first: &SchemaDescriptor, second: &SchemaDescriptor) -> SchemaDescriptor {
        let mut entries = Vec::with_capacity(first.field_count() + second.field_count());
        entries.extend(first.entries.iter().cloned());

        for entry in &second.entries {
            let mut entry = entry.clone();
            if let Some(name) = entry.name.as_mut() {
                while first.entries.iter().any(|e| e.name() == Some(name.as_str())) {
                    name.push('1');
                }
            }
            entries.push(entry);
        }

        SchemaDescriptor { entries }
    }

    /// Iterate over the fields in order.
    pub fn iter(&self) -> std::slice::Iter<'_, FieldEntry> {
        self.entries.iter()
    }

    /// Iterate over the field types in order.
    pub fn types(&self) -> impl Iterator<Item = FieldType> + '_ {
        self.entries.iter().map(|e| e.field_type)
    }

    /// Iterate over the field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = Option<&str>> + '_ {
        self.entries.iter().map(FieldEntry::name)
    }
}

impl PartialEq for SchemaDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len() && self.types().eq(other.types())
    }
}

impl Eq for SchemaDescriptor {}

impl Hash for SchemaDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.entries.len().hash(state);
        for t in self.types() {
            t.hash(state);
        }
    }
}

impl<'a> IntoIterator for &'a SchemaDescriptor {
    type Item = &'a FieldEntry;
    type IntoIter = std::slice::Iter<'a, FieldEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl TryFrom<Vec<FieldEntry>> for SchemaDescriptor {
    type Error = SchemaError;

    fn try_from(entries: Vec<FieldEntry>) -> Result<Self, Self::Error> {
        Self::from_entries(entries)
    }
}

impl From<SchemaDescriptor> for Vec<FieldEntry> {
    fn from(schema: SchemaDescriptor) -> Self {
        schema.entries
    }
}

impl fmt::Display for SchemaDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}({})", entry.field_type, entry.name().unwrap_or("null"))?;
        }
        Ok(())
    }
}

/// Schema-related errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("type and name lists differ in length: {types} types, {names} names")]
    LengthMismatch { types: usize, names: usize },

    #[error("a schema needs at least one field")]
    Empty,

    #[error("field index {index} out of range for schema with {count} fields")]
    IndexOutOfRange { index: usize, count: usize },

    #[error("field not found: {0}")]
    FieldNotFound(String),
}

impl SchemaError {
    /// Check if this error reports a missing field or index.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            SchemaError::FieldNotFound(_) | SchemaError::IndexOutOfRange { .. }
        )
    }
}
