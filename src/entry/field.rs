//! Field entries.

use std::fmt;

use crate::entry::ClassEntry;

/// Identifies a field by its declaring class and name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldEntry {
    class: ClassEntry,
    name: String,
}

impl FieldEntry {
    /// Creates a field entry.
    pub fn new(class: ClassEntry, name: impl Into<String>) -> Self {
        FieldEntry {
            class,
            name: name.into(),
        }
    }

    /// The declaring class.
    #[must_use]
    pub fn class_entry(&self) -> &ClassEntry {
        &self.class
    }

    /// The declaring class name.
    #[must_use]
    pub fn class_name(&self) -> &str {
        self.class.name()
    }

    /// The field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the same field re-targeted at a different class.
    #[must_use]
    pub fn clone_to_class(&self, class: ClassEntry) -> FieldEntry {
        FieldEntry {
            class,
            name: self.name.clone(),
        }
    }
}

impl fmt::Display for FieldEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.class, self.name)
    }
}
