//! Constructor entries.

use std::fmt;

use crate::entry::ClassEntry;

/// The name under which constructors appear in compiled programs and in the
/// mapping tree. Constructors carry no renameable name of their own.
pub const CONSTRUCTOR_NAME: &str = "<init>";

/// Identifies a constructor by its declaring class and descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConstructorEntry {
    class: ClassEntry,
    descriptor: String,
}

impl ConstructorEntry {
    /// Creates a constructor entry.
    pub fn new(class: ClassEntry, descriptor: impl Into<String>) -> Self {
        ConstructorEntry {
            class,
            descriptor: descriptor.into(),
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

    /// The constructor descriptor.
    #[must_use]
    pub fn descriptor(&self) -> &str {
        &self.descriptor
    }

    /// Returns the same constructor re-targeted at a different class.
    #[must_use]
    pub fn clone_to_class(&self, class: ClassEntry) -> ConstructorEntry {
        ConstructorEntry {
            class,
            descriptor: self.descriptor.clone(),
        }
    }
}

impl fmt::Display for ConstructorEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}{}", self.class, CONSTRUCTOR_NAME, self.descriptor)
    }
}
