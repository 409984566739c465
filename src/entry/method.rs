//! Method entries.

use std::fmt;

use crate::entry::ClassEntry;

/// Identifies a method by its declaring class, name and descriptor.
///
/// The descriptor is part of the identity because overloads share a name;
/// every index and mapping keyed by methods keys on name plus descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodEntry {
    class: ClassEntry,
    name: String,
    descriptor: String,
}

impl MethodEntry {
    /// Creates a method entry.
    pub fn new(class: ClassEntry, name: impl Into<String>, descriptor: impl Into<String>) -> Self {
        MethodEntry {
            class,
            name: name.into(),
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

    /// The method name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The method descriptor.
    #[must_use]
    pub fn descriptor(&self) -> &str {
        &self.descriptor
    }

    /// Returns the same method re-targeted at a different class.
    #[must_use]
    pub fn clone_to_class(&self, class: ClassEntry) -> MethodEntry {
        MethodEntry {
            class,
            name: self.name.clone(),
            descriptor: self.descriptor.clone(),
        }
    }
}

impl fmt::Display for MethodEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}{}", self.class, self.name, self.descriptor)
    }
}
