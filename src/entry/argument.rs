//! Argument entries.

use std::fmt;

use crate::entry::{BehaviorEntry, ClassEntry};

/// Identifies a parameter of a method or constructor by owner, position and
/// current name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArgumentEntry {
    behavior: BehaviorEntry,
    index: usize,
    name: String,
}

impl ArgumentEntry {
    /// Creates an argument entry.
    pub fn new(behavior: BehaviorEntry, index: usize, name: impl Into<String>) -> Self {
        ArgumentEntry {
            behavior,
            index,
            name: name.into(),
        }
    }

    /// The owning method or constructor.
    #[must_use]
    pub fn behavior_entry(&self) -> &BehaviorEntry {
        &self.behavior
    }

    /// The class declaring the owning behavior.
    #[must_use]
    pub fn class_entry(&self) -> &ClassEntry {
        self.behavior.class_entry()
    }

    /// Zero-based parameter position.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// The argument name in the naming space this entry belongs to.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the same argument with its owner re-targeted at a different
    /// class.
    #[must_use]
    pub fn clone_to_class(&self, class: ClassEntry) -> ArgumentEntry {
        ArgumentEntry {
            behavior: self.behavior.clone_to_class(class),
            index: self.index,
            name: self.name.clone(),
        }
    }

    /// Returns the same argument under a different name.
    #[must_use]
    pub fn with_name(&self, name: impl Into<String>) -> ArgumentEntry {
        ArgumentEntry {
            behavior: self.behavior.clone(),
            index: self.index,
            name: name.into(),
        }
    }
}

impl fmt::Display for ArgumentEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}:{}]", self.behavior, self.index, self.name)
    }
}
