//! Behavior entries: methods and constructors as one closed set.
//!
//! Reference contexts, argument owners and several index structures accept
//! either a method or a constructor. Instead of a common supertype, the two
//! are folded into the closed [`BehaviorEntry`] union so every consumer
//! branches exhaustively.

use std::fmt;

use crate::entry::{ClassEntry, ConstructorEntry, MethodEntry, CONSTRUCTOR_NAME};

/// A method or a constructor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BehaviorEntry {
    /// A declared method.
    Method(MethodEntry),
    /// A declared constructor.
    Constructor(ConstructorEntry),
}

impl BehaviorEntry {
    /// The declaring class.
    #[must_use]
    pub fn class_entry(&self) -> &ClassEntry {
        match self {
            BehaviorEntry::Method(m) => m.class_entry(),
            BehaviorEntry::Constructor(c) => c.class_entry(),
        }
    }

    /// The declaring class name.
    #[must_use]
    pub fn class_name(&self) -> &str {
        self.class_entry().name()
    }

    /// The behavior name; constructors have none.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            BehaviorEntry::Method(m) => Some(m.name()),
            BehaviorEntry::Constructor(_) => None,
        }
    }

    /// The name under which this behavior is keyed in the mapping tree:
    /// the method name, or [`CONSTRUCTOR_NAME`] for constructors.
    #[must_use]
    pub fn mapping_name(&self) -> &str {
        match self {
            BehaviorEntry::Method(m) => m.name(),
            BehaviorEntry::Constructor(_) => CONSTRUCTOR_NAME,
        }
    }

    /// The behavior descriptor.
    #[must_use]
    pub fn descriptor(&self) -> &str {
        match self {
            BehaviorEntry::Method(m) => m.descriptor(),
            BehaviorEntry::Constructor(c) => c.descriptor(),
        }
    }

    /// `true` for constructors.
    #[must_use]
    pub fn is_constructor(&self) -> bool {
        matches!(self, BehaviorEntry::Constructor(_))
    }

    /// Returns the same behavior re-targeted at a different class.
    #[must_use]
    pub fn clone_to_class(&self, class: ClassEntry) -> BehaviorEntry {
        match self {
            BehaviorEntry::Method(m) => BehaviorEntry::Method(m.clone_to_class(class)),
            BehaviorEntry::Constructor(c) => BehaviorEntry::Constructor(c.clone_to_class(class)),
        }
    }
}

impl From<MethodEntry> for BehaviorEntry {
    fn from(entry: MethodEntry) -> Self {
        BehaviorEntry::Method(entry)
    }
}

impl From<ConstructorEntry> for BehaviorEntry {
    fn from(entry: ConstructorEntry) -> Self {
        BehaviorEntry::Constructor(entry)
    }
}

impl fmt::Display for BehaviorEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BehaviorEntry::Method(m) => m.fmt(f),
            BehaviorEntry::Constructor(c) => c.fmt(f),
        }
    }
}
