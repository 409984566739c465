//! Symbol identities for classes, fields, methods, constructors and
//! arguments.
//!
//! Every structure in the crate - index keys, mapping keys, reference graph
//! nodes - identifies a symbol through one of the entry types defined here.
//! Entries are pure values compared structurally; there is no interning and
//! no identity semantics. The closed [`Entry`] union covers all five kinds,
//! so containment checks, translation and rename dispatch all branch
//! exhaustively and adding a kind is a compile-time event at every match
//! site.

mod argument;
mod behavior;
mod class;
mod constructor;
mod field;
mod method;
mod reference;

use std::fmt;

pub use argument::ArgumentEntry;
pub use behavior::BehaviorEntry;
pub use class::ClassEntry;
pub use constructor::{ConstructorEntry, CONSTRUCTOR_NAME};
pub use field::FieldEntry;
pub use method::MethodEntry;
pub use reference::{Reference, ReferenceKind};

/// Any symbol of an indexed program.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Entry {
    /// A class.
    Class(ClassEntry),
    /// A field.
    Field(FieldEntry),
    /// A method.
    Method(MethodEntry),
    /// A constructor.
    Constructor(ConstructorEntry),
    /// A method or constructor argument.
    Argument(ArgumentEntry),
}

impl Entry {
    /// The class this entry belongs to: the class itself for class entries,
    /// the declaring class for everything else.
    #[must_use]
    pub fn class_entry(&self) -> &ClassEntry {
        match self {
            Entry::Class(c) => c,
            Entry::Field(f) => f.class_entry(),
            Entry::Method(m) => m.class_entry(),
            Entry::Constructor(c) => c.class_entry(),
            Entry::Argument(a) => a.class_entry(),
        }
    }

    /// The name of the class this entry belongs to.
    #[must_use]
    pub fn class_name(&self) -> &str {
        self.class_entry().name()
    }

    /// The entry's own name; constructors have none.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Entry::Class(c) => Some(c.name()),
            Entry::Field(f) => Some(f.name()),
            Entry::Method(m) => Some(m.name()),
            Entry::Constructor(_) => None,
            Entry::Argument(a) => Some(a.name()),
        }
    }

    /// Returns the same entry re-targeted at a different class.
    ///
    /// For class entries this replaces the entry wholesale; for members it
    /// replaces the declaring class and keeps everything else.
    #[must_use]
    pub fn clone_to_class(&self, class: ClassEntry) -> Entry {
        match self {
            Entry::Class(_) => Entry::Class(class),
            Entry::Field(f) => Entry::Field(f.clone_to_class(class)),
            Entry::Method(m) => Entry::Method(m.clone_to_class(class)),
            Entry::Constructor(c) => Entry::Constructor(c.clone_to_class(class)),
            Entry::Argument(a) => Entry::Argument(a.clone_to_class(class)),
        }
    }
}

impl From<ClassEntry> for Entry {
    fn from(entry: ClassEntry) -> Self {
        Entry::Class(entry)
    }
}

impl From<FieldEntry> for Entry {
    fn from(entry: FieldEntry) -> Self {
        Entry::Field(entry)
    }
}

impl From<MethodEntry> for Entry {
    fn from(entry: MethodEntry) -> Self {
        Entry::Method(entry)
    }
}

impl From<ConstructorEntry> for Entry {
    fn from(entry: ConstructorEntry) -> Self {
        Entry::Constructor(entry)
    }
}

impl From<ArgumentEntry> for Entry {
    fn from(entry: ArgumentEntry) -> Self {
        Entry::Argument(entry)
    }
}

impl From<BehaviorEntry> for Entry {
    fn from(entry: BehaviorEntry) -> Self {
        match entry {
            BehaviorEntry::Method(m) => Entry::Method(m),
            BehaviorEntry::Constructor(c) => Entry::Constructor(c),
        }
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Class(c) => c.fmt(f),
            Entry::Field(e) => e.fmt(f),
            Entry::Method(m) => m.fmt(f),
            Entry::Constructor(c) => c.fmt(f),
            Entry::Argument(a) => a.fmt(f),
        }
    }
}
