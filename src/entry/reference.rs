//! Reference edges of the program reference graph.

use std::hash::{Hash, Hasher};

use crate::entry::BehaviorEntry;

/// The call form a reference edge was produced from.
///
/// The kind disambiguates edges for presentation and for the heuristics that
/// care about delegation forms; it does not participate in edge identity, so
/// repeated identical call sites collapse to one logical edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum ReferenceKind {
    /// A plain method call.
    MethodCall,
    /// A field read or write.
    FieldAccess,
    /// An object creation invoking a constructor.
    Creation,
    /// A `this(...)` constructor delegation.
    ThisCall,
    /// A `super(...)` constructor delegation.
    SuperCall,
}

/// One edge of the reference graph: `context` references `entry`.
///
/// Equality and hashing cover the referenced entry and the context only;
/// see [`ReferenceKind`].
#[derive(Debug, Clone)]
pub struct Reference<E> {
    /// The referenced entry.
    pub entry: E,
    /// The method or constructor whose body contains the reference.
    pub context: BehaviorEntry,
    /// The call form this edge was produced from.
    pub kind: ReferenceKind,
}

impl<E> Reference<E> {
    /// Creates a reference edge.
    pub fn new(entry: E, context: BehaviorEntry, kind: ReferenceKind) -> Self {
        Reference {
            entry,
            context,
            kind,
        }
    }
}

impl<E: PartialEq> PartialEq for Reference<E> {
    fn eq(&self, other: &Self) -> bool {
        self.entry == other.entry && self.context == other.context
    }
}

impl<E: Eq> Eq for Reference<E> {}

impl<E: Hash> Hash for Reference<E> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.entry.hash(state);
        self.context.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::factories::new_method;

    #[test]
    fn test_kind_does_not_affect_identity() {
        let entry = new_method("none/a", "a", "()V");
        let context = BehaviorEntry::Method(new_method("none/b", "b", "()V"));

        let call = Reference::new(entry.clone(), context.clone(), ReferenceKind::MethodCall);
        let access = Reference::new(entry, context, ReferenceKind::FieldAccess);
        assert_eq!(call, access);

        let mut set = std::collections::HashSet::new();
        set.insert(call);
        assert!(!set.insert(access));
    }
}
