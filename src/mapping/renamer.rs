//! Index-guided mutation of the mapping tree.
//!
//! [`MappingsRenamer`] is the only writer of a [`Mappings`] forest. Every
//! operation validates its inputs and checks name collisions before touching
//! any state, so a returned error leaves the tree exactly as it was, and
//! every successful operation leaves the tree with its invariants intact.
//! Method operations propagate through the related-implementation closure
//! computed by the [`ProgramIndex`], bridge counterparts included, because a
//! polymorphically related group of methods only stays consistent if it is
//! renamed as one.

use std::collections::BTreeSet;

use crate::{
    analysis::ProgramIndex,
    entry::{ArgumentEntry, ClassEntry, FieldEntry, MethodEntry},
    mapping::{ArgumentMapping, FieldMapping, Mappings, MethodMapping},
    Result,
};

fn validate_identifier(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    if valid_start && chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Ok(());
    }
    Err(crate::Error::InvalidIdentifier(name.to_string()))
}

fn validate_class_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(crate::Error::InvalidIdentifier(name.to_string()));
    }
    for segment in name.split('/') {
        validate_identifier(segment)
            .map_err(|_| crate::Error::InvalidIdentifier(name.to_string()))?;
    }
    Ok(())
}

/// Applies rename, removal, mark and move operations to a mapping tree,
/// guided by the cross-reference index.
#[derive(Debug)]
pub struct MappingsRenamer<'a> {
    index: &'a ProgramIndex,
    mappings: &'a mut Mappings,
}

impl<'a> MappingsRenamer<'a> {
    /// Creates a renamer over the given index and tree.
    pub fn new(index: &'a ProgramIndex, mappings: &'a mut Mappings) -> Self {
        MappingsRenamer { index, mappings }
    }

    // classes

    /// Assigns the deobfuscated name of a class.
    ///
    /// Nested classes take a simple name and are stored in their outer
    /// scope; top-level classes take a full, optionally packaged name.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid names and for collisions with an
    /// existing deobfuscated name in the same scope.
    pub fn set_class_name(&mut self, obf: &ClassEntry, deobf_name: &str) -> Result<()> {
        if obf.is_inner_class() {
            validate_identifier(deobf_name)?;
            let outer = ClassEntry::new(obf.outer_class_name().unwrap_or_default());
            let simple = obf.simple_name();
            if let Some(scope) = self.mappings.scope(&outer) {
                if let Some(taken) = scope.inner_class_by_deobf(deobf_name) {
                    if taken.obf_name() != simple {
                        return Err(crate::Error::NameConflict {
                            scope: outer.name().to_string(),
                            name: deobf_name.to_string(),
                        });
                    }
                }
            }
            let scope = self.mappings.scope_or_create_mut(&outer);
            scope.set_inner_class_name(simple, Some(deobf_name));
        } else {
            validate_class_name(deobf_name)?;
            if let Some(taken) = self.mappings.obf_root_name(deobf_name) {
                if taken != obf.name() {
                    return Err(crate::Error::NameConflict {
                        scope: String::new(),
                        name: deobf_name.to_string(),
                    });
                }
            }
            self.mappings.set_root_deobf_name(obf.name(), Some(deobf_name));
        }
        Ok(())
    }

    /// Clears the deobfuscated name of a class, keeping any nested
    /// mappings.
    pub fn remove_class_mapping(&mut self, obf: &ClassEntry) {
        if obf.is_inner_class() {
            let outer = ClassEntry::new(obf.outer_class_name().unwrap_or_default());
            if let Some(scope) = self.mappings.scope_mut(&outer) {
                scope.set_inner_class_name(obf.simple_name(), None);
            }
        } else if self.mappings.class_by_obf(obf.name()).is_some() {
            self.mappings.set_root_deobf_name(obf.name(), None);
        }
    }

    /// Freezes a class as already named, using its obfuscated name as the
    /// deobfuscated one.
    ///
    /// # Errors
    ///
    /// Returns an error if the synthesized name collides in its scope.
    pub fn mark_class_as_deobfuscated(&mut self, obf: &ClassEntry) -> Result<()> {
        let name = if obf.is_inner_class() {
            obf.simple_name().to_string()
        } else {
            obf.name().to_string()
        };
        self.set_class_name(obf, &name)
    }

    // fields

    /// Assigns the deobfuscated name of a field.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid names and for collisions with another
    /// field's deobfuscated name in the class.
    pub fn set_field_name(&mut self, obf: &FieldEntry, deobf_name: &str) -> Result<()> {
        validate_identifier(deobf_name)?;
        if let Some(scope) = self.mappings.scope(obf.class_entry()) {
            if let Some(taken) = scope.obf_field_name(deobf_name) {
                if taken != obf.name() {
                    return Err(crate::Error::NameConflict {
                        scope: obf.class_name().to_string(),
                        name: deobf_name.to_string(),
                    });
                }
            }
        }
        let scope = self.mappings.scope_or_create_mut(obf.class_entry());
        scope.set_field_name(obf.name(), deobf_name);
        Ok(())
    }

    /// Removes the mapping of a field, if any.
    pub fn remove_field_mapping(&mut self, obf: &FieldEntry) {
        if let Some(scope) = self.mappings.scope_mut(obf.class_entry()) {
            scope.remove_field_mapping(obf.name());
        }
    }

    /// Freezes a field as already named.
    ///
    /// # Errors
    ///
    /// Returns an error if the synthesized name collides in the class.
    pub fn mark_field_as_deobfuscated(&mut self, obf: &FieldEntry) -> Result<()> {
        self.set_field_name(obf, &obf.name().to_string())
    }

    // methods

    /// Assigns the deobfuscated name of a method and of every method in its
    /// related-implementation closure, bridge counterparts included, as one
    /// operation.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid names, for a closure that cannot be
    /// computed (ambiguous interface methods) and for collisions in any
    /// affected scope; nothing is renamed in the error case.
    pub fn set_method_tree_name(&mut self, obf: &MethodEntry, deobf_name: &str) -> Result<()> {
        validate_identifier(deobf_name)?;
        let entries = self.method_closure(obf)?;

        for entry in &entries {
            if let Some(scope) = self.mappings.scope(entry.class_entry()) {
                if let Some(taken) = scope.method_by_deobf(deobf_name, entry.descriptor()) {
                    if taken.obf_name() != entry.name() {
                        return Err(crate::Error::NameConflict {
                            scope: entry.class_name().to_string(),
                            name: deobf_name.to_string(),
                        });
                    }
                }
            }
        }

        for entry in &entries {
            let scope = self.mappings.scope_or_create_mut(entry.class_entry());
            scope.set_method_name(entry.name(), entry.descriptor(), Some(deobf_name));
        }
        Ok(())
    }

    /// Removes the mappings of a method's whole related-implementation
    /// closure, bridge counterparts included.
    ///
    /// # Errors
    ///
    /// Returns an error when the closure cannot be computed.
    pub fn remove_method_tree_mapping(&mut self, obf: &MethodEntry) -> Result<()> {
        for entry in self.method_closure(obf)? {
            if let Some(scope) = self.mappings.scope_mut(entry.class_entry()) {
                scope.remove_method_mapping(entry.name(), entry.descriptor());
            }
        }
        Ok(())
    }

    /// Freezes a method's whole related-implementation closure as already
    /// named.
    ///
    /// # Errors
    ///
    /// Returns an error when the closure cannot be computed or the name
    /// collides in an affected scope.
    pub fn mark_method_tree_as_deobfuscated(&mut self, obf: &MethodEntry) -> Result<()> {
        self.set_method_tree_name(obf, &obf.name().to_string())
    }

    fn method_closure(&self, obf: &MethodEntry) -> Result<Vec<MethodEntry>> {
        let related = self.index.related_method_implementations(obf)?;
        let mut closure: BTreeSet<(String, String, String)> = BTreeSet::new();
        let mut entries = Vec::new();
        let mut push = |entry: MethodEntry, entries: &mut Vec<MethodEntry>| {
            let key = (
                entry.class_name().to_string(),
                entry.name().to_string(),
                entry.descriptor().to_string(),
            );
            if closure.insert(key) {
                entries.push(entry);
            }
        };
        for entry in &related {
            push(entry.clone(), &mut entries);
            if let Some(bridge) = self.index.bridge_method(entry) {
                push(bridge.clone(), &mut entries);
            }
            if let Some(target) = self.index.bridged_method(entry) {
                push(target.clone(), &mut entries);
            }
        }
        entries.sort_by(|a, b| {
            (a.class_name(), a.name(), a.descriptor()).cmp(&(
                b.class_name(),
                b.name(),
                b.descriptor(),
            ))
        });
        Ok(entries)
    }

    // arguments

    /// Assigns the deobfuscated name of an argument, creating the enclosing
    /// method mapping on demand.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid names and when another argument of the
    /// same behavior already carries the name.
    pub fn set_argument_name(&mut self, obf: &ArgumentEntry, deobf_name: &str) -> Result<()> {
        validate_identifier(deobf_name)?;
        let behavior = obf.behavior_entry();
        if let Some(scope) = self.mappings.scope(behavior.class_entry()) {
            if let Some(mapping) = scope.method_by_obf(behavior.mapping_name(), behavior.descriptor())
            {
                let taken = mapping
                    .arguments()
                    .any(|(index, arg)| arg.deobf_name() == deobf_name && index != obf.index());
                if taken {
                    return Err(crate::Error::NameConflict {
                        scope: behavior.to_string(),
                        name: deobf_name.to_string(),
                    });
                }
            }
        }
        let scope = self.mappings.scope_or_create_mut(behavior.class_entry());
        scope.set_argument_name(
            behavior.mapping_name(),
            behavior.descriptor(),
            obf.index(),
            ArgumentMapping::new(obf.name(), deobf_name),
        );
        Ok(())
    }

    /// Removes the mapping of an argument, if any.
    pub fn remove_argument_mapping(&mut self, obf: &ArgumentEntry) {
        let behavior = obf.behavior_entry();
        if let Some(scope) = self.mappings.scope_mut(behavior.class_entry()) {
            scope.remove_argument_name(behavior.mapping_name(), behavior.descriptor(), obf.index());
        }
    }

    /// Freezes an argument as already named.
    ///
    /// # Errors
    ///
    /// Returns an error if the synthesized name collides within the
    /// behavior.
    pub fn mark_argument_as_deobfuscated(&mut self, obf: &ArgumentEntry) -> Result<()> {
        self.set_argument_name(obf, &obf.name().to_string())
    }

    // moves

    /// Re-parents a field mapping to a different obfuscated class,
    /// preserving the deobfuscated name. Used when entry resolution shows a
    /// mapping was recorded against an inheriting class instead of the
    /// declaring one.
    ///
    /// Returns `false` without touching anything when the destination
    /// already holds a colliding mapping.
    pub fn move_field_to_obf_class(
        &mut self,
        from: &ClassEntry,
        field: &FieldMapping,
        to: &ClassEntry,
    ) -> bool {
        if let Some(dest) = self.mappings.scope(to) {
            if dest.contains_obf_field(field.obf_name())
                || dest.contains_deobf_field(field.deobf_name())
            {
                return false;
            }
        }
        let Some(source) = self.mappings.scope_mut(from) else {
            return false;
        };
        let Some(removed) = source.remove_field_mapping(field.obf_name()) else {
            return false;
        };
        let dest = self.mappings.scope_or_create_mut(to);
        if let Err(error) = dest.add_field_mapping(removed) {
            log::warn!("failed to re-add field mapping while moving to {to}: {error}");
            return false;
        }
        true
    }

    /// Re-parents a method mapping to a different obfuscated class,
    /// preserving the deobfuscated name and argument overrides.
    ///
    /// Returns `false` without touching anything when the destination
    /// already holds a colliding mapping.
    pub fn move_method_to_obf_class(
        &mut self,
        from: &ClassEntry,
        method: &MethodMapping,
        to: &ClassEntry,
    ) -> bool {
        if let Some(dest) = self.mappings.scope(to) {
            if dest.contains_obf_method(method.obf_name(), method.obf_descriptor()) {
                return false;
            }
            if let Some(deobf) = method.deobf_name() {
                if dest.contains_deobf_method(deobf, method.obf_descriptor()) {
                    return false;
                }
            }
        }
        let Some(source) = self.mappings.scope_mut(from) else {
            return false;
        };
        let Some(removed) = source.remove_method_mapping(method.obf_name(), method.obf_descriptor())
        else {
            return false;
        };
        let dest = self.mappings.scope_or_create_mut(to);
        if let Err(error) = dest.add_method_mapping(removed) {
            log::warn!("failed to re-add method mapping while moving to {to}: {error}");
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_identifier() {
        assert!(validate_identifier("count").is_ok());
        assert!(validate_identifier("_x9").is_ok());
        assert!(validate_identifier("").is_err());
        assert!(validate_identifier("9x").is_err());
        assert!(validate_identifier("a-b").is_err());
    }

    #[test]
    fn test_validate_class_name() {
        assert!(validate_class_name("fixture/Thing").is_ok());
        assert!(validate_class_name("Thing").is_ok());
        assert!(validate_class_name("fixture//Thing").is_err());
        assert!(validate_class_name("fixture/Thi$ng").is_err());
        assert!(validate_class_name("").is_err());
    }
}
