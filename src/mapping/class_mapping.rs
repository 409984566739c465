//! Per-class mapping scope.

use std::collections::HashMap;

use crate::{
    mapping::{ArgumentMapping, FieldMapping, MethodMapping},
    Result,
};

type MethodKey = (String, String);

fn method_key(name: &str, descriptor: &str) -> MethodKey {
    (name.to_string(), descriptor.to_string())
}

/// The mapping scope of one class: its own name pair plus nested class,
/// field and method mappings.
///
/// Children are keyed by their obfuscated names (simple names for nested
/// classes, name plus obfuscated descriptor for methods); a secondary index
/// per kind maps deobfuscated keys back to obfuscated ones. Within one scope
/// obfuscated keys are unique, the field indexes stay bijective, and the
/// deobfuscated method index never outgrows the obfuscated one since methods
/// may lack a deobfuscated name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassMapping {
    obf_name: String,
    deobf_name: Option<String>,
    inner_classes: HashMap<String, ClassMapping>,
    inner_deobf_to_obf: HashMap<String, String>,
    fields: HashMap<String, FieldMapping>,
    field_deobf_to_obf: HashMap<String, String>,
    methods: HashMap<MethodKey, MethodMapping>,
    method_deobf_to_obf: HashMap<MethodKey, MethodKey>,
}

impl ClassMapping {
    /// Creates a scope with no deobfuscated name and no children.
    pub fn new(obf_name: impl Into<String>) -> Self {
        ClassMapping {
            obf_name: obf_name.into(),
            ..ClassMapping::default()
        }
    }

    /// Creates a scope with a deobfuscated name.
    pub fn with_deobf_name(obf_name: impl Into<String>, deobf_name: impl Into<String>) -> Self {
        ClassMapping {
            obf_name: obf_name.into(),
            deobf_name: Some(deobf_name.into()),
            ..ClassMapping::default()
        }
    }

    /// The obfuscated class name. Full internal name for root scopes, simple
    /// name for nested scopes.
    #[must_use]
    pub fn obf_name(&self) -> &str {
        &self.obf_name
    }

    /// The deobfuscated class name, if one was assigned.
    #[must_use]
    pub fn deobf_name(&self) -> Option<&str> {
        self.deobf_name.as_deref()
    }

    pub(crate) fn set_deobf_name(&mut self, deobf_name: Option<String>) {
        self.deobf_name = deobf_name;
    }

    pub(crate) fn set_obf_name(&mut self, obf_name: &str) {
        self.obf_name = obf_name.to_string();
    }

    // nested classes

    /// The nested class scopes.
    pub fn inner_classes(&self) -> impl Iterator<Item = &ClassMapping> {
        debug_assert!(self.inner_classes.len() >= self.inner_deobf_to_obf.len());
        self.inner_classes.values()
    }

    /// Returns the nested scope for `obf_simple_name`, creating it on
    /// demand.
    pub fn get_or_create_inner_class(&mut self, obf_simple_name: &str) -> &mut ClassMapping {
        self.inner_classes
            .entry(obf_simple_name.to_string())
            .or_insert_with(|| ClassMapping::new(obf_simple_name))
    }

    /// The nested scope with the given obfuscated simple name.
    #[must_use]
    pub fn inner_class_by_obf(&self, obf_simple_name: &str) -> Option<&ClassMapping> {
        self.inner_classes.get(obf_simple_name)
    }

    pub(crate) fn inner_class_by_obf_mut(
        &mut self,
        obf_simple_name: &str,
    ) -> Option<&mut ClassMapping> {
        self.inner_classes.get_mut(obf_simple_name)
    }

    /// The nested scope with the given deobfuscated simple name.
    #[must_use]
    pub fn inner_class_by_deobf(&self, deobf_simple_name: &str) -> Option<&ClassMapping> {
        self.inner_deobf_to_obf
            .get(deobf_simple_name)
            .and_then(|obf| self.inner_classes.get(obf))
    }

    /// Looks a nested scope up by deobfuscated simple name first, falling
    /// back to the obfuscated one for unmapped classes.
    #[must_use]
    pub fn inner_class_by_deobf_then_obf(&self, simple_name: &str) -> Option<&ClassMapping> {
        self.inner_class_by_deobf(simple_name)
            .or_else(|| self.inner_class_by_obf(simple_name))
    }

    /// Assigns (or clears) the deobfuscated name of a nested class, creating
    /// the scope on demand and keeping the secondary index in sync.
    pub(crate) fn set_inner_class_name(
        &mut self,
        obf_simple_name: &str,
        deobf_simple_name: Option<&str>,
    ) {
        let mapping = self.get_or_create_inner_class(obf_simple_name);
        let old_deobf = mapping.deobf_name.take();
        mapping.deobf_name = deobf_simple_name.map(str::to_string);
        if let Some(old) = old_deobf {
            self.inner_deobf_to_obf.remove(&old);
        }
        if let Some(new) = deobf_simple_name {
            self.inner_deobf_to_obf
                .insert(new.to_string(), obf_simple_name.to_string());
        }
    }

    /// Attaches an already-built nested scope, indexing its deobfuscated
    /// name if it has one. The caller ensures the obfuscated key is free.
    pub(crate) fn insert_inner_class(&mut self, mapping: ClassMapping) {
        if let Some(deobf) = mapping.deobf_name() {
            self.inner_deobf_to_obf
                .insert(deobf.to_string(), mapping.obf_name.clone());
        }
        self.inner_classes.insert(mapping.obf_name.clone(), mapping);
    }

    /// Removes a nested scope entirely.
    pub(crate) fn remove_inner_class(&mut self, obf_simple_name: &str) -> Option<ClassMapping> {
        let removed = self.inner_classes.remove(obf_simple_name)?;
        if let Some(deobf) = removed.deobf_name() {
            self.inner_deobf_to_obf.remove(deobf);
        }
        Some(removed)
    }

    // fields

    /// The field mappings of this scope.
    pub fn fields(&self) -> impl Iterator<Item = &FieldMapping> {
        debug_assert_eq!(self.fields.len(), self.field_deobf_to_obf.len());
        self.fields.values()
    }

    /// `true` if a field with the given obfuscated name is mapped.
    #[must_use]
    pub fn contains_obf_field(&self, obf_name: &str) -> bool {
        self.fields.contains_key(obf_name)
    }

    /// `true` if some field is mapped to the given deobfuscated name.
    #[must_use]
    pub fn contains_deobf_field(&self, deobf_name: &str) -> bool {
        self.field_deobf_to_obf.contains_key(deobf_name)
    }

    /// Adds a field mapping.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NameConflict`] if either name is already
    /// mapped in this scope.
    pub fn add_field_mapping(&mut self, mapping: FieldMapping) -> Result<()> {
        if self.fields.contains_key(mapping.obf_name()) {
            return Err(crate::Error::NameConflict {
                scope: self.obf_name.clone(),
                name: mapping.obf_name().to_string(),
            });
        }
        if self.field_deobf_to_obf.contains_key(mapping.deobf_name()) {
            return Err(crate::Error::NameConflict {
                scope: self.obf_name.clone(),
                name: mapping.deobf_name().to_string(),
            });
        }
        self.field_deobf_to_obf
            .insert(mapping.deobf_name().to_string(), mapping.obf_name().to_string());
        self.fields.insert(mapping.obf_name().to_string(), mapping);
        Ok(())
    }

    /// Removes the field mapping for an obfuscated name.
    pub(crate) fn remove_field_mapping(&mut self, obf_name: &str) -> Option<FieldMapping> {
        let removed = self.fields.remove(obf_name)?;
        self.field_deobf_to_obf.remove(removed.deobf_name());
        Some(removed)
    }

    /// The field mapping for an obfuscated name.
    #[must_use]
    pub fn field_by_obf(&self, obf_name: &str) -> Option<&FieldMapping> {
        self.fields.get(obf_name)
    }

    /// The obfuscated name mapped to a deobfuscated field name.
    #[must_use]
    pub fn obf_field_name(&self, deobf_name: &str) -> Option<&str> {
        self.field_deobf_to_obf.get(deobf_name).map(String::as_str)
    }

    /// The deobfuscated name of an obfuscated field.
    #[must_use]
    pub fn deobf_field_name(&self, obf_name: &str) -> Option<&str> {
        self.fields.get(obf_name).map(FieldMapping::deobf_name)
    }

    /// Assigns the deobfuscated name of a field, creating or updating its
    /// mapping while keeping the indexes bijective.
    pub(crate) fn set_field_name(&mut self, obf_name: &str, deobf_name: &str) {
        if let Some(mapping) = self.fields.get_mut(obf_name) {
            let old = mapping.deobf_name().to_string();
            mapping.set_deobf_name(deobf_name);
            self.field_deobf_to_obf.remove(&old);
        } else {
            self.fields.insert(
                obf_name.to_string(),
                FieldMapping::new(obf_name, deobf_name),
            );
        }
        self.field_deobf_to_obf
            .insert(deobf_name.to_string(), obf_name.to_string());
    }

    // methods

    /// The method mappings of this scope.
    pub fn methods(&self) -> impl Iterator<Item = &MethodMapping> {
        debug_assert!(self.methods.len() >= self.method_deobf_to_obf.len());
        self.methods.values()
    }

    /// `true` if a method with the given obfuscated name and descriptor is
    /// mapped.
    #[must_use]
    pub fn contains_obf_method(&self, obf_name: &str, obf_descriptor: &str) -> bool {
        self.methods.contains_key(&method_key(obf_name, obf_descriptor))
    }

    /// `true` if some method with the given obfuscated descriptor is mapped
    /// to the given deobfuscated name.
    #[must_use]
    pub fn contains_deobf_method(&self, deobf_name: &str, obf_descriptor: &str) -> bool {
        self.method_deobf_to_obf
            .contains_key(&method_key(deobf_name, obf_descriptor))
    }

    /// Adds a method mapping.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NameConflict`] if its obfuscated key, or its
    /// deobfuscated key when named, is already mapped in this scope.
    pub fn add_method_mapping(&mut self, mapping: MethodMapping) -> Result<()> {
        let obf_key = method_key(mapping.obf_name(), mapping.obf_descriptor());
        if self.methods.contains_key(&obf_key) {
            return Err(crate::Error::NameConflict {
                scope: self.obf_name.clone(),
                name: mapping.obf_name().to_string(),
            });
        }
        if let Some(deobf) = mapping.deobf_name() {
            let deobf_key = method_key(deobf, mapping.obf_descriptor());
            if self.method_deobf_to_obf.contains_key(&deobf_key) {
                return Err(crate::Error::NameConflict {
                    scope: self.obf_name.clone(),
                    name: deobf.to_string(),
                });
            }
            self.method_deobf_to_obf.insert(deobf_key, obf_key.clone());
        }
        self.methods.insert(obf_key, mapping);
        Ok(())
    }

    /// Removes the method mapping for an obfuscated name and descriptor.
    pub(crate) fn remove_method_mapping(
        &mut self,
        obf_name: &str,
        obf_descriptor: &str,
    ) -> Option<MethodMapping> {
        let removed = self.methods.remove(&method_key(obf_name, obf_descriptor))?;
        if let Some(deobf) = removed.deobf_name() {
            self.method_deobf_to_obf
                .remove(&method_key(deobf, obf_descriptor));
        }
        Some(removed)
    }

    /// The method mapping for an obfuscated name and descriptor.
    #[must_use]
    pub fn method_by_obf(&self, obf_name: &str, obf_descriptor: &str) -> Option<&MethodMapping> {
        self.methods.get(&method_key(obf_name, obf_descriptor))
    }

    /// The method mapping for a deobfuscated name and obfuscated descriptor.
    #[must_use]
    pub fn method_by_deobf(&self, deobf_name: &str, obf_descriptor: &str) -> Option<&MethodMapping> {
        self.method_deobf_to_obf
            .get(&method_key(deobf_name, obf_descriptor))
            .and_then(|obf_key| self.methods.get(obf_key))
    }

    /// Assigns (or clears) the deobfuscated name of a method, creating its
    /// mapping on demand.
    pub(crate) fn set_method_name(
        &mut self,
        obf_name: &str,
        obf_descriptor: &str,
        deobf_name: Option<&str>,
    ) {
        let obf_key = method_key(obf_name, obf_descriptor);
        let old_deobf = {
            let mapping = self
                .methods
                .entry(obf_key.clone())
                .or_insert_with(|| MethodMapping::new(obf_name, obf_descriptor));
            let old = mapping.deobf_name().map(str::to_string);
            mapping.set_deobf_name(deobf_name.map(str::to_string));
            old
        };
        if let Some(old) = old_deobf {
            self.method_deobf_to_obf
                .remove(&method_key(&old, obf_descriptor));
        }
        if let Some(new) = deobf_name {
            self.method_deobf_to_obf
                .insert(method_key(new, obf_descriptor), obf_key);
        }
    }

    // arguments

    /// Assigns an argument name, creating the enclosing method mapping on
    /// demand.
    pub(crate) fn set_argument_name(
        &mut self,
        obf_method_name: &str,
        obf_descriptor: &str,
        index: usize,
        mapping: ArgumentMapping,
    ) {
        let key = method_key(obf_method_name, obf_descriptor);
        self.methods
            .entry(key)
            .or_insert_with(|| MethodMapping::new(obf_method_name, obf_descriptor))
            .set_argument_name(index, mapping);
    }

    /// Removes an argument name.
    pub(crate) fn remove_argument_name(
        &mut self,
        obf_method_name: &str,
        obf_descriptor: &str,
        index: usize,
    ) -> Option<ArgumentMapping> {
        self.methods
            .get_mut(&method_key(obf_method_name, obf_descriptor))?
            .remove_argument_name(index)
    }

    /// `true` if the given behavior already has an argument mapped to
    /// `deobf_name`.
    #[must_use]
    pub fn contains_argument(
        &self,
        obf_method_name: &str,
        obf_descriptor: &str,
        deobf_name: &str,
    ) -> bool {
        self.method_by_obf(obf_method_name, obf_descriptor)
            .is_some_and(|m| m.contains_argument_name(deobf_name))
    }

    /// Rewrites `old_class_name` to `new_class_name` throughout this scope:
    /// nested scopes depth-first, every method descriptor mentioning the old
    /// name, and finally this scope's own obfuscated name. Returns `true` if
    /// the own name changed, so the parent can re-key this scope.
    pub fn rename_obf_class(&mut self, old_class_name: &str, new_class_name: &str) -> bool {
        let inner_keys: Vec<String> = self.inner_classes.keys().cloned().collect();
        for key in inner_keys {
            if let Some(mut child) = self.inner_classes.remove(&key) {
                child.rename_obf_class(old_class_name, new_class_name);
                self.inner_classes.insert(child.obf_name.clone(), child);
            }
        }
        self.inner_deobf_to_obf = self
            .inner_classes
            .values()
            .filter_map(|c| {
                c.deobf_name()
                    .map(|deobf| (deobf.to_string(), c.obf_name.clone()))
            })
            .collect();

        let method_keys: Vec<MethodKey> = self.methods.keys().cloned().collect();
        for key in method_keys {
            if let Some(mut mapping) = self.methods.remove(&key) {
                mapping.rename_obf_class(old_class_name, new_class_name);
                let new_key = method_key(mapping.obf_name(), mapping.obf_descriptor());
                self.methods.insert(new_key, mapping);
            }
        }
        self.method_deobf_to_obf = self
            .methods
            .values()
            .filter_map(|m| {
                m.deobf_name().map(|deobf| {
                    (
                        method_key(deobf, m.obf_descriptor()),
                        method_key(m.obf_name(), m.obf_descriptor()),
                    )
                })
            })
            .collect();

        if self.obf_name == old_class_name {
            self.obf_name = new_class_name.to_string();
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_indexes_stay_bijective() {
        let mut scope = ClassMapping::new("none/a");
        scope.set_field_name("a", "count");
        scope.set_field_name("b", "total");
        assert_eq!(scope.obf_field_name("count"), Some("a"));

        // renaming the same field replaces its deobf key
        scope.set_field_name("a", "size");
        assert_eq!(scope.obf_field_name("size"), Some("a"));
        assert!(!scope.contains_deobf_field("count"));
        assert_eq!(scope.fields().count(), 2);
    }

    #[test]
    fn test_add_field_mapping_rejects_duplicates() {
        let mut scope = ClassMapping::new("none/a");
        scope.add_field_mapping(FieldMapping::new("a", "count")).unwrap();
        assert!(scope.add_field_mapping(FieldMapping::new("a", "other")).is_err());
        assert!(scope.add_field_mapping(FieldMapping::new("b", "count")).is_err());
    }

    #[test]
    fn test_method_name_keyed_by_descriptor() {
        let mut scope = ClassMapping::new("none/a");
        scope.set_method_name("a", "()V", Some("run"));
        scope.set_method_name("a", "(I)V", Some("runWith"));

        assert_eq!(
            scope.method_by_obf("a", "()V").and_then(MethodMapping::deobf_name),
            Some("run")
        );
        assert_eq!(
            scope.method_by_deobf("runWith", "(I)V").map(MethodMapping::obf_name),
            Some("a")
        );
        assert!(!scope.contains_deobf_method("run", "(I)V"));
    }

    #[test]
    fn test_set_method_name_replaces_deobf_key() {
        let mut scope = ClassMapping::new("none/a");
        scope.set_method_name("a", "()V", Some("run"));
        scope.set_method_name("a", "()V", Some("start"));
        assert!(scope.method_by_deobf("run", "()V").is_none());
        assert!(scope.method_by_deobf("start", "()V").is_some());
    }

    #[test]
    fn test_argument_mapping_creates_method_on_demand() {
        let mut scope = ClassMapping::new("none/a");
        scope.set_argument_name("a", "(I)V", 0, ArgumentMapping::new("p0", "count"));
        let mapping = scope.method_by_obf("a", "(I)V").unwrap();
        assert!(mapping.deobf_name().is_none());
        assert!(scope.contains_argument("a", "(I)V", "count"));
    }

    #[test]
    fn test_rename_obf_class_rekeys_methods() {
        let mut scope = ClassMapping::new("none/b");
        scope.set_method_name("a", "(Lnone/b;)V", Some("take"));
        assert!(scope.rename_obf_class("none/b", "none/a$b"));
        assert_eq!(scope.obf_name(), "none/a$b");
        assert!(scope.method_by_obf("a", "(Lnone/a$b;)V").is_some());
        assert!(scope.method_by_deobf("take", "(Lnone/a$b;)V").is_some());
        assert!(scope.method_by_obf("a", "(Lnone/b;)V").is_none());
    }

    #[test]
    fn test_inner_class_names() {
        let mut scope = ClassMapping::new("none/a");
        scope.set_inner_class_name("b", Some("Builder"));
        assert!(scope.inner_class_by_deobf("Builder").is_some());
        assert!(scope.inner_class_by_deobf_then_obf("b").is_some());

        scope.set_inner_class_name("b", None);
        assert!(scope.inner_class_by_deobf("Builder").is_none());
        assert!(scope.inner_class_by_obf("b").is_some());
    }
}
