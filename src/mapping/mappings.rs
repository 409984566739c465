//! The root mapping forest.

use std::collections::HashMap;

use crate::{
    entry::ClassEntry,
    mapping::{ClassMapping, TranslationDirection, Translator},
    Result,
};

/// Splits a full class name into its root scope name and the chain of
/// nested simple names: `none/a$b$c` becomes `("none/a", ["b", "c"])`.
fn split_class_scopes(name: &str) -> (&str, Vec<&str>) {
    match name.find('$') {
        Some(i) => (&name[..i], name[i + 1..].split('$').collect()),
        None => (name, Vec::new()),
    }
}

/// The persisted obfuscated/deobfuscated rename store: a forest of
/// [`ClassMapping`] scopes, one per top-level class, each with nested class,
/// field and method children.
///
/// The forest is created empty or loaded from the serializable document
/// form, then mutated incrementally through the
/// [`crate::mapping::MappingsRenamer`] for the lifetime of the program.
/// Nested scopes are addressed by full `Outer$Inner` names; see
/// [`Mappings::class_by_obf`].
#[derive(Debug, Clone, Default)]
pub struct Mappings {
    classes: HashMap<String, ClassMapping>,
    deobf_to_obf: HashMap<String, String>,
}

impl Mappings {
    /// Creates an empty mapping forest.
    #[must_use]
    pub fn new() -> Self {
        Mappings::default()
    }

    /// The top-level class mapping scopes.
    pub fn classes(&self) -> impl Iterator<Item = &ClassMapping> {
        self.classes.values()
    }

    /// Looks up a scope by full obfuscated class name, walking nested
    /// scopes along `$` separators.
    #[must_use]
    pub fn class_by_obf(&self, obf_name: &str) -> Option<&ClassMapping> {
        let (root, segments) = split_class_scopes(obf_name);
        let mut current = self.classes.get(root)?;
        for segment in segments {
            current = current.inner_class_by_obf(segment)?;
        }
        Some(current)
    }

    /// Looks up a scope by full deobfuscated class name.
    #[must_use]
    pub fn class_by_deobf(&self, deobf_name: &str) -> Option<&ClassMapping> {
        let (root, segments) = split_class_scopes(deobf_name);
        let obf_root = self.deobf_to_obf.get(root)?;
        let mut current = self.classes.get(obf_root)?;
        for segment in segments {
            current = current.inner_class_by_deobf(segment)?;
        }
        Some(current)
    }

    /// The obfuscated name behind a deobfuscated top-level class name.
    #[must_use]
    pub fn obf_root_name(&self, deobf_name: &str) -> Option<&str> {
        self.deobf_to_obf.get(deobf_name).map(String::as_str)
    }

    /// `true` if some top-level class is mapped to the given deobfuscated
    /// name.
    #[must_use]
    pub fn contains_deobf_class(&self, deobf_name: &str) -> bool {
        self.deobf_to_obf.contains_key(deobf_name)
    }

    /// Adds a top-level class mapping.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NameConflict`] if its obfuscated name, or its
    /// deobfuscated name when present, is already mapped.
    pub fn add_class_mapping(&mut self, mapping: ClassMapping) -> Result<()> {
        if self.classes.contains_key(mapping.obf_name()) {
            return Err(crate::Error::NameConflict {
                scope: String::new(),
                name: mapping.obf_name().to_string(),
            });
        }
        if let Some(deobf) = mapping.deobf_name() {
            if self.deobf_to_obf.contains_key(deobf) {
                return Err(crate::Error::NameConflict {
                    scope: String::new(),
                    name: deobf.to_string(),
                });
            }
            self.deobf_to_obf
                .insert(deobf.to_string(), mapping.obf_name().to_string());
        }
        self.classes
            .insert(mapping.obf_name().to_string(), mapping);
        Ok(())
    }

    /// Removes a top-level class mapping and its whole subtree.
    pub fn remove_class_mapping(&mut self, obf_name: &str) -> Option<ClassMapping> {
        let removed = self.classes.remove(obf_name)?;
        if let Some(deobf) = removed.deobf_name() {
            self.deobf_to_obf.remove(deobf);
        }
        Some(removed)
    }

    /// Reinterprets an obfuscated class name throughout the forest: re-keys
    /// the scope itself and rewrites every method mapping descriptor that
    /// mentions the old name, depth-first through every subtree. Used when
    /// outer-class recovery turns a previously flat name into a nested one;
    /// a scope renamed to an `Outer$Inner` name is re-nested under its outer
    /// scope so name-based lookups keep working.
    pub fn rename_obf_class(&mut self, old_name: &str, new_name: &str) {
        let roots: Vec<String> = self.classes.keys().cloned().collect();
        for root in roots {
            if let Some(mut mapping) = self.classes.remove(&root) {
                mapping.rename_obf_class(old_name, new_name);
                self.classes
                    .insert(mapping.obf_name().to_string(), mapping);
            }
        }

        let composite_roots: Vec<String> = self
            .classes
            .keys()
            .filter(|name| name.contains('$'))
            .cloned()
            .collect();
        for name in composite_roots {
            let Some(mut mapping) = self.classes.remove(&name) else {
                continue;
            };
            let (root, segments) = split_class_scopes(&name);
            let simple = segments[segments.len() - 1];
            mapping.set_obf_name(simple);

            let mut parent = self
                .classes
                .entry(root.to_string())
                .or_insert_with(|| ClassMapping::new(root));
            for segment in &segments[..segments.len() - 1] {
                parent = parent.get_or_create_inner_class(segment);
            }
            if parent.inner_class_by_obf(simple).is_some() {
                log::warn!("dropping relocated mapping {name}: a nested mapping already exists");
                continue;
            }
            parent.insert_inner_class(mapping);
        }

        self.rebuild_deobf_index();
    }

    /// Builds a translator snapshot for the given direction.
    #[must_use]
    pub fn translator(&self, direction: TranslationDirection) -> Translator {
        Translator::new(direction, self.classes.clone(), self.deobf_to_obf.clone())
    }

    /// The scope for a class entry, if one exists.
    #[must_use]
    pub fn scope(&self, class: &ClassEntry) -> Option<&ClassMapping> {
        self.class_by_obf(class.name())
    }

    pub(crate) fn scope_mut(&mut self, class: &ClassEntry) -> Option<&mut ClassMapping> {
        let (root, segments) = split_class_scopes(class.name());
        let mut current = self.classes.get_mut(root)?;
        for segment in segments {
            current = current.inner_class_by_obf_mut(segment)?;
        }
        Some(current)
    }

    /// Returns the scope for a class entry, creating it and any missing
    /// enclosing scopes on demand.
    pub(crate) fn scope_or_create_mut(&mut self, class: &ClassEntry) -> &mut ClassMapping {
        let (root, segments) = split_class_scopes(class.name());
        let mut current = self
            .classes
            .entry(root.to_string())
            .or_insert_with(|| ClassMapping::new(root));
        for segment in segments {
            current = current.get_or_create_inner_class(segment);
        }
        current
    }

    /// Assigns (or clears) the deobfuscated name of a top-level scope,
    /// creating it on demand and keeping the root index in sync.
    pub(crate) fn set_root_deobf_name(&mut self, obf_name: &str, deobf_name: Option<&str>) {
        let mapping = self
            .classes
            .entry(obf_name.to_string())
            .or_insert_with(|| ClassMapping::new(obf_name));
        let old = mapping.deobf_name().map(str::to_string);
        mapping.set_deobf_name(deobf_name.map(str::to_string));
        if let Some(old) = old {
            self.deobf_to_obf.remove(&old);
        }
        if let Some(new) = deobf_name {
            self.deobf_to_obf
                .insert(new.to_string(), obf_name.to_string());
        }
    }

    pub(crate) fn rebuild_deobf_index(&mut self) {
        self.deobf_to_obf = self
            .classes
            .values()
            .filter_map(|c| {
                c.deobf_name()
                    .map(|deobf| (deobf.to_string(), c.obf_name().to_string()))
            })
            .collect();
    }

    pub(crate) fn put_root(&mut self, mapping: ClassMapping) {
        if let Some(deobf) = mapping.deobf_name() {
            self.deobf_to_obf
                .insert(deobf.to_string(), mapping.obf_name().to_string());
        }
        self.classes
            .insert(mapping.obf_name().to_string(), mapping);
    }
}
