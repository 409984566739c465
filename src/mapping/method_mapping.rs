//! Field, method and argument mapping nodes.

use std::collections::BTreeMap;

use crate::{descriptor, entry::CONSTRUCTOR_NAME};

/// An obfuscated/deobfuscated field name pair.
///
/// Unlike methods, a field mapping always carries both names; the per-class
/// field maps stay in exact bijective sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMapping {
    obf_name: String,
    deobf_name: String,
}

impl FieldMapping {
    /// Creates a field mapping.
    pub fn new(obf_name: impl Into<String>, deobf_name: impl Into<String>) -> Self {
        FieldMapping {
            obf_name: obf_name.into(),
            deobf_name: deobf_name.into(),
        }
    }

    /// The obfuscated field name.
    #[must_use]
    pub fn obf_name(&self) -> &str {
        &self.obf_name
    }

    /// The deobfuscated field name.
    #[must_use]
    pub fn deobf_name(&self) -> &str {
        &self.deobf_name
    }

    pub(crate) fn set_deobf_name(&mut self, deobf_name: impl Into<String>) {
        self.deobf_name = deobf_name.into();
    }
}

/// A name override for one argument of a mapped method.
///
/// Keeps the obfuscated name alongside the override so translation works in
/// both directions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentMapping {
    obf_name: String,
    deobf_name: String,
}

impl ArgumentMapping {
    /// Creates an argument mapping.
    pub fn new(obf_name: impl Into<String>, deobf_name: impl Into<String>) -> Self {
        ArgumentMapping {
            obf_name: obf_name.into(),
            deobf_name: deobf_name.into(),
        }
    }

    /// The obfuscated argument name.
    #[must_use]
    pub fn obf_name(&self) -> &str {
        &self.obf_name
    }

    /// The deobfuscated argument name.
    #[must_use]
    pub fn deobf_name(&self) -> &str {
        &self.deobf_name
    }
}

/// An obfuscated/deobfuscated method name pair with per-argument overrides.
///
/// The obfuscated descriptor is the stable half of the key since overloads
/// share a name. The deobfuscated name is optional: a mapping may exist just
/// to hold argument names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodMapping {
    obf_name: String,
    obf_descriptor: String,
    deobf_name: Option<String>,
    arguments: BTreeMap<usize, ArgumentMapping>,
}

impl MethodMapping {
    /// Creates a method mapping with no deobfuscated name.
    pub fn new(obf_name: impl Into<String>, obf_descriptor: impl Into<String>) -> Self {
        MethodMapping {
            obf_name: obf_name.into(),
            obf_descriptor: obf_descriptor.into(),
            deobf_name: None,
            arguments: BTreeMap::new(),
        }
    }

    /// The obfuscated method name.
    #[must_use]
    pub fn obf_name(&self) -> &str {
        &self.obf_name
    }

    /// The obfuscated method descriptor.
    #[must_use]
    pub fn obf_descriptor(&self) -> &str {
        &self.obf_descriptor
    }

    /// The deobfuscated method name, if one was assigned.
    #[must_use]
    pub fn deobf_name(&self) -> Option<&str> {
        self.deobf_name.as_deref()
    }

    pub(crate) fn set_deobf_name(&mut self, deobf_name: Option<String>) {
        self.deobf_name = deobf_name;
    }

    /// `true` if this mapping belongs to a constructor.
    #[must_use]
    pub fn is_constructor(&self) -> bool {
        self.obf_name == CONSTRUCTOR_NAME
    }

    /// The argument mappings, keyed by parameter index.
    pub fn arguments(&self) -> impl Iterator<Item = (usize, &ArgumentMapping)> {
        self.arguments.iter().map(|(index, arg)| (*index, arg))
    }

    /// The argument mapping at `index`, if any.
    #[must_use]
    pub fn argument(&self, index: usize) -> Option<&ArgumentMapping> {
        self.arguments.get(&index)
    }

    /// `true` if any argument is mapped to `deobf_name`.
    #[must_use]
    pub fn contains_argument_name(&self, deobf_name: &str) -> bool {
        self.arguments.values().any(|a| a.deobf_name == deobf_name)
    }

    pub(crate) fn set_argument_name(&mut self, index: usize, mapping: ArgumentMapping) {
        self.arguments.insert(index, mapping);
    }

    pub(crate) fn remove_argument_name(&mut self, index: usize) -> Option<ArgumentMapping> {
        self.arguments.remove(&index)
    }

    /// Rewrites mentions of `old_class_name` in the obfuscated descriptor.
    /// Returns `true` if the descriptor changed, which re-keys this mapping
    /// in its enclosing scope.
    pub(crate) fn rename_obf_class(&mut self, old_class_name: &str, new_class_name: &str) -> bool {
        if !descriptor::mentions_class(&self.obf_descriptor, old_class_name) {
            return false;
        }
        self.obf_descriptor = descriptor::rewrite_classes(&self.obf_descriptor, |name| {
            (name == old_class_name).then(|| new_class_name.to_string())
        });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rename_obf_class_rewrites_descriptor() {
        let mut mapping = MethodMapping::new("a", "(Lnone/b;)Lnone/b;");
        assert!(mapping.rename_obf_class("none/b", "none/a$b"));
        assert_eq!(mapping.obf_descriptor(), "(Lnone/a$b;)Lnone/a$b;");
        assert!(!mapping.rename_obf_class("none/b", "none/x"));
    }

    #[test]
    fn test_argument_names() {
        let mut mapping = MethodMapping::new("a", "(II)V");
        mapping.set_argument_name(1, ArgumentMapping::new("p1", "count"));
        assert!(mapping.contains_argument_name("count"));
        assert_eq!(mapping.argument(1).map(ArgumentMapping::deobf_name), Some("count"));
        assert!(mapping.argument(0).is_none());
        mapping.remove_argument_name(1);
        assert!(!mapping.contains_argument_name("count"));
    }

    #[test]
    fn test_constructor_detection() {
        assert!(MethodMapping::new(CONSTRUCTOR_NAME, "()V").is_constructor());
        assert!(!MethodMapping::new("a", "()V").is_constructor());
    }
}
