//! Superclass and interface graph of an indexed program.
//!
//! The hierarchy index records the `extends` and `implements` edges the
//! loading collaborator reports and answers the ancestry and subclass
//! queries every later analysis pass depends on. The graph only covers the
//! indexed program: a class whose superclass was never recorded sits at the
//! boundary to library code, and walks simply stop there.

use std::collections::{HashMap, HashSet};

use crate::Result;

/// Superclass and interface edges with ancestry and subclass queries.
#[derive(Debug, Default, Clone)]
pub struct HierarchyIndex {
    superclasses: HashMap<String, String>,
    interfaces: HashMap<String, HashSet<String>>,
}

impl HierarchyIndex {
    /// Creates an empty hierarchy.
    #[must_use]
    pub fn new() -> Self {
        HierarchyIndex::default()
    }

    /// Records `class extends superclass`.
    ///
    /// A self-edge would make every ancestry walk cyclic; such an edge is
    /// dropped with a warning instead of being recorded.
    pub fn record_superclass(&mut self, class: &str, superclass: &str) {
        if class == superclass {
            log::warn!("ignoring self-superclass edge for {class}");
            return;
        }
        self.superclasses
            .insert(class.to_string(), superclass.to_string());
    }

    /// Records `class implements interfaces`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::SelfInterface`] if the class lists itself,
    /// which indicates structurally invalid input.
    pub fn record_interfaces(&mut self, class: &str, interfaces: &[String]) -> Result<()> {
        for interface in interfaces {
            if class == interface {
                return Err(crate::Error::SelfInterface(class.to_string()));
            }
            self.interfaces
                .entry(class.to_string())
                .or_default()
                .insert(interface.clone());
        }
        Ok(())
    }

    /// The recorded direct superclass, if any.
    #[must_use]
    pub fn superclass(&self, class: &str) -> Option<&str> {
        self.superclasses.get(class).map(String::as_str)
    }

    /// The ordered superclass chain above `class`, nearest first, excluding
    /// the class itself.
    ///
    /// The walk ends where no superclass is recorded - the boundary of the
    /// indexed program - and guards against cycles in malformed input, so
    /// the result is always finite.
    #[must_use]
    pub fn ancestry(&self, class: &str) -> Vec<String> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut current = class;
        while let Some(superclass) = self.superclass(current) {
            if !seen.insert(superclass.to_string()) {
                log::warn!("superclass cycle detected at {superclass}; truncating ancestry");
                break;
            }
            chain.push(superclass.to_string());
            current = superclass;
        }
        chain
    }

    /// Direct subclasses of `class`.
    #[must_use]
    pub fn subclass_names(&self, class: &str) -> Vec<String> {
        let mut names: Vec<String> = self
            .superclasses
            .iter()
            .filter(|(_, superclass)| superclass.as_str() == class)
            .map(|(subclass, _)| subclass.clone())
            .collect();
        names.sort();
        names
    }

    /// Adds all transitive subclasses of `class` to `names`.
    pub fn collect_subclasses(&self, names: &mut HashSet<String>, class: &str) {
        for subclass in self.subclass_names(class) {
            if names.insert(subclass.clone()) {
                self.collect_subclasses(names, &subclass);
            }
        }
    }

    /// Interfaces the class lists directly.
    #[must_use]
    pub fn direct_interfaces(&self, class: &str) -> Vec<String> {
        match self.interfaces.get(class) {
            Some(interfaces) => {
                let mut names: Vec<String> = interfaces.iter().cloned().collect();
                names.sort();
                names
            }
            None => Vec::new(),
        }
    }

    /// Interfaces of the class including those inherited through its
    /// ancestry.
    #[must_use]
    pub fn all_interfaces(&self, class: &str) -> HashSet<String> {
        let mut names: HashSet<String> = self
            .interfaces
            .get(class)
            .cloned()
            .unwrap_or_default();
        for ancestor in self.ancestry(class) {
            if let Some(interfaces) = self.interfaces.get(&ancestor) {
                names.extend(interfaces.iter().cloned());
            }
        }
        names
    }

    /// `true` if some class of the program lists `class` as an interface.
    #[must_use]
    pub fn is_interface(&self, class: &str) -> bool {
        self.interfaces
            .values()
            .any(|interfaces| interfaces.contains(class))
    }

    /// Classes that directly list `interface` in their `implements` clause.
    #[must_use]
    pub fn direct_implementers(&self, interface: &str) -> Vec<String> {
        let mut names: Vec<String> = self
            .interfaces
            .iter()
            .filter(|(_, interfaces)| interfaces.contains(interface))
            .map(|(class, _)| class.clone())
            .collect();
        names.sort();
        names
    }

    /// Every class implementing `interface`, directly or through a
    /// superclass.
    #[must_use]
    pub fn implementing_classes(&self, interface: &str) -> HashSet<String> {
        let mut names = HashSet::new();
        for class in self.direct_implementers(interface) {
            self.collect_subclasses(&mut names, &class);
            names.insert(class);
        }
        names
    }

    /// Rewrites every class name in the graph according to `renames`, keys
    /// and values alike, in one pass.
    pub fn rename_classes(&mut self, renames: &HashMap<String, String>) {
        let rename = |name: &str| -> String {
            renames
                .get(name)
                .cloned()
                .unwrap_or_else(|| name.to_string())
        };

        self.superclasses = std::mem::take(&mut self.superclasses)
            .into_iter()
            .map(|(class, superclass)| (rename(&class), rename(&superclass)))
            .collect();
        self.interfaces = std::mem::take(&mut self.interfaces)
            .into_iter()
            .map(|(class, interfaces)| {
                (
                    rename(&class),
                    interfaces.iter().map(|i| rename(i)).collect(),
                )
            })
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear_hierarchy() -> HierarchyIndex {
        // c extends b extends a
        let mut hierarchy = HierarchyIndex::new();
        hierarchy.record_superclass("none/b", "none/a");
        hierarchy.record_superclass("none/c", "none/b");
        hierarchy
    }

    #[test]
    fn test_ancestry_is_ordered_and_excludes_self() {
        let hierarchy = linear_hierarchy();
        assert_eq!(hierarchy.ancestry("none/c"), vec!["none/b", "none/a"]);
        assert_eq!(hierarchy.ancestry("none/b"), vec!["none/a"]);
        assert!(hierarchy.ancestry("none/a").is_empty());
    }

    #[test]
    fn test_ancestry_stops_at_boundary() {
        let mut hierarchy = HierarchyIndex::new();
        hierarchy.record_superclass("none/a", "java/util/ArrayList");
        assert_eq!(hierarchy.ancestry("none/a"), vec!["java/util/ArrayList"]);
    }

    #[test]
    fn test_ancestry_guards_against_cycles() {
        let mut hierarchy = HierarchyIndex::new();
        hierarchy.record_superclass("none/a", "none/b");
        hierarchy.record_superclass("none/b", "none/a");
        let ancestry = hierarchy.ancestry("none/a");
        assert_eq!(ancestry, vec!["none/b", "none/a"]);
    }

    #[test]
    fn test_self_superclass_is_ignored() {
        let mut hierarchy = HierarchyIndex::new();
        hierarchy.record_superclass("none/a", "none/a");
        assert!(hierarchy.superclass("none/a").is_none());
    }

    #[test]
    fn test_self_interface_is_fatal() {
        let mut hierarchy = HierarchyIndex::new();
        let result = hierarchy.record_interfaces("none/a", &["none/a".to_string()]);
        assert!(matches!(result, Err(crate::Error::SelfInterface(_))));
    }

    #[test]
    fn test_subclass_queries() {
        let hierarchy = linear_hierarchy();
        assert_eq!(hierarchy.subclass_names("none/a"), vec!["none/b"]);

        let mut all = HashSet::new();
        hierarchy.collect_subclasses(&mut all, "none/a");
        assert!(all.contains("none/b"));
        assert!(all.contains("none/c"));
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn test_interfaces_include_inherited() {
        let mut hierarchy = linear_hierarchy();
        hierarchy
            .record_interfaces("none/a", &["none/i".to_string()])
            .unwrap();
        assert!(hierarchy.all_interfaces("none/c").contains("none/i"));
        assert!(hierarchy.is_interface("none/i"));
        assert!(!hierarchy.is_interface("none/a"));
    }

    #[test]
    fn test_implementing_classes_cover_subclasses() {
        let mut hierarchy = linear_hierarchy();
        hierarchy
            .record_interfaces("none/b", &["none/i".to_string()])
            .unwrap();
        let implementers = hierarchy.implementing_classes("none/i");
        assert!(implementers.contains("none/b"));
        assert!(implementers.contains("none/c"));
        assert!(!implementers.contains("none/a"));
    }

    #[test]
    fn test_rename_classes() {
        let mut hierarchy = linear_hierarchy();
        let mut renames = HashMap::new();
        renames.insert("none/b".to_string(), "none/a$b".to_string());
        hierarchy.rename_classes(&renames);

        assert_eq!(hierarchy.superclass("none/a$b"), Some("none/a"));
        assert_eq!(hierarchy.superclass("none/c"), Some("none/a$b"));
        assert!(hierarchy.superclass("none/b").is_none());
    }
}
