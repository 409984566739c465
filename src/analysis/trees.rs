//! On-demand traversal trees over the indexed program.
//!
//! Four read-only structures computed from the [`ProgramIndex`] when asked
//! for: the class inheritance tree, the class implementations tree and their
//! method-level counterparts. They serve presentation (each node carries the
//! display name produced by a [`Translator`]) and drive the renamer's
//! propagation closure: [`ProgramIndex::related_method_implementations`]
//! walks the method trees to find every concretely-declared method that must
//! be renamed together with a given one.

use std::collections::HashSet;

use crate::{
    analysis::ProgramIndex,
    entry::{ClassEntry, Entry, MethodEntry},
    mapping::Translator,
    Result,
};

/// A node of the class inheritance tree.
///
/// The tree is rooted at the topmost ancestor of the queried class within
/// the indexed program and expands subclasses recursively.
#[derive(Debug, Clone)]
pub struct ClassInheritanceTreeNode {
    class: ClassEntry,
    deobf_name: String,
    subclasses: Vec<ClassInheritanceTreeNode>,
}

impl ClassInheritanceTreeNode {
    /// Builds the inheritance tree containing `class`.
    #[must_use]
    pub fn build(
        index: &ProgramIndex,
        translator: &Translator,
        class: &ClassEntry,
    ) -> ClassInheritanceTreeNode {
        let ancestry = index.hierarchy().ancestry(class.name());
        let root_name = ancestry
            .last()
            .map_or_else(|| class.name().to_string(), Clone::clone);
        Self::expand(index, translator, &root_name)
    }

    fn expand(
        index: &ProgramIndex,
        translator: &Translator,
        class_name: &str,
    ) -> ClassInheritanceTreeNode {
        let class = ClassEntry::new(class_name);
        let subclasses = index
            .hierarchy()
            .subclass_names(class_name)
            .iter()
            .map(|subclass| Self::expand(index, translator, subclass))
            .collect();
        ClassInheritanceTreeNode {
            deobf_name: translator.translate_class_entry(&class).name().to_string(),
            class,
            subclasses,
        }
    }

    /// The obfuscated class at this node.
    #[must_use]
    pub fn class_entry(&self) -> &ClassEntry {
        &self.class
    }

    /// The display name of this node in the translator's direction.
    #[must_use]
    pub fn deobf_name(&self) -> &str {
        &self.deobf_name
    }

    /// Subclass child nodes.
    #[must_use]
    pub fn subclasses(&self) -> &[ClassInheritanceTreeNode] {
        &self.subclasses
    }
}

/// A node of the class implementations tree of an interface.
#[derive(Debug, Clone)]
pub struct ClassImplementationsTreeNode {
    class: ClassEntry,
    deobf_name: String,
    children: Vec<ClassImplementationsTreeNode>,
}

impl ClassImplementationsTreeNode {
    /// Builds the implementations tree rooted at `interface`.
    ///
    /// Returns `None` when the queried class is not an interface of the
    /// indexed program.
    #[must_use]
    pub fn build(
        index: &ProgramIndex,
        translator: &Translator,
        interface: &ClassEntry,
    ) -> Option<ClassImplementationsTreeNode> {
        if !index.is_interface(interface.name()) {
            return None;
        }
        let children = index
            .hierarchy()
            .direct_implementers(interface.name())
            .iter()
            .map(|implementer| Self::expand(index, translator, implementer))
            .collect();
        Some(ClassImplementationsTreeNode {
            deobf_name: translator
                .translate_class_entry(interface)
                .name()
                .to_string(),
            class: interface.clone(),
            children,
        })
    }

    fn expand(
        index: &ProgramIndex,
        translator: &Translator,
        class_name: &str,
    ) -> ClassImplementationsTreeNode {
        let class = ClassEntry::new(class_name);
        let children = index
            .hierarchy()
            .subclass_names(class_name)
            .iter()
            .map(|subclass| Self::expand(index, translator, subclass))
            .collect();
        ClassImplementationsTreeNode {
            deobf_name: translator.translate_class_entry(&class).name().to_string(),
            class,
            children,
        }
    }

    /// The obfuscated class at this node.
    #[must_use]
    pub fn class_entry(&self) -> &ClassEntry {
        &self.class
    }

    /// The display name of this node in the translator's direction.
    #[must_use]
    pub fn deobf_name(&self) -> &str {
        &self.deobf_name
    }

    /// Implementing child nodes.
    #[must_use]
    pub fn children(&self) -> &[ClassImplementationsTreeNode] {
        &self.children
    }
}

/// A node of the method inheritance tree.
///
/// Rooted at the highest ancestor class that actually declares a method with
/// the queried name and descriptor; every subclass below it appears as a
/// node flagged with whether it redeclares the method or merely inherits it.
#[derive(Debug, Clone)]
pub struct MethodInheritanceTreeNode {
    method: MethodEntry,
    deobf_name: Option<String>,
    declared: bool,
    children: Vec<MethodInheritanceTreeNode>,
}

impl MethodInheritanceTreeNode {
    /// Builds the inheritance tree containing `method`.
    #[must_use]
    pub fn build(
        index: &ProgramIndex,
        translator: &Translator,
        method: &MethodEntry,
    ) -> MethodInheritanceTreeNode {
        // Travel to the highest ancestor that declares this method.
        let mut base_class_name = method.class_name().to_string();
        for ancestor in index.hierarchy().ancestry(method.class_name()) {
            let candidate = method.clone_to_class(ClassEntry::new(&ancestor));
            if index.contains_behavior(&candidate.clone().into()) {
                base_class_name = ancestor;
            }
        }

        let root = method.clone_to_class(ClassEntry::new(&base_class_name));
        Self::expand(index, translator, root)
    }

    fn expand(
        index: &ProgramIndex,
        translator: &Translator,
        method: MethodEntry,
    ) -> MethodInheritanceTreeNode {
        let children = index
            .hierarchy()
            .subclass_names(method.class_name())
            .iter()
            .map(|subclass| {
                Self::expand(
                    index,
                    translator,
                    method.clone_to_class(ClassEntry::new(subclass)),
                )
            })
            .collect();
        MethodInheritanceTreeNode {
            declared: index.contains_behavior(&method.clone().into()),
            deobf_name: translator.translate_method(&method),
            method,
            children,
        }
    }

    /// The obfuscated method at this node.
    #[must_use]
    pub fn method_entry(&self) -> &MethodEntry {
        &self.method
    }

    /// The mapped name of this node's method, if one exists.
    #[must_use]
    pub fn deobf_name(&self) -> Option<&str> {
        self.deobf_name.as_deref()
    }

    /// `true` if this node's class redeclares the method, `false` if it
    /// only inherits it.
    #[must_use]
    pub fn is_declared(&self) -> bool {
        self.declared
    }

    /// Subclass child nodes.
    #[must_use]
    pub fn children(&self) -> &[MethodInheritanceTreeNode] {
        &self.children
    }
}

/// A node of the method implementations tree of an interface method.
#[derive(Debug, Clone)]
pub struct MethodImplementationsTreeNode {
    method: MethodEntry,
    deobf_name: Option<String>,
    implementers: Vec<MethodImplementationsTreeNode>,
}

impl MethodImplementationsTreeNode {
    /// Builds the implementations tree for the interface method that
    /// `method` satisfies.
    ///
    /// If `method`'s class is itself an interface the tree is rooted at the
    /// method directly; otherwise the class's interfaces are searched for a
    /// declaration with the same name and descriptor. Returns `Ok(None)`
    /// when no interface declares the method.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::AmbiguousInterfaceMethod`] when more than one
    /// interface declares the signature; resolving that configuration is
    /// unsupported.
    pub fn build(
        index: &ProgramIndex,
        translator: &Translator,
        method: &MethodEntry,
    ) -> Result<Option<MethodImplementationsTreeNode>> {
        let interface_method = if index.is_interface(method.class_name()) {
            method.clone()
        } else {
            let mut declaring = Vec::new();
            for interface in index.interfaces(method.class_name()) {
                let candidate = method.clone_to_class(ClassEntry::new(&interface));
                if index.contains_behavior(&candidate.clone().into()) {
                    declaring.push(candidate);
                }
            }
            declaring.sort_by(|a, b| a.class_name().cmp(b.class_name()));
            match declaring.len() {
                0 => return Ok(None),
                1 => declaring.remove(0),
                _ => {
                    return Err(crate::Error::AmbiguousInterfaceMethod(declaring.remove(0)));
                }
            }
        };

        let mut implementers: Vec<MethodImplementationsTreeNode> = Vec::new();
        let mut implementing_classes: Vec<String> = index
            .implementing_classes(interface_method.class_name())
            .into_iter()
            .collect();
        implementing_classes.sort_unstable();
        for class in implementing_classes {
            let implementation = interface_method.clone_to_class(ClassEntry::new(&class));
            if index.contains_behavior(&implementation.clone().into()) {
                implementers.push(MethodImplementationsTreeNode {
                    deobf_name: translator.translate_method(&implementation),
                    method: implementation,
                    implementers: Vec::new(),
                });
            }
        }

        Ok(Some(MethodImplementationsTreeNode {
            deobf_name: translator.translate_method(&interface_method),
            method: interface_method,
            implementers,
        }))
    }

    /// The obfuscated method at this node.
    #[must_use]
    pub fn method_entry(&self) -> &MethodEntry {
        &self.method
    }

    /// The mapped name of this node's method, if one exists.
    #[must_use]
    pub fn deobf_name(&self) -> Option<&str> {
        self.deobf_name.as_deref()
    }

    /// Implementing child nodes.
    #[must_use]
    pub fn implementers(&self) -> &[MethodImplementationsTreeNode] {
        &self.implementers
    }
}

impl ProgramIndex {
    /// Computes the related-implementation closure of a method: every
    /// concretely-declared method connected to it through the inheritance
    /// tree and, at every node, the interface-implementation tree. All
    /// members of the closure must receive the same rename together.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::AmbiguousInterfaceMethod`] when a node's
    /// signature is declared by more than one interface.
    pub fn related_method_implementations(
        &self,
        method: &MethodEntry,
    ) -> Result<HashSet<MethodEntry>> {
        let translator = Translator::default();
        let mut entries = HashSet::new();
        let root = MethodInheritanceTreeNode::build(self, &translator, method);
        self.collect_from_inheritance(&mut entries, &translator, &root)?;
        Ok(entries)
    }

    fn collect_from_inheritance(
        &self,
        entries: &mut HashSet<MethodEntry>,
        translator: &Translator,
        node: &MethodInheritanceTreeNode,
    ) -> Result<()> {
        let method = node.method_entry();
        if self.contains_entry(&Entry::Method(method.clone())) {
            entries.insert(method.clone());
        }

        // Methods satisfying an interface pull in the whole implementation
        // tree of that interface method.
        if let Some(implementations) =
            MethodImplementationsTreeNode::build(self, translator, method)?
        {
            Self::collect_from_implementations(self, entries, &implementations);
        }

        for child in node.children() {
            self.collect_from_inheritance(entries, translator, child)?;
        }
        Ok(())
    }

    fn collect_from_implementations(
        index: &ProgramIndex,
        entries: &mut HashSet<MethodEntry>,
        node: &MethodImplementationsTreeNode,
    ) {
        let method = node.method_entry();
        if index.contains_entry(&Entry::Method(method.clone())) {
            entries.insert(method.clone());
        }
        for child in node.implementers() {
            Self::collect_from_implementations(index, entries, child);
        }
    }
}
