//! Full cross-reference index of a compiled program.
//!
//! [`ProgramIndex`] is the central analysis structure of the crate. It is
//! built once per ingested [`Program`] by a fixed sequence of passes and is
//! read-only afterwards:
//!
//! 1. discover the full class set (moving default-package classes into the
//!    synthetic `none/` package),
//! 2. index every declared field, method and constructor with its access
//!    level,
//! 3. index superclass and interface edges, declared field types, per-class
//!    method sets and bridge-method candidates,
//! 4. scan every behavior body for call sites, field accesses, object
//!    creations and constructor delegations, producing reference edges
//!    resolved to the class that actually declares the member,
//! 5. optionally recover inner, outer and anonymous class relationships and
//!    rewrite every structure to the nested `Outer$Inner` names in one
//!    atomic pass,
//! 6. propagate bridge-method identities into the structures that mention a
//!    bridge's target.
//!
//! The pass order is load-bearing: later passes read structures only fully
//! populated by earlier ones, so construction is a single-threaded ordered
//! batch. Heuristic passes log and leave relationships unresolved when the
//! input defeats them; structurally invalid input (a class listed as its own
//! interface) aborts construction with no partial index.

use std::collections::{HashMap, HashSet};

use crate::{
    analysis::{inner_classes, HierarchyIndex},
    descriptor,
    entry::{
        BehaviorEntry, ClassEntry, ConstructorEntry, Entry, FieldEntry, MethodEntry, Reference,
        ReferenceKind,
    },
    program::{Access, AccessFlags, BodySite, DelegationKind, Program, NONE_PACKAGE},
    progress::{NoProgress, ProgressListener},
    Result,
};

/// Cross-reference index over one compiled program.
///
/// Holds the class set, member access levels, declared field types, per-class
/// method sets, both reference graphs, the recovered inner/outer/anonymous
/// class maps and the bridge-method map. Built with [`ProgramIndex::build`],
/// logically immutable afterwards, and therefore freely shareable across
/// concurrent readers.
#[derive(Debug, Default)]
pub struct ProgramIndex {
    classes: HashSet<ClassEntry>,
    hierarchy: HierarchyIndex,
    access: HashMap<Entry, Access>,
    field_types: HashMap<FieldEntry, ClassEntry>,
    method_implementations: HashMap<String, HashSet<MethodEntry>>,
    behavior_references: HashMap<BehaviorEntry, HashSet<Reference<BehaviorEntry>>>,
    field_references: HashMap<FieldEntry, HashSet<Reference<FieldEntry>>>,
    inner_classes: HashMap<String, HashSet<String>>,
    outer_classes: HashMap<String, String>,
    anonymous_classes: HashMap<String, BehaviorEntry>,
    /// bridged method (target) -> synthetic bridge
    bridge_methods: HashMap<MethodEntry, MethodEntry>,
    /// synthetic bridge -> bridged method (target)
    bridged_targets: HashMap<MethodEntry, MethodEntry>,
}

impl ProgramIndex {
    /// Indexes a program without progress reporting.
    ///
    /// See [`ProgramIndex::build_with_progress`].
    ///
    /// # Errors
    ///
    /// Returns an error for structurally invalid input; no partial index is
    /// kept.
    pub fn build(program: &Program, build_inner_classes: bool) -> Result<Self> {
        Self::build_with_progress(program, build_inner_classes, &mut NoProgress)
    }

    /// Indexes a program, running the construction passes in dependency
    /// order and reporting per-pass progress.
    ///
    /// When `build_inner_classes` is `false` the inner-class recovery pass
    /// and its bulk rename are skipped; everything else is identical.
    ///
    /// # Errors
    ///
    /// Returns an error for structurally invalid input (e.g. a class listed
    /// as its own interface); no partial index is kept.
    pub fn build_with_progress(
        program: &Program,
        build_inner_classes: bool,
        progress: &mut dyn ProgressListener,
    ) -> Result<Self> {
        for class in &program.classes {
            if class.name.is_empty() {
                return Err(malformed_error!("program contains a class with an empty name"));
            }
        }

        let program = program.normalized();
        let total = if build_inner_classes { 6 } else { 5 };
        progress.init(total, "Indexing program");

        let mut index = ProgramIndex::default();

        index.index_class_set(&program);
        progress.on_progress(1, "Discovered classes");

        index.index_member_access(&program);
        progress.on_progress(2, "Indexed member access");

        index.index_structure(&program)?;
        progress.on_progress(3, "Indexed class structure");

        index.index_references(&program);
        progress.on_progress(4, "Indexed references");

        if build_inner_classes {
            index.build_inner_class_info(&program);
            progress.on_progress(5, "Recovered inner classes");
        }

        index.link_bridge_methods();
        progress.on_progress(total, "Linked bridge methods");

        Ok(index)
    }

    // pass 1

    fn index_class_set(&mut self, program: &Program) {
        for class in &program.classes {
            self.classes.insert(ClassEntry::new(&class.name));
        }
    }

    // pass 2

    fn index_member_access(&mut self, program: &Program) {
        for class in &program.classes {
            let class_entry = ClassEntry::new(&class.name);
            for field in &class.fields {
                let entry = FieldEntry::new(class_entry.clone(), &field.name);
                self.access.insert(Entry::Field(entry), Access::of(field.flags));
            }
            for method in &class.methods {
                let entry = MethodEntry::new(class_entry.clone(), &method.name, &method.descriptor);
                self.access
                    .insert(Entry::Method(entry), Access::of(method.flags));
            }
            for constructor in &class.constructors {
                let entry = ConstructorEntry::new(class_entry.clone(), &constructor.descriptor);
                self.access
                    .insert(Entry::Constructor(entry), Access::of(constructor.flags));
            }
        }
    }

    // pass 3

    fn index_structure(&mut self, program: &Program) -> Result<()> {
        let mut ambiguous_targets = HashSet::new();
        for class in &program.classes {
            let class_entry = ClassEntry::new(&class.name);

            if let Some(superclass) = &class.superclass {
                self.hierarchy.record_superclass(&class.name, superclass);
            }
            self.hierarchy.record_interfaces(&class.name, &class.interfaces)?;

            for field in &class.fields {
                let entry = FieldEntry::new(class_entry.clone(), &field.name);
                if let Some(type_name) = descriptor::type_class(&field.descriptor) {
                    self.field_types.insert(entry, ClassEntry::new(type_name));
                }
            }

            for method in &class.methods {
                let entry = MethodEntry::new(class_entry.clone(), &method.name, &method.descriptor);
                self.method_implementations
                    .entry(class.name.clone())
                    .or_default()
                    .insert(entry);
                self.detect_bridge(&class_entry, method, &mut ambiguous_targets);
            }
        }
        Ok(())
    }

    /// A bridge is a compiler-synthesized method whose entire effect is to
    /// delegate to one other method and return its result. A synthetic
    /// method with zero or more than one call in its body is not a bridge,
    /// and a target delegated to by more than one synthetic method has no
    /// bridge at all.
    fn detect_bridge(
        &mut self,
        class_entry: &ClassEntry,
        method: &crate::program::ProgramMethod,
        ambiguous_targets: &mut HashSet<MethodEntry>,
    ) {
        if !method.flags.contains(AccessFlags::SYNTHETIC) {
            return;
        }

        let mut calls = method.body.iter().filter_map(|site| match site {
            BodySite::MethodCall {
                name, descriptor, ..
            } => Some((name, descriptor)),
            _ => None,
        });
        let Some((name, descriptor)) = calls.next() else {
            return;
        };
        if calls.next().is_some() {
            return;
        }

        // The bridged method lives on the bridge's own class.
        let target = MethodEntry::new(class_entry.clone(), name, descriptor);
        if ambiguous_targets.contains(&target) {
            return;
        }
        if let Some(previous) = self.bridge_methods.remove(&target) {
            self.bridged_targets.remove(&previous);
            ambiguous_targets.insert(target);
            return;
        }

        let bridge = MethodEntry::new(class_entry.clone(), &method.name, &method.descriptor);
        self.bridge_methods.insert(target.clone(), bridge.clone());
        self.bridged_targets.insert(bridge, target);
    }

    // pass 4

    fn index_references(&mut self, program: &Program) {
        for class in &program.classes {
            let class_entry = ClassEntry::new(&class.name);
            for method in &class.methods {
                let context = BehaviorEntry::Method(MethodEntry::new(
                    class_entry.clone(),
                    &method.name,
                    &method.descriptor,
                ));
                self.index_body(&context, &method.body);
            }
            for constructor in &class.constructors {
                let context = BehaviorEntry::Constructor(ConstructorEntry::new(
                    class_entry.clone(),
                    &constructor.descriptor,
                ));
                self.index_body(&context, &constructor.body);
            }
        }
    }

    fn index_body(&mut self, context: &BehaviorEntry, body: &[BodySite]) {
        for site in body {
            match site {
                BodySite::MethodCall {
                    class,
                    name,
                    descriptor,
                } => {
                    let mut entry = MethodEntry::new(ClassEntry::new(class), name, descriptor);
                    // The nominal call-site class is not necessarily the
                    // declarer; attribute the edge to the declaring class.
                    if let Some(resolved) = self.resolve_entry_class(&Entry::Method(entry.clone()))
                    {
                        if resolved.name() != entry.class_name() {
                            entry = entry.clone_to_class(resolved);
                        }
                    }
                    self.record_behavior_reference(
                        BehaviorEntry::Method(entry),
                        context,
                        ReferenceKind::MethodCall,
                    );
                }
                BodySite::FieldRead {
                    class,
                    name,
                    ..
                }
                | BodySite::FieldWrite {
                    class,
                    name,
                    ..
                } => {
                    let mut entry = FieldEntry::new(ClassEntry::new(class), name);
                    if let Some(resolved) = self.resolve_entry_class(&Entry::Field(entry.clone())) {
                        if resolved.name() != entry.class_name() {
                            entry = entry.clone_to_class(resolved);
                        }
                    }
                    let reference =
                        Reference::new(entry.clone(), context.clone(), ReferenceKind::FieldAccess);
                    self.field_references
                        .entry(entry)
                        .or_default()
                        .insert(reference);
                }
                BodySite::New { class, descriptor } => {
                    let entry = ConstructorEntry::new(ClassEntry::new(class), descriptor);
                    self.record_behavior_reference(
                        BehaviorEntry::Constructor(entry),
                        context,
                        ReferenceKind::Creation,
                    );
                }
                BodySite::Delegation {
                    kind,
                    class,
                    descriptor,
                } => {
                    let entry = ConstructorEntry::new(ClassEntry::new(class), descriptor);
                    let kind = match kind {
                        DelegationKind::This => ReferenceKind::ThisCall,
                        DelegationKind::Super => ReferenceKind::SuperCall,
                    };
                    self.record_behavior_reference(
                        BehaviorEntry::Constructor(entry),
                        context,
                        kind,
                    );
                }
            }
        }
    }

    fn record_behavior_reference(
        &mut self,
        entry: BehaviorEntry,
        context: &BehaviorEntry,
        kind: ReferenceKind,
    ) {
        let reference = Reference::new(entry.clone(), context.clone(), kind);
        self.behavior_references
            .entry(entry)
            .or_default()
            .insert(reference);
    }

    // pass 5

    fn build_inner_class_info(&mut self, program: &Program) {
        for class in &program.classes {
            let Some(outer_name) = inner_classes::find_outer_class(self, class) else {
                continue;
            };
            let inner_name = ClassEntry::new(&class.name).simple_name().to_string();
            self.inner_classes
                .entry(outer_name.clone())
                .or_default()
                .insert(inner_name.clone());
            self.outer_classes.insert(inner_name.clone(), outer_name);

            if let Some(caller) = inner_classes::classify_anonymous(self, class) {
                self.anonymous_classes.insert(inner_name, caller);
            }
        }

        let mut renames = HashMap::new();
        for (inner, outer) in &self.outer_classes {
            renames.insert(format!("{NONE_PACKAGE}/{inner}"), format!("{outer}${inner}"));
        }
        self.rename_classes(&renames);
    }

    /// Rewrites every class name in every index structure according to
    /// `renames`, in lockstep. No structure ever observes a half-renamed
    /// program: the whole rewrite happens before any query runs again.
    fn rename_classes(&mut self, renames: &HashMap<String, String>) {
        if renames.is_empty() {
            return;
        }

        let rename_class = |class: &ClassEntry| -> ClassEntry {
            match renames.get(class.name()) {
                Some(new_name) => ClassEntry::new(new_name),
                None => class.clone(),
            }
        };
        let rename_descriptor = |desc: &str| -> String {
            descriptor::rewrite_classes(desc, |name| renames.get(name).cloned())
        };
        let rename_field = |field: &FieldEntry| -> FieldEntry {
            field.clone_to_class(rename_class(field.class_entry()))
        };
        let rename_method = |method: &MethodEntry| -> MethodEntry {
            MethodEntry::new(
                rename_class(method.class_entry()),
                method.name(),
                rename_descriptor(method.descriptor()),
            )
        };
        let rename_behavior = |behavior: &BehaviorEntry| -> BehaviorEntry {
            match behavior {
                BehaviorEntry::Method(m) => BehaviorEntry::Method(rename_method(m)),
                BehaviorEntry::Constructor(c) => BehaviorEntry::Constructor(ConstructorEntry::new(
                    rename_class(c.class_entry()),
                    rename_descriptor(c.descriptor()),
                )),
            }
        };
        let rename_entry = |entry: &Entry| -> Entry {
            match entry {
                Entry::Class(c) => Entry::Class(rename_class(c)),
                Entry::Field(f) => Entry::Field(rename_field(f)),
                Entry::Method(m) => Entry::Method(rename_method(m)),
                Entry::Constructor(c) => Entry::Constructor(ConstructorEntry::new(
                    rename_class(c.class_entry()),
                    rename_descriptor(c.descriptor()),
                )),
                Entry::Argument(a) => Entry::Argument(crate::entry::ArgumentEntry::new(
                    rename_behavior(a.behavior_entry()),
                    a.index(),
                    a.name(),
                )),
            }
        };

        let classes = std::mem::take(&mut self.classes);
        self.classes = classes.iter().map(&rename_class).collect();

        self.hierarchy.rename_classes(renames);

        let access = std::mem::take(&mut self.access);
        self.access = access
            .iter()
            .map(|(entry, access)| (rename_entry(entry), *access))
            .collect();

        let field_types = std::mem::take(&mut self.field_types);
        self.field_types = field_types
            .iter()
            .map(|(field, class)| (rename_field(field), rename_class(class)))
            .collect();

        let implementations = std::mem::take(&mut self.method_implementations);
        self.method_implementations = implementations
            .iter()
            .map(|(class, methods)| {
                let class = renames.get(class).cloned().unwrap_or_else(|| class.clone());
                (class, methods.iter().map(&rename_method).collect())
            })
            .collect();

        let behavior_references = std::mem::take(&mut self.behavior_references);
        self.behavior_references = behavior_references
            .iter()
            .map(|(behavior, references)| {
                let references = references
                    .iter()
                    .map(|r| {
                        Reference::new(rename_behavior(&r.entry), rename_behavior(&r.context), r.kind)
                    })
                    .collect();
                (rename_behavior(behavior), references)
            })
            .collect();

        let field_references = std::mem::take(&mut self.field_references);
        self.field_references = field_references
            .iter()
            .map(|(field, references)| {
                let references = references
                    .iter()
                    .map(|r| {
                        Reference::new(rename_field(&r.entry), rename_behavior(&r.context), r.kind)
                    })
                    .collect();
                (rename_field(field), references)
            })
            .collect();

        let bridge_methods = std::mem::take(&mut self.bridge_methods);
        self.bridge_methods = bridge_methods
            .iter()
            .map(|(target, bridge)| (rename_method(target), rename_method(bridge)))
            .collect();

        let bridged_targets = std::mem::take(&mut self.bridged_targets);
        self.bridged_targets = bridged_targets
            .iter()
            .map(|(bridge, target)| (rename_method(bridge), rename_method(target)))
            .collect();
    }

    // pass 6

    /// Rewrites mentions of every bridge's target inside the reference
    /// graphs and the per-class method sets, so downstream consumers see the
    /// pair as one linked method represented by the bridge. The access table
    /// keeps both members: both are genuinely declared, and containment
    /// queries on either side must keep working.
    fn link_bridge_methods(&mut self) {
        if self.bridge_methods.is_empty() {
            return;
        }

        let bridges = self.bridge_methods.clone();
        let rename_behavior = |behavior: &BehaviorEntry| -> BehaviorEntry {
            if let BehaviorEntry::Method(m) = behavior {
                if let Some(bridge) = bridges.get(m) {
                    return BehaviorEntry::Method(bridge.clone());
                }
            }
            behavior.clone()
        };

        let behavior_references = std::mem::take(&mut self.behavior_references);
        self.behavior_references = behavior_references
            .iter()
            .map(|(behavior, references)| {
                let references = references
                    .iter()
                    .map(|r| {
                        Reference::new(rename_behavior(&r.entry), rename_behavior(&r.context), r.kind)
                    })
                    .collect();
                (rename_behavior(behavior), references)
            })
            .collect();

        let field_references = std::mem::take(&mut self.field_references);
        self.field_references = field_references
            .iter()
            .map(|(field, references)| {
                let references = references
                    .iter()
                    .map(|r| Reference::new(r.entry.clone(), rename_behavior(&r.context), r.kind))
                    .collect();
                (field.clone(), references)
            })
            .collect();

        let implementations = std::mem::take(&mut self.method_implementations);
        self.method_implementations = implementations
            .into_iter()
            .map(|(class, methods)| {
                let methods = methods
                    .into_iter()
                    .map(|m| bridges.get(&m).cloned().unwrap_or(m))
                    .collect();
                (class, methods)
            })
            .collect();
    }

    // queries

    /// All classes of the indexed program.
    pub fn classes(&self) -> impl Iterator<Item = &ClassEntry> {
        self.classes.iter()
    }

    /// The superclass/interface graph.
    #[must_use]
    pub fn hierarchy(&self) -> &HierarchyIndex {
        &self.hierarchy
    }

    /// The access level of a declared field, method or constructor.
    #[must_use]
    pub fn access(&self, entry: &Entry) -> Option<Access> {
        self.access.get(entry).copied()
    }

    /// The declared class type of a field, when the field is of a plain
    /// object type.
    #[must_use]
    pub fn field_type(&self, field: &FieldEntry) -> Option<&ClassEntry> {
        self.field_types.get(field)
    }

    /// Methods declared by the given class.
    pub fn declared_methods<'a>(&'a self, class: &str) -> impl Iterator<Item = &'a MethodEntry> + 'a {
        self.method_implementations
            .get(class)
            .into_iter()
            .flatten()
    }

    /// Every reference edge pointing at the given field.
    pub fn field_references<'a>(
        &'a self,
        field: &FieldEntry,
    ) -> impl Iterator<Item = &'a Reference<FieldEntry>> + 'a {
        self.field_references.get(field).into_iter().flatten()
    }

    /// Every reference edge pointing at the given behavior.
    pub fn behavior_references<'a>(
        &'a self,
        behavior: &BehaviorEntry,
    ) -> impl Iterator<Item = &'a Reference<BehaviorEntry>> + 'a {
        self.behavior_references.get(behavior).into_iter().flatten()
    }

    /// The fields referenced from the body of the given behavior.
    ///
    /// Linear scan over the field reference graph; fast enough for the
    /// heuristics that need it.
    #[must_use]
    pub fn referenced_fields(&self, context: &BehaviorEntry) -> HashSet<FieldEntry> {
        self.field_references
            .values()
            .flatten()
            .filter(|r| &r.context == context)
            .map(|r| r.entry.clone())
            .collect()
    }

    /// The behaviors referenced from the body of the given behavior.
    #[must_use]
    pub fn referenced_behaviors(&self, context: &BehaviorEntry) -> HashSet<BehaviorEntry> {
        self.behavior_references
            .values()
            .flatten()
            .filter(|r| &r.context == context)
            .map(|r| r.entry.clone())
            .collect()
    }

    /// The simple names of the recovered inner classes of `outer`, sorted.
    #[must_use]
    pub fn inner_classes(&self, outer: &str) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .inner_classes
            .get(outer)
            .into_iter()
            .flatten()
            .map(String::as_str)
            .collect();
        names.sort_unstable();
        names
    }

    /// The recovered outer class of an inner class, queried by the inner
    /// class's simple name (no package, no `$`).
    #[must_use]
    pub fn outer_class(&self, inner_simple_name: &str) -> Option<&str> {
        debug_assert!(
            !inner_simple_name.contains('/'),
            "inner classes are queried by simple name, got {inner_simple_name}"
        );
        self.outer_classes.get(inner_simple_name).map(String::as_str)
    }

    /// `true` if the inner class with the given simple name was classified
    /// as anonymous.
    #[must_use]
    pub fn is_anonymous_class(&self, inner_simple_name: &str) -> bool {
        self.anonymous_classes.contains_key(inner_simple_name)
    }

    /// The behavior that constructs the given anonymous class.
    #[must_use]
    pub fn anonymous_class_caller(&self, inner_simple_name: &str) -> Option<&BehaviorEntry> {
        self.anonymous_classes.get(inner_simple_name)
    }

    /// The interfaces of a class, including those inherited through its
    /// ancestry.
    #[must_use]
    pub fn interfaces(&self, class: &str) -> HashSet<String> {
        self.hierarchy.all_interfaces(class)
    }

    /// Every class implementing `interface`, directly or via a superclass.
    #[must_use]
    pub fn implementing_classes(&self, interface: &str) -> HashSet<String> {
        self.hierarchy.implementing_classes(interface)
    }

    /// `true` if some class of the program implements `class`.
    #[must_use]
    pub fn is_interface(&self, class: &str) -> bool {
        self.hierarchy.is_interface(class)
    }

    /// The synthetic bridge delegating to `target`, if exactly one exists.
    #[must_use]
    pub fn bridge_method(&self, target: &MethodEntry) -> Option<&MethodEntry> {
        self.bridge_methods.get(target)
    }

    /// The method a bridge delegates to, if `bridge` is a recognized bridge.
    #[must_use]
    pub fn bridged_method(&self, bridge: &MethodEntry) -> Option<&MethodEntry> {
        self.bridged_targets.get(bridge)
    }

    /// Resolves the class that actually declares `entry`.
    ///
    /// If the entry's nominal class declares it, that class is returned
    /// unchanged. Otherwise the ancestry is walked upwards, re-targeting the
    /// entry at each ancestor, until a declarer is found. Exhausting the
    /// chain means the member belongs to code outside the indexed program
    /// and `None` is returned.
    #[must_use]
    pub fn resolve_entry_class(&self, entry: &Entry) -> Option<ClassEntry> {
        let mut current = entry.clone();
        let mut seen = HashSet::new();
        while !self.contains_entry(&current) {
            let class_name = current.class_name().to_string();
            if !seen.insert(class_name.clone()) {
                return None;
            }
            let superclass = self.hierarchy.superclass(&class_name)?;
            current = current.clone_to_class(ClassEntry::new(superclass));
        }
        Some(current.class_entry().clone())
    }

    /// `true` if the class is part of the indexed program.
    #[must_use]
    pub fn contains_class(&self, class: &ClassEntry) -> bool {
        self.classes.contains(class)
    }

    /// `true` if the field is declared by its nominal class.
    #[must_use]
    pub fn contains_field(&self, field: &FieldEntry) -> bool {
        self.access.contains_key(&Entry::Field(field.clone()))
    }

    /// `true` if the method or constructor is declared by its nominal class.
    #[must_use]
    pub fn contains_behavior(&self, behavior: &BehaviorEntry) -> bool {
        self.access.contains_key(&Entry::from(behavior.clone()))
    }

    /// `true` if the entry names a symbol of the indexed program.
    #[must_use]
    pub fn contains_entry(&self, entry: &Entry) -> bool {
        match entry {
            Entry::Class(class) => self.contains_class(class),
            Entry::Field(field) => self.contains_field(field),
            Entry::Method(_) | Entry::Constructor(_) => self.access.contains_key(entry),
            Entry::Argument(argument) => {
                self.contains_behavior(argument.behavior_entry())
                    && argument.index()
                        < descriptor::parameter_count(argument.behavior_entry().descriptor())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::{ProgramClass, ProgramConstructor, ProgramField, ProgramMethod};

    fn base_program() -> Program {
        // b extends a; a declares f()V and field x; b's method g calls f
        // through b and reads x through b.
        Program::new()
            .with_class(
                ProgramClass::new("none/a")
                    .with_field(ProgramField::new("x", "I"))
                    .with_method(ProgramMethod::new("f", "()V")),
            )
            .with_class(
                ProgramClass::new("none/b").with_superclass("none/a").with_method(
                    ProgramMethod::new("g", "()V").with_body(vec![
                        BodySite::MethodCall {
                            class: "none/b".to_string(),
                            name: "f".to_string(),
                            descriptor: "()V".to_string(),
                        },
                        BodySite::FieldRead {
                            class: "none/b".to_string(),
                            name: "x".to_string(),
                            descriptor: "I".to_string(),
                        },
                    ]),
                ),
            )
    }

    #[test]
    fn test_references_resolve_to_declaring_class() {
        let index = ProgramIndex::build(&base_program(), true).unwrap();

        let declared = BehaviorEntry::Method(MethodEntry::new(ClassEntry::new("none/a"), "f", "()V"));
        assert_eq!(index.behavior_references(&declared).count(), 1);

        let nominal = BehaviorEntry::Method(MethodEntry::new(ClassEntry::new("none/b"), "f", "()V"));
        assert_eq!(index.behavior_references(&nominal).count(), 0);

        let field = FieldEntry::new(ClassEntry::new("none/a"), "x");
        assert_eq!(index.field_references(&field).count(), 1);
    }

    #[test]
    fn test_resolve_entry_class_walks_ancestry() {
        let index = ProgramIndex::build(&base_program(), true).unwrap();

        let local = Entry::Method(MethodEntry::new(ClassEntry::new("none/a"), "f", "()V"));
        assert_eq!(index.resolve_entry_class(&local), Some(ClassEntry::new("none/a")));

        let inherited = Entry::Method(MethodEntry::new(ClassEntry::new("none/b"), "f", "()V"));
        assert_eq!(
            index.resolve_entry_class(&inherited),
            Some(ClassEntry::new("none/a"))
        );

        let unknown = Entry::Method(MethodEntry::new(ClassEntry::new("none/a"), "nope", "()V"));
        assert_eq!(index.resolve_entry_class(&unknown), None);
    }

    #[test]
    fn test_self_interface_aborts_indexing() {
        let program =
            Program::new().with_class(ProgramClass::new("none/a").with_interface("none/a"));
        assert!(matches!(
            ProgramIndex::build(&program, true),
            Err(crate::Error::SelfInterface(_))
        ));
    }

    #[test]
    fn test_contains_argument_checks_parameter_count() {
        let index = ProgramIndex::build(&base_program(), true).unwrap();
        let behavior =
            BehaviorEntry::Method(MethodEntry::new(ClassEntry::new("none/a"), "f", "()V"));
        let argument = crate::entry::ArgumentEntry::new(behavior, 0, "arg");
        assert!(!index.contains_entry(&Entry::Argument(argument)));

        let program = base_program().with_class(
            ProgramClass::new("none/c")
                .with_constructor(ProgramConstructor::new("(Ljava/lang/String;)V")),
        );
        let index = ProgramIndex::build(&program, true).unwrap();
        let ctor = BehaviorEntry::Constructor(ConstructorEntry::new(
            ClassEntry::new("none/c"),
            "(Ljava/lang/String;)V",
        ));
        let argument = crate::entry::ArgumentEntry::new(ctor.clone(), 0, "arg");
        assert!(index.contains_entry(&Entry::Argument(argument)));
        let out_of_range = crate::entry::ArgumentEntry::new(ctor, 1, "arg");
        assert!(!index.contains_entry(&Entry::Argument(out_of_range)));
    }

    #[test]
    fn test_duplicate_bridges_disqualify_target() {
        let synthetic = AccessFlags::SYNTHETIC;
        let delegate = |descriptor: &str| {
            ProgramMethod::new("f", descriptor)
                .with_flags(synthetic)
                .with_body(vec![BodySite::MethodCall {
                    class: "none/a".to_string(),
                    name: "g".to_string(),
                    descriptor: "()Ljava/lang/String;".to_string(),
                }])
        };
        let program = Program::new().with_class(
            ProgramClass::new("none/a")
                .with_method(ProgramMethod::new("g", "()Ljava/lang/String;"))
                .with_method(delegate("()Ljava/lang/Object;"))
                .with_method(delegate("()Ljava/lang/CharSequence;")),
        );
        let index = ProgramIndex::build(&program, true).unwrap();
        let target = MethodEntry::new(ClassEntry::new("none/a"), "g", "()Ljava/lang/String;");
        assert!(index.bridge_method(&target).is_none());
    }
}
