//! High-level deobfuscation session over one program.
//!
//! [`Deobfuscator`] ties the pieces together: it ingests a
//! [`Program`] into a [`ProgramIndex`], owns the mutable [`Mappings`]
//! forest, caches one [`Translator`] per direction and invalidates that
//! cache in the same step as every tree mutation, and exposes the
//! rename/remove/mark dispatch over all entry kinds plus the relationship
//! tree builders used by presentation layers.
//!
//! The index is built once and read-only afterwards; mapping mutations must
//! be externally serialized (one in flight at a time), which the `&mut self`
//! receivers enforce for a single owner.

use std::collections::HashMap;

use crate::{
    analysis::{
        ClassImplementationsTreeNode, ClassInheritanceTreeNode, MethodImplementationsTreeNode,
        MethodInheritanceTreeNode, ProgramIndex,
    },
    entry::{BehaviorEntry, ClassEntry, ConstructorEntry, Entry, FieldEntry, MethodEntry,
        CONSTRUCTOR_NAME},
    mapping::{Mappings, MappingsRenamer, TranslationDirection, Translator},
    program::{Program, NONE_PACKAGE},
    progress::{NoProgress, ProgressListener},
    Result,
};

/// The top-level classes of a program split into the still-obfuscated and
/// the already-named, as produced by [`Deobfuscator::partition_classes`].
#[derive(Debug, Default, Clone)]
pub struct ClassPartition {
    /// Classes with no differing mapping, still in the synthetic `none/`
    /// package.
    pub obfuscated: Vec<ClassEntry>,
    /// Classes with an explicit differing mapping, or that never lived in
    /// the synthetic package to begin with.
    pub deobfuscated: Vec<ClassEntry>,
}

/// A deobfuscation session: one indexed program plus one mutable mapping
/// forest.
#[derive(Debug)]
pub struct Deobfuscator {
    index: ProgramIndex,
    mappings: Mappings,
    translator_cache: HashMap<TranslationDirection, Translator>,
}

impl Deobfuscator {
    /// Ingests a program and starts a session with empty mappings.
    ///
    /// # Errors
    ///
    /// Returns an error when indexing fails on structurally invalid input.
    pub fn new(program: &Program) -> Result<Self> {
        Self::with_progress(program, &mut NoProgress)
    }

    /// Ingests a program, reporting indexing progress.
    ///
    /// # Errors
    ///
    /// Returns an error when indexing fails on structurally invalid input.
    pub fn with_progress(program: &Program, progress: &mut dyn ProgressListener) -> Result<Self> {
        let index = ProgramIndex::build_with_progress(program, true, progress)?;
        Ok(Deobfuscator {
            index,
            mappings: Mappings::new(),
            translator_cache: HashMap::new(),
        })
    }

    /// The cross-reference index of the ingested program.
    #[must_use]
    pub fn index(&self) -> &ProgramIndex {
        &self.index
    }

    /// The current mapping forest.
    #[must_use]
    pub fn mappings(&self) -> &Mappings {
        &self.mappings
    }

    /// Replaces the mapping forest, revalidating it against the index.
    ///
    /// Three fixup passes run in order: root mappings whose class turned
    /// out to be an inner class are rewritten to their `Outer$Inner` names;
    /// field and method mappings recorded against an inheriting class are
    /// moved to the declaring class; and mapping nodes referencing symbols
    /// absent from the index are dropped with a warning, keeping the rest
    /// of the tree.
    ///
    /// # Errors
    ///
    /// Currently infallible in practice; the `Result` covers closure
    /// computation the move pass may need in the future.
    pub fn set_mappings(&mut self, mappings: Mappings) -> Result<()> {
        let mut mappings = mappings;

        // pass 1: relocate classes that moved into inner classes
        let mut renames: Vec<(String, String)> = Vec::new();
        for mapping in mappings.classes() {
            let entry = ClassEntry::new(mapping.obf_name());
            let simple = entry.simple_name();
            if let Some(outer) = self.index.outer_class(simple) {
                let composite = format!("{outer}${simple}");
                if composite != mapping.obf_name() {
                    renames.push((mapping.obf_name().to_string(), composite));
                }
            }
        }
        for (old, new) in renames {
            log::info!("converted class mapping {old} to {new}");
            mappings.rename_obf_class(&old, &new);
        }

        // pass 2: move member mappings to their declaring classes
        // TODO: recurse into nested class scopes as well
        let mut field_moves = Vec::new();
        let mut method_moves = Vec::new();
        for mapping in mappings.classes() {
            let class = ClassEntry::new(mapping.obf_name());
            for field in mapping.fields() {
                let entry = FieldEntry::new(class.clone(), field.obf_name());
                if let Some(resolved) = self.index.resolve_entry_class(&Entry::Field(entry.clone()))
                {
                    if resolved != class {
                        field_moves.push((class.clone(), field.clone(), resolved, entry));
                    }
                }
            }
            for method in mapping.methods() {
                if method.is_constructor() {
                    continue;
                }
                let entry =
                    MethodEntry::new(class.clone(), method.obf_name(), method.obf_descriptor());
                if let Some(resolved) =
                    self.index.resolve_entry_class(&Entry::Method(entry.clone()))
                {
                    if resolved != class {
                        method_moves.push((class.clone(), method.clone(), resolved, entry));
                    }
                }
            }
        }
        {
            let mut renamer = MappingsRenamer::new(&self.index, &mut mappings);
            for (from, field, to, entry) in field_moves {
                if renamer.move_field_to_obf_class(&from, &field, &to) {
                    log::info!("moved field mapping {entry} to class {to}");
                } else {
                    log::warn!(
                        "would move field mapping {entry} to class {to}, but it is already mapped there; dropping"
                    );
                }
            }
            for (from, method, to, entry) in method_moves {
                if renamer.move_method_to_obf_class(&from, &method, &to) {
                    log::info!("moved method mapping {entry} to class {to}");
                } else {
                    log::warn!(
                        "would move method mapping {entry} to class {to}, but it is already mapped there; dropping"
                    );
                }
            }
        }

        // pass 3: drop mappings whose symbols are gone from the program
        let roots: Vec<String> = mappings.classes().map(|c| c.obf_name().to_string()).collect();
        for root in roots {
            if let Some(mut mapping) = mappings.remove_class_mapping(&root) {
                if validate_class_mapping(&self.index, &mut mapping, &root) {
                    mappings.put_root(mapping);
                } else {
                    log::warn!("unable to find class {root} in the program; dropping its mapping");
                }
            }
        }

        self.mappings = mappings;
        self.translator_cache.clear();
        Ok(())
    }

    /// The translator for a direction, cached until the next mutation.
    pub fn translator(&mut self, direction: TranslationDirection) -> &Translator {
        Self::cached_translator(&mut self.translator_cache, &self.mappings, direction)
    }

    fn cached_translator<'a>(
        cache: &'a mut HashMap<TranslationDirection, Translator>,
        mappings: &Mappings,
        direction: TranslationDirection,
    ) -> &'a Translator {
        if !cache.contains_key(&direction) {
            cache.insert(direction, mappings.translator(direction));
        }
        &cache[&direction]
    }

    /// Translates an entry from obfuscated to deobfuscated names.
    pub fn deobfuscate_entry(&mut self, entry: &Entry) -> Entry {
        self.translator(TranslationDirection::Deobfuscating)
            .translate_entry(entry)
    }

    /// Translates an entry from deobfuscated to obfuscated names.
    pub fn obfuscate_entry(&mut self, entry: &Entry) -> Entry {
        self.translator(TranslationDirection::Obfuscating)
            .translate_entry(entry)
    }

    /// `true` if the entry currently carries an explicit deobfuscated name.
    /// Constructors have no name and always report `false`.
    pub fn has_deobf_name(&mut self, entry: &Entry) -> bool {
        let translator = self.translator(TranslationDirection::Deobfuscating);
        match entry {
            Entry::Class(c) => translator.translate_class(c).is_some(),
            Entry::Field(f) => translator.translate_field(f).is_some(),
            Entry::Method(m) => translator.translate_method(m).is_some(),
            Entry::Constructor(_) => false,
            Entry::Argument(a) => translator.translate_argument(a).is_some(),
        }
    }

    /// `true` if the entry names a symbol of the indexed program.
    #[must_use]
    pub fn is_program_identifier(&self, entry: &Entry) -> bool {
        self.index.contains_entry(entry)
    }

    /// `true` if the entry can be renamed at all: part of the program and
    /// not a constructor.
    #[must_use]
    pub fn is_renameable(&self, entry: &Entry) -> bool {
        !matches!(entry, Entry::Constructor(_)) && self.index.contains_entry(entry)
    }

    /// Assigns a deobfuscated name to an entry, propagating method renames
    /// across the related-implementation closure.
    ///
    /// # Errors
    ///
    /// Rejects constructors, invalid names and scope collisions; the tree
    /// is untouched in every error case.
    pub fn rename(&mut self, entry: &Entry, new_name: &str) -> Result<()> {
        {
            let mut renamer = MappingsRenamer::new(&self.index, &mut self.mappings);
            match entry {
                Entry::Class(c) => renamer.set_class_name(c, new_name)?,
                Entry::Field(f) => renamer.set_field_name(f, new_name)?,
                Entry::Method(m) => renamer.set_method_tree_name(m, new_name)?,
                Entry::Constructor(_) => return Err(crate::Error::ConstructorTarget),
                Entry::Argument(a) => renamer.set_argument_name(a, new_name)?,
            }
        }
        self.translator_cache.clear();
        Ok(())
    }

    /// Removes the mapping of an entry, propagating method removals across
    /// the related-implementation closure.
    ///
    /// # Errors
    ///
    /// Rejects constructors and closures that cannot be computed.
    pub fn remove_mapping(&mut self, entry: &Entry) -> Result<()> {
        {
            let mut renamer = MappingsRenamer::new(&self.index, &mut self.mappings);
            match entry {
                Entry::Class(c) => renamer.remove_class_mapping(c),
                Entry::Field(f) => renamer.remove_field_mapping(f),
                Entry::Method(m) => renamer.remove_method_tree_mapping(m)?,
                Entry::Constructor(_) => return Err(crate::Error::ConstructorTarget),
                Entry::Argument(a) => renamer.remove_argument_mapping(a),
            }
        }
        self.translator_cache.clear();
        Ok(())
    }

    /// Freezes an entry as already named without supplying a new name,
    /// propagating across method closures.
    ///
    /// # Errors
    ///
    /// Rejects constructors and collisions of the synthesized name.
    pub fn mark_as_deobfuscated(&mut self, entry: &Entry) -> Result<()> {
        {
            let mut renamer = MappingsRenamer::new(&self.index, &mut self.mappings);
            match entry {
                Entry::Class(c) => renamer.mark_class_as_deobfuscated(c)?,
                Entry::Field(f) => renamer.mark_field_as_deobfuscated(f)?,
                Entry::Method(m) => renamer.mark_method_tree_as_deobfuscated(m)?,
                Entry::Constructor(_) => return Err(crate::Error::ConstructorTarget),
                Entry::Argument(a) => renamer.mark_argument_as_deobfuscated(a)?,
            }
        }
        self.translator_cache.clear();
        Ok(())
    }

    /// Splits the top-level classes into still-obfuscated and already-named
    /// sets, both in the obfuscator's `a, b, ..., aa` order.
    pub fn partition_classes(&mut self) -> ClassPartition {
        let translator = Self::cached_translator(
            &mut self.translator_cache,
            &self.mappings,
            TranslationDirection::Deobfuscating,
        );

        let mut partition = ClassPartition::default();
        for class in self.index.classes() {
            if class.is_inner_class() {
                continue;
            }
            let deobf = translator.translate_class_entry(class);
            if &deobf != class {
                partition.deobfuscated.push(class.clone());
            } else if class.package_name() != Some(NONE_PACKAGE) {
                partition.deobfuscated.push(class.clone());
            } else {
                partition.obfuscated.push(class.clone());
            }
        }

        let order = |a: &ClassEntry, b: &ClassEntry| {
            a.name()
                .len()
                .cmp(&b.name().len())
                .then_with(|| a.name().cmp(b.name()))
        };
        partition.obfuscated.sort_by(order);
        partition.deobfuscated.sort_by(order);
        partition
    }

    /// Builds the class inheritance tree containing `class`, displayed with
    /// deobfuscated names.
    pub fn class_inheritance(&mut self, class: &ClassEntry) -> ClassInheritanceTreeNode {
        let translator = Self::cached_translator(
            &mut self.translator_cache,
            &self.mappings,
            TranslationDirection::Deobfuscating,
        );
        ClassInheritanceTreeNode::build(&self.index, translator, class)
    }

    /// Builds the implementations tree of an interface, or `None` when the
    /// class is not an interface.
    pub fn class_implementations(
        &mut self,
        class: &ClassEntry,
    ) -> Option<ClassImplementationsTreeNode> {
        let translator = Self::cached_translator(
            &mut self.translator_cache,
            &self.mappings,
            TranslationDirection::Deobfuscating,
        );
        ClassImplementationsTreeNode::build(&self.index, translator, class)
    }

    /// Builds the method inheritance tree containing `method`.
    pub fn method_inheritance(&mut self, method: &MethodEntry) -> MethodInheritanceTreeNode {
        let translator = Self::cached_translator(
            &mut self.translator_cache,
            &self.mappings,
            TranslationDirection::Deobfuscating,
        );
        MethodInheritanceTreeNode::build(&self.index, translator, method)
    }

    /// Builds the implementations tree of the interface method `method`
    /// satisfies.
    ///
    /// # Errors
    ///
    /// Returns an error when more than one interface declares the
    /// signature.
    pub fn method_implementations(
        &mut self,
        method: &MethodEntry,
    ) -> Result<Option<MethodImplementationsTreeNode>> {
        let translator = Self::cached_translator(
            &mut self.translator_cache,
            &self.mappings,
            TranslationDirection::Deobfuscating,
        );
        MethodImplementationsTreeNode::build(&self.index, translator, method)
    }
}

/// Validates one class mapping subtree against the index, dropping field,
/// method and nested nodes whose symbols no longer exist. Returns `false`
/// when the class itself is unknown and the whole subtree should go.
fn validate_class_mapping(
    index: &ProgramIndex,
    mapping: &mut crate::mapping::ClassMapping,
    full_name: &str,
) -> bool {
    let class_entry = ClassEntry::new(full_name);
    if !index.contains_class(&class_entry) {
        return false;
    }

    let field_names: Vec<String> = mapping.fields().map(|f| f.obf_name().to_string()).collect();
    for name in field_names {
        let entry = FieldEntry::new(class_entry.clone(), &name);
        if !index.contains_field(&entry) {
            log::warn!("unable to find field {entry}; dropping its mapping");
            mapping.remove_field_mapping(&name);
        }
    }

    let method_keys: Vec<(String, String)> = mapping
        .methods()
        .map(|m| (m.obf_name().to_string(), m.obf_descriptor().to_string()))
        .collect();
    for (name, descriptor) in method_keys {
        let behavior = if name == CONSTRUCTOR_NAME {
            BehaviorEntry::Constructor(ConstructorEntry::new(class_entry.clone(), &descriptor))
        } else {
            BehaviorEntry::Method(MethodEntry::new(class_entry.clone(), &name, &descriptor))
        };
        if !index.contains_behavior(&behavior) {
            log::warn!("unable to find behavior {behavior}; dropping its mapping");
            mapping.remove_method_mapping(&name, &descriptor);
        }
    }

    let inner_names: Vec<String> = mapping
        .inner_classes()
        .map(|c| c.obf_name().to_string())
        .collect();
    for simple in inner_names {
        let inner_full = format!("{full_name}${simple}");
        let keep = match mapping.inner_class_by_obf_mut(&simple) {
            Some(child) => validate_class_mapping(index, child, &inner_full),
            None => true,
        };
        if !keep {
            log::warn!("unable to find class {inner_full}; dropping its mapping");
            mapping.remove_inner_class(&simple);
        }
    }

    true
}
