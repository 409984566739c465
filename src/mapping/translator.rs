//! Stateless translation of entries and signatures through a mapping tree.

use std::collections::HashMap;

use crate::{
    descriptor,
    entry::{
        ArgumentEntry, BehaviorEntry, ClassEntry, ConstructorEntry, Entry, FieldEntry,
        MethodEntry, Reference,
    },
    mapping::ClassMapping,
};

/// Which way a translator maps names.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, strum::Display, strum::EnumIter,
)]
pub enum TranslationDirection {
    /// Obfuscated names in, deobfuscated names out.
    #[default]
    Deobfuscating,
    /// Deobfuscated names in, obfuscated names out.
    Obfuscating,
}

/// A pure function of one mapping tree and one direction.
///
/// A translator is an immutable snapshot taken from
/// [`crate::mapping::Mappings::translator`]; entries with no mapping pass
/// through unchanged, so translating in one direction and then the reverse
/// returns the original entry whenever the mappings are injective within
/// their scope. Holders of a mutable [`crate::mapping::Mappings`] cache
/// translators per direction and drop the cache whenever the tree mutates.
///
/// `Translator::default()` is the identity translator in the deobfuscating
/// direction.
#[derive(Debug, Clone, Default)]
pub struct Translator {
    direction: TranslationDirection,
    classes: HashMap<String, ClassMapping>,
    deobf_to_obf: HashMap<String, String>,
}

impl Translator {
    pub(crate) fn new(
        direction: TranslationDirection,
        classes: HashMap<String, ClassMapping>,
        deobf_to_obf: HashMap<String, String>,
    ) -> Self {
        Translator {
            direction,
            classes,
            deobf_to_obf,
        }
    }

    /// The direction this translator maps in.
    #[must_use]
    pub fn direction(&self) -> TranslationDirection {
        self.direction
    }

    // nullable name lookups

    /// The mapped name of a class, or `None` when it has no explicit
    /// mapping. Enclosing scopes without names of their own pass through.
    #[must_use]
    pub fn translate_class(&self, class: &ClassEntry) -> Option<String> {
        let (translated, explicit) = self.walk_class_name(class.name());
        explicit.then_some(translated)
    }

    /// The mapped name of a field, or `None` when it has no mapping.
    #[must_use]
    pub fn translate_field(&self, field: &FieldEntry) -> Option<String> {
        let scope = self.scope_for(field.class_name())?;
        match self.direction {
            TranslationDirection::Deobfuscating => {
                scope.deobf_field_name(field.name()).map(str::to_string)
            }
            TranslationDirection::Obfuscating => {
                scope.obf_field_name(field.name()).map(str::to_string)
            }
        }
    }

    /// The mapped name of a method, or `None` when it has no mapping.
    #[must_use]
    pub fn translate_method(&self, method: &MethodEntry) -> Option<String> {
        let scope = self.scope_for(method.class_name())?;
        match self.direction {
            TranslationDirection::Deobfuscating => scope
                .method_by_obf(method.name(), method.descriptor())
                .and_then(|m| m.deobf_name())
                .map(str::to_string),
            TranslationDirection::Obfuscating => {
                // Method mappings are keyed by obfuscated descriptor in both
                // indexes, so map the descriptor first.
                let obf_descriptor = self.translate_signature(method.descriptor());
                scope
                    .method_by_deobf(method.name(), &obf_descriptor)
                    .map(|m| m.obf_name().to_string())
            }
        }
    }

    /// The mapped name of an argument, or `None` when it has no override.
    #[must_use]
    pub fn translate_argument(&self, argument: &ArgumentEntry) -> Option<String> {
        let behavior = argument.behavior_entry();
        let scope = self.scope_for(behavior.class_name())?;
        let mapping = match self.direction {
            TranslationDirection::Deobfuscating => {
                scope.method_by_obf(behavior.mapping_name(), behavior.descriptor())
            }
            TranslationDirection::Obfuscating => {
                let obf_descriptor = self.translate_signature(behavior.descriptor());
                scope
                    .method_by_deobf(behavior.mapping_name(), &obf_descriptor)
                    .or_else(|| scope.method_by_obf(behavior.mapping_name(), &obf_descriptor))
            }
        }?;
        let arg = mapping.argument(argument.index())?;
        match self.direction {
            TranslationDirection::Deobfuscating => Some(arg.deobf_name().to_string()),
            TranslationDirection::Obfuscating => {
                (arg.deobf_name() == argument.name()).then(|| arg.obf_name().to_string())
            }
        }
    }

    // entry translation with identity passthrough

    /// Translates any entry, substituting every name and signature the
    /// mapping tree covers and passing everything else through unchanged.
    #[must_use]
    pub fn translate_entry(&self, entry: &Entry) -> Entry {
        match entry {
            Entry::Class(c) => Entry::Class(self.translate_class_entry(c)),
            Entry::Field(f) => Entry::Field(self.translate_field_entry(f)),
            Entry::Method(m) => Entry::Method(self.translate_method_entry(m)),
            Entry::Constructor(c) => Entry::Constructor(self.translate_constructor_entry(c)),
            Entry::Argument(a) => Entry::Argument(self.translate_argument_entry(a)),
        }
    }

    /// Translates a class entry.
    #[must_use]
    pub fn translate_class_entry(&self, class: &ClassEntry) -> ClassEntry {
        ClassEntry::new(self.walk_class_name(class.name()).0)
    }

    /// Translates a field entry.
    #[must_use]
    pub fn translate_field_entry(&self, field: &FieldEntry) -> FieldEntry {
        let name = self
            .translate_field(field)
            .unwrap_or_else(|| field.name().to_string());
        FieldEntry::new(self.translate_class_entry(field.class_entry()), name)
    }

    /// Translates a method entry.
    #[must_use]
    pub fn translate_method_entry(&self, method: &MethodEntry) -> MethodEntry {
        let name = self
            .translate_method(method)
            .unwrap_or_else(|| method.name().to_string());
        MethodEntry::new(
            self.translate_class_entry(method.class_entry()),
            name,
            self.translate_signature(method.descriptor()),
        )
    }

    /// Translates a constructor entry.
    #[must_use]
    pub fn translate_constructor_entry(&self, constructor: &ConstructorEntry) -> ConstructorEntry {
        ConstructorEntry::new(
            self.translate_class_entry(constructor.class_entry()),
            self.translate_signature(constructor.descriptor()),
        )
    }

    /// Translates a behavior entry.
    #[must_use]
    pub fn translate_behavior_entry(&self, behavior: &BehaviorEntry) -> BehaviorEntry {
        match behavior {
            BehaviorEntry::Method(m) => BehaviorEntry::Method(self.translate_method_entry(m)),
            BehaviorEntry::Constructor(c) => {
                BehaviorEntry::Constructor(self.translate_constructor_entry(c))
            }
        }
    }

    /// Translates an argument entry.
    #[must_use]
    pub fn translate_argument_entry(&self, argument: &ArgumentEntry) -> ArgumentEntry {
        let name = self
            .translate_argument(argument)
            .unwrap_or_else(|| argument.name().to_string());
        ArgumentEntry::new(
            self.translate_behavior_entry(argument.behavior_entry()),
            argument.index(),
            name,
        )
    }

    /// Translates every class name referenced by a field or method
    /// descriptor.
    #[must_use]
    pub fn translate_signature(&self, signature: &str) -> String {
        descriptor::rewrite_classes(signature, |name| {
            let (translated, _) = self.walk_class_name(name);
            (translated != name).then_some(translated)
        })
    }

    /// Translates a behavior reference edge, entry and context both.
    #[must_use]
    pub fn translate_behavior_reference(
        &self,
        reference: &Reference<BehaviorEntry>,
    ) -> Reference<BehaviorEntry> {
        Reference::new(
            self.translate_behavior_entry(&reference.entry),
            self.translate_behavior_entry(&reference.context),
            reference.kind,
        )
    }

    /// Translates a field reference edge, entry and context both.
    #[must_use]
    pub fn translate_field_reference(
        &self,
        reference: &Reference<FieldEntry>,
    ) -> Reference<FieldEntry> {
        Reference::new(
            self.translate_field_entry(&reference.entry),
            self.translate_behavior_entry(&reference.context),
            reference.kind,
        )
    }

    // internals

    /// Walks a (possibly nested) class name segment by segment through the
    /// mapping tree in this translator's direction. Returns the fully
    /// substituted name and whether the final segment carried an explicit
    /// mapping.
    fn walk_class_name(&self, name: &str) -> (String, bool) {
        let (root, segments) = match name.find('$') {
            Some(i) => (&name[..i], name[i + 1..].split('$').collect::<Vec<_>>()),
            None => (name, Vec::new()),
        };

        let root_mapping = match self.direction {
            TranslationDirection::Deobfuscating => self.classes.get(root),
            TranslationDirection::Obfuscating => self
                .deobf_to_obf
                .get(root)
                .and_then(|obf| self.classes.get(obf))
                .or_else(|| self.classes.get(root)),
        };
        let Some(root_mapping) = root_mapping else {
            return (name.to_string(), false);
        };

        let mut parts: Vec<String> = Vec::with_capacity(segments.len() + 1);
        let mut explicit = match self.direction {
            TranslationDirection::Deobfuscating => {
                parts.push(
                    root_mapping
                        .deobf_name()
                        .unwrap_or(root)
                        .to_string(),
                );
                root_mapping.deobf_name().is_some()
            }
            TranslationDirection::Obfuscating => {
                parts.push(root_mapping.obf_name().to_string());
                self.deobf_to_obf.contains_key(root)
            }
        };

        let mut current = root_mapping;
        let mut segments = segments.into_iter();
        for segment in segments.by_ref() {
            let child = match self.direction {
                TranslationDirection::Deobfuscating => current.inner_class_by_obf(segment),
                TranslationDirection::Obfuscating => current.inner_class_by_deobf_then_obf(segment),
            };
            let Some(child) = child else {
                // No deeper mappings; the rest of the chain passes through.
                parts.push(segment.to_string());
                explicit = false;
                break;
            };
            match self.direction {
                TranslationDirection::Deobfuscating => {
                    parts.push(child.deobf_name().unwrap_or(segment).to_string());
                    explicit = child.deobf_name().is_some();
                }
                TranslationDirection::Obfuscating => {
                    parts.push(child.obf_name().to_string());
                    explicit = child.deobf_name() == Some(segment);
                }
            }
            current = child;
        }
        for rest in segments {
            parts.push(rest.to_string());
            explicit = false;
        }

        (parts.join("$"), explicit)
    }

    /// The mapping scope of a class named in this translator's input naming
    /// space.
    fn scope_for(&self, class_name: &str) -> Option<&ClassMapping> {
        let (root, segments) = match class_name.find('$') {
            Some(i) => (
                &class_name[..i],
                class_name[i + 1..].split('$').collect::<Vec<_>>(),
            ),
            None => (class_name, Vec::new()),
        };

        let mut current = match self.direction {
            TranslationDirection::Deobfuscating => self.classes.get(root)?,
            TranslationDirection::Obfuscating => self
                .deobf_to_obf
                .get(root)
                .and_then(|obf| self.classes.get(obf))
                .or_else(|| self.classes.get(root))?,
        };
        for segment in segments {
            current = match self.direction {
                TranslationDirection::Deobfuscating => current.inner_class_by_obf(segment)?,
                TranslationDirection::Obfuscating => {
                    current.inner_class_by_deobf_then_obf(segment)?
                }
            };
        }
        Some(current)
    }
}
