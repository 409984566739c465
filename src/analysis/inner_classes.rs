//! Heuristic recovery of inner and anonymous class structure.
//!
//! Obfuscators flatten nested classes into ordinary top-level classes, but
//! the compiled artifacts keep two tells: a nested class's constructor
//! writes compiler-synthesized capture fields before delegating to another
//! constructor (a write sequence source code could never produce), and the
//! enclosing class is the one constructing it. Both heuristics here are
//! best-effort by design: when the candidates are ambiguous the relationship
//! is logged and left unresolved rather than guessed, because obfuscated
//! input is expected to sometimes defeat them.

use std::collections::HashSet;

use crate::{
    analysis::ProgramIndex,
    descriptor,
    entry::{BehaviorEntry, ClassEntry, ConstructorEntry},
    program::{AccessFlags, BodySite, ProgramClass, ProgramConstructor},
};

/// Attempts to recover the outer class of `class`.
///
/// Runs once per class with a qualifying ("synthetic-capturing")
/// constructor. Two candidate sets are gathered independently: the declared
/// types of the captured synthetic fields, and the classes that construct
/// this class through that constructor. See the resolution rules inline;
/// ambiguity logs a warning and yields `None`.
pub(crate) fn find_outer_class(index: &ProgramIndex, class: &ProgramClass) -> Option<String> {
    for constructor in &class.constructors {
        let Some(captured_types) = synthetic_capture_types(class, constructor) else {
            continue;
        };

        let class_entry = ClassEntry::new(&class.name);
        let constructor_entry = ConstructorEntry::new(class_entry.clone(), &constructor.descriptor);

        // Candidate set A: declared types of the captured synthetic fields.
        let captured_classes: HashSet<ClassEntry> = captured_types
            .iter()
            .filter_map(|type_descriptor| descriptor::type_class(type_descriptor))
            .map(ClassEntry::new)
            .filter(|candidate| is_sane_outer_class(index, candidate, &class_entry))
            .collect();

        // Candidate set B: classes calling this constructor.
        let mut caller_classes: HashSet<ClassEntry> = HashSet::new();
        for reference in
            index.behavior_references(&BehaviorEntry::Constructor(constructor_entry.clone()))
        {
            // A constructor-to-constructor edge whose callee is the caller's
            // superclass is an implicit super() call, not a construction.
            if let (BehaviorEntry::Constructor(called), BehaviorEntry::Constructor(caller)) =
                (&reference.entry, &reference.context)
            {
                let caller_superclass = index.hierarchy().superclass(caller.class_name());
                if caller_superclass == Some(called.class_name()) {
                    continue;
                }
            }

            let caller_class = reference.context.class_entry();
            if is_sane_outer_class(index, caller_class, &class_entry) {
                caller_classes.insert(caller_class.clone());
            }
        }

        if caller_classes.is_empty() {
            if captured_classes.len() == 1 {
                return captured_classes.into_iter().next().map(|c| c.name().to_string());
            }
            log::warn!(
                "unable to find outer class for {class_entry}: no caller and {} captured field type candidates",
                captured_classes.len()
            );
        } else if caller_classes.len() == 1 {
            return caller_classes.into_iter().next().map(|c| c.name().to_string());
        } else {
            // Multiple callers; see whether the captured types narrow it down.
            let intersection: Vec<&ClassEntry> = caller_classes
                .iter()
                .filter(|caller| captured_classes.contains(*caller))
                .collect();
            if intersection.len() == 1 {
                return Some(intersection[0].name().to_string());
            }
            log::warn!(
                "unable to choose outer class for {class_entry} among {} callers",
                caller_classes.len()
            );
        }
    }

    None
}

/// Collects the descriptors of the synthetic fields a constructor writes
/// before its first `this(...)`/`super(...)` delegation.
///
/// Returns `None` when the constructor does not qualify: no pre-delegation
/// writes at all, or a pre-delegation write that targets a field outside
/// the class or a field that is not compiler-synthesized.
fn synthetic_capture_types(
    class: &ProgramClass,
    constructor: &ProgramConstructor,
) -> Option<HashSet<String>> {
    let mut early_writes = Vec::new();
    for site in &constructor.body {
        match site {
            BodySite::Delegation { .. } => break,
            BodySite::FieldWrite {
                class: field_class,
                name,
                descriptor,
            } => early_writes.push((field_class, name, descriptor)),
            _ => {}
        }
    }

    if early_writes.is_empty() {
        return None;
    }

    let mut captured = HashSet::new();
    for (field_class, name, field_descriptor) in early_writes {
        if field_class != &class.name {
            log::warn!(
                "pre-delegation write to non-member field {field_class}.{name} in {}",
                class.name
            );
            return None;
        }

        let Some(field) = class
            .fields
            .iter()
            .find(|f| &f.name == name && &f.descriptor == field_descriptor)
        else {
            // Field lives in a superclass; cannot be a local synthetic capture.
            return None;
        };

        if !field.flags.contains(AccessFlags::SYNTHETIC) {
            log::warn!(
                "pre-delegation write to non-synthetic field {} {}.{name}",
                field.descriptor,
                class.name
            );
            return None;
        }
        captured.insert(field.descriptor.clone());
    }

    Some(captured)
}

fn is_sane_outer_class(
    index: &ProgramIndex,
    candidate: &ClassEntry,
    inner: &ClassEntry,
) -> bool {
    candidate != inner && index.contains_class(candidate)
}

/// Decides whether a class with a resolved outer class is anonymous, and if
/// so returns the behavior that constructs it.
///
/// An anonymous class is not abstract, has exactly one constructor, that
/// constructor is referenced exactly once in the whole program, and the
/// calling behavior never otherwise names the class's type - a mention in a
/// referenced field's declared type or in a referenced behavior's descriptor
/// means the caller needed a name for the type, so it cannot be anonymous.
/// Failed preconditions are logged at debug level and yield `None`.
pub(crate) fn classify_anonymous(
    index: &ProgramIndex,
    class: &ProgramClass,
) -> Option<BehaviorEntry> {
    let class_entry = ClassEntry::new(&class.name);

    if class.flags.contains(AccessFlags::ABSTRACT) {
        log::debug!("{class_entry} is abstract, not anonymous");
        return None;
    }

    let [constructor] = class.constructors.as_slice() else {
        log::debug!(
            "{class_entry} has {} constructors, not anonymous",
            class.constructors.len()
        );
        return None;
    };

    let constructor_entry = BehaviorEntry::Constructor(ConstructorEntry::new(
        class_entry.clone(),
        &constructor.descriptor,
    ));
    let mut references = index.behavior_references(&constructor_entry);
    let (Some(reference), None) = (references.next(), references.next()) else {
        log::debug!("constructor of {class_entry} is not called exactly once, not anonymous");
        return None;
    };

    let caller = reference.context.clone();
    for field in index.referenced_fields(&caller) {
        if let Some(field_class) = index.field_type(&field) {
            if field_class == &class_entry {
                log::debug!("caller of {class_entry} stores it in a field, not anonymous");
                return None;
            }
        }
    }
    for behavior in index.referenced_behaviors(&caller) {
        if descriptor::mentions_class(behavior.descriptor(), class_entry.name()) {
            log::debug!("caller of {class_entry} names it in a descriptor, not anonymous");
            return None;
        }
    }

    Some(caller)
}
