//! Convenient re-exports of the most commonly used types and traits.
//!
//! # Example
//!
//! ```rust
//! use classcope::prelude::*;
//!
//! let program = Program::new().with_class(ProgramClass::new("a"));
//! let deobfuscator = Deobfuscator::new(&program)?;
//! assert_eq!(deobfuscator.index().classes().count(), 1);
//! # Ok::<(), classcope::Error>(())
//! ```

pub use crate::{
    analysis::{
        ClassImplementationsTreeNode, ClassInheritanceTreeNode, HierarchyIndex,
        MethodImplementationsTreeNode, MethodInheritanceTreeNode, ProgramIndex,
    },
    entry::{
        ArgumentEntry, BehaviorEntry, ClassEntry, ConstructorEntry, Entry, FieldEntry,
        MethodEntry, Reference, ReferenceKind, CONSTRUCTOR_NAME,
    },
    mapping::{
        ArgumentMappingNode, ClassMapping, ClassMappingNode, FieldMapping, FieldMappingNode,
        Mappings, MappingsDocument, MappingsRenamer, MethodMapping, MethodMappingNode,
        TranslationDirection, Translator,
    },
    program::{
        Access, AccessFlags, BodySite, DelegationKind, Program, ProgramClass, ProgramConstructor,
        ProgramField, ProgramMethod, NONE_PACKAGE,
    },
    progress::{NoProgress, ProgressListener},
    ClassPartition, Deobfuscator, Error, Result,
};
