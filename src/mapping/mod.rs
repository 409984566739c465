//! The mapping tree, its translator and its renamer.
//!
//! This module owns everything about obfuscated/deobfuscated name pairs:
//!
//! - [`Mappings`] - the persisted rename store, a forest of per-class
//!   scopes with nested class, field, method and argument children
//! - [`Translator`] - stateless translation of entries and signatures
//!   through a tree in a chosen [`TranslationDirection`]
//! - [`MappingsRenamer`] - the mutation API, which validates names, checks
//!   collisions and propagates method renames across their
//!   related-implementation closures
//! - [`MappingsDocument`] - the serializable document form exchanged with
//!   the persistence collaborator

mod class_mapping;
mod mappings;
mod method_mapping;
mod renamer;
mod serial;
mod translator;

pub use class_mapping::ClassMapping;
pub use mappings::Mappings;
pub use method_mapping::{ArgumentMapping, FieldMapping, MethodMapping};
pub use renamer::MappingsRenamer;
pub use serial::{
    ArgumentMappingNode, ClassMappingNode, FieldMappingNode, MappingsDocument, MethodMappingNode,
};
pub use translator::{TranslationDirection, Translator};
