//! Static analysis of compiled programs.
//!
//! This module turns an ingested [`crate::program::Program`] into the
//! [`ProgramIndex`]: the class set, the superclass/interface graph, member
//! access levels, declared field types, both reference graphs, recovered
//! inner/outer/anonymous class structure and the bridge-method map. On top
//! of the index sit the on-demand relationship trees used for presentation
//! and for computing rename propagation closures.
//!
//! # Key Types
//!
//! - [`HierarchyIndex`] - superclass and interface edges with ancestry and
//!   subclass queries
//! - [`ProgramIndex`] - the full cross-reference index, built once per
//!   program and read-only afterwards
//! - [`ClassInheritanceTreeNode`], [`ClassImplementationsTreeNode`],
//!   [`MethodInheritanceTreeNode`], [`MethodImplementationsTreeNode`] - the
//!   four traversal trees

mod hierarchy;
mod index;
mod inner_classes;
mod trees;

pub use hierarchy::HierarchyIndex;
pub use index::ProgramIndex;
pub use trees::{
    ClassImplementationsTreeNode, ClassInheritanceTreeNode, MethodImplementationsTreeNode,
    MethodInheritanceTreeNode,
};
