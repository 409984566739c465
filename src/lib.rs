// Copyright 2025 The classcope Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![allow(dead_code)]

//! # classcope
//!
//! A framework for analyzing compiled, obfuscated JVM-style class programs
//! and maintaining a persistent, bidirectional renaming scheme that maps
//! obfuscated symbols to human-chosen names while preserving program
//! semantics.
//!
//! ## Features
//!
//! - **Cross-reference indexing** - per-symbol declaration sites, access
//!   levels, type relationships and the complete reference graph of a
//!   program, built in one ordered batch
//! - **Structure recovery** - heuristic reconstruction of inner, outer and
//!   anonymous class relationships and of compiler-synthesized bridge
//!   methods from obfuscated artifacts
//! - **Bidirectional mappings** - a persisted tree of obfuscated ↔
//!   deobfuscated name pairs for classes, nested classes, fields, methods
//!   and arguments, with stateless translators in both directions
//! - **Consistency-preserving renames** - one rename propagates across
//!   every polymorphically related symbol: overrides, interface
//!   implementations and bridge counterparts
//!
//! ## Quick Start
//!
//! ```rust
//! use classcope::prelude::*;
//!
//! // Describe the compiled program (normally done by a loader).
//! let program = Program::new().with_class(
//!     ProgramClass::new("a")
//!         .with_field(ProgramField::new("a", "I").with_flags(AccessFlags::PRIVATE)),
//! );
//!
//! // Ingest it and rename a field.
//! let mut deobfuscator = Deobfuscator::new(&program)?;
//! let field = FieldEntry::new(ClassEntry::new("none/a"), "a");
//! deobfuscator.rename(&Entry::Field(field.clone()), "count")?;
//!
//! let renamed = deobfuscator.deobfuscate_entry(&Entry::Field(field));
//! assert_eq!(renamed.name(), Some("count"));
//! # Ok::<(), classcope::Error>(())
//! ```
//!
//! ## Architecture
//!
//! `classcope` is organized into focused modules, leaves first:
//!
//! - [`entry`] - value types identifying symbols (classes, fields, methods,
//!   constructors, arguments) and reference edges
//! - [`program`] - the input model a loading collaborator fills in; the
//!   crate never decodes class-file containers or raw instructions itself
//! - [`descriptor`] - scanning and rewriting of type descriptors
//! - [`analysis`] - the [`analysis::HierarchyIndex`], the
//!   [`analysis::ProgramIndex`] cross-reference index and the on-demand
//!   relationship trees
//! - [`mapping`] - the [`mapping::Mappings`] tree, [`mapping::Translator`]
//!   and [`mapping::MappingsRenamer`]
//! - [`Deobfuscator`] - the session facade tying index, mappings and
//!   translator cache together
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T, Error>`](Result). Structural
//! problems and invalid mutations are fatal and leave no partial state;
//! heuristic under-determination and droppable mapping nodes are logged
//! through the [`log`] facade and never abort an operation.

#[macro_use]
pub(crate) mod error;

/// Shared factories used by unit tests across the crate.
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types.
pub mod prelude;

/// Static analysis: hierarchy index, cross-reference index and
/// relationship trees.
pub mod analysis;

/// Scanning and rewriting of JVM-style type descriptors.
pub mod descriptor;

/// Symbol identities and reference edges.
pub mod entry;

/// The mapping tree, translator and renamer.
pub mod mapping;

/// The input model for compiled programs.
pub mod program;

/// Progress reporting for long full-program operations.
pub mod progress;

mod deobfuscator;

pub use deobfuscator::{ClassPartition, Deobfuscator};

/// `classcope` Error type.
///
/// Covers structurally invalid input programs, invalid mutation requests
/// and unsupported analysis configurations.
pub use error::Error;

/// `classcope` Result type.
///
/// A type alias for [`std::result::Result`] with the error type fixed to
/// [`Error`], used consistently for all fallible operations in the crate.
pub type Result<T> = std::result::Result<T, Error>;
