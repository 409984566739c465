use thiserror::Error;

use crate::entry::MethodEntry;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// This enum covers all failure modes of program indexing, mapping-tree mutation and
/// translation. The split follows the error-handling design of the crate: structural
/// problems in the input program and invalid mutation requests are fatal and surface
/// here, while heuristic under-determination (ambiguous outer classes, failed
/// anonymous-class preconditions) and droppable mapping nodes are logged through the
/// [`log`] facade and never become an `Error`.
///
/// # Error Categories
///
/// ## Input Structure Errors
/// - [`Error::Malformed`] - Structurally invalid input program
/// - [`Error::SelfInterface`] - A class listed as its own interface
///
/// ## Mutation Errors
/// - [`Error::InvalidIdentifier`] - Empty or non-identifier deobfuscated name
/// - [`Error::ConstructorTarget`] - Attempt to rename, unmap or mark a constructor
/// - [`Error::NameConflict`] - Deobfuscated name already taken within the scope
///
/// ## Analysis Errors
/// - [`Error::AmbiguousInterfaceMethod`] - More than one interface declares a method signature
#[derive(Error, Debug)]
pub enum Error {
    /// The input program is structurally invalid and cannot be indexed.
    ///
    /// The error includes the source location where the malformation was
    /// detected for debugging purposes.
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// A class was declared as its own interface.
    ///
    /// This is rejected at index-construction time; no partial index is kept.
    #[error("Class cannot be its own interface: {0}")]
    SelfInterface(String),

    /// A required identifier was empty or not a valid identifier.
    ///
    /// Deobfuscated names must be non-empty identifiers (`[A-Za-z_][A-Za-z0-9_]*`,
    /// with `/`-separated package segments permitted for class names).
    #[error("Invalid identifier: '{0}'")]
    InvalidIdentifier(String),

    /// A rename, removal or mark operation targeted a constructor.
    ///
    /// Constructors carry no name of their own, so none of the naming
    /// operations apply to them.
    #[error("Constructors cannot be renamed")]
    ConstructorTarget,

    /// More than one interface declares a method with the same signature.
    ///
    /// Computing the method-implementations tree for such a method is not
    /// supported; this is a known limitation preserved by design.
    #[error("Multiple interfaces declare the method {0}; this configuration is not supported")]
    AmbiguousInterfaceMethod(MethodEntry),

    /// A deobfuscated name is already mapped within the same scope.
    ///
    /// Mutations are rejected before any state changes, so the mapping tree
    /// is left exactly as it was.
    #[error("A mapping named '{name}' already exists in '{scope}'")]
    NameConflict {
        /// The scope (class or method) in which the collision occurred
        scope: String,
        /// The deobfuscated name that is already taken
        name: String,
    },
}
