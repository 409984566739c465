//! Input model for compiled programs.
//!
//! The crate does not decode class-file containers or raw instruction
//! encodings itself; the loading collaborator supplies a [`Program`] in which
//! every class lists its declared members with access flags and every method
//! or constructor body has already been reduced to the reference sites the
//! index cares about ([`BodySite`]): plain calls, field reads and writes,
//! object creations and constructor delegations, each resolved to a nominal
//! (class, name, descriptor) triple.
//!
//! Classes that live in the default package (an internal name without a `/`)
//! are moved into the synthetic [`NONE_PACKAGE`] before indexing - see
//! [`Program::normalized`]. The partition of a program into "still
//! obfuscated" and "already named" classes keys off that package.

use bitflags::bitflags;

use crate::descriptor;

/// Name of the synthetic package that holds classes found in the default
/// package. A top-level class outside this package is considered named.
pub const NONE_PACKAGE: &str = "none";

bitflags! {
    /// Raw access and property flags of a class, field, method or constructor,
    /// as supplied by the loading collaborator.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct AccessFlags: u16 {
        /// Declared public.
        const PUBLIC = 0x0001;
        /// Declared private.
        const PRIVATE = 0x0002;
        /// Declared protected.
        const PROTECTED = 0x0004;
        /// Declared static.
        const STATIC = 0x0008;
        /// Declared final.
        const FINAL = 0x0010;
        /// Declared synchronized (methods).
        const SYNCHRONIZED = 0x0020;
        /// Declared volatile (fields).
        const VOLATILE = 0x0040;
        /// Declared transient (fields).
        const TRANSIENT = 0x0080;
        /// Implemented natively (methods).
        const NATIVE = 0x0100;
        /// An interface type (classes).
        const INTERFACE = 0x0200;
        /// Declared abstract.
        const ABSTRACT = 0x0400;
        /// Compiler-synthesized, not present in source.
        const SYNTHETIC = 0x1000;
    }
}

/// Access level of a member, reduced from its [`AccessFlags`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum Access {
    /// Visible everywhere.
    Public,
    /// Visible to subclasses and the package.
    Protected,
    /// Visible within the package only (no explicit modifier).
    Package,
    /// Visible within the declaring class only.
    Private,
}

impl Access {
    /// Reduces raw flags to an access level.
    #[must_use]
    pub fn of(flags: AccessFlags) -> Self {
        if flags.contains(AccessFlags::PUBLIC) {
            Access::Public
        } else if flags.contains(AccessFlags::PROTECTED) {
            Access::Protected
        } else if flags.contains(AccessFlags::PRIVATE) {
            Access::Private
        } else {
            Access::Package
        }
    }
}

/// Distinguishes the two forms of constructor delegation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DelegationKind {
    /// `this(...)` - delegation to another constructor of the same class.
    This,
    /// `super(...)` - delegation to a superclass constructor.
    Super,
}

/// One reference site inside a method or constructor body.
///
/// Sites appear in bytecode order; the outer-class heuristic depends on
/// seeing field writes and constructor delegations in their original order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodySite {
    /// A plain method call.
    MethodCall {
        /// Nominal class of the call site.
        class: String,
        /// Called method name.
        name: String,
        /// Called method descriptor.
        descriptor: String,
    },
    /// A field read.
    FieldRead {
        /// Nominal class of the field access.
        class: String,
        /// Field name.
        name: String,
        /// Field descriptor.
        descriptor: String,
    },
    /// A field write.
    FieldWrite {
        /// Nominal class of the field access.
        class: String,
        /// Field name.
        name: String,
        /// Field descriptor.
        descriptor: String,
    },
    /// An object creation (`new`), which invokes a constructor.
    New {
        /// Class being instantiated.
        class: String,
        /// Descriptor of the invoked constructor.
        descriptor: String,
    },
    /// A `this(...)` or `super(...)` constructor delegation.
    Delegation {
        /// Which delegation form this is.
        kind: DelegationKind,
        /// Class whose constructor is delegated to.
        class: String,
        /// Descriptor of the delegated-to constructor.
        descriptor: String,
    },
}

/// A declared field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramField {
    /// Field name.
    pub name: String,
    /// Field type descriptor.
    pub descriptor: String,
    /// Raw access flags.
    pub flags: AccessFlags,
}

impl ProgramField {
    /// Creates a field with [`Access::Package`]-level default flags.
    pub fn new(name: impl Into<String>, descriptor: impl Into<String>) -> Self {
        ProgramField {
            name: name.into(),
            descriptor: descriptor.into(),
            flags: AccessFlags::empty(),
        }
    }

    /// Replaces the raw flags.
    #[must_use]
    pub fn with_flags(mut self, flags: AccessFlags) -> Self {
        self.flags = flags;
        self
    }
}

/// A declared method with its body reference sites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramMethod {
    /// Method name.
    pub name: String,
    /// Method descriptor.
    pub descriptor: String,
    /// Raw access flags.
    pub flags: AccessFlags,
    /// Reference sites of the body, in bytecode order. Empty for abstract
    /// and native methods.
    pub body: Vec<BodySite>,
}

impl ProgramMethod {
    /// Creates a method with no body sites and empty flags.
    pub fn new(name: impl Into<String>, descriptor: impl Into<String>) -> Self {
        ProgramMethod {
            name: name.into(),
            descriptor: descriptor.into(),
            flags: AccessFlags::empty(),
            body: Vec::new(),
        }
    }

    /// Replaces the raw flags.
    #[must_use]
    pub fn with_flags(mut self, flags: AccessFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Replaces the body sites.
    #[must_use]
    pub fn with_body(mut self, body: Vec<BodySite>) -> Self {
        self.body = body;
        self
    }
}

/// A declared constructor with its body reference sites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramConstructor {
    /// Constructor descriptor.
    pub descriptor: String,
    /// Raw access flags.
    pub flags: AccessFlags,
    /// Reference sites of the body, in bytecode order.
    pub body: Vec<BodySite>,
}

impl ProgramConstructor {
    /// Creates a constructor with no body sites and empty flags.
    pub fn new(descriptor: impl Into<String>) -> Self {
        ProgramConstructor {
            descriptor: descriptor.into(),
            flags: AccessFlags::empty(),
            body: Vec::new(),
        }
    }

    /// Replaces the raw flags.
    #[must_use]
    pub fn with_flags(mut self, flags: AccessFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Replaces the body sites.
    #[must_use]
    pub fn with_body(mut self, body: Vec<BodySite>) -> Self {
        self.body = body;
        self
    }
}

/// One class of the input program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramClass {
    /// Slash-separated internal name.
    pub name: String,
    /// Superclass internal name, `None` at the root of the hierarchy (the
    /// collaborator maps the universal root, e.g. `java/lang/Object`, to
    /// `None`).
    pub superclass: Option<String>,
    /// Implemented interface names.
    pub interfaces: Vec<String>,
    /// Raw class flags.
    pub flags: AccessFlags,
    /// Declared fields.
    pub fields: Vec<ProgramField>,
    /// Declared methods.
    pub methods: Vec<ProgramMethod>,
    /// Declared constructors.
    pub constructors: Vec<ProgramConstructor>,
}

impl ProgramClass {
    /// Creates an empty class with no superclass.
    pub fn new(name: impl Into<String>) -> Self {
        ProgramClass {
            name: name.into(),
            superclass: None,
            interfaces: Vec::new(),
            flags: AccessFlags::empty(),
            fields: Vec::new(),
            methods: Vec::new(),
            constructors: Vec::new(),
        }
    }

    /// Sets the superclass.
    #[must_use]
    pub fn with_superclass(mut self, superclass: impl Into<String>) -> Self {
        self.superclass = Some(superclass.into());
        self
    }

    /// Adds an implemented interface.
    #[must_use]
    pub fn with_interface(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    /// Replaces the raw class flags.
    #[must_use]
    pub fn with_flags(mut self, flags: AccessFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Adds a declared field.
    #[must_use]
    pub fn with_field(mut self, field: ProgramField) -> Self {
        self.fields.push(field);
        self
    }

    /// Adds a declared method.
    #[must_use]
    pub fn with_method(mut self, method: ProgramMethod) -> Self {
        self.methods.push(method);
        self
    }

    /// Adds a declared constructor.
    #[must_use]
    pub fn with_constructor(mut self, constructor: ProgramConstructor) -> Self {
        self.constructors.push(constructor);
        self
    }
}

/// A whole compiled program, ready for indexing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    /// All classes of the program.
    pub classes: Vec<ProgramClass>,
}

impl Program {
    /// Creates an empty program.
    #[must_use]
    pub fn new() -> Self {
        Program::default()
    }

    /// Adds a class.
    #[must_use]
    pub fn with_class(mut self, class: ProgramClass) -> Self {
        self.classes.push(class);
        self
    }

    /// Looks up a class by name.
    #[must_use]
    pub fn class(&self, name: &str) -> Option<&ProgramClass> {
        self.classes.iter().find(|c| c.name == name)
    }

    /// Returns a copy of the program with every default-package class moved
    /// into the [`NONE_PACKAGE`].
    ///
    /// The move is applied consistently: class names, superclass and
    /// interface references, descriptors and body sites are all rewritten, so
    /// the normalized program never mentions a packageless name.
    #[must_use]
    pub fn normalized(&self) -> Program {
        fn norm(name: &str) -> String {
            if name.contains('/') {
                name.to_string()
            } else {
                format!("{NONE_PACKAGE}/{name}")
            }
        }

        fn norm_descriptor(desc: &str) -> String {
            descriptor::rewrite_classes(desc, |name| {
                (!name.contains('/')).then(|| norm(name))
            })
        }

        fn norm_site(site: &BodySite) -> BodySite {
            match site {
                BodySite::MethodCall {
                    class,
                    name,
                    descriptor,
                } => BodySite::MethodCall {
                    class: norm(class),
                    name: name.clone(),
                    descriptor: norm_descriptor(descriptor),
                },
                BodySite::FieldRead {
                    class,
                    name,
                    descriptor,
                } => BodySite::FieldRead {
                    class: norm(class),
                    name: name.clone(),
                    descriptor: norm_descriptor(descriptor),
                },
                BodySite::FieldWrite {
                    class,
                    name,
                    descriptor,
                } => BodySite::FieldWrite {
                    class: norm(class),
                    name: name.clone(),
                    descriptor: norm_descriptor(descriptor),
                },
                BodySite::New { class, descriptor } => BodySite::New {
                    class: norm(class),
                    descriptor: norm_descriptor(descriptor),
                },
                BodySite::Delegation {
                    kind,
                    class,
                    descriptor,
                } => BodySite::Delegation {
                    kind: *kind,
                    class: norm(class),
                    descriptor: norm_descriptor(descriptor),
                },
            }
        }

        let classes = self
            .classes
            .iter()
            .map(|c| ProgramClass {
                name: norm(&c.name),
                superclass: c.superclass.as_deref().map(norm),
                interfaces: c.interfaces.iter().map(|i| norm(i)).collect(),
                flags: c.flags,
                fields: c
                    .fields
                    .iter()
                    .map(|f| ProgramField {
                        name: f.name.clone(),
                        descriptor: norm_descriptor(&f.descriptor),
                        flags: f.flags,
                    })
                    .collect(),
                methods: c
                    .methods
                    .iter()
                    .map(|m| ProgramMethod {
                        name: m.name.clone(),
                        descriptor: norm_descriptor(&m.descriptor),
                        flags: m.flags,
                        body: m.body.iter().map(norm_site).collect(),
                    })
                    .collect(),
                constructors: c
                    .constructors
                    .iter()
                    .map(|ctor| ProgramConstructor {
                        descriptor: norm_descriptor(&ctor.descriptor),
                        flags: ctor.flags,
                        body: ctor.body.iter().map(norm_site).collect(),
                    })
                    .collect(),
            })
            .collect();

        Program { classes }
    }
}
