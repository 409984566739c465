//! Program fixtures and entry factories shared by the integration tests.

#![allow(dead_code)]

use classcope::prelude::*;

pub fn new_class(name: &str) -> ClassEntry {
    ClassEntry::new(name)
}

pub fn new_field(class_name: &str, field_name: &str) -> FieldEntry {
    FieldEntry::new(new_class(class_name), field_name)
}

pub fn new_method(class_name: &str, method_name: &str, descriptor: &str) -> MethodEntry {
    MethodEntry::new(new_class(class_name), method_name, descriptor)
}

pub fn new_constructor(class_name: &str, descriptor: &str) -> ConstructorEntry {
    ConstructorEntry::new(new_class(class_name), descriptor)
}

pub fn method_call(class: &str, name: &str, descriptor: &str) -> BodySite {
    BodySite::MethodCall {
        class: class.to_string(),
        name: name.to_string(),
        descriptor: descriptor.to_string(),
    }
}

pub fn field_read(class: &str, name: &str, descriptor: &str) -> BodySite {
    BodySite::FieldRead {
        class: class.to_string(),
        name: name.to_string(),
        descriptor: descriptor.to_string(),
    }
}

pub fn field_write(class: &str, name: &str, descriptor: &str) -> BodySite {
    BodySite::FieldWrite {
        class: class.to_string(),
        name: name.to_string(),
        descriptor: descriptor.to_string(),
    }
}

pub fn new_object(class: &str, descriptor: &str) -> BodySite {
    BodySite::New {
        class: class.to_string(),
        descriptor: descriptor.to_string(),
    }
}

pub fn super_call(class: &str, descriptor: &str) -> BodySite {
    BodySite::Delegation {
        kind: DelegationKind::Super,
        class: class.to_string(),
        descriptor: descriptor.to_string(),
    }
}

pub fn this_call(class: &str, descriptor: &str) -> BodySite {
    BodySite::Delegation {
        kind: DelegationKind::This,
        class: class.to_string(),
        descriptor: descriptor.to_string(),
    }
}

/// The lone-class fixture: one obfuscated class `a` in the default package
/// (normalized to `none/a`) with a private field `a`, a public method
/// `a()Ljava/lang/String;` and a constructor `(Ljava/lang/String;)V` that
/// writes the field and is called exactly once, from the method. A second,
/// already-named class `fixture/Keep` rides along.
pub fn lone_class_program() -> Program {
    Program::new()
        .with_class(
            ProgramClass::new("a")
                .with_field(ProgramField::new("a", "Ljava/lang/String;").with_flags(AccessFlags::PRIVATE))
                .with_method(
                    ProgramMethod::new("a", "()Ljava/lang/String;")
                        .with_flags(AccessFlags::PUBLIC)
                        .with_body(vec![
                            new_object("a", "(Ljava/lang/String;)V"),
                            field_read("a", "a", "Ljava/lang/String;"),
                        ]),
                )
                .with_constructor(
                    ProgramConstructor::new("(Ljava/lang/String;)V")
                        .with_flags(AccessFlags::PUBLIC)
                        .with_body(vec![
                            super_call("java/lang/Object", "()V"),
                            field_write("a", "a", "Ljava/lang/String;"),
                        ]),
                ),
        )
        .with_class(ProgramClass::new("fixture/Keep"))
}

/// An inner-class fixture: `none/b` captures `none/a` through a synthetic
/// field written before `super()`, and `none/a.a()V` constructs it exactly
/// once.
pub fn inner_class_program() -> Program {
    Program::new()
        .with_class(
            ProgramClass::new("a").with_method(
                ProgramMethod::new("a", "()V")
                    .with_flags(AccessFlags::PUBLIC)
                    .with_body(vec![new_object("b", "(La;)V")]),
            ),
        )
        .with_class(
            ProgramClass::new("b")
                .with_field(ProgramField::new("a", "La;").with_flags(AccessFlags::SYNTHETIC))
                .with_method(ProgramMethod::new("a", "()V").with_flags(AccessFlags::PUBLIC))
                .with_constructor(
                    ProgramConstructor::new("(La;)V").with_body(vec![
                        field_write("b", "a", "La;"),
                        super_call("java/lang/Object", "()V"),
                    ]),
                ),
        )
}
