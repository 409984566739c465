//! Outer-class recovery, anonymous-class classification and the atomic
//! rename that rewrites the whole index to nested names.

mod common;

use classcope::prelude::*;
use common::*;

#[test]
fn outer_class_resolved_from_single_caller() {
    let index = ProgramIndex::build(&inner_class_program(), true).unwrap();
    assert_eq!(index.outer_class("b"), Some("none/a"));
    assert_eq!(index.inner_classes("none/a"), vec!["b"]);
}

#[test]
fn anonymous_class_records_caller() {
    let index = ProgramIndex::build(&inner_class_program(), true).unwrap();
    assert!(index.is_anonymous_class("b"));
    let caller = index.anonymous_class_caller("b").unwrap();
    assert_eq!(
        caller,
        &BehaviorEntry::Method(new_method("none/a", "a", "()V"))
    );
}

#[test]
fn bulk_rename_rewrites_every_structure() {
    let index = ProgramIndex::build(&inner_class_program(), true).unwrap();

    // class set speaks the nested name
    assert!(index.contains_class(&new_class("none/a$b")));
    assert!(!index.contains_class(&new_class("none/b")));

    // access table was re-keyed, descriptors included
    assert_eq!(
        index.access(&Entry::Constructor(new_constructor(
            "none/a$b",
            "(Lnone/a;)V"
        ))),
        Some(Access::Package)
    );
    assert_eq!(
        index.access(&Entry::Method(new_method("none/a$b", "a", "()V"))),
        Some(Access::Public)
    );

    // the reference graph mentions the nested name
    let constructor =
        BehaviorEntry::Constructor(new_constructor("none/a$b", "(Lnone/a;)V"));
    assert_eq!(index.behavior_references(&constructor).count(), 1);
    let stale = BehaviorEntry::Constructor(new_constructor("none/b", "(Lnone/a;)V"));
    assert_eq!(index.behavior_references(&stale).count(), 0);
}

#[test]
fn inner_classes_skipped_when_disabled() {
    let index = ProgramIndex::build(&inner_class_program(), false).unwrap();
    assert!(index.outer_class("b").is_none());
    assert!(index.contains_class(&new_class("none/b")));
}

#[test]
fn outer_class_resolved_from_captured_type_without_callers() {
    // b captures a in a synthetic field but nothing in the program calls
    // its constructor.
    let program = Program::new()
        .with_class(ProgramClass::new("a"))
        .with_class(
            ProgramClass::new("b")
                .with_field(ProgramField::new("a", "La;").with_flags(AccessFlags::SYNTHETIC))
                .with_constructor(
                    ProgramConstructor::new("(La;)V").with_body(vec![
                        field_write("b", "a", "La;"),
                        super_call("java/lang/Object", "()V"),
                    ]),
                ),
        );
    let index = ProgramIndex::build(&program, true).unwrap();
    assert_eq!(index.outer_class("b"), Some("none/a"));
    // no callers at all, so it cannot be anonymous
    assert!(!index.is_anonymous_class("b"));
}

#[test]
fn non_synthetic_capture_disqualifies_class() {
    let program = Program::new()
        .with_class(ProgramClass::new("a"))
        .with_class(
            ProgramClass::new("b")
                .with_field(ProgramField::new("a", "La;"))
                .with_constructor(
                    ProgramConstructor::new("(La;)V").with_body(vec![
                        field_write("b", "a", "La;"),
                        super_call("java/lang/Object", "()V"),
                    ]),
                ),
        );
    let index = ProgramIndex::build(&program, true).unwrap();
    assert!(index.outer_class("b").is_none());
}

#[test]
fn ambiguous_callers_leave_class_unresolved() {
    // two distinct classes construct b, and the captured type narrows the
    // choice to neither
    let construct = |caller: &str| {
        ProgramClass::new(caller).with_method(
            ProgramMethod::new("a", "()V").with_body(vec![new_object("b", "(Lc;)V")]),
        )
    };
    let program = Program::new()
        .with_class(construct("a"))
        .with_class(construct("d"))
        .with_class(ProgramClass::new("c"))
        .with_class(
            ProgramClass::new("b")
                .with_field(ProgramField::new("a", "Lc;").with_flags(AccessFlags::SYNTHETIC))
                .with_constructor(
                    ProgramConstructor::new("(Lc;)V").with_body(vec![
                        field_write("b", "a", "Lc;"),
                        super_call("java/lang/Object", "()V"),
                    ]),
                ),
        );
    let index = ProgramIndex::build(&program, true).unwrap();
    assert!(index.outer_class("b").is_none());
}

#[test]
fn caller_naming_the_type_is_not_anonymous() {
    // a stores the created instance in a field of type b, so b is a plain
    // inner class
    let program = Program::new()
        .with_class(
            ProgramClass::new("a")
                .with_field(ProgramField::new("b", "Lb;"))
                .with_method(ProgramMethod::new("a", "()V").with_body(vec![
                    new_object("b", "(La;)V"),
                    field_write("a", "b", "Lb;"),
                ])),
        )
        .with_class(
            ProgramClass::new("b")
                .with_field(ProgramField::new("a", "La;").with_flags(AccessFlags::SYNTHETIC))
                .with_constructor(
                    ProgramConstructor::new("(La;)V").with_body(vec![
                        field_write("b", "a", "La;"),
                        super_call("java/lang/Object", "()V"),
                    ]),
                ),
        );
    let index = ProgramIndex::build(&program, true).unwrap();
    assert_eq!(index.outer_class("b"), Some("none/a"));
    assert!(!index.is_anonymous_class("b"));
}

#[test]
fn super_delegation_is_not_a_construction_site() {
    // d extends b and delegates to b's constructor; only a truly
    // constructs b
    let program = Program::new()
        .with_class(
            ProgramClass::new("a").with_method(
                ProgramMethod::new("a", "()V").with_body(vec![new_object("b", "(La;)V")]),
            ),
        )
        .with_class(
            ProgramClass::new("b")
                .with_field(ProgramField::new("a", "La;").with_flags(AccessFlags::SYNTHETIC))
                .with_constructor(
                    ProgramConstructor::new("(La;)V").with_body(vec![
                        field_write("b", "a", "La;"),
                        super_call("java/lang/Object", "()V"),
                    ]),
                ),
        )
        .with_class(
            ProgramClass::new("d").with_superclass("b").with_constructor(
                ProgramConstructor::new("(La;)V")
                    .with_body(vec![super_call("b", "(La;)V")]),
            ),
        );
    let index = ProgramIndex::build(&program, true).unwrap();
    assert_eq!(index.outer_class("b"), Some("none/a"));
}
