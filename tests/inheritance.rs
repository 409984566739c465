//! Hierarchy walking, entry resolution, relationship trees and bridge
//! method linking over a small class hierarchy.

mod common;

use classcope::prelude::*;
use common::*;

/// c extends b extends a; b implements interface i; i and b both declare
/// `a()V`, c inherits it.
fn hierarchy_program() -> Program {
    Program::new()
        .with_class(
            ProgramClass::new("i")
                .with_flags(AccessFlags::INTERFACE | AccessFlags::ABSTRACT)
                .with_method(
                    ProgramMethod::new("a", "()V")
                        .with_flags(AccessFlags::PUBLIC | AccessFlags::ABSTRACT),
                ),
        )
        .with_class(
            ProgramClass::new("a")
                .with_field(ProgramField::new("x", "I"))
                .with_method(ProgramMethod::new("b", "()V")),
        )
        .with_class(
            ProgramClass::new("b")
                .with_superclass("a")
                .with_interface("i")
                .with_method(ProgramMethod::new("a", "()V").with_flags(AccessFlags::PUBLIC)),
        )
        .with_class(
            ProgramClass::new("c").with_superclass("b").with_method(
                ProgramMethod::new("d", "()V").with_body(vec![
                    method_call("c", "a", "()V"),
                    method_call("c", "b", "()V"),
                    field_read("c", "x", "I"),
                ]),
            ),
        )
}

#[test]
fn ancestry_and_subclasses() {
    let index = ProgramIndex::build(&hierarchy_program(), true).unwrap();
    assert_eq!(
        index.hierarchy().ancestry("none/c"),
        vec!["none/b", "none/a"]
    );
    assert_eq!(index.hierarchy().subclass_names("none/a"), vec!["none/b"]);
    assert!(index.interfaces("none/c").contains("none/i"));
    assert!(index.is_interface("none/i"));
}

#[test]
fn resolution_retargets_call_sites() {
    let index = ProgramIndex::build(&hierarchy_program(), true).unwrap();

    // c.a()V resolves to the declaration in b, c.b()V to a, c.x to a
    let overridden = BehaviorEntry::Method(new_method("none/b", "a", "()V"));
    assert_eq!(index.behavior_references(&overridden).count(), 1);

    let inherited = BehaviorEntry::Method(new_method("none/a", "b", "()V"));
    assert_eq!(index.behavior_references(&inherited).count(), 1);

    let field = new_field("none/a", "x");
    assert_eq!(index.field_references(&field).count(), 1);
}

#[test]
fn resolve_entry_class_stops_at_the_boundary() {
    let index = ProgramIndex::build(&hierarchy_program(), true).unwrap();
    let entry = Entry::Method(new_method("none/c", "toString", "()Ljava/lang/String;"));
    assert!(index.resolve_entry_class(&entry).is_none());
}

#[test]
fn method_inheritance_tree_roots_at_highest_declarer() {
    let index = ProgramIndex::build(&hierarchy_program(), true).unwrap();
    let translator = Translator::default();

    let queried = new_method("none/c", "a", "()V");
    let root = MethodInheritanceTreeNode::build(&index, &translator, &queried);

    // b is the highest class declaring a()V; c only inherits it
    assert_eq!(root.method_entry(), &new_method("none/b", "a", "()V"));
    assert!(root.is_declared());
    assert_eq!(root.children().len(), 1);
    let child = &root.children()[0];
    assert_eq!(child.method_entry().class_name(), "none/c");
    assert!(!child.is_declared());
}

#[test]
fn class_implementations_tree_expands_subclasses() {
    let index = ProgramIndex::build(&hierarchy_program(), true).unwrap();
    let translator = Translator::default();

    let root =
        ClassImplementationsTreeNode::build(&index, &translator, &new_class("none/i")).unwrap();
    assert_eq!(root.class_entry().name(), "none/i");
    assert_eq!(root.children().len(), 1);
    let implementer = &root.children()[0];
    assert_eq!(implementer.class_entry().name(), "none/b");
    assert_eq!(implementer.children().len(), 1);
    assert_eq!(implementer.children()[0].class_entry().name(), "none/c");
}

#[test]
fn method_implementations_tree_roots_at_interface() {
    let index = ProgramIndex::build(&hierarchy_program(), true).unwrap();
    let translator = Translator::default();

    let queried = new_method("none/b", "a", "()V");
    let root = MethodImplementationsTreeNode::build(&index, &translator, &queried)
        .unwrap()
        .unwrap();
    assert_eq!(root.method_entry(), &new_method("none/i", "a", "()V"));
    assert_eq!(root.implementers().len(), 1);
    assert_eq!(
        root.implementers()[0].method_entry(),
        &new_method("none/b", "a", "()V")
    );
}

#[test]
fn overlapping_interfaces_are_fatal() {
    let program = Program::new()
        .with_class(
            ProgramClass::new("i")
                .with_flags(AccessFlags::INTERFACE)
                .with_method(ProgramMethod::new("a", "()V")),
        )
        .with_class(
            ProgramClass::new("j")
                .with_flags(AccessFlags::INTERFACE)
                .with_method(ProgramMethod::new("a", "()V")),
        )
        .with_class(
            ProgramClass::new("b")
                .with_interface("i")
                .with_interface("j")
                .with_method(ProgramMethod::new("a", "()V")),
        )
        // both interfaces need an implementer to be recognized as interfaces
        .with_class(
            ProgramClass::new("c")
                .with_interface("i")
                .with_interface("j"),
        );
    let index = ProgramIndex::build(&program, true).unwrap();
    let translator = Translator::default();

    let queried = new_method("none/b", "a", "()V");
    let result = MethodImplementationsTreeNode::build(&index, &translator, &queried);
    assert!(matches!(
        result,
        Err(Error::AmbiguousInterfaceMethod(_))
    ));
}

#[test]
fn related_implementations_span_interface_and_overrides() {
    let index = ProgramIndex::build(&hierarchy_program(), true).unwrap();
    let entries = index
        .related_method_implementations(&new_method("none/c", "a", "()V"))
        .unwrap();
    assert!(entries.contains(&new_method("none/b", "a", "()V")));
    assert!(entries.contains(&new_method("none/i", "a", "()V")));
    assert_eq!(entries.len(), 2);
}

fn bridge_program() -> Program {
    // b's covariant override a()Ljava/lang/String; gets a synthetic bridge
    // a()Ljava/lang/Object; delegating to it; d calls the bridge
    Program::new()
        .with_class(
            ProgramClass::new("a")
                .with_method(ProgramMethod::new("a", "()Ljava/lang/Object;")),
        )
        .with_class(
            ProgramClass::new("b")
                .with_superclass("a")
                .with_method(ProgramMethod::new("a", "()Ljava/lang/String;"))
                .with_method(
                    ProgramMethod::new("a", "()Ljava/lang/Object;")
                        .with_flags(AccessFlags::SYNTHETIC)
                        .with_body(vec![method_call("b", "a", "()Ljava/lang/String;")]),
                ),
        )
        .with_class(
            ProgramClass::new("d").with_method(
                ProgramMethod::new("e", "()V")
                    .with_body(vec![method_call("b", "a", "()Ljava/lang/String;")]),
            ),
        )
}

#[test]
fn bridge_detection_links_target_and_bridge() {
    let index = ProgramIndex::build(&bridge_program(), true).unwrap();
    let target = new_method("none/b", "a", "()Ljava/lang/String;");
    let bridge = new_method("none/b", "a", "()Ljava/lang/Object;");

    assert_eq!(index.bridge_method(&target), Some(&bridge));
    assert_eq!(index.bridged_method(&bridge), Some(&target));
    assert!(index.bridge_method(&bridge).is_none());
}

#[test]
fn non_synthetic_delegators_are_not_bridges() {
    let program = Program::new().with_class(
        ProgramClass::new("a")
            .with_method(ProgramMethod::new("b", "()Ljava/lang/String;"))
            .with_method(
                ProgramMethod::new("c", "()Ljava/lang/Object;")
                    .with_body(vec![method_call("a", "b", "()Ljava/lang/String;")]),
            ),
    );
    let index = ProgramIndex::build(&program, true).unwrap();
    assert!(index
        .bridge_method(&new_method("none/a", "b", "()Ljava/lang/String;"))
        .is_none());
}

#[test]
fn multi_call_synthetics_are_not_bridges() {
    let program = Program::new().with_class(
        ProgramClass::new("a")
            .with_method(ProgramMethod::new("b", "()Ljava/lang/String;"))
            .with_method(
                ProgramMethod::new("c", "()Ljava/lang/Object;")
                    .with_flags(AccessFlags::SYNTHETIC)
                    .with_body(vec![
                        method_call("a", "b", "()Ljava/lang/String;"),
                        method_call("a", "b", "()Ljava/lang/String;"),
                    ]),
            ),
    );
    let index = ProgramIndex::build(&program, true).unwrap();
    assert!(index
        .bridge_method(&new_method("none/a", "b", "()Ljava/lang/String;"))
        .is_none());
}

#[test]
fn references_to_a_bridge_target_are_linked_to_the_bridge() {
    let index = ProgramIndex::build(&bridge_program(), true).unwrap();
    let bridge = BehaviorEntry::Method(new_method("none/b", "a", "()Ljava/lang/Object;"));
    let caller = BehaviorEntry::Method(new_method("none/d", "e", "()V"));

    // d's call to the target is attributed to the bridge
    let references: Vec<_> = index.behavior_references(&bridge).cloned().collect();
    assert!(references.iter().any(|r| r.context == caller));

    let target = BehaviorEntry::Method(new_method("none/b", "a", "()Ljava/lang/String;"));
    assert_eq!(index.behavior_references(&target).count(), 0);
}
