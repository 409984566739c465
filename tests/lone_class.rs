//! Index behavior for a minimal program: one obfuscated class with no
//! hierarchy, plus one already-named class.

mod common;

use classcope::prelude::*;
use common::*;

fn build_index() -> ProgramIndex {
    ProgramIndex::build(&lone_class_program(), false).unwrap()
}

#[test]
fn obf_entries() {
    let index = build_index();
    let mut names: Vec<&str> = index.classes().map(ClassEntry::name).collect();
    names.sort_unstable();
    assert_eq!(names, vec!["fixture/Keep", "none/a"]);
}

#[test]
fn hierarchy() {
    let index = build_index();
    assert!(index.hierarchy().superclass("none/a").is_none());
    assert!(index.hierarchy().superclass("fixture/Keep").is_none());
    assert!(index.hierarchy().ancestry("none/a").is_empty());
    assert!(index.hierarchy().ancestry("fixture/Keep").is_empty());
    assert!(index.hierarchy().subclass_names("none/a").is_empty());
    assert!(index.hierarchy().subclass_names("fixture/Keep").is_empty());
}

#[test]
fn access() {
    let index = build_index();
    assert_eq!(
        index.access(&Entry::Field(new_field("none/a", "a"))),
        Some(Access::Private)
    );
    assert_eq!(
        index.access(&Entry::Method(new_method("none/a", "a", "()Ljava/lang/String;"))),
        Some(Access::Public)
    );
    assert_eq!(
        index.access(&Entry::Constructor(new_constructor(
            "none/a",
            "(Ljava/lang/String;)V"
        ))),
        Some(Access::Public)
    );
    assert!(index.access(&Entry::Field(new_field("none/a", "b"))).is_none());
}

#[test]
fn class_inheritance() {
    let index = build_index();
    let translator = Translator::default();
    let node = ClassInheritanceTreeNode::build(&index, &translator, &new_class("none/a"));
    assert_eq!(node.class_entry().name(), "none/a");
    assert!(node.subclasses().is_empty());
}

#[test]
fn method_inheritance() {
    let index = build_index();
    let translator = Translator::default();
    let source = new_method("none/a", "a", "()Ljava/lang/String;");
    let node = MethodInheritanceTreeNode::build(&index, &translator, &source);
    assert_eq!(node.method_entry(), &source);
    assert!(node.is_declared());
    assert!(node.children().is_empty());
}

#[test]
fn class_implementations() {
    let index = build_index();
    let translator = Translator::default();
    let node = ClassImplementationsTreeNode::build(&index, &translator, &new_class("none/a"));
    assert!(node.is_none());
}

#[test]
fn method_implementations() {
    let index = build_index();
    let translator = Translator::default();
    let source = new_method("none/a", "a", "()Ljava/lang/String;");
    let node = MethodImplementationsTreeNode::build(&index, &translator, &source).unwrap();
    assert!(node.is_none());
}

#[test]
fn related_method_implementations() {
    let index = build_index();
    let source = new_method("none/a", "a", "()Ljava/lang/String;");
    let entries = index.related_method_implementations(&source).unwrap();
    assert_eq!(entries.len(), 1);
    assert!(entries.contains(&source));
}

#[test]
fn field_references() {
    let index = build_index();
    let source = new_field("none/a", "a");
    let references: Vec<_> = index.field_references(&source).cloned().collect();
    assert_eq!(references.len(), 2);

    let from_constructor = Reference::new(
        source.clone(),
        BehaviorEntry::Constructor(new_constructor("none/a", "(Ljava/lang/String;)V")),
        ReferenceKind::FieldAccess,
    );
    let from_method = Reference::new(
        source,
        BehaviorEntry::Method(new_method("none/a", "a", "()Ljava/lang/String;")),
        ReferenceKind::FieldAccess,
    );
    assert!(references.contains(&from_constructor));
    assert!(references.contains(&from_method));
}

#[test]
fn behavior_references() {
    let index = build_index();
    let method = BehaviorEntry::Method(new_method("none/a", "a", "()Ljava/lang/String;"));
    assert_eq!(index.behavior_references(&method).count(), 0);

    // the constructor is invoked exactly once, from the method
    let constructor =
        BehaviorEntry::Constructor(new_constructor("none/a", "(Ljava/lang/String;)V"));
    let references: Vec<_> = index.behavior_references(&constructor).cloned().collect();
    assert_eq!(references.len(), 1);
    assert_eq!(references[0].context, method);
    assert_eq!(references[0].kind, ReferenceKind::Creation);
}

#[test]
fn no_inner_class_structure() {
    let index = ProgramIndex::build(&lone_class_program(), true).unwrap();
    assert!(index.inner_classes("none/a").is_empty());
    assert!(index.outer_class("a").is_none());
    assert!(!index.is_anonymous_class("a"));
}

#[test]
fn interfaces() {
    let index = build_index();
    assert!(index.interfaces("none/a").is_empty());
    assert!(index.implementing_classes("none/a").is_empty());
    assert!(!index.is_interface("none/a"));
}

#[test]
fn bridge_methods() {
    let index = build_index();
    let method = new_method("none/a", "a", "()Ljava/lang/String;");
    assert!(index.bridge_method(&method).is_none());
}

#[test]
fn contains() {
    let index = build_index();
    assert!(index.contains_class(&new_class("none/a")));
    assert!(!index.contains_class(&new_class("none/b")));
    assert!(index.contains_field(&new_field("none/a", "a")));
    assert!(!index.contains_field(&new_field("none/a", "b")));
    assert!(index.contains_behavior(&BehaviorEntry::Method(new_method(
        "none/a",
        "a",
        "()Ljava/lang/String;"
    ))));
    assert!(!index.contains_behavior(&BehaviorEntry::Method(new_method(
        "none/a",
        "b",
        "()Ljava/lang/String;"
    ))));
}

#[test]
fn partition_separates_named_classes() {
    let mut deobfuscator = Deobfuscator::new(&lone_class_program()).unwrap();
    let partition = deobfuscator.partition_classes();
    assert_eq!(partition.obfuscated, vec![new_class("none/a")]);
    assert_eq!(partition.deobfuscated, vec![new_class("fixture/Keep")]);

    // an explicit mapping moves a class to the named side
    deobfuscator
        .rename(&Entry::Class(new_class("none/a")), "fixture/Lone")
        .unwrap();
    let partition = deobfuscator.partition_classes();
    assert!(partition.obfuscated.is_empty());
    assert_eq!(partition.deobfuscated.len(), 2);
}
