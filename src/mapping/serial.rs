//! Serializable document form of the mapping tree.
//!
//! Persistence is an external collaborator's concern; the crate only
//! commits to a stable, serde-serializable shape keyed as
//! class → fields / methods (with arguments) / inner classes. The exact
//! on-disk encoding (JSON, a custom text format, ...) is chosen by whoever
//! owns the files. Emission sorts every level, classes in the obfuscator's
//! `a, b, ..., aa, ab` order, so documents diff cleanly.

use serde::{Deserialize, Serialize};

use crate::{
    mapping::{ArgumentMapping, ClassMapping, FieldMapping, Mappings, MethodMapping},
    Result,
};

/// Orders obfuscated names the way obfuscators generate them: by length
/// first, then lexicographically (`a, b, ..., z, aa, ab, ...`).
fn obfuscation_order(a: &str, b: &str) -> std::cmp::Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// One argument name override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgumentMappingNode {
    /// Parameter index.
    pub index: usize,
    /// Obfuscated argument name.
    pub obf_name: String,
    /// Deobfuscated argument name.
    pub deobf_name: String,
}

/// One method mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodMappingNode {
    /// Obfuscated method name.
    pub obf_name: String,
    /// Obfuscated method descriptor.
    pub obf_descriptor: String,
    /// Deobfuscated method name, absent when the node only carries
    /// arguments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deobf_name: Option<String>,
    /// Argument name overrides.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<ArgumentMappingNode>,
}

/// One field mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMappingNode {
    /// Obfuscated field name.
    pub obf_name: String,
    /// Deobfuscated field name.
    pub deobf_name: String,
}

/// One class mapping with its nested children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassMappingNode {
    /// Obfuscated class name: full internal name at the top level, simple
    /// name for nested classes.
    pub obf_name: String,
    /// Deobfuscated class name, if assigned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deobf_name: Option<String>,
    /// Field mappings.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldMappingNode>,
    /// Method mappings.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<MethodMappingNode>,
    /// Nested class mappings.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inner_classes: Vec<ClassMappingNode>,
}

/// A whole mapping forest in document form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingsDocument {
    /// Top-level class mappings.
    pub classes: Vec<ClassMappingNode>,
}

impl MappingsDocument {
    /// Emits the full tree of a live mapping forest.
    #[must_use]
    pub fn from_mappings(mappings: &Mappings) -> MappingsDocument {
        let mut classes: Vec<ClassMappingNode> =
            mappings.classes().map(class_to_node).collect();
        classes.sort_by(|a, b| obfuscation_order(&a.obf_name, &b.obf_name));
        MappingsDocument { classes }
    }

    /// Ingests a document into a live mapping forest.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NameConflict`] for duplicate obfuscated or
    /// deobfuscated keys anywhere in the document; a conflicting document
    /// yields no forest at all.
    pub fn into_mappings(self) -> Result<Mappings> {
        let mut mappings = Mappings::new();
        for node in self.classes {
            mappings.add_class_mapping(node_to_class(node)?)?;
        }
        Ok(mappings)
    }
}

impl Mappings {
    /// Emits this forest as a serializable document.
    #[must_use]
    pub fn to_document(&self) -> MappingsDocument {
        MappingsDocument::from_mappings(self)
    }

    /// Builds a forest from a document.
    ///
    /// # Errors
    ///
    /// See [`MappingsDocument::into_mappings`].
    pub fn from_document(document: MappingsDocument) -> Result<Mappings> {
        document.into_mappings()
    }
}

fn class_to_node(mapping: &ClassMapping) -> ClassMappingNode {
    let mut fields: Vec<FieldMappingNode> = mapping
        .fields()
        .map(|f| FieldMappingNode {
            obf_name: f.obf_name().to_string(),
            deobf_name: f.deobf_name().to_string(),
        })
        .collect();
    fields.sort_by(|a, b| obfuscation_order(&a.obf_name, &b.obf_name));

    let mut methods: Vec<MethodMappingNode> = mapping
        .methods()
        .map(|m| {
            let arguments = m
                .arguments()
                .map(|(index, arg)| ArgumentMappingNode {
                    index,
                    obf_name: arg.obf_name().to_string(),
                    deobf_name: arg.deobf_name().to_string(),
                })
                .collect();
            MethodMappingNode {
                obf_name: m.obf_name().to_string(),
                obf_descriptor: m.obf_descriptor().to_string(),
                deobf_name: m.deobf_name().map(str::to_string),
                arguments,
            }
        })
        .collect();
    methods.sort_by(|a, b| {
        obfuscation_order(&a.obf_name, &b.obf_name)
            .then_with(|| a.obf_descriptor.cmp(&b.obf_descriptor))
    });

    let mut inner_classes: Vec<ClassMappingNode> =
        mapping.inner_classes().map(class_to_node).collect();
    inner_classes.sort_by(|a, b| obfuscation_order(&a.obf_name, &b.obf_name));

    ClassMappingNode {
        obf_name: mapping.obf_name().to_string(),
        deobf_name: mapping.deobf_name().map(str::to_string),
        fields,
        methods,
        inner_classes,
    }
}

fn node_to_class(node: ClassMappingNode) -> Result<ClassMapping> {
    let mut mapping = match node.deobf_name {
        Some(deobf) => ClassMapping::with_deobf_name(&node.obf_name, deobf),
        None => ClassMapping::new(&node.obf_name),
    };

    for field in node.fields {
        mapping.add_field_mapping(FieldMapping::new(field.obf_name, field.deobf_name))?;
    }
    for method in node.methods {
        let mut method_mapping = MethodMapping::new(&method.obf_name, &method.obf_descriptor);
        method_mapping.set_deobf_name(method.deobf_name);
        for argument in method.arguments {
            method_mapping.set_argument_name(
                argument.index,
                ArgumentMapping::new(argument.obf_name, argument.deobf_name),
            );
        }
        mapping.add_method_mapping(method_mapping)?;
    }
    for inner in node.inner_classes {
        let child = node_to_class(inner)?;
        if mapping.inner_class_by_obf(child.obf_name()).is_some() {
            return Err(crate::Error::NameConflict {
                scope: node.obf_name.clone(),
                name: child.obf_name().to_string(),
            });
        }
        mapping.insert_inner_class(child);
    }
    Ok(mapping)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_obfuscation_order() {
        let mut names = vec!["aa", "b", "a", "ab"];
        names.sort_by(|a, b| obfuscation_order(a, b));
        assert_eq!(names, vec!["a", "b", "aa", "ab"]);
    }

    #[test]
    fn test_document_round_trip() {
        let mut mappings = Mappings::new();
        let mut class = ClassMapping::with_deobf_name("none/a", "fixture/Thing");
        class.set_field_name("a", "count");
        class.set_method_name("a", "()V", Some("run"));
        class.set_argument_name("b", "(I)V", 0, ArgumentMapping::new("p0", "amount"));
        class.set_inner_class_name("b", Some("Builder"));
        mappings.add_class_mapping(class).unwrap();

        let document = mappings.to_document();
        let rebuilt = Mappings::from_document(document.clone()).unwrap();
        assert_eq!(rebuilt.to_document(), document);

        let scope = rebuilt.class_by_obf("none/a").unwrap();
        assert_eq!(scope.deobf_field_name("a"), Some("count"));
        assert!(scope.method_by_deobf("run", "()V").is_some());
        assert!(scope.inner_class_by_deobf("Builder").is_some());
        assert!(rebuilt.class_by_deobf("fixture/Thing").is_some());
    }

    #[test]
    fn test_conflicting_document_is_rejected() {
        let document = MappingsDocument {
            classes: vec![ClassMappingNode {
                obf_name: "none/a".to_string(),
                deobf_name: None,
                fields: vec![
                    FieldMappingNode {
                        obf_name: "a".to_string(),
                        deobf_name: "count".to_string(),
                    },
                    FieldMappingNode {
                        obf_name: "b".to_string(),
                        deobf_name: "count".to_string(),
                    },
                ],
                methods: Vec::new(),
                inner_classes: Vec::new(),
            }],
        };
        assert!(document.into_mappings().is_err());
    }
}
