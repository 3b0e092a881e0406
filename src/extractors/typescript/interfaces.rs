//! Interface, enum and type alias extraction

use super::calls::ClassContext;
use super::functions;
use super::helpers;
use super::Dialect;
use crate::extractors::base::{BaseExtractor, FieldDeclaration, TypeDeclaration, TypeKind};
use tracing::trace;
use tree_sitter::Node;

/// `interface Name<T> extends A, B { ... }`
///
/// Extended interfaces are listed as implemented. Property signatures become
/// fields and method signatures become bodiless methods; both are implicitly
/// public, and the methods abstract.
pub(super) fn extract_interface(
    base: &BaseExtractor,
    dialect: Dialect,
    node: &Node,
) -> Option<TypeDeclaration> {
    let name = helpers::name_with_type_parameters(base, node)?;
    trace!("Extracting interface {}", name);
    let mut declaration = TypeDeclaration::new(TypeKind::Interface, name);
    declaration.modifiers = helpers::extract_modifiers(base, node).keywords;

    if let Some(clause) = base.find_first_child(node, "extends_type_clause") {
        let mut cursor = clause.walk();
        declaration.implements_interfaces = clause
            .named_children(&mut cursor)
            .map(|t| base.normalize_inline(&t))
            .collect();
    }

    let Some(body) = node.child_by_field_name("body") else {
        return Some(declaration);
    };
    let context = ClassContext::default();
    let mut cursor = body.walk();
    for member in body.named_children(&mut cursor) {
        match member.kind() {
            "property_signature" => {
                let Some(name) = base.get_field_text(&member, "name") else {
                    continue;
                };
                let mut modifiers = helpers::extract_modifiers(base, &member);
                modifiers.imply("public");
                let mut field =
                    FieldDeclaration::new(name, helpers::annotated_type(base, &member, "type"));
                field.visibility = Some("public".to_string());
                field.modifiers = modifiers.keywords;
                declaration.fields.push(field);
            }
            "method_signature" => {
                let method = base
                    .isolate(
                        || format!("method signature in {}", declaration.name),
                        || {
                            let name = base.get_field_text(&member, "name")?;
                            let mut modifiers = helpers::extract_modifiers(base, &member);
                            modifiers.visibility = Some("public".to_string());
                            modifiers.imply("public");
                            modifiers.imply("abstract");
                            Some(functions::build_method(
                                base, dialect, &context, &member, name, modifiers,
                            ))
                        },
                    )
                    .flatten();
                if let Some(method) = method {
                    declaration.methods.push(method);
                }
            }
            _ => {}
        }
    }
    Some(declaration)
}

/// `enum Color { Red, Green = "g" }`; members become fields typed with the enum
pub(super) fn extract_enum(base: &BaseExtractor, node: &Node) -> Option<TypeDeclaration> {
    let name = base.get_field_text(node, "name")?;
    let mut declaration = TypeDeclaration::new(TypeKind::Enum, name.clone());
    declaration.modifiers = helpers::extract_modifiers(base, node).keywords;

    let Some(body) = node.child_by_field_name("body") else {
        return Some(declaration);
    };
    let mut cursor = body.walk();
    for member in body.named_children(&mut cursor) {
        let member_name = match member.kind() {
            "property_identifier" | "string" => Some(base.get_node_text(&member)),
            "enum_assignment" => base.get_field_text(&member, "name"),
            _ => None,
        };
        if let Some(member_name) = member_name {
            declaration
                .fields
                .push(FieldDeclaration::new(member_name, Some(name.clone())));
        }
    }
    Some(declaration)
}

/// `type Handler<T> = (event: T) => void`, recorded by name only
pub(super) fn extract_type_alias(base: &BaseExtractor, node: &Node) -> Option<TypeDeclaration> {
    let name = helpers::name_with_type_parameters(base, node)?;
    let mut declaration = TypeDeclaration::new(TypeKind::TypeAlias, name);
    declaration.modifiers = helpers::extract_modifiers(base, node).keywords;
    Some(declaration)
}
