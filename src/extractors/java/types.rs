/// Java type declarations: classes, interfaces, enums and records
///
/// Only direct children of a declaration's body become its members; nested type
/// declarations are extracted recursively into the parent's `types` list.
use super::calls::TypeContext;
use super::helpers;
use super::members::{self, MemberOwner};
use crate::extractors::base::{BaseExtractor, FieldDeclaration, TypeDeclaration, TypeKind};
use tracing::trace;
use tree_sitter::Node;

pub(super) const TYPE_DECLARATION_KINDS: &[&str] = &[
    "class_declaration",
    "interface_declaration",
    "enum_declaration",
    "record_declaration",
];

pub(super) const BODY_KINDS: &[&str] = &["class_body", "interface_body", "enum_body"];

fn type_kind(node: &Node) -> Option<TypeKind> {
    match node.kind() {
        "class_declaration" => Some(TypeKind::Class),
        "interface_declaration" => Some(TypeKind::Interface),
        "enum_declaration" => Some(TypeKind::Enum),
        "record_declaration" => Some(TypeKind::Record),
        _ => None,
    }
}

/// Extract one type declaration and, recursively, its nested declarations
pub(super) fn extract_type(base: &BaseExtractor, node: Node) -> Option<TypeDeclaration> {
    let kind = type_kind(&node)?;
    let name = helpers::name_with_type_parameters(base, node)?;
    trace!("Extracting Java {} {}", kind, name);

    let modifiers = helpers::extract_modifiers(base, node);
    let mut declaration = TypeDeclaration::new(kind, name);
    declaration.visibility = modifiers.visibility();
    declaration.modifiers = modifiers.keywords;
    declaration.annotations = modifiers.annotations;
    if kind == TypeKind::Class {
        declaration.extends_type = helpers::extract_superclass(base, node);
    }
    declaration.implements_interfaces = helpers::extract_interface_list(base, node);

    let Some(body) = node.child_by_field_name("body") else {
        return Some(declaration);
    };

    let bare_name = base.get_field_text(&node, "name").unwrap_or_default();
    let owner = if kind == TypeKind::Interface {
        MemberOwner::Interface
    } else {
        MemberOwner::Class
    };
    let containers = member_containers(base, body);

    let mut context = TypeContext {
        type_name: bare_name.clone(),
        superclass: declaration.extends_type.clone(),
        ..Default::default()
    };

    // Record components are private final fields
    if kind == TypeKind::Record {
        context.record_components = members::record_components(base, node);
        for component in &context.record_components {
            declaration.fields.push(FieldDeclaration {
                name: component.name.clone(),
                type_name: component.type_name.clone(),
                visibility: Some("private".to_string()),
                modifiers: vec!["private".to_string(), "final".to_string()],
                annotations: Vec::new(),
            });
        }
    }

    for container in &containers {
        for child in container.named_children(&mut container.walk()) {
            match child.kind() {
                "field_declaration" | "constant_declaration" => {
                    let fields = base
                        .isolate(
                            || format!("field in {}", bare_name),
                            || members::extract_fields(base, child, owner),
                        )
                        .unwrap_or_default();
                    declaration.fields.extend(fields);
                }
                "enum_constant" => {
                    if let Some(constant) = enum_constant(base, child, &bare_name) {
                        declaration.fields.push(constant);
                    }
                }
                _ => {}
            }
        }
    }
    for field in &declaration.fields {
        context.fields.declare(field.name.clone(), field.type_name.clone());
    }

    for container in &containers {
        for child in container.named_children(&mut container.walk()) {
            match child.kind() {
                "method_declaration" | "constructor_declaration"
                | "compact_constructor_declaration" => {
                    let method = base
                        .isolate(
                            || format!("method in {}", bare_name),
                            || members::extract_method(base, child, owner, &context),
                        )
                        .flatten();
                    if let Some(method) = method {
                        declaration.methods.push(method);
                    }
                }
                kind if TYPE_DECLARATION_KINDS.contains(&kind) => {
                    let nested = base
                        .isolate(
                            || format!("type nested in {}", bare_name),
                            || extract_type(base, child),
                        )
                        .flatten();
                    if let Some(nested) = nested {
                        declaration.types.push(nested);
                    }
                }
                _ => {}
            }
        }
    }

    Some(declaration)
}

/// The body itself, plus `enum_body_declarations` for enums
fn member_containers<'a>(base: &BaseExtractor, body: Node<'a>) -> Vec<Node<'a>> {
    let mut containers = vec![body];
    if body.kind() == "enum_body" {
        if let Some(declarations) = base.find_first_child(&body, "enum_body_declarations") {
            containers.push(declarations);
        }
    }
    containers
}

/// Enum constants are public static final fields of the enum's own type
fn enum_constant(base: &BaseExtractor, node: Node, enum_name: &str) -> Option<FieldDeclaration> {
    let name = base.get_field_text(&node, "name")?;
    let modifiers = helpers::extract_modifiers(base, node);
    Some(FieldDeclaration {
        name,
        type_name: Some(enum_name.to_string()),
        visibility: Some("public".to_string()),
        modifiers: vec![
            "public".to_string(),
            "static".to_string(),
            "final".to_string(),
        ],
        annotations: modifiers.annotations,
    })
}
