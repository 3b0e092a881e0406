// C# type declarations: classes, interfaces, structs, records and enums
//
// Members are read from the direct children of the declaration body; nested
// types recurse into the parent's `types` list.

use super::calls::TypeContext;
use super::helpers;
use super::members::{self, MemberOwner};
use crate::extractors::base::{BaseExtractor, TypeDeclaration, TypeKind};
use tracing::trace;
use tree_sitter::Node;

pub(super) const TYPE_DECLARATION_KINDS: &[&str] = &[
    "class_declaration",
    "interface_declaration",
    "struct_declaration",
    "record_declaration",
    "record_struct_declaration",
    "enum_declaration",
];

pub(super) const BODY_KINDS: &[&str] = &["declaration_list", "enum_member_declaration_list"];

const METHOD_KINDS: &[&str] = &[
    "method_declaration",
    "constructor_declaration",
    "destructor_declaration",
];

fn type_kind(node: &Node) -> Option<TypeKind> {
    match node.kind() {
        "class_declaration" => Some(TypeKind::Class),
        "interface_declaration" => Some(TypeKind::Interface),
        "struct_declaration" => Some(TypeKind::Struct),
        "record_declaration" | "record_struct_declaration" => Some(TypeKind::Record),
        "enum_declaration" => Some(TypeKind::Enum),
        _ => None,
    }
}

/// Extract one type declaration and, recursively, its nested declarations
pub(super) fn extract_type(base: &BaseExtractor, node: &Node) -> Option<TypeDeclaration> {
    let kind = type_kind(node)?;
    let name = helpers::name_with_type_parameters(base, node)?;
    trace!("Extracting C# {} {}", kind, name);

    let modifiers = helpers::extract_modifiers(base, node);
    let mut declaration = TypeDeclaration::new(kind, name);
    declaration.visibility = modifiers.visibility();
    declaration.modifiers = modifiers.keywords;
    declaration.annotations = modifiers.attributes;

    let entries = helpers::base_list_entries(base, node);
    match kind {
        TypeKind::Class | TypeKind::Record => {
            let (extends, implements) = helpers::split_base_list(entries);
            declaration.extends_type = extends;
            declaration.implements_interfaces = implements;
        }
        TypeKind::Interface | TypeKind::Struct => declaration.implements_interfaces = entries,
        // An enum's base list names its underlying integral type
        _ => {}
    }

    let bare_name = base.get_field_text(node, "name").unwrap_or_default();
    if kind == TypeKind::Record {
        declaration.properties = members::record_properties(base, node);
    }

    let Some(body) = node
        .child_by_field_name("body")
        .filter(|b| BODY_KINDS.contains(&b.kind()))
        .or_else(|| base.find_child_by_types(node, BODY_KINDS))
    else {
        return Some(declaration);
    };

    if kind == TypeKind::Enum {
        let mut cursor = body.walk();
        for member in body
            .named_children(&mut cursor)
            .filter(|m| m.kind() == "enum_member_declaration")
        {
            if let Some(field) = members::enum_member(base, &member, &bare_name) {
                declaration.fields.push(field);
            }
        }
        return Some(declaration);
    }

    let owner = if kind == TypeKind::Interface {
        MemberOwner::Interface
    } else {
        MemberOwner::Type
    };
    let mut context = TypeContext {
        type_name: bare_name.clone(),
        base_type: declaration.extends_type.clone(),
        ..Default::default()
    };

    let children: Vec<Node> = body.named_children(&mut body.walk()).collect();

    // Fields and properties first so bodies can resolve `this.X` and bare member names
    for child in &children {
        match child.kind() {
            "field_declaration" | "event_field_declaration" => {
                let fields = base
                    .isolate(
                        || format!("field in {}", bare_name),
                        || members::extract_fields(base, child),
                    )
                    .unwrap_or_default();
                declaration.fields.extend(fields);
            }
            _ => {}
        }
    }
    for field in &declaration.fields {
        context.members.declare(field.name.clone(), field.type_name.clone());
    }
    for property in &declaration.properties {
        context
            .members
            .declare(property.name.clone(), property.type_name.clone());
    }
    for child in children.iter().filter(|c| c.kind() == "property_declaration") {
        if let Some(name) = base.get_field_text(child, "name") {
            let type_name = child
                .child_by_field_name("type")
                .map(|t| base.get_type_text(&t));
            context.members.declare(name, type_name);
        }
    }

    for child in &children {
        match child.kind() {
            "property_declaration" => {
                let property = base
                    .isolate(
                        || format!("property in {}", bare_name),
                        || members::extract_property(base, child, owner, &context),
                    )
                    .flatten();
                if let Some(property) = property {
                    declaration.properties.push(property);
                }
            }
            kind if METHOD_KINDS.contains(&kind) => {
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

    Some(declaration)
}
