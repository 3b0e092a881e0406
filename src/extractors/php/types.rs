/// PHP type declarations: classes, interfaces, traits and enums
///
/// Trait `use` clauses inside a body become mixins. Constructor-promoted
/// parameters are recorded as fields next to the declared properties.
use super::calls::TypeContext;
use super::helpers::{self, TYPE_DECLARATION_KINDS};
use super::members::{self, MemberOwner};
use crate::extractors::base::{BaseExtractor, TypeDeclaration, TypeKind};
use tracing::trace;
use tree_sitter::Node;

pub(super) const BODY_KINDS: &[&str] = &["declaration_list", "enum_declaration_list"];

const NAME_KINDS: &[&str] = &["name", "qualified_name"];

fn type_kind(node: &Node) -> Option<TypeKind> {
    match node.kind() {
        "class_declaration" => Some(TypeKind::Class),
        "interface_declaration" => Some(TypeKind::Interface),
        "trait_declaration" => Some(TypeKind::Trait),
        "enum_declaration" => Some(TypeKind::Enum),
        _ => None,
    }
}

/// Extract one type declaration with its members
pub(super) fn extract_type(base: &BaseExtractor, node: Node) -> Option<TypeDeclaration> {
    let kind = type_kind(&node)?;
    let name = base.get_field_text(&node, "name")?;
    trace!("Extracting PHP {} {}", kind, name);

    let modifiers = helpers::extract_modifiers(base, node);
    let mut declaration = TypeDeclaration::new(kind, name.clone());
    declaration.visibility = modifiers.visibility();
    declaration.modifiers = modifiers.keywords;
    declaration.annotations = modifiers.annotations;

    let base_names = base
        .find_first_child(&node, "base_clause")
        .map(|clause| listed_names(base, clause))
        .unwrap_or_default();
    match kind {
        // `interface A extends B, C`
        TypeKind::Interface => declaration.implements_interfaces = base_names,
        // Backing type of `enum Status: string`
        TypeKind::Enum => {
            declaration.extends_type = base
                .find_child_by_types(&node, &["primitive_type", "named_type"])
                .map(|t| base.get_node_text(&t));
        }
        _ => declaration.extends_type = base_names.into_iter().next(),
    }
    if let Some(clause) = base.find_first_child(&node, "class_interface_clause") {
        declaration.implements_interfaces.extend(listed_names(base, clause));
    }

    let Some(body) = node
        .child_by_field_name("body")
        .or_else(|| base.find_child_by_types(&node, BODY_KINDS))
    else {
        return Some(declaration);
    };

    let owner = if kind == TypeKind::Interface {
        MemberOwner::Interface
    } else {
        MemberOwner::Class
    };

    for child in body.named_children(&mut body.walk()) {
        match child.kind() {
            "use_declaration" => declaration.mixins.extend(trait_names(base, child)),
            "property_declaration" => {
                let fields = base
                    .isolate(
                        || format!("property in {}", name),
                        || members::extract_properties(base, child),
                    )
                    .unwrap_or_default();
                declaration.fields.extend(fields);
            }
            "const_declaration" => {
                let fields = base
                    .isolate(
                        || format!("constant in {}", name),
                        || members::extract_constants(base, child),
                    )
                    .unwrap_or_default();
                declaration.fields.extend(fields);
            }
            "enum_case" => {
                if let Some(case) = members::extract_enum_case(base, child) {
                    declaration.fields.push(case);
                }
            }
            "method_declaration"
                if base.get_field_text(&child, "name").as_deref() == Some("__construct") =>
            {
                declaration
                    .fields
                    .extend(members::promoted_properties(base, child));
            }
            _ => {}
        }
    }

    let mut context = TypeContext {
        type_name: Some(name.clone()),
        superclass: declaration.extends_type.clone().filter(|_| kind == TypeKind::Class),
        ..Default::default()
    };
    for field in &declaration.fields {
        context.fields.declare(field.name.clone(), field.type_name.clone());
    }

    for child in body.named_children(&mut body.walk()) {
        if child.kind() != "method_declaration" {
            continue;
        }
        let method = base
            .isolate(
                || format!("method in {}", name),
                || members::extract_method(base, child, owner, &context),
            )
            .flatten();
        if let Some(method) = method {
            declaration.methods.push(method);
        }
    }

    // Declarations the grammar nests inside a body, such as classes in method bodies
    for nested in base.top_level_declarations(&body, TYPE_DECLARATION_KINDS, BODY_KINDS) {
        let extracted = base
            .isolate(
                || format!("type nested in {}", name),
                || extract_type(base, nested),
            )
            .flatten();
        if let Some(nested) = extracted {
            declaration.types.push(nested);
        }
    }

    Some(declaration)
}

/// Names listed in a `base_clause` or `class_interface_clause`
fn listed_names(base: &BaseExtractor, clause: Node) -> Vec<String> {
    clause
        .named_children(&mut clause.walk())
        .filter(|child| NAME_KINDS.contains(&child.kind()))
        .map(|child| base.get_node_text(&child))
        .collect()
}

/// Traits pulled in by `use A, B;` or `use A, B { ... }`
fn trait_names(base: &BaseExtractor, use_declaration: Node) -> Vec<String> {
    use_declaration
        .named_children(&mut use_declaration.walk())
        .filter(|child| NAME_KINDS.contains(&child.kind()))
        .map(|child| base.get_node_text(&child))
        .collect()
}
