// C# member extraction
//
// Fields, events, enum members, properties with accessors, methods,
// constructors, destructors and parameters.

use super::calls::{self, TypeContext};
use super::helpers::{self, Modifiers};
use crate::extractors::base::{
    AccessorDeclaration, AccessorKind, BaseExtractor, FieldDeclaration, MethodDeclaration,
    ParameterDeclaration, PropertyDeclaration,
};
use tree_sitter::Node;

/// Where a member is declared; interface members get implicit visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum MemberOwner {
    Type,
    Interface,
}

fn owner_defaults(modifiers: &mut Modifiers, owner: MemberOwner) {
    if owner == MemberOwner::Interface && modifiers.visibility().is_none() {
        modifiers.imply("public");
    }
}

/// One FieldDeclaration per declarator of a `field_declaration` or `event_field_declaration`
pub(super) fn extract_fields(base: &BaseExtractor, node: &Node) -> Vec<FieldDeclaration> {
    let mut modifiers = helpers::extract_modifiers(base, node);
    if node.kind() == "event_field_declaration" {
        modifiers.imply("event");
    }
    let Some(declaration) = base.find_first_child(node, "variable_declaration") else {
        return Vec::new();
    };
    let declared_type = declaration
        .child_by_field_name("type")
        .map(|t| base.get_type_text(&t));

    let mut cursor = declaration.walk();
    let fields = declaration
        .named_children(&mut cursor)
        .filter(|child| child.kind() == "variable_declarator")
        .filter_map(|declarator| {
            let name = helpers::declarator_name(base, &declarator)?;
            Some(FieldDeclaration {
                name,
                type_name: declared_type.clone(),
                visibility: modifiers.visibility(),
                modifiers: modifiers.keywords.clone(),
                annotations: modifiers.attributes.clone(),
            })
        })
        .collect();
    fields
}

/// Enum members are public constants of the enum's own type
pub(super) fn enum_member(
    base: &BaseExtractor,
    node: &Node,
    enum_name: &str,
) -> Option<FieldDeclaration> {
    let name = base.get_field_text(node, "name").or_else(|| {
        base.find_first_child(node, "identifier")
            .map(|id| base.get_node_text(&id))
    })?;
    let modifiers = helpers::extract_modifiers(base, node);
    Some(FieldDeclaration {
        name,
        type_name: Some(enum_name.to_string()),
        visibility: Some("public".to_string()),
        modifiers: vec!["public".to_string(), "const".to_string()],
        annotations: modifiers.attributes,
    })
}

/// Method, constructor or destructor with parameters and body analysis
pub(super) fn extract_method(
    base: &BaseExtractor,
    node: &Node,
    owner: MemberOwner,
    context: &TypeContext,
) -> Option<MethodDeclaration> {
    let name = match node.kind() {
        "constructor_declaration" => context.type_name.clone(),
        "destructor_declaration" => format!("~{}", context.type_name),
        _ => base.get_field_text(node, "name")?,
    };

    let mut modifiers = helpers::extract_modifiers(base, node);
    let body = node.child_by_field_name("body").or_else(|| {
        base.find_child_by_types(node, &["block", "arrow_expression_clause"])
    });
    owner_defaults(&mut modifiers, owner);
    if owner == MemberOwner::Interface
        && body.is_none()
        && !modifiers.has("static")
        && !modifiers.has("private")
    {
        modifiers.imply("abstract");
    }

    let mut method = MethodDeclaration::new(name);
    method.visibility = modifiers.visibility();
    method.return_type = node
        .child_by_field_name("returns")
        .or_else(|| node.child_by_field_name("type"))
        .map(|t| base.get_type_text(&t));
    method.modifiers = modifiers.keywords;
    method.annotations = modifiers.attributes;
    method.parameters = node
        .child_by_field_name("parameters")
        .or_else(|| base.find_first_child(node, "parameter_list"))
        .map(|params| extract_parameters(base, &params))
        .unwrap_or_default();

    if let Some(body) = body {
        let (locals, calls) = calls::analyze_body(base, body, &method.parameters, context);
        method.local_variables = locals;
        method.method_calls = calls;
    }
    Some(method)
}

/// Positional parameters; `params` arrays keep the keyword on the name
///
/// Some grammar versions inline the `params` form into the list itself
/// (`params`, array type, identifier as siblings), so both shapes are read.
pub(super) fn extract_parameters(
    base: &BaseExtractor,
    params: &Node,
) -> Vec<ParameterDeclaration> {
    let mut result = Vec::new();
    let mut inline_params = false;
    let mut inline_type: Option<String> = None;

    let mut cursor = params.walk();
    for child in params.children(&mut cursor) {
        match child.kind() {
            "parameter" | "parameter_array" => {
                let name = base.get_field_text(&child, "name").or_else(|| {
                    base.find_first_child(&child, "identifier")
                        .map(|id| base.get_node_text(&id))
                });
                let Some(name) = name else {
                    continue;
                };
                let type_name = child
                    .child_by_field_name("type")
                    .or_else(|| base.find_first_child(&child, "array_type"))
                    .map(|t| base.get_type_text(&t));
                let name = if is_params_array(base, &child) {
                    format!("params {}", name)
                } else {
                    name
                };
                result.push(ParameterDeclaration::new(name, type_name));
            }
            "params" => inline_params = true,
            "array_type" | "nullable_type" if inline_params => {
                inline_type = Some(base.get_type_text(&child));
            }
            "identifier" if inline_params => {
                let name = format!("params {}", base.get_node_text(&child));
                result.push(ParameterDeclaration::new(name, inline_type.take()));
                inline_params = false;
            }
            _ => {}
        }
    }
    result
}

fn is_params_array(base: &BaseExtractor, param: &Node) -> bool {
    if param.kind() == "parameter_array" {
        return true;
    }
    let mut cursor = param.walk();
    let found = param.children(&mut cursor).any(|child| {
        child.kind() == "params"
            || (child.kind() == "modifier" && base.get_node_text(&child) == "params")
    });
    found
}

/// Property with accessor list, or a single synthesized getter when expression-bodied
pub(super) fn extract_property(
    base: &BaseExtractor,
    node: &Node,
    owner: MemberOwner,
    context: &TypeContext,
) -> Option<PropertyDeclaration> {
    let name = base.get_field_text(node, "name")?;
    let mut modifiers = helpers::extract_modifiers(base, node);
    owner_defaults(&mut modifiers, owner);
    let type_name = node
        .child_by_field_name("type")
        .map(|t| base.get_type_text(&t));

    let mut property = PropertyDeclaration {
        name,
        type_name: type_name.clone(),
        visibility: modifiers.visibility(),
        modifiers: modifiers.keywords,
        annotations: modifiers.attributes,
        accessors: Vec::new(),
    };

    if let Some(accessor_list) = node
        .child_by_field_name("accessors")
        .or_else(|| base.find_first_child(node, "accessor_list"))
    {
        let mut cursor = accessor_list.walk();
        for accessor in accessor_list
            .named_children(&mut cursor)
            .filter(|a| a.kind() == "accessor_declaration")
        {
            let extracted = base
                .isolate(
                    || format!("accessor of {}", property.name),
                    || extract_accessor(base, &accessor, type_name.as_ref(), context),
                )
                .flatten();
            if let Some(extracted) = extracted {
                property.accessors.push(extracted);
            }
        }
    } else if let Some(expression) = node
        .child_by_field_name("value")
        .filter(|v| v.kind() == "arrow_expression_clause")
        .or_else(|| base.find_first_child(node, "arrow_expression_clause"))
    {
        let mut getter = AccessorDeclaration::new(AccessorKind::Get);
        let (locals, calls) = calls::analyze_body(base, expression, &[], context);
        getter.local_variables = locals;
        getter.method_calls = calls;
        property.accessors.push(getter);
    }

    Some(property)
}

fn extract_accessor(
    base: &BaseExtractor,
    node: &Node,
    property_type: Option<&String>,
    context: &TypeContext,
) -> Option<AccessorDeclaration> {
    let keyword = base.get_field_text(node, "name").or_else(|| {
        let mut cursor = node.walk();
        let keyword = node
            .children(&mut cursor)
            .find(|c| matches!(c.kind(), "get" | "set" | "init" | "add" | "remove"))
            .map(|c| base.get_node_text(&c));
        keyword
    })?;
    let modifiers = helpers::extract_modifiers(base, node);

    let (kind, keywords) = match keyword.as_str() {
        "get" => (AccessorKind::Get, modifiers.keywords.clone()),
        "set" => (AccessorKind::Set, modifiers.keywords.clone()),
        "init" => {
            let mut keywords = modifiers.keywords.clone();
            keywords.push("init".to_string());
            (AccessorKind::Set, keywords)
        }
        // Event accessors are not property accessors
        _ => return None,
    };

    let mut accessor = AccessorDeclaration::new(kind);
    accessor.visibility = modifiers.visibility();
    accessor.modifiers = keywords;
    accessor.annotations = modifiers.attributes;

    if let Some(body) = node
        .child_by_field_name("body")
        .or_else(|| base.find_child_by_types(node, &["block", "arrow_expression_clause"]))
    {
        // Setters see the implicit `value` parameter
        let implicit = match kind {
            AccessorKind::Set => vec![ParameterDeclaration::new("value", property_type.cloned())],
            AccessorKind::Get => Vec::new(),
        };
        let (locals, calls) = calls::analyze_body(base, body, &implicit, context);
        accessor.local_variables = locals;
        accessor.method_calls = calls;
    }
    Some(accessor)
}

/// Record primary-constructor parameters become public init-only properties
pub(super) fn record_properties(base: &BaseExtractor, node: &Node) -> Vec<PropertyDeclaration> {
    let Some(params) = node
        .child_by_field_name("parameters")
        .or_else(|| base.find_first_child(node, "parameter_list"))
    else {
        return Vec::new();
    };
    extract_parameters(base, &params)
        .into_iter()
        .map(|param| {
            let mut setter = AccessorDeclaration::new(AccessorKind::Set);
            setter.modifiers = vec!["init".to_string()];
            PropertyDeclaration {
                name: param.name,
                type_name: param.type_name,
                visibility: Some("public".to_string()),
                modifiers: vec!["public".to_string()],
                annotations: Vec::new(),
                accessors: vec![AccessorDeclaration::new(AccessorKind::Get), setter],
            }
        })
        .collect()
}
