/// Java member extraction: fields, methods, constructors and parameters
use super::calls::{self, TypeContext};
use super::helpers::{self, Modifiers};
use crate::extractors::base::{
    BaseExtractor, FieldDeclaration, MethodDeclaration, ParameterDeclaration,
};
use tree_sitter::Node;

/// Where a member is declared; interface members get implicit visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum MemberOwner {
    Class,
    Interface,
}

/// One FieldDeclaration per declarator of a `field_declaration` / `constant_declaration`
pub(super) fn extract_fields(
    base: &BaseExtractor,
    node: Node,
    owner: MemberOwner,
) -> Vec<FieldDeclaration> {
    let mut modifiers = helpers::extract_modifiers(base, node);
    if owner == MemberOwner::Interface {
        modifiers.imply("public");
        modifiers.imply("static");
        modifiers.imply("final");
    }
    let declared_type = helpers::declared_type(base, node);

    node.children_by_field_name("declarator", &mut node.walk())
        .filter_map(|declarator| {
            let name = base.get_field_text(&declarator, "name")?;
            let type_name = declared_type.clone().or_else(|| {
                declarator
                    .child_by_field_name("value")
                    .and_then(|v| helpers::infer_expression_type(base, v))
            });
            Some(FieldDeclaration {
                name,
                type_name,
                visibility: modifiers.visibility(),
                modifiers: modifiers.keywords.clone(),
                annotations: modifiers.annotations.clone(),
            })
        })
        .collect()
}

/// Method or constructor with parameters and body analysis
pub(super) fn extract_method(
    base: &BaseExtractor,
    node: Node,
    owner: MemberOwner,
    context: &TypeContext,
) -> Option<MethodDeclaration> {
    let is_constructor = matches!(
        node.kind(),
        "constructor_declaration" | "compact_constructor_declaration"
    );
    let name = if is_constructor {
        context.type_name.clone()
    } else {
        base.get_field_text(&node, "name")?
    };

    let mut modifiers = helpers::extract_modifiers(base, node);
    let body = node.child_by_field_name("body");
    if owner == MemberOwner::Interface {
        apply_interface_defaults(&mut modifiers, body.is_some());
    }

    let mut method = MethodDeclaration::new(name);
    method.visibility = modifiers.visibility();
    method.return_type = if is_constructor {
        None
    } else {
        node.child_by_field_name("type")
            .map(|t| base.get_type_text(&t))
    };
    method.modifiers = modifiers.keywords;
    method.annotations = modifiers.annotations;
    method.parameters = match node.child_by_field_name("parameters") {
        Some(params) => extract_parameters(base, params),
        // Compact record constructors take the record components implicitly
        None if node.kind() == "compact_constructor_declaration" => {
            context.record_components.clone()
        }
        None => Vec::new(),
    };

    if let Some(body) = body {
        let (locals, calls) = calls::analyze_body(base, body, &method.parameters, context);
        method.local_variables = locals;
        method.method_calls = calls;
    }
    Some(method)
}

/// Interface methods are public; body-less ones are abstract
fn apply_interface_defaults(modifiers: &mut Modifiers, has_body: bool) {
    if modifiers.visibility().is_none() {
        modifiers.imply("public");
    }
    let concrete = has_body || modifiers.has("default") || modifiers.has("static");
    if !concrete && !modifiers.has("private") {
        modifiers.imply("abstract");
    }
}

/// Positional parameter extraction from `formal_parameters`
pub(super) fn extract_parameters(base: &BaseExtractor, params: Node) -> Vec<ParameterDeclaration> {
    let mut result = Vec::new();
    for param in params.named_children(&mut params.walk()) {
        match param.kind() {
            "formal_parameter" => {
                let Some(name) = base.get_field_text(&param, "name") else {
                    continue;
                };
                let type_name = param.child_by_field_name("type").map(|t| {
                    let mut text = base.get_type_text(&t);
                    // `int values[]` style dimensions on the name
                    if let Some(dims) = param.child_by_field_name("dimensions") {
                        text.push_str(&base.get_node_text(&dims));
                    }
                    text
                });
                result.push(ParameterDeclaration::new(name, type_name));
            }
            "spread_parameter" => {
                let type_name = base
                    .find_child_by_types(
                        &param,
                        &[
                            "type_identifier",
                            "generic_type",
                            "scoped_type_identifier",
                            "integral_type",
                            "floating_point_type",
                            "boolean_type",
                            "array_type",
                        ],
                    )
                    .map(|t| format!("{}...", base.get_type_text(&t)));
                let name = base
                    .find_first_child(&param, "variable_declarator")
                    .and_then(|d| base.get_field_text(&d, "name"))
                    .or_else(|| {
                        base.find_first_child(&param, "identifier")
                            .map(|n| base.get_node_text(&n))
                    });
                if let Some(name) = name {
                    result.push(ParameterDeclaration::new(name, type_name));
                }
            }
            // `Foo this` receiver parameters and comments carry no binding
            _ => {}
        }
    }
    result
}

/// Record header components as parameters
pub(super) fn record_components(base: &BaseExtractor, node: Node) -> Vec<ParameterDeclaration> {
    node.child_by_field_name("parameters")
        .map(|params| extract_parameters(base, params))
        .unwrap_or_default()
}
