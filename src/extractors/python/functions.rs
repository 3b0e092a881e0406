/// Function and method extraction, including parameters and type hints
use super::calls::{self, ClassContext};
use super::decorators;
use super::helpers;
use crate::extractors::base::{BaseExtractor, MethodDeclaration, ParameterDeclaration};
use tree_sitter::Node;

/// One `function_definition` as a MethodDeclaration
///
/// Inside a class the leading `self`/`cls` receiver is dropped from the parameters.
pub(super) fn extract_function(
    base: &BaseExtractor,
    node: &Node,
    context: &ClassContext,
) -> Option<MethodDeclaration> {
    let name = base.get_field_text(node, "name")?;
    let mut method = MethodDeclaration::new(name);
    method.visibility = Some(helpers::convention_visibility(&method.name).to_string());
    method.annotations = decorators::extract_decorators(base, node);

    if is_async(node) {
        method.modifiers.push("async".to_string());
    }
    method
        .modifiers
        .extend(decorators::decorator_modifiers(&method.annotations));

    method.return_type = node
        .child_by_field_name("return_type")
        .map(|t| base.normalize_inline(&t));

    let in_class = context.class_name.is_some();
    let is_static = method.modifiers.iter().any(|m| m == "static");
    method.parameters = node
        .child_by_field_name("parameters")
        .map(|params| extract_parameters(base, &params, in_class && !is_static))
        .unwrap_or_default();

    if let Some(body) = node.child_by_field_name("body") {
        let (locals, calls) = calls::analyze_body(base, body, &method.parameters, context);
        method.local_variables = locals;
        method.method_calls = calls;
    }
    Some(method)
}

fn is_async(node: &Node) -> bool {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).any(|child| child.kind() == "async");
    found
}

/// Positional parameter extraction
///
/// `*args` and `**kwargs` keep their stars; the bare `*` and `/` separators bind nothing.
pub(super) fn extract_parameters(
    base: &BaseExtractor,
    params: &Node,
    skip_receiver: bool,
) -> Vec<ParameterDeclaration> {
    let mut result: Vec<ParameterDeclaration> = Vec::new();
    let mut cursor = params.walk();
    for (index, param) in params.named_children(&mut cursor).enumerate() {
        let extracted = match param.kind() {
            "identifier" => Some(ParameterDeclaration::new(base.get_node_text(&param), None)),
            "typed_parameter" => {
                let type_name = param
                    .child_by_field_name("type")
                    .map(|t| base.normalize_inline(&t));
                param
                    .named_child(0)
                    .and_then(|inner| splat_or_identifier(base, &inner))
                    .map(|name| ParameterDeclaration::new(name, type_name))
            }
            "default_parameter" | "typed_default_parameter" => {
                let type_name = param
                    .child_by_field_name("type")
                    .map(|t| base.normalize_inline(&t));
                base.get_field_text(&param, "name")
                    .map(|name| ParameterDeclaration::new(name, type_name))
            }
            "list_splat_pattern" | "dictionary_splat_pattern" => {
                splat_or_identifier(base, &param).map(|name| ParameterDeclaration::new(name, None))
            }
            _ => None,
        };
        let Some(extracted) = extracted else {
            continue;
        };
        if skip_receiver && index == 0 && matches!(extracted.name.as_str(), "self" | "cls") {
            continue;
        }
        if result.iter().any(|p| p.name == extracted.name) {
            continue;
        }
        result.push(extracted);
    }
    result
}

fn splat_or_identifier(base: &BaseExtractor, node: &Node) -> Option<String> {
    match node.kind() {
        "identifier" => Some(base.get_node_text(node)),
        "list_splat_pattern" | "dictionary_splat_pattern" => {
            let stars = if node.kind() == "list_splat_pattern" { "*" } else { "**" };
            let inner = node.named_child(0)?;
            Some(format!("{}{}", stars, base.get_node_text(&inner)))
        }
        _ => None,
    }
}
