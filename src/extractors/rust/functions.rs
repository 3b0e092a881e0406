/// Function extraction: free functions, methods, trait signatures and parameters
use super::calls::{self, ImplContext};
use super::helpers;
use crate::extractors::base::{BaseExtractor, MethodDeclaration, ParameterDeclaration};
use tree_sitter::Node;

/// A `function_item` or `function_signature_item`
///
/// Visibility is recorded both as the visibility and as the first modifier,
/// followed by `async`/`const`/`unsafe`/`extern` qualifiers.
pub(super) fn extract_function(
    base: &BaseExtractor,
    node: &Node,
    context: &ImplContext,
) -> Option<MethodDeclaration> {
    let name = base.get_field_text(node, "name")?;
    let mut method = MethodDeclaration::new(name);
    method.visibility = helpers::extract_visibility(base, node);
    method.modifiers.extend(method.visibility.clone());
    method
        .modifiers
        .extend(helpers::function_modifiers(base, node));
    method.annotations = helpers::preceding_attributes(base, node);

    method.return_type = node
        .child_by_field_name("return_type")
        .map(|t| base.normalize_inline(&t));
    method.parameters = node
        .child_by_field_name("parameters")
        .map(|params| extract_parameters(base, &params))
        .unwrap_or_default();

    if let Some(body) = node.child_by_field_name("body") {
        let (locals, calls) = calls::analyze_body(base, body, &method.parameters, context);
        method.local_variables = locals;
        method.method_calls = calls;
    }
    Some(method)
}

/// Parameters in order, `self` first when present
///
/// Destructuring patterns contribute one untyped parameter per bound name.
pub(super) fn extract_parameters(base: &BaseExtractor, params: &Node) -> Vec<ParameterDeclaration> {
    let mut result: Vec<ParameterDeclaration> = Vec::new();
    let mut cursor = params.walk();
    for param in params.named_children(&mut cursor) {
        match param.kind() {
            "self_parameter" => result.push(ParameterDeclaration::new("self", None)),
            "parameter" => {
                let Some(pattern) = param.child_by_field_name("pattern") else {
                    continue;
                };
                let type_name = param
                    .child_by_field_name("type")
                    .map(|t| base.normalize_inline(&t));
                let names = helpers::bound_identifiers(base, &pattern);
                let single = names.len() == 1;
                for name in names {
                    if result.iter().any(|p| p.name == name) {
                        continue;
                    }
                    let type_name = if single { type_name.clone() } else { None };
                    result.push(ParameterDeclaration::new(name, type_name));
                }
            }
            "variadic_parameter" => result.push(ParameterDeclaration::new("...", None)),
            _ => {}
        }
    }
    result
}
