/// Method extraction: `def name`, `def self.name` and endless `def name = expr`
use super::calls::{self, TypeContext};
use super::helpers;
use crate::extractors::base::{BaseExtractor, MethodDeclaration};
use tree_sitter::Node;

/// A `method` or `singleton_method` node
///
/// Class-level methods (`def self.x`, or any method inside `class << self`)
/// carry the `static` modifier.
pub(super) fn extract_method(
    base: &BaseExtractor,
    node: &Node,
    context: &TypeContext,
    visibility: &str,
    is_static: bool,
) -> Option<MethodDeclaration> {
    let name = base.get_field_text(node, "name")?;
    let mut method = MethodDeclaration::new(name);
    method.visibility = Some(visibility.to_string());
    if is_static || node.kind() == "singleton_method" {
        method.modifiers.push("static".to_string());
    }

    method.parameters = node
        .child_by_field_name("parameters")
        .map(|params| helpers::extract_parameters(base, &params))
        .unwrap_or_default();

    let body = node
        .child_by_field_name("body")
        .or_else(|| base.find_first_child(node, "body_statement"));
    if let Some(body) = body {
        let (locals, calls) = calls::analyze_body(base, body, &method.parameters, context);
        method.local_variables = locals;
        method.method_calls = calls;
    }
    Some(method)
}
