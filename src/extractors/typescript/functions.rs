//! Function and method extraction with parameter lists
//!
//! Handles function declarations, class methods, method signatures and
//! functions bound to a top-level `const`/`let`/`var`.

use super::calls::{self, BodyAnalyzer, ClassContext};
use super::helpers::{self, Modifiers};
use super::Dialect;
use crate::extractors::base::{BaseExtractor, MethodDeclaration, ParameterDeclaration};
use tree_sitter::Node;

/// Initializer kinds that make a variable declarator a function
pub(super) const FUNCTION_VALUE_KINDS: &[&str] = &[
    "arrow_function",
    "function_expression",
    "function",
    "generator_function",
];

/// Build a method from any function-like node
///
/// Parameters come from `parameters` (or an arrow's single `parameter`), the return
/// type from a `return_type` annotation, and the body, when present, is analyzed
/// against `context`.
pub(super) fn build_method(
    base: &BaseExtractor,
    dialect: Dialect,
    context: &ClassContext,
    function: &Node,
    name: String,
    modifiers: Modifiers,
) -> MethodDeclaration {
    let mut method = MethodDeclaration::new(name);
    method.visibility = modifiers.visibility;
    method.modifiers = modifiers.keywords;
    method.return_type = helpers::annotated_type(base, function, "return_type");
    method.parameters = match function.child_by_field_name("parameters") {
        Some(params) => extract_parameters(base, &params),
        None => function
            .child_by_field_name("parameter")
            .map(|single| vec![ParameterDeclaration::new(base.get_node_text(&single), None)])
            .unwrap_or_default(),
    };

    if let Some(body) = function.child_by_field_name("body") {
        let analyzer = BodyAnalyzer {
            base,
            dialect,
            context,
        };
        let (locals, calls) = analyzer.analyze(body, &method.parameters);
        method.local_variables = locals;
        method.method_calls = calls;
    }
    method
}

/// A `function` or `function*` declaration outside any class
pub(super) fn extract_function(
    base: &BaseExtractor,
    dialect: Dialect,
    node: &Node,
) -> Option<MethodDeclaration> {
    let name = base.get_field_text(node, "name")?;
    let modifiers = helpers::extract_modifiers(base, node);
    let context = ClassContext::default();
    Some(build_method(base, dialect, &context, node, name, modifiers))
}

/// `const handler = async (req) => {...}` as a method named after the binding
///
/// The declaration keyword and any `export` become modifiers; `async` and the
/// generator star are read off the function value itself.
pub(super) fn extract_bound_function(
    base: &BaseExtractor,
    dialect: Dialect,
    declaration: &Node,
    declarator: &Node,
) -> Option<MethodDeclaration> {
    let name = declarator
        .child_by_field_name("name")
        .filter(|n| n.kind() == "identifier")
        .map(|n| base.get_node_text(&n))?;
    let value = declarator
        .child_by_field_name("value")
        .filter(|v| FUNCTION_VALUE_KINDS.contains(&v.kind()))?;

    let mut modifiers = helpers::extract_modifiers(base, declaration);
    if let Some(keyword) = declaration.child_by_field_name("kind") {
        modifiers.imply(&base.get_node_text(&keyword));
    } else if declaration.kind() == "variable_declaration" {
        modifiers.imply("var");
    }
    for keyword in helpers::extract_modifiers(base, &value).keywords {
        modifiers.imply(&keyword);
    }

    let context = ClassContext::default();
    let mut method = build_method(base, dialect, &context, &value, name, modifiers);
    if method.return_type.is_none() {
        method.return_type = helpers::annotated_type(base, declarator, "type");
    }
    Some(method)
}

/// Parameters in declaration order; destructured patterns contribute every bound name
///
/// Rest parameters keep their `...` prefix and a `this` pseudo-parameter is skipped.
pub(super) fn extract_parameters(base: &BaseExtractor, params: &Node) -> Vec<ParameterDeclaration> {
    let mut result: Vec<ParameterDeclaration> = Vec::new();
    let mut cursor = params.walk();
    for param in params.named_children(&mut cursor) {
        let (pattern, type_name) = match param.kind() {
            "required_parameter" | "optional_parameter" => {
                let Some(pattern) = param.child_by_field_name("pattern") else {
                    continue;
                };
                (pattern, helpers::annotated_type(base, &param, "type"))
            }
            _ => (param, None),
        };
        for extracted in pattern_parameters(base, pattern, type_name) {
            if !result.iter().any(|p| p.name == extracted.name) {
                result.push(extracted);
            }
        }
    }
    result
}

fn pattern_parameters(
    base: &BaseExtractor,
    pattern: Node,
    type_name: Option<String>,
) -> Vec<ParameterDeclaration> {
    match pattern.kind() {
        "this" => Vec::new(),
        "identifier" => vec![ParameterDeclaration::new(base.get_node_text(&pattern), type_name)],
        "rest_pattern" => pattern
            .named_child(0)
            .filter(|inner| inner.kind() == "identifier")
            .map(|inner| {
                let name = format!("...{}", base.get_node_text(&inner));
                vec![ParameterDeclaration::new(name, type_name)]
            })
            .unwrap_or_default(),
        "assignment_pattern" => pattern
            .child_by_field_name("left")
            .map(|left| pattern_parameters(base, left, type_name))
            .unwrap_or_default(),
        _ => {
            let mut bindings = Vec::new();
            calls::bound_identifiers(base, pattern, &mut bindings);
            bindings
                .into_iter()
                .map(|(name, _)| ParameterDeclaration::new(name, None))
                .collect()
        }
    }
}

/// Parameters declared with an accessibility or `readonly` modifier, which also
/// declare fields on the class
pub(super) fn parameter_properties<'a>(params: &Node<'a>) -> Vec<Node<'a>> {
    let mut cursor = params.walk();
    let properties = params
        .named_children(&mut cursor)
        .filter(|param| {
            let mut inner = param.walk();
            let has_modifier = param.children(&mut inner).any(|c| {
                matches!(c.kind(), "accessibility_modifier" | "readonly" | "override_modifier")
            });
            has_modifier
        })
        .collect();
    properties
}
