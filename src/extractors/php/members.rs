/// PHP member extraction: properties, constants, enum cases, methods and parameters
use super::calls::{self, TypeContext};
use super::helpers;
use crate::extractors::base::{
    BaseExtractor, FieldDeclaration, MethodDeclaration, ParameterDeclaration,
};
use tree_sitter::Node;

/// Where a method is declared; interface methods get implicit modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum MemberOwner {
    Class,
    Interface,
}

/// One FieldDeclaration per `property_element`
pub(super) fn extract_properties(base: &BaseExtractor, node: Node) -> Vec<FieldDeclaration> {
    let modifiers = helpers::extract_modifiers(base, node);
    let declared_type = helpers::type_text(base, node);

    base.find_all_children(&node, "property_element")
        .into_iter()
        .filter_map(|element| {
            let variable = element
                .child_by_field_name("name")
                .or_else(|| base.find_first_child(&element, "variable_name"))?;
            let type_name = declared_type.clone().or_else(|| {
                helpers::assigned_value(element).and_then(|v| helpers::infer_value_type(base, v))
            });
            Some(FieldDeclaration {
                name: helpers::strip_variable(&base.get_node_text(&variable)),
                type_name,
                visibility: modifiers.visibility(),
                modifiers: modifiers.keywords.clone(),
                annotations: modifiers.annotations.clone(),
            })
        })
        .collect()
}

/// One FieldDeclaration per `const_element`, marked `const`
pub(super) fn extract_constants(base: &BaseExtractor, node: Node) -> Vec<FieldDeclaration> {
    let mut modifiers = helpers::extract_modifiers(base, node);
    modifiers.imply("const");
    let declared_type = helpers::type_text(base, node);

    base.find_all_children(&node, "const_element")
        .into_iter()
        .filter_map(|element| {
            let name = base.find_child_by_types(&element, &["name", "reserved_identifier"])?;
            let type_name = declared_type.clone().or_else(|| {
                helpers::assigned_value(element).and_then(|v| helpers::infer_value_type(base, v))
            });
            Some(FieldDeclaration {
                name: base.get_node_text(&name),
                type_name,
                visibility: modifiers.visibility(),
                modifiers: modifiers.keywords.clone(),
                annotations: modifiers.annotations.clone(),
            })
        })
        .collect()
}

/// An enum case; backed cases take the type of their value
pub(super) fn extract_enum_case(base: &BaseExtractor, node: Node) -> Option<FieldDeclaration> {
    let name = base
        .get_field_text(&node, "name")
        .or_else(|| base.find_first_child(&node, "name").map(|n| base.get_node_text(&n)))?;
    let modifiers = helpers::extract_modifiers(base, node);
    Some(FieldDeclaration {
        name,
        type_name: helpers::assigned_value(node).and_then(|v| helpers::infer_value_type(base, v)),
        visibility: None,
        modifiers: vec!["case".to_string()],
        annotations: modifiers.annotations,
    })
}

/// Constructor parameters declared with a visibility become properties
pub(super) fn promoted_properties(base: &BaseExtractor, constructor: Node) -> Vec<FieldDeclaration> {
    let Some(params) = parameters_node(base, constructor) else {
        return Vec::new();
    };
    base.find_all_children(&params, "property_promotion_parameter")
        .into_iter()
        .filter_map(|param| {
            let name = parameter_name(base, param)?;
            let modifiers = helpers::extract_modifiers(base, param);
            Some(FieldDeclaration {
                name,
                type_name: helpers::type_text(base, param),
                visibility: modifiers.visibility(),
                modifiers: modifiers.keywords,
                annotations: modifiers.annotations,
            })
        })
        .collect()
}

/// Method of a class, interface, trait or enum, with body analysis
pub(super) fn extract_method(
    base: &BaseExtractor,
    node: Node,
    owner: MemberOwner,
    context: &TypeContext,
) -> Option<MethodDeclaration> {
    let name = base.get_field_text(&node, "name")?;
    let mut modifiers = helpers::extract_modifiers(base, node);
    if owner == MemberOwner::Interface {
        if modifiers.visibility().is_none() {
            modifiers.imply("public");
        }
        modifiers.imply("abstract");
    }

    let mut method = MethodDeclaration::new(name);
    method.visibility = modifiers.visibility();
    method.modifiers = modifiers.keywords;
    method.annotations = modifiers.annotations;
    fill_signature_and_body(base, node, &mut method, context);
    Some(method)
}

/// Standalone `function name(...)`; no visibility or modifiers
pub(super) fn extract_function(
    base: &BaseExtractor,
    node: Node,
    context: &TypeContext,
) -> Option<MethodDeclaration> {
    let name = base.get_field_text(&node, "name")?;
    let mut method = MethodDeclaration::new(name);
    method.annotations = helpers::extract_modifiers(base, node).annotations;
    fill_signature_and_body(base, node, &mut method, context);
    Some(method)
}

fn fill_signature_and_body(
    base: &BaseExtractor,
    node: Node,
    method: &mut MethodDeclaration,
    context: &TypeContext,
) {
    method.return_type = helpers::return_type(base, node);
    method.parameters = parameters_node(base, node)
        .map(|params| extract_parameters(base, params))
        .unwrap_or_default();

    let body = node
        .child_by_field_name("body")
        .or_else(|| base.find_first_child(&node, "compound_statement"));
    if let Some(body) = body {
        let (locals, calls) = calls::analyze_body(base, body, &method.parameters, context);
        method.local_variables = locals;
        method.method_calls = calls;
    }
}

fn parameters_node<'a>(base: &BaseExtractor, node: Node<'a>) -> Option<Node<'a>> {
    node.child_by_field_name("parameters")
        .or_else(|| base.find_first_child(&node, "formal_parameters"))
}

fn parameter_name(base: &BaseExtractor, param: Node) -> Option<String> {
    let variable = param
        .child_by_field_name("name")
        .filter(|n| n.kind() == "variable_name")
        .or_else(|| base.find_first_descendant(&param, "variable_name"))?;
    Some(helpers::strip_variable(&base.get_node_text(&variable)))
}

/// Positional parameters of `formal_parameters`; variadics are named `...name`
pub(super) fn extract_parameters(base: &BaseExtractor, params: Node) -> Vec<ParameterDeclaration> {
    let mut result = Vec::new();
    for param in params.named_children(&mut params.walk()) {
        let variadic = match param.kind() {
            "simple_parameter" | "property_promotion_parameter" => false,
            "variadic_parameter" => true,
            _ => continue,
        };
        let Some(name) = parameter_name(base, param) else {
            continue;
        };
        let name = if variadic { format!("...{}", name) } else { name };
        result.push(ParameterDeclaration::new(name, helpers::type_text(base, param)));
    }
    result
}
