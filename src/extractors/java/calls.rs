/// Java method-body analysis: local variables and method invocation call sites
use super::helpers;
use crate::extractors::base::{BaseExtractor, CallSite, ParameterDeclaration, SymbolTypeMap};
use tree_sitter::Node;

const LOCAL_DECLARATION_KINDS: &[&str] = &[
    "local_variable_declaration",
    "enhanced_for_statement",
    "catch_formal_parameter",
    "resource",
];

/// What a body analysis knows about its enclosing type
#[derive(Debug, Clone, Default)]
pub(super) struct TypeContext {
    pub type_name: String,
    pub superclass: Option<String>,
    pub fields: SymbolTypeMap,
    pub record_components: Vec<ParameterDeclaration>,
}

/// Locals in declaration order and the sorted call sites of one body
pub(super) fn analyze_body(
    base: &BaseExtractor,
    body: Node,
    parameters: &[ParameterDeclaration],
    context: &TypeContext,
) -> (Vec<String>, Vec<CallSite>) {
    let mut symbols = context.fields.clone();
    for param in parameters {
        symbols.declare(param.name.clone(), param.type_name.clone());
    }

    let mut locals: Vec<String> = Vec::new();
    for declaration in base.find_all_descendants_of_types(&body, LOCAL_DECLARATION_KINDS) {
        for (name, type_name) in local_bindings(base, declaration) {
            if !locals.contains(&name) {
                locals.push(name.clone());
            }
            symbols.declare(name, type_name);
        }
    }

    let mut collector = base.call_collector();
    for invocation in base.find_all_descendants(&body, "method_invocation") {
        if !collector.first_visit(&invocation) {
            continue;
        }
        let Some(name) = base.get_field_text(&invocation, "name") else {
            continue;
        };
        let (receiver_type, receiver_name) = match invocation.child_by_field_name("object") {
            Some(object) => classify_receiver(base, object, &symbols, context),
            None => (None, None),
        };
        let arg_count = base
            .argument_list_node(&invocation)
            .map(|args| base.count_arguments(&args));
        collector.record(name, receiver_type, receiver_name, arg_count);
    }

    (locals, collector.finish())
}

/// Names and types bound by one local declaration node
fn local_bindings(base: &BaseExtractor, node: Node) -> Vec<(String, Option<String>)> {
    match node.kind() {
        "local_variable_declaration" => {
            let declared = helpers::declared_type(base, node);
            node.children_by_field_name("declarator", &mut node.walk())
                .filter_map(|declarator| {
                    let name = base.get_field_text(&declarator, "name")?;
                    let type_name = declared.clone().or_else(|| {
                        declarator
                            .child_by_field_name("value")
                            .and_then(|v| helpers::infer_expression_type(base, v))
                    });
                    Some((name, type_name))
                })
                .collect()
        }
        "enhanced_for_statement" | "resource" => base
            .get_field_text(&node, "name")
            .map(|name| vec![(name, helpers::declared_type(base, node))])
            .unwrap_or_default(),
        "catch_formal_parameter" => {
            let caught = base
                .find_first_child(&node, "catch_type")
                .map(|t| base.normalize_inline(&t));
            base.get_field_text(&node, "name")
                .map(|name| vec![(name, caught)])
                .unwrap_or_default()
        }
        _ => Vec::new(),
    }
}

/// Receiver type and name for the `object` of `object.name(...)`
fn classify_receiver(
    base: &BaseExtractor,
    object: Node,
    symbols: &SymbolTypeMap,
    context: &TypeContext,
) -> (Option<String>, Option<String>) {
    match object.kind() {
        "identifier" => {
            let name = base.get_node_text(&object);
            if symbols.contains(&name) {
                (symbols.type_of(&name).map(str::to_string), Some(name))
            } else if helpers::looks_like_type_name(&name) {
                // Static call on a class name: Math.max(...)
                (Some(name), None)
            } else {
                (None, Some(name))
            }
        }
        "this" => (Some(context.type_name.clone()), Some("this".to_string())),
        "super" => (context.superclass.clone(), Some("super".to_string())),
        "field_access" => {
            let text = base.normalize_inline(&object);
            let through_this = object
                .child_by_field_name("object")
                .is_some_and(|o| o.kind() == "this");
            let receiver_type = if through_this {
                base.get_field_text(&object, "field")
                    .and_then(|field| context.fields.type_of(&field).map(str::to_string))
            } else {
                None
            };
            (receiver_type, Some(text))
        }
        "type_identifier" | "scoped_type_identifier" | "scoped_identifier" | "generic_type" => {
            (Some(base.normalize_inline(&object)), None)
        }
        // Chained calls, constructor calls, literals: not resolvable syntactically
        _ => (None, None),
    }
}
