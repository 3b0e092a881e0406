/// Python body analysis: assigned locals and call sites
use super::helpers;
use crate::extractors::base::{
    BaseExtractor, CallSite, CallSiteCollector, ParameterDeclaration, SymbolTypeMap,
};
use tree_sitter::Node;

/// What a body analysis knows about its enclosing class
#[derive(Debug, Clone, Default)]
pub(super) struct ClassContext {
    pub class_name: Option<String>,
    /// Class attributes and `self.x` instance attributes
    pub attributes: SymbolTypeMap,
}

/// Locals in first-assignment order and the sorted call sites of one body
pub(super) fn analyze_body(
    base: &BaseExtractor,
    body: Node,
    parameters: &[ParameterDeclaration],
    context: &ClassContext,
) -> (Vec<String>, Vec<CallSite>) {
    let mut symbols = SymbolTypeMap::new();
    for param in parameters {
        let name = param.name.trim_start_matches('*');
        symbols.declare(name, param.type_name.clone());
    }

    let mut locals: Vec<String> = Vec::new();
    for (name, type_name) in local_bindings(base, body, |_| true) {
        if !locals.contains(&name) {
            locals.push(name.clone());
        }
        // Reassignment without a usable type keeps what is already known
        if type_name.is_some() {
            symbols.declare(name, type_name);
        } else {
            symbols.declare_weak(name, None);
        }
    }

    let mut collector = base.call_collector();
    for call in base.find_all_descendants(&body, "call") {
        record_call(base, call, &symbols, context, &mut collector);
    }
    (locals, collector.finish())
}

/// Call sites of module-level code, skipping anything inside a function or class
pub(super) fn module_calls(base: &BaseExtractor, root: Node) -> Vec<CallSite> {
    let context = ClassContext::default();
    let mut symbols = SymbolTypeMap::new();
    let mut collector = base.call_collector();
    for (name, type_name) in local_bindings(base, root, is_module_level) {
        symbols.declare_weak(name, type_name);
    }
    for call in base.find_all_descendants(&root, "call") {
        if is_module_level(&call) {
            record_call(base, call, &symbols, &context, &mut collector);
        }
    }
    collector.finish()
}

fn is_module_level(node: &Node) -> bool {
    let mut current = node.parent();
    while let Some(parent) = current {
        if matches!(parent.kind(), "function_definition" | "class_definition" | "lambda") {
            return false;
        }
        current = parent.parent();
    }
    true
}

/// Names bound by assignments, `for` targets, `with ... as` targets and walrus expressions
fn local_bindings(
    base: &BaseExtractor,
    body: Node,
    in_scope: impl Fn(&Node) -> bool,
) -> Vec<(String, Option<String>)> {
    let mut bindings = Vec::new();
    let kinds = ["assignment", "for_statement", "named_expression", "as_pattern"];
    for node in base.find_all_descendants_of_types(&body, &kinds) {
        if !in_scope(&node) {
            continue;
        }
        match node.kind() {
            "assignment" => {
                let Some(left) = node.child_by_field_name("left") else {
                    continue;
                };
                let type_name = node
                    .child_by_field_name("type")
                    .map(|t| base.normalize_inline(&t))
                    .or_else(|| {
                        node.child_by_field_name("right")
                            .and_then(|r| helpers::infer_expression_type(base, &r))
                    });
                if left.kind() == "identifier" {
                    bindings.push((base.get_node_text(&left), type_name));
                } else {
                    bound_identifiers(base, left, &mut bindings);
                }
            }
            "for_statement" => {
                if let Some(left) = node.child_by_field_name("left") {
                    bound_identifiers(base, left, &mut bindings);
                }
            }
            "named_expression" => {
                if let Some(name) = base.get_field_text(&node, "name") {
                    let type_name = node
                        .child_by_field_name("value")
                        .and_then(|v| helpers::infer_expression_type(base, &v));
                    bindings.push((name, type_name));
                }
            }
            "as_pattern" => {
                if let Some(alias) = node.child_by_field_name("alias") {
                    bound_identifiers(base, alias, &mut bindings);
                }
            }
            _ => {}
        }
    }
    bindings
}

/// Identifiers inside a tuple/list target, untyped
fn bound_identifiers(
    base: &BaseExtractor,
    target: Node,
    bindings: &mut Vec<(String, Option<String>)>,
) {
    match target.kind() {
        "identifier" => bindings.push((base.get_node_text(&target), None)),
        "pattern_list" | "tuple_pattern" | "list_pattern" | "as_pattern_target" => {
            let mut cursor = target.walk();
            for child in target.named_children(&mut cursor) {
                bound_identifiers(base, child, bindings);
            }
        }
        _ => {}
    }
}

fn record_call(
    base: &BaseExtractor,
    call: Node,
    symbols: &SymbolTypeMap,
    context: &ClassContext,
    collector: &mut CallSiteCollector,
) {
    if !collector.first_visit(&call) {
        return;
    }
    let Some(function) = call.child_by_field_name("function") else {
        return;
    };
    let arg_count = base
        .argument_list_node(&call)
        .filter(|args| args.kind() == "argument_list")
        .map(|args| base.count_arguments(&args));

    match function.kind() {
        "identifier" => collector.record(base.get_node_text(&function), None, None, arg_count),
        "attribute" => {
            let Some(name) = base.get_field_text(&function, "attribute") else {
                return;
            };
            let (receiver_type, receiver_name) = match function.child_by_field_name("object") {
                Some(object) => classify_receiver(base, object, symbols, context),
                None => (None, None),
            };
            collector.record(name, receiver_type, receiver_name, arg_count);
        }
        // `factory()()`, `handlers[key]()`: no name to record
        _ => {}
    }
}

/// Receiver type and name for the `object` of `object.attribute(...)`
fn classify_receiver(
    base: &BaseExtractor,
    object: Node,
    symbols: &SymbolTypeMap,
    context: &ClassContext,
) -> (Option<String>, Option<String>) {
    match object.kind() {
        "identifier" => {
            let name = base.get_node_text(&object);
            if (name == "self" || name == "cls") && context.class_name.is_some() {
                (context.class_name.clone(), Some(name))
            } else if symbols.contains(&name) {
                (symbols.type_of(&name).map(str::to_string), Some(name))
            } else if helpers::looks_like_class_name(&name) {
                (Some(name), None)
            } else {
                (None, Some(name))
            }
        }
        "attribute" => {
            let through_self = object
                .child_by_field_name("object")
                .is_some_and(|o| o.kind() == "identifier" && base.get_node_text(&o) == "self");
            let receiver_type = if through_self {
                base.get_field_text(&object, "attribute")
                    .and_then(|attr| context.attributes.type_of(&attr).map(str::to_string))
            } else {
                None
            };
            if is_attribute_chain(&object) {
                (receiver_type, Some(base.get_node_text(&object)))
            } else {
                (None, None)
            }
        }
        // Chained calls, subscripts, literals
        _ => (None, None),
    }
}

/// `a.b.c` built only from identifiers
fn is_attribute_chain(node: &Node) -> bool {
    match node.kind() {
        "identifier" => true,
        "attribute" => node
            .child_by_field_name("object")
            .is_some_and(|object| is_attribute_chain(&object)),
        _ => false,
    }
}
