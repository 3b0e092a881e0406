/// PHP body analysis: assigned locals and call sites
use super::helpers;
use crate::extractors::base::{
    BaseExtractor, CallSite, CallSiteCollector, ParameterDeclaration, SymbolTypeMap,
};
use tree_sitter::Node;

const CALL_KINDS: &[&str] = &[
    "function_call_expression",
    "member_call_expression",
    "nullsafe_member_call_expression",
    "scoped_call_expression",
];

/// Nodes that open a scope of their own
const SCOPE_KINDS: &[&str] = &[
    "function_definition",
    "method_declaration",
    "anonymous_function",
    "anonymous_function_creation_expression",
    "arrow_function",
    "class_declaration",
    "interface_declaration",
    "trait_declaration",
    "enum_declaration",
];

/// What a body analysis knows about its enclosing type
#[derive(Debug, Clone, Default)]
pub(super) struct TypeContext {
    pub type_name: Option<String>,
    pub superclass: Option<String>,
    pub fields: SymbolTypeMap,
}

/// Locals in assignment order and the sorted call sites of one body
pub(super) fn analyze_body(
    base: &BaseExtractor,
    body: Node,
    parameters: &[ParameterDeclaration],
    context: &TypeContext,
) -> (Vec<String>, Vec<CallSite>) {
    let mut symbols = SymbolTypeMap::new();
    for param in parameters {
        let variadic = param.name.starts_with("...");
        let name = param.name.trim_start_matches("...");
        symbols.declare(name, if variadic { None } else { param.type_name.clone() });
    }

    let mut locals: Vec<String> = Vec::new();
    for (name, type_name) in assignments(base, body) {
        if !locals.contains(&name) {
            locals.push(name.clone());
        }
        match type_name {
            Some(_) => symbols.declare(name, type_name),
            None => symbols.declare_weak(name, None),
        }
    }

    let mut collector = base.call_collector();
    for call in base.find_all_descendants_of_types(&body, CALL_KINDS) {
        record_call(base, call, &symbols, context, &mut collector);
    }
    (locals, collector.finish())
}

/// Calls made outside every function, method and type
pub(super) fn file_calls(base: &BaseExtractor, root: Node) -> Vec<CallSite> {
    let context = TypeContext::default();
    let mut symbols = SymbolTypeMap::new();
    for (name, type_name) in assignments(base, root) {
        symbols.declare_weak(name, type_name);
    }

    let mut collector = base.call_collector();
    for call in base.find_all_descendants_of_types(&root, CALL_KINDS) {
        if !helpers::is_inside(&call, SCOPE_KINDS) {
            record_call(base, call, &symbols, &context, &mut collector);
        }
    }
    collector.finish()
}

/// `$name = value` assignments of `scope`, skipping nested scopes and `$this`
fn assignments(base: &BaseExtractor, scope: Node) -> Vec<(String, Option<String>)> {
    base.find_all_descendants(&scope, "assignment_expression")
        .into_iter()
        .filter(|assignment| !nested_scope_between(assignment, &scope))
        .filter_map(|assignment| {
            let left = assignment
                .child_by_field_name("left")
                .or_else(|| assignment.named_child(0))?;
            if left.kind() != "variable_name" {
                return None;
            }
            let name = helpers::strip_variable(&base.get_node_text(&left));
            if name == "this" {
                return None;
            }
            let type_name = assignment
                .child_by_field_name("right")
                .and_then(|right| helpers::infer_value_type(base, right));
            Some((name, type_name))
        })
        .collect()
}

/// True when a scope-opening node sits between `node` and `scope`
fn nested_scope_between(node: &Node, scope: &Node) -> bool {
    let mut current = node.parent();
    while let Some(parent) = current {
        if parent.id() == scope.id() {
            return false;
        }
        if SCOPE_KINDS.contains(&parent.kind()) {
            return true;
        }
        current = parent.parent();
    }
    false
}

fn record_call(
    base: &BaseExtractor,
    call: Node,
    symbols: &SymbolTypeMap,
    context: &TypeContext,
    collector: &mut CallSiteCollector,
) {
    if !collector.first_visit(&call) {
        return;
    }
    let (name, receiver_type, receiver_name) = match call.kind() {
        "function_call_expression" => {
            let Some(function) = call
                .child_by_field_name("function")
                .or_else(|| call.named_child(0))
            else {
                return;
            };
            // `$callback()` and `(expr)()` name no function
            if !matches!(function.kind(), "name" | "qualified_name") {
                return;
            }
            (base.get_node_text(&function), None, None)
        }
        "member_call_expression" | "nullsafe_member_call_expression" => {
            let Some(name) = method_name(base, call) else {
                return;
            };
            let (receiver_type, receiver_name) = match call.child_by_field_name("object") {
                Some(object) => classify_object(base, object, symbols, context),
                None => (None, None),
            };
            (name, receiver_type, receiver_name)
        }
        "scoped_call_expression" => {
            let Some(name) = method_name(base, call) else {
                return;
            };
            let (receiver_type, receiver_name) = match call.child_by_field_name("scope") {
                Some(scope) => classify_scope(base, scope, symbols, context),
                None => (None, None),
            };
            (name, receiver_type, receiver_name)
        }
        _ => return,
    };

    let arg_count = Some(
        base.argument_list_node(&call)
            .map(|args| base.count_arguments(&args))
            .unwrap_or(0),
    );
    collector.record(name, receiver_type, receiver_name, arg_count);
}

/// Static method name; `$obj->$method()` is dynamic and skipped
fn method_name(base: &BaseExtractor, call: Node) -> Option<String> {
    let name = call.child_by_field_name("name")?;
    (name.kind() == "name").then(|| base.get_node_text(&name))
}

/// Receiver of `object->name(...)`
fn classify_object(
    base: &BaseExtractor,
    object: Node,
    symbols: &SymbolTypeMap,
    context: &TypeContext,
) -> (Option<String>, Option<String>) {
    match object.kind() {
        "variable_name" => {
            let name = helpers::strip_variable(&base.get_node_text(&object));
            if name == "this" {
                (context.type_name.clone(), Some(name))
            } else {
                (symbols.type_of(&name).map(str::to_string), Some(name))
            }
        }
        "member_access_expression" | "nullsafe_member_access_expression" => {
            let Some(property) = object
                .child_by_field_name("name")
                .filter(|n| n.kind() == "name")
                .map(|n| base.get_node_text(&n))
            else {
                return (None, None);
            };
            let through_this = object
                .child_by_field_name("object")
                .is_some_and(|o| base.get_node_text(&o) == "$this");
            let receiver_type = if through_this {
                context.fields.type_of(&property).map(str::to_string)
            } else {
                None
            };
            (receiver_type, Some(property))
        }
        // Chained calls, `new Foo()`, parenthesized expressions
        _ => (None, None),
    }
}

/// Receiver of `scope::name(...)`
fn classify_scope(
    base: &BaseExtractor,
    scope: Node,
    symbols: &SymbolTypeMap,
    context: &TypeContext,
) -> (Option<String>, Option<String>) {
    match scope.kind() {
        "relative_scope" => match base.get_node_text(&scope).as_str() {
            "parent" => (context.superclass.clone(), None),
            _ => (context.type_name.clone(), None),
        },
        "name" | "qualified_name" => (Some(base.get_node_text(&scope)), None),
        "variable_name" => {
            let name = helpers::strip_variable(&base.get_node_text(&scope));
            (symbols.type_of(&name).map(str::to_string), Some(name))
        }
        _ => (None, None),
    }
}
