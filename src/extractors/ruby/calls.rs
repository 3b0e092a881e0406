/// Ruby body analysis: assigned locals and call sites
///
/// Every `call` node is a call site, including calls inside blocks. A bare
/// identifier without arguments is indistinguishable from a local variable read
/// and is not recorded.
use super::helpers;
use crate::extractors::base::{
    BaseExtractor, CallSite, CallSiteCollector, ParameterDeclaration, SymbolTypeMap,
};
use tree_sitter::Node;

/// Declarations whose bodies are analyzed on their own
const SCOPE_KINDS: &[&str] = &["class", "module", "singleton_class", "method", "singleton_method"];

/// What a body analysis knows about the enclosing class or module
#[derive(Debug, Clone, Default)]
pub(super) struct TypeContext {
    pub type_name: Option<String>,
    /// Instance variables (`@repo`) with types inferred from their assignments
    pub instance_variables: SymbolTypeMap,
}

/// Locals in first-assignment order and the sorted call sites of one body
pub(super) fn analyze_body(
    base: &BaseExtractor,
    body: Node,
    parameters: &[ParameterDeclaration],
    context: &TypeContext,
) -> (Vec<String>, Vec<CallSite>) {
    let mut symbols = SymbolTypeMap::new();
    for param in parameters {
        let name = param.name.trim_start_matches(['*', '&']);
        symbols.declare(name, None);
    }

    let mut locals: Vec<String> = Vec::new();
    for (name, type_name) in local_bindings(base, body, |_| true) {
        if !locals.contains(&name) {
            locals.push(name.clone());
        }
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

/// Call sites of file-level code; `require` calls are imports, not call sites
pub(super) fn file_calls(base: &BaseExtractor, root: Node) -> Vec<CallSite> {
    let context = TypeContext::default();
    let mut symbols = SymbolTypeMap::new();
    for (name, type_name) in local_bindings(base, root, is_file_level) {
        symbols.declare_weak(name, type_name);
    }
    let mut collector = base.call_collector();
    for call in base.find_all_descendants(&root, "call") {
        if is_file_level(&call) && !is_require(base, &call) {
            record_call(base, call, &symbols, &context, &mut collector);
        }
    }
    collector.finish()
}

/// Not inside any class, module or method definition
pub(super) fn is_file_level(node: &Node) -> bool {
    let mut current = node.parent();
    while let Some(parent) = current {
        if SCOPE_KINDS.contains(&parent.kind()) {
            return false;
        }
        current = parent.parent();
    }
    true
}

/// `require "x"` / `require_relative "x"` without a receiver
pub(super) fn is_require(base: &BaseExtractor, call: &Node) -> bool {
    !helpers::has_receiver(call)
        && matches!(
            helpers::call_name(base, call).as_deref(),
            Some("require" | "require_relative")
        )
}

/// Identifiers bound by assignments, `||=`-style assignments, multiple
/// assignment and `for` loops
fn local_bindings(
    base: &BaseExtractor,
    body: Node,
    in_scope: impl Fn(&Node) -> bool,
) -> Vec<(String, Option<String>)> {
    let mut bindings = Vec::new();
    let kinds = ["assignment", "operator_assignment", "for"];
    for node in base.find_all_descendants_of_types(&body, &kinds) {
        if !in_scope(&node) {
            continue;
        }
        let target_field = if node.kind() == "for" { "pattern" } else { "left" };
        let Some(target) = node.child_by_field_name(target_field) else {
            continue;
        };
        match target.kind() {
            "identifier" => {
                let type_name = (node.kind() != "for")
                    .then(|| node.child_by_field_name("right"))
                    .flatten()
                    .and_then(|value| helpers::infer_expression_type(base, &value));
                bindings.push((base.get_node_text(&target), type_name));
            }
            "left_assignment_list" | "destructured_left_assignment" => {
                for id in base.find_all_descendants(&target, "identifier") {
                    bindings.push((base.get_node_text(&id), None));
                }
            }
            // `@x = ...`, `CONST = ...`, `obj.attr = ...`
            _ => {}
        }
    }
    bindings
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
    let Some(name) = helpers::call_name(base, &call) else {
        return;
    };
    let arg_count = call
        .child_by_field_name("arguments")
        .map_or(0, |args| helpers::count_arguments(&args));
    let (receiver_type, receiver_name) = match call.child_by_field_name("receiver") {
        Some(receiver) => classify_receiver(base, receiver, symbols, context),
        None => (None, None),
    };
    collector.record(name, receiver_type, receiver_name, Some(arg_count));
}

/// Receiver type and name for the receiver of `receiver.method(...)`
fn classify_receiver(
    base: &BaseExtractor,
    receiver: Node,
    symbols: &SymbolTypeMap,
    context: &TypeContext,
) -> (Option<String>, Option<String>) {
    match receiver.kind() {
        "self" => (context.type_name.clone(), Some("self".to_string())),
        "identifier" => {
            let name = base.get_node_text(&receiver);
            (symbols.type_of(&name).map(str::to_string), Some(name))
        }
        // `User.where`, `Billing::Invoice.build`: class-level calls
        "constant" | "scope_resolution" => (Some(base.normalize_inline(&receiver)), None),
        "instance_variable" => {
            let name = base.get_node_text(&receiver);
            (
                context.instance_variables.type_of(&name).map(str::to_string),
                Some(name),
            )
        }
        "class_variable" | "global_variable" => (None, Some(base.get_node_text(&receiver))),
        // Chained calls, literals, parenthesized expressions
        _ => (None, None),
    }
}
