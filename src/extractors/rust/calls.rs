/// Rust body analysis: `let` bindings and call sites
///
/// Function calls, method calls, path calls (`Type::f`) and macro invocations
/// (`name!`) are all recorded. Argument counts take part in call-site identity.
use super::helpers;
use crate::extractors::base::{
    BaseExtractor, CallSite, CallSiteCollector, ParameterDeclaration, SymbolTypeMap,
};
use tree_sitter::Node;

/// What a body analysis knows about the enclosing `impl` or `trait`
#[derive(Debug, Clone, Default)]
pub(super) struct ImplContext {
    /// The implemented-for type (or the trait, for default methods)
    pub self_type: Option<String>,
    /// Struct fields of the self type, when the struct is declared in the same file
    pub fields: SymbolTypeMap,
}

/// Locals in binding order and the sorted call sites of one body
pub(super) fn analyze_body(
    base: &BaseExtractor,
    body: Node,
    parameters: &[ParameterDeclaration],
    context: &ImplContext,
) -> (Vec<String>, Vec<CallSite>) {
    let mut symbols = SymbolTypeMap::new();
    for param in parameters {
        let type_name = if param.name == "self" {
            context.self_type.clone()
        } else {
            param.type_name.clone()
        };
        symbols.declare(param.name.clone(), type_name);
    }

    let mut locals: Vec<String> = Vec::new();
    for (name, type_name) in local_bindings(base, body) {
        if !locals.contains(&name) {
            locals.push(name.clone());
        }
        symbols.declare(name, type_name);
    }

    let mut collector = base.call_collector();
    let kinds = ["call_expression", "macro_invocation"];
    for node in base.find_all_descendants_of_types(&body, &kinds) {
        if node.kind() == "macro_invocation" {
            record_macro(base, node, &mut collector);
        } else {
            record_call(base, node, &symbols, context, &mut collector);
        }
    }
    (locals, collector.finish())
}

/// `let` patterns, `for` patterns, and `if let` / `while let` bindings
fn local_bindings(base: &BaseExtractor, body: Node) -> Vec<(String, Option<String>)> {
    let mut bindings = Vec::new();
    let kinds = ["let_declaration", "for_expression", "let_condition"];
    for node in base.find_all_descendants_of_types(&body, &kinds) {
        match node.kind() {
            "let_declaration" => {
                let Some(pattern) = node.child_by_field_name("pattern") else {
                    continue;
                };
                let type_name = node
                    .child_by_field_name("type")
                    .map(|t| base.normalize_inline(&t))
                    .or_else(|| {
                        node.child_by_field_name("value")
                            .and_then(|value| helpers::infer_expression_type(base, &value))
                    });
                let names = helpers::bound_identifiers(base, &pattern);
                let single = names.len() == 1;
                for name in names {
                    let type_name = if single { type_name.clone() } else { None };
                    bindings.push((name, type_name));
                }
            }
            "for_expression" | "let_condition" => {
                if let Some(pattern) = node.child_by_field_name("pattern") {
                    for name in helpers::bound_identifiers(base, &pattern) {
                        bindings.push((name, None));
                    }
                }
            }
            _ => {}
        }
    }
    bindings
}

fn record_call(
    base: &BaseExtractor,
    call: Node,
    symbols: &SymbolTypeMap,
    context: &ImplContext,
    collector: &mut CallSiteCollector,
) {
    if !collector.first_visit(&call) {
        return;
    }
    let Some(mut function) = call.child_by_field_name("function") else {
        return;
    };
    // `iter.collect::<Vec<_>>()`, `parse::<u32>(s)`
    if function.kind() == "generic_function" {
        match function.child_by_field_name("function") {
            Some(inner) => function = inner,
            None => return,
        }
    }
    let arg_count = call
        .child_by_field_name("arguments")
        .map(|args| base.count_arguments(&args));

    match function.kind() {
        "identifier" => collector.record(base.get_node_text(&function), None, None, arg_count),
        "field_expression" => {
            let Some(name) = base.get_field_text(&function, "field") else {
                return;
            };
            let (receiver_type, receiver_name) = match function.child_by_field_name("value") {
                Some(value) => classify_receiver(base, value, symbols, context),
                None => (None, None),
            };
            collector.record(name, receiver_type, receiver_name, arg_count);
        }
        "scoped_identifier" => {
            let Some(name) = base.get_field_text(&function, "name") else {
                return;
            };
            // `Self::new()` resolves to the impl type
            let path = function.child_by_field_name("path").map(|path| {
                let text = base.normalize_inline(&path);
                match (&context.self_type, text.as_str()) {
                    (Some(self_type), "Self") => self_type.clone(),
                    _ => text,
                }
            });
            collector.record(name, path, None, arg_count);
        }
        // Closures called through parenthesized or indexed expressions
        _ => {}
    }
}

fn record_macro(base: &BaseExtractor, invocation: Node, collector: &mut CallSiteCollector) {
    if !collector.first_visit(&invocation) {
        return;
    }
    let Some(macro_node) = invocation.child_by_field_name("macro") else {
        return;
    };
    let (name, path) = match macro_node.kind() {
        "scoped_identifier" => (
            base.get_field_text(&macro_node, "name"),
            macro_node
                .child_by_field_name("path")
                .map(|p| base.normalize_inline(&p)),
        ),
        _ => (Some(base.get_node_text(&macro_node)), None),
    };
    let Some(name) = name else {
        return;
    };
    let arg_count = base
        .find_first_child(&invocation, "token_tree")
        .map(|tree| helpers::count_macro_arguments(&base.get_node_text(&tree)));
    collector.record(format!("{}!", name), path, None, arg_count);
}

/// Receiver type and name for the `value` of `value.method(...)`
fn classify_receiver(
    base: &BaseExtractor,
    value: Node,
    symbols: &SymbolTypeMap,
    context: &ImplContext,
) -> (Option<String>, Option<String>) {
    match value.kind() {
        "self" => (context.self_type.clone(), Some("self".to_string())),
        "identifier" => {
            let name = base.get_node_text(&value);
            if symbols.contains(&name) {
                (symbols.type_of(&name).map(str::to_string), Some(name))
            } else if helpers::looks_like_type_name(&name) {
                (Some(name), None)
            } else {
                (None, Some(name))
            }
        }
        "field_expression" if is_field_chain(&value) => {
            let through_self = value
                .child_by_field_name("value")
                .is_some_and(|v| v.kind() == "self");
            let receiver_type = if through_self {
                base.get_field_text(&value, "field")
                    .and_then(|field| context.fields.type_of(&field).map(str::to_string))
            } else {
                None
            };
            (receiver_type, Some(base.get_node_text(&value)))
        }
        // Chained calls, `(*x)`, indexing, literals
        _ => (None, None),
    }
}

/// `a.b.c` or `self.a.b` built only from identifiers and named fields
fn is_field_chain(node: &Node) -> bool {
    match node.kind() {
        "identifier" | "self" => true,
        "field_expression" => {
            node.child_by_field_name("field")
                .is_some_and(|f| f.kind() == "field_identifier")
                && node
                    .child_by_field_name("value")
                    .is_some_and(|value| is_field_chain(&value))
        }
        _ => false,
    }
}
