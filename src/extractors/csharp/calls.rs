// C# body analysis
//
// Locals, invocations and the property accesses that C# compiles to
// `get_X`/`set_X` accessor calls.

use super::helpers;
use super::type_inference;
use crate::extractors::base::{
    span_contains, BaseExtractor, CallSite, CallSiteCollector, ParameterDeclaration, SymbolTypeMap,
};
use tree_sitter::Node;

const LOCAL_DECLARATION_KINDS: &[&str] = &[
    "variable_declaration",
    "foreach_statement",
    "declaration_expression",
    "catch_declaration",
];

/// What a body analysis knows about its enclosing type
#[derive(Debug, Clone, Default)]
pub(super) struct TypeContext {
    pub type_name: String,
    pub base_type: Option<String>,
    /// Fields and properties of the enclosing type
    pub members: SymbolTypeMap,
}

/// Locals in declaration order and the sorted call sites of one body
pub(super) fn analyze_body(
    base: &BaseExtractor,
    body: Node,
    parameters: &[ParameterDeclaration],
    context: &TypeContext,
) -> (Vec<String>, Vec<CallSite>) {
    let mut symbols = context.members.clone();
    for param in parameters {
        let name = param.name.trim_start_matches("params ");
        symbols.declare(name, param.type_name.clone());
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
    let invocations = base.find_all_descendants(&body, "invocation_expression");
    for invocation in &invocations {
        record_invocation(base, *invocation, &symbols, context, &mut collector);
    }
    record_property_accesses(base, body, &invocations, &symbols, context, &mut collector);

    (locals, collector.finish())
}

fn local_bindings(base: &BaseExtractor, node: Node) -> Vec<(String, Option<String>)> {
    match node.kind() {
        "variable_declaration" => {
            let declared = type_inference::declared_type(base, &node);
            let mut cursor = node.walk();
            let bindings = node
                .named_children(&mut cursor)
                .filter(|child| child.kind() == "variable_declarator")
                .filter_map(|declarator| {
                    let name = helpers::declarator_name(base, &declarator)?;
                    let type_name = declared.clone().or_else(|| {
                        helpers::declarator_value(base, &declarator)
                            .and_then(|v| type_inference::infer_expression_type(base, &v))
                    });
                    Some((name, type_name))
                })
                .collect();
            bindings
        }
        "foreach_statement" => node
            .child_by_field_name("left")
            .filter(|left| left.kind() == "identifier")
            .map(|left| {
                vec![(
                    base.get_node_text(&left),
                    type_inference::declared_type(base, &node),
                )]
            })
            .unwrap_or_default(),
        "declaration_expression" | "catch_declaration" => base
            .get_field_text(&node, "name")
            .map(|name| vec![(name, type_inference::declared_type(base, &node))])
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

fn record_invocation(
    base: &BaseExtractor,
    invocation: Node,
    symbols: &SymbolTypeMap,
    context: &TypeContext,
    collector: &mut CallSiteCollector,
) {
    if !collector.first_visit(&invocation) {
        return;
    }
    let Some(function) = invocation.child_by_field_name("function") else {
        return;
    };
    let arg_count = base
        .argument_list_node(&invocation)
        .map(|args| base.count_arguments(&args));

    match function.kind() {
        "identifier" | "generic_name" => {
            if let Some(name) = simple_name(base, &function) {
                collector.record(name, None, None, arg_count);
            }
        }
        "member_access_expression" => {
            let Some(name) = member_name(base, &function) else {
                return;
            };
            let (receiver_type, receiver_name) = match function.child_by_field_name("expression") {
                Some(receiver) => classify_receiver(base, receiver, symbols, context),
                None => (None, None),
            };
            collector.record(name, receiver_type, receiver_name, arg_count);
        }
        // `obj?.Run()`: the receiver is the condition of the enclosing conditional access
        "member_binding_expression" => {
            let Some(name) = member_name(base, &function) else {
                return;
            };
            let receiver = base
                .find_parent_of_type(&invocation, "conditional_access_expression")
                .and_then(|access| {
                    access
                        .child_by_field_name("condition")
                        .or_else(|| access.named_child(0))
                });
            let (receiver_type, receiver_name) = match receiver {
                Some(receiver) => classify_receiver(base, receiver, symbols, context),
                None => (None, None),
            };
            collector.record(name, receiver_type, receiver_name, arg_count);
        }
        _ => {}
    }
}

/// Member reads become `get_X`, plain member writes `set_X`
///
/// A member access is a read only when it lies outside every invocation callee and
/// every assignment target, checked by span so deeper nesting is excluded too.
fn record_property_accesses(
    base: &BaseExtractor,
    body: Node,
    invocations: &[Node],
    symbols: &SymbolTypeMap,
    context: &TypeContext,
    collector: &mut CallSiteCollector,
) {
    let callees: Vec<Node> = invocations
        .iter()
        .filter_map(|invocation| invocation.child_by_field_name("function"))
        .collect();
    let assignments = base.find_all_descendants(&body, "assignment_expression");
    let targets: Vec<Node> = assignments
        .iter()
        .filter_map(|assignment| assignment.child_by_field_name("left"))
        .collect();

    for access in base.find_all_descendants(&body, "member_access_expression") {
        let excluded = callees
            .iter()
            .chain(targets.iter())
            .any(|outer| span_contains(outer, &access));
        if excluded || !collector.first_visit(&access) {
            continue;
        }
        let Some(name) = member_name(base, &access) else {
            continue;
        };
        let (receiver_type, receiver_name) = receiver_of(base, access, symbols, context);
        collector.record(format!("get_{}", name), receiver_type, receiver_name, None);
    }

    for assignment in assignments {
        let Some(left) = assignment
            .child_by_field_name("left")
            .filter(|left| left.kind() == "member_access_expression")
        else {
            continue;
        };
        let operator = helpers::assignment_operator(base, &assignment);
        if operator == "+=" || operator == "-=" {
            continue;
        }
        let Some(name) = member_name(base, &left) else {
            continue;
        };
        let (receiver_type, receiver_name) = receiver_of(base, left, symbols, context);
        collector.record(format!("set_{}", name), receiver_type, receiver_name, None);
    }
}

fn receiver_of(
    base: &BaseExtractor,
    access: Node,
    symbols: &SymbolTypeMap,
    context: &TypeContext,
) -> (Option<String>, Option<String>) {
    match access.child_by_field_name("expression") {
        Some(receiver) => classify_receiver(base, receiver, symbols, context),
        None => (None, None),
    }
}

/// Identifier text of an `identifier` or the identifier inside a `generic_name`
fn simple_name(base: &BaseExtractor, node: &Node) -> Option<String> {
    match node.kind() {
        "identifier" => Some(base.get_node_text(node)),
        "generic_name" => base
            .get_field_text(node, "name")
            .or_else(|| {
                base.find_first_child(node, "identifier")
                    .map(|id| base.get_node_text(&id))
            }),
        _ => None,
    }
}

fn member_name(base: &BaseExtractor, access: &Node) -> Option<String> {
    let name = access.child_by_field_name("name")?;
    simple_name(base, &name)
}

/// Receiver type and name for the `expression` of `expression.Name`
fn classify_receiver(
    base: &BaseExtractor,
    receiver: Node,
    symbols: &SymbolTypeMap,
    context: &TypeContext,
) -> (Option<String>, Option<String>) {
    match receiver.kind() {
        "identifier" => {
            let name = base.get_node_text(&receiver);
            if symbols.contains(&name) {
                (symbols.type_of(&name).map(str::to_string), Some(name))
            } else if name.chars().next().is_some_and(char::is_uppercase) {
                // Static access on a type name: Console.WriteLine(...)
                (Some(name), None)
            } else {
                (None, Some(name))
            }
        }
        "this" | "this_expression" => (Some(context.type_name.clone()), Some("this".to_string())),
        "base" | "base_expression" => (context.base_type.clone(), Some("base".to_string())),
        "predefined_type" | "generic_name" | "qualified_name" => {
            (Some(base.normalize_inline(&receiver)), None)
        }
        "member_access_expression" => {
            let through_this = receiver
                .child_by_field_name("expression")
                .is_some_and(|e| matches!(e.kind(), "this" | "this_expression"));
            if through_this {
                let receiver_type = member_name(base, &receiver)
                    .and_then(|member| context.members.type_of(&member).map(str::to_string));
                (receiver_type, Some(base.normalize_inline(&receiver)))
            } else if is_identifier_chain(&receiver) {
                (None, Some(base.normalize_inline(&receiver)))
            } else {
                (None, None)
            }
        }
        // Chained calls, object creation, indexers: not resolvable syntactically
        _ => (None, None),
    }
}

/// `a.b.c` built only from identifiers
fn is_identifier_chain(node: &Node) -> bool {
    match node.kind() {
        "identifier" => true,
        "member_access_expression" => {
            let name_ok = node
                .child_by_field_name("name")
                .is_some_and(|n| n.kind() == "identifier");
            let expression_ok = node
                .child_by_field_name("expression")
                .is_some_and(|e| is_identifier_chain(&e));
            name_ok && expression_ok
        }
        _ => false,
    }
}
