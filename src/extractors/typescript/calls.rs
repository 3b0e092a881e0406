//! Body analysis: declared locals and call sites
//!
//! Locals come from variable declarators (including destructuring), `for...in/of`
//! bindings and catch parameters. Each `call_expression` is recorded once, with
//! its receiver resolved against parameters, locals and the enclosing class's
//! fields.

use super::helpers;
use super::inference;
use super::Dialect;
use crate::extractors::base::{
    BaseExtractor, CallSite, CallSiteCollector, ParameterDeclaration, SymbolTypeMap,
};
use tree_sitter::Node;

/// Node kinds that open a new function scope
pub(super) const FUNCTION_KINDS: &[&str] = &[
    "function_declaration",
    "generator_function_declaration",
    "function_expression",
    "function",
    "generator_function",
    "arrow_function",
    "method_definition",
];

/// What a body analysis knows about its enclosing class
#[derive(Debug, Clone, Default)]
pub(super) struct ClassContext {
    pub class_name: Option<String>,
    pub superclass: Option<String>,
    /// Field types reachable through `this.x`
    pub fields: SymbolTypeMap,
}

pub(super) struct BodyAnalyzer<'b> {
    pub base: &'b BaseExtractor,
    pub dialect: Dialect,
    pub context: &'b ClassContext,
}

impl BodyAnalyzer<'_> {
    /// Locals in declaration order and the sorted call sites of one body
    pub fn analyze(
        &self,
        body: Node,
        parameters: &[ParameterDeclaration],
    ) -> (Vec<String>, Vec<CallSite>) {
        let mut symbols = SymbolTypeMap::new();
        for param in parameters {
            let name = param.name.trim_start_matches("...");
            symbols.declare(name, param.type_name.clone());
        }

        let mut locals: Vec<String> = Vec::new();
        for (name, type_name) in self.local_bindings(body, |_| true) {
            if !locals.contains(&name) {
                locals.push(name.clone());
            }
            symbols.declare(name, type_name);
        }

        let mut collector = self.base.call_collector();
        for call in self.base.find_all_descendants(&body, "call_expression") {
            self.record_call(call, &symbols, &mut collector);
        }
        (locals, collector.finish())
    }

    /// Calls made at the top level of a file, outside every function, class and namespace
    pub fn unit_calls(&self, root: Node) -> Vec<CallSite> {
        let mut symbols = SymbolTypeMap::new();
        for (name, type_name) in self.local_bindings(root, is_unit_level) {
            symbols.declare_weak(name, type_name);
        }
        let mut collector = self.base.call_collector();
        let calls = self.base.find_all_descendants(&root, "call_expression");
        for call in calls.into_iter().filter(is_unit_level) {
            self.record_call(call, &symbols, &mut collector);
        }
        collector.finish()
    }

    fn local_bindings(
        &self,
        body: Node,
        in_scope: impl Fn(&Node) -> bool,
    ) -> Vec<(String, Option<String>)> {
        let base = self.base;
        let mut bindings = Vec::new();
        let kinds = ["variable_declarator", "for_in_statement", "catch_clause"];
        for node in base.find_all_descendants_of_types(&body, &kinds) {
            if !in_scope(&node) {
                continue;
            }
            match node.kind() {
                "variable_declarator" => {
                    let Some(name) = node.child_by_field_name("name") else {
                        continue;
                    };
                    if name.kind() != "identifier" {
                        bound_identifiers(base, name, &mut bindings);
                        continue;
                    }
                    let type_name = helpers::annotated_type(base, &node, "type").or_else(|| {
                        node.child_by_field_name("value").and_then(|value| {
                            inference::infer_expression_type(base, self.dialect, &value)
                        })
                    });
                    bindings.push((base.get_node_text(&name), type_name));
                }
                "for_in_statement" => {
                    if let Some(left) = node.child_by_field_name("left") {
                        bound_identifiers(base, left, &mut bindings);
                    }
                }
                "catch_clause" => {
                    if let Some(parameter) = node.child_by_field_name("parameter") {
                        bound_identifiers(base, parameter, &mut bindings);
                    }
                }
                _ => {}
            }
        }
        bindings
    }

    fn record_call(&self, call: Node, symbols: &SymbolTypeMap, collector: &mut CallSiteCollector) {
        let base = self.base;
        if !collector.first_visit(&call) {
            return;
        }
        let arg_count = call
            .child_by_field_name("arguments")
            .filter(|args| args.kind() == "arguments")
            .map(|args| base.count_arguments(&args));

        let Some(function) = call.child_by_field_name("function") else {
            return;
        };
        match function.kind() {
            "identifier" => collector.record(base.get_node_text(&function), None, None, arg_count),
            "member_expression" => {
                let Some(name) = function
                    .child_by_field_name("property")
                    .map(|p| base.get_node_text(&p))
                else {
                    return;
                };
                let (receiver_type, receiver_name) = match function.child_by_field_name("object")
                {
                    Some(object) => self.classify_receiver(object, symbols),
                    None => (None, None),
                };
                collector.record(name, receiver_type, receiver_name, arg_count);
            }
            // `super(...)`, `(await load())()`, `handlers[key]()`
            _ => {}
        }
    }

    /// Receiver type and name for the `object` of `object.property(...)`
    fn classify_receiver(
        &self,
        object: Node,
        symbols: &SymbolTypeMap,
    ) -> (Option<String>, Option<String>) {
        let base = self.base;
        let context = self.context;
        match object.kind() {
            "this" => (context.class_name.clone(), Some("this".to_string())),
            "super" => (context.superclass.clone(), Some("super".to_string())),
            "identifier" => {
                let name = base.get_node_text(&object);
                if symbols.contains(&name) {
                    (symbols.type_of(&name).map(str::to_string), Some(name))
                } else if helpers::looks_like_type_name(&name) {
                    (Some(name), None)
                } else {
                    (None, Some(name))
                }
            }
            "member_expression" if is_member_chain(&object) => {
                let through_this = object
                    .child_by_field_name("object")
                    .is_some_and(|o| o.kind() == "this");
                let receiver_type = if through_this {
                    object
                        .child_by_field_name("property")
                        .map(|p| base.get_node_text(&p))
                        .and_then(|field| context.fields.type_of(&field).map(str::to_string))
                } else {
                    None
                };
                (receiver_type, Some(base.get_node_text(&object)))
            }
            // Chained calls, subscripts, literals
            _ => (None, None),
        }
    }
}

/// `a.b.c` or `this.a.b` built only from identifiers
fn is_member_chain(node: &Node) -> bool {
    match node.kind() {
        "identifier" | "this" => true,
        "member_expression" => {
            node.child_by_field_name("property")
                .is_some_and(|p| {
                    matches!(p.kind(), "property_identifier" | "private_property_identifier")
                })
                && node
                    .child_by_field_name("object")
                    .is_some_and(|object| is_member_chain(&object))
        }
        _ => false,
    }
}

/// Not inside any function, class body or namespace
pub(super) fn is_unit_level(node: &Node) -> bool {
    let mut current = node.parent();
    while let Some(parent) = current {
        let kind = parent.kind();
        if FUNCTION_KINDS.contains(&kind)
            || matches!(kind, "class_body" | "internal_module" | "module")
        {
            return false;
        }
        current = parent.parent();
    }
    true
}

/// Identifiers bound by a (possibly destructuring) pattern, untyped
pub(super) fn bound_identifiers(
    base: &BaseExtractor,
    pattern: Node,
    bindings: &mut Vec<(String, Option<String>)>,
) {
    match pattern.kind() {
        "identifier" | "shorthand_property_identifier_pattern" => {
            bindings.push((base.get_node_text(&pattern), None))
        }
        "pair_pattern" => {
            if let Some(value) = pattern.child_by_field_name("value") {
                bound_identifiers(base, value, bindings);
            }
        }
        "assignment_pattern" | "object_assignment_pattern" => {
            if let Some(left) = pattern.child_by_field_name("left") {
                bound_identifiers(base, left, bindings);
            }
        }
        "object_pattern" | "array_pattern" | "rest_pattern" => {
            let mut cursor = pattern.walk();
            for child in pattern.named_children(&mut cursor) {
                bound_identifiers(base, child, bindings);
            }
        }
        _ => {}
    }
}
