//! Helper utilities: modifiers, visibility, decorators, export wrappers and type annotations

use crate::extractors::base::BaseExtractor;
use tree_sitter::Node;

/// Anonymous keyword tokens that are recorded as modifiers when they prefix a declaration
const MODIFIER_KEYWORDS: &[&str] = &[
    "static", "async", "readonly", "abstract", "declare", "get", "set", "*",
];

#[derive(Debug, Default)]
pub(super) struct Modifiers {
    pub visibility: Option<String>,
    pub keywords: Vec<String>,
}

impl Modifiers {
    pub fn has(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| k == keyword)
    }

    pub fn imply(&mut self, keyword: &str) {
        if !self.has(keyword) {
            self.keywords.push(keyword.to_string());
        }
    }
}

/// Modifiers written before the member name, plus `export`/`default` from a wrapping export
///
/// TypeScript visibility comes from `accessibility_modifier`; `#private` names are private
/// in both dialects. Nothing else yields a visibility.
pub(super) fn extract_modifiers(base: &BaseExtractor, node: &Node) -> Modifiers {
    let mut modifiers = Modifiers::default();
    let name = node
        .child_by_field_name("name")
        .or_else(|| node.child_by_field_name("property"));

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if Some(child) == name {
            break;
        }
        match child.kind() {
            "accessibility_modifier" => {
                let text = base.get_node_text(&child);
                modifiers.keywords.push(text.clone());
                modifiers.visibility = Some(text);
            }
            "override_modifier" => modifiers.keywords.push("override".to_string()),
            kind if !child.is_named() && MODIFIER_KEYWORDS.contains(&kind) => {
                let keyword = if kind == "*" { "generator" } else { kind };
                modifiers.keywords.push(keyword.to_string());
            }
            _ => {}
        }
    }

    if name.is_some_and(|n| n.kind() == "private_property_identifier") {
        modifiers.visibility = Some("private".to_string());
    }
    if let Some(export) = node.parent().filter(|p| p.kind() == "export_statement") {
        modifiers.imply("export");
        let mut cursor = export.walk();
        let is_default = export.children(&mut cursor).any(|c| c.kind() == "default");
        if is_default {
            modifiers.imply("default");
        }
    }
    modifiers
}

/// Decorators on the node itself, on a wrapping export, or as preceding class-body siblings
pub(super) fn extract_decorators(base: &BaseExtractor, node: &Node) -> Vec<String> {
    let mut decorators = Vec::new();
    match node.parent() {
        Some(parent) if parent.kind() == "class_body" => {
            let mut previous = node.prev_named_sibling();
            while let Some(sibling) = previous.filter(|s| s.kind() == "decorator") {
                decorators.push(base.normalize_inline(&sibling));
                previous = sibling.prev_named_sibling();
            }
            decorators.reverse();
        }
        Some(parent) if parent.kind() == "export_statement" => {
            decorators.extend(decorator_children(base, &parent));
        }
        _ => {}
    }
    decorators.extend(decorator_children(base, node));
    decorators
}

fn decorator_children(base: &BaseExtractor, node: &Node) -> Vec<String> {
    let mut cursor = node.walk();
    let decorators = node
        .named_children(&mut cursor)
        .filter(|c| c.kind() == "decorator")
        .map(|d| base.normalize_inline(&d))
        .collect();
    decorators
}

/// The declaration inside `export ...` or a namespace's expression statement
pub(super) fn unwrap_statement<'a>(node: Node<'a>) -> Node<'a> {
    match node.kind() {
        "export_statement" => node.child_by_field_name("declaration").unwrap_or(node),
        "expression_statement" => node
            .named_child(0)
            .filter(|inner| matches!(inner.kind(), "internal_module" | "module"))
            .unwrap_or(node),
        _ => node,
    }
}

/// Text of a `type_annotation` without its leading colon
pub(super) fn annotation_text(base: &BaseExtractor, annotation: &Node) -> String {
    match annotation.named_child(0) {
        Some(inner) if annotation.kind() == "type_annotation" => base.normalize_inline(&inner),
        _ => base
            .normalize_inline(annotation)
            .trim_start_matches(':')
            .trim()
            .to_string(),
    }
}

/// Declared type of a node with a `type` (or `return_type`) annotation field
pub(super) fn annotated_type(base: &BaseExtractor, node: &Node, field: &str) -> Option<String> {
    node.child_by_field_name(field)
        .map(|annotation| annotation_text(base, &annotation))
}

/// Name plus type-parameter clause, e.g. `Repository<T>`
pub(super) fn name_with_type_parameters(base: &BaseExtractor, node: &Node) -> Option<String> {
    let name = base.get_field_text(node, "name")?;
    let type_parameters = node
        .child_by_field_name("type_parameters")
        .map(|tp| base.normalize_inline(&tp))
        .unwrap_or_default();
    Some(format!("{}{}", name, type_parameters))
}

/// Leading-uppercase identifiers are taken as class or namespace names
pub(super) fn looks_like_type_name(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}
