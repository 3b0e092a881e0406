/// Helper functions for PHP extraction
/// Handles modifiers, attributes, variable names and value inference
use crate::extractors::base::BaseExtractor;
use tree_sitter::Node;

const VISIBILITY_KEYWORDS: &[&str] = &["public", "protected", "private"];

/// Type node kinds that may stand in for a missing `type` field
pub(super) const TYPE_KINDS: &[&str] = &[
    "named_type",
    "optional_type",
    "primitive_type",
    "union_type",
    "intersection_type",
    "disjunctive_normal_form_type",
    "bottom_type",
];

/// Declaration kinds that own the members inside them
pub(super) const TYPE_DECLARATION_KINDS: &[&str] = &[
    "class_declaration",
    "interface_declaration",
    "trait_declaration",
    "enum_declaration",
];

/// Modifier keywords and `#[...]` attributes of a declaration
#[derive(Debug, Default)]
pub(super) struct Modifiers {
    pub keywords: Vec<String>,
    pub annotations: Vec<String>,
}

impl Modifiers {
    /// Explicit visibility keyword, if any
    pub fn visibility(&self) -> Option<String> {
        self.keywords
            .iter()
            .find(|k| VISIBILITY_KEYWORDS.contains(&k.as_str()))
            .cloned()
    }

    pub fn has(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| k == keyword)
    }

    /// Add an implied keyword unless already written out
    pub fn imply(&mut self, keyword: &str) {
        if !self.has(keyword) {
            self.keywords.push(keyword.to_string());
        }
    }
}

/// Modifier nodes and attribute lists among the direct children of `node`
pub(super) fn extract_modifiers(base: &BaseExtractor, node: Node) -> Modifiers {
    let mut modifiers = Modifiers::default();
    for child in node.children(&mut node.walk()) {
        match child.kind() {
            "visibility_modifier" | "static_modifier" | "final_modifier"
            | "abstract_modifier" | "readonly_modifier" => {
                modifiers.keywords.push(base.get_node_text(&child))
            }
            // `var $x;` is a public property
            "var_modifier" => modifiers.keywords.push("public".to_string()),
            "attribute_list" => modifiers.annotations.extend(attributes(base, child)),
            _ => {}
        }
    }
    modifiers
}

/// `#[Name(args)]` for every attribute of an `attribute_list`
fn attributes(base: &BaseExtractor, list: Node) -> Vec<String> {
    base.find_all_descendants(&list, "attribute")
        .iter()
        .map(|attribute| format!("#[{}]", base.normalize_inline(attribute)))
        .collect()
}

/// Variable name without its `$`
pub(super) fn strip_variable(text: &str) -> String {
    text.trim_start_matches('$').to_string()
}

/// Declared type of a property, parameter or constant
pub(super) fn type_text(base: &BaseExtractor, node: Node) -> Option<String> {
    node.child_by_field_name("type")
        .or_else(|| base.find_child_by_types(&node, TYPE_KINDS))
        .map(|t| base.normalize_inline(&t))
}

/// Return type of a method or function, read after its `:`
pub(super) fn return_type(base: &BaseExtractor, node: Node) -> Option<String> {
    if let Some(return_type) = node.child_by_field_name("return_type") {
        return Some(base.normalize_inline(&return_type));
    }
    let mut found_colon = false;
    for child in node.children(&mut node.walk()) {
        if found_colon && child.is_named() {
            return Some(base.normalize_inline(&child));
        }
        if child.kind() == ":" {
            found_colon = true;
        }
    }
    None
}

/// Value following the `=` of a property element, constant element or enum case
pub(super) fn assigned_value(node: Node) -> Option<Node> {
    if let Some(value) = node
        .child_by_field_name("default_value")
        .or_else(|| node.child_by_field_name("value"))
    {
        return Some(value);
    }
    let mut found_assignment = false;
    for child in node.children(&mut node.walk()) {
        if found_assignment && child.is_named() {
            return Some(child);
        }
        if child.kind() == "property_initializer" {
            return child.named_child(0);
        }
        if child.kind() == "=" {
            found_assignment = true;
        }
    }
    None
}

/// Coarse type of a literal or `new` expression
pub(super) fn infer_value_type(base: &BaseExtractor, value: Node) -> Option<String> {
    match value.kind() {
        "string" | "encapsed_string" | "heredoc" | "nowdoc" => Some("string".to_string()),
        "integer" => Some("int".to_string()),
        "float" => Some("float".to_string()),
        "boolean" => Some("bool".to_string()),
        "array_creation_expression" => Some("array".to_string()),
        "object_creation_expression" => created_type(base, value),
        "parenthesized_expression" => value
            .named_child(0)
            .and_then(|inner| infer_value_type(base, inner)),
        _ => None,
    }
}

/// Class named by `new Name(...)`; anonymous classes have none
fn created_type(base: &BaseExtractor, creation: Node) -> Option<String> {
    let designator = creation
        .named_children(&mut creation.walk())
        .find(|child| child.kind() != "arguments")?;
    let name = match designator.kind() {
        "name" | "qualified_name" => designator,
        "class_type_designator" => {
            base.find_child_by_types(&designator, &["qualified_name", "name"])?
        }
        _ => return None,
    };
    Some(base.get_node_text(&name))
}

/// True when `node` has an ancestor of one of `kinds`
pub(super) fn is_inside(node: &Node, kinds: &[&str]) -> bool {
    let mut current = node.parent();
    while let Some(parent) = current {
        if kinds.contains(&parent.kind()) {
            return true;
        }
        current = parent.parent();
    }
    false
}
