/// Helper functions for Java extraction
/// Handles modifiers, visibility, annotations and type text
use crate::extractors::base::BaseExtractor;
use tree_sitter::Node;

const VISIBILITY_KEYWORDS: &[&str] = &["public", "protected", "private"];

/// Modifier keywords and annotations of a declaration, read from its `modifiers` child
#[derive(Debug, Default)]
pub(super) struct Modifiers {
    pub keywords: Vec<String>,
    pub annotations: Vec<String>,
}

impl Modifiers {
    /// Explicit visibility keyword, if any; package-private stays absent
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

/// Extract all modifiers from a Java node (public, static, final, ...) and its annotations
pub(super) fn extract_modifiers(base: &BaseExtractor, node: Node) -> Modifiers {
    let mut modifiers = Modifiers::default();
    let Some(modifiers_node) = node
        .children(&mut node.walk())
        .find(|c| c.kind() == "modifiers")
    else {
        return modifiers;
    };

    for child in modifiers_node.children(&mut modifiers_node.walk()) {
        match child.kind() {
            "marker_annotation" | "annotation" => {
                modifiers.annotations.push(base.normalize_inline(&child))
            }
            "line_comment" | "block_comment" => {}
            _ => modifiers.keywords.push(base.get_node_text(&child)),
        }
    }
    modifiers
}

/// Declaration name plus its raw type-parameter clause, e.g. `Cache<K, V>`
pub(super) fn name_with_type_parameters(base: &BaseExtractor, node: Node) -> Option<String> {
    let name = base.get_field_text(&node, "name")?;
    let type_parameters = node
        .child_by_field_name("type_parameters")
        .or_else(|| base.find_first_child(&node, "type_parameters"))
        .map(|tp| base.normalize_inline(&tp))
        .unwrap_or_default();
    Some(format!("{}{}", name, type_parameters))
}

/// Superclass from a class declaration's `superclass` clause
pub(super) fn extract_superclass(base: &BaseExtractor, node: Node) -> Option<String> {
    let superclass_node = node
        .child_by_field_name("superclass")
        .or_else(|| base.find_first_child(&node, "superclass"))?;
    let type_node = superclass_node.named_child(0)?;
    Some(base.get_type_text(&type_node))
}

/// Types listed in `implements` (classes, enums, records) or `extends` (interfaces)
pub(super) fn extract_interface_list(base: &BaseExtractor, node: Node) -> Vec<String> {
    let Some(list_holder) = base.find_child_by_types(&node, &["super_interfaces", "extends_interfaces"])
    else {
        return Vec::new();
    };
    let Some(type_list) = base.find_first_child(&list_holder, "type_list") else {
        return Vec::new();
    };
    type_list
        .named_children(&mut type_list.walk())
        .map(|t| base.get_type_text(&t))
        .collect()
}

/// Declared type text; `var` and missing types become absent
pub(super) fn declared_type(base: &BaseExtractor, node: Node) -> Option<String> {
    let type_node = node.child_by_field_name("type")?;
    let text = base.get_type_text(&type_node);
    if text == "var" {
        None
    } else {
        Some(text)
    }
}

/// Coarse type of an initializer expression when no usable declared type exists
pub(super) fn infer_expression_type(base: &BaseExtractor, value: Node) -> Option<String> {
    match value.kind() {
        "object_creation_expression" => value
            .child_by_field_name("type")
            .map(|t| base.get_type_text(&t)),
        "array_creation_expression" => value
            .child_by_field_name("type")
            .map(|t| format!("{}[]", base.get_type_text(&t))),
        "string_literal" | "text_block" => Some("String".to_string()),
        "character_literal" => Some("char".to_string()),
        "true" | "false" => Some("boolean".to_string()),
        "decimal_integer_literal" | "hex_integer_literal" | "octal_integer_literal"
        | "binary_integer_literal" => {
            let text = base.get_node_text(&value);
            if text.ends_with('L') || text.ends_with('l') {
                Some("long".to_string())
            } else {
                Some("int".to_string())
            }
        }
        "decimal_floating_point_literal" | "hex_floating_point_literal" => {
            let text = base.get_node_text(&value);
            if text.ends_with('f') || text.ends_with('F') {
                Some("float".to_string())
            } else {
                Some("double".to_string())
            }
        }
        "lambda_expression" | "method_reference" => Some("Function".to_string()),
        "cast_expression" => value
            .child_by_field_name("type")
            .map(|t| base.get_type_text(&t)),
        _ => None,
    }
}

/// Leading-uppercase identifiers are taken as type names in static calls
pub(super) fn looks_like_type_name(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_uppercase())
}
