// C# Helper Methods
//
// Modifiers, attributes, base lists and type text for C# declarations

use crate::extractors::base::BaseExtractor;
use regex::Regex;
use std::sync::LazyLock;
use tree_sitter::Node;

const VISIBILITY_KEYWORDS: &[&str] = &["public", "private", "protected", "internal"];

/// `IDisposable`, `IRepository<T>`: a capital I followed by another capital
static INTERFACE_NAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^I\p{Lu}").unwrap());

#[derive(Debug, Default)]
pub(super) struct Modifiers {
    pub keywords: Vec<String>,
    pub attributes: Vec<String>,
}

impl Modifiers {
    /// Explicit visibility; compound forms like `protected internal` are kept whole
    pub fn visibility(&self) -> Option<String> {
        let parts: Vec<&str> = self
            .keywords
            .iter()
            .map(String::as_str)
            .filter(|k| VISIBILITY_KEYWORDS.contains(k))
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }

    pub fn has(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| k == keyword)
    }

    pub fn imply(&mut self, keyword: &str) {
        if !self.has(keyword) {
            self.keywords.push(keyword.to_string());
        }
    }
}

/// Extract `modifier` children and `attribute_list` children of a declaration
pub(super) fn extract_modifiers(base: &BaseExtractor, node: &Node) -> Modifiers {
    let mut modifiers = Modifiers::default();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "modifier" => modifiers.keywords.push(base.get_node_text(&child)),
            "attribute_list" => modifiers.attributes.push(base.normalize_inline(&child)),
            _ => {}
        }
    }
    modifiers
}

/// Declaration name plus its raw type-parameter list
pub(super) fn name_with_type_parameters(base: &BaseExtractor, node: &Node) -> Option<String> {
    let name = base.get_field_text(node, "name")?;
    let type_parameters = node
        .child_by_field_name("type_parameters")
        .or_else(|| base.find_first_child(node, "type_parameter_list"))
        .map(|tp| base.normalize_inline(&tp))
        .unwrap_or_default();
    Some(format!("{}{}", name, type_parameters))
}

/// Naming-convention check used to split a base list; not semantic resolution
pub(super) fn looks_like_interface(type_name: &str) -> bool {
    INTERFACE_NAME.is_match(type_name)
}

/// Entries of the `base_list`, primary-constructor arguments stripped
pub(super) fn base_list_entries(base: &BaseExtractor, node: &Node) -> Vec<String> {
    let Some(base_list) = base.find_first_child(node, "base_list") else {
        return Vec::new();
    };
    let mut cursor = base_list.walk();
    let entries = base_list
        .named_children(&mut cursor)
        .filter(|entry| entry.kind() != "argument_list")
        .map(|entry| {
            if entry.kind() == "primary_constructor_base_type" {
                entry
                    .named_child(0)
                    .map(|t| base.normalize_inline(&t))
                    .unwrap_or_default()
            } else {
                base.normalize_inline(&entry)
            }
        })
        .filter(|name| !name.is_empty())
        .collect();
    entries
}

/// Split base-list entries into (superclass, interfaces)
///
/// The first entry is the superclass unless it looks like an interface name; this is
/// a naming heuristic and will misfile classes named like `IPAddress`.
pub(super) fn split_base_list(entries: Vec<String>) -> (Option<String>, Vec<String>) {
    let mut entries = entries.into_iter();
    match entries.next() {
        Some(first) if !looks_like_interface(&first) => (Some(first), entries.collect()),
        Some(first) => (None, std::iter::once(first).chain(entries).collect()),
        None => (None, Vec::new()),
    }
}

/// The `name` of a variable declarator, falling back to its first identifier
pub(super) fn declarator_name(base: &BaseExtractor, declarator: &Node) -> Option<String> {
    base.get_field_text(declarator, "name").or_else(|| {
        base.find_first_child(declarator, "identifier")
            .map(|n| base.get_node_text(&n))
    })
}

/// Initializer expression of a variable declarator (`= value`)
pub(super) fn declarator_value<'a>(base: &BaseExtractor, declarator: &Node<'a>) -> Option<Node<'a>> {
    if let Some(clause) = base.find_first_child(declarator, "equals_value_clause") {
        return clause.named_child(0);
    }
    let name = declarator.child_by_field_name("name");
    let mut cursor = declarator.walk();
    let value = declarator
        .named_children(&mut cursor)
        .filter(|child| Some(*child) != name && child.kind() != "bracketed_argument_list")
        .last();
    value
}

/// Text of the assignment operator (`=`, `+=`, ...)
pub(super) fn assignment_operator(base: &BaseExtractor, assignment: &Node) -> String {
    if let Some(operator) = assignment.child_by_field_name("operator") {
        return base.get_node_text(&operator);
    }
    let mut cursor = assignment.walk();
    let operator = assignment
        .children(&mut cursor)
        .find(|c| !c.is_named() || c.kind() == "assignment_operator")
        .map(|c| base.get_node_text(&c))
        .unwrap_or_default();
    operator
}
