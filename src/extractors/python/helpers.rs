/// Helper utilities for Python extraction
/// Includes naming-convention visibility, superclass lists and initializer inference
use crate::extractors::base::BaseExtractor;
use tree_sitter::Node;

/// Visibility from the name alone
///
/// `__x` is private (name-mangled), `_x` protected, everything else public.
/// Dunder names like `__init__` stay public.
pub(super) fn convention_visibility(name: &str) -> &'static str {
    let dunder = name.len() > 4 && name.starts_with("__") && name.ends_with("__");
    if dunder {
        "public"
    } else if name.starts_with("__") {
        "private"
    } else if name.starts_with('_') {
        "protected"
    } else {
        "public"
    }
}

/// Base classes listed in a class definition's `superclasses` argument list
///
/// Keyword arguments (`metaclass=...`) are not bases and are skipped.
pub(super) fn extract_superclasses(base: &BaseExtractor, class_node: &Node) -> Vec<String> {
    let Some(arguments) = class_node.child_by_field_name("superclasses") else {
        return Vec::new();
    };
    let mut cursor = arguments.walk();
    let bases = arguments
        .named_children(&mut cursor)
        .filter(|arg| matches!(arg.kind(), "identifier" | "attribute" | "subscript"))
        .map(|arg| base.normalize_inline(&arg))
        .collect();
    bases
}

/// Coarse type of a right-hand side expression
pub(super) fn infer_expression_type(base: &BaseExtractor, value: &Node) -> Option<String> {
    let tag = match value.kind() {
        "integer" => "int",
        "float" => "float",
        "string" | "concatenated_string" => "str",
        "true" | "false" => "bool",
        "list" | "list_comprehension" => "list",
        "dictionary" | "dictionary_comprehension" => "dict",
        "tuple" => "tuple",
        "set" | "set_comprehension" => "set",
        "none" => "None",
        "lambda" => "Callable",
        // Python constructs by calling the class: `Foo()` types the result as Foo
        "call" => {
            let callee = value.child_by_field_name("function")?;
            return matches!(callee.kind(), "identifier" | "attribute")
                .then(|| base.get_node_text(&callee));
        }
        "parenthesized_expression" => {
            return value
                .named_child(0)
                .and_then(|inner| infer_expression_type(base, &inner));
        }
        _ => return None,
    };
    Some(tag.to_string())
}

/// Leading-uppercase names are taken as class names
pub(super) fn looks_like_class_name(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

/// The definition a decorator applies to, or the node itself
pub(super) fn unwrap_decorated<'a>(node: Node<'a>) -> Option<Node<'a>> {
    if node.kind() == "decorated_definition" {
        node.child_by_field_name("definition")
    } else {
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convention_visibility() {
        assert_eq!(convention_visibility("run"), "public");
        assert_eq!(convention_visibility("_cache"), "protected");
        assert_eq!(convention_visibility("__secret"), "private");
        assert_eq!(convention_visibility("__init__"), "public");
        assert_eq!(convention_visibility("__"), "private");
    }
}
