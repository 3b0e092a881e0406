/// Helper utilities for the Rust extractor
/// - Visibility, attribute and function-modifier extraction
/// - Trait names and pattern bindings
/// - Initializer type inference and macro argument counting
use crate::extractors::base::BaseExtractor;
use tree_sitter::Node;

/// `pub`, `pub(crate)`, `pub(in path)`; absent means private to the module
pub(super) fn extract_visibility(base: &BaseExtractor, node: &Node) -> Option<String> {
    base.find_first_child(node, "visibility_modifier")
        .map(|vis| base.normalize_inline(&vis))
}

/// `#[...]` items directly preceding `node`, in source order
///
/// Comments between attributes are skipped; anything else ends the run.
pub(super) fn preceding_attributes(base: &BaseExtractor, node: &Node) -> Vec<String> {
    let mut attributes = Vec::new();
    let mut previous = node.prev_named_sibling();
    while let Some(sibling) = previous {
        match sibling.kind() {
            "attribute_item" => attributes.push(base.normalize_inline(&sibling)),
            "line_comment" | "block_comment" => {}
            _ => break,
        }
        previous = sibling.prev_named_sibling();
    }
    attributes.reverse();
    attributes
}

/// `async`, `const`, `unsafe`, `extern "C"` from a `function_modifiers` child
pub(super) fn function_modifiers(base: &BaseExtractor, node: &Node) -> Vec<String> {
    let Some(modifiers) = base.find_first_child(node, "function_modifiers") else {
        return Vec::new();
    };
    let mut cursor = modifiers.walk();
    let keywords = modifiers
        .children(&mut cursor)
        .map(|m| base.normalize_inline(&m))
        .collect();
    keywords
}

/// Name plus generic parameter clause, e.g. `Cache<K, V>`
pub(super) fn name_with_type_parameters(base: &BaseExtractor, node: &Node) -> Option<String> {
    let name = base.get_field_text(node, "name")?;
    let type_parameters = node
        .child_by_field_name("type_parameters")
        .map(|tp| base.normalize_inline(&tp))
        .unwrap_or_default();
    Some(format!("{}{}", name, type_parameters))
}

/// Bare trait name: `fmt::Display` is `Display`, `From<String>` is `From`
pub(super) fn trait_name(base: &BaseExtractor, trait_node: &Node) -> Option<String> {
    match trait_node.kind() {
        "type_identifier" => Some(base.get_node_text(trait_node)),
        "generic_type" => trait_node
            .child_by_field_name("type")
            .and_then(|inner| trait_name(base, &inner)),
        "scoped_type_identifier" => base.get_field_text(trait_node, "name"),
        _ => base
            .find_first_descendant(trait_node, "type_identifier")
            .map(|t| base.get_node_text(&t)),
    }
}

/// Type name without its generic arguments, e.g. `Cache` for `Cache<K, V>`
pub(super) fn bare_type_name(type_text: &str) -> &str {
    type_text
        .split('<')
        .next()
        .unwrap_or(type_text)
        .trim()
}

/// Identifiers bound by a pattern: `x`, `mut x`, `(a, b)`, `Point { x, y }`, `Some(v)`
pub(super) fn bound_identifiers(base: &BaseExtractor, pattern: &Node) -> Vec<String> {
    if matches!(pattern.kind(), "identifier" | "self") {
        return vec![base.get_node_text(pattern)];
    }
    let mut names = Vec::new();
    for node in base.find_all_descendants_of_types(
        pattern,
        &["identifier", "shorthand_field_identifier"],
    ) {
        // `Some(v)` and `Kind::A(v)`: the constructor path binds nothing
        let in_path = node.parent().is_some_and(|parent| match parent.kind() {
            "scoped_identifier" => true,
            "tuple_struct_pattern" => parent.child_by_field_name("type") == Some(node),
            _ => false,
        });
        if in_path {
            continue;
        }
        let name = base.get_node_text(&node);
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

/// Leading-uppercase identifiers are taken as type names
pub(super) fn looks_like_type_name(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

/// The type an initializer evaluates to, when its shape says so
pub(super) fn infer_expression_type(base: &BaseExtractor, value: &Node) -> Option<String> {
    match value.kind() {
        "struct_expression" => base
            .get_field_text(value, "name")
            .map(|name| bare_type_name(&name).to_string()),
        "call_expression" => {
            // `Config::new()`, `HashMap::<K, V>::with_capacity(8)`
            let function = value.child_by_field_name("function")?;
            let path = match function.kind() {
                "scoped_identifier" => function.child_by_field_name("path")?,
                "generic_function" => function
                    .child_by_field_name("function")
                    .filter(|f| f.kind() == "scoped_identifier")?
                    .child_by_field_name("path")?,
                _ => return None,
            };
            let path_text = base.normalize_inline(&path);
            let last = path_text.rsplit("::").next().unwrap_or(&path_text);
            looks_like_type_name(last).then(|| path_text.clone())
        }
        "macro_invocation" => match base.get_field_text(value, "macro").as_deref() {
            Some("vec") => Some("Vec".to_string()),
            Some("format") => Some("String".to_string()),
            _ => None,
        },
        "string_literal" | "raw_string_literal" => Some("&str".to_string()),
        "char_literal" => Some("char".to_string()),
        "boolean_literal" => Some("bool".to_string()),
        "integer_literal" => Some(literal_suffix(base, value, INTEGER_SUFFIXES, "i32")),
        "float_literal" => Some(literal_suffix(base, value, &["f32", "f64"], "f64")),
        "array_expression" => Some("array".to_string()),
        "closure_expression" => Some("closure".to_string()),
        "reference_expression" => value
            .child_by_field_name("value")
            .and_then(|inner| infer_expression_type(base, &inner))
            .map(|inner| format!("&{}", inner)),
        "parenthesized_expression" => value
            .named_child(0)
            .and_then(|inner| infer_expression_type(base, &inner)),
        _ => None,
    }
}

const INTEGER_SUFFIXES: &[&str] = &[
    "i8", "i16", "i32", "i64", "i128", "isize", "u8", "u16", "u32", "u64", "u128", "usize",
];

fn literal_suffix(
    base: &BaseExtractor,
    literal: &Node,
    suffixes: &[&str],
    default: &str,
) -> String {
    let text = base.get_node_text(literal);
    suffixes
        .iter()
        .find(|suffix| text.ends_with(*suffix))
        .unwrap_or(&default)
        .to_string()
}

/// Top-level comma-separated arguments of a macro's token tree
///
/// Commas inside nested delimiters, string and char literals or closure
/// parameter lists do not separate arguments.
pub(super) fn count_macro_arguments(token_tree_text: &str) -> usize {
    let trimmed = token_tree_text.trim();
    let inner = trimmed
        .get(1..trimmed.len().saturating_sub(1))
        .unwrap_or("");
    if inner.trim().is_empty() {
        return 0;
    }

    let chars: Vec<char> = inner.chars().collect();
    let mut count = 1;
    let mut depth = 0usize;
    // Text of the current top-level argument so far
    let mut argument = String::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            '"' => i = skip_string_literal(&chars, i),
            '\'' => i = skip_char_literal(&chars, i),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            '|' if depth == 0 && matches!(argument.trim(), "" | "move") => {
                i = chars[i + 1..]
                    .iter()
                    .position(|&next| next == '|')
                    .map_or(chars.len(), |offset| i + 1 + offset);
            }
            ',' if depth == 0 => {
                count += 1;
                argument.clear();
                i += 1;
                continue;
            }
            _ => {}
        }
        argument.push(c);
        i += 1;
    }
    // A trailing comma does not start another argument
    if inner.trim_end().ends_with(',') {
        count -= 1;
    }
    count
}

/// Index of the quote closing the string literal opened at `start`
fn skip_string_literal(chars: &[char], start: usize) -> usize {
    let mut i = start + 1;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 2,
            '"' => return i,
            _ => i += 1,
        }
    }
    chars.len()
}

/// Index of the quote closing a char literal opened at `start`, or `start` for a lifetime
fn skip_char_literal(chars: &[char], start: usize) -> usize {
    match chars.get(start + 1) {
        Some('\\') => chars
            .iter()
            .skip(start + 3)
            .position(|&c| c == '\'')
            .map_or(chars.len(), |offset| start + 3 + offset),
        Some(_) if chars.get(start + 2) == Some(&'\'') => start + 2,
        _ => start,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tree_sitter::Parser;

    fn infer(expression: &str) -> Option<String> {
        let code = format!("fn f() {{ let x = {}; }}", expression);
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_rust::LANGUAGE.into())
            .unwrap();
        let tree = parser.parse(&code, None).unwrap();
        let base = BaseExtractor::new("rust".into(), "lib.rs".into(), code.clone());
        let declaration = base
            .find_first_descendant(&tree.root_node(), "let_declaration")
            .unwrap();
        let value = declaration.child_by_field_name("value").unwrap();
        infer_expression_type(&base, &value)
    }

    #[test]
    fn test_macro_argument_counting() {
        assert_eq!(count_macro_arguments("()"), 0);
        assert_eq!(count_macro_arguments("(\"{}\", x)"), 2);
        assert_eq!(count_macro_arguments("(\"a, b\", f(x, y), [1, 2])"), 3);
        assert_eq!(count_macro_arguments("[1, 2, 3,]"), 3);
        assert_eq!(count_macro_arguments("(\"quote \\\" ,\", y)"), 2);
        assert_eq!(count_macro_arguments("(\"{}\", ',')"), 2);
        assert_eq!(count_macro_arguments("(sep, '\\'', ',')"), 3);
        assert_eq!(count_macro_arguments("(x as &'static str, y)"), 2);
    }

    #[test]
    fn test_macro_closure_arguments() {
        assert_eq!(count_macro_arguments("(x, |a, b| a + b)"), 2);
        assert_eq!(count_macro_arguments("(x, move |a, b| a)"), 2);
        assert_eq!(count_macro_arguments("(|| run(), 1)"), 2);
        assert_eq!(count_macro_arguments("(a || b, c | d)"), 2);
    }

    #[test]
    fn test_initializer_shapes() {
        assert_eq!(infer("Config { port: 80 }").as_deref(), Some("Config"));
        assert_eq!(infer("Config::new()").as_deref(), Some("Config"));
        assert_eq!(
            infer("std::collections::HashMap::new()").as_deref(),
            Some("std::collections::HashMap")
        );
        assert_eq!(infer("helpers::build()"), None, "module paths are not types");
        assert_eq!(infer("vec![1, 2]").as_deref(), Some("Vec"));
        assert_eq!(infer("\"text\"").as_deref(), Some("&str"));
        assert_eq!(infer("42u64").as_deref(), Some("u64"));
        assert_eq!(infer("7").as_deref(), Some("i32"));
        assert_eq!(infer("1.5").as_deref(), Some("f64"));
        assert_eq!(infer("&Config::default()").as_deref(), Some("&Config"));
        assert_eq!(infer("load()"), None);
    }
}
