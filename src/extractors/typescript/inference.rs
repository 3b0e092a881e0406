//! Type inference from initializer expressions
//!
//! Used for locals and fields that carry no annotation. Only the shape of the
//! expression is consulted; nothing is resolved across declarations.

use super::Dialect;
use crate::extractors::base::BaseExtractor;
use tree_sitter::Node;

/// React hooks whose result is named after the hook rather than `<name>Result`
const HOOK_RESULTS: &[(&str, &str)] = &[
    ("useState", "State"),
    ("useRef", "Ref"),
    ("useMemo", "Memoized"),
    ("useCallback", "Callback"),
];

/// The type an initializer evaluates to, when its shape says so
pub(super) fn infer_expression_type(
    base: &BaseExtractor,
    dialect: Dialect,
    value: &Node,
) -> Option<String> {
    match value.kind() {
        "new_expression" => value
            .child_by_field_name("constructor")
            .filter(|c| matches!(c.kind(), "identifier" | "type_identifier" | "member_expression"))
            .map(|c| base.get_node_text(&c)),
        "array" => Some("Array".to_string()),
        "object" => Some("Object".to_string()),
        "arrow_function" | "function_expression" | "function" | "generator_function" => {
            Some("Function".to_string())
        }
        "string" | "template_string" => Some("string".to_string()),
        "number" => Some("number".to_string()),
        "true" | "false" => Some("boolean".to_string()),
        "regex" => Some("RegExp".to_string()),
        "as_expression" | "satisfies_expression" if dialect == Dialect::TypeScript => value
            .named_child(1)
            .map(|t| base.normalize_inline(&t)),
        "parenthesized_expression" | "await_expression" => value
            .named_child(0)
            .and_then(|inner| infer_expression_type(base, dialect, &inner)),
        "call_expression" => {
            let callee = value
                .child_by_field_name("function")
                .filter(|f| f.kind() == "identifier")?;
            let name = base.get_node_text(&callee);
            if dialect == Dialect::TypeScript {
                if let Some((_, result)) = HOOK_RESULTS.iter().find(|(hook, _)| *hook == name) {
                    return Some(result.to_string());
                }
            }
            Some(format!("{}Result", name))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tree_sitter::Parser;

    fn infer(code: &str, dialect: Dialect) -> Option<String> {
        let mut parser = Parser::new();
        let language = match dialect {
            Dialect::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Dialect::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
        };
        parser.set_language(&language).unwrap();
        let tree = parser.parse(code, None).unwrap();
        let base = BaseExtractor::new("typescript".into(), "t.ts".into(), code.into());
        let declarator = base
            .find_first_descendant(&tree.root_node(), "variable_declarator")
            .unwrap();
        let value = declarator.child_by_field_name("value").unwrap();
        infer_expression_type(&base, dialect, &value)
    }

    #[test]
    fn test_literal_and_constructor_shapes() {
        let ts = Dialect::TypeScript;
        assert_eq!(infer("const a = new Map();", ts).as_deref(), Some("Map"));
        assert_eq!(infer("const a = [1, 2];", ts).as_deref(), Some("Array"));
        assert_eq!(infer("const a = { x: 1 };", ts).as_deref(), Some("Object"));
        assert_eq!(infer("const a = () => 1;", ts).as_deref(), Some("Function"));
        assert_eq!(infer("const a = `t${x}`;", ts).as_deref(), Some("string"));
        assert_eq!(infer("const a = 4.5;", ts).as_deref(), Some("number"));
        assert_eq!(infer("const a = false;", ts).as_deref(), Some("boolean"));
        assert_eq!(infer("const a = x as Order;", ts).as_deref(), Some("Order"));
        assert_eq!(infer("const a = x + y;", ts), None);
    }

    #[test]
    fn test_call_results_and_hooks() {
        let ts = Dialect::TypeScript;
        let js = Dialect::JavaScript;
        assert_eq!(infer("const a = load();", ts).as_deref(), Some("loadResult"));
        assert_eq!(infer("const a = useState(0);", ts).as_deref(), Some("State"));
        assert_eq!(infer("const a = useState(0);", js).as_deref(), Some("useStateResult"));
        assert_eq!(infer("const a = obj.load();", ts), None);
    }
}
