// C# Type Inference
//
// Coarse types for `var` locals, taken from the shape of the initializer

use crate::extractors::base::BaseExtractor;
use tree_sitter::Node;

/// Declared type of a variable declaration or pattern; `var` becomes absent
pub(super) fn declared_type(base: &BaseExtractor, node: &Node) -> Option<String> {
    let type_node = node.child_by_field_name("type")?;
    if type_node.kind() == "implicit_type" {
        return None;
    }
    let text = base.get_type_text(&type_node);
    if text == "var" {
        None
    } else {
        Some(text)
    }
}

/// Infer the type of an initializer expression
pub(super) fn infer_expression_type(base: &BaseExtractor, value: &Node) -> Option<String> {
    match value.kind() {
        "object_creation_expression" | "array_creation_expression" | "cast_expression" => value
            .child_by_field_name("type")
            .map(|t| base.get_type_text(&t)),
        "string_literal"
        | "verbatim_string_literal"
        | "raw_string_literal"
        | "interpolated_string_expression" => Some("string".to_string()),
        "character_literal" => Some("char".to_string()),
        "boolean_literal" => Some("bool".to_string()),
        "integer_literal" => {
            let text = base.get_node_text(value).to_ascii_lowercase();
            if text.ends_with("ul") || text.ends_with("lu") {
                Some("ulong".to_string())
            } else if text.ends_with('l') {
                Some("long".to_string())
            } else if text.ends_with('u') {
                Some("uint".to_string())
            } else {
                Some("int".to_string())
            }
        }
        "real_literal" => {
            let text = base.get_node_text(value).to_ascii_lowercase();
            if text.ends_with('f') {
                Some("float".to_string())
            } else if text.ends_with('m') {
                Some("decimal".to_string())
            } else {
                Some("double".to_string())
            }
        }
        "lambda_expression" | "anonymous_method_expression" => Some("Func".to_string()),
        "parenthesized_expression" => value
            .named_child(0)
            .and_then(|inner| infer_expression_type(base, &inner)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tree_sitter::Parser;

    fn infer_first_local(code: &str) -> Option<String> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_c_sharp::LANGUAGE.into())
            .unwrap();
        let tree = parser.parse(code, None).unwrap();
        let base = BaseExtractor::new("csharp".into(), "T.cs".into(), code.into());
        let declarator = base
            .find_first_descendant(&tree.root_node(), "variable_declarator")
            .expect("declarator");
        let value = super::super::helpers::declarator_value(&base, &declarator).expect("value");
        infer_expression_type(&base, &value)
    }

    #[test]
    fn test_literal_and_constructor_shapes() {
        let wrap = |expr: &str| format!("class T {{ void M() {{ var v = {}; }} }}", expr);
        assert_eq!(infer_first_local(&wrap("new List<int>()")).as_deref(), Some("List<int>"));
        assert_eq!(infer_first_local(&wrap("\"text\"")).as_deref(), Some("string"));
        assert_eq!(infer_first_local(&wrap("$\"{1}\"")).as_deref(), Some("string"));
        assert_eq!(infer_first_local(&wrap("42")).as_deref(), Some("int"));
        assert_eq!(infer_first_local(&wrap("42L")).as_deref(), Some("long"));
        assert_eq!(infer_first_local(&wrap("1.5")).as_deref(), Some("double"));
        assert_eq!(infer_first_local(&wrap("1.5m")).as_deref(), Some("decimal"));
        assert_eq!(infer_first_local(&wrap("true")).as_deref(), Some("bool"));
        assert_eq!(infer_first_local(&wrap("Compute()")), None);
    }
}
