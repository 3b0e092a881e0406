/// Helper utilities for the Ruby extractor
/// - Call names, symbol arguments and argument counting
/// - Parameter lists
/// - Initializer type inference
use crate::extractors::base::{is_comment, BaseExtractor, ParameterDeclaration};
use tree_sitter::Node;

/// Method name of a `call` node (`include`, `new`, `save`, ...)
pub(super) fn call_name(base: &BaseExtractor, call: &Node) -> Option<String> {
    base.get_field_text(call, "method")
}

/// True for a call with an explicit receiver (`obj.m`, `Klass::m`)
pub(super) fn has_receiver(call: &Node) -> bool {
    call.child_by_field_name("receiver").is_some()
}

/// Named arguments of a call, comments excluded
pub(super) fn call_arguments<'a>(call: &Node<'a>) -> Vec<Node<'a>> {
    let Some(arguments) = call.child_by_field_name("arguments") else {
        return Vec::new();
    };
    let mut cursor = arguments.walk();
    let nodes = arguments
        .named_children(&mut cursor)
        .filter(|arg| !is_comment(arg))
        .collect();
    nodes
}

/// `:name`, `:"name"`, `name` or `Name` as a bare name
pub(super) fn symbol_name(base: &BaseExtractor, node: &Node) -> Option<String> {
    match node.kind() {
        "simple_symbol" | "delimited_symbol" | "identifier" | "constant" => {
            let text = base.get_node_text(node);
            let name = text.trim_start_matches(':').trim_matches('"').trim_matches('\'');
            (!name.is_empty()).then(|| name.to_string())
        }
        _ => None,
    }
}

/// Symbol-like arguments of a call, in order
pub(super) fn symbol_arguments(base: &BaseExtractor, call: &Node) -> Vec<String> {
    call_arguments(call)
        .iter()
        .filter_map(|arg| symbol_name(base, arg))
        .collect()
}

/// Arguments passed to a call
///
/// Each expression is one argument; a run of consecutive keyword pairs
/// (`a: 1, b: 2`) is a single implicit hash argument.
pub(super) fn count_arguments(arguments: &Node) -> usize {
    let mut count = 0;
    let mut in_keywords = false;
    let mut cursor = arguments.walk();
    for argument in arguments.named_children(&mut cursor) {
        if is_comment(&argument) {
            continue;
        }
        if argument.kind() == "pair" {
            if !in_keywords {
                count += 1;
                in_keywords = true;
            }
            continue;
        }
        count += 1;
        in_keywords = false;
    }
    count
}

/// Parameters of a `method_parameters` list with Ruby's sigils kept:
/// `*rest`, `**options`, `&block`, `...`
pub(super) fn extract_parameters(base: &BaseExtractor, params: &Node) -> Vec<ParameterDeclaration> {
    let mut result: Vec<ParameterDeclaration> = Vec::new();
    let mut cursor = params.walk();
    for param in params.named_children(&mut cursor) {
        let names = match param.kind() {
            "identifier" => vec![base.get_node_text(&param)],
            "optional_parameter" | "keyword_parameter" => {
                base.get_field_text(&param, "name").into_iter().collect()
            }
            "splat_parameter" => vec![sigil_name(base, &param, "*")],
            "hash_splat_parameter" => vec![sigil_name(base, &param, "**")],
            "block_parameter" => vec![sigil_name(base, &param, "&")],
            "forward_parameter" => vec!["...".to_string()],
            "destructured_parameter" => base
                .find_all_descendants(&param, "identifier")
                .iter()
                .map(|id| base.get_node_text(id))
                .collect(),
            _ => Vec::new(),
        };
        for name in names {
            if !result.iter().any(|p| p.name == name) {
                result.push(ParameterDeclaration::new(name, None));
            }
        }
    }
    result
}

/// `*args`, or a bare `*` when the splat is anonymous
fn sigil_name(base: &BaseExtractor, param: &Node, sigil: &str) -> String {
    match base.get_field_text(param, "name") {
        Some(name) => format!("{}{}", sigil, name),
        None => sigil.to_string(),
    }
}

/// The class an initializer evaluates to, when its shape says so
///
/// `Klass.new(...)` gives `Klass`; literals give their core class.
pub(super) fn infer_expression_type(base: &BaseExtractor, value: &Node) -> Option<String> {
    match value.kind() {
        "call" => {
            if call_name(base, value).as_deref() != Some("new") {
                return None;
            }
            value
                .child_by_field_name("receiver")
                .filter(|r| matches!(r.kind(), "constant" | "scope_resolution"))
                .map(|r| base.normalize_inline(&r))
        }
        "string" | "chained_string" | "heredoc_beginning" => Some("String".to_string()),
        "integer" => Some("Integer".to_string()),
        "float" => Some("Float".to_string()),
        "rational" => Some("Rational".to_string()),
        "true" | "false" => Some("Boolean".to_string()),
        "array" | "string_array" | "symbol_array" => Some("Array".to_string()),
        "hash" => Some("Hash".to_string()),
        "simple_symbol" | "delimited_symbol" => Some("Symbol".to_string()),
        "regex" => Some("Regexp".to_string()),
        "range" => Some("Range".to_string()),
        "lambda" => Some("Proc".to_string()),
        "parenthesized_statements" => value
            .named_child(0)
            .and_then(|inner| infer_expression_type(base, &inner)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tree_sitter::Parser;

    fn parse(code: &str) -> (tree_sitter::Tree, BaseExtractor) {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_ruby::LANGUAGE.into())
            .unwrap();
        let tree = parser.parse(code, None).unwrap();
        let base = BaseExtractor::new("ruby".into(), "sample.rb".into(), code.into());
        (tree, base)
    }

    fn infer(expression: &str) -> Option<String> {
        let code = format!("x = {}\n", expression);
        let (tree, base) = parse(&code);
        let assignment = base
            .find_first_descendant(&tree.root_node(), "assignment")
            .unwrap();
        let value = assignment.child_by_field_name("right").unwrap();
        infer_expression_type(&base, &value)
    }

    fn first_call_argument_count(code: &str) -> usize {
        let (tree, base) = parse(code);
        let call = base.find_first_descendant(&tree.root_node(), "call").unwrap();
        count_arguments(&call.child_by_field_name("arguments").unwrap())
    }

    #[test]
    fn test_keyword_pairs_count_as_one_argument() {
        assert_eq!(first_call_argument_count("run(1, a: 1, b: 2)"), 2);
        assert_eq!(first_call_argument_count("run(*args, **opts, &blk)"), 3);
        assert_eq!(first_call_argument_count("log \"a #{b}\", level"), 2);
    }

    #[test]
    fn test_initializer_shapes() {
        assert_eq!(infer("Invoice.new(1)").as_deref(), Some("Invoice"));
        assert_eq!(infer("Billing::Invoice.new").as_deref(), Some("Billing::Invoice"));
        assert_eq!(infer("Invoice.build"), None);
        assert_eq!(infer("\"text\"").as_deref(), Some("String"));
        assert_eq!(infer("42").as_deref(), Some("Integer"));
        assert_eq!(infer("1.5").as_deref(), Some("Float"));
        assert_eq!(infer("true").as_deref(), Some("Boolean"));
        assert_eq!(infer("[1, 2]").as_deref(), Some("Array"));
        assert_eq!(infer("{ a: 1 }").as_deref(), Some("Hash"));
        assert_eq!(infer(":ready").as_deref(), Some("Symbol"));
        assert_eq!(infer("nil"), None);
    }

    #[test]
    fn test_parameter_sigils() {
        let code = "def run(a, b = 1, *rest, key:, opt: 2, **options, &block)\nend\n";
        let (tree, base) = parse(code);
        let params = base
            .find_first_descendant(&tree.root_node(), "method_parameters")
            .unwrap();
        let names: Vec<_> = extract_parameters(&base, &params)
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(
            names,
            vec!["a", "b", "*rest", "key", "opt", "**options", "&block"]
        );
    }
}
