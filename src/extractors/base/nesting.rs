// Nested-declaration resolver
//
// Every declaration marks all declarations found anywhere beneath its own body.
// Whatever is left unmarked is top-level. Deeper levels are rediscovered locally
// when a type extractor recurses into its body.

use std::collections::HashSet;

use super::extractor::BaseExtractor;
use tree_sitter::Node;

impl BaseExtractor {
    /// Start bytes of declarations that sit inside another declaration's body
    pub fn identify_nested_nodes(
        &self,
        declarations: &[Node],
        body_types: &[&str],
        nested_types: &[&str],
    ) -> HashSet<usize> {
        let mut nested = HashSet::new();
        for declaration in declarations {
            let Some(body) = declaration
                .child_by_field_name("body")
                .filter(|b| body_types.contains(&b.kind()))
                .or_else(|| self.find_child_by_types(declaration, body_types))
            else {
                continue;
            };
            for inner in self.find_all_descendants_of_types(&body, nested_types) {
                nested.insert(inner.start_byte());
            }
        }
        nested
    }

    /// Declarations of `declaration_types` anywhere in `root` that are not nested in
    /// another one's body, in source order
    pub fn top_level_declarations<'a>(
        &self,
        root: &Node<'a>,
        declaration_types: &[&str],
        body_types: &[&str],
    ) -> Vec<Node<'a>> {
        let all = self.find_all_descendants_of_types(root, declaration_types);
        let nested = self.identify_nested_nodes(&all, body_types, declaration_types);
        all.into_iter()
            .filter(|decl| !nested.contains(&decl.start_byte()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tree_sitter::Parser;

    #[test]
    fn test_only_outermost_declarations_are_top_level() {
        let code = r#"
class A {
    class B {
        class C {}
        void m() { class Local {} }
    }
}
class D {}
"#;
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_java::LANGUAGE.into())
            .unwrap();
        let tree = parser.parse(code, None).unwrap();
        let base = BaseExtractor::new("java".into(), "A.java".into(), code.into());

        let kinds = ["class_declaration"];
        let all = base.find_all_descendants_of_types(&tree.root_node(), &kinds);
        assert_eq!(all.len(), 5);

        let nested = base.identify_nested_nodes(&all, &["class_body"], &kinds);
        assert_eq!(nested.len(), 3, "B, C and Local are nested");

        let top: Vec<String> = base
            .top_level_declarations(&tree.root_node(), &kinds, &["class_body"])
            .iter()
            .map(|n| base.get_field_text(n, "name").unwrap())
            .collect();
        assert_eq!(top, vec!["A", "D"]);
    }
}
