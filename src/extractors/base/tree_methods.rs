// Tree navigation methods for BaseExtractor
//
// All searches look at named children only. Descendant searches are iterative
// pre-order walks, so deep trees cannot overflow the stack.

use super::extractor::BaseExtractor;
use tree_sitter::Node;

impl BaseExtractor {
    /// First direct named child of the given type
    pub fn find_first_child<'a>(&self, node: &Node<'a>, child_type: &str) -> Option<Node<'a>> {
        let mut cursor = node.walk();
        let found = node
            .named_children(&mut cursor)
            .find(|child| child.kind() == child_type);
        found
    }

    /// All direct named children of the given type, in source order
    pub fn find_all_children<'a>(&self, node: &Node<'a>, child_type: &str) -> Vec<Node<'a>> {
        let mut cursor = node.walk();
        node.named_children(&mut cursor)
            .filter(|child| child.kind() == child_type)
            .collect()
    }

    /// First direct named child whose type is one of `types`
    pub fn find_child_by_types<'a>(&self, node: &Node<'a>, types: &[&str]) -> Option<Node<'a>> {
        let mut cursor = node.walk();
        let found = node
            .named_children(&mut cursor)
            .find(|child| types.contains(&child.kind()));
        found
    }

    /// First node of the given type in pre-order, the root included
    pub fn find_first_descendant<'a>(&self, node: &Node<'a>, node_type: &str) -> Option<Node<'a>> {
        let mut found = None;
        walk_named_preorder(*node, |current| {
            if current.kind() == node_type {
                found = Some(current);
                false
            } else {
                true
            }
        });
        found
    }

    /// All nodes of the given type in pre-order, the root included
    pub fn find_all_descendants<'a>(&self, node: &Node<'a>, node_type: &str) -> Vec<Node<'a>> {
        self.find_all_descendants_of_types(node, &[node_type])
    }

    /// All nodes whose type is one of `types`, in pre-order
    pub fn find_all_descendants_of_types<'a>(
        &self,
        node: &Node<'a>,
        types: &[&str],
    ) -> Vec<Node<'a>> {
        let mut results = Vec::new();
        walk_named_preorder(*node, |current| {
            if types.contains(&current.kind()) {
                results.push(current);
            }
            true
        });
        results
    }

    /// Find parent of type
    pub fn find_parent_of_type<'a>(&self, node: &Node<'a>, parent_type: &str) -> Option<Node<'a>> {
        let mut current = node.parent();
        while let Some(parent) = current {
            if parent.kind() == parent_type {
                return Some(parent);
            }
            current = parent.parent();
        }
        None
    }

    /// The argument list of a call-like node: field `arguments`, else an
    /// `argument_list` or `arguments` child
    pub fn argument_list_node<'a>(&self, call: &Node<'a>) -> Option<Node<'a>> {
        call.child_by_field_name("arguments")
            .or_else(|| self.find_first_child(call, "argument_list"))
            .or_else(|| self.find_first_child(call, "arguments"))
    }

    /// Number of named, non-comment children of an argument list
    pub fn count_arguments(&self, arguments: &Node) -> usize {
        let mut cursor = arguments.walk();
        let count = arguments
            .named_children(&mut cursor)
            .filter(|child| !is_comment(child))
            .count();
        count
    }
}

/// True when `inner` lies within `outer`'s byte span
pub fn span_contains(outer: &Node, inner: &Node) -> bool {
    outer.start_byte() <= inner.start_byte() && inner.end_byte() <= outer.end_byte()
}

pub fn is_comment(node: &Node) -> bool {
    matches!(
        node.kind(),
        "comment" | "line_comment" | "block_comment" | "doc_comment"
    )
}

/// Iterative pre-order walk over named nodes; the visitor returns false to stop
fn walk_named_preorder<'a>(root: Node<'a>, mut visitor: impl FnMut(Node<'a>) -> bool) {
    let mut stack = vec![root];
    while let Some(current) = stack.pop() {
        if !visitor(current) {
            return;
        }
        let count = current.named_child_count();
        for i in (0..count).rev() {
            if let Some(child) = current.named_child(i) {
                stack.push(child);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tree_sitter::Parser;

    const CODE: &str = r#"
class Outer {
    int a;
    void run() { helper(); other(1, 2); }
    class Inner {
        void deep() { helper(); }
    }
}
"#;

    fn setup() -> (tree_sitter::Tree, BaseExtractor) {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_java::LANGUAGE.into())
            .unwrap();
        let tree = parser.parse(CODE, None).unwrap();
        let base = BaseExtractor::new("java".into(), "Outer.java".into(), CODE.into());
        (tree, base)
    }

    #[test]
    fn test_descendant_search_is_preorder_and_includes_all_depths() {
        let (tree, base) = setup();
        let root = tree.root_node();

        let classes = base.find_all_descendants(&root, "class_declaration");
        assert_eq!(classes.len(), 2);
        assert!(classes[0].start_byte() < classes[1].start_byte());

        let calls = base.find_all_descendants(&root, "method_invocation");
        let names: Vec<String> = calls
            .iter()
            .map(|c| base.get_field_text(c, "name").unwrap())
            .collect();
        assert_eq!(names, vec!["helper", "other", "helper"]);

        let first = base.find_first_descendant(&root, "method_declaration").unwrap();
        assert_eq!(base.get_field_text(&first, "name").as_deref(), Some("run"));
    }

    #[test]
    fn test_child_search_only_sees_direct_named_children() {
        let (tree, base) = setup();
        let outer = tree.root_node().named_child(0).unwrap();
        let body = base.find_first_child(&outer, "class_body").unwrap();

        let methods = base.find_all_children(&body, "method_declaration");
        assert_eq!(methods.len(), 1, "Inner.deep must not be a direct child");
        assert!(base.find_first_child(&outer, "method_declaration").is_none());
        assert!(base
            .find_child_by_types(&body, &["field_declaration", "class_declaration"])
            .is_some_and(|n| n.kind() == "field_declaration"));
    }

    #[test]
    fn test_argument_list_and_count() {
        let (tree, base) = setup();
        let calls = base.find_all_descendants(&tree.root_node(), "method_invocation");
        let other = calls[1];
        let args = base.argument_list_node(&other).unwrap();
        assert_eq!(base.count_arguments(&args), 2);
        assert!(span_contains(&other, &args));
        assert!(!span_contains(&args, &other));
    }
}
