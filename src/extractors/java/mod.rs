/// Java extractor: builds the structural model of one Java source file
///
/// This module is organized into focused sub-modules:
/// - helpers: modifiers, visibility, annotations, type text and initializer inference
/// - types: class, interface, enum and record declarations with nesting
/// - members: fields, methods, constructors and parameters
/// - calls: body analysis (locals, method invocations)
mod calls;
mod helpers;
mod members;
mod types;

use crate::extractors::base::{BaseExtractor, SourceUnit};
use tracing::debug;
use tree_sitter::{Node, Tree};

pub struct JavaExtractor {
    base: BaseExtractor,
}

impl JavaExtractor {
    pub fn new(base: BaseExtractor) -> Self {
        Self { base }
    }

    /// Analyze the whole file
    pub fn analyze(&self, tree: &Tree) -> SourceUnit {
        let base = &self.base;
        let root = tree.root_node();
        let mut unit = SourceUnit::new(&base.file_path, "java");

        unit.package_name = self.package_name(root);
        unit.imports = base
            .find_all_children(&root, "import_declaration")
            .iter()
            .map(|import| base.normalize_inline(import))
            .collect();

        for declaration in
            base.top_level_declarations(&root, types::TYPE_DECLARATION_KINDS, types::BODY_KINDS)
        {
            let extracted = base
                .isolate(
                    || format!("type at byte {}", declaration.start_byte()),
                    || types::extract_type(base, declaration),
                )
                .flatten();
            if let Some(type_declaration) = extracted {
                unit.types.push(type_declaration);
            }
        }

        unit.diagnostics = base.take_diagnostics();
        debug!(
            "Extracted {} top-level Java types from {}",
            unit.types.len(),
            base.file_path
        );
        unit
    }

    fn package_name(&self, root: Node) -> Option<String> {
        let package = self.base.find_first_child(&root, "package_declaration")?;
        let name = self
            .base
            .find_child_by_types(&package, &["scoped_identifier", "identifier"])?;
        Some(self.base.get_node_text(&name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::base::TypeKind;
    use tree_sitter::Parser;

    fn analyze(code: &str) -> SourceUnit {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_java::LANGUAGE.into())
            .unwrap();
        let tree = parser.parse(code, None).unwrap();
        let base = BaseExtractor::new("java".into(), "Sample.java".into(), code.into());
        JavaExtractor::new(base).analyze(&tree)
    }

    #[test]
    fn test_package_imports_and_class_header() {
        let code = r#"
package com.example.app;

import java.util.List;
import java.util.Map;

@Service
public final class Registry<K, V> extends Base<K> implements Closeable, Iterable<V> {
}
"#;
        let unit = analyze(code);
        assert_eq!(unit.package_name.as_deref(), Some("com.example.app"));
        assert_eq!(
            unit.imports,
            vec!["import java.util.List;", "import java.util.Map;"]
        );

        let registry = &unit.types[0];
        assert_eq!(registry.kind, TypeKind::Class);
        assert_eq!(registry.name, "Registry<K, V>");
        assert_eq!(registry.visibility.as_deref(), Some("public"));
        assert_eq!(registry.modifiers, vec!["public", "final"]);
        assert_eq!(registry.annotations, vec!["@Service"]);
        assert_eq!(registry.extends_type.as_deref(), Some("Base<K>"));
        assert_eq!(
            registry.implements_interfaces,
            vec!["Closeable", "Iterable<V>"]
        );
    }

    #[test]
    fn test_nested_types_are_owned_by_their_parent() {
        let code = r#"
class A {
    int a;
    void ma() {}
    class B {
        int b;
        void mb() {}
        class C {
            void mc() {}
        }
    }
}
"#;
        let unit = analyze(code);
        assert_eq!(unit.types.len(), 1);

        let a = &unit.types[0];
        assert_eq!(a.fields.iter().map(|f| f.name.as_str()).collect::<Vec<_>>(), vec!["a"]);
        assert_eq!(a.methods.iter().map(|m| m.name.as_str()).collect::<Vec<_>>(), vec!["ma"]);
        assert_eq!(a.types.len(), 1);

        let b = &a.types[0];
        assert_eq!(b.name, "B");
        assert_eq!(b.methods.len(), 1);
        assert_eq!(b.types.len(), 1);
        assert_eq!(b.types[0].name, "C");
        assert_eq!(b.types[0].methods[0].name, "mc");
        assert!(b.types[0].types.is_empty());
    }

    #[test]
    fn test_visibility_absent_without_keyword() {
        let code = r#"
class Plain {
    int counter;
    void tick() {}
    private String label;
}
"#;
        let unit = analyze(code);
        let plain = &unit.types[0];
        assert_eq!(plain.visibility, None);
        assert_eq!(plain.fields[0].visibility, None);
        assert_eq!(plain.methods[0].visibility, None);
        assert_eq!(plain.fields[1].visibility.as_deref(), Some("private"));
    }

    #[test]
    fn test_interface_members_are_implicitly_public_and_abstract() {
        let code = r#"
interface Shape extends Comparable<Shape> {
    double area();
    default String label() { return "shape"; }
    int SIDES = 0;
}
"#;
        let unit = analyze(code);
        let shape = &unit.types[0];
        assert_eq!(shape.kind, TypeKind::Interface);
        assert_eq!(shape.implements_interfaces, vec!["Comparable<Shape>"]);

        let area = &shape.methods[0];
        assert_eq!(area.visibility.as_deref(), Some("public"));
        assert!(area.modifiers.contains(&"abstract".to_string()));

        let label = &shape.methods[1];
        assert_eq!(label.visibility.as_deref(), Some("public"));
        assert!(!label.modifiers.contains(&"abstract".to_string()));

        assert_eq!(shape.fields[0].name, "SIDES");
        assert_eq!(shape.fields[0].visibility.as_deref(), Some("public"));
    }

    #[test]
    fn test_method_signature_parameters_and_generic_return_type() {
        let code = r#"
public class Repo {
    @Override
    public <T> Map<String, List<T>> group(List<T> items, int limit, String... tags) {
        return null;
    }
    public Repo(String url) {}
}
"#;
        let unit = analyze(code);
        let repo = &unit.types[0];

        let group = &repo.methods[0];
        assert_eq!(group.name, "group");
        assert_eq!(group.return_type.as_deref(), Some("Map<String, List<T>>"));
        assert_eq!(group.annotations, vec!["@Override"]);
        let params: Vec<(&str, Option<&str>)> = group
            .parameters
            .iter()
            .map(|p| (p.name.as_str(), p.type_name.as_deref()))
            .collect();
        assert_eq!(
            params,
            vec![
                ("items", Some("List<T>")),
                ("limit", Some("int")),
                ("tags", Some("String...")),
            ]
        );

        let constructor = &repo.methods[1];
        assert_eq!(constructor.name, "Repo");
        assert_eq!(constructor.return_type, None);
        assert_eq!(constructor.parameters[0].name, "url");
    }

    #[test]
    fn test_call_sites_resolve_receivers_and_aggregate() {
        let code = r#"
public class Service {
    private Repository repo;

    public void handle(Request request) {
        Logger log = new Logger();
        var cache = new HashMap<String, String>();
        request.validate();
        request.validate();
        request.validate(true);
        log.info("x");
        this.repo.save(request);
        this.flush();
        Math.max(1, 2);
        build().run();
        cache.put("a", "b");
        helper();
    }
}
"#;
        let unit = analyze(code);
        let handle = &unit.types[0].methods[0];
        assert_eq!(handle.local_variables, vec!["log", "cache"]);

        let calls: Vec<(&str, Option<&str>, Option<&str>, Option<usize>, usize)> = handle
            .method_calls
            .iter()
            .map(|c| {
                (
                    c.name.as_str(),
                    c.receiver_type.as_deref(),
                    c.receiver_name.as_deref(),
                    c.arg_count,
                    c.count,
                )
            })
            .collect();
        assert_eq!(
            calls,
            vec![
                ("build", None, None, Some(0), 1),
                ("flush", Some("Service"), Some("this"), Some(0), 1),
                ("helper", None, None, Some(0), 1),
                ("info", Some("Logger"), Some("log"), Some(1), 1),
                ("max", Some("Math"), None, Some(2), 1),
                ("put", Some("HashMap<String, String>"), Some("cache"), Some(2), 1),
                ("run", None, None, Some(0), 1),
                ("save", Some("Repository"), Some("this.repo"), Some(1), 1),
                ("validate", Some("Request"), Some("request"), Some(0), 2),
                ("validate", Some("Request"), Some("request"), Some(1), 1),
            ]
        );
    }

    #[test]
    fn test_enum_and_record_members() {
        let code = r#"
public enum Color {
    RED, GREEN;
    private final int code = 1;
    public int code() { return code; }
}
record Point(int x, int y) {
    Point {
        check(x);
    }
}
"#;
        let unit = analyze(code);
        let color = &unit.types[0];
        assert_eq!(color.kind, TypeKind::Enum);
        let names: Vec<&str> = color.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["RED", "GREEN", "code"]);
        assert_eq!(color.fields[0].type_name.as_deref(), Some("Color"));
        assert_eq!(color.methods[0].name, "code");

        let point = &unit.types[1];
        assert_eq!(point.kind, TypeKind::Record);
        assert_eq!(point.fields.len(), 2);
        let constructor = &point.methods[0];
        assert_eq!(constructor.name, "Point");
        assert_eq!(constructor.parameters.len(), 2);
        assert_eq!(constructor.method_calls[0].name, "check");
    }

    #[test]
    fn test_end_to_end_counts_repeated_direct_calls() {
        let code = r#"
class Foo {
    void Bar() {
        int x = 1;
        baz();
        baz();
    }
}
"#;
        let unit = analyze(code);
        let bar = &unit.types[0].methods[0];
        assert_eq!(bar.name, "Bar");
        assert_eq!(bar.local_variables, vec!["x"]);
        assert_eq!(bar.method_calls.len(), 1);
        assert_eq!(bar.method_calls[0].name, "baz");
        assert_eq!(bar.method_calls[0].count, 2);
    }

    #[test]
    fn test_analysis_is_deterministic() {
        let code = r#"
class Z { void a() { b.c(); d(); b.c(); e.f(1); } }
"#;
        assert_eq!(analyze(code), analyze(code));
    }
}
