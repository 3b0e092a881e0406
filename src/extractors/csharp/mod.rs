// C# Language Extractor
//
// This extractor handles C#-specific constructs including:
// - Block and file-scoped namespaces, using directives
// - Classes, interfaces, structs, records and enums, nested to any depth
// - Fields, events, properties with accessors, methods, constructors
// - Attributes and generics
// - Invocations plus property reads/writes as `get_X`/`set_X` call sites

mod calls;
mod helpers;
mod members;
mod type_inference;
mod types;

use crate::extractors::base::{BaseExtractor, SourceUnit};
use tracing::debug;
use tree_sitter::{Node, Tree};

/// C# extractor using tree-sitter-c-sharp parser
pub struct CSharpExtractor {
    base: BaseExtractor,
}

impl CSharpExtractor {
    pub fn new(base: BaseExtractor) -> Self {
        Self { base }
    }

    /// Analyze the whole file
    pub fn analyze(&self, tree: &Tree) -> SourceUnit {
        let base = &self.base;
        let root = tree.root_node();
        let mut unit = SourceUnit::new(&base.file_path, "csharp");

        unit.imports = base
            .find_all_descendants(&root, "using_directive")
            .iter()
            .map(|using| base.normalize_inline(using))
            .collect();

        let declarations =
            base.top_level_declarations(&root, types::TYPE_DECLARATION_KINDS, types::BODY_KINDS);
        unit.package_name = self.namespace_name(root, declarations.first().copied());

        for declaration in declarations {
            let extracted = base
                .isolate(
                    || format!("type at byte {}", declaration.start_byte()),
                    || types::extract_type(base, &declaration),
                )
                .flatten();
            if let Some(type_declaration) = extracted {
                unit.types.push(type_declaration);
            }
        }

        unit.diagnostics = base.take_diagnostics();
        debug!(
            "Extracted {} top-level C# types from {}",
            unit.types.len(),
            base.file_path
        );
        unit
    }

    /// File-scoped namespace, else the namespaces enclosing the first type joined by `.`
    fn namespace_name(&self, root: Node, first_type: Option<Node>) -> Option<String> {
        let base = &self.base;
        if let Some(file_scoped) = base.find_first_descendant(&root, "file_scoped_namespace_declaration") {
            return base.get_field_text(&file_scoped, "name");
        }

        if let Some(first_type) = first_type {
            let mut segments = Vec::new();
            let mut current = first_type.parent();
            while let Some(node) = current {
                if node.kind() == "namespace_declaration" {
                    if let Some(name) = base.get_field_text(&node, "name") {
                        segments.push(name);
                    }
                }
                current = node.parent();
            }
            if !segments.is_empty() {
                segments.reverse();
                return Some(segments.join("."));
            }
        }

        base.find_first_descendant(&root, "namespace_declaration")
            .and_then(|namespace| base.get_field_text(&namespace, "name"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::base::{AccessorKind, CallSite, TypeKind};
    use tree_sitter::Parser;

    fn analyze(code: &str) -> SourceUnit {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_c_sharp::LANGUAGE.into())
            .unwrap();
        let tree = parser.parse(code, None).unwrap();
        let base = BaseExtractor::new("csharp".into(), "Sample.cs".into(), code.into());
        CSharpExtractor::new(base).analyze(&tree)
    }

    fn call_tuples(calls: &[CallSite]) -> Vec<(&str, Option<&str>, Option<&str>, Option<usize>, usize)> {
        calls
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
            .collect()
    }

    #[test]
    fn test_namespaces_usings_and_base_list_split() {
        let code = r#"
using System;
using System.Collections.Generic;

namespace Acme {
    namespace Billing {
        [Serializable]
        public sealed class Invoice<T> : Document, IComparable<Invoice<T>>, IDisposable {
        }
        internal interface IStore : IDisposable, IEnumerable<int> {}
        public class Handler : IHandler, Base {}
    }
}
"#;
        let unit = analyze(code);
        assert_eq!(unit.package_name.as_deref(), Some("Acme.Billing"));
        assert_eq!(
            unit.imports,
            vec!["using System;", "using System.Collections.Generic;"]
        );

        let invoice = &unit.types[0];
        assert_eq!(invoice.kind, TypeKind::Class);
        assert_eq!(invoice.name, "Invoice<T>");
        assert_eq!(invoice.visibility.as_deref(), Some("public"));
        assert_eq!(invoice.modifiers, vec!["public", "sealed"]);
        assert_eq!(invoice.annotations, vec!["[Serializable]"]);
        assert_eq!(invoice.extends_type.as_deref(), Some("Document"));
        assert_eq!(
            invoice.implements_interfaces,
            vec!["IComparable<Invoice<T>>", "IDisposable"]
        );

        let store = &unit.types[1];
        assert_eq!(store.kind, TypeKind::Interface);
        assert_eq!(store.extends_type, None);
        assert_eq!(store.implements_interfaces, vec!["IDisposable", "IEnumerable<int>"]);

        // The first entry looks like an interface, so nothing is taken as the superclass
        let handler = &unit.types[2];
        assert_eq!(handler.extends_type, None);
        assert_eq!(handler.implements_interfaces, vec!["IHandler", "Base"]);
    }

    #[test]
    fn test_file_scoped_namespace() {
        let code = r#"
namespace Acme.Tools;

class Widget {}
"#;
        let unit = analyze(code);
        assert_eq!(unit.package_name.as_deref(), Some("Acme.Tools"));
        assert_eq!(unit.types[0].name, "Widget");
    }

    #[test]
    fn test_nested_types_and_visibility_absence() {
        let code = r#"
class Outer {
    int count;
    void Run() {}
    struct Inner {
        void Step() {}
        enum Mode { On, Off }
    }
}
"#;
        let unit = analyze(code);
        assert_eq!(unit.types.len(), 1, "nested types must not appear at file level");

        let outer = &unit.types[0];
        assert_eq!(outer.visibility, None);
        assert_eq!(outer.fields[0].visibility, None);
        assert_eq!(outer.methods.len(), 1);
        assert_eq!(outer.methods[0].visibility, None);

        let inner = &outer.types[0];
        assert_eq!(inner.kind, TypeKind::Struct);
        assert_eq!(inner.methods[0].name, "Step");

        let mode = &inner.types[0];
        assert_eq!(mode.kind, TypeKind::Enum);
        let names: Vec<&str> = mode.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["On", "Off"]);
        assert_eq!(mode.fields[0].type_name.as_deref(), Some("Mode"));
    }

    #[test]
    fn test_interface_members_are_public_and_abstract() {
        let code = r#"
public interface IShape {
    double Area();
    string Name { get; }
}
"#;
        let unit = analyze(code);
        let shape = &unit.types[0];
        let area = &shape.methods[0];
        assert_eq!(area.visibility.as_deref(), Some("public"));
        assert!(area.modifiers.contains(&"abstract".to_string()));
        assert_eq!(shape.properties[0].visibility.as_deref(), Some("public"));
    }

    #[test]
    fn test_methods_constructors_and_params_arrays() {
        let code = r#"
public class Repo {
    public Repo(string url) { }
    [Obsolete]
    protected internal async Task<List<int>> Load(int limit, params string[] tags) => await Fetch(limit);
}
"#;
        let unit = analyze(code);
        let repo = &unit.types[0];

        let constructor = &repo.methods[0];
        assert_eq!(constructor.name, "Repo");
        assert_eq!(constructor.return_type, None);
        assert_eq!(constructor.parameters[0].name, "url");
        assert_eq!(constructor.parameters[0].type_name.as_deref(), Some("string"));

        let load = &repo.methods[1];
        assert_eq!(load.return_type.as_deref(), Some("Task<List<int>>"));
        assert_eq!(load.visibility.as_deref(), Some("protected internal"));
        assert_eq!(load.annotations, vec!["[Obsolete]"]);
        assert_eq!(load.parameters[1].name, "params tags");
        assert_eq!(load.parameters[1].type_name.as_deref(), Some("string[]"));
        assert_eq!(load.method_calls[0].name, "Fetch");
    }

    #[test]
    fn test_properties_with_accessors() {
        let code = r#"
class Account {
    private decimal _balance;
    public decimal Balance {
        get { return Audit(_balance); }
        private set { _balance = value; }
    }
    public string Label => Format(_balance);
    public int Id { get; init; }
}
"#;
        let unit = analyze(code);
        let account = &unit.types[0];
        assert_eq!(account.fields[0].name, "_balance");

        let balance = &account.properties[0];
        assert_eq!(balance.type_name.as_deref(), Some("decimal"));
        assert_eq!(balance.accessors.len(), 2);
        assert_eq!(balance.accessors[0].kind, AccessorKind::Get);
        assert_eq!(balance.accessors[0].visibility, None);
        assert_eq!(balance.accessors[0].method_calls[0].name, "Audit");
        assert_eq!(balance.accessors[1].kind, AccessorKind::Set);
        assert_eq!(balance.accessors[1].visibility.as_deref(), Some("private"));

        let label = &account.properties[1];
        assert_eq!(label.accessors.len(), 1, "expression body synthesizes one getter");
        assert_eq!(label.accessors[0].kind, AccessorKind::Get);
        assert_eq!(label.accessors[0].method_calls[0].name, "Format");

        let id = &account.properties[2];
        assert_eq!(id.accessors[1].kind, AccessorKind::Set);
        assert!(id.accessors[1].modifiers.contains(&"init".to_string()));
    }

    #[test]
    fn test_property_get_set_split() {
        let code = r#"
class Counter {
    void Bump(Box obj) {
        obj.Value = obj.Value + 1;
    }
}
"#;
        let unit = analyze(code);
        let bump = &unit.types[0].methods[0];
        assert_eq!(
            call_tuples(&bump.method_calls),
            vec![
                ("get_Value", Some("Box"), Some("obj"), None, 1),
                ("set_Value", Some("Box"), Some("obj"), None, 1),
            ]
        );
    }

    #[test]
    fn test_event_subscription_is_not_a_setter() {
        let code = r#"
class Wiring {
    void Attach(Button button) {
        button.Click += OnClick;
        button.Text = "ok";
    }
}
"#;
        let unit = analyze(code);
        let attach = &unit.types[0].methods[0];
        let names: Vec<&str> = attach.method_calls.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["set_Text"]);
    }

    #[test]
    fn test_call_receivers_and_arity() {
        let code = r#"
class Service : BaseService {
    private Repository _repo;

    void Handle(Request request) {
        var log = new Logger();
        request.Validate();
        request.Validate();
        request.Validate(true);
        log.Info("x");
        this.Flush();
        base.Close();
        Console.WriteLine(request.Id);
        _repo.Save(request);
        Build().Run();
    }
}
"#;
        let unit = analyze(code);
        let handle = &unit.types[0].methods[0];
        assert_eq!(handle.local_variables, vec!["log"]);
        assert_eq!(
            call_tuples(&handle.method_calls),
            vec![
                ("Build", None, None, Some(0), 1),
                ("Close", Some("BaseService"), Some("base"), Some(0), 1),
                ("Flush", Some("Service"), Some("this"), Some(0), 1),
                ("Info", Some("Logger"), Some("log"), Some(1), 1),
                ("Run", None, None, Some(0), 1),
                ("Save", Some("Repository"), Some("_repo"), Some(1), 1),
                ("Validate", Some("Request"), Some("request"), Some(0), 2),
                ("Validate", Some("Request"), Some("request"), Some(1), 1),
                ("WriteLine", Some("Console"), None, Some(1), 1),
                ("get_Id", Some("Request"), Some("request"), None, 1),
            ]
        );
    }

    #[test]
    fn test_records_expose_positional_properties() {
        let code = r#"
public record Point(int X, int Y) : Shape(X), IComparable<Point>;
"#;
        let unit = analyze(code);
        let point = &unit.types[0];
        assert_eq!(point.kind, TypeKind::Record);
        assert_eq!(point.extends_type.as_deref(), Some("Shape"));
        assert_eq!(point.implements_interfaces, vec!["IComparable<Point>"]);
        let names: Vec<&str> = point.properties.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["X", "Y"]);
        assert_eq!(point.properties[0].type_name.as_deref(), Some("int"));
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
        assert_eq!(bar.local_variables, vec!["x"]);
        assert_eq!(call_tuples(&bar.method_calls), vec![("baz", None, None, Some(0), 2)]);
    }
}
