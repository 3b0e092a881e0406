//! TypeScript/JavaScript extractor
//!
//! One engine serves both grammars; [`Dialect`] switches the few places where
//! they differ. TSX is analyzed with the TypeScript dialect.
//!
//! - **helpers**: modifiers, decorators, export unwrapping, type annotations
//! - **inference**: initializer type inference, including React hooks
//! - **classes**: classes with heritage, fields and constructor parameter properties
//! - **interfaces**: interfaces, enums and type aliases
//! - **functions**: functions, methods, bound arrow functions and parameters
//! - **calls**: body analysis (declared locals, call sites)

mod calls;
mod classes;
mod functions;
mod helpers;
mod inference;
mod interfaces;

use crate::extractors::base::{
    BaseExtractor, FieldDeclaration, MethodDeclaration, SourceUnit, TypeDeclaration, TypeKind,
};
use calls::{BodyAnalyzer, ClassContext};
use tracing::debug;
use tree_sitter::{Node, Tree};

/// Which ECMAScript grammar produced the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    TypeScript,
    JavaScript,
}

impl Dialect {
    /// Language tag reported on the SourceUnit
    pub fn language_tag(self) -> &'static str {
        match self {
            Dialect::TypeScript => "typescript",
            Dialect::JavaScript => "javascript",
        }
    }
}

/// Declarations found directly in a program or namespace body
#[derive(Default)]
struct Members {
    types: Vec<TypeDeclaration>,
    methods: Vec<MethodDeclaration>,
    fields: Vec<FieldDeclaration>,
}

pub struct TypeScriptExtractor {
    base: BaseExtractor,
    dialect: Dialect,
}

impl TypeScriptExtractor {
    pub fn new(base: BaseExtractor, dialect: Dialect) -> Self {
        Self { base, dialect }
    }

    /// Analyze the whole file
    pub fn analyze(&self, tree: &Tree) -> SourceUnit {
        let base = &self.base;
        let root = tree.root_node();
        let mut unit = SourceUnit::new(&base.file_path, self.dialect.language_tag());

        unit.imports = base
            .find_all_descendants(&root, "import_statement")
            .iter()
            .map(|import| base.normalize_inline(import))
            .collect();

        let members = self.collect_members(root);
        unit.types = members.types;
        unit.methods = members.methods;
        unit.fields = members.fields;

        let context = ClassContext::default();
        let analyzer = BodyAnalyzer {
            base,
            dialect: self.dialect,
            context: &context,
        };
        unit.method_calls = base
            .isolate(|| "top-level calls".to_string(), || analyzer.unit_calls(root))
            .unwrap_or_default();

        unit.diagnostics = base.take_diagnostics();
        debug!(
            "Extracted {} types and {} functions from {}",
            unit.types.len(),
            unit.methods.len(),
            base.file_path
        );
        unit
    }

    /// Types, functions and variables declared by the direct statements of `container`
    fn collect_members(&self, container: Node) -> Members {
        let base = &self.base;
        let mut members = Members::default();

        let mut cursor = container.walk();
        for statement in container.named_children(&mut cursor) {
            let mut node = helpers::unwrap_statement(statement);
            if node.kind() == "ambient_declaration" {
                match node.named_child(0) {
                    Some(inner) => node = helpers::unwrap_statement(inner),
                    None => continue,
                }
            }

            match node.kind() {
                "class_declaration"
                | "abstract_class_declaration"
                | "interface_declaration"
                | "enum_declaration"
                | "type_alias_declaration"
                | "internal_module"
                | "module" => {
                    let extracted = base
                        .isolate(
                            || format!("{} at byte {}", node.kind(), node.start_byte()),
                            || self.extract_type(&node),
                        )
                        .flatten();
                    if let Some(declaration) = extracted {
                        members.types.push(declaration);
                    }
                }
                "function_declaration" | "generator_function_declaration" | "function_signature" => {
                    let extracted = base
                        .isolate(
                            || format!("function at byte {}", node.start_byte()),
                            || functions::extract_function(base, self.dialect, &node),
                        )
                        .flatten();
                    if let Some(method) = extracted {
                        members.methods.push(method);
                    }
                }
                "lexical_declaration" | "variable_declaration" => {
                    self.collect_variables(&node, &mut members);
                }
                _ => {}
            }
        }
        members
    }

    /// Declarators bound to functions become methods; all others become fields
    fn collect_variables(&self, declaration: &Node, members: &mut Members) {
        let base = &self.base;
        let mut cursor = declaration.walk();
        for declarator in declaration
            .named_children(&mut cursor)
            .filter(|d| d.kind() == "variable_declarator")
        {
            let is_function = declarator
                .child_by_field_name("value")
                .is_some_and(|v| functions::FUNCTION_VALUE_KINDS.contains(&v.kind()));
            if is_function {
                let extracted = base
                    .isolate(
                        || format!("function binding at byte {}", declarator.start_byte()),
                        || {
                            functions::extract_bound_function(
                                base,
                                self.dialect,
                                declaration,
                                &declarator,
                            )
                        },
                    )
                    .flatten();
                if let Some(method) = extracted {
                    members.methods.push(method);
                }
            } else if let Some(field) = self.variable_field(declaration, &declarator) {
                members.fields.push(field);
            }
        }
    }

    fn variable_field(&self, declaration: &Node, declarator: &Node) -> Option<FieldDeclaration> {
        let base = &self.base;
        let name = declarator
            .child_by_field_name("name")
            .filter(|n| n.kind() == "identifier")
            .map(|n| base.get_node_text(&n))?;
        let type_name = helpers::annotated_type(base, declarator, "type").or_else(|| {
            declarator
                .child_by_field_name("value")
                .and_then(|v| inference::infer_expression_type(base, self.dialect, &v))
        });

        let mut modifiers = helpers::extract_modifiers(base, declaration);
        match declaration.child_by_field_name("kind") {
            Some(keyword) => modifiers.imply(&base.get_node_text(&keyword)),
            None => modifiers.imply("var"),
        }
        let mut field = FieldDeclaration::new(name, type_name);
        field.modifiers = modifiers.keywords;
        Some(field)
    }

    fn extract_type(&self, node: &Node) -> Option<TypeDeclaration> {
        let base = &self.base;
        match node.kind() {
            "class_declaration" | "abstract_class_declaration" => {
                classes::extract_class(base, self.dialect, node)
            }
            "interface_declaration" => interfaces::extract_interface(base, self.dialect, node),
            "enum_declaration" => interfaces::extract_enum(base, node),
            "type_alias_declaration" => interfaces::extract_type_alias(base, node),
            _ => self.extract_namespace(node),
        }
    }

    /// `namespace A.B { ... }` and `declare module "x" { ... }` as module declarations
    /// owning what their bodies declare
    fn extract_namespace(&self, node: &Node) -> Option<TypeDeclaration> {
        let base = &self.base;
        let name = base.get_field_text(node, "name")?;
        let mut declaration = TypeDeclaration::new(TypeKind::Module, name);
        declaration.modifiers = helpers::extract_modifiers(base, node).keywords;

        if let Some(body) = node.child_by_field_name("body") {
            let members = self.collect_members(body);
            declaration.types = members.types;
            declaration.methods = members.methods;
            declaration.fields = members.fields;
        }
        Some(declaration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::base::CallSite;
    use tree_sitter::Parser;

    fn analyze(code: &str, dialect: Dialect) -> SourceUnit {
        let mut parser = Parser::new();
        let language = match dialect {
            Dialect::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Dialect::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
        };
        parser.set_language(&language).unwrap();
        let tree = parser.parse(code, None).unwrap();
        let mut base = BaseExtractor::new(
            dialect.language_tag().into(),
            "sample.ts".into(),
            code.into(),
        );
        base.track_arg_counts = false;
        TypeScriptExtractor::new(base, dialect).analyze(&tree)
    }

    fn call_triples(calls: &[CallSite]) -> Vec<(&str, Option<&str>, Option<&str>, usize)> {
        calls
            .iter()
            .map(|c| {
                (
                    c.name.as_str(),
                    c.receiver_type.as_deref(),
                    c.receiver_name.as_deref(),
                    c.count,
                )
            })
            .collect()
    }

    #[test]
    fn test_class_heritage_fields_and_this_receivers() {
        let code = r#"
import { Injectable } from "@angular/core";
import * as fs from "fs";

@Injectable()
export class OrderService<T> extends BaseService<T> implements Disposable, Loggable {
  private readonly cache: Map<string, T> = new Map();
  static count = 0;
  #secret = "s";

  constructor(private repo: OrderRepository, name: string) {
    super(name);
  }

  async load(id: string): Promise<T> {
    const order = await this.repo.find(id);
    this.cache.set(id, order);
    return order;
  }
}
"#;
        let unit = analyze(code, Dialect::TypeScript);
        assert_eq!(unit.language, "typescript");
        assert_eq!(
            unit.imports,
            vec![
                r#"import { Injectable } from "@angular/core";"#,
                r#"import * as fs from "fs";"#
            ]
        );

        let service = &unit.types[0];
        assert_eq!(service.kind, TypeKind::Class);
        assert_eq!(service.name, "OrderService<T>");
        assert_eq!(service.visibility, None, "no accessibility keyword, no visibility");
        assert_eq!(service.modifiers, vec!["export"]);
        assert_eq!(service.annotations, vec!["@Injectable()"]);
        assert_eq!(service.extends_type.as_deref(), Some("BaseService<T>"));
        assert_eq!(service.implements_interfaces, vec!["Disposable", "Loggable"]);

        let fields: Vec<(&str, Option<&str>, Option<&str>)> = service
            .fields
            .iter()
            .map(|f| (f.name.as_str(), f.type_name.as_deref(), f.visibility.as_deref()))
            .collect();
        assert_eq!(
            fields,
            vec![
                ("cache", Some("Map<string, T>"), Some("private")),
                ("count", Some("number"), None),
                ("#secret", Some("string"), Some("private")),
                ("repo", Some("OrderRepository"), Some("private")),
            ]
        );
        assert_eq!(service.fields[0].modifiers, vec!["private", "readonly"]);
        assert_eq!(service.fields[1].modifiers, vec!["static"]);

        let constructor = &service.methods[0];
        assert_eq!(constructor.name, "OrderService");
        assert_eq!(constructor.return_type, None);
        let params: Vec<&str> = constructor.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(params, vec!["repo", "name"]);
        assert!(constructor.method_calls.is_empty(), "super(...) is not recorded");

        let load = &service.methods[1];
        assert_eq!(load.modifiers, vec!["async"]);
        assert_eq!(load.return_type.as_deref(), Some("Promise<T>"));
        assert_eq!(load.local_variables, vec!["order"]);
        assert_eq!(
            call_triples(&load.method_calls),
            vec![
                ("find", Some("OrderRepository"), Some("this.repo"), 1),
                ("set", Some("Map<string, T>"), Some("this.cache"), 1),
            ]
        );
    }

    #[test]
    fn test_interfaces_enums_aliases_namespaces_and_functions() {
        let code = r#"
export interface Repository<T> extends Reader<T>, Writer {
  readonly name: string;
  find(id: string): Promise<T>;
}

enum Color { Red, Green = "g" }

type Handler = (event: Event) => void;

namespace Geometry {
  export class Point {}
  export function distance(a: Point, b: Point): number {
    return Math.sqrt(a.x - b.x);
  }
  export const ORIGIN = new Point();
}

export function main(...args: string[]): void {
  const { verbose, level = 1 } = parse(args);
  for (const arg of args) {
    console.log(arg);
  }
}

export const handler = async (req: Request): Promise<void> => {
  await respond(req);
};

let counter = 0;
main();
"#;
        let unit = analyze(code, Dialect::TypeScript);
        let kinds: Vec<(TypeKind, &str)> =
            unit.types.iter().map(|t| (t.kind, t.name.as_str())).collect();
        assert_eq!(
            kinds,
            vec![
                (TypeKind::Interface, "Repository<T>"),
                (TypeKind::Enum, "Color"),
                (TypeKind::TypeAlias, "Handler"),
                (TypeKind::Module, "Geometry"),
            ]
        );

        let repository = &unit.types[0];
        assert_eq!(repository.implements_interfaces, vec!["Reader<T>", "Writer"]);
        assert_eq!(repository.fields[0].name, "name");
        assert_eq!(repository.fields[0].visibility.as_deref(), Some("public"));
        assert_eq!(repository.fields[0].modifiers, vec!["readonly", "public"]);
        let find = &repository.methods[0];
        assert_eq!(find.visibility.as_deref(), Some("public"));
        assert_eq!(find.modifiers, vec!["public", "abstract"]);
        assert_eq!(find.return_type.as_deref(), Some("Promise<T>"));

        let color = &unit.types[1];
        let members: Vec<(&str, Option<&str>)> = color
            .fields
            .iter()
            .map(|f| (f.name.as_str(), f.type_name.as_deref()))
            .collect();
        assert_eq!(members, vec![("Red", Some("Color")), ("Green", Some("Color"))]);

        let geometry = &unit.types[3];
        assert_eq!(geometry.types[0].name, "Point");
        assert_eq!(geometry.methods[0].name, "distance");
        assert_eq!(geometry.methods[0].modifiers, vec!["export"]);
        assert_eq!(
            call_triples(&geometry.methods[0].method_calls),
            vec![("sqrt", Some("Math"), None, 1)]
        );
        assert_eq!(geometry.fields[0].name, "ORIGIN");
        assert_eq!(geometry.fields[0].type_name.as_deref(), Some("Point"));

        let names: Vec<&str> = unit.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["main", "handler"]);

        let main = &unit.methods[0];
        assert_eq!(main.parameters[0].name, "...args");
        assert_eq!(main.parameters[0].type_name.as_deref(), Some("string[]"));
        assert_eq!(main.local_variables, vec!["verbose", "level", "arg"]);
        assert_eq!(
            call_triples(&main.method_calls),
            vec![("log", None, Some("console"), 1), ("parse", None, None, 1)]
        );

        let handler = &unit.methods[1];
        assert_eq!(handler.modifiers, vec!["export", "const", "async"]);
        assert_eq!(handler.return_type.as_deref(), Some("Promise<void>"));
        assert_eq!(handler.parameters[0].type_name.as_deref(), Some("Request"));

        assert_eq!(unit.fields.len(), 1);
        assert_eq!(unit.fields[0].name, "counter");
        assert_eq!(unit.fields[0].modifiers, vec!["let"]);
        assert_eq!(call_triples(&unit.method_calls), vec![("main", None, None, 1)]);
    }

    #[test]
    fn test_javascript_classes_parameters_and_receivers() {
        let code = r#"
const express = require("express");
import path from "path";

class Controller extends Base {
  #hits = 0;
  static routes = [];

  handle(req, res = {}, ...rest) {
    this.#hits++;
    this.log(req.url);
    super.handle(req);
    res.send(path.join("a", "b"));
  }
}

function helper({ a, b }, [c]) {
  return a + b + c;
}

const App = () => useState(0);
"#;
        let unit = analyze(code, Dialect::JavaScript);
        assert_eq!(unit.language, "javascript");
        assert_eq!(unit.imports, vec![r#"import path from "path";"#]);

        let controller = &unit.types[0];
        assert_eq!(controller.extends_type.as_deref(), Some("Base"));
        let fields: Vec<(&str, Option<&str>, Option<&str>)> = controller
            .fields
            .iter()
            .map(|f| (f.name.as_str(), f.type_name.as_deref(), f.visibility.as_deref()))
            .collect();
        assert_eq!(
            fields,
            vec![
                ("#hits", Some("number"), Some("private")),
                ("routes", Some("Array"), None),
            ]
        );

        let handle = &controller.methods[0];
        let params: Vec<&str> = handle.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(params, vec!["req", "res", "...rest"]);
        assert_eq!(
            call_triples(&handle.method_calls),
            vec![
                ("handle", Some("Base"), Some("super"), 1),
                ("join", None, Some("path"), 1),
                ("log", Some("Controller"), Some("this"), 1),
                ("send", None, Some("res"), 1),
            ]
        );

        let helper = &unit.methods[0];
        let params: Vec<&str> = helper.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(params, vec!["a", "b", "c"]);

        let app = &unit.methods[1];
        assert_eq!(app.name, "App");
        assert_eq!(app.modifiers, vec!["const"]);
        assert_eq!(call_triples(&app.method_calls), vec![("useState", None, None, 1)]);

        assert_eq!(unit.fields[0].name, "express");
        assert_eq!(unit.fields[0].type_name.as_deref(), Some("requireResult"));
        assert_eq!(call_triples(&unit.method_calls), vec![("require", None, None, 1)]);
    }

    #[test]
    fn test_end_to_end_counts_repeated_direct_calls() {
        let code = r#"
class Foo {
  Bar() {
    const x = 1;
    baz();
    baz();
  }
}
"#;
        let unit = analyze(code, Dialect::TypeScript);
        let bar = &unit.types[0].methods[0];
        assert_eq!(bar.local_variables, vec!["x"]);
        assert_eq!(call_triples(&bar.method_calls), vec![("baz", None, None, 2)]);
    }
}
