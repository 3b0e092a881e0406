/// PHP extractor: builds the structural model of one PHP source file
///
/// This module is organized into focused sub-modules:
/// - helpers: modifiers, attributes, variable names and value inference
/// - types: classes, interfaces, traits and enums with trait mixins
/// - members: properties, constants, enum cases, methods and parameters
/// - calls: body analysis (assigned locals, function, member and scoped calls)
mod calls;
mod helpers;
mod members;
mod types;

use crate::extractors::base::{BaseExtractor, SourceUnit};
use helpers::TYPE_DECLARATION_KINDS;
use tracing::debug;
use tree_sitter::{Node, Tree};

pub struct PhpExtractor {
    base: BaseExtractor,
}

impl PhpExtractor {
    pub fn new(base: BaseExtractor) -> Self {
        Self { base }
    }

    /// Analyze the whole file
    pub fn analyze(&self, tree: &Tree) -> SourceUnit {
        let base = &self.base;
        let root = tree.root_node();
        let mut unit = SourceUnit::new(&base.file_path, "php");

        unit.package_name = self.namespace(root);
        unit.imports = base
            .find_all_descendants(&root, "namespace_use_declaration")
            .iter()
            .map(|import| base.normalize_inline(import))
            .collect();

        for declaration in
            base.top_level_declarations(&root, TYPE_DECLARATION_KINDS, types::BODY_KINDS)
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

        let file_context = calls::TypeContext::default();
        for function in base.find_all_descendants(&root, "function_definition") {
            if helpers::is_inside(&function, TYPE_DECLARATION_KINDS) {
                continue;
            }
            let extracted = base
                .isolate(
                    || format!("function at byte {}", function.start_byte()),
                    || members::extract_function(base, function, &file_context),
                )
                .flatten();
            if let Some(method) = extracted {
                unit.methods.push(method);
            }
        }

        for constant in base.find_all_descendants(&root, "const_declaration") {
            if !helpers::is_inside(&constant, TYPE_DECLARATION_KINDS) {
                unit.fields.extend(members::extract_constants(base, constant));
            }
        }

        unit.method_calls = base
            .isolate(|| "file-level calls".to_string(), || calls::file_calls(base, root))
            .unwrap_or_default();

        unit.diagnostics = base.take_diagnostics();
        debug!(
            "Extracted {} top-level PHP types and {} functions from {}",
            unit.types.len(),
            unit.methods.len(),
            base.file_path
        );
        unit
    }

    /// Name of the first `namespace` declaration
    fn namespace(&self, root: Node) -> Option<String> {
        let namespace = self.base.find_first_descendant(&root, "namespace_definition")?;
        self.base.get_field_text(&namespace, "name")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::base::{CallSite, TypeKind};
    use tree_sitter::Parser;

    fn analyze(code: &str) -> SourceUnit {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_php::LANGUAGE_PHP.into())
            .unwrap();
        let tree = parser.parse(code, None).unwrap();
        let mut base = BaseExtractor::new("php".into(), "Invoice.php".into(), code.into());
        base.track_arg_counts = true;
        PhpExtractor::new(base).analyze(&tree)
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

    const BILLING: &str = r#"<?php
namespace App\Billing;

use App\Models\Customer;
use Psr\Log\LoggerInterface as Logger;

const VERSION = "1.2";

interface Payable extends Countable, JsonSerializable
{
    public function pay(int $amount): bool;
    function total(): float;
}

trait Auditable
{
    protected array $audit = [];

    public function record(string $event): void
    {
        log_event($event, $this->audit);
    }
}

#[Entity(table: "invoices")]
final class Invoice extends Document implements Payable, Stringable
{
    use Auditable, SoftDeletes;

    public const STATUS = 'open';
    private static int $count = 0;
    protected $lines = [];

    public function __construct(private Gateway $gateway, public readonly string $number)
    {
        parent::__construct($number);
    }

    #[Override]
    public function pay(int $amount): bool
    {
        $calculator = new TaxCalculator();
        $tax = $calculator->compute($amount, 0.2);
        $this->gateway->charge($amount);
        $this->gateway->charge($tax);
        $this->notify("paid");
        Customer::find($this->number)?->settle($amount);
        return true;
    }

    function refund(): void {}

    public static function create(string ...$lines): static
    {
        return new static();
    }
}

enum Status: string implements HasLabel
{
    use Labels;

    case Open = 'open';
    case Paid = 'paid';

    public function label(): string
    {
        return ucfirst($this->value);
    }
}

function helper(Invoice $invoice, $amount = 0)
{
    $total = array_sum([$amount]);
    return $invoice->pay($total);
}

Invoice::create();
bootstrap(__DIR__, true);
"#;

    #[test]
    fn test_namespace_imports_and_file_level_members() {
        let unit = analyze(BILLING);
        assert_eq!(unit.language, "php");
        assert_eq!(unit.package_name.as_deref(), Some("App\\Billing"));
        assert_eq!(
            unit.imports,
            vec![
                "use App\\Models\\Customer;",
                "use Psr\\Log\\LoggerInterface as Logger;",
            ]
        );

        assert_eq!(unit.fields.len(), 1);
        assert_eq!(unit.fields[0].name, "VERSION");
        assert_eq!(unit.fields[0].type_name.as_deref(), Some("string"));
        assert_eq!(unit.fields[0].modifiers, vec!["const"]);

        let names: Vec<&str> = unit.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["helper"], "methods stay with their types");

        assert_eq!(
            call_tuples(&unit.method_calls),
            vec![
                ("bootstrap", None, None, Some(2), 1),
                ("create", Some("Invoice"), None, Some(0), 1),
            ]
        );
    }

    #[test]
    fn test_type_kinds_and_headers() {
        let unit = analyze(BILLING);
        let kinds: Vec<(TypeKind, &str)> = unit
            .types
            .iter()
            .map(|t| (t.kind, t.name.as_str()))
            .collect();
        assert_eq!(
            kinds,
            vec![
                (TypeKind::Interface, "Payable"),
                (TypeKind::Trait, "Auditable"),
                (TypeKind::Class, "Invoice"),
                (TypeKind::Enum, "Status"),
            ]
        );

        let payable = &unit.types[0];
        assert_eq!(payable.implements_interfaces, vec!["Countable", "JsonSerializable"]);
        assert_eq!(payable.extends_type, None);

        let invoice = &unit.types[2];
        assert_eq!(invoice.extends_type.as_deref(), Some("Document"));
        assert_eq!(invoice.implements_interfaces, vec!["Payable", "Stringable"]);
        assert_eq!(invoice.modifiers, vec!["final"]);
        assert_eq!(invoice.visibility, None);
        assert_eq!(invoice.annotations, vec!["#[Entity(table: \"invoices\")]"]);
        assert_eq!(invoice.mixins, vec!["Auditable", "SoftDeletes"]);

        let status = &unit.types[3];
        assert_eq!(status.extends_type.as_deref(), Some("string"));
        assert_eq!(status.implements_interfaces, vec!["HasLabel"]);
        assert_eq!(status.mixins, vec!["Labels"]);
    }

    #[test]
    fn test_properties_constants_and_promoted_parameters() {
        let unit = analyze(BILLING);
        let invoice = &unit.types[2];
        let fields: Vec<(&str, Option<&str>, Option<&str>)> = invoice
            .fields
            .iter()
            .map(|f| (f.name.as_str(), f.type_name.as_deref(), f.visibility.as_deref()))
            .collect();
        assert_eq!(
            fields,
            vec![
                ("STATUS", Some("string"), Some("public")),
                ("count", Some("int"), Some("private")),
                ("lines", Some("array"), Some("protected")),
                ("gateway", Some("Gateway"), Some("private")),
                ("number", Some("string"), Some("public")),
            ]
        );
        assert_eq!(invoice.fields[0].modifiers, vec!["public", "const"]);
        assert_eq!(invoice.fields[1].modifiers, vec!["private", "static"]);
        assert_eq!(invoice.fields[4].modifiers, vec!["public", "readonly"]);

        let auditable = &unit.types[1];
        assert_eq!(auditable.fields[0].name, "audit");
        assert_eq!(auditable.fields[0].type_name.as_deref(), Some("array"));
    }

    #[test]
    fn test_enum_cases_are_fields() {
        let unit = analyze(BILLING);
        let status = &unit.types[3];
        let cases: Vec<(&str, Option<&str>)> = status
            .fields
            .iter()
            .map(|f| (f.name.as_str(), f.type_name.as_deref()))
            .collect();
        assert_eq!(cases, vec![("Open", Some("string")), ("Paid", Some("string"))]);
        assert_eq!(status.fields[0].modifiers, vec!["case"]);

        let label = &status.methods[0];
        assert_eq!(label.return_type.as_deref(), Some("string"));
        assert_eq!(
            call_tuples(&label.method_calls),
            vec![("ucfirst", None, None, Some(1), 1)]
        );
    }

    #[test]
    fn test_method_signatures_and_visibility() {
        let unit = analyze(BILLING);
        let invoice = &unit.types[2];
        let names: Vec<&str> = invoice.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["__construct", "pay", "refund", "create"]);

        let constructor = &invoice.methods[0];
        let params: Vec<(&str, Option<&str>)> = constructor
            .parameters
            .iter()
            .map(|p| (p.name.as_str(), p.type_name.as_deref()))
            .collect();
        assert_eq!(params, vec![("gateway", Some("Gateway")), ("number", Some("string"))]);
        assert_eq!(
            call_tuples(&constructor.method_calls),
            vec![("__construct", Some("Document"), None, Some(1), 1)]
        );

        let pay = &invoice.methods[1];
        assert_eq!(pay.visibility.as_deref(), Some("public"));
        assert_eq!(pay.return_type.as_deref(), Some("bool"));
        assert_eq!(pay.annotations, vec!["#[Override]"]);

        let refund = &invoice.methods[2];
        assert_eq!(refund.visibility, None, "no keyword, no visibility");
        assert_eq!(refund.return_type.as_deref(), Some("void"));

        let create = &invoice.methods[3];
        assert_eq!(create.modifiers, vec!["public", "static"]);
        assert_eq!(create.return_type.as_deref(), Some("static"));
        assert_eq!(create.parameters[0].name, "...lines");
        assert_eq!(create.parameters[0].type_name.as_deref(), Some("string"));

        let payable = &unit.types[0];
        for method in &payable.methods {
            assert_eq!(method.visibility.as_deref(), Some("public"));
            assert!(method.modifiers.contains(&"abstract".to_string()));
        }
    }

    #[test]
    fn test_call_sites_resolve_receivers() {
        let unit = analyze(BILLING);
        let pay = &unit.types[2].methods[1];
        assert_eq!(pay.local_variables, vec!["calculator", "tax"]);
        assert_eq!(
            call_tuples(&pay.method_calls),
            vec![
                ("charge", Some("Gateway"), Some("gateway"), Some(1), 2),
                ("compute", Some("TaxCalculator"), Some("calculator"), Some(2), 1),
                ("find", Some("Customer"), None, Some(1), 1),
                ("notify", Some("Invoice"), Some("this"), Some(1), 1),
                ("settle", None, None, Some(1), 1),
            ]
        );

        let helper = &unit.methods[0];
        assert_eq!(helper.parameters[1].name, "amount");
        assert_eq!(helper.parameters[1].type_name, None);
        assert_eq!(
            call_tuples(&helper.method_calls),
            vec![
                ("array_sum", None, None, Some(1), 1),
                ("pay", Some("Invoice"), Some("invoice"), Some(1), 1),
            ]
        );
    }

    #[test]
    fn test_trait_methods_see_trait_properties() {
        let code = r#"<?php
trait Cached
{
    private Store $store;

    public function warm(): void
    {
        $this->store->put("k", 1);
        self::flush();
    }
}
"#;
        let unit = analyze(code);
        let warm = &unit.types[0].methods[0];
        assert_eq!(
            call_tuples(&warm.method_calls),
            vec![
                ("flush", Some("Cached"), None, Some(0), 1),
                ("put", Some("Store"), Some("store"), Some(2), 1),
            ]
        );
    }

    #[test]
    fn test_var_properties_are_public() {
        let code = "<?php\nclass Legacy { var $name = \"x\"; }\n";
        let unit = analyze(code);
        let field = &unit.types[0].fields[0];
        assert_eq!(field.name, "name");
        assert_eq!(field.visibility.as_deref(), Some("public"));
        assert_eq!(field.type_name.as_deref(), Some("string"));
    }

    #[test]
    fn test_analysis_is_deterministic() {
        assert_eq!(analyze(BILLING), analyze(BILLING));
    }
}
