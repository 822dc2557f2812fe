///
/// jsbind - Builtin binding layer of the JavaScript backend
///
/// Decides, for every builtin operator and standard-library member the IR
/// can contain, whether to expand it inline at the call site or to
/// reference a symbol exported by the runtime support library. It includes:
///
/// - source: Spans and source files
/// - ir: Operator ids, genres, types and type shapes handed to the backend
/// - js: The target AST, identifier names and a compact renderer
/// - support: Support code resolutions and the external reference registry
/// - expand: Idiom expanders
/// - coerce: Integer width narrowing
/// - operators: The builtin operator table
/// - connected: Connected-key resolution for values, types and casts
/// - members: `toJSON` synthesis for JSON-tagged types
/// - host: Host runtime version gate
///
/// Entry points:
/// - `operators::resolve`: Support code for a builtin operator
/// - `connected::resolve_value`: Support code for a connected key
/// - `SupportCode::invoke`: Translate one call site
/// - `members::adjust_members`: Add synthesized members to a type
///

pub mod coerce;
pub mod config;
pub mod connected;
pub mod diagnostic;
pub mod error;
pub mod expand;
pub mod host;
pub mod ir;
pub mod js;
pub mod members;
pub mod operators;
pub mod source;
pub mod support;

pub use config::BackendConfig;
pub use diagnostic::{DiagnosticReporter, collect_invalid};
pub use error::BackendError;
pub use ir::{BuiltinOperatorId, CoroutineStrategy, Genre};
pub use source::{SourceFile, Span};
pub use support::{ExternalReferenceRegistry, SupportCode};

#[test]
fn test_translate_unit() {
    use js::{Expr, Tree, render_expression, render_statements};
    use source::Spanned;

    let source = SourceFile::new("main.tmpl", "let n = a * b + xs.length;");
    let registry = ExternalReferenceRegistry::new();
    let span = |start, end| Span::new(start, end, 0);
    let var = |start: u32, name: &str| Tree::Expr(Expr::ident(span(start, start + name.len() as u32), name));

    let times = operators::resolve(BuiltinOperatorId::TimesIntInt, Genre::Library, CoroutineStrategy::default())
        .unwrap()
        .invoke(span(8, 13), &[var(8, "a"), var(12, "b")], Genre::Library, Some(&registry));
    let joined = connected::resolve_value("Listed::join", Genre::Library)
        .unwrap()
        .invoke(span(16, 25), &[var(16, "xs")], Genre::Library, Some(&registry));
    let plus = operators::resolve(BuiltinOperatorId::PlusIntInt, Genre::Library, CoroutineStrategy::default())
        .unwrap()
        .invoke(span(8, 25), &[Tree::Expr(times), Tree::Expr(joined)], Genre::Library, Some(&registry));

    assert!(collect_invalid(&plus).is_empty());
    assert_eq!(render_expression(&plus), "imul__0(a, b) + listedJoin__1(xs) | 0");
    assert_eq!(source.line_col(plus.span().start), (1, 9));

    let imports = render_statements(&registry.imports(&BackendConfig::default()));
    assert_eq!(
        imports,
        "import { listedJoin as listedJoin__1 } from \"jsbind-core\";\nconst imul__0 = globalThis.Math.imul;"
    );
}
