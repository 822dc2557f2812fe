///
/// Builtin Operator Table
///
/// Maps every `BuiltinOperatorId` to its `SupportCode`. The mapping is an
/// exhaustive match, so a new operator without a resolution fails to
/// compile. Tables are built once per coroutine strategy and never change
/// afterwards.
///
/// Documentation output swaps a few operators for readable variants:
/// - Listify: a plain array literal
/// - Print: `globalThis.console.log`
/// - StrCat: a template literal
///

use std::sync::LazyLock;

use indexmap::IndexMap;
use tracing::trace;

use crate::coerce;
use crate::error::BackendError;
use crate::expand::{Comparator, Idiom};
use crate::ir::{BuiltinOperatorId, CoroutineStrategy, Genre};
use crate::js::BinaryOp;
use crate::support::{ExternalReference, InlineExpansion, PropertyReference, Requirement, SupportCode};

type OperatorTable = IndexMap<BuiltinOperatorId, SupportCode>;

static GENERATOR_TABLE: LazyLock<OperatorTable> =
    LazyLock::new(|| build_table(CoroutineStrategy::TranslateToGenerator));

static ADAPTING_TABLE: LazyLock<OperatorTable> =
    LazyLock::new(|| build_table(CoroutineStrategy::AdaptGenerators));

static DOCUMENTATION_OVERRIDES: LazyLock<OperatorTable> = LazyLock::new(|| {
    use BuiltinOperatorId as Op;
    [(Op::Listify, Idiom::DocsListify), (Op::Print, Idiom::DocsPrint), (Op::StrCat, Idiom::DocsCat)]
        .into_iter()
        .map(|(op, idiom)| (op, SupportCode::Inline(InlineExpansion::for_operator(op, idiom))))
        .collect()
});

fn build_table(strategy: CoroutineStrategy) -> OperatorTable {
    BuiltinOperatorId::ALL
        .iter()
        .filter_map(|&id| builtin_support(id, strategy).map(|code| (id, code)))
        .collect()
}

/// Resolution for one operator, or `None` when the strategy eliminates it.
pub fn resolve(id: BuiltinOperatorId, genre: Genre, strategy: CoroutineStrategy) -> Option<&'static SupportCode> {
    if genre == Genre::Documentation {
        if let Some(code) = DOCUMENTATION_OVERRIDES.get(&id) {
            return Some(code);
        }
    }
    let table = match strategy {
        CoroutineStrategy::TranslateToGenerator => &*GENERATOR_TABLE,
        CoroutineStrategy::AdaptGenerators => &*ADAPTING_TABLE,
    };
    let code = table.get(&id);
    if code.is_none() {
        trace!(operator = %id, %strategy, "operator has no resolution");
    }
    code
}

/// Like `resolve`, but an eliminated operator is an internal error.
pub fn resolve_strict(
    id: BuiltinOperatorId,
    genre: Genre,
    strategy: CoroutineStrategy,
) -> Result<&'static SupportCode, BackendError> {
    resolve(id, genre, strategy).ok_or(BackendError::UnsupportedOperator { operator: id, strategy })
}

/// Operators removed before code generation. Non-null assertions are
/// stripped by the translator; the generator adapters go away when
/// coroutines become generators.
pub fn intentionally_absent(strategy: CoroutineStrategy) -> &'static [BuiltinOperatorId] {
    match strategy {
        CoroutineStrategy::TranslateToGenerator => &[
            BuiltinOperatorId::NotNull,
            BuiltinOperatorId::AdaptGeneratorFn,
            BuiltinOperatorId::SafeAdaptGeneratorFn,
        ],
        CoroutineStrategy::AdaptGenerators => &[BuiltinOperatorId::NotNull],
    }
}

fn inline(id: BuiltinOperatorId, idiom: Idiom) -> Option<SupportCode> {
    Some(SupportCode::Inline(InlineExpansion::for_operator(id, idiom)))
}

/// Native operator narrowed to the operator's integer width.
fn narrowed(id: BuiltinOperatorId, op: BinaryOp) -> Option<SupportCode> {
    let mut expansion = InlineExpansion::for_operator(id, Idiom::Arith { op, operator: id });
    expansion.requires.extend(coerce::requirements(id));
    Some(SupportCode::Inline(expansion))
}

fn negated(id: BuiltinOperatorId) -> Option<SupportCode> {
    let mut expansion = InlineExpansion::for_operator(id, Idiom::Negate { operator: id });
    expansion.requires.extend(coerce::requirements(id));
    Some(SupportCode::Inline(expansion))
}

fn compared(id: BuiltinOperatorId, comparator: Comparator, op: BinaryOp) -> Option<SupportCode> {
    inline(id, Idiom::Compare { comparator, op })
}

fn external(id: BuiltinOperatorId) -> Option<SupportCode> {
    Some(SupportCode::External(ExternalReference::for_operator(id, id.exported_name())))
}

fn builtin_support(id: BuiltinOperatorId, strategy: CoroutineStrategy) -> Option<SupportCode> {
    use BuiltinOperatorId as Op;
    match id {
        // ========================================
        // Logic and nullness
        // ========================================
        Op::BooleanNegation => inline(id, Idiom::Not),
        Op::BitwiseAnd => inline(id, Idiom::Native(BinaryOp::BitAnd)),
        Op::BitwiseOr => inline(id, Idiom::Native(BinaryOp::BitOr)),
        Op::IsNull => inline(id, Idiom::IsNull),
        Op::NotNull => None,

        // ========================================
        // Division and remainder
        // ========================================
        Op::DivFltFlt => inline(id, Idiom::Native(BinaryOp::Div)),
        Op::ModFltFlt => inline(id, Idiom::Native(BinaryOp::Mod)),
        // Raise on a zero divisor, so they live in the support library.
        Op::DivIntInt | Op::ModIntInt => external(id),
        Op::ModIntIntSafe => external(Op::ModIntInt),
        Op::DivIntIntSafe | Op::DivIntInt64 | Op::DivIntInt64Safe => narrowed(id, BinaryOp::Div),
        Op::ModIntInt64 | Op::ModIntInt64Safe => narrowed(id, BinaryOp::Mod),

        // ========================================
        // Arithmetic
        // ========================================
        Op::MinusFlt | Op::MinusInt | Op::MinusInt64 => negated(id),
        Op::PlusFltFlt => inline(id, Idiom::Native(BinaryOp::Add)),
        Op::MinusFltFlt => inline(id, Idiom::Native(BinaryOp::Sub)),
        Op::TimesFltFlt => inline(id, Idiom::Native(BinaryOp::Mul)),
        Op::PowFltFlt => inline(id, Idiom::Native(BinaryOp::Pow)),
        Op::PlusIntInt | Op::PlusIntInt64 => narrowed(id, BinaryOp::Add),
        Op::MinusIntInt | Op::MinusIntInt64 => narrowed(id, BinaryOp::Sub),
        Op::TimesIntInt64 => narrowed(id, BinaryOp::Mul),
        Op::TimesIntInt => Some(SupportCode::Inline(
            InlineExpansion::for_operator(id, Idiom::Imul)
                .requiring(Requirement::Property(PropertyReference::math("imul"))),
        )),

        // ========================================
        // Comparison
        // ========================================
        Op::EqIntInt => inline(id, Idiom::Native(BinaryOp::StrictEq)),
        Op::NeIntInt => inline(id, Idiom::Native(BinaryOp::StrictNe)),
        Op::LtIntInt => inline(id, Idiom::Native(BinaryOp::Lt)),
        Op::LeIntInt => inline(id, Idiom::Native(BinaryOp::Le)),
        Op::GtIntInt => inline(id, Idiom::Native(BinaryOp::Gt)),
        Op::GeIntInt => inline(id, Idiom::Native(BinaryOp::Ge)),
        Op::CmpIntInt => inline(id, Idiom::Native(BinaryOp::Sub)),

        Op::EqFltFlt => compared(id, Comparator::Float, BinaryOp::StrictEq),
        Op::NeFltFlt => compared(id, Comparator::Float, BinaryOp::StrictNe),
        Op::LtFltFlt => compared(id, Comparator::Float, BinaryOp::Lt),
        Op::LeFltFlt => compared(id, Comparator::Float, BinaryOp::Le),
        Op::GtFltFlt => compared(id, Comparator::Float, BinaryOp::Gt),
        Op::GeFltFlt => compared(id, Comparator::Float, BinaryOp::Ge),

        Op::EqStrStr => inline(id, Idiom::Native(BinaryOp::StrictEq)),
        Op::NeStrStr => inline(id, Idiom::Native(BinaryOp::StrictNe)),
        Op::LtStrStr => compared(id, Comparator::String, BinaryOp::Lt),
        Op::LeStrStr => compared(id, Comparator::String, BinaryOp::Le),
        Op::GtStrStr => compared(id, Comparator::String, BinaryOp::Gt),
        Op::GeStrStr => compared(id, Comparator::String, BinaryOp::Ge),

        Op::EqGeneric => inline(id, Idiom::ObjectIs { negated: false }),
        Op::NeGeneric => inline(id, Idiom::ObjectIs { negated: true }),
        Op::LtGeneric => compared(id, Comparator::Generic, BinaryOp::Lt),
        Op::LeGeneric => compared(id, Comparator::Generic, BinaryOp::Le),
        Op::GtGeneric => compared(id, Comparator::Generic, BinaryOp::Gt),
        Op::GeGeneric => compared(id, Comparator::Generic, BinaryOp::Ge),

        Op::CmpFltFlt => Some(SupportCode::External(Comparator::Float.reference())),
        Op::CmpStrStr => Some(SupportCode::External(Comparator::String.reference())),
        Op::CmpGeneric => Some(SupportCode::External(Comparator::Generic.reference())),

        // ========================================
        // Control, output and sequences
        // ========================================
        Op::Bubble | Op::Panic | Op::Print => external(id),
        Op::Async => Some(SupportCode::External(ExternalReference::for_operator(id, "runAsync"))),
        Op::StrCat => inline(id, Idiom::StrCat),
        Op::Listify => inline(id, Idiom::Listify),

        // ========================================
        // Generator adaptation
        // ========================================
        Op::AdaptGeneratorFn | Op::SafeAdaptGeneratorFn => match strategy {
            CoroutineStrategy::TranslateToGenerator => None,
            CoroutineStrategy::AdaptGenerators => external(id),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::js::eval::eval_number;
    use crate::js::{Expr, Tree, render_expression, render_statements};
    use crate::source::Span;
    use crate::support::ExternalReferenceRegistry;

    const LIBRARY: Genre = Genre::Library;
    const GENERATORS: CoroutineStrategy = CoroutineStrategy::TranslateToGenerator;

    fn num(v: i64) -> Tree {
        Tree::Expr(Expr::int(Span::new(0, 1, 0), v))
    }

    fn name(n: &str) -> Tree {
        Tree::Expr(Expr::ident(Span::new(0, n.len() as u32, 0), n))
    }

    fn call(id: BuiltinOperatorId, genre: Genre, args: &[Tree], registry: Option<&ExternalReferenceRegistry>) -> Expr {
        let code = resolve(id, genre, GENERATORS).expect("operator resolves");
        code.invoke(Span::new(10, 20, 0), args, genre, registry)
    }

    #[test]
    fn test_not_null_has_no_resolution() {
        for strategy in [CoroutineStrategy::TranslateToGenerator, CoroutineStrategy::AdaptGenerators] {
            assert!(resolve(BuiltinOperatorId::NotNull, LIBRARY, strategy).is_none());
            assert!(resolve(BuiltinOperatorId::NotNull, Genre::Documentation, strategy).is_none());
            let err = resolve_strict(BuiltinOperatorId::NotNull, LIBRARY, strategy).unwrap_err();
            assert!(matches!(err, BackendError::UnsupportedOperator { operator: BuiltinOperatorId::NotNull, .. }));
        }
    }

    #[test]
    fn test_every_operator_resolves_or_is_documented_absent() {
        for strategy in [CoroutineStrategy::TranslateToGenerator, CoroutineStrategy::AdaptGenerators] {
            let absent = intentionally_absent(strategy);
            for &id in BuiltinOperatorId::ALL {
                let resolved = resolve(id, LIBRARY, strategy).is_some();
                assert_eq!(resolved, !absent.contains(&id), "{} under {}", id, strategy);
            }
        }
    }

    #[test]
    fn test_resolve_strict_reports_eliminated_operator() {
        let err = resolve_strict(BuiltinOperatorId::AdaptGeneratorFn, LIBRARY, GENERATORS).unwrap_err();
        assert!(err.is_internal());
        assert!(resolve_strict(BuiltinOperatorId::AdaptGeneratorFn, LIBRARY, CoroutineStrategy::AdaptGenerators).is_ok());
    }

    #[test]
    fn test_resolution_carries_operator_id() {
        for &id in BuiltinOperatorId::ALL {
            if let Some(code) = resolve(id, LIBRARY, CoroutineStrategy::AdaptGenerators) {
                assert!(code.operator().is_some(), "{} lost its operator id", id);
            }
        }
    }

    #[test]
    fn test_plus_int_wraps_to_32_bits() {
        let e = call(BuiltinOperatorId::PlusIntInt, LIBRARY, &[num(i32::MAX as i64), num(1)], None);
        assert_eq!(eval_number(&e), Some(i32::MIN as f64));
    }

    #[test]
    fn test_plus_int64_routes_through_clamp() {
        let registry = ExternalReferenceRegistry::new();
        let big = 1_i64 << 53;
        let e = call(BuiltinOperatorId::PlusIntInt64, LIBRARY, &[num(big), num(1)], Some(&registry));
        assert_eq!(render_expression(&e), format!("clampInt64__0({} + 1)", big));
    }

    #[test]
    fn test_div_int_safe_truncates() {
        let e = call(BuiltinOperatorId::DivIntIntSafe, LIBRARY, &[num(7), num(2)], None);
        assert_eq!(render_expression(&e), "7 / 2 | 0");
        assert_eq!(eval_number(&e), Some(3.0));

        let e = call(BuiltinOperatorId::DivIntIntSafe, LIBRARY, &[num(-7), num(2)], None);
        assert_eq!(eval_number(&e), Some(-3.0));
    }

    #[test]
    fn test_times_int_pools_imul() {
        let registry = ExternalReferenceRegistry::new();
        let a = call(BuiltinOperatorId::TimesIntInt, LIBRARY, &[name("a"), name("b")], Some(&registry));
        let b = call(BuiltinOperatorId::TimesIntInt, LIBRARY, &[name("c"), name("d")], Some(&registry));
        assert_eq!(render_expression(&a), "imul__0(a, b)");
        assert_eq!(render_expression(&b), "imul__0(c, d)");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_arity_enforced_for_binary_rules() {
        for args in [&[][..], &[num(1)][..], &[num(1), num(2), num(3)][..]] {
            let e = call(BuiltinOperatorId::PlusIntInt, LIBRARY, args, None);
            assert!(e.is_invalid());
        }
    }

    #[test]
    fn test_mod_int_safe_shares_mod_int_import() {
        let registry = ExternalReferenceRegistry::new();
        call(BuiltinOperatorId::ModIntInt, LIBRARY, &[name("a"), name("b")], Some(&registry));
        let e = call(BuiltinOperatorId::ModIntIntSafe, LIBRARY, &[name("a"), name("b")], Some(&registry));
        assert_eq!(render_expression(&e), "modIntInt__0(a, b)");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_comparisons() {
        let args = [name("a"), name("b")];
        let render = |id| render_expression(&call(id, LIBRARY, &args, None));
        assert_eq!(render(BuiltinOperatorId::LtIntInt), "a < b");
        assert_eq!(render(BuiltinOperatorId::LtFltFlt), "cmpFloat(a, b) < 0");
        assert_eq!(render(BuiltinOperatorId::EqStrStr), "a === b");
        assert_eq!(render(BuiltinOperatorId::GeStrStr), "cmpString(a, b) >= 0");
        assert_eq!(render(BuiltinOperatorId::NeGeneric), "!Object.is(a, b)");
        assert_eq!(render(BuiltinOperatorId::CmpIntInt), "a - b");
        assert_eq!(render(BuiltinOperatorId::CmpGeneric), "cmpGeneric(a, b)");
    }

    #[test]
    fn test_documentation_string_cat_is_template() {
        let args = [
            Tree::Expr(Expr::string(Span::new(0, 9, 0), "Hello, ")),
            name("name"),
            Tree::Expr(Expr::string(Span::new(0, 3, 0), "!")),
        ];
        let docs = call(BuiltinOperatorId::StrCat, Genre::Documentation, &args, None);
        assert_eq!(render_expression(&docs), "`Hello, ${name}!`");

        let library = call(BuiltinOperatorId::StrCat, LIBRARY, &args, None);
        assert_eq!(render_expression(&library), r#""Hello, " + name + "!""#);
    }

    #[test]
    fn test_documentation_overrides_keep_identity() {
        let docs = resolve(BuiltinOperatorId::Listify, Genre::Documentation, GENERATORS);
        let library = resolve(BuiltinOperatorId::Listify, LIBRARY, GENERATORS);
        assert_eq!(docs, library);
        assert_eq!(docs.map(SupportCode::render_standalone).as_deref(), Some("[]"));
        assert_eq!(library.map(SupportCode::render_standalone).as_deref(), Some("Object.freeze([])"));
    }

    #[test]
    fn test_external_operators() {
        let registry = ExternalReferenceRegistry::new();
        call(BuiltinOperatorId::Bubble, LIBRARY, &[], Some(&registry));
        call(BuiltinOperatorId::Async, LIBRARY, &[name("f")], Some(&registry));
        insta::assert_snapshot!(
            render_statements(&registry.imports(&Default::default())),
            @r#"import { bubble as bubble__0, runAsync as runAsync__1 } from "jsbind-core";"#
        );
    }
}
