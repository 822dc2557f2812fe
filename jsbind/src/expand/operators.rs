///
/// Builtin operator idioms: native JS operators, width-narrowed integer
/// arithmetic, comparator-backed relations, concatenation and listify.
///

use crate::coerce;
use crate::ir::BuiltinOperatorId;
use crate::js::{BinaryOp, Expr, UnaryOp};
use crate::source::{Span, Spanned};
use crate::support::PropertyReference;

use super::{Comparator, Invocation};

const IMUL: PropertyReference = PropertyReference::math("imul");

fn operand(inv: &Invocation<'_>) -> Result<Expr, Expr> {
    if let Some(garbage) = inv.reject(1, "Wrong number of operands for unary operator") {
        return Err(garbage);
    }
    Ok(inv.arg_safe(0, inv.span.right_edge()))
}

fn operands(inv: &Invocation<'_>) -> Result<(Expr, Expr), Expr> {
    if let Some(garbage) = inv.reject(2, "Wrong number of operands for binary operator") {
        return Err(garbage);
    }
    Ok((inv.arg_safe(0, inv.span.left_edge()), inv.arg_safe(1, inv.span.right_edge())))
}

pub(super) fn not(inv: &Invocation<'_>) -> Expr {
    match operand(inv) {
        Ok(a) => Expr::unary(inv.span, UnaryOp::Not, a),
        Err(garbage) => garbage,
    }
}

pub(super) fn is_null(inv: &Invocation<'_>) -> Expr {
    match operand(inv) {
        Ok(a) => Expr::binary(inv.span, a, BinaryOp::LooseEq, Expr::Null { span: inv.span.right_edge() }),
        Err(garbage) => garbage,
    }
}

pub(super) fn native(inv: &Invocation<'_>, op: BinaryOp) -> Expr {
    match operands(inv) {
        Ok((a, b)) => Expr::binary(inv.span, a, op, b),
        Err(garbage) => garbage,
    }
}

pub(super) fn arith(inv: &Invocation<'_>, op: BinaryOp, operator: BuiltinOperatorId) -> Expr {
    match operands(inv) {
        Ok((a, b)) => coerce::coerce(Expr::binary(inv.span, a, op, b), operator, inv.registry),
        Err(garbage) => garbage,
    }
}

pub(super) fn negate(inv: &Invocation<'_>, operator: BuiltinOperatorId) -> Expr {
    match operand(inv) {
        Ok(a) => coerce::coerce(Expr::unary(inv.span, UnaryOp::Neg, a), operator, inv.registry),
        Err(garbage) => garbage,
    }
}

pub(super) fn imul(inv: &Invocation<'_>) -> Expr {
    match operands(inv) {
        Ok((a, b)) => {
            let name = inv.require_property(&IMUL);
            Expr::call(inv.span, Expr::name(inv.span.left_edge(), name), vec![a, b])
        }
        Err(garbage) => garbage,
    }
}

pub(super) fn compare(inv: &Invocation<'_>, comparator: Comparator, op: BinaryOp) -> Expr {
    match operands(inv) {
        Ok((a, b)) => {
            let name = inv.require(&comparator.reference());
            let cmp = Expr::call(inv.span, Expr::name(inv.span.left_edge(), name), vec![a, b]);
            Expr::binary(inv.span, cmp, op, Expr::int(inv.span.right_edge(), 0))
        }
        Err(garbage) => garbage,
    }
}

pub(super) fn object_is(inv: &Invocation<'_>, negated: bool) -> Expr {
    match operands(inv) {
        Ok((a, b)) => {
            let left = inv.span.left_edge();
            let is = Expr::call(inv.span, Expr::dot(left, Expr::ident(left, "Object"), "is"), vec![a, b]);
            if negated { Expr::unary(inv.span, UnaryOp::Not, is) } else { is }
        }
        Err(garbage) => garbage,
    }
}

/// Left-associated `+` chain. A non-literal first operand goes through
/// `String(...)` so the chain concatenates instead of adding numbers.
pub(super) fn str_cat(inv: &Invocation<'_>) -> Expr {
    let Some(exprs) = inv.all_exprs() else {
        return inv.garbage("Cannot concatenate a spread argument");
    };
    let mut exprs = exprs.into_iter();
    let Some(first) = exprs.next() else {
        return Expr::string(inv.span, "");
    };
    let first = match first {
        s @ Expr::String { .. } => s,
        other => {
            let span = other.span();
            Expr::call(span, Expr::ident(span.left_edge(), "String"), vec![other])
        }
    };
    exprs.fold(first, |chain, next| {
        let span = Span::spanning([chain.span(), next.span()], inv.span);
        Expr::binary(span, chain, BinaryOp::Add, next)
    })
}

/// `Object.freeze([...])`
pub(super) fn listify(inv: &Invocation<'_>) -> Expr {
    let Some(elements) = inv.all_exprs() else {
        return inv.garbage("Cannot listify a spread argument");
    };
    let left = inv.span.left_edge();
    Expr::call(
        inv.span,
        Expr::dot(left, Expr::ident(left, "Object"), "freeze"),
        vec![Expr::Array { span: inv.span, elements }],
    )
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::super::{Comparator, Idiom};
    use crate::ir::BuiltinOperatorId;
    use crate::js::eval::eval_number;
    use crate::js::{BinaryOp, render_expression};
    use crate::support::ExternalReferenceRegistry;

    #[test]
    fn test_arity_enforced_when_strict() {
        let plus = Idiom::Arith { op: BinaryOp::Add, operator: BuiltinOperatorId::PlusIntInt };
        for args in [vec![], vec![int(1)], vec![int(1), int(2), int(3)]] {
            assert!(run(plus, &args, true, None).is_invalid(), "arity {}", args.len());
        }
        assert!(!run(plus, &[int(1), int(2)], true, None).is_invalid());
    }

    #[test]
    fn test_lenient_uses_placeholders() {
        let plus = Idiom::Arith { op: BinaryOp::Add, operator: BuiltinOperatorId::PlusIntInt };
        assert_eq!(render_expression(&run(plus, &[], false, None)), "_0 + _1 | 0");
    }

    #[test]
    fn test_plus_int_wraps_to_32_bits() {
        let plus = Idiom::Arith { op: BinaryOp::Add, operator: BuiltinOperatorId::PlusIntInt };
        let e = run(plus, &[int(2147483647), int(1)], true, None);
        assert_eq!(eval_number(&e), Some(-2147483648.0));
    }

    #[test]
    fn test_plus_int64_routes_through_clamp() {
        let registry = ExternalReferenceRegistry::new();
        let plus = Idiom::Arith { op: BinaryOp::Add, operator: BuiltinOperatorId::PlusIntInt64 };
        let e = run(plus, &[int(9007199254740993), int(9007199254740993)], true, Some(&registry));
        assert_eq!(render_expression(&e), "clampInt64__0(9007199254740993 + 9007199254740993)");
    }

    #[test]
    fn test_div_int_safe_truncates() {
        let div = Idiom::Arith { op: BinaryOp::Div, operator: BuiltinOperatorId::DivIntIntSafe };
        let e = run(div, &[int(7), int(2)], true, None);
        assert_eq!(render_expression(&e), "7 / 2 | 0");
        assert_eq!(eval_number(&e), Some(3.0));

        let e = run(div, &[int(-7), int(2)], true, None);
        assert_eq!(eval_number(&e), Some(-3.0));
    }

    #[test]
    fn test_imul_is_pooled() {
        let registry = ExternalReferenceRegistry::new();
        let e = run(Idiom::Imul, &[int(65536), int(65536)], true, Some(&registry));
        assert_eq!(render_expression(&e), "imul__0(65536, 65536)");
        assert_eq!(eval_number(&e), Some(0.0));
        run(Idiom::Imul, &[id("a"), id("b")], true, Some(&registry));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_comparator_relations() {
        let lt = Idiom::Compare { comparator: Comparator::Float, op: BinaryOp::Lt };
        assert_eq!(render(lt, &[id("a"), id("b")]), "cmpFloat(a, b) < 0");
        let ge = Idiom::Compare { comparator: Comparator::String, op: BinaryOp::Ge };
        assert_eq!(render(ge, &[id("a"), id("b")]), "cmpString(a, b) >= 0");
    }

    #[test]
    fn test_object_is() {
        assert_eq!(render(Idiom::ObjectIs { negated: false }, &[id("a"), id("b")]), "Object.is(a, b)");
        assert_eq!(render(Idiom::ObjectIs { negated: true }, &[id("a"), id("b")]), "!Object.is(a, b)");
    }

    #[test]
    fn test_is_null_and_not() {
        assert_eq!(render(Idiom::IsNull, &[id("x")]), "x == null");
        assert_eq!(render(Idiom::Not, &[id("x")]), "!x");
    }

    #[test]
    fn test_str_cat() {
        assert_eq!(render(Idiom::StrCat, &[]), r#""""#);
        assert_eq!(render(Idiom::StrCat, &[string("a"), id("b"), id("c")]), r#""a" + b + c"#);
        assert_eq!(render(Idiom::StrCat, &[int(1), string("px")]), r#"String(1) + "px""#);
    }

    #[test]
    fn test_listify_freezes() {
        insta::assert_snapshot!(render(Idiom::Listify, &[int(1), id("x")]), @"Object.freeze([1, x])");
    }
}
