///
/// String, StringIndex and StringBuilder idioms.
///
/// String indices are plain UTF-16 offsets, so index arithmetic and
/// comparison use native operators. A StringBuilder is a one-element array
/// whose element accumulates the text.
///

use crate::js::{BinaryOp, Expr, Tree, UnaryOp};
use crate::source::{Span, Spanned};

use super::Invocation;

/// `x.toString(...rest)`
pub(super) fn to_string(inv: &Invocation<'_>) -> Expr {
    if inv.strict && (inv.args.is_empty() || inv.all_exprs().is_none()) {
        return inv.garbage("Wrong arguments for toString idiom expander");
    }
    let receiver = inv.arg_safe(0, inv.span.left_edge());
    let rest = inv.all_exprs().map(|exprs| exprs.into_iter().skip(1).collect()).unwrap_or_default();
    Expr::call(inv.span, Expr::dot(inv.span, receiver, "toString"), rest)
}

/// `!x`
pub(super) fn is_empty(inv: &Invocation<'_>) -> Expr {
    if let Some(garbage) = inv.reject(1, "String::isEmpty needs one argument") {
        return garbage;
    }
    Expr::unary(inv.span, UnaryOp::Not, inv.arg_or(0, "x", inv.span))
}

/// `x.length`
pub(super) fn length(inv: &Invocation<'_>) -> Expr {
    if let Some(garbage) = inv.reject(1, "Wrong arguments for length idiom expander") {
        return garbage;
    }
    Expr::dot(inv.span, inv.arg_or(0, "x", inv.span), "length")
}

/// `0`
pub(super) fn begin(inv: &Invocation<'_>) -> Expr {
    if let Some(garbage) = inv.reject(0, "Wrong arguments for String::begin") {
        return garbage;
    }
    Expr::int(inv.span, 0)
}

/// `str.length > idx`
pub(super) fn has_index(inv: &Invocation<'_>) -> Expr {
    if let Some(garbage) = inv.reject(2, "Wrong arguments for String::hasIndex") {
        return garbage;
    }
    let str_span = inv.arg_span(0, inv.span.left_edge());
    let length = Expr::dot(str_span, inv.arg_or(0, "str", str_span), "length");
    Expr::binary(inv.span, length, BinaryOp::Gt, inv.arg_or(1, "idx", inv.span.right_edge()))
}

/// `str.substring(begin, end)`
pub(super) fn slice(inv: &Invocation<'_>) -> Expr {
    if let Some(garbage) = inv.reject(3, "Wrong arguments for String::slice") {
        return garbage;
    }
    let method_span = inv.arg_span(0, inv.span);
    let right = inv.span.right_edge();
    Expr::call(
        inv.span,
        Expr::dot(method_span, inv.arg_or(0, "str", method_span), "substring"),
        vec![inv.arg_or(1, "begin", right), inv.arg_or(2, "end", right)],
    )
}

/// `a <op> b`, where `compareTo` itself is `a - b`
pub(super) fn index_compare(inv: &Invocation<'_>, op: BinaryOp) -> Expr {
    if let Some(garbage) = inv.reject(2, "Wrong arguments for StringIndex::compareTo") {
        return garbage;
    }
    let a = inv.arg_or(0, "a", inv.span.left_edge());
    let b = inv.arg_or(1, "b", inv.span.right_edge());
    Expr::binary(inv.span, a, op, b)
}

/// `-1`
pub(super) fn index_none(inv: &Invocation<'_>) -> Expr {
    if let Some(garbage) = inv.reject(0, "Wrong arguments for StringIndex::none") {
        return garbage;
    }
    Expr::int(inv.span, -1)
}

/// `[""]`
pub(super) fn builder_new(inv: &Invocation<'_>) -> Expr {
    if let Some(garbage) = inv.reject(0, "need 0 arguments for StringBuilder::constructor") {
        return garbage;
    }
    Expr::Array { span: inv.span, elements: vec![Expr::string(inv.span, "")] }
}

/// `sb[0] += s`
pub(super) fn builder_append(inv: &Invocation<'_>) -> Expr {
    if let Some(garbage) = inv.reject(2, "need 2 arguments for StringBuilder::append") {
        return garbage;
    }
    let sb_span = inv.arg_span(0, inv.span.left_edge());
    let target = Expr::index(
        sb_span,
        inv.arg_or(0, "stringBuilder", sb_span),
        Expr::int(sb_span.right_edge(), 0),
    );
    let s_span = inv.arg_span(1, inv.span.right_edge());
    Expr::binary(inv.span, target, BinaryOp::AddAssign, inv.arg_or(1, "substring", s_span))
}

/// `sb[0] += s.substring(begin, end)`
pub(super) fn builder_append_between(inv: &Invocation<'_>) -> Expr {
    if let Some(garbage) = inv.reject(4, "wrong arguments for StringBuilder::appendBetween") {
        return garbage;
    }
    let right = inv.span.right_edge();
    let pieces: Vec<Tree> = [(1, "substring"), (2, "begin"), (3, "end")]
        .into_iter()
        .map(|(i, fallback)| Tree::Expr(inv.arg_or(i, fallback, right)))
        .collect();
    let piece_span = Span::spanning(
        inv.args.iter().skip(1).filter(|a| a.as_expr().is_some()).map(Spanned::span),
        inv.span,
    );
    let sliced = slice(&inv.with_args(piece_span, &pieces));
    let append_args = [Tree::Expr(inv.arg_or(0, "stringBuilder", inv.span.left_edge())), Tree::Expr(sliced)];
    builder_append(&inv.with_args(inv.span, &append_args))
}

/// `sb[0]`
pub(super) fn builder_to_string(inv: &Invocation<'_>) -> Expr {
    if let Some(garbage) = inv.reject(1, "need 1 argument for StringBuilder::toString()") {
        return garbage;
    }
    let sb = inv.arg_safe(0, inv.span.left_edge());
    let span = sb.span();
    Expr::index(span, sb, Expr::int(span.right_edge(), 0))
}
