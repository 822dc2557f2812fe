///
/// List, ListBuilder and Mapped idioms. Lists are JS arrays (frozen when
/// immutable), maps are JS `Map`s.
///

use crate::js::{Expr, UnaryOp};

use super::Invocation;
use super::strings;

/// The single argument, unchanged.
pub(super) fn identity(inv: &Invocation<'_>) -> Expr {
    if inv.has_shape(1) || (!inv.strict && !inv.args.is_empty()) {
        if let Some(arg) = inv.arg(0) {
            return arg;
        }
    }
    if inv.strict {
        inv.garbage("Wrong arguments for identity idiom expander")
    } else {
        Expr::ident(inv.span, "x")
    }
}

/// `!x.length`
pub(super) fn list_is_empty(inv: &Invocation<'_>) -> Expr {
    let length = strings::length(inv);
    if length.is_invalid() {
        return length;
    }
    Expr::unary(inv.span, UnaryOp::Not, length)
}

/// `x.forEach(f)`
pub(super) fn list_for_each(inv: &Invocation<'_>) -> Expr {
    if let Some(garbage) = inv.reject(2, "Wrong arguments for forEach idiom expander") {
        return garbage;
    }
    let series = inv.arg_or(0, "x", inv.span.left_edge());
    let body = inv.arg_or(1, "f", inv.span.right_edge());
    Expr::call(inv.span, Expr::dot(inv.span, series, "forEach"), vec![body])
}

/// `x.slice()`
pub(super) fn list_to_list_builder(inv: &Invocation<'_>) -> Expr {
    if let Some(garbage) = inv.reject(1, "Wrong arguments for toListBuilder idiom expander") {
        return garbage;
    }
    Expr::call(inv.span, Expr::dot(inv.span, inv.arg_or(0, "x", inv.span), "slice"), vec![])
}

/// `[]`
pub(super) fn list_builder_new(inv: &Invocation<'_>) -> Expr {
    if let Some(garbage) = inv.reject(0, "Wrong arguments for ListBuilder idiom expander") {
        return garbage;
    }
    Expr::Array { span: inv.span, elements: vec![] }
}

/// `m.size`
pub(super) fn mapped_size(inv: &Invocation<'_>) -> Expr {
    if let Some(garbage) = inv.reject(1, "Wrong arguments for length idiom expander") {
        return garbage;
    }
    Expr::dot(inv.span, inv.arg_or(0, "x", inv.span), "size")
}

/// `m.has(key)`. A bad arity is garbage in every genre.
pub(super) fn mapped_has(inv: &Invocation<'_>) -> Expr {
    let Some([map, key]) = inv.exact(2).and_then(|args| <[Expr; 2]>::try_from(args).ok()) else {
        return inv.garbage("Wrong number of arguments to Mapped::has");
    };
    Expr::call(inv.span, Expr::dot(inv.span, map, "has"), vec![key])
}

/// `Object.freeze(Array.from(m.<method>()))`. A bad arity is garbage in every genre.
pub(super) fn mapped_array(inv: &Invocation<'_>, method: &'static str) -> Expr {
    let Some(map) = inv.exact(1).and_then(|mut args| args.pop()) else {
        return inv.garbage(format!("Wrong number of arguments to Mapped::{}", method));
    };
    let span = inv.span;
    let left = span.left_edge();
    let iter = Expr::call(span, Expr::dot(span, map, method), vec![]);
    let array = Expr::call(span, Expr::dot(left, Expr::ident(left, "Array"), "from"), vec![iter]);
    Expr::call(span, Expr::dot(left, Expr::ident(left, "Object"), "freeze"), vec![array])
}

#[cfg(test)]
mod tests {
    use super::super::Idiom;
    use super::super::test_support::*;
    use crate::js::render_expression;

    #[test]
    fn test_identity() {
        assert_eq!(render(Idiom::Identity, &[id("xs")]), "xs");
        assert!(run(Idiom::Identity, &[id("a"), id("b")], true, None).is_invalid());
        assert_eq!(render_expression(&run(Idiom::Identity, &[id("a"), id("b")], false, None)), "a");
    }

    #[test]
    fn test_list_idioms() {
        assert_eq!(render(Idiom::ListIsEmpty, &[id("xs")]), "!xs.length");
        assert_eq!(render(Idiom::ListForEach, &[id("xs"), id("f")]), "xs.forEach(f)");
        assert_eq!(render(Idiom::ListToListBuilder, &[id("xs")]), "xs.slice()");
        assert_eq!(render(Idiom::ListBuilderNew, &[]), "[]");
        assert!(run(Idiom::ListIsEmpty, &[], true, None).is_invalid());
    }

    #[test]
    fn test_mapped_idioms() {
        assert_eq!(render(Idiom::MappedSize, &[id("m")]), "m.size");
        assert_eq!(render(Idiom::MappedHas, &[id("m"), string("k")]), r#"m.has("k")"#);
        insta::assert_snapshot!(
            render(Idiom::MappedArray("keys"), &[id("m")]),
            @"Object.freeze(Array.from(m.keys()))"
        );
    }

    #[test]
    fn test_mapped_bad_arity_is_garbage_when_lenient() {
        let has = run(Idiom::MappedHas, &[id("m"), string("k"), id("extra")], false, None);
        assert!(has.is_invalid());
        assert!(run(Idiom::MappedHas, &[id("m")], false, None).is_invalid());
        assert!(run(Idiom::MappedArray("values"), &[], false, None).is_invalid());
        assert!(run(Idiom::MappedArray("values"), &[id("m"), id("n")], true, None).is_invalid());
    }
}
