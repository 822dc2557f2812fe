///
/// Date idioms.
///
/// Dates are JS `Date` objects pinned to UTC midnight. The `Date`
/// constructor adds 1900 to years in [0, 99], so construction only uses
/// `new Date(Date.UTC(...))` when the year is a literal outside that
/// range; otherwise it calls the support library's `dateConstructor`.
///

use std::ops::RangeInclusive;

use crate::ir::Genre;
use crate::js::{BinaryOp, Expr, Number};
use crate::source::{Span, Spanned};
use crate::support::ExternalReference;

use super::Invocation;

const REBASED_YEARS: RangeInclusive<i64> = 0..=99;
const DEFAULT_FULL_YEAR: i64 = 1900;
const ISO_SUNDAY: i64 = 7;

fn date_constructor() -> ExternalReference {
    ExternalReference::core("dateConstructor")
}

/// `Date` in documentation, `globalThis.Date` otherwise.
fn date_global(span: Span, genre: Genre) -> Expr {
    match genre {
        Genre::Library => Expr::global(span, "Date"),
        Genre::Documentation => Expr::ident(span, "Date"),
    }
}

fn literal_year(year: &Expr) -> Option<i64> {
    match year {
        Expr::Number { value: Number::Int(y), .. } => Some(*y),
        Expr::Number { value: Number::Float(y), .. } if y.fract() == 0.0 => Some(*y as i64),
        _ => None,
    }
}

pub(super) fn new_date(inv: &Invocation<'_>, genre: Genre) -> Expr {
    if let Some(garbage) = inv.reject(3, "new Date() requires 3 expressions") {
        return garbage;
    }
    let left = inv.span.left_edge();
    let year = inv.arg(0);
    let month = inv.arg(1);
    let day = inv.arg(2);

    let mut use_new = genre == Genre::Documentation || !inv.strict || inv.registry.is_none();
    if !use_new {
        if let Some(y) = year.as_ref().and_then(literal_year) {
            use_new = !REBASED_YEARS.contains(&y);
        }
    }

    if use_new {
        // Date.UTC takes a zero-based month.
        let month = match month {
            Some(m) => {
                let after = m.span().right_edge();
                Expr::binary(m.span(), m, BinaryOp::Sub, Expr::int(after, 1))
            }
            None => Expr::int(left, 0),
        };
        let utc = Expr::call(
            inv.span,
            Expr::dot(left, date_global(left, genre), "UTC"),
            vec![
                year.unwrap_or_else(|| Expr::int(left, DEFAULT_FULL_YEAR)),
                month,
                day.unwrap_or_else(|| Expr::int(left, 1)),
            ],
        );
        Expr::new_object(inv.span, date_global(left, genre), vec![utc])
    } else {
        let name = inv.require(&date_constructor());
        Expr::call(
            inv.span,
            Expr::name(left, name),
            vec![
                year.unwrap_or_else(|| Expr::int(left, DEFAULT_FULL_YEAR)),
                month.unwrap_or_else(|| Expr::int(left, 1)),
                day.unwrap_or_else(|| Expr::int(left, 1)),
            ],
        )
    }
}

/// `d.<method>()`
pub(super) fn method_call(inv: &Invocation<'_>, method: &'static str) -> Expr {
    if let Some(garbage) = inv.reject(1, &format!("need one `this` argument for read of .{}()", method)) {
        return garbage;
    }
    let this = inv.arg(0).unwrap_or(Expr::Null { span: inv.span });
    Expr::call(inv.span, Expr::dot(inv.span, this, method), vec![])
}

/// `d.getUTCMonth() + 1`
pub(super) fn get_month(inv: &Invocation<'_>) -> Expr {
    if let Some(garbage) = inv.reject(1, "date.getMonth() requires 1 expression") {
        return garbage;
    }
    let right = inv.span.right_edge();
    let date = inv.arg(0).unwrap_or(Expr::Null { span: inv.span });
    let month = Expr::call(inv.span, Expr::dot(inv.span, date, "getUTCMonth"), vec![]);
    Expr::binary(inv.span, month, BinaryOp::Add, Expr::int(right, 1))
}

/// `d.getUTCDay() || 7`: Sunday is 0 in JS and 7 as an ISO weekday.
pub(super) fn get_day_of_week(inv: &Invocation<'_>) -> Expr {
    if let Some(garbage) = inv.reject(1, "date.getDayOfWeek() requires 1 expression") {
        return garbage;
    }
    let right = inv.span.right_edge();
    let date = inv.arg(0).unwrap_or(Expr::Null { span: inv.span });
    let day = Expr::call(inv.span, Expr::dot(inv.span, date, "getUTCDay"), vec![]);
    Expr::binary(inv.span, day, BinaryOp::Or, Expr::int(right, ISO_SUNDAY))
}

/// `d.toISOString().split("T")[0]`
pub(super) fn to_iso_date(inv: &Invocation<'_>) -> Expr {
    if let Some(garbage) = inv.reject(1, "date.toString() requires 1 expression") {
        return garbage;
    }
    let span = inv.span;
    let right = span.right_edge();
    let date = inv.arg(0).unwrap_or(Expr::Null { span });
    let iso = Expr::call(span, Expr::dot(span, date, "toISOString"), vec![]);
    let split = Expr::call(span, Expr::dot(span, iso, "split"), vec![Expr::string(right, "T")]);
    Expr::index(span, split, Expr::int(right, 0))
}

/// `new Date(Date.parse(s))`
pub(super) fn from_iso_string(inv: &Invocation<'_>, genre: Genre) -> Expr {
    if let Some(garbage) = inv.reject(1, "Date.fromIsoString() requires 1 expression") {
        return garbage;
    }
    let left = inv.span.left_edge();
    let text = inv.arg(0).unwrap_or(Expr::Null { span: inv.span });
    let parse = Expr::call(inv.span, Expr::dot(inv.span, date_global(left, genre), "parse"), vec![text]);
    Expr::new_object(inv.span, date_global(left, genre), vec![parse])
}

#[cfg(test)]
mod tests {
    use super::super::Idiom;
    use super::super::test_support::*;
    use crate::ir::Genre;
    use crate::js::render_expression;
    use crate::support::ExternalReferenceRegistry;

    const LIBRARY: Idiom = Idiom::NewDate { genre: Genre::Library };

    #[test]
    fn test_new_date_literal_year_uses_native_constructor() {
        let registry = ExternalReferenceRegistry::new();
        let e = run(LIBRARY, &[int(2024), int(3), int(15)], true, Some(&registry));
        insta::assert_snapshot!(
            render_expression(&e),
            @"new globalThis.Date(globalThis.Date.UTC(2024, 3 - 1, 15))"
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn test_new_date_two_digit_year_delegates() {
        let registry = ExternalReferenceRegistry::new();
        let e = run(LIBRARY, &[int(99), int(1), int(1)], true, Some(&registry));
        assert_eq!(render_expression(&e), "dateConstructor__0(99, 1, 1)");
    }

    #[test]
    fn test_new_date_computed_year_delegates() {
        let registry = ExternalReferenceRegistry::new();
        let e = run(LIBRARY, &[id("y"), id("m"), id("d")], true, Some(&registry));
        assert_eq!(render_expression(&e), "dateConstructor__0(y, m, d)");
    }

    #[test]
    fn test_new_date_documentation() {
        let docs = Idiom::NewDate { genre: Genre::Documentation };
        assert_eq!(
            render_expression(&run(docs, &[id("y"), id("m"), id("d")], true, None)),
            "new Date(Date.UTC(y, m - 1, d))"
        );
        assert_eq!(render_expression(&run(docs, &[], false, None)), "new Date(Date.UTC(1900, 0, 1))");
        assert!(run(LIBRARY, &[int(2024)], true, None).is_invalid());
    }

    #[test]
    fn test_date_fields() {
        assert_eq!(render(Idiom::DateMethod("getUTCFullYear"), &[id("d")]), "d.getUTCFullYear()");
        assert_eq!(render(Idiom::DateGetMonth, &[id("d")]), "d.getUTCMonth() + 1");
        assert_eq!(render(Idiom::DateGetDayOfWeek, &[id("d")]), "d.getUTCDay() || 7");
        assert_eq!(render(Idiom::DateToString, &[id("d")]), r#"d.toISOString().split("T")[0]"#);
    }

    #[test]
    fn test_from_iso_string() {
        let idiom = Idiom::DateFromIsoString { genre: Genre::Library };
        assert_eq!(
            render(idiom, &[id("s")]),
            "new globalThis.Date(globalThis.Date.parse(s))"
        );
    }
}
