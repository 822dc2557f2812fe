///
/// Documentation variants, chosen for readable examples over speed:
/// plain array literals, `console.log`, and template literals in place of
/// `+` chains.
///

use crate::js::Expr;

use super::Invocation;

/// `[...]`
pub(super) fn listify(inv: &Invocation<'_>) -> Expr {
    match inv.all_exprs() {
        Some(elements) => Expr::Array { span: inv.span, elements },
        None => inv.garbage("Cannot inline Listify"),
    }
}

/// `globalThis.console.log(...)`
pub(super) fn print(inv: &Invocation<'_>) -> Expr {
    let Some(args) = inv.all_exprs() else {
        return inv.garbage("Cannot inline Print");
    };
    let left = inv.span.left_edge();
    let log = Expr::dot(left, Expr::global(left, "console"), "log");
    Expr::call(inv.span, log, args)
}

/// One template literal. Adjacent string literals merge into a single
/// quasi; every other argument becomes a hole.
pub(super) fn cat(inv: &Invocation<'_>) -> Expr {
    let Some(args) = inv.all_exprs() else {
        return inv.garbage("Cannot inline StrCat");
    };

    let mut quasis = Vec::with_capacity(args.len() + 1);
    let mut holes = Vec::new();
    let mut pending: Option<String> = None;

    for arg in args {
        match arg {
            Expr::String { value, .. } => {
                pending = Some(pending.take().unwrap_or_default() + &value);
            }
            hole => {
                quasis.push(pending.take().unwrap_or_default());
                holes.push(hole);
            }
        }
    }
    quasis.push(pending.unwrap_or_default());

    Expr::Template { span: inv.span, quasis, holes }
}
