///
/// Float64 and Int32 members backed by `Math`. Each `Math.<name>` is
/// pooled into one module-level constant.
///

use crate::js::Expr;
use crate::support::PropertyReference;

use super::Invocation;

fn math_name(inv: &Invocation<'_>, name: &'static str) -> Expr {
    let local = inv.require_property(&PropertyReference::math(name));
    Expr::name(inv.span.right_edge(), local)
}

/// `Math.<name>(args...)`
pub(super) fn call(inv: &Invocation<'_>, name: &'static str, arity: usize) -> Expr {
    if let Some(garbage) = inv.reject(arity, &format!("need {} argument(s) for use of {}", arity, name)) {
        return garbage;
    }
    let args = inv.args.iter().filter_map(|a| a.as_expr().cloned()).collect();
    Expr::call(inv.span, math_name(inv, name), args)
}

/// `Math.<name>`
pub(super) fn property(inv: &Invocation<'_>, name: &'static str) -> Expr {
    if let Some(garbage) = inv.reject(0, &format!("need 0 argument(s) for use of {}", name)) {
        return garbage;
    }
    math_name(inv, name)
}
