///
/// Width Coercion
///
/// JS numbers are doubles. Integer operators must still behave like the
/// IR's fixed-width integers, so their native results get narrowed here:
/// 32-bit results through `| 0`, 64-bit results through the support
/// library's `clampInt64`. Everything else passes through unchanged.
///

use crate::ir::{BuiltinOperatorId, ReturnKind};
use crate::js::{BinaryOp, Expr};
use crate::source::Spanned;
use crate::support::{ExternalReference, ExternalReferenceRegistry, Requirement};

pub fn clamp_int64() -> ExternalReference {
    ExternalReference::core("clampInt64")
}

/// Requirements an operator's coercion adds to its expansion.
pub fn requirements(operator: BuiltinOperatorId) -> Vec<Requirement> {
    match operator.return_kind() {
        ReturnKind::Int64 => vec![Requirement::Reference(clamp_int64())],
        _ => Vec::new(),
    }
}

pub fn coerce(expr: Expr, operator: BuiltinOperatorId, registry: Option<&ExternalReferenceRegistry>) -> Expr {
    match operator.return_kind() {
        ReturnKind::Int32 => to_int32(expr),
        ReturnKind::Int64 => to_int64(expr, registry),
        _ => expr,
    }
}

/// `expr | 0`
pub fn to_int32(expr: Expr) -> Expr {
    let span = expr.span();
    Expr::binary(span, expr, BinaryOp::BitOr, Expr::int(span.right_edge(), 0))
}

/// `clampInt64(expr)`
pub fn to_int64(expr: Expr, registry: Option<&ExternalReferenceRegistry>) -> Expr {
    let span = expr.span();
    let reference = clamp_int64();
    let name = match registry {
        Some(registry) => registry.require(&reference),
        None => reference.stable_name,
    };
    Expr::call(span, Expr::name(span.left_edge(), name), vec![expr])
}
