///
/// Conversions, test bailout, `ignore` and console access.
///

use crate::js::{Expr, JsIdentifierName, Tree, UnaryOp};
use crate::support::{ExternalReference, LibraryId};

use super::Invocation;

fn assert_strict() -> ExternalReference {
    ExternalReference { library: LibraryId::ASSERT, stable_name: JsIdentifierName::new("strict"), operator: None }
}

fn global_console() -> ExternalReference {
    ExternalReference::core("globalConsole")
}

/// `BigInt(n)`
pub(super) fn bigint(inv: &Invocation<'_>) -> Expr {
    if let Some(garbage) = inv.reject(1, "need 1 argument for Int32::toInt64") {
        return garbage;
    }
    let args = inv.args.iter().filter_map(|a| a.as_expr().cloned()).collect();
    Expr::call(inv.span, Expr::ident(inv.span, "BigInt"), args)
}

/// `assert.strict.fail(test.messagesCombined())`
pub(super) fn bail(inv: &Invocation<'_>) -> Expr {
    if let Some(garbage) = inv.reject(1, "Wrong arguments for bail") {
        return garbage;
    }
    let strict = inv.require(&assert_strict());
    let fail = Expr::dot(inv.span, Expr::name(inv.span, strict), "fail");
    let args = match inv.arg(0) {
        Some(test) => vec![Expr::call(inv.span, Expr::dot(inv.span, test, "messagesCombined"), vec![])],
        None => vec![],
    };
    Expr::call(inv.span, fail, args)
}

/// `void 0`, keeping the operand when it may have effects.
pub(super) fn ignore(inv: &Invocation<'_>) -> Expr {
    if inv.strict && inv.args.len() != 1 {
        return inv.garbage("Wrong arguments for ignore idiom expander");
    }
    let void = Expr::unary(inv.span, UnaryOp::Void, Expr::int(inv.span, 0));
    match inv.args.first() {
        None | Some(Tree::Expr(Expr::Identifier { .. })) => void,
        Some(Tree::Expr(arg)) => Expr::Sequence { span: inv.span, exprs: vec![arg.clone(), void] },
        Some(Tree::Spread { .. }) => inv.garbage("Expected one expression argument"),
    }
}

/// The support library's console, used as a value.
pub(super) fn get_console(inv: &Invocation<'_>) -> Expr {
    let name = match inv.registry {
        Some(registry) => registry.require(&global_console()),
        None => JsIdentifierName::new("console"),
    };
    Expr::name(inv.span, name)
}
