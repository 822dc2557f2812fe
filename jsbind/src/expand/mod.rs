///
/// Idiom Expansion
///
/// Every inline resolution carries an `Idiom`: a small, comparable tag that
/// names one expansion rule and the constants it was built with. `expand`
/// dispatches on it to a pure function of the invocation (call-site span,
/// translated arguments, strictness, optional registry).
///
/// Strict invocations with the wrong shape produce an `Expr::Invalid`
/// attributed to the call site. Lenient invocations (documentation output
/// and previews) substitute placeholder identifiers instead, so a rule can
/// always be rendered.
///
/// Rules are grouped by what they translate:
/// - operators: builtin arithmetic, comparison, concatenation, listify
/// - strings: String, StringIndex and StringBuilder members
/// - collections: List, ListBuilder and Mapped members
/// - date: Date construction and field access
/// - math: Float64 and Int32 members backed by `Math`
/// - misc: conversions, test bailout, `ignore`, console access
/// - docs: readable variants used in documentation output
///

mod collections;
mod date;
mod docs;
mod math;
mod misc;
mod operators;
mod strings;

use tracing::{debug, warn};

use crate::ir::{BuiltinOperatorId, Genre};
use crate::js::{BinaryOp, Expr, JsIdentifierName, Tree};
use crate::source::{Span, Spanned};
use crate::support::{ExternalReference, ExternalReferenceRegistry, PropertyReference};

/// Three-way comparators exported by the core support library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparator {
    Float,
    String,
    Generic,
}

impl Comparator {
    pub fn reference(self) -> ExternalReference {
        match self {
            Comparator::Float => ExternalReference::for_operator(BuiltinOperatorId::CmpFltFlt, "cmpFloat"),
            Comparator::String => ExternalReference::for_operator(BuiltinOperatorId::CmpStrStr, "cmpString"),
            Comparator::Generic => ExternalReference::for_operator(BuiltinOperatorId::CmpGeneric, "cmpGeneric"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Idiom {
    /// `!a`
    Not,
    /// `a == null`
    IsNull,
    /// `a <op> b` with no narrowing
    Native(BinaryOp),
    /// `a <op> b` narrowed to the operator's declared integer width
    Arith { op: BinaryOp, operator: BuiltinOperatorId },
    /// `-a` narrowed to the operator's declared width
    Negate { operator: BuiltinOperatorId },
    /// `Math.imul(a, b)` through a pooled name
    Imul,
    /// `cmpX(a, b) <op> 0`
    Compare { comparator: Comparator, op: BinaryOp },
    /// `Object.is(a, b)`, or its negation
    ObjectIs { negated: bool },
    StrCat,
    Listify,

    ToString,
    StringIsEmpty,
    Length,
    StringBegin,
    StringHasIndex,
    StringSlice,
    StringIndexCompare(BinaryOp),
    StringIndexNone,
    StringBuilderNew,
    StringBuilderAppend,
    StringBuilderAppendBetween,
    StringBuilderToString,

    Identity,
    ListIsEmpty,
    ListForEach,
    ListToListBuilder,
    ListBuilderNew,
    MappedSize,
    MappedHas,
    /// `Object.freeze(Array.from(m.<method>()))`
    MappedArray(&'static str),

    NewDate { genre: Genre },
    /// `d.<method>()`
    DateMethod(&'static str),
    DateGetMonth,
    DateGetDayOfWeek,
    DateToString,
    DateFromIsoString { genre: Genre },

    MathCall { name: &'static str, arity: usize },
    MathProperty(&'static str),

    BigInt,
    Bail,
    Ignore,
    GetConsole,

    DocsListify,
    DocsPrint,
    DocsCat,
}

impl Idiom {
    pub fn expand(&self, inv: &Invocation<'_>) -> Expr {
        match *self {
            Idiom::Not => operators::not(inv),
            Idiom::IsNull => operators::is_null(inv),
            Idiom::Native(op) => operators::native(inv, op),
            Idiom::Arith { op, operator } => operators::arith(inv, op, operator),
            Idiom::Negate { operator } => operators::negate(inv, operator),
            Idiom::Imul => operators::imul(inv),
            Idiom::Compare { comparator, op } => operators::compare(inv, comparator, op),
            Idiom::ObjectIs { negated } => operators::object_is(inv, negated),
            Idiom::StrCat => operators::str_cat(inv),
            Idiom::Listify => operators::listify(inv),

            Idiom::ToString => strings::to_string(inv),
            Idiom::StringIsEmpty => strings::is_empty(inv),
            Idiom::Length => strings::length(inv),
            Idiom::StringBegin => strings::begin(inv),
            Idiom::StringHasIndex => strings::has_index(inv),
            Idiom::StringSlice => strings::slice(inv),
            Idiom::StringIndexCompare(op) => strings::index_compare(inv, op),
            Idiom::StringIndexNone => strings::index_none(inv),
            Idiom::StringBuilderNew => strings::builder_new(inv),
            Idiom::StringBuilderAppend => strings::builder_append(inv),
            Idiom::StringBuilderAppendBetween => strings::builder_append_between(inv),
            Idiom::StringBuilderToString => strings::builder_to_string(inv),

            Idiom::Identity => collections::identity(inv),
            Idiom::ListIsEmpty => collections::list_is_empty(inv),
            Idiom::ListForEach => collections::list_for_each(inv),
            Idiom::ListToListBuilder => collections::list_to_list_builder(inv),
            Idiom::ListBuilderNew => collections::list_builder_new(inv),
            Idiom::MappedSize => collections::mapped_size(inv),
            Idiom::MappedHas => collections::mapped_has(inv),
            Idiom::MappedArray(method) => collections::mapped_array(inv, method),

            Idiom::NewDate { genre } => date::new_date(inv, genre),
            Idiom::DateMethod(method) => date::method_call(inv, method),
            Idiom::DateGetMonth => date::get_month(inv),
            Idiom::DateGetDayOfWeek => date::get_day_of_week(inv),
            Idiom::DateToString => date::to_iso_date(inv),
            Idiom::DateFromIsoString { genre } => date::from_iso_string(inv, genre),

            Idiom::MathCall { name, arity } => math::call(inv, name, arity),
            Idiom::MathProperty(name) => math::property(inv, name),

            Idiom::BigInt => misc::bigint(inv),
            Idiom::Bail => misc::bail(inv),
            Idiom::Ignore => misc::ignore(inv),
            Idiom::GetConsole => misc::get_console(inv),

            Idiom::DocsListify => docs::listify(inv),
            Idiom::DocsPrint => docs::print(inv),
            Idiom::DocsCat => docs::cat(inv),
        }
    }
}

/// One call site handed to an idiom.
#[derive(Clone, Copy)]
pub struct Invocation<'a> {
    pub span: Span,
    pub args: &'a [Tree],
    pub strict: bool,
    pub registry: Option<&'a ExternalReferenceRegistry>,
}

impl<'a> Invocation<'a> {
    /// The same invocation over different arguments.
    pub fn with_args<'b>(&self, span: Span, args: &'b [Tree]) -> Invocation<'b>
    where
        'a: 'b,
    {
        Invocation { span, args, strict: self.strict, registry: self.registry }
    }

    pub fn arg(&self, i: usize) -> Option<Expr> {
        self.args.get(i).and_then(Tree::as_expr).cloned()
    }

    /// Exactly `n` arguments, all expressions.
    pub fn has_shape(&self, n: usize) -> bool {
        self.args.len() == n && self.args.iter().all(|a| a.as_expr().is_some())
    }

    pub fn exact(&self, n: usize) -> Option<Vec<Expr>> {
        if self.has_shape(n) { self.all_exprs() } else { None }
    }

    pub fn all_exprs(&self) -> Option<Vec<Expr>> {
        self.args.iter().map(|a| a.as_expr().cloned()).collect()
    }

    /// Argument `i`, or an identifier named `fallback` when absent.
    pub fn arg_or(&self, i: usize, fallback: &str, fallback_span: Span) -> Expr {
        self.arg(i).unwrap_or_else(|| Expr::ident(fallback_span, fallback))
    }

    /// Argument `i`, or `_i` when absent.
    pub fn arg_safe(&self, i: usize, fallback_span: Span) -> Expr {
        self.arg(i).unwrap_or_else(|| Expr::ident(fallback_span, format!("_{}", i)))
    }

    /// Garbage when strict and the shape is not `n` expressions.
    pub fn reject(&self, n: usize, message: &str) -> Option<Expr> {
        if self.strict && !self.has_shape(n) { Some(self.garbage(message)) } else { None }
    }

    pub fn garbage(&self, message: impl Into<String>) -> Expr {
        let message = message.into();
        if self.strict {
            warn!(span = ?self.span, %message, "rejected call shape");
        } else {
            debug!(span = ?self.span, %message, "rejected call shape");
        }
        Expr::invalid(self.span, message)
    }

    /// Local name for an external reference, or its stable name without a registry.
    pub fn require(&self, reference: &ExternalReference) -> JsIdentifierName {
        match self.registry {
            Some(registry) => registry.require(reference),
            None => JsIdentifierName::massage(reference.stable_name.as_str()),
        }
    }

    /// Local name for a pooled global property, or the bare property name.
    pub fn require_property(&self, property: &PropertyReference) -> JsIdentifierName {
        match self.registry {
            Some(registry) => registry.require_property(property),
            None => JsIdentifierName::new(property.property),
        }
    }

    /// Span of argument `i`, or `fallback`.
    pub fn arg_span(&self, i: usize, fallback: Span) -> Span {
        self.args.get(i).map(Spanned::span).unwrap_or(fallback)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub fn sp(start: u32, end: u32) -> Span {
        Span::new(start, end, 0)
    }

    pub fn id(name: &str) -> Tree {
        Tree::Expr(Expr::ident(sp(0, name.len() as u32), name))
    }

    pub fn int(value: i64) -> Tree {
        Tree::Expr(Expr::int(sp(0, 1), value))
    }

    pub fn string(value: &str) -> Tree {
        Tree::Expr(Expr::string(sp(0, value.len() as u32 + 2), value))
    }

    pub fn run(idiom: Idiom, args: &[Tree], strict: bool, registry: Option<&ExternalReferenceRegistry>) -> Expr {
        idiom.expand(&Invocation { span: sp(10, 20), args, strict, registry })
    }

    pub fn render(idiom: Idiom, args: &[Tree]) -> String {
        crate::js::render_expression(&run(idiom, args, true, None))
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_arg_fallbacks() {
        let args = [id("a")];
        let inv = Invocation { span: sp(10, 20), args: &args, strict: false, registry: None };
        assert_eq!(crate::js::render_expression(&inv.arg_safe(0, sp(10, 10))), "a");
        assert_eq!(crate::js::render_expression(&inv.arg_safe(1, sp(20, 20))), "_1");
        assert_eq!(crate::js::render_expression(&inv.arg_or(2, "end", sp(20, 20))), "end");
    }

    #[test]
    fn test_spread_breaks_shape() {
        let args = [Tree::Spread { span: sp(0, 4), argument: Expr::ident(sp(3, 4), "x") }];
        let inv = Invocation { span: sp(10, 20), args: &args, strict: true, registry: None };
        assert!(!inv.has_shape(1));
        assert!(inv.reject(1, "bad").is_some_and(|e| e.is_invalid()));
    }

    #[test]
    fn test_garbage_carries_call_site_span() {
        let garbage = run(Idiom::StringSlice, &[id("s")], true, None);
        assert_eq!(garbage, Expr::invalid(sp(10, 20), "Wrong arguments for String::slice"));
    }

    #[test]
    fn test_require_without_registry_uses_stable_name() {
        let inv = Invocation { span: sp(0, 1), args: &[], strict: true, registry: None };
        assert_eq!(inv.require(&Comparator::Generic.reference()).as_str(), "cmpGeneric");
        assert_eq!(inv.require_property(&PropertyReference::math("imul")).as_str(), "imul");
    }

    #[test]
    fn test_require_with_registry_is_pooled() {
        let registry = ExternalReferenceRegistry::new();
        let inv = Invocation { span: sp(0, 1), args: &[], strict: true, registry: Some(&registry) };
        let first = inv.require(&Comparator::Float.reference());
        let second = inv.require(&Comparator::Float.reference());
        assert_eq!(first, second);
        assert_eq!(first.as_str(), "cmpFloat__0");
    }
}
