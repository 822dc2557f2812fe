///
/// Support Code
///
/// What a builtin operator or connected key resolves to:
/// - Inline: an idiom expanded at the call site, plus requirements
/// - External: a symbol exported by a separately compiled support library
/// - Type: a global or externally supplied JS type
///
/// Equality of inline expansions only looks at library, stable name and
/// operator id; the idiom itself never takes part.
///

pub mod registry;

use std::fmt;
use std::hash::{Hash, Hasher};

use tracing::warn;

use crate::expand::{Idiom, Invocation};
use crate::ir::{BuiltinOperatorId, Genre};
use crate::js::{Expr, JsIdentifierName, Tree, render_expression};
use crate::source::{Span, Spanned};

pub use registry::ExternalReferenceRegistry;

/// A separately compiled JS library, named by its package id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LibraryId(&'static str);

impl LibraryId {
    /// The runtime support library every backend output links against.
    pub const CORE: LibraryId = LibraryId("jsbind-core");
    /// Node's `assert` module, used by test helpers.
    pub const ASSERT: LibraryId = LibraryId("assert");

    pub fn as_str(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for LibraryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExternalReference {
    pub library: LibraryId,
    pub stable_name: JsIdentifierName,
    pub operator: Option<BuiltinOperatorId>,
}

impl ExternalReference {
    pub fn core(stable_name: impl Into<String>) -> Self {
        Self { library: LibraryId::CORE, stable_name: JsIdentifierName::new(stable_name), operator: None }
    }

    pub fn for_operator(operator: BuiltinOperatorId, stable_name: impl Into<String>) -> Self {
        Self {
            library: LibraryId::CORE,
            stable_name: JsIdentifierName::new(stable_name),
            operator: Some(operator),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeReference {
    /// `globalThis.<name>`
    Global(JsIdentifierName),
    External(ExternalReference),
}

impl TypeReference {
    pub fn global(name: &str) -> Self {
        TypeReference::Global(JsIdentifierName::new(name))
    }
}

/// `globalThis.<object>.<property>`, pooled into a module-level constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PropertyReference {
    pub object: &'static str,
    pub property: &'static str,
}

impl PropertyReference {
    pub const fn math(property: &'static str) -> Self {
        Self { object: "Math", property }
    }

    pub fn to_expr(self, span: Span) -> Expr {
        Expr::dot(span, Expr::global(span, self.object), self.property)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Requirement {
    Property(PropertyReference),
    Reference(ExternalReference),
}

#[derive(Debug, Clone)]
pub struct InlineExpansion {
    pub library: LibraryId,
    pub stable_name: JsIdentifierName,
    pub operator: Option<BuiltinOperatorId>,
    pub requires: Vec<Requirement>,
    pub idiom: Idiom,
}

impl InlineExpansion {
    pub fn new(stable_name: impl Into<String>, idiom: Idiom) -> Self {
        Self {
            library: LibraryId::CORE,
            stable_name: JsIdentifierName::new(stable_name),
            operator: None,
            requires: Vec::new(),
            idiom,
        }
    }

    pub fn for_operator(operator: BuiltinOperatorId, idiom: Idiom) -> Self {
        Self {
            library: LibraryId::CORE,
            stable_name: JsIdentifierName::new(operator.exported_name()),
            operator: Some(operator),
            requires: Vec::new(),
            idiom,
        }
    }

    pub fn requiring(mut self, requirement: Requirement) -> Self {
        self.requires.push(requirement);
        self
    }

    pub fn expand(
        &self,
        span: Span,
        args: &[Tree],
        strict: bool,
        registry: Option<&ExternalReferenceRegistry>,
    ) -> Expr {
        if let Some(registry) = registry {
            for requirement in &self.requires {
                registry.satisfy(requirement);
            }
        }
        self.idiom.expand(&Invocation { span, args, strict, registry })
    }
}

impl PartialEq for InlineExpansion {
    fn eq(&self, other: &Self) -> bool {
        self.library == other.library
            && self.stable_name == other.stable_name
            && self.operator == other.operator
    }
}

impl Eq for InlineExpansion {}

impl Hash for InlineExpansion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.library.hash(state);
        self.stable_name.hash(state);
        self.operator.hash(state);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SupportCode {
    Inline(InlineExpansion),
    External(ExternalReference),
    Type(TypeReference),
}

impl SupportCode {
    pub fn kind_name(&self) -> &'static str {
        match self {
            SupportCode::Inline(_) => "inline",
            SupportCode::External(_) => "external",
            SupportCode::Type(_) => "type",
        }
    }

    pub fn stable_name(&self) -> &JsIdentifierName {
        match self {
            SupportCode::Inline(inline) => &inline.stable_name,
            SupportCode::External(reference) => &reference.stable_name,
            SupportCode::Type(TypeReference::Global(name)) => name,
            SupportCode::Type(TypeReference::External(reference)) => &reference.stable_name,
        }
    }

    pub fn operator(&self) -> Option<BuiltinOperatorId> {
        match self {
            SupportCode::Inline(inline) => inline.operator,
            SupportCode::External(reference) => reference.operator,
            SupportCode::Type(_) => None,
        }
    }

    /// Translates one call site. Inline expansions are strict in the
    /// library genre; external references become a call to the
    /// registry-assigned name, or the stable name without a registry.
    pub fn invoke(
        &self,
        span: Span,
        args: &[Tree],
        genre: Genre,
        registry: Option<&ExternalReferenceRegistry>,
    ) -> Expr {
        match self {
            SupportCode::Inline(inline) => inline.expand(span, args, genre.is_strict(), registry),
            SupportCode::External(reference) => {
                let name = match registry {
                    Some(registry) => registry.require(reference),
                    None => reference.stable_name.clone(),
                };
                let mut exprs = Vec::with_capacity(args.len());
                for arg in args {
                    match arg.as_expr() {
                        Some(expr) => exprs.push(expr.clone()),
                        None if genre.is_strict() => {
                            warn!(stable_name = %reference.stable_name, "spread argument to external reference");
                            return Expr::invalid(
                                arg.span(),
                                format!("cannot spread arguments into {}", reference.stable_name),
                            );
                        }
                        None => {}
                    }
                }
                Expr::call(span, Expr::name(span.left_edge(), name), exprs)
            }
            SupportCode::Type(_) => Expr::invalid(span, "a type reference cannot be called"),
        }
    }

    /// Renders without call-site arguments, leniently and without a registry.
    pub fn render_standalone(&self) -> String {
        match self {
            SupportCode::Inline(inline) => {
                render_expression(&inline.expand(Span::dummy(), &[], false, None))
            }
            SupportCode::External(reference) => reference.stable_name.to_string(),
            SupportCode::Type(TypeReference::Global(name)) => format!("globalThis.{}", name),
            SupportCode::Type(TypeReference::External(reference)) => reference.stable_name.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::js::BinaryOp;

    fn plus() -> InlineExpansion {
        InlineExpansion::for_operator(
            BuiltinOperatorId::PlusFltFlt,
            Idiom::Native(BinaryOp::Add),
        )
    }

    #[test]
    fn test_inline_equality_ignores_idiom() {
        let a = plus();
        let b = InlineExpansion { idiom: Idiom::Native(BinaryOp::Sub), ..plus() };
        assert_eq!(a, b);

        let c = InlineExpansion { operator: Some(BuiltinOperatorId::PlusIntInt), ..plus() };
        assert_ne!(a, c);
    }

    #[test]
    fn test_invoke_external_without_registry() {
        let code = SupportCode::External(ExternalReference::core("dateToday"));
        let call = code.invoke(Span::new(4, 9, 0), &[], Genre::Library, None);
        assert_eq!(render_expression(&call), "dateToday()");
    }

    #[test]
    fn test_invoke_external_rejects_spread_when_strict() {
        let code = SupportCode::External(ExternalReference::core("listedJoin"));
        let args = [Tree::Spread { span: Span::new(2, 6, 0), argument: Expr::ident(Span::new(5, 6, 0), "xs") }];
        let strict = code.invoke(Span::new(0, 8, 0), &args, Genre::Library, None);
        assert!(strict.is_invalid());
        assert_eq!(strict.span(), Span::new(2, 6, 0));
    }

    #[test]
    fn test_render_standalone() {
        assert_eq!(SupportCode::Inline(plus()).render_standalone(), "_0 + _1");
        assert_eq!(SupportCode::Type(TypeReference::global("Date")).render_standalone(), "globalThis.Date");
    }
}
