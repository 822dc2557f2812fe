///
/// JavaScript Target
///
/// The AST expansions build, identifier names and fresh-name allocation,
/// and a compact renderer.
///

pub mod ast;
pub mod names;
pub mod render;

#[cfg(test)]
pub mod eval;

pub use ast::{BinaryOp, Expr, Field, Formal, Member, Method, Number, Statement, Tree, UnaryOp};
pub use names::{JsIdentifierName, NameAllocator, is_reserved_word};
pub use render::{render_expression, render_member, render_statements};
