///
/// JavaScript AST
///
/// The target tree produced by expansions. Only the node kinds the binding
/// layer builds are modelled. `Expr::Invalid` is the garbage node: a
/// placeholder for a call site whose shape was rejected, carrying the
/// diagnostic text and the span of the offending IR node.
///

use crate::ir::{IrType, MethodShape, Visibility};
use crate::source::{Span, Spanned};

use super::names::JsIdentifierName;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,

    BitAnd,
    BitOr,

    /// `==`, only used against `null`
    LooseEq,
    StrictEq,
    StrictNe,
    Lt,
    Le,
    Gt,
    Ge,

    Or,

    AddAssign,
}

impl BinaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Pow => "**",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::LooseEq => "==",
            BinaryOp::StrictEq => "===",
            BinaryOp::StrictNe => "!==",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Or => "||",
            BinaryOp::AddAssign => "+=",
        }
    }

    /// JS operator precedence, higher binds tighter.
    pub fn precedence(&self) -> u8 {
        match self {
            BinaryOp::AddAssign => 2,
            BinaryOp::Or => 4,
            BinaryOp::BitOr => 7,
            BinaryOp::BitAnd => 9,
            BinaryOp::LooseEq | BinaryOp::StrictEq | BinaryOp::StrictNe => 10,
            BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => 11,
            BinaryOp::Add | BinaryOp::Sub => 13,
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => 14,
            BinaryOp::Pow => 15,
        }
    }

    pub fn is_right_associative(&self) -> bool {
        matches!(self, BinaryOp::Pow | BinaryOp::AddAssign)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Neg,
    Not,
    Void,
}

impl UnaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
            UnaryOp::Void => "void ",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Identifier {
        span: Span,
        name: JsIdentifierName,
    },
    Number {
        span: Span,
        value: Number,
    },
    String {
        span: Span,
        value: String,
    },
    Null {
        span: Span,
    },
    This {
        span: Span,
    },
    Array {
        span: Span,
        elements: Vec<Expr>,
    },
    Member {
        span: Span,
        object: Box<Expr>,
        property: Box<Expr>,
        computed: bool,
    },
    Call {
        span: Span,
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    New {
        span: Span,
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    Binary {
        span: Span,
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },
    Unary {
        span: Span,
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Sequence {
        span: Span,
        exprs: Vec<Expr>,
    },
    /// Untagged template literal. `quasis.len() == holes.len() + 1`.
    Template {
        span: Span,
        quasis: Vec<String>,
        holes: Vec<Expr>,
    },
    Invalid {
        span: Span,
        message: String,
    },
}

impl Expr {
    pub fn ident(span: Span, name: impl Into<String>) -> Expr {
        Expr::Identifier { span, name: JsIdentifierName::new(name) }
    }

    pub fn name(span: Span, name: JsIdentifierName) -> Expr {
        Expr::Identifier { span, name }
    }

    pub fn int(span: Span, value: i64) -> Expr {
        Expr::Number { span, value: Number::Int(value) }
    }

    pub fn float(span: Span, value: f64) -> Expr {
        Expr::Number { span, value: Number::Float(value) }
    }

    pub fn string(span: Span, value: impl Into<String>) -> Expr {
        Expr::String { span, value: value.into() }
    }

    /// `object.property`
    pub fn dot(span: Span, object: Expr, property: &str) -> Expr {
        let property_span = object.span().right_edge();
        Expr::Member {
            span,
            object: Box::new(object),
            property: Box::new(Expr::ident(property_span, property)),
            computed: false,
        }
    }

    /// `object[index]`
    pub fn index(span: Span, object: Expr, index: Expr) -> Expr {
        Expr::Member { span, object: Box::new(object), property: Box::new(index), computed: true }
    }

    pub fn call(span: Span, callee: Expr, args: Vec<Expr>) -> Expr {
        Expr::Call { span, callee: Box::new(callee), args }
    }

    pub fn new_object(span: Span, callee: Expr, args: Vec<Expr>) -> Expr {
        Expr::New { span, callee: Box::new(callee), args }
    }

    pub fn binary(span: Span, left: Expr, op: BinaryOp, right: Expr) -> Expr {
        Expr::Binary { span, left: Box::new(left), op, right: Box::new(right) }
    }

    pub fn unary(span: Span, op: UnaryOp, operand: Expr) -> Expr {
        Expr::Unary { span, op, operand: Box::new(operand) }
    }

    /// `globalThis.name`
    pub fn global(span: Span, name: &str) -> Expr {
        Expr::dot(span, Expr::ident(span.left_edge(), "globalThis"), name)
    }

    pub fn invalid(span: Span, message: impl Into<String>) -> Expr {
        Expr::Invalid { span, message: message.into() }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Expr::Invalid { .. })
    }

    /// Visits this node and every nested expression, parents first.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a Expr)) {
        f(self);
        match self {
            Expr::Identifier { .. }
            | Expr::Number { .. }
            | Expr::String { .. }
            | Expr::Null { .. }
            | Expr::This { .. }
            | Expr::Invalid { .. } => {}
            Expr::Array { elements, .. } => elements.iter().for_each(|e| e.walk(f)),
            Expr::Member { object, property, .. } => {
                object.walk(f);
                property.walk(f);
            }
            Expr::Call { callee, args, .. } | Expr::New { callee, args, .. } => {
                callee.walk(f);
                args.iter().for_each(|a| a.walk(f));
            }
            Expr::Binary { left, right, .. } => {
                left.walk(f);
                right.walk(f);
            }
            Expr::Unary { operand, .. } => operand.walk(f),
            Expr::Sequence { exprs, .. } => exprs.iter().for_each(|e| e.walk(f)),
            Expr::Template { holes, .. } => holes.iter().for_each(|h| h.walk(f)),
        }
    }
}

impl Spanned for Expr {
    fn span(&self) -> Span {
        match self {
            Expr::Identifier { span, .. }
            | Expr::Number { span, .. }
            | Expr::String { span, .. }
            | Expr::Null { span }
            | Expr::This { span }
            | Expr::Array { span, .. }
            | Expr::Member { span, .. }
            | Expr::Call { span, .. }
            | Expr::New { span, .. }
            | Expr::Binary { span, .. }
            | Expr::Unary { span, .. }
            | Expr::Sequence { span, .. }
            | Expr::Template { span, .. }
            | Expr::Invalid { span, .. } => *span,
        }
    }
}

/// An argument handed to an expansion. Spread arguments are trees but not
/// expressions, so expansions that need expressions reject them.
#[derive(Debug, Clone, PartialEq)]
pub enum Tree {
    Expr(Expr),
    Spread { span: Span, argument: Expr },
}

impl Tree {
    pub fn as_expr(&self) -> Option<&Expr> {
        match self {
            Tree::Expr(e) => Some(e),
            Tree::Spread { .. } => None,
        }
    }
}

impl From<Expr> for Tree {
    fn from(expr: Expr) -> Self {
        Tree::Expr(expr)
    }
}

impl Spanned for Tree {
    fn span(&self) -> Span {
        match self {
            Tree::Expr(e) => e.span(),
            Tree::Spread { span, .. } => *span,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Expr(Expr),
    Return { span: Span, value: Option<Expr> },
    /// `const name = value;`
    Const { span: Span, name: JsIdentifierName, value: Expr },
    /// `import { stable as local, ... } from "specifier";`
    Import { specifier: String, bindings: Vec<(JsIdentifierName, JsIdentifierName)> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Formal {
    pub span: Span,
    pub name: JsIdentifierName,
    pub ty: IrType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    pub span: Span,
    /// Name used for property access, e.g. `toJSON`.
    pub dot_name: String,
    /// Unique internal name.
    pub name: JsIdentifierName,
    pub is_static: bool,
    pub type_parameters: Vec<String>,
    pub this_name: Option<JsIdentifierName>,
    pub formals: Vec<Formal>,
    pub rest: Option<Formal>,
    pub return_type: IrType,
    pub body: Vec<Statement>,
    pub visibility: Visibility,
    pub may_yield: bool,
    pub shape: Option<MethodShape>,
}

impl Method {
    /// Formals other than the implicit `this`.
    pub fn value_formals(&self) -> impl Iterator<Item = &Formal> {
        let this_name = self.this_name.as_ref();
        self.formals.iter().filter(move |f| Some(&f.name) != this_name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub span: Span,
    pub dot_name: String,
    pub name: JsIdentifierName,
    pub is_static: bool,
    pub visibility: Visibility,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Member {
    Method(Method),
    Field(Field),
    Garbage { span: Span, message: String },
}

impl Member {
    pub fn dot_name(&self) -> Option<&str> {
        match self {
            Member::Method(m) => Some(&m.dot_name),
            Member::Field(f) => Some(&f.dot_name),
            Member::Garbage { .. } => None,
        }
    }

    pub fn is_instance(&self) -> bool {
        match self {
            Member::Method(m) => !m.is_static,
            Member::Field(f) => !f.is_static,
            Member::Garbage { .. } => false,
        }
    }
}

impl Spanned for Member {
    fn span(&self) -> Span {
        match self {
            Member::Method(m) => m.span,
            Member::Field(f) => f.span,
            Member::Garbage { span, .. } => *span,
        }
    }
}
