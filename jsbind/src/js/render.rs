///
/// JavaScript Rendering
///
/// Turns JS trees back into source text:
/// - Expressions, parenthesized by operator precedence
/// - Template literals and string literals with escaping
/// - Statements (`return`, `const`, `import`)
/// - Class members, used to show synthesized methods
///
/// This is a compact printer for previews, the CLI and tests, not a
/// formatter for whole modules.
///

use std::fmt;

use super::ast::{BinaryOp, Expr, Member, Method, Number, Statement, UnaryOp};

const PREC_SEQUENCE: u8 = 1;
const PREC_ASSIGN: u8 = 2;
const PREC_UNARY: u8 = 16;
const PREC_CALL: u8 = 18;
const PREC_PRIMARY: u8 = 20;

pub struct JsWriter {
    output: String,
    indent: usize,
}

impl JsWriter {
    pub fn new() -> Self {
        Self { output: String::new(), indent: 0 }
    }

    pub fn write(&mut self, s: &str) {
        self.output.push_str(s);
    }

    pub fn newline(&mut self) {
        self.output.push('\n');
        for _ in 0..self.indent {
            self.output.push_str("  ");
        }
    }

    pub fn finish(self) -> String {
        self.output
    }
}

impl Default for JsWriter {
    fn default() -> Self {
        Self::new()
    }
}

pub fn render_expression(expr: &Expr) -> String {
    let mut w = JsWriter::new();
    emit_expression(&mut w, expr);
    w.finish()
}

pub fn render_statements(statements: &[Statement]) -> String {
    let mut w = JsWriter::new();
    for (i, statement) in statements.iter().enumerate() {
        if i > 0 {
            w.newline();
        }
        emit_statement(&mut w, statement);
    }
    w.finish()
}

pub fn render_member(member: &Member) -> String {
    let mut w = JsWriter::new();
    emit_member(&mut w, member);
    w.finish()
}

fn precedence(expr: &Expr) -> u8 {
    match expr {
        Expr::Sequence { .. } => PREC_SEQUENCE,
        Expr::Binary { op, .. } => op.precedence(),
        Expr::Unary { .. } => PREC_UNARY,
        Expr::Number { value, .. } if value.as_f64().is_sign_negative() => PREC_UNARY,
        Expr::Call { .. } | Expr::New { .. } | Expr::Member { .. } => PREC_CALL,
        Expr::Identifier { .. }
        | Expr::Number { .. }
        | Expr::String { .. }
        | Expr::Null { .. }
        | Expr::This { .. }
        | Expr::Array { .. }
        | Expr::Template { .. }
        | Expr::Invalid { .. } => PREC_PRIMARY,
    }
}

fn emit_child(w: &mut JsWriter, expr: &Expr, min_precedence: u8) {
    if precedence(expr) < min_precedence {
        w.write("(");
        emit_expression(w, expr);
        w.write(")");
    } else {
        emit_expression(w, expr);
    }
}

fn emit_list(w: &mut JsWriter, exprs: &[Expr]) {
    for (i, expr) in exprs.iter().enumerate() {
        if i > 0 {
            w.write(", ");
        }
        emit_child(w, expr, PREC_ASSIGN);
    }
}

pub fn emit_expression(w: &mut JsWriter, expr: &Expr) {
    match expr {
        Expr::Identifier { name, .. } => w.write(name.as_str()),

        Expr::Number { value, .. } => w.write(&number_to_js(*value)),

        Expr::String { value, .. } => w.write(&quote_string(value)),

        Expr::Null { .. } => w.write("null"),

        Expr::This { .. } => w.write("this"),

        Expr::Array { elements, .. } => {
            w.write("[");
            emit_list(w, elements);
            w.write("]");
        }

        Expr::Member { object, property, computed, .. } => {
            if matches!(**object, Expr::Number { .. }) && !computed {
                w.write("(");
                emit_expression(w, object);
                w.write(")");
            } else {
                emit_child(w, object, PREC_CALL);
            }
            if *computed {
                w.write("[");
                emit_expression(w, property);
                w.write("]");
            } else {
                w.write(".");
                emit_expression(w, property);
            }
        }

        Expr::Call { callee, args, .. } => {
            emit_child(w, callee, PREC_CALL);
            w.write("(");
            emit_list(w, args);
            w.write(")");
        }

        Expr::New { callee, args, .. } => {
            w.write("new ");
            if matches!(**callee, Expr::Call { .. } | Expr::New { .. }) {
                w.write("(");
                emit_expression(w, callee);
                w.write(")");
            } else {
                emit_child(w, callee, PREC_CALL);
            }
            w.write("(");
            emit_list(w, args);
            w.write(")");
        }

        Expr::Binary { left, op, right, .. } => {
            let p = op.precedence();
            let (left_min, right_min) = if op.is_right_associative() { (p + 1, p) } else { (p, p + 1) };
            // `-a ** b` is a syntax error
            let left_min = if *op == BinaryOp::Pow { left_min.max(PREC_UNARY + 1) } else { left_min };
            emit_child(w, left, left_min);
            w.write(" ");
            w.write(op.as_str());
            w.write(" ");
            emit_child(w, right, right_min);
        }

        Expr::Unary { op, operand, .. } => {
            w.write(op.as_str());
            let mut inner = JsWriter::new();
            emit_child(&mut inner, operand, PREC_UNARY);
            let inner = inner.finish();
            if *op == UnaryOp::Neg && inner.starts_with('-') {
                w.write(" ");
            }
            w.write(&inner);
        }

        Expr::Sequence { exprs, .. } => emit_list(w, exprs),

        Expr::Template { quasis, holes, .. } => {
            w.write("`");
            for (i, quasi) in quasis.iter().enumerate() {
                w.write(&escape_template(quasi));
                if let Some(hole) = holes.get(i) {
                    w.write("${");
                    emit_expression(w, hole);
                    w.write("}");
                }
            }
            w.write("`");
        }

        Expr::Invalid { message, .. } => {
            w.write("/* ");
            w.write(&message.replace("*/", "* /"));
            w.write(" */ undefined");
        }
    }
}

pub fn emit_statement(w: &mut JsWriter, statement: &Statement) {
    match statement {
        Statement::Expr(expr) => {
            emit_expression(w, expr);
            w.write(";");
        }
        Statement::Return { value, .. } => {
            w.write("return");
            if let Some(value) = value {
                w.write(" ");
                emit_expression(w, value);
            }
            w.write(";");
        }
        Statement::Const { name, value, .. } => {
            w.write("const ");
            w.write(name.as_str());
            w.write(" = ");
            emit_child(w, value, PREC_ASSIGN);
            w.write(";");
        }
        Statement::Import { specifier, bindings } => {
            w.write("import { ");
            for (i, (exported, local)) in bindings.iter().enumerate() {
                if i > 0 {
                    w.write(", ");
                }
                w.write(exported.as_str());
                if exported != local {
                    w.write(" as ");
                    w.write(local.as_str());
                }
            }
            w.write(" } from ");
            w.write(&quote_string(specifier));
            w.write(";");
        }
    }
}

pub fn emit_member(w: &mut JsWriter, member: &Member) {
    match member {
        Member::Method(method) => emit_method(w, method),
        Member::Field(field) => {
            if field.is_static {
                w.write("static ");
            }
            if let Some(prefix) = field.visibility.keyword() {
                w.write(prefix);
            }
            w.write(&field.dot_name);
            w.write(";");
        }
        Member::Garbage { message, .. } => {
            w.write("/* ");
            w.write(&message.replace("*/", "* /"));
            w.write(" */");
        }
    }
}

fn emit_method(w: &mut JsWriter, method: &Method) {
    if method.is_static {
        w.write("static ");
    }
    if method.may_yield {
        w.write("*");
    }
    if let Some(prefix) = method.visibility.keyword() {
        w.write(prefix);
    }
    w.write(&method.dot_name);
    w.write("(");
    let mut first = true;
    for formal in method.value_formals() {
        if !first {
            w.write(", ");
        }
        first = false;
        w.write(formal.name.as_str());
    }
    if let Some(rest) = &method.rest {
        if !first {
            w.write(", ");
        }
        w.write("...");
        w.write(rest.name.as_str());
    }
    w.write(") {");
    w.indent += 1;
    for statement in &method.body {
        w.newline();
        emit_statement(w, statement);
    }
    w.indent -= 1;
    w.newline();
    w.write("}");
}

fn number_to_js(value: Number) -> String {
    match value {
        Number::Int(i) => i.to_string(),
        Number::Float(f) if f.is_nan() => "NaN".to_string(),
        Number::Float(f) if f.is_infinite() => {
            if f > 0.0 { "Infinity".to_string() } else { "-Infinity".to_string() }
        }
        Number::Float(f) => f.to_string(),
    }
}

pub fn quote_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{2028}' | '\u{2029}' => out.push_str(&format!("\\u{:04x}", c as u32)),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn escape_template(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            '`' => out.push_str("\\`"),
            '$' if chars.peek() == Some(&'{') => out.push_str("\\$"),
            // Raw CR and CRLF read back as LF inside a template.
            '\r' => out.push_str("\\r"),
            '\u{2028}' | '\u{2029}' => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_expression(self))
    }
}
