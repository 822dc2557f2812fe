//!
//! Numeric evaluator for tests. Evaluates expression trees built from
//! number literals, arithmetic, bitwise operators and the few runtime
//! helpers integer expansions call, using JS number semantics.
//!

use super::ast::{BinaryOp, Expr, UnaryOp};

pub fn to_int32(value: f64) -> i32 {
    if !value.is_finite() {
        return 0;
    }
    let modulus = 4294967296.0;
    let mut wrapped = value.trunc() % modulus;
    if wrapped < 0.0 {
        wrapped += modulus;
    }
    if wrapped >= 2147483648.0 {
        wrapped -= modulus;
    }
    wrapped as i32
}

/// Name without the `__n` suffix the registry adds.
fn base_name(name: &str) -> &str {
    match name.rsplit_once("__") {
        Some((base, n)) if n.chars().all(|c| c.is_ascii_digit()) => base,
        _ => name,
    }
}

fn callee_name(callee: &Expr) -> Option<&str> {
    match callee {
        Expr::Identifier { name, .. } => Some(base_name(name.as_str())),
        Expr::Member { property, computed: false, .. } => callee_name(property),
        _ => None,
    }
}

pub fn eval_number(expr: &Expr) -> Option<f64> {
    match expr {
        Expr::Number { value, .. } => Some(value.as_f64()),
        Expr::Unary { op: UnaryOp::Neg, operand, .. } => Some(-eval_number(operand)?),
        Expr::Binary { left, op, right, .. } => {
            let a = eval_number(left)?;
            let b = eval_number(right)?;
            Some(match op {
                BinaryOp::Add => a + b,
                BinaryOp::Sub => a - b,
                BinaryOp::Mul => a * b,
                BinaryOp::Div => a / b,
                BinaryOp::Mod => a % b,
                BinaryOp::Pow => a.powf(b),
                BinaryOp::BitAnd => (to_int32(a) & to_int32(b)) as f64,
                BinaryOp::BitOr => (to_int32(a) | to_int32(b)) as f64,
                _ => return None,
            })
        }
        Expr::Call { callee, args, .. } => {
            let values: Option<Vec<f64>> = args.iter().map(eval_number).collect();
            let values = values?;
            match (callee_name(callee)?, values.as_slice()) {
                ("imul", [a, b]) => Some(to_int32(a * b) as f64),
                ("clampInt64", [a]) => Some(a.trunc().clamp(-9223372036854775808.0, 9223372036854775807.0)),
                _ => None,
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_int32() {
        assert_eq!(to_int32(2147483648.0), -2147483648);
        assert_eq!(to_int32(-2147483649.0), 2147483647);
        assert_eq!(to_int32(3.9), 3);
        assert_eq!(to_int32(-3.9), -3);
        assert_eq!(to_int32(f64::NAN), 0);
    }

    #[test]
    fn test_base_name() {
        assert_eq!(base_name("imul__3"), "imul");
        assert_eq!(base_name("clampInt64"), "clampInt64");
        assert_eq!(base_name("a__b"), "a__b");
    }
}
