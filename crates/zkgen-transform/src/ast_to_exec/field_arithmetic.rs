//! Field arithmetic over already-lowered operands.
//!
//! Field operators reduce modulo `P`. Subtraction and negation add `P` first so no intermediate
//! value is negative. Bitwise operators work on the raw integer and are bounded by `MASK` rather
//! than reduced.

use zkgen_core::{BigIntOp, Expr, Operator};

/// Shift amounts above this yield 0.
pub const SHIFT_LIMIT: u64 = 256;

fn reduce(value: Expr) -> Expr {
    Expr::binary(BigIntOp::Mod, value, Expr::Prime)
}

fn masked(value: Expr) -> Expr {
    Expr::binary(BigIntOp::BitAnd, value, Expr::Mask)
}

/// `(a + b) mod P`
pub fn add(a: Expr, b: Expr) -> Expr {
    reduce(Expr::binary(BigIntOp::Add, a, b))
}

/// `(a + P - b) mod P`
pub fn sub(a: Expr, b: Expr) -> Expr {
    let shifted = Expr::binary(BigIntOp::Add, a, Expr::Prime);
    reduce(Expr::binary(BigIntOp::Sub, shifted, b))
}

/// `(P - a) mod P`
pub fn neg(a: Expr) -> Expr {
    reduce(Expr::binary(BigIntOp::Sub, Expr::Prime, a))
}

/// `(a * b) mod P`
pub fn mul(a: Expr, b: Expr) -> Expr {
    reduce(Expr::binary(BigIntOp::Mul, a, b))
}

/// `a^b mod P`. The exponent is used as is, not reduced modulo `P - 1`.
pub fn pow(a: Expr, b: Expr) -> Expr {
    Expr::mod_pow(a, b, Expr::Prime)
}

/// `(a & b) & MASK`
pub fn bit_and(a: Expr, b: Expr) -> Expr {
    masked(Expr::binary(BigIntOp::BitAnd, a, b))
}

pub fn shl(a: Expr, b: Expr) -> Expr {
    bounded_shift(BigIntOp::Shl, a, b)
}

pub fn shr(a: Expr, b: Expr) -> Expr {
    bounded_shift(BigIntOp::Shr, a, b)
}

// `b` appears twice in the output: once in the bound check and once in the shift.
fn bounded_shift(op: BigIntOp, a: Expr, b: Expr) -> Expr {
    let too_far = Expr::binary(BigIntOp::Gt, b.clone(), Expr::small(SHIFT_LIMIT));
    Expr::select(too_far, Expr::small(0), masked(Expr::binary(op, a, b)))
}

/// 1 if `a < b` on the raw integers, else 0.
pub fn lt(a: Expr, b: Expr) -> Expr {
    Expr::binary(BigIntOp::Lt, a, b)
}

/// 1 if `a == b`, else 0.
pub fn eq(a: Expr, b: Expr) -> Expr {
    Expr::binary(BigIntOp::Eq, a, b)
}

/// `condition != 0 ? then : otherwise`, only the chosen branch runs.
pub fn ternary(condition: Expr, then: Expr, otherwise: Expr) -> Expr {
    let truthy = Expr::binary(BigIntOp::Ne, condition, Expr::small(0));
    Expr::select(truthy, then, otherwise)
}

/// Lowering for a binary field or bitwise operator, `None` for assignment forms.
pub fn binary(op: Operator) -> Option<fn(Expr, Expr) -> Expr> {
    let lower: fn(Expr, Expr) -> Expr = match op {
        Operator::Add => add,
        Operator::Sub => sub,
        Operator::Mul => mul,
        Operator::Pow => pow,
        Operator::BitAnd => bit_and,
        Operator::Shl => shl,
        Operator::Shr => shr,
        Operator::Lt => lt,
        Operator::Eq => eq,
        _ => return None,
    };
    Some(lower)
}

pub fn increment(value: Expr) -> Expr {
    add(value, Expr::small(1))
}

/// `(new + P - 1) mod P`: given the result of `x = x + 1`, yields the value `x` held before.
pub fn previous_value(incremented: Expr) -> Expr {
    sub(incremented, Expr::small(1))
}
