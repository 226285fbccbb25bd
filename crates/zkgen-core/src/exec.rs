/*! Executable representation produced by lowering.
 *
 * A tree of runtime calls (`getVariable`, `setSignal`, `assertEqual`, ...) and big-integer
 * arithmetic. Nothing here evaluates anything; the runtime receives these trees together with the
 * field constants `P` and `MASK`, which expressions reference symbolically through `Expr::Prime`
 * and `Expr::Mask`.
 */

use crate::source_location::Span;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Arbitrary-precision integer operation. Comparisons yield `1` or `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BigIntOp {
    Add,
    Sub,
    Mul,
    Mod,
    BitAnd,
    Shl,
    Shr,
    Lt,
    Gt,
    Eq,
    Ne,
}

impl BigIntOp {
    pub fn name(&self) -> &'static str {
        match self {
            BigIntOp::Add => "add",
            BigIntOp::Sub => "sub",
            BigIntOp::Mul => "mul",
            BigIntOp::Mod => "mod",
            BigIntOp::BitAnd => "and",
            BigIntOp::Shl => "shl",
            BigIntOp::Shr => "shr",
            BigIntOp::Lt => "lt",
            BigIntOp::Gt => "gt",
            BigIntOp::Eq => "eq",
            BigIntOp::Ne => "ne",
        }
    }
}

impl fmt::Display for BigIntOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expr {
    /// Decimal-string literal; never a fixed-width number.
    Number(String),
    Prime,
    Mask,
    Binary {
        op: BigIntOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    ModPow {
        base: Box<Expr>,
        exponent: Box<Expr>,
        modulus: Box<Expr>,
    },
    /// Only the chosen branch is evaluated.
    Select {
        condition: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
    GetVariable {
        name: String,
        indices: Vec<Expr>,
    },
    SetVariable {
        name: String,
        indices: Vec<Expr>,
        value: Box<Expr>,
    },
    GetSignal {
        name: String,
        indices: Vec<Expr>,
    },
    SetSignal {
        name: String,
        indices: Vec<Expr>,
        value: Box<Expr>,
    },
    GetPin {
        component: String,
        component_indices: Vec<Expr>,
        pin: String,
        pin_indices: Vec<Expr>,
    },
    SetPin {
        component: String,
        component_indices: Vec<Expr>,
        pin: String,
        pin_indices: Vec<Expr>,
        value: Box<Expr>,
    },
    AssertEqual {
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    CallFunction {
        name: String,
        args: Vec<Expr>,
    },
    Array(Vec<Expr>),
}

impl Expr {
    pub fn number(value: &BigUint) -> Self {
        Expr::Number(value.to_str_radix(10))
    }

    pub fn small(value: u64) -> Self {
        Expr::Number(value.to_string())
    }

    pub fn binary(op: BigIntOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn mod_pow(base: Expr, exponent: Expr, modulus: Expr) -> Self {
        Expr::ModPow {
            base: Box::new(base),
            exponent: Box::new(exponent),
            modulus: Box::new(modulus),
        }
    }

    pub fn select(condition: Expr, then: Expr, otherwise: Expr) -> Self {
        Expr::Select {
            condition: Box::new(condition),
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        }
    }

    pub fn assert_equal(lhs: Expr, rhs: Expr) -> Self {
        Expr::AssertEqual {
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    /// Runtime API name for call expressions, `None` for arithmetic.
    pub fn runtime_call(&self) -> Option<&'static str> {
        match self {
            Expr::GetVariable { .. } => Some("getVariable"),
            Expr::SetVariable { .. } => Some("setVariable"),
            Expr::GetSignal { .. } => Some("getSignal"),
            Expr::SetSignal { .. } => Some("setSignal"),
            Expr::GetPin { .. } => Some("getPin"),
            Expr::SetPin { .. } => Some("setPin"),
            Expr::AssertEqual { .. } => Some("assertEqual"),
            Expr::CallFunction { .. } => Some("callFunction"),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stmt {
    Expr(Expr),
    Block(Vec<Stmt>),
    For {
        init: Option<Box<Stmt>>,
        condition: Expr,
        step: Option<Box<Stmt>>,
        body: Box<Stmt>,
    },
    While {
        condition: Expr,
        body: Box<Stmt>,
    },
    Return(Expr),
}

/// Standalone body of a template or function, run by the runtime against its own context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Definition {
    pub params: Vec<String>,
    pub body: Vec<Stmt>,
    #[serde(default)]
    pub span: Span,
}

impl Definition {
    pub fn new(params: Vec<String>, body: Vec<Stmt>, span: Span) -> Self {
        Self { params, body, span }
    }
}
