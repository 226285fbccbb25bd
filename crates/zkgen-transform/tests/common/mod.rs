//! In-memory runtime for checking what lowered circuits do when executed.
#![allow(dead_code)]

use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};
use std::collections::HashMap;
use zkgen_core::{BigIntOp, Circuit, Expr, Stmt};

type Key = (String, Vec<BigUint>);

/// Observable runtime effect, in execution order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    SetVariable(String, BigUint),
    SetSignal(String, BigUint),
    SetPin(String, String, BigUint),
    AssertEqual(BigUint, BigUint),
}

pub struct MemoryRuntime<'c> {
    circuit: &'c Circuit,
    frames: Vec<HashMap<Key, BigUint>>,
    signals: HashMap<Key, BigUint>,
    pins: HashMap<(String, String), BigUint>,
    pub effects: Vec<Effect>,
}

impl<'c> MemoryRuntime<'c> {
    pub fn new(circuit: &'c Circuit) -> Self {
        Self {
            circuit,
            frames: vec![HashMap::new()],
            signals: HashMap::new(),
            pins: HashMap::new(),
            effects: Vec::new(),
        }
    }

    /// Seed an input signal without recording an effect.
    pub fn with_signal(mut self, name: &str, value: u64) -> Self {
        self.signals
            .insert((name.to_string(), vec![]), BigUint::from(value));
        self
    }

    pub fn signal(&self, name: &str) -> Option<&BigUint> {
        self.signals.get(&(name.to_string(), vec![]))
    }

    pub fn variable(&self, name: &str) -> Option<&BigUint> {
        self.frames.last()?.get(&(name.to_string(), vec![]))
    }

    /// Run a template body. Its frame stays on top so variables can be inspected afterwards.
    pub fn run_template(&mut self, name: &str, args: &[BigUint]) {
        let circuit = self.circuit;
        let def = circuit
            .template(name)
            .unwrap_or_else(|| panic!("no template {name}"));
        self.frames.push(bind(&def.params, args));
        for stmt in &def.body {
            if self.exec(stmt).is_some() {
                break;
            }
        }
    }

    pub fn call(&mut self, name: &str, args: &[BigUint]) -> BigUint {
        let circuit = self.circuit;
        let def = circuit
            .function(name)
            .unwrap_or_else(|| panic!("no function {name}"));
        let params = &circuit.function_params[name];
        self.frames.push(bind(params, args));
        let mut result = BigUint::zero();
        for stmt in &def.body {
            if let Some(value) = self.exec(stmt) {
                result = value;
                break;
            }
        }
        self.frames.pop();
        result
    }

    /// Run `stmt`; `Some` when it returned.
    pub fn exec(&mut self, stmt: &Stmt) -> Option<BigUint> {
        match stmt {
            Stmt::Expr(expr) => {
                self.eval(expr);
                None
            }
            Stmt::Block(stmts) => stmts.iter().find_map(|s| self.exec(s)),
            Stmt::For {
                init,
                condition,
                step,
                body,
            } => {
                if let Some(init) = init {
                    self.exec(init);
                }
                while !self.eval(condition).is_zero() {
                    if let Some(value) = self.exec(body) {
                        return Some(value);
                    }
                    if let Some(step) = step {
                        self.exec(step);
                    }
                }
                None
            }
            Stmt::While { condition, body } => {
                while !self.eval(condition).is_zero() {
                    if let Some(value) = self.exec(body) {
                        return Some(value);
                    }
                }
                None
            }
            Stmt::Return(expr) => Some(self.eval(expr)),
        }
    }

    pub fn eval(&mut self, expr: &Expr) -> BigUint {
        match expr {
            Expr::Number(text) => text.parse().expect("decimal literal"),
            Expr::Prime => self.circuit.prime.clone(),
            Expr::Mask => self.circuit.mask.clone(),
            Expr::Binary { op, lhs, rhs } => {
                let a = self.eval(lhs);
                let b = self.eval(rhs);
                binary(*op, a, b)
            }
            Expr::ModPow {
                base,
                exponent,
                modulus,
            } => {
                let base = self.eval(base);
                let exponent = self.eval(exponent);
                let modulus = self.eval(modulus);
                base.modpow(&exponent, &modulus)
            }
            Expr::Select {
                condition,
                then,
                otherwise,
            } => {
                if self.eval(condition).is_zero() {
                    self.eval(otherwise)
                } else {
                    self.eval(then)
                }
            }
            Expr::GetVariable { name, indices } => {
                let key = (name.clone(), self.eval_all(indices));
                self.frame().get(&key).cloned().unwrap_or_default()
            }
            Expr::SetVariable {
                name,
                indices,
                value,
            } => {
                let key = (name.clone(), self.eval_all(indices));
                let value = self.eval(value);
                self.frame().insert(key, value.clone());
                self.effects
                    .push(Effect::SetVariable(name.clone(), value.clone()));
                value
            }
            Expr::GetSignal { name, indices } => {
                let key = (name.clone(), self.eval_all(indices));
                self.signals.get(&key).cloned().unwrap_or_default()
            }
            Expr::SetSignal {
                name,
                indices,
                value,
            } => {
                let key = (name.clone(), self.eval_all(indices));
                let value = self.eval(value);
                self.signals.insert(key, value.clone());
                self.effects
                    .push(Effect::SetSignal(name.clone(), value.clone()));
                value
            }
            Expr::GetPin { component, pin, .. } => self
                .pins
                .get(&(component.clone(), pin.clone()))
                .cloned()
                .unwrap_or_default(),
            Expr::SetPin {
                component,
                pin,
                value,
                ..
            } => {
                let value = self.eval(value);
                self.pins
                    .insert((component.clone(), pin.clone()), value.clone());
                self.effects
                    .push(Effect::SetPin(component.clone(), pin.clone(), value.clone()));
                value
            }
            Expr::AssertEqual { lhs, rhs } => {
                let a = self.eval(lhs);
                let b = self.eval(rhs);
                self.effects.push(Effect::AssertEqual(a.clone(), b));
                a
            }
            Expr::CallFunction { name, args } => {
                let args = self.eval_all(args);
                self.call(name, &args)
            }
            Expr::Array(_) => panic!("array literal used as a scalar"),
        }
    }

    fn eval_all(&mut self, exprs: &[Expr]) -> Vec<BigUint> {
        exprs.iter().map(|e| self.eval(e)).collect()
    }

    fn frame(&mut self) -> &mut HashMap<Key, BigUint> {
        self.frames.last_mut().expect("frame")
    }
}

fn bind(params: &[String], args: &[BigUint]) -> HashMap<Key, BigUint> {
    assert_eq!(params.len(), args.len(), "argument count");
    params
        .iter()
        .zip(args)
        .map(|(name, value)| ((name.clone(), vec![]), value.clone()))
        .collect()
}

fn binary(op: BigIntOp, a: BigUint, b: BigUint) -> BigUint {
    let flag = |cond: bool| BigUint::from(cond as u8);
    match op {
        BigIntOp::Add => a + b,
        // Underflow panics, which is what the lowering must never trigger.
        BigIntOp::Sub => a - b,
        BigIntOp::Mul => a * b,
        BigIntOp::Mod => a % b,
        BigIntOp::BitAnd => a & b,
        BigIntOp::Shl => a << b.to_usize().expect("shift amount"),
        BigIntOp::Shr => a >> b.to_usize().expect("shift amount"),
        BigIntOp::Lt => flag(a < b),
        BigIntOp::Gt => flag(a > b),
        BigIntOp::Eq => flag(a == b),
        BigIntOp::Ne => flag(a != b),
    }
}
