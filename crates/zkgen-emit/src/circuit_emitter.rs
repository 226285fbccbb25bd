use crate::config::EmitterConfig;
use crate::emitter::{EmitContext, EmitHelper, EmitResult, Emitter};
use crate::output::OutputFormat;
use anyhow::{bail, Result};
use colored::Color;
use std::io::Write;
use zkgen_core::{Circuit, Definition, Expr, Stmt};

/// Writes a compiled circuit as a readable listing or as JSON.
pub struct CircuitEmitter {
    config: EmitterConfig,
}

impl CircuitEmitter {
    pub fn new(config: EmitterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EmitterConfig {
        &self.config
    }

    pub fn emit<W: Write>(&self, circuit: &Circuit, writer: &mut W) -> EmitResult {
        let mut context = self.context();
        self.emit_with(circuit, writer, &mut context)
    }

    pub fn emit_as<W: Write>(
        &self,
        format: OutputFormat,
        circuit: &Circuit,
        writer: &mut W,
    ) -> EmitResult {
        match format {
            OutputFormat::Text => self.emit(circuit, writer),
            OutputFormat::Json => {
                writeln!(writer, "{}", circuit.to_json()?)?;
                Ok(())
            }
        }
    }

    fn emit_header<W: Write>(
        &self,
        circuit: &Circuit,
        writer: &mut W,
        context: &EmitContext,
    ) -> EmitResult {
        EmitHelper::write_line(writer, context, &format!("P = {}", circuit.prime))?;
        EmitHelper::write_line(writer, context, &format!("MASK = {}", circuit.mask))?;
        if self.config.verbosity.should_print_registry() {
            EmitHelper::write_comment(
                writer,
                context,
                &format!(
                    "{} templates, {} functions",
                    circuit.templates.len(),
                    circuit.functions.len()
                ),
            )?;
            let width = circuit.field()?.mask_bits();
            EmitHelper::write_comment(writer, context, &format!("MASK width: {} bits", width))?;
        }
        Ok(())
    }

    fn emit_definition<W: Write>(
        &self,
        keyword: &str,
        name: &str,
        definition: &Definition,
        registered: Option<&[String]>,
        writer: &mut W,
        context: &mut EmitContext,
    ) -> EmitResult {
        if self.config.verbosity.should_print_spans() && !definition.span.is_unknown() {
            EmitHelper::write_comment(writer, context, &format!("defined at {}", definition.span))?;
        }
        if let Some(params) = registered {
            if self.config.verbosity.should_print_registry() {
                EmitHelper::write_comment(
                    writer,
                    context,
                    &format!("registered params: [{}]", params.join(", ")),
                )?;
            }
        }

        let header = format!(
            "{} {}({})",
            EmitHelper::paint(context, keyword, Color::Blue),
            EmitHelper::paint(context, name, Color::Yellow),
            definition.params.join(", ")
        );
        EmitHelper::write_block(writer, context, &header, |w, c| {
            definition.body.iter().try_for_each(|stmt| emit_stmt(stmt, w, c))
        })
    }
}

impl Default for CircuitEmitter {
    fn default() -> Self {
        Self::new(EmitterConfig::default())
    }
}

impl Emitter for CircuitEmitter {
    type Item = Circuit;

    fn emit_with<W: Write>(
        &self,
        circuit: &Circuit,
        writer: &mut W,
        context: &mut EmitContext,
    ) -> EmitResult {
        let mut separate = false;
        if self.config.include_header {
            self.emit_header(circuit, writer, context)?;
            separate = true;
        }

        for (name, template) in &circuit.templates {
            if separate {
                EmitHelper::write_blank(writer)?;
            }
            self.emit_definition("template", name, template, None, writer, context)?;
            separate = true;
        }

        for (name, function) in &circuit.functions {
            if separate {
                EmitHelper::write_blank(writer)?;
            }
            let registered = circuit.function_params.get(name).map(Vec::as_slice);
            self.emit_definition("function", name, function, registered, writer, context)?;
            separate = true;
        }
        Ok(())
    }

    fn context(&self) -> EmitContext {
        EmitContext::from_config(&self.config)
    }
}

fn emit_stmt<W: Write>(stmt: &Stmt, writer: &mut W, context: &mut EmitContext) -> EmitResult {
    match stmt {
        Stmt::Expr(expr) => {
            EmitHelper::write_line(writer, context, &format!("{};", render_expr(expr)))
        }
        Stmt::Block(stmts) => EmitHelper::write_block(writer, context, "", |w, c| {
            stmts.iter().try_for_each(|s| emit_stmt(s, w, c))
        }),
        Stmt::For {
            init,
            condition,
            step,
            body,
        } => {
            let header = format!(
                "for ({}; {}; {})",
                render_clause(init.as_deref())?,
                render_expr(condition),
                render_clause(step.as_deref())?
            );
            emit_loop(&header, body, writer, context)
        }
        Stmt::While { condition, body } => {
            emit_loop(&format!("while ({})", render_expr(condition)), body, writer, context)
        }
        Stmt::Return(expr) => {
            EmitHelper::write_line(writer, context, &format!("return {};", render_expr(expr)))
        }
    }
}

fn emit_loop<W: Write>(
    header: &str,
    body: &Stmt,
    writer: &mut W,
    context: &mut EmitContext,
) -> EmitResult {
    EmitHelper::write_block(writer, context, header, |w, c| match body {
        Stmt::Block(stmts) => stmts.iter().try_for_each(|s| emit_stmt(s, w, c)),
        other => emit_stmt(other, w, c),
    })
}

/// Loop header clause: a single expression, or empty.
fn render_clause(stmt: Option<&Stmt>) -> Result<String> {
    match stmt {
        None => Ok(String::new()),
        Some(Stmt::Expr(expr)) => Ok(render_expr(expr)),
        Some(Stmt::Block(stmts)) => {
            let parts = stmts
                .iter()
                .map(|s| render_clause(Some(s)))
                .collect::<Result<Vec<_>>>()?;
            Ok(parts.join(", "))
        }
        Some(other) => bail!("statement cannot appear in a loop header: {:?}", other),
    }
}

fn render_list(exprs: &[Expr]) -> String {
    exprs.iter().map(render_expr).collect::<Vec<_>>().join(", ")
}

/// One-line rendering of an expression, runtime calls spelled as the runtime API names them.
pub fn render_expr(expr: &Expr) -> String {
    let call = expr.runtime_call().unwrap_or_default();
    match expr {
        Expr::Number(text) => text.clone(),
        Expr::Prime => "P".to_string(),
        Expr::Mask => "MASK".to_string(),
        Expr::Binary { op, lhs, rhs } => {
            format!("{}({}, {})", op.name(), render_expr(lhs), render_expr(rhs))
        }
        Expr::ModPow {
            base,
            exponent,
            modulus,
        } => format!(
            "modpow({}, {}, {})",
            render_expr(base),
            render_expr(exponent),
            render_expr(modulus)
        ),
        Expr::Select {
            condition,
            then,
            otherwise,
        } => format!(
            "({} ? {} : {})",
            render_expr(condition),
            render_expr(then),
            render_expr(otherwise)
        ),
        Expr::GetVariable { name, indices } | Expr::GetSignal { name, indices } => {
            format!("{}({:?}, [{}])", call, name, render_list(indices))
        }
        Expr::SetVariable {
            name,
            indices,
            value,
        }
        | Expr::SetSignal {
            name,
            indices,
            value,
        } => format!(
            "{}({:?}, [{}], {})",
            call,
            name,
            render_list(indices),
            render_expr(value)
        ),
        Expr::GetPin {
            component,
            component_indices,
            pin,
            pin_indices,
        } => format!(
            "{}({:?}, [{}], {:?}, [{}])",
            call,
            component,
            render_list(component_indices),
            pin,
            render_list(pin_indices)
        ),
        Expr::SetPin {
            component,
            component_indices,
            pin,
            pin_indices,
            value,
        } => format!(
            "{}({:?}, [{}], {:?}, [{}], {})",
            call,
            component,
            render_list(component_indices),
            pin,
            render_list(pin_indices),
            render_expr(value)
        ),
        Expr::AssertEqual { lhs, rhs } => {
            format!("{}({}, {})", call, render_expr(lhs), render_expr(rhs))
        }
        Expr::CallFunction { name, args } => {
            format!("{}({:?}, [{}])", call, name, render_list(args))
        }
        Expr::Array(values) => format!("[{}]", render_list(values)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use zkgen_core::BigIntOp;

    fn get(name: &str) -> Expr {
        Expr::GetVariable {
            name: name.into(),
            indices: vec![],
        }
    }

    #[test]
    fn test_render_field_arithmetic_as_prefix_calls() {
        let sum = Expr::binary(
            BigIntOp::Mod,
            Expr::binary(BigIntOp::Add, get("a"), get("b")),
            Expr::Prime,
        );
        assert_eq!(
            render_expr(&sum),
            r#"mod(add(getVariable("a", []), getVariable("b", [])), P)"#
        );
        assert_eq!(
            render_expr(&Expr::mod_pow(get("a"), Expr::small(3), Expr::Prime)),
            r#"modpow(getVariable("a", []), 3, P)"#
        );
    }

    #[test]
    fn test_render_select() {
        let select = Expr::select(get("c"), Expr::small(1), Expr::Mask);
        assert_eq!(render_expr(&select), r#"(getVariable("c", []) ? 1 : MASK)"#);
    }

    #[test]
    fn test_render_pin_access() {
        let set = Expr::SetPin {
            component: "mux".into(),
            component_indices: vec![Expr::small(2)],
            pin: "in".into(),
            pin_indices: vec![Expr::small(0), get("i")],
            value: Box::new(Expr::small(7)),
        };
        assert_eq!(
            render_expr(&set),
            r#"setPin("mux", [2], "in", [0, getVariable("i", [])], 7)"#
        );
    }

    #[test]
    fn test_render_call_and_array() {
        let call = Expr::CallFunction {
            name: "f".into(),
            args: vec![Expr::Array(vec![Expr::small(1), Expr::small(2)])],
        };
        assert_eq!(render_expr(&call), r#"callFunction("f", [[1, 2]])"#);
    }

    #[test]
    fn test_loop_header_rejects_nested_loops() {
        let nested = Stmt::While {
            condition: Expr::small(0),
            body: Box::new(Stmt::Block(vec![])),
        };
        assert!(render_clause(Some(&nested)).is_err());
        assert_eq!(render_clause(None).unwrap(), "");
    }
}
