/*! Lower a circuit AST into executable runtime calls.
 *
 * One depth-first pass. Declarations update the scope as they are met, so a name is only visible
 * after its declaration. Every lowering step returns a `GenResult`, and `?` stops the pass at the
 * first failure; the context records that error and refuses further work.
 */

mod context;
mod definition_transformer;
mod errors;
mod expression_transformer;
pub mod field_arithmetic;
mod statement_transformer;

pub use context::{GenerationContext, Scope, Symbol, SymbolKind, SymbolTable};
pub use definition_transformer::DefinitionTransformer;
pub use errors::{GenError, GenResult};
pub use expression_transformer::ExpressionTransformer;
pub use statement_transformer::StatementTransformer;

use tracing::trace;
use zkgen_core::{Circuit, Expr, FieldConfig, Node, NodeKind, Operator, Span, Stmt};

/// What lowering one node produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    /// Only the scope changed (declarations, definitions, component bindings).
    Nothing,
    Expr(Expr),
    Stmt(Stmt),
}

impl Fragment {
    pub fn is_nothing(&self) -> bool {
        matches!(self, Fragment::Nothing)
    }
}

impl GenerationContext {
    /// Lower `node`. The first error is recorded in the context; once one is recorded every later
    /// call returns it without doing any work.
    pub fn generate(&mut self, node: &Node) -> GenResult<Fragment> {
        if let Some(error) = self.error() {
            return Err(error.clone());
        }
        self.dispatch(node).map_err(|error| self.record_error(error))
    }

    pub(crate) fn dispatch(&mut self, node: &Node) -> GenResult<Fragment> {
        trace!(kind = node.tag(), span = %node.span, "lowering node");

        match &node.kind {
            NodeKind::Number { value } => Ok(Fragment::Expr(self.transform_number(value))),
            NodeKind::Variable { name, selectors } => self
                .transform_variable(name, selectors, node.span)
                .map(Fragment::Expr),
            NodeKind::Pin { component, pin } => self
                .transform_pin(component, pin, node.span)
                .map(Fragment::Expr),
            NodeKind::Op { op, values } => self.dispatch_operation(op, values, node.span),
            NodeKind::Declare { declare_type, name } => {
                self.transform_declaration(declare_type, name, node.span)?;
                Ok(Fragment::Nothing)
            }
            NodeKind::FunctionCall { name, params } => {
                self.transform_call(name, params).map(Fragment::Expr)
            }
            NodeKind::Block { statements } => self
                .transform_block(statements)
                .map(|body| Fragment::Stmt(Stmt::Block(body))),
            NodeKind::For {
                init,
                condition,
                step,
                body,
            } => self
                .transform_for(init, condition, step, body)
                .map(Fragment::Stmt),
            NodeKind::While { condition, body } => {
                self.transform_while(condition, body).map(Fragment::Stmt)
            }
            NodeKind::Return { value } => self.transform_return(value).map(Fragment::Stmt),
            NodeKind::TemplateDef {
                name,
                params,
                block,
            } => {
                self.transform_template(name, params, block, node.span)?;
                Ok(Fragment::Nothing)
            }
            NodeKind::FunctionDef {
                name,
                params,
                block,
            } => {
                self.transform_function(name, params, block, node.span)?;
                Ok(Fragment::Nothing)
            }
            // Inclusion is resolved upstream; a spliced block is lowered in place.
            NodeKind::Include { block, .. } => match block {
                Some(block) => self.dispatch(block),
                None => Ok(Fragment::Nothing),
            },
            NodeKind::Array { values } => self.transform_array(values).map(Fragment::Expr),
        }
    }

    fn dispatch_operation(
        &mut self,
        symbol: &str,
        values: &[Node],
        span: Span,
    ) -> GenResult<Fragment> {
        let op = Operator::from_symbol(symbol).ok_or_else(|| GenError::InvalidOperator {
            op: symbol.to_string(),
            span,
        })?;
        if values.len() != op.arity() {
            return Err(GenError::OperandCount {
                op: symbol.to_string(),
                expected: op.arity(),
                actual: values.len(),
                span,
            });
        }

        let expr = match op {
            Operator::Assign | Operator::SignalAssign => {
                let value = &values[1];
                let store = self
                    .transform_assignment(&values[0], span, |ctx| ctx.transform_expression(value))?;
                return Ok(store.map_or(Fragment::Nothing, Fragment::Expr));
            }
            Operator::AddAssign => {
                return self.transform_compound_assignment(
                    &values[0],
                    &values[1],
                    field_arithmetic::add,
                    span,
                )
            }
            Operator::MulAssign => {
                return self.transform_compound_assignment(
                    &values[0],
                    &values[1],
                    field_arithmetic::mul,
                    span,
                )
            }
            Operator::ConstrainedAssign => {
                self.transform_constrained_assignment(&values[0], &values[1], span)?
            }
            Operator::Constrain => self.transform_constraint(&values[0], &values[1])?,
            Operator::PostIncrement => self.transform_increment(&values[0], true, span)?,
            Operator::PreIncrement => self.transform_increment(&values[0], false, span)?,
            Operator::Neg => field_arithmetic::neg(self.transform_expression(&values[0])?),
            Operator::Ternary => {
                let condition = self.transform_expression(&values[0])?;
                let then = self.transform_expression(&values[1])?;
                let otherwise = self.transform_expression(&values[2])?;
                field_arithmetic::ternary(condition, then, otherwise)
            }
            binary => {
                let lhs = self.transform_expression(&values[0])?;
                let rhs = self.transform_expression(&values[1])?;
                let lower = field_arithmetic::binary(binary).ok_or_else(|| {
                    GenError::InvalidOperator {
                        op: symbol.to_string(),
                        span,
                    }
                })?;
                lower(lhs, rhs)
            }
        };
        Ok(Fragment::Expr(expr))
    }
}

/// Lower a whole compilation unit and package its templates and functions.
///
/// Top-level statements outside definitions only affect the scope; their output is discarded.
pub fn compile(root: &Node, field: &FieldConfig) -> GenResult<Circuit> {
    let mut ctx = GenerationContext::new();
    ctx.generate(root)?;
    ctx.into_circuit(field)
}
