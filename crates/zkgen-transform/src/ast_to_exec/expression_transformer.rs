use super::context::{GenerationContext, SymbolKind};
use super::errors::{GenError, GenResult};
use super::Fragment;
use num_bigint::BigUint;
use zkgen_core::{Expr, Node, Reference, Span};

/// Lowering of value-producing nodes: literals, references, arrays and calls.
pub trait ExpressionTransformer {
    /// Lower `node`, which must produce a value.
    fn transform_expression(&mut self, node: &Node) -> GenResult<Expr>;

    fn transform_expressions(&mut self, nodes: &[Node]) -> GenResult<Vec<Expr>>;

    fn transform_number(&self, value: &BigUint) -> Expr;

    fn transform_variable(
        &mut self,
        name: &str,
        selectors: &[Node],
        span: Span,
    ) -> GenResult<Expr>;

    fn transform_pin(
        &mut self,
        component: &Reference,
        pin: &Reference,
        span: Span,
    ) -> GenResult<Expr>;

    fn transform_array(&mut self, values: &[Node]) -> GenResult<Expr>;

    fn transform_call(&mut self, name: &str, params: &[Node]) -> GenResult<Expr>;

    /// Resolve `name` and require it to be a component.
    fn resolve_component(&self, name: &str, span: Span) -> GenResult<()>;
}

impl ExpressionTransformer for GenerationContext {
    fn transform_expression(&mut self, node: &Node) -> GenResult<Expr> {
        match self.dispatch(node)? {
            Fragment::Expr(expr) => Ok(expr),
            Fragment::Nothing | Fragment::Stmt(_) => Err(GenError::InvalidNodeKind {
                expected: "expression",
                actual: node.tag(),
                span: node.span,
            }),
        }
    }

    fn transform_expressions(&mut self, nodes: &[Node]) -> GenResult<Vec<Expr>> {
        nodes
            .iter()
            .map(|node| self.transform_expression(node))
            .collect()
    }

    fn transform_number(&self, value: &BigUint) -> Expr {
        Expr::number(value)
    }

    fn transform_variable(
        &mut self,
        name: &str,
        selectors: &[Node],
        span: Span,
    ) -> GenResult<Expr> {
        let symbol = self.scope.resolve(name, span)?;
        let indices = self.transform_expressions(selectors)?;

        match symbol.kind {
            SymbolKind::Variable => Ok(Expr::GetVariable {
                name: name.to_string(),
                indices,
            }),
            SymbolKind::Signal => Ok(Expr::GetSignal {
                name: name.to_string(),
                indices,
            }),
            found => Err(GenError::InvalidSymbolKind {
                name: name.to_string(),
                found,
                expected: "variable or signal",
                span,
            }),
        }
    }

    fn transform_pin(
        &mut self,
        component: &Reference,
        pin: &Reference,
        span: Span,
    ) -> GenResult<Expr> {
        self.resolve_component(&component.name, span)?;
        let component_indices = self.transform_expressions(&component.selectors)?;
        let pin_indices = self.transform_expressions(&pin.selectors)?;

        Ok(Expr::GetPin {
            component: component.name.clone(),
            component_indices,
            pin: pin.name.clone(),
            pin_indices,
        })
    }

    fn transform_array(&mut self, values: &[Node]) -> GenResult<Expr> {
        self.transform_expressions(values).map(Expr::Array)
    }

    fn transform_call(&mut self, name: &str, params: &[Node]) -> GenResult<Expr> {
        // Callees are looked up by name at run time, so forward calls are fine here.
        let args = self.transform_expressions(params)?;
        Ok(Expr::CallFunction {
            name: name.to_string(),
            args,
        })
    }

    fn resolve_component(&self, name: &str, span: Span) -> GenResult<()> {
        let symbol = self.scope.resolve(name, span)?;
        if symbol.kind != SymbolKind::Component {
            return Err(GenError::InvalidSymbolKind {
                name: name.to_string(),
                found: symbol.kind,
                expected: "component",
                span,
            });
        }
        Ok(())
    }
}
