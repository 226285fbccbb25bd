use super::context::{GenerationContext, SymbolKind};
use super::errors::{GenError, GenResult};
use super::expression_transformer::ExpressionTransformer;
use super::field_arithmetic;
use super::Fragment;
use zkgen_core::{DeclarationKind, Expr, Node, NodeKind, Span, Stmt};

/// Lowering of assignment forms, constraints, control flow and declarations.
pub trait StatementTransformer {
    /// Lower a statement; `None` when it only touched the scope.
    fn transform_statement(&mut self, node: &Node) -> GenResult<Option<Stmt>>;

    fn transform_block(&mut self, statements: &[Node]) -> GenResult<Vec<Stmt>>;

    /// Store into `target`. The value is lowered through `value` once the target checks out, so
    /// callers can build it from the target itself. `None` means the target is a component.
    fn transform_assignment<F>(
        &mut self,
        target: &Node,
        span: Span,
        value: F,
    ) -> GenResult<Option<Expr>>
    where
        F: FnOnce(&mut Self) -> GenResult<Expr>;

    /// `target <== value`: `assertEqual(<store value>, <target>)`. `value` is lowered once and
    /// the store runs before the target is read back.
    fn transform_constrained_assignment(
        &mut self,
        target: &Node,
        value: &Node,
        span: Span,
    ) -> GenResult<Expr>;

    /// `lhs === rhs`
    fn transform_constraint(&mut self, lhs: &Node, rhs: &Node) -> GenResult<Expr>;

    /// `target op= value`, stored as `target = target op value`.
    fn transform_compound_assignment(
        &mut self,
        target: &Node,
        value: &Node,
        combine: fn(Expr, Expr) -> Expr,
        span: Span,
    ) -> GenResult<Fragment>;

    /// `x++` when `post`, `++x` otherwise.
    fn transform_increment(&mut self, target: &Node, post: bool, span: Span) -> GenResult<Expr>;

    fn transform_for(
        &mut self,
        init: &Node,
        condition: &Node,
        step: &Node,
        body: &Node,
    ) -> GenResult<Stmt>;

    fn transform_while(&mut self, condition: &Node, body: &Node) -> GenResult<Stmt>;

    fn transform_return(&mut self, value: &Node) -> GenResult<Stmt>;

    /// Register the declared name in the current table and return it.
    fn transform_declaration<'a>(
        &mut self,
        declare_type: &str,
        name: &'a Node,
        span: Span,
    ) -> GenResult<&'a str>;
}

impl GenerationContext {
    fn assign_named<F>(
        &mut self,
        name: &str,
        selectors: &[Node],
        span: Span,
        value: F,
    ) -> GenResult<Option<Expr>>
    where
        F: FnOnce(&mut Self) -> GenResult<Expr>,
    {
        let indices = self.transform_expressions(selectors)?;
        let symbol = self.scope.resolve(name, span)?;

        // Components are instantiated by the runtime; only the name binding happens here.
        let setter = match symbol.kind {
            SymbolKind::Component => return Ok(None),
            SymbolKind::Variable => Setter::Variable,
            SymbolKind::Signal => Setter::Signal,
            found @ (SymbolKind::Template | SymbolKind::Function) => {
                return Err(GenError::invalid_assignment(
                    format!("cannot assign to {found} {name}"),
                    span,
                ))
            }
        };

        let value = Box::new(value(self)?);
        let name = name.to_string();
        Ok(Some(match setter {
            Setter::Variable => Expr::SetVariable {
                name,
                indices,
                value,
            },
            Setter::Signal => Expr::SetSignal {
                name,
                indices,
                value,
            },
        }))
    }

    /// Targets that read their own current value must be plain references.
    fn require_reference(&self, target: &Node, span: Span) -> GenResult<()> {
        match target.kind {
            NodeKind::Variable { .. } | NodeKind::Pin { .. } => Ok(()),
            _ => Err(GenError::invalid_assignment(
                format!("cannot update {} in place", target.tag()),
                span,
            )),
        }
    }
}

enum Setter {
    Variable,
    Signal,
}

impl StatementTransformer for GenerationContext {
    fn transform_statement(&mut self, node: &Node) -> GenResult<Option<Stmt>> {
        Ok(match self.dispatch(node)? {
            Fragment::Nothing => None,
            Fragment::Expr(expr) => Some(Stmt::Expr(expr)),
            Fragment::Stmt(stmt) => Some(stmt),
        })
    }

    fn transform_block(&mut self, statements: &[Node]) -> GenResult<Vec<Stmt>> {
        let mut body = Vec::with_capacity(statements.len());
        for statement in statements {
            if let Some(stmt) = self.transform_statement(statement)? {
                body.push(stmt);
            }
        }
        Ok(body)
    }

    fn transform_assignment<F>(
        &mut self,
        target: &Node,
        span: Span,
        value: F,
    ) -> GenResult<Option<Expr>>
    where
        F: FnOnce(&mut Self) -> GenResult<Expr>,
    {
        match &target.kind {
            NodeKind::Declare { declare_type, name } => {
                let declared = self.transform_declaration(declare_type, name, target.span)?;
                self.assign_named(declared, &[], span, value)
            }
            NodeKind::Pin { component, pin } => {
                self.resolve_component(&component.name, target.span)?;
                let component_indices = self.transform_expressions(&component.selectors)?;
                let pin_indices = self.transform_expressions(&pin.selectors)?;
                let value = value(self)?;

                Ok(Some(Expr::SetPin {
                    component: component.name.clone(),
                    component_indices,
                    pin: pin.name.clone(),
                    pin_indices,
                    value: Box::new(value),
                }))
            }
            NodeKind::Variable { name, selectors } => {
                self.assign_named(name, selectors, target.span, value)
            }
            _ => Err(GenError::invalid_assignment(
                format!("cannot assign to {}", target.tag()),
                span,
            )),
        }
    }

    fn transform_constrained_assignment(
        &mut self,
        target: &Node,
        value: &Node,
        span: Span,
    ) -> GenResult<Expr> {
        let lower_value = |ctx: &mut Self| ctx.transform_expression(value);
        // A fresh declaration is constrained through its plain name.
        let (store, declared) = match &target.kind {
            NodeKind::Declare { declare_type, name } => {
                let declared = self.transform_declaration(declare_type, name, target.span)?;
                let store = self.assign_named(declared, &[], span, lower_value)?;
                (store, Some((declared, name.span)))
            }
            _ => (self.transform_assignment(target, span, lower_value)?, None),
        };
        let Some(store) = store else {
            return Err(GenError::invalid_assignment("cannot constrain a component", span));
        };

        // The setter yields the stored value, so `value` runs once and the reread sees the store.
        let stored = match declared {
            Some((name, name_span)) => self.transform_variable(name, &[], name_span)?,
            None => self.transform_expression(target)?,
        };
        Ok(Expr::assert_equal(store, stored))
    }

    fn transform_constraint(&mut self, lhs: &Node, rhs: &Node) -> GenResult<Expr> {
        let lhs = self.transform_expression(lhs)?;
        let rhs = self.transform_expression(rhs)?;
        Ok(Expr::assert_equal(lhs, rhs))
    }

    fn transform_compound_assignment(
        &mut self,
        target: &Node,
        value: &Node,
        combine: fn(Expr, Expr) -> Expr,
        span: Span,
    ) -> GenResult<Fragment> {
        self.require_reference(target, span)?;
        let store = self.transform_assignment(target, span, |ctx| {
            let current = ctx.transform_expression(target)?;
            let operand = ctx.transform_expression(value)?;
            Ok(combine(current, operand))
        })?;
        Ok(store.map_or(Fragment::Nothing, Fragment::Expr))
    }

    fn transform_increment(&mut self, target: &Node, post: bool, span: Span) -> GenResult<Expr> {
        self.require_reference(target, span)?;
        let store = self.transform_assignment(target, span, |ctx| {
            ctx.transform_expression(target)
                .map(field_arithmetic::increment)
        })?;

        let Some(incremented) = store else {
            return Err(GenError::invalid_assignment("cannot increment a component", span));
        };
        Ok(if post {
            field_arithmetic::previous_value(incremented)
        } else {
            incremented
        })
    }

    fn transform_for(
        &mut self,
        init: &Node,
        condition: &Node,
        step: &Node,
        body: &Node,
    ) -> GenResult<Stmt> {
        let init = self.transform_statement(init)?;
        let condition = self.transform_expression(condition)?;
        let step = self.transform_statement(step)?;
        let body = self.transform_statement(body)?;

        Ok(Stmt::For {
            init: init.map(Box::new),
            condition,
            step: step.map(Box::new),
            body: Box::new(body.unwrap_or(Stmt::Block(Vec::new()))),
        })
    }

    fn transform_while(&mut self, condition: &Node, body: &Node) -> GenResult<Stmt> {
        let condition = self.transform_expression(condition)?;
        let body = self.transform_statement(body)?;

        Ok(Stmt::While {
            condition,
            body: Box::new(body.unwrap_or(Stmt::Block(Vec::new()))),
        })
    }

    fn transform_return(&mut self, value: &Node) -> GenResult<Stmt> {
        self.transform_expression(value).map(Stmt::Return)
    }

    fn transform_declaration<'a>(
        &mut self,
        declare_type: &str,
        name: &'a Node,
        span: Span,
    ) -> GenResult<&'a str> {
        let kind = DeclarationKind::from_tag(declare_type).ok_or_else(|| {
            GenError::InvalidDeclaration {
                declare_type: declare_type.to_string(),
                span,
            }
        })?;

        // Selectors on a declared name are array dimensions and stay with the runtime.
        let NodeKind::Variable { name, .. } = &name.kind else {
            return Err(GenError::InvalidNodeKind {
                expected: "identifier",
                actual: name.tag(),
                span: name.span,
            });
        };

        self.scope.declare(name, SymbolKind::from(kind), span)?;
        Ok(name)
    }
}
