use super::context::{GenerationContext, SymbolKind};
use super::errors::{GenError, GenResult};
use super::statement_transformer::StatementTransformer;
use tracing::debug;
use zkgen_core::{Definition, Node, NodeKind, Span, Stmt};

/// Lowering of template and function definitions into standalone bodies.
///
/// Templates are always registered in the global table; functions in the table that is current
/// where they are defined.
pub trait DefinitionTransformer {
    fn transform_template(
        &mut self,
        name: &str,
        params: &[String],
        block: &Node,
        span: Span,
    ) -> GenResult<()>;

    fn transform_function(
        &mut self,
        name: &str,
        params: &[String],
        block: &Node,
        span: Span,
    ) -> GenResult<()>;
}

impl GenerationContext {
    /// Lower `block` in a fresh scope level holding `params` as variables.
    fn transform_body(
        &mut self,
        params: &[String],
        block: &Node,
        span: Span,
    ) -> GenResult<Vec<Stmt>> {
        let NodeKind::Block { statements } = &block.kind else {
            return Err(GenError::InvalidNodeKind {
                expected: "BLOCK",
                actual: block.tag(),
                span: block.span,
            });
        };

        self.scope.push();
        let body = params
            .iter()
            .try_for_each(|param| self.scope.declare(param, SymbolKind::Variable, span))
            .and_then(|()| self.transform_block(statements));
        self.scope.pop();

        body
    }
}

impl DefinitionTransformer for GenerationContext {
    fn transform_template(
        &mut self,
        name: &str,
        params: &[String],
        block: &Node,
        span: Span,
    ) -> GenResult<()> {
        let body = self.transform_body(params, block, span)?;

        self.scope.declare_global(name, SymbolKind::Template, span)?;
        self.templates
            .insert(name.to_string(), Definition::new(params.to_vec(), body, span));

        debug!(template = name, params = params.len(), "registered template");
        Ok(())
    }

    fn transform_function(
        &mut self,
        name: &str,
        params: &[String],
        block: &Node,
        span: Span,
    ) -> GenResult<()> {
        let body = self.transform_body(params, block, span)?;

        // Calls bind by name at run time, so one body per name across the whole unit.
        if let Some(existing) = self.functions.get(name) {
            return Err(GenError::NameCollision {
                name: name.to_string(),
                span,
                previous: existing.span,
            });
        }
        self.scope.declare(name, SymbolKind::Function, span)?;
        self.functions
            .insert(name.to_string(), Definition::new(params.to_vec(), body, span));
        self.function_params
            .insert(name.to_string(), params.to_vec());

        debug!(function = name, params = params.len(), "registered function");
        Ok(())
    }
}
