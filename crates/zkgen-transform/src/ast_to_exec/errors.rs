use super::context::SymbolKind;
use thiserror::Error;
use zkgen_core::Span;

/// A lowering failure, always tied to the source range of the offending node.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenError {
    #[error("{span}: invalid node kind: expected {expected}, got {actual}")]
    InvalidNodeKind {
        expected: &'static str,
        actual: &'static str,
        span: Span,
    },

    #[error("{span}: invalid operation: {op}")]
    InvalidOperator { op: String, span: Span },

    #[error("{span}: invalid declaration: {declare_type}")]
    InvalidDeclaration { declare_type: String, span: Span },

    #[error("{span}: operator {op} takes {expected} operands, got {actual}")]
    OperandCount {
        op: String,
        expected: usize,
        actual: usize,
        span: Span,
    },

    #[error("{span}: invalid assignment: {reason}")]
    InvalidAssignment { reason: String, span: Span },

    #[error("{span}: name already exists: {name} (declared at {previous})")]
    NameCollision {
        name: String,
        span: Span,
        previous: Span,
    },

    #[error("{span}: use of undeclared identifier: {name}")]
    UnresolvedIdentifier { name: String, span: Span },

    #[error("{span}: {name} is a {found}, expected {expected}")]
    InvalidSymbolKind {
        name: String,
        found: SymbolKind,
        expected: &'static str,
        span: Span,
    },
}

impl GenError {
    pub fn span(&self) -> Span {
        match self {
            GenError::InvalidNodeKind { span, .. }
            | GenError::InvalidOperator { span, .. }
            | GenError::InvalidDeclaration { span, .. }
            | GenError::OperandCount { span, .. }
            | GenError::InvalidAssignment { span, .. }
            | GenError::NameCollision { span, .. }
            | GenError::UnresolvedIdentifier { span, .. }
            | GenError::InvalidSymbolKind { span, .. } => *span,
        }
    }

    pub(crate) fn invalid_assignment(reason: impl Into<String>, span: Span) -> Self {
        GenError::InvalidAssignment {
            reason: reason.into(),
            span,
        }
    }
}

pub type GenResult<T> = std::result::Result<T, GenError>;
