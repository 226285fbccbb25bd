/*! Shared types for lowering circuit ASTs into executable form.
 *
 * The parser hands over an AST, the transform crate lowers it into runtime calls over big
 * integers, and the runtime executes the result against a finite field. This crate holds the
 * types crossing those boundaries: the AST, the executable representation, the compiled
 * `Circuit`, and the field constants. It contains no generation logic.
 */

pub mod ast;
pub mod circuit;
pub mod decimal;
pub mod exec;
pub mod field;
pub mod source_location;

pub use ast::{DeclarationKind, Node, NodeKind, Operator, Reference};
pub use circuit::Circuit;
pub use exec::{BigIntOp, Definition, Expr, Stmt};
pub use field::FieldConfig;
pub use source_location::Span;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid field configuration: {0}")]
    InvalidField(String),
    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;

/// Read JSON with no nesting limit. Operator chains nest deeply, so the stack grows on demand.
pub(crate) fn from_json_unbounded<T: serde::de::DeserializeOwned>(text: &str) -> Result<T> {
    let mut json = serde_json::Deserializer::from_str(text);
    json.disable_recursion_limit();
    let value: T = serde::Deserialize::deserialize(serde_stacker::Deserializer::new(&mut json))?;
    json.end()?;
    Ok(value)
}
