/*! Circuit code generation in one import.
 *
 * Parse output goes in as an AST, a `Circuit` of executable template and function bodies comes
 * out, and the emitters print it for review or serialize it for the runtime.
 */

pub use zkgen_core as core;
pub use zkgen_emit as emit;
pub use zkgen_transform as transform;

pub use zkgen_core::{
    ast::{DeclarationKind, Node, NodeKind, Operator},
    circuit::Circuit,
    exec::{Definition, Expr, Stmt},
    field::FieldConfig,
    source_location::Span,
};

pub use zkgen_emit::{CircuitEmitter, EmitterConfig, OutputFormat};

pub use zkgen_transform::{compile, GenError, GenerationContext};
