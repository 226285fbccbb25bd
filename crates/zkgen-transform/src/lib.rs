/*! Lower circuit ASTs into executable descriptions.
 *
 * The parser produces syntax; the runtime needs a tree of calls it can execute against a finite
 * field. This crate bridges the two: it resolves every name against lexical scopes, turns each
 * operator into exact modular arithmetic over big integers, and collects template and function
 * bodies into a `Circuit`.
 */

pub mod ast_to_exec;

pub use ast_to_exec::{
    compile, Fragment, GenError, GenResult, GenerationContext, Scope, Symbol, SymbolKind,
    SymbolTable,
};
