/*! Write compiled circuits out for people and tools.
 *
 * A lowered circuit is a tree of runtime calls, which is hard to inspect from a debugger. The text
 * emitter prints each template and function as an indented listing in the runtime's own call
 * names, and the JSON emitter writes the artifact exactly as the runtime loads it.
 */

pub mod circuit_emitter;
pub mod config;
pub mod emitter;
pub mod output;

pub use circuit_emitter::{render_expr, CircuitEmitter};
pub use config::{EmitterConfig, IndentStyle, VerbosityLevel};
pub use emitter::{EmitContext, EmitHelper, EmitResult, Emitter};
pub use output::OutputFormat;
