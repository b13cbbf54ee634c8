/// The primitive-producing evaluator.
///
/// Walks an AST and produces host primitives (doubles, booleans, strings,
/// nested lists), trading exactness for direct interoperability with native
/// numeric routines. Reports results as a `{ result, err }` pair.
pub mod compiler;
/// The AST-producing evaluator.
///
/// Walks an AST and produces new AST values, preserving exactness: rationals
/// stay rationals. Language-level failures become in-band error nodes, and
/// block evaluation short-circuits on the first one.
pub mod interpreter;

pub use compiler::{Compiler, Runtime};
pub use interpreter::Interpreter;
