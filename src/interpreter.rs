/// The registry of built-in constants and native functions.
///
/// Declares the "corelib": numeric constants like `pi`, native functions
/// like `sqrt` with their argument signatures, and the LaTeX names of both.
/// A registry value is built once per session and passed by reference into
/// the parser and the evaluators; nothing here is process-wide state.
pub mod corelib;
/// The evaluators.
///
/// Two tree-walking visitor implementations over the same AST: the
/// interpreter produces AST values and preserves exactness, the compiler
/// produces host primitives for native interop.
pub mod evaluator;
/// The lexer.
///
/// Converts a source string into classified tokens with line information,
/// including the context-sensitive folding of a leading minus into numeric
/// literals.
pub mod lexer;
/// The parser.
///
/// A precedence-climbing expression parser producing AST nodes from the
/// token stream, with implicit multiplication, fraction collapse, bracket
/// reclassification, and first-error-wins diagnostics.
pub mod parser;
/// The renderers.
///
/// Visitor implementations producing textual serializations of an AST:
/// plain text and LaTeX.
pub mod render;
/// Scope chains.
///
/// The mutable name-to-value environment with parent chaining used by both
/// evaluators.
pub mod scope;
/// Runtime value representations.
///
/// The exact numeric tower, host primitives, and user-declared functions.
pub mod value;
