//! # numera
//!
//! numera is a small expression language with exact arithmetic, written in
//! Rust. It parses, evaluates, and renders mathematical expressions and
//! small scripts with variables, user-declared functions, vectors, matrices,
//! and tuples. Integer division stays exact: `5/2` is the rational `5/2`,
//! never `2.5`.
//!
//! The crate exposes four kinds of entry points: parse a source string into
//! an AST, render an AST as plain text or LaTeX, evaluate an AST to a value,
//! and compile a source string down to host primitives.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
)]
#![allow(clippy::missing_errors_doc)]

use std::rc::Rc;

use crate::{
    ast::Node,
    error::RuntimeError,
    interpreter::{
        corelib::CoreLib,
        evaluator::{Compiler, Interpreter, Runtime},
        parser::Parser,
        render::{ToLatex, ToString},
        value::{function::FnDef, primitive::Primitive},
    },
};

/// Defines the structure of parsed code.
///
/// This module declares the `Node` enum and related types that represent the
/// syntactic structure of source code as a tree, along with the visitor
/// contract every evaluator and renderer implements.
///
/// # Responsibilities
/// - Defines the closed set of node variants for all language constructs.
/// - Defines the binary and unary operator enums.
/// - Declares the `Visitor` trait and the single exhaustive dispatch.
pub mod ast;
/// Provides unified error types for parsing and evaluation.
///
/// This module defines all errors that can be raised during lexing, parsing,
/// or evaluating code. Language-level failures never unwind through the
/// host: they are formatted into in-band error values that flow through the
/// tree like any other node.
///
/// # Responsibilities
/// - Defines error enums for all failure modes (lexer, parser, evaluator).
/// - Attaches line numbers and detailed messages where available.
/// - Supports integration with standard error handling traits.
pub mod error;
/// Orchestrates the entire process of code execution.
///
/// This module ties together lexing, parsing, evaluation, rendering, value
/// representations, and the registry of built-ins to provide a complete
/// runtime for source code evaluation.
///
/// # Responsibilities
/// - Coordinates all core components: lexer, parser, evaluators, renderers.
/// - Holds the scope chain and numeric tower implementations.
/// - Manages the flow of data and errors between phases.
pub mod interpreter;
/// General utilities for safe numeric conversion.
///
/// This module provides conversion routines used at the boundary between
/// the exact numeric tower and host doubles, plus radix-aware literal
/// parsing for the lexer.
///
/// # Responsibilities
/// - Convert between `BigInt`/`BigRational` and `f64` without surprises.
/// - Parse integer lexemes in any supported radix.
pub mod util;

/// Parses one program into an AST.
///
/// On failure the returned root has its error flag set and its first
/// statement is the diagnostic node; the caller always receives a tree.
///
/// # Example
/// ```
/// let root = numera::parse("let x = 1; x + 1");
/// assert!(matches!(root, numera::ast::Node::Root { has_error: false, .. }));
/// ```
#[must_use]
pub fn parse(source: &str) -> Node {
    let lib = CoreLib::new();
    Parser::new(&lib, source).parse()
}

/// Parses a program and renders it back as plain text.
#[must_use]
pub fn stringify(source: &str) -> String {
    let mut renderer = ToString;
    parse(source).accept(&mut renderer)
}

/// Parses a program and renders it as LaTeX.
///
/// Nodes with no LaTeX form (declarations, conditionals, loops) render as
/// empty strings rather than failing.
///
/// # Example
/// ```
/// assert_eq!(numera::latex("sqrt(x)"), "\\sqrt{x}");
/// assert_eq!(numera::latex("1/2"), "\\dfrac{1}{2}");
/// ```
#[must_use]
pub fn latex(source: &str) -> String {
    let lib = CoreLib::new();
    let root = Parser::new(&lib, source).parse();
    let mut renderer = ToLatex::new(&lib);
    root.accept(&mut renderer)
}

/// Parses and interprets a program, returning the resulting value node.
///
/// Failures come back as an error node, never as a panic.
#[must_use]
pub fn interpret(source: &str) -> Node {
    let lib = CoreLib::new();
    let root = Parser::new(&lib, source).parse();
    let mut interpreter = Interpreter::new(&lib);
    interpreter.exec(&root)
}

/// Parses and interprets a program, rendering the result as plain text.
///
/// Interpretation preserves exactness, so `5/2` comes back as `5/2`.
///
/// # Example
/// ```
/// assert_eq!(numera::evaluate("2 + 3 * 4"), "14");
/// assert_eq!(numera::evaluate("5/2"), "5/2");
/// ```
#[must_use]
pub fn evaluate(source: &str) -> String {
    let mut renderer = ToString;
    interpret(source).accept(&mut renderer)
}

/// Parses and interprets a program, rendering the result as LaTeX.
#[must_use]
pub fn compute(source: &str) -> String {
    let lib = CoreLib::new();
    let root = Parser::new(&lib, source).parse();
    let mut interpreter = Interpreter::new(&lib);
    let result = interpreter.exec(&root);
    let mut renderer = ToLatex::new(&lib);
    result.accept(&mut renderer)
}

/// Interprets an already-parsed AST and renders the computed value as
/// LaTeX, for display of a result alongside its input.
#[must_use]
pub fn eval_node(node: &Node) -> String {
    let lib = CoreLib::new();
    let mut interpreter = Interpreter::new(&lib);
    let result = interpreter.exec(node);
    let mut renderer = ToLatex::new(&lib);
    result.accept(&mut renderer)
}

/// Parses a program and runs the primitive-producing compiler over it.
///
/// The returned [`Runtime`] carries `err` exactly when parsing or evaluation
/// produced a diagnostic.
///
/// # Example
/// ```
/// use numera::interpreter::value::primitive::Primitive;
///
/// let out = numera::compile("2 + 2");
/// assert_eq!(out.result, Some(Primitive::Num(4.0)));
/// assert!(out.err.is_none());
/// ```
#[must_use]
pub fn compile(source: &str) -> Runtime {
    let lib = CoreLib::new();
    let root = Parser::new(&lib, source).parse();
    let mut compiler = Compiler::new(&lib);
    compiler.run(&root)
}

/// A host-callable function compiled from one expression body.
///
/// Produced by [`make_function`]; the plotting surfaces use this to sample
/// user formulas as plain doubles.
pub struct CompiledFn {
    lib: CoreLib,
    fun: Rc<FnDef>,
}

impl CompiledFn {
    /// The number of arguments a call must supply.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.fun.arity()
    }

    /// Calls the function over doubles.
    ///
    /// # Errors
    /// Returns the diagnostic string when the call is short on arguments,
    /// the body fails to evaluate, or the body produces a non-numeric value.
    pub fn call(&self, args: &[f64]) -> Result<f64, String> {
        if args.len() < self.fun.arity() {
            return Err(RuntimeError::ArityMismatch { callee:   self.fun.name.clone(),
                                                     expected: self.fun.arity(),
                                                     actual:   args.len(), }.to_string());
        }
        let mut compiler = Compiler::new(&self.lib);
        let values = args.iter().map(|arg| Primitive::Num(*arg)).collect();
        let result = self.fun.call(&mut compiler, values);
        if let Some(err) = compiler.err {
            return Err(err);
        }
        match result {
            Primitive::Num(n) => Ok(n),
            Primitive::Bool(b) => Ok(if b { 1.0 } else { 0.0 }),
            other => Err(format!("Type error: expression produced the non-numeric value \
                                  '{other}'.")),
        }
    }
}

/// Wraps `body` in a synthetic function named `f` over `params` and compiles
/// it into a host-callable value.
///
/// # Errors
/// Returns the diagnostic string when `body` fails to parse.
///
/// # Example
/// ```
/// let f = numera::make_function("a + b", &["a", "b"]).unwrap();
/// assert_eq!(f.call(&[2.0, 5.0]), Ok(7.0));
/// ```
pub fn make_function(body: &str, params: &[&str]) -> Result<CompiledFn, String> {
    let lib = CoreLib::new();
    let parsed = Parser::new(&lib, body).parse_expr();
    if let Node::Error(message) = parsed {
        return Err(message);
    }
    let params = params.iter().map(|param| (*param).to_string()).collect();
    let fun = Rc::new(FnDef::new("f", params, parsed));
    Ok(CompiledFn { lib, fun })
}
