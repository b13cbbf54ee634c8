use std::mem;

use crate::{
    ast::Node,
    interpreter::{
        evaluator::{
            compiler::Compiler,
            interpreter::{Binding, Interpreter},
        },
        scope::Environment,
        value::primitive::Primitive,
    },
};

/// A user-declared function.
///
/// Parameters are deduplicated at construction, first occurrence wins, so
/// `let f(x, x) = x` declares a one-parameter function rather than raising
/// a declaration error.
///
/// Calling a function evaluates its body in a brand-new, parent-less scope
/// holding only the parameter bindings: bodies cannot see the variables of
/// the scope they were declared in. Functions do not close over their
/// environment.
#[derive(Debug, Clone, PartialEq)]
pub struct FnDef {
    /// The declared name.
    pub name:   String,
    /// The deduplicated parameter names.
    pub params: Vec<String>,
    /// The body, evaluated per call.
    pub body:   Node,
}

impl FnDef {
    /// Builds a function, silently dropping duplicate parameter names.
    #[must_use]
    pub fn new(name: impl Into<String>, params: Vec<String>, body: Node) -> Self {
        let mut seen = Vec::new();
        for param in params {
            if !seen.contains(&param) {
                seen.push(param);
            }
        }
        Self { name: name.into(),
               params: seen,
               body }
    }

    /// The number of parameters a call must supply. Extra arguments are
    /// permitted and ignored.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Calls this function under the AST-producing interpreter.
    pub fn interpret(&self, interpreter: &mut Interpreter, args: Vec<Node>) -> Node {
        let mut env = Environment::new();
        for (param, arg) in self.params.iter().zip(args) {
            env.define(param, Binding::Value(arg));
        }
        let saved = mem::replace(interpreter.env_mut(), env);
        let result = interpreter.exec(&self.body);
        *interpreter.env_mut() = saved;
        result
    }

    /// Calls this function under the primitive-producing compiler.
    pub fn call(&self, compiler: &mut Compiler, args: Vec<Primitive>) -> Primitive {
        let mut env = Environment::new();
        for (param, arg) in self.params.iter().zip(args) {
            env.define(param, arg);
        }
        let saved = mem::replace(compiler.env_mut(), env);
        let result = compiler.execute(&self.body);
        *compiler.env_mut() = saved;
        result
    }
}
