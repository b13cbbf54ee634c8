use std::rc::Rc;

use num_bigint::BigInt;
use num_rational::BigRational;

use crate::{
    ast::{BinaryOp, Node, UnaryOp, Visitor},
    error::RuntimeError,
    interpreter::{
        corelib::{CoreLib, NativeArg, NativeFn, NativeValue},
        scope::Environment,
        value::{function::FnDef, primitive::Primitive},
    },
    util::num::{big_to_f64, ratio_to_f64},
};

/// The outcome of compiling and running a program.
///
/// `err` is set exactly when parsing or evaluation produced a diagnostic, in
/// which case `result` is empty.
#[derive(Debug)]
pub struct Runtime {
    /// The final value, when execution succeeded.
    pub result: Option<Primitive>,
    /// The first diagnostic, when it did not.
    pub err:    Option<String>,
}

/// The primitive-producing evaluator.
///
/// Identical dispatch shape to the interpreter, but every node lands on a
/// host primitive: doubles, booleans, strings, and nested lists. Exactness
/// is deliberately given up; this is the evaluator to use when the result
/// feeds a native numeric routine rather than a renderer.
///
/// The compiler records the first diagnostic in `err` and goes inert: once
/// set, statements stop executing.
pub struct Compiler<'lib> {
    lib: &'lib CoreLib,
    env: Environment<Primitive>,
    /// The first diagnostic raised during execution, if any.
    pub err: Option<String>,
}

impl<'lib> Compiler<'lib> {
    /// Creates a compiler with a fresh global scope.
    #[must_use]
    pub fn new(lib: &'lib CoreLib) -> Self {
        Self { lib,
               env: Environment::new(),
               err: None }
    }

    /// The current environment, exposed for function-call scope swapping.
    pub(crate) fn env_mut(&mut self) -> &mut Environment<Primitive> {
        &mut self.env
    }

    /// Evaluates one node.
    pub fn execute(&mut self, node: &Node) -> Primitive {
        node.accept(self)
    }

    /// Runs a whole program and packages the result with any diagnostic.
    pub fn run(&mut self, root: &Node) -> Runtime {
        let result = self.execute(root);
        match self.err.take() {
            Some(err) => Runtime { result: None,
                                   err:    Some(err), },
            None => Runtime { result: Some(result),
                              err:    None, },
        }
    }

    fn fail(&mut self, message: impl Into<String>) -> Primitive {
        if self.err.is_none() {
            self.err = Some(message.into());
        }
        Primitive::Null
    }

    fn call_native(&mut self, native: NativeFn, callee: &str, args: &[Primitive]) -> Primitive {
        if args.len() < native.arity() {
            return self.fail(RuntimeError::ArityMismatch { callee:   callee.to_string(),
                                                           expected: native.arity(),
                                                           actual:   args.len(), }
                                                         .to_string());
        }
        let result = match native.arg_type() {
            NativeArg::Number => {
                let mut numbers = Vec::with_capacity(args.len());
                for arg in args {
                    match arg.as_num() {
                        Some(n) => numbers.push(n),
                        None => {
                            return self.fail(RuntimeError::InvalidNativeCall {
                                callee: callee.to_string(),
                            }.to_string())
                        },
                    }
                }
                native.invoke_numbers(&numbers)
            },
            NativeArg::NumberArray => {
                let mut series = Vec::with_capacity(args.len());
                for arg in args {
                    let Primitive::List(items) = arg else {
                        return self.fail(RuntimeError::InvalidNativeCall {
                            callee: callee.to_string(),
                        }.to_string());
                    };
                    let mut values = Vec::with_capacity(items.len());
                    for item in items {
                        match item.as_num() {
                            Some(n) => values.push(n),
                            None => {
                                return self.fail(RuntimeError::InvalidNativeCall {
                                    callee: callee.to_string(),
                                }.to_string())
                            },
                        }
                    }
                    series.push(values);
                }
                native.invoke_arrays(&series)
            },
        };
        match result {
            Some(NativeValue::Num(x)) => Primitive::Num(x),
            Some(NativeValue::Array(xs)) => {
                Primitive::List(xs.into_iter().map(Primitive::Num).collect())
            },
            None => self.fail(RuntimeError::InvalidNativeCall { callee:
                                                                    callee.to_string(), }
                                                              .to_string()),
        }
    }

    fn compute(&mut self, left: f64, op: BinaryOp, right: f64) -> Primitive {
        match op {
            BinaryOp::Add => Primitive::Num(left + right),
            BinaryOp::Sub => Primitive::Num(left - right),
            BinaryOp::Mul => Primitive::Num(left * right),
            BinaryOp::Div => {
                if right == 0.0 {
                    self.fail(RuntimeError::DivisionByZero.to_string())
                } else {
                    Primitive::Num(left / right)
                }
            },
            BinaryOp::Pow => Primitive::Num(left.powf(right)),
            BinaryOp::Rem => {
                if right == 0.0 {
                    self.fail(RuntimeError::DivisionByZero.to_string())
                } else {
                    Primitive::Num(left % right)
                }
            },
            BinaryOp::Mod => {
                if right == 0.0 {
                    self.fail(RuntimeError::DivisionByZero.to_string())
                } else {
                    Primitive::Num(((left % right) + right) % right)
                }
            },
            BinaryOp::FloorDiv => {
                if right == 0.0 {
                    self.fail(RuntimeError::DivisionByZero.to_string())
                } else {
                    Primitive::Num((left / right).floor())
                }
            },
            BinaryOp::Less => Primitive::Bool(left < right),
            BinaryOp::Greater => Primitive::Bool(left > right),
            BinaryOp::LessEqual => Primitive::Bool(left <= right),
            BinaryOp::GreaterEqual => Primitive::Bool(left >= right),
            BinaryOp::Equal => Primitive::Bool(left == right),
            BinaryOp::NotEqual => Primitive::Bool(left != right),
            BinaryOp::Concat => {
                self.fail(RuntimeError::type_error(
                    "operand '++' does not work with numbers."
                ).to_string())
            },
        }
    }
}

impl Visitor for Compiler<'_> {
    type Out = Primitive;

    fn int(&mut self, value: &BigInt) -> Primitive {
        Primitive::Num(big_to_f64(value))
    }

    fn frac(&mut self, value: &BigRational) -> Primitive {
        Primitive::Num(ratio_to_f64(value))
    }

    fn real(&mut self, value: f64) -> Primitive {
        Primitive::Num(value)
    }

    fn boolean(&mut self, value: bool) -> Primitive {
        Primitive::Bool(value)
    }

    fn chars(&mut self, value: &str) -> Primitive {
        Primitive::Str(value.to_string())
    }

    fn null(&mut self) -> Primitive {
        Primitive::Null
    }

    fn sym(&mut self, name: &str, _is_static: bool) -> Primitive {
        if let Some(value) = self.lib.constant_value(name) {
            return Primitive::Num(value);
        }
        if let Some(value) = self.env.get(name) {
            return value.clone();
        }
        self.fail(RuntimeError::UnknownVariable { name: name.to_string() }.to_string())
    }

    fn group(&mut self, inner: &Node) -> Primitive {
        self.execute(inner)
    }

    fn tuple(&mut self, elements: &[Node]) -> Primitive {
        Primitive::List(elements.iter().map(|element| self.execute(element)).collect())
    }

    fn vector(&mut self, elements: &[Node]) -> Primitive {
        Primitive::List(elements.iter().map(|element| self.execute(element)).collect())
    }

    fn matrix(&mut self, rows: &[Node], _row_count: usize, _col_count: usize) -> Primitive {
        Primitive::List(rows.iter().map(|row| self.execute(row)).collect())
    }

    fn block(&mut self, statements: &[Node]) -> Primitive {
        self.env.push();
        let mut result = Primitive::Null;
        for statement in statements {
            if self.err.is_some() {
                break;
            }
            result = self.execute(statement);
        }
        self.env.pop();
        result
    }

    fn unary_expr(&mut self, op: UnaryOp, arg: &Node) -> Primitive {
        let value = self.execute(arg);
        match op {
            UnaryOp::Negate => match value.as_num() {
                Some(n) => Primitive::Num(-n),
                None => self.fail(RuntimeError::type_error(
                    "operator '-' requires a numeric operand."
                ).to_string()),
            },
            UnaryOp::Plus => value,
            UnaryOp::Bang => Primitive::Bool(!value.is_truthy()),
        }
    }

    fn binary_expr(&mut self, left: &Node, op: BinaryOp, right: &Node) -> Primitive {
        let left = self.execute(left);
        let right = self.execute(right);
        match (&left, &right) {
            (Primitive::Num(a), Primitive::Num(b)) => self.compute(*a, op, *b),
            (Primitive::Bool(a), Primitive::Bool(b)) => match op {
                BinaryOp::Equal => Primitive::Bool(a == b),
                BinaryOp::NotEqual => Primitive::Bool(a != b),
                _ => self.fail(format!(
                    "Type error: could not evaluate operator '{op}' on booleans at runtime."
                )),
            },
            _ => self.fail(format!(
                "Type error: could not evaluate binary operator '{op}' at runtime."
            )),
        }
    }

    fn call_expr(&mut self, callee: &str, args: &[Node], native: Option<NativeFn>) -> Primitive {
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.execute(arg));
        }
        if let Some(native) = native {
            return self.call_native(native, callee, &values);
        }
        let resolved = match self.env.get(callee) {
            Some(Primitive::Fn(f)) => Some(Rc::clone(f)),
            _ => None,
        };
        match resolved {
            Some(f) => {
                if values.len() < f.arity() {
                    return self.fail(RuntimeError::ArityMismatch { callee:   callee.to_string(),
                                                                   expected: f.arity(),
                                                                   actual:   values.len(), }
                                                                 .to_string());
                }
                f.call(self, values)
            },
            None => self.fail(RuntimeError::UnknownFunction { name: callee.to_string() }
                                                            .to_string()),
        }
    }

    fn var_declare(&mut self, name: &str, value: &Node, _line: usize) -> Primitive {
        let value = if value.is_null() {
            Primitive::Null
        } else {
            self.execute(value)
        };
        if !self.env.define(name, value.clone()) {
            return self.fail(RuntimeError::Redeclaration { name: name.to_string() }.to_string());
        }
        value
    }

    fn fun_declare(&mut self, name: &str, params: &[Node], body: &Node) -> Primitive {
        let names = params.iter()
                          .filter_map(|param| match param {
                              Node::Symbol { name, .. } => Some(name.clone()),
                              _ => None,
                          })
                          .collect();
        let def = Rc::new(FnDef::new(name, names, body.clone()));
        if !self.env.define(name, Primitive::Fn(Rc::clone(&def))) {
            return self.fail(RuntimeError::Redeclaration { name: name.to_string() }.to_string());
        }
        Primitive::Fn(def)
    }

    fn assign(&mut self, name: &str, value: &Node) -> Primitive {
        let value = self.execute(value);
        if !self.env.assign(name, value.clone()) {
            return self.fail(RuntimeError::AssignmentToUndeclared { name: name.to_string() }
                                                                  .to_string());
        }
        value
    }

    fn cond(&mut self, condition: &Node, consequent: &Node, alternate: &Node) -> Primitive {
        if self.execute(condition).is_truthy() {
            self.execute(consequent)
        } else {
            self.execute(alternate)
        }
    }

    fn while_stmt(&mut self, condition: &Node, body: &Node) -> Primitive {
        let mut result = Primitive::Null;
        while self.err.is_none() && self.execute(condition).is_truthy() {
            result = self.execute(body);
        }
        result
    }

    fn root(&mut self, statements: &[Node], has_error: bool) -> Primitive {
        if has_error {
            if let Some(first) = statements.first() {
                return self.execute(first);
            }
            return Primitive::Null;
        }
        let mut result = Primitive::Null;
        for statement in statements {
            if self.err.is_some() {
                break;
            }
            result = self.execute(statement);
        }
        result
    }

    fn error(&mut self, message: &str) -> Primitive {
        if self.err.is_none() {
            self.err = Some(message.to_string());
        }
        Primitive::Str(message.to_string())
    }
}
