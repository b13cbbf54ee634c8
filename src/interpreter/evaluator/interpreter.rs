use std::rc::Rc;

use num_bigint::BigInt;
use num_rational::BigRational;

use crate::{
    ast::{BinaryOp, Node, UnaryOp, Visitor},
    error::RuntimeError,
    interpreter::{
        corelib::{CoreLib, NativeArg, NativeFn, NativeValue},
        scope::Environment,
        value::{function::FnDef, number::Number},
    },
};

/// What a name can be bound to in the interpreter's environment.
#[derive(Debug, Clone)]
pub enum Binding {
    /// An evaluated AST value.
    Value(Node),
    /// A user-declared function.
    Function(Rc<FnDef>),
}

/// The AST-producing evaluator.
///
/// Walks a tree and produces new nodes, which keeps results exact: `5/2`
/// evaluates to the rational literal `5/2`, not to `2.5`. Errors come back
/// as [`Node::Error`] values; blocks and roots return the first one they see
/// and evaluate nothing after it.
pub struct Interpreter<'lib> {
    lib: &'lib CoreLib,
    env: Environment<Binding>,
}

impl<'lib> Interpreter<'lib> {
    /// Creates an interpreter with a fresh global scope.
    #[must_use]
    pub fn new(lib: &'lib CoreLib) -> Self {
        Self { lib,
               env: Environment::new() }
    }

    /// The current environment, exposed for function-call scope swapping.
    pub(crate) fn env_mut(&mut self) -> &mut Environment<Binding> {
        &mut self.env
    }

    /// Evaluates one node. Error nodes evaluate to themselves.
    pub fn exec(&mut self, node: &Node) -> Node {
        if node.erred() {
            return node.clone();
        }
        node.accept(self)
    }

    fn exec_statements(&mut self, statements: &[Node]) -> Node {
        let mut result = Node::Null;
        for statement in statements {
            if result.erred() {
                return result;
            }
            result = self.exec(statement);
        }
        result
    }

    fn call_native(&mut self, native: NativeFn, callee: &str, args: &[Node]) -> Node {
        if args.len() < native.arity() {
            return RuntimeError::ArityMismatch { callee:   callee.to_string(),
                                                 expected: native.arity(),
                                                 actual:   args.len(), }.into();
        }
        let result = match native.arg_type() {
            NativeArg::Number => {
                let mut numbers = Vec::with_capacity(args.len());
                for arg in args {
                    match Number::from_node(arg) {
                        Some(n) => numbers.push(n.to_f64()),
                        None => {
                            return RuntimeError::InvalidNativeCall { callee:
                                                                         callee.to_string(), }.into()
                        },
                    }
                }
                native.invoke_numbers(&numbers)
            },
            NativeArg::NumberArray => {
                let mut series = Vec::with_capacity(args.len());
                for arg in args {
                    let values = match arg {
                        Node::Vector(elements) => self.vector_values(elements),
                        _ => None,
                    };
                    match values {
                        Some(v) => series.push(v),
                        None => {
                            return RuntimeError::InvalidNativeCall { callee:
                                                                         callee.to_string(), }.into()
                        },
                    }
                }
                native.invoke_arrays(&series)
            },
        };
        match result {
            Some(NativeValue::Num(x)) => Number::from_f64(x).into_node(),
            Some(NativeValue::Array(xs)) => {
                Node::Vector(xs.into_iter().map(|x| Number::from_f64(x).into_node()).collect())
            },
            None => RuntimeError::InvalidNativeCall { callee: callee.to_string() }.into(),
        }
    }

    /// Evaluates a vector's elements down to doubles, for natives with the
    /// number-array signature.
    fn vector_values(&mut self, elements: &[Node]) -> Option<Vec<f64>> {
        let mut out = Vec::with_capacity(elements.len());
        for element in elements {
            let value = self.exec(element);
            out.push(Number::from_node(&value)?.to_f64());
        }
        Some(out)
    }
}

impl Visitor for Interpreter<'_> {
    type Out = Node;

    fn int(&mut self, value: &BigInt) -> Node {
        Node::Int(value.clone())
    }

    fn frac(&mut self, value: &BigRational) -> Node {
        Node::Rational(value.clone())
    }

    fn real(&mut self, value: f64) -> Node {
        Node::Real(value)
    }

    fn boolean(&mut self, value: bool) -> Node {
        Node::Bool(value)
    }

    fn chars(&mut self, value: &str) -> Node {
        Node::Str(value.to_string())
    }

    fn null(&mut self) -> Node {
        Node::Null
    }

    fn sym(&mut self, name: &str, _is_static: bool) -> Node {
        if let Some(value) = self.lib.constant_value(name) {
            return Number::from_f64(value).into_node();
        }
        match self.env.get(name) {
            Some(Binding::Value(value)) => value.clone(),
            Some(Binding::Function(_)) => Node::Null,
            None => RuntimeError::UnknownVariable { name: name.to_string() }.into(),
        }
    }

    fn group(&mut self, inner: &Node) -> Node {
        self.exec(inner)
    }

    fn tuple(&mut self, elements: &[Node]) -> Node {
        Node::Tuple(elements.iter().map(|element| self.exec(element)).collect())
    }

    fn vector(&mut self, elements: &[Node]) -> Node {
        Node::Vector(elements.to_vec())
    }

    fn matrix(&mut self, rows: &[Node], row_count: usize, col_count: usize) -> Node {
        Node::Matrix { rows: rows.to_vec(),
                       row_count,
                       col_count }
    }

    fn block(&mut self, statements: &[Node]) -> Node {
        self.env.push();
        let result = self.exec_statements(statements);
        self.env.pop();
        result
    }

    fn unary_expr(&mut self, op: UnaryOp, arg: &Node) -> Node {
        let value = self.exec(arg);
        if value.erred() {
            return value;
        }
        match op {
            UnaryOp::Negate => match Number::from_node(&value) {
                Some(n) => n.neg().into_node(),
                None => RuntimeError::type_error("operator '-' requires a numeric operand.").into(),
            },
            UnaryOp::Plus => value,
            UnaryOp::Bang => match value {
                Node::Bool(b) => Node::Bool(!b),
                _ => RuntimeError::type_error("operator '!' requires a boolean operand.").into(),
            },
        }
    }

    fn binary_expr(&mut self, left: &Node, op: BinaryOp, right: &Node) -> Node {
        let left = self.exec(left);
        if left.erred() {
            return left;
        }
        let right = self.exec(right);
        if right.erred() {
            return right;
        }
        if left.is_tuple() || right.is_tuple() {
            return match op {
                       BinaryOp::Concat => merge_tuples(left, right),
                       _ => RuntimeError::type_error(format!(
                           "operand '{op}' does not work with tuples."
                       )).into(),
                   };
        }
        if left.is_matrix() && right.is_matrix() {
            return match op {
                       BinaryOp::Add => matrix_add(&left, &right),
                       _ => RuntimeError::type_error(format!(
                           "operand '{op}' does not work with matrices."
                       )).into(),
                   };
        }
        if let (Some(a), Some(b)) = (Number::from_node(&left), Number::from_node(&right)) {
            return compute(&a, op, &b);
        }
        if let (Node::Bool(a), Node::Bool(b)) = (&left, &right) {
            return match op {
                       BinaryOp::Equal => Node::Bool(a == b),
                       BinaryOp::NotEqual => Node::Bool(a != b),
                       _ => RuntimeError::type_error(format!(
                           "operand '{op}' does not work with booleans."
                       )).into(),
                   };
        }
        Node::error(format!("Type error: unknown use of operator '{op}'."))
    }

    fn call_expr(&mut self, callee: &str, args: &[Node], native: Option<NativeFn>) -> Node {
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            let value = self.exec(arg);
            if value.erred() {
                return value;
            }
            values.push(value);
        }
        if let Some(native) = native {
            return self.call_native(native, callee, &values);
        }
        let resolved = match self.env.get(callee) {
            Some(Binding::Function(f)) => Some(Rc::clone(f)),
            Some(Binding::Value(_)) => None,
            None => {
                return RuntimeError::UnknownFunction { name: callee.to_string() }.into();
            },
        };
        match resolved {
            Some(f) => {
                if values.len() < f.arity() {
                    return RuntimeError::ArityMismatch { callee:   callee.to_string(),
                                                         expected: f.arity(),
                                                         actual:   values.len(), }.into();
                }
                f.interpret(self, values)
            },
            None => Node::Null,
        }
    }

    fn var_declare(&mut self, name: &str, value: &Node, _line: usize) -> Node {
        let value = if value.is_null() {
            Node::Null
        } else {
            self.exec(value)
        };
        if value.erred() {
            return value;
        }
        if !self.env.define(name, Binding::Value(value.clone())) {
            return RuntimeError::Redeclaration { name: name.to_string() }.into();
        }
        value
    }

    fn fun_declare(&mut self, name: &str, params: &[Node], body: &Node) -> Node {
        let names = params.iter()
                          .filter_map(|param| match param {
                              Node::Symbol { name, .. } => Some(name.clone()),
                              _ => None,
                          })
                          .collect();
        let def = Rc::new(FnDef::new(name, names, body.clone()));
        if !self.env.define(name, Binding::Function(def)) {
            return RuntimeError::Redeclaration { name: name.to_string() }.into();
        }
        Node::Null
    }

    fn assign(&mut self, name: &str, value: &Node) -> Node {
        let value = self.exec(value);
        if value.erred() {
            return value;
        }
        if !self.env.assign(name, Binding::Value(value.clone())) {
            return RuntimeError::AssignmentToUndeclared { name: name.to_string() }.into();
        }
        value
    }

    fn cond(&mut self, condition: &Node, consequent: &Node, alternate: &Node) -> Node {
        let test = self.exec(condition);
        if test.erred() {
            return test;
        }
        if truthy(&test) {
            self.exec(consequent)
        } else {
            self.exec(alternate)
        }
    }

    fn while_stmt(&mut self, condition: &Node, body: &Node) -> Node {
        let mut result = Node::Null;
        loop {
            let test = self.exec(condition);
            if test.erred() {
                return test;
            }
            if !truthy(&test) {
                break;
            }
            result = self.exec(body);
            if result.erred() {
                return result;
            }
        }
        result
    }

    fn root(&mut self, statements: &[Node], has_error: bool) -> Node {
        if has_error {
            return statements.first().cloned().unwrap_or(Node::Null);
        }
        self.exec_statements(statements)
    }

    fn error(&mut self, message: &str) -> Node {
        Node::Error(message.to_string())
    }
}

fn truthy(node: &Node) -> bool {
    match node {
        Node::Bool(b) => *b,
        _ => Number::from_node(node).is_some_and(|n| n.is_true()),
    }
}

fn compute(left: &Number, op: BinaryOp, right: &Number) -> Node {
    let result = match op {
        BinaryOp::Add => Ok(left.add(right)),
        BinaryOp::Sub => Ok(left.sub(right)),
        BinaryOp::Mul => Ok(left.mul(right)),
        BinaryOp::Div => left.div(right),
        BinaryOp::Pow => Ok(left.pow(right)),
        BinaryOp::Rem => left.rem(right),
        BinaryOp::Mod => left.modulo(right),
        BinaryOp::FloorDiv => left.floordiv(right),
        BinaryOp::Less => return Node::Bool(left.compare(right).is_lt()),
        BinaryOp::Greater => return Node::Bool(left.compare(right).is_gt()),
        BinaryOp::LessEqual => return Node::Bool(left.compare(right).is_le()),
        BinaryOp::GreaterEqual => return Node::Bool(left.compare(right).is_ge()),
        BinaryOp::Equal => return Node::Bool(left.equals(right)),
        BinaryOp::NotEqual => return Node::Bool(!left.equals(right)),
        BinaryOp::Concat => {
            Err(RuntimeError::type_error("operand '++' does not work with numbers."))
        },
    };
    match result {
        Ok(number) => number.into_node(),
        Err(error) => error.into(),
    }
}

/// Joins two values into one flat tuple. A non-tuple operand is appended to
/// the other side's elements.
fn merge_tuples(a: Node, b: Node) -> Node {
    match (a, b) {
        (Node::Tuple(mut xs), Node::Tuple(ys)) => {
            xs.extend(ys);
            Node::Tuple(xs)
        },
        (Node::Tuple(mut xs), y) => {
            xs.push(y);
            Node::Tuple(xs)
        },
        (x, Node::Tuple(mut ys)) => {
            ys.push(x);
            Node::Tuple(ys)
        },
        (x, y) => Node::Tuple(vec![x, y]),
    }
}

/// Elementwise matrix addition. Numeric pairs fold immediately; anything
/// else becomes a symbolic `+` node.
fn matrix_add(left: &Node, right: &Node) -> Node {
    let (Node::Matrix { rows: a,
                        row_count: ar,
                        col_count: ac, },
         Node::Matrix { rows: b,
                        row_count: br,
                        col_count: bc, }) = (left, right)
    else {
        return RuntimeError::type_error("matrix addition requires two matrices.").into();
    };
    if ar != br || ac != bc {
        return RuntimeError::type_error(format!(
            "cannot add a {ar}x{ac} matrix to a {br}x{bc} matrix."
        )).into();
    }
    let mut rows = Vec::with_capacity(a.len());
    for (row_a, row_b) in a.iter().zip(b.iter()) {
        let (Node::Vector(xs), Node::Vector(ys)) = (row_a, row_b) else {
            return RuntimeError::type_error("matrix rows must be vectors.").into();
        };
        let mut row = Vec::with_capacity(xs.len());
        for (x, y) in xs.iter().zip(ys.iter()) {
            match (Number::from_node(x), Number::from_node(y)) {
                (Some(a), Some(b)) => row.push(a.add(&b).into_node()),
                _ => row.push(Node::Binary { left:  Box::new(x.clone()),
                                             op:    BinaryOp::Add,
                                             right: Box::new(y.clone()), }),
            }
        }
        rows.push(Node::Vector(row));
    }
    Node::Matrix { rows,
                   row_count: *ar,
                   col_count: *ac }
}
