use num_bigint::BigInt;
use num_rational::BigRational;

use crate::{error::RuntimeError, interpreter::corelib::NativeFn};

/// An abstract syntax tree node.
///
/// `Node` is the single closed hierarchy for the language: every construct
/// the parser can produce is a variant here, and every visitor must handle
/// every variant. Nodes are immutable once built; the evaluators never mutate
/// an existing node, they only synthesize new ones.
///
/// Errors are part of the tree: a failed parse or a failed evaluation step is
/// represented by an [`Node::Error`] value that flows through visitors like
/// any other node.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// The root of a parsed program. `has_error` is set when parsing failed,
    /// in which case the first statement is the diagnostic node.
    Root {
        /// The top-level statements, in source order.
        statements: Vec<Node>,
        /// Whether parsing recorded an error.
        has_error:  bool,
    },
    /// A braced sequence of statements evaluated in its own scope.
    Block(Vec<Node>),
    /// A parenthesized expression.
    Group(Box<Node>),
    /// A binary operation.
    Binary {
        /// Left operand.
        left:  Box<Node>,
        /// The operator.
        op:    BinaryOp,
        /// Right operand.
        right: Box<Node>,
    },
    /// A unary operation, prefix (`-x`, `+x`, `!x`) or postfix (`x!`).
    Unary {
        /// The operator.
        op:  UnaryOp,
        /// The operand.
        arg: Box<Node>,
    },
    /// A function call. `native` is set when the callee resolved to a
    /// registry function at parse time.
    Call {
        /// The name of the function being called.
        callee: String,
        /// The argument expressions.
        args:   Vec<Node>,
        /// The native registry function, if the callee is one.
        native: Option<NativeFn>,
    },
    /// A name reference.
    Symbol {
        /// The referenced name.
        name:      String,
        /// Whether the symbol stands for itself rather than a binding.
        is_static: bool,
    },
    /// A boolean literal.
    Bool(bool),
    /// A string literal.
    Str(String),
    /// The null value.
    Null,
    /// A tuple, e.g. `(1, 2, 3)`.
    Tuple(Vec<Node>),
    /// A vector, e.g. `[1, 2, 3]`.
    Vector(Vec<Node>),
    /// A matrix: a bracket of vectors of equal length.
    Matrix {
        /// The rows, each a [`Node::Vector`].
        rows:      Vec<Node>,
        /// The number of rows.
        row_count: usize,
        /// The number of columns, taken from the first row.
        col_count: usize,
    },
    /// A `let` declaration.
    VarDeclare {
        /// The declared name.
        name:  String,
        /// The initializer, or [`Node::Null`] when absent.
        value: Box<Node>,
        /// The source line of the declaration.
        line:  usize,
    },
    /// An assignment to an existing binding.
    Assign {
        /// The assigned name.
        name:  String,
        /// The new value.
        value: Box<Node>,
    },
    /// A function declaration, `let f(a, b) = body`.
    FunDeclare {
        /// The function name.
        name:   String,
        /// The parameters, each a [`Node::Symbol`].
        params: Vec<Node>,
        /// The function body.
        body:   Box<Node>,
    },
    /// An `if`/`else` conditional.
    Cond {
        /// The test expression.
        condition:  Box<Node>,
        /// Evaluated when the condition holds.
        consequent: Box<Node>,
        /// Evaluated otherwise; [`Node::Null`] when there is no `else`.
        alternate:  Box<Node>,
    },
    /// A `while` loop.
    While {
        /// The loop condition.
        condition: Box<Node>,
        /// The loop body.
        body:      Box<Node>,
    },
    /// An in-band diagnostic. Blocks and roots stop evaluating the moment a
    /// statement produces one of these.
    Error(String),
    /// An exact integer literal.
    Int(BigInt),
    /// An exact rational literal, always in lowest terms with a positive
    /// denominator and never with denominator one.
    Rational(BigRational),
    /// A floating-point literal.
    Real(f64),
}

impl Node {
    /// Builds an error node from anything printable.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(message.into())
    }

    /// Whether this node is an in-band error.
    #[must_use]
    pub const fn erred(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Whether this node is a numeric literal of any rank.
    #[must_use]
    pub const fn is_num(&self) -> bool {
        matches!(self, Self::Int(_) | Self::Rational(_) | Self::Real(_))
    }

    /// Whether this node is the null value.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Whether this node is a symbol.
    #[must_use]
    pub const fn is_symbol(&self) -> bool {
        matches!(self, Self::Symbol { .. })
    }

    /// Whether this node is a tuple.
    #[must_use]
    pub const fn is_tuple(&self) -> bool {
        matches!(self, Self::Tuple(_))
    }

    /// Whether this node is a vector.
    #[must_use]
    pub const fn is_vector(&self) -> bool {
        matches!(self, Self::Vector(_))
    }

    /// Whether this node is a matrix.
    #[must_use]
    pub const fn is_matrix(&self) -> bool {
        matches!(self, Self::Matrix { .. })
    }

    /// Whether this node is a parenthesized group.
    #[must_use]
    pub const fn is_group(&self) -> bool {
        matches!(self, Self::Group(_))
    }

    /// Dispatches this node to the matching visitor method.
    ///
    /// This is the single exhaustive match over the node hierarchy: adding a
    /// variant forces every visitor to be updated.
    pub fn accept<V: Visitor>(&self, visitor: &mut V) -> V::Out {
        match self {
            Self::Root { statements, has_error } => visitor.root(statements, *has_error),
            Self::Block(statements) => visitor.block(statements),
            Self::Group(inner) => visitor.group(inner),
            Self::Binary { left, op, right } => visitor.binary_expr(left, *op, right),
            Self::Unary { op, arg } => visitor.unary_expr(*op, arg),
            Self::Call { callee, args, native } => visitor.call_expr(callee, args, *native),
            Self::Symbol { name, is_static } => visitor.sym(name, *is_static),
            Self::Bool(value) => visitor.boolean(*value),
            Self::Str(value) => visitor.chars(value),
            Self::Null => visitor.null(),
            Self::Tuple(elements) => visitor.tuple(elements),
            Self::Vector(elements) => visitor.vector(elements),
            Self::Matrix { rows, row_count, col_count } => {
                visitor.matrix(rows, *row_count, *col_count)
            },
            Self::VarDeclare { name, value, line } => visitor.var_declare(name, value, *line),
            Self::Assign { name, value } => visitor.assign(name, value),
            Self::FunDeclare { name, params, body } => visitor.fun_declare(name, params, body),
            Self::Cond { condition, consequent, alternate } => {
                visitor.cond(condition, consequent, alternate)
            },
            Self::While { condition, body } => visitor.while_stmt(condition, body),
            Self::Error(message) => visitor.error(message),
            Self::Int(value) => visitor.int(value),
            Self::Rational(value) => visitor.frac(value),
            Self::Real(value) => visitor.real(*value),
        }
    }
}

impl From<RuntimeError> for Node {
    fn from(e: RuntimeError) -> Self {
        Self::Error(e.to_string())
    }
}

/// The visitor contract over the node hierarchy.
///
/// One method per [`Node`] variant; [`Node::accept`] performs the dispatch.
/// Each evaluator and renderer in this crate is one implementation of this
/// trait, differing only in its `Out` type.
pub trait Visitor {
    /// The result type this visitor produces per node.
    type Out;

    fn int(&mut self, value: &BigInt) -> Self::Out;
    fn frac(&mut self, value: &BigRational) -> Self::Out;
    fn real(&mut self, value: f64) -> Self::Out;
    fn boolean(&mut self, value: bool) -> Self::Out;
    fn chars(&mut self, value: &str) -> Self::Out;
    fn null(&mut self) -> Self::Out;
    fn sym(&mut self, name: &str, is_static: bool) -> Self::Out;
    fn group(&mut self, inner: &Node) -> Self::Out;
    fn tuple(&mut self, elements: &[Node]) -> Self::Out;
    fn vector(&mut self, elements: &[Node]) -> Self::Out;
    fn matrix(&mut self, rows: &[Node], row_count: usize, col_count: usize) -> Self::Out;
    fn block(&mut self, statements: &[Node]) -> Self::Out;
    fn unary_expr(&mut self, op: UnaryOp, arg: &Node) -> Self::Out;
    fn binary_expr(&mut self, left: &Node, op: BinaryOp, right: &Node) -> Self::Out;
    fn call_expr(&mut self, callee: &str, args: &[Node], native: Option<NativeFn>) -> Self::Out;
    fn var_declare(&mut self, name: &str, value: &Node, line: usize) -> Self::Out;
    fn fun_declare(&mut self, name: &str, params: &[Node], body: &Node) -> Self::Out;
    fn assign(&mut self, name: &str, value: &Node) -> Self::Out;
    fn cond(&mut self, condition: &Node, consequent: &Node, alternate: &Node) -> Self::Out;
    fn while_stmt(&mut self, condition: &Node, body: &Node) -> Self::Out;
    fn root(&mut self, statements: &[Node], has_error: bool) -> Self::Out;
    fn error(&mut self, message: &str) -> Self::Out;
}

/// Represents a binary operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BinaryOp {
    /// Addition (`+`)
    Add,
    /// Subtraction (`-`)
    Sub,
    /// Multiplication (`*`)
    Mul,
    /// Division (`/`)
    Div,
    /// Exponentiation (`^`)
    Pow,
    /// Remainder (`%` or `rem`)
    Rem,
    /// Floored modulo (`mod`)
    Mod,
    /// Floor division (`//`)
    FloorDiv,
    /// Less than (`<`)
    Less,
    /// Greater than (`>`)
    Greater,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Greater than or equal (`>=`)
    GreaterEqual,
    /// Equal to (`==`)
    Equal,
    /// Not equal to (`!=`)
    NotEqual,
    /// Tuple concatenation (`++`)
    Concat,
}

impl std::fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let operator = match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Pow => "^",
            Self::Rem => "%",
            Self::Mod => "mod",
            Self::FloorDiv => "//",
            Self::Less => "<",
            Self::Greater => ">",
            Self::LessEqual => "<=",
            Self::GreaterEqual => ">=",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::Concat => "++",
        };
        write!(f, "{operator}")
    }
}

/// Represents a unary operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UnaryOp {
    /// Arithmetic negation (`-x`).
    Negate,
    /// Identity (`+x`).
    Plus,
    /// Logical NOT, prefix or postfix (`!x`, `x!`).
    Bang,
}

impl std::fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let operator = match self {
            Self::Negate => "-",
            Self::Plus => "+",
            Self::Bang => "!",
        };
        write!(f, "{operator}")
    }
}
