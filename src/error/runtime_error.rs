#[derive(Debug)]
/// Represents all errors that can be raised while evaluating an AST.
///
/// Runtime errors never unwind through the host: evaluation converts them
/// into in-band error values (an `Error` AST node or an error string), and
/// block evaluation short-circuits on the first one it sees.
pub enum RuntimeError {
    /// Tried to read a variable that no scope in the chain declares.
    UnknownVariable {
        /// The name of the variable.
        name: String,
    },
    /// Called a function that no scope in the chain declares.
    UnknownFunction {
        /// The name of the function.
        name: String,
    },
    /// Tried to declare a name that already exists in the same scope.
    Redeclaration {
        /// The name of the variable or function.
        name: String,
    },
    /// Tried to assign to a name that no scope in the chain declares.
    AssignmentToUndeclared {
        /// The name of the variable.
        name: String,
    },
    /// A function was called with fewer arguments than it has parameters.
    ArityMismatch {
        /// The name of the function.
        callee:   String,
        /// The number of parameters the function declares.
        expected: usize,
        /// The number of arguments actually passed.
        actual:   usize,
    },
    /// An operator was applied to operands it does not work on.
    TypeError {
        /// Details about the type mismatch.
        details: String,
    },
    /// Attempted division by zero, in any numeric representation.
    DivisionByZero,
    /// A native function received arguments it cannot digest.
    InvalidNativeCall {
        /// The name of the native function.
        callee: String,
    },
}

impl RuntimeError {
    /// Builds a `TypeError` from anything printable.
    pub fn type_error(details: impl Into<String>) -> Self {
        Self::TypeError { details: details.into() }
    }
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownVariable { name } => {
                write!(f, "Resolver error: no variable named '{name}' exists.")
            },

            Self::UnknownFunction { name } => {
                write!(f, "Resolver error: no function named '{name}' exists.")
            },

            Self::Redeclaration { name } => write!(f,
                                                   "Resolver error: name '{name}' has been declared in the same scope, redeclaration is prohibited."),

            Self::AssignmentToUndeclared { name } => {
                write!(f, "Resolver error: cannot assign to undeclared name '{name}'.")
            },

            Self::ArityMismatch { callee, expected, actual } => {
                let count = match expected {
                    0 => "no arguments".to_string(),
                    1 => "1 argument".to_string(),
                    n => format!("{n} arguments"),
                };
                write!(f, "Arity error: function '{callee}' requires {count}, but {actual} were passed.")
            },

            Self::TypeError { details } => write!(f, "Type error: {details}"),

            Self::DivisionByZero => write!(f, "Type error: division by zero."),

            Self::InvalidNativeCall { callee } => {
                write!(f, "Type error: invalid native call to '{callee}'.")
            },
        }
    }
}

impl std::error::Error for RuntimeError {}
