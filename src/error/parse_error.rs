#[derive(Debug)]
/// Represents all errors that can occur during lexing or parsing.
pub enum ParseError {
    /// Found an unexpected token while parsing.
    UnexpectedToken {
        /// The token encountered.
        token:    String,
        /// A description of what the parser expected instead.
        expected: String,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// Reached the end of input unexpectedly.
    UnexpectedEndOfInput {
        /// A description of what the parser expected.
        expected: String,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// The scanner hit a character that starts no token.
    UnrecognizedCharacter {
        /// The offending slice of source text.
        found: String,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// A string literal was opened but never closed.
    UnterminatedString {
        /// The source line where the string opened.
        line: usize,
    },
    /// A numeric literal carried the complex suffix `i`, which is reserved
    /// but not implemented.
    ComplexUnsupported {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A bracket literal mixed vector rows with non-vector elements.
    MatrixRowExpected {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A matrix literal contained rows of different lengths.
    JaggedMatrix {
        /// The source line where the error occurred.
        line: usize,
    },
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedToken { token, expected, line } => {
                write!(f, "Parse error on line {line}: {expected} Found '{token}' instead.")
            },

            Self::UnexpectedEndOfInput { expected, line } => {
                write!(f, "Parse error on line {line}: {expected} Found the end of input instead.")
            },

            Self::UnrecognizedCharacter { found, line } => {
                write!(f, "Lex error on line {line}: unrecognized token '{found}'.")
            },

            Self::UnterminatedString { line } => {
                write!(f, "Lex error on line {line}: unterminated string.")
            },

            Self::ComplexUnsupported { line } => write!(f,
                                                        "Parse error on line {line}: complex literals are reserved but not implemented."),

            Self::MatrixRowExpected { line } => write!(f,
                                                       "Parse error on line {line}: only vectors are permitted as matrix rows."),

            Self::JaggedMatrix { line } => {
                write!(f, "Parse error on line {line}: jagged matrices are not permitted.")
            },
        }
    }
}

impl std::error::Error for ParseError {}
