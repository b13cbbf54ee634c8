use logos::{Lexer as LogosLexer, Logos, Skip};

use crate::error::ParseError;

/// Represents a lexical token in the source input.
///
/// A token is a minimal but meaningful unit of text produced by the lexer.
/// Numeric literals keep their raw lexeme; the parser decides how to build
/// the corresponding literal node (radix, rational split, scientific
/// expansion).
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(extras = LexerExtras)]
pub enum Token {
    /// Scientific-notation literals, such as `2e3` or `1.5e-10`.
    #[regex(r"([0-9]+\.[0-9]+|\.[0-9]+|[0-9]+)[eE][+-]?[0-9]+", lexeme)]
    SciNum(String),
    /// Floating-point literals, such as `3.14` or `.5`.
    #[regex(r"[0-9]+\.[0-9]+|\.[0-9]+", lexeme)]
    Float(String),
    /// Fraction literals, such as `5/2`. Adjacent digits only; `5 / 2` lexes
    /// as three tokens instead.
    #[regex(r"[0-9]+/[0-9]+", lexeme)]
    Frac(String),
    /// Binary integer literals, such as `0b101`.
    #[regex(r"0b[01]+", lexeme)]
    BinaryNum(String),
    /// Octal integer literals, such as `0o17`.
    #[regex(r"0o[0-7]+", lexeme)]
    OctalNum(String),
    /// Hexadecimal integer literals, such as `0xff`.
    #[regex(r"0x[0-9a-fA-F]+", lexeme)]
    HexNum(String),
    /// A numeric literal with the reserved complex suffix, such as `3i`.
    #[regex(r"([0-9]+\.[0-9]+|[0-9]+)i", lexeme)]
    ComplexNum(String),
    /// Decimal integer literals, such as `42`.
    #[regex(r"[0-9]+", lexeme)]
    Int(String),
    /// String literals. No escape processing; the quotes are stripped.
    #[regex(r#""[^"]*""#, string_body)]
    Str(String),
    /// A string literal that was opened but never closed. Surfaced to the
    /// parser as a lex error.
    #[regex(r#""[^"]*"#, lexeme)]
    StrOpen(String),

    /// `let`
    #[token("let")]
    Let,
    /// `if`
    #[token("if")]
    If,
    /// `else`
    #[token("else")]
    Else,
    /// `while`
    #[token("while")]
    While,
    /// `null`
    #[token("null")]
    Null,
    /// `true`
    #[token("true")]
    True,
    /// `false`
    #[token("false")]
    False,
    /// `mod`
    #[token("mod")]
    Mod,
    /// `rem`
    #[token("rem")]
    Rem,
    /// Identifier tokens; variable or function names such as `x` or `sqrt`.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", lexeme)]
    Symbol(String),

    /// `++`
    #[token("++")]
    PlusPlus,
    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `*`
    #[token("*")]
    Star,
    /// `//`
    #[token("//")]
    SlashSlash,
    /// `/`
    #[token("/")]
    Slash,
    /// `%`
    #[token("%")]
    Percent,
    /// `^`
    #[token("^")]
    Caret,
    /// `==`
    #[token("==")]
    EqualEqual,
    /// `=`
    #[token("=")]
    Equals,
    /// `!=`
    #[token("!=")]
    BangEqual,
    /// `!`
    #[token("!")]
    Bang,
    /// `<=`
    #[token("<=")]
    LessEqual,
    /// `<`
    #[token("<")]
    Less,
    /// `>=`
    #[token(">=")]
    GreaterEqual,
    /// `>`
    #[token(">")]
    Greater,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `[`
    #[token("[")]
    LBracket,
    /// `]`
    #[token("]")]
    RBracket,
    /// `{`
    #[token("{")]
    LBrace,
    /// `}`
    #[token("}")]
    RBrace,
    /// `,`
    #[token(",")]
    Comma,
    /// `;`
    #[token(";")]
    Semicolon,
    /// `:`
    #[token(":")]
    Colon,
    /// `|`
    #[token("|")]
    Pipe,

    /// Newlines increment the line counter and are otherwise skipped.
    #[token("\n", newline)]
    NewLine,
    /// Spaces, tabs, and feeds.
    #[regex(r"[ \t\r\f]+", logos::skip)]
    Ignored,
}

/// Additional information carried by the lexer during tokenization.
///
/// Tracks the current line number for error reporting and diagnostics.
#[derive(Default)]
pub struct LexerExtras {
    /// The current line number in the source being tokenized.
    pub line: usize,
}

fn lexeme(lex: &mut LogosLexer<Token>) -> String {
    lex.slice().to_string()
}

fn string_body(lex: &mut LogosLexer<Token>) -> String {
    let slice = lex.slice();
    lex.extras.line += slice.chars().filter(|&c| c == '\n').count();
    slice.trim_matches('"').to_string()
}

fn newline(lex: &mut LogosLexer<Token>) -> Skip {
    lex.extras.line += 1;
    Skip
}

/// The classification of a token, independent of any carried lexeme.
///
/// Every kind carries a fixed binding power and fixity; the parser drives
/// its precedence-climbing loop off these alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    SciNum,
    Float,
    Frac,
    BinaryNum,
    OctalNum,
    HexNum,
    ComplexNum,
    Int,
    Str,
    StrOpen,
    Let,
    If,
    Else,
    While,
    Null,
    True,
    False,
    Mod,
    Rem,
    Symbol,
    PlusPlus,
    Plus,
    Minus,
    Star,
    SlashSlash,
    Slash,
    Percent,
    Caret,
    EqualEqual,
    Equals,
    BangEqual,
    Bang,
    LessEqual,
    Less,
    GreaterEqual,
    Greater,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Semicolon,
    Colon,
    Pipe,
}

/// Binding powers, weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Prec {
    /// The floor the expression parser starts from.
    None,
    /// Comparisons and equality.
    Low,
    /// Sums and tuple concatenation.
    Mid,
    /// Products.
    UpperMid,
    /// Exponentiation and the modulo family.
    High,
    /// Postfix operators.
    Top,
}

/// How a token participates in expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fixity {
    /// Literals and names.
    Atomic,
    /// Binary operators.
    Infix,
    /// Postfix operators.
    Postfix,
    /// Brackets, separators, and other punctuation.
    Delim,
    /// Statement keywords.
    Keyword,
}

impl TokenKind {
    /// The binding power the precedence climb uses for this kind.
    #[must_use]
    pub const fn bp(self) -> Prec {
        match self {
            Self::EqualEqual
            | Self::BangEqual
            | Self::Less
            | Self::LessEqual
            | Self::Greater
            | Self::GreaterEqual => Prec::Low,
            Self::Plus | Self::Minus | Self::PlusPlus => Prec::Mid,
            Self::Star | Self::Slash => Prec::UpperMid,
            Self::Caret | Self::Percent | Self::Mod | Self::Rem | Self::SlashSlash => Prec::High,
            Self::Bang => Prec::Top,
            _ => Prec::None,
        }
    }

    /// The fixity of this kind.
    #[must_use]
    pub const fn fixity(self) -> Fixity {
        match self {
            Self::SciNum
            | Self::Float
            | Self::Frac
            | Self::BinaryNum
            | Self::OctalNum
            | Self::HexNum
            | Self::ComplexNum
            | Self::Int
            | Self::Str
            | Self::StrOpen
            | Self::Null
            | Self::True
            | Self::False
            | Self::Symbol => Fixity::Atomic,
            Self::PlusPlus
            | Self::Plus
            | Self::Minus
            | Self::Star
            | Self::SlashSlash
            | Self::Slash
            | Self::Percent
            | Self::Caret
            | Self::Mod
            | Self::Rem
            | Self::EqualEqual
            | Self::BangEqual
            | Self::LessEqual
            | Self::Less
            | Self::GreaterEqual
            | Self::Greater => Fixity::Infix,
            Self::Bang => Fixity::Postfix,
            Self::Let | Self::If | Self::Else | Self::While => Fixity::Keyword,
            _ => Fixity::Delim,
        }
    }

    /// Whether the expression loop may consume this kind as an operator.
    #[must_use]
    pub const fn is_operable(self) -> bool {
        matches!(self.fixity(), Fixity::Infix | Fixity::Postfix)
    }

    /// Whether this kind is a numeric literal.
    #[must_use]
    pub const fn is_number(self) -> bool {
        matches!(self,
                 Self::SciNum
                 | Self::Float
                 | Self::Frac
                 | Self::BinaryNum
                 | Self::OctalNum
                 | Self::HexNum
                 | Self::ComplexNum
                 | Self::Int)
    }
}

impl Token {
    /// The kind of this token.
    #[must_use]
    pub fn kind(&self) -> TokenKind {
        match self {
            Self::SciNum(_) => TokenKind::SciNum,
            Self::Float(_) => TokenKind::Float,
            Self::Frac(_) => TokenKind::Frac,
            Self::BinaryNum(_) => TokenKind::BinaryNum,
            Self::OctalNum(_) => TokenKind::OctalNum,
            Self::HexNum(_) => TokenKind::HexNum,
            Self::ComplexNum(_) => TokenKind::ComplexNum,
            Self::Int(_) => TokenKind::Int,
            Self::Str(_) => TokenKind::Str,
            Self::StrOpen(_) => TokenKind::StrOpen,
            Self::Let => TokenKind::Let,
            Self::If => TokenKind::If,
            Self::Else => TokenKind::Else,
            Self::While => TokenKind::While,
            Self::Null => TokenKind::Null,
            Self::True => TokenKind::True,
            Self::False => TokenKind::False,
            Self::Mod => TokenKind::Mod,
            Self::Rem => TokenKind::Rem,
            Self::Symbol(_) => TokenKind::Symbol,
            Self::PlusPlus => TokenKind::PlusPlus,
            Self::Plus => TokenKind::Plus,
            Self::Minus => TokenKind::Minus,
            Self::Star => TokenKind::Star,
            Self::SlashSlash => TokenKind::SlashSlash,
            Self::Slash => TokenKind::Slash,
            Self::Percent => TokenKind::Percent,
            Self::Caret => TokenKind::Caret,
            Self::EqualEqual => TokenKind::EqualEqual,
            Self::Equals => TokenKind::Equals,
            Self::BangEqual => TokenKind::BangEqual,
            Self::Bang => TokenKind::Bang,
            Self::LessEqual => TokenKind::LessEqual,
            Self::Less => TokenKind::Less,
            Self::GreaterEqual => TokenKind::GreaterEqual,
            Self::Greater => TokenKind::Greater,
            Self::LParen => TokenKind::LParen,
            Self::RParen => TokenKind::RParen,
            Self::LBracket => TokenKind::LBracket,
            Self::RBracket => TokenKind::RBracket,
            Self::LBrace => TokenKind::LBrace,
            Self::RBrace => TokenKind::RBrace,
            Self::Comma => TokenKind::Comma,
            Self::Semicolon => TokenKind::Semicolon,
            Self::Colon => TokenKind::Colon,
            Self::Pipe => TokenKind::Pipe,
            Self::NewLine | Self::Ignored => unreachable!("skipped tokens never surface"),
        }
    }

    /// The source text of this token, for diagnostics.
    #[must_use]
    pub fn lexeme(&self) -> String {
        match self {
            Self::SciNum(s)
            | Self::Float(s)
            | Self::Frac(s)
            | Self::BinaryNum(s)
            | Self::OctalNum(s)
            | Self::HexNum(s)
            | Self::ComplexNum(s)
            | Self::Int(s)
            | Self::Str(s)
            | Self::StrOpen(s)
            | Self::Symbol(s) => s.clone(),
            Self::Let => "let".to_string(),
            Self::If => "if".to_string(),
            Self::Else => "else".to_string(),
            Self::While => "while".to_string(),
            Self::Null => "null".to_string(),
            Self::True => "true".to_string(),
            Self::False => "false".to_string(),
            Self::Mod => "mod".to_string(),
            Self::Rem => "rem".to_string(),
            Self::PlusPlus => "++".to_string(),
            Self::Plus => "+".to_string(),
            Self::Minus => "-".to_string(),
            Self::Star => "*".to_string(),
            Self::SlashSlash => "//".to_string(),
            Self::Slash => "/".to_string(),
            Self::Percent => "%".to_string(),
            Self::Caret => "^".to_string(),
            Self::EqualEqual => "==".to_string(),
            Self::Equals => "=".to_string(),
            Self::BangEqual => "!=".to_string(),
            Self::Bang => "!".to_string(),
            Self::LessEqual => "<=".to_string(),
            Self::Less => "<".to_string(),
            Self::GreaterEqual => ">=".to_string(),
            Self::Greater => ">".to_string(),
            Self::LParen => "(".to_string(),
            Self::RParen => ")".to_string(),
            Self::LBracket => "[".to_string(),
            Self::RBracket => "]".to_string(),
            Self::LBrace => "{".to_string(),
            Self::RBrace => "}".to_string(),
            Self::Comma => ",".to_string(),
            Self::Semicolon => ";".to_string(),
            Self::Colon => ":".to_string(),
            Self::Pipe => "|".to_string(),
            Self::NewLine | Self::Ignored => String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PrevKind {
    None,
    Number,
    Symbol,
    Other,
}

/// The stateful scanner the parser consumes.
///
/// Wraps the generated token stream and supplies the one rule a regex lexer
/// cannot express alone: a leading `-` folds into the numeric literal that
/// follows it, but only when the previous token was neither a number nor a
/// symbol. This disambiguates unary minus from subtraction without a fixup
/// pass, so `(-5)` lexes a negative literal while `x - 5` lexes a binary
/// minus.
pub struct Lexer<'src> {
    inner: LogosLexer<'src, Token>,
    prev:  PrevKind,
}

impl<'src> Lexer<'src> {
    /// Creates a scanner over `source`, starting at line one.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self { inner: Token::lexer_with_extras(source, LexerExtras { line: 1 }),
               prev:  PrevKind::None, }
    }

    /// The line the scanner is currently on.
    #[must_use]
    pub fn line(&self) -> usize {
        self.inner.extras.line
    }

    /// Scans the next token.
    ///
    /// Returns `Ok(None)` at end of input.
    ///
    /// # Errors
    /// Returns a `ParseError` for unrecognized characters and unterminated
    /// strings.
    pub fn next_token(&mut self) -> Result<Option<(Token, usize)>, ParseError> {
        let Some(raw) = self.inner.next() else {
            return Ok(None);
        };
        let line = self.inner.extras.line;
        let token = match raw {
            Ok(token) => token,
            Err(()) => {
                return Err(ParseError::UnrecognizedCharacter { found: self.inner
                                                                          .slice()
                                                                          .to_string(),
                                                               line })
            },
        };
        if let Token::StrOpen(_) = token {
            return Err(ParseError::UnterminatedString { line });
        }
        let token = if token == Token::Minus && self.minus_starts_literal() {
            self.fold_negative_literal(line)?
        } else {
            token
        };
        self.prev = classify(&token);
        Ok(Some((token, line)))
    }

    fn minus_starts_literal(&self) -> bool {
        !matches!(self.prev, PrevKind::Number | PrevKind::Symbol)
        && self.inner.remainder().starts_with(|c: char| c.is_ascii_digit())
    }

    /// Consumes the numeric literal right after a folding `-` and negates
    /// its lexeme.
    fn fold_negative_literal(&mut self, line: usize) -> Result<Token, ParseError> {
        match self.inner.next() {
            Some(Ok(token)) => Ok(match token {
                Token::SciNum(s) => Token::SciNum(negated(&s)),
                Token::Float(s) => Token::Float(negated(&s)),
                Token::Frac(s) => Token::Frac(negated(&s)),
                Token::BinaryNum(s) => Token::BinaryNum(negated(&s)),
                Token::OctalNum(s) => Token::OctalNum(negated(&s)),
                Token::HexNum(s) => Token::HexNum(negated(&s)),
                Token::ComplexNum(s) => Token::ComplexNum(negated(&s)),
                Token::Int(s) => Token::Int(negated(&s)),
                other => other,
            }),
            Some(Err(())) => {
                Err(ParseError::UnrecognizedCharacter { found: self.inner.slice().to_string(),
                                                        line })
            },
            None => Ok(Token::Minus),
        }
    }
}

fn classify(token: &Token) -> PrevKind {
    if token.kind().is_number() {
        PrevKind::Number
    } else if matches!(token, Token::Symbol(_)) {
        PrevKind::Symbol
    } else {
        PrevKind::Other
    }
}

fn negated(lexeme: &str) -> String {
    format!("-{lexeme}")
}
