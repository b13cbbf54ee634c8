use std::collections::HashSet;

use num_bigint::BigInt;

use crate::{
    ast::{BinaryOp, Node, UnaryOp},
    error::ParseError,
    interpreter::{
        corelib::CoreLib,
        lexer::{Lexer, Prec, Token, TokenKind},
        value::number::Number,
    },
    util::num::bigint_from_lexeme,
};

/// What the parser most recently produced. A few grammar rules are sensitive
/// to this: statement termination after a block, and the implicit
/// multiplication of adjacent groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LastParsed {
    Nothing,
    Number,
    Symbol,
    Call,
    Block,
    Other,
}

/// A precedence-climbing parser over one source string.
///
/// The parser is inert after its first error: every further `expression` or
/// `eat` call observes the recorded diagnostic and refuses to build anything
/// new, so the caller always receives the first failure. There is no error
/// recovery or resynchronization.
pub struct Parser<'lib, 'src> {
    lexer:     Lexer<'src>,
    peek:      Option<(Token, usize)>,
    error:     Option<Node>,
    last_node: LastParsed,
    funcs:     HashSet<String>,
    lib:       &'lib CoreLib,
}

impl<'lib, 'src> Parser<'lib, 'src> {
    /// Creates a parser over `source`, resolving calls and constants against
    /// `lib`.
    #[must_use]
    pub fn new(lib: &'lib CoreLib, source: &'src str) -> Self {
        let mut parser = Self { lexer:     Lexer::new(source),
                                peek:      None,
                                error:     None,
                                last_node: LastParsed::Nothing,
                                funcs:     HashSet::new(),
                                lib };
        parser.advance_peek();
        parser
    }

    /// Parses a whole program.
    ///
    /// On failure the returned root carries `has_error` and its single
    /// statement is the diagnostic node.
    pub fn parse(mut self) -> Node {
        let mut statements = Vec::new();
        while self.peek.is_some() && self.error.is_none() {
            statements.push(self.stmnt());
        }
        match self.error.take() {
            Some(err) => Node::Root { statements: vec![err],
                                      has_error:  true, },
            None => Node::Root { statements,
                                 has_error: false },
        }
    }

    /// Parses a single expression, for callers that synthesize their own
    /// surrounding declaration. Returns the diagnostic node on failure.
    pub fn parse_expr(mut self) -> Node {
        let expr = self.expression(Prec::None);
        match self.error.take() {
            Some(err) => err,
            None => expr,
        }
    }

    /* ---------------------------------------------------------------- */
    /* Statements                                                       */
    /* ---------------------------------------------------------------- */

    fn stmnt(&mut self) -> Node {
        if self.check(TokenKind::Semicolon) {
            self.tick();
        }
        if self.reads(TokenKind::Let) {
            return self.variable_declaration();
        }
        if self.reads(TokenKind::If) {
            return self.conditional();
        }
        if self.reads(TokenKind::While) {
            return self.while_stmt();
        }
        if self.check(TokenKind::LBrace) {
            return self.block();
        }
        self.expr_stmt()
    }

    fn variable_declaration(&mut self) -> Node {
        let line = self.current_line();
        let name = self.eat(TokenKind::Symbol, "Expected a valid variable name.");
        if self.reads(TokenKind::LParen) {
            return self.function_declaration(name);
        }
        let mut init = Node::Null;
        if self.reads(TokenKind::Equals) {
            init = self.expr_stmt();
        }
        Node::VarDeclare { name,
                           value: Box::new(init),
                           line }
    }

    fn function_declaration(&mut self, name: String) -> Node {
        self.funcs.insert(name.clone());
        let mut params = Vec::new();
        if !self.check(TokenKind::RParen) && self.error.is_none() {
            loop {
                let param = self.eat(TokenKind::Symbol, "Expected a parameter name.");
                params.push(Node::Symbol { name:      param,
                                           is_static: false, });
                if !self.reads(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.eat(TokenKind::RParen, "Expected ')' to close the parameter list.");
        self.eat(TokenKind::Equals, "Expected '=' in the function declaration.");
        let body = self.stmnt();
        Node::FunDeclare { name,
                           params,
                           body: Box::new(body) }
    }

    fn conditional(&mut self) -> Node {
        self.eat(TokenKind::LParen, "Expected '(' to open the conditional's test.");
        let condition = self.expression(Prec::None);
        self.eat(TokenKind::RParen, "Expected ')' to close the conditional's test.");
        let consequent = self.stmnt();
        let alternate = if self.reads(TokenKind::Else) {
            self.stmnt()
        } else {
            Node::Null
        };
        Node::Cond { condition:  Box::new(condition),
                     consequent: Box::new(consequent),
                     alternate:  Box::new(alternate), }
    }

    fn while_stmt(&mut self) -> Node {
        self.eat(TokenKind::LParen, "Expected '(' after 'while'.");
        let condition = self.expression(Prec::None);
        self.eat(TokenKind::RParen, "Expected ')' after the loop condition.");
        let body = self.stmnt();
        Node::While { condition: Box::new(condition),
                      body:      Box::new(body), }
    }

    fn block(&mut self) -> Node {
        self.eat(TokenKind::LBrace, "Expected '{' to open the block.");
        let mut statements = Vec::new();
        while !self.check(TokenKind::RBrace) && self.peek.is_some() && self.error.is_none() {
            statements.push(self.stmnt());
        }
        self.eat(TokenKind::RBrace, "Expected '}' to close the block.");
        self.last_node = LastParsed::Block;
        Node::Block(statements)
    }

    fn expr_stmt(&mut self) -> Node {
        let expr = self.expression(Prec::None);
        if self.at_eof() || self.last_node == LastParsed::Block {
            return expr;
        }
        self.eat(TokenKind::Semicolon, "Statements must end with ';'.");
        expr
    }

    /* ---------------------------------------------------------------- */
    /* Expressions                                                      */
    /* ---------------------------------------------------------------- */

    fn expression(&mut self, min_bp: Prec) -> Node {
        if let Some(err) = &self.error {
            return err.clone();
        }
        let mut lhs = match self.peek_kind() {
            Some(TokenKind::Symbol) => self.id(),
            Some(TokenKind::True) => self.atom(|_| Node::Bool(true)),
            Some(TokenKind::False) => self.atom(|_| Node::Bool(false)),
            Some(TokenKind::Str) => self.atom(Node::Str),
            Some(TokenKind::Null) => self.atom(|_| Node::Null),
            Some(TokenKind::LParen) => {
                let mut node = self.group();
                if self.check(TokenKind::LParen) && self.last_node != LastParsed::Call {
                    let rhs = self.group();
                    node = binex(node, BinaryOp::Mul, rhs);
                }
                node
            },
            Some(TokenKind::LBrace) => self.block(),
            Some(TokenKind::LBracket) => self.array(),
            Some(TokenKind::Pipe) => self.absolute_value(),
            _ => self.literal(),
        };
        while let Some(kind) = self.peek_kind() {
            if self.error.is_some() || !kind.is_operable() {
                break;
            }
            let bp = kind.bp();
            if bp < min_bp {
                break;
            }
            self.tick();
            let rhs = self.expression(bp);
            lhs = self.make_expr(lhs, kind, rhs);
        }
        lhs
    }

    /// Combines a climbed operand pair into a binary node, or into a unary
    /// node when either side is absent, which is how prefix and postfix
    /// operators fall out of the loop.
    fn make_expr(&mut self, lhs: Node, kind: TokenKind, rhs: Node) -> Node {
        let node = match (lhs.is_null(), rhs.is_null()) {
            (false, false) => match to_binary_op(kind) {
                Some(BinaryOp::Div) => match collapse_rational(&lhs, &rhs) {
                    Some(folded) => folded,
                    None => binex(lhs, BinaryOp::Div, rhs),
                },
                Some(op) => binex(lhs, op, rhs),
                None => Node::error(format!("Parse error: '{}' is not a binary operator.",
                                            op_lexeme(kind))),
            },
            (false, true) => match to_unary_op(kind) {
                Some(op) => unex(op, lhs),
                None => Node::error(format!("Parse error: '{}' is not a postfix operator.",
                                            op_lexeme(kind))),
            },
            (true, false) => match to_unary_op(kind) {
                Some(op) => unex(op, rhs),
                None => Node::error(format!("Parse error: '{}' is not a prefix operator.",
                                            op_lexeme(kind))),
            },
            (true, true) => Node::Null,
        };
        self.last_node = last_of(&node);
        node
    }

    /// Parses a numeric atom, then applies the implicit-multiplication
    /// rules: a literal butted against a variable, a registry call, or a
    /// parenthesized group multiplies into it.
    fn literal(&mut self) -> Node {
        let mut node = match self.peek_kind() {
            Some(TokenKind::Int) => self.atom(|lex| int_node(&lex, 10)),
            Some(TokenKind::BinaryNum) => self.atom(|lex| int_node(&lex, 2)),
            Some(TokenKind::OctalNum) => self.atom(|lex| int_node(&lex, 8)),
            Some(TokenKind::HexNum) => self.atom(|lex| int_node(&lex, 16)),
            Some(TokenKind::Float) => self.atom(|lex| real_node(&lex)),
            Some(TokenKind::Frac) => self.atom(|lex| frac_node(&lex)),
            Some(TokenKind::SciNum) => self.scientific(),
            Some(TokenKind::ComplexNum) => {
                let line = self.current_line();
                self.tick();
                return self.failed(ParseError::ComplexUnsupported { line });
            },
            _ => Node::Null,
        };
        if node.is_null() {
            return node;
        }
        if self.peek_kind() == Some(TokenKind::Symbol) {
            let name = self.peek_lexeme();
            if self.is_variable_name(&name) {
                let rhs = self.expression(Prec::None);
                node = binex(node, BinaryOp::Mul, rhs);
            } else if self.lib.has_function(&name) {
                let sym = self.atom(|lex| Node::Symbol { name:      lex,
                                                         is_static: false, });
                let rhs = self.call_expr(sym);
                node = binex(node, BinaryOp::Mul, rhs);
            }
        }
        if self.check(TokenKind::LParen) {
            let rhs = self.group();
            node = binex(node, BinaryOp::Mul, rhs);
        }
        self.last_node = last_of(&node);
        node
    }

    /// Expands `a e b` into `a * 10 ^ b`, keeping both halves exact.
    fn scientific(&mut self) -> Node {
        let lexeme = self.tick().map(|(t, _)| t.lexeme()).unwrap_or_default();
        let (mantissa, exponent) = match lexeme.split_once(&['e', 'E'][..]) {
            Some(parts) => parts,
            None => return Node::error(format!("Parse error: malformed literal '{lexeme}'.")),
        };
        let left = if mantissa.contains('.') {
            real_node(mantissa)
        } else {
            int_node(mantissa, 10)
        };
        let exponent = int_node(exponent.trim_start_matches('+'), 10);
        let power = binex(Node::Int(BigInt::from(10)), BinaryOp::Pow, exponent);
        let node = binex(left, BinaryOp::Mul, power);
        self.last_node = last_of(&node);
        node
    }

    fn id(&mut self) -> Node {
        let name = self.eat(TokenKind::Symbol, "Expected a valid identifier.");
        let node = Node::Symbol { name:      name.clone(),
                                  is_static: false, };
        self.last_node = LastParsed::Symbol;
        if self.check(TokenKind::LParen) && self.error.is_none() {
            return self.call_expr(node);
        }
        if self.reads(TokenKind::Equals) {
            let value = self.expression(Prec::None);
            self.last_node = LastParsed::Other;
            return Node::Assign { name,
                                  value: Box::new(value) };
        }
        node
    }

    /// Parses the argument list of a call, unless the callee is an ordinary
    /// variable, in which case the parenthesis is implicit multiplication.
    fn call_expr(&mut self, node: Node) -> Node {
        let Node::Symbol { name, .. } = &node else {
            return node;
        };
        let name = name.clone();
        if self.is_variable_name(&name) {
            let rhs = self.group();
            return binex(node, BinaryOp::Mul, rhs);
        }
        self.eat(TokenKind::LParen, "Expected '(' in the call expression.");
        let mut args = Vec::new();
        if !self.check(TokenKind::RParen) && self.error.is_none() {
            loop {
                args.push(self.expression(Prec::None));
                if !self.reads(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.eat(TokenKind::RParen, "Expected ')' to close the call expression.");
        self.last_node = LastParsed::Call;
        Node::Call { callee: name.clone(),
                     args,
                     native: self.lib.native(&name) }
    }

    fn absolute_value(&mut self) -> Node {
        self.eat(TokenKind::Pipe, "Expected '|' to open the absolute value.");
        let expr = self.expression(Prec::None);
        self.eat(TokenKind::Pipe, "Expected '|' to close the absolute value.");
        self.last_node = LastParsed::Call;
        Node::Call { callee: "abs".to_string(),
                     args:   vec![expr],
                     native: self.lib.native("abs"), }
    }

    fn group(&mut self) -> Node {
        self.eat(TokenKind::LParen, "Expected '(' to open the group.");
        let expr = self.expression(Prec::None);
        if self.reads(TokenKind::Comma) {
            let mut elements = vec![expr];
            loop {
                elements.push(self.expression(Prec::None));
                if !self.reads(TokenKind::Comma) {
                    break;
                }
            }
            self.eat(TokenKind::RParen, "Expected ')' to close the tuple.");
            self.last_node = LastParsed::Other;
            return Node::Tuple(elements);
        }
        self.eat(TokenKind::RParen, "Expected ')' to close the group.");
        self.last_node = LastParsed::Other;
        if self.peek_kind() == Some(TokenKind::PlusPlus) {
            return Node::Tuple(vec![expr]);
        }
        Node::Group(Box::new(expr))
    }

    /// Parses a bracket: a vector, a matrix once any element is itself a
    /// vector, or a `[start:end:step]` range desugared onto the registry's
    /// `range`.
    fn array(&mut self) -> Node {
        let line = self.current_line();
        self.eat(TokenKind::LBracket, "Expected '[' to open the bracket.");
        let first = self.expression(Prec::None);
        if self.reads(TokenKind::Colon) {
            let end = self.expression(Prec::None);
            let mut step = Node::Int(BigInt::from(1));
            if self.reads(TokenKind::Colon) {
                step = self.expression(Prec::None);
            }
            self.eat(TokenKind::RBracket, "Expected ']' to close the range.");
            self.last_node = LastParsed::Call;
            return Node::Call { callee: "range".to_string(),
                                args:   vec![first, end, step],
                                native: self.lib.native("range"), };
        }
        let mut is_matrix = first.is_vector();
        let col_count = match &first {
            Node::Vector(elements) => elements.len(),
            _ => 0,
        };
        let mut row_count = usize::from(is_matrix);
        let mut elements = vec![first];
        while self.reads(TokenKind::Comma) {
            let expr = self.expression(Prec::None);
            if is_matrix && !expr.is_vector() {
                return self.failed(ParseError::MatrixRowExpected { line });
            }
            if let Node::Vector(row) = &expr {
                is_matrix = true;
                row_count += 1;
                if col_count != row.len() {
                    return self.failed(ParseError::JaggedMatrix { line });
                }
            }
            elements.push(expr);
        }
        self.eat(TokenKind::RBracket, "Expected ']' to close the bracket.");
        self.last_node = LastParsed::Other;
        if is_matrix {
            Node::Matrix { rows: elements,
                           row_count,
                           col_count }
        } else {
            Node::Vector(elements)
        }
    }

    /* ---------------------------------------------------------------- */
    /* Token plumbing                                                   */
    /* ---------------------------------------------------------------- */

    fn atom(&mut self, builder: impl FnOnce(String) -> Node) -> Node {
        let lexeme = self.tick().map(|(t, _)| t.lexeme()).unwrap_or_default();
        let node = builder(lexeme);
        self.last_node = last_of(&node);
        node
    }

    fn is_variable_name(&self, name: &str) -> bool {
        (!self.funcs.contains(name) && !self.lib.has_function(name))
        || self.lib.has_constant(name)
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.peek.as_ref().map(|(token, _)| token.kind())
    }

    fn peek_lexeme(&self) -> String {
        self.peek
            .as_ref()
            .map(|(token, _)| token.lexeme())
            .unwrap_or_default()
    }

    fn current_line(&self) -> usize {
        self.peek
            .as_ref()
            .map_or_else(|| self.lexer.line(), |(_, line)| *line)
    }

    fn at_eof(&self) -> bool {
        self.peek.is_none()
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.error.is_none() && self.peek_kind() == Some(kind)
    }

    fn reads(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.tick();
            return true;
        }
        false
    }

    /// Consumes the token under `kind`, or records a diagnostic and advances
    /// anyway, so downstream calls observe a consistent position even on
    /// failure. Returns the consumed lexeme.
    fn eat(&mut self, kind: TokenKind, expected: &str) -> String {
        let current = self.peek.clone();
        match current {
            Some((token, _)) if token.kind() == kind => {
                self.tick();
                token.lexeme()
            },
            Some((token, line)) => {
                let error = ParseError::UnexpectedToken { token: token.lexeme(),
                                                          expected: expected.to_string(),
                                                          line };
                self.fail(error);
                self.tick();
                String::new()
            },
            None => {
                let error = ParseError::UnexpectedEndOfInput { expected: expected.to_string(),
                                                               line:     self.lexer.line(), };
                self.fail(error);
                String::new()
            },
        }
    }

    fn tick(&mut self) -> Option<(Token, usize)> {
        if self.error.is_some() {
            self.peek = None;
            return None;
        }
        let token = self.peek.take();
        self.advance_peek();
        token
    }

    fn advance_peek(&mut self) {
        match self.lexer.next_token() {
            Ok(next) => self.peek = next,
            Err(error) => {
                self.fail(error);
                self.peek = None;
            },
        }
    }

    fn fail(&mut self, error: ParseError) {
        if self.error.is_none() {
            self.error = Some(Node::error(error.to_string()));
        }
    }

    fn failed(&mut self, error: ParseError) -> Node {
        self.fail(error);
        self.error.clone().unwrap_or(Node::Null)
    }
}

fn binex(left: Node, op: BinaryOp, right: Node) -> Node {
    Node::Binary { left:  Box::new(left),
                   op,
                   right: Box::new(right), }
}

fn unex(op: UnaryOp, arg: Node) -> Node {
    Node::Unary { op,
                  arg: Box::new(arg) }
}

/// Two adjacent integer literals joined by `/` fold straight into a rational
/// literal instead of a division node.
fn collapse_rational(lhs: &Node, rhs: &Node) -> Option<Node> {
    if let (Node::Int(a), Node::Int(b)) = (lhs, rhs) {
        return Some(match Number::rational(a.clone(), b.clone()) {
                        Ok(number) => number.into_node(),
                        Err(error) => Node::from(error),
                    });
    }
    None
}

fn int_node(lexeme: &str, radix: u32) -> Node {
    match bigint_from_lexeme(lexeme, radix) {
        Some(value) => Node::Int(value),
        None => Node::error(format!("Parse error: malformed integer literal '{lexeme}'.")),
    }
}

fn real_node(lexeme: &str) -> Node {
    match lexeme.parse::<f64>() {
        Ok(value) => Node::Real(value),
        Err(_) => Node::error(format!("Parse error: malformed float literal '{lexeme}'.")),
    }
}

fn frac_node(lexeme: &str) -> Node {
    let Some((numer, denom)) = lexeme.split_once('/') else {
        return Node::error(format!("Parse error: malformed fraction literal '{lexeme}'."));
    };
    match (bigint_from_lexeme(numer, 10), bigint_from_lexeme(denom, 10)) {
        (Some(numer), Some(denom)) => match Number::rational(numer, denom) {
            Ok(number) => number.into_node(),
            Err(error) => Node::from(error),
        },
        _ => Node::error(format!("Parse error: malformed fraction literal '{lexeme}'.")),
    }
}

const fn to_binary_op(kind: TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::Plus => Some(BinaryOp::Add),
        TokenKind::Minus => Some(BinaryOp::Sub),
        TokenKind::Star => Some(BinaryOp::Mul),
        TokenKind::Slash => Some(BinaryOp::Div),
        TokenKind::Caret => Some(BinaryOp::Pow),
        TokenKind::Percent | TokenKind::Rem => Some(BinaryOp::Rem),
        TokenKind::Mod => Some(BinaryOp::Mod),
        TokenKind::SlashSlash => Some(BinaryOp::FloorDiv),
        TokenKind::Less => Some(BinaryOp::Less),
        TokenKind::Greater => Some(BinaryOp::Greater),
        TokenKind::LessEqual => Some(BinaryOp::LessEqual),
        TokenKind::GreaterEqual => Some(BinaryOp::GreaterEqual),
        TokenKind::EqualEqual => Some(BinaryOp::Equal),
        TokenKind::BangEqual => Some(BinaryOp::NotEqual),
        TokenKind::PlusPlus => Some(BinaryOp::Concat),
        _ => None,
    }
}

const fn to_unary_op(kind: TokenKind) -> Option<UnaryOp> {
    match kind {
        TokenKind::Minus => Some(UnaryOp::Negate),
        TokenKind::Plus => Some(UnaryOp::Plus),
        TokenKind::Bang => Some(UnaryOp::Bang),
        _ => None,
    }
}

const fn op_lexeme(kind: TokenKind) -> &'static str {
    match kind {
        TokenKind::Plus => "+",
        TokenKind::PlusPlus => "++",
        TokenKind::Minus => "-",
        TokenKind::Star => "*",
        TokenKind::Slash => "/",
        TokenKind::SlashSlash => "//",
        TokenKind::Percent => "%",
        TokenKind::Caret => "^",
        TokenKind::Mod => "mod",
        TokenKind::Rem => "rem",
        TokenKind::Less => "<",
        TokenKind::Greater => ">",
        TokenKind::LessEqual => "<=",
        TokenKind::GreaterEqual => ">=",
        TokenKind::EqualEqual => "==",
        TokenKind::BangEqual => "!=",
        TokenKind::Bang => "!",
        _ => "?",
    }
}

fn last_of(node: &Node) -> LastParsed {
    match node {
        _ if node.is_num() => LastParsed::Number,
        Node::Symbol { .. } => LastParsed::Symbol,
        Node::Call { .. } => LastParsed::Call,
        Node::Block(_) => LastParsed::Block,
        _ => LastParsed::Other,
    }
}
