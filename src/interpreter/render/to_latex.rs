use num_bigint::BigInt;
use num_rational::BigRational;

use crate::{
    ast::{BinaryOp, Node, UnaryOp, Visitor},
    interpreter::corelib::{CoreLib, NativeFn},
};

/// The math-markup renderer.
///
/// A side-effect-free visitor producing a LaTeX string per node. Nodes with
/// no defined LaTeX form (declarations, conditionals, loops, diagnostics)
/// render as the empty string rather than failing, so a display surface can
/// always embed the output.
pub struct ToLatex<'lib> {
    lib: &'lib CoreLib,
}

impl<'lib> ToLatex<'lib> {
    /// Creates a renderer resolving symbol and function names against `lib`.
    #[must_use]
    pub const fn new(lib: &'lib CoreLib) -> Self {
        Self { lib }
    }

    fn render(&mut self, node: &Node) -> String {
        node.accept(self)
    }

    fn render_all(&mut self, nodes: &[Node], separator: &str) -> String {
        let rendered: Vec<String> = nodes.iter().map(|node| self.render(node)).collect();
        rendered.join(separator)
    }
}

impl Visitor for ToLatex<'_> {
    type Out = String;

    fn int(&mut self, value: &BigInt) -> String {
        value.to_string()
    }

    fn frac(&mut self, value: &BigRational) -> String {
        format!("\\dfrac{{{}}}{{{}}}", value.numer(), value.denom())
    }

    fn real(&mut self, value: f64) -> String {
        format!("{value}")
    }

    fn boolean(&mut self, value: bool) -> String {
        format!("\\text{{{value}}}")
    }

    fn chars(&mut self, value: &str) -> String {
        format!("\\text{{\\textquotedblleft}}{value}\\text{{\\textquotedblright}}")
    }

    fn null(&mut self) -> String {
        String::new()
    }

    fn sym(&mut self, name: &str, _is_static: bool) -> String {
        if let Some(latex) = self.lib.latex_function(name) {
            return latex.to_string();
        }
        self.lib
            .latex_symbol(name)
            .unwrap_or_else(|| name.to_string())
    }

    fn group(&mut self, inner: &Node) -> String {
        format!("\\left({}\\right)", self.render(inner))
    }

    fn tuple(&mut self, elements: &[Node]) -> String {
        format!("\\left({}\\right)", self.render_all(elements, ", "))
    }

    fn vector(&mut self, elements: &[Node]) -> String {
        format!("\\left[{}\\right]", self.render_all(elements, ", "))
    }

    fn matrix(&mut self, rows: &[Node], _row_count: usize, _col_count: usize) -> String {
        let mut rendered = Vec::with_capacity(rows.len());
        for row in rows {
            match row {
                Node::Vector(elements) => rendered.push(self.render_all(elements, " & ")),
                other => rendered.push(self.render(other)),
            }
        }
        format!("\\begin{{bmatrix}} {} \\end{{bmatrix}}", rendered.join(" \\\\ "))
    }

    fn block(&mut self, statements: &[Node]) -> String {
        format!("\\left({}\\right)", self.render_all(statements, ", "))
    }

    fn unary_expr(&mut self, op: UnaryOp, arg: &Node) -> String {
        let arg = self.render(arg);
        match op {
            UnaryOp::Negate | UnaryOp::Plus => format!("{op}{arg}"),
            UnaryOp::Bang => format!("{arg}{op}"),
        }
    }

    fn binary_expr(&mut self, left: &Node, op: BinaryOp, right: &Node) -> String {
        if op == BinaryOp::Mul && (left.is_num() || left.is_group()) && right.is_symbol() {
            return format!("{}{}", self.render(left), self.render(right));
        }
        let rendered_left = self.render(left);
        let rendered_right = self.render(right);
        match op {
            BinaryOp::Div => format!("\\dfrac{{{rendered_left}}}{{{rendered_right}}}"),
            BinaryOp::Pow => format!("{rendered_left}^{{{rendered_right}}}"),
            BinaryOp::Mul => format!("{rendered_left} \\times {rendered_right}"),
            _ => format!("{rendered_left} {op} {rendered_right}"),
        }
    }

    fn call_expr(&mut self, callee: &str, args: &[Node], _native: Option<NativeFn>) -> String {
        let args = self.render_all(args, ", ");
        match callee {
            "ceil" => format!("\\lceil {args}\\rceil"),
            "floor" => format!("\\lfloor {args}\\rfloor"),
            "cbrt" => format!("\\sqrt[3]{{{args}}}"),
            "abs" => format!("\\lvert{{{args}}}\\rvert"),
            "sqrt" => format!("\\sqrt{{{args}}}"),
            _ => {
                let name = self.lib.latex_function(callee).unwrap_or(callee);
                format!("{name}\\left({args}\\right)")
            },
        }
    }

    fn var_declare(&mut self, _name: &str, _value: &Node, _line: usize) -> String {
        String::new()
    }

    fn fun_declare(&mut self, _name: &str, _params: &[Node], _body: &Node) -> String {
        String::new()
    }

    fn assign(&mut self, _name: &str, _value: &Node) -> String {
        String::new()
    }

    fn cond(&mut self, _condition: &Node, _consequent: &Node, _alternate: &Node) -> String {
        String::new()
    }

    fn while_stmt(&mut self, _condition: &Node, _body: &Node) -> String {
        String::new()
    }

    fn root(&mut self, statements: &[Node], _has_error: bool) -> String {
        statements.iter().map(|statement| self.render(statement)).collect()
    }

    fn error(&mut self, _message: &str) -> String {
        String::new()
    }
}
