use num_bigint::BigInt;
use num_rational::BigRational;

use crate::{
    ast::{BinaryOp, Node, UnaryOp, Visitor},
    interpreter::corelib::NativeFn,
};

/// The plain-text renderer.
///
/// A side-effect-free visitor producing a source-shaped string per node.
/// Re-parsing its output yields a structurally equal tree, up to the
/// normalizations the parser itself performs (implicit multiplication and
/// fraction collapse).
pub struct ToString;

impl ToString {
    fn render(&mut self, node: &Node) -> String {
        node.accept(self)
    }

    fn render_all(&mut self, nodes: &[Node], separator: &str, delims: (&str, &str)) -> String {
        let rendered: Vec<String> = nodes.iter().map(|node| self.render(node)).collect();
        format!("{}{}{}", delims.0, rendered.join(separator), delims.1)
    }
}

impl Visitor for ToString {
    type Out = String;

    fn int(&mut self, value: &BigInt) -> String {
        value.to_string()
    }

    fn frac(&mut self, value: &BigRational) -> String {
        format!("{}/{}", value.numer(), value.denom())
    }

    fn real(&mut self, value: f64) -> String {
        format!("{value}")
    }

    fn boolean(&mut self, value: bool) -> String {
        format!("{value}")
    }

    fn chars(&mut self, value: &str) -> String {
        value.to_string()
    }

    fn null(&mut self) -> String {
        "null".to_string()
    }

    fn sym(&mut self, name: &str, _is_static: bool) -> String {
        name.to_string()
    }

    fn group(&mut self, inner: &Node) -> String {
        format!("({})", self.render(inner))
    }

    fn tuple(&mut self, elements: &[Node]) -> String {
        self.render_all(elements, ", ", ("(", ")"))
    }

    fn vector(&mut self, elements: &[Node]) -> String {
        self.render_all(elements, ", ", ("[", "]"))
    }

    fn matrix(&mut self, rows: &[Node], _row_count: usize, _col_count: usize) -> String {
        let rendered: Vec<String> = rows.iter().map(|row| format!("\t{}", self.render(row))).collect();
        format!("[\n{}\n]", rendered.join("\n"))
    }

    fn block(&mut self, statements: &[Node]) -> String {
        let mut result = String::new();
        for statement in statements {
            result.push_str(&self.render(statement));
            result.push('\n');
        }
        result
    }

    fn unary_expr(&mut self, op: UnaryOp, arg: &Node) -> String {
        format!("{op}({})", self.render(arg))
    }

    fn binary_expr(&mut self, left: &Node, op: BinaryOp, right: &Node) -> String {
        if op == BinaryOp::Mul && left.is_num() && right.is_symbol() {
            return format!("{}{}", self.render(left), self.render(right));
        }
        let rendered_left = self.render(left);
        let rendered_right = self.render(right);
        let operator = match op {
            BinaryOp::Pow | BinaryOp::Div => format!("{op}"),
            _ => format!(" {op} "),
        };
        format!("{rendered_left}{operator}{rendered_right}")
    }

    fn call_expr(&mut self, callee: &str, args: &[Node], _native: Option<NativeFn>) -> String {
        format!("{callee}{}", self.render_all(args, ", ", ("(", ")")))
    }

    fn var_declare(&mut self, _name: &str, value: &Node, _line: usize) -> String {
        self.render(value)
    }

    fn fun_declare(&mut self, name: &str, params: &[Node], body: &Node) -> String {
        let params = self.render_all(params, ", ", ("(", ")"));
        format!("{name}{params}{{{}}}", self.render(body))
    }

    fn assign(&mut self, name: &str, value: &Node) -> String {
        format!("{name} = {}", self.render(value))
    }

    fn cond(&mut self, condition: &Node, consequent: &Node, alternate: &Node) -> String {
        format!("if ({}) {{{}}} else {{{}}}",
                self.render(condition),
                self.render(consequent),
                self.render(alternate))
    }

    fn while_stmt(&mut self, _condition: &Node, _body: &Node) -> String {
        String::new()
    }

    fn root(&mut self, statements: &[Node], _has_error: bool) -> String {
        statements.iter().map(|statement| self.render(statement)).collect()
    }

    fn error(&mut self, message: &str) -> String {
        message.to_string()
    }
}
