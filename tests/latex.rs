use numera::{compute, eval_node, latex, parse};

fn assert_latex(src: &str, expected: &str) {
    assert_eq!(latex(src), expected, "source: {src}");
}

#[test]
fn radical_and_bracket_functions() {
    assert_latex("sqrt(x)", "\\sqrt{x}");
    assert_latex("cbrt(x)", "\\sqrt[3]{x}");
    assert_latex("ceil(x)", "\\lceil x\\rceil");
    assert_latex("floor(x)", "\\lfloor x\\rfloor");
    assert_latex("abs(x)", "\\lvert{x}\\rvert");
}

#[test]
fn named_functions_use_their_operator_names() {
    assert_latex("sin(x)", "\\sin\\left(x\\right)");
    assert_latex("tanh(x)", "\\tanh\\left(x\\right)");
    assert_latex("atan2(y, x)", "atan2\\left(y, x\\right)");
}

#[test]
fn fractions_render_stacked() {
    assert_latex("1/2", "\\dfrac{1}{2}");
    assert_latex("x/2", "\\dfrac{x}{2}");
    assert_latex("(1 + x)/2", "\\dfrac{\\left(1 + x\\right)}{2}");
}

#[test]
fn exponents_are_braced() {
    assert_latex("2 ^ x", "2^{x}");
    assert_latex("x ^ 10", "x^{10}");
}

#[test]
fn multiplication_juxtaposes_against_bare_symbols() {
    assert_latex("2 * x", "2x");
    assert_latex("2 * (x + 1)", "2 \\times \\left(x + 1\\right)");
    assert_latex("2x", "2x");
}

#[test]
fn symbols_resolve_latex_names() {
    assert_latex("pi", "\\pi");
    assert_latex("alpha + omega", "\\alpha + \\omega");
    assert_latex("x", "x");
}

#[test]
fn structures() {
    assert_latex("[1, 2, 3]", "\\left[1, 2, 3\\right]");
    assert_latex("(1, 2)", "\\left(1, 2\\right)");
    assert_latex("[[1, 2], [3, 4]]",
                 "\\begin{bmatrix} 1 & 2 \\\\ 3 & 4 \\end{bmatrix}");
    assert_latex("\"hi\"",
                 "\\text{\\textquotedblleft}hi\\text{\\textquotedblright}");
    assert_latex("true", "\\text{true}");
}

#[test]
fn statements_without_a_latex_form_render_empty() {
    assert_latex("let x = 2", "");
    assert_latex("let f(x) = x * x", "");
    assert_latex("if (true) { 1; }", "");
    assert_latex("while (false) { 1; }", "");
}

#[test]
fn computed_results_render_as_latex() {
    assert_eq!(compute("1/2 + 1/3"), "\\dfrac{5}{6}");
    assert_eq!(compute("2 + 2"), "4");
    assert_eq!(compute("2 ^ 3 ^ 2"), "512");
}

#[test]
fn eval_node_renders_an_existing_tree() {
    let root = parse("2 + 2");
    assert_eq!(eval_node(&root), "4");
}
