use numera::{compile, evaluate, interpret, make_function, parse};

fn assert_evals(src: &str, expected: &str) {
    assert_eq!(evaluate(src), expected, "source: {src}");
}

fn assert_errs(src: &str, fragment: &str) {
    let out = evaluate(src);
    assert!(out.contains(fragment),
            "expected a diagnostic containing {fragment:?} for {src:?}, got {out:?}");
}

#[test]
fn basic_arithmetic_and_precedence() {
    assert_evals("2 + 3 * 4", "14");
    assert_evals("(2 + 3) * 4", "20");
    assert_evals("8 - 5", "3");
    assert_evals("10 * 10", "100");
}

#[test]
fn exponentiation_is_right_associative_and_real() {
    assert_evals("2 ^ 3 ^ 2", "512");
    assert_evals("2 ^ 3", "8");
    assert_evals("2 ^ 0.5 < 1.5", "true");
}

#[test]
fn rational_exactness() {
    assert_evals("5/2", "5/2");
    assert_evals("5 / 2", "5/2");
    assert_evals("4/2", "2");
    assert_evals("1/2 + 1/3", "5/6");
    assert_evals("2/4", "1/2");
    assert_evals("1/3 * 3", "1");
}

#[test]
fn rational_contamination_by_reals() {
    assert_evals("1/2 + 0.5", "1");
    assert_evals("1/4 * 2.0", "0.5");
}

#[test]
fn modulo_family_floors_its_operands() {
    assert_evals("7 % 3", "1");
    assert_evals("-7 % 3", "-1");
    assert_evals("7 mod 3", "1");
    assert_evals("-7 mod 3", "2");
    assert_evals("7 rem 3", "1");
    assert_evals("7 // 2", "3");
}

#[test]
fn division_by_zero_is_an_in_band_error() {
    assert_errs("1/0", "division by zero");
    assert_errs("1 / 0", "division by zero");
    assert_errs("1.5 / 0", "division by zero");
    assert_errs("7 mod 0", "division by zero");
}

#[test]
fn radixed_and_scientific_literals() {
    assert_evals("0xff", "255");
    assert_evals("0b101", "5");
    assert_evals("0o17", "15");
    assert_evals("2e3", "2000");
    assert_evals("1.5e2", "150");
}

#[test]
fn negative_literal_folding() {
    assert_evals("-5 + 1", "-4");
    assert_evals("|-5|", "5");
    assert_evals("8 - 5", "3");
}

#[test]
fn comparisons() {
    assert_evals("2 < 3", "true");
    assert_evals("3 >= 3", "true");
    assert_evals("2 == 2", "true");
    assert_evals("2 != 3", "true");
    assert_evals("1/2 == 0.5", "true");
    assert_evals("1/3 < 1/2", "true");
}

#[test]
fn declarations_and_assignment() {
    assert_evals("let x = 1 + 2; x", "3");
    assert_evals("let x = 1; x = 7; x", "7");
    assert_evals("let x = 2; let y = 3; x * y", "6");
}

#[test]
fn redeclaration_fails_but_shadowing_succeeds() {
    assert_errs("let x = 1; let x = 2;", "redeclaration");
    assert_evals("let x = 1; { let x = 2; x; }", "2");
}

#[test]
fn assignment_to_undeclared_name_fails() {
    assert_errs("q = 1;", "undeclared name 'q'");
}

#[test]
fn unknown_names_are_resolver_errors() {
    assert_errs("y + 1", "no variable named 'y'");
}

#[test]
fn blocks_short_circuit_on_errors() {
    assert_errs("let x = 1; y; let z = 2;", "no variable named 'y'");
    assert_errs("{ let a = 1; b; let c = 2; }", "no variable named 'b'");
}

#[test]
fn user_functions() {
    assert_evals("let square(x) = x * x; square(3)", "9");
    assert_evals("let add(a, b) = a + b; add(2, 5)", "7");
}

#[test]
fn arity_shortfall_names_the_function() {
    assert_errs("let add(a, b) = a + b; add(1)",
                "function 'add' requires 2 arguments, but 1 were passed");
}

#[test]
fn duplicate_parameters_are_deduplicated() {
    assert_evals("let g(x, x) = x; g(7)", "7");
}

#[test]
fn function_bodies_do_not_close_over_outer_scopes() {
    assert_errs("let a = 5; let f(x) = x + a; f(1)", "no variable named 'a'");
}

#[test]
fn conditionals_and_loops() {
    assert_evals("if (1 < 2) { 10; } else { 20; }", "10");
    assert_evals("if (2 < 1) { 10; } else { 20; }", "20");
    assert_evals("let i = 0; while (i < 5) { i = i + 1; } i", "5");
}

#[test]
fn implicit_multiplication() {
    assert_evals("let x = 4; 3x", "12");
    assert_evals("2(3 + 4)", "14");
    assert_evals("2 sqrt(4)", "4");
}

#[test]
fn tuples_concatenate_and_reject_other_operators() {
    assert_evals("(1, 2) ++ (3, 4)", "(1, 2, 3, 4)");
    assert_errs("(1, 2) + (3, 4)", "does not work with tuples");
}

#[test]
fn matrices_add_elementwise_and_reject_other_operators() {
    assert_evals("[[1, 2], [3, 4]] + [[5, 6], [7, 8]]", "[\n\t[6, 8]\n\t[10, 12]\n]");
    assert_errs("[[1]] * [[2]]", "does not work with matrices");
    assert_errs("[[1, 2], [3]]", "jagged");
}

#[test]
fn vectors_and_ranges() {
    assert_evals("[1, 2, 3]", "[1, 2, 3]");
    assert_evals("[1:5]", "[1, 2, 3, 4]");
    assert_evals("[0:10:2]", "[0, 2, 4, 6, 8]");
}

#[test]
fn native_functions() {
    assert_evals("sqrt(9)", "3");
    assert_evals("sin(0)", "0");
    assert_evals("max(3, 7, 5)", "7");
    assert_evals("gcd(12, 18)", "6");
    assert_evals("floor(2.7)", "2");
}

#[test]
fn number_array_natives_coerce_vectors() {
    assert_evals("norm([3, 4])", "5");
    assert_evals("dot([1, 2, 3], [4, 5, 6])", "32");
}

#[test]
fn constants_resolve_through_the_registry() {
    assert_evals("pi > 3", "true");
    assert_evals("e < 3", "true");
}

#[test]
fn strings() {
    assert_evals("\"hello\"", "hello");
    assert_errs("\"abc", "unterminated string");
}

#[test]
fn lex_and_parse_errors_are_in_band() {
    assert_errs("2 $ 2", "unrecognized token '$'");
    assert_errs("(1 + 2", "Found the end of input");
    let root = parse("2 $ 2");
    assert!(matches!(root, numera::ast::Node::Root { has_error: true, .. }));
}

#[test]
fn complex_suffix_is_reserved() {
    assert_errs("3i", "complex literals are reserved");
}

#[test]
fn roundtrip_through_the_text_renderer() {
    for src in ["2 + 3 * 4", "(2 + 3) * 4", "2^3", "sqrt(16)", "[1, 2, 3]", "1/2 + x"] {
        let once = parse(src);
        let rendered = numera::stringify(src);
        assert_eq!(parse(&rendered), once, "source: {src}, rendered: {rendered}");
    }
}

#[test]
fn compile_produces_primitives() {
    use numera::interpreter::value::primitive::Primitive;

    let out = compile("let x = 2; x * 10");
    assert_eq!(out.result, Some(Primitive::Num(20.0)));
    assert!(out.err.is_none());

    let out = compile("5/2");
    assert_eq!(out.result, Some(Primitive::Num(2.5)));
}

#[test]
fn compile_reports_the_first_diagnostic() {
    let out = compile("2 + nope");
    assert!(out.result.is_none());
    assert!(out.err.is_some_and(|err| err.contains("no variable named 'nope'")));
}

#[test]
fn make_function_wraps_a_body() {
    let f = make_function("a + b", &["a", "b"]).unwrap();
    assert_eq!(f.call(&[2.0, 5.0]), Ok(7.0));
    assert_eq!(f.arity(), 2);

    let f = make_function("x * x", &["x"]).unwrap();
    assert_eq!(f.call(&[3.0]), Ok(9.0));

    let err = f.call(&[]).unwrap_err();
    assert!(err.contains("requires 1 argument"));
}

#[test]
fn make_function_rejects_bad_bodies() {
    assert!(make_function("(1 +", &["x"]).is_err());
    assert!(make_function("2 $ 2", &["x"]).is_err());
}

#[test]
fn interpret_returns_error_nodes_not_panics() {
    let result = interpret("unknown(1)");
    assert!(matches!(result, numera::ast::Node::Error(_)));
}
