use std::collections::HashMap;

/// The argument signature a native function declares.
///
/// `Number` natives receive their arguments as plain doubles; `NumberArray`
/// natives receive each argument as a flat array of doubles (the elements of
/// a vector). The evaluators coerce arguments according to this signature
/// before invoking the native.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NativeArg {
    /// Arguments are scalar numbers.
    Number,
    /// Arguments are arrays of numbers.
    NumberArray,
}

/// The result of invoking a native function.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeValue {
    /// A scalar result.
    Num(f64),
    /// An array result, surfaced to the language as a vector.
    Array(Vec<f64>),
}

#[derive(Debug, Copy, Clone)]
enum NativeKind {
    /// One scalar in, one scalar out.
    Unary(fn(f64) -> f64),
    /// Two scalars in, one scalar out.
    Binary(fn(f64, f64) -> f64),
    /// Three scalars in, an array out.
    Span(fn(f64, f64, f64) -> Vec<f64>),
    /// Any number of scalars in, one scalar out.
    Fold(fn(&[f64]) -> f64),
    /// Arrays in, one scalar out.
    Series(fn(&[Vec<f64>]) -> f64),
}

/// A native function registered in the core library.
///
/// Natives are resolved at parse time and attached to `Call` nodes, so the
/// evaluators can invoke them without a registry lookup.
#[derive(Debug, Copy, Clone)]
pub struct NativeFn {
    /// The registry name of the function.
    pub name: &'static str,
    arity:    usize,
    kind:     NativeKind,
}

impl PartialEq for NativeFn {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl NativeFn {
    /// The minimum number of arguments the native requires.
    #[must_use]
    pub const fn arity(&self) -> usize {
        self.arity
    }

    /// The argument signature the native declares.
    #[must_use]
    pub const fn arg_type(&self) -> NativeArg {
        match self.kind {
            NativeKind::Series(_) => NativeArg::NumberArray,
            _ => NativeArg::Number,
        }
    }

    /// Invokes a `Number`-signature native over scalar arguments.
    ///
    /// Returns `None` when this native takes arrays instead, or when too few
    /// arguments are supplied.
    #[must_use]
    pub fn invoke_numbers(&self, args: &[f64]) -> Option<NativeValue> {
        if args.len() < self.arity {
            return None;
        }
        match self.kind {
            NativeKind::Unary(f) => Some(NativeValue::Num(f(args[0]))),
            NativeKind::Binary(f) => Some(NativeValue::Num(f(args[0], args[1]))),
            NativeKind::Span(f) => Some(NativeValue::Array(f(args[0], args[1], args[2]))),
            NativeKind::Fold(f) => Some(NativeValue::Num(f(args))),
            NativeKind::Series(_) => None,
        }
    }

    /// Invokes a `NumberArray`-signature native over array arguments.
    ///
    /// Returns `None` when this native takes scalars instead, or when too few
    /// arguments are supplied.
    #[must_use]
    pub fn invoke_arrays(&self, args: &[Vec<f64>]) -> Option<NativeValue> {
        if args.len() < self.arity {
            return None;
        }
        match self.kind {
            NativeKind::Series(f) => Some(NativeValue::Num(f(args))),
            _ => None,
        }
    }
}

struct Constant {
    value: f64,
    latex: Option<&'static str>,
}

/// The registry of built-in numeric constants and native functions.
///
/// A `CoreLib` is constructed once per session and passed by reference into
/// the parser and both evaluators; there is no process-wide registry state.
/// The parser consults it to distinguish call expressions from implicit
/// multiplication, and the evaluators consult it to resolve bare symbols
/// like `pi` and to coerce native-call arguments.
pub struct CoreLib {
    constants: HashMap<&'static str, Constant>,
    functions: HashMap<&'static str, NativeFn>,
}

impl Default for CoreLib {
    fn default() -> Self {
        Self::new()
    }
}

impl CoreLib {
    /// Builds the full registry.
    #[must_use]
    pub fn new() -> Self {
        let mut lib = Self { constants: HashMap::new(),
                             functions: HashMap::new(), };
        lib.constant("pi", std::f64::consts::PI, Some("\\pi"));
        lib.constant("PI", std::f64::consts::PI, Some("\\pi"));
        lib.constant("tau", std::f64::consts::TAU, Some("\\tau"));
        lib.constant("e", std::f64::consts::E, Some("e"));
        lib.constant("E", std::f64::consts::E, Some("e"));
        lib.constant("LN2", std::f64::consts::LN_2, None);
        lib.constant("LN10", std::f64::consts::LN_10, None);
        lib.constant("LOG2E", std::f64::consts::LOG2_E, None);
        lib.constant("LOG10E", std::f64::consts::LOG10_E, None);
        lib.constant("SQRT2", std::f64::consts::SQRT_2, Some("\\sqrt{2}"));
        lib.constant("Inf", f64::INFINITY, Some("\\infty"));
        lib.constant("NaN", f64::NAN, None);

        lib.unary("abs", f64::abs);
        lib.unary("acos", f64::acos);
        lib.unary("acosh", f64::acosh);
        lib.unary("asin", f64::asin);
        lib.unary("asinh", f64::asinh);
        lib.unary("atan", f64::atan);
        lib.unary("atanh", f64::atanh);
        lib.unary("cbrt", f64::cbrt);
        lib.unary("ceil", f64::ceil);
        lib.unary("cos", f64::cos);
        lib.unary("cosh", f64::cosh);
        lib.unary("exp", f64::exp);
        lib.unary("floor", f64::floor);
        lib.unary("ln", f64::ln);
        lib.unary("log", f64::log10);
        lib.unary("lg", f64::log2);
        lib.unary("round", f64::round);
        lib.unary("sign", sign);
        lib.unary("sin", f64::sin);
        lib.unary("sinh", f64::sinh);
        lib.unary("sqrt", f64::sqrt);
        lib.unary("tan", f64::tan);
        lib.unary("tanh", f64::tanh);
        lib.unary("trunc", f64::trunc);
        lib.unary("even", even);
        lib.unary("odd", odd);

        lib.binary("atan2", f64::atan2);
        lib.binary("gcd", gcd);

        lib.span("range", range);

        lib.fold("avg", avg);
        lib.fold("hypot", hypot);
        lib.fold("max", fold_max);
        lib.fold("min", fold_min);
        lib.fold("sum", sum);

        lib.series("dot", 2, dot);
        lib.series("norm", 1, norm);

        lib
    }

    fn constant(&mut self, name: &'static str, value: f64, latex: Option<&'static str>) {
        self.constants.insert(name, Constant { value, latex });
    }

    fn unary(&mut self, name: &'static str, f: fn(f64) -> f64) {
        self.functions.insert(name, NativeFn { name,
                                               arity: 1,
                                               kind: NativeKind::Unary(f) });
    }

    fn binary(&mut self, name: &'static str, f: fn(f64, f64) -> f64) {
        self.functions.insert(name, NativeFn { name,
                                               arity: 2,
                                               kind: NativeKind::Binary(f) });
    }

    fn span(&mut self, name: &'static str, f: fn(f64, f64, f64) -> Vec<f64>) {
        self.functions.insert(name, NativeFn { name,
                                               arity: 3,
                                               kind: NativeKind::Span(f) });
    }

    fn fold(&mut self, name: &'static str, f: fn(&[f64]) -> f64) {
        self.functions.insert(name, NativeFn { name,
                                               arity: 0,
                                               kind: NativeKind::Fold(f) });
    }

    fn series(&mut self, name: &'static str, arity: usize, f: fn(&[Vec<f64>]) -> f64) {
        self.functions.insert(name, NativeFn { name,
                                               arity,
                                               kind: NativeKind::Series(f) });
    }

    /// Whether `name` is a registered native function.
    ///
    /// # Example
    /// ```
    /// use numera::interpreter::corelib::CoreLib;
    ///
    /// let lib = CoreLib::new();
    /// assert!(lib.has_function("sqrt"));
    /// assert!(!lib.has_function("pi"));
    /// ```
    #[must_use]
    pub fn has_function(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Whether `name` is a registered numeric constant.
    #[must_use]
    pub fn has_constant(&self, name: &str) -> bool {
        self.constants.contains_key(name)
    }

    /// Looks up a native function by name.
    #[must_use]
    pub fn native(&self, name: &str) -> Option<NativeFn> {
        self.functions.get(name).copied()
    }

    /// Looks up the value of a numeric constant.
    #[must_use]
    pub fn constant_value(&self, name: &str) -> Option<f64> {
        self.constants.get(name).map(|c| c.value)
    }

    /// The LaTeX form of a bare symbol: a constant's registered form, a
    /// greek letter's backslashed name, or nothing.
    #[must_use]
    pub fn latex_symbol(&self, name: &str) -> Option<String> {
        if let Some(c) = self.constants.get(name) {
            return c.latex.map(String::from);
        }
        if GREEK.contains(&name) {
            return Some(format!("\\{name}"));
        }
        None
    }

    /// The LaTeX operator name of a function, when TeX defines one.
    #[must_use]
    pub fn latex_function(&self, name: &str) -> Option<&'static str> {
        let latex = match name {
            "sin" => "\\sin",
            "cos" => "\\cos",
            "tan" => "\\tan",
            "sinh" => "\\sinh",
            "cosh" => "\\cosh",
            "tanh" => "\\tanh",
            "ln" => "\\ln",
            "log" => "\\log",
            "lg" => "\\lg",
            "exp" => "\\exp",
            "min" => "\\min",
            "max" => "\\max",
            "gcd" => "\\gcd",
            _ => return None,
        };
        Some(latex)
    }
}

const GREEK: [&str; 24] = ["alpha", "beta", "gamma", "delta", "epsilon", "zeta", "eta", "theta",
                           "iota", "kappa", "lambda", "mu", "nu", "xi", "omicron", "pi", "rho",
                           "sigma", "tau", "upsilon", "phi", "chi", "psi", "omega"];

fn sign(x: f64) -> f64 {
    if x == 0.0 {
        0.0
    } else if x < 0.0 {
        -1.0
    } else {
        1.0
    }
}

fn even(n: f64) -> f64 {
    if n % 2.0 == 0.0 {
        1.0
    } else {
        0.0
    }
}

fn odd(n: f64) -> f64 {
    if n % 2.0 != 0.0 {
        1.0
    } else {
        0.0
    }
}

fn gcd(a: f64, b: f64) -> f64 {
    if a.fract() != 0.0 || b.fract() != 0.0 {
        return f64::INFINITY;
    }
    let mut a = a.abs();
    let mut b = b.abs();
    while b != 0.0 {
        let t = b;
        b = a % b;
        a = t;
    }
    a
}

fn range(start: f64, end: f64, step: f64) -> Vec<f64> {
    let mut out = Vec::new();
    if step <= 0.0 {
        return out;
    }
    let mut i = start;
    while i < end {
        out.push(i);
        i += step;
    }
    out
}

fn sum(nums: &[f64]) -> f64 {
    nums.iter().sum()
}

fn avg(nums: &[f64]) -> f64 {
    if nums.is_empty() {
        return 0.0;
    }
    sum(nums) / nums.len() as f64
}

fn hypot(nums: &[f64]) -> f64 {
    nums.iter().map(|n| n * n).sum::<f64>().sqrt()
}

fn fold_max(nums: &[f64]) -> f64 {
    nums.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

fn fold_min(nums: &[f64]) -> f64 {
    nums.iter().copied().fold(f64::INFINITY, f64::min)
}

fn dot(args: &[Vec<f64>]) -> f64 {
    args[0].iter().zip(args[1].iter()).map(|(a, b)| a * b).sum()
}

fn norm(args: &[Vec<f64>]) -> f64 {
    hypot(&args[0])
}
