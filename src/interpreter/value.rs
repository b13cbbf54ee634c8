/// User-declared functions.
///
/// Defines the runtime representation of `let f(a, b) = ...` declarations:
/// the deduplicated parameter list, the body, and the call mechanics for
/// both evaluators, including the parent-less call scope.
pub mod function;
/// The exact numeric tower.
///
/// Defines the `Number` type with its three ranks (integer, rational, real),
/// the promotion rules for combining ranks, and the arithmetic and comparison
/// operations the evaluators dispatch to.
pub mod number;
/// Host-primitive runtime values.
///
/// Defines the `Primitive` type the compiler produces: numbers, booleans,
/// strings, nested lists, functions, and null.
pub mod primitive;
