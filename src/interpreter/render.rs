/// The LaTeX renderer.
///
/// Produces math markup for display surfaces: stacked fractions, braced
/// exponents, juxtaposed implicit products, and delimiter-matched calls.
/// Statement-like nodes with no mathematical form render as empty strings.
pub mod to_latex;
/// The plain-text renderer.
///
/// Produces a source-shaped rendering of a tree, suitable for echoing
/// results and for round-tripping back through the parser.
pub mod to_string;

pub use to_latex::ToLatex;
pub use to_string::ToString;
