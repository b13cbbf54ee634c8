/// Numeric conversion helpers.
///
/// Conversions between the arbitrary-precision integer/rational types and
/// `f64`, used at the boundary between the exact numeric tower and native
/// host functions, plus radix-aware literal parsing for the lexer's
/// `0b`/`0o`/`0x` forms.
pub mod num;
