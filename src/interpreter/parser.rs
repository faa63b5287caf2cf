/// Parser entry points.
///
/// Drives a tokenizer over the whole source, checks that nothing follows the
/// expression and terminates the program.
pub mod core;

/// Binary operator parsing.
///
/// Implements the precedence levels for `and`/`or`, comparisons, additive and
/// multiplicative operators, including the width rules for vector operands.
pub mod binary;

/// Unary operator and primary parsing.
///
/// Handles prefix `-` and `not`, literals, names, function calls and
/// parenthesized sub-expressions.
pub mod unary;
