/// Core evaluation loop and the value stack.
///
/// Contains the stack machine, its fixed-size stack and the dispatch over
/// program steps.
pub mod core;

/// Comparison and boolean evaluation.
///
/// Implements tolerance-based truthiness, the comparison operators and
/// `and`/`or`/`not`.
pub mod comparison;

/// Vector operation evaluation.
///
/// Implements component-wise arithmetic, scaling and dot products on operand
/// groups.
pub mod vector;
