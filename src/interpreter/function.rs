/// Function descriptors and the registry.
///
/// Defines `UnaryFunction`, `BinaryFunction`, the `Builtin` table entry and
/// the `FunctionRegistry` that the tokenizer resolves names against.
pub mod core;
/// Builtin function implementations.
///
/// Real-valued helpers that have no direct counterpart in `f64`, plus the
/// complex variants used by the complex domain.
pub mod builtin;
