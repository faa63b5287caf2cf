/// Compilation errors.
///
/// Defines all error types that can occur while tokenizing and parsing a
/// formula, and while registering symbols or appending bytecode by hand.
/// Every variant aborts the call that raised it.
pub mod compile_error;
/// Degraded evaluations.
///
/// Evaluation never fails. When a complex value reaches an operation that is
/// only defined on real numbers, the evaluator substitutes a real value and
/// records a [`Degradation`] instead.
pub mod degraded;

pub use compile_error::{CompileError, CompileResult};
pub use degraded::{Degradation, DegradedReport};
