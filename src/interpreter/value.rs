/// Complex number type.
///
/// Defines the `ComplexNumber` struct, its arithmetic and the elementary
/// functions the complex evaluation domain needs.
pub mod complex;
/// Numeric domains of the evaluator.
///
/// The `Scalar` trait abstracts over `f64` and `ComplexNumber` so one
/// compiled program runs in either domain with the same opcode dispatch.
pub mod scalar;
