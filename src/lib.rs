//! # evalfunc
//!
//! evalfunc compiles small arithmetic and logical formulas into a
//! reverse-Polish program and evaluates that program quickly and repeatedly,
//! over real or complex numbers, producing scalar or vector results.
//!
//! Formulas refer to caller-supplied input slots (arguments), to shared cells
//! the host keeps updating (externals), to named constants and to a fixed set
//! of builtin functions.
//!
//! ```
//! use evalfunc::EvalFunction;
//!
//! let mut f = EvalFunction::new();
//! f.define_argument("x", 1, 1, false).unwrap();
//! f.define_argument("y", 2, 1, false).unwrap();
//! f.parse("sqrt(x * x + y * y) > 4").unwrap();
//!
//! assert!(f.is_bool());
//! assert_eq!(f.eval(&[3.0, 4.0]), 1.0);
//! assert_eq!(f.eval(&[1.0, 1.0]), 0.0);
//! ```

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

/// Provides the error and diagnostic types.
///
/// This module defines the fatal errors raised while tokenizing, parsing or
/// building a program, and the non-fatal degradations recorded while
/// evaluating one.
///
/// # Responsibilities
/// - Defines the `CompileError` enum with source positions for every failure
///   the parser can detect.
/// - Defines `Degradation` and `DegradedReport` for complex values that meet
///   real-only operations.
pub mod error;
/// Compiles and evaluates formulas.
///
/// This module contains every stage between source text and result: the
/// tokenizer, the parser, the program representation, the symbol tables and
/// the evaluator.
///
/// # Responsibilities
/// - Resolves names and builds a checked, reverse-Polish program.
/// - Infers the shape of the result at compile time.
/// - Evaluates programs without allocating, in two numeric domains.
pub mod interpreter;
/// Progress reporting for hosts.
///
/// Defines the `StatusHandler` trait long-running work reports through, and
/// a handler that logs through `tracing`.
pub mod status;
/// Provides general-purpose numeric utilities.
///
/// Special functions the standard library lacks and the builtins need.
pub mod util;

pub use error::{CompileError, CompileResult, Degradation, DegradedReport};
pub use interpreter::{
    eval_function::EvalFunction, symbols::ExternalCell, value::complex::ComplexNumber,
};
