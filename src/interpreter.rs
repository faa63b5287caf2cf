/// The compiled unit.
///
/// `EvalFunction` ties the other modules together: it owns the symbol
/// tables and the function registry, runs the parser over a formula and keeps
/// the resulting program for evaluation.
pub mod eval_function;
/// The evaluator module executes programs on a value stack.
///
/// The evaluator walks the steps of a program once per evaluation, in the
/// real or the complex domain, on a stack of fixed size.
///
/// # Responsibilities
/// - Executes every step kind, including vector groups.
/// - Applies tolerance-based truthiness to comparisons and boolean operators.
/// - Records degradations where complex values meet real-only operations.
pub mod evaluator;
/// Builtin functions callable from formulas.
///
/// Declares the function types, the static table of standard functions and
/// the registry the tokenizer resolves function names against.
pub mod function;
/// The lexer module tokenizes formula source.
///
/// The raw lexer is generated by `logos`. A tokenizer on top of it resolves
/// identifiers against the symbol tables and tracks source positions.
///
/// # Responsibilities
/// - Converts the input into classified tokens with line and column.
/// - Reports malformed numbers, stray characters and unknown names.
pub mod lexer;
/// The parser module compiles tokens into a program.
///
/// A recursive-descent parser that emits steps in reverse Polish order while
/// it descends, and infers the width, boolean-ness and complex-ness of every
/// sub-expression on the way back up.
///
/// # Responsibilities
/// - Enforces operator precedence and associativity.
/// - Chooses scalar or vector steps from the operand widths.
/// - Validates operand shapes and function arity, reporting errors with
///   location info.
pub mod parser;
/// Compiled programs.
///
/// Declares the instruction set, the inferred result type and the
/// append-only program with its stack-depth checks.
pub mod program;
/// Name resolution.
///
/// Declares the constant, external cell and argument tables and the shared
/// external cell type.
pub mod symbols;
/// The value module defines the numeric domains.
///
/// # Responsibilities
/// - Defines `ComplexNumber` and its arithmetic and elementary functions.
/// - Defines the `Scalar` trait that lets one evaluator run over real and
///   complex numbers.
pub mod value;
