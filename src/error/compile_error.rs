use thiserror::Error;

/// Result type used by the tokenizer, the parser and the registration API.
pub type CompileResult<T> = Result<T, CompileError>;

/// Represents all errors that can occur while building a program.
///
/// Positions are 1-based. `line` counts newlines in the source, `column`
/// counts bytes from the start of that line.
#[derive(Debug, Error)]
pub enum CompileError {
    /// A character that starts no token.
    #[error("Error on line {line}, column {column}: Unexpected character '{text}'.")]
    UnexpectedCharacter {
        /// The offending source text.
        text:   String,
        /// The source line where the error occurred.
        line:   usize,
        /// The source column where the error occurred.
        column: usize,
    },
    /// A numeric literal that does not parse as a floating-point number.
    #[error("Error on line {line}, column {column}: Malformed number '{text}'.")]
    MalformedNumber {
        /// The offending source text.
        text:   String,
        /// The source line where the error occurred.
        line:   usize,
        /// The source column where the error occurred.
        column: usize,
    },
    /// An identifier that names no argument, variable, constant or function.
    #[error("Error on line {line}, column {column}: Unknown identifier '{name}'.")]
    UnknownIdentifier {
        /// The unresolved name.
        name:   String,
        /// The source line where the error occurred.
        line:   usize,
        /// The source column where the error occurred.
        column: usize,
    },
    /// Found a token where another one was required.
    #[error("Error on line {line}, column {column}: Expected {expected}, found '{found}'.")]
    UnexpectedToken {
        /// The token encountered.
        found:    String,
        /// What the parser was looking for.
        expected: &'static str,
        /// The source line where the error occurred.
        line:     usize,
        /// The source column where the error occurred.
        column:   usize,
    },
    /// Reached the end of input in the middle of an expression.
    #[error("Error on line {line}, column {column}: Unexpected end of input, expected {expected}.")]
    UnexpectedEndOfInput {
        /// What the parser was looking for.
        expected: &'static str,
        /// The source line where the error occurred.
        line:     usize,
        /// The source column where the error occurred.
        column:   usize,
    },
    /// A closing parenthesis `)` was expected but not found.
    #[error("Error on line {line}, column {column}: Expected closing parenthesis ')' but found '{found}'.")]
    ExpectedClosingParen {
        /// The token found instead, or `end of input`.
        found:  String,
        /// The source line where the error occurred.
        line:   usize,
        /// The source column where the error occurred.
        column: usize,
    },
    /// Found extra tokens after a complete expression.
    #[error("Error on line {line}, column {column}: Extra tokens after expression: '{token}'.")]
    UnexpectedTrailingTokens {
        /// The first extra token.
        token:  String,
        /// The source line where the error occurred.
        line:   usize,
        /// The source column where the error occurred.
        column: usize,
    },
    /// A builtin was called with the wrong number of arguments.
    #[error("Error on line {line}, column {column}: Function '{function}' takes {expected} argument(s), {found} given.")]
    ArityMismatch {
        /// The function name.
        function: &'static str,
        /// The number of arguments the function takes.
        expected: usize,
        /// The number of arguments supplied.
        found:    usize,
        /// The source line where the error occurred.
        line:     usize,
        /// The source column where the error occurred.
        column:   usize,
    },
    /// The right operand of `/` is vector valued.
    #[error("Error on line {line}, column {column}: Cannot divide by a vector of width {width}.")]
    VectorDivisor {
        /// Width of the divisor.
        width:  usize,
        /// The source line where the error occurred.
        line:   usize,
        /// The source column where the error occurred.
        column: usize,
    },
    /// A vector operand was used where only scalars are allowed.
    #[error("Error on line {line}, column {column}: {context} requires a scalar operand, found a vector of width {width}.")]
    ExpectedScalar {
        /// The construct that rejected the operand.
        context: &'static str,
        /// Width of the rejected operand.
        width:   usize,
        /// The source line where the error occurred.
        line:    usize,
        /// The source column where the error occurred.
        column:  usize,
    },
    /// Parentheses, calls and prefix operators are nested too deeply.
    #[error("Error on line {line}, column {column}: Expression nests deeper than {limit} levels.")]
    NestingTooDeep {
        /// The maximum nesting depth.
        limit:  usize,
        /// The source line where the error occurred.
        line:   usize,
        /// The source column where the error occurred.
        column: usize,
    },
    /// The expression keeps more values on the evaluation stack than fit.
    #[error("Error on line {line}, column {column}: Expression needs a stack depth of {depth}, the limit is {limit}.")]
    ExpressionTooLarge {
        /// The depth the expression would reach.
        depth:  usize,
        /// The maximum supported depth.
        limit:  usize,
        /// The source line where the error occurred.
        line:   usize,
        /// The source column where the error occurred.
        column: usize,
    },
    /// The program would need a deeper evaluation stack than is available.
    #[error("Program needs a stack depth of {depth}, the limit is {limit}.")]
    StackOverflow {
        /// The depth the program would reach.
        depth: usize,
        /// The maximum supported depth.
        limit: usize,
    },
    /// A step would pop more values than the program has pushed.
    #[error("Step '{step}' needs {needed} value(s) on the stack, only {available} available.")]
    StackUnderflow {
        /// Mnemonic of the rejected step.
        step:      &'static str,
        /// Values the step pops.
        needed:    usize,
        /// Values on the stack before the step.
        available: usize,
    },
    /// A vector step whose operand widths do not fit its operation.
    #[error("Step '{step}' cannot combine operands of width {left} and {right}.")]
    InvalidVectorStep {
        /// Mnemonic of the rejected step.
        step:  &'static str,
        /// Width of the left operand.
        left:  usize,
        /// Width of the right operand.
        right: usize,
    },
    /// An argument push with slot `0`; slots are 1-based.
    #[error("Argument slot {slot} is invalid, slots start at 1.")]
    InvalidSlot {
        /// The rejected slot.
        slot: usize,
    },
    /// A step was appended after `end`.
    #[error("Step '{step}' appended after the end of the program.")]
    ProgramEnded {
        /// Mnemonic of the rejected step.
        step: &'static str,
    },
    /// A symbol definition was rejected.
    #[error("Invalid definition of '{name}': {reason}.")]
    InvalidDefinition {
        /// The name being defined.
        name:   String,
        /// Why the definition was rejected.
        reason: &'static str,
    },
    /// The source stream could not be read.
    #[error("Failed to read expression source: {0}")]
    Io(#[from] std::io::Error),
}
