use crate::{
    error::{CompileError, CompileResult},
    interpreter::{
        function::core::FunctionRegistry,
        lexer::{Lexeme, TokenKind, Tokenizer},
        parser::binary::parse_logical,
        program::{Program, ResultType, Step},
        symbols::SymbolTables,
    },
};

/// How many parentheses, calls and prefix operators may enclose each other.
///
/// Parsing recurses once per level, so the limit bounds the native stack the
/// parser uses.
pub const MAX_NESTING_DEPTH: usize = 32;

/// Compiles a source string into a terminated program.
///
/// The parser emits steps while it descends, so operands are always pushed
/// before the operator that consumes them.
///
/// # Parameters
/// - `source`: The expression text.
/// - `symbols`: Names of arguments, external cells and constants.
/// - `functions`: The callable functions.
///
/// # Returns
/// The program and the shape of the value it leaves on the stack.
///
/// # Errors
/// - Any tokenizer error.
/// - `UnexpectedTrailingTokens` if input remains after the expression.
/// - `NestingTooDeep` beyond [`MAX_NESTING_DEPTH`] levels.
/// - `ExpressionTooLarge` if the evaluation stack would overflow.
/// - Any error of the precedence levels below.
///
/// # Example
/// ```
/// use evalfunc::interpreter::{
///     function::core::FunctionRegistry, parser::core::parse, symbols::SymbolTables,
/// };
///
/// let (program, result) =
///     parse("1 + 2 > 2", &SymbolTables::new(), &FunctionRegistry::standard()).unwrap();
///
/// assert!(result.is_bool);
/// assert_eq!(program.depth(), 1);
/// assert!(program.is_ended());
/// ```
pub fn parse(source: &str,
             symbols: &SymbolTables,
             functions: &FunctionRegistry)
             -> CompileResult<(Program, ResultType)> {
    let mut tokens = Tokenizer::new(source, symbols, functions)?;
    let mut program = Program::default();

    let result = parse_expression(&mut tokens, &mut program)?;

    if *tokens.kind() != TokenKind::End {
        let lexeme = tokens.current();
        return Err(CompileError::UnexpectedTrailingTokens { token:  lexeme.describe(),
                                                            line:   lexeme.line,
                                                            column: lexeme.column, });
    }
    program.push(Step::End)?;

    debug_assert_eq!(program.depth(), result.width);
    Ok((program, result))
}

/// Parses a full expression.
///
/// This is the entry point for recursive parsing. It begins at the
/// lowest-precedence level, `and`/`or`.
///
/// Grammar: `expression := logical`
pub fn parse_expression(tokens: &mut Tokenizer<'_, '_>,
                        program: &mut Program)
                        -> CompileResult<ResultType> {
    parse_logical(tokens, program)
}

/// Appends `step`, reporting a stack overflow at the token that caused it.
pub(crate) fn emit(program: &mut Program, step: Step, at: &Lexeme<'_>) -> CompileResult<()> {
    program.push(step).map_err(|error| match error {
                          CompileError::StackOverflow { depth, limit } => {
                              CompileError::ExpressionTooLarge { depth,
                                                                 limit,
                                                                 line: at.line,
                                                                 column: at.column }
                          },
                          other => other,
                      })
}

/// Rejects a vector operand where a scalar is required.
///
/// # Parameters
/// - `operand`: Shape of the operand.
/// - `context`: The construct that needs a scalar, for the error message.
/// - `at`: The token the error is reported at.
pub(crate) fn require_scalar(operand: ResultType,
                             context: &'static str,
                             at: &Lexeme<'_>)
                             -> CompileResult<()> {
    if operand.is_vector() {
        return Err(CompileError::ExpectedScalar { context,
                                                  width: operand.width,
                                                  line: at.line,
                                                  column: at.column });
    }
    Ok(())
}

/// Builds the error for a token that does not fit the grammar at this point.
pub(crate) fn unexpected(at: &Lexeme<'_>, expected: &'static str) -> CompileError {
    if at.kind == TokenKind::End {
        CompileError::UnexpectedEndOfInput { expected,
                                             line: at.line,
                                             column: at.column }
    } else {
        CompileError::UnexpectedToken { found: at.text.to_string(),
                                        expected,
                                        line: at.line,
                                        column: at.column }
    }
}
