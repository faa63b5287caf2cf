use crate::{
    error::{CompileError, CompileResult},
    interpreter::{
        function::core::Builtin,
        lexer::{Lexeme, TokenKind, Tokenizer},
        parser::core::{emit, parse_expression, require_scalar, unexpected},
        program::{Program, ResultType, Step, VectorOp},
    },
};

/// Parses a unary expression.
///
/// Supports prefix operators:
/// - `-`   (numeric negation, component-wise on vectors)
/// - `not` (logical not, scalars only)
///
/// Unary operators are right-associative, so `not -x` is parsed as
/// `not (-x)`.
///
/// Grammar:
/// ```text
///     unary := ("-" | "not") unary
///            | primary
/// ```
///
/// # Errors
/// - `ExpectedScalar` if `not` is applied to a vector.
/// - `NestingTooDeep` if prefix operators and parentheses nest too deeply.
pub fn parse_unary(tokens: &mut Tokenizer<'_, '_>,
                   program: &mut Program)
                   -> CompileResult<ResultType> {
    match tokens.kind() {
        TokenKind::Minus => {
            let operator = tokens.advance()?;
            tokens.enter(&operator)?;
            let operand = parse_unary(tokens, program)?;
            tokens.leave();
            if operand.is_vector() {
                emit(program, Step::constant(-1.0), &operator)?;
                emit(program,
                     Step::Vector { op:    VectorOp::VecScalarMul,
                                    left:  operand.width,
                                    right: 1, },
                     &operator)?;
                Ok(ResultType::vector(operand.width, operand.is_complex))
            } else {
                emit(program, Step::Negate, &operator)?;
                Ok(ResultType::scalar(operand.is_complex))
            }
        },
        TokenKind::Not => {
            let operator = tokens.advance()?;
            tokens.enter(&operator)?;
            let operand = parse_unary(tokens, program)?;
            tokens.leave();
            require_scalar(operand, "'not'", &operator)?;
            emit(program, Step::Not, &operator)?;
            Ok(ResultType::boolean())
        },
        _ => parse_primary(tokens, program),
    }
}

/// Parses a primary expression.
///
/// Grammar:
/// ```text
///     primary := number | constant | "I" | external | argument
///              | function "(" arguments ")"
///              | "(" expression ")"
/// ```
///
/// An argument of width `w` pushes its `w` consecutive slots.
///
/// # Errors
/// - `UnexpectedToken` or `UnexpectedEndOfInput` if no operand starts here.
/// - `ExpectedClosingParen` if a parenthesized expression is not closed.
/// - `NestingTooDeep` if calls and parentheses nest too deeply.
/// - `ExpressionTooLarge` if an argument does not fit the evaluation stack.
pub fn parse_primary(tokens: &mut Tokenizer<'_, '_>,
                     program: &mut Program)
                     -> CompileResult<ResultType> {
    let lexeme = tokens.advance()?;
    match &lexeme.kind {
        TokenKind::Number(value) | TokenKind::Constant(value) => {
            emit(program, Step::constant(*value), &lexeme)?;
            Ok(ResultType::scalar(false))
        },
        TokenKind::Imaginary => {
            emit(program, Step::Imaginary, &lexeme)?;
            Ok(ResultType::scalar(true))
        },
        TokenKind::External(cell) => {
            emit(program,
                 Step::External { name: lexeme.text.to_string(),
                                  cell: cell.clone(), },
                 &lexeme)?;
            Ok(ResultType::scalar(false))
        },
        TokenKind::Argument(argument) => {
            for slot in argument.slot..=argument.last_slot() {
                emit(program, Step::Argument(slot), &lexeme)?;
            }
            Ok(ResultType::vector(argument.width, argument.is_complex))
        },
        TokenKind::Function(builtin) => {
            tokens.enter(&lexeme)?;
            let result = parse_call(tokens, program, *builtin, &lexeme)?;
            tokens.leave();
            Ok(result)
        },
        TokenKind::LParen => {
            tokens.enter(&lexeme)?;
            let inner = parse_expression(tokens, program)?;
            expect_closing_paren(tokens)?;
            tokens.leave();
            Ok(inner)
        },
        _ => Err(unexpected(&lexeme, "an operand")),
    }
}

/// Parses the argument list of a function call and emits the call.
///
/// Every argument must be a scalar and the count must match the function's
/// arity. Functions with a complex implementation keep complex arguments
/// complex; the others produce a real result.
///
/// Grammar: `call := function "(" expression ("," expression)* ")"`
///
/// # Parameters
/// - `tokens`: Token stream positioned after the function name.
/// - `builtin`: The resolved function.
/// - `name`: The function name token, for error positions.
///
/// # Errors
/// - `UnexpectedToken` if `(` does not follow the name.
/// - `ExpectedScalar` if an argument is a vector.
/// - `ArityMismatch` if the argument count is wrong.
pub fn parse_call(tokens: &mut Tokenizer<'_, '_>,
                  program: &mut Program,
                  builtin: Builtin,
                  name: &Lexeme<'_>)
                  -> CompileResult<ResultType> {
    if *tokens.kind() != TokenKind::LParen {
        return Err(unexpected(tokens.current(), "'(' after function name"));
    }
    tokens.advance()?;

    let mut count = 0;
    let mut is_complex = false;
    if *tokens.kind() == TokenKind::RParen {
        tokens.advance()?;
    } else {
        loop {
            let at = tokens.current().clone();
            let argument = parse_expression(tokens, program)?;
            require_scalar(argument, "function argument", &at)?;
            count += 1;
            is_complex |= argument.is_complex;

            match tokens.kind() {
                TokenKind::Comma => {
                    tokens.advance()?;
                },
                TokenKind::RParen => {
                    tokens.advance()?;
                    break;
                },
                TokenKind::End => return Err(closing_paren_error(tokens.current())),
                _ => return Err(unexpected(tokens.current(), "',' or ')'")),
            }
        }
    }

    if count != builtin.arity() {
        return Err(CompileError::ArityMismatch { function: builtin.name(),
                                                 expected: builtin.arity(),
                                                 found:    count,
                                                 line:     name.line,
                                                 column:   name.column, });
    }

    match builtin {
        Builtin::Unary(function) => {
            emit(program, Step::Call(function), name)?;
            Ok(ResultType::scalar(is_complex && function.has_complex()))
        },
        Builtin::Binary(function) => {
            emit(program, Step::CallBinary(function), name)?;
            Ok(ResultType::scalar(false))
        },
    }
}

/// Consumes a `)`.
///
/// # Errors
/// - `ExpectedClosingParen` if the current token is anything else.
pub fn expect_closing_paren(tokens: &mut Tokenizer<'_, '_>) -> CompileResult<()> {
    if *tokens.kind() != TokenKind::RParen {
        return Err(closing_paren_error(tokens.current()));
    }
    tokens.advance()?;
    Ok(())
}

fn closing_paren_error(at: &Lexeme<'_>) -> CompileError {
    CompileError::ExpectedClosingParen { found:  at.describe(),
                                         line:   at.line,
                                         column: at.column, }
}
