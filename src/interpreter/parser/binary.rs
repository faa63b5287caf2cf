use crate::{
    error::{CompileError, CompileResult},
    interpreter::{
        lexer::{TokenKind, Tokenizer},
        parser::{
            core::{emit, require_scalar},
            unary::parse_unary,
        },
        program::{ArithmeticOp, CompareOp, LogicOp, Program, ResultType, Step, VectorOp},
    },
};

/// Parses `and`/`or` chains.
///
/// Both operators share one precedence level and associate to the left.
/// Operands must be scalars; the result is a truth value.
///
/// Grammar: `logical := comparison (("and" | "or") comparison)*`
///
/// # Errors
/// - `ExpectedScalar` if an operand is a vector.
pub fn parse_logical(tokens: &mut Tokenizer<'_, '_>,
                     program: &mut Program)
                     -> CompileResult<ResultType> {
    let mut left = parse_comparison(tokens, program)?;
    while let Some(op) = token_to_logic_operator(tokens.kind()) {
        let operator = tokens.advance()?;
        let right = parse_comparison(tokens, program)?;
        require_scalar(left, "logical operator", &operator)?;
        require_scalar(right, "logical operator", &operator)?;

        emit(program, Step::Logic(op), &operator)?;
        left = ResultType::boolean();
    }
    Ok(left)
}

/// Parses comparisons.
///
/// Comparisons associate to the left, so `a < b < c` compares the truth
/// value of `a < b` with `c`.
///
/// Grammar: `comparison := additive ((">" | "<" | ">=" | "<=" | "==")
/// additive)*`
///
/// # Errors
/// - `ExpectedScalar` if an operand is a vector.
pub fn parse_comparison(tokens: &mut Tokenizer<'_, '_>,
                        program: &mut Program)
                        -> CompileResult<ResultType> {
    let mut left = parse_additive(tokens, program)?;
    while let Some(op) = token_to_compare_operator(tokens.kind()) {
        let operator = tokens.advance()?;
        let right = parse_additive(tokens, program)?;
        require_scalar(left, "comparison", &operator)?;
        require_scalar(right, "comparison", &operator)?;

        emit(program, Step::Compare(op), &operator)?;
        left = ResultType::boolean();
    }
    Ok(left)
}

/// Parses addition and subtraction.
///
/// If either side is a vector the operation is component-wise: a scalar is
/// added to every component and the shorter vector is padded with zeros.
/// The result is as wide as the wider operand.
///
/// Grammar: `additive := multiplicative (("+" | "-") multiplicative)*`
pub fn parse_additive(tokens: &mut Tokenizer<'_, '_>,
                      program: &mut Program)
                      -> CompileResult<ResultType> {
    let mut left = parse_multiplicative(tokens, program)?;
    loop {
        let op = match tokens.kind() {
            TokenKind::Plus => ArithmeticOp::Add,
            TokenKind::Minus => ArithmeticOp::Sub,
            _ => break,
        };
        let operator = tokens.advance()?;
        let right = parse_multiplicative(tokens, program)?;
        let is_complex = left.is_complex || right.is_complex;

        if left.is_vector() || right.is_vector() {
            let op = if op == ArithmeticOp::Add { VectorOp::Add } else { VectorOp::Sub };
            emit(program,
                 Step::Vector { op,
                                left: left.width,
                                right: right.width },
                 &operator)?;
            left = ResultType::vector(op.result_width(left.width, right.width), is_complex);
        } else {
            emit(program, Step::Arithmetic(op), &operator)?;
            left = ResultType::scalar(is_complex);
        }
    }
    Ok(left)
}

/// Parses multiplication and division.
///
/// Width rules:
/// - vector `*` scalar and scalar `*` vector scale every component,
/// - vector `*` vector is the dot product over the common components,
/// - vector `/` scalar divides every component.
///
/// Grammar: `multiplicative := unary (("*" | "/") unary)*`
///
/// # Errors
/// - `VectorDivisor` if the right operand of `/` is a vector.
pub fn parse_multiplicative(tokens: &mut Tokenizer<'_, '_>,
                            program: &mut Program)
                            -> CompileResult<ResultType> {
    let mut left = parse_unary(tokens, program)?;
    loop {
        let op = match tokens.kind() {
            TokenKind::Star => ArithmeticOp::Mul,
            TokenKind::Slash => ArithmeticOp::Div,
            _ => break,
        };
        let operator = tokens.advance()?;
        let right = parse_unary(tokens, program)?;
        let is_complex = left.is_complex || right.is_complex;

        if op == ArithmeticOp::Div && right.is_vector() {
            return Err(CompileError::VectorDivisor { width:  right.width,
                                                     line:   operator.line,
                                                     column: operator.column, });
        }

        let vector_op = match (op, left.is_vector(), right.is_vector()) {
            (_, false, false) => None,
            (ArithmeticOp::Div, _, _) => Some(VectorOp::VecScalarDiv),
            (_, true, false) => Some(VectorOp::VecScalarMul),
            (_, false, true) => Some(VectorOp::ScalarVecMul),
            (_, true, true) => Some(VectorOp::Dot),
        };

        left = match vector_op {
            None => {
                emit(program, Step::Arithmetic(op), &operator)?;
                ResultType::scalar(is_complex)
            },
            Some(op) => {
                emit(program,
                     Step::Vector { op,
                                    left: left.width,
                                    right: right.width },
                     &operator)?;
                ResultType::vector(op.result_width(left.width, right.width), is_complex)
            },
        };
    }
    Ok(left)
}

/// Maps a token to a comparison operator.
///
/// # Returns
/// - `Some(CompareOp)` if the token is a comparison operator.
/// - `None` otherwise.
pub const fn token_to_compare_operator(kind: &TokenKind) -> Option<CompareOp> {
    match kind {
        TokenKind::Greater => Some(CompareOp::Greater),
        TokenKind::Less => Some(CompareOp::Less),
        TokenKind::GreaterEqual => Some(CompareOp::GreaterEqual),
        TokenKind::LessEqual => Some(CompareOp::LessEqual),
        TokenKind::EqualEqual => Some(CompareOp::Equal),
        _ => None,
    }
}

/// Maps a token to a boolean operator.
pub const fn token_to_logic_operator(kind: &TokenKind) -> Option<LogicOp> {
    match kind {
        TokenKind::And => Some(LogicOp::And),
        TokenKind::Or => Some(LogicOp::Or),
        _ => None,
    }
}
