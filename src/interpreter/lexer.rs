use logos::Logos;

use crate::{
    error::{CompileError, CompileResult},
    interpreter::{
        function::core::{Builtin, FunctionRegistry},
        parser::core::MAX_NESTING_DEPTH,
        symbols::{Argument, ExternalCell, Symbol, SymbolTables},
    },
};

/// Represents a raw lexical token in the source input.
///
/// Identifiers are not classified here; [`Tokenizer`] resolves them against
/// the symbol tables.
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(extras = LexerExtras)]
pub enum Token {
    /// Numeric literal tokens, such as `3.14`, `.5`, `2.` or `2.1e-10`.
    ///
    /// Letters, digits and dots directly following a number are swallowed so
    /// that `2x` or `1.2.3` fail as malformed numbers.
    #[regex(r"([0-9]+\.?[0-9]*|\.[0-9]+)([eE][+-]?[0-9]*)?[a-zA-Z0-9_.]*", parse_number)]
    Number(f64),
    /// `and`
    #[token("and")]
    And,
    /// `or`
    #[token("or")]
    Or,
    /// `not`
    #[token("not")]
    Not,
    /// Identifier tokens; argument, variable, constant or function names.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),
    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `*`
    #[token("*")]
    Star,
    /// `/`
    #[token("/")]
    Slash,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `,`
    #[token(",")]
    Comma,
    /// `==`
    #[token("==")]
    EqualEqual,
    /// `<=`
    #[token("<=")]
    LessEqual,
    /// `>=`
    #[token(">=")]
    GreaterEqual,
    /// `<`
    #[token("<")]
    Less,
    /// `>`
    #[token(">")]
    Greater,
    /// Line breaks.
    #[token("\n", |lex| {
        lex.extras.line += 1;
        lex.extras.line_start = lex.span().end;
        logos::Skip
    })]
    NewLine,
    /// Spaces, tabs and feeds.
    #[regex(r"[ \t\r\f]+", logos::skip)]
    Ignored,
}

/// Additional information carried by the lexer during tokenization.
///
/// Tracks the current line and where it starts, for error positions.
#[derive(Debug)]
pub struct LexerExtras {
    /// The current line number, starting at 1.
    pub line:       usize,
    /// Byte offset of the first character of the current line.
    pub line_start: usize,
}

impl Default for LexerExtras {
    fn default() -> Self {
        Self { line:       1,
               line_start: 0, }
    }
}

/// Parses a numeric literal from the current token slice.
///
/// # Returns
/// - `Some(f64)`: The parsed value if the slice is a valid float.
/// - `None`: If the slice is malformed; logos reports an error token.
fn parse_number(lex: &logos::Lexer<Token>) -> Option<f64> {
    lex.slice().parse().ok()
}

/// Classification of a token after identifier resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// A numeric literal.
    Number(f64),
    /// A registered constant.
    Constant(f64),
    /// The imaginary unit `I`.
    Imaginary,
    /// A declared argument.
    Argument(Argument),
    /// A registered external cell.
    External(ExternalCell),
    /// A function name.
    Function(Builtin),
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `,`
    Comma,
    /// `>`
    Greater,
    /// `<`
    Less,
    /// `>=`
    GreaterEqual,
    /// `<=`
    LessEqual,
    /// `==`
    EqualEqual,
    /// `and`
    And,
    /// `or`
    Or,
    /// `not`
    Not,
    /// End of input.
    End,
}

/// A classified token with its source position.
#[derive(Debug, Clone, PartialEq)]
pub struct Lexeme<'src> {
    /// The classification and payload.
    pub kind:   TokenKind,
    /// The source text of the token; empty at end of input.
    pub text:   &'src str,
    /// 1-based line of the first character.
    pub line:   usize,
    /// 1-based column of the first character.
    pub column: usize,
}

impl Lexeme<'_> {
    /// Text describing the token in error messages.
    #[must_use]
    pub fn describe(&self) -> String {
        if self.kind == TokenKind::End {
            "end of input".to_string()
        } else {
            self.text.to_string()
        }
    }
}

/// Reads classified tokens from a source string.
///
/// Identifiers are resolved the moment they are read, in this order:
/// arguments, external cells, constants, the imaginary unit `I`, functions.
/// A name that resolves to nothing is an error right away.
///
/// # Example
/// ```
/// use evalfunc::interpreter::{
///     function::core::FunctionRegistry,
///     lexer::{TokenKind, Tokenizer},
///     symbols::SymbolTables,
/// };
///
/// let symbols = SymbolTables::new();
/// let functions = FunctionRegistry::standard();
/// let mut tokens = Tokenizer::new("pi * 2", &symbols, &functions).unwrap();
///
/// assert_eq!(tokens.kind(), &TokenKind::Constant(std::f64::consts::PI));
/// tokens.advance().unwrap();
/// assert_eq!(tokens.kind(), &TokenKind::Star);
/// tokens.advance().unwrap();
/// assert_eq!(tokens.number(), Some(2.0));
/// tokens.advance().unwrap();
/// assert_eq!(tokens.kind(), &TokenKind::End);
/// ```
pub struct Tokenizer<'src, 'sym> {
    lexer:     logos::Lexer<'src, Token>,
    symbols:   &'sym SymbolTables,
    functions: &'sym FunctionRegistry,
    current:   Lexeme<'src>,
    nesting:   usize,
}

impl<'src, 'sym> Tokenizer<'src, 'sym> {
    /// Creates a tokenizer positioned at the first token.
    ///
    /// # Errors
    /// Fails if the first token is malformed or unresolved.
    pub fn new(source: &'src str,
               symbols: &'sym SymbolTables,
               functions: &'sym FunctionRegistry)
               -> CompileResult<Self> {
        let placeholder = Lexeme { kind:   TokenKind::End,
                                   text:   "",
                                   line:   1,
                                   column: 1, };
        let mut tokenizer = Self { lexer: Token::lexer_with_extras(source, LexerExtras::default()),
                                   symbols,
                                   functions,
                                   current: placeholder,
                                   nesting: 0 };
        tokenizer.advance()?;
        Ok(tokenizer)
    }

    /// The current token.
    #[must_use]
    pub const fn current(&self) -> &Lexeme<'src> {
        &self.current
    }

    /// Classification of the current token.
    #[must_use]
    pub const fn kind(&self) -> &TokenKind {
        &self.current.kind
    }

    /// Numeric value of the current token, for literals and constants.
    #[must_use]
    pub const fn number(&self) -> Option<f64> {
        match self.current.kind {
            TokenKind::Number(value) | TokenKind::Constant(value) => Some(value),
            _ => None,
        }
    }

    /// Resolved argument of the current token.
    #[must_use]
    pub const fn argument(&self) -> Option<Argument> {
        match self.current.kind {
            TokenKind::Argument(argument) => Some(argument),
            _ => None,
        }
    }

    /// Source text of the current token.
    #[must_use]
    pub const fn text(&self) -> &'src str {
        self.current.text
    }

    /// Enters a nested construct opened at `at`.
    ///
    /// Every call must be paired with [`leave`](Self::leave) once the
    /// construct is parsed.
    ///
    /// # Errors
    /// - `NestingTooDeep` if more than [`MAX_NESTING_DEPTH`] constructs are
    ///   open.
    pub fn enter(&mut self, at: &Lexeme<'_>) -> CompileResult<()> {
        if self.nesting >= MAX_NESTING_DEPTH {
            return Err(CompileError::NestingTooDeep { limit:  MAX_NESTING_DEPTH,
                                                      line:   at.line,
                                                      column: at.column, });
        }
        self.nesting += 1;
        Ok(())
    }

    /// Leaves the innermost nested construct.
    pub const fn leave(&mut self) {
        self.nesting = self.nesting.saturating_sub(1);
    }

    /// Moves to the next token and returns the one that was current.
    ///
    /// At end of input the current token stays [`TokenKind::End`].
    ///
    /// # Errors
    /// - `UnexpectedCharacter` for characters that start no token.
    /// - `MalformedNumber` for numeric literals that do not parse.
    /// - `UnknownIdentifier` for names that resolve to nothing.
    pub fn advance(&mut self) -> CompileResult<Lexeme<'src>> {
        let next = self.read()?;
        Ok(std::mem::replace(&mut self.current, next))
    }

    fn read(&mut self) -> CompileResult<Lexeme<'src>> {
        let Some(token) = self.lexer.next() else {
            let end = self.lexer.source().len();
            return Ok(Lexeme { kind:   TokenKind::End,
                               text:   "",
                               line:   self.lexer.extras.line,
                               column: end - self.lexer.extras.line_start + 1, });
        };

        let text = self.lexer.slice();
        let line = self.lexer.extras.line;
        let column = self.lexer.span().start - self.lexer.extras.line_start + 1;

        let kind = match token {
            Ok(token) => self.classify(token, line, column)?,
            Err(()) if text.starts_with(|c: char| c.is_ascii_digit() || c == '.') => {
                return Err(CompileError::MalformedNumber { text: text.to_string(),
                                                           line,
                                                           column });
            },
            Err(()) => {
                return Err(CompileError::UnexpectedCharacter { text: text.to_string(),
                                                               line,
                                                               column });
            },
        };

        Ok(Lexeme { kind,
                    text,
                    line,
                    column })
    }

    fn classify(&self, token: Token, line: usize, column: usize) -> CompileResult<TokenKind> {
        Ok(match token {
            Token::Number(value) => TokenKind::Number(value),
            Token::Identifier(name) => self.resolve(name, line, column)?,
            Token::And => TokenKind::And,
            Token::Or => TokenKind::Or,
            Token::Not => TokenKind::Not,
            Token::Plus => TokenKind::Plus,
            Token::Minus => TokenKind::Minus,
            Token::Star => TokenKind::Star,
            Token::Slash => TokenKind::Slash,
            Token::LParen => TokenKind::LParen,
            Token::RParen => TokenKind::RParen,
            Token::Comma => TokenKind::Comma,
            Token::EqualEqual => TokenKind::EqualEqual,
            Token::LessEqual => TokenKind::LessEqual,
            Token::GreaterEqual => TokenKind::GreaterEqual,
            Token::Less => TokenKind::Less,
            Token::Greater => TokenKind::Greater,
            Token::NewLine | Token::Ignored => unreachable!("skipped by the lexer"),
        })
    }

    fn resolve(&self, name: String, line: usize, column: usize) -> CompileResult<TokenKind> {
        if let Some(symbol) = self.symbols.resolve(&name) {
            return Ok(match symbol {
                Symbol::Argument(argument) => TokenKind::Argument(argument),
                Symbol::External(cell) => TokenKind::External(cell),
                Symbol::Constant(value) => TokenKind::Constant(value),
            });
        }
        if name == "I" {
            return Ok(TokenKind::Imaginary);
        }
        if let Some(builtin) = self.functions.get(&name) {
            return Ok(TokenKind::Function(*builtin));
        }
        Err(CompileError::UnknownIdentifier { name,
                                              line,
                                              column })
    }
}
