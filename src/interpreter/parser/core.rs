use std::iter::Peekable;

use crate::ast::{Expr, Stmt};
use crate::error::ParseError;
use crate::interpreter::lexer::Token;
use crate::interpreter::parser::binary::parse_or;
use crate::interpreter::parser::statement::parse_statement;
use crate::interpreter::parser::utils::at_end;

/// Result type used by all parsing functions.
pub type ParseResult<T> = Result<T, ParseError>;

/// The parser's view of the token sequence: a cloneable cursor with
/// single-token peeking. Cloning the stream gives the multi-token lookahead
/// used to disambiguate statement forms.
pub type TokenStream<'a> = Peekable<std::slice::Iter<'a, Token>>;

/// Parses a whole program: statements until the end-of-input token.
///
/// # Errors
/// Returns the first [`ParseError`]; the parser does not attempt recovery.
///
/// # Example
/// ```
/// use scrawl::interpreter::lexer::lex;
/// use scrawl::interpreter::parser::core::parse_program;
///
/// let tokens = lex("var x = 1 + 2;").unwrap();
/// let program = parse_program(&tokens).unwrap();
/// assert_eq!(program.len(), 1);
/// ```
pub fn parse_program(tokens: &[Token]) -> ParseResult<Vec<Stmt>> {
    let mut stream = tokens.iter().peekable();
    let mut statements = Vec::new();
    while !at_end(&mut stream) {
        statements.push(parse_statement(&mut stream)?);
    }
    Ok(statements)
}

/// Parses a full expression.
///
/// This is the entry point for expression parsing. It begins at the lowest
/// precedence level, logical OR, and descends through the precedence
/// hierarchy from there.
///
/// Grammar: `expression := or`
pub fn parse_expression<'a>(tokens: &mut TokenStream<'a>) -> ParseResult<Expr> {
    parse_or(tokens)
}
