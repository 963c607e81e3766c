use crate::error::ParseError;
use crate::interpreter::lexer::{Token, TokenKind};
use crate::interpreter::parser::core::{ParseResult, TokenStream};

/// Whether the stream is positioned at the end of input.
pub(in crate::interpreter::parser) fn at_end(tokens: &mut TokenStream<'_>) -> bool {
    matches!(tokens.peek(), None | Some(Token { kind: TokenKind::Eof, .. }))
}

/// Consumes the next token when its kind matches `kind`, failing with
/// `message` otherwise. Returns the consumed token.
///
/// Only payload-free kinds can be expected this way; identifiers go through
/// [`parse_identifier`].
pub(in crate::interpreter::parser) fn expect(
    tokens: &mut TokenStream<'_>,
    kind: &TokenKind,
    message: &str,
) -> ParseResult<Token> {
    match tokens.peek() {
        Some(token) if token.kind == *kind => {
            let token = (*token).clone();
            tokens.next();
            Ok(token)
        }
        Some(token) => Err(ParseError::UnexpectedToken {
            message: message.to_string(),
            token: (*token).clone(),
        }),
        None => Err(ParseError::UnexpectedEof { line: 0 }),
    }
}

/// Consumes the next token when it is an identifier, failing with `message`
/// otherwise. Returns the consumed token.
pub(in crate::interpreter::parser) fn parse_identifier(
    tokens: &mut TokenStream<'_>,
    message: &str,
) -> ParseResult<Token> {
    match tokens.peek() {
        Some(token) if matches!(token.kind, TokenKind::Identifier(_)) => {
            let token = (*token).clone();
            tokens.next();
            Ok(token)
        }
        Some(token) => Err(ParseError::UnexpectedToken {
            message: message.to_string(),
            token: (*token).clone(),
        }),
        None => Err(ParseError::UnexpectedEof { line: 0 }),
    }
}

/// Parses a comma-separated list of items terminated by `closing`.
///
/// This utility is shared by list literals, call arguments and parameter
/// lists. It repeatedly calls `parse_item`, expecting either a comma to
/// continue or the closing token to finish; an immediately encountered
/// closing token produces an empty list. The closing token is consumed.
///
/// # Errors
/// Returns a `ParseError` when an item fails to parse or when something
/// other than a comma or the closing token follows an item; the error uses
/// `message` so each call site reads naturally.
pub(in crate::interpreter::parser) fn parse_comma_separated<'a, T>(
    tokens: &mut TokenStream<'a>,
    parse_item: impl Fn(&mut TokenStream<'a>) -> ParseResult<T>,
    closing: &TokenKind,
    message: &str,
) -> ParseResult<Vec<T>> {
    let mut items = Vec::new();
    if let Some(token) = tokens.peek() {
        if token.kind == *closing {
            tokens.next();
            return Ok(items);
        }
    }
    loop {
        items.push(parse_item(tokens)?);
        match tokens.peek() {
            Some(token) if token.kind == TokenKind::Comma => {
                tokens.next();
            }
            Some(token) if token.kind == *closing => {
                tokens.next();
                break;
            }
            Some(token) => {
                return Err(ParseError::UnexpectedToken {
                    message: message.to_string(),
                    token: (*token).clone(),
                });
            }
            None => return Err(ParseError::UnexpectedEof { line: 0 }),
        }
    }
    Ok(items)
}
