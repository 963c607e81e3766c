use crate::ast::Expr;
use crate::interpreter::lexer::{Token, TokenKind};
use crate::interpreter::parser::core::{ParseResult, TokenStream};
use crate::interpreter::parser::unary::parse_unary;

/// Parses logical OR expressions, the lowest precedence level.
///
/// Grammar: `or := and ("|" and)*`
///
/// All binary levels are left-associative; each builds an [`Expr::Binary`]
/// tree carrying the operator token for error reporting.
pub fn parse_or<'a>(tokens: &mut TokenStream<'a>) -> ParseResult<Expr> {
    let mut left = parse_and(tokens)?;
    while let Some(op) = match_operator(tokens, &[TokenKind::Or]) {
        let right = parse_and(tokens)?;
        left = binary(left, op, right);
    }
    Ok(left)
}

/// Parses logical AND expressions.
///
/// Grammar: `and := equality ("&" equality)*`
pub fn parse_and<'a>(tokens: &mut TokenStream<'a>) -> ParseResult<Expr> {
    let mut left = parse_equality(tokens)?;
    while let Some(op) = match_operator(tokens, &[TokenKind::And]) {
        let right = parse_equality(tokens)?;
        left = binary(left, op, right);
    }
    Ok(left)
}

/// Parses equality expressions.
///
/// Grammar: `equality := comparison (("==" | "!=") comparison)*`
pub fn parse_equality<'a>(tokens: &mut TokenStream<'a>) -> ParseResult<Expr> {
    let mut left = parse_comparison(tokens)?;
    while let Some(op) =
        match_operator(tokens, &[TokenKind::EqualEqual, TokenKind::NotEqual])
    {
        let right = parse_comparison(tokens)?;
        left = binary(left, op, right);
    }
    Ok(left)
}

/// Parses comparison expressions.
///
/// Grammar: `comparison := additive (("<" | "<=" | ">" | ">=") additive)*`
pub fn parse_comparison<'a>(tokens: &mut TokenStream<'a>) -> ParseResult<Expr> {
    let mut left = parse_additive(tokens)?;
    while let Some(op) = match_operator(
        tokens,
        &[
            TokenKind::Less,
            TokenKind::LessEqual,
            TokenKind::Greater,
            TokenKind::GreaterEqual,
        ],
    ) {
        let right = parse_additive(tokens)?;
        left = binary(left, op, right);
    }
    Ok(left)
}

/// Parses addition and subtraction.
///
/// Grammar: `additive := multiplicative (("+" | "-") multiplicative)*`
pub fn parse_additive<'a>(tokens: &mut TokenStream<'a>) -> ParseResult<Expr> {
    let mut left = parse_multiplicative(tokens)?;
    while let Some(op) = match_operator(tokens, &[TokenKind::Plus, TokenKind::Minus]) {
        let right = parse_multiplicative(tokens)?;
        left = binary(left, op, right);
    }
    Ok(left)
}

/// Parses multiplication, division and remainder.
///
/// Grammar: `multiplicative := unary (("*" | "/" | "%") unary)*`
pub fn parse_multiplicative<'a>(tokens: &mut TokenStream<'a>) -> ParseResult<Expr> {
    let mut left = parse_unary(tokens)?;
    while let Some(op) = match_operator(
        tokens,
        &[TokenKind::Star, TokenKind::Slash, TokenKind::Percent],
    ) {
        let right = parse_unary(tokens)?;
        left = binary(left, op, right);
    }
    Ok(left)
}

/// Consumes and returns the next token when its kind is one of `kinds`.
fn match_operator(tokens: &mut TokenStream<'_>, kinds: &[TokenKind]) -> Option<Token> {
    let token = tokens.peek()?;
    if kinds.contains(&token.kind) {
        let token = (*token).clone();
        tokens.next();
        Some(token)
    } else {
        None
    }
}

fn binary(left: Expr, op: Token, right: Expr) -> Expr {
    Expr::Binary {
        left: Box::new(left),
        op,
        right: Box::new(right),
    }
}
