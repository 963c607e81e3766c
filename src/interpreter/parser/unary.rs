use crate::ast::{Expr, LiteralValue};
use crate::error::ParseError;
use crate::interpreter::lexer::TokenKind;
use crate::interpreter::parser::core::{parse_expression, ParseResult, TokenStream};
use crate::interpreter::parser::utils::{expect, parse_comma_separated, parse_identifier};

/// Parses a unary expression.
///
/// Supports the right-associative prefix operators `!` (logical not) and
/// `-` (numeric negation); `!-x` parses as `!(-x)`. Without a prefix
/// operator, parsing falls through to the indexing level.
///
/// Grammar:
/// ```text
///     unary := ("!" | "-") unary
///            | index
/// ```
pub(crate) fn parse_unary<'a>(tokens: &mut TokenStream<'a>) -> ParseResult<Expr> {
    if let Some(token) = tokens.peek() {
        if matches!(token.kind, TokenKind::Not | TokenKind::Minus) {
            let op = (*token).clone();
            tokens.next();
            let operand = parse_unary(tokens)?;
            return Ok(Expr::Unary {
                op,
                operand: Box::new(operand),
            });
        }
    }
    parse_index(tokens)
}

/// Parses a primary expression and an optional indexing postfix.
///
/// `e[i]` reads an element. When the indexee is a bare identifier, the form
/// `name[i] = v` is an element assignment instead, producing
/// [`Expr::AssignIndex`].
///
/// Grammar:
/// ```text
///     index := primary ("[" expression "]" ("=" expression)?)?
/// ```
fn parse_index<'a>(tokens: &mut TokenStream<'a>) -> ParseResult<Expr> {
    let expr = parse_primary(tokens)?;
    if let Some(token) = tokens.peek() {
        if token.kind == TokenKind::BracketLeft {
            let bracket = (*token).clone();
            tokens.next();
            let index = parse_expression(tokens)?;
            expect(tokens, &TokenKind::BracketRight, "Expect ']' after index")?;

            if let Expr::GetVar { name } = &expr {
                if matches!(tokens.peek(), Some(t) if t.kind == TokenKind::Equals) {
                    tokens.next();
                    let value = parse_expression(tokens)?;
                    return Ok(Expr::AssignIndex {
                        name: name.clone(),
                        index: Box::new(index),
                        value: Box::new(value),
                    });
                }
            }
            return Ok(Expr::Index {
                index: Box::new(index),
                indexee: Box::new(expr),
                bracket,
            });
        }
    }
    Ok(expr)
}

/// Parses a primary (atomic) expression: a literal, `(grouping)`, a
/// `[list, literal]`, or an identifier with its optional trailing
/// assignment, module access or call.
fn parse_primary<'a>(tokens: &mut TokenStream<'a>) -> ParseResult<Expr> {
    let Some(&token) = tokens.peek() else {
        return Err(ParseError::UnexpectedEof { line: 0 });
    };
    match &token.kind {
        TokenKind::Number(n) => {
            let value = LiteralValue::Number(*n);
            tokens.next();
            Ok(Expr::Literal { value })
        }
        TokenKind::Str(s) => {
            let value = LiteralValue::Str(s.clone());
            tokens.next();
            Ok(Expr::Literal { value })
        }
        TokenKind::True => {
            tokens.next();
            Ok(Expr::Literal {
                value: LiteralValue::Bool(true),
            })
        }
        TokenKind::False => {
            tokens.next();
            Ok(Expr::Literal {
                value: LiteralValue::Bool(false),
            })
        }
        TokenKind::Nil => {
            tokens.next();
            Ok(Expr::Literal {
                value: LiteralValue::Nil,
            })
        }
        TokenKind::Nan => {
            tokens.next();
            Ok(Expr::Literal {
                value: LiteralValue::Number(f64::NAN),
            })
        }
        TokenKind::Infinity => {
            tokens.next();
            Ok(Expr::Literal {
                value: LiteralValue::Number(f64::INFINITY),
            })
        }
        TokenKind::Identifier(_) => parse_variable(tokens),
        TokenKind::ParenLeft => {
            tokens.next();
            let inner = parse_expression(tokens)?;
            expect(tokens, &TokenKind::ParenRight, "Expect closing ')'")?;
            Ok(Expr::Grouping {
                inner: Box::new(inner),
            })
        }
        TokenKind::BracketLeft => {
            tokens.next();
            let items = parse_comma_separated(
                tokens,
                parse_expression,
                &TokenKind::BracketRight,
                "Expect ']' or ',' after expression",
            )?;
            Ok(Expr::List { items })
        }
        _ => Err(ParseError::ExpectedExpression {
            token: token.clone(),
        }),
    }
}

/// Parses the constructs that begin with an identifier.
///
/// A bare identifier is a variable read. It may instead be the target of an
/// assignment (`name = e`), a module member access (`module.member`), or the
/// callee of a call; a member access may itself be called
/// (`module.member(args)`).
fn parse_variable<'a>(tokens: &mut TokenStream<'a>) -> ParseResult<Expr> {
    let identifier = parse_identifier(tokens, "Expect an identifier")?;

    if matches!(tokens.peek(), Some(t) if t.kind == TokenKind::Equals) {
        tokens.next();
        let value = parse_expression(tokens)?;
        return Ok(Expr::Assign {
            name: identifier,
            value: Box::new(value),
        });
    }

    let mut expr = Expr::GetVar {
        name: identifier.clone(),
    };

    if matches!(tokens.peek(), Some(t) if t.kind == TokenKind::Dot) {
        tokens.next();
        let member = parse_identifier(tokens, "Expect an identifier")?;
        expr = Expr::ImportAccess {
            module: identifier,
            member,
        };
    }

    if let Some(token) = tokens.peek() {
        if token.kind == TokenKind::ParenLeft {
            let paren = (*token).clone();
            tokens.next();
            let args = parse_comma_separated(
                tokens,
                parse_expression,
                &TokenKind::ParenRight,
                "Expect ')' or ',' after argument",
            )?;
            expr = Expr::Call {
                callee: Box::new(expr),
                args,
                paren,
            };
        }
    }

    Ok(expr)
}
