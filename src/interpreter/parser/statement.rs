use crate::ast::{Expr, FnDecl, LiteralValue, Stmt};
use crate::error::ParseError;
use crate::interpreter::lexer::{Token, TokenKind};
use crate::interpreter::parser::core::{parse_expression, ParseResult, TokenStream};
use crate::interpreter::parser::utils::{at_end, expect, parse_comma_separated, parse_identifier};

/// Parses a single statement.
///
/// Dispatch is on the first token: `{` opens a block, a keyword selects its
/// statement form, and anything else is an expression statement. All simple
/// statements require a terminating `;`.
pub fn parse_statement<'a>(tokens: &mut TokenStream<'a>) -> ParseResult<Stmt> {
    let Some(&token) = tokens.peek() else {
        return Err(ParseError::UnexpectedEof { line: 0 });
    };
    match &token.kind {
        TokenKind::BraceLeft => {
            tokens.next();
            Ok(Stmt::Block(parse_block_body(tokens)?))
        }
        TokenKind::Break => {
            let keyword = token.clone();
            tokens.next();
            expect(tokens, &TokenKind::Semicolon, "Expect ';' after expression")?;
            Ok(Stmt::Break { keyword })
        }
        TokenKind::Continue => {
            let keyword = token.clone();
            tokens.next();
            expect(tokens, &TokenKind::Semicolon, "Expect ';' after expression")?;
            Ok(Stmt::Continue { keyword })
        }
        TokenKind::For => {
            let keyword = token.clone();
            tokens.next();
            parse_for(tokens, keyword)
        }
        TokenKind::Fn => parse_function_declaration(tokens),
        TokenKind::If => {
            let keyword = token.clone();
            tokens.next();
            parse_if(tokens, keyword)
        }
        TokenKind::Import => {
            tokens.next();
            let name = parse_identifier(tokens, "Expect an identifier after 'import'")?;
            expect(tokens, &TokenKind::Semicolon, "Expect ';' after statement")?;
            Ok(Stmt::Import { name })
        }
        TokenKind::Loop => {
            let keyword = token.clone();
            tokens.next();
            let body = parse_block(tokens, "Expect '{' after 'loop'")?;
            Ok(Stmt::While {
                condition: Expr::Literal {
                    value: LiteralValue::Bool(true),
                },
                body,
                keyword,
            })
        }
        TokenKind::Return => {
            let keyword = token.clone();
            tokens.next();
            if matches!(tokens.peek(), Some(t) if t.kind == TokenKind::Semicolon) {
                tokens.next();
                return Ok(Stmt::Return {
                    keyword,
                    value: None,
                });
            }
            let value = parse_expression(tokens)?;
            expect(tokens, &TokenKind::Semicolon, "Expect ';' after return")?;
            Ok(Stmt::Return {
                keyword,
                value: Some(value),
            })
        }
        TokenKind::While => {
            let keyword = token.clone();
            tokens.next();
            let condition = parse_expression(tokens)?;
            let body = parse_block(tokens, "Expect '{' after while condition")?;
            Ok(Stmt::While {
                condition,
                body,
                keyword,
            })
        }
        TokenKind::Var => {
            tokens.next();
            let name = parse_identifier(tokens, "Expect identifier after 'var'")?;
            let initializer = if matches!(tokens.peek(), Some(t) if t.kind == TokenKind::Equals) {
                tokens.next();
                Some(parse_expression(tokens)?)
            } else {
                None
            };
            expect(tokens, &TokenKind::Semicolon, "Expect ';' after statement.")?;
            Ok(Stmt::Var { name, initializer })
        }
        _ => {
            let expr = parse_expression(tokens)?;
            expect(tokens, &TokenKind::Semicolon, "Expect ';' after statement.")?;
            Ok(Stmt::Expression { expr })
        }
    }
}

/// Parses the statements of a block whose `{` has already been consumed,
/// then consumes the `}`.
fn parse_block_body<'a>(tokens: &mut TokenStream<'a>) -> ParseResult<Vec<Stmt>> {
    let mut statements = Vec::new();
    while !at_end(tokens) && !matches!(tokens.peek(), Some(t) if t.kind == TokenKind::BraceRight) {
        statements.push(parse_statement(tokens)?);
    }
    expect(tokens, &TokenKind::BraceRight, "Unclosed block")?;
    Ok(statements)
}

/// Consumes a `{`, failing with `open_message`, then parses the block body.
fn parse_block<'a>(tokens: &mut TokenStream<'a>, open_message: &str) -> ParseResult<Vec<Stmt>> {
    expect(tokens, &TokenKind::BraceLeft, open_message)?;
    parse_block_body(tokens)
}

/// Parses a function declaration, `fn name(a, b) { … }`.
///
/// Functions are just variables bound to function values: the declaration
/// lowers to `Stmt::Var` with a function literal initializer. The function's
/// arity is the parameter count.
fn parse_function_declaration<'a>(tokens: &mut TokenStream<'a>) -> ParseResult<Stmt> {
    tokens.next();
    let name = parse_identifier(tokens, "Expect identifier after 'fn'")?;
    expect(tokens, &TokenKind::ParenLeft, "Expect '(' after function name")?;
    let params = parse_comma_separated(
        tokens,
        |tokens| {
            parse_identifier(tokens, "Expect identifier for parameter").map(|t| t.lexeme)
        },
        &TokenKind::ParenRight,
        "Expect ')' or ',' after parameter name",
    )?;
    let body = parse_block(tokens, "Expect '{' after function header")?;
    Ok(Stmt::Var {
        name: name.clone(),
        initializer: Some(Expr::Literal {
            value: LiteralValue::Function(FnDecl { name, params, body }),
        }),
    })
}

/// Parses an `if` statement. The condition takes no surrounding parentheses
/// and both branches are braced blocks; a missing `else` still materializes
/// an empty else branch.
fn parse_if<'a>(tokens: &mut TokenStream<'a>, keyword: Token) -> ParseResult<Stmt> {
    let condition = parse_expression(tokens)?;
    let then_branch = parse_block(tokens, "Expect '{' after if condition")?;
    let else_branch = if matches!(tokens.peek(), Some(t) if t.kind == TokenKind::Else) {
        tokens.next();
        parse_block(tokens, "Expect '{' after 'else'")?
    } else {
        Vec::new()
    };
    Ok(Stmt::If {
        condition,
        then_branch,
        else_branch,
        keyword,
    })
}

/// Parses a `for` statement, desugaring it during parsing.
///
/// The C-style form
///
/// ```text
/// for var i = 0; i < 10; i = i + 1 {
///     print(i);
/// }
/// ```
///
/// lowers to
///
/// ```text
/// {
///     var i = 0;
///     while i < 10 {
///         print(i);
///         i = i + 1;
///     }
/// }
/// ```
///
/// The initializer is parsed as a full statement (a `var` declaration
/// consumes its own `;`), the condition is followed by a required `;`, and
/// the increment runs as the last statement of the loop body.
///
/// A three-token lookahead (`var IDENT in`) selects the for-each form
/// instead.
fn parse_for<'a>(tokens: &mut TokenStream<'a>, keyword: Token) -> ParseResult<Stmt> {
    let mut lookahead = tokens.clone();
    let looks_like_for_each = matches!(lookahead.next(), Some(t) if t.kind == TokenKind::Var)
        && matches!(lookahead.next(), Some(t) if matches!(t.kind, TokenKind::Identifier(_)))
        && matches!(lookahead.next(), Some(t) if t.kind == TokenKind::In);
    if looks_like_for_each {
        return parse_for_each(tokens, keyword);
    }

    let initializer = parse_statement(tokens)?;
    let condition = parse_expression(tokens)?;
    expect(
        tokens,
        &TokenKind::Semicolon,
        "Expect ';' after for loop condition",
    )?;
    let increment = parse_expression(tokens)?;
    let mut body = parse_block(tokens, "Expect '{' to begin for loop")?;
    body.push(Stmt::Expression { expr: increment });

    Ok(Stmt::Block(vec![
        initializer,
        Stmt::While {
            condition,
            body,
            keyword,
        },
    ]))
}

/// Parses a for-each statement, desugaring it to an index-driven while loop.
///
/// ```text
/// for var item in list {
///     print(item);
/// }
/// ```
///
/// lowers to
///
/// ```text
/// {
///     var __iter__ = 0;
///     var __iterable__ = list;
///     while __iter__ < len(__iterable__) {
///         var item = __iterable__[__iter__];
///         print(item);
///         __iter__ = __iter__ + 1;
///     }
/// }
/// ```
///
/// The loop variable is re-bound at the top of each iteration. The sentinel
/// names `__iter__` and `__iterable__` are ordinary variables; user code
/// using those names will collide with them.
fn parse_for_each<'a>(tokens: &mut TokenStream<'a>, keyword: Token) -> ParseResult<Stmt> {
    tokens.next();
    let identifier = parse_identifier(tokens, "Expect an identifier")?;
    let in_token = expect(tokens, &TokenKind::In, "Expect 'in'")?;
    let iterable = parse_expression(tokens)?;

    // Synthesized tokens take the loop keyword's position so runtime errors
    // inside the lowered code still point at the loop header.
    let iter_token = synthetic_identifier("__iter__", &keyword);
    let iterable_token = synthetic_identifier("__iterable__", &keyword);

    let condition = Expr::Binary {
        left: Box::new(Expr::GetVar {
            name: iter_token.clone(),
        }),
        op: synthetic(TokenKind::Less, "<", &keyword),
        right: Box::new(Expr::Call {
            callee: Box::new(Expr::GetVar {
                name: synthetic_identifier("len", &keyword),
            }),
            args: vec![Expr::GetVar {
                name: iterable_token.clone(),
            }],
            paren: in_token.clone(),
        }),
    };

    let increment = Stmt::Expression {
        expr: Expr::Assign {
            name: iter_token.clone(),
            value: Box::new(Expr::Binary {
                left: Box::new(Expr::GetVar {
                    name: iter_token.clone(),
                }),
                op: synthetic(TokenKind::Plus, "+", &keyword),
                right: Box::new(Expr::Literal {
                    value: LiteralValue::Number(1.0),
                }),
            }),
        },
    };

    let mut body = vec![Stmt::Var {
        name: identifier,
        initializer: Some(Expr::Index {
            index: Box::new(Expr::GetVar {
                name: iter_token.clone(),
            }),
            indexee: Box::new(Expr::GetVar {
                name: iterable_token.clone(),
            }),
            bracket: in_token,
        }),
    }];
    body.extend(parse_block(tokens, "Expect '{' to begin for loop")?);
    body.push(increment);

    Ok(Stmt::Block(vec![
        Stmt::Var {
            name: iter_token,
            initializer: Some(Expr::Literal {
                value: LiteralValue::Number(0.0),
            }),
        },
        Stmt::Var {
            name: iterable_token,
            initializer: Some(iterable),
        },
        Stmt::While {
            condition,
            body,
            keyword,
        },
    ]))
}

fn synthetic(kind: TokenKind, lexeme: &str, at: &Token) -> Token {
    Token::new(kind, lexeme.to_string(), at.line, at.column)
}

fn synthetic_identifier(name: &str, at: &Token) -> Token {
    synthetic(TokenKind::Identifier(name.to_string()), name, at)
}
