use scrawl::ast::{Expr, LiteralValue, Stmt};
use scrawl::error::LexError;
use scrawl::interpreter::lexer::{lex, TokenKind};
use scrawl::interpreter::parser::core::parse_program;

fn kinds(source: &str) -> Vec<TokenKind> {
    lex(source)
        .unwrap_or_else(|e| panic!("lexing failed for {source:?}: {e}"))
        .into_iter()
        .map(|t| t.kind)
        .collect()
}

fn parse(source: &str) -> Vec<Stmt> {
    let tokens = lex(source).unwrap_or_else(|e| panic!("lexing failed for {source:?}: {e}"));
    parse_program(&tokens).unwrap_or_else(|e| panic!("parsing failed for {source:?}: {e}"))
}

#[test]
fn single_character_operators() {
    assert_eq!(
        kinds("+ - * / % & | ! < > = ( ) { } [ ] , . ;"),
        vec![
            TokenKind::Plus,
            TokenKind::Minus,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::Percent,
            TokenKind::And,
            TokenKind::Or,
            TokenKind::Not,
            TokenKind::Less,
            TokenKind::Greater,
            TokenKind::Equals,
            TokenKind::ParenLeft,
            TokenKind::ParenRight,
            TokenKind::BraceLeft,
            TokenKind::BraceRight,
            TokenKind::BracketLeft,
            TokenKind::BracketRight,
            TokenKind::Comma,
            TokenKind::Dot,
            TokenKind::Semicolon,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn two_character_operators_win_over_prefixes() {
    assert_eq!(
        kinds("<= >= == !="),
        vec![
            TokenKind::LessEqual,
            TokenKind::GreaterEqual,
            TokenKind::EqualEqual,
            TokenKind::NotEqual,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn percent_produces_exactly_one_token() {
    assert_eq!(
        kinds("5 % 2"),
        vec![
            TokenKind::Number(5.0),
            TokenKind::Percent,
            TokenKind::Number(2.0),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn keywords_and_identifiers() {
    assert_eq!(
        kinds("fn var if else while for loop return nil true false break continue import NaN infinity in"),
        vec![
            TokenKind::Fn,
            TokenKind::Var,
            TokenKind::If,
            TokenKind::Else,
            TokenKind::While,
            TokenKind::For,
            TokenKind::Loop,
            TokenKind::Return,
            TokenKind::Nil,
            TokenKind::True,
            TokenKind::False,
            TokenKind::Break,
            TokenKind::Continue,
            TokenKind::Import,
            TokenKind::Nan,
            TokenKind::Infinity,
            TokenKind::In,
            TokenKind::Eof,
        ]
    );
    // Keyword prefixes do not split identifiers.
    assert_eq!(
        kinds("format input_2"),
        vec![
            TokenKind::Identifier("format".to_string()),
            TokenKind::Identifier("input_2".to_string()),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn numbers_parse_to_doubles() {
    assert_eq!(
        kinds("42 3.14"),
        vec![TokenKind::Number(42.0), TokenKind::Number(3.14), TokenKind::Eof]
    );
    // A trailing dot is not part of the number.
    assert_eq!(
        kinds("1."),
        vec![TokenKind::Number(1.0), TokenKind::Dot, TokenKind::Eof]
    );
}

#[test]
fn strings_decode_their_payload() {
    let tokens = lex(r#""hello""#).unwrap();
    assert_eq!(tokens[0].kind, TokenKind::Str("hello".to_string()));
    assert_eq!(tokens[0].lexeme, r#""hello""#);

    let tokens = lex("'single'").unwrap();
    assert_eq!(tokens[0].kind, TokenKind::Str("single".to_string()));

    let tokens = lex(r#""a\nb""#).unwrap();
    assert_eq!(tokens[0].kind, TokenKind::Str("a\nb".to_string()));
    // Only \n is decoded.
    let tokens = lex(r#""a\tb""#).unwrap();
    assert_eq!(tokens[0].kind, TokenKind::Str(r"a\tb".to_string()));
}

#[test]
fn lexemes_match_the_source() {
    let source = r#"var foo = 12.5 + bar;"#;
    let tokens = lex(source).unwrap();
    let lexemes: Vec<&str> = tokens.iter().map(|t| t.lexeme.as_str()).collect();
    assert_eq!(lexemes, vec!["var", "foo", "=", "12.5", "+", "bar", ";", ""]);
}

#[test]
fn positions_track_lines_and_columns() {
    let tokens = lex("var x\n  y").unwrap();
    assert_eq!((tokens[0].line, tokens[0].column), (1, 1));
    assert_eq!((tokens[1].line, tokens[1].column), (1, 5));
    assert_eq!((tokens[2].line, tokens[2].column), (2, 3));
}

#[test]
fn tabs_advance_the_column_by_three() {
    let tokens = lex("\tx").unwrap();
    assert_eq!((tokens[0].line, tokens[0].column), (1, 4));
    let tokens = lex("a\tb").unwrap();
    assert_eq!(tokens[1].column, 5);
}

#[test]
fn comments_are_skipped() {
    assert_eq!(
        kinds("1 // rest of line\n2"),
        vec![TokenKind::Number(1.0), TokenKind::Number(2.0), TokenKind::Eof]
    );
    assert_eq!(
        kinds("/* outer /* inner */ still outer */ 1"),
        vec![TokenKind::Number(1.0), TokenKind::Eof]
    );
    let tokens = lex("/* a\nb */ x").unwrap();
    assert_eq!(tokens[0].line, 2);
}

#[test]
fn invalid_characters_are_lex_errors() {
    match lex("@") {
        Err(LexError::InvalidCharacter {
            character,
            line,
            column,
        }) => {
            assert_eq!(character, '@');
            assert_eq!((line, column), (1, 1));
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn unterminated_strings_are_lex_errors() {
    assert!(matches!(
        lex(r#""abc"#),
        Err(LexError::UnterminatedString { .. })
    ));
    assert!(matches!(
        lex("\"abc\ndef\""),
        Err(LexError::UnterminatedString { .. })
    ));
}

#[test]
fn unterminated_block_comments_are_lex_errors() {
    assert!(matches!(
        lex("/* never closed"),
        Err(LexError::UnterminatedBlockComment { .. })
    ));
    assert!(matches!(
        lex("/* outer /* inner */"),
        Err(LexError::UnterminatedBlockComment { .. })
    ));
}

#[test]
fn var_declarations_parse_with_and_without_initializer() {
    let program = parse("var foo; var bar = 2;");
    match &program[0] {
        Stmt::Var { name, initializer } => {
            assert_eq!(name.lexeme, "foo");
            assert!(initializer.is_none());
        }
        other => panic!("unexpected statement: {other:?}"),
    }
    match &program[1] {
        Stmt::Var { name, initializer } => {
            assert_eq!(name.lexeme, "bar");
            assert!(initializer.is_some());
        }
        other => panic!("unexpected statement: {other:?}"),
    }
}

#[test]
fn precedence_nests_multiplication_tighter() {
    let program = parse("1 + 2 * 3;");
    let Stmt::Expression {
        expr: Expr::Binary { left, op, right },
    } = &program[0]
    else {
        panic!("expected a binary expression statement");
    };
    assert_eq!(op.lexeme, "+");
    assert!(matches!(
        **left,
        Expr::Literal {
            value: LiteralValue::Number(n)
        } if n == 1.0
    ));
    assert!(matches!(**right, Expr::Binary { ref op, .. } if op.lexeme == "*"));
}

#[test]
fn binary_operators_are_left_associative() {
    let program = parse("10 - 2 - 3;");
    let Stmt::Expression {
        expr: Expr::Binary { left, op, .. },
    } = &program[0]
    else {
        panic!("expected a binary expression statement");
    };
    assert_eq!(op.lexeme, "-");
    assert!(matches!(**left, Expr::Binary { ref op, .. } if op.lexeme == "-"));
}

#[test]
fn if_always_materializes_an_else_block() {
    let program = parse("if true { 1; }");
    let Stmt::If {
        then_branch,
        else_branch,
        ..
    } = &program[0]
    else {
        panic!("expected an if statement");
    };
    assert_eq!(then_branch.len(), 1);
    assert!(else_branch.is_empty());
}

#[test]
fn loop_lowers_to_while_true() {
    let program = parse("loop { break; }");
    let Stmt::While { condition, body, .. } = &program[0] else {
        panic!("expected a while statement");
    };
    assert!(matches!(
        condition,
        Expr::Literal {
            value: LiteralValue::Bool(true)
        }
    ));
    assert!(matches!(body[0], Stmt::Break { .. }));
}

#[test]
fn fn_declarations_lower_to_variable_bindings() {
    let program = parse("fn add(a, b) { return a + b; }");
    let Stmt::Var { name, initializer } = &program[0] else {
        panic!("expected a variable binding");
    };
    assert_eq!(name.lexeme, "add");
    let Some(Expr::Literal {
        value: LiteralValue::Function(decl),
    }) = initializer
    else {
        panic!("expected a function literal initializer");
    };
    assert_eq!(decl.params, vec!["a".to_string(), "b".to_string()]);
    assert_eq!(decl.body.len(), 1);
}

#[test]
fn c_style_for_lowers_to_block_and_while() {
    let program = parse("for var i = 0; i < 2; i = i + 1 { print(i); }");
    let Stmt::Block(outer) = &program[0] else {
        panic!("expected the desugared block");
    };
    assert_eq!(outer.len(), 2);
    assert!(matches!(&outer[0], Stmt::Var { name, .. } if name.lexeme == "i"));
    let Stmt::While { body, .. } = &outer[1] else {
        panic!("expected the desugared while loop");
    };
    // The increment runs as the last statement of the body.
    assert!(matches!(
        body.last(),
        Some(Stmt::Expression {
            expr: Expr::Assign { name, .. }
        }) if name.lexeme == "i"
    ));
}

#[test]
fn for_each_lowers_to_counter_driven_while() {
    let program = parse("for var item in xs { print(item); }");
    let Stmt::Block(outer) = &program[0] else {
        panic!("expected the desugared block");
    };
    assert_eq!(outer.len(), 3);
    assert!(matches!(&outer[0], Stmt::Var { name, .. } if name.lexeme == "__iter__"));
    assert!(matches!(&outer[1], Stmt::Var { name, .. } if name.lexeme == "__iterable__"));
    let Stmt::While {
        condition, body, ..
    } = &outer[2]
    else {
        panic!("expected the desugared while loop");
    };
    // Condition is `__iter__ < len(__iterable__)`.
    let Expr::Binary { op, right, .. } = condition else {
        panic!("expected a comparison condition");
    };
    assert_eq!(op.lexeme, "<");
    assert!(matches!(
        &**right,
        Expr::Call { callee, .. }
            if matches!(&**callee, Expr::GetVar { name } if name.lexeme == "len")
    ));
    // The loop variable is re-bound at the top of each iteration.
    assert!(matches!(
        &body[0],
        Stmt::Var { name, initializer: Some(Expr::Index { .. }) } if name.lexeme == "item"
    ));
    assert!(matches!(
        body.last(),
        Some(Stmt::Expression {
            expr: Expr::Assign { name, .. }
        }) if name.lexeme == "__iter__"
    ));
}

#[test]
fn indexing_and_element_assignment_shapes() {
    let program = parse("xs[0]; xs[0] = 1; foo()[0];");
    assert!(matches!(
        &program[0],
        Stmt::Expression {
            expr: Expr::Index { .. }
        }
    ));
    assert!(matches!(
        &program[1],
        Stmt::Expression {
            expr: Expr::AssignIndex { name, .. }
        } if name.lexeme == "xs"
    ));
    // Indexing a call result stays a plain read; only bare names assign.
    assert!(matches!(
        &program[2],
        Stmt::Expression {
            expr: Expr::Index { indexee, .. }
        } if matches!(&**indexee, Expr::Call { .. })
    ));
}

#[test]
fn module_members_can_be_called() {
    let program = parse("m.f(1);");
    let Stmt::Expression {
        expr: Expr::Call { callee, args, .. },
    } = &program[0]
    else {
        panic!("expected a call statement");
    };
    assert!(matches!(
        &**callee,
        Expr::ImportAccess { module, member }
            if module.lexeme == "m" && member.lexeme == "f"
    ));
    assert_eq!(args.len(), 1);
}

#[test]
fn parse_errors_carry_the_offending_token() {
    let tokens = lex("var x = 1").unwrap();
    let error = parse_program(&tokens).unwrap_err();
    assert_eq!(error.to_string(), "Expect ';' after statement.");

    let tokens = lex("{ var x = 1;").unwrap();
    let error = parse_program(&tokens).unwrap_err();
    assert_eq!(error.to_string(), "Unclosed block");

    let tokens = lex(";").unwrap();
    let error = parse_program(&tokens).unwrap_err();
    assert_eq!(error.to_string(), "Expect Expression");
}
