use logos::{FilterResult, Logos, Skip};

use crate::error::LexError;

/// The tag of a lexical token.
///
/// This enum defines every token kind recognized by the language. Literal
/// kinds carry their decoded payload: numbers carry the parsed double,
/// strings their decoded contents, identifiers their name.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(extras = LexerExtras)]
#[logos(error = LexErrorKind)]
pub enum TokenKind {
    /// Numeric literal tokens, such as `42` or `3.14`.
    #[regex(r"[0-9]+(\.[0-9]+)?", parse_number)]
    Number(f64),
    /// String literal tokens, delimited by `"` or `'`. The payload is the
    /// decoded contents, without the delimiters and with `\n` expanded.
    #[regex(r#""[^"\n]*""#, decode_string)]
    #[regex(r"'[^'\n]*'", decode_string)]
    Str(String),
    /// Identifier tokens: a letter followed by letters, digits or `_`.
    #[regex(r"[A-Za-z][A-Za-z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),

    /// `fn`
    #[token("fn")]
    Fn,
    /// `var`
    #[token("var")]
    Var,
    /// `if`
    #[token("if")]
    If,
    /// `else`
    #[token("else")]
    Else,
    /// `while`
    #[token("while")]
    While,
    /// `for`
    #[token("for")]
    For,
    /// `loop`
    #[token("loop")]
    Loop,
    /// `return`
    #[token("return")]
    Return,
    /// `nil`
    #[token("nil")]
    Nil,
    /// `true`
    #[token("true")]
    True,
    /// `false`
    #[token("false")]
    False,
    /// `break`
    #[token("break")]
    Break,
    /// `continue`
    #[token("continue")]
    Continue,
    /// `import`
    #[token("import")]
    Import,
    /// `NaN`
    #[token("NaN")]
    Nan,
    /// `infinity`
    #[token("infinity")]
    Infinity,
    /// `in`
    #[token("in")]
    In,

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
    /// `%`
    #[token("%")]
    Percent,
    /// `&`, logical AND
    #[token("&")]
    And,
    /// `|`, logical OR
    #[token("|")]
    Or,
    /// `!`
    #[token("!")]
    Not,
    /// `<`
    #[token("<")]
    Less,
    /// `<=`
    #[token("<=")]
    LessEqual,
    /// `>`
    #[token(">")]
    Greater,
    /// `>=`
    #[token(">=")]
    GreaterEqual,
    /// `==`
    #[token("==")]
    EqualEqual,
    /// `!=`
    #[token("!=")]
    NotEqual,
    /// `=`
    #[token("=")]
    Equals,
    /// `(`
    #[token("(")]
    ParenLeft,
    /// `)`
    #[token(")")]
    ParenRight,
    /// `{`
    #[token("{")]
    BraceLeft,
    /// `}`
    #[token("}")]
    BraceRight,
    /// `[`
    #[token("[")]
    BracketLeft,
    /// `]`
    #[token("]")]
    BracketRight,
    /// `,`
    #[token(",")]
    Comma,
    /// `.`
    #[token(".")]
    Dot,
    /// `;`
    #[token(";")]
    Semicolon,

    /// End of input. Never produced by the regex machinery; `lex` appends it
    /// after the source is exhausted.
    Eof,

    /// Spaces, carriage returns, tabs and `// line comments` are skipped.
    /// Tabs still weigh three columns when positions are computed.
    #[regex(r"[ \t\r]+", logos::skip)]
    #[regex(r"//[^\n]*", logos::skip)]
    Ignored,
    /// Newlines are skipped after updating the line bookkeeping.
    #[token("\n", newline)]
    Newline,
    /// `/* block comments */`, which may nest.
    #[token("/*", block_comment)]
    BlockComment,
    /// A string opened but never closed on its line.
    #[regex(r#""[^"\n]*"#, unterminated_string)]
    #[regex(r"'[^'\n]*", unterminated_string)]
    UnterminatedStr,
}

/// Failure modes of the lexer state machine. The driver in [`lex`] attaches
/// positions and the offending character to produce a [`LexError`].
#[derive(Default, Debug, Clone, PartialEq)]
pub enum LexErrorKind {
    /// A character no rule recognizes.
    #[default]
    InvalidCharacter,
    /// A string literal interrupted by a newline or the end of input.
    UnterminatedString,
    /// A `/*` comment still open at the end of input.
    UnterminatedBlockComment,
}

/// Position bookkeeping carried by the lexer during tokenization.
#[derive(Default)]
pub struct LexerExtras {
    /// The current line number, starting at 1.
    pub line: usize,
    /// Byte offset of the first character of the current line.
    pub line_start: usize,
}

/// A lexical token: a [`TokenKind`] plus the matched source text and its
/// position.
///
/// For every token produced from source, `lexeme` is exactly the matched
/// slice; the decoded payload of string literals lives in the kind instead.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The token's tag (and literal payload, where applicable).
    pub kind: TokenKind,
    /// The source text this token was read from.
    pub lexeme: String,
    /// 1-based line of the first character of the lexeme.
    pub line: usize,
    /// 1-based column of the first character of the lexeme. Tabs earlier on
    /// the line count as three columns.
    pub column: usize,
}

impl Token {
    /// Creates a token from its parts. Used by the lexer driver and by the
    /// parser when it synthesizes tokens while desugaring loops.
    #[must_use]
    pub fn new(kind: TokenKind, lexeme: String, line: usize, column: usize) -> Self {
        Self {
            kind,
            lexeme,
            line,
            column,
        }
    }
}

/// Turns source text into a token sequence terminated by an `Eof` token.
///
/// Lexing is a single left-to-right pass. Whitespace and comments are
/// discarded; every other lexeme becomes a [`Token`] carrying its matched
/// text and position.
///
/// # Errors
/// Returns a [`LexError`] for an unrecognized character, a string literal
/// interrupted by a newline or the end of input, or a block comment still
/// open at the end of input.
///
/// # Example
/// ```
/// use scrawl::interpreter::lexer::{lex, TokenKind};
///
/// let tokens = lex("1 + 2").unwrap();
/// let kinds: Vec<_> = tokens.iter().map(|t| t.kind.clone()).collect();
/// assert_eq!(
///     kinds,
///     vec![
///         TokenKind::Number(1.0),
///         TokenKind::Plus,
///         TokenKind::Number(2.0),
///         TokenKind::Eof,
///     ]
/// );
/// ```
pub fn lex(source: &str) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer_with_extras(
        source,
        LexerExtras {
            line: 1,
            line_start: 0,
        },
    );

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let line = lexer.extras.line;
        match result {
            Ok(kind) => {
                let column = column_at(source, lexer.extras.line_start, span.start);
                tokens.push(Token::new(kind, source[span].to_string(), line, column));
            }
            Err(kind) => {
                // A multi-line failure (an unterminated block comment) is
                // anchored at the line where lexing stopped.
                let anchor = span.start.max(lexer.extras.line_start);
                let column = column_at(source, lexer.extras.line_start, anchor);
                return Err(match kind {
                    LexErrorKind::InvalidCharacter => LexError::InvalidCharacter {
                        character: source[span].chars().next().unwrap_or('\0'),
                        line,
                        column,
                    },
                    LexErrorKind::UnterminatedString => LexError::UnterminatedString { line, column },
                    LexErrorKind::UnterminatedBlockComment => {
                        LexError::UnterminatedBlockComment { line, column }
                    }
                });
            }
        }
    }

    let line = lexer.extras.line;
    let column = column_at(source, lexer.extras.line_start, source.len());
    tokens.push(Token::new(TokenKind::Eof, String::new(), line, column));
    Ok(tokens)
}

/// Computes the 1-based column of `offset`, counting from the start of its
/// line. A tab advances the column by three, every other character by one.
fn column_at(source: &str, line_start: usize, offset: usize) -> usize {
    1 + source[line_start..offset]
        .chars()
        .map(|c| if c == '\t' { 3 } else { 1 })
        .sum::<usize>()
}

/// Parses the matched slice as a double.
fn parse_number(lex: &logos::Lexer<TokenKind>) -> Option<f64> {
    lex.slice().parse().ok()
}

/// Strips the delimiters from a terminated string literal and expands the
/// only supported escape, `\n`.
fn decode_string(lex: &logos::Lexer<TokenKind>) -> String {
    let slice = lex.slice();
    slice[1..slice.len() - 1].replace("\\n", "\n")
}

fn unterminated_string(_lex: &mut logos::Lexer<TokenKind>) -> FilterResult<(), LexErrorKind> {
    FilterResult::Error(LexErrorKind::UnterminatedString)
}

/// Advances the line bookkeeping past a newline, then skips it.
fn newline(lex: &mut logos::Lexer<TokenKind>) -> Skip {
    lex.extras.line += 1;
    lex.extras.line_start = lex.span().end;
    Skip
}

/// Consumes a block comment, honoring nesting: each `/*` increments the
/// depth, each `*/` decrements it. Newlines inside the comment keep the line
/// bookkeeping current. Reaching the end of input before the comment closes
/// is a lex error.
fn block_comment(lex: &mut logos::Lexer<TokenKind>) -> FilterResult<(), LexErrorKind> {
    let bytes = lex.remainder().as_bytes();
    let opener_end = lex.span().end;
    let mut depth = 1usize;
    let mut i = 0usize;
    while i < bytes.len() {
        match bytes[i] {
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                depth += 1;
                i += 2;
            }
            b'*' if bytes.get(i + 1) == Some(&b'/') => {
                depth -= 1;
                i += 2;
                if depth == 0 {
                    break;
                }
            }
            b'\n' => {
                lex.extras.line += 1;
                lex.extras.line_start = opener_end + i + 1;
                i += 1;
            }
            _ => i += 1,
        }
    }
    lex.bump(i);
    if depth == 0 {
        FilterResult::Skip
    } else {
        FilterResult::Error(LexErrorKind::UnterminatedBlockComment)
    }
}
