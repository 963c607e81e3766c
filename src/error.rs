/// Lexing errors.
///
/// Defines the error type raised while turning source text into tokens:
/// invalid characters, unterminated strings and unterminated block comments,
/// each with a source position.
pub mod lex_error;
/// Parsing errors.
///
/// Defines the error type raised by the recursive-descent parser: unexpected
/// tokens, missing terminators and malformed constructs, each anchored at
/// the offending token.
pub mod parse_error;
/// Runtime errors.
///
/// Contains all error types that can be raised during evaluation: undefined
/// variables, operator type mismatches, bad calls and indexing, import
/// failures and control-flow escapes.
pub mod runtime_error;

pub use lex_error::LexError;
pub use parse_error::ParseError;
pub use runtime_error::RuntimeError;

/// Any failure a script can produce, from lexing through evaluation.
///
/// The driver treats the three phases uniformly: every variant knows its
/// source position and renders a one-line message, which the diagnostic
/// printer combines with a source snippet.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// The source text could not be tokenized.
    Lex(LexError),
    /// The token stream could not be parsed.
    Parse(ParseError),
    /// Evaluation failed.
    Runtime(RuntimeError),
}

impl Error {
    /// The line and column this error points at.
    #[must_use]
    pub fn position(&self) -> (usize, usize) {
        match self {
            Self::Lex(e) => e.position(),
            Self::Parse(e) => e.position(),
            Self::Runtime(e) => e.position(),
        }
    }

    /// The bare message, without position context.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Lex(e) => e.to_string(),
            Self::Parse(e) => e.to_string(),
            Self::Runtime(e) => e.to_string(),
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (line, column) = self.position();
        write!(f, "Error on line {line}, column {column}: {}", self.message())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Lex(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Runtime(e) => Some(e),
        }
    }
}

impl From<LexError> for Error {
    fn from(e: LexError) -> Self {
        Self::Lex(e)
    }
}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Self::Parse(e)
    }
}

impl From<RuntimeError> for Error {
    fn from(e: RuntimeError) -> Self {
        Self::Runtime(e)
    }
}
