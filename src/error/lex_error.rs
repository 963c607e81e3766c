/// Represents all errors that can occur while turning source text into
/// tokens. Each variant carries the line and column the lexer had reached.
#[derive(Debug, Clone, PartialEq)]
pub enum LexError {
    /// A character no lexical rule recognizes.
    InvalidCharacter {
        /// The offending character.
        character: char,
        /// The source line where the error occurred.
        line: usize,
        /// The source column where the error occurred.
        column: usize,
    },
    /// A string literal interrupted by a newline or the end of input.
    UnterminatedString {
        /// The source line where the error occurred.
        line: usize,
        /// The source column where the error occurred.
        column: usize,
    },
    /// A `/*` comment still open at the end of input.
    UnterminatedBlockComment {
        /// The source line where lexing stopped.
        line: usize,
        /// The source column where lexing stopped.
        column: usize,
    },
}

impl LexError {
    /// The line and column this error points at.
    #[must_use]
    pub const fn position(&self) -> (usize, usize) {
        match self {
            Self::InvalidCharacter { line, column, .. }
            | Self::UnterminatedString { line, column }
            | Self::UnterminatedBlockComment { line, column } => (*line, *column),
        }
    }
}

impl std::fmt::Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCharacter { character, .. } => {
                write!(f, "Invalid Character: {character}")
            }
            Self::UnterminatedString { .. } => write!(f, "Unterminated string"),
            Self::UnterminatedBlockComment { .. } => write!(f, "Unterminated block comment"),
        }
    }
}

impl std::error::Error for LexError {}
