use crate::interpreter::lexer::Token;

/// Represents all errors that can be raised while evaluating a program.
/// Each variant carries a representative token locating the failure in the
/// source.
#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeError {
    /// Read or wrote a variable no enclosing scope declares.
    UndefinedVariable {
        /// The name of the variable.
        name: String,
        /// The token naming the variable.
        token: Token,
    },
    /// Accessed a member of a module that was never imported.
    UndefinedModule {
        /// The name used as a module.
        name: String,
        /// The token naming the module.
        token: Token,
    },
    /// `import` found neither a sibling source file nor a built-in module.
    ImportNotFound {
        /// The requested module name.
        name: String,
        /// The module name token.
        token: Token,
    },
    /// A module imported itself, directly or through other modules.
    CircularImport {
        /// The module that closed the cycle.
        name: String,
        /// The module name token.
        token: Token,
    },
    /// Loading or running an imported module failed.
    ImportFailed {
        /// The module being imported.
        name: String,
        /// The rendered error from inside the module.
        message: String,
        /// The module name token of the `import` statement.
        token: Token,
    },
    /// A binary operator was applied to operand types it is not defined for.
    InvalidBinaryOperands {
        /// The operator as written.
        op: String,
        /// The operator token.
        token: Token,
    },
    /// A unary operator was applied to an operand type it is not defined for.
    InvalidUnaryOperand {
        /// The operator as written.
        op: String,
        /// The operator token.
        token: Token,
    },
    /// Called a value that is not a function.
    NotCallable {
        /// The call's opening parenthesis.
        token: Token,
    },
    /// Supplied more arguments than the callee's arity.
    IncorrectArgumentCount {
        /// The call's opening parenthesis.
        token: Token,
    },
    /// Indexed a value that is not a list.
    NotIndexable {
        /// A token locating the indexing expression.
        token: Token,
    },
    /// Used a non-numeric index.
    NonNumberIndex {
        /// A token locating the indexing expression.
        token: Token,
    },
    /// Indexed a list outside its bounds.
    IndexOutOfBounds {
        /// The index that was requested, after truncation.
        index: i64,
        /// The length of the list.
        length: usize,
        /// A token locating the indexing expression.
        token: Token,
    },
    /// A `break` reached the top of its call frame without an enclosing loop.
    BreakOutsideLoop {
        /// The `break` keyword token.
        token: Token,
    },
    /// A `continue` reached the top of its call frame without an enclosing
    /// loop.
    ContinueOutsideLoop {
        /// The `continue` keyword token.
        token: Token,
    },
    /// A `return` was evaluated outside any function body.
    ReturnOutsideFunction {
        /// The `return` keyword token.
        token: Token,
    },
    /// A built-in function received a value of the wrong type.
    TypeError {
        /// What the built-in expected.
        details: String,
        /// A token locating the call.
        token: Token,
    },
    /// The host reported an I/O failure.
    Io {
        /// The host error message.
        message: String,
        /// A token locating the operation.
        token: Token,
    },
}

impl RuntimeError {
    /// The token this error is anchored at.
    #[must_use]
    pub const fn token(&self) -> &Token {
        match self {
            Self::UndefinedVariable { token, .. }
            | Self::UndefinedModule { token, .. }
            | Self::ImportNotFound { token, .. }
            | Self::CircularImport { token, .. }
            | Self::ImportFailed { token, .. }
            | Self::InvalidBinaryOperands { token, .. }
            | Self::InvalidUnaryOperand { token, .. }
            | Self::NotCallable { token }
            | Self::IncorrectArgumentCount { token }
            | Self::NotIndexable { token }
            | Self::NonNumberIndex { token }
            | Self::IndexOutOfBounds { token, .. }
            | Self::BreakOutsideLoop { token }
            | Self::ContinueOutsideLoop { token }
            | Self::ReturnOutsideFunction { token }
            | Self::TypeError { token, .. }
            | Self::Io { token, .. } => token,
        }
    }

    /// The line and column this error points at.
    #[must_use]
    pub const fn position(&self) -> (usize, usize) {
        let token = self.token();
        (token.line, token.column)
    }
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UndefinedVariable { name, .. } => write!(f, "Undefined variable '{name}'"),
            Self::UndefinedModule { .. } => write!(f, "Undefined or un-imported module"),
            Self::ImportNotFound { .. } => write!(f, "Could not find import"),
            Self::CircularImport { name, .. } => write!(f, "Circular import of '{name}'"),
            Self::ImportFailed { name, message, .. } => {
                write!(f, "Import of '{name}' failed: {message}")
            }
            Self::InvalidBinaryOperands { op, .. } => write!(f, "Invalid types for '{op}'"),
            Self::InvalidUnaryOperand { op, .. } => write!(f, "Invalid type for '{op}'"),
            Self::NotCallable { .. } => write!(f, "Cannot call non-function"),
            Self::IncorrectArgumentCount { .. } => write!(f, "Incorrect argument count"),
            Self::NotIndexable { .. } => write!(f, "Cannot index a non-iterable"),
            Self::NonNumberIndex { .. } => write!(f, "Cannot index with a non-number"),
            Self::IndexOutOfBounds { index, length, .. } => {
                write!(f, "Index out of bounds: {index} (length {length})")
            }
            Self::BreakOutsideLoop { .. } => write!(f, "Can't break outside a loop"),
            Self::ContinueOutsideLoop { .. } => write!(f, "Can't continue outside a loop"),
            Self::ReturnOutsideFunction { .. } => write!(f, "Can't return outside a function"),
            Self::TypeError { details, .. } => write!(f, "{details}"),
            Self::Io { message, .. } => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for RuntimeError {}
