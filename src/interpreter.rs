/// The lexer module tokenizes source code for parsing.
///
/// A single left-to-right pass turns the raw source text into a stream of
/// positioned tokens, handling string literals with two delimiters, nested
/// block comments, and the language's column-counting rules.
pub mod lexer;

/// The parser module builds the abstract syntax tree from tokens.
///
/// A recursive-descent parser over a peekable token cursor. Beyond plain
/// parsing it performs the language's desugarings, lowering `fn`, `loop`,
/// `for` and `for`-`in` to simpler constructs during the same pass.
pub mod parser;

/// The value module defines the runtime data types.
///
/// Declares the `Value` enum covering numbers, booleans, strings, shared
/// mutable lists, callables and `nil`, along with truthiness, structural
/// equality and the user-facing stringification.
pub mod value;

/// The evaluator module executes parsed programs.
///
/// A tree-walking evaluator with lexically scoped environments, non-local
/// control transfer for `return`/`break`/`continue`, automatic currying of
/// under-applied calls, and import-time evaluation of sibling source files.
pub mod evaluator;
