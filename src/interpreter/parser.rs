/// Core parsing entry points and shared definitions.
///
/// Declares the parse result and token stream types and exposes
/// `parse_program` and `parse_expression`, the two entry points the rest of
/// the crate uses.
pub mod core;

/// Statement parsing.
///
/// Dispatches on the leading token to parse each statement form, and
/// performs the syntactic desugarings: `fn` declarations become variable
/// bindings, `loop` becomes `while true`, and both `for` forms become
/// block-wrapped `while` loops.
pub mod statement;

/// Binary expression parsing.
///
/// Implements the operator precedence ladder, from logical OR at the bottom
/// to multiplication at the top. All levels are left-associative.
pub mod binary;

/// Unary, postfix and primary expression parsing.
///
/// Handles the prefix operators, the indexing postfix (including element
/// assignment), literals, groupings, list literals, and everything an
/// identifier can start: reads, assignments, module accesses and calls.
pub mod unary;

/// Utility functions shared by the parsing modules.
///
/// Token-stream helpers: expecting a specific token, parsing identifiers,
/// and parsing comma-separated lists.
pub mod utils;
