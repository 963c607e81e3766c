//! # scrawl
//!
//! scrawl is a small dynamically-typed scripting language: a lexer, a
//! recursive-descent parser with syntactic desugaring, and a tree-walking
//! evaluator with lexical scoping, first-class functions with automatic
//! currying, and a simple module system.
//!
//! ```text
//! fn add(a, b) {
//!     return a + b;
//! }
//!
//! var inc = add(1);      // under-application curries
//! print(inc(41));        // 42
//! ```

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::large_enum_variant,
    clippy::match_same_arms,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity
)]
#![allow(clippy::missing_errors_doc)]

use crate::interpreter::evaluator::core::Interpreter;

/// Defines the structure of parsed code.
///
/// This module declares the `Expr` and `Stmt` sum types that represent the
/// syntactic structure of source code as a tree. The AST is built by the
/// parser and walked by the evaluator; nodes keep their source tokens so
/// errors can point back into the program.
pub mod ast;
/// Renders human-readable error reports.
///
/// Formats any failure against its source text: a banner, the surrounding
/// lines, and a caret under the offending column.
pub mod diagnostics;
/// Provides unified error types for every phase.
///
/// Defines the lex, parse and runtime error enums, each carrying position
/// information, plus the top-level `Error` sum the driver and the library
/// entry points report.
pub mod error;
/// Orchestrates the entire process of running a script.
///
/// Ties together the lexer, parser, value model and evaluator, and exposes
/// the interpreter state used for evaluation and imports.
pub mod interpreter;

pub use error::Error;

/// Lexes, parses and runs a whole program, printing to standard output.
///
/// This is the library's main entry point; the command-line driver is a
/// thin wrapper around it. Each call runs in a fresh interpreter instance
/// with its own globals and imports.
///
/// # Errors
/// Returns the first error from any phase, with its source position.
///
/// # Example
/// ```
/// // A well-formed program runs to completion.
/// assert!(scrawl::run_source("var x = 1 + 2;").is_ok());
///
/// // A missing semicolon is a parse error.
/// assert!(scrawl::run_source("var x = 1").is_err());
/// ```
pub fn run_source(source: &str) -> Result<(), Error> {
    let tokens = interpreter::lexer::lex(source)?;
    let statements = interpreter::parser::core::parse_program(&tokens)?;
    Interpreter::new().run(&statements)?;
    Ok(())
}
