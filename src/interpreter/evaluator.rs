/// Core evaluation logic and interpreter state.
///
/// Contains the `Interpreter`, the statement and expression walkers, and the
/// `Outcome` channel that carries `return`, `break` and `continue` signals
/// through ordinary results instead of unwinding.
pub mod core;

/// Lexically scoped environments.
///
/// The chained scope map with declare/get/assign used for globals, block
/// scopes, call frames and module environments.
pub mod env;

/// Binary operator evaluation.
///
/// The type-closed operator table: arithmetic, comparison, structural
/// equality and the non-short-circuiting logical operators.
pub mod binary;

/// The callable abstraction.
///
/// One contract for user-defined functions, curried partial applications
/// and built-in natives, including the automatic-currying call path.
pub mod callable;

/// Built-in natives and modules.
///
/// The global natives (`print`, `printRaw`, `input`, `len`, `VERSION`) and
/// the importable `os`, `io` and `math` modules.
pub mod builtins;

/// The import subsystem.
///
/// Resolves `import name;` against sibling `.scr` files and built-in
/// modules, running user modules in fresh interpreter instances.
pub mod import;
