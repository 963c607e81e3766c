use std::fs;
use std::path::Path;

use crate::error::{Error, RuntimeError};
use crate::interpreter::evaluator::core::{EvalResult, Interpreter};
use crate::interpreter::lexer::{lex, Token};
use crate::interpreter::parser::core::parse_program;

impl Interpreter {
    /// Executes an `import name;` statement.
    ///
    /// Resolution order:
    /// 1. A sibling file `name.scr`, relative to the process working
    ///    directory. The file is lexed, parsed and run in a fresh
    ///    interpreter with its own globals; the resulting top-level
    ///    environment is recorded under `name` for later `name.member`
    ///    accesses.
    /// 2. A built-in module (`os`, `io`, `math`).
    ///
    /// Module environments are independent: a user module shares no scope
    /// with its importer, only the output sink.
    ///
    /// # Errors
    /// - [`RuntimeError::CircularImport`] when the module is already being
    ///   imported somewhere up the chain.
    /// - [`RuntimeError::ImportFailed`] when the module fails to load, lex,
    ///   parse or run; the inner error is rendered into the message and the
    ///   failure is anchored at the `import` statement.
    /// - [`RuntimeError::ImportNotFound`] when neither a sibling file nor a
    ///   built-in module matches.
    pub(crate) fn exec_import(&mut self, name: &Token) -> EvalResult<()> {
        let module = name.lexeme.clone();
        let filename = format!("{module}.scr");
        if Path::new(&filename).exists() {
            if self.import_stack.borrow().iter().any(|m| *m == module) {
                return Err(RuntimeError::CircularImport {
                    name: module,
                    token: name.clone(),
                });
            }
            let source = fs::read_to_string(&filename).map_err(|e| RuntimeError::Io {
                message: e.to_string(),
                token: name.clone(),
            })?;

            let tokens = lex(&source).map_err(|e| import_failed(&module, &e.into(), name))?;
            let statements =
                parse_program(&tokens).map_err(|e| import_failed(&module, &e.into(), name))?;

            let mut interpreter =
                Interpreter::for_import(self.out.clone(), self.import_stack.clone());
            self.import_stack.borrow_mut().push(module.clone());
            let result = interpreter.run(&statements);
            self.import_stack.borrow_mut().pop();
            result.map_err(|e| import_failed(&module, &e.into(), name))?;

            self.imports.insert(module, interpreter.environment());
        } else if let Some(env) = self.builtin_modules.get(&module) {
            self.imports.insert(module, env.clone());
        } else {
            return Err(RuntimeError::ImportNotFound {
                name: module,
                token: name.clone(),
            });
        }
        Ok(())
    }
}

fn import_failed(module: &str, error: &Error, token: &Token) -> RuntimeError {
    RuntimeError::ImportFailed {
        name: module.to_string(),
        message: error.to_string(),
        token: token.clone(),
    }
}
