use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::RuntimeError;
use crate::interpreter::evaluator::core::EvalResult;
use crate::interpreter::lexer::Token;
use crate::interpreter::value::Value;

/// A collection of named variables with an optional enclosing scope.
///
/// Lookups and assignments walk the chain of enclosing scopes; declarations
/// only ever touch the current scope. Environments are shared through `Rc`
/// so block scopes, call frames and module environments can all point at the
/// same globals.
#[derive(Debug)]
pub struct Environment {
    values: RefCell<HashMap<String, Value>>,
    enclosing: Option<Rc<Environment>>,
}

impl Environment {
    /// Creates a root scope with no enclosing environment.
    #[must_use]
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            values: RefCell::new(HashMap::new()),
            enclosing: None,
        })
    }

    /// Creates a scope nested inside `enclosing`.
    #[must_use]
    pub fn with_enclosing(enclosing: Rc<Environment>) -> Rc<Self> {
        Rc::new(Self {
            values: RefCell::new(HashMap::new()),
            enclosing: Some(enclosing),
        })
    }

    /// Declares `name` in this scope, initializing the slot to `nil`.
    /// Re-declaring an existing name resets it.
    pub fn declare(&self, name: &str) {
        self.values.borrow_mut().insert(name.to_string(), Value::Nil);
    }

    /// Declares `name` in this scope and binds it to `value` in one step.
    pub fn define(&self, name: &str, value: Value) {
        self.values.borrow_mut().insert(name.to_string(), value);
    }

    /// Reads `name`, walking enclosing scopes.
    ///
    /// # Errors
    /// Returns [`RuntimeError::UndefinedVariable`] when no scope in the
    /// chain declares `name`.
    pub fn get(&self, name: &str, location: &Token) -> EvalResult<Value> {
        if let Some(value) = self.values.borrow().get(name) {
            return Ok(value.clone());
        }
        match &self.enclosing {
            Some(enclosing) => enclosing.get(name, location),
            None => Err(RuntimeError::UndefinedVariable {
                name: name.to_string(),
                token: location.clone(),
            }),
        }
    }

    /// Writes `name` at the innermost scope that already declares it.
    ///
    /// # Errors
    /// Returns [`RuntimeError::UndefinedVariable`] when no scope in the
    /// chain declares `name`.
    pub fn assign(&self, name: &str, value: Value, location: &Token) -> EvalResult<()> {
        let mut values = self.values.borrow_mut();
        if values.contains_key(name) {
            values.insert(name.to_string(), value);
            return Ok(());
        }
        drop(values);
        match &self.enclosing {
            Some(enclosing) => enclosing.assign(name, value, location),
            None => Err(RuntimeError::UndefinedVariable {
                name: name.to_string(),
                token: location.clone(),
            }),
        }
    }
}
