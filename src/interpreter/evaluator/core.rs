use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{self, Write};
use std::rc::Rc;

use crate::ast::{Expr, LiteralValue, Stmt};
use crate::error::RuntimeError;
use crate::interpreter::evaluator::binary::eval_binary;
use crate::interpreter::evaluator::builtins;
use crate::interpreter::evaluator::callable::Callable;
use crate::interpreter::evaluator::env::Environment;
use crate::interpreter::lexer::{Token, TokenKind};
use crate::interpreter::value::Value;

/// Result type used by the evaluator.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// How a statement finished.
///
/// `return`, `break` and `continue` are not errors; they are control
/// transfers carried through the evaluator's ordinary result channel.
/// Every construct either consumes the signal it handles (loops consume
/// `Break` and `Continue`, call frames consume `Return`) or forwards it
/// outward unchanged.
#[derive(Debug)]
pub enum Outcome {
    /// The statement ran to completion.
    Normal,
    /// A `break` is looking for its enclosing loop.
    Break(Token),
    /// A `continue` is looking for its enclosing loop.
    Continue(Token),
    /// A `return` is looking for its call frame.
    Return {
        /// The returned value.
        value: Value,
        /// The `return` keyword, for error reporting if the signal escapes.
        keyword: Token,
    },
}

/// A tree-walking evaluator for parsed programs.
///
/// Each interpreter instance owns a fresh global environment populated with
/// the built-in natives, a table of built-in importable modules, and a map
/// of the modules imported so far. The top-level scope of the program is a
/// child of the globals.
///
/// Program output (from `print` and `printRaw`) goes to a shared sink,
/// standard output by default; [`Interpreter::with_output`] substitutes any
/// writer, which tests use to capture output and imports use to share the
/// importer's sink.
pub struct Interpreter {
    globals: Rc<Environment>,
    environment: Rc<Environment>,
    pub(crate) imports: HashMap<String, Rc<Environment>>,
    pub(crate) builtin_modules: HashMap<String, Rc<Environment>>,
    pub(crate) out: Rc<RefCell<dyn Write>>,
    pub(crate) import_stack: Rc<RefCell<Vec<String>>>,
}

impl Interpreter {
    /// Creates an interpreter printing to standard output.
    #[must_use]
    pub fn new() -> Self {
        Self::with_output(Rc::new(RefCell::new(io::stdout())))
    }

    /// Creates an interpreter printing to `out`.
    #[must_use]
    pub fn with_output(out: Rc<RefCell<dyn Write>>) -> Self {
        let globals = builtins::globals();
        let environment = Environment::with_enclosing(globals.clone());
        Self {
            globals,
            environment,
            imports: HashMap::new(),
            builtin_modules: builtins::modules(),
            out,
            import_stack: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Creates the fresh interpreter a module runs in: its own world, but
    /// sharing the importer's output sink and import-in-progress stack.
    pub(crate) fn for_import(
        out: Rc<RefCell<dyn Write>>,
        import_stack: Rc<RefCell<Vec<String>>>,
    ) -> Self {
        let mut interpreter = Self::with_output(out);
        interpreter.import_stack = import_stack;
        interpreter
    }

    /// The global environment of this interpreter instance.
    #[must_use]
    pub fn globals(&self) -> Rc<Environment> {
        self.globals.clone()
    }

    /// The program's top-level environment. After a module has run, this is
    /// the environment its members are read from.
    #[must_use]
    pub fn environment(&self) -> Rc<Environment> {
        self.environment.clone()
    }

    /// Runs a parsed program to completion in the top-level scope.
    ///
    /// # Errors
    /// Propagates the first runtime error. A control-flow signal that
    /// reaches the top level is itself an error: there is no loop to break
    /// out of and no function to return from.
    pub fn run(&mut self, statements: &[Stmt]) -> Result<(), RuntimeError> {
        let env = self.environment.clone();
        for statement in statements {
            match self.exec_stmt(statement, &env)? {
                Outcome::Normal => {}
                Outcome::Break(token) => {
                    return Err(RuntimeError::BreakOutsideLoop { token });
                }
                Outcome::Continue(token) => {
                    return Err(RuntimeError::ContinueOutsideLoop { token });
                }
                Outcome::Return { keyword, .. } => {
                    return Err(RuntimeError::ReturnOutsideFunction { token: keyword });
                }
            }
        }
        Ok(())
    }

    /// Runs `statements` in a new scope nested inside `env`. The scope is
    /// discarded on every exit path, including errors and control signals.
    pub(crate) fn exec_block(
        &mut self,
        statements: &[Stmt],
        env: &Rc<Environment>,
    ) -> EvalResult<Outcome> {
        let scope = Environment::with_enclosing(env.clone());
        for statement in statements {
            match self.exec_stmt(statement, &scope)? {
                Outcome::Normal => {}
                signal => return Ok(signal),
            }
        }
        Ok(Outcome::Normal)
    }

    /// Executes a single statement in `env`.
    fn exec_stmt(&mut self, statement: &Stmt, env: &Rc<Environment>) -> EvalResult<Outcome> {
        match statement {
            Stmt::Block(statements) => self.exec_block(statements, env),
            Stmt::Expression { expr } => {
                self.eval_expr(expr, env)?;
                Ok(Outcome::Normal)
            }
            Stmt::Var { name, initializer } => {
                // The name is declared before the initializer runs, so an
                // initializer mentioning the name sees the fresh nil slot.
                env.declare(&name.lexeme);
                if let Some(initializer) = initializer {
                    let value = self.eval_expr(initializer, env)?;
                    env.assign(&name.lexeme, value, name)?;
                }
                Ok(Outcome::Normal)
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                if self.eval_expr(condition, env)?.is_truthy() {
                    self.exec_block(then_branch, env)
                } else {
                    self.exec_block(else_branch, env)
                }
            }
            Stmt::While {
                condition, body, ..
            } => {
                while self.eval_expr(condition, env)?.is_truthy() {
                    match self.exec_block(body, env)? {
                        Outcome::Normal | Outcome::Continue(_) => {}
                        Outcome::Break(_) => break,
                        signal @ Outcome::Return { .. } => return Ok(signal),
                    }
                }
                Ok(Outcome::Normal)
            }
            Stmt::Return { keyword, value } => {
                let value = match value {
                    Some(expr) => self.eval_expr(expr, env)?,
                    None => Value::Nil,
                };
                Ok(Outcome::Return {
                    value,
                    keyword: keyword.clone(),
                })
            }
            Stmt::Break { keyword } => Ok(Outcome::Break(keyword.clone())),
            Stmt::Continue { keyword } => Ok(Outcome::Continue(keyword.clone())),
            Stmt::Import { name } => {
                self.exec_import(name)?;
                Ok(Outcome::Normal)
            }
        }
    }

    /// Evaluates an expression in `env`.
    pub(crate) fn eval_expr(&mut self, expr: &Expr, env: &Rc<Environment>) -> EvalResult<Value> {
        match expr {
            Expr::Literal { value } => Ok(Self::literal_value(value)),
            Expr::GetVar { name } => env.get(&name.lexeme, name),
            Expr::Assign { name, value } => {
                let value = self.eval_expr(value, env)?;
                env.assign(&name.lexeme, value, name)?;
                // An assignment is a statement-shaped expression; its result
                // is nil, not the assigned value.
                Ok(Value::Nil)
            }
            Expr::AssignIndex { name, index, value } => {
                let target = env.get(&name.lexeme, name)?;
                let Value::List(items) = target else {
                    return Err(RuntimeError::NotIndexable {
                        token: name.clone(),
                    });
                };
                let index = self.eval_expr(index, env)?;
                let Value::Number(index) = index else {
                    return Err(RuntimeError::NonNumberIndex {
                        token: name.clone(),
                    });
                };
                let value = self.eval_expr(value, env)?;
                let slot = index as i64;
                let mut elements = items.borrow_mut();
                let length = elements.len();
                match usize::try_from(slot).ok().filter(|i| *i < length) {
                    Some(i) => elements[i] = value,
                    None => {
                        return Err(RuntimeError::IndexOutOfBounds {
                            index: slot,
                            length,
                            token: name.clone(),
                        });
                    }
                }
                drop(elements);
                Ok(Value::List(items))
            }
            Expr::Binary { left, op, right } => {
                let left = self.eval_expr(left, env)?;
                let right = self.eval_expr(right, env)?;
                eval_binary(op, left, right)
            }
            Expr::Unary { op, operand } => {
                let operand = self.eval_expr(operand, env)?;
                match (&op.kind, operand) {
                    (TokenKind::Minus, Value::Number(n)) => Ok(Value::Number(-n)),
                    (TokenKind::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
                    _ => Err(RuntimeError::InvalidUnaryOperand {
                        op: op.lexeme.clone(),
                        token: op.clone(),
                    }),
                }
            }
            Expr::Grouping { inner } => self.eval_expr(inner, env),
            Expr::Call {
                callee,
                args,
                paren,
            } => {
                let callee = self.eval_expr(callee, env)?;
                let Value::Callable(callable) = callee else {
                    return Err(RuntimeError::NotCallable {
                        token: paren.clone(),
                    });
                };
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    values.push(self.eval_expr(arg, env)?);
                }
                if values.len() > callable.arity() {
                    return Err(RuntimeError::IncorrectArgumentCount {
                        token: paren.clone(),
                    });
                }
                callable.call_curried(self, &values, paren)
            }
            Expr::Index {
                index,
                indexee,
                bracket,
            } => {
                let index = self.eval_expr(index, env)?;
                let indexee = self.eval_expr(indexee, env)?;
                let Value::List(items) = indexee else {
                    return Err(RuntimeError::NotIndexable {
                        token: bracket.clone(),
                    });
                };
                let Value::Number(index) = index else {
                    return Err(RuntimeError::NonNumberIndex {
                        token: bracket.clone(),
                    });
                };
                let slot = index as i64;
                let elements = items.borrow();
                usize::try_from(slot)
                    .ok()
                    .and_then(|i| elements.get(i).cloned())
                    .ok_or_else(|| RuntimeError::IndexOutOfBounds {
                        index: slot,
                        length: elements.len(),
                        token: bracket.clone(),
                    })
            }
            Expr::List { items } => {
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    values.push(self.eval_expr(item, env)?);
                }
                Ok(Value::from(values))
            }
            Expr::ImportAccess { module, member } => match self.imports.get(&module.lexeme) {
                Some(module_env) => module_env.get(&member.lexeme, member),
                None => Err(RuntimeError::UndefinedModule {
                    name: module.lexeme.clone(),
                    token: module.clone(),
                }),
            },
        }
    }

    /// Materializes a literal syntax node as a runtime value.
    fn literal_value(literal: &LiteralValue) -> Value {
        match literal {
            LiteralValue::Nil => Value::Nil,
            LiteralValue::Number(n) => Value::Number(*n),
            LiteralValue::Bool(b) => Value::Bool(*b),
            LiteralValue::Str(s) => Value::Str(s.clone()),
            LiteralValue::Function(decl) => {
                Value::Callable(Callable::Function(Rc::new(decl.clone())))
            }
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
