use std::rc::Rc;

use crate::ast::FnDecl;
use crate::error::RuntimeError;
use crate::interpreter::evaluator::core::{EvalResult, Interpreter, Outcome};
use crate::interpreter::evaluator::env::Environment;
use crate::interpreter::lexer::Token;
use crate::interpreter::value::Value;

/// The signature shared by all built-in native functions.
///
/// A native receives the running interpreter (for its output sink), the
/// evaluated arguments, and the call's parenthesis token for error
/// reporting.
pub type NativeFn = fn(&mut Interpreter, &[Value], &Token) -> EvalResult<Value>;

/// A host-provided function with a fixed arity.
#[derive(Debug)]
pub struct Native {
    /// The name the native is bound to.
    pub name: &'static str,
    /// The number of arguments the native requires.
    pub arity: usize,
    /// The host implementation.
    pub func: NativeFn,
}

/// A partial application: a parent callable plus the arguments bound so far.
/// Its arity is whatever the parent still needs.
#[derive(Debug)]
pub struct CurriedFn {
    /// The callable being curried.
    pub parent: Callable,
    /// Arguments already supplied, in order.
    pub bound: Vec<Value>,
}

/// Anything a call expression can invoke: a user-defined function, a curried
/// partial application, or a built-in native.
///
/// All three share one contract: an arity, and a `call` that consumes
/// exactly that many arguments. `call_curried` layers automatic currying on
/// top: supplying fewer arguments than the arity produces a new callable
/// awaiting the rest.
#[derive(Debug, Clone)]
pub enum Callable {
    /// A function declared in source with `fn`.
    Function(Rc<FnDecl>),
    /// A partial application produced by an under-applied call.
    Curried(Rc<CurriedFn>),
    /// A built-in native function.
    Native(&'static Native),
}

impl Callable {
    /// The number of arguments this callable still requires.
    #[must_use]
    pub fn arity(&self) -> usize {
        match self {
            Self::Function(decl) => decl.params.len(),
            Self::Curried(curried) => curried.parent.arity() - curried.bound.len(),
            Self::Native(native) => native.arity,
        }
    }

    /// Invokes this callable with exactly `arity()` arguments.
    ///
    /// A user function runs its body in a fresh scope parented to the
    /// interpreter's globals, never to the scope it was declared in: free
    /// variables other than globals and imports are deliberately not
    /// captured. The function's own name is bound inside that scope so it
    /// can recurse.
    ///
    /// # Errors
    /// Propagates any runtime error from the body, and converts a `break` or
    /// `continue` that escapes the body into the corresponding control-flow
    /// error.
    pub fn call(
        &self,
        interpreter: &mut Interpreter,
        args: &[Value],
        paren: &Token,
    ) -> EvalResult<Value> {
        match self {
            Self::Function(decl) => {
                let scope = Environment::with_enclosing(interpreter.globals());
                for (param, value) in decl.params.iter().zip(args) {
                    scope.define(param, value.clone());
                }
                scope.define(&decl.name.lexeme, Value::Callable(self.clone()));
                match interpreter.exec_block(&decl.body, &scope)? {
                    Outcome::Return { value, .. } => Ok(value),
                    Outcome::Normal => Ok(Value::Nil),
                    Outcome::Break(token) => Err(RuntimeError::BreakOutsideLoop { token }),
                    Outcome::Continue(token) => Err(RuntimeError::ContinueOutsideLoop { token }),
                }
            }
            Self::Curried(curried) => {
                let mut full = curried.bound.clone();
                full.extend_from_slice(args);
                curried.parent.call(interpreter, &full, paren)
            }
            Self::Native(native) => (native.func)(interpreter, args, paren),
        }
    }

    /// Invokes this callable, currying on under-application.
    ///
    /// With exactly `arity()` arguments the callable is invoked directly;
    /// with fewer, the result is a new callable binding the supplied
    /// arguments and awaiting the rest. Over-application is rejected by the
    /// evaluator before this point.
    ///
    /// # Errors
    /// Propagates any error from the underlying `call`.
    pub fn call_curried(
        &self,
        interpreter: &mut Interpreter,
        args: &[Value],
        paren: &Token,
    ) -> EvalResult<Value> {
        if args.len() == self.arity() {
            self.call(interpreter, args, paren)
        } else {
            Ok(Value::Callable(Self::Curried(Rc::new(CurriedFn {
                parent: self.clone(),
                bound: args.to_vec(),
            }))))
        }
    }
}

/// Callables compare by identity: two references to the same function are
/// equal, two separate declarations never are.
impl PartialEq for Callable {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Function(l), Self::Function(r)) => Rc::ptr_eq(l, r),
            (Self::Curried(l), Self::Curried(r)) => Rc::ptr_eq(l, r),
            (Self::Native(l), Self::Native(r)) => std::ptr::eq(*l, *r),
            _ => false,
        }
    }
}

impl std::fmt::Display for Callable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Function(decl) => {
                write!(f, "fn {}({})", decl.name.lexeme, decl.params.join(", "))
            }
            Self::Curried(curried) => write!(f, "{}", curried.parent),
            Self::Native(native) => write!(f, "<native fn {}>", native.name),
        }
    }
}
