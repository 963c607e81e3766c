use std::cell::RefCell;
use std::rc::Rc;

use crate::error::RuntimeError;
use crate::interpreter::evaluator::core::EvalResult;
use crate::interpreter::lexer::{Token, TokenKind};
use crate::interpreter::value::Value;

/// Applies a binary operator to two already-evaluated operands.
///
/// The operator table is type-closed:
/// - `+` adds numbers, concatenates lists, and stringifies-then-joins when
///   either side is a string.
/// - `-`, `*`, `/`, `%` are defined on numbers only; division follows
///   IEEE-754, so dividing by zero yields an infinity or NaN rather than an
///   error.
/// - `<`, `<=`, `>`, `>=` compare numbers only.
/// - `==`, `!=` use nil-aware structural equality over all types.
/// - `&`, `|` combine booleans; both operands have already been evaluated,
///   so there is no short-circuiting.
///
/// # Errors
/// Returns [`RuntimeError::InvalidBinaryOperands`] when the operand types do
/// not fit the operator.
pub fn eval_binary(op: &Token, left: Value, right: Value) -> EvalResult<Value> {
    match &op.kind {
        TokenKind::Plus => match (left, right) {
            (Value::Number(l), Value::Number(r)) => Ok(Value::Number(l + r)),
            (l, r) if matches!(l, Value::Str(_)) || matches!(r, Value::Str(_)) => {
                Ok(Value::Str(format!("{l}{r}")))
            }
            (Value::List(l), Value::List(r)) => {
                let mut items = l.borrow().clone();
                items.extend(r.borrow().iter().cloned());
                Ok(Value::List(Rc::new(RefCell::new(items))))
            }
            _ => Err(invalid_operands(op)),
        },
        TokenKind::Minus => numeric(op, left, right, |l, r| Value::Number(l - r)),
        TokenKind::Star => numeric(op, left, right, |l, r| Value::Number(l * r)),
        TokenKind::Slash => numeric(op, left, right, |l, r| Value::Number(l / r)),
        TokenKind::Percent => numeric(op, left, right, |l, r| Value::Number(l % r)),
        TokenKind::Less => numeric(op, left, right, |l, r| Value::Bool(l < r)),
        TokenKind::LessEqual => numeric(op, left, right, |l, r| Value::Bool(l <= r)),
        TokenKind::Greater => numeric(op, left, right, |l, r| Value::Bool(l > r)),
        TokenKind::GreaterEqual => numeric(op, left, right, |l, r| Value::Bool(l >= r)),
        TokenKind::EqualEqual => Ok(Value::Bool(left == right)),
        TokenKind::NotEqual => Ok(Value::Bool(left != right)),
        TokenKind::And => boolean(op, left, right, |l, r| l && r),
        TokenKind::Or => boolean(op, left, right, |l, r| l || r),
        _ => unreachable!("parser only builds binary nodes from operator tokens"),
    }
}

fn numeric(
    op: &Token,
    left: Value,
    right: Value,
    apply: impl FnOnce(f64, f64) -> Value,
) -> EvalResult<Value> {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => Ok(apply(l, r)),
        _ => Err(invalid_operands(op)),
    }
}

fn boolean(
    op: &Token,
    left: Value,
    right: Value,
    apply: impl FnOnce(bool, bool) -> bool,
) -> EvalResult<Value> {
    match (left, right) {
        (Value::Bool(l), Value::Bool(r)) => Ok(Value::Bool(apply(l, r))),
        _ => Err(invalid_operands(op)),
    }
}

fn invalid_operands(op: &Token) -> RuntimeError {
    RuntimeError::InvalidBinaryOperands {
        op: op.lexeme.clone(),
        token: op.clone(),
    }
}
