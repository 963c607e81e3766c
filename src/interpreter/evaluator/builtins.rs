use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::{Read, Write};
use std::rc::Rc;
use std::{fs, io};

use crate::error::RuntimeError;
use crate::interpreter::evaluator::callable::{Callable, Native, NativeFn};
use crate::interpreter::evaluator::core::{EvalResult, Interpreter};
use crate::interpreter::evaluator::env::Environment;
use crate::interpreter::lexer::Token;
use crate::interpreter::value::Value;

/// The language version reported by the global `VERSION` constant.
pub const VERSION: &str = "0.0.1";

/// Declares a static table of built-in natives.
///
/// Each entry gives the script-visible name, the arity, and the host
/// function implementing it. The tables are installed into environments by
/// [`globals`] and [`modules`].
macro_rules! native_table {
    ($table:ident: $( $name:literal / $arity:literal => $func:path ),* $(,)?) => {
        static $table: &[Native] = &[
            $( Native { name: $name, arity: $arity, func: $func as NativeFn }, )*
        ];
    };
}

native_table! { GLOBAL_NATIVES:
    "print" / 1 => print,
    "printRaw" / 1 => print_raw,
    "input" / 0 => input,
    "len" / 1 => len,
}

native_table! { IO_NATIVES:
    "write" / 2 => io_write,
    "append" / 2 => io_append,
    "read" / 1 => io_read,
}

native_table! { MATH_NATIVES:
    "sqrt" / 1 => math_sqrt,
    "pow" / 2 => math_pow,
    "exp" / 1 => math_exp,
    "sin" / 1 => math_sin,
    "cos" / 1 => math_cos,
    "tan" / 1 => math_tan,
    "log" / 1 => math_log,
}

/// Builds the global environment every interpreter instance starts from:
/// the core natives plus the `VERSION` constant.
#[must_use]
pub fn globals() -> Rc<Environment> {
    let env = Environment::new();
    install(&env, GLOBAL_NATIVES);
    env.define("VERSION", Value::from(VERSION));
    env
}

/// Builds the built-in importable modules: `os`, `io` and `math`.
///
/// These are constructed once per interpreter instance, so nested
/// interpreters created for imports each get a fresh world.
#[must_use]
pub fn modules() -> HashMap<String, Rc<Environment>> {
    let mut modules = HashMap::new();

    let os = Environment::new();
    os.define("name", Value::from(std::env::consts::OS));
    modules.insert("os".to_string(), os);

    let io_module = Environment::new();
    install(&io_module, IO_NATIVES);
    modules.insert("io".to_string(), io_module);

    let math = Environment::new();
    install(&math, MATH_NATIVES);
    math.define("pi", Value::Number(std::f64::consts::PI));
    math.define("e", Value::Number(std::f64::consts::E));
    modules.insert("math".to_string(), math);

    modules
}

fn install(env: &Environment, table: &'static [Native]) {
    for native in table {
        env.define(native.name, Value::Callable(Callable::Native(native)));
    }
}

fn print(interpreter: &mut Interpreter, args: &[Value], paren: &Token) -> EvalResult<Value> {
    writeln!(interpreter.out.borrow_mut(), "{}", args[0]).map_err(|e| io_error(&e, paren))?;
    Ok(Value::Nil)
}

fn print_raw(interpreter: &mut Interpreter, args: &[Value], paren: &Token) -> EvalResult<Value> {
    let mut out = interpreter.out.borrow_mut();
    write!(out, "{}", args[0]).map_err(|e| io_error(&e, paren))?;
    out.flush().map_err(|e| io_error(&e, paren))?;
    Ok(Value::Nil)
}

/// Reads one whitespace-delimited word from standard input. At end of input
/// the word collected so far (possibly empty) is returned.
fn input(_interpreter: &mut Interpreter, _args: &[Value], paren: &Token) -> EvalResult<Value> {
    let stdin = io::stdin();
    let mut handle = stdin.lock();
    let mut word = String::new();
    let mut byte = [0u8; 1];
    loop {
        match handle.read(&mut byte) {
            Ok(0) => break,
            Ok(_) => {
                let c = byte[0] as char;
                if c.is_ascii_whitespace() {
                    if word.is_empty() {
                        continue;
                    }
                    break;
                }
                word.push(c);
            }
            Err(e) => return Err(io_error(&e, paren)),
        }
    }
    Ok(Value::Str(word))
}

fn len(_interpreter: &mut Interpreter, args: &[Value], paren: &Token) -> EvalResult<Value> {
    match &args[0] {
        Value::List(items) => Ok(Value::Number(items.borrow().len() as f64)),
        Value::Str(s) => Ok(Value::Number(s.chars().count() as f64)),
        _ => Err(type_error("Expect a list", paren)),
    }
}

fn io_write(_interpreter: &mut Interpreter, args: &[Value], paren: &Token) -> EvalResult<Value> {
    let path = filename(&args[0], paren)?;
    let contents = file_contents(&args[1], paren)?;
    fs::write(path, contents).map_err(|e| io_error(&e, paren))?;
    Ok(Value::Nil)
}

fn io_append(_interpreter: &mut Interpreter, args: &[Value], paren: &Token) -> EvalResult<Value> {
    let path = filename(&args[0], paren)?;
    let contents = file_contents(&args[1], paren)?;
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| io_error(&e, paren))?;
    file.write_all(contents.as_bytes())
        .map_err(|e| io_error(&e, paren))?;
    Ok(Value::Nil)
}

fn io_read(_interpreter: &mut Interpreter, args: &[Value], paren: &Token) -> EvalResult<Value> {
    let path = filename(&args[0], paren)?;
    let contents = fs::read_to_string(path).map_err(|e| io_error(&e, paren))?;
    Ok(Value::Str(contents))
}

fn filename<'a>(value: &'a Value, paren: &Token) -> EvalResult<&'a str> {
    match value {
        Value::Str(s) => Ok(s),
        _ => Err(type_error("Filename must be a string", paren)),
    }
}

fn file_contents(value: &Value, paren: &Token) -> EvalResult<String> {
    match value {
        Value::Nil => Err(type_error("Cannot write nil to a file", paren)),
        other => Ok(other.to_string()),
    }
}

fn math_sqrt(_interpreter: &mut Interpreter, args: &[Value], paren: &Token) -> EvalResult<Value> {
    unary_math(args, paren, f64::sqrt)
}

fn math_pow(_interpreter: &mut Interpreter, args: &[Value], paren: &Token) -> EvalResult<Value> {
    match (&args[0], &args[1]) {
        (Value::Number(base), Value::Number(exp)) => Ok(Value::Number(base.powf(*exp))),
        _ => Err(type_error("Expect two numbers", paren)),
    }
}

fn math_exp(_interpreter: &mut Interpreter, args: &[Value], paren: &Token) -> EvalResult<Value> {
    unary_math(args, paren, f64::exp)
}

fn math_sin(_interpreter: &mut Interpreter, args: &[Value], paren: &Token) -> EvalResult<Value> {
    unary_math(args, paren, f64::sin)
}

fn math_cos(_interpreter: &mut Interpreter, args: &[Value], paren: &Token) -> EvalResult<Value> {
    unary_math(args, paren, f64::cos)
}

fn math_tan(_interpreter: &mut Interpreter, args: &[Value], paren: &Token) -> EvalResult<Value> {
    unary_math(args, paren, f64::tan)
}

fn math_log(_interpreter: &mut Interpreter, args: &[Value], paren: &Token) -> EvalResult<Value> {
    unary_math(args, paren, f64::ln)
}

fn unary_math(args: &[Value], paren: &Token, apply: fn(f64) -> f64) -> EvalResult<Value> {
    match &args[0] {
        Value::Number(n) => Ok(Value::Number(apply(*n))),
        _ => Err(type_error("Expect a number", paren)),
    }
}

fn type_error(details: &str, token: &Token) -> RuntimeError {
    RuntimeError::TypeError {
        details: details.to_string(),
        token: token.clone(),
    }
}

fn io_error(error: &io::Error, token: &Token) -> RuntimeError {
    RuntimeError::Io {
        message: error.to_string(),
        token: token.clone(),
    }
}
