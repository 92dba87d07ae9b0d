//! The evaluator boundary.
//!
//! Shell nodes never resolve variables or spawn processes themselves. They
//! ask a [`ShellExecutor`], which the surrounding make evaluator implements.

use mk_ir::{Expr, Value};
use mk_scan::{trim_space, words};

use crate::errors::EvalResult;


/// Services a shell node needs from the evaluator.
pub trait ShellExecutor {
    /// Append the text of a variable reference, parameter or call to `out`.
    ///
    /// Literal segments never reach this method.
    fn resolve(&mut self, value: &Value, out: &mut String) -> EvalResult;

    /// Run `script` with the shell and append its output the way `$(shell)`
    /// reports it.
    fn run_shell(&mut self, script: &str, out: &mut String) -> EvalResult;
}

/// Append the text of any segment.
pub fn resolve_into(exec: &mut dyn ShellExecutor, value: &Value, out: &mut String) -> EvalResult {
    match value {
        Value::Literal(text) => {
            out.push_str(text);
            Ok(())
        }
        _ => exec.resolve(value, out),
    }
}

/// Resolve the concatenation of `values`.
pub fn resolve_concat(exec: &mut dyn ShellExecutor, values: &[Value]) -> EvalResult<String> {
    let mut text = String::new();
    for value in values {
        resolve_into(exec, value, &mut text)?;
    }
    Ok(text)
}

/// Resolve a value expected to hold a single path, without outer whitespace.
pub fn resolve_trimmed(exec: &mut dyn ShellExecutor, value: &Value) -> EvalResult<String> {
    let text = resolve_concat(exec, std::slice::from_ref(value))?;
    Ok(trim_space(&text).to_string())
}

/// Resolve a value holding a whitespace-separated list.
pub fn resolve_words(exec: &mut dyn ShellExecutor, value: &Value) -> EvalResult<Vec<String>> {
    let text = resolve_concat(exec, std::slice::from_ref(value))?;
    Ok(words(&text).map(str::to_string).collect())
}

/// The original `$(shell ...)` invocation.
///
/// Every specialized node keeps one so it can always run the real command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShellCall {
    command: Expr,
}

impl ShellCall {
    pub fn new(command: Expr) -> Self {
        ShellCall { command }
    }

    pub fn command(&self) -> &Expr {
        &self.command
    }

    /// Resolve the command text and execute it literally.
    pub fn eval(&self, out: &mut String, exec: &mut dyn ShellExecutor) -> EvalResult {
        let script = resolve_concat(exec, self.command.segments())?;
        exec.run_shell(&script, out)
    }
}
