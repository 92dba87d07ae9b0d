//! Error types for shell node evaluation and configuration.
//!
//! Falling back to the original command is not an error and never shows up
//! here. An `EvalError` means the surrounding evaluation is broken (a value
//! could not be resolved, the shell could not be run) and must propagate.

use std::fmt;

use mk_ir::Value;


/// Result of evaluating a shell node.
pub type EvalResult<T = ()> = Result<T, EvalError>;

/// Hard evaluation failure.
#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    /// The evaluator could not turn a value into text.
    #[error("cannot resolve {what}: {message}")]
    Resolve { what: String, message: String },

    /// Literal execution of the command failed.
    #[error("shell command `{script}` failed: {message}")]
    Shell { script: String, message: String },

    /// Writing formatted output failed.
    #[error("formatting output failed")]
    Format(#[from] fmt::Error),
}

/// Invalid configuration input.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid shell date `{input}`: expected YYYY-MM-DD, optionally followed by HH:MM:SS")]
    InvalidShellDate { input: String },
}

/// A value could not be resolved.
#[cold]
pub fn unresolved(value: &Value, message: impl Into<String>) -> EvalError {
    EvalError::Resolve {
        what: format!("{} `{value}`", value.kind_name()),
        message: message.into(),
    }
}

/// Running the shell failed.
#[cold]
pub fn shell_failed(script: &str, message: impl Into<String>) -> EvalError {
    EvalError::Shell {
        script: script.to_string(),
        message: message.into(),
    }
}
