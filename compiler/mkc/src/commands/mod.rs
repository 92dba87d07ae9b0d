//! Command handlers for the `mkc` CLI.
//!
//! Handlers return their output instead of printing it, so the binary stays
//! a thin argument dispatcher and the handlers can be tested directly.

mod eval;
mod explain;
mod options;

use mk_ir::ParseError;
use mk_shell::{ConfigError, EvalError};

pub use eval::eval_command;
pub use explain::{explain_command, Explanation};
pub use options::{parse_options, CliOptions};

/// Anything that makes a command fail.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("missing value for `{0}`")]
    MissingValue(String),

    #[error("unknown option `{0}`")]
    UnknownOption(String),

    #[error("expected NAME=VALUE, got `{0}`")]
    BadDefinition(String),

    #[error("missing command text")]
    MissingCommand,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("cannot parse command: {0}")]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Eval(#[from] EvalError),
}
