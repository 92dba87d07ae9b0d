//! Mk Shell - native fast paths for `$(shell ...)` in make evaluation.
//!
//! Build systems call the same handful of shell idioms thousands of times:
//! listing the assets of a directory, collecting Java sources, finding the
//! makefiles of a tree, stamping the build date. Each call forks a shell.
//! This crate recognizes those idioms structurally and answers them
//! in-process, from a shared filesystem index or from configuration.
//!
//! # Pipeline
//!
//! 1. The make evaluator parses the argument of `$(shell ...)` into an
//!    [`Expr`](mk_ir::Expr) and wraps it in a [`ShellCall`].
//! 2. [`ShellOptimizer::compact`] matches it against the [`PatternRegistry`]
//!    (first match wins) and builds a [`ShellNode`].
//! 3. [`ShellNode::eval`] produces the output, through a [`ShellExecutor`]
//!    for anything that needs the evaluator.
//!
//! # Fallback
//!
//! A node never produces output the original command would not. Whenever a
//! precondition fails (a path that leaves the tree, an index that is not
//! ready, an index that cannot answer) the node runs the original command
//! instead. Only resolution and execution failures are errors.

mod config;
mod errors;
mod exec;
mod handlers;
mod node;
mod optimizer;
mod registry;
mod template;

#[cfg(test)]
mod test_helpers;

pub use config::{parse_shell_date, ShellConfig, DEFAULT_LEAF_NAMES};
pub use errors::{shell_failed, unresolved, ConfigError, EvalError, EvalResult};
pub use exec::{resolve_concat, resolve_into, resolve_trimmed, resolve_words, ShellCall, ShellExecutor};
pub use handlers::{rot13, translate_format};
pub use node::ShellNode;
pub use optimizer::ShellOptimizer;
pub use registry::{PatternRegistry, ShellPattern};
pub use template::{match_template, Captures, Segment};
