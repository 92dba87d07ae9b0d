//! Native replacements for recognized shell idioms.
//!
//! Each handler reproduces the output of one command shape. Handlers that
//! depend on runtime values re-check their preconditions on every
//! evaluation and run the original command whenever one fails.

mod date;
mod find;
mod rot13;

#[cfg(test)]
mod tests;

use tracing::debug;

use crate::errors::EvalResult;
use crate::exec::{ShellCall, ShellExecutor};

pub(crate) use date::ShellDate;
pub use date::translate_format;
pub(crate) use find::{FindExtFilesUnder, FindInDir, FindJavaResources, FindLeaves};
pub use rot13::rot13;
pub(crate) use rot13::Rot13;

/// Run `shell` literally, logging why the fast path was abandoned.
fn run_original(
    handler: &'static str,
    reason: &str,
    shell: &ShellCall,
    out: &mut String,
    exec: &mut dyn ShellExecutor,
) -> EvalResult {
    debug!(handler, reason, "running original command");
    shell.eval(out, exec)
}
