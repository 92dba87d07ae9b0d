//! `mkc explain`: which fast path a command gets.

use std::fmt;
use std::sync::Arc;

use mk_find::FileTree;
use mk_ir::parse_command;
use mk_shell::{ShellCall, ShellOptimizer};

use super::{CliError, CliOptions};

/// Result of compacting one command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Explanation {
    /// Name of the matching pattern.
    pub pattern: Option<&'static str>,
    /// Kind of node the command compacts to.
    pub node: &'static str,
}

impl fmt::Display for Explanation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "pattern: {}", self.pattern.unwrap_or("no match"))?;
        write!(f, "node: {}", self.node)
    }
}

pub fn explain_command(options: &CliOptions) -> Result<Explanation, CliError> {
    let shell = ShellCall::new(parse_command(&options.command)?);
    let index = Arc::new(FileTree::on_disk(&options.root));
    let optimizer = ShellOptimizer::new(options.config.clone(), index);
    let pattern = optimizer.match_name(&shell);
    let node = optimizer.compact(shell);
    Ok(Explanation {
        pattern,
        node: node.kind_name(),
    })
}
