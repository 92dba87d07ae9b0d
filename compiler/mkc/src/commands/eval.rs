//! `mkc eval`: compact a command and print its output.

use std::sync::Arc;

use mk_find::FileTree;
use mk_ir::parse_command;
use mk_shell::{ShellCall, ShellOptimizer};
use tracing::debug;

use super::{CliError, CliOptions};
use crate::ProcessExecutor;

pub fn eval_command(options: &CliOptions) -> Result<String, CliError> {
    let shell = ShellCall::new(parse_command(&options.command)?);
    let index = Arc::new(FileTree::on_disk(&options.root));
    let optimizer = ShellOptimizer::new(options.config.clone(), index);
    let node = optimizer.compact(shell);
    debug!(kind = node.kind_name(), "compacted command");

    let mut exec = ProcessExecutor::new(&options.root);
    for (name, value) in &options.vars {
        exec.define(name, value.as_str());
    }
    let mut out = String::new();
    node.eval(&mut out, &mut exec)?;
    Ok(out)
}
