//! Executor backed by command-line variables, the environment and `sh`.

use std::path::{Path, PathBuf};
use std::process::Command;

use mk_ir::Value;
use mk_shell::{shell_failed, unresolved, EvalResult, ShellExecutor};
use rustc_hash::FxHashMap;
use tracing::debug;


/// Resolves references from explicit definitions, then from the process
/// environment, and runs scripts with `sh -c` in a fixed directory.
#[derive(Debug)]
pub struct ProcessExecutor {
    workdir: PathBuf,
    variables: FxHashMap<String, String>,
    params: FxHashMap<u32, String>,
}

impl ProcessExecutor {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        ProcessExecutor {
            workdir: workdir.into(),
            variables: FxHashMap::default(),
            params: FxHashMap::default(),
        }
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Define `name`. An all-digit name defines the numbered parameter.
    pub fn define(&mut self, name: &str, value: impl Into<String>) {
        match name.parse::<u32>() {
            Ok(index) => {
                self.params.insert(index, value.into());
            }
            Err(_) => {
                self.variables.insert(name.to_string(), value.into());
            }
        }
    }

    fn lookup(&self, value: &Value) -> Option<String> {
        match value {
            Value::VarRef(name) => self
                .variables
                .get(name.as_ref())
                .cloned()
                .or_else(|| std::env::var(name.as_ref()).ok()),
            Value::Param(index) => self.params.get(index).cloned(),
            Value::Literal(text) => Some(text.to_string()),
            Value::Call(_) => None,
        }
    }
}

/// Post-process shell output the way make's `$(shell)` reports it.
fn shell_output(stdout: &[u8]) -> String {
    let text = String::from_utf8_lossy(stdout);
    text.trim_end().replace('\n', " ")
}

impl ShellExecutor for ProcessExecutor {
    fn resolve(&mut self, value: &Value, out: &mut String) -> EvalResult {
        match self.lookup(value) {
            Some(text) => {
                out.push_str(&text);
                Ok(())
            }
            None if matches!(value, Value::Call(_)) => {
                Err(unresolved(value, "function calls are not evaluated by mkc"))
            }
            // Undefined make variables expand to nothing.
            None => Ok(()),
        }
    }

    fn run_shell(&mut self, script: &str, out: &mut String) -> EvalResult {
        debug!(script, workdir = %self.workdir.display(), "running shell");
        let output = Command::new("sh")
            .arg("-c")
            .arg(script)
            .current_dir(&self.workdir)
            .output()
            .map_err(|err| shell_failed(script, err.to_string()))?;
        if !output.status.success() {
            debug!(script, status = %output.status, "shell exited unsuccessfully");
        }
        out.push_str(&shell_output(&output.stdout));
        Ok(())
    }
}
