//! Test helpers for shell node unit testing.
//!
//! Provides `MockShellExecutor` for evaluating nodes without a make
//! evaluator or a real shell, and `StubIndex` for controlling index
//! readiness around a real `FileTree`.

#![allow(
    clippy::unwrap_used,
    reason = "test helper module uses unwrap for concise setup"
)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use mk_find::{FileTree, FindIndex, IndexOptions, SsvWriter};
use mk_ir::{parse_command, Value};
use rustc_hash::FxHashMap;

use crate::errors::{shell_failed, unresolved, EvalResult};
use crate::exec::{ShellCall, ShellExecutor};

/// Parse make text into a `ShellCall`.
pub fn shell(text: &str) -> ShellCall {
    ShellCall::new(parse_command(text).unwrap())
}

/// Mock executor with canned variables and shell outputs.
///
/// Every script passed to `run_shell` is recorded, so tests can tell a
/// native answer from a fallback.
#[derive(Default)]
pub struct MockShellExecutor {
    variables: FxHashMap<String, String>,
    params: FxHashMap<u32, String>,
    shell_outputs: FxHashMap<String, String>,
    /// Scripts run so far, in order.
    pub scripts: Vec<String>,
}

impl MockShellExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn var(mut self, name: &str, value: &str) -> Self {
        self.variables.insert(name.to_string(), value.to_string());
        self
    }

    #[must_use]
    pub fn param(mut self, index: u32, value: &str) -> Self {
        self.params.insert(index, value.to_string());
        self
    }

    /// Output `run_shell` produces for exactly this script.
    #[must_use]
    pub fn shell_output(mut self, script: &str, output: &str) -> Self {
        self.shell_outputs
            .insert(script.to_string(), output.to_string());
        self
    }
}

impl ShellExecutor for MockShellExecutor {
    fn resolve(&mut self, value: &Value, out: &mut String) -> EvalResult {
        let text = match value {
            Value::VarRef(name) => self.variables.get(name.as_ref()),
            Value::Param(index) => self.params.get(index),
            Value::Literal(_) | Value::Call(_) => None,
        };
        match text {
            Some(text) => {
                out.push_str(text);
                Ok(())
            }
            None => Err(unresolved(value, "not defined in mock")),
        }
    }

    fn run_shell(&mut self, script: &str, out: &mut String) -> EvalResult {
        self.scripts.push(script.to_string());
        match self.shell_outputs.get(script) {
            Some(output) => {
                out.push_str(output);
                Ok(())
            }
            None => Err(shell_failed(script, "no canned output")),
        }
    }
}

/// `FindIndex` wrapper with switchable readiness and an init counter.
pub struct StubIndex {
    tree: FileTree,
    pub ready: AtomicBool,
    pub leaves_ready: AtomicBool,
    pub init_calls: AtomicUsize,
}

impl StubIndex {
    pub fn new(files: &[&str]) -> Arc<Self> {
        Self::with_tree(FileTree::from_files(files.iter().copied()))
    }

    pub fn with_tree(tree: FileTree) -> Arc<Self> {
        Arc::new(StubIndex {
            tree,
            ready: AtomicBool::new(true),
            leaves_ready: AtomicBool::new(true),
            init_calls: AtomicUsize::new(0),
        })
    }

    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::SeqCst);
        self.leaves_ready.store(ready, Ordering::SeqCst);
    }
}

impl FindIndex for StubIndex {
    fn init(&self, options: &IndexOptions) {
        self.init_calls.fetch_add(1, Ordering::SeqCst);
        self.tree.init(options);
    }

    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst) && self.tree.is_ready()
    }

    fn leaves_ready(&self) -> bool {
        self.leaves_ready.load(Ordering::SeqCst) && self.tree.leaves_ready()
    }

    fn find_in_dir(&self, sw: &mut SsvWriter<'_>, dir: &str) -> bool {
        self.tree.find_in_dir(sw, dir)
    }

    fn find_ext_files_under(
        &self,
        sw: &mut SsvWriter<'_>,
        chdir: &str,
        root: &str,
        ext: &str,
    ) -> bool {
        self.tree.find_ext_files_under(sw, chdir, root, ext)
    }

    fn find_java_resource_file_group(&self, sw: &mut SsvWriter<'_>, dir: &str) -> bool {
        self.tree.find_java_resource_file_group(sw, dir)
    }

    fn find_leaves(
        &self,
        sw: &mut SsvWriter<'_>,
        dir: &str,
        name: &str,
        prunes: &[&str],
        mindepth: i32,
    ) -> bool {
        self.tree.find_leaves(sw, dir, name, prunes, mindepth)
    }
}
