//! Compacted `$(shell ...)` nodes.

use crate::errors::EvalResult;
use crate::exec::{ShellCall, ShellExecutor};
use crate::handlers::{
    FindExtFilesUnder, FindInDir, FindJavaResources, FindLeaves, Rot13, ShellDate,
};

/// The native handler standing in for a shell call, if any.
pub(crate) enum FastPath {
    Fallback,
    Rot13(Rot13),
    FindInDir(FindInDir),
    FindExtFilesUnder(FindExtFilesUnder),
    FindJavaResourceGroup(FindJavaResources),
    FindLeaves(FindLeaves),
    Date(ShellDate),
}

/// A `$(shell ...)` call, possibly with a native fast path.
///
/// The original call is always kept: fast paths run it themselves whenever
/// a runtime check fails, so every node evaluates to what the shell would
/// print.
pub struct ShellNode {
    shell: ShellCall,
    fast: FastPath,
}

impl ShellNode {
    /// A node that always runs the shell.
    pub fn fallback(shell: ShellCall) -> Self {
        ShellNode {
            shell,
            fast: FastPath::Fallback,
        }
    }

    pub(crate) fn with_fast_path(shell: ShellCall, fast: FastPath) -> Self {
        ShellNode { shell, fast }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.fast, FastPath::Fallback)
    }

    /// Short name of the node variant, for logs and tooling.
    pub fn kind_name(&self) -> &'static str {
        match self.fast {
            FastPath::Fallback => "shell",
            FastPath::Rot13(_) => "rot13",
            FastPath::FindInDir(_) => "find-in-dir",
            FastPath::FindExtFilesUnder(_) => "find-ext-files-under",
            FastPath::FindJavaResourceGroup(_) => "find-java-resource-group",
            FastPath::FindLeaves(_) => "find-leaves",
            FastPath::Date(_) => "date",
        }
    }

    /// The original call.
    pub fn shell(&self) -> &ShellCall {
        &self.shell
    }

    /// Append the command's output to `out`.
    pub fn eval(&self, out: &mut String, exec: &mut dyn ShellExecutor) -> EvalResult {
        let shell = &self.shell;
        match &self.fast {
            FastPath::Fallback => shell.eval(out, exec),
            FastPath::Rot13(h) => h.eval(shell, out, exec),
            FastPath::FindInDir(h) => h.eval(shell, out, exec),
            FastPath::FindExtFilesUnder(h) => h.eval(shell, out, exec),
            FastPath::FindJavaResourceGroup(h) => h.eval(shell, out, exec),
            FastPath::FindLeaves(h) => h.eval(shell, out, exec),
            FastPath::Date(h) => h.eval(out),
        }
    }
}

impl std::fmt::Debug for ShellNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShellNode")
            .field("kind", &self.kind_name())
            .field("command", &self.shell.command().to_string())
            .finish()
    }
}
