//! Handlers answered by the filesystem index.
//!
//! Resolved paths are spliced into the original command line unquoted, so a
//! value the index would read differently from the shell (several words,
//! an absolute path, a parent reference, anything the shell expands) sends
//! the command back to the shell. So does any query the index refuses; its
//! partial output is dropped first.

use std::sync::Arc;

use mk_find::{FindIndex, SsvWriter};
use mk_ir::Value;
use mk_scan::{has_parent_ref, has_shell_meta, is_space};

use super::run_original;
use crate::errors::EvalResult;
use crate::exec::{resolve_concat, resolve_trimmed, resolve_words, ShellCall, ShellExecutor};

/// Why `token` cannot be passed to the shell as one literal word.
fn unsafe_word(token: &str) -> Option<&'static str> {
    if token.is_empty() {
        Some("empty argument")
    } else if token.bytes().any(is_space) {
        Some("argument splits into several words")
    } else if has_shell_meta(token) {
        Some("shell metacharacters in argument")
    } else {
        None
    }
}

/// Why the index cannot stand in for the shell on `path`.
fn unsafe_path(path: &str) -> Option<&'static str> {
    if has_parent_ref(path) {
        Some("path contains ..")
    } else if path.starts_with('/') {
        Some("absolute path")
    } else {
        unsafe_word(path)
    }
}

/// `if [ -d $D ] ; then cd $D ; find ./ ... ; fi`
pub(crate) struct FindInDir {
    index: Arc<dyn FindIndex>,
    dir: Value,
    /// Second directory reference, kept when it is not the same value as
    /// `dir`. Both must then resolve to the same text.
    cd_dir: Option<Value>,
}

impl FindInDir {
    pub(crate) fn new(index: Arc<dyn FindIndex>, dir: Value, cd_dir: Option<Value>) -> Self {
        FindInDir { index, dir, cd_dir }
    }

    pub(crate) fn eval(
        &self,
        shell: &ShellCall,
        out: &mut String,
        exec: &mut dyn ShellExecutor,
    ) -> EvalResult {
        const NAME: &str = "find-subdir-assets";
        let dir = resolve_trimmed(exec, &self.dir)?;
        if let Some(cd_dir) = &self.cd_dir {
            if resolve_trimmed(exec, cd_dir)? != dir {
                return run_original(NAME, "tested and entered directories differ", shell, out, exec);
            }
        }
        if let Some(reason) = unsafe_path(&dir) {
            return run_original(NAME, reason, shell, out, exec);
        }
        if !self.index.is_ready() {
            return run_original(NAME, "index not ready", shell, out, exec);
        }
        let mut found = String::new();
        if !self.index.find_in_dir(&mut SsvWriter::new(&mut found), &dir) {
            return run_original(NAME, "index cannot answer for directory", shell, out, exec);
        }
        out.push_str(&found);
        Ok(())
    }
}

/// `cd $C ; find -L $R -name "*EXT" -and -not -name ".*"`
pub(crate) struct FindExtFilesUnder {
    index: Arc<dyn FindIndex>,
    chdir: Value,
    roots: Value,
    ext: &'static str,
}

impl FindExtFilesUnder {
    pub(crate) fn new(
        index: Arc<dyn FindIndex>,
        chdir: Value,
        roots: Value,
        ext: &'static str,
    ) -> Self {
        FindExtFilesUnder {
            index,
            chdir,
            roots,
            ext,
        }
    }

    pub(crate) fn eval(
        &self,
        shell: &ShellCall,
        out: &mut String,
        exec: &mut dyn ShellExecutor,
    ) -> EvalResult {
        const NAME: &str = "find-ext-files-under";
        let chdir = resolve_trimmed(exec, &self.chdir)?;
        let roots = resolve_words(exec, &self.roots)?;
        if roots.is_empty() {
            return run_original(NAME, "no search roots", shell, out, exec);
        }
        let unsafe_arg = std::iter::once(chdir.as_str())
            .chain(roots.iter().map(String::as_str))
            .find_map(unsafe_path);
        if let Some(reason) = unsafe_arg {
            return run_original(NAME, reason, shell, out, exec);
        }
        if !self.index.is_ready() {
            return run_original(NAME, "index not ready", shell, out, exec);
        }

        // Collect every root before emitting anything.
        let mut found = String::new();
        let mut sw = SsvWriter::new(&mut found);
        for root in &roots {
            if !self
                .index
                .find_ext_files_under(&mut sw, &chdir, root, self.ext)
            {
                return run_original(NAME, "index cannot answer for root", shell, out, exec);
            }
        }
        out.push_str(&found);
        Ok(())
    }
}

/// `cd $T$L/$D && find . -type d -a -name ".svn" -prune -o -type f ... -print`
pub(crate) struct FindJavaResources {
    index: Arc<dyn FindIndex>,
    dir: Vec<Value>,
}

impl FindJavaResources {
    pub(crate) fn new(index: Arc<dyn FindIndex>, dir: Vec<Value>) -> Self {
        FindJavaResources { index, dir }
    }

    pub(crate) fn eval(
        &self,
        shell: &ShellCall,
        out: &mut String,
        exec: &mut dyn ShellExecutor,
    ) -> EvalResult {
        const NAME: &str = "java-resource-file-groups";
        let joined = resolve_concat(exec, &self.dir)?;
        let dir = mk_scan::trim_space(&joined);
        if let Some(reason) = unsafe_path(dir) {
            return run_original(NAME, reason, shell, out, exec);
        }
        if !self.index.is_ready() {
            return run_original(NAME, "index not ready", shell, out, exec);
        }
        let mut found = String::new();
        if !self
            .index
            .find_java_resource_file_group(&mut SsvWriter::new(&mut found), dir)
        {
            return run_original(NAME, "index cannot answer for directory", shell, out, exec);
        }
        out.push_str(&found);
        Ok(())
    }
}

/// `build/tools/findleaves.py --prune=... [--mindepth=N] DIRS NAME`
pub(crate) struct FindLeaves {
    index: Arc<dyn FindIndex>,
    prunes: Vec<Value>,
    dirs: Value,
    name: &'static str,
    mindepth: i32,
}

impl FindLeaves {
    pub(crate) fn new(
        index: Arc<dyn FindIndex>,
        prunes: Vec<Value>,
        dirs: Value,
        name: &'static str,
        mindepth: i32,
    ) -> Self {
        FindLeaves {
            index,
            prunes,
            dirs,
            name,
            mindepth,
        }
    }

    pub(crate) fn eval(
        &self,
        shell: &ShellCall,
        out: &mut String,
        exec: &mut dyn ShellExecutor,
    ) -> EvalResult {
        const NAME: &str = "findleaves";
        if !self.index.leaves_ready() {
            return run_original(NAME, "leaf index not ready", shell, out, exec);
        }
        let dirs = resolve_words(exec, &self.dirs)?;
        if dirs.is_empty() {
            return run_original(NAME, "no search directories", shell, out, exec);
        }
        let mut prunes = Vec::with_capacity(self.prunes.len());
        for prune in &self.prunes {
            prunes.push(resolve_trimmed(exec, prune)?);
        }
        if let Some(reason) = dirs.iter().map(String::as_str).find_map(unsafe_path) {
            return run_original(NAME, reason, shell, out, exec);
        }
        if let Some(reason) = prunes.iter().map(String::as_str).find_map(unsafe_word) {
            return run_original(NAME, reason, shell, out, exec);
        }

        let prunes: Vec<&str> = prunes.iter().map(String::as_str).collect();
        let mut found = String::new();
        let mut sw = SsvWriter::new(&mut found);
        for dir in &dirs {
            if !self
                .index
                .find_leaves(&mut sw, dir, self.name, &prunes, self.mindepth)
            {
                return run_original(NAME, "index cannot answer for directory", shell, out, exec);
            }
        }
        out.push_str(&found);
        Ok(())
    }
}
