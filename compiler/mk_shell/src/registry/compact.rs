//! Turning a matched call into a node.

use std::sync::Arc;

use mk_find::{FindIndex, IndexOptions};
use mk_ir::Value;
use tracing::debug;

use crate::config::ShellConfig;
use crate::exec::ShellCall;
use crate::handlers::{
    FindExtFilesUnder, FindInDir, FindJavaResources, FindLeaves, Rot13, ShellDate,
};
use crate::node::{FastPath, ShellNode};
use crate::template::Captures;

/// What the compaction of a pattern has access to.
pub(crate) struct CompactCtx<'a> {
    pub config: &'a ShellConfig,
    pub index: &'a Arc<dyn FindIndex>,
}

impl CompactCtx<'_> {
    fn init_index(&self) {
        self.index
            .init(&IndexOptions::with_leaf_names(self.config.leaf_names()));
    }
}

/// How a pattern's captures become a fast path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Compactor {
    Rot13,
    FindInDir,
    FindExtFilesUnder {
        ext: &'static str,
    },
    JavaResourceGroup,
    FindLeaves {
        name: &'static str,
        /// Directory list baked into the template, if it has no `dirs` slot.
        fixed_dirs: Option<&'static str>,
        mindepth: i32,
    },
    Date,
}

fn slot(captures: &Captures, name: &str) -> Option<Value> {
    captures.get(name).cloned()
}

impl Compactor {
    /// Build the node for `shell`, or a plain fallback when a precondition
    /// that can be decided now does not hold.
    pub(crate) fn compact(
        self,
        shell: ShellCall,
        captures: &Captures,
        ctx: &CompactCtx<'_>,
    ) -> ShellNode {
        match self.fast_path(captures, ctx) {
            Ok(fast) => ShellNode::with_fast_path(shell, fast),
            Err(reason) => {
                debug!(compactor = ?self, reason, "keeping original shell call");
                ShellNode::fallback(shell)
            }
        }
    }

    fn fast_path(self, captures: &Captures, ctx: &CompactCtx<'_>) -> Result<FastPath, &'static str> {
        const MISSING: &str = "template slot not captured";
        let index = || Arc::clone(ctx.index);
        let ready = || {
            ctx.init_index();
            if ctx.index.is_ready() {
                Ok(())
            } else {
                Err("index not ready")
            }
        };

        match self {
            Compactor::Rot13 => {
                let text = slot(captures, "text").ok_or(MISSING)?;
                Ok(FastPath::Rot13(Rot13::new(text)))
            }
            Compactor::FindInDir => {
                let dir = slot(captures, "dir").ok_or(MISSING)?;
                let cd_dir = slot(captures, "cd_dir").ok_or(MISSING)?;
                ready()?;
                // The same reference twice needs no runtime comparison.
                let cd_dir = (cd_dir != dir).then_some(cd_dir);
                Ok(FastPath::FindInDir(FindInDir::new(index(), dir, cd_dir)))
            }
            Compactor::FindExtFilesUnder { ext } => {
                let chdir = slot(captures, "chdir").ok_or(MISSING)?;
                let roots = slot(captures, "roots").ok_or(MISSING)?;
                ready()?;
                Ok(FastPath::FindExtFilesUnder(FindExtFilesUnder::new(
                    index(),
                    chdir,
                    roots,
                    ext,
                )))
            }
            Compactor::JavaResourceGroup => {
                if captures.is_empty() {
                    return Err(MISSING);
                }
                ready()?;
                let dir = captures.values().cloned().collect();
                Ok(FastPath::FindJavaResourceGroup(FindJavaResources::new(
                    index(),
                    dir,
                )))
            }
            Compactor::FindLeaves {
                name,
                fixed_dirs,
                mindepth,
            } => {
                if !ctx.config.is_leaf_name(name) {
                    return Err("leaf name not configured");
                }
                let out = slot(captures, "out").ok_or(MISSING)?;
                let dirs = match fixed_dirs {
                    Some(dirs) => Value::literal(dirs),
                    None => slot(captures, "dirs").ok_or(MISSING)?,
                };
                ctx.init_index();
                if !ctx.index.leaves_ready() {
                    return Err("leaf index not ready");
                }
                let prunes = vec![out, Value::literal(".repo"), Value::literal(".git")];
                Ok(FastPath::FindLeaves(FindLeaves::new(
                    index(),
                    prunes,
                    dirs,
                    name,
                    mindepth,
                )))
            }
            Compactor::Date => {
                let timestamp = ctx.config.shell_date().ok_or("no shell date configured")?;
                let format = slot(captures, "format").ok_or(MISSING)?;
                let format = format.as_literal().ok_or("date format is not literal")?;
                Ok(FastPath::Date(ShellDate::new(timestamp, format)))
            }
        }
    }
}
