//! Compaction entry point.

use std::sync::Arc;

use mk_find::FindIndex;
use tracing::debug;

use crate::config::ShellConfig;
use crate::exec::ShellCall;
use crate::node::ShellNode;
use crate::registry::{CompactCtx, PatternRegistry};


/// Rewrites `$(shell ...)` calls into nodes with native fast paths.
///
/// Holds everything compaction needs: the pattern registry, the
/// configuration and the shared filesystem index. One optimizer serves a
/// whole evaluation and may be used from several threads.
pub struct ShellOptimizer {
    registry: &'static PatternRegistry,
    config: ShellConfig,
    index: Arc<dyn FindIndex>,
}

impl ShellOptimizer {
    /// An optimizer over the built-in patterns.
    pub fn new(config: ShellConfig, index: Arc<dyn FindIndex>) -> Self {
        ShellOptimizer {
            registry: PatternRegistry::builtin(),
            config,
            index,
        }
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    pub fn registry(&self) -> &'static PatternRegistry {
        self.registry
    }

    /// Name of the pattern `shell` would be compacted with, if any.
    pub fn match_name(&self, shell: &ShellCall) -> Option<&'static str> {
        self.registry
            .find(shell.command())
            .map(|(pattern, _)| pattern.name())
    }

    /// Compact `shell` into a node.
    ///
    /// Commands matching no pattern, or whose captures fail a check that can
    /// be decided now, become plain fallback nodes.
    #[tracing::instrument(level = "debug", skip_all, fields(command = %shell.command()))]
    pub fn compact(&self, shell: ShellCall) -> ShellNode {
        let Some((pattern, captures)) = self.registry.find(shell.command()) else {
            return ShellNode::fallback(shell);
        };
        debug!(pattern = pattern.name(), "matched shell pattern");
        let ctx = CompactCtx {
            config: &self.config,
            index: &self.index,
        };
        pattern.compactor().compact(shell, &captures, &ctx)
    }
}
