//! Mk Find - filesystem index behind the `find`-style shell fast paths.
//!
//! The optimizer never touches the filesystem itself. Every directory or
//! leaf query goes through [`FindIndex`], a read-only service shared by all
//! specialized nodes. Queries write their results through an [`SsvWriter`]
//! so that consecutive queries (one per root, one per directory) produce a
//! single space-separated list, exactly like the shell output they replace.
//!
//! # Readiness
//!
//! An index can be unable to answer: still loading, disabled, or missing the
//! leaf-name table. Callers check [`FindIndex::is_ready`] and
//! [`FindIndex::leaves_ready`] before querying and fall back to running the
//! real command when either is false. A ready index may still refuse a single
//! query (a path through a symlink it does not follow); the query then
//! returns `false` and the caller falls back the same way.
//!
//! [`FileTree`] is the in-memory implementation, loaded from a path list or
//! scanned from disk on first [`FindIndex::init`].

mod ssv;
mod tree;

pub use ssv::SsvWriter;
pub use tree::{EntryKind, FileTree};

/// Options for [`FindIndex::init`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IndexOptions {
    /// File names the leaf search is prepared to answer for.
    pub leaf_names: Vec<String>,
}

impl IndexOptions {
    pub fn with_leaf_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        IndexOptions {
            leaf_names: names.into_iter().map(Into::into).collect(),
        }
    }
}

/// Read-only query service over the build tree.
///
/// Implementations must be safe to share across threads. `init` may be called
/// any number of times, from any thread; only the first call has an effect.
pub trait FindIndex: Send + Sync {
    /// Prepare the index. Idempotent.
    fn init(&self, options: &IndexOptions);

    /// Whether per-directory queries can be answered.
    fn is_ready(&self) -> bool;

    /// Whether leaf searches can be answered.
    fn leaves_ready(&self) -> bool;

    /// `cd dir ; find ./ -not -name '.*' -and -type f -and -not -type l`
    ///
    /// Every query returns `false` when the index cannot answer exactly as
    /// the command would, for example when the path goes through a symlink.
    /// Anything already written to `sw` must then be discarded by the caller.
    fn find_in_dir(&self, sw: &mut SsvWriter<'_>, dir: &str) -> bool;

    /// `cd chdir ; find -L root -name "*ext" -and -not -name ".*"`
    fn find_ext_files_under(&self, sw: &mut SsvWriter<'_>, chdir: &str, root: &str, ext: &str)
        -> bool;

    /// Java resource files under `dir`: regular files that are not sources,
    /// package docs, editor droppings or version-control metadata.
    fn find_java_resource_file_group(&self, sw: &mut SsvWriter<'_>, dir: &str) -> bool;

    /// Topmost files called `name` under `dir`, skipping pruned directory
    /// names. A negative `mindepth` means no minimum.
    fn find_leaves(
        &self,
        sw: &mut SsvWriter<'_>,
        dir: &str,
        name: &str,
        prunes: &[&str],
        mindepth: i32,
    ) -> bool;
}
