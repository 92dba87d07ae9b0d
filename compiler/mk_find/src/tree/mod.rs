//! In-memory file tree implementing [`FindIndex`].
//!
//! Directory entries are kept in byte-lexicographic order, so every query
//! walks depth-first in a deterministic order. Symlinks are recorded but never
//! followed: queries whose shell counterpart would follow one (`cd`, `find -L`,
//! `findleaves.py`) report that they cannot answer, and the rest skip it the
//! way `find` without `-L` does.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::OnceLock;

use tracing::debug;

use crate::{FindIndex, IndexOptions, SsvWriter};

mod scan;


/// Kind of an entry when building a tree from a path list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
    Symlink,
}

#[derive(Debug, Default)]
struct Dir {
    entries: BTreeMap<String, Node>,
}

#[derive(Debug)]
enum Node {
    File,
    Symlink,
    Dir(Dir),
}

/// Where a path leads inside the tree.
enum Lookup<'t> {
    Found(&'t Node),
    /// Nothing there; the shell sees a missing path too.
    Missing,
    /// Through a symlink, absolute, or with a `..` component.
    Unresolved,
}

/// Read-only snapshot of a build tree.
///
/// Built either eagerly from a list of relative paths, or lazily by scanning
/// a directory on disk the first time [`FindIndex::init`] runs. A scan that
/// fails anywhere leaves the index permanently not ready, so every query
/// falls back to the real command.
#[derive(Debug)]
pub struct FileTree {
    disk_root: Option<PathBuf>,
    tree: OnceLock<Option<Node>>,
    leaf_names: OnceLock<Vec<String>>,
}

impl FileTree {
    /// Build a ready tree from relative paths. Parent directories are implied.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, EntryKind)>,
        S: AsRef<str>,
    {
        let mut root = Dir::default();
        for (path, kind) in entries {
            root.insert(path.as_ref(), kind);
        }
        let tree = OnceLock::new();
        let _ = tree.set(Some(Node::Dir(root)));
        FileTree {
            disk_root: None,
            tree,
            leaf_names: OnceLock::new(),
        }
    }

    /// Build a ready tree where every path is a regular file.
    pub fn from_files<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::from_entries(paths.into_iter().map(|p| (p, EntryKind::File)))
    }

    /// A tree that scans `root` on first `init`. Not ready until then.
    pub fn on_disk(root: impl Into<PathBuf>) -> Self {
        FileTree {
            disk_root: Some(root.into()),
            tree: OnceLock::new(),
            leaf_names: OnceLock::new(),
        }
    }

    fn root(&self) -> Option<&Node> {
        self.tree.get().and_then(Option::as_ref)
    }

    fn load(&self) -> Option<Node> {
        match &self.disk_root {
            Some(root) => scan::scan(root).map(Node::Dir),
            None => Some(Node::Dir(Dir::default())),
        }
    }

    /// Resolve `parts` joined by `/` from the tree root.
    fn lookup(&self, parts: &[&str]) -> Lookup<'_> {
        let Some(mut node) = self.root() else {
            return Lookup::Unresolved;
        };
        for part in parts {
            if part.starts_with('/') {
                return Lookup::Unresolved;
            }
            for comp in part.split('/') {
                match comp {
                    "" | "." => continue,
                    ".." => return Lookup::Unresolved,
                    _ => {}
                }
                node = match node {
                    Node::Dir(dir) => match dir.entries.get(comp) {
                        Some(next) => next,
                        None => return Lookup::Missing,
                    },
                    Node::Symlink => return Lookup::Unresolved,
                    Node::File => return Lookup::Missing,
                };
            }
        }
        match node {
            Node::Symlink => Lookup::Unresolved,
            _ => Lookup::Found(node),
        }
    }

    /// Run `walk` on the directory at `dir`.
    ///
    /// A missing path or a non-directory answers with nothing, like a failed
    /// `cd` or `[ -d ]`.
    fn in_dir(&self, dir: &str, walk: impl FnOnce(&Dir) -> bool) -> bool {
        match self.lookup(&[dir]) {
            Lookup::Found(Node::Dir(start)) => walk(start),
            Lookup::Found(_) | Lookup::Missing => true,
            Lookup::Unresolved => {
                debug!(dir, "directory not resolvable in tree");
                false
            }
        }
    }
}

impl Dir {
    fn insert(&mut self, path: &str, kind: EntryKind) {
        let mut comps = path
            .split('/')
            .filter(|c| !c.is_empty() && *c != ".")
            .peekable();
        let mut dir = self;
        while let Some(comp) = comps.next() {
            if comps.peek().is_none() {
                let node = match kind {
                    EntryKind::File => Node::File,
                    EntryKind::Symlink => Node::Symlink,
                    EntryKind::Dir => Node::Dir(Dir::default()),
                };
                // Re-declaring a directory keeps what is already under it.
                let existing_dir = matches!(dir.entries.get(comp), Some(Node::Dir(_)));
                if !(existing_dir && kind == EntryKind::Dir) {
                    dir.entries.insert(comp.to_string(), node);
                }
                return;
            }
            let entry = dir
                .entries
                .entry(comp.to_string())
                .or_insert_with(|| Node::Dir(Dir::default()));
            if !matches!(entry, Node::Dir(_)) {
                *entry = Node::Dir(Dir::default());
            }
            let Node::Dir(sub) = entry else {
                return;
            };
            dir = sub;
        }
    }
}

/// Push `name` as a new path component, run `f`, then restore `path`.
fn with_component<R>(path: &mut String, name: &str, f: impl FnOnce(&mut String) -> R) -> R {
    let len = path.len();
    if !path.is_empty() && !path.ends_with('/') {
        path.push('/');
    }
    path.push_str(name);
    let result = f(path);
    path.truncate(len);
    result
}

fn last_component(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}

fn visible_files(dir: &Dir, rel: &mut String, sw: &mut SsvWriter<'_>) {
    for (name, node) in &dir.entries {
        match node {
            Node::File if !name.starts_with('.') => {
                with_component(rel, name, |rel| sw.write_path(".", rel));
            }
            Node::Dir(sub) => with_component(rel, name, |rel| visible_files(sub, rel, sw)),
            Node::File | Node::Symlink => {}
        }
    }
}

fn ext_matches(name: &str, ext: &str) -> bool {
    !name.starts_with('.') && name.ends_with(ext)
}

/// Returns `false` on the first symlink, which `find -L` would follow.
fn ext_files(dir: &Dir, root: &str, rel: &mut String, ext: &str, sw: &mut SsvWriter<'_>) -> bool {
    for (name, node) in &dir.entries {
        let answered = with_component(rel, name, |rel| match node {
            Node::Symlink => false,
            Node::File => {
                if ext_matches(name, ext) {
                    sw.write_path(root, rel);
                }
                true
            }
            Node::Dir(sub) => {
                if ext_matches(name, ext) {
                    sw.write_path(root, rel);
                }
                ext_files(sub, root, rel, ext, sw)
            }
        });
        if !answered {
            return false;
        }
    }
    true
}

fn is_java_resource(name: &str) -> bool {
    let swap_file = name.len() >= 5 && name.starts_with('.') && name.ends_with(".swp");
    !(name.ends_with(".java")
        || name == "package.html"
        || name == "overview.html"
        || swap_file
        || name == ".DS_Store"
        || name.ends_with('~'))
}

fn java_resources(dir: &Dir, rel: &mut String, sw: &mut SsvWriter<'_>) {
    for (name, node) in &dir.entries {
        match node {
            Node::Dir(_) if name == ".svn" => {}
            Node::Dir(sub) => with_component(rel, name, |rel| java_resources(sub, rel, sw)),
            Node::File if is_java_resource(name) => {
                with_component(rel, name, |rel| sw.write_path(".", rel));
            }
            Node::File | Node::Symlink => {}
        }
    }
}

struct LeafQuery<'q> {
    name: &'q str,
    pruned: Vec<&'q str>,
    mindepth: i32,
}

/// Returns `false` on the first unpruned symlink, which `findleaves.py`
/// would follow if it leads to a directory.
fn leaves(
    dir: &Dir,
    path: &mut String,
    depth: i32,
    query: &LeafQuery<'_>,
    sw: &mut SsvWriter<'_>,
) -> bool {
    if query.mindepth <= 0 || depth >= query.mindepth {
        if let Some(Node::File | Node::Symlink) = dir.entries.get(query.name) {
            sw.write_path(path, query.name);
            return true;
        }
    }
    for (child, node) in &dir.entries {
        if query.pruned.contains(&child.as_str()) {
            continue;
        }
        let answered = match node {
            Node::File => true,
            Node::Symlink => false,
            Node::Dir(sub) => with_component(path, child, |path| {
                leaves(sub, path, depth.saturating_add(1), query, sw)
            }),
        };
        if !answered {
            return false;
        }
    }
    true
}

impl FindIndex for FileTree {
    fn init(&self, options: &IndexOptions) {
        let tree = self.tree.get_or_init(|| self.load());
        self.leaf_names
            .get_or_init(|| options.leaf_names.clone());
        debug!(ready = tree.is_some(), "file tree initialized");
    }

    fn is_ready(&self) -> bool {
        self.root().is_some()
    }

    fn leaves_ready(&self) -> bool {
        self.is_ready() && self.leaf_names.get().is_some()
    }

    fn find_in_dir(&self, sw: &mut SsvWriter<'_>, dir: &str) -> bool {
        self.in_dir(dir, |start| {
            visible_files(start, &mut String::new(), sw);
            true
        })
    }

    fn find_ext_files_under(
        &self,
        sw: &mut SsvWriter<'_>,
        chdir: &str,
        root: &str,
        ext: &str,
    ) -> bool {
        let Lookup::Found(node) = self.lookup(&[chdir, root]) else {
            debug!(chdir, root, "extension search root not resolvable in tree");
            return false;
        };
        let start_matches = ext_matches(last_component(root), ext);
        match node {
            Node::Symlink => false,
            Node::File => {
                if start_matches {
                    sw.write_word(root);
                }
                true
            }
            Node::Dir(dir) => {
                if start_matches {
                    sw.write_word(root);
                }
                ext_files(dir, root, &mut String::new(), ext, sw)
            }
        }
    }

    fn find_java_resource_file_group(&self, sw: &mut SsvWriter<'_>, dir: &str) -> bool {
        self.in_dir(dir, |start| {
            java_resources(start, &mut String::new(), sw);
            true
        })
    }

    fn find_leaves(
        &self,
        sw: &mut SsvWriter<'_>,
        dir: &str,
        name: &str,
        prunes: &[&str],
        mindepth: i32,
    ) -> bool {
        let query = LeafQuery {
            name,
            pruned: prunes.iter().map(|p| last_component(p)).collect(),
            mindepth,
        };
        self.in_dir(dir, |start| leaves(start, &mut dir.to_string(), 1, &query, sw))
    }
}
