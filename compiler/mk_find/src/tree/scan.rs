//! Loading a [`Dir`] from disk.

use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, warn};

use super::{Dir, Node};

/// Scan `root` recursively. Any I/O error fails the whole scan.
pub(super) fn scan(root: &Path) -> Option<Dir> {
    match read_tree(root) {
        Ok(dir) => {
            debug!(root = %root.display(), "scanned file tree");
            Some(dir)
        }
        Err(err) => {
            warn!(root = %root.display(), %err, "file tree scan failed; index stays disabled");
            None
        }
    }
}

fn read_tree(path: &Path) -> io::Result<Dir> {
    let mut dir = Dir::default();
    for entry in fs::read_dir(path)? {
        let entry = entry?;
        let name = entry.file_name().into_string().map_err(|raw| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("non UTF-8 file name {raw:?} in {}", path.display()),
            )
        })?;
        // `file_type` does not follow symlinks.
        let file_type = entry.file_type()?;
        let node = if file_type.is_symlink() {
            Node::Symlink
        } else if file_type.is_dir() {
            Node::Dir(read_tree(&entry.path())?)
        } else {
            Node::File
        };
        dir.entries.insert(name, node);
    }
    Ok(dir)
}
