//! In-process hierarchical provider.

use super::provider::{parent, FileInfo, FileKind, FileSystem};
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet};
use std::io;

/// A provider that keeps a directory tree in memory.
///
/// Unlike a flat mapping, directories are explicit entries: a file can only
/// be written once its parent directory exists, and removing a file leaves
/// its directory in place. This mirrors how a real disk behaves.
///
/// Paths are normalised to an absolute form: repeated and trailing `/` are
/// dropped and a leading `/` is added.
///
/// # Thread Safety
///
/// The tree is guarded by a [`RwLock`]; the provider can be shared across
/// threads.
#[derive(Debug)]
pub struct MemoryFileSystem {
    tree: RwLock<Tree>,
}

#[derive(Debug)]
struct Tree {
    files: BTreeMap<String, Vec<u8>>,
    dirs: BTreeSet<String>,
}

impl Default for MemoryFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryFileSystem {
    /// Creates an empty tree containing only `/`.
    #[must_use]
    pub fn new() -> Self {
        let mut dirs = BTreeSet::new();
        dirs.insert("/".to_string());
        Self {
            tree: RwLock::new(Tree {
                files: BTreeMap::new(),
                dirs,
            }),
        }
    }

    /// Returns the number of files in the tree.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.tree.read().files.len()
    }
}

/// Normalises `path` to `/a/b` form, stripping a `memory://` prefix.
#[must_use]
pub fn normalize(path: &str) -> String {
    let path = path.strip_prefix("memory://").unwrap_or(path);
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    format!("/{}", segments.join("/"))
}

/// Returns the `/`-terminated form of a normalised directory path.
fn dir_prefix(dir: &str) -> String {
    if dir == "/" {
        dir.to_string()
    } else {
        format!("{dir}/")
    }
}

impl Tree {
    /// Error for a path that has no entry: `NotADirectory` if the path goes
    /// through a file, `NotFound` otherwise.
    fn missing(&self, path: &str) -> io::Error {
        let mut ancestor = parent(path);
        while ancestor != "/" && !ancestor.is_empty() {
            if self.files.contains_key(ancestor) {
                return io::ErrorKind::NotADirectory.into();
            }
            ancestor = parent(ancestor);
        }
        io::ErrorKind::NotFound.into()
    }
}

impl FileSystem for MemoryFileSystem {
    fn protocol(&self) -> &'static str {
        "memory"
    }

    fn canonical_path(&self, path: &str) -> String {
        normalize(path)
    }

    fn cat(&self, path: &str) -> io::Result<Vec<u8>> {
        let path = normalize(path);
        let tree = self.tree.read();
        if let Some(data) = tree.files.get(&path) {
            return Ok(data.clone());
        }
        if tree.dirs.contains(&path) {
            return Err(io::ErrorKind::IsADirectory.into());
        }
        Err(tree.missing(&path))
    }

    fn write(&self, path: &str, data: &[u8]) -> io::Result<()> {
        let path = normalize(path);
        let mut tree = self.tree.write();
        if tree.dirs.contains(&path) {
            return Err(io::ErrorKind::IsADirectory.into());
        }
        let parent_dir = parent(&path);
        if !tree.dirs.contains(parent_dir) {
            return Err(tree.missing(&path));
        }
        tree.files.insert(path, data.to_vec());
        Ok(())
    }

    fn mkdirs(&self, path: &str) -> io::Result<()> {
        let path = normalize(path);
        let mut tree = self.tree.write();

        let mut current = String::new();
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            current.push('/');
            current.push_str(segment);
            if tree.files.contains_key(&current) {
                let kind = if current == path {
                    io::ErrorKind::AlreadyExists
                } else {
                    io::ErrorKind::NotADirectory
                };
                return Err(kind.into());
            }
            tree.dirs.insert(current.clone());
        }
        Ok(())
    }

    fn rm(&self, path: &str) -> io::Result<()> {
        let path = normalize(path);
        let mut tree = self.tree.write();
        if tree.files.remove(&path).is_some() {
            return Ok(());
        }
        if tree.dirs.contains(&path) {
            return Err(io::ErrorKind::IsADirectory.into());
        }
        Err(tree.missing(&path))
    }

    fn info(&self, path: &str) -> io::Result<FileInfo> {
        let path = normalize(path);
        let tree = self.tree.read();
        if let Some(data) = tree.files.get(&path) {
            return Ok(FileInfo {
                size: data.len() as u64,
                name: path,
                kind: FileKind::File,
            });
        }
        if tree.dirs.contains(&path) {
            return Ok(FileInfo {
                name: path,
                kind: FileKind::Directory,
                size: 0,
            });
        }
        Err(tree.missing(&path))
    }

    fn ls(&self, path: &str) -> io::Result<Vec<FileInfo>> {
        let path = normalize(path);
        let tree = self.tree.read();
        if tree.files.contains_key(&path) {
            return Err(io::ErrorKind::NotADirectory.into());
        }
        if !tree.dirs.contains(&path) {
            return Err(tree.missing(&path));
        }

        let prefix = dir_prefix(&path);
        let is_child = |name: &str| {
            name.strip_prefix(&prefix)
                .is_some_and(|rest| !rest.is_empty() && !rest.contains('/'))
        };

        let dirs = tree.dirs.iter().filter(|d| is_child(d)).map(|d| FileInfo {
            name: d.clone(),
            kind: FileKind::Directory,
            size: 0,
        });
        let files = tree
            .files
            .iter()
            .filter(|(f, _)| is_child(f))
            .map(|(f, data)| FileInfo {
                name: f.clone(),
                kind: FileKind::File,
                size: data.len() as u64,
            });
        Ok(dirs.chain(files).collect())
    }

    fn find(&self, path: &str) -> io::Result<Vec<String>> {
        let path = normalize(path);
        let tree = self.tree.read();
        if tree.files.contains_key(&path) {
            return Ok(vec![path]);
        }
        if !tree.dirs.contains(&path) {
            return Ok(Vec::new());
        }

        let prefix = dir_prefix(&path);
        Ok(tree
            .files
            .range(prefix.clone()..)
            .take_while(|(name, _)| name.starts_with(&prefix))
            .map(|(name, _)| name.clone())
            .collect())
    }
}
