//! Test utilities for building directory fixtures.
//!
//! This module is only compiled for tests and benchmarks.

use std::collections::HashMap;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;

use crate::error::{Error, IoOperation, Result};
use crate::fs::{EntryMetadata, FileSystem};

/// Files of the sample fixture, relative to the fixtures root.
pub const SAMPLE_FILES: &[(&str, &str)] = &[
    ("dir/a", "Hello world\n"),
    ("dir/b", "Hello ncp\n"),
    ("dir/c", ""),
    ("dir/d", ""),
    ("dir/sub/a", "Hello nodejitsu\n"),
    ("dir/sub/b", ""),
];

/// Root of the sample tree inside `MemoryFs::sample()`.
pub const SAMPLE_ROOT: &str = "/fixtures/dir";

/// A temporary directory for on-disk fixtures.
///
/// The directory is automatically cleaned up when dropped.
pub struct FixtureDir {
    dir: TempDir,
}

impl FixtureDir {
    /// Create a new empty temporary directory.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        Self { dir }
    }

    /// A fixtures root holding the sample `dir/` tree.
    pub fn sample() -> Self {
        let fixture = Self::new();
        for (path, content) in SAMPLE_FILES {
            fixture.add_file(path, content);
        }
        fixture
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path of the sample `dir/` tree.
    pub fn sample_root(&self) -> PathBuf {
        self.dir.path().join("dir")
    }

    /// Add a file, creating parent directories as needed.
    pub fn add_file(&self, path: &str, content: impl AsRef<[u8]>) -> PathBuf {
        let full_path = self.dir.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&full_path, content).expect("Failed to write file");
        full_path
    }

    /// Add an empty directory, creating parents as needed.
    pub fn add_dir(&self, path: &str) -> PathBuf {
        let full_path = self.dir.path().join(path);
        fs::create_dir_all(&full_path).expect("Failed to create dir");
        full_path
    }
}

impl Default for FixtureDir {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
enum Node {
    Dir { children: Vec<OsString> },
    File { content: Vec<u8> },
}

/// In-memory filesystem for tests.
///
/// Every operation on a path registered with `fail_on` fails with the given
/// error kind, and `delay` postpones every operation on a path.
#[derive(Debug, Default, Clone)]
pub struct MemoryFs {
    nodes: HashMap<PathBuf, Node>,
    failures: HashMap<PathBuf, io::ErrorKind>,
    delays: HashMap<PathBuf, Duration>,
}

fn key(path: &Path) -> PathBuf {
    path.components().collect()
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// The sample tree rooted at `SAMPLE_ROOT`.
    pub fn sample() -> Self {
        let mut fs = Self::new();
        for (path, content) in SAMPLE_FILES {
            fs.add_file(Path::new("/fixtures").join(path), *content);
        }
        fs
    }

    pub fn add_dir(&mut self, path: impl AsRef<Path>) {
        let path = key(path.as_ref());
        if self.nodes.contains_key(&path) {
            return;
        }
        self.link_parent(&path);
        self.nodes.insert(path, Node::Dir { children: Vec::new() });
    }

    pub fn add_file(&mut self, path: impl AsRef<Path>, content: impl AsRef<[u8]>) {
        let path = key(path.as_ref());
        self.link_parent(&path);
        self.nodes.insert(
            path,
            Node::File {
                content: content.as_ref().to_vec(),
            },
        );
    }

    pub fn fail_on(&mut self, path: impl AsRef<Path>, kind: io::ErrorKind) {
        self.failures.insert(key(path.as_ref()), kind);
    }

    pub fn delay(&mut self, path: impl AsRef<Path>, delay: Duration) {
        self.delays.insert(key(path.as_ref()), delay);
    }

    fn link_parent(&mut self, path: &Path) {
        let (Some(parent), Some(name)) = (path.parent(), path.file_name()) else {
            return;
        };
        self.add_dir(parent);
        if let Some(Node::Dir { children }) = self.nodes.get_mut(parent) {
            if !children.iter().any(|child| child == name) {
                children.push(name.to_os_string());
            }
        }
    }

    /// Apply the configured delay and failure for `path`, then look it up.
    async fn lookup(&self, operation: IoOperation, path: &Path) -> Result<&Node> {
        let path = key(path);
        if let Some(delay) = self.delays.get(&path) {
            tokio::time::sleep(*delay).await;
        }
        if let Some(kind) = self.failures.get(&path) {
            let source = io::Error::new(*kind, "injected failure");
            return Err(Error::io(operation, path, source));
        }
        self.nodes.get(&path).ok_or_else(|| {
            let source = io::Error::new(io::ErrorKind::NotFound, "no such file or directory");
            Error::io(operation, path.clone(), source)
        })
    }
}

#[async_trait]
impl FileSystem for MemoryFs {
    async fn list_entries(&self, path: &Path) -> Result<Vec<OsString>> {
        match self.lookup(IoOperation::ListEntries, path).await? {
            Node::Dir { children } => Ok(children.clone()),
            Node::File { .. } => Err(Error::io(
                IoOperation::ListEntries,
                path,
                io::Error::new(io::ErrorKind::NotADirectory, "not a directory"),
            )),
        }
    }

    async fn metadata(&self, path: &Path) -> Result<EntryMetadata> {
        Ok(match self.lookup(IoOperation::Metadata, path).await? {
            Node::Dir { .. } => EntryMetadata { is_dir: true, len: 0 },
            Node::File { content } => EntryMetadata {
                is_dir: false,
                len: content.len() as u64,
            },
        })
    }

    async fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        match self.lookup(IoOperation::ReadFile, path).await? {
            Node::File { content } => Ok(content.clone()),
            Node::Dir { .. } => Err(Error::io(
                IoOperation::ReadFile,
                path,
                io::Error::new(io::ErrorKind::IsADirectory, "is a directory"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_creates_sample_tree() {
        let fixture = FixtureDir::sample();
        assert!(fixture.sample_root().join("sub").is_dir());
        assert_eq!(
            fs::read_to_string(fixture.sample_root().join("a")).unwrap(),
            "Hello world\n"
        );
    }

    #[tokio::test]
    async fn test_memory_fs_links_parents() {
        let fs = MemoryFs::sample();
        let mut names = fs.list_entries(Path::new(SAMPLE_ROOT)).await.unwrap();
        names.sort();
        assert_eq!(names, vec!["a", "b", "c", "d", "sub"]);

        let fixtures = fs.list_entries(Path::new("/fixtures/")).await.unwrap();
        assert_eq!(fixtures, vec!["dir"]);
    }

    #[tokio::test]
    async fn test_memory_fs_injected_failure() {
        let mut fs = MemoryFs::sample();
        fs.fail_on("/fixtures/dir/a", io::ErrorKind::PermissionDenied);

        let err = fs.read_file(Path::new("/fixtures/dir/a")).await.unwrap_err();
        assert_eq!(err.io_kind(), Some(io::ErrorKind::PermissionDenied));
        assert!(fs.read_file(Path::new("/fixtures/dir/b")).await.is_ok());
    }

    #[tokio::test]
    async fn test_memory_fs_kind_mismatches() {
        let fs = MemoryFs::sample();
        let err = fs.list_entries(Path::new("/fixtures/dir/a")).await.unwrap_err();
        assert_eq!(err.io_kind(), Some(io::ErrorKind::NotADirectory));

        let err = fs.read_file(Path::new(SAMPLE_ROOT)).await.unwrap_err();
        assert_eq!(err.io_kind(), Some(io::ErrorKind::IsADirectory));
    }
}
