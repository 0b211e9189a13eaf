//! Host filesystem boundary used by the async traversals
//!
//! Traversals only need three primitives: list the names in a directory,
//! stat a path, and read a file's bytes. Keeping them behind a trait lets
//! callers substitute a virtual or fault-injecting filesystem.

use std::ffi::OsString;
use std::path::Path;

use async_trait::async_trait;

use crate::error::{Error, IoOperation, Result};

/// Lightweight metadata needed by traversals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryMetadata {
    pub is_dir: bool,
    pub len: u64,
}

/// Async filesystem primitives consumed by `ContentReader` and `PathLister`.
#[async_trait]
pub trait FileSystem: Send + Sync {
    /// Names of the entries directly inside `path`, in host order.
    ///
    /// Names are returned as the host spells them so they can be joined
    /// back onto `path`, even when they are not valid UTF-8.
    async fn list_entries(&self, path: &Path) -> Result<Vec<OsString>>;

    /// Metadata of `path`, following symlinks.
    async fn metadata(&self, path: &Path) -> Result<EntryMetadata>;

    async fn read_file(&self, path: &Path) -> Result<Vec<u8>>;
}

/// Real filesystem backed by `tokio::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl LocalFs {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FileSystem for LocalFs {
    async fn list_entries(&self, path: &Path) -> Result<Vec<OsString>> {
        let io_err = |e| Error::io(IoOperation::ListEntries, path, e);

        let mut dir = tokio::fs::read_dir(path).await.map_err(io_err)?;
        let mut names = Vec::new();
        while let Some(entry) = dir.next_entry().await.map_err(io_err)? {
            names.push(entry.file_name());
        }
        Ok(names)
    }

    async fn metadata(&self, path: &Path) -> Result<EntryMetadata> {
        let md = tokio::fs::metadata(path)
            .await
            .map_err(|e| Error::io(IoOperation::Metadata, path, e))?;
        Ok(EntryMetadata {
            is_dir: md.is_dir(),
            len: md.len(),
        })
    }

    async fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        tokio::fs::read(path)
            .await
            .map_err(|e| Error::io(IoOperation::ReadFile, path, e))
    }
}
