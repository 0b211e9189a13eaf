//! ContentReader - reads every file under a directory into a `DirectoryTree`

use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::runtime::Handle;
use tracing::{debug, trace};

use crate::encoding::Encoding;
use crate::error::{Error, IoOperation, Result};
use crate::fs::{FileSystem, LocalFs};

use super::config::ReadOptions;
use super::content::{DirectoryTree, FileContent, TreeEntry};
use super::traversal::SiblingTasks;

/// Reads file contents into a tree mirroring the directory structure.
///
/// `read_sync` walks the local disk depth-first, one entry at a time.
/// `read` fans out one task per sibling entry on a Tokio runtime, going
/// through the configured `FileSystem`.
pub struct ContentReader {
    options: ReadOptions,
    fs: Arc<dyn FileSystem>,
    runtime: Option<Handle>,
}

impl ContentReader {
    pub fn new(options: ReadOptions) -> Self {
        Self {
            options,
            fs: Arc::new(LocalFs),
            runtime: None,
        }
    }

    /// Read through `fs` instead of the local disk (async reads only).
    pub fn with_filesystem(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = fs;
        self
    }

    /// Spawn sibling tasks on `handle` instead of the ambient runtime.
    pub fn with_runtime(mut self, handle: Handle) -> Self {
        self.runtime = Some(handle);
        self
    }

    pub fn options(&self) -> &ReadOptions {
        &self.options
    }

    pub fn read_sync(&self, root: &Path) -> Result<DirectoryTree> {
        debug!("Reading tree at {} (sync)", root.display());
        read_dir_sync(root, &self.options)
    }

    /// # Panics
    ///
    /// Panics if no runtime was configured and this is not polled from
    /// within a Tokio runtime.
    pub async fn read(&self, root: &Path) -> Result<DirectoryTree> {
        debug!("Reading tree at {}", root.display());
        let ctx = Arc::new(ReadContext {
            fs: self.fs.clone(),
            handle: self.runtime.clone().unwrap_or_else(Handle::current),
            options: self.options.clone(),
        });
        read_dir(ctx, root.to_path_buf()).await
    }
}

/// Read every file under `root` concurrently on the local disk.
pub async fn read_tree(root: impl AsRef<Path>, options: &ReadOptions) -> Result<DirectoryTree> {
    ContentReader::new(options.clone()).read(root.as_ref()).await
}

/// Read every file under `root`, blocking.
pub fn read_tree_sync(root: impl AsRef<Path>, options: &ReadOptions) -> Result<DirectoryTree> {
    ContentReader::new(options.clone()).read_sync(root.as_ref())
}

fn decode_content(bytes: Vec<u8>, encoding: Option<Encoding>) -> FileContent {
    match encoding {
        Some(encoding) => FileContent::Text(encoding.decode(&bytes)),
        None => FileContent::Bytes(bytes),
    }
}

fn read_dir_sync(dir: &Path, options: &ReadOptions) -> Result<DirectoryTree> {
    let list_err = |e| Error::io(IoOperation::ListEntries, dir, e);
    let entries = std::fs::read_dir(dir).map_err(list_err)?;

    let mut tree = DirectoryTree::new();
    for entry in entries {
        let entry = entry.map_err(list_err)?;
        let entry_path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();

        let metadata = std::fs::metadata(&entry_path)
            .map_err(|e| Error::io(IoOperation::Metadata, &entry_path, e))?;

        if metadata.is_dir() {
            if options.recursive {
                let subtree = read_dir_sync(&entry_path, options)?;
                tree.insert(name, TreeEntry::Dir(subtree));
            }
            continue;
        }

        trace!("Reading file {}", entry_path.display());
        let bytes = std::fs::read(&entry_path)
            .map_err(|e| Error::io(IoOperation::ReadFile, &entry_path, e))?;
        tree.insert(name, TreeEntry::File(decode_content(bytes, options.encoding)));
    }

    Ok(tree)
}

struct ReadContext {
    fs: Arc<dyn FileSystem>,
    handle: Handle,
    options: ReadOptions,
}

fn read_dir(ctx: Arc<ReadContext>, dir: PathBuf) -> BoxFuture<'static, Result<DirectoryTree>> {
    read_dir_level(ctx, dir).boxed()
}

async fn read_dir_level(ctx: Arc<ReadContext>, dir: PathBuf) -> Result<DirectoryTree> {
    let names = ctx.fs.list_entries(&dir).await?;
    debug!("Read {} entries from {}", names.len(), dir.display());

    let mut siblings = SiblingTasks::new(ctx.handle.clone());
    for name in names {
        let entry_path = dir.join(&name);
        let key = name.to_string_lossy().into_owned();
        siblings.spawn(read_entry(ctx.clone(), key, entry_path));
    }

    let mut tree = DirectoryTree::new();
    siblings
        .join_first_error(|entry| {
            if let Some((name, entry)) = entry {
                tree.insert(name, entry);
            }
        })
        .await?;
    Ok(tree)
}

/// Stat one entry and read it; `None` for subdirectories skipped by a
/// non-recursive read.
async fn read_entry(
    ctx: Arc<ReadContext>,
    name: String,
    path: PathBuf,
) -> Result<Option<(String, TreeEntry)>> {
    let metadata = ctx.fs.metadata(&path).await?;

    if metadata.is_dir {
        if !ctx.options.recursive {
            trace!("Skipping subdirectory {}", path.display());
            return Ok(None);
        }
        let subtree = read_dir(ctx.clone(), path).await?;
        return Ok(Some((name, TreeEntry::Dir(subtree))));
    }

    trace!("Reading file {} ({} bytes)", path.display(), metadata.len);
    let bytes = ctx.fs.read_file(&path).await?;
    let content = decode_content(bytes, ctx.options.encoding);
    Ok(Some((name, TreeEntry::File(content))))
}
