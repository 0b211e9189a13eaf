//! read-dir-files - Read a directory tree's file contents, or list its paths with live events

pub mod encoding;
pub mod error;
pub mod fs;
pub mod output;
pub mod tree;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use encoding::Encoding;
pub use error::{Error, IoOperation, Result};
pub use fs::{EntryMetadata, FileSystem, LocalFs};
pub use output::{EventPrinter, OutputConfig, PathPrinter, print_json};
pub use tree::{
    ContentReader, DirectoryTree, FileContent, ListEvent, ListOptions, PathFilter, PathList,
    PathLister, PathListing, ReadOptions, TreeEntry, list_paths, read_tree, read_tree_sync,
};
