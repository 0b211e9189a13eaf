//! Directory traversal logic
//!
//! This module provides the two traversals:
//!
//! - `ContentReader`: Reads every file into a nested `DirectoryTree`, sync or async
//! - `PathLister`: Lists every directory and file path, streaming `ListEvent`s as it goes

mod config;
mod content;
mod lister;
mod reader;
mod traversal;
mod utils;

// Re-export public types
pub use config::{ListOptions, PathFilter, ReadOptions};
pub use content::{DirectoryTree, FileContent, TreeEntry};
pub use lister::{ListEvent, PathList, PathLister, PathListing, list_paths};
pub use reader::{ContentReader, read_tree, read_tree_sync};
pub use utils::{default_base_dir, denormalize, should_ignore_dir, with_trailing_separator};
