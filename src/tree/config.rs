//! Configuration types for traversals

use std::fmt;
use std::sync::Arc;

use crate::encoding::Encoding;
use crate::error::Result;

/// Configuration for `ContentReader`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOptions {
    /// Decode file contents with this codec; raw bytes when `None`.
    pub encoding: Option<Encoding>,
    /// Descend into subdirectories. When false, subdirectories are left out
    /// of the result entirely.
    pub recursive: bool,
}

impl ReadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options decoding with the codec called `name`.
    pub fn from_encoding_name(name: &str) -> Result<Self> {
        Ok(Self::new().with_encoding(name.parse()?))
    }

    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = Some(encoding);
        self
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            encoding: None,
            recursive: true,
        }
    }
}

/// Predicate deciding whether a directory is descended into.
///
/// Receives the directory's full path with a trailing separator,
/// regardless of `ListOptions::normalize`.
#[derive(Clone)]
pub struct PathFilter(Arc<dyn Fn(&str) -> bool + Send + Sync>);

impl PathFilter {
    pub fn new(f: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn accepts(&self, path: &str) -> bool {
        (self.0)(path)
    }
}

impl fmt::Debug for PathFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PathFilter(..)")
    }
}

/// Configuration for `PathLister`.
#[derive(Debug, Clone)]
pub struct ListOptions {
    pub recursive: bool,
    /// Emit full paths when true; paths with `base_dir` stripped when false.
    pub normalize: bool,
    /// Prefix stripped from denormalized paths. Defaults to the parent of
    /// the traversal root.
    pub base_dir: Option<String>,
    pub filter: Option<PathFilter>,
}

impl ListOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    pub fn base_dir(mut self, base_dir: impl Into<String>) -> Self {
        self.base_dir = Some(base_dir.into());
        self
    }

    pub fn filter(mut self, f: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        self.filter = Some(PathFilter::new(f));
        self
    }
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            recursive: true,
            normalize: true,
            base_dir: None,
            filter: None,
        }
    }
}
