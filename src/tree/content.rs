//! In-memory result of a content read

use std::collections::BTreeMap;
use std::collections::btree_map;

use serde::Serialize;

/// Contents of a single file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FileContent {
    Bytes(Vec<u8>),
    Text(String),
}

impl FileContent {
    /// Raw bytes of the content; the encoded form for text.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            FileContent::Bytes(bytes) => bytes,
            FileContent::Text(text) => text.as_bytes(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FileContent::Text(text) => Some(text),
            FileContent::Bytes(_) => None,
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A leaf file or a nested directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TreeEntry {
    File(FileContent),
    Dir(DirectoryTree),
}

impl TreeEntry {
    pub fn is_dir(&self) -> bool {
        matches!(self, TreeEntry::Dir(_))
    }
}

/// Mapping from entry name to contents, mirroring a directory on disk.
///
/// Serializes as a JSON object: nested objects for directories, strings for
/// text files and byte arrays for raw files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DirectoryTree {
    entries: BTreeMap<String, TreeEntry>,
}

impl DirectoryTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, entry: TreeEntry) {
        self.entries.insert(name.into(), entry);
    }

    pub fn get(&self, name: &str) -> Option<&TreeEntry> {
        self.entries.get(name)
    }

    pub fn file(&self, name: &str) -> Option<&FileContent> {
        match self.entries.get(name) {
            Some(TreeEntry::File(content)) => Some(content),
            _ => None,
        }
    }

    pub fn dir(&self, name: &str) -> Option<&DirectoryTree> {
        match self.entries.get(name) {
            Some(TreeEntry::Dir(tree)) => Some(tree),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in name order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, TreeEntry> {
        self.entries.iter()
    }

    /// Total number of files at every depth.
    pub fn file_count(&self) -> usize {
        self.entries
            .values()
            .map(|entry| match entry {
                TreeEntry::File(_) => 1,
                TreeEntry::Dir(tree) => tree.file_count(),
            })
            .sum()
    }
}

impl<'a> IntoIterator for &'a DirectoryTree {
    type Item = (&'a String, &'a TreeEntry);
    type IntoIter = btree_map::Iter<'a, String, TreeEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl FromIterator<(String, TreeEntry)> for DirectoryTree {
    fn from_iter<I: IntoIterator<Item = (String, TreeEntry)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
