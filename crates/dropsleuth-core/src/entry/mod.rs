/// Filesystem entries -- the handles a drop's items resolve to.
///
/// An [`Entry`] is either a file or a directory. Directories do not list
/// their children directly: they hand out a stateful [`EntryReader`] that
/// returns children in bounded pages and signals the end of the listing
/// with an empty page. Callers must keep reading until that empty page
/// arrives.
///
/// Two backends ship with the crate:
///
/// - [`fs`] -- native paths, paged over a sorted `read_dir` listing.
/// - [`memory`] -- in-memory trees with configurable paging and failures.
pub mod fs;
pub mod memory;

use crate::error::Result;
use crate::model::DroppedFile;
use std::fmt;

/// Names skipped during recursion when hidden/system filtering is on.
const SYSTEM_NAMES: &[&str] = &[".DS_Store", "Thumbs.db", "desktop.ini", "__MACOSX"];

/// Returns true for dot-files and well-known OS metadata files.
pub fn is_hidden_or_system(name: &str) -> bool {
    name.starts_with('.') || SYSTEM_NAMES.contains(&name)
}

/// The two kinds of entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// A file entry that can be resolved into a [`DroppedFile`] handle.
pub trait FileSource: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Resolve the file handle. The returned handle's `full_path` is
    /// rewritten by the flattener to reflect where the entry was found.
    fn file(&self) -> Result<DroppedFile>;
}

/// A directory entry.
pub trait DirectorySource: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Open a fresh paginated reader over this directory's children.
    fn create_reader(&self) -> Result<Box<dyn EntryReader>>;
}

/// Stateful cursor over a directory's children.
pub trait EntryReader: Send {
    /// Return the next page of children. An empty page ends the listing.
    fn read_entries(&mut self) -> Result<Vec<Entry>>;
}

/// A file or directory inside a drop.
#[derive(Debug)]
pub enum Entry {
    File(Box<dyn FileSource>),
    Directory(Box<dyn DirectorySource>),
}

impl Entry {
    pub fn file(source: impl FileSource + 'static) -> Self {
        Self::File(Box::new(source))
    }

    pub fn directory(source: impl DirectorySource + 'static) -> Self {
        Self::Directory(Box::new(source))
    }

    pub fn name(&self) -> &str {
        match self {
            Self::File(f) => f.name(),
            Self::Directory(d) => d.name(),
        }
    }

    pub fn kind(&self) -> EntryKind {
        match self {
            Self::File(_) => EntryKind::File,
            Self::Directory(_) => EntryKind::Directory,
        }
    }

    pub fn is_file(&self) -> bool {
        self.kind() == EntryKind::File
    }

    pub fn is_directory(&self) -> bool {
        self.kind() == EntryKind::Directory
    }
}
