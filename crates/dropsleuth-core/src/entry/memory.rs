/// In-memory entry trees.
///
/// Useful for hosts that receive virtual trees (archives, remote listings)
/// and for exercising the flattener: page sizes and read failures can be
/// set per node.
///
/// ```ignore
/// let tree = MemoryNode::dir("A", vec![
///     MemoryNode::file("x.txt", "x"),
///     MemoryNode::dir("B", vec![MemoryNode::file("y.txt", "yy")]).paged(1),
/// ]);
/// let entry = tree.into_entry();
/// ```
use super::{DirectorySource, Entry, EntryReader, FileSource};
use crate::error::{DropError, Result};
use crate::model::DroppedFile;
use std::sync::Arc;

use super::fs::DEFAULT_PAGE_SIZE;

#[derive(Debug, Clone)]
enum NodeKind {
    File(Arc<[u8]>),
    Dir(Vec<MemoryNode>),
}

/// Simulated read failure.
#[derive(Debug, Clone)]
struct Failure {
    /// Pages served successfully before the failure. Zero fails on open.
    after_pages: usize,
    message: String,
}

/// A node of an in-memory tree. Convert with [`MemoryNode::into_entry`].
#[derive(Debug, Clone)]
pub struct MemoryNode {
    name: String,
    kind: NodeKind,
    page_size: usize,
    failure: Option<Failure>,
}

impl MemoryNode {
    pub fn file(name: &str, contents: impl AsRef<[u8]>) -> Self {
        Self {
            name: name.to_string(),
            kind: NodeKind::File(Arc::from(contents.as_ref())),
            page_size: DEFAULT_PAGE_SIZE,
            failure: None,
        }
    }

    pub fn dir(name: &str, children: Vec<MemoryNode>) -> Self {
        Self {
            name: name.to_string(),
            kind: NodeKind::Dir(children),
            page_size: DEFAULT_PAGE_SIZE,
            failure: None,
        }
    }

    /// Serve this directory's children `page_size` at a time.
    pub fn paged(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Fail when the file is resolved or the directory is opened.
    pub fn failing(self, message: &str) -> Self {
        self.failing_after_pages(0, message)
    }

    /// Serve `pages` pages successfully, then fail the next read.
    /// Only meaningful for directories; files fail on resolve regardless.
    pub fn failing_after_pages(mut self, pages: usize, message: &str) -> Self {
        self.failure = Some(Failure {
            after_pages: pages,
            message: message.to_string(),
        });
        self
    }

    pub fn into_entry(self) -> Entry {
        match self.kind {
            NodeKind::File(contents) => Entry::file(MemoryFile {
                name: self.name,
                contents,
                failure: self.failure,
            }),
            NodeKind::Dir(children) => Entry::directory(MemoryDirectory {
                name: self.name,
                children,
                page_size: self.page_size,
                failure: self.failure,
            }),
        }
    }
}

#[derive(Debug)]
struct MemoryFile {
    name: String,
    contents: Arc<[u8]>,
    failure: Option<Failure>,
}

impl FileSource for MemoryFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn file(&self) -> Result<DroppedFile> {
        if let Some(failure) = &self.failure {
            return Err(DropError::ReadFile {
                path: self.name.clone(),
                source: std::io::Error::other(failure.message.clone()),
            });
        }
        Ok(DroppedFile::new(&self.name, self.contents.len() as u64))
    }
}

#[derive(Debug)]
struct MemoryDirectory {
    name: String,
    children: Vec<MemoryNode>,
    page_size: usize,
    failure: Option<Failure>,
}

impl DirectorySource for MemoryDirectory {
    fn name(&self) -> &str {
        &self.name
    }

    fn create_reader(&self) -> Result<Box<dyn EntryReader>> {
        if let Some(failure) = self.failure.as_ref().filter(|f| f.after_pages == 0) {
            return Err(read_dir_error(&self.name, &failure.message));
        }
        Ok(Box::new(MemoryReader {
            name: self.name.clone(),
            pending: self.children.clone().into_iter(),
            page_size: self.page_size,
            pages_served: 0,
            failure: self.failure.clone(),
        }))
    }
}

struct MemoryReader {
    name: String,
    pending: std::vec::IntoIter<MemoryNode>,
    page_size: usize,
    pages_served: usize,
    failure: Option<Failure>,
}

impl EntryReader for MemoryReader {
    fn read_entries(&mut self) -> Result<Vec<Entry>> {
        if let Some(failure) = &self.failure {
            if self.pages_served >= failure.after_pages {
                return Err(read_dir_error(&self.name, &failure.message));
            }
        }
        self.pages_served += 1;
        Ok(self
            .pending
            .by_ref()
            .take(self.page_size)
            .map(MemoryNode::into_entry)
            .collect())
    }
}

fn read_dir_error(name: &str, message: &str) -> DropError {
    DropError::ReadDir {
        path: name.to_string(),
        source: std::io::Error::other(message.to_string()),
    }
}
