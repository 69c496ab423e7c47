/// Native filesystem entries.
///
/// Directory listings are read once when the reader is created, sorted by
/// name so traversal order is reproducible across platforms, and then served
/// in pages of `page_size`, the same way a browser's directory reader
/// hands out batches.
///
/// Children are classified from the listing's own file type, which does
/// not follow symlinks. A symlinked directory inside a dropped folder is
/// never descended into, so links back to an ancestor cannot loop. Links
/// to files resolve as the file they point at.
use super::{DirectorySource, Entry, EntryReader, FileSource};
use crate::error::{DropError, Result};
use crate::model::DroppedFile;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Browsers return directory listings in batches of 100.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Constructors for native entries.
pub struct FsEntry;

impl FsEntry {
    /// Map a native path to an [`Entry`].
    ///
    /// A path whose metadata cannot be read is treated as a file so the
    /// failure surfaces when the flattener resolves it. The dropped path
    /// itself is followed if it is a link: the user picked it explicitly.
    pub fn from_path(path: impl Into<PathBuf>, page_size: usize) -> Entry {
        let path = path.into();
        let name = display_name(&path);
        if path.is_dir() {
            Entry::directory(FsDirectory {
                name,
                path,
                page_size: page_size.max(1),
            })
        } else {
            Entry::file(FsFile { name, path })
        }
    }
}

#[derive(Debug)]
pub struct FsFile {
    name: String,
    path: PathBuf,
}

impl FileSource for FsFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn file(&self) -> Result<DroppedFile> {
        let meta = std::fs::metadata(&self.path).map_err(|source| DropError::ReadFile {
            path: self.path.to_string_lossy().into_owned(),
            source,
        })?;
        Ok(DroppedFile::new(&self.name, meta.len())
            .with_path(self.path.clone())
            .with_modified(meta.modified().ok()))
    }
}

#[derive(Debug)]
pub struct FsDirectory {
    name: String,
    path: PathBuf,
    page_size: usize,
}

impl DirectorySource for FsDirectory {
    fn name(&self) -> &str {
        &self.name
    }

    fn create_reader(&self) -> Result<Box<dyn EntryReader>> {
        let read_err = |source| DropError::ReadDir {
            path: self.path.to_string_lossy().into_owned(),
            source,
        };

        let mut children = Vec::new();
        let mut linked_dirs = 0usize;
        for entry in std::fs::read_dir(&self.path).map_err(read_err)? {
            let entry = entry.map_err(read_err)?;
            let path = entry.path();
            let kind = match entry.file_type() {
                Ok(ft) if ft.is_dir() => ChildKind::Directory,
                // Dangling links stay files so the failure surfaces on resolve.
                Ok(ft) if ft.is_symlink() && path.is_dir() => {
                    linked_dirs += 1;
                    continue;
                }
                _ => ChildKind::File,
            };
            children.push((path, kind));
        }
        children.sort_by(|(a, _), (b, _)| a.file_name().cmp(&b.file_name()));
        debug!(
            "Listed {} children of {} (page size {}, {} linked dir(s) not followed)",
            children.len(),
            self.path.display(),
            self.page_size,
            linked_dirs
        );

        Ok(Box::new(FsReader {
            pending: children.into_iter(),
            page_size: self.page_size,
        }))
    }
}

#[derive(Debug, Clone, Copy)]
enum ChildKind {
    File,
    Directory,
}

/// Pages over a pre-sorted listing.
struct FsReader {
    pending: std::vec::IntoIter<(PathBuf, ChildKind)>,
    page_size: usize,
}

impl EntryReader for FsReader {
    fn read_entries(&mut self) -> Result<Vec<Entry>> {
        let page_size = self.page_size;
        Ok(self
            .pending
            .by_ref()
            .take(page_size)
            .map(|(path, kind)| {
                let name = display_name(&path);
                match kind {
                    ChildKind::Directory => Entry::directory(FsDirectory {
                        name,
                        path,
                        page_size,
                    }),
                    ChildKind::File => Entry::file(FsFile { name, path }),
                }
            })
            .collect())
    }
}

/// Derive a display name for a path: its last component, or the whole
/// path for roots like `/` or `C:\`.
fn display_name(path: &Path) -> String {
    match path.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => {
            let full = path.to_string_lossy();
            let trimmed = full.trim_end_matches(['/', '\\']);
            if trimmed.is_empty() {
                full.to_string()
            } else {
                trimmed.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn file_entry_resolves_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("a.txt");
        fs::write(&p, "hello").unwrap();

        let entry = FsEntry::from_path(&p, DEFAULT_PAGE_SIZE);
        let Entry::File(file) = entry else {
            panic!("expected a file entry");
        };
        let handle = file.file().unwrap();
        assert_eq!(handle.name, "a.txt");
        assert_eq!(handle.size, 5);
        assert_eq!(handle.path.as_deref(), Some(p.as_path()));
        assert!(handle.modified.is_some());
    }

    #[test]
    fn missing_path_is_a_file_that_fails_to_resolve() {
        let entry = FsEntry::from_path("/nonexistent/dropsleuth/xyz", DEFAULT_PAGE_SIZE);
        let Entry::File(file) = entry else {
            panic!("expected a file entry");
        };
        let err = file.file().unwrap_err();
        assert!(matches!(err, DropError::ReadFile { .. }), "{err}");
    }

    #[test]
    fn reader_pages_sorted_children_until_empty() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["c.txt", "a.txt", "b.txt"] {
            fs::write(dir.path().join(name), "x").unwrap();
        }

        let Entry::Directory(d) = FsEntry::from_path(dir.path(), 2) else {
            panic!("expected a directory entry");
        };
        let mut reader = d.create_reader().unwrap();

        let first: Vec<String> = reader
            .read_entries()
            .unwrap()
            .iter()
            .map(|e| e.name().to_string())
            .collect();
        let second: Vec<String> = reader
            .read_entries()
            .unwrap()
            .iter()
            .map(|e| e.name().to_string())
            .collect();
        assert_eq!(first, ["a.txt", "b.txt"]);
        assert_eq!(second, ["c.txt"]);
        assert!(reader.read_entries().unwrap().is_empty());
    }

    #[test]
    fn zero_page_size_is_clamped() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a"), "x").unwrap();
        let Entry::Directory(d) = FsEntry::from_path(dir.path(), 0) else {
            panic!("expected a directory entry");
        };
        let mut reader = d.create_reader().unwrap();
        assert_eq!(reader.read_entries().unwrap().len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn linked_directories_are_not_listed() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("A");
        fs::create_dir(&a).unwrap();
        fs::write(a.join("x.txt"), "x").unwrap();
        std::os::unix::fs::symlink(&a, a.join("loop")).unwrap();
        std::os::unix::fs::symlink(a.join("x.txt"), a.join("y.txt")).unwrap();
        std::os::unix::fs::symlink(a.join("gone"), a.join("z.txt")).unwrap();

        let Entry::Directory(d) = FsEntry::from_path(&a, DEFAULT_PAGE_SIZE) else {
            panic!("expected a directory entry");
        };
        let entries = d.create_reader().unwrap().read_entries().unwrap();
        let names: Vec<&str> = entries.iter().map(Entry::name).collect();
        assert_eq!(names, ["x.txt", "y.txt", "z.txt"]);
        assert!(entries.iter().all(Entry::is_file));
    }

    #[test]
    fn display_name_of_root() {
        assert_eq!(display_name(Path::new("/")), "/");
        assert_eq!(display_name(Path::new("/tmp/foo")), "foo");
    }
}
