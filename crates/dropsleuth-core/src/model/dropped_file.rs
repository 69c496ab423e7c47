/// A single file handle delivered to the drop callback.
///
/// Handles are produced either directly by the host (legacy files path) or
/// by the flattener from file entries (items path). They carry metadata
/// only; content is never read.
use compact_str::CompactString;
use std::path::PathBuf;
use std::time::SystemTime;

#[derive(Debug, Clone, PartialEq)]
pub struct DroppedFile {
    /// File name only.
    pub name: CompactString,

    /// Slash-separated path inside the drop, rooted at `/`.
    /// For a file `y.txt` found in folder `B` inside dropped folder `A`
    /// this is `/A/B/y.txt`.
    pub full_path: String,

    /// Native path, when the host exposes one.
    pub path: Option<PathBuf>,

    /// Size in bytes.
    pub size: u64,

    pub modified: Option<SystemTime>,
}

impl DroppedFile {
    /// Create a top-level handle (full path `/name`).
    pub fn new(name: &str, size: u64) -> Self {
        Self {
            name: CompactString::new(name),
            full_path: join_path("", name),
            path: None,
            size,
            modified: None,
        }
    }

    pub fn with_path(mut self, path: PathBuf) -> Self {
        self.path = Some(path);
        self
    }

    pub fn with_modified(mut self, modified: Option<SystemTime>) -> Self {
        self.modified = modified;
        self
    }

    /// Re-root this handle under `parent` (an in-drop directory path).
    pub(crate) fn under(mut self, parent: &str) -> Self {
        self.full_path = join_path(parent, &self.name);
        self
    }
}

/// Join an in-drop parent path and a child name.
///
/// The empty string is the drop root.
pub(crate) fn join_path(parent: &str, name: &str) -> String {
    let parent = parent.trim_end_matches('/');
    let mut out = String::with_capacity(parent.len() + name.len() + 1);
    out.push_str(parent);
    out.push('/');
    out.push_str(name);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_level_handle_is_rooted() {
        let f = DroppedFile::new("x.txt", 3);
        assert_eq!(f.full_path, "/x.txt");
        assert_eq!(f.name, "x.txt");
    }

    #[test]
    fn under_rewrites_full_path() {
        let f = DroppedFile::new("y.txt", 1).under("/A/B");
        assert_eq!(f.full_path, "/A/B/y.txt");
    }

    #[test]
    fn join_path_handles_root_and_trailing_slash() {
        assert_eq!(join_path("", "A"), "/A");
        assert_eq!(join_path("/", "A"), "/A");
        assert_eq!(join_path("/A/", "b"), "/A/b");
    }
}
