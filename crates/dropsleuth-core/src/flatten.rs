/// Directory tree flattening.
///
/// Turns a set of dropped entries into one flat, ordered list of file
/// handles:
///
/// 1. A file entry resolves to a one-element list.
/// 2. A directory entry is paged through its reader until an empty page
///    comes back. Readers return bounded pages, so stopping after the first
///    page would silently lose children.
/// 3. The children of a directory (and the top-level items of a drop) are
///    walked in parallel on a rayon pool. Results are collected by position,
///    not by completion, so the output follows discovery order: every
///    sibling's subtree appears in the order the sibling was read.
///
/// Every branch yields an explicit `Result`. The configured
/// [`FailurePolicy`] decides whether the first failing branch (in discovery
/// order) fails the drop, or whether failures are collected in
/// [`Flattened::skipped`] next to the files that did resolve.
use crate::entry::{is_hidden_or_system, DirectorySource, Entry};
use crate::error::{DropError, Result};
use crate::model::dropped_file::join_path;
use crate::model::DroppedFile;
use crate::settings::{DropSettings, FailurePolicy};
use rayon::prelude::*;
use std::time::Instant;
use tracing::{debug, warn};

/// Output of a traversal.
#[derive(Debug, Default)]
pub struct Flattened {
    pub files: Vec<DroppedFile>,
    /// Failed branches. Always empty under [`FailurePolicy::FailFast`].
    pub skipped: Vec<DropError>,
}

impl Flattened {
    fn single(file: DroppedFile) -> Self {
        Self {
            files: vec![file],
            skipped: Vec::new(),
        }
    }

    fn append(&mut self, other: Flattened) {
        self.files.extend(other.files);
        self.skipped.extend(other.skipped);
    }
}

pub struct Flattener {
    /// Dedicated pool; `None` falls back to rayon's global pool.
    pool: Option<rayon::ThreadPool>,
    policy: FailurePolicy,
    skip_hidden: bool,
}

impl Flattener {
    pub fn new(settings: &DropSettings) -> Self {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_cpus::get())
            .thread_name(|i| format!("dropsleuth-walk-{i}"))
            .build();
        let pool = match pool {
            Ok(pool) => Some(pool),
            Err(e) => {
                warn!("Could not build traversal pool: {e} -- using the global rayon pool");
                None
            }
        };
        Self {
            pool,
            policy: settings.failure_policy,
            skip_hidden: settings.skip_hidden,
        }
    }

    /// Flatten all top-level items of a drop, in item order.
    ///
    /// Top-level items are never filtered, even with `skip_hidden` on: the
    /// user picked them explicitly.
    pub fn flatten_all(&self, items: &[Entry]) -> Result<Flattened> {
        let start = Instant::now();
        let out = self.install(|| self.walk_siblings(items, ""))?;
        debug!(
            "Flattened {} item(s) into {} file(s), {} skipped, in {:?}",
            items.len(),
            out.files.len(),
            out.skipped.len(),
            start.elapsed()
        );
        Ok(out)
    }

    /// Flatten a single entry.
    pub fn flatten_entry(&self, entry: &Entry) -> Result<Flattened> {
        self.install(|| self.walk(entry, ""))
    }

    fn install<R: Send>(&self, op: impl FnOnce() -> R + Send) -> R {
        match &self.pool {
            Some(pool) => pool.install(op),
            None => op(),
        }
    }

    fn walk(&self, entry: &Entry, parent: &str) -> Result<Flattened> {
        match entry {
            Entry::File(file) => match file.file() {
                Ok(handle) => Ok(Flattened::single(handle.under(parent))),
                Err(err) => self.branch_failed(err, join_path(parent, file.name())),
            },
            Entry::Directory(dir) => {
                let dir_path = join_path(parent, dir.name());
                let mut children = match read_all(dir.as_ref()) {
                    Ok(children) => children,
                    Err(err) => return self.branch_failed(err, dir_path),
                };
                if self.skip_hidden {
                    children.retain(|child| !is_hidden_or_system(child.name()));
                }
                self.walk_siblings(&children, &dir_path)
            }
        }
    }

    /// Fan out over siblings, then merge by position.
    fn walk_siblings(&self, entries: &[Entry], parent: &str) -> Result<Flattened> {
        let branches: Vec<Result<Flattened>> = entries
            .par_iter()
            .map(|entry| self.walk(entry, parent))
            .collect();

        let mut merged = Flattened::default();
        for branch in branches {
            merged.append(branch?);
        }
        Ok(merged)
    }

    /// Errors from entry sources name the entry natively; re-root them
    /// under the drop so sibling subtrees stay distinguishable.
    fn branch_failed(&self, err: DropError, entry_path: String) -> Result<Flattened> {
        let err = err.at_entry_path(entry_path);
        warn!("Drop traversal branch failed: {err}");
        match self.policy {
            FailurePolicy::FailFast => Err(err),
            FailurePolicy::BestEffort => Ok(Flattened {
                files: Vec::new(),
                skipped: vec![err],
            }),
        }
    }
}

/// Drain a directory reader until it returns an empty page.
fn read_all(dir: &dyn DirectorySource) -> Result<Vec<Entry>> {
    let mut reader = dir.create_reader()?;
    let mut entries = Vec::new();
    let mut pages = 0usize;
    loop {
        let page = reader.read_entries()?;
        if page.is_empty() {
            break;
        }
        pages += 1;
        entries.extend(page);
    }
    debug!(
        "Read {} entries from `{}` in {} page(s)",
        entries.len(),
        dir.name(),
        pages
    );
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::memory::MemoryNode;

    fn flattener(policy: FailurePolicy, skip_hidden: bool) -> Flattener {
        Flattener::new(&DropSettings {
            failure_policy: policy,
            skip_hidden,
            ..DropSettings::default()
        })
    }

    fn paths(files: &[DroppedFile]) -> Vec<&str> {
        files.iter().map(|f| f.full_path.as_str()).collect()
    }

    #[test]
    fn file_entry_resolves_to_itself() {
        let out = flattener(FailurePolicy::FailFast, false)
            .flatten_entry(&MemoryNode::file("x.txt", "abc").into_entry())
            .unwrap();
        assert_eq!(paths(&out.files), ["/x.txt"]);
        assert_eq!(out.files[0].size, 3);
    }

    #[test]
    fn nested_directory_in_discovery_order() {
        let tree = MemoryNode::dir(
            "A",
            vec![
                MemoryNode::file("x.txt", "x"),
                MemoryNode::dir("B", vec![MemoryNode::file("y.txt", "y")]),
            ],
        );
        let out = flattener(FailurePolicy::FailFast, false)
            .flatten_entry(&tree.into_entry())
            .unwrap();
        let names: Vec<&str> = out.files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["x.txt", "y.txt"]);
        assert_eq!(paths(&out.files), ["/A/x.txt", "/A/B/y.txt"]);
    }

    #[test]
    fn subdirectory_before_file_keeps_read_order() {
        let tree = MemoryNode::dir(
            "A",
            vec![
                MemoryNode::dir(
                    "B",
                    vec![MemoryNode::file("1", ""), MemoryNode::file("2", "")],
                ),
                MemoryNode::file("3", ""),
                MemoryNode::dir("C", vec![MemoryNode::file("4", "")]),
            ],
        );
        let out = flattener(FailurePolicy::FailFast, false)
            .flatten_entry(&tree.into_entry())
            .unwrap();
        assert_eq!(paths(&out.files), ["/A/B/1", "/A/B/2", "/A/3", "/A/C/4"]);
    }

    #[test]
    fn all_pages_are_read() {
        let children = (0..7)
            .map(|i| MemoryNode::file(&format!("f{i}"), ""))
            .collect();
        let tree = MemoryNode::dir("A", children).paged(3);
        let out = flattener(FailurePolicy::FailFast, false)
            .flatten_entry(&tree.into_entry())
            .unwrap();
        let names: Vec<&str> = out.files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["f0", "f1", "f2", "f3", "f4", "f5", "f6"]);
    }

    #[test]
    fn empty_directory_yields_nothing() {
        let out = flattener(FailurePolicy::FailFast, false)
            .flatten_entry(&MemoryNode::dir("A", vec![]).into_entry())
            .unwrap();
        assert!(out.files.is_empty());
    }

    #[test]
    fn flatten_all_merges_items_in_order() {
        let items = vec![
            MemoryNode::dir("A", vec![MemoryNode::file("a", "")]).into_entry(),
            MemoryNode::file("b", "").into_entry(),
            MemoryNode::dir("C", vec![MemoryNode::file("c", "")]).into_entry(),
        ];
        let out = flattener(FailurePolicy::FailFast, false)
            .flatten_all(&items)
            .unwrap();
        assert_eq!(paths(&out.files), ["/A/a", "/b", "/C/c"]);
    }

    #[test]
    fn fail_fast_surfaces_the_error() {
        let tree = MemoryNode::dir(
            "A",
            vec![
                MemoryNode::file("ok", ""),
                MemoryNode::dir("B", vec![]).failing("denied"),
            ],
        );
        let err = flattener(FailurePolicy::FailFast, false)
            .flatten_entry(&tree.into_entry())
            .unwrap_err();
        assert_eq!(err.entry_path(), Some("/A/B"));
    }

    #[test]
    fn fail_fast_reports_first_failure_in_discovery_order() {
        let items = vec![
            MemoryNode::file("first", "").failing("one").into_entry(),
            MemoryNode::file("second", "").failing("two").into_entry(),
        ];
        let err = flattener(FailurePolicy::FailFast, false)
            .flatten_all(&items)
            .unwrap_err();
        assert_eq!(err.entry_path(), Some("/first"));
    }

    #[test]
    fn best_effort_keeps_healthy_branches() {
        let tree = MemoryNode::dir(
            "A",
            vec![
                MemoryNode::file("x", ""),
                MemoryNode::dir("B", vec![MemoryNode::file("lost", "")])
                    .paged(1)
                    .failing_after_pages(1, "io"),
                MemoryNode::file("z", ""),
            ],
        );
        let out = flattener(FailurePolicy::BestEffort, false)
            .flatten_entry(&tree.into_entry())
            .unwrap();
        assert_eq!(paths(&out.files), ["/A/x", "/A/z"]);
        assert_eq!(out.skipped.len(), 1);
        assert_eq!(out.skipped[0].entry_path(), Some("/A/B"));
    }

    #[test]
    fn same_named_failures_keep_their_drop_paths() {
        let items = vec![
            MemoryNode::dir("A", vec![MemoryNode::dir("B", vec![]).failing("denied")])
                .into_entry(),
            MemoryNode::dir(
                "C",
                vec![MemoryNode::dir("B", vec![MemoryNode::file("f", "")]).failing("denied")],
            )
            .into_entry(),
            MemoryNode::dir("D", vec![MemoryNode::file("B", "").failing("gone")]).into_entry(),
        ];
        let out = flattener(FailurePolicy::BestEffort, false)
            .flatten_all(&items)
            .unwrap();
        assert!(out.files.is_empty());
        let failed: Vec<Option<&str>> = out.skipped.iter().map(DropError::entry_path).collect();
        assert_eq!(failed, [Some("/A/B"), Some("/C/B"), Some("/D/B")]);
        assert!(out.skipped[1].to_string().contains("`/C/B`"));
    }

    #[test]
    fn skip_hidden_filters_children_not_items() {
        let items = vec![
            MemoryNode::file(".top", "").into_entry(),
            MemoryNode::dir(
                "A",
                vec![
                    MemoryNode::file(".DS_Store", ""),
                    MemoryNode::file("keep", ""),
                    MemoryNode::dir("__MACOSX", vec![MemoryNode::file("junk", "")]),
                ],
            )
            .into_entry(),
        ];
        let out = flattener(FailurePolicy::FailFast, true)
            .flatten_all(&items)
            .unwrap();
        assert_eq!(paths(&out.files), ["/.top", "/A/keep"]);

        let out = flattener(FailurePolicy::FailFast, false)
            .flatten_all(&items)
            .unwrap();
        assert_eq!(out.files.len(), 4);
    }

    #[test]
    fn wide_and_deep_tree_counts_every_file() {
        fn level(depth: usize) -> Vec<MemoryNode> {
            let mut nodes: Vec<MemoryNode> = (0..5)
                .map(|i| MemoryNode::file(&format!("f{depth}_{i}"), "x"))
                .collect();
            if depth > 0 {
                for d in 0..3 {
                    nodes.push(MemoryNode::dir(&format!("d{depth}_{d}"), level(depth - 1)).paged(4));
                }
            }
            nodes
        }
        // files(d) = 5 + 3 * files(d - 1), files(0) = 5
        let expected = [5usize, 20, 65, 200][3];
        let out = flattener(FailurePolicy::FailFast, false)
            .flatten_entry(&MemoryNode::dir("root", level(3)).into_entry())
            .unwrap();
        assert_eq!(out.files.len(), expected);
        assert_eq!(out.files[0].full_path, "/root/f3_0");
        assert_eq!(out.files.last().unwrap().full_path, "/root/d3_2/d2_2/d1_2/f0_4");
    }
}
