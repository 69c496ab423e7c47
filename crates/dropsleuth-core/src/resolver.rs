/// Drop resolution.
///
/// A drop arrives with a [`DataTransfer`]. If the host exposes entry items
/// (the directory-capable path), the items are flattened on a background
/// thread and delivered without a position. Otherwise the host's flat file
/// list is delivered as-is, together with the drop point.
use crate::entry::Entry;
use crate::error::{DropError, Result};
use crate::event::DataTransfer;
use crate::flatten::Flattener;
use crate::model::{DropPoint, DroppedBatch, DroppedFile};
use crate::settings::DropSettings;
use std::sync::Arc;
use std::thread;
use tracing::{info, warn};

/// The user callback. Invoked on the dispatching thread for legacy drops
/// and on the resolver thread for item drops.
pub type DropCallback = Arc<dyn Fn(Result<DroppedBatch>) + Send + Sync>;

/// Which path a drop takes.
#[derive(Debug)]
pub enum Resolution {
    /// Entry items; may contain directories.
    Items(Vec<Entry>),
    /// Flat files plus the drop point.
    Files {
        files: Vec<DroppedFile>,
        point: DropPoint,
    },
}

impl Resolution {
    /// Take the payload out of a drop's data transfer.
    pub fn from_transfer(data: &mut DataTransfer, point: DropPoint) -> Self {
        match data.items.take() {
            Some(items) => Self::Items(items),
            None => Self::Files {
                files: std::mem::take(&mut data.files),
                point,
            },
        }
    }
}

pub struct DropResolver {
    flattener: Flattener,
}

impl DropResolver {
    pub fn new(settings: &DropSettings) -> Self {
        Self {
            flattener: Flattener::new(settings),
        }
    }

    /// Resolve synchronously.
    pub fn resolve(&self, resolution: Resolution) -> Result<DroppedBatch> {
        match resolution {
            Resolution::Files { files, point } => Ok(DroppedBatch::from_files(files, point)),
            Resolution::Items(items) => {
                let flat = self.flattener.flatten_all(&items)?;
                Ok(DroppedBatch {
                    files: flat.files,
                    point: None,
                    skipped: flat.skipped,
                })
            }
        }
    }

    /// Resolve and hand the result to `ondrop`.
    ///
    /// Legacy drops are delivered before this returns. Item drops are
    /// flattened on a named background thread whose handle is returned;
    /// in-flight traversals cannot be cancelled.
    pub fn dispatch(
        self: &Arc<Self>,
        resolution: Resolution,
        ondrop: DropCallback,
    ) -> Option<thread::JoinHandle<()>> {
        self.dispatch_with(resolution, ondrop, |job| {
            thread::Builder::new()
                .name("dropsleuth-resolver".into())
                .spawn(job)
        })
    }

    /// Like [`dispatch`](Self::dispatch), with the background thread
    /// started by `spawn`.
    ///
    /// `ondrop` fires exactly once per drop: if `spawn` fails, it receives
    /// [`DropError::Spawn`] instead of a batch.
    pub fn dispatch_with<S>(
        self: &Arc<Self>,
        resolution: Resolution,
        ondrop: DropCallback,
        spawn: S,
    ) -> Option<thread::JoinHandle<()>>
    where
        S: FnOnce(Box<dyn FnOnce() + Send>) -> std::io::Result<thread::JoinHandle<()>>,
    {
        match resolution {
            Resolution::Files { files, point } => {
                info!("Drop of {} file(s) at ({}, {})", files.len(), point.x, point.y);
                ondrop(Ok(DroppedBatch::from_files(files, point)));
                None
            }
            Resolution::Items(items) => {
                info!("Drop of {} item(s) -- resolving in background", items.len());
                let resolver = Arc::clone(self);
                let deliver = Arc::clone(&ondrop);
                let spawned = spawn(Box::new(move || {
                    let result = resolver.resolve(Resolution::Items(items));
                    match &result {
                        Ok(batch) => info!(
                            "Resolved drop: {} file(s), {} skipped",
                            batch.files.len(),
                            batch.skipped.len()
                        ),
                        Err(e) => warn!("Drop failed: {e}"),
                    }
                    deliver(result);
                }));
                match spawned {
                    Ok(handle) => Some(handle),
                    Err(e) => {
                        warn!("Failed to spawn resolver thread: {e}");
                        ondrop(Err(DropError::Spawn(e)));
                        None
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::memory::MemoryNode;
    use parking_lot::Mutex;

    #[test]
    fn transfer_without_items_takes_files_path() {
        let mut data = DataTransfer::with_files(vec![DroppedFile::new("a", 1)]);
        let r = Resolution::from_transfer(&mut data, DropPoint::new(1.0, 2.0));
        match r {
            Resolution::Files { files, point } => {
                assert_eq!(files.len(), 1);
                assert_eq!(point, DropPoint::new(1.0, 2.0));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(data.files.is_empty());
    }

    #[test]
    fn empty_items_still_takes_items_path() {
        let mut data = DataTransfer::with_items(vec![]);
        let r = Resolution::from_transfer(&mut data, DropPoint::default());
        assert!(matches!(r, Resolution::Items(ref items) if items.is_empty()));

        let batch = DropResolver::new(&DropSettings::default()).resolve(r).unwrap();
        assert!(batch.is_empty());
        assert_eq!(batch.point, None);
    }

    #[test]
    fn item_drop_is_delivered_from_background_thread() {
        let resolver = Arc::new(DropResolver::new(&DropSettings::default()));
        let got = Arc::new(Mutex::new(None));
        let sink = got.clone();
        let handle = resolver
            .dispatch(
                Resolution::Items(vec![MemoryNode::dir(
                    "A",
                    vec![MemoryNode::file("x", "12")],
                )
                .into_entry()]),
                Arc::new(move |r: Result<DroppedBatch>| {
                    *sink.lock() = Some(r.map(|b| b.files.len()));
                }),
            )
            .expect("items path spawns a thread");
        handle.join().unwrap();
        assert!(matches!(*got.lock(), Some(Ok(1))));
    }

    #[test]
    fn files_drop_is_delivered_inline() {
        let resolver = Arc::new(DropResolver::new(&DropSettings::default()));
        let got = Arc::new(Mutex::new(None));
        let sink = got.clone();
        let handle = resolver.dispatch(
            Resolution::Files {
                files: vec![DroppedFile::new("a", 1), DroppedFile::new("b", 2)],
                point: DropPoint::new(5.0, 6.0),
            },
            Arc::new(move |r: Result<DroppedBatch>| {
                *sink.lock() = r.ok().map(|b| (b.files.len(), b.point));
            }),
        );
        assert!(handle.is_none());
        assert_eq!(*got.lock(), Some((2, Some(DropPoint::new(5.0, 6.0)))));
    }

    #[test]
    fn spawn_failure_is_delivered_as_an_error() {
        let resolver = Arc::new(DropResolver::new(&DropSettings::default()));
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = calls.clone();
        let handle = resolver.dispatch_with(
            Resolution::Items(vec![MemoryNode::file("x", "").into_entry()]),
            Arc::new(move |r: Result<DroppedBatch>| {
                sink.lock().push(r.map(|b| b.files.len()).map_err(|e| e.to_string()));
            }),
            |_job| Err(std::io::Error::other("thread limit reached")),
        );
        assert!(handle.is_none());
        assert_eq!(
            *calls.lock(),
            [Err("failed to start drop resolver: thread limit reached".to_string())]
        );
    }
}
