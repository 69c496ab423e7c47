/// Drag events as seen by a drop target.
///
/// Hosts build these from their native input (DOM events, egui's
/// `hovered_files` / `dropped_files`, a test script) and dispatch them with
/// [`DropTarget::dispatch`](crate::surface::DropTarget::dispatch).
/// Listeners mutate the event in place, the same way DOM listeners call
/// `stopPropagation()` or write `dataTransfer.dropEffect`.
use crate::entry::Entry;
use crate::model::{DropPoint, DroppedFile};
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragEventKind {
    Enter,
    Over,
    Leave,
    Drop,
}

impl DragEventKind {
    /// DOM event name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Enter => "dragenter",
            Self::Over => "dragover",
            Self::Leave => "dragleave",
            Self::Drop => "drop",
        }
    }
}

/// Drop-effect hint shown by the host cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DropEffect {
    #[default]
    None,
    Copy,
    Move,
    Link,
}

/// The data being dragged.
#[derive(Debug, Default)]
pub struct DataTransfer {
    /// Entry-capable items. `None` when the host lacks the items capability,
    /// in which case only `files` is meaningful.
    pub items: Option<Vec<Entry>>,
    /// Flat file list for hosts without the items capability.
    pub files: Vec<DroppedFile>,
    pub drop_effect: DropEffect,
}

impl DataTransfer {
    pub fn with_items(items: Vec<Entry>) -> Self {
        Self {
            items: Some(items),
            ..Self::default()
        }
    }

    pub fn with_files(files: Vec<DroppedFile>) -> Self {
        Self {
            files,
            ..Self::default()
        }
    }
}

#[derive(Debug)]
pub struct DragEvent {
    pub kind: DragEventKind,
    /// When the host observed the event. Drives feedback throttling.
    pub timestamp: Instant,
    /// Pointer position in host pixels.
    pub point: DropPoint,
    pub data: DataTransfer,
    propagation_stopped: bool,
    default_prevented: bool,
}

impl DragEvent {
    pub fn new(kind: DragEventKind, timestamp: Instant) -> Self {
        Self {
            kind,
            timestamp,
            point: DropPoint::default(),
            data: DataTransfer::default(),
            propagation_stopped: false,
            default_prevented: false,
        }
    }

    pub fn enter(timestamp: Instant) -> Self {
        Self::new(DragEventKind::Enter, timestamp)
    }

    pub fn over(timestamp: Instant) -> Self {
        Self::new(DragEventKind::Over, timestamp)
    }

    pub fn leave(timestamp: Instant) -> Self {
        Self::new(DragEventKind::Leave, timestamp)
    }

    pub fn drop(timestamp: Instant, data: DataTransfer) -> Self {
        Self {
            data,
            ..Self::new(DragEventKind::Drop, timestamp)
        }
    }

    pub fn at(mut self, point: DropPoint) -> Self {
        self.point = point;
        self
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}
