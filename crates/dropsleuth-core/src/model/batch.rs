/// The payload handed to the drop callback.
use super::DroppedFile;
use crate::error::DropError;

/// Pointer position of a drop, in host pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DropPoint {
    pub x: f32,
    pub y: f32,
}

impl DropPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// One resolved drop.
///
/// `point` is only known on the legacy files path; drops resolved through
/// directory traversal carry `None`.
#[derive(Debug, Default)]
pub struct DroppedBatch {
    pub files: Vec<DroppedFile>,
    pub point: Option<DropPoint>,
    /// Branches that failed while running with
    /// [`FailurePolicy::BestEffort`](crate::settings::FailurePolicy::BestEffort).
    pub skipped: Vec<DropError>,
}

impl DroppedBatch {
    /// Batch from the legacy files path.
    pub fn from_files(files: Vec<DroppedFile>, point: DropPoint) -> Self {
        Self {
            files,
            point: Some(point),
            skipped: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }
}
