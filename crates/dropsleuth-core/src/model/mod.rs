/// Data model for dropped payloads.
///
/// Every drop ends up as a [`DroppedBatch`]: a flat, ordered list of
/// [`DroppedFile`] handles. Directory structure survives only in each
/// file's `full_path`.
pub mod batch;
pub mod dropped_file;
pub mod summary;

pub use batch::{DropPoint, DroppedBatch};
pub use dropped_file::DroppedFile;
pub use summary::DropSummary;
