/// DropSleuth Core -- drag-and-drop binding, drop resolution and flattening.
///
/// This crate contains all business logic with zero UI dependencies.
/// A frontend (egui, a web host, a test harness) translates its native drag
/// events into [`event::DragEvent`]s and dispatches them on a
/// [`surface::DropTarget`].
///
/// # Modules
///
/// - [`surface`] -- Drop targets, their class lists, listener sets and timers.
/// - [`binder`] -- Attaches the three drag lifecycle listeners; returns a teardown.
/// - [`feedback`] -- Throttled "active" visual state with a decay deadline.
/// - [`resolver`] -- Chooses between the items path and the legacy files path.
/// - [`flatten`] -- Parallel, order-preserving directory tree flattening.
/// - [`entry`] -- Filesystem entry abstraction with native and in-memory backends.
/// - [`model`] -- Dropped file handles, drop points and batch summaries.
/// - [`settings`] -- JSON-backed configuration.
/// - [`export`] -- CSV / JSON export of a dropped batch.
pub mod binder;
pub mod entry;
pub mod error;
pub mod event;
pub mod export;
pub mod feedback;
pub mod flatten;
pub mod model;
pub mod resolver;
pub mod settings;
pub mod surface;

pub use binder::{attach, Teardown};
pub use error::{DropError, Result};
