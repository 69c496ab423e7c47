/// DropSleuth GUI -- egui-based desktop frontend.
///
/// This crate contains all UI code. Business logic lives in `dropsleuth-core`.
pub mod app;
pub mod input;
pub mod panels;
pub mod state;
pub mod theme;
pub mod widgets;

pub use app::{DropSleuthApp, DropSleuthState};
