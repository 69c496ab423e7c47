/// Side and content panels for DropSleuth.

pub mod files_panel;
pub mod history_panel;
