/// UI widgets for DropSleuth.

pub mod drop_zone;
pub mod status_bar;
pub mod toolbar;
