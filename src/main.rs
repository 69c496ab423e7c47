//! DropSleuth -- drag-and-drop file and folder collector.
//!
//! Thin binary entry point. All logic lives in the `dropsleuth-core`
//! and `dropsleuth-gui` crates.

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

fn main() -> anyhow::Result<()> {
    // Initialise structured logging.
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    tracing::info!("DropSleuth starting");

    // Load settings and attach the drop zone before the window opens.
    let state = dropsleuth_gui::DropSleuthState::build();

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_title("DropSleuth -- Drag-and-Drop Collector")
            .with_inner_size([1100.0, 720.0])
            .with_min_inner_size([700.0, 420.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "DropSleuth",
        options,
        Box::new(|cc| {
            Ok(Box::new(dropsleuth_gui::DropSleuthApp::with_state(
                cc, state,
            )))
        }),
    )
    .map_err(|e| anyhow::anyhow!("eframe error: {e}"))?;

    Ok(())
}
