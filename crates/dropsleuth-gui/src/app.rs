/// Main `eframe::App` implementation for DropSleuth.
///
/// This is the top-level UI layout that composes all panels and widgets, and
/// the frame loop that feeds egui's file drag input to the drop zone.
use crate::input::FrameInput;
use crate::panels;
use crate::state::AppState;
use crate::theme::DropSleuthTheme;
use crate::widgets;
use dropsleuth_core::settings::{DropSettings, SETTINGS_ENV_VAR};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Repaint interval while drops are resolving in the background.
const PENDING_REPAINT: Duration = Duration::from_millis(100);

/// Pre-built application state.
///
/// Construct this before calling `eframe::run_native` so the drop zone is
/// attached and settings problems are logged before the window exists.
pub struct DropSleuthState {
    pub(crate) inner: AppState,
}

impl DropSleuthState {
    /// Load settings from `DROPSLEUTH_SETTINGS` (defaults when unset) and
    /// attach the drop zone.
    pub fn build() -> Self {
        let settings = match DropSettings::from_env() {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Could not load settings: {e} -- using defaults");
                DropSettings::default()
            }
        };
        let mut state = AppState::new(settings);
        state.settings_path = std::env::var_os(SETTINGS_ENV_VAR).map(PathBuf::from);
        Self { inner: state }
    }
}

/// The DropSleuth application.
pub struct DropSleuthApp {
    state: AppState,
}

impl DropSleuthApp {
    /// Create a new application instance from pre-built state.
    pub fn with_state(cc: &eframe::CreationContext<'_>, state: DropSleuthState) -> Self {
        DropSleuthTheme::for_mode(state.inner.theme_mode).apply(&cc.egui_ctx);
        Self { state: state.inner }
    }
}

impl eframe::App for DropSleuthApp {
    /// Override the GPU clear colour to match the active theme background,
    /// preventing a colour mismatch flash between frames.
    fn clear_color(&self, visuals: &egui::Visuals) -> [f32; 4] {
        let [r, g, b, a] = visuals.panel_fill.to_array();
        [
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        ]
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ── Apply theme ───────────────────────────────────────────────────
        let theme = DropSleuthTheme::for_mode(self.state.theme_mode);
        theme.apply(ctx);

        // ── Process background messages ───────────────────────────────────
        self.state.process_drop_messages();

        // ── Top toolbar ───────────────────────────────────────────────────
        egui::TopBottomPanel::top("toolbar")
            .min_height(36.0)
            .show(ctx, |ui| {
                ui.add_space(4.0);
                widgets::toolbar::toolbar(ui, &mut self.state, &theme);
                ui.add_space(4.0);
            });

        // ── About dialog ──────────────────────────────────────────────────
        let mut show_about = self.state.show_about;
        egui::Window::new("About DropSleuth")
            .open(&mut show_about)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .fixed_size([340.0, 0.0])
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.add_space(8.0);
                    ui.label(
                        egui::RichText::new("📥 DropSleuth")
                            .size(24.0)
                            .strong()
                            .color(theme.accent),
                    );
                    ui.label(
                        egui::RichText::new(format!("v{}", env!("CARGO_PKG_VERSION")))
                            .size(13.0)
                            .color(theme.text_muted),
                    );
                    ui.add_space(12.0);
                    ui.label(
                        egui::RichText::new(
                            "Drop files and whole folder trees.\n\
                             Folders are flattened in parallel, in discovery order.",
                        )
                        .size(12.0)
                        .color(theme.text_primary),
                    );
                    ui.add_space(8.0);
                    ui.hyperlink_to(
                        "github.com/Swatto86/DropSleuth",
                        "https://github.com/Swatto86/DropSleuth",
                    );
                    ui.add_space(8.0);
                });
            });
        self.state.show_about = show_about;

        // ── Bottom status bar ─────────────────────────────────────────────
        egui::TopBottomPanel::bottom("status_bar")
            .min_height(24.0)
            .show(ctx, |ui| {
                ui.add_space(2.0);
                widgets::status_bar::status_bar(ui, &self.state, &theme);
                ui.add_space(2.0);
            });

        // ── Left sidebar (history) ────────────────────────────────────────
        egui::SidePanel::left("history_panel")
            .default_width(300.0)
            .min_width(200.0)
            .max_width(500.0)
            .resizable(true)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    panels::history_panel::history_panel(ui, &mut self.state, &theme);
                });
            });

        // ── Central panel (drop zone + files) ─────────────────────────────
        let zone_rect = egui::CentralPanel::default()
            .show(ctx, |ui| {
                let rect = widgets::drop_zone::drop_zone(ui, &self.state, &theme);
                ui.add_space(8.0);
                ui.separator();
                panels::files_panel::files_panel(ui, &self.state, &theme);
                rect
            })
            .inner;

        // ── Drag input → drop zone events ─────────────────────────────────
        let input = FrameInput::capture(ctx);
        let page_size = self.state.settings.page_size;
        let events = self.state.translator.translate(zone_rect, input, page_size);
        if !events.is_empty() {
            self.state.handle_events(events);
            ctx.request_repaint();
        }

        // ── Timers ────────────────────────────────────────────────────────
        // Feedback decay is deadline-driven; wake up exactly when it is due.
        if let Some(deadline) = self.state.tick(Instant::now()) {
            ctx.request_repaint_after(deadline.saturating_duration_since(Instant::now()));
        }
        if self.state.pending_drops > 0 {
            ctx.request_repaint_after(PENDING_REPAINT);
        }
    }
}
