/// Application state management.
///
/// Centralises all mutable state that the UI reads and writes.
/// The drop zone is a [`DropTarget`] on a private [`Surface`]; its `ondrop`
/// callback forwards results into a channel because item drops resolve on a
/// background thread. State updates happen in `process_drop_messages()`,
/// which runs once per frame.
use crate::input::DragTranslator;
use crate::theme::ThemeMode;
use crossbeam_channel::{Receiver, Sender};
use dropsleuth_core::binder::AttachOptions;
use dropsleuth_core::event::{DragEvent, DragEventKind};
use dropsleuth_core::model::{DropSummary, DroppedBatch};
use dropsleuth_core::settings::{DropSettings, FailurePolicy};
use dropsleuth_core::surface::{DropTarget, Surface};
use dropsleuth_core::{attach, Teardown};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Selector of the single drop zone.
pub const DROP_ZONE_SELECTOR: &str = "#drop-zone";

/// Maximum drop results drained from the channel per frame.
const MAX_DROPS_PER_FRAME: usize = 16;

/// Maximum drops kept in the history list. Oldest are evicted first.
pub const MAX_HISTORY: usize = 100;

type DropMessage = dropsleuth_core::Result<DroppedBatch>;

/// One completed drop.
#[derive(Debug)]
pub struct DropRecord {
    pub received_at: chrono::DateTime<chrono::Local>,
    pub batch: DroppedBatch,
    pub summary: DropSummary,
}

/// Tone of the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Info,
    Success,
    Warning,
    Error,
}

/// All application state.
pub struct AppState {
    // ── Drop zone ──────────────────────────────────────
    pub settings: DropSettings,
    /// Where settings are persisted, if anywhere.
    pub settings_path: Option<PathBuf>,
    surface: Surface,
    zone: DropTarget,
    teardown: Option<Teardown>,
    drop_tx: Sender<DropMessage>,
    drop_rx: Receiver<DropMessage>,
    /// Mirrors the zone's active class, written by the feedback observer.
    zone_active: Arc<AtomicBool>,
    pub translator: DragTranslator,
    /// Drops dispatched to the zone whose result has not arrived yet.
    pub pending_drops: usize,

    // ── Results ────────────────────────────────────────
    pub history: Vec<DropRecord>,
    pub selected: Option<usize>,

    // ── UI state ───────────────────────────────────────
    pub status: Option<(String, StatusTone)>,
    pub export_path: String,
    pub theme_mode: ThemeMode,
    pub show_about: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(DropSettings::default())
    }
}

impl AppState {
    /// Create the state and attach the drop zone.
    pub fn new(settings: DropSettings) -> Self {
        let surface = Surface::new();
        let zone = surface.create_target(DROP_ZONE_SELECTOR);
        let (drop_tx, drop_rx) = crossbeam_channel::unbounded();

        let mut state = Self {
            settings,
            settings_path: None,
            surface,
            zone,
            teardown: None,
            drop_tx,
            drop_rx,
            zone_active: Arc::new(AtomicBool::new(false)),
            translator: DragTranslator::new(),
            pending_drops: 0,
            history: Vec::new(),
            selected: None,
            status: None,
            export_path: "drop.csv".to_string(),
            theme_mode: ThemeMode::Dark,
            show_about: false,
        };
        if let Err(e) = state.attach() {
            tracing::warn!("Drop zone not attached: {e}");
            state.set_status(format!("Drop zone not attached: {e}"), StatusTone::Error);
        }
        state
    }

    // ── Binding ────────────────────────────────────────

    /// Attach the drop zone with the current settings. No-op if attached.
    pub fn attach(&mut self) -> dropsleuth_core::Result<()> {
        if self.teardown.is_some() {
            return Ok(());
        }
        let tx = self.drop_tx.clone();
        let active = Arc::clone(&self.zone_active);
        let options = AttachOptions::new(self.settings.clone())
            .on_active_change(move |on| active.store(on, Ordering::Relaxed));
        let teardown = attach(&self.surface, DROP_ZONE_SELECTOR, options, move |result| {
            // The receiver lives as long as the state; a send error only
            // happens during shutdown.
            let _ = tx.send(result);
        })?;
        self.teardown = Some(teardown);
        Ok(())
    }

    /// Detach the drop zone. Drops in flight still deliver their result.
    pub fn detach(&mut self) {
        if let Some(teardown) = self.teardown.take() {
            teardown.remove();
        }
        self.zone_active.store(false, Ordering::Relaxed);
    }

    pub fn is_attached(&self) -> bool {
        self.teardown.is_some()
    }

    /// Whether the zone currently shows drag-over feedback.
    pub fn zone_active(&self) -> bool {
        self.zone_active.load(Ordering::Relaxed)
    }

    pub fn zone(&self) -> &DropTarget {
        &self.zone
    }

    /// Replace the settings, re-attaching through a teardown so the new
    /// values take effect. Invalid settings are rejected and the old ones kept.
    pub fn apply_settings(&mut self, settings: DropSettings) -> dropsleuth_core::Result<()> {
        settings.validate()?;
        self.settings = settings;
        if self.is_attached() {
            self.detach();
            self.attach()?;
        }
        tracing::info!(
            "Settings applied: policy={:?}, skip_hidden={}",
            self.settings.failure_policy,
            self.settings.skip_hidden
        );
        Ok(())
    }

    pub fn set_failure_policy(&mut self, policy: FailurePolicy) {
        let settings = DropSettings {
            failure_policy: policy,
            ..self.settings.clone()
        };
        self.apply_or_report(settings);
    }

    pub fn set_skip_hidden(&mut self, skip_hidden: bool) {
        let settings = DropSettings {
            skip_hidden,
            ..self.settings.clone()
        };
        self.apply_or_report(settings);
    }

    fn apply_or_report(&mut self, settings: DropSettings) {
        if let Err(e) = self.apply_settings(settings) {
            self.set_status(format!("Settings rejected: {e}"), StatusTone::Error);
        }
    }

    /// Persist the settings to `settings_path`, if one is set.
    pub fn save_settings(&mut self) {
        let Some(path) = self.settings_path.clone() else {
            return;
        };
        match self.settings.save(&path) {
            Ok(()) => self.set_status(
                format!("Settings saved to {}", path.display()),
                StatusTone::Success,
            ),
            Err(e) => self.set_status(e.to_string(), StatusTone::Error),
        }
    }

    // ── Events ─────────────────────────────────────────

    /// Dispatch translated host events on the zone.
    pub fn handle_events(&mut self, events: Vec<DragEvent>) {
        for mut event in events {
            let kind = event.kind;
            let handled = self.zone.dispatch(&mut event);
            if kind == DragEventKind::Drop {
                if handled > 0 {
                    self.pending_drops += 1;
                } else {
                    self.set_status("Drop zone is detached; drop ignored", StatusTone::Warning);
                }
            }
        }
    }

    /// Pump the feedback timers. Returns the next deadline to wake up for.
    pub fn tick(&self, now: Instant) -> Option<Instant> {
        self.surface.tick(now);
        self.surface.next_deadline()
    }

    /// Process pending drop results. Called once per frame.
    ///
    /// Returns `true` if the UI should repaint (a result arrived).
    pub fn process_drop_messages(&mut self) -> bool {
        let mut repaint = false;
        let mut messages_this_frame = 0usize;
        while messages_this_frame < MAX_DROPS_PER_FRAME {
            let msg = match self.drop_rx.try_recv() {
                Ok(m) => m,
                Err(_) => break,
            };
            messages_this_frame += 1;
            repaint = true;
            self.pending_drops = self.pending_drops.saturating_sub(1);
            match msg {
                Ok(batch) => self.push_record(batch),
                Err(e) => {
                    tracing::warn!("Drop failed: {e}");
                    self.set_status(format!("Drop failed: {e}"), StatusTone::Error);
                }
            }
        }
        repaint
    }

    fn push_record(&mut self, batch: DroppedBatch) {
        let summary = DropSummary::of(&batch);
        let (text, tone) = if summary.skipped_count > 0 {
            (
                format!(
                    "Dropped {} file(s), {} folder(s) unreadable",
                    summary.file_count, summary.skipped_count
                ),
                StatusTone::Warning,
            )
        } else {
            (
                format!("Dropped {} file(s)", summary.file_count),
                StatusTone::Success,
            )
        };
        if self.history.len() >= MAX_HISTORY {
            self.history.remove(0);
        }
        self.history.push(DropRecord {
            received_at: chrono::Local::now(),
            batch,
            summary,
        });
        self.selected = Some(self.history.len() - 1);
        self.set_status(text, tone);
    }

    // ── History ────────────────────────────────────────

    pub fn selected_record(&self) -> Option<&DropRecord> {
        self.selected.and_then(|i| self.history.get(i))
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
        self.selected = None;
    }

    /// Export the selected drop to `path` (format from the extension).
    pub fn export_selected(&mut self, path: &Path) -> anyhow::Result<()> {
        let record = self
            .selected_record()
            .ok_or_else(|| anyhow::anyhow!("no drop selected"))?;
        dropsleuth_core::export::export_to_path(&record.batch, path)
            .map_err(|e| anyhow::anyhow!("export to {} failed: {e}", path.display()))?;
        let count = record.batch.len();
        self.set_status(
            format!("Exported {count} file(s) to {}", path.display()),
            StatusTone::Success,
        );
        Ok(())
    }

    pub fn set_status(&mut self, text: impl Into<String>, tone: StatusTone) {
        self.status = Some((text.into(), tone));
    }
}
