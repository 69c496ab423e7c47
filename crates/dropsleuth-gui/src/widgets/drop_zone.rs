/// The drop zone -- a framed area that lights up while files hover over it.
///
/// Drawing only; the zone's active state comes from the core feedback
/// observer via [`AppState::zone_active`].
use crate::state::AppState;
use crate::theme::DropSleuthTheme;
use egui::{Align2, FontId, Rect, Sense, Stroke, Ui};

/// Preferred zone height. Shrinks to the available space, never below the minimum.
const ZONE_HEIGHT: f32 = 180.0;
const ZONE_MIN_HEIGHT: f32 = 80.0;

/// Draw the drop zone and return its screen rect for hit-testing.
pub fn drop_zone(ui: &mut Ui, state: &AppState, theme: &DropSleuthTheme) -> Rect {
    let height = ZONE_HEIGHT.min(ui.available_height()).max(ZONE_MIN_HEIGHT);
    let (rect, _response) =
        ui.allocate_exact_size(egui::vec2(ui.available_width(), height), Sense::hover());
    let painter = ui.painter_at(rect);

    let (fill, border, headline) = if !state.is_attached() {
        (theme.zone_detached, theme.text_muted, "Drop zone detached")
    } else if state.zone_active() {
        (theme.zone_active, theme.accent, "Release to drop")
    } else {
        (theme.zone_idle, theme.separator, "Drop files or folders here")
    };
    let border_width = if state.zone_active() { 2.5 } else { 1.5 };

    painter.rect_filled(rect, 10.0, fill);
    painter.rect_stroke(
        rect.shrink(1.0),
        10.0,
        Stroke::new(border_width, border),
        egui::StrokeKind::Inside,
    );

    painter.text(
        rect.center() - egui::vec2(0.0, 12.0),
        Align2::CENTER_CENTER,
        headline,
        FontId::proportional(20.0),
        theme.text_primary,
    );

    let classes = state.zone().classes();
    let class_text = if classes.is_empty() {
        "no class".to_string()
    } else {
        format!("class: {}", classes.join(" "))
    };
    let subline = if state.pending_drops > 0 {
        format!("Resolving {} drop(s)…", state.pending_drops)
    } else {
        format!("{} · {}", state.zone().selector(), class_text)
    };
    painter.text(
        rect.center() + egui::vec2(0.0, 16.0),
        Align2::CENTER_CENTER,
        subline,
        FontId::proportional(12.0),
        theme.text_muted,
    );

    rect
}
