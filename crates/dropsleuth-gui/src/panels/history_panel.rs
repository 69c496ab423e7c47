/// History panel -- one row per completed drop, newest first.
use crate::state::AppState;
use crate::theme::DropSleuthTheme;
use dropsleuth_core::model::summary::format_size;
use egui::Ui;

/// Draw the drop history and handle selection.
pub fn history_panel(ui: &mut Ui, state: &mut AppState, theme: &DropSleuthTheme) {
    ui.label(egui::RichText::new("Drops").strong().color(theme.accent));
    ui.add_space(4.0);

    if state.history.is_empty() {
        ui.label(
            egui::RichText::new("Nothing dropped yet")
                .color(theme.text_muted)
                .italics(),
        );
        return;
    }

    let mut clicked = None;
    for (idx, record) in state.history.iter().enumerate().rev() {
        let selected = state.selected == Some(idx);
        let origin = match record.batch.point {
            Some(p) => format!("at ({:.0}, {:.0})", p.x, p.y),
            None => "items".to_string(),
        };
        let mut text = format!(
            "{}  {} file(s) · {}  [{}]",
            record.received_at.format("%H:%M:%S"),
            record.summary.file_count,
            format_size(record.summary.total_size),
            origin,
        );
        if record.summary.skipped_count > 0 {
            text.push_str(&format!(" ⚠ {}", record.summary.skipped_count));
        }
        let color = if record.summary.skipped_count > 0 {
            theme.warning
        } else {
            theme.text_primary
        };
        if ui
            .selectable_label(selected, egui::RichText::new(text).size(12.0).color(color))
            .clicked()
        {
            clicked = Some(idx);
        }
    }
    if clicked.is_some() {
        state.selected = clicked;
    }
}
