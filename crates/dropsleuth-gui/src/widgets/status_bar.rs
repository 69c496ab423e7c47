/// Bottom status bar -- last drop result, binding state and totals.
use crate::state::AppState;
use crate::theme::DropSleuthTheme;
use dropsleuth_core::model::summary::format_size;
use dropsleuth_core::settings::FailurePolicy;
use egui::Ui;

/// Draw the status bar at the bottom of the window.
pub fn status_bar(ui: &mut Ui, state: &AppState, theme: &DropSleuthTheme) {
    ui.horizontal(|ui| {
        if state.pending_drops > 0 {
            ui.spinner();
            ui.label(
                egui::RichText::new(format!("Resolving {} drop(s)", state.pending_drops))
                    .size(12.0)
                    .color(theme.text_primary),
            );
            ui.separator();
        }

        match &state.status {
            Some((text, tone)) => {
                ui.label(
                    egui::RichText::new(truncate_middle(text, 90))
                        .size(12.0)
                        .color(theme.tone_color(*tone)),
                )
                .on_hover_text(text);
            }
            None => {
                ui.label(egui::RichText::new("Ready").size(12.0).color(theme.text_muted));
            }
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let (files, bytes) = state.history.iter().fold((0usize, 0u64), |(n, b), r| {
                (n + r.summary.file_count, b + r.summary.total_size)
            });
            ui.label(
                egui::RichText::new(format_size(bytes))
                    .size(12.0)
                    .color(theme.accent),
            );
            ui.separator();
            ui.label(
                egui::RichText::new(format!("{} drops, {} files", state.history.len(), files))
                    .size(12.0)
                    .color(theme.text_secondary),
            );
            ui.separator();

            let policy = match state.settings.failure_policy {
                FailurePolicy::FailFast => "fail-fast",
                FailurePolicy::BestEffort => "best-effort",
            };
            ui.label(egui::RichText::new(policy).size(11.0).color(theme.text_muted));
            ui.separator();

            let (badge, color) = if state.is_attached() {
                ("● attached", theme.success)
            } else {
                ("○ detached", theme.warning)
            };
            ui.label(egui::RichText::new(badge).size(11.0).color(color));
        });
    });
}

/// Shorten `text` to at most `max_chars` characters, replacing the middle
/// with "...". Counts characters, not bytes, so multi-byte names are safe.
pub(crate) fn truncate_middle(text: &str, max_chars: usize) -> String {
    let count = text.chars().count();
    if count <= max_chars || max_chars < 5 {
        return text.to_string();
    }
    let half = (max_chars - 3) / 2;
    let head: String = text.chars().take(half).collect();
    let tail: String = text.chars().skip(count - half).collect();
    format!("{head}...{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_untouched() {
        assert_eq!(truncate_middle("abc", 10), "abc");
    }

    #[test]
    fn long_text_keeps_both_ends() {
        let out = truncate_middle("/very/long/path/to/some/file.txt", 15);
        assert_eq!(out, "/very/...le.txt");
        assert_eq!(out.chars().count(), 15);
    }

    #[test]
    fn multibyte_is_safe() {
        let out = truncate_middle("ёёёёёёёёёёёёёёёёёёёё", 9);
        assert_eq!(out, "ёёё...ёёё");
    }
}
