/// Files panel -- the flat file list of the selected drop.
///
/// Rows are virtualised through `egui_extras::TableBuilder`, so drops of
/// large folder trees stay responsive. Branches skipped under the
/// best-effort policy are listed under the table.
use crate::state::AppState;
use crate::theme::DropSleuthTheme;
use crate::widgets::status_bar::truncate_middle;
use dropsleuth_core::model::summary::format_size;
use egui::Ui;
use egui_extras::{Column, TableBuilder};

const ROW_HEIGHT: f32 = 18.0;

/// Maximum skipped-branch messages shown under the table.
const MAX_SKIPPED_SHOWN: usize = 20;

/// Draw the file table for the selected drop.
pub fn files_panel(ui: &mut Ui, state: &AppState, theme: &DropSleuthTheme) {
    let Some(record) = state.selected_record() else {
        ui.label(
            egui::RichText::new("Select a drop to see its files")
                .color(theme.text_muted)
                .italics(),
        );
        return;
    };
    let batch = &record.batch;

    ui.horizontal(|ui| {
        ui.label(
            egui::RichText::new(format!("{} file(s)", record.summary.file_count))
                .strong()
                .color(theme.text_primary),
        );
        ui.separator();
        ui.label(
            egui::RichText::new(format_size(record.summary.total_size)).color(theme.accent),
        );
        ui.separator();
        ui.label(
            egui::RichText::new(format!(
                "largest {}",
                format_size(record.summary.largest_size)
            ))
            .color(theme.text_secondary),
        );
        if let Some(p) = batch.point {
            ui.separator();
            ui.label(
                egui::RichText::new(format!("dropped at ({:.0}, {:.0})", p.x, p.y))
                    .color(theme.text_muted),
            );
        }
    });
    ui.add_space(4.0);

    if !batch.skipped.is_empty() {
        egui::CollapsingHeader::new(
            egui::RichText::new(format!("⚠ {} unreadable branch(es)", batch.skipped.len()))
                .color(theme.warning),
        )
        .id_salt("skipped")
        .show(ui, |ui| {
            for err in batch.skipped.iter().take(MAX_SKIPPED_SHOWN) {
                ui.label(
                    egui::RichText::new(err.to_string())
                        .size(11.0)
                        .color(theme.text_secondary),
                );
            }
            if batch.skipped.len() > MAX_SKIPPED_SHOWN {
                ui.label(
                    egui::RichText::new(format!(
                        "… and {} more",
                        batch.skipped.len() - MAX_SKIPPED_SHOWN
                    ))
                    .size(11.0)
                    .color(theme.text_muted),
                );
            }
        });
        ui.add_space(4.0);
    }

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(Column::initial(180.0).at_least(80.0))
        .column(Column::remainder().at_least(120.0))
        .column(Column::initial(80.0).at_least(60.0))
        .column(Column::initial(140.0).at_least(80.0))
        .header(ROW_HEIGHT + 2.0, |mut header| {
            for title in ["Name", "Path", "Size", "Modified"] {
                header.col(|ui| {
                    ui.label(egui::RichText::new(title).size(11.0).color(theme.accent));
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, batch.files.len(), |mut row| {
                let file = &batch.files[row.index()];
                row.col(|ui| {
                    ui.label(egui::RichText::new(file.name.as_str()).size(12.0));
                });
                row.col(|ui| {
                    let shown = truncate_middle(&file.full_path, 80);
                    let label = ui.label(
                        egui::RichText::new(shown)
                            .size(12.0)
                            .color(theme.text_secondary),
                    );
                    if let Some(native) = &file.path {
                        label.on_hover_text(native.display().to_string());
                    }
                });
                row.col(|ui| {
                    ui.label(egui::RichText::new(format_size(file.size)).size(12.0));
                });
                row.col(|ui| {
                    let modified = file
                        .modified
                        .map(|t| {
                            chrono::DateTime::<chrono::Local>::from(t)
                                .format("%Y-%m-%d %H:%M")
                                .to_string()
                        })
                        .unwrap_or_else(|| "-".to_string());
                    ui.label(
                        egui::RichText::new(modified)
                            .size(11.0)
                            .color(theme.text_muted),
                    );
                });
            });
        });
}
