/// Top action bar -- binding toggle, traversal options, export and theme.
use crate::state::{AppState, StatusTone};
use crate::theme::{DropSleuthTheme, ThemeMode};
use dropsleuth_core::settings::FailurePolicy;
use egui::Ui;
use std::path::PathBuf;

/// Draw the toolbar.
pub fn toolbar(ui: &mut Ui, state: &mut AppState, theme: &DropSleuthTheme) {
    ui.horizontal(|ui| {
        ui.label(
            egui::RichText::new("📥 DropSleuth")
                .size(18.0)
                .strong()
                .color(theme.accent),
        );

        ui.separator();

        // Attach / detach.
        if state.is_attached() {
            if ui
                .button("⏏ Detach")
                .on_hover_text("Remove the drop zone listeners")
                .clicked()
            {
                state.detach();
                state.set_status("Drop zone detached", StatusTone::Info);
            }
        } else if ui
            .button("🔗 Attach")
            .on_hover_text("Bind drag-and-drop to the drop zone")
            .clicked()
        {
            match state.attach() {
                Ok(()) => state.set_status("Drop zone attached", StatusTone::Info),
                Err(e) => state.set_status(e.to_string(), StatusTone::Error),
            }
        }

        ui.separator();

        // Failure policy. Changing it re-attaches the zone.
        let mut policy = state.settings.failure_policy;
        egui::ComboBox::from_id_salt("failure_policy")
            .selected_text(policy_label(policy))
            .show_ui(ui, |ui| {
                ui.selectable_value(
                    &mut policy,
                    FailurePolicy::FailFast,
                    policy_label(FailurePolicy::FailFast),
                );
                ui.selectable_value(
                    &mut policy,
                    FailurePolicy::BestEffort,
                    policy_label(FailurePolicy::BestEffort),
                );
            })
            .response
            .on_hover_text("What happens when a folder inside a drop cannot be read");
        if policy != state.settings.failure_policy {
            state.set_failure_policy(policy);
        }

        let mut skip_hidden = state.settings.skip_hidden;
        if ui
            .checkbox(&mut skip_hidden, "Skip hidden")
            .on_hover_text("Ignore dot-files and OS metadata inside dropped folders")
            .changed()
        {
            state.set_skip_hidden(skip_hidden);
        }

        ui.separator();

        // Export the selected drop.
        let can_export = state.selected_record().is_some();
        ui.add(
            egui::TextEdit::singleline(&mut state.export_path)
                .desired_width(160.0)
                .hint_text("drop.csv / drop.json"),
        );
        if ui
            .add_enabled(can_export, egui::Button::new("📤 Export"))
            .on_hover_text(if can_export {
                "Export the selected drop (.csv or .json)"
            } else {
                "Select a drop first"
            })
            .clicked()
        {
            let path = PathBuf::from(state.export_path.trim());
            if let Err(e) = state.export_selected(&path) {
                tracing::warn!("{e:#}");
                state.set_status(format!("{e:#}"), StatusTone::Error);
            }
        }

        if ui
            .add_enabled(!state.history.is_empty(), egui::Button::new("🗑 Clear"))
            .on_hover_text("Forget all drops")
            .clicked()
        {
            state.clear_history();
        }

        // Right-aligned controls.
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("ℹ").on_hover_text("About DropSleuth").clicked() {
                state.show_about = true;
            }

            let (theme_label, theme_tip) = match state.theme_mode {
                ThemeMode::Dark => ("☀", "Switch to light mode"),
                ThemeMode::Light => ("🌙", "Switch to dark mode"),
            };
            if ui.button(theme_label).on_hover_text(theme_tip).clicked() {
                state.theme_mode.toggle();
            }

            if state.settings_path.is_some()
                && ui
                    .button("💾")
                    .on_hover_text("Save settings")
                    .clicked()
            {
                state.save_settings();
            }
        });
    });
}

fn policy_label(policy: FailurePolicy) -> &'static str {
    match policy {
        FailurePolicy::FailFast => "Fail on first error",
        FailurePolicy::BestEffort => "Skip unreadable folders",
    }
}
