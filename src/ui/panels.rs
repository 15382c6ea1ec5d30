use eframe::egui::{self, Color32, RichText, Ui};

use university_explorer::session::Outcome;

use crate::state::AppState;

const WARNING_COLOR: Color32 = Color32::from_rgb(230, 160, 0);

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    // ---- Dimension selector ----
    let current_dimension = state.session.current_dimension();
    let mut picked_dimension = None;
    ui.strong("Filter by:");
    egui::ComboBox::from_id_salt("filter_by")
        .selected_text(current_dimension.to_string())
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for dimension in state.session.dimensions() {
                if ui
                    .selectable_label(*dimension == current_dimension, dimension.to_string())
                    .clicked()
                {
                    picked_dimension = Some(*dimension);
                }
            }
        });
    if let Some(dimension) = picked_dimension {
        if dimension != current_dimension {
            state.select_dimension(dimension);
        }
    }
    ui.add_space(8.0);

    // ---- Value selector ----
    let dimension = state.session.current_dimension();
    let current_value = state.session.current_value().clone();
    let mut picked_value = None;
    ui.strong(format!("Select {dimension}:"));
    match state.session.distinct_values(dimension) {
        Ok(values) => {
            egui::ComboBox::from_id_salt("filter_value")
                .selected_text(current_value.to_string())
                .width(ui.available_width())
                .height(400.0)
                .show_ui(ui, |ui: &mut Ui| {
                    for value in values {
                        if ui
                            .selectable_label(*value == current_value, value.to_string())
                            .clicked()
                        {
                            picked_value = Some(value.clone());
                        }
                    }
                });
        }
        Err(e) => {
            ui.label(RichText::new(e.to_string()).color(Color32::RED));
        }
    }
    if let Some(value) = picked_value {
        if value != current_value {
            state.select_value(value);
        }
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the title bar with row counts and the status message.
pub fn top_bar(ui: &mut Ui, state: &AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.heading("University Data Explorer");
        ui.separator();

        let dataset = state.session.dataset();
        let visible = match state.session.outcome() {
            Outcome::Populated { table, .. } => table.len(),
            Outcome::Empty { .. } => 0,
        };
        ui.label(format!(
            "{}: {} rows loaded, {} visible",
            dataset.name(),
            dataset.len(),
            visible
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Central panel pieces
// ---------------------------------------------------------------------------

/// "Filtered by **City**: **X**"
pub fn selection_caption(ui: &mut Ui, state: &AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Filtered by");
        ui.strong(state.session.current_dimension().to_string());
        ui.label(":");
        ui.strong(state.session.current_value().to_string());
    });
}

/// Show the empty-result warning. Returns whether the outcome was empty.
pub fn empty_warning(ui: &mut Ui, state: &AppState) -> bool {
    if state.session.outcome().is_empty() {
        ui.label(RichText::new("No data matches the selected filter.").color(WARNING_COLOR));
        true
    } else {
        false
    }
}

pub fn export_button(ui: &mut Ui, state: &mut AppState) {
    if ui.button("Download filtered data as CSV").clicked() {
        save_file_dialog(state);
    }
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn save_file_dialog(state: &mut AppState) {
    let file_name = match state.session.export_csv() {
        Ok(payload) => payload.file_name,
        Err(e) => {
            log::error!("Failed to encode export: {e}");
            state.status_message = Some(format!("Error: {e}"));
            return;
        }
    };

    let file = rfd::FileDialog::new()
        .set_title("Save filtered data")
        .set_file_name(&file_name)
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        match state.save_export(&path) {
            Ok(()) => state.status_message = None,
            Err(e) => {
                log::error!("Failed to save export: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
