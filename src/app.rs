use eframe::egui;

use crate::state::AppState;
use crate::ui::{chart, panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct ExplorerApp {
    pub state: AppState,
}

impl ExplorerApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for ExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: title, counts, status ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: table (3/5) + chart (2/5), export button ----
        egui::CentralPanel::default().show(ctx, |ui| {
            panels::selection_caption(ui, &self.state);
            ui.separator();

            if !panels::empty_warning(ui, &self.state) {
                let height = (ui.available_height() - 40.0).max(200.0);
                let width = ui.available_width();
                ui.horizontal_top(|ui| {
                    ui.allocate_ui(egui::vec2(width * 0.6, height), |ui| {
                        table::highlighted_table(ui, &self.state);
                    });
                    ui.allocate_ui(egui::vec2(ui.available_width(), height), |ui| {
                        chart::bar_chart(ui, &self.state, height);
                    });
                });
                ui.separator();
                panels::export_button(ui, &mut self.state);
            }
        });
    }
}
