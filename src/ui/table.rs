use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use university_explorer::data::model::ColumnKind;
use university_explorer::session::Outcome;

use crate::state::AppState;

const HIGHLIGHT: Color32 = Color32::from_rgb(255, 235, 59);

// ---------------------------------------------------------------------------
// Filtered table with per-column maxima highlighted
// ---------------------------------------------------------------------------

pub fn highlighted_table(ui: &mut Ui, state: &AppState) {
    let Outcome::Populated { table, .. } = state.session.outcome() else {
        return;
    };

    egui::ScrollArea::horizontal()
        .id_salt("table_hscroll")
        .show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
                .columns(Column::auto().at_least(60.0), table.columns.len())
                .header(22.0, |mut header| {
                    for column in &table.columns {
                        header.col(|ui: &mut Ui| {
                            ui.strong(&column.name);
                        });
                    }
                })
                .body(|body| {
                    body.rows(20.0, table.len(), |mut row| {
                        let r = row.index();
                        for (c, column) in table.columns.iter().enumerate() {
                            let cell = &table.rows[r][c];
                            row.col(|ui: &mut Ui| {
                                let mut text = RichText::new(cell.to_string());
                                if cell.is_missing() {
                                    text = text.weak();
                                }
                                if column.kind == ColumnKind::Numeric && table.is_highlighted(r, c) {
                                    text = text.background_color(HIGHLIGHT).color(Color32::BLACK);
                                }
                                ui.label(text);
                            });
                        }
                    });
                });
        });
}
