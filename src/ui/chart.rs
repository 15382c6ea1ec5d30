use eframe::egui::{RichText, Ui};
use egui_plot::{Bar, BarChart, Plot};

use university_explorer::session::Outcome;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Bar chart: one bar per university, coloured by citations
// ---------------------------------------------------------------------------

/// Render the chart projection of the current selection.
pub fn bar_chart(ui: &mut Ui, state: &AppState, height: f32) {
    let Outcome::Populated { chart, .. } = state.session.outcome() else {
        return;
    };
    let scale = &state.intensity_scale;

    // Legend for the colour encoding.
    ui.horizontal(|ui: &mut Ui| {
        ui.label(format!("{}:", chart.intensity_column));
        for (label, color) in scale.legend_entries() {
            ui.label(RichText::new("■").color(color));
            ui.label(label);
        }
    });

    let bars: Vec<Bar> = chart
        .bars
        .iter()
        .enumerate()
        .filter_map(|(i, bar)| {
            let score = bar.score?;
            Some(
                Bar::new(i as f64, score)
                    .name(&bar.label)
                    .fill(scale.color_for(bar.intensity))
                    .width(0.7),
            )
        })
        .collect();

    let labels: Vec<String> = chart.bars.iter().map(|b| b.label.clone()).collect();

    Plot::new("score_chart")
        .height(height - 24.0)
        .x_axis_label(chart.label_column)
        .y_axis_label(chart.score_column)
        .x_axis_formatter(move |mark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > f64::EPSILON || idx < 0.0 {
                return String::new();
            }
            labels.get(idx as usize).cloned().unwrap_or_default()
        })
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}
