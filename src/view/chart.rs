use serde::Serialize;

use crate::data::filter::FilteredView;
use crate::error::MissingColumnError;

/// Bar label column.
pub const LABEL_COLUMN: &str = "University Name";
/// Bar height.
pub const SCORE_COLUMN: &str = "Overall Score";
/// Colour intensity.
pub const INTENSITY_COLUMN: &str = "Citations per Paper";

/// The columns a chart projection reads, in projection order.
pub const CHART_COLUMNS: [&str; 3] = [LABEL_COLUMN, SCORE_COLUMN, INTENSITY_COLUMN];

// ---------------------------------------------------------------------------
// Chart projection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartBar {
    pub label: String,
    pub score: Option<f64>,
    pub intensity: Option<f64>,
}

/// The filtered rows restricted to the three chart columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartProjection {
    pub label_column: &'static str,
    pub score_column: &'static str,
    pub intensity_column: &'static str,
    pub bars: Vec<ChartBar>,
}

impl ChartProjection {
    /// `(min, max)` of the intensity values, `None` if all are missing.
    pub fn intensity_range(&self) -> Option<(f64, f64)> {
        self.bars
            .iter()
            .filter_map(|b| b.intensity)
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Project the view onto the chart columns, keeping row order. A missing
/// name gives an empty label.
pub fn build_chart(view: &FilteredView) -> Result<ChartProjection, MissingColumnError> {
    let dataset = view.dataset();
    let label = dataset.require_column(LABEL_COLUMN)?;
    let score = dataset.require_column(SCORE_COLUMN)?;
    let intensity = dataset.require_column(INTENSITY_COLUMN)?;

    let bars = view
        .rows()
        .map(|row| ChartBar {
            label: row[label].as_field().into_owned(),
            score: row[score].as_f64(),
            intensity: row[intensity].as_f64(),
        })
        .collect();

    Ok(ChartProjection {
        label_column: LABEL_COLUMN,
        score_column: SCORE_COLUMN,
        intensity_column: INTENSITY_COLUMN,
        bars,
    })
}
