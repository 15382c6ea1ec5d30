use std::path::Path;

use anyhow::Context;

use university_explorer::data::filter::FilterDimension;
use university_explorer::data::model::Value;
use university_explorer::session::{Outcome, Session};

use crate::color::IntensityScale;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Selection and derived views for this window.
    pub session: Session,

    /// Colour scale for the current chart.
    pub intensity_scale: IntensityScale,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(session: Session) -> Self {
        let mut state = Self {
            session,
            intensity_scale: IntensityScale::new(None),
            status_message: None,
        };
        state.rebuild_scale();
        state
    }

    /// Rebuild the colour scale from the current outcome.
    fn rebuild_scale(&mut self) {
        let range = match self.session.outcome() {
            Outcome::Populated { chart, .. } => chart.intensity_range(),
            Outcome::Empty { .. } => None,
        };
        self.intensity_scale = IntensityScale::new(range);
    }

    pub fn select_dimension(&mut self, dimension: FilterDimension) {
        let result = self.session.select_dimension(dimension).map(|_| ());
        self.after_transition(result);
    }

    pub fn select_value(&mut self, value: Value) {
        let result = self.session.select_value(value).map(|_| ());
        self.after_transition(result);
    }

    fn after_transition(&mut self, result: university_explorer::error::Result<()>) {
        match result {
            Ok(()) => self.status_message = None,
            Err(e) => {
                log::error!("Selection failed: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
        self.rebuild_scale();
    }

    /// Write the current export payload to `path`.
    pub fn save_export(&self, path: &Path) -> anyhow::Result<()> {
        let payload = self.session.export_csv()?;
        std::fs::write(path, payload.as_bytes())
            .with_context(|| format!("writing {}", path.display()))?;
        log::info!("Exported {} bytes to {}", payload.text.len(), path.display());
        Ok(())
    }
}
