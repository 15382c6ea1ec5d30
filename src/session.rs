use std::sync::Arc;

use crate::data::filter::{apply, FilterDimension, FilterSelection, FilteredView};
use crate::data::model::{Dataset, Value};
use crate::error::{LoadError, Result};
use crate::export::{to_csv, ExportPayload};
use crate::view::chart::{build_chart, ChartProjection, CHART_COLUMNS};
use crate::view::table::{build_table, TablePresentationModel};

// ---------------------------------------------------------------------------
// Outcome of the current selection
// ---------------------------------------------------------------------------

/// What the presentation layer renders for the current selection. `Empty` is
/// a normal state, not a failure.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Populated {
        table: TablePresentationModel,
        chart: ChartProjection,
        export: ExportPayload,
    },
    Empty {
        dimension: FilterDimension,
        value: Value,
    },
}

impl Outcome {
    pub fn is_empty(&self) -> bool {
        matches!(self, Outcome::Empty { .. })
    }
}

// ---------------------------------------------------------------------------
// Session controller
// ---------------------------------------------------------------------------

/// Selection state for one user. Each session owns its selection and derived
/// results; only the dataset is shared.
#[derive(Debug, Clone)]
pub struct Session {
    dataset: Arc<Dataset>,
    selection: FilterSelection,
    outcome: Outcome,
}

impl Session {
    /// Start on the first dimension and its first distinct value.
    ///
    /// Fails with a missing-column error if the dataset lacks a dimension or
    /// chart column.
    pub fn new(dataset: Arc<Dataset>) -> Result<Self> {
        for dimension in FilterDimension::ALL {
            dataset.require_column(dimension.column())?;
        }
        for column in CHART_COLUMNS {
            dataset.require_column(column)?;
        }

        let dimension = FilterDimension::ALL[0];
        let selection = FilterSelection::new(dimension, first_value(&dataset, dimension)?);
        let outcome = evaluate(&dataset, &selection)?;
        Ok(Self {
            dataset,
            selection,
            outcome,
        })
    }

    /// Dimensions in the order they are offered.
    pub fn dimensions(&self) -> &'static [FilterDimension] {
        &FilterDimension::ALL
    }

    pub fn distinct_values(&self, dimension: FilterDimension) -> Result<&[Value]> {
        Ok(self.dataset.distinct_values(dimension)?)
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn current_dimension(&self) -> FilterDimension {
        self.selection.dimension
    }

    pub fn current_value(&self) -> &Value {
        &self.selection.value
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    /// Switch dimension; the value resets to the first distinct value of the
    /// new dimension.
    pub fn select_dimension(&mut self, dimension: FilterDimension) -> Result<&Outcome> {
        let value = first_value(&self.dataset, dimension)?;
        self.transition(FilterSelection::new(dimension, value))
    }

    /// Pick a value of the current dimension. An unknown value leaves the
    /// session untouched.
    pub fn select_value(&mut self, value: Value) -> Result<&Outcome> {
        self.transition(FilterSelection::new(self.selection.dimension, value))
    }

    /// Set dimension and value in one step.
    pub fn select(&mut self, dimension: FilterDimension, value: Value) -> Result<&Outcome> {
        self.transition(FilterSelection::new(dimension, value))
    }

    /// Rows of the current selection, recomputed.
    pub fn filtered_view(&self) -> Result<FilteredView> {
        apply(&self.dataset, &self.selection)
    }

    /// CSV of the current selection. An empty selection exports the header.
    pub fn export_csv(&self) -> Result<ExportPayload> {
        match &self.outcome {
            Outcome::Populated { export, .. } => Ok(export.clone()),
            Outcome::Empty { .. } => Ok(to_csv(&self.filtered_view()?)?),
        }
    }

    fn transition(&mut self, selection: FilterSelection) -> Result<&Outcome> {
        let outcome = match evaluate(&self.dataset, &selection) {
            Ok(outcome) => outcome,
            Err(e) => {
                log::warn!("Rejected selection {} = {}: {e}", selection.dimension, selection.value);
                return Err(e);
            }
        };
        log::debug!(
            "Selection {} = {}: {}",
            selection.dimension,
            selection.value,
            match &outcome {
                Outcome::Populated { table, .. } => format!("{} rows", table.len()),
                Outcome::Empty { .. } => "no rows".to_string(),
            }
        );
        self.selection = selection;
        self.outcome = outcome;
        Ok(&self.outcome)
    }
}

fn first_value(dataset: &Dataset, dimension: FilterDimension) -> Result<Value> {
    dataset
        .distinct_values(dimension)?
        .first()
        .cloned()
        .ok_or_else(|| LoadError::NoRows.into())
}

/// Run filter, derived views and export for one selection.
fn evaluate(dataset: &Arc<Dataset>, selection: &FilterSelection) -> Result<Outcome> {
    let view = apply(dataset, selection)?;
    if view.is_empty() {
        return Ok(Outcome::Empty {
            dimension: selection.dimension,
            value: selection.value.clone(),
        });
    }
    Ok(Outcome::Populated {
        table: build_table(&view),
        chart: build_chart(&view)?,
        export: to_csv(&view)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::sample_dataset;
    use crate::error::ExplorerError;

    fn session() -> Session {
        Session::new(Arc::new(sample_dataset())).unwrap()
    }

    fn cat(s: &str) -> Value {
        Value::Category(s.into())
    }

    #[test]
    fn starts_on_first_dimension_and_value() {
        let s = session();
        assert_eq!(s.current_dimension(), FilterDimension::City);
        assert_eq!(s.current_value(), &cat("X"));
        assert!(!s.outcome().is_empty());
    }

    #[test]
    fn select_city_populates_all_views() {
        let mut s = session();
        let Outcome::Populated { table, chart, export } = s.select(FilterDimension::City, cat("X")).unwrap() else {
            panic!("expected populated outcome");
        };
        assert_eq!(table.source_rows, vec![0, 1]);
        assert!(table.is_highlighted(0, 2));
        assert_eq!(chart.bars.len(), 2);
        assert_eq!(export.text.lines().count(), 3);
        assert_eq!(s.export_csv().unwrap().text.lines().count(), 3);
    }

    #[test]
    fn invalid_value_leaves_state_unchanged() {
        let mut s = session();
        s.select(FilterDimension::UniversityName, cat("B")).unwrap();
        let before = s.outcome().clone();

        let err = s.select(FilterDimension::City, cat("Z")).unwrap_err();
        assert!(matches!(err, ExplorerError::InvalidSelection(_)));
        assert_eq!(s.current_dimension(), FilterDimension::UniversityName);
        assert_eq!(s.current_value(), &cat("B"));
        assert_eq!(s.outcome(), &before);

        assert!(s.select_value(cat("X")).is_err());
        assert_eq!(s.current_value(), &cat("B"));
    }

    #[test]
    fn switching_dimension_resets_to_a_valid_value() {
        let mut s = session();
        s.select_value(cat("Y")).unwrap();
        for dimension in s.dimensions() {
            s.select_dimension(*dimension).unwrap();
            let first = s.distinct_values(*dimension).unwrap()[0].clone();
            assert_eq!(s.current_value(), &first);
            assert!(FilterSelection::new(*dimension, first).validate(s.dataset()).is_ok());
        }
        assert_eq!(s.current_dimension(), FilterDimension::UniversityName);
        assert_eq!(s.current_value(), &cat("A"));
    }

    #[test]
    fn missing_city_yields_empty_outcome() {
        let headers = ["University Name", "City", "Overall Score", "Citations per Paper"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let rows = vec![
            vec![Value::from_raw("A"), Value::from_raw(""), Value::from_raw("1"), Value::from_raw("2")],
            vec![Value::from_raw("B"), Value::from_raw("X"), Value::from_raw("3"), Value::from_raw("4")],
        ];
        let ds = Dataset::from_records("d", headers, rows).unwrap();
        let mut s = Session::new(Arc::new(ds)).unwrap();

        assert_eq!(
            s.outcome(),
            &Outcome::Empty {
                dimension: FilterDimension::City,
                value: Value::Missing
            }
        );
        let export = s.export_csv().unwrap();
        assert_eq!(export.text, "University Name,City,Overall Score,Citations per Paper\n");

        assert!(!s.select_value(cat("X")).unwrap().is_empty());
    }

    #[test]
    fn schema_without_chart_columns_is_rejected() {
        let headers = vec!["University Name".to_string(), "City".to_string()];
        let rows = vec![vec![Value::from_raw("A"), Value::from_raw("X")]];
        let ds = Dataset::from_records("d", headers, rows).unwrap();
        let err = Session::new(Arc::new(ds)).unwrap_err();
        assert!(matches!(err, ExplorerError::MissingColumn(ref e) if e.column == "Overall Score"));
    }

    #[test]
    fn sessions_are_independent_across_threads() {
        let ds = Arc::new(sample_dataset());
        let handles: Vec<_> = ["X", "Y"]
            .into_iter()
            .map(|city| {
                let ds = Arc::clone(&ds);
                std::thread::spawn(move || {
                    let mut s = Session::new(ds).unwrap();
                    s.select(FilterDimension::City, Value::Category(city.into())).unwrap();
                    s.filtered_view().unwrap().indices().to_vec()
                })
            })
            .collect();
        let results: Vec<Vec<usize>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(results, vec![vec![0, 1], vec![2]]);
    }
}
