use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use super::model::{Column, Dataset, Value};
use crate::error::{ExplorerError, InvalidSelectionError};

// ---------------------------------------------------------------------------
// Filter dimensions: the closed set of columns eligible for filtering
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum FilterDimension {
    City,
    UniversityName,
}

impl FilterDimension {
    /// All dimensions in the order they are offered; the first is the default.
    pub const ALL: [FilterDimension; 2] = [FilterDimension::City, FilterDimension::UniversityName];

    /// Name of the dataset column backing this dimension.
    pub fn column(self) -> &'static str {
        match self {
            FilterDimension::City => "City",
            FilterDimension::UniversityName => "University Name",
        }
    }

    pub fn from_column(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.column() == name)
    }
}

impl fmt::Display for FilterDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

// ---------------------------------------------------------------------------
// Selection and the filtered view
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct FilterSelection {
    pub dimension: FilterDimension,
    pub value: Value,
}

impl FilterSelection {
    pub fn new(dimension: FilterDimension, value: Value) -> Self {
        Self { dimension, value }
    }

    /// Check the value against the dimension's distinct values.
    pub fn validate(&self, dataset: &Dataset) -> Result<(), ExplorerError> {
        let values = dataset.distinct_values(self.dimension)?;
        if values.contains(&self.value) {
            Ok(())
        } else {
            Err(InvalidSelectionError {
                dimension: self.dimension,
                value: self.value.clone(),
            }
            .into())
        }
    }
}

/// The rows of a dataset matching one selection, in source order.
#[derive(Debug, Clone)]
pub struct FilteredView {
    dataset: Arc<Dataset>,
    indices: Vec<usize>,
}

impl FilteredView {
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn columns(&self) -> &[Column] {
        self.dataset.columns()
    }

    /// Source row indices of the view, ascending.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Rows of the view in order.
    pub fn rows(&self) -> impl Iterator<Item = &[Value]> + '_ {
        self.indices
            .iter()
            .map(|&i| self.dataset.rows()[i].as_slice())
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Return the rows whose dimension column equals the selected value.
///
/// A value outside the dimension's distinct values is an
/// [`InvalidSelectionError`]; a valid value matching nothing yields an empty
/// view.
pub fn apply(dataset: &Arc<Dataset>, selection: &FilterSelection) -> Result<FilteredView, ExplorerError> {
    selection.validate(dataset)?;
    let col = dataset.require_column(selection.dimension.column())?;

    let indices = dataset
        .rows()
        .iter()
        .enumerate()
        .filter(|(_, row)| row[col].matches(&selection.value))
        .map(|(i, _)| i)
        .collect();

    Ok(FilteredView {
        dataset: Arc::clone(dataset),
        indices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::sample_dataset;

    fn city(s: &str) -> FilterSelection {
        FilterSelection::new(FilterDimension::City, Value::Category(s.into()))
    }

    #[test]
    fn keeps_matching_rows_in_source_order() {
        let ds = Arc::new(sample_dataset());
        let view = apply(&ds, &city("X")).unwrap();
        assert_eq!(view.indices(), &[0, 1]);

        let col = ds.column_index("City").unwrap();
        assert!(view.rows().all(|r| r[col] == Value::Category("X".into())));
    }

    #[test]
    fn filter_partitions_the_dataset() {
        let ds = Arc::new(sample_dataset());
        let mut seen: Vec<usize> = Vec::new();
        for value in ds.distinct_values(FilterDimension::City).unwrap() {
            let sel = FilterSelection::new(FilterDimension::City, value.clone());
            seen.extend(apply(&ds, &sel).unwrap().indices());
        }
        seen.sort_unstable();
        assert_eq!(seen, (0..ds.len()).collect::<Vec<_>>());
    }

    #[test]
    fn unknown_value_is_rejected() {
        let ds = Arc::new(sample_dataset());
        let err = apply(&ds, &city("Z")).unwrap_err();
        assert!(matches!(err, ExplorerError::InvalidSelection(_)));
    }

    #[test]
    fn comparison_is_case_sensitive() {
        let ds = Arc::new(sample_dataset());
        assert!(apply(&ds, &city("x")).is_err());
    }

    #[test]
    fn missing_value_is_valid_but_matches_nothing() {
        let headers = vec!["City".to_string(), "Overall Score".to_string()];
        let rows = vec![
            vec![Value::from_raw("X"), Value::from_raw("1")],
            vec![Value::from_raw(""), Value::from_raw("2")],
        ];
        let ds = Arc::new(Dataset::from_records("d", headers, rows).unwrap());
        let sel = FilterSelection::new(FilterDimension::City, Value::Missing);
        let view = apply(&ds, &sel).unwrap();
        assert!(view.is_empty());
    }

    #[test]
    fn dimension_lookup_by_column() {
        assert_eq!(
            FilterDimension::from_column("University Name"),
            Some(FilterDimension::UniversityName)
        );
        assert_eq!(FilterDimension::from_column("city"), None);
        assert_eq!(FilterDimension::ALL[0], FilterDimension::City);
    }
}
