use std::borrow::Cow;
use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::{Serialize, Serializer};

use super::filter::FilterDimension;
use crate::error::{LoadError, MissingColumnError};

/// Tokens read as a missing cell, in addition to the empty string.
pub const NA_TOKENS: &[&str] = &["NA", "N/A", "NaN", "nan", "null", "NULL", "None"];

// ---------------------------------------------------------------------------
// Value – a single cell
// ---------------------------------------------------------------------------

/// A tagged cell value. The kind of every column is fixed at load time, so a
/// numeric column only ever holds `Number` or `Missing`.
#[derive(Debug, Clone)]
pub enum Value {
    Text(String),
    /// Always finite; non-finite inputs are loaded as `Missing`.
    Number(f64),
    /// Value of a filter dimension column.
    Category(String),
    Missing,
}

// -- Manual Eq/Hash so distinct values can go through a HashSet --

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        use Value::*;
        match (self, other) {
            (Text(a), Text(b)) | (Category(a), Category(b)) => a == b,
            (Number(a), Number(b)) => a.to_bits() == b.to_bits(),
            (Missing, Missing) => true,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl std::hash::Hash for Value {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Text(s) | Value::Category(s) => s.hash(state),
            Value::Number(f) => f.to_bits().hash(state),
            Value::Missing => {}
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) | Value::Category(s) => write!(f, "{s}"),
            Value::Number(v) => write!(f, "{v}"),
            Value::Missing => write!(f, "<missing>"),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Text(s) | Value::Category(s) => serializer.serialize_str(s),
            Value::Number(v) => serializer.serialize_f64(*v),
            Value::Missing => serializer.serialize_none(),
        }
    }
}

impl Value {
    /// Parse a raw text cell. Kind assignment happens later, per column.
    pub fn from_raw(s: &str) -> Self {
        if s.is_empty() || NA_TOKENS.contains(&s) {
            Value::Missing
        } else {
            Value::Text(s.to_string())
        }
    }

    /// Numeric view of the cell, `None` for anything but a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    /// Filter equality: exact and case-sensitive. A missing cell never
    /// matches, not even another missing cell.
    pub fn matches(&self, other: &Value) -> bool {
        !self.is_missing() && self == other
    }

    /// Text written to a CSV field.
    pub fn as_field(&self) -> Cow<'_, str> {
        match self {
            Value::Text(s) | Value::Category(s) => Cow::Borrowed(s),
            Value::Number(v) => Cow::Owned(v.to_string()),
            Value::Missing => Cow::Borrowed(""),
        }
    }

    /// Any numeric literal, including `inf` and overflowing ones.
    fn parse_number(&self) -> Option<f64> {
        match self {
            Value::Number(v) => Some(*v),
            Value::Text(s) | Value::Category(s) => s.trim().parse::<f64>().ok(),
            Value::Missing => None,
        }
    }

    fn into_category(self) -> Value {
        match self {
            Value::Text(s) => Value::Category(s),
            Value::Number(v) => Value::Category(v.to_string()),
            other => other,
        }
    }
}

// ---------------------------------------------------------------------------
// Columns
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColumnKind {
    Text,
    Numeric,
    Categorical,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The loaded table. Never mutated after construction; share it as
/// `Arc<Dataset>`.
#[derive(Debug, Clone)]
pub struct Dataset {
    name: String,
    columns: Vec<Column>,
    /// Each row is aligned with `columns`.
    rows: Vec<Vec<Value>>,
    /// Distinct values per present dimension, first-seen order.
    distinct: BTreeMap<FilterDimension, Vec<Value>>,
}

impl Dataset {
    /// Build a dataset from raw records, declaring each column's kind once.
    ///
    /// * dimension columns become `Categorical`
    /// * a column whose every non-missing cell parses as a number (with at
    ///   least one such cell) becomes `Numeric`; non-finite cells in it load
    ///   as `Missing`
    /// * everything else stays `Text`
    pub fn from_records(
        name: &str,
        headers: Vec<String>,
        mut rows: Vec<Vec<Value>>,
    ) -> Result<Self, LoadError> {
        if headers.is_empty() {
            return Err(LoadError::Malformed("no columns".into()));
        }
        {
            let mut seen = HashSet::new();
            for h in &headers {
                if !seen.insert(h.as_str()) {
                    return Err(LoadError::Malformed(format!("duplicate column '{h}'")));
                }
            }
        }
        if rows.is_empty() {
            return Err(LoadError::NoRows);
        }
        for (i, row) in rows.iter().enumerate() {
            if row.len() != headers.len() {
                return Err(LoadError::Malformed(format!(
                    "row {i} has {} fields, expected {}",
                    row.len(),
                    headers.len()
                )));
            }
        }

        let mut columns = Vec::with_capacity(headers.len());
        for (idx, header) in headers.into_iter().enumerate() {
            let kind = if FilterDimension::from_column(&header).is_some() {
                ColumnKind::Categorical
            } else {
                infer_kind(&rows, idx)
            };
            for row in rows.iter_mut() {
                let cell = std::mem::replace(&mut row[idx], Value::Missing);
                row[idx] = match kind {
                    ColumnKind::Categorical => cell.into_category(),
                    ColumnKind::Numeric => cell
                        .parse_number()
                        .filter(|v| v.is_finite())
                        .map_or(Value::Missing, Value::Number),
                    ColumnKind::Text => match cell {
                        Value::Number(v) => Value::Text(v.to_string()),
                        other => other,
                    },
                };
            }
            columns.push(Column { name: header, kind });
        }

        let mut distinct = BTreeMap::new();
        for dimension in FilterDimension::ALL {
            let Some(idx) = columns.iter().position(|c| c.name == dimension.column()) else {
                continue;
            };
            let mut seen = HashSet::new();
            let values: Vec<Value> = rows
                .iter()
                .map(|row| &row[idx])
                .filter(|v| seen.insert(*v))
                .cloned()
                .collect();
            distinct.insert(dimension, values);
        }

        Ok(Dataset {
            name: name.to_string(),
            columns,
            rows,
            distinct,
        })
    }

    /// Dataset name, used for the export file name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Columns in declared order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Like [`Dataset::column_index`], but a missing column is a schema error.
    pub fn require_column(&self, name: &str) -> Result<usize, MissingColumnError> {
        self.column_index(name)
            .ok_or_else(|| MissingColumnError::new(name))
    }

    /// Distinct values of a dimension in first-seen order. The first entry is
    /// the default offered to the user.
    pub fn distinct_values(&self, dimension: FilterDimension) -> Result<&[Value], MissingColumnError> {
        self.distinct
            .get(&dimension)
            .map(Vec::as_slice)
            .ok_or_else(|| MissingColumnError::new(dimension.column()))
    }
}

fn infer_kind(rows: &[Vec<Value>], idx: usize) -> ColumnKind {
    let mut any = false;
    for row in rows {
        let cell = &row[idx];
        if cell.is_missing() {
            continue;
        }
        if cell.parse_number().is_none() {
            return ColumnKind::Text;
        }
        any = true;
    }
    if any {
        ColumnKind::Numeric
    } else {
        ColumnKind::Text
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    fn text(s: &str) -> Value {
        Value::from_raw(s)
    }

    /// The three-university fixture used across the pipeline tests.
    pub(crate) fn sample_dataset() -> Dataset {
        let headers = ["University Name", "City", "Overall Score", "Citations per Paper"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let rows = vec![
            vec![text("A"), text("X"), text("90"), text("12.5")],
            vec![text("B"), text("X"), text("80"), text("20")],
            vec![text("C"), text("Y"), text("70"), text("")],
        ];
        Dataset::from_records("university_data", headers, rows).expect("valid fixture")
    }

    #[test]
    fn kinds_are_declared_at_load() {
        let ds = sample_dataset();
        let kinds: Vec<ColumnKind> = ds.columns().iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ColumnKind::Categorical,
                ColumnKind::Categorical,
                ColumnKind::Numeric,
                ColumnKind::Numeric
            ]
        );
        assert_eq!(ds.rows()[0][2], Value::Number(90.0));
        assert!(ds.rows()[2][3].is_missing());
    }

    #[test]
    fn mixed_column_stays_text() {
        let headers = vec!["Rank".to_string(), "City".to_string()];
        let rows = vec![
            vec![text("1"), text("X")],
            vec![text("=2"), text("Y")],
        ];
        let ds = Dataset::from_records("d", headers, rows).unwrap();
        assert_eq!(ds.columns()[0].kind, ColumnKind::Text);
        assert_eq!(ds.rows()[0][0], Value::Text("1".into()));
    }

    #[test]
    fn non_finite_cells_do_not_demote_a_numeric_column() {
        let headers = vec!["City".to_string(), "Overall Score".to_string()];
        let rows = vec![
            vec![text("X"), text("90")],
            vec![text("X"), text("inf")],
            vec![text("Y"), text("1e400")],
        ];
        let ds = Dataset::from_records("d", headers, rows).unwrap();
        assert_eq!(ds.columns()[1].kind, ColumnKind::Numeric);
        assert_eq!(ds.rows()[0][1], Value::Number(90.0));
        assert!(ds.rows()[1][1].is_missing());
        assert!(ds.rows()[2][1].is_missing());
    }

    #[test]
    fn distinct_values_first_seen_without_duplicates() {
        let ds = sample_dataset();
        let cities = ds.distinct_values(FilterDimension::City).unwrap();
        assert_eq!(
            cities,
            &[Value::Category("X".into()), Value::Category("Y".into())]
        );
        let names = ds.distinct_values(FilterDimension::UniversityName).unwrap();
        assert_eq!(names.len(), 3);
    }

    #[test]
    fn missing_dimension_column_is_a_schema_error() {
        let headers = vec!["University Name".to_string(), "Overall Score".to_string()];
        let rows = vec![vec![text("A"), text("1")]];
        let ds = Dataset::from_records("d", headers, rows).unwrap();
        let err = ds.distinct_values(FilterDimension::City).unwrap_err();
        assert_eq!(err.column, "City");
    }

    #[test]
    fn rejects_empty_and_ragged_input() {
        let headers = vec!["City".to_string()];
        assert!(matches!(
            Dataset::from_records("d", headers.clone(), vec![]),
            Err(LoadError::NoRows)
        ));
        assert!(matches!(
            Dataset::from_records("d", headers, vec![vec![text("X"), text("Y")]]),
            Err(LoadError::Malformed(_))
        ));
        assert!(matches!(
            Dataset::from_records(
                "d",
                vec!["City".into(), "City".into()],
                vec![vec![text("X"), text("Y")]]
            ),
            Err(LoadError::Malformed(_))
        ));
    }

    #[test]
    fn missing_never_matches() {
        assert!(!Value::Missing.matches(&Value::Missing));
        assert!(Value::Category("X".into()).matches(&Value::Category("X".into())));
        assert!(!Value::Category("x".into()).matches(&Value::Category("X".into())));
    }

    #[test]
    fn numbers_use_shortest_field_form() {
        assert_eq!(Value::Number(90.0).as_field(), "90");
        assert_eq!(Value::Number(12.5).as_field(), "12.5");
        assert_eq!(Value::Missing.as_field(), "");
    }
}
