use crate::data::filter::FilteredView;
use crate::data::model::{Column, ColumnKind, Value};

// ---------------------------------------------------------------------------
// Table presentation model: filtered rows + per-column maxima
// ---------------------------------------------------------------------------

/// Maximum of one numeric column and every view row that attains it.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMaximum {
    pub value: f64,
    /// Positions within the view (not source indices), ascending.
    pub rows: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TablePresentationModel {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<Value>>,
    /// Source row index of each view row.
    pub source_rows: Vec<usize>,
    /// Indexed like `columns`; `None` for non-numeric or all-missing columns.
    maxima: Vec<Option<ColumnMaximum>>,
}

impl TablePresentationModel {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether the cell holds its column's maximum within the view.
    pub fn is_highlighted(&self, row: usize, column: usize) -> bool {
        self.maxima
            .get(column)
            .and_then(Option::as_ref)
            .is_some_and(|m| m.rows.binary_search(&row).is_ok())
    }

    pub fn maximum(&self, column: usize) -> Option<&ColumnMaximum> {
        self.maxima.get(column).and_then(Option::as_ref)
    }

    pub fn maximum_by_name(&self, name: &str) -> Option<&ColumnMaximum> {
        let idx = self.columns.iter().position(|c| c.name == name)?;
        self.maximum(idx)
    }
}

/// Build the table model for a view. Every row tied for a numeric column's
/// maximum is highlighted; missing cells are ignored.
pub fn build_table(view: &FilteredView) -> TablePresentationModel {
    let columns = view.columns().to_vec();
    let rows: Vec<Vec<Value>> = view.rows().map(<[Value]>::to_vec).collect();

    let maxima = columns
        .iter()
        .enumerate()
        .map(|(idx, col)| match col.kind {
            ColumnKind::Numeric => column_maximum(&rows, idx),
            _ => None,
        })
        .collect();

    TablePresentationModel {
        columns,
        rows,
        source_rows: view.indices().to_vec(),
        maxima,
    }
}

fn column_maximum(rows: &[Vec<Value>], idx: usize) -> Option<ColumnMaximum> {
    let mut best: Option<ColumnMaximum> = None;
    for (pos, row) in rows.iter().enumerate() {
        let Some(v) = row[idx].as_f64() else {
            continue;
        };
        if best.as_ref().map_or(true, |m| v > m.value) {
            best = Some(ColumnMaximum {
                value: v,
                rows: vec![pos],
            });
        } else if let Some(m) = best.as_mut().filter(|m| m.value == v) {
            m.rows.push(pos);
        }
    }
    best
}
