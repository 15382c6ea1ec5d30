use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::data::filter::FilteredView;
use crate::error::ExportError;

pub const CSV_MIME: &str = "text/csv";

/// CSV text of a filtered view, ready for the presentation layer to save or
/// stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPayload {
    pub file_name: String,
    pub mime: &'static str,
    pub text: String,
}

impl ExportPayload {
    pub fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }
}

/// `filtered_<dataset-name>.csv`
pub fn export_file_name(dataset_name: &str) -> String {
    format!("filtered_{dataset_name}.csv")
}

/// Encode a view as CSV: the dataset's declared header, then one line per
/// view row. Fields are quoted only when they contain a comma, a quote or a
/// line break; lines end with `\n`.
pub fn to_csv(view: &FilteredView) -> Result<ExportPayload, ExportError> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(view.columns().iter().map(|c| c.name.as_str()))?;
    for row in view.rows() {
        writer.write_record(row.iter().map(|v| v.as_field().into_owned()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Csv(e.into_error().into()))?;

    Ok(ExportPayload {
        file_name: export_file_name(view.dataset().name()),
        mime: CSV_MIME,
        text: String::from_utf8(bytes)?,
    })
}
