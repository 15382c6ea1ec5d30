//! Command-line configuration.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::data::filter::FilterDimension;
use crate::data::model::Value;

pub const DEFAULT_DATASET: &str = "topuniversities.csv";
pub const DEFAULT_DATASET_NAME: &str = "university_data";

/// Dimension names accepted on the command line.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum DimensionArg {
    /// Filter on the `City` column
    City,
    /// Filter on the `University Name` column
    UniversityName,
}

impl From<DimensionArg> for FilterDimension {
    fn from(arg: DimensionArg) -> Self {
        match arg {
            DimensionArg::City => FilterDimension::City,
            DimensionArg::UniversityName => FilterDimension::UniversityName,
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "university-explorer",
    version,
    about = "Filter a university dataset by city or name, chart it, export it as CSV"
)]
pub struct Cli {
    /// Dataset to load (.csv, .json or .parquet)
    #[arg(env = "UNIVERSITY_DATASET", default_value = DEFAULT_DATASET)]
    pub dataset: PathBuf,

    /// Dataset name, used for the export file name `filtered_<NAME>.csv`
    #[arg(long, default_value = DEFAULT_DATASET_NAME)]
    pub name: String,

    /// Dimension to filter on (headless mode; defaults to city)
    #[arg(long, value_enum)]
    pub filter_by: Option<DimensionArg>,

    /// Value to select (headless mode; defaults to the first distinct value)
    #[arg(long)]
    pub value: Option<String>,

    /// Write the filtered rows as CSV to this path and exit
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Write the chart projection as JSON to this path and exit
    #[arg(long)]
    pub chart_json: Option<PathBuf>,
}

impl Cli {
    /// Headless mode runs one selection and exits without opening a window.
    pub fn is_headless(&self) -> bool {
        self.export.is_some() || self.chart_json.is_some()
    }

    pub fn dimension(&self) -> FilterDimension {
        self.filter_by
            .map(FilterDimension::from)
            .unwrap_or(FilterDimension::ALL[0])
    }

    /// The requested value as a dimension cell. Dimension values are always
    /// categorical.
    pub fn selected_value(&self) -> Option<Value> {
        self.value.as_deref().map(|v| Value::Category(v.to_string()))
    }
}
