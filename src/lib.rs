//! Filter a university dataset on one dimension and derive the views a
//! presentation layer needs: a table with per-column maxima, a bar-chart
//! projection, and a CSV export.
//!
//! ```text
//!  DatasetStore ──► filter::apply ──► view::{table, chart} ──► presentation
//!                         │
//!                         └────────► export::to_csv ─────────► presentation
//! ```
//!
//! [`session::Session`] holds one user's selection and re-runs the pipeline
//! on every change.

pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod headless;
pub mod session;
pub mod view;

pub use data::filter::{FilterDimension, FilterSelection, FilteredView};
pub use data::model::{Dataset, Value};
pub use data::store::DatasetStore;
pub use error::{ExplorerError, LoadError};
pub use export::ExportPayload;
pub use session::{Outcome, Session};
