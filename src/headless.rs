//! Headless mode: apply the command-line selection, write the requested
//! artifacts and return without opening a window.

use anyhow::{Context, Result};

use crate::config::Cli;
use crate::session::{Outcome, Session};

/// Run one selection from `cli` against `session`.
///
/// An `Empty` outcome writes nothing and only logs a warning, like the viewer
/// hides its download button.
pub fn run_headless(cli: &Cli, mut session: Session) -> Result<()> {
    let dimension = cli.dimension();
    match cli.selected_value() {
        Some(value) => session.select(dimension, value)?,
        None => session.select_dimension(dimension)?,
    };

    let Outcome::Populated { chart, export, .. } = session.outcome() else {
        log::warn!(
            "No data matches the selected filter ({} = {}); nothing written",
            session.current_dimension(),
            session.current_value()
        );
        return Ok(());
    };

    if let Some(path) = &cli.export {
        std::fs::write(path, export.as_bytes())
            .with_context(|| format!("writing {}", path.display()))?;
        log::info!("Wrote {} ({} rows) to {}", export.file_name, chart.bars.len(), path.display());
    }
    if let Some(path) = &cli.chart_json {
        let json = chart.to_json().context("encoding chart projection")?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        log::info!("Wrote chart projection to {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Arc;

    use clap::Parser;

    use super::*;
    use crate::data::filter::FilterDimension;
    use crate::data::model::tests::sample_dataset;
    use crate::data::model::{Dataset, Value};

    fn session() -> Session {
        Session::new(Arc::new(sample_dataset())).unwrap()
    }

    fn cli(args: &[&str], export: &Path, chart: &Path) -> Cli {
        let mut argv = vec!["university-explorer", "unis.csv"];
        argv.extend_from_slice(args);
        argv.extend_from_slice(&[
            "--export",
            export.to_str().unwrap(),
            "--chart-json",
            chart.to_str().unwrap(),
        ]);
        Cli::try_parse_from(argv).unwrap()
    }

    fn bar_labels(path: &Path) -> Vec<String> {
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        json["bars"]
            .as_array()
            .unwrap()
            .iter()
            .map(|bar| bar["label"].as_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn writes_export_and_chart_for_selection() {
        let dir = tempfile::tempdir().unwrap();
        let export = dir.path().join("out.csv");
        let chart = dir.path().join("chart.json");
        let cli = cli(&["--filter-by", "city", "--value", "X"], &export, &chart);

        run_headless(&cli, session()).unwrap();

        let mut expected = session();
        expected.select(FilterDimension::City, Value::Category("X".into())).unwrap();
        assert_eq!(std::fs::read(&export).unwrap(), expected.export_csv().unwrap().as_bytes());
        assert_eq!(bar_labels(&chart), vec!["A", "B"]);
    }

    #[test]
    fn value_without_dimension_filters_by_city() {
        let dir = tempfile::tempdir().unwrap();
        let export = dir.path().join("out.csv");
        let chart = dir.path().join("chart.json");
        let cli = cli(&["--value", "Y"], &export, &chart);

        run_headless(&cli, session()).unwrap();

        assert_eq!(
            std::fs::read_to_string(&export).unwrap(),
            "University Name,City,Overall Score,Citations per Paper\nC,Y,70,\n"
        );
        assert_eq!(bar_labels(&chart), vec!["C"]);
    }

    #[test]
    fn empty_outcome_writes_nothing() {
        let headers = ["University Name", "City", "Overall Score", "Citations per Paper"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let rows = vec![
            vec![Value::from_raw("A"), Value::from_raw(""), Value::from_raw("1"), Value::from_raw("2")],
            vec![Value::from_raw("B"), Value::from_raw("X"), Value::from_raw("3"), Value::from_raw("4")],
        ];
        let ds = Dataset::from_records("d", headers, rows).unwrap();
        let session = Session::new(Arc::new(ds)).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let export = dir.path().join("out.csv");
        let chart = dir.path().join("chart.json");
        let cli = cli(&[], &export, &chart);

        run_headless(&cli, session).unwrap();

        assert!(!export.exists());
        assert!(!chart.exists());
    }

    #[test]
    fn unknown_value_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let export = dir.path().join("out.csv");
        let chart = dir.path().join("chart.json");
        let cli = cli(&["--value", "Z"], &export, &chart);

        assert!(run_headless(&cli, session()).is_err());
        assert!(!export.exists());
    }
}
