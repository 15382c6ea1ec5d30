mod app;
mod color;
mod state;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use eframe::egui;

use app::ExplorerApp;
use state::AppState;
use university_explorer::config::Cli;
use university_explorer::data::store::DatasetStore;
use university_explorer::headless::run_headless;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // Without a valid dataset there is nothing to run.
    let store = DatasetStore::load(&cli.dataset, &cli.name)
        .with_context(|| format!("loading dataset {}", cli.dataset.display()))?;
    let session = store.session().context("starting session")?;

    if cli.is_headless() {
        return run_headless(&cli, session);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 820.0])
            .with_min_inner_size([800.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "University Data Explorer",
        options,
        Box::new(|_cc| Ok(Box::new(ExplorerApp::new(AppState::new(session))))),
    )
    .map_err(|e| anyhow::anyhow!("running viewer: {e}"))
}
