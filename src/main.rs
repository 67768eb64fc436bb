use anyhow::{Context, Result};
use eframe::egui;

use airline_dash::app::AirlineDashApp;
use airline_dash::config::DashboardConfig;
use airline_dash::data::loader::load_file;
use airline_dash::state::Dashboard;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        log::error!("{e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let config = DashboardConfig::load().context("loading configuration")?;
    log::info!("Using configuration {config:?}");

    let path = &config.dataset_path;
    let dataset = load_file(path).with_context(|| format!("loading dataset {}", path.display()))?;
    log::info!(
        "Loaded {} reviews of {} airlines from {}",
        dataset.len(),
        dataset.airlines().len(),
        path.display()
    );

    let dashboard = Dashboard::assemble(dataset).context("assembling dashboard")?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window_width, config.window_height])
            .with_min_inner_size([config.min_window_width, config.min_window_height]),
        ..Default::default()
    };

    let header = config.header.clone();
    eframe::run_native(
        &config.header,
        options,
        Box::new(move |_cc| Ok(Box::new(AirlineDashApp::new(dashboard, header)))),
    )
    .map_err(|e| anyhow::anyhow!("running dashboard: {e}"))
}
