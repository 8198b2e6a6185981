//! CarbonScope - Global CO2 Emissions Dashboard
//!
//! Interactive dashboard over the cleaned country-year emissions table
//! produced by the `clean_data` batch job.

use carbonscope::gui::DashboardApp;
use eframe::egui;
use tracing_subscriber::EnvFilter;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    tracing::info!("CarbonScope v{} starting", env!("CARGO_PKG_VERSION"));

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 850.0])
            .with_min_inner_size([1100.0, 700.0])
            .with_title("CarbonScope"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "CarbonScope",
        options,
        Box::new(|cc| Ok(Box::new(DashboardApp::new(cc)))),
    )
}
