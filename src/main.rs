mod app;
mod color;
mod config;
mod data;
mod predictor;
mod state;
mod ui;
mod view;

use app::CropDashboardApp;
use config::AppConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = AppConfig::default();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Crop Recommendation System",
        options,
        Box::new(|_cc| Ok(Box::new(CropDashboardApp::new(config)))),
    )
}
