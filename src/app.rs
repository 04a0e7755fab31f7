use eframe::egui;

use crate::config::AppConfig;
use crate::state::AppState;
use crate::ui;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct CropDashboardApp {
    pub state: AppState,
}

impl CropDashboardApp {
    pub fn new(config: AppConfig) -> Self {
        Self {
            state: AppState::new(config),
        }
    }
}

impl eframe::App for CropDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ui::show(ctx, &mut self.state);
    }
}
