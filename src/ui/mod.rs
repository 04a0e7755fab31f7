pub mod panels;
pub mod plot;
pub mod recommend;
pub mod table;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::AppState;
use crate::view::Page;

// ---------------------------------------------------------------------------
// Central panel – dispatch to the active view
// ---------------------------------------------------------------------------

/// Render the active view. Exactly one of the seven routines runs per frame.
pub fn central_panel(ui: &mut Ui, state: &mut AppState) {
    let page = match state.page() {
        Ok(page) => page,
        Err(msg) => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading(RichText::new(msg).color(Color32::RED));
            });
            return;
        }
    };

    let view = page.view();
    ui.heading(view.heading());
    if let Some(caption) = view.caption() {
        ui.label(caption);
    }
    ui.add_space(8.0);

    match page {
        // the table scrolls itself
        Page::Dataset(records) => table::dataset_table(ui, &records),
        Page::Chart { content, .. } => {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| plot::chart(ui, &content));
        }
        Page::Recommendation(rec) => {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| recommend::recommendation(ui, state, rec));
        }
    }
}

/// Window chrome shared by every frame.
pub fn show(ctx: &egui::Context, state: &mut AppState) {
    // ---- Top panel: menu bar ----
    egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
        panels::top_bar(ui, state);
    });

    // ---- Left side panel: view selector + context ----
    egui::SidePanel::left("context_panel")
        .default_width(280.0)
        .resizable(true)
        .show(ctx, |ui| {
            panels::side_panel(ui, state);
        });

    // ---- Central panel: active view ----
    egui::CentralPanel::default().show(ctx, |ui| {
        central_panel(ui, state);
    });
}
