use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::AppState;
use crate::view::View;

// ---------------------------------------------------------------------------
// Left side panel – view selector and context
// ---------------------------------------------------------------------------

/// Render the left panel: title, view selector, then the static context text.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Crop Recommendation System");
    ui.separator();

    ui.strong("Select an option");
    let mut selected = state.view();
    egui::ComboBox::from_id_salt("view_selector")
        .selected_text(selected.label())
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for view in View::ALL {
                ui.selectable_value(&mut selected, view, view.label());
            }
        });
    state.select_view(selected);
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, context_panel);
}

/// Static description of the dataset, shown next to every view.
pub fn context_panel(ui: &mut Ui) {
    ui.strong("Context and Usage of the Data");
    ui.label(
        "This dataset contains various agricultural parameters such as Nitrogen, \
         Phosphorus, Potassium levels in the soil, Temperature, Humidity, pH value, \
         and Rainfall. These parameters are critical for determining the optimal crop \
         type for a given set of conditions. The goal of this application is to \
         recommend the best crop based on user inputs for these parameters.",
    );
    ui.add_space(6.0);

    ui.strong("Metadata");
    for (field, meaning) in [
        ("Nitrogen", "Amount of Nitrogen in the soil (in ppm)"),
        ("Phosphorus", "Amount of Phosphorus in the soil (in ppm)"),
        ("Potassium", "Amount of Potassium in the soil (in ppm)"),
        ("Temperature", "Ambient temperature (in Celsius)"),
        ("Humidity", "Humidity level (in %)"),
        ("pH Value", "pH level of the soil"),
        ("Rainfall", "Rainfall received (in mm)"),
    ] {
        ui.horizontal_wrapped(|ui: &mut Ui| {
            ui.label(RichText::new(format!("• {field}:")).strong());
            ui.label(meaning);
        });
    }
    ui.add_space(6.0);

    ui.strong("Insights");
    ui.label(
        "The following visualizations provide insights into the distribution and \
         relationships of these parameters.",
    );
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / status bar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("View", |ui: &mut Ui| {
            for view in View::ALL {
                if ui
                    .selectable_label(state.view() == view, view.label())
                    .clicked()
                {
                    state.select_view(view);
                    ui.close_menu();
                }
            }
        });

        ui.separator();

        if let Ok(table) = state.dataset() {
            ui.label(format!(
                "{} rows, {} columns",
                table.len(),
                table.columns().len()
            ));
            ui.separator();
        }

        let model = state.model();
        match (&model.predictor, &model.error) {
            (Some(predictor), _) => {
                ui.label(format!("Model: {}", predictor.describe()));
            }
            (None, Some(err)) => {
                ui.label(RichText::new(err).color(Color32::RED));
            }
            (None, None) => {
                ui.label(RichText::new("No model loaded").color(Color32::RED));
            }
        }
    });
}
