use eframe::egui::{Color32, Slider, Ui};

use crate::state::AppState;
use crate::view::{Recommendation, RecommendationPage};

// ---------------------------------------------------------------------------
// Crop recommendation view
// ---------------------------------------------------------------------------

/// Sliders, echoed inputs, then the model's answer (or why there is none).
pub fn recommendation(ui: &mut Ui, state: &mut AppState, page: RecommendationPage) {
    let (bounds, mut inputs, outcome) = match page {
        RecommendationPage::Unavailable(reason) => {
            ui.colored_label(
                Color32::RED,
                format!("Unable to recommend crop: {reason}"),
            );
            return;
        }
        RecommendationPage::Ready {
            bounds,
            inputs,
            outcome,
        } => (bounds, inputs, outcome),
    };

    let mut changed = false;
    for b in &bounds {
        let feature = b.feature;
        let text = feature.slider_text();
        if feature.is_integer() {
            let mut value = inputs.get(feature).round() as i64;
            let slider = Slider::new(&mut value, (b.min as i64)..=(b.max as i64))
                .step_by(1.0)
                .text(text);
            if ui.add(slider).changed() {
                inputs.set(feature, b.snap(value as f64));
                changed = true;
            }
        } else {
            let mut value = inputs.get(feature);
            let slider = Slider::new(&mut value, b.min..=b.max)
                .step_by(feature.step())
                .text(text);
            if ui.add(slider).changed() {
                inputs.set(feature, b.snap(value));
                changed = true;
            }
        }
    }
    if changed {
        // the answer below belongs to the previous inputs; redraw with the new ones
        state.set_inputs(inputs);
        ui.ctx().request_repaint();
    }

    ui.add_space(10.0);
    ui.heading("Selected Input Parameters");
    for line in inputs.echo_lines() {
        ui.label(line);
    }

    ui.add_space(10.0);
    if !outcome.visible(changed) {
        // computed for the previous inputs; the next frame predicts again
        return;
    }
    match &outcome {
        Recommendation::Crop(_) => {
            ui.heading("Recommended Crop");
            ui.label(outcome.message());
        }
        Recommendation::Failed(_) => {
            ui.colored_label(Color32::RED, outcome.message());
        }
        Recommendation::ModelUnavailable => {
            ui.label(outcome.message());
        }
    }
}
