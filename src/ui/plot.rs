use std::f64::consts::{FRAC_PI_2, TAU};

use eframe::egui::{Align2, Color32, RichText, Stroke, Ui};
use egui_plot::{
    Bar, BarChart, Legend, Line, Plot, PlotPoint, PlotPoints, Points, Polygon, Text,
};

use crate::color::{ColorMap, coolwarm, generate_palette};
use crate::data::stats::{CorrelationMatrix, Share};
use crate::view::{CROP_FALLBACK, ChartContent, HistogramPanel, ScatterSeries};

// ---------------------------------------------------------------------------
// Chart dispatch
// ---------------------------------------------------------------------------

/// Draw a chart summary.
pub fn chart(ui: &mut Ui, content: &ChartContent) {
    match content {
        ChartContent::CropShares(Ok(shares)) => pie_chart(ui, shares),
        ChartContent::CropShares(Err(_)) => {
            ui.label(CROP_FALLBACK);
        }
        ChartContent::Histograms(panels) => histograms(ui, panels),
        ChartContent::Scatter { series, by_crop } => scatter_plot(ui, series, *by_crop),
        ChartContent::Heatmap(matrix) => heatmap(ui, matrix),
    }
}

// ---------------------------------------------------------------------------
// Pie chart
// ---------------------------------------------------------------------------

/// Slices start at 12 o'clock and run counter-clockwise, largest first.
fn pie_chart(ui: &mut Ui, shares: &[Share]) {
    ui.strong("Proportion of Each Crop Type");
    let colors = ColorMap::new(shares.iter().map(|s| s.label.as_str()), generate_palette);

    // static chart: every interaction off
    Plot::new("crop_pie")
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .allow_double_click_reset(false)
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .show_x(false)
        .show_y(false)
        .include_x(-1.4)
        .include_x(1.4)
        .include_y(-1.3)
        .include_y(1.3)
        .legend(Legend::default())
        .height(520.0)
        .show(ui, |plot_ui| {
            let mut start = FRAC_PI_2;
            for share in shares {
                let color = colors.color_for(&share.label);
                let sweep = share.fraction * TAU;

                // egui fills convex shapes only, so wide slices are split into wedges
                let wedges = (sweep / FRAC_PI_2).ceil().max(1.0) as usize;
                for w in 0..wedges {
                    let a0 = start + sweep * w as f64 / wedges as f64;
                    let a1 = start + sweep * (w + 1) as f64 / wedges as f64;
                    let steps = 24;
                    let mut points = vec![[0.0, 0.0]];
                    points.extend((0..=steps).map(|k| {
                        let a = a0 + (a1 - a0) * k as f64 / steps as f64;
                        [a.cos(), a.sin()]
                    }));
                    plot_ui.polygon(
                        Polygon::new(PlotPoints::new(points))
                            .fill_color(color)
                            .stroke(Stroke::new(1.0, Color32::WHITE))
                            .name(&share.label),
                    );
                }

                let mid = start + sweep / 2.0;
                plot_ui.text(Text::new(
                    PlotPoint::new(0.6 * mid.cos(), 0.6 * mid.sin()),
                    RichText::new(share.percent_label()).color(Color32::BLACK),
                ));
                plot_ui.text(
                    Text::new(
                        PlotPoint::new(1.1 * mid.cos(), 1.1 * mid.sin()),
                        share.label.clone(),
                    )
                    .anchor(if mid.cos() >= 0.0 {
                        Align2::LEFT_CENTER
                    } else {
                        Align2::RIGHT_CENTER
                    }),
                );
                start += sweep;
            }
        });
}

// ---------------------------------------------------------------------------
// Histograms with density overlay
// ---------------------------------------------------------------------------

fn histograms(ui: &mut Ui, panels: &[HistogramPanel]) {
    ui.columns(panels.len().max(1), |cols: &mut [Ui]| {
        for (col, panel) in cols.iter_mut().zip(panels) {
            histogram_plot(col, panel);
        }
    });
}

fn histogram_plot(ui: &mut Ui, panel: &HistogramPanel) {
    ui.strong(panel.title());
    let Some(hist) = &panel.histogram else {
        // column absent from the dataset
        return;
    };

    let bars: Vec<Bar> = hist
        .counts
        .iter()
        .enumerate()
        .map(|(i, &count)| {
            Bar::new(hist.center(i), count as f64)
                .width(hist.bin_width)
                .fill(panel.color.gamma_multiply(0.55))
                .stroke(Stroke::new(1.0, panel.color))
        })
        .collect();

    Plot::new(format!("hist_{}", panel.feature))
        .x_axis_label(panel.feature.label())
        .y_axis_label("Count")
        .allow_scroll(false)
        .height(340.0)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("Count"));
            if !panel.density.is_empty() {
                plot_ui.line(
                    Line::new(PlotPoints::new(panel.density.clone()))
                        .color(panel.color)
                        .width(2.0)
                        .name("Density"),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Scatter plot
// ---------------------------------------------------------------------------

fn scatter_plot(ui: &mut Ui, series: &[ScatterSeries], by_crop: bool) {
    ui.strong("Scatter plot of Temperature vs. Humidity");
    let mut plot = Plot::new("temperature_humidity")
        .x_axis_label("Temperature")
        .y_axis_label("Humidity")
        .allow_scroll(false)
        .height(520.0);
    // one legend entry per crop; a lone series needs none
    if by_crop {
        plot = plot.legend(Legend::default());
    }
    plot.show(ui, |plot_ui| {
        for s in series {
            plot_ui.points(
                Points::new(PlotPoints::new(s.points.clone()))
                    .radius(2.5)
                    .color(s.color)
                    .name(&s.name),
            );
        }
    });
}

// ---------------------------------------------------------------------------
// Correlation heatmap
// ---------------------------------------------------------------------------

fn cell(x: f64, y: f64, half: f64) -> PlotPoints<'static> {
    PlotPoints::new(vec![
        [x - half, y - half],
        [x + half, y - half],
        [x + half, y + half],
        [x - half, y + half],
    ])
}

/// Row `i` is drawn at `y = n - 1 - i` so the first column sits on top.
fn heatmap(ui: &mut Ui, matrix: &CorrelationMatrix) {
    ui.strong("Correlation between Parameters");
    let n = matrix.len();
    if n == 0 {
        ui.label("No numeric columns to correlate.");
        return;
    }
    let top = (n - 1) as f64;

    Plot::new("correlation_heatmap")
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .allow_double_click_reset(false)
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .show_x(false)
        .show_y(false)
        .include_x(-3.0)
        .include_x(n as f64 + 1.5)
        .include_y(-1.6)
        .height(620.0)
        .show(ui, |plot_ui| {
            for i in 0..n {
                let y = top - i as f64;
                for j in 0..n {
                    let x = j as f64;
                    let r = matrix.get(i, j);
                    plot_ui.polygon(
                        Polygon::new(cell(x, y, 0.5))
                            .fill_color(coolwarm(r))
                            .stroke(Stroke::new(1.0, Color32::WHITE)),
                    );
                    let text = if r.is_nan() {
                        "nan".to_string()
                    } else {
                        format!("{r:.2}")
                    };
                    let ink = if r.abs() > 0.6 {
                        Color32::WHITE
                    } else {
                        Color32::BLACK
                    };
                    plot_ui.text(Text::new(PlotPoint::new(x, y), RichText::new(text).color(ink)));
                }
            }

            // axis labels; bottom row alternates height so long names don't collide
            for (k, name) in matrix.names.iter().enumerate() {
                plot_ui.text(
                    Text::new(PlotPoint::new(-0.6, top - k as f64), name.clone())
                        .anchor(Align2::RIGHT_CENTER),
                );
                let drop = if k % 2 == 0 { 0.75 } else { 1.25 };
                plot_ui.text(Text::new(PlotPoint::new(k as f64, -drop), name.clone()));
            }

            // colour bar from -1 (bottom) to 1 (top)
            let bar_x = n as f64 + 0.5;
            let steps = 40;
            let step_h = n as f64 / steps as f64;
            for s in 0..steps {
                let value = -1.0 + 2.0 * (s as f64 + 0.5) / steps as f64;
                let y0 = -0.5 + s as f64 * step_h;
                plot_ui.polygon(
                    Polygon::new(PlotPoints::new(vec![
                        [bar_x, y0],
                        [bar_x + 0.4, y0],
                        [bar_x + 0.4, y0 + step_h],
                        [bar_x, y0 + step_h],
                    ]))
                    .fill_color(coolwarm(value))
                    .stroke(Stroke::NONE),
                );
            }
            for (value, y) in [(-1.0, -0.5), (0.0, top / 2.0), (1.0, top + 0.5)] {
                plot_ui.text(
                    Text::new(PlotPoint::new(bar_x + 0.55, y), format!("{value:.1}"))
                        .anchor(Align2::LEFT_CENTER),
                );
            }
        });
}
