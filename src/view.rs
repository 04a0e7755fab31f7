use std::sync::Arc;

use eframe::egui::Color32;

use crate::color::{ColorMap, viridis};
use crate::config::AppConfig;
use crate::data::model::{Feature, MissingColumns, RecordTable, is_missing_label};
use crate::data::stats::{self, CorrelationMatrix, Histogram, Share};
use crate::predictor::FeatureRecord;

// ---------------------------------------------------------------------------
// View – the seven menu entries
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum View {
    #[default]
    Dataset,
    CropDistribution,
    SoilNutrients,
    Climate,
    TemperatureVsHumidity,
    CorrelationHeatmap,
    CropRecommendation,
}

impl View {
    /// Menu order.
    pub const ALL: [View; 7] = [
        View::Dataset,
        View::CropDistribution,
        View::SoilNutrients,
        View::Climate,
        View::TemperatureVsHumidity,
        View::CorrelationHeatmap,
        View::CropRecommendation,
    ];

    pub fn label(self) -> &'static str {
        match self {
            View::Dataset => "Dataset",
            View::CropDistribution => "Crop Distribution",
            View::SoilNutrients => "Soil Nutrients Distribution",
            View::Climate => "Temperature and Humidity Distribution",
            View::TemperatureVsHumidity => "Temperature vs. Humidity",
            View::CorrelationHeatmap => "Correlation Heatmap",
            View::CropRecommendation => "Crop Recommendation",
        }
    }

    /// Heading shown above the view.
    pub fn heading(self) -> &'static str {
        match self {
            View::SoilNutrients => "Distribution of Soil Nutrients",
            View::Climate => "Distribution of Temperature and Humidity",
            View::CropRecommendation => "Select Input Parameters for Crop Recommendation",
            other => other.label(),
        }
    }

    pub fn caption(self) -> Option<&'static str> {
        match self {
            View::Dataset | View::CropRecommendation => None,
            View::CropDistribution => Some(
                "This pie chart shows the proportion of each crop type in the dataset. \
                 It helps us understand the distribution of different crops and their relative frequencies.",
            ),
            View::SoilNutrients => Some(
                "These histograms show the distribution of Nitrogen, Phosphorus, and Potassium levels in the soil. \
                 Understanding these distributions can help in determining the soil's fertility and nutrient availability.",
            ),
            View::Climate => Some(
                "These histograms illustrate the distribution of temperature and humidity values in the dataset. \
                 This information is crucial for understanding the climate conditions under which different crops are grown.",
            ),
            View::TemperatureVsHumidity => Some(
                "This scatter plot shows the relationship between temperature and humidity for different crops. \
                 It helps in identifying how different crops are distributed across various temperature and humidity conditions.",
            ),
            View::CorrelationHeatmap => Some(
                "This heatmap shows the correlation between different parameters in the dataset. \
                 High correlation values (positive or negative) indicate a strong relationship between the parameters, \
                 which can be important for understanding how different factors influence each other.",
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Chart summaries – everything a chart view draws, computed once per dataset
// ---------------------------------------------------------------------------

pub const CROP_FALLBACK: &str = "Crop column is not available in the dataset.";

#[derive(Debug, Clone)]
pub struct HistogramPanel {
    pub feature: Feature,
    pub color: Color32,
    /// `None` when the column is absent or holds no finite values.
    pub histogram: Option<Histogram>,
    /// Density overlay in count units.
    pub density: Vec<[f64; 2]>,
}

impl HistogramPanel {
    pub fn title(&self) -> String {
        format!("{} Distribution", self.feature.label())
    }
}

#[derive(Debug, Clone)]
pub struct ScatterSeries {
    pub name: String,
    pub color: Color32,
    pub points: Vec<[f64; 2]>,
}

#[derive(Debug, Clone)]
pub enum ChartContent {
    /// Pie slices, or the reason there are none.
    CropShares(Result<Vec<Share>, MissingColumns>),
    Histograms(Vec<HistogramPanel>),
    Scatter {
        series: Vec<ScatterSeries>,
        by_crop: bool,
    },
    Heatmap(CorrelationMatrix),
}

fn histogram_panel(table: &RecordTable, feature: Feature, color: Color32, config: &AppConfig) -> HistogramPanel {
    let values = table.feature_values(feature).unwrap_or_default();
    let histogram = stats::histogram(&values, config.histogram_bins);
    let density = histogram
        .as_ref()
        .map(|h| stats::kde_curve(&values, config.kde_grid, h.total() as f64 * h.bin_width))
        .unwrap_or_default();
    HistogramPanel {
        feature,
        color,
        histogram,
        density,
    }
}

fn scatter(table: &RecordTable) -> ChartContent {
    let temperature = table.feature_values(Feature::Temperature).unwrap_or_default();
    let humidity = table.feature_values(Feature::Humidity).unwrap_or_default();
    let points: Vec<[f64; 2]> = temperature
        .iter()
        .zip(&humidity)
        .filter(|(t, h)| t.is_finite() && h.is_finite())
        .map(|(&t, &h)| [t, h])
        .collect();

    let Some(crops) = table.crop_labels() else {
        return ChartContent::Scatter {
            series: vec![ScatterSeries {
                name: "Observations".to_string(),
                color: Color32::from_rgb(31, 119, 180),
                points,
            }],
            by_crop: false,
        };
    };

    // rows without a label are left out, as in the pie chart
    let color_map = ColorMap::new(
        crops
            .iter()
            .map(String::as_str)
            .filter(|c| !is_missing_label(c)),
        viridis,
    );
    let series = color_map
        .legend_entries()
        .into_iter()
        .map(|(crop, color)| ScatterSeries {
            points: temperature
                .iter()
                .zip(&humidity)
                .zip(&crops)
                .filter(|((t, h), c)| **c == crop && t.is_finite() && h.is_finite())
                .map(|((&t, &h), _)| [t, h])
                .collect(),
            name: crop,
            color,
        })
        .collect();
    ChartContent::Scatter {
        series,
        by_crop: true,
    }
}

/// Summarise the dataset for a chart view. `None` for the table and
/// recommendation views, which draw from live state instead.
pub fn build_chart(view: View, table: &RecordTable, config: &AppConfig) -> Option<ChartContent> {
    let content = match view {
        View::Dataset | View::CropRecommendation => return None,
        View::CropDistribution => ChartContent::CropShares(
            table
                .crop_labels()
                .map(|labels| stats::value_counts(&labels))
                .ok_or_else(|| MissingColumns {
                    columns: vec![crate::data::model::CROP_COLUMN.to_string()],
                }),
        ),
        View::SoilNutrients => ChartContent::Histograms(vec![
            histogram_panel(table, Feature::Nitrogen, Color32::from_rgb(31, 119, 180), config),
            histogram_panel(table, Feature::Phosphorus, Color32::from_rgb(44, 160, 44), config),
            histogram_panel(table, Feature::Potassium, Color32::from_rgb(214, 39, 40), config),
        ]),
        View::Climate => ChartContent::Histograms(vec![
            histogram_panel(table, Feature::Temperature, Color32::from_rgb(255, 127, 14), config),
            histogram_panel(table, Feature::Humidity, Color32::from_rgb(148, 103, 189), config),
        ]),
        View::TemperatureVsHumidity => scatter(table),
        View::CorrelationHeatmap => ChartContent::Heatmap(stats::correlation_matrix(table)),
    };
    Some(content)
}

// ---------------------------------------------------------------------------
// Recommendation inputs
// ---------------------------------------------------------------------------

/// Slider range for one feature, taken from the column's observed extremes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderBounds {
    pub feature: Feature,
    pub min: f64,
    pub max: f64,
}

impl SliderBounds {
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    /// Clamp a slider value and strip the float noise left by stepping.
    pub fn snap(&self, value: f64) -> f64 {
        if self.feature.is_integer() {
            return self.clamp(value.round());
        }
        self.clamp((value * 1e9).round() / 1e9)
    }
}

/// Why the recommendation inputs cannot be offered.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputsUnavailable {
    #[error(transparent)]
    Missing(#[from] MissingColumns),

    /// The columns exist but hold no finite numbers (e.g. a header-only file).
    #[error("no numeric values in columns: {}", .0.join(", "))]
    NoValues(Vec<String>),
}

/// Bounds for all seven features; nutrients are truncated to integers.
/// Absent columns are reported before columns without values.
pub fn feature_bounds(table: &RecordTable) -> Result<Vec<SliderBounds>, InputsUnavailable> {
    table.schema().require_features()?;

    let mut bounds = Vec::with_capacity(Feature::ALL.len());
    let mut empty = Vec::new();
    for feature in Feature::ALL {
        match table
            .feature_values(feature)
            .and_then(|values| stats::range(&values))
        {
            Some((min, max)) if feature.is_integer() => bounds.push(SliderBounds {
                feature,
                min: min.trunc(),
                max: max.trunc(),
            }),
            Some((min, max)) => bounds.push(SliderBounds { feature, min, max }),
            None => empty.push(feature.column_name().to_string()),
        }
    }
    if empty.is_empty() {
        Ok(bounds)
    } else {
        Err(InputsUnavailable::NoValues(empty))
    }
}

/// The input selection a freshly entered recommendation view starts from.
pub fn minimum_inputs(bounds: &[SliderBounds]) -> FeatureRecord {
    let mut record = FeatureRecord::new([0.0; 7]);
    for b in bounds {
        record.set(b.feature, b.min);
    }
    record
}

/// What the recommendation view shows below the echoed inputs.
#[derive(Debug, Clone, PartialEq)]
pub enum Recommendation {
    Crop(String),
    /// Prediction was attempted and failed.
    Failed(String),
    /// No model was loaded.
    ModelUnavailable,
}

pub const UNABLE_TO_RECOMMEND: &str = "Unable to recommend crop due to model loading error.";

impl Recommendation {
    /// Text shown under the echoed inputs.
    pub fn message(&self) -> String {
        match self {
            Recommendation::Crop(crop) => format!("The recommended crop is: {crop}"),
            Recommendation::Failed(msg) => msg.clone(),
            Recommendation::ModelUnavailable => UNABLE_TO_RECOMMEND.to_string(),
        }
    }

    /// Whether the outcome still applies on a frame where the inputs were
    /// just edited. Answers computed for the old inputs do not.
    pub fn visible(&self, inputs_changed: bool) -> bool {
        !inputs_changed || *self == Recommendation::ModelUnavailable
    }
}

#[derive(Debug, Clone)]
pub enum RecommendationPage {
    Unavailable(InputsUnavailable),
    Ready {
        bounds: Vec<SliderBounds>,
        inputs: FeatureRecord,
        outcome: Recommendation,
    },
}

// ---------------------------------------------------------------------------
// Page – exactly one per frame
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum Page {
    Dataset(Arc<RecordTable>),
    Chart {
        view: View,
        content: Arc<ChartContent>,
    },
    Recommendation(RecommendationPage),
}

impl Page {
    pub fn view(&self) -> View {
        match self {
            Page::Dataset(_) => View::Dataset,
            Page::Chart { view, .. } => *view,
            Page::Recommendation(_) => View::CropRecommendation,
        }
    }
}
