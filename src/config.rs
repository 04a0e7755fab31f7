use std::path::PathBuf;

/// Where the dashboard finds its artifacts and how it bins the charts.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Crop dataset, relative to the working directory.
    pub dataset_path: PathBuf,
    /// Serialized predictor, relative to the working directory.
    pub model_path: PathBuf,
    pub histogram_bins: usize,
    /// Evaluation points of the density overlay.
    pub kde_grid: usize,
    pub window_size: [f32; 2],
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from("Crop_Recommendation.csv"),
            model_path: PathBuf::from("crop_recommendation_model.json"),
            histogram_bins: 20,
            kde_grid: 200,
            window_size: [1280.0, 860.0],
        }
    }
}
