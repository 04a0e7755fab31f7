//! Prediction layer: the feature record, the predictor capability, and the
//! on-disk model artifact.
//!
//! ```text
//!  crop_recommendation_model.json
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  read + validate → ModelArtifact  (NotFound / Corrupt)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌───────────────┐
//!   │ dyn Predictor  │  FeatureRecord → crop label | PredictError
//!   └───────────────┘
//! ```

pub mod artifact;
pub mod loader;

use std::fmt;

use crate::data::model::Feature;

// ---------------------------------------------------------------------------
// FeatureRecord – a single row submitted for prediction
// ---------------------------------------------------------------------------

/// The seven input values, one per [`Feature`], in the dataset's units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureRecord {
    values: [f64; 7],
}

impl FeatureRecord {
    pub fn new(values: [f64; 7]) -> Self {
        FeatureRecord { values }
    }

    pub fn get(&self, feature: Feature) -> f64 {
        self.values[feature.index()]
    }

    pub fn set(&mut self, feature: Feature, value: f64) {
        self.values[feature.index()] = value;
    }

    /// `(column name, value)` pairs in model input order.
    pub fn fields(&self) -> [(&'static str, f64); 7] {
        Feature::ALL.map(|f| (f.column_name(), self.get(f)))
    }

    pub fn values(&self) -> &[f64; 7] {
        &self.values
    }

    /// One `"- Label: value"` line per feature; nutrients print as integers.
    pub fn echo_lines(&self) -> Vec<String> {
        Feature::ALL
            .iter()
            .map(|&f| {
                let v = self.get(f);
                if f.is_integer() {
                    format!("- {}: {}", f.label(), v.round() as i64)
                } else {
                    format!("- {}: {}", f.label(), v)
                }
            })
            .collect()
    }
}

impl fmt::Display for FeatureRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .fields()
            .iter()
            .map(|(name, v)| format!("{name}={v}"))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

// ---------------------------------------------------------------------------
// Predictor – the opaque classification capability
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PredictError {
    #[error("feature names should match those the model was built with: expected [{expected}], got [{got}]")]
    FeatureMismatch { expected: String, got: String },

    #[error("input {feature} is not a finite number")]
    NonFinite { feature: &'static str },

    #[error("tree {tree}: {reason}")]
    MalformedTree { tree: usize, reason: String },

    #[error("model has no estimators to vote")]
    Empty,
}

/// Anything that can turn one feature record into a crop label.
pub trait Predictor {
    fn predict(&self, record: &FeatureRecord) -> Result<String, PredictError>;

    /// Short description for logging.
    fn describe(&self) -> String {
        "predictor".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn echo_lines_follow_feature_order() {
        let record = FeatureRecord::new([0.0, 5.0, 5.0, 8.8, 14.3, 3.5, 20.2]);
        assert_eq!(
            record.echo_lines(),
            vec![
                "- Nitrogen: 0",
                "- Phosphorus: 5",
                "- Potassium: 5",
                "- Temperature: 8.8",
                "- Humidity: 14.3",
                "- pH Value: 3.5",
                "- Rainfall: 20.2",
            ]
        );
    }

    #[test]
    fn fields_use_dataset_column_names() {
        let mut record = FeatureRecord::new([0.0; 7]);
        record.set(Feature::PhValue, 6.5);
        assert_eq!(record.fields()[5], ("pH_Value", 6.5));
        assert_eq!(record.get(Feature::PhValue), 6.5);
    }
}
